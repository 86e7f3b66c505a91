//! End-of-session reduction of the per-tick history into descriptive
//! statistics.

use crate::metrics::MetricsEvent;
use crate::util::stats;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricStats {
    pub mean: f64,
    pub median: f64,
    pub min: f64,
    pub max: f64,
    pub std_dev: f64,
    pub samples: usize,
}

impl MetricStats {
    /// None for an empty set; a metric with no defined ticks has no summary
    /// entry rather than a zero one.
    fn from_values(values: &[f64]) -> Option<Self> {
        let median = stats::median_lower(values)?;
        let mut min = f64::INFINITY;
        let mut max = f64::NEG_INFINITY;
        for &v in values {
            min = min.min(v);
            max = max.max(v);
        }
        Some(Self {
            mean: stats::mean(values),
            median,
            min,
            max,
            std_dev: stats::population_std_dev(values),
            samples: values.len(),
        })
    }
}

#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct SessionSummary {
    /// Wall-clock session start, epoch milliseconds.
    pub started_at_ms: u64,
    pub duration_ms: u64,
    pub ticks: usize,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpm: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_hz: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub loudness: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_ratio: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fillers_per_min: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_yaw_deg: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_pitch_deg: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaze_jitter: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub smile: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_per_min: Option<MetricStats>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_score: Option<MetricStats>,

    /// The monotonically-tracked counter, not re-derived from history.
    pub total_fillers: u64,
    pub transcript: String,
    pub word_count: usize,
}

pub fn summarize(
    history: &VecDeque<MetricsEvent>,
    started_at_ms: u64,
    duration_ms: u64,
    total_fillers: u64,
    transcript: &str,
) -> SessionSummary {
    let collect = |field: &dyn Fn(&MetricsEvent) -> Option<f64>| {
        let values: Vec<f64> = history.iter().filter_map(field).collect();
        MetricStats::from_values(&values)
    };

    SessionSummary {
        started_at_ms,
        duration_ms,
        ticks: history.len(),
        wpm: collect(&|e| e.wpm.map(f64::from)),
        pitch_hz: collect(&|e| e.pitch_hz),
        loudness: collect(&|e| e.loudness),
        pause_ratio: collect(&|e| e.pause_ratio),
        fillers_per_min: collect(&|e| Some(e.fillers_per_min)),
        head_yaw_deg: collect(&|e| e.head_pose.map(|p| p.yaw_deg)),
        head_pitch_deg: collect(&|e| e.head_pose.map(|p| p.pitch_deg)),
        gaze_jitter: collect(&|e| e.gaze_jitter),
        smile: collect(&|e| e.smile),
        blink_per_min: collect(&|e| e.blink_per_min),
        tone_score: collect(&|e| e.tone_score),
        total_fillers,
        transcript: transcript.to_owned(),
        word_count: transcript.split_whitespace().count(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(t_ms: u64, loudness: Option<f64>, wpm: Option<u32>) -> MetricsEvent {
        MetricsEvent {
            t_ms,
            wpm,
            pitch_hz: None,
            loudness,
            pause_ratio: None,
            fillers_per_min: 0.0,
            head_pose: None,
            gaze_jitter: None,
            smile: None,
            blink_per_min: None,
            tone_score: None,
            transcript_interim: String::new(),
            transcript_final: String::new(),
        }
    }

    #[test]
    fn constant_loudness_summarizes_exactly() {
        let history: VecDeque<_> = (1..=8).map(|i| event(i * 100, Some(0.5), None)).collect();
        let summary = summarize(&history, 0, 800, 0, "");

        let loudness = summary.loudness.expect("defined on every tick");
        assert_eq!(loudness.mean, 0.5);
        assert_eq!(loudness.median, 0.5);
        assert_eq!(loudness.min, 0.5);
        assert_eq!(loudness.max, 0.5);
        assert_eq!(loudness.std_dev, 0.0);
        assert_eq!(loudness.samples, 8);
    }

    #[test]
    fn never_defined_metric_has_no_entry() {
        let history: VecDeque<_> = (1..=4).map(|i| event(i * 100, Some(0.5), None)).collect();
        let summary = summarize(&history, 0, 400, 0, "");
        assert!(summary.wpm.is_none());
        assert!(summary.smile.is_none());
        assert!(summary.tone_score.is_none());
    }

    #[test]
    fn median_of_even_count_takes_lower_middle() {
        let history: VecDeque<_> = [10, 20, 30, 40]
            .iter()
            .enumerate()
            .map(|(i, &w)| event((i as u64 + 1) * 100, None, Some(w)))
            .collect();
        let summary = summarize(&history, 0, 400, 0, "");
        assert_eq!(summary.wpm.expect("defined").median, 20.0);
    }

    #[test]
    fn transcript_word_count_skips_empty_tokens() {
        let summary = summarize(&VecDeque::new(), 0, 0, 3, "  one  two   three ");
        assert_eq!(summary.word_count, 3);
        assert_eq!(summary.total_fillers, 3);
        assert_eq!(summary.ticks, 0);
    }
}
