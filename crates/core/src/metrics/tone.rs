//! Composite tone score in [-1, 1]: vocal variety, speaking rate, and lexical
//! sentiment, each independently normalized, then weighted and amplified.

use super::{SampleKind, WindowStore};
use crate::util::stats;

/// Minimum pitch and loudness samples before the score is attempted.
const MIN_WINDOW_SAMPLES: usize = 10;
/// Minimum voiced (nonzero) pitch samples after filtering.
const MIN_VOICED_SAMPLES: usize = 5;

/// Pitch coefficient-of-variation normalization: `(cv - 0.07) / 0.05`.
const CV_CENTER: f64 = 0.07;
const CV_SPAN: f64 = 0.05;

/// Speaking-rate normalization: `(mean_wpm - 135) / 35`.
const WPM_CENTER: f64 = 135.0;
const WPM_SPAN: f64 = 35.0;

const VARIETY_WEIGHT: f64 = 0.25;
const RATE_WEIGHT: f64 = 0.25;
const SENTIMENT_WEIGHT: f64 = 0.5;

/// The sub-scores sit in a narrow practical range; the gain widens the
/// composite before clamping.
const GAIN: f64 = 1.5;

/// Computes the tone score for one tick, or None while the rolling windows
/// hold too little data to be meaningful.
pub fn tone_score(windows: &WindowStore) -> Option<f64> {
    let pitch = windows.values(SampleKind::Pitch);
    let loudness = windows.values(SampleKind::Loudness);
    if pitch.len() < MIN_WINDOW_SAMPLES || loudness.len() < MIN_WINDOW_SAMPLES {
        return None;
    }

    let voiced: Vec<f64> = pitch.into_iter().filter(|&hz| hz > 0.0).collect();
    if voiced.len() < MIN_VOICED_SAMPLES {
        return None;
    }

    // Voiced samples are all positive, so the mean cannot be zero.
    let cv = stats::population_std_dev(&voiced) / stats::mean(&voiced);
    let variety = (cv - CV_CENTER) / CV_SPAN;

    let pace = windows.values(SampleKind::Pace);
    let rate = if pace.is_empty() {
        0.0
    } else {
        (stats::mean(&pace) - WPM_CENTER) / WPM_SPAN
    };

    let sentiment_samples = windows.values(SampleKind::Sentiment);
    let sentiment = stats::mean(&sentiment_samples);

    let composite =
        GAIN * (VARIETY_WEIGHT * variety + RATE_WEIGHT * rate + SENTIMENT_WEIGHT * sentiment);
    Some(composite.clamp(-1.0, 1.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn store_with(pitch: &[f64], loudness: &[f64]) -> WindowStore {
        let mut store = WindowStore::new(30);
        for &p in pitch {
            store.push(SampleKind::Pitch, p);
        }
        for &l in loudness {
            store.push(SampleKind::Loudness, l);
        }
        store
    }

    #[test]
    fn undefined_before_ten_samples() {
        let store = store_with(&[180.0; 9], &[0.5; 9]);
        assert_eq!(tone_score(&store), None);
    }

    #[test]
    fn undefined_with_too_few_voiced_samples() {
        // 10 samples each, but only 4 voiced after dropping zeros.
        let mut pitch = vec![0.0; 6];
        pitch.extend_from_slice(&[180.0, 185.0, 178.0, 182.0]);
        let store = store_with(&pitch, &[0.5; 10]);
        assert_eq!(tone_score(&store), None);
    }

    #[test]
    fn defined_score_stays_clamped() {
        // Wildly varying pitch pushes the variety sub-score far past 1.
        let pitch: Vec<f64> = (0..30).map(|i| 100.0 + (i as f64) * 20.0).collect();
        let mut store = store_with(&pitch, &[0.5; 30]);
        for _ in 0..30 {
            store.push(SampleKind::Pace, 300.0);
            store.push(SampleKind::Sentiment, 1.0);
        }
        let score = tone_score(&store).expect("enough samples");
        assert_eq!(score, 1.0);

        let mut low = store_with(&[180.0; 30], &[0.5; 30]);
        for _ in 0..30 {
            low.push(SampleKind::Pace, 40.0);
            low.push(SampleKind::Sentiment, -1.0);
        }
        let score = tone_score(&low).expect("enough samples");
        assert_eq!(score, -1.0);
    }

    #[test]
    fn flat_monotone_delivery_scores_negative() {
        // Constant pitch: cv = 0, variety = (0 - 0.07) / 0.05 = -1.4.
        // No pace or sentiment samples: both sub-scores 0.
        // tone = clamp(1.5 * 0.25 * -1.4) = -0.525.
        let store = store_with(&[200.0; 12], &[0.6; 12]);
        let score = tone_score(&store).expect("enough samples");
        assert!((score - (-0.525)).abs() < 1e-9);
    }

    #[test]
    fn pace_window_contributes_when_present() {
        let mut store = store_with(&[200.0; 12], &[0.6; 12]);
        for _ in 0..5 {
            store.push(SampleKind::Pace, 170.0);
        }
        // rate = (170 - 135) / 35 = 1.0; tone = 1.5 * (0.25*-1.4 + 0.25*1.0).
        let score = tone_score(&store).expect("enough samples");
        assert!((score - (-0.15)).abs() < 1e-9);
    }
}
