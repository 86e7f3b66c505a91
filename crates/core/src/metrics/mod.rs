//! Per-tick output types and the rolling window store feeding the derived
//! metrics.

pub mod compute;
pub mod tone;

use crate::util::RingBuffer;
use serde::{Deserialize, Serialize};

#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct HeadPose {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
}

/// One fused snapshot of delivery metrics, published once per tick. Optional
/// fields are absent (not a sentinel value) whenever the underlying signal is
/// unavailable for that tick.
#[derive(Clone, Debug, Serialize, Deserialize, PartialEq)]
pub struct MetricsEvent {
    /// Elapsed milliseconds since session start; strictly increasing across
    /// successive ticks.
    pub t_ms: u64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub wpm: Option<u32>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pitch_hz: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub loudness: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub pause_ratio: Option<f64>,

    pub fillers_per_min: f64,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub head_pose: Option<HeadPose>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub gaze_jitter: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub smile: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub blink_per_min: Option<f64>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub tone_score: Option<f64>,

    pub transcript_interim: String,
    pub transcript_final: String,
}

/// Scalar series kept as rolling histories for windowed statistics.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SampleKind {
    Pitch,
    Loudness,
    Pace,
    Sentiment,
}

/// Fixed set of rolling windows, one per [`SampleKind`], each bounded to the
/// configured sample capacity.
#[derive(Clone, Debug)]
pub struct WindowStore {
    pitch: RingBuffer<f64>,
    loudness: RingBuffer<f64>,
    pace: RingBuffer<f64>,
    sentiment: RingBuffer<f64>,
}

impl WindowStore {
    pub fn new(capacity: usize) -> Self {
        Self {
            pitch: RingBuffer::new(capacity),
            loudness: RingBuffer::new(capacity),
            pace: RingBuffer::new(capacity),
            sentiment: RingBuffer::new(capacity),
        }
    }

    pub fn push(&mut self, kind: SampleKind, value: f64) {
        self.window_mut(kind).push(value);
    }

    /// Ordered contents of one window, oldest first; empty before any push.
    pub fn values(&self, kind: SampleKind) -> Vec<f64> {
        self.window(kind).to_vec()
    }

    pub fn len(&self, kind: SampleKind) -> usize {
        self.window(kind).len()
    }

    pub fn is_empty(&self, kind: SampleKind) -> bool {
        self.window(kind).is_empty()
    }

    fn window(&self, kind: SampleKind) -> &RingBuffer<f64> {
        match kind {
            SampleKind::Pitch => &self.pitch,
            SampleKind::Loudness => &self.loudness,
            SampleKind::Pace => &self.pace,
            SampleKind::Sentiment => &self.sentiment,
        }
    }

    fn window_mut(&mut self, kind: SampleKind) -> &mut RingBuffer<f64> {
        match kind {
            SampleKind::Pitch => &mut self.pitch,
            SampleKind::Loudness => &mut self.loudness,
            SampleKind::Pace => &mut self.pace,
            SampleKind::Sentiment => &mut self.sentiment,
        }
    }
}
