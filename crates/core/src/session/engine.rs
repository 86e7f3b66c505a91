use super::summary::{self, SessionSummary};
use crate::config::SessionConfig;
use crate::features::{AudioFeatureFrame, FaceFeatureFrame, Snapshot};
use crate::metrics::{compute, tone, HeadPose, MetricsEvent, SampleKind, WindowStore};
use crate::transcript::{fillers, sentiment, TranscriptEvent, WordTimeline};
use std::collections::VecDeque;
use std::time::Duration;

/// The synchronous heart of a session: owns all rolling state and performs
/// the per-tick unit of work. Time is supplied by the caller as elapsed
/// milliseconds since session start, which keeps every computation
/// deterministic.
pub struct SessionEngine {
    wpm_window: Duration,
    silence_threshold: f64,
    max_history: usize,
    recognition_available: bool,

    audio: Snapshot<AudioFeatureFrame>,
    face: Snapshot<FaceFeatureFrame>,
    timeline: WordTimeline,
    windows: WindowStore,

    transcript_interim: String,
    transcript_final: String,
    filler_total: u64,

    history: VecDeque<MetricsEvent>,
    last_tick_ms: Option<u64>,
}

impl SessionEngine {
    pub fn new(config: &SessionConfig, recognition_available: bool) -> Self {
        Self {
            wpm_window: config.wpm_window,
            silence_threshold: config.noise_floor.silence_threshold(),
            max_history: config.max_history,
            recognition_available,
            audio: Snapshot::new(),
            face: Snapshot::new(),
            timeline: WordTimeline::new(),
            windows: WindowStore::new(config.window_capacity),
            transcript_interim: String::new(),
            transcript_final: String::new(),
            filler_total: 0,
            history: VecDeque::new(),
            last_tick_ms: None,
        }
    }

    pub fn recognition_available(&self) -> bool {
        self.recognition_available
    }

    pub fn ingest_audio(&mut self, frame: AudioFeatureFrame) {
        self.audio.store(frame);
    }

    pub fn ingest_face(&mut self, frame: FaceFeatureFrame) {
        self.face.store(frame);
    }

    pub fn ingest_transcript(&mut self, event: TranscriptEvent, now_ms: u64) {
        match event {
            TranscriptEvent::Interim(text) => {
                self.transcript_interim = text;
            }
            TranscriptEvent::Final(text) => {
                self.timeline.push_final_chunk(&text, now_ms);
                self.filler_total += fillers::count_fillers(&text);
                self.windows
                    .push(SampleKind::Sentiment, sentiment::score_chunk(&text));
                let trimmed = text.trim();
                if !trimmed.is_empty() {
                    if !self.transcript_final.is_empty() {
                        self.transcript_final.push(' ');
                    }
                    self.transcript_final.push_str(trimmed);
                }
                self.transcript_interim.clear();
            }
        }
    }

    /// One tick: prune the timeline, feed the rolling windows from the
    /// current snapshots, derive every metric, append to the bounded history.
    /// Never fails; a metric without enough input is absent for this tick.
    pub fn tick(&mut self, now_ms: u64) -> MetricsEvent {
        // Ticks arrive one period apart; the guard keeps t_ms strictly
        // increasing if two fires land on the same millisecond.
        let t_ms = match self.last_tick_ms {
            Some(last) if now_ms <= last => last + 1,
            _ => now_ms,
        };
        self.last_tick_ms = Some(t_ms);

        self.timeline.prune(t_ms, self.wpm_window);
        let wpm = self
            .recognition_available
            .then(|| self.timeline.wpm(self.wpm_window));

        if let Some(frame) = self.audio.latest().copied() {
            self.windows.push(SampleKind::Pitch, frame.pitch_hz);
            self.windows.push(SampleKind::Loudness, frame.loudness);
        }
        if let Some(w) = wpm {
            self.windows.push(SampleKind::Pace, f64::from(w));
        }

        let loudness_window = self.windows.values(SampleKind::Loudness);
        let pause_ratio = compute::pause_ratio(&loudness_window, self.silence_threshold);

        let audio = self.audio.latest();
        let face = self.face.latest();
        let event = MetricsEvent {
            t_ms,
            wpm,
            pitch_hz: audio.map(|a| a.pitch_hz),
            loudness: audio.map(|a| a.loudness),
            pause_ratio: Some(pause_ratio),
            fillers_per_min: compute::fillers_per_min(self.filler_total, t_ms),
            head_pose: face.map(|f| HeadPose {
                yaw_deg: f.yaw_deg,
                pitch_deg: f.pitch_deg,
            }),
            gaze_jitter: face.map(|f| f.gaze_jitter),
            smile: face.map(|f| f.smile),
            blink_per_min: face.map(|f| f.blink_per_min),
            tone_score: tone::tone_score(&self.windows),
            transcript_interim: self.transcript_interim.clone(),
            transcript_final: self.transcript_final.clone(),
        };

        if self.history.len() == self.max_history {
            self.history.pop_front();
        }
        self.history.push_back(event.clone());
        event
    }

    pub fn history(&self) -> Vec<MetricsEvent> {
        self.history.iter().cloned().collect()
    }

    pub fn tick_count(&self) -> usize {
        self.history.len()
    }

    pub fn total_fillers(&self) -> u64 {
        self.filler_total
    }

    pub fn summarize(&self, started_at_ms: u64, duration_ms: u64) -> SessionSummary {
        summary::summarize(
            &self.history,
            started_at_ms,
            duration_ms,
            self.filler_total,
            &self.transcript_final,
        )
    }
}
