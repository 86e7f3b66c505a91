use serde::{Deserialize, Serialize};

/// One voice-feature frame from the audio collaborator. `pitch_hz` of 0 marks
/// an unvoiced/silent frame; `loudness` is normalized to [0, 1].
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct AudioFeatureFrame {
    pub pitch_hz: f64,
    pub loudness: f64,
}

/// One face-feature frame from the vision collaborator. Entirely absent when
/// no face is detected, so every consumer treats the whole frame as optional.
#[derive(Clone, Copy, Debug, Serialize, Deserialize, PartialEq)]
pub struct FaceFeatureFrame {
    pub yaw_deg: f64,
    pub pitch_deg: f64,
    pub blink_per_min: f64,
    pub smile: f64,
    pub gaze_jitter: f64,
}

/// Latest-value cell for an independently-arriving feature stream. Arrivals
/// overwrite; no history is kept here. Two such cells read in the same tick
/// carry no ordering relationship to each other.
#[derive(Clone, Debug, Default)]
pub struct Snapshot<T> {
    latest: Option<T>,
}

impl<T> Snapshot<T> {
    pub fn new() -> Self {
        Self { latest: None }
    }

    pub fn store(&mut self, frame: T) {
        self.latest = Some(frame);
    }

    pub fn latest(&self) -> Option<&T> {
        self.latest.as_ref()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn snapshot_keeps_only_the_latest_frame() {
        let mut cell = Snapshot::new();
        assert!(cell.latest().is_none());

        cell.store(AudioFeatureFrame {
            pitch_hz: 120.0,
            loudness: 0.4,
        });
        cell.store(AudioFeatureFrame {
            pitch_hz: 180.0,
            loudness: 0.6,
        });

        let frame = cell.latest().expect("stored");
        assert_eq!(frame.pitch_hz, 180.0);
    }
}
