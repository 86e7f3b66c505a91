//! Synthetic feature producers standing in for the capture, vision, and
//! recognition collaborators. Each runs at its own cadence, independent of
//! the publish rate, and exits once the session leaves the running state.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use speech_coach_core::features::{AudioFeatureFrame, FaceFeatureFrame};
use speech_coach_core::session::{Session, SessionState};
use speech_coach_core::transcript::TranscriptEvent;
use std::sync::Arc;
use std::time::Duration;
use tokio::task::JoinHandle;

const SCRIPT: &[&str] = &[
    "thanks everyone for joining today",
    "um I want to walk you through the quarterly results",
    "the team did a great job on the launch",
    "uh we did hit a problem with the rollout you know",
    "overall I feel confident about where we are",
    "like the numbers look strong this quarter",
    "so let me stop there and take questions",
];

pub fn spawn_producers(
    session: Arc<Session>,
    no_face: bool,
    no_asr: bool,
) -> Vec<JoinHandle<()>> {
    let mut handles = vec![spawn_audio(Arc::clone(&session))];
    if !no_face {
        handles.push(spawn_face(Arc::clone(&session)));
    }
    if !no_asr {
        handles.push(spawn_transcript(session));
    }
    handles
}

/// Voice features at 20 Hz: ~4 s of voiced speech, then ~1 s of silence.
fn spawn_audio(session: Arc<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_os_rng();
        let mut elapsed_ms = 0u64;
        while session.state() == SessionState::Running {
            let speaking = elapsed_ms % 5000 < 4000;
            let frame = if speaking {
                let wobble = 25.0 * (elapsed_ms as f64 / 900.0).sin();
                AudioFeatureFrame {
                    pitch_hz: 170.0 + wobble + rng.random_range(-8.0..8.0),
                    loudness: (0.45 + rng.random_range(-0.10f64..0.15)).clamp(0.0, 1.0),
                }
            } else {
                AudioFeatureFrame {
                    pitch_hz: 0.0,
                    loudness: rng.random_range(0.0..0.04),
                }
            };
            session.push_audio_frame(frame);
            tokio::time::sleep(Duration::from_millis(50)).await;
            elapsed_ms += 50;
        }
        tracing::debug!("audio producer stopped");
    })
}

/// Face features at ~15 Hz with slow head drift and blink-rate jitter.
fn spawn_face(session: Arc<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut rng = StdRng::from_os_rng();
        let mut elapsed_ms = 0u64;
        while session.state() == SessionState::Running {
            let t = elapsed_ms as f64 / 1000.0;
            session.push_face_frame(FaceFeatureFrame {
                yaw_deg: 6.0 * (t / 1.3).sin() + rng.random_range(-1.0..1.0),
                pitch_deg: -3.0 + 2.0 * (t / 2.1).cos() + rng.random_range(-0.5..0.5),
                blink_per_min: 14.0 + rng.random_range(-3.0..5.0),
                smile: (0.35 + 0.2 * (t / 3.0).sin()).clamp(0.0, 1.0),
                gaze_jitter: rng.random_range(0.0..1.5),
            });
            tokio::time::sleep(Duration::from_millis(66)).await;
            elapsed_ms += 66;
        }
        tracing::debug!("face producer stopped");
    })
}

/// Transcript chunks every ~1.8 s: an interim preview, then the final text.
fn spawn_transcript(session: Arc<Session>) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut index = 0usize;
        while session.state() == SessionState::Running {
            let chunk = SCRIPT[index % SCRIPT.len()];
            index += 1;

            let preview: String = chunk.split_whitespace().take(3).collect::<Vec<_>>().join(" ");
            session.push_transcript(TranscriptEvent::Interim(preview));
            tokio::time::sleep(Duration::from_millis(600)).await;

            if session.state() != SessionState::Running {
                break;
            }
            session.push_transcript(TranscriptEvent::Final(chunk.to_owned()));
            tokio::time::sleep(Duration::from_millis(1200)).await;
        }
        tracing::debug!("transcript producer stopped");
    })
}
