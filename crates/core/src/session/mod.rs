//! A live metrics session: the publish ticker state machine around
//! [`SessionEngine`].
//!
//! External producers push feature frames and transcript events at their own
//! cadence; a fixed-period tokio task performs the per-tick unit of work and
//! publishes the resulting [`MetricsEvent`] to all subscribers.

pub mod summary;

mod engine;

pub use engine::SessionEngine;
pub use summary::{MetricStats, SessionSummary};

use crate::bus::{EventBus, Listener, SubscriptionId};
use crate::config::SessionConfig;
use crate::features::{AudioFeatureFrame, FaceFeatureFrame};
use crate::metrics::MetricsEvent;
use crate::transcript::{RecognitionSource, TranscriptEvent};
use futures::Stream;
use std::pin::Pin;
use std::sync::{Arc, Mutex};
use std::task::{Context, Poll};
use std::time::{SystemTime, UNIX_EPOCH};
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SessionState {
    Idle,
    Running,
    Stopped,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionError {
    #[error("session has not been started")]
    NotStarted,
    #[error("session already stopped; a new session needs a new instance")]
    AlreadyStopped,
}

struct Inner {
    state: SessionState,
    engine: Option<SessionEngine>,
    bus: EventBus,
    taps: Vec<mpsc::UnboundedSender<MetricsEvent>>,
    started_at: Option<Instant>,
    started_epoch_ms: u64,
    stopped_elapsed_ms: Option<u64>,
}

/// One live session. All state is owned by this instance; concurrent
/// sessions are fully independent.
pub struct Session {
    config: SessionConfig,
    recognition: Arc<dyn RecognitionSource>,
    inner: Arc<Mutex<Inner>>,
    ticker: Mutex<Option<JoinHandle<()>>>,
}

impl Session {
    pub fn new(config: SessionConfig, recognition: Arc<dyn RecognitionSource>) -> Self {
        Self {
            config,
            recognition,
            inner: Arc::new(Mutex::new(Inner {
                state: SessionState::Idle,
                engine: None,
                bus: EventBus::new(),
                taps: Vec::new(),
                started_at: None,
                started_epoch_ms: 0,
                stopped_elapsed_ms: None,
            })),
            ticker: Mutex::new(None),
        }
    }

    /// Transitions idle -> running: initializes all rolling state, queries
    /// recognition availability once, and begins ticking at the configured
    /// rate. Starting a running session is a logged no-op; a stopped session
    /// cannot be restarted.
    pub fn start(&self) -> Result<(), SessionError> {
        let recognition_available = self.recognition.is_available();
        {
            let mut inner = self.lock_inner();
            match inner.state {
                SessionState::Running => {
                    tracing::warn!("session already running");
                    return Ok(());
                }
                SessionState::Stopped => return Err(SessionError::AlreadyStopped),
                SessionState::Idle => {}
            }

            inner.engine = Some(SessionEngine::new(&self.config, recognition_available));
            inner.started_at = Some(Instant::now());
            inner.started_epoch_ms = epoch_ms();
            inner.state = SessionState::Running;
        }

        tracing::info!(
            metrics_hz = self.config.metrics_rate.hz(),
            recognition_available,
            "session started"
        );

        let period = self.config.metrics_rate.period();
        let shared = Arc::clone(&self.inner);
        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + period, period);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;

                let mut inner = shared.lock().expect("session state lock poisoned");
                if inner.state != SessionState::Running {
                    break;
                }
                let Some(started_at) = inner.started_at else {
                    break;
                };
                let now_ms = started_at.elapsed().as_millis() as u64;
                let Some(engine) = inner.engine.as_mut() else {
                    break;
                };
                let event = engine.tick(now_ms);
                inner.taps.retain(|tap| tap.send(event.clone()).is_ok());
                inner.bus.publish(&event);
            }
            tracing::debug!("publish ticker stopped");
        });
        *self.lock_ticker() = Some(handle);
        Ok(())
    }

    /// Transitions running -> stopped, halts the ticker, and returns the
    /// finalized summary. Idempotent: a second stop returns the same summary
    /// without error and without further ticks.
    pub async fn stop(&self) -> Result<SessionSummary, SessionError> {
        {
            let mut inner = self.lock_inner();
            match inner.state {
                SessionState::Idle => return Err(SessionError::NotStarted),
                SessionState::Stopped => {}
                SessionState::Running => {
                    let elapsed = inner
                        .started_at
                        .map(|t| t.elapsed().as_millis() as u64)
                        .unwrap_or(0);
                    inner.stopped_elapsed_ms = Some(elapsed);
                    inner.state = SessionState::Stopped;
                    tracing::info!(duration_ms = elapsed, "session stopped");
                }
            }
        }

        // The tick body never observes Running again, so no further state
        // mutation is possible; aborting only interrupts the timer wait.
        let handle = self.lock_ticker().take();
        if let Some(handle) = handle {
            handle.abort();
            let _ = handle.await;
        }

        self.summary()
    }

    pub fn state(&self) -> SessionState {
        self.lock_inner().state
    }

    /// Elapsed session time in milliseconds: 0 while idle, frozen at stop.
    pub fn elapsed_ms(&self) -> u64 {
        let inner = self.lock_inner();
        if let Some(frozen) = inner.stopped_elapsed_ms {
            return frozen;
        }
        inner
            .started_at
            .map(|t| t.elapsed().as_millis() as u64)
            .unwrap_or(0)
    }

    /// Latest-value overwrite; harmless before start and after stop.
    pub fn push_audio_frame(&self, frame: AudioFeatureFrame) {
        let mut inner = self.lock_inner();
        match inner.engine.as_mut() {
            Some(engine) => engine.ingest_audio(frame),
            None => tracing::debug!("audio frame before session start; dropped"),
        }
    }

    /// Latest-value overwrite; harmless before start and after stop.
    pub fn push_face_frame(&self, frame: FaceFeatureFrame) {
        let mut inner = self.lock_inner();
        match inner.engine.as_mut() {
            Some(engine) => engine.ingest_face(frame),
            None => tracing::debug!("face frame before session start; dropped"),
        }
    }

    pub fn push_transcript(&self, event: TranscriptEvent) {
        let mut inner = self.lock_inner();
        let now_ms = match (inner.stopped_elapsed_ms, inner.started_at) {
            (Some(frozen), _) => frozen,
            (None, Some(started)) => started.elapsed().as_millis() as u64,
            (None, None) => 0,
        };
        match inner.engine.as_mut() {
            Some(engine) => engine.ingest_transcript(event, now_ms),
            None => tracing::debug!("transcript before session start; dropped"),
        }
    }

    /// Registers a synchronous listener invoked on every published event.
    pub fn subscribe(&self, listener: Listener) -> SubscriptionId {
        self.lock_inner().bus.subscribe(listener)
    }

    pub fn unsubscribe(&self, id: SubscriptionId) {
        self.lock_inner().bus.unsubscribe(id)
    }

    /// An owned-event stream of everything published after this call. A
    /// dropped stream quietly stops receiving; the stream ends when the
    /// session is dropped.
    pub fn event_stream(&self) -> MetricsStream {
        let (tx, rx) = mpsc::unbounded_channel();
        self.lock_inner().taps.push(tx);
        MetricsStream { rx }
    }

    /// Snapshot of the bounded per-tick history so far.
    pub fn history(&self) -> Result<Vec<MetricsEvent>, SessionError> {
        let inner = self.lock_inner();
        inner
            .engine
            .as_ref()
            .map(SessionEngine::history)
            .ok_or(SessionError::NotStarted)
    }

    /// Descriptive statistics over the history. Computable while running;
    /// the duration is finalized once stopped.
    pub fn summary(&self) -> Result<SessionSummary, SessionError> {
        let inner = self.lock_inner();
        let engine = inner.engine.as_ref().ok_or(SessionError::NotStarted)?;
        let duration_ms = match inner.stopped_elapsed_ms {
            Some(frozen) => frozen,
            None => inner
                .started_at
                .map(|t| t.elapsed().as_millis() as u64)
                .unwrap_or(0),
        };
        Ok(engine.summarize(inner.started_epoch_ms, duration_ms))
    }

    fn lock_inner(&self) -> std::sync::MutexGuard<'_, Inner> {
        self.inner.lock().expect("session state lock poisoned")
    }

    fn lock_ticker(&self) -> std::sync::MutexGuard<'_, Option<JoinHandle<()>>> {
        self.ticker.lock().expect("ticker handle lock poisoned")
    }
}

impl Drop for Session {
    fn drop(&mut self) {
        if let Ok(mut ticker) = self.ticker.lock() {
            if let Some(handle) = ticker.take() {
                handle.abort();
            }
        }
    }
}

/// Stream adapter over the session's published events.
pub struct MetricsStream {
    rx: mpsc::UnboundedReceiver<MetricsEvent>,
}

impl Stream for MetricsStream {
    type Item = MetricsEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<MetricsEvent>> {
        self.rx.poll_recv(cx)
    }
}

fn epoch_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as u64)
        .unwrap_or(0)
}
