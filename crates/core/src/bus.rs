//! Typed observer registry for published metrics events.
//!
//! Listeners run synchronously, in registration order, inside the tick. A
//! panicking listener is caught and logged so it cannot break the tick or the
//! listeners after it.

use crate::metrics::MetricsEvent;
use std::panic::{catch_unwind, AssertUnwindSafe};

pub type Listener = Box<dyn Fn(&MetricsEvent) + Send + 'static>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

#[derive(Default)]
pub struct EventBus {
    listeners: Vec<(SubscriptionId, Listener)>,
    next_id: u64,
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, listener: Listener) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, listener));
        id
    }

    /// Removes a listener. Unknown or already-removed ids are a no-op.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
    }

    pub fn listener_count(&self) -> usize {
        self.listeners.len()
    }

    /// Delivers the event to every current listener in registration order.
    pub fn publish(&self, event: &MetricsEvent) {
        for (id, listener) in &self.listeners {
            if catch_unwind(AssertUnwindSafe(|| listener(event))).is_err() {
                tracing::warn!(subscription = id.0, "metrics listener panicked");
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    fn event(t_ms: u64) -> MetricsEvent {
        MetricsEvent {
            t_ms,
            wpm: None,
            pitch_hz: None,
            loudness: None,
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
    fn listeners_fire_in_registration_order() {
        let order = Arc::new(Mutex::new(Vec::new()));
        let mut bus = EventBus::new();
        for tag in ["first", "second", "third"] {
            let order = Arc::clone(&order);
            bus.subscribe(Box::new(move |_| order.lock().unwrap().push(tag)));
        }

        bus.publish(&event(0));
        assert_eq!(*order.lock().unwrap(), vec!["first", "second", "third"]);
    }

    #[test]
    fn unsubscribe_is_idempotent() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        let hits_in = Arc::clone(&hits);
        let id = bus.subscribe(Box::new(move |_| {
            hits_in.fetch_add(1, Ordering::SeqCst);
        }));

        bus.unsubscribe(id);
        bus.unsubscribe(id);
        bus.publish(&event(0));
        assert_eq!(hits.load(Ordering::SeqCst), 0);
        assert_eq!(bus.listener_count(), 0);
    }

    #[test]
    fn panicking_listener_does_not_starve_the_rest() {
        let hits = Arc::new(AtomicUsize::new(0));
        let mut bus = EventBus::new();
        bus.subscribe(Box::new(|_| panic!("listener bug")));
        let hits_in = Arc::clone(&hits);
        bus.subscribe(Box::new(move |_| {
            hits_in.fetch_add(1, Ordering::SeqCst);
        }));

        bus.publish(&event(0));
        bus.publish(&event(100));
        assert_eq!(hits.load(Ordering::SeqCst), 2);
    }
}
