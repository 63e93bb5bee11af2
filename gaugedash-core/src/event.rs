// gaugedash-core/src/event.rs
use crossbeam::channel::{Receiver, Sender, unbounded};
use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use crate::options::PanelOptions;

/// Topic a panel's option changes are published on
pub fn options_topic(panel: &str) -> String {
    format!("panel.{panel}.options")
}

/// Payloads carried on the bus
#[derive(Debug, Clone, PartialEq)]
pub enum PanelEvent {
    OptionsChanged {
        panel: String,
        options: PanelOptions,
    },
}

#[derive(Debug, Clone)]
pub struct BusEvent {
    pub topic: String,
    pub payload: PanelEvent,
}

impl BusEvent {
    pub fn new(topic: impl Into<String>, payload: PanelEvent) -> Self {
        Self {
            topic: topic.into(),
            payload,
        }
    }

    pub fn options_changed(panel: &str, options: &PanelOptions) -> Self {
        Self::new(
            options_topic(panel),
            PanelEvent::OptionsChanged {
                panel: panel.to_string(),
                options: options.clone(),
            },
        )
    }
}

type Subscribers = RwLock<HashMap<usize, (String, Sender<BusEvent>)>>;

struct BusInner {
    subscribers: Subscribers,
    next_id: AtomicUsize,
}

/// Subscription handle - dropping this unsubscribes
pub struct Subscription {
    id: usize,
    bus: Arc<BusInner>,
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.bus
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&self.id);
    }
}

/// Topic-based pub/sub between dashboard widgets.
///
/// Topics are dot separated. A `*` segment matches one segment, or
/// everything that remains when it is the last segment of the pattern.
#[derive(Clone)]
pub struct EventBus {
    inner: Arc<BusInner>,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(BusInner {
                subscribers: RwLock::new(HashMap::new()),
                next_id: AtomicUsize::new(0),
            }),
        }
    }

    pub fn publish(&self, event: BusEvent) {
        let subscribers = self
            .inner
            .subscribers
            .read()
            .unwrap_or_else(PoisonError::into_inner);

        let mut delivered = 0;
        for (pattern, tx) in subscribers.values() {
            // A closed receiver just means that widget went away
            if Self::topic_matches(&event.topic, pattern) && tx.send(event.clone()).is_ok() {
                delivered += 1;
            }
        }

        tracing::trace!(topic = %event.topic, delivered, "published");
    }

    pub fn subscribe(&self, pattern: impl Into<String>) -> (Subscription, Receiver<BusEvent>) {
        let (tx, rx) = unbounded();
        let id = self.inner.next_id.fetch_add(1, Ordering::SeqCst);

        self.inner
            .subscribers
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(id, (pattern.into(), tx));

        let subscription = Subscription {
            id,
            bus: self.inner.clone(),
        };
        (subscription, rx)
    }

    fn topic_matches(topic: &str, pattern: &str) -> bool {
        let mut topic_parts = topic.split('.');
        let mut pattern_parts = pattern.split('.').peekable();

        while let Some(part) = pattern_parts.next() {
            let trailing_wildcard = part == "*" && pattern_parts.peek().is_none();
            match topic_parts.next() {
                Some(_) if trailing_wildcard => return true,
                Some(segment) if part == "*" || part == segment => {}
                _ => return false,
            }
        }

        topic_parts.next().is_none()
    }
}
