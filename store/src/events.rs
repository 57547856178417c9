//! Change notifications emitted by starter stores.

use starter_types::StarterKind;
use std::sync::{PoisonError, RwLock};

/// A completed mutation of the store.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StoreEvent {
    /// A starter file was written and verified.
    Saved(StarterKind),
    /// A starter file was removed.
    Deleted(StarterKind),
}

impl StoreEvent {
    pub fn kind(&self) -> StarterKind {
        match self {
            Self::Saved(kind) | Self::Deleted(kind) => *kind,
        }
    }
}

type Listener = Box<dyn Fn(&StoreEvent) + Send + Sync>;

/// Synchronous fan-out event bus for store events.
///
/// Listeners run inline on the thread that performed the mutation, after the
/// mutation finished; keep them fast. Subscribing only needs `&self`, so a
/// store shared behind an `Arc` can still gain observers.
pub struct EventBus {
    listeners: RwLock<Vec<Listener>>,
}

impl EventBus {
    pub fn new() -> Self {
        Self {
            listeners: RwLock::new(Vec::new()),
        }
    }

    pub fn subscribe(&self, listener: Listener) {
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .push(listener);
    }

    pub fn emit(&self, event: &StoreEvent) {
        tracing::trace!(kind = %event.kind(), ?event, "store event");
        let listeners = self.listeners.read().unwrap_or_else(PoisonError::into_inner);
        for listener in listeners.iter() {
            listener(event);
        }
    }

    pub fn listener_count(&self) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{
        atomic::{AtomicUsize, Ordering},
        Arc,
    };

    #[test]
    fn emit_calls_all_listeners() {
        let counter = Arc::new(AtomicUsize::new(0));
        let bus = EventBus::new();

        let c1 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c1.fetch_add(1, Ordering::SeqCst);
        }));

        let c2 = Arc::clone(&counter);
        bus.subscribe(Box::new(move |_| {
            c2.fetch_add(10, Ordering::SeqCst);
        }));

        bus.emit(&StoreEvent::Saved(StarterKind::Master));

        assert_eq!(counter.load(Ordering::SeqCst), 11);
    }

    #[test]
    fn emit_with_no_listeners_is_noop() {
        let bus = EventBus::new();
        bus.emit(&StoreEvent::Deleted(StarterKind::L1));
    }

    #[test]
    fn listener_receives_correct_event_variant() {
        let saved = Arc::new(AtomicUsize::new(0));
        let deleted = Arc::new(AtomicUsize::new(0));
        let bus = EventBus::new();

        let s = Arc::clone(&saved);
        let d = Arc::clone(&deleted);
        bus.subscribe(Box::new(move |event| match event {
            StoreEvent::Saved(_) => {
                s.fetch_add(1, Ordering::SeqCst);
            }
            StoreEvent::Deleted(_) => {
                d.fetch_add(1, Ordering::SeqCst);
            }
        }));

        bus.emit(&StoreEvent::Saved(StarterKind::Sidechain(2)));
        bus.emit(&StoreEvent::Deleted(StarterKind::Sidechain(2)));
        bus.emit(&StoreEvent::Deleted(StarterKind::L1));

        assert_eq!(saved.load(Ordering::SeqCst), 1);
        assert_eq!(deleted.load(Ordering::SeqCst), 2);
    }

    #[test]
    fn default_creates_empty_bus() {
        assert_eq!(EventBus::default().listener_count(), 0);
    }

    #[test]
    fn event_kind() {
        assert_eq!(
            StoreEvent::Saved(StarterKind::Sidechain(4)).kind(),
            StarterKind::Sidechain(4)
        );
    }
}
