//! Typed notifications broadcast to ruler widgets.
//!
//! Events are queued on bounded channels and drained synchronously by each
//! widget on the UI thread. A widget's subscription lives as long as the
//! widget; once it is dropped the bus forgets it on the next publish.
//!
//! A subscription that is never drained keeps at most [`QUEUE_CAPACITY`]
//! events. When full, the oldest queued event is discarded to make room, so
//! the newest state (for example the current document origin) always gets
//! through. Every event is an invalidation, so a widget that finds anything
//! in its queue repaints and catches up with the current state.

use crate::config::ConfigKey;
use crate::view::DocOrigin;
use crossbeam_channel::{bounded, Receiver, Sender, TrySendError};
use std::sync::Arc;
use tracing::debug;

/// Events kept per subscription before the oldest are dropped.
pub const QUEUE_CAPACITY: usize = 64;

/// Something the rulers may need to repaint for.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RulerEvent {
    /// Zoom, scroll or widget size changed.
    ViewChanged,
    /// A configuration entry changed.
    ConfigChanged { key: ConfigKey },
    /// The document origin convention was switched.
    DocOriginChanged(DocOrigin),
}

/// Fan-out of [`RulerEvent`]s to every live subscription.
#[derive(Debug, Default)]
pub struct EventBus {
    subscribers: Vec<Subscriber>,
}

/// Bus-side handle of one subscription. The bus keeps a receiver so it can
/// drop the oldest event; `alive` tells it when the widget went away.
#[derive(Debug)]
struct Subscriber {
    tx: Sender<RulerEvent>,
    rx: Receiver<RulerEvent>,
    alive: Arc<()>,
}

impl Subscriber {
    fn is_alive(&self) -> bool {
        Arc::strong_count(&self.alive) > 1
    }

    /// Queue `event`, evicting the oldest entries while the queue is full.
    /// Returns how many events were evicted.
    fn push(&self, event: RulerEvent) -> usize {
        let mut evicted = 0;
        loop {
            match self.tx.try_send(event) {
                Ok(()) | Err(TrySendError::Disconnected(_)) => return evicted,
                Err(TrySendError::Full(_)) => {
                    if self.rx.try_recv().is_err() {
                        return evicted;
                    }
                    evicted += 1;
                }
            }
        }
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self) -> Subscription {
        let (tx, rx) = bounded(QUEUE_CAPACITY);
        let alive = Arc::new(());
        self.subscribers.push(Subscriber {
            tx,
            rx: rx.clone(),
            alive: Arc::clone(&alive),
        });
        Subscription { rx, _alive: alive }
    }

    /// Queue `event` for every subscriber. Returns how many received it.
    pub fn publish(&mut self, event: RulerEvent) -> usize {
        let before = self.subscribers.len();
        self.subscribers.retain(Subscriber::is_alive);
        let pruned = before - self.subscribers.len();
        if pruned > 0 {
            debug!("Dropped {} closed ruler event subscription(s)", pruned);
        }

        for subscriber in &self.subscribers {
            let evicted = subscriber.push(event);
            if evicted > 0 {
                debug!(
                    "Ruler event queue full, dropped {} oldest event(s) for {:?}",
                    evicted, event
                );
            }
        }
        self.subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}

/// Receiving end of an [`EventBus`] subscription.
#[derive(Debug)]
pub struct Subscription {
    rx: Receiver<RulerEvent>,
    _alive: Arc<()>,
}

impl Subscription {
    /// Take every queued event without blocking.
    pub fn drain(&self) -> impl Iterator<Item = RulerEvent> + '_ {
        self.rx.try_iter()
    }

    pub fn pending(&self) -> usize {
        self.rx.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_publish_reaches_every_subscriber() {
        let mut bus = EventBus::new();
        let a = bus.subscribe();
        let b = bus.subscribe();

        assert_eq!(bus.publish(RulerEvent::ViewChanged), 2);
        assert_eq!(
            bus.publish(RulerEvent::ConfigChanged {
                key: ConfigKey::Foreground
            }),
            2
        );

        assert_eq!(
            a.drain().collect::<Vec<_>>(),
            vec![
                RulerEvent::ViewChanged,
                RulerEvent::ConfigChanged {
                    key: ConfigKey::Foreground
                }
            ]
        );
        assert_eq!(b.pending(), 2);
    }

    #[test]
    fn test_dropped_subscription_is_pruned() {
        let mut bus = EventBus::new();
        let keep = bus.subscribe();
        let gone = bus.subscribe();
        drop(gone);

        assert_eq!(bus.publish(RulerEvent::DocOriginChanged(DocOrigin::Center)), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert_eq!(keep.pending(), 1);
    }

    #[test]
    fn test_drain_empties_queue() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe();
        bus.publish(RulerEvent::ViewChanged);
        assert_eq!(sub.drain().count(), 1);
        assert_eq!(sub.drain().count(), 0);
    }

    #[test]
    fn test_full_queue_drops_oldest_events() {
        let mut bus = EventBus::new();
        let sub = bus.subscribe();

        for _ in 0..QUEUE_CAPACITY {
            bus.publish(RulerEvent::ViewChanged);
        }
        bus.publish(RulerEvent::DocOriginChanged(DocOrigin::UpperLeft));

        assert_eq!(sub.pending(), QUEUE_CAPACITY);
        assert_eq!(
            sub.drain().last(),
            Some(RulerEvent::DocOriginChanged(DocOrigin::UpperLeft))
        );
    }
}
