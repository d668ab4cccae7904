//! Bounded queue of scene events

use crate::event::SceneEvent;
use std::collections::VecDeque;

/// Pending events kept when the host never drains
pub const DEFAULT_EVENT_CAPACITY: usize = 256;

/// Events queued for the host. Once full, the oldest event is dropped for
/// each new one so a host that never drains stays bounded.
pub struct EventBus {
    events: VecDeque<SceneEvent>,
    capacity: usize,
    /// Events discarded since the last drain
    dropped: usize,
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new()
    }
}

impl EventBus {
    pub fn new() -> Self {
        Self::with_capacity(DEFAULT_EVENT_CAPACITY)
    }

    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            events: VecDeque::with_capacity(capacity),
            capacity,
            dropped: 0,
        }
    }

    pub fn push(&mut self, event: SceneEvent) {
        if self.events.len() >= self.capacity {
            self.events.pop_front();
            if self.dropped == 0 {
                log::warn!(
                    "[runtime] Event queue full ({} pending), dropping oldest events until drained",
                    self.capacity
                );
            }
            self.dropped += 1;
        }
        self.events.push_back(event);
    }

    /// Take every pending event, oldest first
    pub fn drain(&mut self) -> Vec<SceneEvent> {
        self.dropped = 0;
        self.events.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    /// Events lost to overflow since the last drain
    pub fn dropped(&self) -> usize {
        self.dropped
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SceneMode;

    #[test]
    fn drain_returns_events_in_order() {
        let mut bus = EventBus::new();
        assert!(bus.is_empty());

        bus.push(SceneEvent::ModeChanged {
            from: SceneMode::TreeShape,
            to: SceneMode::Scattered,
        });
        bus.push(SceneEvent::FireworkLaunched { batch: 3 });

        assert_eq!(bus.len(), 2);
        let events = bus.drain();
        assert_eq!(events.len(), 2);
        assert_eq!(events[1], SceneEvent::FireworkLaunched { batch: 3 });
        assert!(bus.is_empty());
        assert!(bus.drain().is_empty());
    }

    #[test]
    fn undrained_queue_stays_bounded() {
        let mut bus = EventBus::with_capacity(4);
        for batch in 0..10 {
            bus.push(SceneEvent::FireworkLaunched { batch });
        }
        assert_eq!(bus.len(), 4);
        assert_eq!(bus.dropped(), 6);

        let events = bus.drain();
        assert_eq!(events.first(), Some(&SceneEvent::FireworkLaunched { batch: 6 }));
        assert_eq!(events.last(), Some(&SceneEvent::FireworkLaunched { batch: 9 }));
        assert_eq!(bus.dropped(), 0);
    }

    #[test]
    fn zero_capacity_keeps_latest() {
        let mut bus = EventBus::with_capacity(0);
        bus.push(SceneEvent::FireworkLaunched { batch: 1 });
        bus.push(SceneEvent::FireworkLaunched { batch: 2 });
        assert_eq!(bus.drain(), vec![SceneEvent::FireworkLaunched { batch: 2 }]);
    }
}
