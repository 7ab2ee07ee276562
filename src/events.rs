//! In-process publish/subscribe channel for dashboard refresh notifications.
//!
//! Every subscriber gets its own unbounded channel. Publishing never blocks
//! and never waits for a subscriber to react; subscribers that have been
//! dropped are pruned on the next publish. Each subscriber receives each
//! event at most once and there is no ordering guarantee across subscribers.

use std::sync::Arc;
use std::time::Duration;

use crossbeam_channel::{Receiver, Sender, unbounded};
use parking_lot::Mutex;

/// Name of the refresh notification on the dashboard pages.
pub const REFRESH_EVENT: &str = "analyst-dashboard-refresh";

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RefreshCause {
    Search,
    Subscribed,
    Unsubscribed,
}

/// Tells dashboard widgets to re-fetch their own aggregates.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct RefreshEvent {
    pub cause: RefreshCause,
}

impl RefreshEvent {
    pub const fn new(cause: RefreshCause) -> Self {
        Self { cause }
    }
}

#[derive(Clone, Debug, Default)]
pub struct RefreshBus {
    subscribers: Arc<Mutex<Vec<Sender<RefreshEvent>>>>,
}

impl RefreshBus {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&self) -> RefreshSubscription {
        let (sender, receiver) = unbounded();
        self.subscribers.lock().push(sender);
        RefreshSubscription { receiver }
    }

    /// Fire-and-forget delivery. Returns how many live subscribers were sent
    /// the event.
    pub fn publish(&self, event: RefreshEvent) -> usize {
        let mut subscribers = self.subscribers.lock();
        subscribers.retain(|sender| sender.send(event).is_ok());
        log::debug!(
            "Published {REFRESH_EVENT} ({:?}) to {} subscriber(s)",
            event.cause,
            subscribers.len()
        );
        subscribers.len()
    }

    pub fn subscriber_count(&self) -> usize {
        self.subscribers.lock().len()
    }
}

/// Receiving end held by one widget. Dropping it unsubscribes.
#[derive(Debug)]
pub struct RefreshSubscription {
    receiver: Receiver<RefreshEvent>,
}

impl RefreshSubscription {
    pub fn try_next(&self) -> Option<RefreshEvent> {
        self.receiver.try_recv().ok()
    }

    pub fn next_timeout(&self, timeout: Duration) -> Option<RefreshEvent> {
        self.receiver.recv_timeout(timeout).ok()
    }

    /// Takes every pending event.
    pub fn drain(&self) -> Vec<RefreshEvent> {
        self.receiver.try_iter().collect()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;

    #[test]
    fn each_subscriber_gets_each_event_once() {
        let bus = RefreshBus::new();
        let first = bus.subscribe();
        let second = bus.subscribe();

        assert_eq!(bus.publish(RefreshEvent::new(RefreshCause::Search)), 2);

        assert_eq!(first.drain(), vec![RefreshEvent::new(RefreshCause::Search)]);
        assert_eq!(second.drain(), vec![RefreshEvent::new(RefreshCause::Search)]);
        assert!(first.try_next().is_none());
    }

    #[test]
    fn dropped_subscribers_are_pruned() {
        let bus = RefreshBus::new();
        let kept = bus.subscribe();
        drop(bus.subscribe());

        assert_eq!(bus.publish(RefreshEvent::new(RefreshCause::Subscribed)), 1);
        assert_eq!(bus.subscriber_count(), 1);
        assert!(kept.try_next().is_some());
    }

    #[test]
    fn publishing_without_subscribers_is_fine() {
        let bus = RefreshBus::new();
        assert_eq!(bus.publish(RefreshEvent::new(RefreshCause::Search)), 0);
    }

    #[test]
    fn delivers_across_threads() {
        let bus = RefreshBus::new();
        let subscription = bus.subscribe();

        let publisher = bus.clone();
        thread::spawn(move || publisher.publish(RefreshEvent::new(RefreshCause::Unsubscribed)))
            .join()
            .unwrap();

        assert_eq!(
            subscription.next_timeout(Duration::from_secs(1)),
            Some(RefreshEvent::new(RefreshCause::Unsubscribed))
        );
    }
}
