//! Multi-producer, single-consumer mailbox for confirmed triggers.
//!
//! Producers push from their own threads without blocking; the lock
//! controller is the sole consumer. Events from one producer keep their
//! relative order, and globally the queue drains in arrival order.

use tokio::sync::mpsc;
use tracing::warn;

use super::ActionEvent;

/// Factory for connected sender/receiver halves.
pub struct ActionQueue;

impl ActionQueue {
    /// Create the queue. The receiver belongs to the consumer task; the
    /// sender is cloned once per producer.
    pub fn channel() -> (ActionSender, ActionReceiver) {
        let (tx, rx) = mpsc::unbounded_channel();
        (ActionSender { tx }, ActionReceiver { rx })
    }
}

/// Producer handle. Cheap to clone, safe to move across threads.
#[derive(Clone)]
pub struct ActionSender {
    tx: mpsc::UnboundedSender<ActionEvent>,
}

impl ActionSender {
    /// Enqueue an event without blocking. An event is lost only when the
    /// consumer is already gone, which only happens during shutdown.
    pub fn push(&self, event: ActionEvent) {
        if self.tx.send(event).is_err() {
            warn!("action queue closed, event dropped");
        }
    }
}

/// Consumer handle held by the lock controller's drain loop.
pub struct ActionReceiver {
    rx: mpsc::UnboundedReceiver<ActionEvent>,
}

impl ActionReceiver {
    /// Wait for the next event. `None` means every producer has hung up.
    pub async fn recv(&mut self) -> Option<ActionEvent> {
        self.rx.recv().await
    }

    /// Non-blocking pop, used by tests and drain-on-shutdown paths.
    pub fn try_recv(&mut self) -> Option<ActionEvent> {
        self.rx.try_recv().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::TriggerSource;

    #[test]
    fn test_arrival_order_preserved() {
        let (tx, mut rx) = ActionQueue::channel();

        tx.push(ActionEvent::gesture());
        tx.push(ActionEvent::voice("first"));
        tx.push(ActionEvent::voice("second"));

        assert_eq!(rx.try_recv().unwrap().source, TriggerSource::Gesture);
        assert_eq!(rx.try_recv().unwrap().detail, "first");
        assert_eq!(rx.try_recv().unwrap().detail, "second");
        assert!(rx.try_recv().is_none());
    }

    #[test]
    fn test_per_producer_order_across_threads() {
        let (tx, mut rx) = ActionQueue::channel();

        let handles: Vec<_> = ["a", "b"]
            .into_iter()
            .map(|name| {
                let tx = tx.clone();
                std::thread::spawn(move || {
                    for i in 0..10 {
                        tx.push(ActionEvent::voice(format!("{name}-{i}")));
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        drop(tx);

        let mut last_a = None;
        let mut last_b = None;
        while let Some(event) = rx.try_recv() {
            let (name, seq) = event.detail.split_once('-').unwrap();
            let seq: u32 = seq.parse().unwrap();
            let last = if name == "a" { &mut last_a } else { &mut last_b };
            if let Some(prev) = *last {
                assert!(seq > prev, "producer {name} reordered: {seq} after {prev}");
            }
            *last = Some(seq);
        }
        assert_eq!(last_a, Some(9));
        assert_eq!(last_b, Some(9));
    }

    #[test]
    fn test_recv_sees_pushed_event() {
        let (tx, mut rx) = ActionQueue::channel();
        tx.push(ActionEvent::gesture());
        let event = tokio_test::block_on(rx.recv()).unwrap();
        assert_eq!(event.source, TriggerSource::Gesture);
    }
}
