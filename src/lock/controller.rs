//! Debounce, countdown and the single lock invocation
//!
//! The controller is driven only by the consumer task. It owns the
//! debounce state, announces the warning countdown, calls the executor
//! exactly once and reports a terminal outcome; actually exiting the
//! process is the main loop's job so this state machine stays testable.

use std::time::{Duration, Instant};

use tracing::{debug, error, info};

use crate::events::{ActionEvent, ActionReceiver};

use super::executor::LockExecutor;
use super::feedback::Feedback;

/// What the controller decided about one event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Outcome {
    /// The lock was attempted; the process should now exit.
    Locked,
    /// The event landed inside the debounce window and was dropped.
    Suppressed,
}

/// Minimum spacing between executed lock actions. The timestamp is taken
/// the moment an event is admitted, before any slow work, so the window
/// stays exclusive even while the countdown runs.
#[derive(Debug)]
struct DebounceGate {
    window: Duration,
    last: Option<Instant>,
}

impl DebounceGate {
    fn new(window: Duration) -> Self {
        Self { window, last: None }
    }

    fn admit(&mut self, now: Instant) -> bool {
        if let Some(last) = self.last {
            if now.duration_since(last) < self.window {
                return false;
            }
        }
        self.last = Some(now);
        true
    }
}

/// Consumes confirmed triggers and drives the lock action.
pub struct LockController<E, F> {
    executor: E,
    feedback: F,
    gate: DebounceGate,
    countdown_secs: u32,
}

impl<E, F> LockController<E, F>
where
    E: LockExecutor,
    F: Feedback,
{
    pub fn new(executor: E, feedback: F, debounce: Duration, countdown_secs: u32) -> Self {
        Self {
            executor,
            feedback,
            gate: DebounceGate::new(debounce),
            countdown_secs,
        }
    }

    /// Drain the queue until a trigger goes all the way to the lock.
    /// Returns when locked, or when every producer has hung up.
    pub async fn run(&mut self, mut events: ActionReceiver) {
        info!("lock controller started");

        while let Some(event) = events.recv().await {
            info!(source = %event.source, detail = %event.detail, "action event received");
            if self.handle(&event).await == Outcome::Locked {
                info!("lock action completed");
                return;
            }
        }

        info!("action queue closed, lock controller stopping");
    }

    /// Decide one event. The only discard point past the queue is the
    /// debounce check.
    pub async fn handle(&mut self, event: &ActionEvent) -> Outcome {
        if !self.gate.admit(Instant::now()) {
            debug!(source = %event.source, "trigger inside debounce window, dropped");
            return Outcome::Suppressed;
        }

        self.feedback.announce("Lock command received");

        // Warning period with no abort path; a remote stop can still kill
        // the process out from under it.
        for remaining in (1..=self.countdown_secs).rev() {
            self.feedback.announce(&format!("Locking in {remaining}"));
            tokio::time::sleep(Duration::from_secs(1)).await;
        }

        match self.executor.lock() {
            Ok(()) => info!("workstation lock requested"),
            Err(e) => error!(error = %e, "workstation lock failed"),
        }

        self.feedback.announce("System locked. Exiting.");
        Outcome::Locked
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::ActionQueue;
    use crate::lock::LockError;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Mutex};

    #[derive(Clone, Default)]
    struct CountingLock {
        calls: Arc<AtomicUsize>,
        fail: bool,
    }

    impl CountingLock {
        fn failing() -> Self {
            Self {
                fail: true,
                ..Self::default()
            }
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    impl LockExecutor for CountingLock {
        fn lock(&self) -> Result<(), LockError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                Err(LockError::CommandFailed("simulated".to_string()))
            } else {
                Ok(())
            }
        }
    }

    #[derive(Clone, Default)]
    struct RecordingFeedback(Arc<Mutex<Vec<String>>>);

    impl RecordingFeedback {
        fn messages(&self) -> Vec<String> {
            self.0.lock().unwrap().clone()
        }
    }

    impl Feedback for RecordingFeedback {
        fn announce(&self, message: &str) {
            self.0.lock().unwrap().push(message.to_string());
        }
    }

    #[test]
    fn test_gate_admits_first_and_spaced_events() {
        let mut gate = DebounceGate::new(Duration::from_secs(3));
        let start = Instant::now();
        assert!(gate.admit(start));
        assert!(!gate.admit(start + Duration::from_secs(1)));
        assert!(gate.admit(start + Duration::from_secs(4)));
    }

    #[test]
    fn test_gate_window_anchored_on_admitted_event() {
        let mut gate = DebounceGate::new(Duration::from_secs(3));
        let start = Instant::now();
        assert!(gate.admit(start));
        // Suppressed events do not extend the window.
        assert!(!gate.admit(start + Duration::from_secs(2)));
        assert!(gate.admit(start + Duration::from_secs(3)));
    }

    #[tokio::test]
    async fn test_second_event_inside_window_suppressed() {
        let executor = CountingLock::default();
        let mut controller = LockController::new(
            executor.clone(),
            RecordingFeedback::default(),
            Duration::from_secs(3),
            0,
        );

        assert_eq!(controller.handle(&ActionEvent::gesture()).await, Outcome::Locked);
        assert_eq!(
            controller.handle(&ActionEvent::voice("lock it")).await,
            Outcome::Suppressed
        );
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_executor_failure_still_terminal() {
        let executor = CountingLock::failing();
        let mut controller = LockController::new(
            executor.clone(),
            RecordingFeedback::default(),
            Duration::from_secs(3),
            0,
        );

        assert_eq!(controller.handle(&ActionEvent::gesture()).await, Outcome::Locked);
        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test(start_paused = true)]
    async fn test_countdown_announcements() {
        let feedback = RecordingFeedback::default();
        let mut controller = LockController::new(
            CountingLock::default(),
            feedback.clone(),
            Duration::from_secs(3),
            3,
        );

        controller.handle(&ActionEvent::gesture()).await;

        let messages = feedback.messages();
        assert_eq!(
            messages,
            vec![
                "Lock command received",
                "Locking in 3",
                "Locking in 2",
                "Locking in 1",
                "System locked. Exiting.",
            ]
        );
    }

    #[tokio::test]
    async fn test_run_stops_after_first_lock() {
        let (tx, rx) = ActionQueue::channel();
        let executor = CountingLock::default();
        let mut controller = LockController::new(
            executor.clone(),
            RecordingFeedback::default(),
            Duration::from_secs(3),
            0,
        );

        // Two triggers from different producers arriving back to back: the
        // first locks, the second never gets consumed.
        tx.push(ActionEvent::gesture());
        tx.push(ActionEvent::voice("lock my laptop"));
        controller.run(rx).await;

        assert_eq!(executor.calls(), 1);
    }

    #[tokio::test]
    async fn test_run_returns_when_producers_gone() {
        let (tx, rx) = ActionQueue::channel();
        let executor = CountingLock::default();
        let mut controller = LockController::new(
            executor.clone(),
            RecordingFeedback::default(),
            Duration::from_secs(3),
            0,
        );

        drop(tx);
        controller.run(rx).await;
        assert_eq!(executor.calls(), 0);
    }
}
