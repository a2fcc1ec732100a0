//! Dedicated producer thread driving the gesture pipeline
//!
//! Reads blocking frame verdicts, runs them through the stabilizer, and
//! pushes confirmed events into the action queue. Completion of the frame
//! stream is reported over a oneshot so the main loop can wind down.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Instant;

use tokio::sync::oneshot;
use tracing::{info, warn};

use crate::events::ActionSender;

use super::source::FrameSource;
use super::stabilizer::GestureStabilizer;

/// Errors that can occur starting the gesture pipeline
#[derive(Debug, thiserror::Error)]
pub enum GestureError {
    #[error("gesture listener is already running")]
    AlreadyRunning,

    #[error("failed to start gesture classifier: {0}")]
    ClassifierSpawn(String),

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

/// Owns the gesture producer thread.
pub struct GestureListener {
    events: ActionSender,
    running: Arc<AtomicBool>,
}

impl GestureListener {
    pub fn new(events: ActionSender) -> Self {
        Self {
            events,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the frame loop on a dedicated thread. The returned receiver
    /// resolves when the frame source ends, which is the signal for the
    /// whole daemon to stop.
    pub fn start<S>(
        &self,
        source: S,
        stabilizer: GestureStabilizer,
    ) -> Result<oneshot::Receiver<()>, GestureError>
    where
        S: FrameSource + Send + 'static,
    {
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(GestureError::AlreadyRunning);
        }

        let (done_tx, done_rx) = oneshot::channel();
        let events = self.events.clone();
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("gesture-listener".to_string())
            .spawn(move || {
                info!("gesture listener thread started");
                run_frame_loop(source, stabilizer, &events, &running);
                running.store(false, Ordering::SeqCst);
                info!("gesture listener thread stopped");
                let _ = done_tx.send(());
            })
            .map_err(|e| GestureError::ThreadSpawn(e.to_string()))?;

        Ok(done_rx)
    }

    /// Ask the frame loop to exit after the current frame.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn run_frame_loop<S: FrameSource>(
    mut source: S,
    mut stabilizer: GestureStabilizer,
    events: &ActionSender,
    running: &AtomicBool,
) {
    while running.load(Ordering::SeqCst) {
        let Some(signal) = source.next_frame() else {
            warn!("frame source exhausted");
            break;
        };
        if let Some(event) = stabilizer.observe(signal, Instant::now()) {
            info!("gesture trigger confirmed");
            events.push(event);
        }
    }
}
