//! User-facing feedback for the countdown and lock messages

use std::process::Command;
use std::thread;

use tracing::{info, warn};

/// Sink for short status announcements.
pub trait Feedback {
    fn announce(&self, message: &str);
}

/// Always logs; additionally speaks through a TTS helper command when one
/// is configured. The helper gets the message appended as its last
/// argument and runs detached so announcements never stall the countdown.
pub struct SpokenFeedback {
    command: Option<String>,
}

impl SpokenFeedback {
    pub fn new(command: Option<String>) -> Self {
        Self { command }
    }
}

impl Feedback for SpokenFeedback {
    fn announce(&self, message: &str) {
        info!(%message, "announce");

        let Some(command) = &self.command else {
            return;
        };
        let mut parts = command.split_whitespace();
        let Some(program) = parts.next() else {
            return;
        };

        let mut cmd = Command::new(program);
        cmd.args(parts).arg(message);
        thread::spawn(move || match cmd.status() {
            Ok(status) if !status.success() => {
                warn!(%status, "tts helper exited abnormally");
            }
            Err(e) => warn!(error = %e, "tts helper failed"),
            Ok(_) => {}
        });
    }
}
