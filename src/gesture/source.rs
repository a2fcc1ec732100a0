//! Frame-signal boundary to the external gesture classifier
//!
//! The classifier is a separate process that watches the camera and prints
//! one verdict per frame on stdout. The daemon never sees frames, only the
//! boolean stream.

use std::io::{BufRead, BufReader, Lines};
use std::process::{Child, ChildStdout, Command, Stdio};

use tracing::{info, warn};

use super::listener::GestureError;

/// Blocking source of per-frame gesture verdicts.
pub trait FrameSource {
    /// Next verdict, or `None` once the frame stream has ended.
    fn next_frame(&mut self) -> Option<bool>;
}

/// Reads verdicts line-by-line from a spawned classifier process.
pub struct ClassifierProcess {
    child: Child,
    lines: Lines<BufReader<ChildStdout>>,
}

impl ClassifierProcess {
    /// Spawn the classifier command. Failure here means the camera side of
    /// the system cannot run at all.
    pub fn spawn(command: &str) -> Result<Self, GestureError> {
        let mut parts = command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| GestureError::ClassifierSpawn("empty classifier command".to_string()))?;

        let mut child = Command::new(program)
            .args(parts)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .spawn()
            .map_err(|e| GestureError::ClassifierSpawn(format!("{command}: {e}")))?;

        let stdout = child
            .stdout
            .take()
            .ok_or_else(|| GestureError::ClassifierSpawn("classifier stdout unavailable".to_string()))?;

        info!(%command, "gesture classifier started");

        Ok(Self {
            child,
            lines: BufReader::new(stdout).lines(),
        })
    }
}

impl FrameSource for ClassifierProcess {
    fn next_frame(&mut self) -> Option<bool> {
        match self.lines.next() {
            Some(Ok(line)) => Some(parse_signal(&line)),
            Some(Err(e)) => {
                warn!(error = %e, "classifier read error, treating stream as ended");
                None
            }
            None => None,
        }
    }
}

impl Drop for ClassifierProcess {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

/// Anything that is not a positive verdict counts as "no gesture".
fn parse_signal(line: &str) -> bool {
    matches!(line.trim(), "1" | "true")
}
