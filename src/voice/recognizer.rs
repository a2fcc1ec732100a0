//! Utterance-capture boundary to the external speech recognizer
//!
//! One `listen` call is one bounded capture cycle. The recognizer's
//! acoustic internals live in a helper process; the daemon only sees the
//! transcript or the reason there is none.

use std::io::ErrorKind;
use std::process::Command;
use std::time::Duration;

/// Outcome of one capture cycle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Utterance {
    /// Best-effort transcript of what was heard
    Transcript(String),
    /// Capture window elapsed without intelligible speech; not an error
    NoSpeech,
}

/// Errors surfaced by a capture cycle
#[derive(Debug, thiserror::Error)]
pub enum RecognizerError {
    /// Capture cannot work at all: helper missing, no audio device.
    /// Ends the voice producer for this run.
    #[error("recognizer unavailable: {0}")]
    Unavailable(String),

    /// Transient recognition-service failure, retried next cycle
    #[error("speech service error: {0}")]
    Service(String),
}

/// Bounded-duration utterance capture.
pub trait Recognizer {
    /// Capture one utterance, blocking at most roughly `timeout`.
    fn listen(&mut self, timeout: Duration) -> Result<Utterance, RecognizerError>;
}

/// Shells out to a transcriber helper. The helper is invoked once per
/// cycle with the capture timeout in seconds appended as its last argument
/// and prints the transcript, if any, on stdout.
pub struct CommandRecognizer {
    command: String,
}

impl CommandRecognizer {
    pub fn new(command: impl Into<String>) -> Self {
        Self {
            command: command.into(),
        }
    }
}

impl Recognizer for CommandRecognizer {
    fn listen(&mut self, timeout: Duration) -> Result<Utterance, RecognizerError> {
        let mut parts = self.command.split_whitespace();
        let program = parts
            .next()
            .ok_or_else(|| RecognizerError::Unavailable("empty recognizer command".to_string()))?;

        let output = Command::new(program)
            .args(parts)
            .arg(timeout.as_secs().to_string())
            .output()
            .map_err(|e| match e.kind() {
                ErrorKind::NotFound | ErrorKind::PermissionDenied => {
                    RecognizerError::Unavailable(format!("{program}: {e}"))
                }
                _ => RecognizerError::Service(e.to_string()),
            })?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(RecognizerError::Service(format!(
                "helper exited with {}: {}",
                output.status,
                stderr.trim()
            )));
        }

        let transcript = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if transcript.is_empty() {
            Ok(Utterance::NoSpeech)
        } else {
            Ok(Utterance::Transcript(transcript))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const TIMEOUT: Duration = Duration::from_secs(5);

    #[test]
    fn test_missing_helper_is_unavailable() {
        let mut recognizer = CommandRecognizer::new("definitely-not-a-real-transcriber");
        assert!(matches!(
            recognizer.listen(TIMEOUT),
            Err(RecognizerError::Unavailable(_))
        ));
    }

    #[test]
    fn test_empty_command_is_unavailable() {
        let mut recognizer = CommandRecognizer::new("   ");
        assert!(matches!(
            recognizer.listen(TIMEOUT),
            Err(RecognizerError::Unavailable(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_silent_cycle_is_no_speech() {
        let mut recognizer = CommandRecognizer::new("true");
        assert_eq!(recognizer.listen(TIMEOUT).unwrap(), Utterance::NoSpeech);
    }

    #[cfg(unix)]
    #[test]
    fn test_helper_failure_is_service_error() {
        let mut recognizer = CommandRecognizer::new("false");
        assert!(matches!(
            recognizer.listen(TIMEOUT),
            Err(RecognizerError::Service(_))
        ));
    }

    #[cfg(unix)]
    #[test]
    fn test_stdout_becomes_transcript() {
        // The timeout is appended as the helper's last argument.
        let mut recognizer = CommandRecognizer::new("echo lock my laptop");
        match recognizer.listen(TIMEOUT).unwrap() {
            Utterance::Transcript(text) => assert_eq!(text, "lock my laptop 5"),
            other => panic!("expected transcript, got {other:?}"),
        }
    }
}
