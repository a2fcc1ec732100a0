//! Dedicated capture thread turning recognized speech into action events

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use tracing::{debug, error, info, warn};

use crate::events::{ActionEvent, ActionSender};

use super::phrases::PhraseSet;
use super::recognizer::{Recognizer, RecognizerError, Utterance};

/// Errors that can occur starting the voice listener
#[derive(Debug, thiserror::Error)]
pub enum VoiceError {
    #[error("voice listener is already running")]
    AlreadyRunning,

    #[error("no trigger phrases configured")]
    NoPhrases,

    #[error("failed to spawn listener thread: {0}")]
    ThreadSpawn(String),
}

/// Owns the voice producer thread.
pub struct VoiceListener {
    events: ActionSender,
    phrases: PhraseSet,
    listen_timeout: Duration,
    running: Arc<AtomicBool>,
}

impl VoiceListener {
    pub fn new(events: ActionSender, phrases: PhraseSet, listen_timeout: Duration) -> Self {
        Self {
            events,
            phrases,
            listen_timeout,
            running: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Start the capture loop on a dedicated thread for the process
    /// lifetime. A capture capability failure later ends only this
    /// producer; the daemon keeps running gesture-only.
    pub fn start<R>(&self, recognizer: R) -> Result<(), VoiceError>
    where
        R: Recognizer + Send + 'static,
    {
        if self.phrases.is_empty() {
            return Err(VoiceError::NoPhrases);
        }
        if self.running.swap(true, Ordering::SeqCst) {
            return Err(VoiceError::AlreadyRunning);
        }

        let events = self.events.clone();
        let phrases = self.phrases.clone();
        let timeout = self.listen_timeout;
        let running = Arc::clone(&self.running);

        thread::Builder::new()
            .name("voice-listener".to_string())
            .spawn(move || {
                info!("voice listener thread started");
                run_capture_loop(recognizer, &phrases, timeout, &events, &running);
                running.store(false, Ordering::SeqCst);
                info!("voice listener thread stopped");
            })
            .map_err(|e| VoiceError::ThreadSpawn(e.to_string()))?;

        Ok(())
    }

    /// Ask the capture loop to exit after the current cycle.
    pub fn stop(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }
}

fn run_capture_loop<R: Recognizer>(
    mut recognizer: R,
    phrases: &PhraseSet,
    timeout: Duration,
    events: &ActionSender,
    running: &AtomicBool,
) {
    while running.load(Ordering::SeqCst) {
        match recognizer.listen(timeout) {
            Ok(Utterance::Transcript(text)) => {
                let text = text.to_lowercase();
                debug!(transcript = %text, "utterance transcribed");
                if let Some(phrase) = phrases.matches(&text) {
                    info!(%phrase, "voice trigger matched");
                    events.push(ActionEvent::voice(text.as_str()));
                }
            }
            // A quiet capture window is the normal case, not an error.
            Ok(Utterance::NoSpeech) => {}
            Err(RecognizerError::Service(e)) => {
                warn!(error = %e, "recognition failed, retrying next cycle");
            }
            Err(RecognizerError::Unavailable(e)) => {
                error!(error = %e, "audio capture unavailable, voice trigger disabled");
                break;
            }
        }
    }
}
