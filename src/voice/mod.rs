//! Voice trigger pipeline
//!
//! A dedicated thread captures bounded utterances through the external
//! recognizer and turns phrase-matched transcripts into action events.
//! Voice is a best-effort producer: if capture is unavailable the rest of
//! the daemon keeps running gesture-only.

mod listener;
mod phrases;
mod recognizer;

pub use listener::{VoiceError, VoiceListener};
pub use phrases::PhraseSet;
pub use recognizer::{CommandRecognizer, Recognizer, RecognizerError, Utterance};
