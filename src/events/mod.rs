//! Confirmed trigger events exchanged between the producers and the
//! lock controller.
//!
//! Both the gesture pipeline and the voice listener reduce their noisy
//! inputs to `ActionEvent`s; everything downstream of the queue only ever
//! sees these.

use std::time::SystemTime;

use serde::{Deserialize, Serialize};

mod queue;

pub use queue::{ActionQueue, ActionReceiver, ActionSender};

/// Which producer confirmed the trigger
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TriggerSource {
    /// Hold-confirmed gesture from the frame pipeline
    Gesture,
    /// Phrase-matched transcript from the voice listener
    Voice,
}

impl std::fmt::Display for TriggerSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TriggerSource::Gesture => write!(f, "gesture"),
            TriggerSource::Voice => write!(f, "voice"),
        }
    }
}

/// A confirmed trigger, created by one producer and consumed exactly once
/// by the lock controller.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionEvent {
    /// Producer that confirmed the trigger
    pub source: TriggerSource,
    /// Diagnostic payload: the full transcript for voice triggers, the
    /// confirmed pose for gesture triggers
    pub detail: String,
    /// Wall-clock time the producer emitted the event
    pub emitted_at: SystemTime,
}

impl ActionEvent {
    /// A confirmed gesture hold.
    pub fn gesture() -> Self {
        Self {
            source: TriggerSource::Gesture,
            detail: "hold confirmed".to_string(),
            emitted_at: SystemTime::now(),
        }
    }

    /// A matched voice trigger carrying the full transcript.
    pub fn voice(transcript: impl Into<String>) -> Self {
        Self {
            source: TriggerSource::Voice,
            detail: transcript.into(),
            emitted_at: SystemTime::now(),
        }
    }
}
