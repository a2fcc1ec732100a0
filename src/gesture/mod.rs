//! Gesture trigger pipeline
//!
//! Raw per-frame verdicts from the external classifier go through temporal
//! smoothing and hold confirmation before they become action events.

mod listener;
mod source;
mod stabilizer;
mod window;

pub use listener::{GestureError, GestureListener};
pub use source::{ClassifierProcess, FrameSource};
pub use stabilizer::GestureStabilizer;
pub use window::StabilityWindow;
