//! Process-wide coordination over well-known local ports
//!
//! One port bound in listen mode acts as the single-instance mutex; a
//! second port accepts plaintext control commands from outside.

mod control;
mod singleton;

pub use control::ControlChannel;
pub use singleton::{SingletonError, SingletonGuard};
