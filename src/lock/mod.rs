//! Lock decision path
//!
//! The single consumer of the action queue. Events pass the debounce gate
//! and the optional countdown before the one lock-executor invocation; the
//! main loop, not this module, ends the process.

mod controller;
mod executor;
mod feedback;

pub use controller::{LockController, Outcome};
pub use executor::{LockError, LockExecutor, SystemLock};
pub use feedback::{Feedback, SpokenFeedback};
