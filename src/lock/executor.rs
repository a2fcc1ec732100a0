//! Platform shim that actually locks the session
//!
//! One fire-and-forget call per run. The controller logs the outcome and
//! terminates either way, so nothing here retries.

use std::process::Command;

/// Errors from the lock attempt
#[derive(Debug, thiserror::Error)]
pub enum LockError {
    #[error("lock command failed: {0}")]
    CommandFailed(String),

    #[error("failed to invoke lock command: {0}")]
    Io(#[from] std::io::Error),
}

/// Single attempt to lock the current session.
pub trait LockExecutor {
    fn lock(&self) -> Result<(), LockError>;
}

/// Locks through the platform's own command.
pub struct SystemLock;

impl LockExecutor for SystemLock {
    fn lock(&self) -> Result<(), LockError> {
        platform_lock()
    }
}

#[cfg(target_os = "windows")]
fn platform_lock() -> Result<(), LockError> {
    run_checked("rundll32.exe", &["user32.dll,LockWorkStation"])
}

#[cfg(target_os = "macos")]
fn platform_lock() -> Result<(), LockError> {
    run_checked(
        "/usr/bin/osascript",
        &[
            "-e",
            "tell application \"System Events\" to keystroke \"q\" using {control down, command down}",
        ],
    )
}

#[cfg(all(unix, not(target_os = "macos")))]
fn platform_lock() -> Result<(), LockError> {
    // Session managers vary; try the common ones in order.
    let candidates: [(&str, &[&str]); 3] = [
        ("loginctl", &["lock-session"]),
        ("gnome-screensaver-command", &["-l"]),
        ("xdg-screensaver", &["lock"]),
    ];

    let mut last = None;
    for (program, args) in candidates {
        match run_checked(program, args) {
            Ok(()) => return Ok(()),
            Err(e) => last = Some(e),
        }
    }
    Err(last.unwrap_or_else(|| LockError::CommandFailed("no lock command available".to_string())))
}

#[cfg(not(any(unix, target_os = "windows")))]
fn platform_lock() -> Result<(), LockError> {
    Err(LockError::CommandFailed(
        "no lock mechanism for this platform".to_string(),
    ))
}

#[cfg(any(unix, target_os = "windows"))]
fn run_checked(program: &str, args: &[&str]) -> Result<(), LockError> {
    let status = Command::new(program).args(args).status()?;
    if status.success() {
        Ok(())
    } else {
        Err(LockError::CommandFailed(format!("{program} exited with {status}")))
    }
}
