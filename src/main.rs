//! gestlock-daemon: gesture and voice triggered workstation lock
//!
//! Two independent, noisy trigger sources feed one debounced, at-most-once
//! lock action:
//! - per-frame gesture verdicts from an external classifier, smoothed over
//!   a trailing window and hold-confirmed before they count
//! - transcripts from an external speech recognizer, matched against a
//!   trigger-phrase set
//!
//! Confirmed triggers from both producers merge into a single queue
//! drained by the lock controller, which owns the debounce window, the
//! warning countdown and the one lock-executor call. A bound local port
//! enforces a single instance system-wide; a second port accepts a remote
//! "stop" command.

mod config;
mod events;
mod gesture;
mod ipc;
mod lifecycle;
mod lock;
mod voice;

use anyhow::Result;
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::events::ActionQueue;
use crate::gesture::{ClassifierProcess, GestureListener, GestureStabilizer};
use crate::ipc::{ControlChannel, SingletonError, SingletonGuard};
use crate::lifecycle::ShutdownSignal;
use crate::lock::{LockController, SpokenFeedback, SystemLock};
use crate::voice::{CommandRecognizer, PhraseSet, VoiceListener};

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!(
        version = env!("CARGO_PKG_VERSION"),
        "gestlock-daemon starting"
    );

    let config = Config::load();
    info!(?config, "configuration loaded");

    // First claimer wins; a refused claim means another instance is active
    // and this one exits voluntarily.
    let _instance = match SingletonGuard::claim(config.singleton_port) {
        Ok(guard) => guard,
        Err(SingletonError::AlreadyRunning) => {
            println!("gestlock-daemon is already running, exiting");
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    let (action_tx, action_rx) = ActionQueue::channel();

    // Voice is best-effort: a failed start degrades to gesture-only.
    let voice = VoiceListener::new(
        action_tx.clone(),
        PhraseSet::new(&config.trigger_phrases),
        config.listen_timeout,
    );
    match voice.start(CommandRecognizer::new(&config.recognizer_cmd)) {
        Ok(()) => info!("voice listener started"),
        Err(e) => warn!(error = %e, "voice listener unavailable, continuing gesture-only"),
    }

    // The gesture side is mandatory: without frames the daemon is useless.
    let classifier = match ClassifierProcess::spawn(&config.classifier_cmd) {
        Ok(classifier) => classifier,
        Err(e) => {
            error!(error = %e, "cannot start gesture classifier");
            return Err(e.into());
        }
    };
    let stabilizer = GestureStabilizer::new(config.window_frames, config.hold_time);
    let gesture = GestureListener::new(action_tx);
    let mut frames_done = gesture.start(classifier, stabilizer)?;

    let control = ControlChannel::bind(config.control_port).await;
    let shutdown = ShutdownSignal::new();

    let mut controller = LockController::new(
        SystemLock,
        SpokenFeedback::new(config.tts_cmd.clone()),
        config.debounce,
        config.countdown_secs,
    );

    info!("daemon initialized, entering main loop");

    tokio::select! {
        _ = controller.run(action_rx) => {
            info!("lock controller finished");
        }

        _ = control.run() => {
            info!("remote stop acknowledged");
        }

        _ = &mut frames_done => {
            info!("frame source ended");
        }

        _ = shutdown.wait() => {
            info!("shutdown signal received");
        }
    }

    gesture.stop();
    voice.stop();
    info!("gestlock-daemon stopped");

    Ok(())
}
