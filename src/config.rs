//! Configuration loading and management
//!
//! Every tunable has a built-in default and a `GESTLOCK_*` environment
//! override. Invalid override values are ignored in favor of the default.

use std::time::Duration;

use tracing::warn;

/// Daemon configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// Trailing frame count used for gesture majority voting
    pub window_frames: usize,

    /// How long the gesture must stay stable before it counts
    pub hold_time: Duration,

    /// Minimum spacing between two executed lock actions
    pub debounce: Duration,

    /// Warning countdown before locking, in seconds (0 skips it)
    pub countdown_secs: u32,

    /// Upper bound for one voice capture cycle
    pub listen_timeout: Duration,

    /// Phrases that trigger a lock when contained in a transcript
    pub trigger_phrases: Vec<String>,

    /// Local port bound in listen mode to enforce a single instance
    pub singleton_port: u16,

    /// Local port accepting remote control commands
    pub control_port: u16,

    /// Command spawning the gesture classifier (one verdict per line)
    pub classifier_cmd: String,

    /// Command invoked per capture cycle to transcribe an utterance
    pub recognizer_cmd: String,

    /// Optional command used to speak feedback messages
    pub tts_cmd: Option<String>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            window_frames: 10,
            hold_time: Duration::from_secs_f64(0.9),
            debounce: Duration::from_secs(3),
            countdown_secs: 3,
            listen_timeout: Duration::from_secs(5),
            trigger_phrases: [
                "lock laptop",
                "lock my laptop",
                "lock computer",
                "secure",
                "lock it",
            ]
            .into_iter()
            .map(str::to_string)
            .collect(),
            singleton_port: 54321,
            control_port: 54322,
            classifier_cmd: "gestlock-classifier".to_string(),
            recognizer_cmd: "gestlock-transcribe".to_string(),
            tts_cmd: None,
        }
    }
}

impl Config {
    /// Load configuration from defaults and environment overrides
    pub fn load() -> Self {
        let defaults = Self::default();

        Self {
            window_frames: env_parse("GESTLOCK_WINDOW_FRAMES")
                .filter(|frames| *frames > 0)
                .unwrap_or(defaults.window_frames),
            hold_time: env_duration("GESTLOCK_HOLD_SECS").unwrap_or(defaults.hold_time),
            debounce: env_duration("GESTLOCK_DEBOUNCE_SECS").unwrap_or(defaults.debounce),
            countdown_secs: env_parse("GESTLOCK_COUNTDOWN_SECS").unwrap_or(defaults.countdown_secs),
            listen_timeout: env_duration("GESTLOCK_LISTEN_TIMEOUT_SECS")
                .unwrap_or(defaults.listen_timeout),
            trigger_phrases: std::env::var("GESTLOCK_PHRASES")
                .ok()
                .map(|raw| parse_phrases(&raw))
                .filter(|phrases| !phrases.is_empty())
                .unwrap_or(defaults.trigger_phrases),
            singleton_port: env_parse("GESTLOCK_SINGLETON_PORT").unwrap_or(defaults.singleton_port),
            control_port: env_parse("GESTLOCK_CONTROL_PORT").unwrap_or(defaults.control_port),
            classifier_cmd: env_string("GESTLOCK_CLASSIFIER_CMD")
                .unwrap_or(defaults.classifier_cmd),
            recognizer_cmd: env_string("GESTLOCK_RECOGNIZER_CMD")
                .unwrap_or(defaults.recognizer_cmd),
            tts_cmd: env_string("GESTLOCK_TTS_CMD"),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str) -> Option<T> {
    let raw = std::env::var(key).ok()?;
    match raw.trim().parse() {
        Ok(value) => Some(value),
        Err(_) => {
            warn!(key, raw = %raw, "ignoring unparseable override");
            None
        }
    }
}

fn env_duration(key: &str) -> Option<Duration> {
    env_parse::<f64>(key)
        .filter(|secs| secs.is_finite() && *secs > 0.0)
        .map(Duration::from_secs_f64)
}

fn env_string(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

/// Comma-separated phrase list, normalized to lowercase
fn parse_phrases(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(|phrase| phrase.trim().to_lowercase())
        .filter(|phrase| !phrase.is_empty())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = Config::default();
        assert_eq!(config.window_frames, 10);
        assert_eq!(config.hold_time, Duration::from_secs_f64(0.9));
        assert_eq!(config.debounce, Duration::from_secs(3));
        assert_eq!(config.countdown_secs, 3);
        assert_eq!(config.listen_timeout, Duration::from_secs(5));
        assert!(config
            .trigger_phrases
            .contains(&"lock my laptop".to_string()));
        assert_ne!(config.singleton_port, config.control_port);
    }

    #[test]
    fn test_parse_phrases() {
        let phrases = parse_phrases("Lock It, secure , ,LOCK COMPUTER");
        assert_eq!(phrases, vec!["lock it", "secure", "lock computer"]);
    }

    #[test]
    fn test_parse_phrases_empty_input() {
        assert!(parse_phrases(" , ,").is_empty());
    }
}
