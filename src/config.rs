use std::env;
use std::path::PathBuf;
use std::time::Duration;

use eyre::{Result, eyre};

pub const DEFAULT_TTS_ENDPOINT: &str = "https://translate.google.com/translate_tts";
pub const DEFAULT_TTS_TIMEOUT_SECS: u64 = 10;
const AUDIO_FILE_NAME: &str = "temp_voice.mp3";

/// Runtime settings, resolved once at startup from flags and environment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Settings {
    pub speech_enabled: bool,
    pub tts_endpoint: String,
    pub tts_timeout: Duration,
    /// Shared file every synthesized clip is written to.
    pub audio_path: PathBuf,
    pub player: Option<String>,
    /// Line-editor history; `None` when no data directory exists.
    pub history_path: Option<PathBuf>,
}

impl Settings {
    /// Build settings from command-line values plus `PAPI_*` environment
    /// variables. Call after `.env` has been loaded.
    pub fn load(no_speech: bool, player: Option<String>) -> Result<Self> {
        Self::from_lookup(no_speech, player, |key| env::var(key).ok())
    }

    fn from_lookup<F>(no_speech: bool, player: Option<String>, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let tts_endpoint = lookup("PAPI_TTS_ENDPOINT")
            .filter(|v| !v.trim().is_empty())
            .unwrap_or_else(|| DEFAULT_TTS_ENDPOINT.to_string());

        let tts_timeout = match lookup("PAPI_TTS_TIMEOUT_SECS") {
            Some(raw) => {
                let secs: u64 = raw.trim().parse().map_err(|_| {
                    eyre!("PAPI_TTS_TIMEOUT_SECS must be a whole number of seconds, got '{}'", raw)
                })?;
                Duration::from_secs(secs)
            }
            None => Duration::from_secs(DEFAULT_TTS_TIMEOUT_SECS),
        };

        let audio_path = lookup("PAPI_AUDIO_PATH")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| env::temp_dir().join(AUDIO_FILE_NAME));

        let player = player
            .or_else(|| lookup("PAPI_AUDIO_PLAYER"))
            .filter(|v| !v.trim().is_empty());

        let history_path = dirs::data_dir().map(|p| p.join("papi").join("history.txt"));

        Ok(Self {
            speech_enabled: !no_speech,
            tts_endpoint,
            tts_timeout,
            audio_path,
            player,
            history_path,
        })
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_without_environment() {
        let settings = Settings::from_lookup(false, None, lookup(&[])).unwrap();

        assert!(settings.speech_enabled);
        assert_eq!(settings.tts_endpoint, DEFAULT_TTS_ENDPOINT);
        assert_eq!(settings.tts_timeout, Duration::from_secs(10));
        assert_eq!(settings.audio_path, env::temp_dir().join("temp_voice.mp3"));
        assert_eq!(settings.player, None);
    }

    #[test]
    fn environment_overrides_defaults() {
        let settings = Settings::from_lookup(
            true,
            None,
            lookup(&[
                ("PAPI_TTS_ENDPOINT", "http://localhost:9000/tts"),
                ("PAPI_TTS_TIMEOUT_SECS", " 3 "),
                ("PAPI_AUDIO_PATH", "/tmp/papi/voice.mp3"),
                ("PAPI_AUDIO_PLAYER", "afplay"),
            ]),
        )
        .unwrap();

        assert!(!settings.speech_enabled);
        assert_eq!(settings.tts_endpoint, "http://localhost:9000/tts");
        assert_eq!(settings.tts_timeout, Duration::from_secs(3));
        assert_eq!(settings.audio_path, PathBuf::from("/tmp/papi/voice.mp3"));
        assert_eq!(settings.player.as_deref(), Some("afplay"));
    }

    #[test]
    fn flag_player_wins_over_environment() {
        let settings = Settings::from_lookup(
            false,
            Some("mpv --no-video".to_string()),
            lookup(&[("PAPI_AUDIO_PLAYER", "afplay")]),
        )
        .unwrap();

        assert_eq!(settings.player.as_deref(), Some("mpv --no-video"));
    }

    #[test]
    fn bad_timeout_is_rejected() {
        let err = Settings::from_lookup(false, None, lookup(&[("PAPI_TTS_TIMEOUT_SECS", "soon")]))
            .unwrap_err();
        assert!(err.to_string().contains("PAPI_TTS_TIMEOUT_SECS"));
    }
}
