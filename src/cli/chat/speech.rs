use std::fs;
use std::path::PathBuf;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum SpeechError {
    /// Transport failure reported by the backend.
    #[error("network error: {0}")]
    Network(#[source] Box<dyn std::error::Error + Send + Sync>),
    #[error("speech service returned HTTP {0}")]
    Status(u16),
    #[error("speech service returned no audio")]
    EmptyAudio,
    #[error("audio file error: {0}")]
    Io(#[from] std::io::Error),
}

/// Anything that can turn English text into an encoded audio clip.
#[async_trait]
pub trait SpeechSynthesizer: Send + Sync {
    async fn synthesize(&self, text: &str) -> Result<Vec<u8>, SpeechError>;
}

/// The most recent clip, as written to and read back from disk.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AudioClip {
    pub path: PathBuf,
    pub bytes: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SpeechOutcome {
    /// Nothing to say.
    Silent,
    Spoken(AudioClip),
    /// Synthesis failed; the turn continues as text only.
    Degraded(String),
}

/// Best-effort voice output for assistant replies.
///
/// Every clip goes to the same file, so two sessions in one process would
/// overwrite each other's audio.
pub struct SpeechEmitter {
    synthesizer: Box<dyn SpeechSynthesizer>,
    audio_path: PathBuf,
}

impl SpeechEmitter {
    pub fn new(synthesizer: Box<dyn SpeechSynthesizer>, audio_path: PathBuf) -> Self {
        Self {
            synthesizer,
            audio_path,
        }
    }

    /// Speak `text`. Never fails: errors come back as [`SpeechOutcome::Degraded`].
    pub async fn emit(&self, text: &str) -> SpeechOutcome {
        if text.trim().is_empty() {
            return SpeechOutcome::Silent;
        }

        match self.synthesize_to_file(text).await {
            Ok(clip) => {
                debug!("Wrote {} bytes of speech to {}", clip.bytes.len(), clip.path.display());
                SpeechOutcome::Spoken(clip)
            }
            Err(e) => {
                warn!("Speech synthesis failed: {}", e);
                SpeechOutcome::Degraded(format!(
                    "Audio interface offline (Text-only mode active): {}",
                    e
                ))
            }
        }
    }

    async fn synthesize_to_file(&self, text: &str) -> Result<AudioClip, SpeechError> {
        let audio = self.synthesizer.synthesize(text).await?;
        if audio.is_empty() {
            return Err(SpeechError::EmptyAudio);
        }

        if let Some(parent) = self.audio_path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(&self.audio_path, &audio)?;
        let bytes = fs::read(&self.audio_path)?;

        Ok(AudioClip {
            path: self.audio_path.clone(),
            bytes,
        })
    }
}

#[cfg(test)]
pub use fakes::{FailingSynthesizer, FixedSynthesizer};


#[cfg(test)]
mod tests {
    use std::sync::atomic::Ordering;

    use super::*;

    #[tokio::test]
    async fn blank_text_is_not_synthesized() {
        let dir = tempfile::tempdir().unwrap();
        let synth = FixedSynthesizer::new(b"ID3");
        let calls = synth.calls.clone();
        let emitter = SpeechEmitter::new(Box::new(synth), dir.path().join("voice.mp3"));

        assert_eq!(emitter.emit("   \n").await, SpeechOutcome::Silent);
        assert_eq!(calls.load(Ordering::SeqCst), 0);
        assert!(!dir.path().join("voice.mp3").exists());
    }

    #[tokio::test]
    async fn clip_is_written_and_read_back() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("voice.mp3");
        let emitter = SpeechEmitter::new(Box::new(FixedSynthesizer::new(b"ID3audio")), path.clone());

        let outcome = emitter.emit("All systems nominal.").await;

        assert_eq!(
            outcome,
            SpeechOutcome::Spoken(AudioClip {
                path: path.clone(),
                bytes: b"ID3audio".to_vec(),
            })
        );
        assert_eq!(std::fs::read(&path).unwrap(), b"ID3audio");
    }

    #[tokio::test]
    async fn each_clip_overwrites_the_last() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("voice.mp3");

        SpeechEmitter::new(Box::new(FixedSynthesizer::new(b"first clip")), path.clone())
            .emit("one")
            .await;
        SpeechEmitter::new(Box::new(FixedSynthesizer::new(b"2nd")), path.clone())
            .emit("two")
            .await;

        assert_eq!(std::fs::read(&path).unwrap(), b"2nd");
    }

    #[tokio::test]
    async fn synthesis_failure_degrades_to_warning() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = SpeechEmitter::new(Box::new(FailingSynthesizer), dir.path().join("voice.mp3"));

        match emitter.emit("hello").await {
            SpeechOutcome::Degraded(warning) => {
                assert!(warning.starts_with("Audio interface offline (Text-only mode active):"));
                assert!(warning.contains("503"));
            }
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn empty_audio_degrades() {
        let dir = tempfile::tempdir().unwrap();
        let emitter = SpeechEmitter::new(Box::new(FixedSynthesizer::new(b"")), dir.path().join("voice.mp3"));

        assert!(matches!(emitter.emit("hello").await, SpeechOutcome::Degraded(_)));
    }

    #[test]
    fn network_error_keeps_its_source() {
        let cause = std::io::Error::new(std::io::ErrorKind::ConnectionRefused, "refused");
        let err = SpeechError::Network(Box::new(cause));

        assert_eq!(err.to_string(), "network error: refused");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[tokio::test]
    async fn unwritable_path_degrades() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the clip file should be makes the write fail.
        let path = dir.path().join("voice.mp3");
        std::fs::create_dir(&path).unwrap();
        let emitter = SpeechEmitter::new(Box::new(FixedSynthesizer::new(b"ID3")), path);

        match emitter.emit("hello").await {
            SpeechOutcome::Degraded(warning) => assert!(warning.contains("audio file error")),
            other => panic!("expected degraded outcome, got {:?}", other),
        }
    }
}
