//! ---
//! aura_section: "05-external-interfaces"
//! aura_subsection: "module"
//! aura_type: "source"
//! aura_scope: "code"
//! aura_description: "Generative chat and speech synthesis adapters."
//! aura_version: "v0.0.0-prealpha"
//! aura_owner: "tbd"
//! ---
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};

use async_trait::async_trait;
use bytes::Bytes;
use tracing::debug;

use crate::errors::Result;

/// A synthesized utterance ready for playback.
#[derive(Debug, Clone)]
pub struct SpeechClip {
    pub text: String,
    pub wav: Bytes,
}

/// Destination for synthesized speech.
#[async_trait]
pub trait SpeechSink: Send + Sync + 'static {
    async fn play(&self, clip: SpeechClip) -> Result<()>;
}

/// Discards every clip.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

#[async_trait]
impl SpeechSink for NullSink {
    async fn play(&self, _clip: SpeechClip) -> Result<()> {
        Ok(())
    }
}

/// Writes each clip as a numbered WAV file so it can be played by any player.
#[derive(Debug)]
pub struct WavDirectorySink {
    directory: PathBuf,
    sequence: AtomicU64,
}

impl WavDirectorySink {
    pub async fn create(directory: impl Into<PathBuf>) -> Result<Self> {
        let directory = directory.into();
        tokio::fs::create_dir_all(&directory).await?;
        Ok(Self {
            directory,
            sequence: AtomicU64::new(0),
        })
    }

    pub fn directory(&self) -> &Path {
        &self.directory
    }
}

#[async_trait]
impl SpeechSink for WavDirectorySink {
    async fn play(&self, clip: SpeechClip) -> Result<()> {
        let seq = self.sequence.fetch_add(1, Ordering::Relaxed) + 1;
        let path = self.directory.join(format!("aura-{seq:04}.wav"));
        tokio::fs::write(&path, &clip.wav).await?;
        debug!(path = %path.display(), bytes = clip.wav.len(), "speech clip written");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn clips_are_numbered_in_order() {
        let dir = tempfile::tempdir().unwrap();
        let sink = WavDirectorySink::create(dir.path().join("speech")).await.unwrap();
        for text in ["one", "two"] {
            sink.play(SpeechClip {
                text: text.into(),
                wav: Bytes::from_static(b"RIFF"),
            })
            .await
            .unwrap();
        }
        assert!(sink.directory().join("aura-0001.wav").is_file());
        assert!(sink.directory().join("aura-0002.wav").is_file());
    }
}
