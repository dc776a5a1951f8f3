//! Speech synthesis contract for narration audio.
//!
//! Implementations return encoded audio bytes ready for the playback backend;
//! the wire protocol behind them is not this crate's concern.

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// One selectable narrator voice.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub id: String,
    pub name: String,
}

/// Delivery knobs for the synthesizer, all in `0.0..=1.0`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct VoiceSettings {
    pub stability: f32,
    pub similarity_boost: f32,
    pub style: f32,
    pub speaker_boost: bool,
}

impl Default for VoiceSettings {
    fn default() -> Self {
        VoiceSettings {
            stability: 0.6,
            similarity_boost: 0.75,
            style: 0.4,
            speaker_boost: true,
        }
    }
}

impl VoiceSettings {
    pub fn clamped(self) -> Self {
        VoiceSettings {
            stability: self.stability.clamp(0.0, 1.0),
            similarity_boost: self.similarity_boost.clamp(0.0, 1.0),
            style: self.style.clamp(0.0, 1.0),
            speaker_boost: self.speaker_boost,
        }
    }
}

/// Failure modes surfaced by a synthesis backend.
#[derive(Debug, Error)]
pub enum SpeechError {
    #[error("speech service rejected the credential")]
    InvalidCredential,

    #[error("no voices are available on this account")]
    NoVoicesAvailable,

    #[error("speech service error: {0}")]
    Api(String),
}

/// Produces narration audio from cleaned story text.
pub trait SpeechSynthesizer {
    fn list_voices(&self) -> Result<Vec<Voice>, SpeechError>;

    fn synthesize(
        &self,
        text: &str,
        voice_id: &str,
        settings: &VoiceSettings,
    ) -> Result<Vec<u8>, SpeechError>;
}
