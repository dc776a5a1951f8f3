use crate::speech::VoiceSettings;
use crate::story::AgeBand;
use serde::Deserialize;

/// High-level app configuration; deserializable from TOML.
#[derive(Debug, Clone, Deserialize, serde::Serialize)]
pub struct AppConfig {
    #[serde(default = "crate::config::defaults::default_log_level")]
    pub log_level: LogLevel,
    #[serde(default = "crate::config::defaults::default_cache_dir")]
    pub cache_dir: String,
    #[serde(default)]
    pub age_band: AgeBand,
    #[serde(default)]
    pub voice_id: Option<String>,
    #[serde(default = "crate::config::defaults::default_voice_stability")]
    pub voice_stability: f32,
    #[serde(default = "crate::config::defaults::default_voice_similarity_boost")]
    pub voice_similarity_boost: f32,
    #[serde(default = "crate::config::defaults::default_voice_style")]
    pub voice_style: f32,
    #[serde(default = "crate::config::defaults::default_voice_speaker_boost")]
    pub voice_speaker_boost: bool,
    #[serde(default = "crate::config::defaults::default_status_poll_interval_ms")]
    pub status_poll_interval_ms: u64,
    #[serde(default = "crate::config::defaults::default_progress_log_interval_secs")]
    pub progress_log_interval_secs: f32,
}

impl Default for AppConfig {
    fn default() -> Self {
        AppConfig {
            log_level: crate::config::defaults::default_log_level(),
            cache_dir: crate::config::defaults::default_cache_dir(),
            age_band: AgeBand::default(),
            voice_id: None,
            voice_stability: crate::config::defaults::default_voice_stability(),
            voice_similarity_boost: crate::config::defaults::default_voice_similarity_boost(),
            voice_style: crate::config::defaults::default_voice_style(),
            voice_speaker_boost: crate::config::defaults::default_voice_speaker_boost(),
            status_poll_interval_ms: crate::config::defaults::default_status_poll_interval_ms(),
            progress_log_interval_secs:
                crate::config::defaults::default_progress_log_interval_secs(),
        }
    }
}

impl AppConfig {
    /// Synthesizer knobs assembled from the flat TOML fields.
    pub fn voice_settings(&self) -> VoiceSettings {
        VoiceSettings {
            stability: self.voice_stability,
            similarity_boost: self.voice_similarity_boost,
            style: self.voice_style,
            speaker_boost: self.voice_speaker_boost,
        }
        .clamped()
    }
}

/// Supported logging verbosity levels.
#[derive(Debug, Clone, Copy, Deserialize, serde::Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
}

impl Default for LogLevel {
    fn default() -> Self {
        LogLevel::Info
    }
}

impl std::fmt::Display for LogLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_filter_str())
    }
}

impl LogLevel {
    pub fn as_filter_str(self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
        }
    }
}
