//! Reading, parsing, and clamping of the TOML configuration.

use super::models::AppConfig;
use std::path::Path;
use tracing::{info, warn};

/// Load configuration from `path`, falling back to defaults when the file is
/// absent or unreadable.
pub fn load_config(path: &Path) -> AppConfig {
    match std::fs::read_to_string(path) {
        Ok(raw) => parse_config(&raw),
        Err(err) => {
            info!(path = %path.display(), "No config file ({err}); using defaults");
            AppConfig::default()
        }
    }
}

pub fn parse_config(raw: &str) -> AppConfig {
    let mut config = toml::from_str::<AppConfig>(raw).unwrap_or_else(|err| {
        warn!("Failed to parse config: {err}; using defaults");
        AppConfig::default()
    });
    clamp_config(&mut config);
    config
}

pub fn serialize_config(config: &AppConfig) -> String {
    toml::to_string(config).unwrap_or_default()
}

fn clamp_config(config: &mut AppConfig) {
    config.voice_stability = config.voice_stability.clamp(0.0, 1.0);
    config.voice_similarity_boost = config.voice_similarity_boost.clamp(0.0, 1.0);
    config.voice_style = config.voice_style.clamp(0.0, 1.0);
    config.status_poll_interval_ms = config.status_poll_interval_ms.clamp(50, 2_000);
    config.progress_log_interval_secs = config.progress_log_interval_secs.clamp(0.1, 60.0);
    if config.cache_dir.trim().is_empty() {
        config.cache_dir = super::defaults::default_cache_dir();
    }
    if let Some(voice_id) = &config.voice_id {
        if voice_id.trim().is_empty() {
            config.voice_id = None;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{parse_config, serialize_config};
    use crate::config::LogLevel;
    use crate::story::AgeBand;

    #[test]
    fn empty_input_yields_defaults() {
        let config = parse_config("");
        assert_eq!(config.log_level, LogLevel::Info);
        assert_eq!(config.cache_dir, ".cache");
        assert_eq!(config.age_band, AgeBand::EarlyReader);
        assert_eq!(config.voice_id, None);
        assert_eq!(config.status_poll_interval_ms, 250);
    }

    #[test]
    fn fields_parse_and_clamp() {
        let config = parse_config(
            r#"
log_level = "debug"
age_band = "9-12"
voice_id = "narrator-7"
voice_stability = 1.8
status_poll_interval_ms = 5
progress_log_interval_secs = 900.0
cache_dir = "   "
"#,
        );
        assert_eq!(config.log_level, LogLevel::Debug);
        assert_eq!(config.age_band, AgeBand::Middle);
        assert_eq!(config.voice_id.as_deref(), Some("narrator-7"));
        assert_eq!(config.voice_stability, 1.0);
        assert_eq!(config.status_poll_interval_ms, 50);
        assert_eq!(config.progress_log_interval_secs, 60.0);
        assert_eq!(config.cache_dir, ".cache");
    }

    #[test]
    fn unparseable_toml_falls_back_to_defaults() {
        let config = parse_config("log_level = [broken");
        assert_eq!(config.log_level, LogLevel::Info);
    }

    #[test]
    fn serialized_config_parses_back() {
        let config = parse_config("voice_id = \"narrator-7\"");
        let round_tripped = parse_config(&serialize_config(&config));
        assert_eq!(round_tripped.voice_id.as_deref(), Some("narrator-7"));
    }
}
