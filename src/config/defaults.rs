pub(crate) fn default_log_level() -> crate::config::LogLevel {
    crate::config::LogLevel::Info
}

pub(crate) fn default_cache_dir() -> String {
    crate::cache::DEFAULT_CACHE_DIR.to_string()
}

pub(crate) fn default_voice_stability() -> f32 {
    0.6
}

pub(crate) fn default_voice_similarity_boost() -> f32 {
    0.75
}

pub(crate) fn default_voice_style() -> f32 {
    0.4
}

pub(crate) fn default_voice_speaker_boost() -> bool {
    true
}

pub(crate) fn default_status_poll_interval_ms() -> u64 {
    250
}

pub(crate) fn default_progress_log_interval_secs() -> f32 {
    5.0
}
