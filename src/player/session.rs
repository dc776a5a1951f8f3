//! Per-source playback state.

use super::engine::SourceHandle;

/// State for one loaded audio or speech source.
///
/// `position_seconds` is driven by engine status callbacks except while the
/// user is scrubbing; ending a scrub reconciles the engine with an explicit
/// seek. Exactly one of the two ever drives the position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PlaybackSession {
    pub(in crate::player) handle: Option<SourceHandle>,
    pub(in crate::player) is_playing: bool,
    pub(in crate::player) position_seconds: f64,
    pub(in crate::player) duration_seconds: f64,
    pub(in crate::player) is_scrubbing: bool,
    pub(in crate::player) volume: f32,
}

impl Default for PlaybackSession {
    fn default() -> Self {
        PlaybackSession {
            handle: None,
            is_playing: false,
            position_seconds: 0.0,
            duration_seconds: 0.0,
            is_scrubbing: false,
            volume: 1.0,
        }
    }
}

impl PlaybackSession {
    pub fn is_playing(&self) -> bool {
        self.is_playing
    }

    pub fn position_seconds(&self) -> f64 {
        self.position_seconds
    }

    pub fn duration_seconds(&self) -> f64 {
        self.duration_seconds
    }

    pub fn is_scrubbing(&self) -> bool {
        self.is_scrubbing
    }

    pub fn volume(&self) -> f32 {
        self.volume
    }

    pub fn has_source(&self) -> bool {
        self.handle.is_some()
    }
}
