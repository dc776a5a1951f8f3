//! Capability surface of the underlying audio engine.

use anyhow::Result;
use std::path::PathBuf;

/// Opaque reference to a loaded clip. Minted by the engine and owned by
/// exactly one playback session at a time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceHandle(pub(crate) u64);

/// What the engine can play: a narration file on disk, or synthesized speech
/// bytes straight from the synthesizer.
#[derive(Debug, Clone)]
pub enum AudioSource {
    File(PathBuf),
    Memory(Vec<u8>),
}

/// Periodic transport status for a loaded clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EngineStatus {
    pub position_seconds: f64,
    pub duration_seconds: f64,
    pub did_finish: bool,
}

/// Minimal transport capabilities the playback controller relies on.
///
/// Implementations are free to reject operations on a handle that is no
/// longer loaded; the controller treats such failures as non-fatal.
pub trait AudioEngine: Send {
    fn load(&mut self, source: AudioSource) -> Result<SourceHandle>;

    fn play(&mut self, handle: SourceHandle) -> Result<()>;

    fn pause(&mut self, handle: SourceHandle) -> Result<()>;

    fn seek(&mut self, handle: SourceHandle, seconds: f64) -> Result<()>;

    fn set_volume(&mut self, handle: SourceHandle, volume: f32) -> Result<()>;

    fn release(&mut self, handle: SourceHandle);

    /// Current transport status, if the handle is still loaded.
    fn status(&self, handle: SourceHandle) -> Option<EngineStatus>;
}
