//! Audio backend built on a rodio sink.
//!
//! One clip at a time: loading a new source stops and drops the previous
//! sink. The output stream itself is owned by the caller (it is tied to the
//! audio device and must outlive every sink created from it).

use super::engine::{AudioEngine, AudioSource, EngineStatus, SourceHandle};
use anyhow::{Context, Result, anyhow};
use rodio::{Decoder, OutputStreamHandle, Sink, Source};
use std::fs::File;
use std::io::{BufReader, Cursor};
use std::time::Duration;
use tracing::debug;

pub struct RodioPlayback {
    stream: OutputStreamHandle,
    current: Option<LoadedClip>,
    next_handle: u64,
}

struct LoadedClip {
    handle: SourceHandle,
    sink: Sink,
    duration: Option<Duration>,
}

impl RodioPlayback {
    pub fn new(stream: OutputStreamHandle) -> Self {
        Self {
            stream,
            current: None,
            next_handle: 0,
        }
    }

    fn clip(&self, handle: SourceHandle) -> Option<&LoadedClip> {
        self.current.as_ref().filter(|clip| clip.handle == handle)
    }

    fn clip_or_err(&self, handle: SourceHandle) -> Result<&LoadedClip> {
        self.clip(handle)
            .ok_or_else(|| anyhow!("source is no longer loaded"))
    }
}

impl AudioEngine for RodioPlayback {
    fn load(&mut self, source: AudioSource) -> Result<SourceHandle> {
        if let Some(previous) = self.current.take() {
            previous.sink.stop();
        }
        let sink = Sink::try_new(&self.stream).context("Creating sink")?;
        sink.pause();
        let duration = match source {
            AudioSource::File(path) => {
                let reader = BufReader::new(
                    File::open(&path).with_context(|| format!("Opening {}", path.display()))?,
                );
                let decoder = Decoder::new(reader).context("Decoding narration file")?;
                let duration = decoder.total_duration();
                sink.append(decoder);
                duration
            }
            AudioSource::Memory(bytes) => {
                let decoder =
                    Decoder::new(Cursor::new(bytes)).context("Decoding synthesized audio")?;
                let duration = decoder.total_duration();
                sink.append(decoder);
                duration
            }
        };

        self.next_handle = self.next_handle.wrapping_add(1);
        let handle = SourceHandle(self.next_handle);
        debug!(?duration, "Loaded clip into sink");
        self.current = Some(LoadedClip {
            handle,
            sink,
            duration,
        });
        Ok(handle)
    }

    fn play(&mut self, handle: SourceHandle) -> Result<()> {
        self.clip_or_err(handle)?.sink.play();
        Ok(())
    }

    fn pause(&mut self, handle: SourceHandle) -> Result<()> {
        self.clip_or_err(handle)?.sink.pause();
        Ok(())
    }

    fn seek(&mut self, handle: SourceHandle, seconds: f64) -> Result<()> {
        let clip = self.clip_or_err(handle)?;
        let target = Duration::from_secs_f64(seconds.max(0.0));
        clip.sink
            .try_seek(target)
            .map_err(|err| anyhow!("seek failed: {err}"))?;
        Ok(())
    }

    fn set_volume(&mut self, handle: SourceHandle, volume: f32) -> Result<()> {
        self.clip_or_err(handle)?
            .sink
            .set_volume(volume.clamp(0.0, 1.0));
        Ok(())
    }

    fn release(&mut self, handle: SourceHandle) {
        if self.clip(handle).is_some() {
            if let Some(clip) = self.current.take() {
                clip.sink.stop();
            }
        }
    }

    fn status(&self, handle: SourceHandle) -> Option<EngineStatus> {
        let clip = self.clip(handle)?;
        Some(EngineStatus {
            position_seconds: clip.sink.get_pos().as_secs_f64(),
            duration_seconds: clip.duration.map(|d| d.as_secs_f64()).unwrap_or(0.0),
            did_finish: clip.sink.empty(),
        })
    }
}
