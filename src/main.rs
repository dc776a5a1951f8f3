//! Entry point for the bedtime-story narration player.
//!
//! Responsibilities here are intentionally minimal:
//! - Parse command-line arguments.
//! - Load user configuration from `conf/config.toml`.
//! - Resolve the requested narration (a file path, or a film title with a
//!   cached narration).
//! - Hand control to the console player loop.

use anyhow::{Context, Result, anyhow};
use cinedrift::cache;
use cinedrift::config::load_config;
use cinedrift::console;
use cinedrift::player::{AudioSource, PlaybackTimerController, RodioPlayback, ThreadScheduler};
use rodio::OutputStream;
use std::env;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::{error, info, warn};
use tracing_subscriber::{EnvFilter, fmt, prelude::*, reload};

type ReloadHandle = reload::Handle<EnvFilter, tracing_subscriber::Registry>;

fn main() {
    let reload_handle = init_tracing();
    if let Err(err) = run(&reload_handle) {
        error!("{err:?}");
        std::process::exit(1);
    }
}

fn run(reload_handle: &ReloadHandle) -> Result<()> {
    let request = parse_args()?;
    let config = load_config(Path::new("conf/config.toml"));
    set_log_level(reload_handle, config.log_level.as_filter_str());
    info!(level = %config.log_level, "Starting narration player");

    let source = resolve_source(&request, Path::new(&config.cache_dir))?;

    // the stream is tied to the audio device and must outlive the sink
    let (_stream, stream_handle) =
        OutputStream::try_default().context("Opening audio output")?;
    let engine = RodioPlayback::new(stream_handle);
    let controller = PlaybackTimerController::new(engine, Arc::new(ThreadScheduler));
    console::run(controller, source, &config)
}

fn parse_args() -> Result<String> {
    let mut args = env::args().skip(1);
    args.next()
        .ok_or_else(|| anyhow!("Usage: cinedrift <narration-file-or-cached-title>"))
}

/// A request is either a path to an audio file or a film title whose
/// narration is already in the cache.
fn resolve_source(request: &str, cache_root: &Path) -> Result<AudioSource> {
    let path = PathBuf::from(request);
    if path.exists() {
        info!(path = %path.display(), "Playing narration file");
        return Ok(AudioSource::File(path));
    }
    let cached = cache::narration_path(cache_root, request);
    if cached.exists() {
        info!(title = request, "Playing cached narration");
        return Ok(AudioSource::File(cached));
    }
    Err(anyhow!(
        "no such file, and no cached narration for \"{request}\""
    ))
}

fn init_tracing() -> ReloadHandle {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let (filter_layer, handle) = reload::Layer::new(env_filter);
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_target(true)
                .with_filter(filter_layer),
        )
        .init();
    handle
}

fn set_log_level(handle: &ReloadHandle, level: &str) {
    let parsed = EnvFilter::builder()
        .parse(level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    if let Err(err) = handle.modify(|filter| *filter = parsed.clone()) {
        warn!(%level, "Failed to update log level from config: {err}");
    }
}
