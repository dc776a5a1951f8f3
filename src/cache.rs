//! On-disk cache of generated stories and narration audio.
//!
//! Entries live under `<cache_root>/<hash>/` where the hash is derived from
//! the normalized film title, so any spelling of a title maps to one stable
//! directory. Story text is a tiny TOML file; narration audio is the raw
//! encoded bytes returned by the synthesizer. Write errors are ignored to
//! keep generation and playback responsive.

use crate::narration::title_key;
use crate::story::AgeBand;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use tracing::warn;

pub const DEFAULT_CACHE_DIR: &str = ".cache";

/// Cached bedtime prose for one film.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CachedStory {
    pub title: String,
    #[serde(default)]
    pub age_band: AgeBand,
    pub text: String,
}

pub fn story_dir(cache_root: &Path, title: &str) -> PathBuf {
    let mut hasher = Sha256::new();
    hasher.update(title_key(title).as_bytes());
    let hash = format!("{:x}", hasher.finalize());
    cache_root.join(hash)
}

fn story_path(cache_root: &Path, title: &str) -> PathBuf {
    story_dir(cache_root, title).join("story.toml")
}

pub fn narration_path(cache_root: &Path, title: &str) -> PathBuf {
    story_dir(cache_root, title).join("narration.mp3")
}

fn poster_path(cache_root: &Path, title: &str) -> PathBuf {
    story_dir(cache_root, title).join("poster.txt")
}

pub fn load_story(cache_root: &Path, title: &str) -> Option<CachedStory> {
    let data = fs::read_to_string(story_path(cache_root, title)).ok()?;
    toml::from_str(&data).ok()
}

pub fn save_story(cache_root: &Path, story: &CachedStory) {
    let path = story_path(cache_root, &story.title);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    match toml::to_string(story) {
        Ok(contents) => {
            if let Ok(mut file) = fs::File::create(path) {
                let _ = file.write_all(contents.as_bytes());
            }
        }
        Err(err) => warn!(title = %story.title, "Failed to encode cached story: {err}"),
    }
}

pub fn save_narration(cache_root: &Path, title: &str, audio: &[u8]) {
    let path = narration_path(cache_root, title);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    if let Err(err) = fs::write(path, audio) {
        warn!(title, "Failed to cache narration audio: {err}");
    }
}

pub fn has_narration(cache_root: &Path, title: &str) -> bool {
    narration_path(cache_root, title).exists()
}

pub fn load_poster_url(cache_root: &Path, title: &str) -> Option<String> {
    let url = fs::read_to_string(poster_path(cache_root, title)).ok()?;
    let url = url.trim();
    if url.is_empty() { None } else { Some(url.to_string()) }
}

pub fn save_poster_url(cache_root: &Path, title: &str, url: &str) {
    let path = poster_path(cache_root, title);
    if let Some(parent) = path.parent() {
        let _ = fs::create_dir_all(parent);
    }
    let _ = fs::write(path, url);
}
