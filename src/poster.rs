//! Poster lookup with an indefinite per-title cache.
//!
//! Poster URLs never change for a given film, so the first successful lookup
//! is remembered in the key/value store and the backend is not asked again.

use crate::narration::title_key;
use crate::storage::{KeyValueStore, keys};
use anyhow::Result;
use std::collections::BTreeMap;
use tracing::{debug, warn};

/// Finds a poster image URL for a film title, if one exists.
pub trait PosterLookup {
    fn find_poster(&self, title: &str, year: Option<u16>) -> Result<Option<String>>;
}

/// Wraps a lookup backend with a title-keyed URL cache. Backend failures
/// degrade to "no poster" rather than surfacing an error.
pub struct CachedPosterLookup<L, S> {
    inner: L,
    store: S,
}

impl<L: PosterLookup, S: KeyValueStore> CachedPosterLookup<L, S> {
    pub fn new(inner: L, store: S) -> Self {
        Self { inner, store }
    }

    fn read_cache(&self) -> BTreeMap<String, String> {
        self.store
            .get(keys::POSTER_CACHE)
            .and_then(|raw| serde_json::from_str(&raw).ok())
            .unwrap_or_default()
    }
}

impl<L: PosterLookup, S: KeyValueStore> PosterLookup for CachedPosterLookup<L, S> {
    fn find_poster(&self, title: &str, year: Option<u16>) -> Result<Option<String>> {
        let key = title_key(title);
        let mut cache = self.read_cache();
        if let Some(url) = cache.get(&key) {
            debug!(title, "Poster served from cache");
            return Ok(Some(url.clone()));
        }

        let found = match self.inner.find_poster(title, year) {
            Ok(found) => found,
            Err(err) => {
                warn!(title, "Poster lookup failed: {err:#}");
                return Ok(None);
            }
        };

        if let Some(url) = &found {
            cache.insert(key, url.clone());
            if let Ok(raw) = serde_json::to_string(&cache) {
                self.store.set(keys::POSTER_CACHE, &raw);
            }
        }
        Ok(found)
    }
}
