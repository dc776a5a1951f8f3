//! Saved-story list persisted through the key/value store.
//!
//! Stored as one JSON array under a single key; a corrupt payload reads as an
//! empty list so the UI can always render something.

use crate::narration::title_key;
use crate::storage::{KeyValueStore, keys};
use crate::story::AgeBand;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

/// One bookmarked story.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SavedStory {
    pub title: String,
    #[serde(default)]
    pub age_band: AgeBand,
    pub text: String,
    #[serde(default)]
    pub poster_url: Option<String>,
}

pub struct StoryLibrary<S> {
    store: S,
}

impl<S: KeyValueStore> StoryLibrary<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// Newest first.
    pub fn list(&self) -> Vec<SavedStory> {
        let Some(raw) = self.store.get(keys::SAVED_STORIES) else {
            return Vec::new();
        };
        match serde_json::from_str(&raw) {
            Ok(stories) => stories,
            Err(err) => {
                warn!("Discarding unreadable saved-story list: {err}");
                Vec::new()
            }
        }
    }

    /// Save a story, replacing any earlier entry for the same title.
    pub fn save(&self, story: SavedStory) {
        let mut stories = self.list();
        let key = title_key(&story.title);
        stories.retain(|existing| title_key(&existing.title) != key);
        info!(title = %story.title, "Saved story");
        stories.insert(0, story);
        self.write(&stories);
    }

    pub fn remove(&self, title: &str) {
        let mut stories = self.list();
        let key = title_key(title);
        let before = stories.len();
        stories.retain(|existing| title_key(&existing.title) != key);
        if stories.len() != before {
            info!(title, "Removed saved story");
            self.write(&stories);
        }
    }

    fn write(&self, stories: &[SavedStory]) {
        match serde_json::to_string(stories) {
            Ok(raw) => self.store.set(keys::SAVED_STORIES, &raw),
            Err(err) => warn!("Failed to encode saved-story list: {err}"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{SavedStory, StoryLibrary};
    use crate::storage::{KeyValueStore, MemoryStore, keys};
    use crate::story::AgeBand;

    fn story(title: &str) -> SavedStory {
        SavedStory {
            title: title.to_string(),
            age_band: AgeBand::EarlyReader,
            text: format!("Once upon a time: {title}."),
            poster_url: None,
        }
    }

    #[test]
    fn saving_replaces_entries_with_the_same_title() {
        let store = MemoryStore::new();
        let library = StoryLibrary::new(&store);
        library.save(story("Sholay"));
        library.save(story("Queen"));
        library.save(story("  sholay "));

        let titles: Vec<_> = library.list().into_iter().map(|s| s.title).collect();
        assert_eq!(titles, vec!["  sholay ".to_string(), "Queen".to_string()]);
    }

    #[test]
    fn removal_is_case_insensitive_and_idempotent() {
        let store = MemoryStore::new();
        let library = StoryLibrary::new(&store);
        library.save(story("PK"));
        library.remove("pk");
        library.remove("pk");
        assert!(library.list().is_empty());
    }

    #[test]
    fn corrupt_payload_reads_as_empty() {
        let store = MemoryStore::new();
        store.set(keys::SAVED_STORIES, "{not json");
        let library = StoryLibrary::new(&store);
        assert!(library.list().is_empty());
        library.save(story("Swades"));
        assert_eq!(library.list().len(), 1);
    }
}
