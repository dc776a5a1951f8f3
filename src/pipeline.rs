//! Offline preparation of prebuilt stories.
//!
//! Composes the story generator, speech synthesizer, and poster lookup into
//! one pass per film and fills the on-disk cache the player reads from.
//! Titles that already have both story text and narration audio are skipped,
//! so re-running a batch only does the missing work.

use crate::cache::{self, CachedStory};
use crate::config::AppConfig;
use crate::narration::clean_for_narration;
use crate::poster::PosterLookup;
use crate::speech::{SpeechSynthesizer, VoiceSettings};
use crate::story::{AgeBand, StoryGenerator, StoryRequest};
use anyhow::{Context, Result, anyhow};
use std::path::PathBuf;
use std::time::Instant;
use tracing::{debug, info, warn};

/// Films shipped with the app so first launch has stories ready offline.
pub const PREBUILT_TITLES: [&str; 5] = [
    "DDLJ",
    "Sholay",
    "3 Idiots",
    "Kuch Kuch Hota Hai",
    "Lagaan",
];

pub struct PipelineConfig {
    pub cache_dir: PathBuf,
    pub voice_id: String,
    pub voice_settings: VoiceSettings,
    pub age_band: AgeBand,
    pub progress_log_interval_secs: f32,
}

impl PipelineConfig {
    /// Build from application settings; synthesis needs a concrete voice.
    pub fn from_app_config(config: &AppConfig) -> Result<Self> {
        let voice_id = config
            .voice_id
            .clone()
            .ok_or_else(|| anyhow!("no voice selected; set voice_id in conf/config.toml"))?;
        Ok(Self {
            cache_dir: PathBuf::from(&config.cache_dir),
            voice_id,
            voice_settings: config.voice_settings(),
            age_band: config.age_band,
            progress_log_interval_secs: config.progress_log_interval_secs,
        })
    }
}

/// Outcome of preparing one title.
#[derive(Debug, Clone, PartialEq)]
pub struct PreparedStory {
    pub title: String,
    pub text: String,
    pub audio_bytes: usize,
    pub poster_url: Option<String>,
    pub from_cache: bool,
}

pub struct Pipeline<G, S, P> {
    config: PipelineConfig,
    generator: G,
    synthesizer: S,
    posters: P,
}

impl<G: StoryGenerator, S: SpeechSynthesizer, P: PosterLookup> Pipeline<G, S, P> {
    pub fn new(config: PipelineConfig, generator: G, synthesizer: S, posters: P) -> Self {
        Self {
            config,
            generator,
            synthesizer,
            posters,
        }
    }

    /// Prepare every title in order, logging progress at the configured
    /// cadence. The first failure aborts the batch with context on which
    /// title broke.
    pub fn run_batch(&self, titles: &[&str]) -> Result<Vec<PreparedStory>> {
        let started = Instant::now();
        let mut last_logged = Instant::now();
        let mut prepared = Vec::with_capacity(titles.len());

        info!(total = titles.len(), "Starting prebuilt story batch");
        for (idx, title) in titles.iter().enumerate() {
            let story = self
                .prepare_title(title)
                .with_context(|| format!("preparing \"{title}\""))?;
            prepared.push(story);

            let interval_elapsed =
                last_logged.elapsed().as_secs_f32() >= self.config.progress_log_interval_secs;
            if interval_elapsed || idx + 1 == titles.len() {
                info!(
                    done = idx + 1,
                    total = titles.len(),
                    elapsed_secs = started.elapsed().as_secs(),
                    "Prebuilt batch progress"
                );
                last_logged = Instant::now();
            }
        }
        Ok(prepared)
    }

    /// Generate, clean, narrate, and cache one title. Cached titles are
    /// returned as-is without touching the generator or synthesizer.
    pub fn prepare_title(&self, title: &str) -> Result<PreparedStory> {
        if let Some(existing) = cache::load_story(&self.config.cache_dir, title) {
            if cache::has_narration(&self.config.cache_dir, title) {
                debug!(title, "Already cached; skipping generation");
                return Ok(PreparedStory {
                    title: existing.title,
                    text: existing.text,
                    audio_bytes: 0,
                    poster_url: cache::load_poster_url(&self.config.cache_dir, title),
                    from_cache: true,
                });
            }
        }

        let request = StoryRequest {
            title: title.to_string(),
            age_band: self.config.age_band,
        };
        let raw = self
            .generator
            .generate(&request)
            .context("generating story text")?;
        let text = clean_for_narration(&raw);
        if text.is_empty() {
            anyhow::bail!("generator returned an empty story");
        }

        let audio = self
            .synthesizer
            .synthesize(&text, &self.config.voice_id, &self.config.voice_settings)
            .context("synthesizing narration")?;

        let poster_url = match self.posters.find_poster(title, None) {
            Ok(url) => url,
            Err(err) => {
                warn!(title, "Poster lookup failed: {err:#}");
                None
            }
        };

        cache::save_story(
            &self.config.cache_dir,
            &CachedStory {
                title: title.to_string(),
                age_band: self.config.age_band,
                text: text.clone(),
            },
        );
        cache::save_narration(&self.config.cache_dir, title, &audio);
        if let Some(url) = &poster_url {
            cache::save_poster_url(&self.config.cache_dir, title, url);
        }

        info!(
            title,
            chars = text.len(),
            audio_bytes = audio.len(),
            "Prepared story"
        );
        Ok(PreparedStory {
            title: title.to_string(),
            text,
            audio_bytes: audio.len(),
            poster_url,
            from_cache: false,
        })
    }
}
