//! Story generation contract: how a film title becomes bedtime prose.
//!
//! The remote endpoint itself lives outside this crate; callers hand the
//! pipeline an implementation of [`StoryGenerator`].

use anyhow::Result;
use serde::{Deserialize, Serialize};

/// Titles offered on screen when the user has not typed anything yet.
pub const SUGGESTED_TITLES: [&str; 10] = [
    "Dil Chahta Hai",
    "PK",
    "Queen",
    "Swades",
    "Barfi!",
    "Andaz Apna Apna",
    "Zindagi Na Milegi Dobara",
    "Munna Bhai MBBS",
    "Dil Dhadakne Do",
    "Kabhi Khushi Kabhie Gham",
];

/// Audience age band; persisted and displayed as its year range.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum AgeBand {
    #[serde(rename = "3-5")]
    Preschool,
    #[serde(rename = "6-8")]
    EarlyReader,
    #[serde(rename = "9-12")]
    Middle,
}

impl Default for AgeBand {
    fn default() -> Self {
        AgeBand::EarlyReader
    }
}

impl std::fmt::Display for AgeBand {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let label = match self {
            AgeBand::Preschool => "3-5 years",
            AgeBand::EarlyReader => "6-8 years",
            AgeBand::Middle => "9-12 years",
        };
        write!(f, "{}", label)
    }
}

/// How the prompt addresses each age band.
pub struct AgeProfile {
    pub audience: &'static str,
    pub word_count: &'static str,
    pub complexity: &'static str,
    pub opening: &'static str,
}

impl AgeBand {
    pub fn profile(self) -> AgeProfile {
        match self {
            AgeBand::Preschool => AgeProfile {
                audience: "a young child aged 3-5",
                word_count: "~1000",
                complexity: "Use very simple words and short sentences. Repeat key phrases \
                             for comfort. Keep descriptions vivid but easy to picture.",
                opening: "Okay little one, snuggle up tight...",
            },
            AgeBand::EarlyReader => AgeProfile {
                audience: "kids aged 6-8",
                word_count: "~1800",
                complexity: "Use fun, playful vocabulary. Sentences can be medium length. \
                             Add little asides like \"Can you believe that?\" or \"Guess \
                             what happened next!\"",
                opening: "Alright, snuggle up little ones...",
            },
            AgeBand::Middle => AgeProfile {
                audience: "kids aged 9-12",
                word_count: "~2500",
                complexity: "Use richer language and more detailed descriptions. Include \
                             clever wordplay and humor. You can explore emotions and \
                             motivations more deeply.",
                opening: "Alright, settle in and get comfy...",
            },
        }
    }
}

/// One request for bedtime prose.
#[derive(Debug, Clone)]
pub struct StoryRequest {
    pub title: String,
    pub age_band: AgeBand,
}

/// Turns a request into narrative text. Failures surface as opaque messages
/// for the UI to display.
pub trait StoryGenerator {
    fn generate(&self, request: &StoryRequest) -> Result<String>;
}

/// The full instruction block sent to the generation endpoint.
pub fn build_prompt(request: &StoryRequest) -> String {
    let age = request.age_band.profile();
    format!(
        "You are a warm, loving parent telling a bedtime story to {audience} based on \
         the Bollywood movie \"{title}\".\n\n\
         RULES:\n\
         - Rewrite the movie's plot as a cozy, fun bedtime story ({word_count} words)\n\
         - Use a casual, conversational tone as if a parent is reading to kids snuggled in bed\n\
         - {complexity}\n\
         - Turn any romantic/sexual subplots into friendship stories\n\
         - Make all villains silly and cartoonish — bumbling, funny, not scary\n\
         - Remove any violence, replace with funny or clever solutions\n\
         - Keep the core adventure and emotional beats of the movie\n\
         - Start with \"{opening}\" or something similar\n\
         - End with a gentle, sleepy conclusion that helps kids drift off to sleep\n\
         - Do NOT include any stage directions, narrator labels, or formatting — just the \
         story text as spoken words\n\n\
         Write the bedtime story now:",
        audience = age.audience,
        title = request.title,
        word_count = age.word_count,
        complexity = age.complexity,
        opening = age.opening,
    )
}
