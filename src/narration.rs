//! Cleanup of generated story text before it reaches the synthesizer.
//!
//! Stories are requested as plain spoken prose, but model output occasionally
//! carries markdown leftovers or bracketed stage directions. None of that
//! belongs in narration audio.

use once_cell::sync::Lazy;
use regex::Regex;
use unicode_normalization::UnicodeNormalization;

static RE_STAGE_DIRECTION: Lazy<Regex> = Lazy::new(|| Regex::new(r"\[[^\]]*\]").unwrap());
static RE_PARENTHETICAL_DIRECTION: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\(\s*(?:pause|beat|softly|whispers?|sighs?|yawns?)[^)]*\)").unwrap()
});
static RE_HEADING: Lazy<Regex> = Lazy::new(|| Regex::new(r"(?m)^\s*#{1,6}\s+").unwrap());
static RE_INLINE_CODE: Lazy<Regex> = Lazy::new(|| Regex::new(r"`([^`]+)`").unwrap());
static RE_STAR_EMPHASIS: Lazy<Regex> = Lazy::new(|| Regex::new(r"\*{1,3}([^*]+)\*{1,3}").unwrap());
static RE_UNDERSCORE_EMPHASIS: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"_{1,3}([^_]+)_{1,3}").unwrap());
static RE_HORIZONTAL_WS: Lazy<Regex> = Lazy::new(|| Regex::new(r"[ \t\u{00A0}]+").unwrap());
static RE_SPACE_BEFORE_PUNCT: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+([,.;:!?])").unwrap());

/// Strip formatting artifacts from a generated story so only spoken words
/// remain. Paragraph breaks survive as single blank lines.
pub fn clean_for_narration(text: &str) -> String {
    let mut cleaned = RE_STAGE_DIRECTION.replace_all(text, " ").into_owned();
    cleaned = RE_PARENTHETICAL_DIRECTION
        .replace_all(&cleaned, " ")
        .into_owned();
    cleaned = RE_HEADING.replace_all(&cleaned, "").into_owned();
    cleaned = RE_INLINE_CODE.replace_all(&cleaned, "$1").into_owned();
    cleaned = RE_STAR_EMPHASIS.replace_all(&cleaned, "$1").into_owned();
    cleaned = RE_UNDERSCORE_EMPHASIS.replace_all(&cleaned, "$1").into_owned();
    cleaned = RE_HORIZONTAL_WS.replace_all(&cleaned, " ").into_owned();
    cleaned = RE_SPACE_BEFORE_PUNCT.replace_all(&cleaned, "$1").into_owned();

    let mut lines: Vec<&str> = Vec::new();
    let mut in_blank_run = true;
    for line in cleaned.lines() {
        let line = line.trim();
        if line.is_empty() {
            if !in_blank_run {
                lines.push("");
                in_blank_run = true;
            }
        } else {
            lines.push(line);
            in_blank_run = false;
        }
    }
    while matches!(lines.last(), Some(line) if line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Stable lookup key for a film title: composed form, casefolded, single
/// spaces. Cache directories and poster-cache entries are keyed by this.
pub fn title_key(title: &str) -> String {
    let composed: String = title.nfc().collect();
    composed
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::{clean_for_narration, title_key};

    #[test]
    fn strips_stage_directions_and_markdown() {
        let raw = "# The Story\n\nOkay little one, [narrator leans in] snuggle up tight.\n\
                   The *brave* hero (whispers dramatically) smiled.";
        let cleaned = clean_for_narration(raw);
        assert_eq!(
            cleaned,
            "The Story\n\nOkay little one, snuggle up tight.\nThe brave hero smiled."
        );
    }

    #[test]
    fn collapses_blank_runs_but_keeps_paragraphs() {
        let raw = "First paragraph.\n\n\n\nSecond paragraph.\n\n";
        assert_eq!(
            clean_for_narration(raw),
            "First paragraph.\n\nSecond paragraph."
        );
    }

    #[test]
    fn removes_space_before_punctuation() {
        assert_eq!(clean_for_narration("Guess what !"), "Guess what!");
    }

    #[test]
    fn title_keys_fold_case_and_whitespace() {
        assert_eq!(title_key("  Dil  Chahta   Hai "), "dil chahta hai");
        assert_eq!(title_key("PK"), "pk");
        assert_eq!(title_key("Barfi!"), title_key("barfi!"));
    }
}
