//! # Offline collaborators
//!
//! Deterministic stand-ins for the prompt API: an excerpt-based summarizer
//! and a vocabulary tagger. Used in development and whenever no endpoint is
//! configured.

use async_trait::async_trait;
use domains::{Result, Summarizer, Tagger};

/// Summary limit in characters.
const MAX_SUMMARY: usize = 100;
const ELLIPSIS: char = '…';

/// Known build themes, in the order tags are reported.
const VOCABULARY: &[&str] = &[
    "castle",
    "fantasy",
    "medieval",
    "modern",
    "villa",
    "city",
    "village",
    "underground",
    "dwarven",
    "steampunk",
    "airship",
    "ship",
    "vehicle",
    "redstone",
    "farm",
    "temple",
    "tower",
    "bridge",
    "island",
    "survival",
    "pixel-art",
    "engineering",
    "architecture",
];

const MAX_TAGS: usize = 8;

/// Uses the first sentence when it fits, otherwise cuts at a word boundary.
#[derive(Debug, Clone, Copy, Default)]
pub struct ExcerptSummarizer;

impl ExcerptSummarizer {
    pub fn new() -> Self {
        Self
    }

    pub fn excerpt(description: &str) -> String {
        let text = description.split_whitespace().collect::<Vec<_>>().join(" ");

        if let Some(end) = text.find(". ") {
            let sentence = &text[..=end];
            if sentence.chars().count() <= MAX_SUMMARY {
                return sentence.to_string();
            }
        }
        if text.chars().count() <= MAX_SUMMARY {
            return text;
        }

        // Leave room for the ellipsis.
        let budget: String = text.chars().take(MAX_SUMMARY - 1).collect();
        let cut = match budget.rfind(' ') {
            Some(space) if space > 0 => &budget[..space],
            _ => budget.as_str(),
        };
        let mut summary = cut.trim_end_matches([',', ';', ':', ' ']).to_string();
        summary.push(ELLIPSIS);
        summary
    }
}

#[async_trait]
impl Summarizer for ExcerptSummarizer {
    async fn summarize(&self, description: &str) -> Result<String> {
        Ok(Self::excerpt(description))
    }
}

/// Tags a build with every vocabulary theme its description mentions.
#[derive(Debug, Clone, Copy, Default)]
pub struct KeywordTagger;

impl KeywordTagger {
    pub fn new() -> Self {
        Self
    }

    pub fn keywords(description: &str) -> Vec<String> {
        let words: Vec<String> = description
            .split(|c: char| !(c.is_alphanumeric() || c == '-'))
            .filter(|w| !w.is_empty())
            .map(str::to_lowercase)
            .collect();

        VOCABULARY
            .iter()
            .filter(|theme| {
                words.iter().any(|word| {
                    word == *theme || word.strip_suffix('s').is_some_and(|stem| stem == **theme)
                })
            })
            .take(MAX_TAGS)
            .map(|theme| theme.to_string())
            .collect()
    }
}

#[async_trait]
impl Tagger for KeywordTagger {
    async fn tag(&self, description: &str, _image_data_uri: &str) -> Result<Vec<String>> {
        Ok(Self::keywords(description))
    }
}
