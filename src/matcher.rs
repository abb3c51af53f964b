//! # Phrase Matching Module
//!
//! Finds allergen terms in normalized text using a bounded sliding window
//! over whitespace tokens. Allergen terms may span several tokens (e.g.
//! "soy lecithin"), so every window of length 1 up to the configured bound
//! is probed against the dictionary. Overlapping windows may all match;
//! suppressing repeated alerts is the session's job, not the matcher's.

use crate::dictionary::{AllergenDictionary, SelectedAllergens};
use crate::errors::{AppError, AppResult};
use serde::{Deserialize, Serialize};
use tracing::{debug, trace};

/// One confirmed occurrence of a selected allergen term in scanned text
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MatchEvent {
    /// Owning category name
    pub category: String,
    /// Normalized canonical allergen term
    pub term: String,
    /// Normalized synonyms of the term
    pub synonyms: Vec<String>,
    /// The exact window text that matched
    pub phrase: String,
}

/// Configuration options for phrase matching
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatcherConfig {
    /// Maximum number of tokens a matched phrase may span
    pub max_phrase_length: usize,
}

impl Default for MatcherConfig {
    fn default() -> Self {
        Self {
            max_phrase_length: 3,
        }
    }
}

impl MatcherConfig {
    /// Validate matcher configuration parameters
    pub fn validate(&self) -> AppResult<()> {
        if self.max_phrase_length == 0 {
            return Err(AppError::Config(
                "max_phrase_length must be greater than 0".to_string(),
            ));
        }
        if self.max_phrase_length > 10 {
            return Err(AppError::Config(
                "max_phrase_length cannot be greater than 10".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sliding-window matcher over normalized, whitespace-tokenized text
#[derive(Debug, Clone)]
pub struct PhraseMatcher {
    config: MatcherConfig,
}

impl PhraseMatcher {
    /// Create a matcher with the default window bound
    pub fn new() -> Self {
        Self {
            config: MatcherConfig::default(),
        }
    }

    /// Create a matcher with custom configuration
    pub fn with_config(config: MatcherConfig) -> AppResult<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    /// Find every selected-allergen occurrence in `normalized_text`.
    ///
    /// For each start index and each window length `1..=max_phrase_length`
    /// within bounds, the space-joined window is probed against the
    /// dictionary. Hits whose canonical term is not in the user's selection
    /// are discarded, not emitted. Cost is O(tokens * max_phrase_length).
    pub fn find_matches(
        &self,
        normalized_text: &str,
        dictionary: &AllergenDictionary,
        selected: &SelectedAllergens,
    ) -> Vec<MatchEvent> {
        if dictionary.is_empty() || selected.is_empty() {
            return Vec::new();
        }

        let tokens: Vec<&str> = normalized_text.split_whitespace().collect();
        let mut events = Vec::new();

        for start in 0..tokens.len() {
            let max_len = self.config.max_phrase_length.min(tokens.len() - start);
            for window_len in 1..=max_len {
                let phrase = tokens[start..start + window_len].join(" ");
                trace!(phrase = %phrase, "Probing window");

                let Some(entry) = dictionary.lookup(&phrase) else {
                    continue;
                };

                if !selected.contains(&entry.canonical_term) {
                    debug!(
                        term = %entry.canonical_term,
                        category = %entry.category,
                        "Dictionary hit not in the user's selection, discarding"
                    );
                    continue;
                }

                debug!(
                    term = %entry.canonical_term,
                    category = %entry.category,
                    phrase = %phrase,
                    start_token = start,
                    "Matched selected allergen"
                );
                events.push(MatchEvent {
                    category: entry.category.clone(),
                    term: entry.canonical_term.clone(),
                    synonyms: entry.synonyms.clone(),
                    phrase,
                });
            }
        }

        events
    }

    /// The configured window bound
    pub fn max_phrase_length(&self) -> usize {
        self.config.max_phrase_length
    }
}

impl Default for PhraseMatcher {
    fn default() -> Self {
        Self::new()
    }
}
