//! # Duplicate Suppression Module
//!
//! Tracks which allergen terms have already alerted within one scan session
//! so a continuous video feed does not re-trigger haptics every frame for a
//! term that stays in view. The dedup key is the normalized canonical term,
//! not the matched window text, so a one-word and a three-word match on the
//! same allergen collapse to a single alert.

use crate::matcher::MatchEvent;
use crate::normalizer::contains_word;
use std::collections::HashSet;
use tracing::debug;

/// Per-session record of already-alerted terms
#[derive(Debug, Default)]
pub struct MatchSuppressor {
    alerted_term_keys: HashSet<String>,
}

impl MatchSuppressor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Filter a batch of matcher events down to the newly-alerting ones.
    ///
    /// Events whose canonical term is already in the suppression set are
    /// discarded. Each accepted event adds its key, so duplicates within the
    /// same batch also collapse to one.
    pub fn accept(&mut self, events: Vec<MatchEvent>) -> Vec<MatchEvent> {
        let mut accepted = Vec::new();
        for event in events {
            if self.alerted_term_keys.insert(event.term.clone()) {
                accepted.push(event);
            } else {
                debug!(term = %event.term, "Suppressing already-alerted term");
            }
        }
        accepted
    }

    /// Live-scan eviction: forget terms that left the frame entirely.
    ///
    /// A key is evicted only when neither the term nor any of its synonyms
    /// appears in the latest recognized text, which distinguishes
    /// "disappeared" from "still present, already alerted". An evicted term
    /// re-alerts if it reappears. Photo mode never calls this; a single
    /// capture has no notion of disappearance.
    pub fn evict_missing(&mut self, normalized_text: &str, detected: &[MatchEvent]) {
        let before = self.alerted_term_keys.len();
        self.alerted_term_keys.retain(|key| {
            if contains_word(normalized_text, key) {
                return true;
            }
            // The term itself is gone; check whether a synonym keeps it alive
            detected
                .iter()
                .filter(|e| &e.term == key)
                .any(|e| e.synonyms.iter().any(|s| contains_word(normalized_text, s)))
        });
        let evicted = before - self.alerted_term_keys.len();
        if evicted > 0 {
            debug!(evicted, "Evicted terms no longer present in recognized text");
        }
    }

    /// Whether a term has already alerted this session
    pub fn is_alerted(&self, normalized_term: &str) -> bool {
        self.alerted_term_keys.contains(normalized_term)
    }

    /// Number of terms currently suppressed
    pub fn alerted_count(&self) -> usize {
        self.alerted_term_keys.len()
    }

    /// Full reset, used on retake and session teardown
    pub fn reset(&mut self) {
        self.alerted_term_keys.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn event(term: &str, phrase: &str) -> MatchEvent {
        MatchEvent {
            category: "Dairy".to_string(),
            term: term.to_string(),
            synonyms: vec!["dairy".to_string()],
            phrase: phrase.to_string(),
        }
    }

    #[test]
    fn test_first_event_accepted_second_suppressed() {
        let mut suppressor = MatchSuppressor::new();
        let accepted = suppressor.accept(vec![event("milk", "milk")]);
        assert_eq!(accepted.len(), 1);

        // Same term on the next frame
        let accepted = suppressor.accept(vec![event("milk", "milk")]);
        assert!(accepted.is_empty());
        assert_eq!(suppressor.alerted_count(), 1);
    }

    #[test]
    fn test_different_phrases_same_term_collapse() {
        let mut suppressor = MatchSuppressor::new();
        let accepted = suppressor.accept(vec![event("milk", "milk"), event("milk", "dairy")]);
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_eviction_when_term_disappears() {
        let mut suppressor = MatchSuppressor::new();
        let detected = suppressor.accept(vec![event("milk", "milk")]);
        assert!(suppressor.is_alerted("milk"));

        // Term vanished from view
        suppressor.evict_missing("water sugar salt", &detected);
        assert!(!suppressor.is_alerted("milk"));

        // Reappearance alerts again
        let accepted = suppressor.accept(vec![event("milk", "milk")]);
        assert_eq!(accepted.len(), 1);
    }

    #[test]
    fn test_no_eviction_while_term_still_present() {
        let mut suppressor = MatchSuppressor::new();
        let detected = suppressor.accept(vec![event("milk", "milk")]);
        suppressor.evict_missing("water milk salt", &detected);
        assert!(suppressor.is_alerted("milk"));
    }

    #[test]
    fn test_synonym_presence_prevents_eviction() {
        let mut suppressor = MatchSuppressor::new();
        let detected = suppressor.accept(vec![event("milk", "dairy")]);
        // Canonical term absent but the matched synonym remains in view
        suppressor.evict_missing("contains dairy product", &detected);
        assert!(suppressor.is_alerted("milk"));
    }

    #[test]
    fn test_reset_clears_everything() {
        let mut suppressor = MatchSuppressor::new();
        suppressor.accept(vec![event("milk", "milk")]);
        suppressor.reset();
        assert_eq!(suppressor.alerted_count(), 0);
        assert_eq!(suppressor.accept(vec![event("milk", "milk")]).len(), 1);
    }
}
