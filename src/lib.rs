//! # Allergen Scanner Core
//!
//! The ingredient-matching pipeline behind an allergen-scanning app: text
//! normalization, a bilingual allergen dictionary, sliding-window phrase
//! matching, per-session duplicate suppression, and the scan-session state
//! machine that drives user feedback. Camera capture, OCR, rendering, and
//! persistence are external collaborators behind narrow contracts.

pub mod config;
pub mod dictionary;
pub mod errors;
pub mod feedback;
pub mod language;
pub mod matcher;
pub mod normalizer;
pub mod session;
pub mod suppression;

// Re-export types for easier access
pub use config::ScannerConfig;
pub use dictionary::{AllergenCategory, AllergenDictionary, AllergenWord, SelectedAllergens};
pub use matcher::{MatchEvent, MatcherConfig, PhraseMatcher};
pub use session::{
    RecognitionEvent, RecognitionKind, ScanSessionController, ScanState, StatusMessage,
};
