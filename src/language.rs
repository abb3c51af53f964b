//! # Language Guard Module
//!
//! Script detection (Arabic vs. Latin) and the per-language "ingredients"
//! keyword sets. Used by the session controller both to flip the
//! ingredients-detected flag and to surface an advisory language-mismatch
//! status when the recognized text's script does not fit the active keyword
//! set. The mismatch is guidance only; it never blocks the matcher.

use crate::normalizer::contains_word;
use serde::{Deserialize, Serialize};

/// The two scripts the scanner understands
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Script {
    Arabic,
    Latin,
}

/// Majority-vote script detection over the letters of `text`.
///
/// Returns `None` when the text contains no letters of either script, e.g.
/// an empty recognition result.
pub fn detect_script(text: &str) -> Option<Script> {
    let mut arabic = 0usize;
    let mut latin = 0usize;

    for c in text.chars() {
        match c {
            '\u{0600}'..='\u{06FF}' | '\u{0750}'..='\u{077F}' | '\u{08A0}'..='\u{08FF}' => {
                arabic += 1
            }
            c if c.is_ascii_alphabetic() => latin += 1,
            _ => {}
        }
    }

    match (arabic, latin) {
        (0, 0) => None,
        (a, l) if a >= l => Some(Script::Arabic),
        _ => Some(Script::Latin),
    }
}

/// Normalized "ingredients"/"composition" header keywords, per script.
///
/// Seeing one of these in recognized text is what flips the session's
/// ingredients-detected flag and drives the "capture now" prompt.
const LATIN_INGREDIENT_KEYWORDS: &[&str] = &["ingredients", "composition", "contains"];
const ARABIC_INGREDIENT_KEYWORDS: &[&str] = &["المكونات", "مكونات", "التركيب", "التركيبة"];

/// The active input language for a scan session
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanLanguage {
    script: Script,
}

impl ScanLanguage {
    pub fn new(script: Script) -> Self {
        Self { script }
    }

    /// Locale-keyed constructor matching the Category Store's two sets
    pub fn from_locale(locale: &str) -> Self {
        match locale {
            "ar" => Self::new(Script::Arabic),
            _ => Self::new(Script::Latin),
        }
    }

    pub fn script(&self) -> Script {
        self.script
    }

    /// The locale suffix used for category file names
    pub fn locale(&self) -> &'static str {
        match self.script {
            Script::Arabic => "ar",
            Script::Latin => "en",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self.script {
            Script::Arabic => ARABIC_INGREDIENT_KEYWORDS,
            Script::Latin => LATIN_INGREDIENT_KEYWORDS,
        }
    }

    /// Whole-word probe for any ingredients keyword of this language
    pub fn has_ingredient_keyword(&self, normalized_text: &str) -> bool {
        self.keywords()
            .iter()
            .any(|kw| contains_word(normalized_text, kw))
    }

    /// Advisory mismatch check: the text is in the other script and carries
    /// no ingredients keyword of this language.
    pub fn mismatch(&self, normalized_text: &str) -> Option<Script> {
        let detected = detect_script(normalized_text)?;
        if detected != self.script && !self.has_ingredient_keyword(normalized_text) {
            Some(detected)
        } else {
            None
        }
    }
}
