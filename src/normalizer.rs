//! # Text Normalization Module
//!
//! Canonicalizes raw OCR output into a comparable form before dictionary
//! lookups: newline/hyphen flattening, punctuation and digit removal,
//! diacritic stripping, case folding, and a fixed table of OCR artifact
//! corrections for both Arabic and Latin script.
//!
//! `normalize` is a pure function and idempotent:
//! `normalize(normalize(s)) == normalize(s)` for all inputs.

use lazy_static::lazy_static;
use regex::Regex;
use tracing::trace;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    /// Everything that is not a letter or whitespace gets stripped.
    static ref NON_LETTER: Regex =
        Regex::new(r"[^\p{L}\s]").expect("non-letter pattern should be valid");
}

/// Fixed, ordered table of literal OCR artifact corrections.
///
/// Entries are written in already-normalized form (folded, no diacritics) so
/// that applying the table after folding keeps `normalize` idempotent. The
/// source data also carried a few self-mapping entries; those were leftovers
/// from incomplete diacritic handling and are omitted here.
const OCR_CORRECTIONS: &[(&str, &str)] = &[
    // Doubled alif at the start of the Arabic "ingredients" header
    ("االمكونات", "المكونات"),
    ("اامكونات", "المكونات"),
    // Common misreads of the Arabic ingredients/composition headers
    ("المكوتات", "المكونات"),
    ("مكوتات", "مكونات"),
    ("التركيبه", "التركيبة"),
    // Common misreads of the Latin headers
    ("ingredents", "ingredients"),
    ("ingrediants", "ingredients"),
    ("lngredients", "ingredients"),
    ("compositon", "composition"),
    ("composltion", "composition"),
];

/// Normalize raw recognized text into its canonical comparison form.
///
/// Steps, in order:
/// 1. Replace newlines and hyphens with spaces.
/// 2. Strip all characters that are not letters or whitespace.
/// 3. Lowercase (a no-op for scripts without case).
/// 4. NFD-decompose and drop combining marks (Arabic tashkeel, Latin accents).
/// 5. Apply the OCR artifact correction table, in table order.
/// 6. Collapse whitespace runs and trim.
///
/// Lowercasing happens before mark-stripping because case folding can itself
/// emit combining marks (e.g. dotted capital I), and before the correction
/// table so that corrections are case/diacritic-insensitive; table entries
/// are themselves in final form, which makes the whole function idempotent
/// by construction.
pub fn normalize(raw: &str) -> String {
    let flattened = raw.replace(['\n', '\r', '-'], " ");
    let letters_only = NON_LETTER.replace_all(&flattened, "");

    let mut folded: String = letters_only
        .to_lowercase()
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .collect();

    for (from, to) in OCR_CORRECTIONS {
        if folded.contains(from) {
            trace!(artifact = %from, corrected = %to, "Applied OCR artifact correction");
            folded = folded.replace(from, to);
        }
    }

    folded.split_whitespace().collect::<Vec<&str>>().join(" ")
}

/// Word-boundary containment test on already-normalized text.
///
/// Returns true when `needle` appears as a whole word (or whole run of
/// words) in `text`. Both arguments are expected to be outputs of
/// [`normalize`]; the check is a space-padded substring test, which is
/// sufficient because normalized text is single-space separated.
pub fn contains_word(text: &str, needle: &str) -> bool {
    if needle.is_empty() || text.is_empty() {
        return false;
    }
    let padded_text = format!(" {} ", text);
    let padded_needle = format!(" {} ", needle);
    padded_text.contains(&padded_needle)
}
