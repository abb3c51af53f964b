//! # Allergen Dictionary Module
//!
//! An in-memory index of allergen categories, their canonical terms, and
//! synonym sets. The dictionary is built once per load as an immutable
//! snapshot and indexed by normalized term for O(1) lookup. Category data is
//! sourced from a per-locale JSON file (the Category Store); a load failure
//! yields an empty dictionary, which disables matching without crashing.

use crate::errors::{AppError, AppResult};
use crate::normalizer::normalize;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// A single allergen term with its alternate spellings/translations
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergenWord {
    /// Stable identifier for the word
    pub id: String,
    /// The canonical ingredient name the user is warned about
    pub canonical_term: String,
    /// Alternate spellings and translations mapped to the same term
    #[serde(default)]
    pub synonyms: Vec<String>,
}

/// A named group of allergen words, replaced wholesale on refresh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AllergenCategory {
    /// Stable category identifier, unique within a loaded set
    pub name: String,
    /// Display icon name, passed through untouched
    #[serde(default)]
    pub icon: String,
    /// The allergen words belonging to this category
    pub words: Vec<AllergenWord>,
}

/// Category file layout loaded from JSON
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryFileConfig {
    pub categories: Vec<AllergenCategory>,
}

impl CategoryFileConfig {
    /// Validate category configuration
    pub fn validate(&self) -> AppResult<()> {
        let mut seen_names = HashSet::new();
        for category in &self.categories {
            if category.name.trim().is_empty() {
                return Err(AppError::Config(
                    "category name cannot be empty".to_string(),
                ));
            }
            if !seen_names.insert(category.name.clone()) {
                return Err(AppError::Config(format!(
                    "duplicate category name '{}'",
                    category.name
                )));
            }
            for word in &category.words {
                if word.canonical_term.trim().is_empty() {
                    return Err(AppError::Config(format!(
                        "category '{}' contains a word with an empty canonical term",
                        category.name
                    )));
                }
                if word.canonical_term.chars().any(|c| c.is_control()) {
                    return Err(AppError::Config(format!(
                        "canonical term '{}' contains control characters",
                        word.canonical_term
                    )));
                }
            }
        }
        Ok(())
    }
}

/// What a successful dictionary lookup resolves to
#[derive(Debug, Clone, PartialEq)]
pub struct DictionaryEntry {
    /// Owning category name
    pub category: String,
    /// Normalized canonical term
    pub canonical_term: String,
    /// Normalized synonyms of the term
    pub synonyms: Vec<String>,
}

/// Hash-indexed snapshot of the loaded allergen categories
///
/// Keys are the normalized canonical term and every normalized synonym, all
/// mapping to the same owning entry. Inputs to [`lookup`](Self::lookup) are
/// expected to be pre-normalized, which makes lookups case and diacritic
/// insensitive by construction.
#[derive(Debug, Clone, Default)]
pub struct AllergenDictionary {
    index: HashMap<String, Arc<DictionaryEntry>>,
    category_count: usize,
}

impl AllergenDictionary {
    /// Build a dictionary from a loaded category set.
    ///
    /// Canonical terms and synonyms colliding across categories are undefined
    /// behavior per the data contract; the first-loaded entry wins and the
    /// collision is logged.
    pub fn from_categories(categories: &[AllergenCategory]) -> Self {
        let mut index: HashMap<String, Arc<DictionaryEntry>> = HashMap::new();
        let category_count = categories.len();

        for category in categories {
            for word in &category.words {
                let canonical = normalize(&word.canonical_term);
                if canonical.is_empty() {
                    warn!(
                        category = %category.name,
                        word_id = %word.id,
                        "Skipping word whose canonical term normalizes to empty"
                    );
                    continue;
                }
                let synonyms: Vec<String> = word
                    .synonyms
                    .iter()
                    .map(|s| normalize(s))
                    .filter(|s| !s.is_empty())
                    .collect();

                let entry = Arc::new(DictionaryEntry {
                    category: category.name.clone(),
                    canonical_term: canonical.clone(),
                    synonyms: synonyms.clone(),
                });

                for key in std::iter::once(&canonical).chain(synonyms.iter()) {
                    if let Some(existing) = index.get(key) {
                        warn!(
                            key = %key,
                            first = %existing.category,
                            second = %category.name,
                            "Term indexed by more than one category, keeping first"
                        );
                        continue;
                    }
                    index.insert(key.clone(), Arc::clone(&entry));
                }
            }
        }

        info!(
            categories = category_count,
            indexed_terms = index.len(),
            "Built allergen dictionary"
        );
        Self {
            index,
            category_count,
        }
    }

    /// Exact lookup of a pre-normalized term against canonical terms and
    /// synonyms. No match is `None`, never an error.
    pub fn lookup(&self, normalized_term: &str) -> Option<&DictionaryEntry> {
        self.index.get(normalized_term).map(|e| e.as_ref())
    }

    /// Number of distinct index keys (canonical terms plus synonyms)
    pub fn len(&self) -> usize {
        self.index.len()
    }

    /// True when no categories were loaded; matching is effectively disabled
    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Number of categories the dictionary was built from
    pub fn category_count(&self) -> usize {
        self.category_count
    }
}

/// The user's active allergen subscription, stored pre-normalized
///
/// Membership tests are case/diacritic-insensitive because both the stored
/// terms and the probed terms are normalized forms.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SelectedAllergens {
    terms: HashSet<String>,
}

impl SelectedAllergens {
    /// Build the selection from raw user-persisted strings, normalizing each
    pub fn from_terms<I, S>(terms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let terms: HashSet<String> = terms
            .into_iter()
            .map(|t| normalize(t.as_ref()))
            .filter(|t| !t.is_empty())
            .collect();
        debug!(selected = terms.len(), "Built selected allergen set");
        Self { terms }
    }

    /// Membership test against a pre-normalized term
    pub fn contains(&self, normalized_term: &str) -> bool {
        self.terms.contains(normalized_term)
    }

    pub fn len(&self) -> usize {
        self.terms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.terms.is_empty()
    }
}

/// Load the per-locale allergen category list from JSON.
///
/// First tries the path in `ALLERGEN_CATEGORIES_CONFIG_PATH` (a directory
/// containing the per-locale files), then falls back to the conventional
/// locations. A missing or unparsable file yields an empty category list
/// with a warning; the matcher then simply never fires.
pub fn load_category_config(locale: &str) -> Vec<AllergenCategory> {
    let file_name = format!("allergens_{}.json", locale);

    if let Ok(config_dir) = std::env::var("ALLERGEN_CATEGORIES_CONFIG_PATH") {
        let config_path = format!("{}/{}", config_dir, file_name);
        info!(
            "Loading allergen categories from environment variable path: {}",
            config_path
        );
        match try_load_category_file(&config_path) {
            Ok(categories) => return categories,
            Err(e) => {
                warn!(
                    "Failed to load allergen categories from '{}': {}. Falling back to default paths.",
                    config_path, e
                );
            }
        }
    }

    let possible_paths = [
        format!("/app/config/{}", file_name), // Docker path
        format!("config/{}", file_name),      // Local development path
        format!("../config/{}", file_name),   // Test path
    ];

    for config_path in &possible_paths {
        match try_load_category_file(config_path) {
            Ok(categories) => {
                info!(
                    "Successfully loaded allergen categories from fallback path: {}",
                    config_path
                );
                return categories;
            }
            Err(_) => continue, // Try next path
        }
    }

    warn!(
        locale = %locale,
        "No allergen category file found in any expected location. Matching is disabled."
    );
    Vec::new()
}

fn try_load_category_file(path: &str) -> AppResult<Vec<AllergenCategory>> {
    let content =
        fs::read_to_string(path).map_err(|e| AppError::Store(format!("{}: {}", path, e)))?;
    let config: CategoryFileConfig = serde_json::from_str(&content)?;
    config.validate()?;
    Ok(config.categories)
}
