//! Demo binary: evaluates one "photo" worth of recognized text against the
//! configured allergen categories and prints the outcome. Recognized lines
//! come from a file argument or stdin, standing in for the platform's text
//! recognizer.

use allergen_scanner::dictionary::{self, AllergenDictionary, SelectedAllergens};
use allergen_scanner::feedback::{FeedbackSink, NullSink};
use allergen_scanner::session::{ScanSessionController, StatusMessage};
use allergen_scanner::ScannerConfig;
use anyhow::Result;
use std::env;
use std::io::Read;
use std::sync::Arc;
use tracing::info;

/// Console stand-in for the haptic feedback sink
struct ConsoleSink;

impl FeedbackSink for ConsoleSink {
    fn trigger(&self) {
        println!("*** allergen alert ***");
    }
}

fn read_recognized_lines() -> Result<Vec<String>> {
    let content = match env::args().nth(1) {
        Some(path) => std::fs::read_to_string(&path)
            .map_err(|e| anyhow::anyhow!("failed to read '{}': {}", path, e))?,
        None => {
            let mut buffer = String::new();
            std::io::stdin().read_to_string(&mut buffer)?;
            buffer
        }
    };
    Ok(content.lines().map(|l| l.to_string()).collect())
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = ScannerConfig::from_env()?;
    info!(locale = %config.locale, "Scanner configuration loaded");

    let categories = dictionary::load_category_config(&config.locale);
    let dictionary = Arc::new(AllergenDictionary::from_categories(&categories));

    // Selected allergens come from the preference store; here, an env list
    let selected = match env::var("SELECTED_ALLERGENS") {
        Ok(list) => SelectedAllergens::from_terms(list.split(',')),
        Err(_) => {
            anyhow::bail!("SELECTED_ALLERGENS must be set to a comma-separated allergen list")
        }
    };

    let sink: Arc<dyn FeedbackSink> = if env::var("SCANNER_SILENT").is_ok() {
        Arc::new(NullSink)
    } else {
        Arc::new(ConsoleSink)
    };

    let mut session = ScanSessionController::new(config, dictionary, selected, sink)?;
    let generation = session.start_scan();

    let lines = read_recognized_lines()?;
    session.ingest_photo(generation, &lines);

    for event in session.detected_matches() {
        println!(
            "matched: {} ({}) via \"{}\"",
            event.term, event.category, event.phrase
        );
    }

    match session.status() {
        StatusMessage::AllergenFree => println!("no selected allergens found"),
        StatusMessage::IngredientsNotFound => println!("no ingredient list detected"),
        StatusMessage::LanguageMismatch(script) => {
            println!("text appears to be in another language ({:?})", script)
        }
        _ => {}
    }

    Ok(())
}
