//! # Scanner Configuration
//!
//! Centralized configuration for the scan pipeline: matcher window bound,
//! feedback cooldown, live-scan eviction policy, and the active locale.
//! Supports loading overrides from environment variables and validates all
//! values before a session is constructed.

use crate::errors::{AppError, AppResult};
use crate::matcher::MatcherConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::time::Duration;

/// Configuration for one scanner instance
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ScannerConfig {
    /// Phrase matcher settings
    pub matcher: MatcherConfig,
    /// Feedback cooldown in milliseconds
    pub feedback_cooldown_ms: u64,
    /// Whether live scanning evicts suppressed terms that left the frame
    pub evict_on_disappear: bool,
    /// Active locale ("en" or "ar"), selects the category set and script
    pub locale: String,
}

impl Default for ScannerConfig {
    fn default() -> Self {
        Self {
            matcher: MatcherConfig::default(),
            feedback_cooldown_ms: 1500,
            evict_on_disappear: true,
            locale: "en".to_string(),
        }
    }
}

impl ScannerConfig {
    /// Load configuration from environment variables, falling back to
    /// defaults for anything unset.
    pub fn from_env() -> AppResult<Self> {
        let mut config = Self::default();

        if let Ok(value) = env::var("SCANNER_MAX_PHRASE_LENGTH") {
            config.matcher.max_phrase_length = value.parse().map_err(|_| {
                AppError::Config("SCANNER_MAX_PHRASE_LENGTH must be a valid number".to_string())
            })?;
        }

        if let Ok(value) = env::var("SCANNER_FEEDBACK_COOLDOWN_MS") {
            config.feedback_cooldown_ms = value.parse().map_err(|_| {
                AppError::Config(
                    "SCANNER_FEEDBACK_COOLDOWN_MS must be a valid number of milliseconds"
                        .to_string(),
                )
            })?;
        }

        if let Ok(value) = env::var("SCANNER_EVICT_ON_DISAPPEAR") {
            config.evict_on_disappear = match value.as_str() {
                "true" | "1" => true,
                "false" | "0" => false,
                _ => {
                    return Err(AppError::Config(
                        "SCANNER_EVICT_ON_DISAPPEAR must be true or false".to_string(),
                    ))
                }
            };
        }

        if let Ok(value) = env::var("SCANNER_LOCALE") {
            config.locale = value;
        }

        config.validate()?;
        Ok(config)
    }

    /// Validate scanner configuration
    pub fn validate(&self) -> AppResult<()> {
        self.matcher.validate()?;

        if self.feedback_cooldown_ms == 0 {
            return Err(AppError::Config(
                "feedback_cooldown_ms cannot be 0".to_string(),
            ));
        }
        if self.feedback_cooldown_ms > 60_000 {
            return Err(AppError::Config(
                "feedback_cooldown_ms cannot be greater than 60000 (1 minute)".to_string(),
            ));
        }

        match self.locale.as_str() {
            "en" | "ar" => {}
            other => {
                return Err(AppError::Config(format!(
                    "locale '{}' is not supported (expected 'en' or 'ar')",
                    other
                )))
            }
        }

        Ok(())
    }

    /// The feedback cooldown as a `Duration`
    pub fn feedback_cooldown(&self) -> Duration {
        Duration::from_millis(self.feedback_cooldown_ms)
    }
}
