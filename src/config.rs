//! Board assembly configuration.

use derive_getters::Getters;
use derive_more::{Display, Error};
use derive_setters::Setters;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;
use strictly_trivia_core::BoardShape;
use tracing::{debug, info, instrument};

/// Environment variable that overrides [`TriviaConfig::base_url`].
pub const BASE_URL_ENV: &str = "TRIVIA_BASE_URL";

/// Configuration for board assembly and the trivia source.
#[derive(Debug, Clone, PartialEq, Getters, Setters, Serialize, Deserialize)]
#[setters(prefix = "with_")]
pub struct TriviaConfig {
    /// Base URL of the Open Trivia DB compatible API.
    #[serde(default = "default_base_url")]
    #[setters(into)]
    base_url: String,

    /// Categories per board (K).
    #[serde(default = "default_categories_per_board")]
    categories_per_board: usize,

    /// Clues per category (N).
    #[serde(default = "default_clues_per_category")]
    clues_per_category: usize,

    /// Attempts before giving up on a board.
    #[serde(default = "default_max_attempts")]
    max_attempts: u32,

    /// Pause between attempts, in milliseconds.
    #[serde(default = "default_retry_delay_ms")]
    retry_delay_ms: u64,

    /// Questions requested per clue needed.
    #[serde(default = "default_overfetch_factor")]
    overfetch_factor: usize,

    /// Multiply the overfetch factor by the attempt number.
    #[serde(default)]
    escalate_overfetch: bool,

    /// Largest page the source will serve in one request.
    #[serde(default = "default_max_fetch")]
    max_fetch: usize,

    /// HTTP request timeout, in seconds.
    #[serde(default = "default_request_timeout_secs")]
    request_timeout_secs: u64,

    /// Minimum spacing between source requests, in milliseconds.
    #[serde(default = "default_min_request_interval_ms")]
    min_request_interval_ms: u64,

    /// Seed for category sampling; random when absent.
    #[serde(default)]
    #[setters(strip_option)]
    seed: Option<u64>,
}

fn default_base_url() -> String {
    "https://opentdb.com".to_string()
}

fn default_categories_per_board() -> usize {
    6
}

fn default_clues_per_category() -> usize {
    5
}

fn default_max_attempts() -> u32 {
    5
}

fn default_retry_delay_ms() -> u64 {
    1000
}

fn default_overfetch_factor() -> usize {
    2
}

fn default_max_fetch() -> usize {
    50
}

fn default_request_timeout_secs() -> u64 {
    10
}

// Open Trivia DB allows one request every five seconds per client.
fn default_min_request_interval_ms() -> u64 {
    5000
}

impl Default for TriviaConfig {
    fn default() -> Self {
        Self {
            base_url: default_base_url(),
            categories_per_board: default_categories_per_board(),
            clues_per_category: default_clues_per_category(),
            max_attempts: default_max_attempts(),
            retry_delay_ms: default_retry_delay_ms(),
            overfetch_factor: default_overfetch_factor(),
            escalate_overfetch: false,
            max_fetch: default_max_fetch(),
            request_timeout_secs: default_request_timeout_secs(),
            min_request_interval_ms: default_min_request_interval_ms(),
            seed: None,
        }
    }
}

impl TriviaConfig {
    /// Loads configuration from a TOML file and validates it.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        debug!("Loading config from file");
        let content = std::fs::read_to_string(path.as_ref())
            .map_err(|e| ConfigError::new(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| ConfigError::new(format!("Failed to parse config: {}", e)))?;

        config.validate()?;
        info!(shape = %config.shape(), "Config loaded successfully");
        Ok(config)
    }

    /// Loads `path` if it exists, otherwise defaults, then applies
    /// [`BASE_URL_ENV`] if set.
    #[instrument(skip(path), fields(path = %path.as_ref().display()))]
    pub fn load_or_default(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let mut config = if path.as_ref().exists() {
            Self::from_file(path)?
        } else {
            info!("Config file not found, using defaults");
            Self::default()
        };

        if let Ok(url) = std::env::var(BASE_URL_ENV) {
            info!(%url, "Overriding base URL from environment");
            config.base_url = url;
        }

        Ok(config)
    }

    /// Checks that the numbers describe a board that can be assembled.
    #[instrument(skip(self))]
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.categories_per_board == 0 {
            return Err(ConfigError::new("categories_per_board must be at least 1".to_string()));
        }
        if self.clues_per_category == 0 {
            return Err(ConfigError::new("clues_per_category must be at least 1".to_string()));
        }
        if self.max_attempts == 0 {
            return Err(ConfigError::new("max_attempts must be at least 1".to_string()));
        }
        if self.overfetch_factor < 2 {
            return Err(ConfigError::new(format!(
                "overfetch_factor must be at least 2, got {}",
                self.overfetch_factor
            )));
        }
        if self.max_fetch <= self.clues_per_category {
            return Err(ConfigError::new(format!(
                "max_fetch ({}) must exceed clues_per_category ({})",
                self.max_fetch, self.clues_per_category
            )));
        }
        Ok(())
    }

    /// Board dimensions described by this config.
    pub fn shape(&self) -> BoardShape {
        BoardShape::new(self.categories_per_board, self.clues_per_category)
    }

    /// Pause between attempts.
    pub fn retry_delay(&self) -> Duration {
        Duration::from_millis(self.retry_delay_ms)
    }

    /// HTTP request timeout.
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Minimum spacing between source requests.
    pub fn min_request_interval(&self) -> Duration {
        Duration::from_millis(self.min_request_interval_ms)
    }

    /// Number of questions to request for one category on the given attempt.
    ///
    /// Always strictly more than [`clues_per_category`](Self::clues_per_category)
    /// and never more than [`max_fetch`](Self::max_fetch).
    pub fn fetch_count(&self, attempt: u32) -> usize {
        let factor = if self.escalate_overfetch {
            self.overfetch_factor * attempt.max(1) as usize
        } else {
            self.overfetch_factor
        };
        (self.clues_per_category * factor)
            .min(self.max_fetch)
            .max(self.clues_per_category + 1)
    }
}

/// Configuration error.
#[derive(Debug, Clone, Display, Error)]
#[display("Config error: {} at {}:{}", message, file, line)]
pub struct ConfigError {
    /// Error message.
    pub message: String,
    /// Line number where error occurred.
    pub line: u32,
    /// Source file where error occurred.
    pub file: &'static str,
}

impl ConfigError {
    /// Creates a new configuration error.
    #[track_caller]
    #[instrument(skip(message))]
    pub fn new(message: String) -> Self {
        let loc = std::panic::Location::caller();
        Self {
            message,
            line: loc.line(),
            file: loc.file(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_board() {
        let config = TriviaConfig::default();
        assert_eq!(config.shape(), BoardShape::new(6, 5));
        assert_eq!(*config.max_attempts(), 5);
        assert_eq!(config.retry_delay(), Duration::from_millis(1000));
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fetch_count_doubles_required() {
        let config = TriviaConfig::default();
        assert_eq!(config.fetch_count(1), 10);
        assert_eq!(config.fetch_count(3), 10);
    }

    #[test]
    fn test_fetch_count_escalates_and_caps() {
        let config = TriviaConfig::default().with_escalate_overfetch(true);
        assert_eq!(config.fetch_count(1), 10);
        assert_eq!(config.fetch_count(2), 20);
        assert_eq!(config.fetch_count(9), 50);
    }

    #[test]
    fn test_fetch_count_stays_above_required_when_capped() {
        let config = TriviaConfig::default()
            .with_clues_per_category(30)
            .with_max_fetch(31);
        assert!(config.validate().is_ok());
        assert_eq!(config.fetch_count(1), 31);
    }

    #[test]
    fn test_validate_rejects_single_overfetch() {
        let config = TriviaConfig::default().with_overfetch_factor(1);
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_rejects_zero_attempts() {
        let config = TriviaConfig::default().with_max_attempts(0);
        assert!(config.validate().is_err());
    }
}
