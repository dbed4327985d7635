//! Runtime configuration (TOML).
//!
//! ```toml
//! match_threshold = 0.3
//! image_confidence_min = 70
//! image_confidence_max = 99
//! healthy_confidence = 95
//! analysis_delay_ms = 2000
//! symptom_search_limit = 20
//! ```
//!
//! Every key is optional; missing keys take the defaults above.

use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Tunables for the diagnosis matcher and the host-facing API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FarmAiConfig {
    /// Minimum match score for the symptom checker to name a condition
    pub match_threshold: f64,
    /// Lower bound (inclusive) of the image classifier confidence
    pub image_confidence_min: u8,
    /// Upper bound (inclusive) of the image classifier confidence
    pub image_confidence_max: u8,
    /// Confidence reported for a "healthy" image result
    pub healthy_confidence: u8,
    /// Simulated analysis latency for deferred image analysis
    pub analysis_delay_ms: u64,
    /// Default number of autocomplete suggestions
    pub symptom_search_limit: usize,
}

impl Default for FarmAiConfig {
    fn default() -> Self {
        Self {
            match_threshold: 0.3,
            image_confidence_min: 70,
            image_confidence_max: 99,
            healthy_confidence: 95,
            analysis_delay_ms: 2000,
            symptom_search_limit: 20,
        }
    }
}

impl FarmAiConfig {
    /// Parse and validate a TOML document.
    pub fn from_toml_str(source: &str) -> ConfigResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Read, parse and validate a TOML file.
    pub fn load<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let source = std::fs::read_to_string(path.as_ref())?;
        tracing::debug!(path = %path.as_ref().display(), "Loading config");
        Self::from_toml_str(&source)
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.match_threshold > 0.0 && self.match_threshold <= 1.0) {
            return Err(ConfigError::Invalid(format!(
                "match_threshold must be in (0, 1], got {}",
                self.match_threshold
            )));
        }
        if self.image_confidence_min > self.image_confidence_max {
            return Err(ConfigError::Invalid(format!(
                "image_confidence_min ({}) exceeds image_confidence_max ({})",
                self.image_confidence_min, self.image_confidence_max
            )));
        }
        if self.image_confidence_max > 100 || self.healthy_confidence > 100 {
            return Err(ConfigError::Invalid("confidence values must be at most 100".into()));
        }
        Ok(())
    }

    pub fn analysis_delay(&self) -> Duration {
        Duration::from_millis(self.analysis_delay_ms)
    }
}
