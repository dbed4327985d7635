//! Image classification seam.
//!
//! The shipped [`RandomClassifier`] is a placeholder: it picks a catalog
//! condition uniformly at random. A real model only has to implement
//! [`ImageClassifier`]; callers of the matcher do not change.

use std::ops::RangeInclusive;
use std::sync::Mutex;

use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::config::{ConfigResult, FarmAiConfig};
use crate::models::{Condition, SubjectType};

/// Input handed to a classifier.
#[derive(Debug, Clone, Copy)]
pub struct ImageRequest<'a> {
    pub subject: &'a SubjectType,
    /// Opaque reference to the photo (URI, file path, blob key)
    pub image_ref: &'a str,
    /// Conditions the catalog knows for the subject, in catalog order
    pub candidates: &'a [Condition],
}

/// Classifier verdict.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Classification {
    /// A catalog condition was detected
    Detected { condition_id: String, confidence: u8 },
    /// Nothing detected
    Healthy { confidence: u8 },
}

/// Maps a photo of a subject to a condition.
pub trait ImageClassifier: Send + Sync {
    fn classify(&self, request: &ImageRequest<'_>) -> Classification;
}

/// Placeholder classifier: uniform choice over the candidates, uniform
/// confidence within the configured range.
pub struct RandomClassifier {
    rng: Mutex<StdRng>,
    confidence: RangeInclusive<u8>,
    healthy_confidence: u8,
}

impl RandomClassifier {
    /// Classifier seeded from OS entropy.
    pub fn new(config: &FarmAiConfig) -> ConfigResult<Self> {
        Self::with_rng(config, StdRng::from_entropy())
    }

    /// Reproducible classifier for tests and demos.
    pub fn seeded(config: &FarmAiConfig, seed: u64) -> ConfigResult<Self> {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    // The confidence range must be non-empty before it reaches gen_range.
    fn with_rng(config: &FarmAiConfig, rng: StdRng) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            rng: Mutex::new(rng),
            confidence: config.image_confidence_min..=config.image_confidence_max,
            healthy_confidence: config.healthy_confidence,
        })
    }
}

impl ImageClassifier for RandomClassifier {
    fn classify(&self, request: &ImageRequest<'_>) -> Classification {
        // A poisoned RNG is still a usable RNG.
        let mut rng = self.rng.lock().unwrap_or_else(|e| e.into_inner());

        match request.candidates.choose(&mut *rng) {
            Some(condition) => Classification::Detected {
                condition_id: condition.id.clone(),
                confidence: rng.gen_range(self.confidence.clone()),
            },
            None => Classification::Healthy {
                confidence: self.healthy_confidence,
            },
        }
    }
}
