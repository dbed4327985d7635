//! Diagnosis matcher.
//!
//! Two modes:
//! - Symptom checker: deterministic best-overlap scoring against the catalog
//! - Image analysis: delegated to an [`ImageClassifier`]
//!
//! Neither mode fails on "no match"; that is a normal result with no
//! condition. Only structurally invalid input is rejected.

mod classifier;
mod symptoms;

pub use classifier::*;
pub use symptoms::*;

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use thiserror::Error;

use crate::catalog::DiseaseCatalog;
use crate::config::{ConfigResult, FarmAiConfig};
use crate::models::{DiagnosisMode, DiagnosisResult, SubjectKind, SubjectType};

/// Matcher errors.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DiagnosisError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type DiagnosisOutcome<T> = Result<T, DiagnosisError>;

const NO_CATALOG_MESSAGE: &str = "No catalog entries for this subject.";

/// Entry point for both diagnosis modes.
#[derive(Clone)]
pub struct DiagnosisMatcher {
    catalog: Arc<DiseaseCatalog>,
    classifier: Arc<dyn ImageClassifier>,
    match_threshold: f64,
    analysis_delay: Duration,
}

impl DiagnosisMatcher {
    /// Matcher with the placeholder random image classifier.
    pub fn new(catalog: Arc<DiseaseCatalog>, config: &FarmAiConfig) -> ConfigResult<Self> {
        let classifier = RandomClassifier::new(config)?;
        Self::with_classifier(catalog, Arc::new(classifier), config)
    }

    /// Matcher with a caller-supplied image classifier. Rejects an invalid config.
    pub fn with_classifier(
        catalog: Arc<DiseaseCatalog>,
        classifier: Arc<dyn ImageClassifier>,
        config: &FarmAiConfig,
    ) -> ConfigResult<Self> {
        config.validate()?;
        Ok(Self {
            catalog,
            classifier,
            match_threshold: config.match_threshold,
            analysis_delay: config.analysis_delay(),
        })
    }

    pub fn catalog(&self) -> &DiseaseCatalog {
        &self.catalog
    }

    /// Diagnose from observed symptoms.
    pub fn diagnose_by_symptoms<S: AsRef<str>>(
        &self,
        subject: &str,
        observed: &[S],
    ) -> DiagnosisOutcome<DiagnosisResult> {
        let subject = parse_subject(subject)?;
        let conditions = self.catalog.lookup(&subject);

        if conditions.is_empty() {
            tracing::debug!(subject = %subject, "No catalog entries for symptom diagnosis");
            return Ok(DiagnosisResult::unmatched(
                subject,
                DiagnosisMode::Symptoms,
                0,
                NO_CATALOG_MESSAGE,
            ));
        }

        let observed = observation_set(observed);
        let best = best_match(conditions, &observed).filter(|b| b.passes(self.match_threshold));

        let result = match best {
            Some(best) => {
                tracing::info!(
                    subject = %subject,
                    condition = %best.condition.id,
                    confidence = best.confidence(),
                    "Symptom diagnosis matched"
                );
                DiagnosisResult::matched(
                    subject,
                    DiagnosisMode::Symptoms,
                    best.condition.clone(),
                    best.confidence(),
                    best.matched,
                )
            }
            None => {
                tracing::info!(subject = %subject, observed = observed.len(), "No clear symptom diagnosis");
                let message = no_diagnosis_message(self.catalog.kind_of(&subject));
                DiagnosisResult::unmatched(subject, DiagnosisMode::Symptoms, 0, message)
            }
        };

        Ok(result)
    }

    /// Diagnose from a photo. Requires a subject and an image reference.
    pub fn diagnose_by_image(&self, subject: &str, image_ref: &str) -> DiagnosisOutcome<DiagnosisResult> {
        let (subject, image_ref) = validate_image_input(subject, image_ref)?;
        Ok(classify_image(&self.catalog, self.classifier.as_ref(), subject, image_ref))
    }

    /// Validate now, deliver the image diagnosis later.
    ///
    /// Input errors are returned immediately. The returned future sleeps for
    /// the configured analysis delay (tokio timer) and then classifies;
    /// dropping it abandons the analysis. Must be polled inside a tokio
    /// runtime with the time driver enabled.
    pub fn begin_image_analysis(
        &self,
        subject: &str,
        image_ref: &str,
    ) -> DiagnosisOutcome<impl Future<Output = DiagnosisResult> + Send + 'static> {
        let (subject, image_ref) = validate_image_input(subject, image_ref)?;
        let catalog = Arc::clone(&self.catalog);
        let classifier = Arc::clone(&self.classifier);
        let delay = self.analysis_delay;

        tracing::debug!(subject = %subject, delay_ms = delay.as_millis() as u64, "Image analysis scheduled");

        Ok(async move {
            tokio::time::sleep(delay).await;
            classify_image(&catalog, classifier.as_ref(), subject, image_ref)
        })
    }
}

fn parse_subject(raw: &str) -> DiagnosisOutcome<SubjectType> {
    SubjectType::new(raw).ok_or_else(|| DiagnosisError::InvalidInput("subject type is required".into()))
}

fn validate_image_input(subject: &str, image_ref: &str) -> DiagnosisOutcome<(SubjectType, String)> {
    let subject = parse_subject(subject)?;
    let image_ref = image_ref.trim();
    if image_ref.is_empty() {
        return Err(DiagnosisError::InvalidInput("image reference is required".into()));
    }
    Ok((subject, image_ref.to_string()))
}

fn classify_image(
    catalog: &DiseaseCatalog,
    classifier: &dyn ImageClassifier,
    subject: SubjectType,
    image_ref: String,
) -> DiagnosisResult {
    let candidates = catalog.lookup(&subject);
    let kind = catalog.kind_of(&subject);
    let request = ImageRequest {
        subject: &subject,
        image_ref: &image_ref,
        candidates,
    };

    let result = match classifier.classify(&request) {
        Classification::Detected {
            condition_id,
            confidence,
        } => match candidates.iter().find(|c| c.id == condition_id) {
            Some(condition) => {
                tracing::info!(subject = %subject, condition = %condition_id, confidence, "Image diagnosis detected condition");
                DiagnosisResult::matched(
                    subject,
                    DiagnosisMode::Image,
                    condition.clone(),
                    confidence,
                    Vec::new(),
                )
            }
            None => {
                tracing::warn!(subject = %subject, condition = %condition_id, "Classifier returned a condition outside the catalog");
                DiagnosisResult::unmatched(subject, DiagnosisMode::Image, 0, no_diagnosis_message(kind))
            }
        },
        Classification::Healthy { confidence } => {
            tracing::info!(subject = %subject, confidence, "Image diagnosis found no disease");
            DiagnosisResult::unmatched(subject, DiagnosisMode::Image, confidence, healthy_message(kind))
        }
    };

    result.with_image(image_ref)
}

fn no_diagnosis_message(kind: Option<SubjectKind>) -> String {
    let who = kind.map(|k| k.professional()).unwrap_or("a professional");
    format!("No clear diagnosis found. Consider consulting {}.", who)
}

fn healthy_message(kind: Option<SubjectKind>) -> String {
    let noun = kind.map(|k| k.noun()).unwrap_or("Subject");
    format!("No diseases detected. {} appears healthy.", noun)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Condition;

    /// Always reports the last candidate with a fixed confidence.
    struct LastCandidate;

    impl ImageClassifier for LastCandidate {
        fn classify(&self, request: &ImageRequest<'_>) -> Classification {
            match request.candidates.last() {
                Some(c) => Classification::Detected {
                    condition_id: c.id.clone(),
                    confidence: 77,
                },
                None => Classification::Healthy { confidence: 95 },
            }
        }
    }

    struct Hallucinating;

    impl ImageClassifier for Hallucinating {
        fn classify(&self, _request: &ImageRequest<'_>) -> Classification {
            Classification::Detected {
                condition_id: "not-in-catalog".into(),
                confidence: 90,
            }
        }
    }

    fn catalog() -> Arc<DiseaseCatalog> {
        Arc::new(
            DiseaseCatalog::builder()
                .subject("cow", "Cow", SubjectKind::Animal)
                .subject("goat", "Goat", SubjectKind::Animal)
                .subject("tea", "Tea", SubjectKind::Crop)
                .condition(
                    "cow",
                    Condition::new("cow-mastitis", "Mastitis").with_symptoms(&[
                        "Swollen udder",
                        "Painful udder",
                        "Abnormal milk",
                        "Reduced milk",
                        "Fever",
                    ]),
                )
                .condition(
                    "cow",
                    Condition::new("cow-fmd", "Foot and Mouth Disease").with_symptoms(&[
                        "Fever",
                        "Blisters",
                        "Excessive salivation",
                        "Lameness",
                        "Reduced feed intake",
                    ]),
                )
                .build(),
        )
    }

    fn matcher() -> DiagnosisMatcher {
        let config = FarmAiConfig {
            analysis_delay_ms: 2000,
            ..FarmAiConfig::default()
        };
        DiagnosisMatcher::with_classifier(catalog(), Arc::new(LastCandidate), &config).unwrap()
    }

    #[test]
    fn test_symptoms_match() {
        let result = matcher()
            .diagnose_by_symptoms("cow", &["Swollen udder", "Painful udder"])
            .unwrap();
        assert_eq!(result.condition_name(), Some("Mastitis"));
        assert_eq!(result.confidence, 40);
        assert_eq!(result.matched_symptoms, vec!["Swollen udder", "Painful udder"]);
        assert_eq!(result.mode, DiagnosisMode::Symptoms);
        assert!(result.message.is_none());
    }

    #[test]
    fn test_symptoms_below_threshold() {
        let result = matcher().diagnose_by_symptoms("cow", &["Fever"]).unwrap();
        assert!(result.condition.is_none());
        assert_eq!(
            result.message.as_deref(),
            Some("No clear diagnosis found. Consider consulting a veterinarian.")
        );
    }

    #[test]
    fn test_symptoms_empty_catalog() {
        let result = matcher().diagnose_by_symptoms("goat", &["Fever"]).unwrap();
        assert!(result.condition.is_none());
        assert_eq!(result.message.as_deref(), Some(NO_CATALOG_MESSAGE));
    }

    #[test]
    fn test_symptoms_subject_is_normalized() {
        let result = matcher()
            .diagnose_by_symptoms(" COW ", &["Swollen udder", "Painful udder"])
            .unwrap();
        assert_eq!(result.subject.as_str(), "cow");
        assert!(result.has_condition());
    }

    #[test]
    fn test_symptoms_blank_subject_rejected() {
        let err = matcher().diagnose_by_symptoms("  ", &["Fever"]).unwrap_err();
        assert!(matches!(err, DiagnosisError::InvalidInput(_)));
    }

    #[test]
    fn test_no_observed_symptoms_is_not_an_error() {
        let observed: [&str; 0] = [];
        let result = matcher().diagnose_by_symptoms("cow", &observed).unwrap();
        assert!(result.condition.is_none());
    }

    #[test]
    fn test_image_uses_classifier() {
        let result = matcher().diagnose_by_image("cow", "file:///cow.jpg").unwrap();
        assert_eq!(result.condition_name(), Some("Foot and Mouth Disease"));
        assert_eq!(result.confidence, 77);
        assert_eq!(result.mode, DiagnosisMode::Image);
        assert_eq!(result.image_ref.as_deref(), Some("file:///cow.jpg"));
        assert!(result.matched_symptoms.is_empty());
    }

    #[test]
    fn test_image_empty_catalog_is_healthy() {
        let result = matcher().diagnose_by_image("tea", "leaf.jpg").unwrap();
        assert!(result.condition.is_none());
        assert_eq!(result.confidence, 95);
        assert_eq!(
            result.message.as_deref(),
            Some("No diseases detected. Plant appears healthy.")
        );
    }

    #[test]
    fn test_image_requires_subject_and_image() {
        let m = matcher();
        assert!(matches!(
            m.diagnose_by_image("", "leaf.jpg"),
            Err(DiagnosisError::InvalidInput(_))
        ));
        assert!(matches!(
            m.diagnose_by_image("cow", "   "),
            Err(DiagnosisError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_image_unknown_condition_from_classifier() {
        let m = DiagnosisMatcher::with_classifier(catalog(), Arc::new(Hallucinating), &FarmAiConfig::default()).unwrap();
        let result = m.diagnose_by_image("cow", "cow.jpg").unwrap();
        assert!(result.condition.is_none());
        assert!(result.message.is_some());
    }

    #[test]
    fn test_random_classifier_stays_in_catalog() {
        let m = DiagnosisMatcher::new(catalog(), &FarmAiConfig::default()).unwrap();
        for _ in 0..50 {
            let result = m.diagnose_by_image("cow", "cow.jpg").unwrap();
            assert!(result.has_condition());
            assert!((70..=99).contains(&result.confidence));
        }
    }

    #[test]
    fn test_inverted_confidence_range_rejected() {
        let config = FarmAiConfig {
            image_confidence_min: 99,
            image_confidence_max: 70,
            ..FarmAiConfig::default()
        };
        assert!(DiagnosisMatcher::new(catalog(), &config).is_err());
        assert!(DiagnosisMatcher::with_classifier(catalog(), Arc::new(LastCandidate), &config).is_err());
    }

    #[test]
    fn test_deferred_analysis_validates_eagerly() {
        let m = matcher();
        assert!(m.begin_image_analysis("cow", "").is_err());
        assert!(m.begin_image_analysis("", "cow.jpg").is_err());
    }

    #[tokio::test(start_paused = true)]
    async fn test_deferred_analysis_waits_for_delay() {
        let m = matcher();
        let pending = m.begin_image_analysis("cow", "cow.jpg").unwrap();

        let started = tokio::time::Instant::now();
        let result = pending.await;

        assert!(started.elapsed() >= Duration::from_millis(2000));
        assert_eq!(result.condition_name(), Some("Foot and Mouth Disease"));
        assert_eq!(result.image_ref.as_deref(), Some("cow.jpg"));
    }
}
