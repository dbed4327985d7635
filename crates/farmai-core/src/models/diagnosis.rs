//! Diagnosis results produced by the matcher.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::condition::Condition;
use super::subject::SubjectType;

/// How a diagnosis was obtained.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DiagnosisMode {
    /// Symptom checker (deterministic overlap scoring)
    Symptoms,
    /// Photo analysis (classifier)
    Image,
}

/// Result of one diagnosis invocation.
///
/// Immutable once created. The only allowed change is flagging it as saved,
/// which produces a copy via [`DiagnosisResult::mark_saved`].
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DiagnosisResult {
    /// Scan ID, reused as the history entry ID
    pub id: String,
    pub subject: SubjectType,
    pub mode: DiagnosisMode,
    /// Winning condition, `None` when healthy or inconclusive
    pub condition: Option<Condition>,
    /// Confidence score (0 - 100)
    pub confidence: u8,
    /// Observed symptoms that matched the winning condition (symptom mode)
    pub matched_symptoms: Vec<String>,
    /// Explanation shown when there is no condition
    pub message: Option<String>,
    pub created_at: DateTime<Utc>,
    /// Associated photo (image mode)
    pub image_ref: Option<String>,
    pub saved: bool,
}

impl DiagnosisResult {
    /// Create a result that names a condition.
    pub fn matched(
        subject: SubjectType,
        mode: DiagnosisMode,
        condition: Condition,
        confidence: u8,
        matched_symptoms: Vec<String>,
    ) -> Self {
        Self {
            id: new_scan_id(),
            subject,
            mode,
            condition: Some(condition),
            confidence: confidence.min(100),
            matched_symptoms,
            message: None,
            created_at: Utc::now(),
            image_ref: None,
            saved: false,
        }
    }

    /// Create a result with no condition and an explanatory message.
    pub fn unmatched(
        subject: SubjectType,
        mode: DiagnosisMode,
        confidence: u8,
        message: impl Into<String>,
    ) -> Self {
        Self {
            id: new_scan_id(),
            subject,
            mode,
            condition: None,
            confidence: confidence.min(100),
            matched_symptoms: Vec::new(),
            message: Some(message.into()),
            created_at: Utc::now(),
            image_ref: None,
            saved: false,
        }
    }

    /// Attach the analysed image.
    pub fn with_image(mut self, image_ref: impl Into<String>) -> Self {
        self.image_ref = Some(image_ref.into());
        self
    }

    /// Return a copy flagged as saved.
    pub fn mark_saved(&self) -> Self {
        Self {
            saved: true,
            ..self.clone()
        }
    }

    /// Name of the winning condition, if any.
    pub fn condition_name(&self) -> Option<&str> {
        self.condition.as_ref().map(|c| c.name.as_str())
    }

    pub fn has_condition(&self) -> bool {
        self.condition.is_some()
    }
}

/// Generate a scan ID: creation time in milliseconds plus a random suffix.
pub fn new_scan_id() -> String {
    let suffix = uuid::Uuid::new_v4().simple().to_string();
    format!("scan-{}-{}", Utc::now().timestamp_millis(), &suffix[..8])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cow() -> SubjectType {
        SubjectType::new("cow").unwrap()
    }

    #[test]
    fn test_mark_saved_is_copy_on_write() {
        let result = DiagnosisResult::unmatched(cow(), DiagnosisMode::Symptoms, 0, "none");
        let saved = result.mark_saved();

        assert!(!result.saved);
        assert!(saved.saved);
        assert_eq!(saved.id, result.id);
        assert_eq!(saved.created_at, result.created_at);
    }

    #[test]
    fn test_confidence_is_capped() {
        let condition = Condition::new("c", "C");
        let result = DiagnosisResult::matched(cow(), DiagnosisMode::Image, condition, 250, vec![]);
        assert_eq!(result.confidence, 100);
        assert_eq!(result.condition_name(), Some("C"));
    }

    #[test]
    fn test_scan_ids_are_distinct() {
        let a = new_scan_id();
        let b = new_scan_id();
        assert!(a.starts_with("scan-"));
        assert_ne!(a, b);
    }
}
