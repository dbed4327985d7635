//! Scan history entries (persisted projection of a diagnosis).

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::diagnosis::{DiagnosisMode, DiagnosisResult};
use super::subject::SubjectType;

/// One past diagnosis in a user's scan history.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScanHistoryEntry {
    /// Unique, stable ID. Blank means "not yet assigned"; the store fills it in.
    pub id: String,
    pub subject: SubjectType,
    pub mode: DiagnosisMode,
    /// Diagnosed condition name, `None` for healthy/inconclusive
    pub condition_name: Option<String>,
    pub confidence: u8,
    pub timestamp: DateTime<Utc>,
    pub image_ref: Option<String>,
    pub saved: bool,
}

impl ScanHistoryEntry {
    /// Create an entry without an ID, stamped now.
    pub fn new(subject: SubjectType, mode: DiagnosisMode, condition_name: Option<String>, confidence: u8) -> Self {
        Self {
            id: String::new(),
            subject,
            mode,
            condition_name,
            confidence,
            timestamp: Utc::now(),
            image_ref: None,
            saved: false,
        }
    }

    pub fn has_id(&self) -> bool {
        !self.id.trim().is_empty()
    }

    /// Healthy or inconclusive scan.
    pub fn is_healthy(&self) -> bool {
        self.condition_name.is_none()
    }
}

impl From<&DiagnosisResult> for ScanHistoryEntry {
    fn from(result: &DiagnosisResult) -> Self {
        Self {
            id: result.id.clone(),
            subject: result.subject.clone(),
            mode: result.mode,
            condition_name: result.condition_name().map(str::to_string),
            confidence: result.confidence,
            timestamp: result.created_at,
            image_ref: result.image_ref.clone(),
            saved: result.saved,
        }
    }
}
