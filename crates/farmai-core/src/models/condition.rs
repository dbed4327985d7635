//! Disease/ailment reference records.

use serde::{Deserialize, Serialize};

/// A known disease or ailment for one subject type.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Condition {
    /// Identifier, unique within its subject type (e.g., "cow-mastitis")
    pub id: String,
    /// Display name
    pub name: String,
    /// Latin name, mostly for crop pathogens
    pub scientific_name: Option<String>,
    /// Expected symptoms, in display order
    pub symptoms: Vec<String>,
    /// Treatment steps, in display order
    pub treatment: Vec<String>,
    /// Prevention steps, in display order
    pub prevention: Vec<String>,
    /// Reference photo shown next to a result
    pub reference_image: Option<String>,
}

impl Condition {
    /// Create a condition with required fields.
    pub fn new(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            scientific_name: None,
            symptoms: Vec::new(),
            treatment: Vec::new(),
            prevention: Vec::new(),
            reference_image: None,
        }
    }

    pub fn with_scientific_name(mut self, scientific_name: &str) -> Self {
        self.scientific_name = Some(scientific_name.to_string());
        self
    }

    pub fn with_symptoms(mut self, symptoms: &[&str]) -> Self {
        self.symptoms = symptoms.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_treatment(mut self, steps: &[&str]) -> Self {
        self.treatment = steps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_prevention(mut self, steps: &[&str]) -> Self {
        self.prevention = steps.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn with_reference_image(mut self, url: &str) -> Self {
        self.reference_image = Some(url.to_string());
        self
    }

    /// Check whether this condition lists the given symptom (exact match).
    pub fn has_symptom(&self, symptom: &str) -> bool {
        self.symptoms.iter().any(|s| s == symptom)
    }
}
