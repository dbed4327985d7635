//! Subject types (crop or animal species) that select a catalog subset.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Normalized subject key (trimmed, lowercase, never empty).
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct SubjectType(String);

impl SubjectType {
    /// Normalize a raw key. Returns `None` for empty or blank input.
    pub fn new(raw: &str) -> Option<Self> {
        let key = raw.trim().to_lowercase();
        if key.is_empty() {
            None
        } else {
            Some(Self(key))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SubjectType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl TryFrom<String> for SubjectType {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        SubjectType::new(&value).ok_or_else(|| "subject type must not be empty".to_string())
    }
}

impl From<SubjectType> for String {
    fn from(subject: SubjectType) -> Self {
        subject.0
    }
}

/// Whether a subject is a crop or a livestock species.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SubjectKind {
    Crop,
    Animal,
}

impl SubjectKind {
    /// Who to consult when the matcher cannot decide.
    pub fn professional(&self) -> &'static str {
        match self {
            Self::Crop => "an agronomist",
            Self::Animal => "a veterinarian",
        }
    }

    /// Noun used in "appears healthy" messages.
    pub fn noun(&self) -> &'static str {
        match self {
            Self::Crop => "Plant",
            Self::Animal => "Animal",
        }
    }
}

/// A selectable subject option.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SubjectInfo {
    pub subject: SubjectType,
    /// Display label (e.g., "Maize")
    pub label: String,
    pub kind: SubjectKind,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalization() {
        let subject = SubjectType::new("  Cow ").unwrap();
        assert_eq!(subject.as_str(), "cow");
        assert_eq!(subject, SubjectType::new("COW").unwrap());
    }

    #[test]
    fn test_blank_is_rejected() {
        assert!(SubjectType::new("").is_none());
        assert!(SubjectType::new("   ").is_none());
    }

    #[test]
    fn test_serde_as_plain_string() {
        let subject = SubjectType::new("Maize").unwrap();
        let json = serde_json::to_string(&subject).unwrap();
        assert_eq!(json, "\"maize\"");

        let back: SubjectType = serde_json::from_str(&json).unwrap();
        assert_eq!(back, subject);

        assert!(serde_json::from_str::<SubjectType>("\"  \"").is_err());
    }
}
