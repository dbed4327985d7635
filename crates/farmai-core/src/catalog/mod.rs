//! Disease catalog: static reference data keyed by subject type.
//!
//! Conditions keep their catalog order, which the matcher relies on for
//! tie-breaking. Unknown subjects are not an error; they simply have no
//! conditions.

mod builtin;

use std::collections::{HashMap, HashSet};

use strsim::{jaro_winkler, normalized_levenshtein};

use crate::models::{Condition, SubjectInfo, SubjectKind, SubjectType};

/// Minimum similarity for a fuzzy autocomplete hit.
const FUZZY_FLOOR: f64 = 0.80;

/// Immutable catalog of conditions per subject type.
#[derive(Debug, Clone, Default)]
pub struct DiseaseCatalog {
    subjects: Vec<SubjectInfo>,
    entries: Vec<(SubjectType, Vec<Condition>)>,
    index: HashMap<SubjectType, usize>,
}

impl DiseaseCatalog {
    /// Start an empty catalog.
    pub fn builder() -> CatalogBuilder {
        CatalogBuilder::default()
    }

    /// The catalog shipped with the app.
    pub fn builtin() -> Self {
        builtin::catalog()
    }

    /// Conditions for a subject, in catalog order. Empty for unknown subjects.
    pub fn lookup(&self, subject: &SubjectType) -> &[Condition] {
        self.index
            .get(subject)
            .map(|&i| self.entries[i].1.as_slice())
            .unwrap_or(&[])
    }

    /// Find a condition by display name (used to rehydrate history entries).
    pub fn find_condition(&self, subject: &SubjectType, name: &str) -> Option<&Condition> {
        self.lookup(subject).iter().find(|c| c.name == name)
    }

    /// Selectable subjects, including those with no conditions yet.
    pub fn subjects(&self) -> &[SubjectInfo] {
        &self.subjects
    }

    pub fn subject_info(&self, subject: &SubjectType) -> Option<&SubjectInfo> {
        self.subjects.iter().find(|s| &s.subject == subject)
    }

    /// Crop or animal, if the subject is registered.
    pub fn kind_of(&self, subject: &SubjectType) -> Option<SubjectKind> {
        self.subject_info(subject).map(|s| s.kind)
    }

    /// Union of all symptoms across all subjects, first-seen order, no duplicates.
    pub fn symptom_vocabulary(&self) -> Vec<String> {
        let mut seen = HashSet::new();
        self.entries
            .iter()
            .flat_map(|(_, conditions)| conditions.iter())
            .flat_map(|c| c.symptoms.iter())
            .filter(|s| seen.insert(s.as_str()))
            .cloned()
            .collect()
    }

    /// Autocomplete over the symptom vocabulary.
    ///
    /// Case-insensitive substring hits come first in vocabulary order, then
    /// fuzzy hits by descending similarity.
    pub fn search_symptoms(&self, query: &str, limit: usize) -> Vec<String> {
        let vocabulary = self.symptom_vocabulary();
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return vocabulary.into_iter().take(limit).collect();
        }

        let mut exact = Vec::new();
        let mut fuzzy = Vec::new();
        for term in vocabulary {
            let lower = term.to_lowercase();
            if lower.contains(&query) {
                exact.push(term);
                continue;
            }
            let score = best_similarity(&query, &lower);
            if score >= FUZZY_FLOOR {
                fuzzy.push((term, score));
            }
        }

        fuzzy.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));

        exact
            .into_iter()
            .chain(fuzzy.into_iter().map(|(term, _)| term))
            .take(limit)
            .collect()
    }

    pub fn condition_count(&self) -> usize {
        self.entries.iter().map(|(_, c)| c.len()).sum()
    }
}

/// Builder for [`DiseaseCatalog`].
#[derive(Debug, Default)]
pub struct CatalogBuilder {
    catalog: DiseaseCatalog,
}

impl CatalogBuilder {
    /// Register a selectable subject. Re-registering replaces label and kind.
    pub fn subject(mut self, key: &str, label: &str, kind: SubjectKind) -> Self {
        let Some(subject) = SubjectType::new(key) else {
            tracing::warn!("Ignoring blank subject key in catalog");
            return self;
        };
        let info = SubjectInfo {
            subject: subject.clone(),
            label: label.to_string(),
            kind,
        };
        match self.catalog.subjects.iter_mut().find(|s| s.subject == subject) {
            Some(existing) => *existing = info,
            None => self.catalog.subjects.push(info),
        }
        self
    }

    /// Append a condition to a subject. A condition with the same ID replaces
    /// the earlier one in place.
    pub fn condition(mut self, key: &str, condition: Condition) -> Self {
        let Some(subject) = SubjectType::new(key) else {
            tracing::warn!(condition = %condition.id, "Ignoring condition with blank subject key");
            return self;
        };
        let catalog = &mut self.catalog;
        let slot = match catalog.index.get(&subject) {
            Some(&i) => i,
            None => {
                catalog.entries.push((subject.clone(), Vec::new()));
                catalog.index.insert(subject, catalog.entries.len() - 1);
                catalog.entries.len() - 1
            }
        };
        let conditions = &mut catalog.entries[slot].1;
        match conditions.iter_mut().find(|c| c.id == condition.id) {
            Some(existing) => *existing = condition,
            None => conditions.push(condition),
        }
        self
    }

    pub fn build(self) -> DiseaseCatalog {
        self.catalog
    }
}

/// Best fuzzy similarity between the query and the term or any of its words.
fn best_similarity(query: &str, term: &str) -> f64 {
    std::iter::once(term)
        .chain(term.split(|c: char| !c.is_alphanumeric()).filter(|w| !w.is_empty()))
        .map(|candidate| fuzzy_match(query, candidate))
        .fold(0.0, f64::max)
}

/// Combined Jaro-Winkler (typos, prefixes) and Levenshtein (overall) similarity.
fn fuzzy_match(a: &str, b: &str) -> f64 {
    jaro_winkler(a, b) * 0.6 + normalized_levenshtein(a, b) * 0.4
}
