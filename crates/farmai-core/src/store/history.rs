//! User-scoped scan history.

use super::{get_json, require_user, set_json, KeyValueStore, StoreResult};
use crate::models::{new_scan_id, DiagnosisResult, ScanHistoryEntry};

/// Key prefix for per-user scan history arrays.
pub const SCAN_HISTORY_PREFIX: &str = "scanHistory-";

/// Append-only (plus explicit delete) log of a user's past diagnoses.
pub struct ScanHistoryStore<'a> {
    kv: &'a dyn KeyValueStore,
}

impl<'a> ScanHistoryStore<'a> {
    pub fn new(kv: &'a dyn KeyValueStore) -> Self {
        Self { kv }
    }

    fn key(user_id: &str) -> StoreResult<String> {
        Ok(format!("{}{}", SCAN_HISTORY_PREFIX, require_user(user_id)?))
    }

    fn load(&self, key: &str) -> StoreResult<Vec<ScanHistoryEntry>> {
        Ok(get_json(self.kv, key)?.unwrap_or_default())
    }

    /// Store an entry, assigning an ID when it has none.
    ///
    /// An entry whose ID is already present replaces the old one.
    pub fn append(&self, user_id: &str, mut entry: ScanHistoryEntry) -> StoreResult<ScanHistoryEntry> {
        let key = Self::key(user_id)?;
        if !entry.has_id() {
            entry.id = new_scan_id();
        }

        let mut entries = self.load(&key)?;
        entries.retain(|e| e.id != entry.id);
        entries.insert(0, entry.clone());
        set_json(self.kv, &key, &entries)?;

        tracing::info!(user = user_id, entry = %entry.id, total = entries.len(), "Appended scan history entry");
        Ok(entry)
    }

    /// Project a diagnosis into the history.
    pub fn record(&self, user_id: &str, result: &DiagnosisResult) -> StoreResult<ScanHistoryEntry> {
        self.append(user_id, ScanHistoryEntry::from(result))
    }

    /// All entries, newest first.
    pub fn list(&self, user_id: &str) -> StoreResult<Vec<ScanHistoryEntry>> {
        let key = Self::key(user_id)?;
        let mut entries = self.load(&key)?;
        // Stable: equal timestamps keep most-recently-appended first.
        entries.sort_by(|a, b| b.timestamp.cmp(&a.timestamp));
        Ok(entries)
    }

    pub fn get(&self, user_id: &str, entry_id: &str) -> StoreResult<Option<ScanHistoryEntry>> {
        let key = Self::key(user_id)?;
        Ok(self.load(&key)?.into_iter().find(|e| e.id == entry_id))
    }

    /// Delete an entry. Missing IDs are a no-op; returns whether one was removed.
    pub fn remove(&self, user_id: &str, entry_id: &str) -> StoreResult<bool> {
        let key = Self::key(user_id)?;
        let mut entries = self.load(&key)?;
        let before = entries.len();
        entries.retain(|e| e.id != entry_id);

        if entries.len() == before {
            return Ok(false);
        }
        set_json(self.kv, &key, &entries)?;
        tracing::info!(user = user_id, entry = entry_id, "Removed scan history entry");
        Ok(true)
    }

    /// Flag an entry as saved. Returns whether the entry exists.
    pub fn mark_saved(&self, user_id: &str, entry_id: &str) -> StoreResult<bool> {
        let key = Self::key(user_id)?;
        let mut entries = self.load(&key)?;

        let Some(entry) = entries.iter_mut().find(|e| e.id == entry_id) else {
            return Ok(false);
        };
        if !entry.saved {
            entry.saved = true;
            set_json(self.kv, &key, &entries)?;
            tracing::info!(user = user_id, entry = entry_id, "Marked scan as saved");
        }
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, Utc};

    use super::*;
    use crate::models::{DiagnosisMode, SubjectType};
    use crate::store::testing::FailingStore;
    use crate::store::{MemoryStore, StoreError};

    fn entry(condition: Option<&str>) -> ScanHistoryEntry {
        ScanHistoryEntry::new(
            SubjectType::new("maize").unwrap(),
            DiagnosisMode::Image,
            condition.map(str::to_string),
            81,
        )
    }

    #[test]
    fn test_append_assigns_id() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);

        let stored = history.append("u1", entry(Some("Common Rust"))).unwrap();
        assert!(stored.id.starts_with("scan-"));
        assert_eq!(history.list("u1").unwrap(), vec![stored]);
    }

    #[test]
    fn test_append_keeps_existing_id() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);

        let mut e = entry(None);
        e.id = "scan-fixed".into();
        let stored = history.append("u1", e).unwrap();
        assert_eq!(stored.id, "scan-fixed");
    }

    #[test]
    fn test_same_id_replaces() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);

        let mut first = entry(None);
        first.id = "scan-1".into();
        history.append("u1", first.clone()).unwrap();

        first.confidence = 12;
        history.append("u1", first).unwrap();

        let listed = history.list("u1").unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].confidence, 12);
    }

    #[test]
    fn test_list_newest_first() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);
        let now = Utc::now();

        let mut old = entry(Some("Old"));
        old.timestamp = now - Duration::hours(2);
        let mut new = entry(Some("New"));
        new.timestamp = now;
        let mut middle = entry(Some("Middle"));
        middle.timestamp = now - Duration::hours(1);

        // Appended out of chronological order on purpose
        history.append("u1", new).unwrap();
        history.append("u1", old).unwrap();
        history.append("u1", middle).unwrap();

        let names: Vec<_> = history
            .list("u1")
            .unwrap()
            .into_iter()
            .map(|e| e.condition_name.unwrap())
            .collect();
        assert_eq!(names, vec!["New", "Middle", "Old"]);
    }

    #[test]
    fn test_users_are_isolated() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);

        let stored = history.append("u1", entry(None)).unwrap();
        assert!(history.list("u2").unwrap().is_empty());
        assert!(!history.remove("u2", &stored.id).unwrap());
        assert_eq!(history.list("u1").unwrap().len(), 1);
    }

    #[test]
    fn test_remove_missing_is_noop() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);
        history.append("u1", entry(None)).unwrap();
        let before = history.list("u1").unwrap();

        assert!(!history.remove("u1", "scan-does-not-exist").unwrap());
        assert_eq!(history.list("u1").unwrap(), before);
    }

    #[test]
    fn test_remove_last_entry_persists_empty_list() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);
        let stored = history.append("u1", entry(None)).unwrap();

        assert!(history.remove("u1", &stored.id).unwrap());
        assert!(history.list("u1").unwrap().is_empty());
        assert_eq!(kv.get("scanHistory-u1").unwrap(), Some("[]".into()));
    }

    #[test]
    fn test_mark_saved() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);
        let stored = history.append("u1", entry(Some("Common Rust"))).unwrap();

        assert!(history.mark_saved("u1", &stored.id).unwrap());
        assert!(history.get("u1", &stored.id).unwrap().unwrap().saved);
        assert!(!history.mark_saved("u1", "missing").unwrap());
    }

    #[test]
    fn test_blank_user_rejected() {
        let kv = MemoryStore::new();
        let history = ScanHistoryStore::new(&kv);
        assert!(matches!(history.list(" "), Err(StoreError::InvalidInput(_))));
        assert!(matches!(
            history.append("", entry(None)),
            Err(StoreError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_corrupt_history_is_reported() {
        let kv = MemoryStore::new();
        kv.set("scanHistory-u1", "{broken").unwrap();
        let history = ScanHistoryStore::new(&kv);
        assert!(matches!(history.list("u1"), Err(StoreError::Json(_))));
    }

    #[test]
    fn test_storage_failure_propagates() {
        let kv = FailingStore::new();
        let history = ScanHistoryStore::new(&kv);
        let stored = history.append("u1", entry(Some("Common Rust"))).unwrap();

        kv.go_offline();
        assert!(matches!(
            history.append("u1", entry(None)),
            Err(StoreError::Unavailable(_))
        ));
        assert!(matches!(history.list("u1"), Err(StoreError::Unavailable(_))));
        assert!(matches!(
            history.mark_saved("u1", &stored.id),
            Err(StoreError::Unavailable(_))
        ));

        kv.heal();
        assert_eq!(history.list("u1").unwrap(), vec![stored]);
    }

    #[test]
    fn test_refused_write_keeps_previous_list() {
        let kv = FailingStore::new();
        let history = ScanHistoryStore::new(&kv);
        let stored = history.append("u1", entry(None)).unwrap();

        kv.refuse_writes_to("scanHistory-u1");
        assert!(matches!(
            history.mark_saved("u1", &stored.id),
            Err(StoreError::Unavailable(_))
        ));
        assert!(!history.get("u1", &stored.id).unwrap().unwrap().saved);
    }
}
