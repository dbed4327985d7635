//! FarmAI Core Library
//!
//! Local-first farm health toolkit for the FarmAI mobile app.
//!
//! # Architecture
//!
//! ```text
//!   Photo ──────────────┐            Symptoms ─────────────┐
//!                       ▼                                  ▼
//!              ImageClassifier                 Best-overlap scoring
//!           (placeholder, pluggable)        (threshold 30%, ties → first)
//!                       │                                  │
//!                       └──────────────┬───────────────────┘
//!                                      ▼
//!                               DiagnosisResult
//!                                      │
//!                          ┌───────────▼───────────┐
//!                          │  Scan History Store   │
//!                          │ scanHistory-<user_id> │
//!                          └───────────┬───────────┘
//!                                      ▼
//!                      KeyValueStore (SQLite / memory)
//! ```
//!
//! # Core Principle
//!
//! **"No match" is a result, not an error.** Only structurally invalid input
//! (missing subject type or image) is rejected, and storage failures are
//! always surfaced to the caller.
//!
//! # Modules
//!
//! - [`catalog`]: Disease catalog and symptom vocabulary
//! - [`diagnosis`]: Symptom matcher and image classifier seam
//! - [`models`]: Domain types (Condition, DiagnosisResult, ScanHistoryEntry, etc.)
//! - [`store`]: Key-value persistence, scan history, accounts, stock
//! - [`config`]: TOML configuration
//! - [`telemetry`]: Logging setup

pub mod catalog;
pub mod config;
pub mod diagnosis;
pub mod models;
pub mod store;
pub mod telemetry;

// Re-export commonly used types
pub use catalog::DiseaseCatalog;
pub use config::FarmAiConfig;
pub use diagnosis::{DiagnosisMatcher, ImageClassifier, RandomClassifier};
pub use models::{
    Condition, DiagnosisMode, DiagnosisResult, NewStockItem, ProfileUpdate, Role,
    ScanHistoryEntry, StockCategory, StockItem, SubjectKind, SubjectType, User,
};
pub use store::{
    AccountRegistry, KeyValueStore, MemoryStore, ScanHistoryStore, SqliteStore, StockLedger,
};

// UniFFI setup - using proc macros
uniffi::setup_scaffolding!();

use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, Utc};

// =========================================================================
// FFI Error Type
// =========================================================================

#[derive(Debug, thiserror::Error, uniffi::Error)]
pub enum FarmAiError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Storage unavailable: {0}")]
    StorageUnavailable(String),

    #[error("Email already registered: {0}")]
    EmailTaken(String),

    #[error("Config error: {0}")]
    Config(String),
}

impl From<store::StoreError> for FarmAiError {
    fn from(e: store::StoreError) -> Self {
        match e {
            store::StoreError::InvalidInput(msg) => FarmAiError::InvalidInput(msg),
            store::StoreError::EmailTaken(email) => FarmAiError::EmailTaken(email),
            other => FarmAiError::StorageUnavailable(other.to_string()),
        }
    }
}

impl From<diagnosis::DiagnosisError> for FarmAiError {
    fn from(e: diagnosis::DiagnosisError) -> Self {
        match e {
            diagnosis::DiagnosisError::InvalidInput(msg) => FarmAiError::InvalidInput(msg),
        }
    }
}

impl From<config::ConfigError> for FarmAiError {
    fn from(e: config::ConfigError) -> Self {
        FarmAiError::Config(e.to_string())
    }
}

impl<T> From<std::sync::PoisonError<T>> for FarmAiError {
    fn from(e: std::sync::PoisonError<T>) -> Self {
        FarmAiError::StorageUnavailable(format!("Lock poisoned: {}", e))
    }
}

// =========================================================================
// Factory Functions (exported to FFI)
// =========================================================================

/// Open or create the app database at the given path.
///
/// `config_toml` overrides defaults; see [`FarmAiConfig`].
#[uniffi::export]
pub fn open_farmai(path: String, config_toml: Option<String>) -> Result<Arc<FarmAiCore>, FarmAiError> {
    let config = match config_toml {
        Some(source) => FarmAiConfig::from_toml_str(&source)?,
        None => FarmAiConfig::default(),
    };
    let store = SqliteStore::open(&path)?;
    Ok(Arc::new(FarmAiCore::with_store(Box::new(store), config)?))
}

/// Create a volatile instance (for previews and testing).
#[uniffi::export]
pub fn open_farmai_in_memory() -> Result<Arc<FarmAiCore>, FarmAiError> {
    Ok(Arc::new(FarmAiCore::with_store(
        Box::new(MemoryStore::new()),
        FarmAiConfig::default(),
    )?))
}

/// Install the log subscriber (see [`telemetry::init_logging`]).
#[uniffi::export]
pub fn init_logging(filter: String) -> bool {
    telemetry::init_logging(&filter)
}

// =========================================================================
// Main API Object
// =========================================================================

/// Thread-safe core for FFI.
#[derive(uniffi::Object)]
pub struct FarmAiCore {
    store: Arc<Mutex<Box<dyn KeyValueStore>>>,
    matcher: DiagnosisMatcher,
    config: FarmAiConfig,
}

impl FarmAiCore {
    /// Core with the built-in catalog and the random image classifier.
    pub fn with_store(store: Box<dyn KeyValueStore>, config: FarmAiConfig) -> Result<Self, FarmAiError> {
        let matcher = DiagnosisMatcher::new(Arc::new(DiseaseCatalog::builtin()), &config)?;
        Self::with_parts(store, matcher, config)
    }

    /// Core with a caller-assembled matcher (custom catalog or classifier).
    pub fn with_parts(
        store: Box<dyn KeyValueStore>,
        matcher: DiagnosisMatcher,
        config: FarmAiConfig,
    ) -> Result<Self, FarmAiError> {
        config.validate()?;
        Ok(Self {
            store: Arc::new(Mutex::new(store)),
            matcher,
            config,
        })
    }

    /// Direct matcher access (e.g. for deferred image analysis).
    pub fn matcher(&self) -> &DiagnosisMatcher {
        &self.matcher
    }

    pub fn config(&self) -> &FarmAiConfig {
        &self.config
    }
}

#[uniffi::export]
impl FarmAiCore {
    // =========================================================================
    // Catalog Operations
    // =========================================================================

    /// Selectable crops and animals.
    pub fn list_subjects(&self) -> Vec<FfiSubject> {
        self.matcher
            .catalog()
            .subjects()
            .iter()
            .map(|s| s.clone().into())
            .collect()
    }

    /// Conditions for a subject, in catalog order.
    pub fn lookup_conditions(&self, subject: String) -> Vec<FfiCondition> {
        SubjectType::new(&subject)
            .map(|s| {
                self.matcher
                    .catalog()
                    .lookup(&s)
                    .iter()
                    .map(|c| c.clone().into())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Look up a condition by subject and display name.
    pub fn find_condition(&self, subject: String, name: String) -> Option<FfiCondition> {
        let subject = SubjectType::new(&subject)?;
        self.matcher
            .catalog()
            .find_condition(&subject, &name)
            .map(|c| c.clone().into())
    }

    /// Every known symptom, without duplicates.
    pub fn symptom_vocabulary(&self) -> Vec<String> {
        self.matcher.catalog().symptom_vocabulary()
    }

    /// Autocomplete symptoms.
    pub fn search_symptoms(&self, query: String, limit: Option<u32>) -> Vec<String> {
        let limit = limit
            .map(|l| l as usize)
            .unwrap_or(self.config.symptom_search_limit);
        self.matcher.catalog().search_symptoms(&query, limit)
    }

    // =========================================================================
    // Diagnosis Operations
    // =========================================================================

    /// Symptom checker.
    pub fn diagnose_by_symptoms(
        &self,
        subject: String,
        symptoms: Vec<String>,
    ) -> Result<FfiDiagnosis, FarmAiError> {
        let result = self.matcher.diagnose_by_symptoms(&subject, &symptoms)?;
        Ok(result.into())
    }

    /// Photo analysis. Hosts show their own pending state around this call;
    /// see [`FarmAiCore::analysis_delay_ms`].
    pub fn diagnose_by_image(&self, subject: String, image_ref: String) -> Result<FfiDiagnosis, FarmAiError> {
        let result = self.matcher.diagnose_by_image(&subject, &image_ref)?;
        Ok(result.into())
    }

    /// Configured simulated analysis latency.
    pub fn analysis_delay_ms(&self) -> u64 {
        self.config.analysis_delay_ms
    }

    // =========================================================================
    // Scan History Operations
    // =========================================================================

    /// Append an entry (an ID is assigned when blank).
    pub fn append_history(
        &self,
        user_id: String,
        entry: FfiHistoryEntry,
    ) -> Result<FfiHistoryEntry, FarmAiError> {
        let entry = ScanHistoryEntry::try_from(entry)?;
        let kv = self.store.lock()?;
        let stored = ScanHistoryStore::new(&**kv).append(&user_id, entry)?;
        Ok(stored.into())
    }

    /// Record a diagnosis in the user's history.
    pub fn record_diagnosis(
        &self,
        user_id: String,
        diagnosis: FfiDiagnosis,
    ) -> Result<FfiHistoryEntry, FarmAiError> {
        self.append_history(user_id, diagnosis.into())
    }

    /// History, newest first.
    pub fn list_history(&self, user_id: String) -> Result<Vec<FfiHistoryEntry>, FarmAiError> {
        let kv = self.store.lock()?;
        let entries = ScanHistoryStore::new(&**kv).list(&user_id)?;
        Ok(entries.into_iter().map(|e| e.into()).collect())
    }

    /// Delete an entry (no-op when missing).
    pub fn remove_history(&self, user_id: String, entry_id: String) -> Result<bool, FarmAiError> {
        let kv = self.store.lock()?;
        Ok(ScanHistoryStore::new(&**kv).remove(&user_id, &entry_id)?)
    }

    /// Flag an entry as saved.
    pub fn mark_history_saved(&self, user_id: String, entry_id: String) -> Result<bool, FarmAiError> {
        let kv = self.store.lock()?;
        Ok(ScanHistoryStore::new(&**kv).mark_saved(&user_id, &entry_id)?)
    }

    // =========================================================================
    // Account Operations
    // =========================================================================

    pub fn signup(&self, email: String, password: String, name: String) -> Result<FfiUser, FarmAiError> {
        let kv = self.store.lock()?;
        let user = AccountRegistry::new(&**kv).signup(&email, &password, &name)?;
        Ok(user.into())
    }

    pub fn login(&self, email: String, password: String) -> Result<Option<FfiUser>, FarmAiError> {
        let kv = self.store.lock()?;
        let user = AccountRegistry::new(&**kv).login(&email, &password)?;
        Ok(user.map(|u| u.into()))
    }

    pub fn logout(&self) -> Result<(), FarmAiError> {
        let kv = self.store.lock()?;
        Ok(AccountRegistry::new(&**kv).logout()?)
    }

    pub fn current_user(&self) -> Result<Option<FfiUser>, FarmAiError> {
        let kv = self.store.lock()?;
        let user = AccountRegistry::new(&**kv).current_user()?;
        Ok(user.map(|u| u.into()))
    }

    pub fn list_users(&self) -> Result<Vec<FfiUser>, FarmAiError> {
        let kv = self.store.lock()?;
        let users = AccountRegistry::new(&**kv).list_users()?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    /// Replace a user's profile. Blank optional fields are cleared.
    pub fn update_profile(
        &self,
        user_id: String,
        name: String,
        farm_name: Option<String>,
        location: Option<String>,
        age: Option<u32>,
    ) -> Result<Option<FfiUser>, FarmAiError> {
        let kv = self.store.lock()?;
        let update = ProfileUpdate {
            name,
            farm_name,
            location,
            age,
        };
        let user = AccountRegistry::new(&**kv).update_profile(&user_id, update)?;
        Ok(user.map(|u| u.into()))
    }

    /// `false` for an unknown user or a wrong current password.
    pub fn change_password(
        &self,
        user_id: String,
        current_password: String,
        new_password: String,
    ) -> Result<bool, FarmAiError> {
        let kv = self.store.lock()?;
        Ok(AccountRegistry::new(&**kv).change_password(&user_id, &current_password, &new_password)?)
    }

    pub fn delete_user(&self, user_id: String) -> Result<bool, FarmAiError> {
        let kv = self.store.lock()?;
        Ok(AccountRegistry::new(&**kv).delete_user(&user_id)?)
    }

    pub fn set_user_role(&self, user_id: String, is_admin: bool) -> Result<Option<FfiUser>, FarmAiError> {
        let kv = self.store.lock()?;
        let role = if is_admin { Role::Admin } else { Role::Farmer };
        let user = AccountRegistry::new(&**kv).set_role(&user_id, role)?;
        Ok(user.map(|u| u.into()))
    }

    /// Create the demo admin and farmer accounts when missing.
    pub fn seed_demo_accounts(&self) -> Result<Vec<FfiUser>, FarmAiError> {
        let kv = self.store.lock()?;
        let users = AccountRegistry::new(&**kv).seed_demo_accounts()?;
        Ok(users.into_iter().map(|u| u.into()).collect())
    }

    // =========================================================================
    // Stock Operations
    // =========================================================================

    pub fn add_stock_item(
        &self,
        user_id: String,
        category: FfiStockCategory,
        name: String,
        quantity: f64,
        unit: String,
    ) -> Result<FfiStockItem, FarmAiError> {
        let kv = self.store.lock()?;
        let item = StockLedger::new(&**kv).add(
            &user_id,
            NewStockItem {
                category: category.into(),
                name,
                quantity,
                unit,
            },
        )?;
        Ok(item.into())
    }

    pub fn update_stock_item(&self, user_id: String, item: FfiStockItem) -> Result<bool, FarmAiError> {
        let item = StockItem::try_from(item)?;
        let kv = self.store.lock()?;
        Ok(StockLedger::new(&**kv).update(&user_id, &item)?)
    }

    pub fn remove_stock_item(&self, user_id: String, item_id: String) -> Result<bool, FarmAiError> {
        let kv = self.store.lock()?;
        Ok(StockLedger::new(&**kv).remove(&user_id, &item_id)?)
    }

    pub fn list_stock_items(
        &self,
        user_id: String,
        category: Option<FfiStockCategory>,
    ) -> Result<Vec<FfiStockItem>, FarmAiError> {
        let kv = self.store.lock()?;
        let items = StockLedger::new(&**kv).list(&user_id, category.map(Into::into))?;
        Ok(items.into_iter().map(|i| i.into()).collect())
    }
}

// =========================================================================
// FFI Types
// =========================================================================

fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, FarmAiError> {
    DateTime::parse_from_rfc3339(raw)
        .map(|t| t.with_timezone(&Utc))
        .map_err(|e| FarmAiError::InvalidInput(format!("invalid timestamp '{}': {}", raw, e)))
}

fn parse_subject(raw: &str) -> Result<SubjectType, FarmAiError> {
    SubjectType::new(raw).ok_or_else(|| FarmAiError::InvalidInput("subject type is required".into()))
}

/// FFI-safe subject option.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiSubject {
    pub key: String,
    pub label: String,
    pub is_crop: bool,
}

impl From<models::SubjectInfo> for FfiSubject {
    fn from(info: models::SubjectInfo) -> Self {
        Self {
            key: info.subject.into(),
            label: info.label,
            is_crop: info.kind == SubjectKind::Crop,
        }
    }
}

/// FFI-safe condition.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiCondition {
    pub id: String,
    pub name: String,
    pub scientific_name: Option<String>,
    pub symptoms: Vec<String>,
    pub treatment: Vec<String>,
    pub prevention: Vec<String>,
    pub reference_image: Option<String>,
}

impl From<Condition> for FfiCondition {
    fn from(c: Condition) -> Self {
        Self {
            id: c.id,
            name: c.name,
            scientific_name: c.scientific_name,
            symptoms: c.symptoms,
            treatment: c.treatment,
            prevention: c.prevention,
            reference_image: c.reference_image,
        }
    }
}

/// FFI-safe diagnosis mode.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiDiagnosisMode {
    Symptoms,
    Image,
}

impl From<DiagnosisMode> for FfiDiagnosisMode {
    fn from(mode: DiagnosisMode) -> Self {
        match mode {
            DiagnosisMode::Symptoms => Self::Symptoms,
            DiagnosisMode::Image => Self::Image,
        }
    }
}

impl From<FfiDiagnosisMode> for DiagnosisMode {
    fn from(mode: FfiDiagnosisMode) -> Self {
        match mode {
            FfiDiagnosisMode::Symptoms => Self::Symptoms,
            FfiDiagnosisMode::Image => Self::Image,
        }
    }
}

/// FFI-safe diagnosis result.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiDiagnosis {
    pub id: String,
    pub subject: String,
    pub mode: FfiDiagnosisMode,
    pub condition: Option<FfiCondition>,
    pub confidence: u8,
    pub matched_symptoms: Vec<String>,
    pub message: Option<String>,
    /// RFC 3339
    pub created_at: String,
    pub image_ref: Option<String>,
    pub saved: bool,
}

impl From<DiagnosisResult> for FfiDiagnosis {
    fn from(r: DiagnosisResult) -> Self {
        Self {
            id: r.id,
            subject: r.subject.into(),
            mode: r.mode.into(),
            condition: r.condition.map(|c| c.into()),
            confidence: r.confidence,
            matched_symptoms: r.matched_symptoms,
            message: r.message,
            created_at: r.created_at.to_rfc3339(),
            image_ref: r.image_ref,
            saved: r.saved,
        }
    }
}

impl From<FfiDiagnosis> for FfiHistoryEntry {
    fn from(d: FfiDiagnosis) -> Self {
        Self {
            id: d.id,
            subject: d.subject,
            mode: d.mode,
            condition_name: d.condition.map(|c| c.name),
            confidence: d.confidence,
            timestamp: d.created_at,
            image_ref: d.image_ref,
            saved: d.saved,
        }
    }
}

/// FFI-safe scan history entry.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiHistoryEntry {
    /// Empty to let the store assign one
    pub id: String,
    pub subject: String,
    pub mode: FfiDiagnosisMode,
    pub condition_name: Option<String>,
    pub confidence: u8,
    /// RFC 3339
    pub timestamp: String,
    pub image_ref: Option<String>,
    pub saved: bool,
}

impl From<ScanHistoryEntry> for FfiHistoryEntry {
    fn from(e: ScanHistoryEntry) -> Self {
        Self {
            id: e.id,
            subject: e.subject.into(),
            mode: e.mode.into(),
            condition_name: e.condition_name,
            confidence: e.confidence,
            timestamp: e.timestamp.to_rfc3339(),
            image_ref: e.image_ref,
            saved: e.saved,
        }
    }
}

impl TryFrom<FfiHistoryEntry> for ScanHistoryEntry {
    type Error = FarmAiError;

    fn try_from(e: FfiHistoryEntry) -> Result<Self, Self::Error> {
        Ok(ScanHistoryEntry {
            id: e.id,
            subject: parse_subject(&e.subject)?,
            mode: e.mode.into(),
            condition_name: e.condition_name,
            confidence: e.confidence.min(100),
            timestamp: parse_timestamp(&e.timestamp)?,
            image_ref: e.image_ref,
            saved: e.saved,
        })
    }
}

/// FFI-safe user.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub is_admin: bool,
    pub farm_name: Option<String>,
    pub location: Option<String>,
    pub age: Option<u32>,
    pub created_at: String,
}

impl From<User> for FfiUser {
    fn from(u: User) -> Self {
        Self {
            is_admin: u.is_admin(),
            id: u.id,
            email: u.email,
            name: u.name,
            farm_name: u.farm_name,
            location: u.location,
            age: u.age,
            created_at: u.created_at.to_rfc3339(),
        }
    }
}

/// FFI-safe stock category.
#[derive(Debug, Clone, Copy, PartialEq, Eq, uniffi::Enum)]
pub enum FfiStockCategory {
    Crops,
    Livestock,
    Poultry,
    Equipment,
    Supplies,
}

impl From<FfiStockCategory> for StockCategory {
    fn from(c: FfiStockCategory) -> Self {
        match c {
            FfiStockCategory::Crops => Self::Crops,
            FfiStockCategory::Livestock => Self::Livestock,
            FfiStockCategory::Poultry => Self::Poultry,
            FfiStockCategory::Equipment => Self::Equipment,
            FfiStockCategory::Supplies => Self::Supplies,
        }
    }
}

impl From<StockCategory> for FfiStockCategory {
    fn from(c: StockCategory) -> Self {
        match c {
            StockCategory::Crops => Self::Crops,
            StockCategory::Livestock => Self::Livestock,
            StockCategory::Poultry => Self::Poultry,
            StockCategory::Equipment => Self::Equipment,
            StockCategory::Supplies => Self::Supplies,
        }
    }
}

/// FFI-safe stock item.
#[derive(Debug, Clone, uniffi::Record)]
pub struct FfiStockItem {
    pub id: String,
    pub user_id: String,
    pub category: FfiStockCategory,
    pub name: String,
    pub quantity: f64,
    pub unit: String,
    /// YYYY-MM-DD
    pub last_updated: String,
}

impl From<StockItem> for FfiStockItem {
    fn from(i: StockItem) -> Self {
        Self {
            id: i.id,
            user_id: i.user_id,
            category: i.category.into(),
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
            last_updated: i.last_updated.format("%Y-%m-%d").to_string(),
        }
    }
}

impl TryFrom<FfiStockItem> for StockItem {
    type Error = FarmAiError;

    fn try_from(i: FfiStockItem) -> Result<Self, Self::Error> {
        let last_updated = NaiveDate::parse_from_str(&i.last_updated, "%Y-%m-%d").map_err(|e| {
            FarmAiError::InvalidInput(format!("invalid date '{}': {}", i.last_updated, e))
        })?;
        Ok(StockItem {
            id: i.id,
            user_id: i.user_id,
            category: i.category.into(),
            name: i.name,
            quantity: i.quantity,
            unit: i.unit,
            last_updated,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn core() -> Arc<FarmAiCore> {
        open_farmai_in_memory().unwrap()
    }

    #[test]
    fn test_catalog_over_ffi() {
        let core = core();
        assert!(core.list_subjects().iter().any(|s| s.key == "cow" && !s.is_crop));
        assert_eq!(core.lookup_conditions("Cow".into()).len(), 2);
        assert!(core.lookup_conditions("".into()).is_empty());
        assert!(core.find_condition("cow".into(), "Mastitis".into()).is_some());
        assert!(!core.symptom_vocabulary().is_empty());
        assert_eq!(core.search_symptoms("udder".into(), Some(1)).len(), 1);
    }

    #[test]
    fn test_diagnose_and_record() {
        let core = core();
        let diagnosis = core
            .diagnose_by_symptoms("cow".into(), vec!["Swollen udder".into(), "Painful udder".into()])
            .unwrap();
        assert_eq!(diagnosis.condition.as_ref().map(|c| c.name.as_str()), Some("Mastitis"));
        assert_eq!(diagnosis.confidence, 40);

        let entry = core.record_diagnosis("u1".into(), diagnosis.clone()).unwrap();
        assert_eq!(entry.id, diagnosis.id);

        let listed = core.list_history("u1".into()).unwrap();
        assert_eq!(listed.len(), 1);
        assert_eq!(listed[0].timestamp, diagnosis.created_at);
        assert_eq!(listed[0].condition_name.as_deref(), Some("Mastitis"));

        assert!(core.mark_history_saved("u1".into(), entry.id.clone()).unwrap());
        assert!(core.list_history("u1".into()).unwrap()[0].saved);

        assert!(core.remove_history("u1".into(), entry.id.clone()).unwrap());
        assert!(!core.remove_history("u1".into(), entry.id).unwrap());
    }

    #[test]
    fn test_invalid_input_maps_to_ffi_error() {
        let core = core();
        assert!(matches!(
            core.diagnose_by_image("".into(), "x.jpg".into()),
            Err(FarmAiError::InvalidInput(_))
        ));

        let bad = FfiHistoryEntry {
            id: String::new(),
            subject: "cow".into(),
            mode: FfiDiagnosisMode::Image,
            condition_name: None,
            confidence: 95,
            timestamp: "yesterday".into(),
            image_ref: None,
            saved: false,
        };
        assert!(matches!(
            core.append_history("u1".into(), bad),
            Err(FarmAiError::InvalidInput(_))
        ));
    }

    #[test]
    fn test_accounts_over_ffi() {
        let core = core();
        let user = core
            .signup("farmer@example.com".into(), "pw".into(), "Farmer".into())
            .unwrap();
        assert!(!user.is_admin);
        assert!(matches!(
            core.signup("farmer@example.com".into(), "pw".into(), "Again".into()),
            Err(FarmAiError::EmailTaken(_))
        ));

        core.logout().unwrap();
        assert!(core.current_user().unwrap().is_none());
        assert!(core.login("farmer@example.com".into(), "pw".into()).unwrap().is_some());
        assert_eq!(core.list_users().unwrap().len(), 1);
    }

    #[test]
    fn test_account_management_over_ffi() {
        let core = core();
        let seeded = core.seed_demo_accounts().unwrap();
        assert_eq!(seeded.len(), 2);
        let admin = core
            .login("admin@farmai.com".into(), "admin123".into())
            .unwrap()
            .unwrap();
        assert!(admin.is_admin);

        let user = core
            .signup("farmer@example.com".into(), "pw".into(), "Farmer".into())
            .unwrap();
        let updated = core
            .update_profile(
                user.id.clone(),
                "Grace Achieng".into(),
                Some("Green Acres".into()),
                Some(" ".into()),
                Some(41),
            )
            .unwrap()
            .unwrap();
        assert_eq!(updated.name, "Grace Achieng");
        assert_eq!(updated.farm_name.as_deref(), Some("Green Acres"));
        assert_eq!(updated.location, None);
        assert_eq!(updated.age, Some(41));
        assert!(matches!(
            core.update_profile(user.id.clone(), "".into(), None, None, None),
            Err(FarmAiError::InvalidInput(_))
        ));

        let promoted = core.set_user_role(user.id.clone(), true).unwrap().unwrap();
        assert!(promoted.is_admin);
        assert!(core.current_user().unwrap().unwrap().is_admin);

        assert!(!core.change_password(user.id.clone(), "nope".into(), "pw2".into()).unwrap());
        assert!(core.change_password(user.id.clone(), "pw".into(), "pw2".into()).unwrap());
        assert!(core.login("farmer@example.com".into(), "pw2".into()).unwrap().is_some());

        assert!(core.delete_user(user.id.clone()).unwrap());
        assert!(core.current_user().unwrap().is_none());
        assert!(core.login("farmer@example.com".into(), "pw2".into()).unwrap().is_none());
        assert_eq!(core.list_users().unwrap().len(), 2);
    }

    #[test]
    fn test_storage_failure_maps_to_ffi_error() {
        let kv = store::testing::FailingStore::new();
        kv.refuse_writes_to("scanHistory-u1");
        let core = FarmAiCore::with_store(Box::new(kv), FarmAiConfig::default()).unwrap();

        let entry = FfiHistoryEntry {
            id: String::new(),
            subject: "cow".into(),
            mode: FfiDiagnosisMode::Symptoms,
            condition_name: Some("Mastitis".into()),
            confidence: 40,
            timestamp: Utc::now().to_rfc3339(),
            image_ref: None,
            saved: false,
        };
        assert!(matches!(
            core.append_history("u1".into(), entry.clone()),
            Err(FarmAiError::StorageUnavailable(_))
        ));
        assert!(core.list_history("u1".into()).unwrap().is_empty());

        // Other users are unaffected
        assert!(core.append_history("u2".into(), entry).is_ok());
    }

    #[test]
    fn test_stock_over_ffi() {
        let core = core();
        let mut item = core
            .add_stock_item("u1".into(), FfiStockCategory::Livestock, "Dairy Cows".into(), 12.0, "animals".into())
            .unwrap();

        item.quantity = 14.0;
        assert!(core.update_stock_item("u1".into(), item.clone()).unwrap());

        let livestock = core
            .list_stock_items("u1".into(), Some(FfiStockCategory::Livestock))
            .unwrap();
        assert_eq!(livestock.len(), 1);
        assert_eq!(livestock[0].quantity, 14.0);
        assert!(core
            .list_stock_items("u1".into(), Some(FfiStockCategory::Equipment))
            .unwrap()
            .is_empty());

        assert!(core.remove_stock_item("u1".into(), item.id).unwrap());
    }

    #[test]
    fn test_bad_config_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("farmai.db").to_string_lossy().to_string();
        assert!(matches!(
            open_farmai(path.clone(), Some("match_threshold = 2.0".into())),
            Err(FarmAiError::Config(_))
        ));
        assert!(open_farmai(path, Some("analysis_delay_ms = 0".into())).is_ok());
    }

    #[test]
    fn test_inverted_confidence_range_rejected() {
        let config = FarmAiConfig {
            image_confidence_min: 99,
            image_confidence_max: 70,
            ..FarmAiConfig::default()
        };
        assert!(matches!(
            FarmAiCore::with_store(Box::new(MemoryStore::new()), config),
            Err(FarmAiError::Config(_))
        ));
    }
}
