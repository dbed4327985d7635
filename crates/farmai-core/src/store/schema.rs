//! SQLite schema definition.

/// Schema for the SQLite-backed key-value store.
pub const SCHEMA: &str = r#"
-- ============================================================================
-- Key-value store (JSON values)
-- ============================================================================

CREATE TABLE IF NOT EXISTS kv_store (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,                          -- JSON document
    updated_at TEXT NOT NULL DEFAULT (datetime('now'))
);
"#;
