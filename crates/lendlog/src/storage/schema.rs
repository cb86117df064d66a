//! `SQLite` schema definitions for lendlog.
//!
//! The database is a plain key-value table; each slot holds one serialized
//! value that is overwritten wholesale.

/// SQL statement to create the slots table.
pub const CREATE_SLOTS_TABLE: &str = r"
CREATE TABLE IF NOT EXISTS slots (
    key TEXT PRIMARY KEY,
    value TEXT NOT NULL,
    updated_at TEXT NOT NULL
)
";

/// SQL statement to read one slot.
pub const SELECT_SLOT: &str = "SELECT value FROM slots WHERE key = ?1";

/// SQL statement to write one slot, replacing any previous value.
pub const UPSERT_SLOT: &str = r"
INSERT INTO slots (key, value, updated_at) VALUES (?1, ?2, ?3)
ON CONFLICT(key) DO UPDATE SET value = excluded.value, updated_at = excluded.updated_at
";

/// All schema creation statements in order.
pub const SCHEMA_STATEMENTS: &[&str] = &[CREATE_SLOTS_TABLE];
