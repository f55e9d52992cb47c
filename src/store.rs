//! Record Store: owns the durable schema.
//!
//! Five primary collections hold JSON-serialized values keyed by id, plus
//! five secondary index tables for kind/category/prompt/date lookups. All
//! schema creation happens in [`Store::open`]; `open_table` inside a write
//! transaction creates missing tables and is a no-op for existing ones, so
//! reopening an existing database never re-runs setup.
//!
//! The `Store` is `Send + Sync` and intended to be opened once and shared;
//! redb serializes writers internally.

use std::path::Path;

use log::info;
use redb::{Database, TableDefinition};

use crate::error::StoreError;

/// Maximum number of backup snapshots retained before the oldest are pruned.
pub const MAX_BACKUPS: usize = 5;

pub(crate) const PROMPTS: TableDefinition<&str, &str> = TableDefinition::new("prompts");
pub(crate) const TAGS: TableDefinition<&str, &str> = TableDefinition::new("tags");
pub(crate) const FILL_HISTORY: TableDefinition<&str, &str> = TableDefinition::new("fillHistory");
pub(crate) const BACKUPS: TableDefinition<&str, &str> = TableDefinition::new("backups");
pub(crate) const META: TableDefinition<&str, &str> = TableDefinition::new("meta");

// Secondary indexes. Keys are composite "{escaped value}\x00{primary key}"
// strings and values are the primary key, so one indexed value maps to many
// rows and a full ascending scan of a date index yields chronological order.
pub(crate) const PROMPTS_BY_KIND: TableDefinition<&str, &str> =
    TableDefinition::new("prompts.by-type");
pub(crate) const PROMPTS_BY_CATEGORY: TableDefinition<&str, &str> =
    TableDefinition::new("prompts.by-category");
pub(crate) const HISTORY_BY_PROMPT: TableDefinition<&str, &str> =
    TableDefinition::new("fillHistory.by-promptId");
pub(crate) const HISTORY_BY_DATE: TableDefinition<&str, &str> =
    TableDefinition::new("fillHistory.by-date");
pub(crate) const BACKUPS_BY_DATE: TableDefinition<&str, &str> =
    TableDefinition::new("backups.by-date");

/// Escape the indexed value so the encoded form never contains NUL and the
/// composite key stays injective. Indexed values are arbitrary strings
/// (categories arrive from imported JSON, where NUL is a legal character),
/// so the separator must not be forgeable: `\x01` doubles to `\x01\x01` and
/// `\x00` becomes `\x01\x02`.
fn encode_index_value(value: &str) -> String {
    value.replace('\u{1}', "\u{1}\u{1}").replace('\u{0}', "\u{1}\u{2}")
}

/// Composite key for a secondary index entry: escaped value, NUL, primary
/// key. NUL never appears in the escaped value, so a key parses one way.
pub(crate) fn index_key(value: &str, id: &str) -> String {
    format!("{}\u{0}{id}", encode_index_value(value))
}

/// Key range covering every index entry for one indexed value and no other.
/// A key whose value strictly extends this one sorts at or past the end
/// bound `"{escaped}\x01"`, because its escaped form continues with a byte
/// of `\x01` or higher.
pub(crate) fn index_value_range(value: &str) -> (String, String) {
    let escaped = encode_index_value(value);
    (format!("{escaped}\u{0}"), format!("{escaped}\u{1}"))
}

/// Handle to the embedded database.
pub struct Store {
    pub(crate) db: Database,
}

impl Store {
    /// Open or create the database file at `path` and ensure the schema.
    pub fn open(path: impl AsRef<Path>) -> Result<Self, StoreError> {
        let db = Database::create(path.as_ref())?;
        let store = Self { db };
        store.ensure_schema()?;
        info!("Store ready at {}", path.as_ref().display());
        Ok(store)
    }

    /// In-memory database, lost on drop. Backs the test suite.
    pub fn in_memory() -> Result<Self, StoreError> {
        let db = Database::builder()
            .create_with_backend(redb::backends::InMemoryBackend::new())?;
        let store = Self { db };
        store.ensure_schema()?;
        Ok(store)
    }

    /// Create every table. Idempotent: existing tables are left untouched.
    fn ensure_schema(&self) -> Result<(), StoreError> {
        let txn = self.db.begin_write()?;
        {
            txn.open_table(PROMPTS)?;
            txn.open_table(TAGS)?;
            txn.open_table(FILL_HISTORY)?;
            txn.open_table(BACKUPS)?;
            txn.open_table(META)?;
            txn.open_table(PROMPTS_BY_KIND)?;
            txn.open_table(PROMPTS_BY_CATEGORY)?;
            txn.open_table(HISTORY_BY_PROMPT)?;
            txn.open_table(HISTORY_BY_DATE)?;
            txn.open_table(BACKUPS_BY_DATE)?;
        }
        txn.commit()?;
        Ok(())
    }
}
