//! # Prompt Library Core
//!
//! A local-first storage core for a personal prompt library. Built on
//! redb for maximum stability: durable collections with secondary indexes,
//! point-in-time backup snapshots with retention pruning, portable JSON
//! export/import with structural validation, and an incrementally updated
//! substring search index over the live prompt set.
//!
//! ## Features
//!
//! - **redb-based storage**: ACID embedded database, one file, pure Rust
//! - **Typed repository**: collection-specific CRUD; the only component
//!   that opens transactions
//! - **Backups**: deep snapshots of the whole dataset, at most
//!   [`MAX_BACKUPS`] retained, oldest pruned first
//! - **Export/import**: versioned JSON documents, validated before a single
//!   byte of live data is touched, always preceded by a safety backup
//! - **Search**: precomputed lowercase blobs with fingerprint-based cache
//!   reuse, so favorite toggles never recompute the index
//! - **Safe error handling**: failures propagate; nothing is silently
//!   swallowed
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use prompt_library_core::{Repository, SearchIndex, SearchQuery, Store};
//!
//! # fn main() -> Result<(), prompt_library_core::StoreError> {
//! let store = Arc::new(Store::open("prompt-library.redb")?);
//! let repo = Repository::new(store);
//!
//! // Seed on first run, load on every later one.
//! let (prompts, _tags) = repo.initialize_or_load()?;
//!
//! let mut index = SearchIndex::new();
//! index.rebuild(&prompts);
//!
//! let outcome = index.search(&SearchQuery { text: "review".into(), ..Default::default() });
//! println!("{} matches in {:?}", outcome.results.len(), outcome.elapsed);
//! # Ok(())
//! # }
//! ```

pub mod backup;
pub mod error;
pub mod export_import;
pub mod models;
pub mod repository;
pub mod search;
pub mod seed;
pub mod store;


pub use backup::{create_backup, delete_backup, list_backups, restore_backup};
pub use error::StoreError;
pub use export_import::{
    document_to_json, export_document, export_file_name, import_document,
    read_document_from_file, validate_document, write_document_to_file, ExportDocument,
    ValidationReport, EXPORT_VERSION,
};
pub use models::{
    BackupSnapshot, FillHistoryEntry, Meta, NewFillHistoryEntry, Prompt, PromptKind, Tag,
};
pub use repository::Repository;
pub use search::{SearchIndex, SearchOutcome, SearchQuery};
pub use store::{Store, MAX_BACKUPS};
