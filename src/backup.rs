//! Backup Subsystem: full-dataset snapshots with retention pruning.
//!
//! Snapshots are deep copies of the prompts, tags, and fill-history
//! collections, keyed by a fresh id and ordered by creation timestamp. At
//! most [`MAX_BACKUPS`](crate::store::MAX_BACKUPS) snapshots are retained;
//! the oldest beyond that count are deleted in the same transaction that
//! stores the new one.

use log::{error, info};

use crate::error::StoreError;
use crate::models::{new_id, now_iso, BackupSnapshot};
use crate::repository::Repository;

/// Capture the current dataset as a new snapshot and prune old ones.
///
/// Returns the created snapshot. `Meta.lastBackup` is refreshed as part of
/// the same transaction that stores it.
pub fn create_backup(repo: &Repository) -> Result<BackupSnapshot, StoreError> {
    let snapshot = BackupSnapshot {
        id: new_id(),
        created_at: now_iso(),
        prompts: repo.get_all_prompts()?,
        tags: repo.get_all_tags()?,
        fill_history: repo.get_fill_history()?,
    };
    repo.insert_backup_pruned(&snapshot)?;
    info!(
        "Created backup {} ({} prompts, {} tags, {} history entries)",
        snapshot.id,
        snapshot.prompts.len(),
        snapshot.tags.len(),
        snapshot.fill_history.len()
    );
    Ok(snapshot)
}

/// All stored snapshots, most recent first.
pub fn list_backups(repo: &Repository) -> Result<Vec<BackupSnapshot>, StoreError> {
    repo.backups_newest_first()
}

/// Replace the live collections with a snapshot's copies.
///
/// Returns `Ok(false)` with no side effects when the id is unknown. The
/// three collections are restored in independent transactions; a failure
/// partway through is logged with the failing collection and propagated,
/// leaving the dataset in a mixed state that a retry or another restore
/// can recover from.
pub fn restore_backup(repo: &Repository, backup_id: &str) -> Result<bool, StoreError> {
    let Some(snapshot) = repo.get_backup(backup_id)? else {
        return Ok(false);
    };

    repo.replace_all_prompts(&snapshot.prompts).map_err(|e| {
        error!("restore {}: prompts transaction failed: {}", backup_id, e);
        e
    })?;
    repo.save_all_tags(&snapshot.tags).map_err(|e| {
        error!("restore {}: tags transaction failed: {}", backup_id, e);
        e
    })?;
    repo.replace_fill_history(&snapshot.fill_history).map_err(|e| {
        error!("restore {}: fill-history transaction failed: {}", backup_id, e);
        e
    })?;

    info!("Restored backup {} from {}", backup_id, snapshot.created_at);
    Ok(true)
}

/// Remove a snapshot by id. Removing an absent id is not an error.
pub fn delete_backup(repo: &Repository, backup_id: &str) -> Result<(), StoreError> {
    repo.remove_backup(backup_id)?;
    Ok(())
}
