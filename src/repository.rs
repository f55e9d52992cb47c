//! Repository Layer: typed, collection-specific operations.
//!
//! This is the only module that begins transactions against the [`Store`].
//! The backup and export/import subsystems compose the operations exposed
//! here instead of touching tables themselves.
//!
//! Multi-collection operations (`clear_all_data`, restore, import) issue one
//! transaction per collection. They are not atomic as a group: a crash
//! between transactions can leave a mixed old/new dataset. That window is
//! accepted and surfaced through logging, not hidden.

use std::sync::Arc;

use log::info;
use redb::{ReadableTable, Table, TableDefinition};
use serde::de::DeserializeOwned;

use crate::error::StoreError;
use crate::models::{
    new_id, now_iso, BackupSnapshot, FillHistoryEntry, Meta, NewFillHistoryEntry, Prompt,
    PromptKind, Tag,
};
use crate::seed;
use crate::store::{
    index_key, index_value_range, Store, BACKUPS, BACKUPS_BY_DATE, FILL_HISTORY,
    HISTORY_BY_DATE, HISTORY_BY_PROMPT, MAX_BACKUPS, META, PROMPTS, PROMPTS_BY_CATEGORY,
    PROMPTS_BY_KIND, TAGS,
};

const META_KEY: &str = "app";

/// Typed CRUD over the store's collections.
pub struct Repository {
    store: Arc<Store>,
}

impl Repository {
    pub fn new(store: Arc<Store>) -> Self {
        Self { store }
    }

    // ============ Prompts ============

    /// All prompts, in key order.
    pub fn get_all_prompts(&self) -> Result<Vec<Prompt>, StoreError> {
        self.read_all(PROMPTS)
    }

    pub fn get_prompt_by_id(&self, id: &str) -> Result<Option<Prompt>, StoreError> {
        let txn = self.store.db.begin_read()?;
        let table = txn.open_table(PROMPTS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
            None => Ok(None),
        }
    }

    /// Insert-or-replace by id. The whole prompt is written; there is no
    /// partial-field merge.
    pub fn save_prompt(&self, prompt: &Prompt) -> Result<(), StoreError> {
        let txn = self.store.db.begin_write()?;
        {
            let mut prompts = txn.open_table(PROMPTS)?;
            let mut by_kind = txn.open_table(PROMPTS_BY_KIND)?;
            let mut by_category = txn.open_table(PROMPTS_BY_CATEGORY)?;
            put_prompt(&mut prompts, &mut by_kind, &mut by_category, prompt)?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Bulk upsert in a single transaction. Used by restore and import.
    pub fn save_all_prompts(&self, prompts: &[Prompt]) -> Result<(), StoreError> {
        let txn = self.store.db.begin_write()?;
        {
            let mut table = txn.open_table(PROMPTS)?;
            let mut by_kind = txn.open_table(PROMPTS_BY_KIND)?;
            let mut by_category = txn.open_table(PROMPTS_BY_CATEGORY)?;
            for prompt in prompts {
                put_prompt(&mut table, &mut by_kind, &mut by_category, prompt)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Clear the prompt collection and insert the supplied prompts, all in
    /// one transaction.
    pub fn replace_all_prompts(&self, prompts: &[Prompt]) -> Result<(), StoreError> {
        let txn = self.store.db.begin_write()?;
        txn.delete_table(PROMPTS)?;
        txn.delete_table(PROMPTS_BY_KIND)?;
        txn.delete_table(PROMPTS_BY_CATEGORY)?;
        {
            let mut table = txn.open_table(PROMPTS)?;
            let mut by_kind = txn.open_table(PROMPTS_BY_KIND)?;
            let mut by_category = txn.open_table(PROMPTS_BY_CATEGORY)?;
            for prompt in prompts {
                put_prompt(&mut table, &mut by_kind, &mut by_category, prompt)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    /// Remove a prompt by id. Returns whether a prompt was removed.
    pub fn delete_prompt(&self, id: &str) -> Result<bool, StoreError> {
        let txn = self.store.db.begin_write()?;
        let removed: Option<Prompt>;
        {
            let mut prompts = txn.open_table(PROMPTS)?;
            removed = match prompts.remove(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            if let Some(old) = &removed {
                let mut by_kind = txn.open_table(PROMPTS_BY_KIND)?;
                let mut by_category = txn.open_table(PROMPTS_BY_CATEGORY)?;
                by_kind.remove(index_key(old.kind.as_str(), &old.id).as_str())?;
                by_category.remove(index_key(&old.category, &old.id).as_str())?;
            }
        }
        txn.commit()?;
        Ok(removed.is_some())
    }

    /// Flip the favorite flag and persist the whole prompt.
    ///
    /// Read-modify-write without optimistic concurrency control: the write
    /// transaction makes each call atomic on its own, but two rapid calls
    /// still resolve last-write-wins on the flag. Known and accepted for
    /// single-user usage.
    pub fn toggle_favorite(&self, id: &str) -> Result<Option<Prompt>, StoreError> {
        let txn = self.store.db.begin_write()?;
        let updated: Option<Prompt>;
        {
            let mut prompts = txn.open_table(PROMPTS)?;
            let current: Option<Prompt> = match prompts.get(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            updated = match current {
                Some(mut prompt) => {
                    prompt.favorite = !prompt.favorite;
                    let json = serde_json::to_string(&prompt)?;
                    prompts.insert(prompt.id.as_str(), json.as_str())?;
                    Some(prompt)
                }
                None => None,
            };
        }
        if updated.is_some() {
            txn.commit()?;
        }
        Ok(updated)
    }

    /// Prompts whose kind matches, resolved through the `by-type` index.
    pub fn get_prompts_by_kind(&self, kind: PromptKind) -> Result<Vec<Prompt>, StoreError> {
        self.prompts_from_index(PROMPTS_BY_KIND, kind.as_str())
    }

    /// Prompts in a category, resolved through the `by-category` index.
    pub fn get_prompts_by_category(&self, category: &str) -> Result<Vec<Prompt>, StoreError> {
        self.prompts_from_index(PROMPTS_BY_CATEGORY, category)
    }

    fn prompts_from_index(
        &self,
        index: TableDefinition<&'static str, &'static str>,
        value: &str,
    ) -> Result<Vec<Prompt>, StoreError> {
        let txn = self.store.db.begin_read()?;
        let ids = {
            let index_table = txn.open_table(index)?;
            let (start, end) = index_value_range(value);
            let mut ids = Vec::new();
            for item in index_table.range(start.as_str()..end.as_str())? {
                let (_, id) = item?;
                ids.push(id.value().to_string());
            }
            ids
        };
        let prompts = txn.open_table(PROMPTS)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(value) = prompts.get(id.as_str())? {
                out.push(serde_json::from_str(value.value())?);
            }
        }
        Ok(out)
    }

    // ============ Tags ============

    pub fn get_all_tags(&self) -> Result<Vec<Tag>, StoreError> {
        self.read_all(TAGS)
    }

    /// Full replace: the collection is cleared, then every supplied tag is
    /// inserted. Never a merge.
    pub fn save_all_tags(&self, tags: &[Tag]) -> Result<(), StoreError> {
        let txn = self.store.db.begin_write()?;
        txn.delete_table(TAGS)?;
        {
            let mut table = txn.open_table(TAGS)?;
            for tag in tags {
                let json = serde_json::to_string(tag)?;
                table.insert(tag.name.as_str(), json.as_str())?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    // ============ Fill history ============

    pub fn get_fill_history(&self) -> Result<Vec<FillHistoryEntry>, StoreError> {
        self.read_all(FILL_HISTORY)
    }

    /// Entries recorded against one prompt, resolved through the
    /// `by-promptId` index.
    pub fn get_fill_history_for_prompt(
        &self,
        prompt_id: &str,
    ) -> Result<Vec<FillHistoryEntry>, StoreError> {
        let txn = self.store.db.begin_read()?;
        let ids = {
            let index_table = txn.open_table(HISTORY_BY_PROMPT)?;
            let (start, end) = index_value_range(prompt_id);
            let mut ids = Vec::new();
            for item in index_table.range(start.as_str()..end.as_str())? {
                let (_, id) = item?;
                ids.push(id.value().to_string());
            }
            ids
        };
        let history = txn.open_table(FILL_HISTORY)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(value) = history.get(id.as_str())? {
                out.push(serde_json::from_str(value.value())?);
            }
        }
        Ok(out)
    }

    /// Assign a fresh id and current timestamp, insert, and return the
    /// stored entry.
    pub fn add_fill_history(
        &self,
        entry: NewFillHistoryEntry,
    ) -> Result<FillHistoryEntry, StoreError> {
        let stored = FillHistoryEntry {
            id: new_id(),
            prompt_id: entry.prompt_id,
            filled_content: entry.filled_content,
            answers: entry.answers,
            created_at: now_iso(),
        };
        let txn = self.store.db.begin_write()?;
        {
            let mut history = txn.open_table(FILL_HISTORY)?;
            let mut by_prompt = txn.open_table(HISTORY_BY_PROMPT)?;
            let mut by_date = txn.open_table(HISTORY_BY_DATE)?;
            put_history_entry(&mut history, &mut by_prompt, &mut by_date, &stored)?;
        }
        txn.commit()?;
        Ok(stored)
    }

    /// Clear the fill-history collection and insert the supplied entries in
    /// one transaction. Used by restore.
    pub fn replace_fill_history(&self, entries: &[FillHistoryEntry]) -> Result<(), StoreError> {
        let txn = self.store.db.begin_write()?;
        txn.delete_table(FILL_HISTORY)?;
        txn.delete_table(HISTORY_BY_PROMPT)?;
        txn.delete_table(HISTORY_BY_DATE)?;
        {
            let mut history = txn.open_table(FILL_HISTORY)?;
            let mut by_prompt = txn.open_table(HISTORY_BY_PROMPT)?;
            let mut by_date = txn.open_table(HISTORY_BY_DATE)?;
            for entry in entries {
                put_history_entry(&mut history, &mut by_prompt, &mut by_date, entry)?;
            }
        }
        txn.commit()?;
        Ok(())
    }

    pub fn clear_fill_history(&self) -> Result<(), StoreError> {
        self.replace_fill_history(&[])
    }

    // ============ Initialization ============

    pub fn is_initialized(&self) -> Result<bool, StoreError> {
        let txn = self.store.db.begin_read()?;
        let table = txn.open_table(META)?;
        match table.get(META_KEY)? {
            Some(value) => {
                let meta: Meta = serde_json::from_str(value.value())?;
                Ok(meta.initialized)
            }
            None => Ok(false),
        }
    }

    pub fn set_initialized(&self) -> Result<(), StoreError> {
        let meta = Meta { initialized: true, last_backup: now_iso() };
        let txn = self.store.db.begin_write()?;
        {
            let mut table = txn.open_table(META)?;
            let json = serde_json::to_string(&meta)?;
            table.insert(META_KEY, json.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    /// Seed the fixed initial dataset on first run, or load the live set.
    ///
    /// Seeding happens at most once per fresh store, guarded by the
    /// `Meta.initialized` flag.
    pub fn initialize_or_load(&self) -> Result<(Vec<Prompt>, Vec<Tag>), StoreError> {
        if !self.is_initialized()? {
            let prompts = seed::seed_prompts();
            let tags = seed::seed_tags();
            self.save_all_prompts(&prompts)?;
            self.save_all_tags(&tags)?;
            self.set_initialized()?;
            info!(
                "Seeded initial dataset: {} prompts, {} tags",
                prompts.len(),
                tags.len()
            );
            return Ok((prompts, tags));
        }
        Ok((self.get_all_prompts()?, self.get_all_tags()?))
    }

    // ============ Clear all ============

    /// Clear prompts, tags, and fill history. Backups and meta are never
    /// touched. One transaction per collection.
    pub fn clear_all_data(&self) -> Result<(), StoreError> {
        self.replace_all_prompts(&[])?;
        self.save_all_tags(&[])?;
        self.clear_fill_history()?;
        Ok(())
    }

    // ============ Backup collection primitives ============

    /// Store a snapshot, prune snapshots beyond [`MAX_BACKUPS`] oldest-first,
    /// and refresh `Meta.lastBackup`, all in one transaction.
    pub(crate) fn insert_backup_pruned(
        &self,
        snapshot: &BackupSnapshot,
    ) -> Result<(), StoreError> {
        let txn = self.store.db.begin_write()?;
        {
            let mut backups = txn.open_table(BACKUPS)?;
            let mut by_date = txn.open_table(BACKUPS_BY_DATE)?;

            let json = serde_json::to_string(snapshot)?;
            backups.insert(snapshot.id.as_str(), json.as_str())?;
            by_date.insert(
                index_key(&snapshot.created_at, &snapshot.id).as_str(),
                snapshot.id.as_str(),
            )?;

            // Ascending scan of the date index is oldest-first.
            let ordered: Vec<(String, String)> = {
                let mut ordered = Vec::new();
                for item in by_date.iter()? {
                    let (key, id) = item?;
                    ordered.push((key.value().to_string(), id.value().to_string()));
                }
                ordered
            };
            if ordered.len() > MAX_BACKUPS {
                let excess = ordered.len() - MAX_BACKUPS;
                for (key, id) in &ordered[..excess] {
                    backups.remove(id.as_str())?;
                    by_date.remove(key.as_str())?;
                }
            }

            let mut meta_table = txn.open_table(META)?;
            let mut meta: Meta = match meta_table.get(META_KEY)? {
                Some(value) => serde_json::from_str(value.value())?,
                None => Meta { initialized: false, last_backup: String::new() },
            };
            meta.last_backup = snapshot.created_at.clone();
            let meta_json = serde_json::to_string(&meta)?;
            meta_table.insert(META_KEY, meta_json.as_str())?;
        }
        txn.commit()?;
        Ok(())
    }

    pub(crate) fn get_backup(&self, id: &str) -> Result<Option<BackupSnapshot>, StoreError> {
        let txn = self.store.db.begin_read()?;
        let table = txn.open_table(BACKUPS)?;
        match table.get(id)? {
            Some(value) => Ok(Some(serde_json::from_str(value.value())?)),
            None => Ok(None),
        }
    }

    pub(crate) fn backups_newest_first(&self) -> Result<Vec<BackupSnapshot>, StoreError> {
        let txn = self.store.db.begin_read()?;
        let ids = {
            let by_date = txn.open_table(BACKUPS_BY_DATE)?;
            let mut ids = Vec::new();
            for item in by_date.iter()? {
                let (_, id) = item?;
                ids.push(id.value().to_string());
            }
            ids
        };
        let backups = txn.open_table(BACKUPS)?;
        let mut out = Vec::with_capacity(ids.len());
        for id in ids {
            if let Some(value) = backups.get(id.as_str())? {
                out.push(serde_json::from_str(value.value())?);
            }
        }
        out.reverse();
        Ok(out)
    }

    /// Idempotent: removing an absent id is not an error.
    pub(crate) fn remove_backup(&self, id: &str) -> Result<bool, StoreError> {
        let txn = self.store.db.begin_write()?;
        let removed: Option<BackupSnapshot>;
        {
            let mut backups = txn.open_table(BACKUPS)?;
            removed = match backups.remove(id)? {
                Some(value) => Some(serde_json::from_str(value.value())?),
                None => None,
            };
            if let Some(snapshot) = &removed {
                let mut by_date = txn.open_table(BACKUPS_BY_DATE)?;
                by_date.remove(index_key(&snapshot.created_at, &snapshot.id).as_str())?;
            }
        }
        txn.commit()?;
        Ok(removed.is_some())
    }

    // ============ Shared helpers ============

    fn read_all<T: DeserializeOwned>(
        &self,
        def: TableDefinition<&'static str, &'static str>,
    ) -> Result<Vec<T>, StoreError> {
        let txn = self.store.db.begin_read()?;
        let table = txn.open_table(def)?;
        let mut out = Vec::new();
        for item in table.iter()? {
            let (_, value) = item?;
            out.push(serde_json::from_str(value.value())?);
        }
        Ok(out)
    }
}

/// Upsert a prompt and keep both prompt indexes consistent with it.
fn put_prompt(
    prompts: &mut Table<'_, &'static str, &'static str>,
    by_kind: &mut Table<'_, &'static str, &'static str>,
    by_category: &mut Table<'_, &'static str, &'static str>,
    prompt: &Prompt,
) -> Result<(), StoreError> {
    let previous: Option<Prompt> = match prompts.get(prompt.id.as_str())? {
        Some(value) => Some(serde_json::from_str(value.value())?),
        None => None,
    };
    if let Some(old) = previous {
        by_kind.remove(index_key(old.kind.as_str(), &old.id).as_str())?;
        by_category.remove(index_key(&old.category, &old.id).as_str())?;
    }
    let json = serde_json::to_string(prompt)?;
    prompts.insert(prompt.id.as_str(), json.as_str())?;
    by_kind.insert(index_key(prompt.kind.as_str(), &prompt.id).as_str(), prompt.id.as_str())?;
    by_category.insert(index_key(&prompt.category, &prompt.id).as_str(), prompt.id.as_str())?;
    Ok(())
}

fn put_history_entry(
    history: &mut Table<'_, &'static str, &'static str>,
    by_prompt: &mut Table<'_, &'static str, &'static str>,
    by_date: &mut Table<'_, &'static str, &'static str>,
    entry: &FillHistoryEntry,
) -> Result<(), StoreError> {
    let json = serde_json::to_string(entry)?;
    history.insert(entry.id.as_str(), json.as_str())?;
    by_prompt.insert(index_key(&entry.prompt_id, &entry.id).as_str(), entry.id.as_str())?;
    by_date.insert(index_key(&entry.created_at, &entry.id).as_str(), entry.id.as_str())?;
    Ok(())
}
