//! Export/Import Subsystem.
//!
//! The export document is a portable, pretty-printed UTF-8 JSON file with an
//! explicit format version. Import never touches live data before a safety
//! backup has been committed, and validation is strictly side-effect free:
//! it reports a list of human-readable problems instead of failing.

use std::path::Path;

use log::{info, warn};
use serde::{Deserialize, Serialize};
use serde_json::Value as JsonValue;

use crate::backup::create_backup;
use crate::error::StoreError;
use crate::models::{now_iso, FillHistoryEntry, Prompt, Tag};
use crate::repository::Repository;

/// Version stamped into every export document.
pub const EXPORT_VERSION: u32 = 1;

const PRODUCT_NAME: &str = "prompt-library";

/// The portable whole-dataset document.
#[derive(Debug, Deserialize, Serialize, Clone)]
pub struct ExportDocument {
    pub version: u32,
    #[serde(rename = "exportedAt")]
    pub exported_at: String,
    pub prompts: Vec<Prompt>,
    pub tags: Vec<Tag>,
    #[serde(rename = "fillHistory")]
    pub fill_history: Vec<FillHistoryEntry>,
}

/// Outcome of structural validation: a validity flag plus every problem
/// found. Validation never fails with an error of its own.
#[derive(Debug, Clone)]
pub struct ValidationReport {
    pub valid: bool,
    pub errors: Vec<String>,
}

/// Assemble an export document from the live collections.
pub fn export_document(repo: &Repository) -> Result<ExportDocument, StoreError> {
    Ok(ExportDocument {
        version: EXPORT_VERSION,
        exported_at: now_iso(),
        prompts: repo.get_all_prompts()?,
        tags: repo.get_all_tags()?,
        fill_history: repo.get_fill_history()?,
    })
}

/// Suggested download name, encoding the current UTC date:
/// `prompt-library-YYYY-MM-DD.json`.
pub fn export_file_name() -> String {
    format!("{}-{}.json", PRODUCT_NAME, chrono::Utc::now().format("%Y-%m-%d"))
}

/// Serialize a document to pretty-printed JSON.
pub fn document_to_json(document: &ExportDocument) -> Result<String, StoreError> {
    Ok(serde_json::to_string_pretty(document)?)
}

/// Write a document to disk as pretty-printed UTF-8 JSON.
pub fn write_document_to_file(
    document: &ExportDocument,
    path: impl AsRef<Path>,
) -> Result<(), StoreError> {
    let json = document_to_json(document)?;
    std::fs::write(path.as_ref(), json)?;
    info!("Exported dataset to {}", path.as_ref().display());
    Ok(())
}

/// Read a file and parse it as a candidate document.
///
/// An unreadable file yields [`StoreError::Io`]; unparseable content yields
/// [`StoreError::Serialization`]. The result is raw JSON: run it through
/// [`validate_document`] before importing.
pub fn read_document_from_file(path: impl AsRef<Path>) -> Result<JsonValue, StoreError> {
    let text = std::fs::read_to_string(path.as_ref())?;
    serde_json::from_str(&text)
        .map_err(|e| StoreError::Serialization(format!("Invalid JSON file: {}", e)))
}

fn is_valid_prompt(value: &JsonValue) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("id").map_or(false, JsonValue::is_string)
        && obj.get("title").map_or(false, JsonValue::is_string)
        && obj.get("content").map_or(false, JsonValue::is_string)
        && obj.get("tags").map_or(false, JsonValue::is_array)
        && obj.get("category").map_or(false, JsonValue::is_string)
        && matches!(
            obj.get("type").and_then(JsonValue::as_str),
            Some("text") | Some("image") | Some("video")
        )
}

fn is_valid_tag(value: &JsonValue) -> bool {
    value
        .as_object()
        .map_or(false, |obj| obj.get("name").map_or(false, JsonValue::is_string))
}

fn is_valid_fill_history(value: &JsonValue) -> bool {
    let Some(obj) = value.as_object() else {
        return false;
    };
    obj.get("id").map_or(false, JsonValue::is_string)
        && obj.get("promptId").map_or(false, JsonValue::is_string)
        && obj.get("filledContent").map_or(false, JsonValue::is_string)
        && obj.get("createdAt").map_or(false, JsonValue::is_string)
}

/// Structurally validate a candidate import document. No side effects.
pub fn validate_document(candidate: &JsonValue) -> ValidationReport {
    let mut errors = Vec::new();

    let Some(obj) = candidate.as_object() else {
        return ValidationReport { valid: false, errors: vec!["Invalid data format".to_string()] };
    };

    if !obj.get("version").map_or(false, JsonValue::is_number) {
        errors.push("Missing or invalid version".to_string());
    }

    match obj.get("prompts").and_then(JsonValue::as_array) {
        Some(prompts) => {
            for (i, prompt) in prompts.iter().enumerate() {
                if !is_valid_prompt(prompt) {
                    errors.push(format!("Invalid prompt at index {}", i));
                }
            }
        }
        None => errors.push("Missing prompts array".to_string()),
    }

    match obj.get("tags").and_then(JsonValue::as_array) {
        Some(tags) => {
            for (i, tag) in tags.iter().enumerate() {
                if !is_valid_tag(tag) {
                    errors.push(format!("Invalid tag at index {}", i));
                }
            }
        }
        None => errors.push("Missing tags array".to_string()),
    }

    if let Some(history) = obj.get("fillHistory") {
        if !history.is_array() {
            errors.push("Invalid fillHistory format".to_string());
        }
    }

    ValidationReport { valid: errors.is_empty(), errors }
}

/// Replace the live dataset with an imported document.
///
/// A full backup is always created first, even when the caller has already
/// validated, so the prior state stays recoverable. Prompts and tags must
/// deserialize cleanly ([`StoreError::Validation`] otherwise, raised before
/// any live data is cleared); fill-history entries are shape-checked one by
/// one and malformed ones are dropped rather than failing the import.
pub fn import_document(repo: &Repository, document: &JsonValue) -> Result<(), StoreError> {
    create_backup(repo)?;

    let prompts: Vec<Prompt> =
        serde_json::from_value(document.get("prompts").cloned().unwrap_or(JsonValue::Null))
            .map_err(|e| StoreError::Validation(format!("Malformed prompts: {}", e)))?;
    let tags: Vec<Tag> =
        serde_json::from_value(document.get("tags").cloned().unwrap_or(JsonValue::Null))
            .map_err(|e| StoreError::Validation(format!("Malformed tags: {}", e)))?;

    repo.clear_all_data()?;
    repo.save_all_prompts(&prompts)?;
    repo.save_all_tags(&tags)?;

    if let Some(JsonValue::Array(items)) = document.get("fillHistory") {
        let mut kept: Vec<FillHistoryEntry> = Vec::with_capacity(items.len());
        let mut dropped = 0usize;
        for item in items {
            if is_valid_fill_history(item) {
                if let Ok(entry) = serde_json::from_value::<FillHistoryEntry>(item.clone()) {
                    kept.push(entry);
                    continue;
                }
            }
            dropped += 1;
        }
        if dropped > 0 {
            warn!("Import dropped {} malformed fill-history entries", dropped);
        }
        repo.replace_fill_history(&kept)?;
    }

    info!("Imported {} prompts and {} tags", prompts.len(), tags.len());
    Ok(())
}
