//! Data model definitions for the prompt library.
//!
//! The JSON field names on these types are load-bearing: they define both the
//! on-disk representation inside the database and the portable export format,
//! so renames here are format changes.

use std::collections::BTreeMap;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// The closed set of prompt kinds.
///
/// Serialized as `"type"` on [`Prompt`] with lowercase values
/// (`"text"`, `"image"`, `"video"`).
#[derive(Debug, Deserialize, Serialize, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum PromptKind {
    Text,
    Image,
    Video,
}

impl PromptKind {
    /// String form matching the serialized representation.
    pub fn as_str(&self) -> &'static str {
        match self {
            PromptKind::Text => "text",
            PromptKind::Image => "image",
            PromptKind::Video => "video",
        }
    }
}

/// A single library item: a reusable prompt with its searchable content.
///
/// `id` is the primary key and must be unique within the live collection.
/// Prompts are only ever written whole (insert-or-replace); the storage
/// layer never patches individual fields.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Prompt {
    /// Unique, stable identifier used as the database key.
    pub id: String,
    pub title: String,
    /// The prompt body, possibly containing `[placeholder]` markers.
    pub content: String,
    /// Tag names referencing [`Tag`] entries by name. Dangling references
    /// are tolerated; there is no foreign-key enforcement.
    pub tags: Vec<String>,
    pub category: String,
    #[serde(rename = "type")]
    pub kind: PromptKind,
    #[serde(default)]
    pub favorite: bool,
    /// Optional preview media reference shown on cards.
    #[serde(rename = "previewImage", default, skip_serializing_if = "Option::is_none")]
    pub preview_image: Option<String>,
    /// Optional references to artifacts generated from this prompt.
    #[serde(rename = "generatedMedia", default, skip_serializing_if = "Option::is_none")]
    pub generated_media: Option<Vec<String>>,
}

/// A tag. `name` is the sole identifying key.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Tag {
    pub name: String,
    /// Optional illustrative image reference.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub image: Option<String>,
}

/// One completed fill of a templated prompt. Append-only: entries are
/// inserted or bulk-cleared, never updated.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct FillHistoryEntry {
    pub id: String,
    #[serde(rename = "promptId")]
    pub prompt_id: String,
    /// The final text after substituting every placeholder.
    #[serde(rename = "filledContent")]
    pub filled_content: String,
    /// Placeholder name to chosen value.
    #[serde(default)]
    pub answers: BTreeMap<String, String>,
    /// UTC RFC 3339 creation timestamp.
    #[serde(rename = "createdAt")]
    pub created_at: String,
}

/// Caller-supplied portion of a fill-history entry; id and timestamp are
/// assigned by the repository on insert.
#[derive(Debug, Clone)]
pub struct NewFillHistoryEntry {
    pub prompt_id: String,
    pub filled_content: String,
    pub answers: BTreeMap<String, String>,
}

/// An immutable full copy of the dataset captured at one instant.
///
/// Snapshots hold deep copies: later mutation of the live collections is
/// never visible through a previously stored snapshot.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct BackupSnapshot {
    pub id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    pub prompts: Vec<Prompt>,
    pub tags: Vec<Tag>,
    #[serde(rename = "fillHistory")]
    pub fill_history: Vec<FillHistoryEntry>,
}

/// Singleton metadata record stored under the `"app"` key.
#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Meta {
    pub initialized: bool,
    #[serde(rename = "lastBackup")]
    pub last_backup: String,
}

/// Current UTC time as a fixed-width RFC 3339 string.
///
/// Fixed width with a trailing `Z` keeps lexicographic order equal to
/// chronological order, which the date-keyed secondary indexes rely on.
pub fn now_iso() -> String {
    Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Fresh unique identifier for snapshots and fill-history entries.
pub fn new_id() -> String {
    uuid::Uuid::new_v4().to_string()
}
