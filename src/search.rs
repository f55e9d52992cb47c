//! Incremental search index over the live prompt list.
//!
//! Each prompt gets one precomputed, lowercased search blob (title + tags +
//! content). On rebuild, a content fingerprint over exactly those fields
//! decides whether the previous blob can be reused, so favorite toggles and
//! other non-indexed changes never pay for recomputation. The cache is
//! replaced wholesale on every rebuild: entries for deleted prompts do not
//! linger.
//!
//! Everything here is synchronous and purely in-memory; the index never
//! touches the store.

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::time::{Duration, Instant};

use log::debug;

use crate::models::{Prompt, PromptKind};

/// Filter parameters for one query. Filters are applied in declaration
/// order: kind, category, tags, then free text.
#[derive(Debug, Clone)]
pub struct SearchQuery {
    /// Free-text filter, matched as a case-insensitive substring of the
    /// precomputed blob. Empty bypasses.
    pub text: String,
    /// Exact kind match; `None` matches any kind.
    pub kind: Option<PromptKind>,
    /// Exact category match; the `"All"` sentinel bypasses.
    pub category: String,
    /// Candidate matches when its tag list intersects this set; an empty
    /// selection bypasses.
    pub tags: Vec<String>,
}

impl Default for SearchQuery {
    fn default() -> Self {
        Self { text: String::new(), kind: None, category: "All".to_string(), tags: Vec::new() }
    }
}

/// Query results in original list order, plus the wall-clock duration of
/// the filtering pass. The duration is telemetry, not a correctness signal.
#[derive(Debug, Clone)]
pub struct SearchOutcome {
    pub results: Vec<Prompt>,
    pub elapsed: Duration,
}

struct IndexEntry {
    id: String,
    fingerprint: u64,
    search_text: String,
    prompt: Prompt,
}

/// The denormalized per-prompt search cache.
#[derive(Default)]
pub struct SearchIndex {
    entries: Vec<IndexEntry>,
    recomputed: u64,
}

impl SearchIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Recompute the cache against a new prompt list.
    ///
    /// Prompts whose title, tags, and content are unchanged keep their
    /// previously computed blob; everything else is recomputed. The new
    /// cache fully replaces the old one.
    pub fn rebuild(&mut self, prompts: &[Prompt]) {
        let mut previous: HashMap<String, IndexEntry> =
            self.entries.drain(..).map(|e| (e.id.clone(), e)).collect();

        let mut entries = Vec::with_capacity(prompts.len());
        for prompt in prompts {
            let fingerprint = content_fingerprint(prompt);
            let search_text = match previous.remove(&prompt.id) {
                Some(old) if old.fingerprint == fingerprint => old.search_text,
                _ => {
                    self.recomputed += 1;
                    compute_search_text(prompt)
                }
            };
            entries.push(IndexEntry {
                id: prompt.id.clone(),
                fingerprint,
                search_text,
                prompt: prompt.clone(),
            });
        }
        self.entries = entries;
    }

    /// Number of indexed prompts.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Total blob recomputations since construction. Rebuilds that reuse
    /// every entry leave this unchanged.
    pub fn recompute_count(&self) -> u64 {
        self.recomputed
    }

    /// Run a filter pass over the indexed prompts.
    ///
    /// Deterministic and order-preserving for a fixed index and query.
    pub fn search(&self, query: &SearchQuery) -> SearchOutcome {
        let start = Instant::now();
        let needle = query.text.to_lowercase();

        let mut results = Vec::new();
        for entry in &self.entries {
            if let Some(kind) = query.kind {
                if entry.prompt.kind != kind {
                    continue;
                }
            }
            if query.category != "All" && entry.prompt.category != query.category {
                continue;
            }
            if !query.tags.is_empty()
                && !query.tags.iter().any(|tag| entry.prompt.tags.contains(tag))
            {
                continue;
            }
            if !needle.is_empty() && !entry.search_text.contains(&needle) {
                continue;
            }
            results.push(entry.prompt.clone());
        }

        let elapsed = start.elapsed();
        debug!(
            "search matched {} of {} prompts in {:?}",
            results.len(),
            self.entries.len(),
            elapsed
        );
        SearchOutcome { results, elapsed }
    }
}

/// Fingerprint over the indexed fields only. Changes to favorite or media
/// references leave it stable.
fn content_fingerprint(prompt: &Prompt) -> u64 {
    let mut hasher = DefaultHasher::new();
    prompt.title.hash(&mut hasher);
    prompt.tags.hash(&mut hasher);
    prompt.content.hash(&mut hasher);
    hasher.finish()
}

fn compute_search_text(prompt: &Prompt) -> String {
    format!("{} {} {}", prompt.title, prompt.tags.join(" "), prompt.content).to_lowercase()
}
