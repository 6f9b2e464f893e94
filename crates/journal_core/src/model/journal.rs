//! Journal store: ordered sections of prompt/response entries.
//!
//! # Responsibility
//! - Hold the per-page journal state in display order.
//! - Provide lookup/upsert operations with stable-order maintenance.
//! - Round-trip the whole container through its JSON wire form.
//!
//! # Invariants
//! - No two sections share a `title`; no two entries in one section share a
//!   `prompt`.
//! - Sections are kept in non-decreasing `order`; equal orders keep
//!   insertion order (stable sort).
//! - An upsert never touches a section's `entries` list.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Order assigned to sections that never received an explicit
/// `Section Order:` value. Sorts after every explicit order.
pub const DEFAULT_SECTION_ORDER: i64 = i64::MAX;

/// One prompt/response pair authored into the course page.
///
/// `section` is repeated here because the `(section, prompt)` pair is the
/// entry's identity across parses and reloads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Entry {
    pub section: String,
    pub prompt: String,
    /// Learner-authored text. Mutable; preserved across re-parses.
    #[serde(default)]
    pub response: String,
    #[serde(default)]
    pub is_take_action: bool,
    /// Whether the entry renders a Submit button gating `button_feedback`.
    #[serde(default)]
    pub has_submit_button: bool,
    #[serde(default)]
    pub button_feedback: String,
}

impl Entry {
    /// Creates an entry with an empty response, as the parser produces it.
    pub fn new(section: impl Into<String>, prompt: impl Into<String>) -> Self {
        Self {
            section: section.into(),
            prompt: prompt.into(),
            response: String::new(),
            is_take_action: false,
            has_submit_button: false,
            button_feedback: String::new(),
        }
    }
}

/// A named grouping of entries, orderable for display and printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    #[serde(default = "default_order")]
    pub order: i64,
    #[serde(default)]
    pub intro_title: String,
    #[serde(default)]
    pub intro_text: String,
    #[serde(default)]
    pub entries: Vec<Entry>,
}

fn default_order() -> i64 {
    DEFAULT_SECTION_ORDER
}

impl Section {
    pub fn new(title: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            order: DEFAULT_SECTION_ORDER,
            intro_title: String::new(),
            intro_text: String::new(),
            entries: Vec::new(),
        }
    }
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Errors raised by store serialization.
#[derive(Debug)]
pub enum StoreError {
    /// Persisted bytes were present but not a well-formed store payload.
    CorruptData(serde_json::Error),
}

impl Display for StoreError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::CorruptData(err) => write!(f, "corrupt journal payload: {err}"),
        }
    }
}

impl Error for StoreError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::CorruptData(err) => Some(err),
        }
    }
}

/// The whole per-page journal: an ordered list of sections.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JournalStore {
    #[serde(default)]
    pub sections: Vec<Section>,
}

impl JournalStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Index of the section with this exact title.
    pub fn find_section(&self, title: &str) -> Option<usize> {
        self.sections.iter().position(|s| s.title == title)
    }

    /// Index of the entry with this prompt within one section.
    pub fn find_entry(&self, section_index: usize, prompt: &str) -> Option<usize> {
        self.sections
            .get(section_index)
            .and_then(|s| s.entries.iter().position(|e| e.prompt == prompt))
    }

    /// Creates or updates a section, then restores order.
    ///
    /// Supplied fields overwrite; `None` leaves the existing value alone.
    /// Entries are never touched here. Returns the section's index after the
    /// stable re-sort.
    pub fn upsert_section(
        &mut self,
        title: &str,
        order: Option<i64>,
        intro_title: Option<&str>,
        intro_text: Option<&str>,
    ) -> usize {
        match self.find_section(title) {
            Some(index) => {
                let section = &mut self.sections[index];
                if let Some(order) = order {
                    section.order = order;
                }
                if let Some(intro_title) = intro_title {
                    section.intro_title = intro_title.to_string();
                }
                if let Some(intro_text) = intro_text {
                    section.intro_text = intro_text.to_string();
                }
            }
            None => {
                let mut section = Section::new(title);
                if let Some(order) = order {
                    section.order = order;
                }
                if let Some(intro_title) = intro_title {
                    section.intro_title = intro_title.to_string();
                }
                if let Some(intro_text) = intro_text {
                    section.intro_text = intro_text.to_string();
                }
                self.sections.push(section);
            }
        }
        self.restore_order();
        // Title uniqueness guarantees the section is still findable.
        self.find_section(title).unwrap_or(0)
    }

    /// Appends or replaces an entry inside an existing section.
    ///
    /// Matching is by prompt; a replace keeps the slot position. Returns the
    /// entry's index within the section.
    pub fn upsert_entry(&mut self, section_index: usize, entry: Entry) -> usize {
        let section = &mut self.sections[section_index];
        match section.entries.iter().position(|e| e.prompt == entry.prompt) {
            Some(index) => {
                section.entries[index] = entry;
                index
            }
            None => {
                section.entries.push(entry);
                section.entries.len() - 1
            }
        }
    }

    /// Stable sort by `order`; sentinel-order sections sink to the end in
    /// insertion order.
    pub fn restore_order(&mut self) {
        self.sections.sort_by_key(|s| s.order);
    }

    /// JSON wire form of the whole store.
    pub fn serialize(&self) -> StoreResult<String> {
        serde_json::to_string(self).map_err(StoreError::CorruptData)
    }

    /// Rebuilds a store from its wire form.
    ///
    /// Absent or empty payloads are a valid empty store; anything else that
    /// fails to parse is `CorruptData`.
    pub fn deserialize(payload: &str) -> StoreResult<Self> {
        if payload.trim().is_empty() {
            return Ok(Self::new());
        }
        serde_json::from_str(payload).map_err(StoreError::CorruptData)
    }
}

#[cfg(test)]
mod tests {
    use super::{Entry, JournalStore, DEFAULT_SECTION_ORDER};

    #[test]
    fn upsert_section_preserves_unsupplied_fields() {
        let mut store = JournalStore::new();
        store.upsert_section("Week 1", Some(3), Some("Reflect"), Some("Think."));
        let index = store.upsert_section("Week 1", None, None, None);

        let section = &store.sections[index];
        assert_eq!(section.order, 3);
        assert_eq!(section.intro_title, "Reflect");
        assert_eq!(section.intro_text, "Think.");
    }

    #[test]
    fn sections_without_order_sort_last_in_insertion_order() {
        let mut store = JournalStore::new();
        store.upsert_section("B", None, None, None);
        store.upsert_section("C", None, None, None);
        store.upsert_section("A", Some(1), None, None);

        let titles: Vec<&str> = store.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["A", "B", "C"]);
        assert_eq!(store.sections[1].order, DEFAULT_SECTION_ORDER);
    }

    #[test]
    fn upsert_entry_replaces_by_prompt_in_place() {
        let mut store = JournalStore::new();
        let section = store.upsert_section("Week 1", None, None, None);
        store.upsert_entry(section, Entry::new("Week 1", "first"));
        store.upsert_entry(section, Entry::new("Week 1", "second"));

        let mut replacement = Entry::new("Week 1", "first");
        replacement.is_take_action = true;
        let index = store.upsert_entry(section, replacement);

        assert_eq!(index, 0);
        assert_eq!(store.sections[section].entries.len(), 2);
        assert!(store.sections[section].entries[0].is_take_action);
    }

    #[test]
    fn empty_payload_is_an_empty_store() {
        assert!(JournalStore::deserialize("").expect("empty is valid").is_empty());
        assert!(JournalStore::deserialize("  ").expect("blank is valid").is_empty());
    }
}
