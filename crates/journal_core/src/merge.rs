//! Reconciliation of freshly parsed records into the journal store.
//!
//! # Responsibility
//! - Find-or-create section and entry slots for parsed entries.
//! - Fold intro blocks into their section without disturbing entries.
//!
//! # Invariants
//! - A merge never replaces a stored response with the parser's empty one.
//! - Entry matching is scoped to the section named by the parsed entry.

use crate::model::journal::{Entry, JournalStore};
use crate::parse::note::ParsedIntro;

/// Merges a parsed entry, returning its `(section, entry)` indices.
///
/// Entries arrive from the parser with an empty response. When the
/// `(section, prompt)` slot already exists, the stored response is kept and
/// only the authoring metadata (take-action flag, submit button, feedback)
/// is refreshed from the parse.
pub fn merge_entry(store: &mut JournalStore, parsed: Entry) -> (usize, usize) {
    let section_index = store.find_section(&parsed.section);

    match section_index {
        None => {
            let section_index =
                store.upsert_section(&parsed.section, None, None, None);
            let entry_index = store.upsert_entry(section_index, parsed);
            (section_index, entry_index)
        }
        Some(section_index) => {
            let mut merged = parsed;
            if let Some(entry_index) = store.find_entry(section_index, &merged.prompt) {
                let existing = &store.sections[section_index].entries[entry_index];
                merged.response = existing.response.clone();
            }
            let entry_index = store.upsert_entry(section_index, merged);
            (section_index, entry_index)
        }
    }
}

/// Applies a section intro: order and intro fields, entries untouched.
///
/// Returns the section's index after the re-sort so callers can render it.
pub fn apply_intro(store: &mut JournalStore, intro: &ParsedIntro) -> usize {
    store.upsert_section(
        &intro.section,
        intro.order,
        Some(&intro.intro_title),
        Some(&intro.intro_text),
    )
}

#[cfg(test)]
mod tests {
    use super::{apply_intro, merge_entry};
    use crate::model::journal::{Entry, JournalStore};
    use crate::parse::note::ParsedIntro;

    fn entry(section: &str, prompt: &str) -> Entry {
        Entry::new(section, prompt)
    }

    #[test]
    fn new_section_gets_created_with_first_entry() {
        let mut store = JournalStore::new();
        let (s, e) = merge_entry(&mut store, entry("Week 1", "What did you learn?"));

        assert_eq!((s, e), (0, 0));
        assert_eq!(store.sections.len(), 1);
        assert_eq!(store.sections[0].entries.len(), 1);
    }

    #[test]
    fn reparse_preserves_stored_response_and_refreshes_metadata() {
        let mut store = JournalStore::new();
        let (s, e) = merge_entry(&mut store, entry("Week 1", "What did you learn?"));
        store.sections[s].entries[e].response = "I learned X".to_string();

        let mut reparsed = entry("Week 1", "What did you learn?");
        reparsed.is_take_action = true;
        let (s, e) = merge_entry(&mut store, reparsed);

        let merged = &store.sections[s].entries[e];
        assert_eq!(merged.response, "I learned X");
        assert!(merged.is_take_action);
        assert_eq!(store.sections[s].entries.len(), 1);
    }

    #[test]
    fn same_prompt_in_another_section_is_a_distinct_entry() {
        let mut store = JournalStore::new();
        let (s1, _) = merge_entry(&mut store, entry("Week 1", "Reflect?"));
        store.sections[s1].entries[0].response = "week one".to_string();

        let (s2, e2) = merge_entry(&mut store, entry("Week 2", "Reflect?"));

        assert_ne!(s1, s2);
        assert!(store.sections[s2].entries[e2].response.is_empty());
        assert_eq!(store.sections[s1].entries[0].response, "week one");
    }

    #[test]
    fn intro_orders_sections_without_losing_entries() {
        let mut store = JournalStore::new();
        merge_entry(&mut store, entry("Week 1", "P1"));

        apply_intro(
            &mut store,
            &ParsedIntro {
                section: "Week 1".to_string(),
                order: Some(2),
                intro_title: "Reflect".to_string(),
                intro_text: "Think about it.".to_string(),
            },
        );
        apply_intro(
            &mut store,
            &ParsedIntro {
                section: "Week 0".to_string(),
                order: Some(1),
                intro_title: "Start".to_string(),
                intro_text: "Begin here.".to_string(),
            },
        );

        let titles: Vec<&str> = store.sections.iter().map(|s| s.title.as_str()).collect();
        assert_eq!(titles, ["Week 0", "Week 1"]);
        assert_eq!(store.sections[1].entries.len(), 1);
        assert_eq!(store.sections[1].intro_title, "Reflect");
    }
}
