//! Print and mail renderings of the journal store.
//!
//! # Responsibility
//! - Produce the printable HTML document and the plain-text mail body.
//! - Apply the take-action / non-empty-response inclusion filter.
//!
//! # Invariants
//! - Sections are emitted in stored order.
//! - A section with no passing entry leaves no trace in the output.
//! - Page breaks appear only between consecutive included sections.

use crate::model::journal::{JournalStore, Section};
use chrono::{DateTime, Local};

const PRINT_TITLE_ALL: &str = "Learning Journal";
const PRINT_TITLE_TAKE_ACTION: &str = "Take Action Items";
const PAGE_BREAK: &str = "<div class='pagebreak'></div>";
const MAIL_LINE: &str = "\n";
const MAIL_SECTION_SEPARATOR: &str = "\n\n";

/// Entries an export includes: optionally take-action only, never blank.
fn passes_filter(take_action_only: bool, is_take_action: bool, response: &str) -> bool {
    (!take_action_only || is_take_action) && !response.is_empty()
}

fn included_entries(section: &Section, take_action_only: bool) -> Vec<usize> {
    section
        .entries
        .iter()
        .enumerate()
        .filter(|(_, e)| passes_filter(take_action_only, e.is_take_action, &e.response))
        .map(|(index, _)| index)
        .collect()
}

/// Renders the printable HTML document for the whole store.
///
/// The host opens this in its print surface; styling hooks are class names
/// only, CSS belongs to the host.
pub fn format_print_document(
    store: &JournalStore,
    take_action_only: bool,
    course_title: &str,
    printed_on: DateTime<Local>,
) -> String {
    let print_title = if take_action_only {
        PRINT_TITLE_TAKE_ACTION
    } else {
        PRINT_TITLE_ALL
    };

    let mut contents = String::from("<html><head></head><body>");
    contents.push_str(&format!(
        "<div class='headertext'>{} {}</div>",
        course_title.trim(),
        print_title
    ));
    contents.push_str(&format!(
        "<div class='date'>{}</div>",
        printed_on.format("%B %d, %Y")
    ));

    let mut rendered_sections = Vec::new();
    for section in &store.sections {
        let entry_indexes = included_entries(section, take_action_only);
        if entry_indexes.is_empty() {
            continue;
        }

        let mut area = String::from("<div class='sectionarea'>");
        area.push_str(&format!(
            "<div class='sectiontitle'>Section: {}</div>",
            section.title
        ));
        if !section.intro_title.is_empty() {
            area.push_str(&format!(
                "<div class='sectionintrocontainer'>\
                 <div class='sectionintrotitle'>{}</div>\
                 <div class='sectionintrotext'>{}</div>\
                 </div>",
                section.intro_title, section.intro_text
            ));
        }
        for index in entry_indexes {
            let entry = &section.entries[index];
            area.push_str(&format!("<div class='prompt'>{}</div>", entry.prompt));
            area.push_str(&format!("<div class='response'>{}</div>", entry.response));
        }
        area.push_str("</div>");
        rendered_sections.push(area);
    }

    contents.push_str(&rendered_sections.join(PAGE_BREAK));
    contents.push_str("</body></html>");
    contents
}

/// Renders the plain-text mail body.
///
/// Always includes all take-action states; the only filter is a non-empty
/// response. The host URI-encodes the result into a mailto link.
pub fn format_mail_body(store: &JournalStore, course_title: &str) -> String {
    let mut sections_text = Vec::new();

    for section in &store.sections {
        let entry_indexes = included_entries(section, false);
        if entry_indexes.is_empty() {
            continue;
        }

        let mut lines = vec![format!("Section: {}", section.title)];
        for index in entry_indexes {
            let entry = &section.entries[index];
            lines.push(entry.prompt.clone());
            lines.push(entry.response.clone());
        }
        sections_text.push(lines.join(MAIL_LINE));
    }

    let mut body = String::new();
    let title = course_title.trim();
    if !title.is_empty() {
        body.push_str(title);
        body.push_str(MAIL_SECTION_SEPARATOR);
    }
    body.push_str(&sections_text.join(MAIL_SECTION_SEPARATOR));
    body
}

/// Window/document title for a print surface, unique per second.
pub fn print_window_title(now: DateTime<Local>) -> String {
    format!("Print {}", now.format("%Y%m%d%H%M%S"))
}

#[cfg(test)]
mod tests {
    use super::{format_mail_body, format_print_document, print_window_title, PAGE_BREAK};
    use crate::model::journal::{Entry, JournalStore};
    use chrono::{Local, TimeZone};

    fn store_with(entries: &[(&str, &str, &str, bool)]) -> JournalStore {
        let mut store = JournalStore::new();
        for (section, prompt, response, take_action) in entries {
            let index = store.upsert_section(section, None, None, None);
            let mut entry = Entry::new(*section, *prompt);
            entry.response = response.to_string();
            entry.is_take_action = *take_action;
            store.upsert_entry(index, entry);
        }
        store
    }

    fn fixed_now() -> chrono::DateTime<Local> {
        Local.with_ymd_and_hms(2026, 3, 14, 9, 26, 53).unwrap()
    }

    #[test]
    fn empty_response_sections_are_omitted_entirely() {
        let store = store_with(&[("Week 1", "Prompt?", "", false)]);

        let mail = format_mail_body(&store, "Course");
        assert!(!mail.contains("Week 1"));

        let html = format_print_document(&store, false, "Course", fixed_now());
        assert!(!html.contains("Week 1"));
    }

    #[test]
    fn take_action_filter_skips_unmarked_entries() {
        let store = store_with(&[
            ("Week 1", "Plain?", "answered", false),
            ("Week 1", "Act?", "will do", true),
        ]);

        let html = format_print_document(&store, true, "Course", fixed_now());
        assert!(html.contains("Act?"));
        assert!(!html.contains("Plain?"));
        assert!(html.contains("Take Action Items"));
    }

    #[test]
    fn page_breaks_only_between_included_sections() {
        let store = store_with(&[
            ("A", "P1", "r1", false),
            ("B", "P2", "", false),
            ("C", "P3", "r3", false),
        ]);

        let html = format_print_document(&store, false, "Course", fixed_now());
        assert_eq!(html.matches(PAGE_BREAK).count(), 1);
        assert!(!html.ends_with(&format!("{PAGE_BREAK}</body></html>")));
    }

    #[test]
    fn single_included_section_has_no_page_break() {
        let store = store_with(&[("A", "P1", "r1", false)]);
        let html = format_print_document(&store, false, "Course", fixed_now());
        assert_eq!(html.matches(PAGE_BREAK).count(), 0);
    }

    #[test]
    fn mail_body_uses_plain_text_separators() {
        let store = store_with(&[
            ("A", "P1", "r1", false),
            ("B", "P2", "r2", false),
        ]);

        let mail = format_mail_body(&store, "Course");
        assert_eq!(
            mail,
            "Course\n\nSection: A\nP1\nr1\n\nSection: B\nP2\nr2"
        );
        assert!(!mail.contains('<'));
    }

    #[test]
    fn print_header_carries_course_title_and_date() {
        let store = store_with(&[("A", "P1", "r1", false)]);
        let html = format_print_document(&store, false, "Safety 101", fixed_now());
        assert!(html.contains("Safety 101 Learning Journal"));
        assert!(html.contains("March 14, 2026"));
    }

    #[test]
    fn window_title_is_a_second_resolution_timestamp() {
        assert_eq!(print_window_title(fixed_now()), "Print 20260314092653");
    }
}
