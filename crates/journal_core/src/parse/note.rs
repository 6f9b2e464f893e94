//! Parser for authoring blocks ("notes") found in the course page.
//!
//! A note is an ordered list of text lines. The first line is a flag that
//! selects the block kind; the remaining lines carry `Label: value` fields.
//! Unknown first lines leave the block untouched for the host page.

use crate::model::journal::{Entry, DEFAULT_SECTION_ORDER};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// First-line flags recognized by the scanner.
pub const FLAG_ENTRY: &str = "Journal Entry";
pub const FLAG_BUTTONS: &str = "Journal Buttons";
pub const FLAG_INTRO: &str = "Section Intro";

/// Field labels. Authors must type these exactly, colon included.
pub const LABEL_SECTION: &str = "Section:";
pub const LABEL_PROMPT: &str = "Prompt:";
pub const LABEL_TAKE_ACTION: &str = "Take Action:";
pub const LABEL_BUTTON: &str = "Button:";
pub const LABEL_FEEDBACK: &str = "Feedback:";
pub const LABEL_SECTION_ORDER: &str = "Section Order:";
pub const LABEL_INTRO_TITLE: &str = "Intro Title:";
pub const LABEL_INTRO_TEXT: &str = "Intro Text:";
pub const LABEL_COURSE_TITLE: &str = "Course Title:";
pub const LABEL_EMAIL_BUTTON: &str = "Email Button:";
pub const LABEL_EMAIL_ADDRESS: &str = "Email Address:";

/// Paragraph separator for multi-line intro text, kept in the original
/// authoring tool's HTML form so stored text prints unchanged.
pub const PARAGRAPH_BREAK: &str = "<br /><br />";

/// One authoring block lifted out of the host page: its lines, in order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NoteBlock {
    pub lines: Vec<String>,
}

impl NoteBlock {
    pub fn new(lines: Vec<String>) -> Self {
        Self { lines }
    }

    /// Builds a block from already-split text, dropping blank edges.
    ///
    /// Interior blank lines are kept: inside a multi-line intro they are
    /// deliberate empty paragraphs.
    pub fn from_text(text: &str) -> Self {
        let mut lines: Vec<String> = text.lines().map(|line| line.trim().to_string()).collect();
        while lines.first().is_some_and(|line| line.is_empty()) {
            lines.remove(0);
        }
        while lines.last().is_some_and(|line| line.is_empty()) {
            lines.pop();
        }
        Self { lines }
    }

    /// Classifies the block by its first line.
    pub fn kind(&self) -> BlockKind {
        match self.lines.first().map(|line| line.trim()) {
            Some(FLAG_ENTRY) => BlockKind::Entry,
            Some(FLAG_BUTTONS) => BlockKind::Buttons,
            Some(FLAG_INTRO) => BlockKind::Intro,
            _ => BlockKind::Unrecognized,
        }
    }

    fn body(&self) -> &[String] {
        self.lines.get(1..).unwrap_or(&[])
    }
}

/// What the first line of a block says it is.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BlockKind {
    Entry,
    Buttons,
    Intro,
    Unrecognized,
}

/// Section intro extracted from a `Section Intro` block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedIntro {
    pub section: String,
    /// `None` when the author gave no order or an unparsable one.
    pub order: Option<i64>,
    pub intro_title: String,
    pub intro_text: String,
}

/// Button configuration extracted from a `Journal Buttons` block.
///
/// Every field is optional at authoring time; the defaults render plain
/// print buttons with no email option.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ButtonsConfig {
    pub course_title: String,
    pub include_email_button: bool,
    pub email_address: String,
}

/// A successfully parsed block, ready for reconciliation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParsedRecord {
    Entry(Entry),
    Intro(ParsedIntro),
    Buttons(ButtonsConfig),
}

pub type ParseResult<T> = Result<T, ParseError>;

#[derive(Debug, PartialEq, Eq)]
pub enum ParseError {
    /// A required field was empty or absent; the block is discarded whole.
    MalformedBlock { kind: BlockKind, missing: &'static str },
}

impl Display for ParseError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::MalformedBlock { kind, missing } => {
                write!(f, "malformed {kind:?} block: missing required field `{missing}`")
            }
        }
    }
}

impl Error for ParseError {}

/// Value of the line matching `label`, label stripped and trimmed.
/// Duplicate labels: the last occurrence wins.
fn field_value<'a>(lines: &'a [String], label: &str) -> Option<&'a str> {
    lines
        .iter()
        .rev()
        .find(|line| line.starts_with(label))
        .map(|line| line[label.len()..].trim())
}

/// Yes/no authoring convention: only a literal (case-folded) `yes` is true.
fn field_flag(lines: &[String], label: &str) -> bool {
    field_value(lines, label)
        .map(|value| value.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

/// Integer field with silent sentinel fallback on bad input.
fn field_order(lines: &[String], label: &str) -> Option<i64> {
    let raw = field_value(lines, label)?;
    match raw.parse::<i64>() {
        Ok(order) => Some(order),
        Err(_) => {
            log::debug!(
                "event=order_fallback module=parse status=ok raw_len={}",
                raw.len()
            );
            Some(DEFAULT_SECTION_ORDER)
        }
    }
}

/// Parses any recognized block into its record.
///
/// Unrecognized blocks are not an error at this layer; callers decide
/// whether to skip them. Returns `MalformedBlock` when required fields are
/// missing so the store is never touched by a partial record.
pub fn parse_block(block: &NoteBlock) -> ParseResult<Option<ParsedRecord>> {
    match block.kind() {
        BlockKind::Entry => parse_entry(block).map(|e| Some(ParsedRecord::Entry(e))),
        BlockKind::Intro => parse_intro(block).map(|i| Some(ParsedRecord::Intro(i))),
        BlockKind::Buttons => Ok(Some(ParsedRecord::Buttons(parse_buttons(block)))),
        BlockKind::Unrecognized => Ok(None),
    }
}

/// `Journal Entry` block: requires a section and a prompt.
pub fn parse_entry(block: &NoteBlock) -> ParseResult<Entry> {
    let lines = block.body();
    let section = field_value(lines, LABEL_SECTION).unwrap_or("");
    let prompt = field_value(lines, LABEL_PROMPT).unwrap_or("");

    if section.is_empty() {
        return Err(ParseError::MalformedBlock {
            kind: BlockKind::Entry,
            missing: LABEL_SECTION,
        });
    }
    if prompt.is_empty() {
        return Err(ParseError::MalformedBlock {
            kind: BlockKind::Entry,
            missing: LABEL_PROMPT,
        });
    }

    let mut entry = Entry::new(section, prompt);
    entry.is_take_action = field_flag(lines, LABEL_TAKE_ACTION);
    entry.has_submit_button = field_flag(lines, LABEL_BUTTON);
    entry.button_feedback = field_value(lines, LABEL_FEEDBACK).unwrap_or("").to_string();
    Ok(entry)
}

/// `Section Intro` block: requires section, intro title and intro text.
///
/// `Intro Text:` consumes the rest of the block; each following line becomes
/// a new paragraph and is never revisited as a labeled field.
pub fn parse_intro(block: &NoteBlock) -> ParseResult<ParsedIntro> {
    let lines = block.body();
    let text_start = lines
        .iter()
        .position(|line| line.starts_with(LABEL_INTRO_TEXT));

    // Labeled fields may only appear before the intro text begins.
    let fields = &lines[..text_start.unwrap_or(lines.len())];
    let section = field_value(fields, LABEL_SECTION).unwrap_or("");
    let intro_title = field_value(fields, LABEL_INTRO_TITLE).unwrap_or("");
    let order = field_order(fields, LABEL_SECTION_ORDER);

    let mut intro_text = String::new();
    if let Some(start) = text_start {
        intro_text.push_str(lines[start][LABEL_INTRO_TEXT.len()..].trim());
        for line in &lines[start + 1..] {
            intro_text.push_str(PARAGRAPH_BREAK);
            intro_text.push_str(line);
        }
    }

    if section.is_empty() {
        return Err(ParseError::MalformedBlock {
            kind: BlockKind::Intro,
            missing: LABEL_SECTION,
        });
    }
    if intro_title.is_empty() {
        return Err(ParseError::MalformedBlock {
            kind: BlockKind::Intro,
            missing: LABEL_INTRO_TITLE,
        });
    }
    if intro_text.is_empty() {
        return Err(ParseError::MalformedBlock {
            kind: BlockKind::Intro,
            missing: LABEL_INTRO_TEXT,
        });
    }

    Ok(ParsedIntro {
        section: section.to_string(),
        order,
        intro_title: intro_title.to_string(),
        intro_text,
    })
}

/// `Journal Buttons` block: every field optional.
pub fn parse_buttons(block: &NoteBlock) -> ButtonsConfig {
    let lines = block.body();
    ButtonsConfig {
        course_title: field_value(lines, LABEL_COURSE_TITLE).unwrap_or("").to_string(),
        include_email_button: field_flag(lines, LABEL_EMAIL_BUTTON),
        email_address: field_value(lines, LABEL_EMAIL_ADDRESS).unwrap_or("").to_string(),
    }
}
