//! Journal use-case service.
//!
//! One service instance owns the journal for one page: it loads the store
//! on construction, funnels every mutation through the documented
//! operations, and persists after each successful mutation (no batching).
//!
//! # Invariants
//! - A corrupt persisted payload degrades to an empty store; it is replaced
//!   on the next successful save, never surfaced to the learner.
//! - Malformed authoring blocks are skipped without touching the store.

use crate::export;
use crate::merge::{apply_intro, merge_entry};
use crate::model::journal::{JournalStore, StoreError};
use crate::parse::note::{parse_block, ButtonsConfig, NoteBlock, ParsedRecord};
use crate::repo::state_repo::{RepoError, StateRepository};
use chrono::Local;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Shown when a learner submits an empty response on a button-gated entry.
/// The only user-visible failure in the whole pipeline.
pub const EMPTY_RESPONSE_MESSAGE: &str = "Please enter in a response before hitting Submit.";

pub type ServiceResult<T> = Result<T, ServiceError>;

#[derive(Debug)]
pub enum ServiceError {
    Repo(RepoError),
    Store(StoreError),
    /// Render indices that no longer point at a stored entry.
    UnknownSlot {
        section_index: usize,
        entry_index: usize,
    },
}

impl Display for ServiceError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::Store(err) => write!(f, "{err}"),
            Self::UnknownSlot {
                section_index,
                entry_index,
            } => write!(f, "no journal entry at section {section_index}, entry {entry_index}"),
        }
    }
}

impl Error for ServiceError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::Store(err) => Some(err),
            Self::UnknownSlot { .. } => None,
        }
    }
}

impl From<RepoError> for ServiceError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl From<StoreError> for ServiceError {
    fn from(value: StoreError) -> Self {
        Self::Store(value)
    }
}

/// Submit-gate outcome for button-gated entries.
#[derive(Debug, PartialEq, Eq)]
pub enum SubmitError {
    EmptyResponse,
}

impl Display for SubmitError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::EmptyResponse => f.write_str(EMPTY_RESPONSE_MESSAGE),
        }
    }
}

impl Error for SubmitError {}

/// Render instruction handed back to the host UI for one processed block.
///
/// Indices refer to the store as it stands after the whole processing pass;
/// the host wires them into its input callbacks for autosave and submit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderedBlock {
    Entry {
        section_index: usize,
        entry_index: usize,
        prompt: String,
        response: String,
        has_submit_button: bool,
        button_feedback: String,
    },
    Buttons(ButtonsConfig),
}

/// Result of one processing pass over the host's note blocks.
#[derive(Debug, Default, PartialEq, Eq)]
pub struct ProcessOutcome {
    pub rendered: Vec<RenderedBlock>,
    /// Whether any note blocks were present at all; feeds the readiness
    /// poller's stop decision.
    pub notes_found: bool,
}

/// Owns the journal for one page location.
pub struct JournalService<R: StateRepository> {
    repo: R,
    storage_key: String,
    store: JournalStore,
    buttons: Option<ButtonsConfig>,
}

impl<R: StateRepository> JournalService<R> {
    /// Loads the journal stored under `storage_key`, treating absent and
    /// corrupt payloads as an empty journal.
    pub fn open(repo: R, storage_key: impl Into<String>) -> ServiceResult<Self> {
        let storage_key = storage_key.into();
        let store = match repo.load(&storage_key)? {
            None => JournalStore::new(),
            Some(payload) => match JournalStore::deserialize(&payload) {
                Ok(store) => store,
                Err(err) => {
                    log::warn!(
                        "event=state_load module=service status=corrupt error={err}; starting empty"
                    );
                    JournalStore::new()
                }
            },
        };
        log::info!(
            "event=state_load module=service status=ok sections={}",
            store.sections.len()
        );
        Ok(Self {
            repo,
            storage_key,
            store,
            buttons: None,
        })
    }

    pub fn store(&self) -> &JournalStore {
        &self.store
    }

    /// Buttons configuration from the most recent `Journal Buttons` block.
    pub fn buttons(&self) -> Option<&ButtonsConfig> {
        self.buttons.as_ref()
    }

    pub fn course_title(&self) -> &str {
        self.buttons
            .as_ref()
            .map(|b| b.course_title.as_str())
            .unwrap_or("")
    }

    /// Processes one batch of note blocks lifted out of the host page.
    ///
    /// Recognized blocks are parsed, merged and persisted one by one;
    /// malformed blocks are logged and skipped; unrecognized blocks are left
    /// to the host untouched.
    pub fn process_blocks(&mut self, blocks: &[NoteBlock]) -> ServiceResult<ProcessOutcome> {
        let mut outcome = ProcessOutcome {
            rendered: Vec::new(),
            notes_found: !blocks.is_empty(),
        };

        for block in blocks {
            match parse_block(block) {
                Ok(Some(ParsedRecord::Entry(entry))) => {
                    let (section_index, entry_index) = merge_entry(&mut self.store, entry);
                    self.persist()?;
                    let merged = &self.store.sections[section_index].entries[entry_index];
                    outcome.rendered.push(RenderedBlock::Entry {
                        section_index,
                        entry_index,
                        prompt: merged.prompt.clone(),
                        response: merged.response.clone(),
                        has_submit_button: merged.has_submit_button,
                        button_feedback: merged.button_feedback.clone(),
                    });
                }
                Ok(Some(ParsedRecord::Intro(intro))) => {
                    apply_intro(&mut self.store, &intro);
                    self.persist()?;
                }
                Ok(Some(ParsedRecord::Buttons(config))) => {
                    outcome.rendered.push(RenderedBlock::Buttons(config.clone()));
                    self.buttons = Some(config);
                }
                Ok(None) => {}
                Err(err) => {
                    log::debug!("event=block_skip module=service status=malformed error={err}");
                }
            }
        }

        Ok(outcome)
    }

    /// Autosave tick: stores the latest response text and persists.
    ///
    /// The host calls this when its quiescence timer fires, so only the last
    /// edit of a typing burst lands here.
    pub fn record_response(
        &mut self,
        section_index: usize,
        entry_index: usize,
        text: &str,
    ) -> ServiceResult<()> {
        let entry = self
            .store
            .sections
            .get_mut(section_index)
            .and_then(|s| s.entries.get_mut(entry_index))
            .ok_or(ServiceError::UnknownSlot {
                section_index,
                entry_index,
            })?;
        entry.response = text.to_string();
        self.persist()
    }

    /// Submit gate: returns the feedback text to reveal, or the one
    /// user-visible validation failure when the response is still empty.
    pub fn confirm_response(
        &self,
        section_index: usize,
        entry_index: usize,
    ) -> ServiceResult<Result<&str, SubmitError>> {
        let entry = self
            .store
            .sections
            .get(section_index)
            .and_then(|s| s.entries.get(entry_index))
            .ok_or(ServiceError::UnknownSlot {
                section_index,
                entry_index,
            })?;
        if entry.response.is_empty() {
            Ok(Err(SubmitError::EmptyResponse))
        } else {
            Ok(Ok(entry.button_feedback.as_str()))
        }
    }

    /// Printable HTML for the host's print surface.
    pub fn print_document(&self, take_action_only: bool) -> String {
        export::format_print_document(
            &self.store,
            take_action_only,
            self.course_title(),
            Local::now(),
        )
    }

    /// Plain-text body for the host's mailto link.
    pub fn mail_body(&self) -> String {
        export::format_mail_body(&self.store, self.course_title())
    }

    fn persist(&self) -> ServiceResult<()> {
        let payload = self.store.serialize()?;
        self.repo.save(&self.storage_key, &payload)?;
        Ok(())
    }
}
