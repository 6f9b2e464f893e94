//! Core domain logic for the learning journal.
//! This crate is the single source of truth for parsing, reconciliation,
//! persistence and export; host UI layers stay thin.

pub mod db;
pub mod export;
pub mod logging;
pub mod merge;
pub mod model;
pub mod parse;
pub mod repo;
pub mod service;
pub mod timing;

pub use export::{format_mail_body, format_print_document, print_window_title};
pub use logging::{default_log_level, init_logging};
pub use merge::{apply_intro, merge_entry};
pub use model::journal::{
    Entry, JournalStore, Section, StoreError, StoreResult, DEFAULT_SECTION_ORDER,
};
pub use parse::note::{
    parse_block, BlockKind, ButtonsConfig, NoteBlock, ParseError, ParsedIntro, ParsedRecord,
};
pub use repo::state_repo::{
    MemoryStateRepository, RepoError, RepoResult, SqliteStateRepository, StateRepository,
};
pub use repo::storage_key::storage_key;
pub use service::journal_service::{
    JournalService, ProcessOutcome, RenderedBlock, ServiceError, ServiceResult, SubmitError,
    EMPTY_RESPONSE_MESSAGE,
};
pub use timing::{PollDecision, QuiescenceTimer, RetryPoller};

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}

#[cfg(test)]
mod tests {
    use super::core_version;

    #[test]
    fn version_is_not_empty() {
        assert!(!core_version().is_empty());
    }
}
