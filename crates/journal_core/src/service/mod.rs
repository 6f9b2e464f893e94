//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate parsing, reconciliation, persistence and export into the
//!   API the host UI drives.
//! - Keep the host decoupled from storage and wire-format details.

pub mod journal_service;
