//! Note-block scanning and labeled-line parsing.
//!
//! # Responsibility
//! - Classify raw text blocks by their first-line flag.
//! - Extract typed records from label-prefixed lines.
//!
//! # Invariants
//! - Matching is case-sensitive and includes the trailing colon.
//! - A malformed block never produces a partial record.

pub mod note;
