//! Journal domain model.
//!
//! # Responsibility
//! - Define the canonical section/entry shapes shared by parsing, merging
//!   and export.
//! - Own the persisted-store container and its ordering rules.
//!
//! # Invariants
//! - Section identity is the title; entry identity is `(section, prompt)`.
//! - No surrogate keys anywhere in the persisted shape.

pub mod journal;
