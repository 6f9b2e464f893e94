//! Persistence layer for serialized journal state.
//!
//! # Responsibility
//! - Define the load/save contract for per-page journal payloads.
//! - Keep SQL and key-derivation details out of the service layer.
//!
//! # Invariants
//! - One payload per storage key; saves replace whole payloads.
//! - Repository APIs return semantic absence (`None`) for unknown keys.

pub mod state_repo;
pub mod storage_key;
