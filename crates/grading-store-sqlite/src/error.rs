// crates/grading-store-sqlite/src/error.rs
// ============================================================================
// Module: Store Errors
// Description: Error taxonomy for the SQLite-backed store.
// Purpose: Give every storage failure a stable, matchable kind.
// Dependencies: rusqlite, thiserror
// ============================================================================

//! ## Overview
//! A small enum distinct from the raw `rusqlite::Error`, narrowed to the
//! kinds this store's single-connection architecture can actually produce.

// ============================================================================
// SECTION: Imports
// ============================================================================

use thiserror::Error;

// ============================================================================
// SECTION: Store Error
// ============================================================================

/// Errors raised by the SQLite-backed store.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The requested row does not exist.
    #[error("not found")]
    NotFound,
    /// The requested transition conflicts with the row's current state.
    #[error("conflict: {0}")]
    Conflict(String),
    /// Stored data failed an integrity or shape check on read.
    #[error("corrupt: {0}")]
    Corrupt(String),
    /// A value failed validation before being written.
    #[error("invalid: {0}")]
    Invalid(String),
    /// An underlying `SQLite` driver error.
    #[error(transparent)]
    Sqlite(#[from] rusqlite::Error),
}
