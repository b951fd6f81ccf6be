// crates/grading-store-sqlite/src/lib.rs
// ============================================================================
// Module: grading-store-sqlite
// Description: SQLite-backed SubmissionStore/EventSink/ProblemCatalog.
// Purpose: Durable persistence for the grading pipeline driver.
// Dependencies: grading-core, grading-contract, rusqlite
// ============================================================================

//! ## Overview
//! This crate gives the pipeline driver a durable backend for the three
//! storage seams defined in `grading-core::interfaces`: submissions and
//! their artifacts, the append-only event log, and the read-only problem
//! catalog. [`store::SqliteStore`] implements all three over a single
//! `SQLite` file.

pub mod error;
pub mod store;

pub use error::StoreError;
pub use store::SqliteStore;
