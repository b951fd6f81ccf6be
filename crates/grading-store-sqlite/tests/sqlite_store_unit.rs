// crates/grading-store-sqlite/tests/sqlite_store_unit.rs
// ============================================================================
// Module: SQLite Store Integration Tests
// Description: File-backed persistence, reopen, and error-path tests.
// Purpose: Exercise SqliteStore paths the in-crate unit tests don't cover.
// ============================================================================

//! ## Overview
//! Covers what `store.rs`'s own `#[cfg(test)]` module leaves out: a
//! file-backed database that survives a reopen, rejection of an
//! unsupported schema version on an existing file, transcript append and
//! ordering, and the `NotFound`/`Conflict` error paths on an unknown or
//! already-terminal submission.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]

use std::collections::BTreeMap;

use chrono::TimeZone;
use chrono::Utc;
use grading_core::domain::Phase;
use grading_core::domain::PhaseArtifact;
use grading_core::domain::PhaseTimes;
use grading_core::domain::Problem;
use grading_core::domain::RubricItemDef;
use grading_core::domain::Submission;
use grading_core::domain::TranscriptSnippet;
use grading_core::identifiers::ProblemId;
use grading_core::identifiers::SubmissionId;
use grading_core::interfaces::EventSink;
use grading_core::interfaces::ProblemCatalog;
use grading_core::interfaces::SubmissionStore;
use grading_store_sqlite::SqliteStore;
use rusqlite::Connection;
use rusqlite::params;
use tempfile::tempdir;

fn phase_times() -> PhaseTimes {
    PhaseTimes { clarify: 180, estimate: 240, design: 480, explain: 300 }
}

fn rubric() -> Vec<RubricItemDef> {
    let mut clarify_only = BTreeMap::new();
    clarify_only.insert(Phase::Clarify, 1.0);
    let mut spread = BTreeMap::new();
    spread.insert(Phase::Estimate, 0.5);
    spread.insert(Phase::Design, 0.5);
    vec![
        RubricItemDef::new("Requirements", "Clarifies scope", clarify_only).expect("valid weights"),
        RubricItemDef::new("Capacity", "Sizes the system", spread).expect("valid weights"),
    ]
}

fn problem(id: &str) -> Problem {
    Problem {
        id: id.to_owned(),
        name: "Design a URL Shortener".to_owned(),
        difficulty: "medium".to_owned(),
        prompt: "Design a service that shortens long URLs.".to_owned(),
        constraints: Some("No third-party services.".to_owned()),
        rubric: rubric(),
    }
}

fn artifacts(id: &SubmissionId) -> Vec<PhaseArtifact> {
    Phase::ALL
        .into_iter()
        .map(|phase| PhaseArtifact::canvas_only(id.clone(), phase, format!("https://cdn.example/{phase}.png"), "image/png"))
        .collect()
}

#[tokio::test]
async fn file_backed_store_survives_reopen() {
    let dir = tempdir().expect("creates temp dir");
    let path = dir.path().join("grading.sqlite3");

    let id = SubmissionId::new("sub-reopen");
    let created_at = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).single().expect("valid timestamp");
    {
        let store = SqliteStore::open(&path).expect("opens file-backed store");
        store.upsert_problem(&problem("url-shortener")).expect("stores problem");
        let submission = Submission::new(id.clone(), ProblemId::new("url-shortener"), phase_times(), created_at);
        store.create(&submission, &artifacts(&id)).await.expect("creates submission");
    }

    let store = SqliteStore::open(&path).expect("reopens store");
    let loaded = store.get(&id).await.expect("loads submission").expect("submission persisted across reopen");
    assert_eq!(loaded.problem_id, ProblemId::new("url-shortener"));
    let loaded_artifacts = store.artifacts(&id).await.expect("loads artifacts");
    assert_eq!(loaded_artifacts.len(), 4);
}

#[tokio::test]
async fn reopening_a_database_with_an_unsupported_schema_version_fails() {
    let dir = tempdir().expect("creates temp dir");
    let path = dir.path().join("grading.sqlite3");

    {
        let store = SqliteStore::open(&path).expect("creates store");
        drop(store);
    }

    {
        let connection = Connection::open(&path).expect("reopens raw connection");
        connection
            .execute("UPDATE store_meta SET version = ?1", params![9999_i64])
            .expect("bumps schema version");
    }

    let result = SqliteStore::open(&path);
    assert!(result.is_err(), "an unrecognized schema version must not be silently accepted");
}

#[tokio::test]
async fn transitioning_an_unknown_submission_reports_not_found() {
    let store = SqliteStore::open_in_memory().expect("opens in-memory store");
    let err = store
        .transition(&SubmissionId::new("ghost"), grading_core::domain::LifecycleState::Processing, None, None)
        .await
        .expect_err("unknown submission cannot transition");
    assert!(err.to_string().contains("not found"));
}

#[tokio::test]
async fn transcripts_round_trip_in_timestamp_order_within_each_phase() {
    let store = SqliteStore::open_in_memory().expect("opens in-memory store");
    store.upsert_problem(&problem("url-shortener")).expect("stores problem");
    let id = SubmissionId::new("sub-1");
    let created_at = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).single().expect("valid timestamp");
    let submission = Submission::new(id.clone(), ProblemId::new("url-shortener"), phase_times(), created_at);
    store.create(&submission, &artifacts(&id)).await.expect("creates submission");

    let snippets = vec![
        TranscriptSnippet { submission_id: id.clone(), phase: Phase::Clarify, timestamp_sec: 0, text: "so".to_owned(), is_highlight: false },
        TranscriptSnippet { submission_id: id.clone(), phase: Phase::Clarify, timestamp_sec: 12, text: "first".to_owned(), is_highlight: true },
        TranscriptSnippet { submission_id: id.clone(), phase: Phase::Estimate, timestamp_sec: 3, text: "roughly".to_owned(), is_highlight: false },
    ];
    store.append_transcripts(&id, &snippets).await.expect("appends transcripts");

    let loaded = store.transcripts(&id).await.expect("loads transcripts");
    assert_eq!(loaded.len(), 3);
    let clarify: Vec<_> = loaded.iter().filter(|s| s.phase == Phase::Clarify).collect();
    assert_eq!(clarify[0].timestamp_sec, 0);
    assert_eq!(clarify[1].timestamp_sec, 12);
    assert!(clarify[1].is_highlight);
}

#[tokio::test]
async fn problem_catalog_round_trips_multi_item_rubrics() {
    let store = SqliteStore::open_in_memory().expect("opens in-memory store");
    store.upsert_problem(&problem("rate-limiter")).expect("stores problem");

    let loaded = ProblemCatalog::get(&store, &ProblemId::new("rate-limiter"))
        .await
        .expect("loads problem")
        .expect("problem exists");
    assert_eq!(loaded.rubric.len(), 2);
    assert_eq!(loaded.constraints.as_deref(), Some("No third-party services."));

    let unknown = ProblemCatalog::get(&store, &ProblemId::new("does-not-exist")).await.expect("query succeeds");
    assert!(unknown.is_none());
}

#[tokio::test]
async fn upserting_a_problem_twice_replaces_its_rubric() {
    let store = SqliteStore::open_in_memory().expect("opens in-memory store");
    store.upsert_problem(&problem("rate-limiter")).expect("stores problem");

    let mut replacement = problem("rate-limiter");
    replacement.name = "Design a Rate Limiter (revised)".to_owned();
    replacement.rubric = vec![rubric()[0].clone()];
    store.upsert_problem(&replacement).expect("replaces problem");

    let loaded = ProblemCatalog::get(&store, &ProblemId::new("rate-limiter"))
        .await
        .expect("loads problem")
        .expect("problem exists");
    assert_eq!(loaded.name, "Design a Rate Limiter (revised)");
    assert_eq!(loaded.rubric.len(), 1);
}

#[tokio::test]
async fn events_since_an_unknown_ordinal_floor_returns_the_full_gap_free_tail() {
    let store = SqliteStore::open_in_memory().expect("opens in-memory store");
    let id = SubmissionId::new("sub-1");
    let now = Utc.with_ymd_and_hms(2026, 2, 1, 0, 0, 0).single().expect("valid timestamp");
    for ordinal in 0..5u64 {
        EventSink::append(
            &store,
            &grading_core::domain::Event {
                submission_id: id.clone(),
                ordinal: grading_core::identifiers::EventOrdinal::new(ordinal),
                status: grading_core::domain::EventStatus::Processing,
                message: format!("step {ordinal}"),
                phase: None,
                progress: None,
                created_at: now,
            },
        )
        .await
        .expect("appends event");
    }

    let tail = store
        .list_since(&id, Some(grading_core::identifiers::EventOrdinal::new(2)))
        .await
        .expect("lists tail");
    assert_eq!(tail.len(), 2);
    assert_eq!(tail[0].message, "step 3");
    assert_eq!(tail[1].message, "step 4");
}
