// crates/grading-store-sqlite/src/store.rs
// ============================================================================
// Module: SQLite Submission Store
// Description: Durable SubmissionStore/EventSink/ProblemCatalog backed by SQLite.
// Purpose: Persist submissions, artifacts, transcripts, and events.
// Dependencies: grading-core, grading-contract, rusqlite, serde_json, chrono
// ============================================================================

//! ## Overview
//! One [`SqliteStore`] implements all three of `grading-core`'s storage
//! seams (`SubmissionStore`, `EventSink`, `ProblemCatalog`) over a single
//! `SQLite` file, rooted at `submissions` with cascade-delete into
//! artifacts, transcripts, and events. A single `Mutex<Connection>` guards
//! every write; this is a deliberate simplification of the batched
//! writer-thread architecture a higher-throughput store would need, since
//! the pipeline driver this store backs is itself a single-writer,
//! single-node process per submission.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::collections::BTreeMap;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::DateTime;
use chrono::Utc;
use grading_core::domain::Event;
use grading_core::domain::EventStatus;
use grading_core::domain::LifecycleState;
use grading_core::domain::Phase;
use grading_core::domain::PhaseArtifact;
use grading_core::domain::PhaseTimes;
use grading_core::domain::Problem;
use grading_core::domain::RubricItemDef;
use grading_core::domain::Submission;
use grading_core::domain::TranscriptSnippet;
use grading_core::identifiers::EventOrdinal;
use grading_core::identifiers::ProblemId;
use grading_core::identifiers::SubmissionId;
use grading_core::interfaces::BoxError;
use grading_core::interfaces::EventSink;
use grading_core::interfaces::ProblemCatalog;
use grading_core::interfaces::SubmissionStore;
use rusqlite::Connection;
use rusqlite::OpenFlags;
use rusqlite::OptionalExtension;
use rusqlite::params;

use crate::error::StoreError;

// ============================================================================
// SECTION: Constants
// ============================================================================

/// `SQLite` schema version for this store.
const SCHEMA_VERSION: i64 = 1;
/// Busy timeout applied to the connection.
const BUSY_TIMEOUT_MS: u64 = 5_000;

// ============================================================================
// SECTION: Label Conversions
// ============================================================================

/// Returns the SQL `TEXT` label stored for a lifecycle state.
const fn lifecycle_state_as_str(state: LifecycleState) -> &'static str {
    match state {
        LifecycleState::Queued => "queued",
        LifecycleState::Processing => "processing",
        LifecycleState::Complete => "complete",
        LifecycleState::Failed => "failed",
    }
}

/// Parses a lifecycle state from its stored SQL `TEXT` label.
fn parse_lifecycle_state(value: &str) -> Result<LifecycleState, StoreError> {
    match value {
        "queued" => Ok(LifecycleState::Queued),
        "processing" => Ok(LifecycleState::Processing),
        "complete" => Ok(LifecycleState::Complete),
        "failed" => Ok(LifecycleState::Failed),
        other => Err(StoreError::Corrupt(format!("unknown lifecycle state: {other}"))),
    }
}

/// Returns the SQL `TEXT` label stored for an event status.
const fn event_status_as_str(status: EventStatus) -> &'static str {
    match status {
        EventStatus::Queued => "queued",
        EventStatus::Processing => "processing",
        EventStatus::Clarify => "clarify",
        EventStatus::Estimate => "estimate",
        EventStatus::Design => "design",
        EventStatus::Explain => "explain",
        EventStatus::Synthesizing => "synthesizing",
        EventStatus::Complete => "complete",
        EventStatus::Failed => "failed",
    }
}

/// Parses an event status from its stored SQL `TEXT` label.
fn parse_event_status(value: &str) -> Result<EventStatus, StoreError> {
    match value {
        "queued" => Ok(EventStatus::Queued),
        "processing" => Ok(EventStatus::Processing),
        "clarify" => Ok(EventStatus::Clarify),
        "estimate" => Ok(EventStatus::Estimate),
        "design" => Ok(EventStatus::Design),
        "explain" => Ok(EventStatus::Explain),
        "synthesizing" => Ok(EventStatus::Synthesizing),
        "complete" => Ok(EventStatus::Complete),
        "failed" => Ok(EventStatus::Failed),
        other => Err(StoreError::Corrupt(format!("unknown event status: {other}"))),
    }
}

/// Parses a phase from its stored SQL `TEXT` label.
fn parse_phase(value: &str) -> Result<Phase, StoreError> {
    Phase::parse(value).ok_or_else(|| StoreError::Corrupt(format!("unknown phase: {value}")))
}

/// Parses an RFC 3339 timestamp stored as SQL `TEXT`.
fn parse_rfc3339(value: &str) -> Result<DateTime<Utc>, StoreError> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| StoreError::Corrupt(format!("malformed timestamp {value}: {err}")))
}

// ============================================================================
// SECTION: Store
// ============================================================================

/// SQLite-backed implementation of the grading pipeline's storage seams.
pub struct SqliteStore {
    /// The single guarded connection every read and write goes through.
    connection: Mutex<Connection>,
}

impl SqliteStore {
    /// Opens (creating if absent) the `SQLite` database at `path`.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when the connection cannot be opened,
    /// or [`StoreError::Corrupt`] when an existing database carries an
    /// unsupported schema version.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let mut connection = open_connection(path)?;
        initialize_schema(&mut connection)?;
        Ok(Self { connection: Mutex::new(connection) })
    }

    /// Opens an in-memory database, useful for tests.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] when the connection cannot be opened.
    pub fn open_in_memory() -> Result<Self, StoreError> {
        let mut connection = Connection::open_in_memory()?;
        apply_pragmas(&connection)?;
        initialize_schema(&mut connection)?;
        Ok(Self { connection: Mutex::new(connection) })
    }

    /// Inserts or replaces a problem catalog entry.
    ///
    /// Problems are read-only to the pipeline once loaded; this method is
    /// for the operator-facing catalog loader, not the driver.
    ///
    /// # Errors
    ///
    /// Returns [`StoreError::Sqlite`] on failure, or [`StoreError::Invalid`]
    /// when `problem.rubric` does not serialize.
    pub fn upsert_problem(&self, problem: &Problem) -> Result<(), StoreError> {
        let rubric_json = serde_json::to_string(&problem.rubric)
            .map_err(|err| StoreError::Invalid(format!("rubric does not serialize: {err}")))?;
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        guard.execute(
            "INSERT INTO problems (id, name, difficulty, prompt, constraints, rubric_json)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6)
             ON CONFLICT(id) DO UPDATE SET
                name = excluded.name,
                difficulty = excluded.difficulty,
                prompt = excluded.prompt,
                constraints = excluded.constraints,
                rubric_json = excluded.rubric_json",
            params![problem.id, problem.name, problem.difficulty, problem.prompt, problem.constraints, rubric_json],
        )?;
        Ok(())
    }
}

/// Opens a file-backed connection with `SQLite`'s durability pragmas applied.
fn open_connection(path: &Path) -> Result<Connection, StoreError> {
    let flags = OpenFlags::SQLITE_OPEN_READ_WRITE | OpenFlags::SQLITE_OPEN_CREATE | OpenFlags::SQLITE_OPEN_FULL_MUTEX;
    let connection = Connection::open_with_flags(path, flags)?;
    apply_pragmas(&connection)?;
    Ok(connection)
}

/// Applies WAL journaling, normal sync, and the busy timeout to `connection`.
fn apply_pragmas(connection: &Connection) -> Result<(), StoreError> {
    connection.execute_batch("PRAGMA foreign_keys = ON;")?;
    connection.execute_batch("PRAGMA journal_mode = WAL;")?;
    connection.execute_batch("PRAGMA synchronous = NORMAL;")?;
    connection.busy_timeout(std::time::Duration::from_millis(BUSY_TIMEOUT_MS))?;
    Ok(())
}

/// Creates the schema on a fresh database, or checks the version on an
/// existing one.
fn initialize_schema(connection: &mut Connection) -> Result<(), StoreError> {
    let tx = connection.transaction()?;
    tx.execute_batch("CREATE TABLE IF NOT EXISTS store_meta (version INTEGER NOT NULL);")?;
    let version: Option<i64> =
        tx.query_row("SELECT version FROM store_meta LIMIT 1", params![], |row| row.get(0)).optional()?;
    match version {
        None => {
            tx.execute("INSERT INTO store_meta (version) VALUES (?1)", params![SCHEMA_VERSION])?;
            tx.execute_batch(
                "CREATE TABLE IF NOT EXISTS problems (
                    id TEXT PRIMARY KEY,
                    name TEXT NOT NULL,
                    difficulty TEXT NOT NULL,
                    prompt TEXT NOT NULL,
                    constraints TEXT,
                    rubric_json TEXT NOT NULL
                );
                CREATE TABLE IF NOT EXISTS submissions (
                    id TEXT PRIMARY KEY,
                    problem_id TEXT NOT NULL REFERENCES problems(id),
                    state TEXT NOT NULL,
                    phase_times_json TEXT NOT NULL,
                    created_at TEXT NOT NULL,
                    completed_at TEXT,
                    result_cache_json TEXT
                );
                CREATE TABLE IF NOT EXISTS submission_artifacts (
                    submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                    phase TEXT NOT NULL,
                    canvas_url TEXT NOT NULL,
                    canvas_mime TEXT NOT NULL,
                    audio_url TEXT,
                    audio_mime TEXT,
                    PRIMARY KEY (submission_id, phase)
                );
                CREATE TABLE IF NOT EXISTS submission_transcripts (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                    phase TEXT NOT NULL,
                    timestamp_sec INTEGER NOT NULL,
                    text TEXT NOT NULL,
                    is_highlight INTEGER NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_submission_transcripts_lookup
                    ON submission_transcripts (submission_id, phase, id);
                CREATE TABLE IF NOT EXISTS grading_events (
                    submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                    ordinal INTEGER NOT NULL,
                    status TEXT NOT NULL,
                    message TEXT NOT NULL,
                    phase TEXT,
                    progress REAL,
                    created_at TEXT NOT NULL,
                    PRIMARY KEY (submission_id, ordinal)
                );
                CREATE TABLE IF NOT EXISTS grading_results (
                    id INTEGER PRIMARY KEY AUTOINCREMENT,
                    submission_id TEXT NOT NULL REFERENCES submissions(id) ON DELETE CASCADE,
                    result_version INTEGER NOT NULL,
                    result_json TEXT NOT NULL,
                    graded_at TEXT NOT NULL
                );
                CREATE INDEX IF NOT EXISTS idx_grading_results_submission
                    ON grading_results (submission_id);",
            )?;
        }
        Some(value) if value == SCHEMA_VERSION => {}
        Some(value) => {
            return Err(StoreError::Corrupt(format!("unsupported schema version: {value}")));
        }
    }
    tx.commit()?;
    Ok(())
}

// ============================================================================
// SECTION: SubmissionStore
// ============================================================================

#[async_trait]
impl SubmissionStore for SqliteStore {
    async fn create(&self, submission: &Submission, artifacts: &[PhaseArtifact]) -> Result<(), BoxError> {
        let phase_times_json = serde_json::to_string(&submission.phase_times)?;
        let mut guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let tx = guard.transaction()?;
        tx.execute(
            "INSERT INTO submissions (id, problem_id, state, phase_times_json, created_at, completed_at, result_cache_json)
             VALUES (?1, ?2, ?3, ?4, ?5, NULL, NULL)",
            params![
                submission.id.as_str(),
                submission.problem_id.as_str(),
                lifecycle_state_as_str(submission.state),
                phase_times_json,
                submission.created_at.to_rfc3339(),
            ],
        )?;
        for artifact in artifacts {
            tx.execute(
                "INSERT INTO submission_artifacts (submission_id, phase, canvas_url, canvas_mime, audio_url, audio_mime)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
                params![
                    artifact.submission_id.as_str(),
                    artifact.phase.as_str(),
                    artifact.canvas_url,
                    artifact.canvas_mime,
                    artifact.audio_url,
                    artifact.audio_mime,
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn get(&self, id: &SubmissionId) -> Result<Option<Submission>, BoxError> {
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let row = guard
            .query_row(
                "SELECT problem_id, state, phase_times_json, created_at, completed_at, result_cache_json
                 FROM submissions WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, String>(3)?,
                        row.get::<_, Option<String>>(4)?,
                        row.get::<_, Option<String>>(5)?,
                    ))
                },
            )
            .optional()?;
        let Some((problem_id, state, phase_times_json, created_at, completed_at, result_cache_json)) = row else {
            return Ok(None);
        };
        let phase_times: PhaseTimes = serde_json::from_str(&phase_times_json)
            .map_err(|err| StoreError::Corrupt(format!("malformed phase_times: {err}")))?;
        let result_cache = result_cache_json
            .map(|json| {
                serde_json::from_str(&json).map_err(|err| StoreError::Corrupt(format!("malformed result cache: {err}")))
            })
            .transpose()?;
        Ok(Some(Submission {
            id: id.clone(),
            problem_id: ProblemId::new(problem_id),
            state: parse_lifecycle_state(&state)?,
            phase_times,
            created_at: parse_rfc3339(&created_at)?,
            completed_at: completed_at.map(|value| parse_rfc3339(&value)).transpose()?,
            result_cache,
        }))
    }

    async fn transition(
        &self,
        id: &SubmissionId,
        new_state: LifecycleState,
        completed_at: Option<DateTime<Utc>>,
        result_cache: Option<serde_json::Value>,
    ) -> Result<(), BoxError> {
        let result_cache_json = result_cache.as_ref().map(serde_json::to_string).transpose()?;
        let mut guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let tx = guard.transaction()?;
        let rows = tx.execute(
            "UPDATE submissions SET state = ?1, completed_at = ?2, result_cache_json = ?3
             WHERE id = ?4 AND state NOT IN ('complete', 'failed')",
            params![
                lifecycle_state_as_str(new_state),
                completed_at.map(|value| value.to_rfc3339()),
                result_cache_json,
                id.as_str(),
            ],
        )?;
        if rows == 0 {
            let exists: bool =
                tx.query_row("SELECT 1 FROM submissions WHERE id = ?1", params![id.as_str()], |_row| Ok(true))
                    .optional()?
                    .unwrap_or(false);
            return Err(Box::new(if exists {
                StoreError::Conflict(format!("submission {id} is already terminal"))
            } else {
                StoreError::NotFound
            }));
        }
        if let (LifecycleState::Complete, Some(result_json), Some(graded_at)) =
            (new_state, result_cache_json.as_ref(), completed_at)
        {
            tx.execute(
                "INSERT INTO grading_results (submission_id, result_version, result_json, graded_at)
                 VALUES (?1, ?2, ?3, ?4)",
                params![
                    id.as_str(),
                    i64::from(grading_contract::RESULT_VERSION),
                    result_json.as_str(),
                    graded_at.to_rfc3339(),
                ],
            )?;
        }
        tx.commit()?;
        Ok(())
    }

    async fn artifacts(&self, id: &SubmissionId) -> Result<Vec<PhaseArtifact>, BoxError> {
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let mut statement = guard.prepare(
            "SELECT phase, canvas_url, canvas_mime, audio_url, audio_mime
             FROM submission_artifacts WHERE submission_id = ?1 ORDER BY phase",
        )?;
        let rows = statement.query_map(params![id.as_str()], |row| {
            Ok((
                row.get::<_, String>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<String>>(4)?,
            ))
        })?;
        let mut artifacts = Vec::new();
        for row in rows {
            let (phase, canvas_url, canvas_mime, audio_url, audio_mime) = row?;
            artifacts.push(PhaseArtifact {
                submission_id: id.clone(),
                phase: parse_phase(&phase)?,
                canvas_url,
                canvas_mime,
                audio_url,
                audio_mime,
            });
        }
        Ok(artifacts)
    }

    async fn transcripts(&self, id: &SubmissionId) -> Result<Vec<TranscriptSnippet>, BoxError> {
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let mut statement = guard.prepare(
            "SELECT phase, timestamp_sec, text, is_highlight
             FROM submission_transcripts WHERE submission_id = ?1 ORDER BY phase, id",
        )?;
        let rows = statement.query_map(params![id.as_str()], |row| {
            Ok((row.get::<_, String>(0)?, row.get::<_, u32>(1)?, row.get::<_, String>(2)?, row.get::<_, bool>(3)?))
        })?;
        let mut snippets = Vec::new();
        for row in rows {
            let (phase, timestamp_sec, text, is_highlight) = row?;
            snippets.push(TranscriptSnippet { submission_id: id.clone(), phase: parse_phase(&phase)?, timestamp_sec, text, is_highlight });
        }
        Ok(snippets)
    }

    async fn append_transcripts(&self, id: &SubmissionId, snippets: &[TranscriptSnippet]) -> Result<(), BoxError> {
        let mut guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let tx = guard.transaction()?;
        for snippet in snippets {
            tx.execute(
                "INSERT INTO submission_transcripts (submission_id, phase, timestamp_sec, text, is_highlight)
                 VALUES (?1, ?2, ?3, ?4, ?5)",
                params![id.as_str(), snippet.phase.as_str(), snippet.timestamp_sec, snippet.text, snippet.is_highlight],
            )?;
        }
        tx.commit()?;
        Ok(())
    }
}

// ============================================================================
// SECTION: EventSink
// ============================================================================

#[async_trait]
impl EventSink for SqliteStore {
    async fn append(&self, event: &Event) -> Result<(), BoxError> {
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        guard.execute(
            "INSERT INTO grading_events (submission_id, ordinal, status, message, phase, progress, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
            params![
                event.submission_id.as_str(),
                i64::try_from(event.ordinal.get()).unwrap_or(i64::MAX),
                event_status_as_str(event.status),
                event.message,
                event.phase.map(Phase::as_str),
                event.progress,
                event.created_at.to_rfc3339(),
            ],
        )?;
        Ok(())
    }

    async fn list_since(&self, id: &SubmissionId, after: Option<EventOrdinal>) -> Result<Vec<Event>, BoxError> {
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let floor = after.map_or(-1_i64, |ordinal| i64::try_from(ordinal.get()).unwrap_or(i64::MAX));
        let mut statement = guard.prepare(
            "SELECT ordinal, status, message, phase, progress, created_at
             FROM grading_events WHERE submission_id = ?1 AND ordinal > ?2 ORDER BY ordinal ASC",
        )?;
        let rows = statement.query_map(params![id.as_str(), floor], |row| {
            Ok((
                row.get::<_, i64>(0)?,
                row.get::<_, String>(1)?,
                row.get::<_, String>(2)?,
                row.get::<_, Option<String>>(3)?,
                row.get::<_, Option<f64>>(4)?,
                row.get::<_, String>(5)?,
            ))
        })?;
        let mut events = Vec::new();
        for row in rows {
            let (ordinal, status, message, phase, progress, created_at) = row?;
            events.push(Event {
                submission_id: id.clone(),
                ordinal: EventOrdinal::new(u64::try_from(ordinal).unwrap_or(0)),
                status: parse_event_status(&status)?,
                message,
                phase: phase.map(|value| parse_phase(&value)).transpose()?,
                progress,
                created_at: parse_rfc3339(&created_at)?,
            });
        }
        Ok(events)
    }
}

// ============================================================================
// SECTION: ProblemCatalog
// ============================================================================

#[async_trait]
impl ProblemCatalog for SqliteStore {
    async fn get(&self, id: &ProblemId) -> Result<Option<Problem>, BoxError> {
        let guard = self.connection.lock().map_err(|_err| StoreError::Corrupt("store mutex poisoned".to_owned()))?;
        let row = guard
            .query_row(
                "SELECT name, difficulty, prompt, constraints, rubric_json FROM problems WHERE id = ?1",
                params![id.as_str()],
                |row| {
                    Ok((
                        row.get::<_, String>(0)?,
                        row.get::<_, String>(1)?,
                        row.get::<_, String>(2)?,
                        row.get::<_, Option<String>>(3)?,
                        row.get::<_, String>(4)?,
                    ))
                },
            )
            .optional()?;
        let Some((name, difficulty, prompt, constraints, rubric_json)) = row else {
            return Ok(None);
        };
        let rubric: Vec<RubricItemDef> =
            serde_json::from_str(&rubric_json).map_err(|err| StoreError::Corrupt(format!("malformed rubric: {err}")))?;
        Ok(Some(Problem { id: id.as_str().to_owned(), name, difficulty, prompt, constraints, rubric }))
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    reason = "Test-only assertions and helpers are permitted."
)]
mod tests {
    use chrono::TimeZone;

    use super::*;

    fn phase_times() -> PhaseTimes {
        PhaseTimes { clarify: 180, estimate: 240, design: 480, explain: 300 }
    }

    fn rubric() -> Vec<RubricItemDef> {
        let mut weights = BTreeMap::new();
        weights.insert(Phase::Clarify, 0.7);
        weights.insert(Phase::Estimate, 0.3);
        vec![RubricItemDef::new("Requirements", "Clarifies scope", weights).expect("valid weights")]
    }

    fn problem() -> Problem {
        Problem {
            id: "url-shortener".to_owned(),
            name: "Design a URL Shortener".to_owned(),
            difficulty: "medium".to_owned(),
            prompt: "Design a service that shortens long URLs.".to_owned(),
            constraints: None,
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
    async fn round_trips_a_submission_and_its_artifacts() {
        let store = SqliteStore::open_in_memory().expect("opens in-memory store");
        store.upsert_problem(&problem()).expect("stores problem");

        let id = SubmissionId::new("sub-1");
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid timestamp");
        let submission = Submission::new(id.clone(), ProblemId::new("url-shortener"), phase_times(), created_at);
        store.create(&submission, &artifacts(&id)).await.expect("creates submission");

        let loaded = store.get(&id).await.expect("loads submission").expect("submission exists");
        assert_eq!(loaded.state, LifecycleState::Queued);
        assert_eq!(loaded.phase_times.design, 480);

        let loaded_artifacts = store.artifacts(&id).await.expect("loads artifacts");
        assert_eq!(loaded_artifacts.len(), 4);

        let loaded_problem = ProblemCatalog::get(&store, &ProblemId::new("url-shortener"))
            .await
            .expect("loads problem")
            .expect("problem exists");
        assert_eq!(loaded_problem.rubric.len(), 1);
    }

    #[tokio::test]
    async fn transition_to_terminal_is_not_reversible() {
        let store = SqliteStore::open_in_memory().expect("opens in-memory store");
        store.upsert_problem(&problem()).expect("stores problem");
        let id = SubmissionId::new("sub-1");
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid timestamp");
        let submission = Submission::new(id.clone(), ProblemId::new("url-shortener"), phase_times(), created_at);
        store.create(&submission, &artifacts(&id)).await.expect("creates submission");

        store.transition(&id, LifecycleState::Processing, None, None).await.expect("moves to processing");
        store.transition(&id, LifecycleState::Failed, Some(created_at), None).await.expect("moves to failed");

        let err = store.transition(&id, LifecycleState::Processing, None, None).await.expect_err("terminal is absorbing");
        assert!(err.to_string().contains("already terminal"));
    }

    #[tokio::test]
    async fn events_list_since_is_gap_free_and_ordered() {
        let store = SqliteStore::open_in_memory().expect("opens in-memory store");
        let id = SubmissionId::new("sub-1");
        let now = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid timestamp");
        for (ordinal, status) in [(0, EventStatus::Queued), (1, EventStatus::Processing), (2, EventStatus::Clarify)] {
            EventSink::append(
                &store,
                &Event {
                    submission_id: id.clone(),
                    ordinal: EventOrdinal::new(ordinal),
                    status,
                    message: "ok".to_owned(),
                    phase: None,
                    progress: None,
                    created_at: now,
                },
            )
            .await
            .expect("appends event");
        }

        let all = store.list_since(&id, None).await.expect("lists all events");
        assert_eq!(all.len(), 3);

        let after_first = store.list_since(&id, Some(EventOrdinal::new(0))).await.expect("lists tail");
        assert_eq!(after_first.len(), 2);
        assert_eq!(after_first[0].ordinal, EventOrdinal::new(1));
    }

    #[tokio::test]
    async fn completing_a_submission_records_a_result_history_row() {
        let store = SqliteStore::open_in_memory().expect("opens in-memory store");
        store.upsert_problem(&problem()).expect("stores problem");
        let id = SubmissionId::new("sub-1");
        let created_at = Utc.with_ymd_and_hms(2026, 1, 1, 0, 0, 0).single().expect("valid timestamp");
        let submission = Submission::new(id.clone(), ProblemId::new("url-shortener"), phase_times(), created_at);
        store.create(&submission, &artifacts(&id)).await.expect("creates submission");

        let result = serde_json::json!({ "result_version": 2 });
        store.transition(&id, LifecycleState::Complete, Some(created_at), Some(result)).await.expect("completes");

        let guard = store.connection.lock().expect("lock connection");
        let count: i64 = guard
            .query_row("SELECT COUNT(1) FROM grading_results WHERE submission_id = ?1", params![id.as_str()], |row| {
                row.get(0)
            })
            .expect("counts results");
        assert_eq!(count, 1);
        drop(guard);
    }
}
