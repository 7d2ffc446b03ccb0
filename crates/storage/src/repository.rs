use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use quiz_core::model::{Question, QuestionError, Quiz, ResultRecord};
use thiserror::Error;

use crate::files::{render_result_text, result_file_name};

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

/// The question source could not produce a quiz. Fatal at startup.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LoadError {
    #[error("cannot read question file {path}: {message}")]
    Unreadable { path: String, message: String },

    #[error("cannot parse question file header: {0}")]
    Header(String),

    #[error("question file is missing required columns: {}", .missing.join(", "))]
    MissingColumns { missing: Vec<String> },

    #[error("row {row}: {message}")]
    MalformedRow { row: usize, message: String },

    #[error("row {row}: {source}")]
    InvalidQuestion {
        row: usize,
        #[source]
        source: QuestionError,
    },

    #[error("question file contains no questions")]
    Empty,
}

/// A result could not be written. The quiz state itself is unaffected.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum PersistenceError {
    #[error("cannot create results directory {path}: {message}")]
    CreateDir { path: String, message: String },

    #[error("cannot write result file {path}: {message}")]
    Write { path: String, message: String },

    #[error("result store unavailable: {0}")]
    Unavailable(String),
}

//
// ─── CONTRACTS ─────────────────────────────────────────────────────────────────
//

/// Source of the fixed question list.
#[async_trait]
pub trait QuestionSource: Send + Sync {
    /// Load every question, in source order.
    ///
    /// # Errors
    ///
    /// Returns `LoadError` if the source is unreadable, lacks required
    /// columns, or holds an invalid or empty question list.
    async fn load_quiz(&self) -> Result<Quiz, LoadError>;
}

/// Destination for finished attempts.
#[async_trait]
pub trait ResultSink: Send + Sync {
    /// Persist the rendered record and return where it went.
    ///
    /// Same name and score map to the same location; a later save overwrites.
    ///
    /// # Errors
    ///
    /// Returns `PersistenceError` if the destination cannot be created or written.
    async fn save_result(&self, record: &ResultRecord) -> Result<PathBuf, PersistenceError>;
}

//
// ─── IN-MEMORY ─────────────────────────────────────────────────────────────────
//

/// In-memory questions and results for tests and prototyping.
///
/// Saved results are kept as rendered text keyed by the path a file-backed
/// writer would have used under `results/`.
#[derive(Clone, Default)]
pub struct InMemoryRepository {
    questions: Arc<Vec<Question>>,
    results: Arc<Mutex<BTreeMap<PathBuf, String>>>,
}

impl InMemoryRepository {
    #[must_use]
    pub fn new(questions: Vec<Question>) -> Self {
        Self {
            questions: Arc::new(questions),
            results: Arc::new(Mutex::new(BTreeMap::new())),
        }
    }

    /// Rendered text saved at `path`, if any.
    #[must_use]
    pub fn saved(&self, path: &Path) -> Option<String> {
        self.results
            .lock()
            .ok()
            .and_then(|guard| guard.get(path).cloned())
    }

    /// Number of distinct result locations written so far.
    #[must_use]
    pub fn saved_count(&self) -> usize {
        self.results.lock().map(|guard| guard.len()).unwrap_or(0)
    }
}

#[async_trait]
impl QuestionSource for InMemoryRepository {
    async fn load_quiz(&self) -> Result<Quiz, LoadError> {
        Quiz::new(self.questions.as_ref().clone()).map_err(|_| LoadError::Empty)
    }
}

#[async_trait]
impl ResultSink for InMemoryRepository {
    async fn save_result(&self, record: &ResultRecord) -> Result<PathBuf, PersistenceError> {
        let path = Path::new("results").join(result_file_name(
            record.user_name(),
            record.score(),
            record.total(),
        ));
        let mut guard = self
            .results
            .lock()
            .map_err(|e| PersistenceError::Unavailable(e.to_string()))?;
        guard.insert(path.clone(), render_result_text(record));
        Ok(path)
    }
}

/// Question source and result sink behind trait objects for easy backend swapping.
#[derive(Clone)]
pub struct Storage {
    pub questions: Arc<dyn QuestionSource>,
    pub results: Arc<dyn ResultSink>,
}

impl Storage {
    #[must_use]
    pub fn in_memory(questions: Vec<Question>) -> Self {
        let repo = InMemoryRepository::new(questions);
        let source: Arc<dyn QuestionSource> = Arc::new(repo.clone());
        let sink: Arc<dyn ResultSink> = Arc::new(repo);
        Self {
            questions: source,
            results: sink,
        }
    }
}
