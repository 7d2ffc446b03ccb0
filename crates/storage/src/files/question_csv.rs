use std::path::{Path, PathBuf};

use async_trait::async_trait;
use csv::{ReaderBuilder, Trim};
use quiz_core::model::Quiz;

use super::mapping::{QuestionRow, missing_columns};
use crate::repository::{LoadError, QuestionSource};

/// Reads questions from a CSV file with a header row.
#[derive(Debug, Clone)]
pub struct CsvQuestionSource {
    path: PathBuf,
}

impl CsvQuestionSource {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }
}

#[async_trait]
impl QuestionSource for CsvQuestionSource {
    async fn load_quiz(&self) -> Result<Quiz, LoadError> {
        let bytes = tokio::fs::read(&self.path)
            .await
            .map_err(|e| LoadError::Unreadable {
                path: self.path.display().to_string(),
                message: e.to_string(),
            })?;
        let quiz = parse_quiz(&bytes)?;
        tracing::info!(
            path = %self.path.display(),
            questions = quiz.len(),
            "loaded question file"
        );
        Ok(quiz)
    }
}

/// Parse CSV bytes into a quiz.
///
/// Columns are matched by header name and every field is trimmed. Rows are
/// numbered from 1, not counting the header.
///
/// # Errors
///
/// Returns `LoadError` for a bad header, missing columns, an unparsable or
/// invalid row, or a file with no rows.
pub fn parse_quiz(bytes: &[u8]) -> Result<Quiz, LoadError> {
    let mut reader = ReaderBuilder::new().trim(Trim::All).from_reader(bytes);

    let headers = reader
        .headers()
        .map_err(|e| LoadError::Header(e.to_string()))?
        .clone();
    let missing = missing_columns(&headers);
    if !missing.is_empty() {
        return Err(LoadError::MissingColumns { missing });
    }

    let mut questions = Vec::new();
    for (i, row) in reader.deserialize::<QuestionRow>().enumerate() {
        let row_number = i + 1;
        let row = row.map_err(|e| LoadError::MalformedRow {
            row: row_number,
            message: e.to_string(),
        })?;
        let question = row
            .into_question()
            .map_err(|source| LoadError::InvalidQuestion {
                row: row_number,
                source,
            })?;
        questions.push(question);
    }

    Quiz::new(questions).map_err(|_| LoadError::Empty)
}
