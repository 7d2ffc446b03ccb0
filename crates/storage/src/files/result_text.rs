use std::path::{Path, PathBuf};

use async_trait::async_trait;
use quiz_core::model::ResultRecord;

use crate::repository::{PersistenceError, ResultSink};

const CORRECT_MARK: &str = "✅";
const WRONG_MARK: &str = "❌";

/// `<name>_<score>of<total>.txt`, with characters that cannot appear in a
/// file name replaced by `_`.
#[must_use]
pub fn result_file_name(user_name: &str, score: u32, total: u32) -> String {
    let safe: String = user_name
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    format!("{safe}_{score}of{total}.txt")
}

/// Plain-text review of an attempt: a header followed by one block per question.
#[must_use]
pub fn render_result_text(record: &ResultRecord) -> String {
    let mut out = format!(
        "Name: {}\nScore: {}/{}\n\n",
        record.user_name(),
        record.score(),
        record.total()
    );
    for entry in record.entries() {
        let mark = if entry.correct { CORRECT_MARK } else { WRONG_MARK };
        out.push_str(&format!(
            "Q{}: {}\n  Your Answer: {} {mark}\n  Correct Answer: {}\n\n",
            entry.number,
            entry.question,
            entry.chosen_label(),
            entry.correct_answer
        ));
    }
    out
}

/// Writes each result as a UTF-8 text file inside one directory.
///
/// Writes are not atomic: an interrupted write leaves a partial file.
#[derive(Debug, Clone)]
pub struct TextResultWriter {
    dir: PathBuf,
}

impl TextResultWriter {
    #[must_use]
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    #[must_use]
    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

#[async_trait]
impl ResultSink for TextResultWriter {
    async fn save_result(&self, record: &ResultRecord) -> Result<PathBuf, PersistenceError> {
        tokio::fs::create_dir_all(&self.dir)
            .await
            .map_err(|e| PersistenceError::CreateDir {
                path: self.dir.display().to_string(),
                message: e.to_string(),
            })?;

        let path = self.dir.join(result_file_name(
            record.user_name(),
            record.score(),
            record.total(),
        ));
        tokio::fs::write(&path, render_result_text(record))
            .await
            .map_err(|e| PersistenceError::Write {
                path: path.display().to_string(),
                message: e.to_string(),
            })?;

        tracing::info!(
            path = %path.display(),
            score = record.score(),
            total = record.total(),
            "saved quiz result"
        );
        Ok(path)
    }
}
