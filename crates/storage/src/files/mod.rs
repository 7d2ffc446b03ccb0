use std::path::PathBuf;
use std::sync::Arc;

use crate::repository::{QuestionSource, ResultSink, Storage};

mod mapping;
mod question_csv;
mod result_text;

pub use mapping::REQUIRED_COLUMNS;
pub use question_csv::{CsvQuestionSource, parse_quiz};
pub use result_text::{TextResultWriter, render_result_text, result_file_name};

impl Storage {
    /// Questions from a CSV file, results as text files under `results_dir`.
    ///
    /// Nothing is touched on disk until the first load or save.
    #[must_use]
    pub fn files(questions_path: impl Into<PathBuf>, results_dir: impl Into<PathBuf>) -> Self {
        let source: Arc<dyn QuestionSource> = Arc::new(CsvQuestionSource::new(questions_path));
        let sink: Arc<dyn ResultSink> = Arc::new(TextResultWriter::new(results_dir));
        Self {
            questions: source,
            results: sink,
        }
    }
}
