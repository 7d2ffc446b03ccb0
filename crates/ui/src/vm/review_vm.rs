use services::{ReviewRow, SaveState};

const CORRECT_MARK: &str = "✅";
const WRONG_MARK: &str = "❌";

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReviewItemVm {
    pub heading: String,
    pub answer_line: String,
    pub correct_line: String,
    pub correct: bool,
}

impl From<&ReviewRow> for ReviewItemVm {
    fn from(row: &ReviewRow) -> Self {
        let mark = if row.correct { CORRECT_MARK } else { WRONG_MARK };
        Self {
            heading: format!("Q{}: {}", row.number, row.question),
            answer_line: format!("Your Answer: {} {mark}", row.your_answer),
            correct_line: format!("Correct Answer: {}", row.correct_answer),
            correct: row.correct,
        }
    }
}

#[must_use]
pub fn map_review_items(rows: &[ReviewRow]) -> Vec<ReviewItemVm> {
    rows.iter().map(ReviewItemVm::from).collect()
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum SaveStatusVm {
    Saving,
    Saved(String),
    Failed(String),
}

impl SaveStatusVm {
    #[must_use]
    pub fn message(&self) -> String {
        match self {
            Self::Saving => "Saving result...".to_string(),
            Self::Saved(path) => format!("Result saved to {path}"),
            Self::Failed(reason) => format!("Could not save result: {reason}"),
        }
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        matches!(self, Self::Failed(_))
    }
}

#[must_use]
pub fn map_save_status(save: Option<&SaveState>) -> SaveStatusVm {
    match save {
        None => SaveStatusVm::Saving,
        Some(SaveState::Saved(path)) => SaveStatusVm::Saved(path.display().to_string()),
        Some(SaveState::Failed(reason)) => SaveStatusVm::Failed(reason.clone()),
    }
}
