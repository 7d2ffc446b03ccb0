use chrono::{DateTime, Utc};
use quiz_core::QuizPhase;
use quiz_core::model::ResultRecord;

use super::context::{SaveState, SessionContext};

/// Presentation-agnostic view of the current question.
///
/// No pre-formatted strings: the UI decides how to show countdowns and
/// progress.
#[derive(Debug, Clone, PartialEq)]
pub struct QuestionView {
    /// 1-based.
    pub number: usize,
    pub total: usize,
    pub text: String,
    pub options: Vec<String>,
    /// The option to render as checked, if any.
    pub selected: Option<usize>,
    /// Seconds left, clamped at zero.
    pub time_left: u32,
    pub time_limit: u32,
    pub progress: f32,
    pub is_first: bool,
    pub is_last: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewRow {
    pub number: usize,
    pub question: String,
    pub your_answer: String,
    pub correct: bool,
    pub correct_answer: String,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultView {
    pub score: u32,
    pub total: u32,
    pub rows: Vec<ReviewRow>,
}

impl ResultView {
    #[must_use]
    pub fn from_record(record: &ResultRecord) -> Self {
        Self {
            score: record.score(),
            total: record.total(),
            rows: record
                .entries()
                .iter()
                .map(|entry| ReviewRow {
                    number: entry.number,
                    question: entry.question.clone(),
                    your_answer: entry.chosen_label().to_owned(),
                    correct: entry.correct,
                    correct_answer: entry.correct_answer.clone(),
                })
                .collect(),
        }
    }
}

/// Everything the presentation layer needs for one render.
#[derive(Debug, Clone, PartialEq)]
pub struct QuizSnapshot {
    pub phase: QuizPhase,
    pub user_name: String,
    pub question: Option<QuestionView>,
    pub warning: Option<String>,
    pub result: Option<ResultView>,
    pub save: Option<SaveState>,
}

impl QuizSnapshot {
    /// Snapshot of `ctx` at `now`. `None` before the session is initialized.
    #[must_use]
    pub fn capture(ctx: &SessionContext, now: DateTime<Utc>) -> Option<Self> {
        let session = ctx.session()?;

        let question = session.current_question().map(|question| {
            let progress = session.progress();
            let time_left = session.time_left(now).clamp(0, i64::from(u32::MAX));
            QuestionView {
                number: progress.number,
                total: progress.total,
                text: question.text().to_owned(),
                options: question.options().to_vec(),
                selected: session.displayed_selection(),
                time_left: u32::try_from(time_left).unwrap_or(0),
                time_limit: session.settings().time_limit_secs(),
                progress: progress.fraction,
                is_first: session.current_index() == 0,
                is_last: session.current_index() == session.quiz().last_index(),
            }
        });

        let result = session
            .result_record()
            .ok()
            .map(|record| ResultView::from_record(&record));

        Some(Self {
            phase: session.phase(),
            user_name: session.user_name().to_owned(),
            question,
            warning: ctx.warning().map(quiz_core::ValidationWarning::message),
            result,
            save: ctx.save_state().cloned(),
        })
    }
}
