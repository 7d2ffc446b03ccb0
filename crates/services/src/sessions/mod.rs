mod context;
mod view;
mod workflow;

// Public API of the session subsystem.
pub use crate::error::QuizServiceError;
pub use context::{SaveState, SessionContext};
pub use view::{QuestionView, QuizSnapshot, ResultView, ReviewRow};
pub use workflow::{LoopOutcome, QuizLoopService};
