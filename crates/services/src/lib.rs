#![forbid(unsafe_code)]

pub mod app_services;
pub mod error;
pub mod question_store;
pub mod sessions;

pub use quiz_core::Clock;
pub use quiz_core::{QuizEvent, QuizPhase, Transition, ValidationWarning};

pub use app_services::AppServices;
pub use error::{AppServicesError, QuizServiceError};
pub use question_store::QuestionStore;

pub use sessions::{
    LoopOutcome, QuestionView, QuizLoopService, QuizSnapshot, ResultView, ReviewRow, SaveState,
    SessionContext,
};
