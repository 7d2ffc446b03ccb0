#![forbid(unsafe_code)]

pub mod error;
pub mod model;
pub mod scoring;
pub mod session;
pub mod time;

pub use error::Error;
pub use session::{QuizEvent, QuizPhase, QuizSession, Transition, ValidationWarning};
pub use time::Clock;
