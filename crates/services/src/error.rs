//! Shared error types for the services crate.

use thiserror::Error;

use quiz_core::session::SessionError;
use storage::{LoadError, PersistenceError};

/// Errors emitted by the quiz loop.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum QuizServiceError {
    #[error("quiz session has not been started")]
    NotStarted,
    #[error(transparent)]
    Load(#[from] LoadError),
    #[error(transparent)]
    Persistence(#[from] PersistenceError),
    #[error(transparent)]
    Session(#[from] SessionError),
}

/// Errors emitted while bootstrapping app services.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum AppServicesError {
    #[error(transparent)]
    Load(#[from] LoadError),
}
