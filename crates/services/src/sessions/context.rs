use std::path::PathBuf;

use chrono::{DateTime, Utc};
use quiz_core::model::{Quiz, QuizSettings};
use quiz_core::{QuizSession, ValidationWarning};

/// Outcome of persisting a finished attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SaveState {
    Saved(PathBuf),
    Failed(String),
}

/// Owner of the single quiz session of one interactive run.
///
/// This is the only place sessions are created. `initialize` is idempotent
/// so a re-render never loses progress; `teardown` drops the session so the
/// next `initialize` starts from defaults.
#[derive(Debug, Default)]
pub struct SessionContext {
    session: Option<QuizSession>,
    save: Option<SaveState>,
    warning: Option<ValidationWarning>,
}

impl SessionContext {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create the session if absent, otherwise leave it untouched.
    pub fn initialize(
        &mut self,
        quiz: Quiz,
        settings: QuizSettings,
        now: DateTime<Utc>,
    ) -> &mut QuizSession {
        self.session
            .get_or_insert_with(|| QuizSession::new(quiz, settings, now))
    }

    /// Drop the session and everything recorded about it.
    pub fn teardown(&mut self) {
        self.session = None;
        self.save = None;
        self.warning = None;
    }

    #[must_use]
    pub fn is_initialized(&self) -> bool {
        self.session.is_some()
    }

    #[must_use]
    pub fn session(&self) -> Option<&QuizSession> {
        self.session.as_ref()
    }

    pub(crate) fn session_mut(&mut self) -> Option<&mut QuizSession> {
        self.session.as_mut()
    }

    #[must_use]
    pub fn save_state(&self) -> Option<&SaveState> {
        self.save.as_ref()
    }

    #[must_use]
    pub fn saved_path(&self) -> Option<&PathBuf> {
        match &self.save {
            Some(SaveState::Saved(path)) => Some(path),
            Some(SaveState::Failed(_)) | None => None,
        }
    }

    pub(crate) fn set_save(&mut self, save: SaveState) {
        self.save = Some(save);
    }

    /// The warning raised by the most recent event, if any.
    #[must_use]
    pub fn warning(&self) -> Option<&ValidationWarning> {
        self.warning.as_ref()
    }

    pub(crate) fn set_warning(&mut self, warning: Option<ValidationWarning>) {
        self.warning = warning;
    }
}
