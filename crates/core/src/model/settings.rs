use serde::{Deserialize, Serialize};
use thiserror::Error;

//
// ─── ERRORS ────────────────────────────────────────────────────────────────────
//

#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum SettingsError {
    #[error("question time limit must be between 5 and 3600 seconds")]
    InvalidTimeLimit,
}

//
// ─── POLICIES ──────────────────────────────────────────────────────────────────
//

/// What the last question's timeout does when earlier questions are unanswered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeoutFinish {
    /// Finish anyway; unanswered questions score as wrong.
    #[default]
    Lenient,
    /// Do not finish: jump to the first unanswered question with a warning.
    Strict,
}

/// What a timeout records for a question that has no saved answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TimeoutFill {
    /// Record option index 0.
    #[default]
    FirstOption,
    /// Leave the question unanswered.
    LeaveUnanswered,
}

//
// ─── SETTINGS ──────────────────────────────────────────────────────────────────
//

/// Tunables for a quiz run.
///
/// Defaults reproduce the classic behaviour: 30 seconds per question, the
/// first option pre-selected on screen, timeouts record the first option and
/// the last timeout finishes unconditionally.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuizSettings {
    time_limit_secs: u32,
    preselect_first_option: bool,
    timeout_fill: TimeoutFill,
    timeout_finish: TimeoutFinish,
}

impl Default for QuizSettings {
    fn default() -> Self {
        Self {
            time_limit_secs: Self::DEFAULT_TIME_LIMIT_SECS,
            preselect_first_option: true,
            timeout_fill: TimeoutFill::FirstOption,
            timeout_finish: TimeoutFinish::Lenient,
        }
    }
}

impl QuizSettings {
    pub const DEFAULT_TIME_LIMIT_SECS: u32 = 30;
    const MIN_TIME_LIMIT_SECS: u32 = 5;
    const MAX_TIME_LIMIT_SECS: u32 = 3600;

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` if the limit is outside 5..=3600.
    pub fn new(
        time_limit_secs: u32,
        preselect_first_option: bool,
        timeout_fill: TimeoutFill,
        timeout_finish: TimeoutFinish,
    ) -> Result<Self, SettingsError> {
        if !(Self::MIN_TIME_LIMIT_SECS..=Self::MAX_TIME_LIMIT_SECS).contains(&time_limit_secs) {
            return Err(SettingsError::InvalidTimeLimit);
        }
        Ok(Self {
            time_limit_secs,
            preselect_first_option,
            timeout_fill,
            timeout_finish,
        })
    }

    #[must_use]
    pub fn time_limit_secs(&self) -> u32 {
        self.time_limit_secs
    }

    /// Whether "Save and Next" without an explicit choice saves the
    /// on-screen default (option 0).
    #[must_use]
    pub fn preselect_first_option(&self) -> bool {
        self.preselect_first_option
    }

    #[must_use]
    pub fn timeout_fill(&self) -> TimeoutFill {
        self.timeout_fill
    }

    #[must_use]
    pub fn timeout_finish(&self) -> TimeoutFinish {
        self.timeout_finish
    }

    /// # Errors
    ///
    /// Returns `SettingsError::InvalidTimeLimit` if the limit is outside 5..=3600.
    pub fn with_time_limit_secs(self, secs: u32) -> Result<Self, SettingsError> {
        Self::new(secs, self.preselect_first_option, self.timeout_fill, self.timeout_finish)
    }

    #[must_use]
    pub fn with_preselect_first_option(mut self, enabled: bool) -> Self {
        self.preselect_first_option = enabled;
        self
    }

    #[must_use]
    pub fn with_timeout_fill(mut self, fill: TimeoutFill) -> Self {
        self.timeout_fill = fill;
        self
    }

    #[must_use]
    pub fn with_timeout_finish(mut self, finish: TimeoutFinish) -> Self {
        self.timeout_finish = finish;
        self
    }
}
