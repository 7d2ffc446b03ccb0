mod name_entry;
mod question;
mod quiz;
mod review;
mod state;

#[cfg(test)]
mod test_harness;
#[cfg(test)]
mod view_smoke;

pub use name_entry::NameEntry;
pub use question::QuestionPanel;
pub use quiz::QuizView;
pub use review::ReviewPanel;
pub use state::{ViewError, ViewState, view_state_from_resource};
