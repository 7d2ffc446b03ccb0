mod quiz_vm;
mod review_vm;
mod time_fmt;

pub use quiz_vm::{QuizIntent, QuizVm, start_quiz};
pub use review_vm::{ReviewItemVm, SaveStatusVm, map_review_items, map_save_status};
pub use time_fmt::{format_countdown, format_progress, format_score};
