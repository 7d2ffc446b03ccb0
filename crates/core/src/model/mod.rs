mod question;
mod quiz;
mod result;
mod settings;

pub use question::{OPTION_COUNT, Question, QuestionError};
pub use quiz::{Quiz, QuizError};
pub use result::{NOT_ANSWERED, ResultEntry, ResultRecord};
pub use settings::{QuizSettings, SettingsError, TimeoutFill, TimeoutFinish};
