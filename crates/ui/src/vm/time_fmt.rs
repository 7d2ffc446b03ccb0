#[must_use]
pub fn format_countdown(seconds: u32) -> String {
    format!("Time left: {seconds}s")
}

#[must_use]
pub fn format_progress(number: usize, total: usize) -> String {
    format!("Question {number} of {total}")
}

#[must_use]
pub fn format_score(user_name: &str, score: u32, total: u32) -> String {
    format!("{user_name}, your score: {score}/{total}")
}
