use std::path::{Path, PathBuf};
use std::sync::Arc;

use async_trait::async_trait;
use dioxus::prelude::ReadableExt;
use quiz_core::model::ResultRecord;
use services::QuizPhase;
use storage::{InMemoryRepository, PersistenceError, ResultSink};
use tokio::sync::Notify;

use super::test_harness::{sample_questions, setup_quiz_harness, setup_quiz_harness_with_sink};
use crate::vm::{QuizIntent, QuizVm};

/// Holds every save until the gate is opened.
struct GatedSink {
    gate: Arc<Notify>,
    inner: InMemoryRepository,
}

#[async_trait]
impl ResultSink for GatedSink {
    async fn save_result(&self, record: &ResultRecord) -> Result<PathBuf, PersistenceError> {
        self.gate.notified().await;
        self.inner.save_result(record).await
    }
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_name_entry() {
    let mut harness = setup_quiz_harness(sample_questions());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Enter your name to start"), "missing name prompt in {html}");
    assert!(html.contains("Start Quiz"), "missing start button in {html}");
    assert!(html.contains("2 questions"), "missing question count in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_load_error() {
    let mut harness = setup_quiz_harness(Vec::new());
    harness.rebuild();
    harness.drive_async().await;

    let html = harness.render();
    assert!(
        html.contains("The questions could not be loaded."),
        "missing load error in {html}"
    );
    assert!(html.contains("Retry"), "missing retry in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_rejects_blank_name() {
    let mut harness = setup_quiz_harness(sample_questions());
    harness.rebuild();
    harness.drive_async().await;

    harness.send(QuizIntent::SubmitName("  ".to_string())).await;

    let html = harness.render();
    assert!(html.contains("Enter your name to start"), "left name entry in {html}");
    assert!(html.contains("role=\"alert\""), "missing warning in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_renders_question_with_countdown() {
    let mut harness = setup_quiz_harness(sample_questions());
    harness.rebuild();
    harness.drive_async().await;

    harness.send(QuizIntent::SubmitName("Ada".to_string())).await;

    let html = harness.render();
    assert!(html.contains("Question 1 of 2"), "missing progress in {html}");
    assert!(html.contains("Time left: 30s"), "missing countdown in {html}");
    assert!(html.contains("What is 2 + 2?"), "missing question text in {html}");
    assert!(html.contains("Save and Next"), "missing save button in {html}");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_finishes_and_reviews() {
    let mut harness = setup_quiz_harness(sample_questions());
    harness.rebuild();
    harness.drive_async().await;

    harness.send(QuizIntent::SubmitName("Ada".to_string())).await;
    harness.send(QuizIntent::Choose(1)).await;
    harness.send(QuizIntent::SaveAndNext).await;
    harness.send(QuizIntent::Choose(2)).await;
    harness.send(QuizIntent::SaveAndNext).await;

    let html = harness.render();
    assert!(html.contains("Ada, your score: 1/2"), "missing score in {html}");
    assert!(html.contains("Your Answer: 4 ✅"), "missing correct mark in {html}");
    assert!(html.contains("Your Answer: Venus ❌"), "missing wrong mark in {html}");
    assert!(html.contains("Restart"), "missing restart in {html}");

    let saved = harness.repo.saved(Path::new("results/Ada_1of2.txt"));
    assert!(saved.is_some(), "result was not saved");
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_restart_returns_to_name_entry() {
    let mut harness = setup_quiz_harness(sample_questions());
    harness.rebuild();
    harness.drive_async().await;

    harness.send(QuizIntent::SubmitName("Ada".to_string())).await;
    harness.send(QuizIntent::Restart).await;

    let html = harness.render();
    assert!(html.contains("Enter your name to start"), "missing name prompt in {html}");
    let vm = harness.handles.vm();
    let phase = harness
        .dom
        .in_runtime(|| vm.peek().as_ref().and_then(QuizVm::phase));
    assert_eq!(phase, Some(QuizPhase::AwaitingName));
}

#[tokio::test(flavor = "current_thread")]
async fn quiz_view_smoke_ignores_clicks_while_saving() {
    let gate = Arc::new(Notify::new());
    let sink = GatedSink {
        gate: Arc::clone(&gate),
        inner: InMemoryRepository::new(Vec::new()),
    };
    let mut harness = setup_quiz_harness_with_sink(sample_questions(), Some(Arc::new(sink)));
    harness.rebuild();
    harness.drive_async().await;

    harness.send(QuizIntent::SubmitName("Ada".to_string())).await;
    harness.send(QuizIntent::SaveAndNext).await;
    // Finishing now waits on the gated save.
    harness.send(QuizIntent::SaveAndNext).await;
    harness.send(QuizIntent::Restart).await;

    let html = harness.render();
    assert!(
        !html.contains("Something went wrong"),
        "busy click surfaced an error in {html}"
    );

    gate.notify_one();
    harness.drive_async().await;
    harness.drive_async().await;

    let html = harness.render();
    assert!(html.contains("Ada, your score: 0/2"), "missing review in {html}");
    assert!(!html.contains("Something went wrong"), "unexpected error in {html}");
}
