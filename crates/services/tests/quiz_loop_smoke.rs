use std::path::PathBuf;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::Duration;
use quiz_core::model::{Question, QuizSettings, ResultRecord, TimeoutFill};
use quiz_core::session::AfterTimeout;
use quiz_core::time::{fixed_clock, fixed_now};
use services::{
    AppServices, QuestionStore, QuizEvent, QuizLoopService, QuizPhase, QuizServiceError,
    SaveState, SessionContext, Transition, ValidationWarning,
};
use storage::{InMemoryRepository, PersistenceError, ResultSink, Storage};

fn colour_question(text: &str, correct: &str) -> Question {
    Question::new(text, ["Red", "Green", "Blue", "Yellow"].map(String::from), correct)
        .expect("valid question")
}

fn in_memory_loop(
    questions: Vec<Question>,
    settings: QuizSettings,
) -> (QuizLoopService, InMemoryRepository) {
    let repo = InMemoryRepository::new(questions);
    let store = Arc::new(QuestionStore::new(Arc::new(repo.clone())));
    let svc = QuizLoopService::new(fixed_clock(), settings, store, Arc::new(repo.clone()));
    (svc, repo)
}

async fn started(svc: &QuizLoopService, name: &str) -> SessionContext {
    let mut ctx = SessionContext::new();
    svc.start(&mut ctx).await.expect("start");
    let outcome = svc
        .dispatch_at(&mut ctx, QuizEvent::SubmitName(name.into()), fixed_now())
        .await
        .expect("submit name");
    assert_eq!(outcome.transition, Transition::Started);
    ctx
}

#[tokio::test]
async fn two_question_run_writes_result_file() {
    let dir = tempfile::tempdir().expect("tempdir");
    let questions_path = dir.path().join("questions.csv");
    std::fs::write(
        &questions_path,
        "question,option1,option2,option3,option4,correct_answer\n\
         Colour of the sky?,Red,Green,Blue,Yellow,blue\n\
         Colour of grass?,Red,Green,Blue,Yellow,Green\n",
    )
    .expect("write csv");
    let results_dir = dir.path().join("results");

    let services = AppServices::new_files(
        &questions_path,
        &results_dir,
        fixed_clock(),
        QuizSettings::default(),
    )
    .await
    .expect("services");
    assert_eq!(services.question_count(), 2);
    let svc = services.quiz_loop();

    let mut ctx = started(&svc, "Ada").await;
    let now = fixed_now();
    for event in [
        QuizEvent::Select(2),
        QuizEvent::SaveAndNext,
        QuizEvent::Select(3),
    ] {
        svc.dispatch_at(&mut ctx, event, now).await.expect("dispatch");
    }
    let outcome = svc
        .dispatch_at(&mut ctx, QuizEvent::SaveAndNext, now)
        .await
        .expect("finish");

    assert_eq!(outcome.transition, Transition::Finished { score: 1, total: 2 });
    assert!(outcome.is_finished);
    let expected_path = results_dir.join("Ada_1of2.txt");
    assert_eq!(outcome.save, Some(SaveState::Saved(expected_path.clone())));

    let text = std::fs::read_to_string(&expected_path).expect("result file");
    assert_eq!(text.matches('✅').count(), 1);
    assert_eq!(text.matches('❌').count(), 1);

    let snapshot = svc.snapshot(&ctx).expect("snapshot");
    assert_eq!(snapshot.phase, QuizPhase::Finished);
    let result = snapshot.result.expect("result view");
    assert_eq!((result.score, result.total), (1, 2));
    assert_eq!(result.rows[1].your_answer, "Yellow");
    assert!(!result.rows[1].correct);
}

#[tokio::test]
async fn single_question_timeout_finishes_and_saves() {
    let (svc, repo) = in_memory_loop(
        vec![colour_question("Pick red", "red")],
        QuizSettings::default(),
    );
    let mut ctx = started(&svc, "Ada").await;

    let outcome = svc
        .dispatch_at(&mut ctx, QuizEvent::Tick, fixed_now() + Duration::seconds(30))
        .await
        .expect("tick");

    assert_eq!(
        outcome.transition,
        Transition::TimedOut {
            question: 0,
            filled: true,
            then: AfterTimeout::Finished { score: 1, total: 1 },
        }
    );
    let session = ctx.session().expect("session");
    assert_eq!(session.answers(), &[Some(0)]);
    assert_eq!(session.phase(), QuizPhase::Finished);

    let path = ctx.saved_path().cloned().expect("saved");
    assert_eq!(path, PathBuf::from("results").join("Ada_1of1.txt"));
    assert!(repo.saved(&path).expect("text").contains("Your Answer: Red ✅"));
}

#[tokio::test]
async fn finishing_with_unanswered_question_is_rejected() {
    let settings = QuizSettings::default().with_timeout_fill(TimeoutFill::LeaveUnanswered);
    let (svc, repo) = in_memory_loop(
        vec![colour_question("One", "red"), colour_question("Two", "blue")],
        settings,
    );
    let mut ctx = started(&svc, "Ada").await;
    let later = fixed_now() + Duration::seconds(30);

    svc.dispatch_at(&mut ctx, QuizEvent::Tick, later)
        .await
        .expect("timeout");
    let outcome = svc
        .dispatch_at(&mut ctx, QuizEvent::SaveAndNext, later)
        .await
        .expect("save");

    assert_eq!(
        outcome.transition,
        Transition::Rejected(ValidationWarning::UnansweredQuestions { missing: vec![1] })
    );
    assert!(!outcome.is_finished);
    assert!(outcome.save.is_none());
    assert_eq!(repo.saved_count(), 0);

    let session = ctx.session().expect("session");
    assert_eq!(session.phase(), QuizPhase::InProgress);
    assert_eq!(session.current_index(), 1);
    assert_eq!(session.score(), 0);

    let snapshot = svc.snapshot(&ctx).expect("snapshot");
    assert!(snapshot.warning.expect("warning").contains("Q1"));
}

#[tokio::test]
async fn rejected_finish_warning_survives_ticks() {
    let settings = QuizSettings::default().with_timeout_fill(TimeoutFill::LeaveUnanswered);
    let (svc, _repo) = in_memory_loop(
        vec![colour_question("One", "red"), colour_question("Two", "blue")],
        settings,
    );
    let mut ctx = started(&svc, "Ada").await;
    let later = fixed_now() + Duration::seconds(30);

    svc.dispatch_at(&mut ctx, QuizEvent::Tick, later)
        .await
        .expect("timeout");
    svc.dispatch_at(&mut ctx, QuizEvent::SaveAndNext, later)
        .await
        .expect("save");
    assert!(ctx.warning().is_some());

    let outcome = svc
        .dispatch_at(&mut ctx, QuizEvent::Tick, later + Duration::seconds(1))
        .await
        .expect("tick");
    assert_eq!(outcome.transition, Transition::Unchanged);
    assert_eq!(
        ctx.warning(),
        Some(&ValidationWarning::UnansweredQuestions { missing: vec![1] })
    );
    let snapshot = svc.snapshot(&ctx).expect("snapshot");
    assert!(snapshot.warning.expect("warning").contains("Q1"));

    svc.dispatch_at(&mut ctx, QuizEvent::Back, later + Duration::seconds(2))
        .await
        .expect("back");
    assert!(ctx.warning().is_none());
}

#[tokio::test]
async fn same_name_and_score_reuse_result_path() {
    let (svc, repo) = in_memory_loop(
        vec![colour_question("One", "red"), colour_question("Two", "blue")],
        QuizSettings::default(),
    );

    let mut paths = Vec::new();
    let mut ctx = started(&svc, "Ada").await;
    for answers in [[0, 0], [2, 2]] {
        let now = fixed_now();
        for choice in answers {
            svc.dispatch_at(&mut ctx, QuizEvent::Select(choice), now)
                .await
                .expect("select");
            svc.dispatch_at(&mut ctx, QuizEvent::SaveAndNext, now)
                .await
                .expect("save");
        }
        paths.push(ctx.saved_path().cloned().expect("saved"));

        svc.dispatch_at(&mut ctx, QuizEvent::Restart, now)
            .await
            .expect("restart");
        svc.dispatch_at(&mut ctx, QuizEvent::SubmitName("Ada".into()), now)
            .await
            .expect("name");
    }

    assert_eq!(paths[0], paths[1]);
    assert_eq!(repo.saved_count(), 1);
    let text = repo.saved(&paths[1]).expect("text");
    assert!(text.contains("Your Answer: Blue ✅"), "{text}");
}

#[tokio::test]
async fn restart_recreates_default_session() {
    let (svc, _repo) = in_memory_loop(
        vec![colour_question("One", "red")],
        QuizSettings::default(),
    );
    let mut ctx = started(&svc, "Ada").await;
    svc.dispatch_at(&mut ctx, QuizEvent::SaveAndNext, fixed_now())
        .await
        .expect("finish");
    assert!(ctx.saved_path().is_some());

    let outcome = svc.restart(&mut ctx).await.expect("restart");
    assert_eq!(outcome.transition, Transition::Restarted);

    let session = ctx.session().expect("fresh session");
    assert_eq!(session.current_index(), 0);
    assert_eq!(session.score(), 0);
    assert!(session.answers().iter().all(Option::is_none));
    assert!(!session.is_finished());
    assert_eq!(session.user_name(), "");
    assert!(ctx.save_state().is_none());
}

#[tokio::test]
async fn start_keeps_existing_session() {
    let (svc, _repo) = in_memory_loop(
        vec![colour_question("One", "red"), colour_question("Two", "red")],
        QuizSettings::default(),
    );
    let mut ctx = started(&svc, "Ada").await;
    svc.dispatch_at(&mut ctx, QuizEvent::SaveAndNext, fixed_now())
        .await
        .expect("advance");
    let before = ctx.session().cloned();

    svc.start(&mut ctx).await.expect("start again");
    assert_eq!(ctx.session().cloned(), before);
}

#[tokio::test]
async fn dispatch_without_session_fails() {
    let (svc, _repo) = in_memory_loop(vec![colour_question("One", "red")], QuizSettings::default());
    let mut ctx = SessionContext::new();
    let err = svc.dispatch(&mut ctx, QuizEvent::Tick).await.unwrap_err();
    assert!(matches!(err, QuizServiceError::NotStarted));
}

#[tokio::test]
async fn empty_question_source_fails_startup() {
    let err = AppServices::from_storage(
        Storage::in_memory(Vec::new()),
        fixed_clock(),
        QuizSettings::default(),
    )
    .await
    .err()
    .expect("startup should fail");
    assert!(err.to_string().contains("no questions"));
}

struct FlakySink {
    fail: AtomicBool,
}

#[async_trait::async_trait]
impl ResultSink for FlakySink {
    async fn save_result(&self, _record: &ResultRecord) -> Result<PathBuf, PersistenceError> {
        if self.fail.swap(false, Ordering::SeqCst) {
            return Err(PersistenceError::Write {
                path: "results/x.txt".into(),
                message: "disk full".into(),
            });
        }
        Ok(PathBuf::from("results/ok.txt"))
    }
}

#[tokio::test]
async fn failed_save_keeps_state_and_can_be_retried() {
    let repo = InMemoryRepository::new(vec![colour_question("One", "red")]);
    let store = Arc::new(QuestionStore::new(Arc::new(repo)));
    let sink = Arc::new(FlakySink {
        fail: AtomicBool::new(true),
    });
    let svc = QuizLoopService::new(fixed_clock(), QuizSettings::default(), store, sink);
    let mut ctx = started(&svc, "Ada").await;

    let outcome = svc
        .dispatch_at(&mut ctx, QuizEvent::SaveAndNext, fixed_now())
        .await
        .expect("dispatch succeeds even when saving fails");
    assert!(outcome.is_finished);
    assert!(matches!(outcome.save, Some(SaveState::Failed(ref msg)) if msg.contains("disk full")));
    assert_eq!(ctx.session().expect("session").score(), 1);

    let path = svc.retry_save(&mut ctx).await.expect("retry");
    assert_eq!(path, PathBuf::from("results/ok.txt"));
    assert_eq!(ctx.saved_path(), Some(&path));
}
