use std::sync::Arc;

use dioxus::core::NoOpMutations;
use dioxus::prelude::*;
use quiz_core::model::{Question, QuizSettings};
use quiz_core::time::fixed_clock;
use services::{QuestionStore, QuizLoopService};
use storage::{InMemoryRepository, QuestionSource, ResultSink};

use crate::context::{UiApp, build_app_context};
use crate::views::QuizView;
use crate::views::quiz::QuizTestHandles;
use crate::vm::QuizIntent;

#[derive(Clone)]
struct TestApp {
    quiz_loop: Arc<QuizLoopService>,
    question_count: usize,
}

impl UiApp for TestApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn question_count(&self) -> usize {
        self.question_count
    }
}

#[derive(Props, Clone)]
struct QuizHarnessProps {
    app: Arc<TestApp>,
    handles: QuizTestHandles,
}

impl PartialEq for QuizHarnessProps {
    fn eq(&self, _other: &Self) -> bool {
        true
    }
}

#[component]
fn QuizViewHarness(props: QuizHarnessProps) -> Element {
    let app: Arc<dyn UiApp> = props.app.clone();
    use_context_provider(|| build_app_context(&app));
    use_context_provider(|| props.handles.clone());
    rsx! { QuizView {} }
}

pub struct QuizHarness {
    pub dom: VirtualDom,
    pub repo: InMemoryRepository,
    pub handles: QuizTestHandles,
}

impl QuizHarness {
    pub fn rebuild(&mut self) {
        self.dom.rebuild_in_place();
        drive_dom(&mut self.dom);
    }

    pub async fn drive_async(&mut self) {
        let _ = tokio::time::timeout(
            std::time::Duration::from_millis(50),
            self.dom.wait_for_work(),
        )
        .await;
        self.dom.render_immediate(&mut NoOpMutations);
        self.dom.process_events();
    }

    /// Dispatch through the view's own callback and let the spawned task finish.
    pub async fn send(&mut self, intent: QuizIntent) {
        let dispatch = self.handles.dispatch();
        self.dom.in_runtime(|| dispatch.call(intent));
        self.drive_async().await;
        self.drive_async().await;
    }

    pub fn render(&self) -> String {
        dioxus_ssr::render(&self.dom)
    }
}

pub fn drive_dom(dom: &mut VirtualDom) {
    dom.process_events();
    dom.render_immediate(&mut NoOpMutations);
    dom.process_events();
}

pub fn sample_questions() -> Vec<Question> {
    vec![
        Question::new("What is 2 + 2?", ["3", "4", "5", "6"].map(String::from), "4")
            .expect("question"),
        Question::new(
            "Which planet is largest?",
            ["Mars", "Jupiter", "Venus", "Earth"].map(String::from),
            "jupiter",
        )
        .expect("question"),
    ]
}

pub fn setup_quiz_harness(questions: Vec<Question>) -> QuizHarness {
    setup_quiz_harness_with_sink(questions, None)
}

/// Like [`setup_quiz_harness`], with results going to `sink` instead of the
/// in-memory repository when given.
pub fn setup_quiz_harness_with_sink(
    questions: Vec<Question>,
    sink: Option<Arc<dyn ResultSink>>,
) -> QuizHarness {
    let question_count = questions.len();
    let repo = InMemoryRepository::new(questions);
    let source: Arc<dyn QuestionSource> = Arc::new(repo.clone());
    let sink: Arc<dyn ResultSink> = sink.unwrap_or_else(|| Arc::new(repo.clone()));
    let quiz_loop = Arc::new(QuizLoopService::new(
        fixed_clock(),
        QuizSettings::default(),
        Arc::new(QuestionStore::new(source)),
        sink,
    ));

    let handles = QuizTestHandles::default();
    let app = Arc::new(TestApp {
        quiz_loop,
        question_count,
    });
    let dom = VirtualDom::new_with_props(
        QuizViewHarness,
        QuizHarnessProps {
            app,
            handles: handles.clone(),
        },
    );

    QuizHarness { dom, repo, handles }
}
