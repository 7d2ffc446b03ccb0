use std::path::PathBuf;
use std::sync::Arc;

use dioxus::LaunchBuilder;
use dioxus::desktop::{Config as DesktopConfig, WindowBuilder};
use quiz_core::model::QuizSettings;
use services::{AppServices, Clock, QuizLoopService};
use tracing_subscriber::EnvFilter;
use ui::{App, UiApp, build_app_context};

const DEFAULT_QUESTIONS_FILE: &str = "questions.csv";
const DEFAULT_RESULTS_DIR: &str = "results";

/// Where the quiz reads questions from and writes results to.
///
/// Paths are relative to the working directory.
#[derive(Debug, Clone, PartialEq)]
struct AppConfig {
    questions_path: PathBuf,
    results_dir: PathBuf,
    settings: QuizSettings,
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            questions_path: PathBuf::from(DEFAULT_QUESTIONS_FILE),
            results_dir: PathBuf::from(DEFAULT_RESULTS_DIR),
            settings: QuizSettings::default(),
        }
    }
}

struct DesktopApp {
    quiz_loop: Arc<QuizLoopService>,
    question_count: usize,
}

impl UiApp for DesktopApp {
    fn quiz_loop(&self) -> Arc<QuizLoopService> {
        Arc::clone(&self.quiz_loop)
    }

    fn question_count(&self) -> usize {
        self.question_count
    }
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .try_init();
}

fn load_services(config: &AppConfig) -> Result<AppServices, Box<dyn std::error::Error>> {
    // The desktop launcher runs its own runtime, so loading gets a short-lived one.
    let runtime = tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()?;
    let services = runtime.block_on(AppServices::new_files(
        config.questions_path.clone(),
        config.results_dir.clone(),
        Clock::default_clock(),
        config.settings,
    ))?;
    Ok(services)
}

fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::default();
    tracing::info!(
        questions = %config.questions_path.display(),
        results = %config.results_dir.display(),
        "starting quiz"
    );

    let services = load_services(&config)?;
    tracing::info!(questions = services.question_count(), "questions loaded");

    let app: Arc<dyn UiApp> = Arc::new(DesktopApp {
        quiz_loop: services.quiz_loop(),
        question_count: services.question_count(),
    });
    let context = build_app_context(&app);

    let desktop_cfg = DesktopConfig::new().with_window(
        WindowBuilder::new()
            .with_title("Quiz")
            .with_always_on_top(false),
    );

    LaunchBuilder::desktop()
        .with_cfg(desktop_cfg)
        .with_context(context)
        .launch(App);
    Ok(())
}

fn main() {
    init_tracing();
    if let Err(err) = run() {
        tracing::error!(error = %err, "quiz failed to start");
        // At this layer (binary glue), printing once is fine.
        eprintln!("{err}");
        std::process::exit(2);
    }
}
