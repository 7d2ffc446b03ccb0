use std::time::Duration;

use dioxus::prelude::*;
use services::{QuizPhase, QuizSnapshot};

use crate::context::AppContext;
use crate::views::{
    NameEntry, QuestionPanel, ReviewPanel, ViewError, ViewState, view_state_from_resource,
};
use crate::vm::{QuizIntent, QuizVm, start_quiz};

#[cfg(test)]
use std::cell::RefCell;
#[cfg(test)]
use std::rc::Rc;

const TICK_INTERVAL: Duration = Duration::from_secs(1);

#[component]
pub fn QuizView() -> Element {
    let ctx = use_context::<AppContext>();
    let quiz_loop = ctx.quiz_loop();
    let intro = QuizIntro {
        question_count: ctx.question_count(),
        time_limit_secs: quiz_loop.settings().time_limit_secs(),
    };

    let error = use_signal(|| None::<ViewError>);
    let vm = use_signal(|| None::<QuizVm>);

    let quiz_loop_for_resource = quiz_loop.clone();
    let resource = use_resource(move || {
        let quiz_loop = quiz_loop_for_resource.clone();
        let mut error = error;
        let mut vm = vm;

        async move {
            let started = start_quiz(&quiz_loop).await?;
            vm.set(Some(started));
            error.set(None);
            Ok::<_, ViewError>(())
        }
    });

    let dispatch_intent = {
        let quiz_loop = quiz_loop.clone();
        use_callback(move |intent: QuizIntent| {
            let quiz_loop = quiz_loop.clone();
            let mut error = error;
            let mut vm = vm;

            spawn(async move {
                let taken = vm.write().take();
                let Some(mut vm_value) = taken else {
                    // Another intent (usually a result save) is still in flight.
                    tracing::debug!(?intent, "quiz busy, intent dropped");
                    return;
                };

                let result = vm_value.apply(&quiz_loop, intent).await;

                // Always put the session back so the UI remains usable even after errors.
                vm.set(Some(vm_value));

                match result {
                    Ok(()) => error.set(None),
                    Err(err) => error.set(Some(err)),
                }
            });
        })
    };

    use_future(move || async move {
        let mut interval = tokio::time::interval(TICK_INTERVAL);
        loop {
            interval.tick().await;
            let running = vm.peek().as_ref().is_some_and(QuizVm::is_running);
            if running {
                dispatch_intent.call(QuizIntent::Tick);
            }
        }
    });

    #[cfg(test)]
    {
        let mut registered = use_signal(|| false);
        if !registered() {
            registered.set(true);
            if let Some(handles) = try_consume_context::<QuizTestHandles>() {
                handles.register(dispatch_intent, vm);
            }
        }
    }

    let state = view_state_from_resource(&resource);
    let snapshot = vm
        .read()
        .as_ref()
        .and_then(|vm| vm.snapshot(&quiz_loop));

    let body = match state {
        ViewState::Idle => rsx! {
            p { "Idle" }
        },
        ViewState::Loading => rsx! {
            p { "Loading..." }
        },
        ViewState::Error(err) => rsx! {
            p { "{err.message()}" }
            button {
                class: "btn",
                r#type: "button",
                onclick: move |_| {
                    let mut resource = resource;
                    resource.restart();
                },
                "Retry"
            }
        },
        ViewState::Ready(()) => render_snapshot(snapshot, intro, dispatch_intent),
    };

    rsx! {
        div { class: "quiz",
            h1 { class: "quiz__title", "Quiz" }
            div { class: "quiz-card",
                if let Some(err) = *error.read() {
                    p { class: "quiz-error", "{err.message()}" }
                }
                {body}
            }
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
struct QuizIntro {
    question_count: usize,
    time_limit_secs: u32,
}

fn render_snapshot(
    snapshot: Option<QuizSnapshot>,
    intro: QuizIntro,
    dispatch: Callback<QuizIntent>,
) -> Element {
    let Some(snapshot) = snapshot else {
        return rsx! {
            p { "Loading..." }
        };
    };

    match snapshot.phase {
        QuizPhase::AwaitingName => rsx! {
            NameEntry {
                question_count: intro.question_count,
                time_limit_secs: intro.time_limit_secs,
                warning: snapshot.warning,
                on_submit: move |name: String| dispatch.call(QuizIntent::SubmitName(name)),
            }
        },
        QuizPhase::InProgress => match snapshot.question {
            Some(question) => rsx! {
                QuestionPanel { question, warning: snapshot.warning, on_intent: dispatch }
            },
            None => rsx! {},
        },
        QuizPhase::Finished => match snapshot.result {
            Some(result) => rsx! {
                ReviewPanel {
                    user_name: snapshot.user_name,
                    result,
                    save: snapshot.save,
                    on_retry_save: move |()| dispatch.call(QuizIntent::RetrySave),
                    on_restart: move |()| dispatch.call(QuizIntent::Restart),
                }
            },
            None => rsx! {},
        },
    }
}

#[cfg(test)]
#[derive(Clone, Default)]
pub(crate) struct QuizTestHandles {
    dispatch: Rc<RefCell<Option<Callback<QuizIntent>>>>,
    vm: Rc<RefCell<Option<Signal<Option<QuizVm>>>>>,
}

#[cfg(test)]
impl QuizTestHandles {
    pub(crate) fn register(&self, dispatch: Callback<QuizIntent>, vm: Signal<Option<QuizVm>>) {
        *self.dispatch.borrow_mut() = Some(dispatch);
        *self.vm.borrow_mut() = Some(vm);
    }

    pub(crate) fn dispatch(&self) -> Callback<QuizIntent> {
        (*self.dispatch.borrow()).expect("quiz dispatch registered")
    }

    pub(crate) fn vm(&self) -> Signal<Option<QuizVm>> {
        (*self.vm.borrow()).expect("quiz vm registered")
    }
}
