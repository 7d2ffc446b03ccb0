use dioxus::prelude::*;

#[component]
pub fn NameEntry(
    question_count: usize,
    time_limit_secs: u32,
    warning: Option<String>,
    on_submit: EventHandler<String>,
) -> Element {
    let mut name = use_signal(String::new);
    let noun = if question_count == 1 { "question" } else { "questions" };

    rsx! {
        div { class: "quiz-name",
            p { class: "quiz-name__intro", "{question_count} {noun}, {time_limit_secs} seconds each." }
            label { r#for: "quiz-name-input", "Enter your name to start" }
            input {
                id: "quiz-name-input",
                r#type: "text",
                value: "{name}",
                oninput: move |evt: FormEvent| name.set(evt.value()),
                onkeydown: move |evt: KeyboardEvent| {
                    if evt.data.key() == Key::Enter {
                        on_submit.call(name());
                    }
                },
            }
            if let Some(warning) = warning {
                p { class: "quiz-warning", role: "alert", "{warning}" }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_submit.call(name()),
                "Start Quiz"
            }
        }
    }
}
