use dioxus::prelude::*;
use services::QuestionView;

use crate::vm::{QuizIntent, format_countdown, format_progress};

const LOW_TIME_SECS: u32 = 5;

#[component]
pub fn QuestionPanel(
    question: QuestionView,
    warning: Option<String>,
    on_intent: EventHandler<QuizIntent>,
) -> Element {
    let progress_label = format_progress(question.number, question.total);
    let countdown = format_countdown(question.time_left);
    let timer_class = if question.time_left <= LOW_TIME_SECS {
        "quiz-timer quiz-timer--low"
    } else {
        "quiz-timer"
    };
    let progress_value = question.progress.to_string();

    rsx! {
        div { class: "quiz-question",
            div { class: "quiz-meta",
                span { "{progress_label}" }
                span { class: "{timer_class}", "{countdown}" }
            }
            progress { class: "quiz-progress", max: "1", value: "{progress_value}" }

            if let Some(warning) = warning {
                p { class: "quiz-warning", role: "alert", "{warning}" }
            }

            h2 { class: "quiz-question__text", "{question.text}" }

            ul { class: "quiz-options", role: "radiogroup",
                for (index, option) in question.options.iter().enumerate() {
                    li { key: "{index}",
                        label {
                            input {
                                r#type: "radio",
                                name: "quiz-option",
                                checked: question.selected == Some(index),
                                onchange: move |_| on_intent.call(QuizIntent::Choose(index)),
                            }
                            " {option}"
                        }
                    }
                }
            }

            div { class: "quiz-actions",
                button {
                    class: "btn",
                    r#type: "button",
                    disabled: question.is_first,
                    onclick: move |_| on_intent.call(QuizIntent::Back),
                    "Back"
                }
                button {
                    class: "btn btn-primary",
                    r#type: "button",
                    onclick: move |_| on_intent.call(QuizIntent::SaveAndNext),
                    "Save and Next"
                }
            }
        }
    }
}
