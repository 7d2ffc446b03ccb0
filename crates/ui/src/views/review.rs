use dioxus::prelude::*;
use services::{ResultView, SaveState};

use crate::vm::{format_score, map_review_items, map_save_status};

#[component]
pub fn ReviewPanel(
    user_name: String,
    result: ResultView,
    save: Option<SaveState>,
    on_retry_save: EventHandler<()>,
    on_restart: EventHandler<()>,
) -> Element {
    let score_label = format_score(&user_name, result.score, result.total);
    let items = map_review_items(&result.rows);
    let status = map_save_status(save.as_ref());
    let status_class = if status.is_failed() {
        "save-status save-status--failed"
    } else {
        "save-status"
    };

    rsx! {
        div { class: "quiz-review",
            h2 { class: "quiz-review__score", "{score_label}" }

            for (index, item) in items.into_iter().enumerate() {
                div {
                    key: "{index}",
                    class: "{review_item_class(item.correct)}",
                    p { class: "review-item__question", "{item.heading}" }
                    p { class: "review-item__answer", "{item.answer_line}" }
                    p { class: "review-item__correct", "{item.correct_line}" }
                }
            }

            p { class: "{status_class}", "{status.message()}" }
            if status.is_failed() {
                button {
                    class: "btn",
                    r#type: "button",
                    onclick: move |_| on_retry_save.call(()),
                    "Retry"
                }
            }
            button {
                class: "btn btn-primary",
                r#type: "button",
                onclick: move |_| on_restart.call(()),
                "Restart"
            }
        }
    }
}

fn review_item_class(correct: bool) -> &'static str {
    if correct {
        "review-item"
    } else {
        "review-item review-item--wrong"
    }
}
