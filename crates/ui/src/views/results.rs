use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::{Quiz, QuizId, QuizQuestion};

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_error_from_api, view_state_from_resource};
use crate::vm::format_clock;

const RING_RADIUS: f64 = 54.0;

/// Ring color by score band.
fn ring_color(score: f64) -> &'static str {
    if score >= 70.0 {
        "#22c55e"
    } else if score >= 40.0 {
        "#f59e0b"
    } else {
        "#ef4444"
    }
}

/// Dash offset that leaves `score`% of the ring drawn.
fn ring_offset(score: f64) -> f64 {
    let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
    circumference * (1.0 - score.clamp(0.0, 100.0) / 100.0)
}

fn review_option_class(question: &QuizQuestion, quiz: &Quiz, option_index: usize) -> &'static str {
    let option = &question.options[option_index];
    let picked = quiz
        .user_answers
        .as_ref()
        .and_then(|answers| answers.get(&question.id))
        .is_some_and(|chosen| *chosen == option.id);

    match option.is_correct {
        Some(true) => "review-option correct",
        Some(false) if picked => "review-option incorrect",
        _ if picked => "review-option picked",
        _ => "review-option",
    }
}

#[component]
pub fn ResultsView(quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();

    let resource = {
        let api = ctx.api();
        let quiz_id = quiz_id.clone();
        use_resource(move || {
            let api = api.clone();
            let id = QuizId::new(quiz_id.clone());
            async move {
                use services::QuizBackend;
                let payload = api
                    .fetch_quiz(&id)
                    .await
                    .map_err(|e| view_error_from_api(&e))?;
                payload.validate().map_err(|_| ViewError::Invalid)
            }
        })
    };
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading results..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        h2 { "Results unavailable" }
                        p { "{err.message()}" }
                        Link { to: Route::Dashboard {}, "Back to dashboard" }
                    }
                },
                ViewState::Ready(quiz) => {
                    if quiz.is_completed {
                        let score = quiz.score.unwrap_or(0.0);
                        let color = ring_color(score);
                        let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
                        let offset = ring_offset(score);
                        rsx! {
                            header { class: "results-header",
                                h2 { "{quiz.title}" }
                                span { "{quiz.subject}" }
                            }

                            section { class: "score-panel",
                                svg {
                                    class: "score-ring",
                                    view_box: "0 0 120 120",
                                    circle {
                                        cx: "60",
                                        cy: "60",
                                        r: "{RING_RADIUS}",
                                        class: "ring-track",
                                    }
                                    circle {
                                        cx: "60",
                                        cy: "60",
                                        r: "{RING_RADIUS}",
                                        class: "ring-value",
                                        stroke: "{color}",
                                        stroke_dasharray: "{circumference}",
                                        stroke_dashoffset: "{offset}",
                                    }
                                    text {
                                        x: "60",
                                        y: "66",
                                        text_anchor: "middle",
                                        class: "ring-label",
                                        "{score:.0}%"
                                    }
                                }
                                dl { class: "score-facts",
                                    if let Some(secs) = quiz.completion_time {
                                        dt { "Time" }
                                        dd { "{format_clock(secs)}" }
                                    }
                                    dt { "Questions" }
                                    dd { "{quiz.question_count()}" }
                                    dt { "Attempts" }
                                    dd { "{quiz.attempts}" }
                                }
                            }

                            section { class: "review",
                                h3 { "Review" }
                                for question in quiz.questions.iter() {
                                    div { class: "review-question", key: "{question.id}",
                                        h4 { "{question.text}" }
                                        ul {
                                            for (index, option) in question.options.iter().enumerate() {
                                                li {
                                                    class: review_option_class(question, &quiz, index),
                                                    "{option.text}"
                                                }
                                            }
                                        }
                                        if let Some(explanation) = question.explanation.as_deref() {
                                            p { class: "explanation", "{explanation}" }
                                        }
                                    }
                                }
                            }

                            footer { class: "results-actions",
                                Link {
                                    class: "primary",
                                    to: Route::TakeQuiz { quiz_id: quiz_id.clone(), retake: true },
                                    "Retake quiz"
                                }
                                Link { to: Route::Dashboard {}, "Back to dashboard" }
                            }
                        }
                    } else {
                        rsx! {
                            div { class: "error-panel",
                                h2 { "Not completed yet" }
                                p { "Take the quiz first to see results." }
                                Link {
                                    class: "primary",
                                    to: Route::TakeQuiz { quiz_id: quiz_id.clone(), retake: false },
                                    "Take quiz"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_color_follows_score_bands() {
        assert_eq!(ring_color(92.0), "#22c55e");
        assert_eq!(ring_color(70.0), "#22c55e");
        assert_eq!(ring_color(55.0), "#f59e0b");
        assert_eq!(ring_color(40.0), "#f59e0b");
        assert_eq!(ring_color(12.0), "#ef4444");
    }

    #[test]
    fn ring_offset_is_empty_at_zero_and_full_at_hundred() {
        let circumference = 2.0 * std::f64::consts::PI * RING_RADIUS;
        assert!((ring_offset(0.0) - circumference).abs() < 1e-9);
        assert!(ring_offset(100.0).abs() < 1e-9);
        // Out-of-range scores clamp instead of overdrawing.
        assert!(ring_offset(130.0).abs() < 1e-9);
    }
}
