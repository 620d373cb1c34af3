use dioxus::prelude::*;
use dioxus_router::Link;

use quiz_core::model::UserStats;
use services::QuizSpec;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewState, view_error_from_api, view_state_from_resource};

/// One quiz card on the dashboard, reduced to what the list renders.
#[derive(Clone, Debug, PartialEq)]
struct QuizCard {
    id: String,
    title: String,
    subject: String,
    question_count: usize,
    is_completed: bool,
    score: Option<f64>,
}

#[derive(Clone, Debug, PartialEq)]
struct DashboardData {
    stats: UserStats,
    quizzes: Vec<QuizCard>,
}

#[component]
pub fn DashboardView() -> Element {
    let ctx = use_context::<AppContext>();

    let mut subject = use_signal(String::new);
    let mut question_count = use_signal(|| String::from("5"));
    let generate_error = use_signal(|| None::<String>);
    let generating = use_signal(|| false);

    let mut resource = {
        let api = ctx.api();
        use_resource(move || {
            let api = api.clone();
            async move {
                let stats = api.user_stats().await.map_err(|e| view_error_from_api(&e))?;
                let payloads = api
                    .user_quizzes()
                    .await
                    .map_err(|e| view_error_from_api(&e))?;

                // Payloads the take screen would reject still show up in the
                // list; they just cannot be taken.
                let quizzes = payloads
                    .into_iter()
                    .filter_map(|payload| {
                        let id = payload.id.clone().filter(|id| !id.is_empty())?;
                        Some(QuizCard {
                            id,
                            title: payload.title.unwrap_or_else(|| "Untitled Quiz".into()),
                            subject: payload.subject.unwrap_or_else(|| "General".into()),
                            question_count: payload
                                .questions
                                .as_ref()
                                .map_or(0, Vec::len),
                            is_completed: payload.is_completed,
                            score: payload.score,
                        })
                    })
                    .collect();

                Ok(DashboardData { stats, quizzes })
            }
        })
    };
    let state = view_state_from_resource(resource);

    let generate = {
        let api = ctx.api();
        use_callback(move |(): ()| {
            if generating() {
                return;
            }
            let api = api.clone();
            let mut generate_error = generate_error;
            let mut generating = generating;
            spawn(async move {
                let subject_value = subject().trim().to_owned();
                if subject_value.is_empty() {
                    generate_error.set(Some("Enter a subject first.".into()));
                    return;
                }
                let Ok(num_questions) = question_count().trim().parse::<u32>() else {
                    generate_error.set(Some("Question count must be a number.".into()));
                    return;
                };

                generating.set(true);
                generate_error.set(None);
                let spec = QuizSpec {
                    subject: subject_value,
                    num_questions,
                    title: None,
                    description: None,
                    difficulty: None,
                };
                match api.generate_quiz(&spec).await {
                    Ok(_) => resource.restart(),
                    Err(err) => generate_error.set(Some(err.to_string())),
                }
                generating.set(false);
            });
        })
    };

    let is_generating = generating();
    let generate_message = generate_error();

    rsx! {
        div { class: "page",
            h2 { "Dashboard" }

            section { class: "generate",
                h3 { "New quiz" }
                input {
                    placeholder: "Subject, e.g. Rust lifetimes",
                    value: "{subject}",
                    oninput: move |evt| subject.set(evt.value()),
                }
                input {
                    class: "narrow",
                    value: "{question_count}",
                    oninput: move |evt| question_count.set(evt.value()),
                }
                button {
                    class: "primary",
                    disabled: is_generating,
                    onclick: move |_| generate.call(()),
                    if is_generating { "Generating..." } else { "Generate" }
                }
                if let Some(message) = generate_message {
                    div { class: "banner error", "{message}" }
                }
            }

            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading your quizzes..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        p { "{err.message()}" }
                        button { onclick: move |_| resource.restart(), "Retry" }
                    }
                },
                ViewState::Ready(data) => rsx! {
                    section { class: "stats",
                        div { class: "stat",
                            span { class: "stat-value", "{data.stats.quizzes_taken}" }
                            span { class: "stat-label", "Quizzes taken" }
                        }
                        div { class: "stat",
                            span { class: "stat-value", "{data.stats.average_score:.0}%" }
                            span { class: "stat-label", "Average score" }
                        }
                        div { class: "stat",
                            span { class: "stat-value", "{data.stats.quizzes_created}" }
                            span { class: "stat-label", "Quizzes created" }
                        }
                    }

                    section { class: "quiz-list",
                        h3 { "Your quizzes" }
                        if data.quizzes.is_empty() {
                            p { "No quizzes yet. Generate one above." }
                        }
                        for quiz in data.quizzes {
                            div { class: "quiz-card", key: "{quiz.id}",
                                div { class: "quiz-card-info",
                                    h4 { "{quiz.title}" }
                                    span { "{quiz.subject} · {quiz.question_count} questions" }
                                    if let Some(score) = quiz.score {
                                        span { class: "score", "Score: {score:.0}%" }
                                    }
                                }
                                div { class: "quiz-card-actions",
                                    Link {
                                        to: Route::EditQuiz { quiz_id: quiz.id.clone() },
                                        "Edit"
                                    }
                                    if quiz.is_completed {
                                        Link {
                                            to: Route::Results { quiz_id: quiz.id.clone() },
                                            "Results"
                                        }
                                        Link {
                                            to: Route::TakeQuiz { quiz_id: quiz.id.clone(), retake: true },
                                            "Retake"
                                        }
                                    } else {
                                        Link {
                                            to: Route::TakeQuiz { quiz_id: quiz.id.clone(), retake: false },
                                            "Take quiz"
                                        }
                                    }
                                }
                            }
                        }
                    }
                },
            }
        }
    }
}
