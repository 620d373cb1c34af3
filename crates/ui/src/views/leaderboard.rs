use dioxus::prelude::*;

use quiz_core::model::LeaderboardEntry;
use services::{page_count, page_slice};

use crate::context::AppContext;
use crate::views::{ViewState, view_error_from_api, view_state_from_resource};
use crate::vm::format_clock;

const PER_PAGE: usize = 10;

#[component]
pub fn LeaderboardView() -> Element {
    let ctx = use_context::<AppContext>();
    let mut page = use_signal(|| 0_usize);

    let mut resource = {
        let api = ctx.api();
        use_resource(move || {
            let api = api.clone();
            async move {
                api.leaderboard()
                    .await
                    .map_err(|e| view_error_from_api(&e))
            }
        })
    };
    let state = view_state_from_resource(resource);

    rsx! {
        div { class: "page",
            h2 { "Leaderboard" }
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading leaderboard..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        p { "{err.message()}" }
                        button { onclick: move |_| resource.restart(), "Retry" }
                    }
                },
                ViewState::Ready(entries) => {
                    let pages = page_count(entries.len(), PER_PAGE);
                    let current = page().min(pages - 1);
                    let rows: Vec<LeaderboardEntry> =
                        page_slice(&entries, current, PER_PAGE).to_vec();
                    rsx! {
                        table { class: "leaderboard",
                            thead {
                                tr {
                                    th { "#" }
                                    th { "Name" }
                                    th { "Quizzes" }
                                    th { "Avg score" }
                                    th { "Avg time" }
                                }
                            }
                            tbody {
                                for (offset, entry) in rows.iter().enumerate() {
                                    tr { key: "{entry.id}",
                                        td {
                                            match entry.rank {
                                                Some(rank) => rsx! { "{rank}" },
                                                None => rsx! { "{current * PER_PAGE + offset + 1}" },
                                            }
                                        }
                                        td { "{entry.user_name}" }
                                        td { "{entry.quiz_count}" }
                                        td { "{entry.average_score:.0}%" }
                                        td {
                                            match entry.avg_completion_time {
                                                Some(secs) => rsx! { "{format_clock(secs)}" },
                                                None => rsx! { "-" },
                                            }
                                        }
                                    }
                                }
                            }
                        }
                        if pages > 1 {
                            div { class: "pager",
                                button {
                                    disabled: current == 0,
                                    onclick: move |_| page.set(current.saturating_sub(1)),
                                    "Previous"
                                }
                                span { "Page {current + 1} of {pages}" }
                                button {
                                    disabled: current + 1 >= pages,
                                    onclick: move |_| page.set(current + 1),
                                    "Next"
                                }
                            }
                        }
                    }
                }
            }
        }
    }
}
