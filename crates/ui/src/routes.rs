use dioxus::prelude::*;
use dioxus_router::{Link, Outlet, Routable, use_navigator};

use crate::context::AppContext;
use crate::views::{
    DashboardView, EditQuizView, LeaderboardView, LoginView, ResultsView, TakeQuizView,
};

#[derive(Clone, Routable, PartialEq)]
#[rustfmt::skip]
pub enum Route {
    #[route("/login", LoginView)] Login {},
    #[layout(Layout)]
        #[route("/", DashboardView)] Dashboard {},
        #[route("/quiz/:quiz_id?:retake", TakeQuizView)] TakeQuiz { quiz_id: String, retake: bool },
        #[route("/quiz/:quiz_id/edit", EditQuizView)] EditQuiz { quiz_id: String },
        #[route("/results/:quiz_id", ResultsView)] Results { quiz_id: String },
        #[route("/leaderboard", LeaderboardView)] Leaderboard {},
}

#[component]
fn Layout() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    // No session, no guarded screens.
    use_effect(move || {
        if !ctx.auth().is_signed_in() {
            navigator.replace(Route::Login {});
        }
    });

    rsx! {
        div { class: "app",
            Navbar {}
            main { class: "content",
                Outlet::<Route> {}
            }
        }
    }
}

#[component]
fn Navbar() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let sign_out = use_callback(move |(): ()| {
        let auth = ctx.auth();
        spawn(async move {
            // A failed store cleanup still drops the runtime token.
            let _ = auth.logout().await;
            navigator.push(Route::Login {});
        });
    });

    rsx! {
        nav { class: "navbar",
            h1 { "QuizDash" }
            ul {
                li { Link { to: Route::Dashboard {}, "Dashboard" } }
                li { Link { to: Route::Leaderboard {}, "Leaderboard" } }
            }
            button {
                class: "link-button",
                onclick: move |_| sign_out.call(()),
                "Sign out"
            }
        }
    }
}
