use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::UserProfile;
use services::AuthError;

use crate::context::AppContext;
use crate::routes::Route;

/// What the saved-session check decided.
enum SessionRestore {
    SignedIn,
    NeedsLogin,
    Failed(String),
}

fn classify_restore(result: Result<Option<UserProfile>, AuthError>) -> SessionRestore {
    match result {
        Ok(Some(_)) => SessionRestore::SignedIn,
        Ok(None) => SessionRestore::NeedsLogin,
        Err(err) => SessionRestore::Failed(err.to_string()),
    }
}

#[component]
pub fn LoginView() -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let mut name = use_signal(String::new);
    let mut email = use_signal(String::new);
    let mut password = use_signal(String::new);
    let mut register_mode = use_signal(|| false);
    let error = use_signal(|| None::<String>);
    let busy = use_signal(|| false);

    // Pick up a persisted session before asking for credentials.
    let restoring = {
        let auth = ctx.auth();
        use_resource(move || {
            let auth = auth.clone();
            let mut error = error;
            async move {
                match classify_restore(auth.restore().await) {
                    SessionRestore::SignedIn => {
                        navigator.replace(Route::Dashboard {});
                        true
                    }
                    SessionRestore::NeedsLogin => false,
                    SessionRestore::Failed(message) => {
                        // A broken store or backend is worth a banner; the
                        // form still works for a fresh sign-in.
                        error.set(Some(message));
                        false
                    }
                }
            }
        })
    };
    let checking_session = !matches!(restoring.value().read().as_ref(), Some(false));

    let submit = {
        let auth = ctx.auth();
        use_callback(move |(): ()| {
            if busy() {
                return;
            }
            let auth = auth.clone();
            let mut error = error;
            let mut busy = busy;
            spawn(async move {
                busy.set(true);
                error.set(None);
                let result = if register_mode() {
                    auth.register(&name(), &email(), &password()).await
                } else {
                    auth.login(&email(), &password()).await
                };
                busy.set(false);
                match result {
                    Ok(_user) => {
                        navigator.replace(Route::Dashboard {});
                    }
                    Err(err) => error.set(Some(err.to_string())),
                }
            });
        })
    };

    let is_busy = busy();
    let error_message = error();

    rsx! {
        div { class: "page login",
            h2 { if register_mode() { "Create account" } else { "Sign in" } }
            if checking_session {
                p { class: "loading", "Checking saved session..." }
            } else {
                div { class: "login-form",
                    if register_mode() {
                        label { "Name"
                            input {
                                value: "{name}",
                                oninput: move |evt| name.set(evt.value()),
                            }
                        }
                    }
                    label { "Email"
                        input {
                            r#type: "email",
                            value: "{email}",
                            oninput: move |evt| email.set(evt.value()),
                        }
                    }
                    label { "Password"
                        input {
                            r#type: "password",
                            value: "{password}",
                            oninput: move |evt| password.set(evt.value()),
                        }
                    }
                    if let Some(message) = error_message {
                        div { class: "banner error", "{message}" }
                    }
                    button {
                        class: "primary",
                        disabled: is_busy,
                        onclick: move |_| submit.call(()),
                        if is_busy {
                            "Please wait..."
                        } else if register_mode() {
                            "Register"
                        } else {
                            "Sign in"
                        }
                    }
                    button {
                        class: "link-button",
                        onclick: move |_| {
                            let current = register_mode();
                            register_mode.set(!current);
                        },
                        if register_mode() {
                            "Have an account? Sign in"
                        } else {
                            "New here? Create an account"
                        }
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use services::ApiError;

    use super::*;

    fn profile() -> UserProfile {
        UserProfile {
            id: "user-1".into(),
            name: "Alice".into(),
            email: "alice@example.com".into(),
            quizzes_taken: 0,
            average_score: 0.0,
            total_score: 0.0,
            average_completion_time: None,
        }
    }

    #[test]
    fn saved_session_goes_to_the_dashboard() {
        assert!(matches!(
            classify_restore(Ok(Some(profile()))),
            SessionRestore::SignedIn
        ));
    }

    #[test]
    fn no_saved_session_shows_the_form() {
        assert!(matches!(
            classify_restore(Ok(None)),
            SessionRestore::NeedsLogin
        ));
    }

    #[test]
    fn restore_failure_surfaces_its_message() {
        let outcome = classify_restore(Err(AuthError::Api(ApiError::NotFound)));
        match outcome {
            SessionRestore::Failed(message) => assert_eq!(message, "not found"),
            _ => panic!("failure must not be swallowed"),
        }
    }
}
