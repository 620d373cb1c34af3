use dioxus::document::eval;
use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::QuizId;
use services::StartOutcome;

use super::scripts::take_timer_script;
use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_error_from_take, view_state_from_resource};
use crate::vm::{TakeIntent, TakeOutcome, TakeQuizVm};

/// One option row, extracted from the view model for rendering.
struct OptionRow {
    index: usize,
    text: String,
    class: &'static str,
}

#[component]
pub fn TakeQuizView(quiz_id: String, retake: bool) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let vm = use_signal(|| None::<TakeQuizVm>);
    let banner = use_signal(|| None::<ViewError>);
    let submitting = use_signal(|| false);

    let resource = {
        let service = ctx.take_quiz();
        let quiz_id = quiz_id.clone();
        use_resource(move || {
            let service = service.clone();
            let id = QuizId::new(quiz_id.clone());
            let mut vm = vm;
            let mut banner = banner;
            async move {
                banner.set(None);
                match service.start(&id, retake).await {
                    Ok(StartOutcome::Started(session)) => {
                        vm.set(Some(TakeQuizVm::new(session)));
                        Ok(())
                    }
                    Ok(StartOutcome::AlreadyCompleted(quiz)) => {
                        // Completed and not a retake: results are the right screen.
                        navigator.replace(Route::Results {
                            quiz_id: quiz.id.as_str().to_owned(),
                        });
                        Ok(())
                    }
                    Err(err) => Err(view_error_from_take(&err)),
                }
            }
        })
    };
    let state = view_state_from_resource(resource);

    let dispatch = {
        let service = ctx.take_quiz();
        use_callback(move |intent: TakeIntent| {
            let mut vm = vm;
            let mut banner = banner;
            let mut submitting = submitting;

            match intent {
                TakeIntent::Select(index) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.select(index);
                    }
                }
                TakeIntent::Next => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.next();
                    }
                }
                TakeIntent::Previous => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.previous();
                    }
                }
                TakeIntent::Finish => {
                    if submitting() {
                        return;
                    }
                    let service = service.clone();
                    spawn(async move {
                        submitting.set(true);
                        banner.set(None);

                        let local_vm = vm.write().take();
                        let Some(mut vm_value) = local_vm else {
                            submitting.set(false);
                            return;
                        };

                        let result = vm_value.finish(&service, retake).await;

                        // Always put the session back so the UI remains usable
                        // even after errors.
                        *vm.write() = Some(vm_value);
                        submitting.set(false);

                        match result {
                            Ok(TakeOutcome::Completed { quiz_id }) => {
                                navigator.replace(Route::Results { quiz_id });
                            }
                            Ok(TakeOutcome::Continue) => {}
                            Err(err) => banner.set(Some(err)),
                        }
                    });
                }
            }
        })
    };

    // Snapshot the view model for rendering.
    let snapshot = vm.read().as_ref().map(|vm| {
        let options: Vec<OptionRow> = vm
            .options()
            .iter()
            .enumerate()
            .map(|(index, option)| OptionRow {
                index,
                text: option.text.clone(),
                class: vm.option_class(index),
            })
            .collect();
        (
            vm.title().to_owned(),
            vm.progress_label(),
            vm.answered_label(),
            vm.question_text().to_owned(),
            options,
            vm.explanation().map(str::to_owned),
            vm.is_revealed(),
            vm.can_previous(),
            vm.can_next(),
            vm.can_finish(),
            vm.is_last_question(),
            vm.started_at_millis(),
        )
    });

    let timer_key = format!("{quiz_id}:{retake}");
    use_effect(move || {
        let (start_ms, active) = match vm.read().as_ref() {
            Some(vm) => (vm.started_at_millis(), true),
            None => (0, false),
        };
        let _ = eval(&take_timer_script(&timer_key, start_ms, active));
    });

    let banner_error = banner();
    let is_submitting = submitting();

    rsx! {
        div { class: "page", id: "take-root",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading quiz..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        h2 { "Cannot take this quiz" }
                        p { "{err.message()}" }
                        button {
                            onclick: move |_| { navigator.push(Route::Dashboard {}); },
                            "Back to dashboard"
                        }
                    }
                },
                ViewState::Ready(()) => {
                    if let Some((
                        title,
                        progress_label,
                        answered_label,
                        question_text,
                        options,
                        explanation,
                        revealed,
                        can_previous,
                        can_next,
                        can_finish,
                        is_last,
                        _start_ms,
                    )) = snapshot
                    {
                        rsx! {
                            header { class: "take-header",
                                h2 { "{title}" }
                                span { class: "timer", id: "take-timer-label", "0:00" }
                            }
                            div { class: "take-progress",
                                span { "{progress_label}" }
                                span { "{answered_label}" }
                            }
                            section { class: "question",
                                h3 { "{question_text}" }
                                div { class: "options",
                                    for row in options {
                                        button {
                                            key: "{row.index}",
                                            class: "{row.class}",
                                            disabled: revealed || is_submitting,
                                            onclick: move |_| dispatch.call(TakeIntent::Select(row.index)),
                                            "{row.text}"
                                        }
                                    }
                                }
                                if let Some(explanation) = explanation {
                                    p { class: "explanation", "{explanation}" }
                                }
                            }
                            if let Some(err) = banner_error {
                                div { class: "banner error", "{err.message()}" }
                            }
                            footer { class: "take-actions",
                                button {
                                    disabled: !can_previous || is_submitting,
                                    onclick: move |_| dispatch.call(TakeIntent::Previous),
                                    "Previous"
                                }
                                if is_last {
                                    button {
                                        class: "primary",
                                        disabled: !can_finish || is_submitting,
                                        onclick: move |_| dispatch.call(TakeIntent::Finish),
                                        if is_submitting { "Submitting..." } else { "Finish quiz" }
                                    }
                                } else {
                                    button {
                                        class: "primary",
                                        disabled: !can_next || is_submitting,
                                        onclick: move |_| dispatch.call(TakeIntent::Next),
                                        "Next"
                                    }
                                }
                            }
                        }
                    } else {
                        rsx! {
                            p { class: "loading", "Loading quiz..." }
                        }
                    }
                }
            }
        }
    }
}
