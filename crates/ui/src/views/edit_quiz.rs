use dioxus::prelude::*;
use dioxus_router::use_navigator;

use quiz_core::model::QuizId;

use crate::context::AppContext;
use crate::routes::Route;
use crate::views::{ViewError, ViewState, view_error_from_api, view_state_from_resource};
use crate::vm::EditQuizVm;

/// Edits to the form, routed through one callback like the take screen.
#[derive(Clone, Debug, PartialEq)]
enum EditIntent {
    SetTitle(String),
    SetSubject(String),
    SetDescription(String),
    SetQuestionText(usize, String),
    SetExplanation(usize, String),
    SetOptionText(usize, usize, String),
    MarkCorrect(usize, usize),
    Save,
}

struct OptionSnapshot {
    index: usize,
    text: String,
    is_correct: bool,
}

struct QuestionSnapshot {
    index: usize,
    number: usize,
    text: String,
    explanation: String,
    options: Vec<OptionSnapshot>,
}

#[component]
pub fn EditQuizView(quiz_id: String) -> Element {
    let ctx = use_context::<AppContext>();
    let navigator = use_navigator();

    let vm = use_signal(|| None::<EditQuizVm>);
    let banner = use_signal(|| None::<String>);
    let saving = use_signal(|| false);

    let resource = {
        let api = ctx.api();
        let quiz_id = quiz_id.clone();
        use_resource(move || {
            let api = api.clone();
            let id = QuizId::new(quiz_id.clone());
            let mut vm = vm;
            async move {
                use services::QuizBackend;
                let payload = api
                    .fetch_quiz(&id)
                    .await
                    .map_err(|e| view_error_from_api(&e))?;
                match EditQuizVm::from_payload(payload) {
                    Some(form) => {
                        vm.set(Some(form));
                        Ok(())
                    }
                    None => Err(ViewError::Invalid),
                }
            }
        })
    };
    let state = view_state_from_resource(resource);

    let dispatch = {
        let api = ctx.api();
        use_callback(move |intent: EditIntent| {
            let mut vm = vm;
            let mut banner = banner;
            let mut saving = saving;

            match intent {
                EditIntent::SetTitle(text) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.title = text;
                    }
                }
                EditIntent::SetSubject(text) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.subject = text;
                    }
                }
                EditIntent::SetDescription(text) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.description = text;
                    }
                }
                EditIntent::SetQuestionText(question, text) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.set_question_text(question, text);
                    }
                }
                EditIntent::SetExplanation(question, text) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.set_explanation(question, text);
                    }
                }
                EditIntent::SetOptionText(question, option, text) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.set_option_text(question, option, text);
                    }
                }
                EditIntent::MarkCorrect(question, option) => {
                    if let Some(vm) = vm.write().as_mut() {
                        vm.mark_correct(question, option);
                    }
                }
                EditIntent::Save => {
                    if saving() {
                        return;
                    }
                    let (problem, request) = match vm.read().as_ref() {
                        Some(vm) => (vm.first_problem(), Some((vm.quiz_id().to_owned(), vm.to_update()))),
                        None => (None, None),
                    };
                    if let Some(problem) = problem {
                        banner.set(Some(problem));
                        return;
                    }
                    let Some((quiz_id, update)) = request else {
                        return;
                    };

                    let api = api.clone();
                    spawn(async move {
                        saving.set(true);
                        banner.set(None);
                        match api.update_quiz(&QuizId::new(quiz_id.clone()), &update).await {
                            Ok(_) => {
                                navigator.replace(Route::TakeQuiz {
                                    quiz_id,
                                    retake: false,
                                });
                            }
                            Err(err) => banner.set(Some(err.to_string())),
                        }
                        saving.set(false);
                    });
                }
            }
        })
    };

    // Snapshot the form for rendering.
    let snapshot = vm.read().as_ref().map(|vm| {
        let questions: Vec<QuestionSnapshot> = vm
            .questions()
            .iter()
            .enumerate()
            .map(|(index, question)| QuestionSnapshot {
                index,
                number: index + 1,
                text: question.text.clone(),
                explanation: question.explanation.clone(),
                options: question
                    .options
                    .iter()
                    .enumerate()
                    .map(|(option_index, option)| OptionSnapshot {
                        index: option_index,
                        text: option.text.clone(),
                        is_correct: option.is_correct,
                    })
                    .collect(),
            })
            .collect();
        (
            vm.title.clone(),
            vm.subject.clone(),
            vm.description.clone(),
            questions,
        )
    });

    let banner_message = banner();
    let is_saving = saving();

    rsx! {
        div { class: "page",
            match state {
                ViewState::Idle | ViewState::Loading => rsx! {
                    p { class: "loading", "Loading quiz..." }
                },
                ViewState::Error(err) => rsx! {
                    div { class: "error-panel",
                        h2 { "Cannot edit this quiz" }
                        p { "{err.message()}" }
                        button {
                            onclick: move |_| { navigator.push(Route::Dashboard {}); },
                            "Back to dashboard"
                        }
                    }
                },
                ViewState::Ready(()) => {
                    if let Some((title, subject, description, questions)) = snapshot {
                        rsx! {
                            h2 { "Edit quiz" }

                            section { class: "edit-form",
                                label { "Title"
                                    input {
                                        value: "{title}",
                                        oninput: move |evt| dispatch.call(EditIntent::SetTitle(evt.value())),
                                    }
                                }
                                label { "Subject"
                                    input {
                                        value: "{subject}",
                                        oninput: move |evt| dispatch.call(EditIntent::SetSubject(evt.value())),
                                    }
                                }
                                label { "Description"
                                    textarea {
                                        value: "{description}",
                                        oninput: move |evt| dispatch.call(EditIntent::SetDescription(evt.value())),
                                    }
                                }
                            }

                            for question in questions {
                                section { class: "edit-question", key: "{question.index}",
                                    h3 { "Question {question.number}" }
                                    label { "Text"
                                        input {
                                            value: "{question.text}",
                                            oninput: move |evt| dispatch.call(
                                                EditIntent::SetQuestionText(question.index, evt.value()),
                                            ),
                                        }
                                    }
                                    div { class: "edit-options",
                                        for option in question.options {
                                            div { class: "edit-option", key: "{option.index}",
                                                input {
                                                    r#type: "radio",
                                                    name: "correct-{question.index}",
                                                    checked: option.is_correct,
                                                    onchange: move |_| dispatch.call(
                                                        EditIntent::MarkCorrect(question.index, option.index),
                                                    ),
                                                }
                                                input {
                                                    value: "{option.text}",
                                                    oninput: move |evt| dispatch.call(
                                                        EditIntent::SetOptionText(
                                                            question.index,
                                                            option.index,
                                                            evt.value(),
                                                        ),
                                                    ),
                                                }
                                            }
                                        }
                                    }
                                    span { class: "edit-hint", "Pick the radio button next to the correct answer" }
                                    label { "Explanation (optional)"
                                        textarea {
                                            value: "{question.explanation}",
                                            oninput: move |evt| dispatch.call(
                                                EditIntent::SetExplanation(question.index, evt.value()),
                                            ),
                                        }
                                    }
                                }
                            }

                            if let Some(message) = banner_message {
                                div { class: "banner error", "{message}" }
                            }
                            footer { class: "edit-actions",
                                button {
                                    onclick: move |_| { navigator.push(Route::Dashboard {}); },
                                    "Cancel"
                                }
                                button {
                                    class: "primary",
                                    disabled: is_saving,
                                    onclick: move |_| dispatch.call(EditIntent::Save),
                                    if is_saving { "Saving..." } else { "Save changes" }
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
