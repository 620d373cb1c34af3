use dioxus::prelude::*;

use services::{ApiError, TakeQuizError};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ViewError {
    NotFound,
    Unauthorized,
    Network,
    Invalid,
    Unknown,
}

impl ViewError {
    #[must_use]
    pub fn message(self) -> &'static str {
        match self {
            ViewError::NotFound => "Quiz not found.",
            ViewError::Unauthorized => "Please sign in again.",
            ViewError::Network => "Could not reach the server. Check your connection and retry.",
            ViewError::Invalid => "This quiz cannot be displayed.",
            ViewError::Unknown => "Something went wrong. Please try again.",
        }
    }

    /// Fatal errors end the screen's flow instead of inviting a retry.
    #[must_use]
    pub fn is_fatal(self) -> bool {
        matches!(self, ViewError::NotFound | ViewError::Invalid)
    }
}

#[must_use]
pub fn view_error_from_api(err: &ApiError) -> ViewError {
    match err {
        ApiError::NotFound => ViewError::NotFound,
        ApiError::Unauthorized => ViewError::Unauthorized,
        ApiError::Network(_) => ViewError::Network,
        _ => ViewError::Unknown,
    }
}

#[must_use]
pub fn view_error_from_take(err: &TakeQuizError) -> ViewError {
    match err {
        TakeQuizError::InvalidQuiz(_) => ViewError::Invalid,
        TakeQuizError::Api(api) => view_error_from_api(api),
        _ => ViewError::Unknown,
    }
}

#[derive(Clone, Debug, PartialEq)]
pub enum ViewState<T> {
    Idle,
    Loading,
    Ready(T),
    Error(ViewError),
}

#[must_use]
pub fn view_state_from_resource<T: Clone>(
    resource: Resource<Result<T, ViewError>>,
) -> ViewState<T> {
    match resource.state().cloned() {
        UseResourceState::Pending => ViewState::Loading,
        UseResourceState::Ready => match resource.value().read().as_ref() {
            Some(Ok(data)) => ViewState::Ready(data.clone()),
            Some(Err(err)) => ViewState::Error(*err),
            None => ViewState::Error(ViewError::Unknown),
        },
        UseResourceState::Paused | UseResourceState::Stopped => ViewState::Idle,
    }
}
