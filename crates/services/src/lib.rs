#![forbid(unsafe_code)]

pub mod api_client;
pub mod auth;
pub mod backend;
pub mod error;
pub mod paging;
pub mod take_quiz;

pub use quiz_core::Clock;

pub use api_client::{
    ApiClient, AuthSuccess, OptionUpdate, QuestionUpdate, QuizSpec, QuizUpdate, TokenSlot,
    UnauthorizedHandler,
};
pub use auth::AuthService;
pub use backend::{QuizBackend, SubmitRequest, SubmitResponse};
pub use error::{ApiError, AuthError, TakeQuizError};
pub use paging::{page_count, page_slice};
pub use take_quiz::{FinishOutcome, StartOutcome, SubmissionResult, TakeQuizService};
