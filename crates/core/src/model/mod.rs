mod ids;
mod quiz;
mod session;
mod user;

pub use ids::{OptionId, QuestionId, QuizId};
pub use quiz::{
    OptionPayload, QuestionPayload, Quiz, QuizOption, QuizPayload, QuizQuestion,
    QuizValidationError,
};
pub use session::{TakeProgress, TakeSession, TakeSessionError};
pub use user::{LeaderboardEntry, UserProfile, UserStats};
