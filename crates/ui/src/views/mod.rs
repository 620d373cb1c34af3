mod dashboard;
mod edit_quiz;
mod leaderboard;
mod login;
mod results;
mod state;
mod take_quiz;

pub use dashboard::DashboardView;
pub use edit_quiz::EditQuizView;
pub use leaderboard::LeaderboardView;
pub use login::LoginView;
pub use results::ResultsView;
pub use state::{
    ViewError, ViewState, view_error_from_api, view_error_from_take, view_state_from_resource,
};
pub use take_quiz::TakeQuizView;
