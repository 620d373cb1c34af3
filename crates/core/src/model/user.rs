use serde::{Deserialize, Serialize};

/// The signed-in user as the backend describes them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(rename = "_id")]
    pub id: String,
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub quizzes_taken: u32,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_completion_time: Option<u32>,
}

/// Aggregate stats for the profile screen.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserStats {
    #[serde(default)]
    pub quizzes_taken: u32,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub quizzes_created: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub average_completion_time: Option<u32>,
}

/// One row of the leaderboard, already ranked and aggregated server-side.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LeaderboardEntry {
    #[serde(rename = "_id", default)]
    pub id: String,
    pub user_name: String,
    #[serde(default)]
    pub quiz_count: u32,
    #[serde(default)]
    pub total_score: f64,
    #[serde(default)]
    pub average_score: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avg_completion_time: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub rank: Option<u32>,
}
