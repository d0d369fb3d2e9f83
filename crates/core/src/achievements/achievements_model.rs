//! Achievement domain models.

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

pub const METRIC_CHECKINS_TOTAL: &str = "CHECKINS_TOTAL";
pub const METRIC_QUIZZES_TOTAL: &str = "QUIZZES_TOTAL";
pub const METRIC_AI_CONVERSATIONS_TOTAL: &str = "AI_CONVERSATIONS_TOTAL";
pub const METRIC_QUIZ_SCORE: &str = "QUIZ_SCORE";
pub const METRIC_REGISTERED: &str = "REGISTERED";
pub const METRIC_FIRST_LOGIN: &str = "FIRST_LOGIN";

/// A measurable condition source for achievement requirements.
///
/// Cumulative metrics are maintained as incremental per-user counters;
/// `QuizScore` is a single-event threshold evaluated only against the
/// triggering action's payload; `Registered` and `FirstLogin` are one-shot
/// flags.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Metric {
    // Rename-all would split this into CHECK_INS_TOTAL; the catalog JSON
    // and the counter store both use the unsplit form.
    #[serde(rename = "CHECKINS_TOTAL")]
    CheckInsTotal,
    QuizzesTotal,
    AiConversationsTotal,
    QuizScore,
    Registered,
    FirstLogin,
}

impl Metric {
    pub fn as_str(&self) -> &'static str {
        match self {
            Metric::CheckInsTotal => METRIC_CHECKINS_TOTAL,
            Metric::QuizzesTotal => METRIC_QUIZZES_TOTAL,
            Metric::AiConversationsTotal => METRIC_AI_CONVERSATIONS_TOTAL,
            Metric::QuizScore => METRIC_QUIZ_SCORE,
            Metric::Registered => METRIC_REGISTERED,
            Metric::FirstLogin => METRIC_FIRST_LOGIN,
        }
    }

    /// Whether the metric accumulates in the per-user counter store.
    /// `QuizScore` does not: it is read from the triggering event alone.
    pub fn is_cumulative(&self) -> bool {
        !matches!(self, Metric::QuizScore)
    }
}

impl FromStr for Metric {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            METRIC_CHECKINS_TOTAL => Ok(Metric::CheckInsTotal),
            METRIC_QUIZZES_TOTAL => Ok(Metric::QuizzesTotal),
            METRIC_AI_CONVERSATIONS_TOTAL => Ok(Metric::AiConversationsTotal),
            METRIC_QUIZ_SCORE => Ok(Metric::QuizScore),
            METRIC_REGISTERED => Ok(Metric::Registered),
            METRIC_FIRST_LOGIN => Ok(Metric::FirstLogin),
            _ => Err(format!("unknown metric: {}", s)),
        }
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Result payload of a completed quiz, reported by the quiz collaborator.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuizOutcome {
    pub score: i64,
    pub correct: i64,
    pub total: i64,
    pub time_spent_seconds: i64,
}

/// A qualifying action reported to the rule engine.
///
/// Closed set: collaborators cannot introduce new action kinds at runtime,
/// and the metric mapping below is checked exhaustively by the compiler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EngagementAction {
    Registration,
    FirstLogin,
    CheckInCreated,
    QuizCompleted(QuizOutcome),
    AiConversation,
}

impl EngagementAction {
    /// The requirement metrics this action can influence. Definitions whose
    /// requirements touch none of these are not candidates for the action.
    pub fn affected_metrics(&self) -> &'static [Metric] {
        match self {
            EngagementAction::Registration => &[Metric::Registered],
            EngagementAction::FirstLogin => &[Metric::FirstLogin],
            EngagementAction::CheckInCreated => &[Metric::CheckInsTotal],
            EngagementAction::QuizCompleted(_) => &[Metric::QuizzesTotal, Metric::QuizScore],
            EngagementAction::AiConversation => &[Metric::AiConversationsTotal],
        }
    }
}

/// A single condition of an achievement definition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Requirement {
    pub metric: Metric,
    pub target: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Epic,
    Legendary,
}

/// One entry of the static achievement catalog. All requirements must hold
/// simultaneously for the achievement to unlock.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementDefinition {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    pub category: String,
    pub icon: String,
    pub reward_points: i64,
    pub rarity: Rarity,
    pub requirements: Vec<Requirement>,
}

impl AchievementDefinition {
    /// Whether any requirement can be influenced by the given action.
    pub fn is_candidate_for(&self, action: &EngagementAction) -> bool {
        let affected = action.affected_metrics();
        self.requirements
            .iter()
            .any(|r| affected.contains(&r.metric))
    }
}

/// Monotonic unlock record: at most one per (user, achievement).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UnlockedAchievement {
    pub user_id: String,
    pub achievement_id: String,
    pub earned_at: DateTime<Utc>,
}

/// Outward listing entry: a catalog definition with the user's unlock state
/// and progress percentage.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AchievementProgress {
    pub definition: AchievementDefinition,
    pub unlocked: bool,
    pub earned_at: Option<DateTime<Utc>>,
    pub progress_percent: f64,
}
