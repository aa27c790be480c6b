//! Challenge history payload and derived user statistics
//!
//! The backend owns history; the client only aggregates the payload it
//! receives from `GET /challenges/history` for the statistics panel.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::error::PrepperError;

/// How many challenges the "recent" list keeps
pub const RECENT_CHALLENGE_LIMIT: usize = 5;

/// Difficulty labels the breakdown tracks
pub const DIFFICULTY_LEVELS: [&str; 3] = ["Easy", "Medium", "Hard"];

/// Challenge flavour
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ChallengeKind {
    /// Multiple-choice questions
    Interview,
    /// Open-ended scenario questions
    Scenario,
}

impl FromStr for ChallengeKind {
    type Err = PrepperError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "interview" | "mcq" => Ok(ChallengeKind::Interview),
            "scenario" => Ok(ChallengeKind::Scenario),
            other => Err(PrepperError::UnknownChallengeKind(other.to_string())),
        }
    }
}

impl fmt::Display for ChallengeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ChallengeKind::Interview => write!(f, "interview"),
            ChallengeKind::Scenario => write!(f, "scenario"),
        }
    }
}

/// One entry of the history payload
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeSummary {
    pub id: i64,
    #[serde(rename = "type")]
    pub kind: ChallengeKind,
    pub topic: String,
    pub difficulty: String,
    #[serde(default)]
    pub title: Option<String>,
    #[serde(default)]
    pub date_created: Option<String>,
}

impl ChallengeSummary {
    /// Creation time, when the backend sent a parseable ISO timestamp
    pub fn created_at(&self) -> Option<NaiveDateTime> {
        let raw = self.date_created.as_deref()?;
        raw.parse::<NaiveDateTime>()
            .ok()
            .or_else(|| chrono::DateTime::parse_from_rfc3339(raw).ok().map(|d| d.naive_utc()))
    }
}

/// History payload, newest first
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChallengeHistory {
    #[serde(default)]
    pub challenges: Vec<ChallengeSummary>,
    #[serde(default)]
    pub total_count: u64,
    #[serde(default)]
    pub interview_count: u64,
    #[serde(default)]
    pub scenario_count: u64,
}

impl ChallengeHistory {
    /// Parse the JSON body returned by the backend
    pub fn from_json(body: &str) -> crate::Result<Self> {
        Ok(serde_json::from_str(body)?)
    }

    /// Only the challenges of one kind, with totals recounted
    pub fn of_kind(&self, kind: ChallengeKind) -> Self {
        let challenges: Vec<ChallengeSummary> = self
            .challenges
            .iter()
            .filter(|c| c.kind == kind)
            .cloned()
            .collect();
        let count = challenges.len() as u64;

        Self {
            challenges,
            total_count: count,
            interview_count: if kind == ChallengeKind::Interview { count } else { 0 },
            scenario_count: if kind == ChallengeKind::Scenario { count } else { 0 },
        }
    }
}

/// Aggregated statistics shown on the history panel
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct UserStats {
    pub total_challenges: u64,
    pub interview_challenges: u64,
    pub scenario_challenges: u64,
    pub recent_challenges: Vec<ChallengeSummary>,
    pub topic_breakdown: BTreeMap<String, u64>,
    pub difficulty_breakdown: BTreeMap<String, u64>,
}

impl UserStats {
    /// Aggregate a history payload
    ///
    /// Totals are taken from the payload as-is. Difficulties outside
    /// Easy/Medium/Hard are not counted.
    pub fn from_history(history: &ChallengeHistory) -> Self {
        let mut topic_breakdown = BTreeMap::new();
        let mut difficulty_breakdown: BTreeMap<String, u64> = DIFFICULTY_LEVELS
            .iter()
            .map(|level| (level.to_string(), 0))
            .collect();

        for challenge in &history.challenges {
            *topic_breakdown.entry(challenge.topic.clone()).or_insert(0) += 1;
            if let Some(count) = difficulty_breakdown.get_mut(&challenge.difficulty) {
                *count += 1;
            }
        }

        Self {
            total_challenges: history.total_count,
            interview_challenges: history.interview_count,
            scenario_challenges: history.scenario_count,
            recent_challenges: history
                .challenges
                .iter()
                .take(RECENT_CHALLENGE_LIMIT)
                .cloned()
                .collect(),
            topic_breakdown,
            difficulty_breakdown,
        }
    }

    /// Most practised topic (ties resolved alphabetically)
    pub fn top_topic(&self) -> Option<(&str, u64)> {
        self.topic_breakdown
            .iter()
            .max_by(|a, b| a.1.cmp(b.1).then_with(|| b.0.cmp(a.0)))
            .map(|(topic, count)| (topic.as_str(), *count))
    }
}
