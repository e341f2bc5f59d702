//! Learner-side state: per-unit mastery, history and the avatar read model

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use super::{StateId, UnitId};

/// How well the learner knows a unit
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum KnowledgeStatus {
    #[default]
    Unknown,
    Learning,
    Learned,
    Mastered,
    /// User override: hidden from prompts but kept in quizzes
    Muted,
    /// User override: excluded from quizzes
    Ignored,
}

impl KnowledgeStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            KnowledgeStatus::Unknown => "unknown",
            KnowledgeStatus::Learning => "learning",
            KnowledgeStatus::Learned => "learned",
            KnowledgeStatus::Mastered => "mastered",
            KnowledgeStatus::Muted => "muted",
            KnowledgeStatus::Ignored => "ignored",
        }
    }

    /// Whether the status is a user override outside the automatic graph
    pub fn is_override(&self) -> bool {
        matches!(self, KnowledgeStatus::Muted | KnowledgeStatus::Ignored)
    }
}

impl fmt::Display for KnowledgeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Learning events that drive the automatic state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LearningAction {
    Read,
    TestedSuccess,
    TestedFail,
    Explained,
    Mastered,
}

impl LearningAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            LearningAction::Read => "read",
            LearningAction::TestedSuccess => "tested_success",
            LearningAction::TestedFail => "tested_fail",
            LearningAction::Explained => "explained",
            LearningAction::Mastered => "mastered",
        }
    }

    /// Quiz outcome as an action
    pub fn from_quiz(correct: bool) -> Self {
        if correct {
            LearningAction::TestedSuccess
        } else {
            LearningAction::TestedFail
        }
    }
}

impl fmt::Display for LearningAction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for LearningAction {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('-', "_").as_str() {
            "read" => Ok(LearningAction::Read),
            "tested_success" => Ok(LearningAction::TestedSuccess),
            "tested_fail" => Ok(LearningAction::TestedFail),
            "explained" => Ok(LearningAction::Explained),
            "mastered" => Ok(LearningAction::Mastered),
            other => Err(format!("unknown learning action: {}", other)),
        }
    }
}

/// Everything that can appear in a state's history
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HistoryAction {
    Read,
    TestedSuccess,
    TestedFail,
    Explained,
    Mastered,
    Muted,
    Ignored,
    Restored,
}

impl From<LearningAction> for HistoryAction {
    fn from(action: LearningAction) -> Self {
        match action {
            LearningAction::Read => HistoryAction::Read,
            LearningAction::TestedSuccess => HistoryAction::TestedSuccess,
            LearningAction::TestedFail => HistoryAction::TestedFail,
            LearningAction::Explained => HistoryAction::Explained,
            LearningAction::Mastered => HistoryAction::Mastered,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub action: HistoryAction,
    pub timestamp: DateTime<Utc>,
}

/// Learner's state for exactly one knowledge unit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserKnowledgeState {
    pub id: StateId,
    pub unit_id: UnitId,
    #[serde(default)]
    pub status: KnowledgeStatus,
    /// Mastery estimate in [0, 1]
    #[serde(default)]
    pub level: f64,
    /// Append-only audit log
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    pub last_updated: DateTime<Utc>,
    /// Status in force before a mute/ignore override
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub prior_status: Option<KnowledgeStatus>,
}

impl UserKnowledgeState {
    /// Fresh `unknown/0` state with a single `read` history entry
    pub fn initial(id: StateId, unit_id: UnitId, at: DateTime<Utc>) -> Self {
        Self {
            id,
            unit_id,
            status: KnowledgeStatus::Unknown,
            level: 0.0,
            history: vec![HistoryEntry {
                action: HistoryAction::Read,
                timestamp: at,
            }],
            last_updated: at,
            prior_status: None,
        }
    }

    /// Append to history and bump `last_updated`
    pub fn record(&mut self, action: HistoryAction, at: DateTime<Utc>) {
        self.history.push(HistoryEntry {
            action,
            timestamp: at,
        });
        self.last_updated = at;
    }
}

/// Aggregate learner profile, derived on demand
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct AvatarStats {
    pub total_units: usize,
    pub mastered_units: usize,
    /// Mean level over all states, in [0, 1]
    pub average_level: f64,
}

impl AvatarStats {
    pub fn from_states<'a>(
        total_units: usize,
        states: impl IntoIterator<Item = &'a UserKnowledgeState>,
    ) -> Self {
        let mut count = 0usize;
        let mut mastered = 0usize;
        let mut sum = 0.0f64;
        for state in states {
            count += 1;
            sum += state.level;
            if state.status == KnowledgeStatus::Mastered {
                mastered += 1;
            }
        }

        Self {
            total_units,
            mastered_units: mastered,
            average_level: if count == 0 { 0.0 } else { sum / count as f64 },
        }
    }
}
