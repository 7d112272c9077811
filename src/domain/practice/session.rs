//! Practice sessions: one situation served to a chat and the answers given.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::scoring::ScoredFeedback;
use crate::domain::foundation::{ChatId, SessionId, Timestamp};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionStatus {
    Active,
    Completed,
}

/// Who scored an answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackSource {
    Generated,
    Heuristic,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeAnswer {
    pub answer: String,
    pub feedback: String,
    pub score: u8,
    pub source: FeedbackSource,
    pub created_at: Timestamp,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PracticeSession {
    pub id: SessionId,
    pub chat_id: ChatId,
    pub block_id: String,
    pub skill_id: String,
    pub situation: String,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    #[serde(default)]
    pub completed_at: Option<Timestamp>,
    #[serde(default)]
    pub answers: Vec<PracticeAnswer>,
}

impl PracticeSession {
    pub fn start(
        chat_id: ChatId,
        block_id: impl Into<String>,
        skill_id: impl Into<String>,
        situation: impl Into<String>,
    ) -> Self {
        Self {
            id: SessionId::new(),
            chat_id,
            block_id: block_id.into(),
            skill_id: skill_id.into(),
            situation: situation.into(),
            status: SessionStatus::Active,
            created_at: Timestamp::now(),
            completed_at: None,
            answers: Vec::new(),
        }
    }

    pub fn is_for(&self, block_id: &str, skill_id: &str) -> bool {
        self.block_id == block_id && self.skill_id == skill_id
    }

    /// Appends an answer and completes the session. Later answers are kept
    /// as retries of the same situation.
    pub fn record_answer(
        &mut self,
        answer: impl Into<String>,
        scored: ScoredFeedback,
        source: FeedbackSource,
    ) {
        let now = Timestamp::now();
        self.status = SessionStatus::Completed;
        self.completed_at = Some(now);
        self.answers.push(PracticeAnswer {
            answer: answer.into(),
            feedback: scored.feedback,
            score: scored.score,
            source,
            created_at: now,
        });
    }

    pub fn best_score(&self) -> Option<u8> {
        self.answers.iter().map(|a| a.score).max()
    }
}

/// Per-skill aggregate over a chat's sessions.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SkillProgress {
    pub block_id: String,
    pub skill_id: String,
    pub sessions: usize,
    pub completed: usize,
    /// Mean of each completed session's best score.
    pub average_score: Option<f32>,
    pub best_score: Option<u8>,
    pub last_practiced: Timestamp,
}

/// Aggregates sessions per skill, ordered by block and skill id.
pub fn summarize_progress(sessions: &[PracticeSession]) -> Vec<SkillProgress> {
    let mut by_skill: BTreeMap<(&str, &str), Vec<&PracticeSession>> = BTreeMap::new();
    for session in sessions {
        by_skill
            .entry((session.block_id.as_str(), session.skill_id.as_str()))
            .or_default()
            .push(session);
    }

    by_skill
        .into_iter()
        .filter_map(|((block_id, skill_id), group)| {
            let last_practiced = group.iter().map(|s| s.created_at).max()?;
            let bests: Vec<u8> = group.iter().filter_map(|s| s.best_score()).collect();
            let average_score = (!bests.is_empty())
                .then(|| bests.iter().map(|&b| b as f32).sum::<f32>() / bests.len() as f32);
            Some(SkillProgress {
                block_id: block_id.to_string(),
                skill_id: skill_id.to_string(),
                sessions: group.len(),
                completed: group
                    .iter()
                    .filter(|s| s.status == SessionStatus::Completed)
                    .count(),
                average_score,
                best_score: bests.iter().copied().max(),
                last_practiced,
            })
        })
        .collect()
}
