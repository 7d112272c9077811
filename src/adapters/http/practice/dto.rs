//! HTTP DTOs for the skill practice endpoints.

use serde::{Deserialize, Serialize};

use crate::application::{PracticeFeedback, PracticeProgressReport, PracticeSessionDetail, StartedPractice};
use crate::domain::foundation::{ChatId, SessionId, Timestamp};
use crate::domain::practice::{
    BlockOverview, FeedbackSource, PracticeAnswer, PracticeSession, PracticeSkill, SessionStatus,
    SkillProgress,
};

// ════════════════════════════════════════════════════════════════════════════
// Request DTOs
// ════════════════════════════════════════════════════════════════════════════

/// Body of `POST /skills/generate-situation`.
#[derive(Debug, Clone, Deserialize)]
pub struct GenerateSituationRequest {
    pub chat_id: ChatId,
    pub block_id: String,
    pub skill_id: String,
    #[serde(default)]
    pub situation_index: Option<usize>,
}

/// Body of `POST /skills/submit-answer`.
#[derive(Debug, Clone, Deserialize)]
pub struct SubmitAnswerRequest {
    pub chat_id: ChatId,
    pub session_id: SessionId,
    pub answer: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SessionsParams {
    #[serde(default)]
    pub block_id: Option<String>,
    #[serde(default)]
    pub skill_id: Option<String>,
}

// ════════════════════════════════════════════════════════════════════════════
// Response DTOs
// ════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Clone, Serialize)]
pub struct BlocksResponse {
    pub blocks: Vec<BlockOverview>,
}

/// Skill without its theory and prepared situations.
#[derive(Debug, Clone, Serialize)]
pub struct SkillSummary {
    pub id: String,
    pub name: String,
    pub description: String,
}

impl From<&PracticeSkill> for SkillSummary {
    fn from(skill: &PracticeSkill) -> Self {
        Self {
            id: skill.id.clone(),
            name: skill.name.clone(),
            description: skill.description.clone(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SituationResponse {
    pub session_id: SessionId,
    pub situation: String,
    pub skill: SkillSummary,
}

impl From<StartedPractice> for SituationResponse {
    fn from(started: StartedPractice) -> Self {
        Self {
            session_id: started.session.id,
            situation: started.session.situation,
            skill: SkillSummary::from(&started.skill),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct FeedbackResponse {
    pub session_id: SessionId,
    pub feedback: String,
    pub score: u8,
    pub source: FeedbackSource,
    pub status: SessionStatus,
}

impl From<PracticeFeedback> for FeedbackResponse {
    fn from(result: PracticeFeedback) -> Self {
        Self {
            session_id: result.session_id,
            feedback: result.feedback,
            score: result.score,
            source: result.source,
            status: result.status,
        }
    }
}

/// A session without its answers.
#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub id: SessionId,
    pub block_id: String,
    pub skill_id: String,
    pub situation: String,
    pub status: SessionStatus,
    pub created_at: Timestamp,
    pub completed_at: Option<Timestamp>,
    pub answer_count: usize,
    pub best_score: Option<u8>,
}

impl From<&PracticeSession> for SessionSummary {
    fn from(session: &PracticeSession) -> Self {
        Self {
            id: session.id,
            block_id: session.block_id.clone(),
            skill_id: session.skill_id.clone(),
            situation: session.situation.clone(),
            status: session.status,
            created_at: session.created_at,
            completed_at: session.completed_at,
            answer_count: session.answers.len(),
            best_score: session.best_score(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct ProgressResponse {
    pub chat_id: ChatId,
    pub progress: Vec<SkillProgress>,
    pub recent_sessions: Vec<SessionSummary>,
}

impl From<PracticeProgressReport> for ProgressResponse {
    fn from(report: PracticeProgressReport) -> Self {
        Self {
            chat_id: report.chat_id,
            progress: report.progress,
            recent_sessions: report.recent_sessions.iter().map(SessionSummary::from).collect(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionsResponse {
    pub sessions: Vec<SessionSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionDetailResponse {
    pub session: SessionSummary,
    pub answers: Vec<PracticeAnswer>,
    pub skill: Option<SkillSummary>,
}

impl From<PracticeSessionDetail> for SessionDetailResponse {
    fn from(detail: PracticeSessionDetail) -> Self {
        Self {
            session: SessionSummary::from(&detail.session),
            skill: detail.skill.as_ref().map(SkillSummary::from),
            answers: detail.session.answers,
        }
    }
}
