//! SubmitPracticeAnswerHandler - Scores an answer and completes the session.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::{record, PracticeError};
use crate::application::ConversationLocks;
use crate::domain::foundation::{ChatId, SessionId};
use crate::domain::practice::{
    score_by_length, FeedbackSource, PracticeSession, PracticeSkill, ScoredFeedback,
    SessionStatus, SkillLibrary,
};
use crate::ports::{
    ContentGenerator, GenerationResult, LoggedMessage, MessageLog, PracticeSessionStorage, Speaker,
};

#[derive(Debug, Clone)]
pub struct SubmitPracticeAnswerCommand {
    pub chat_id: ChatId,
    pub session_id: SessionId,
    pub answer: String,
}

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeFeedback {
    pub session_id: SessionId,
    pub feedback: String,
    pub score: u8,
    pub source: FeedbackSource,
    pub status: SessionStatus,
}

pub struct SubmitPracticeAnswerHandler {
    library: Arc<SkillLibrary>,
    generator: Option<Arc<dyn ContentGenerator>>,
    sessions: Arc<dyn PracticeSessionStorage>,
    message_log: Arc<dyn MessageLog>,
    locks: ConversationLocks,
}

impl SubmitPracticeAnswerHandler {
    pub fn new(
        library: Arc<SkillLibrary>,
        generator: Option<Arc<dyn ContentGenerator>>,
        sessions: Arc<dyn PracticeSessionStorage>,
        message_log: Arc<dyn MessageLog>,
    ) -> Self {
        Self {
            library,
            generator,
            sessions,
            message_log,
            locks: ConversationLocks::new(),
        }
    }

    pub async fn handle(
        &self,
        cmd: SubmitPracticeAnswerCommand,
    ) -> Result<PracticeFeedback, PracticeError> {
        let _guard = self.locks.acquire(cmd.chat_id).await;

        let mut session = self
            .sessions
            .get(cmd.session_id)
            .await?
            .ok_or(PracticeError::SessionNotFound(cmd.session_id))?;
        if session.chat_id != cmd.chat_id {
            return Err(PracticeError::NotSessionOwner(cmd.session_id));
        }

        record(
            self.message_log.as_ref(),
            LoggedMessage::new(cmd.chat_id, Speaker::User, &cmd.answer, "skill_answer")
                .with_metadata(json!({ "session_id": session.id })),
        )
        .await;

        let (scored, source) = self.score(&session, &cmd.answer).await;
        session.record_answer(cmd.answer, scored.clone(), source);
        self.sessions.save(&session).await?;

        record(
            self.message_log.as_ref(),
            LoggedMessage::new(cmd.chat_id, Speaker::Assistant, &scored.feedback, "skill_feedback")
                .with_metadata(json!({ "session_id": session.id, "score": scored.score })),
        )
        .await;

        info!(
            chat_id = %cmd.chat_id,
            session_id = %session.id,
            score = scored.score,
            source = ?source,
            "Practice answer scored"
        );
        Ok(PracticeFeedback {
            session_id: session.id,
            feedback: scored.feedback,
            score: scored.score,
            source,
            status: session.status,
        })
    }

    /// Generated feedback when available and usable, else the length heuristic.
    async fn score(&self, session: &PracticeSession, answer: &str) -> (ScoredFeedback, FeedbackSource) {
        let heuristic = || (score_by_length(answer), FeedbackSource::Heuristic);
        let Some(generator) = &self.generator else {
            return heuristic();
        };

        // Sessions outlive library edits; score against a bare skill then.
        let skill = self
            .library
            .skill(&session.block_id, &session.skill_id)
            .cloned()
            .unwrap_or_else(|| PracticeSkill {
                id: session.skill_id.clone(),
                name: session.skill_id.clone(),
                description: String::new(),
                theory_doc: String::new(),
                situations: Vec::new(),
            });

        match generator
            .score_answer(session.chat_id, &skill, &session.situation, answer)
            .await
        {
            Ok(GenerationResult::Ok(mut items)) if !items.is_empty() => {
                (items.swap_remove(0), FeedbackSource::Generated)
            }
            Ok(other) => {
                warn!(chat_id = %session.chat_id, session_id = %session.id, result = other.kind(), "Scoring unusable, using length heuristic");
                heuristic()
            }
            Err(e) => {
                warn!(chat_id = %session.chat_id, session_id = %session.id, error = %e, "Scoring failed, using length heuristic");
                heuristic()
            }
        }
    }
}
