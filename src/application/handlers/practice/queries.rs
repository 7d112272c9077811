//! Read-only views over practice sessions.

use std::sync::Arc;

use super::PracticeError;
use crate::domain::foundation::{ChatId, SessionId};
use crate::domain::practice::{
    summarize_progress, PracticeSession, PracticeSkill, SkillLibrary, SkillProgress,
};
use crate::ports::{PracticeSessionStorage, StorageError};

/// Sessions listed next to the progress aggregate.
pub const RECENT_SESSIONS: usize = 10;

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeProgressReport {
    pub chat_id: ChatId,
    pub progress: Vec<SkillProgress>,
    /// Newest first.
    pub recent_sessions: Vec<PracticeSession>,
}

pub struct GetPracticeProgressHandler {
    sessions: Arc<dyn PracticeSessionStorage>,
}

impl GetPracticeProgressHandler {
    pub fn new(sessions: Arc<dyn PracticeSessionStorage>) -> Self {
        Self { sessions }
    }

    pub async fn handle(&self, chat_id: ChatId) -> Result<PracticeProgressReport, StorageError> {
        let mut sessions = self.sessions.list(chat_id).await?;
        let progress = summarize_progress(&sessions);
        sessions.truncate(RECENT_SESSIONS);
        Ok(PracticeProgressReport {
            chat_id,
            progress,
            recent_sessions: sessions,
        })
    }
}

#[derive(Debug, Clone)]
pub struct ListPracticeSessionsQuery {
    pub chat_id: ChatId,
    pub block_id: Option<String>,
    pub skill_id: Option<String>,
}

pub struct ListPracticeSessionsHandler {
    sessions: Arc<dyn PracticeSessionStorage>,
}

impl ListPracticeSessionsHandler {
    pub fn new(sessions: Arc<dyn PracticeSessionStorage>) -> Self {
        Self { sessions }
    }

    /// Newest first, narrowed by whichever filters are given.
    pub async fn handle(
        &self,
        query: ListPracticeSessionsQuery,
    ) -> Result<Vec<PracticeSession>, StorageError> {
        let mut sessions = self.sessions.list(query.chat_id).await?;
        sessions.retain(|s| {
            query.block_id.as_deref().map_or(true, |b| s.block_id == b)
                && query.skill_id.as_deref().map_or(true, |k| s.skill_id == k)
        });
        Ok(sessions)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PracticeSessionDetail {
    pub session: PracticeSession,
    /// None when the library no longer has the skill.
    pub skill: Option<PracticeSkill>,
}

pub struct GetPracticeSessionHandler {
    library: Arc<SkillLibrary>,
    sessions: Arc<dyn PracticeSessionStorage>,
}

impl GetPracticeSessionHandler {
    pub fn new(library: Arc<SkillLibrary>, sessions: Arc<dyn PracticeSessionStorage>) -> Self {
        Self { library, sessions }
    }

    pub async fn handle(&self, session_id: SessionId) -> Result<PracticeSessionDetail, PracticeError> {
        let session = self
            .sessions
            .get(session_id)
            .await?
            .ok_or(PracticeError::SessionNotFound(session_id))?;
        let skill = self
            .library
            .skill(&session.block_id, &session.skill_id)
            .cloned();
        Ok(PracticeSessionDetail { session, skill })
    }
}
