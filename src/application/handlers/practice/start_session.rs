//! StartPracticeHandler - Serves a situation and opens a practice session.

use serde_json::json;
use std::sync::Arc;
use tracing::{info, warn};

use super::{record, PracticeError};
use crate::domain::foundation::ChatId;
use crate::domain::practice::{PracticeSession, PracticeSkill, SkillLibrary};
use crate::ports::{
    ContentGenerator, GenerationResult, LoggedMessage, MessageLog, PracticeSessionStorage, Speaker,
};

#[derive(Debug, Clone)]
pub struct StartPracticeCommand {
    pub chat_id: ChatId,
    pub block_id: String,
    pub skill_id: String,
    /// Prepared situation to serve; out-of-range values are ignored.
    pub situation_index: Option<usize>,
}

#[derive(Debug, Clone)]
pub struct StartedPractice {
    pub session: PracticeSession,
    pub skill: PracticeSkill,
}

pub struct StartPracticeHandler {
    library: Arc<SkillLibrary>,
    generator: Option<Arc<dyn ContentGenerator>>,
    sessions: Arc<dyn PracticeSessionStorage>,
    message_log: Arc<dyn MessageLog>,
}

impl StartPracticeHandler {
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
        }
    }

    pub async fn handle(&self, cmd: StartPracticeCommand) -> Result<StartedPractice, PracticeError> {
        let skill = self
            .library
            .skill(&cmd.block_id, &cmd.skill_id)
            .cloned()
            .ok_or_else(|| PracticeError::SkillNotFound {
                block_id: cmd.block_id.clone(),
                skill_id: cmd.skill_id.clone(),
            })?;

        let situation = self.choose_situation(&cmd, &skill).await?;
        let session = PracticeSession::start(cmd.chat_id, &cmd.block_id, &cmd.skill_id, situation);
        self.sessions.save(&session).await?;

        record(
            self.message_log.as_ref(),
            LoggedMessage::new(cmd.chat_id, Speaker::Assistant, &session.situation, "skill_situation")
                .with_metadata(json!({
                    "session_id": session.id,
                    "block_id": session.block_id,
                    "skill_id": session.skill_id,
                })),
        )
        .await;

        info!(chat_id = %cmd.chat_id, session_id = %session.id, skill = %skill.id, "Practice session started");
        Ok(StartedPractice { session, skill })
    }

    /// The requested prepared situation, else the next prepared one this chat
    /// has not been served yet, else a generated one, else a generic prompt.
    async fn choose_situation(
        &self,
        cmd: &StartPracticeCommand,
        skill: &PracticeSkill,
    ) -> Result<String, PracticeError> {
        if let Some(situation) = cmd.situation_index.and_then(|i| skill.situations.get(i)) {
            return Ok(situation.clone());
        }

        if !skill.situations.is_empty() {
            let served = self
                .sessions
                .list(cmd.chat_id)
                .await?
                .iter()
                .filter(|s| s.is_for(&cmd.block_id, &cmd.skill_id))
                .count();
            let next = served % skill.situations.len();
            return Ok(skill.situations.get(next).cloned().unwrap_or_default());
        }

        if let Some(generator) = &self.generator {
            match generator.generate_situation(cmd.chat_id, skill).await {
                Ok(GenerationResult::Ok(items)) => {
                    if let Some(situation) = items.into_iter().map(|s| s.trim().to_string()).find(|s| !s.is_empty()) {
                        return Ok(situation);
                    }
                    warn!(chat_id = %cmd.chat_id, skill = %skill.id, "Generated situation was blank, using generic prompt");
                }
                Ok(other) => {
                    warn!(chat_id = %cmd.chat_id, skill = %skill.id, result = other.kind(), "Situation generation unusable, using generic prompt");
                }
                Err(e) => {
                    warn!(chat_id = %cmd.chat_id, skill = %skill.id, error = %e, "Situation generation failed, using generic prompt");
                }
            }
        }

        Ok(skill.fallback_situation())
    }
}
