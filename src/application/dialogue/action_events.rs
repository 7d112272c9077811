//! Menu actions: start, sphere and skill selection, diagnostic and training
//! entry points.

use tracing::info;

use super::engine::{DialogueEngine, EngineResult};
use crate::domain::coaching::{replies, ActionCommand};
use crate::domain::foundation::ChatId;

impl DialogueEngine {
    pub(super) async fn on_action(&self, chat_id: ChatId, command: ActionCommand) -> EngineResult {
        match command {
            ActionCommand::Start => Ok(vec![replies::welcome(chat_id)]),
            ActionCommand::SphereMenu | ActionCommand::SphereCustom => {
                self.request_sphere(chat_id).await
            }
            ActionCommand::Sphere(code) => self.choose_sphere(chat_id, &code).await,
            ActionCommand::DiagnosticStart => self.start_diagnostic(chat_id).await,
            ActionCommand::TrainingStart => self.start_training(chat_id).await,
            ActionCommand::Progress => {
                let progress = self.store.get(chat_id).await?;
                Ok(vec![replies::progress_summary(
                    chat_id,
                    &progress,
                    self.catalog(),
                )])
            }
            ActionCommand::Reminders => Ok(vec![replies::reminders_menu(chat_id)]),
            ActionCommand::Skill(_) => {
                self.settle(chat_id, self.store.set_skill_pending(chat_id, true).await)?;
                Ok(vec![replies::skill_prompt(chat_id)])
            }
            ActionCommand::TableOfContents => Ok(vec![replies::section_unavailable(chat_id)]),
            ActionCommand::Unknown(name) => {
                info!(chat_id = %chat_id, action = %name, "Unknown action");
                Ok(vec![replies::command_acknowledged(chat_id)])
            }
        }
    }

    async fn request_sphere(&self, chat_id: ChatId) -> EngineResult {
        self.settle(chat_id, self.store.set_sphere_pending(chat_id, true).await)?;
        Ok(vec![replies::sphere_prompt(chat_id)])
    }

    async fn choose_sphere(&self, chat_id: ChatId, code: &str) -> EngineResult {
        match self.catalog().sphere_label(code) {
            Some(label) => {
                self.settle(chat_id, self.store.set_sphere(chat_id, code).await)?;
                info!(chat_id = %chat_id, sphere = %code, "Sphere chosen");
                Ok(vec![replies::sphere_chosen(chat_id, label)])
            }
            None => Ok(vec![replies::unknown_sphere(chat_id, self.catalog())]),
        }
    }

    /// Restarts the diagnostic. Without a sphere the user is asked for one
    /// and the diagnostic is not resumed afterwards.
    async fn start_diagnostic(&self, chat_id: ChatId) -> EngineResult {
        self.settle(chat_id, self.store.reset_diagnostic(chat_id).await)?;
        let progress = self.store.get(chat_id).await?;
        if !progress.sphere_chosen {
            return self.request_sphere(chat_id).await;
        }

        let questions = self
            .content
            .ensure_diagnostic_questions(chat_id, &progress)
            .await;
        let Some(first) = questions.first().cloned() else {
            return Ok(vec![replies::diagnostic_unavailable(chat_id)]);
        };

        let total = questions.len();
        self.settle(
            chat_id,
            self.store.set_diagnostic_questions(chat_id, questions).await,
        )?;
        info!(chat_id = %chat_id, questions = total, "Diagnostic started");
        Ok(vec![replies::diagnostic_question(chat_id, 0, total, &first)])
    }

    /// Enters training: asks for missing sphere or skill first, re-serves a
    /// pending case, or starts the case list over.
    pub(super) async fn start_training(&self, chat_id: ChatId) -> EngineResult {
        let progress = self.store.get(chat_id).await?;
        if !progress.sphere_chosen {
            return self.request_sphere(chat_id).await;
        }
        if !progress.skill_chosen {
            self.settle(chat_id, self.store.set_skill_pending(chat_id, true).await)?;
            return Ok(vec![replies::skill_prompt(chat_id)]);
        }
        if progress.training_case_pending && !progress.training_cases.is_empty() {
            return self.serve_training_case(chat_id).await;
        }

        self.settle(chat_id, self.store.restart_training(chat_id, true).await)?;
        info!(chat_id = %chat_id, skill = %progress.skill, "Training started");
        self.serve_training_case(chat_id).await
    }
}
