//! Button callbacks: diagnostic answers, case navigation and reminders.

use tracing::info;

use super::engine::{DialogueEngine, EngineResult};
use crate::domain::coaching::{replies, AnswerOutcome, CallbackCommand};
use crate::domain::foundation::ChatId;

impl DialogueEngine {
    pub(super) async fn on_callback(
        &self,
        chat_id: ChatId,
        command: CallbackCommand,
    ) -> EngineResult {
        match command {
            CallbackCommand::Diagnostic { question, option } => {
                self.answer_diagnostic(chat_id, question, option).await
            }
            CallbackCommand::CaseNext | CallbackCommand::ResumeYes => {
                let index = self.settle(chat_id, self.store.increment_training(chat_id).await)?;
                info!(chat_id = %chat_id, index, "Next case");
                self.serve_training_case(chat_id).await
            }
            CallbackCommand::TrainingRestart => {
                self.settle(chat_id, self.store.restart_training(chat_id, false).await)?;
                self.serve_training_case(chat_id).await
            }
            CallbackCommand::CaseRetry => {
                self.settle(chat_id, self.store.set_training_pending(chat_id, true).await)?;
                self.serve_training_case(chat_id).await
            }
            CallbackCommand::RemindLater => {
                let outcome = self.reminders.schedule(chat_id).await;
                info!(chat_id = %chat_id, outcome = ?outcome, "Reminder requested");
                Ok(vec![replies::reminder_acknowledged(chat_id)])
            }
            CallbackCommand::Action(action) => self.on_action(chat_id, action).await,
            CallbackCommand::Unknown(data) => {
                info!(chat_id = %chat_id, data = %data, "Unknown callback");
                Ok(vec![replies::signal_acknowledged(chat_id)])
            }
        }
    }

    async fn answer_diagnostic(&self, chat_id: ChatId, question: usize, option: usize) -> EngineResult {
        let progress = self.store.get(chat_id).await?;
        if progress.diagnostic_questions.is_empty() {
            let questions = self.catalog().diagnostic_questions().to_vec();
            if questions.is_empty() {
                return Ok(vec![replies::diagnostic_unavailable(chat_id)]);
            }
            self.settle(
                chat_id,
                self.store.set_diagnostic_questions(chat_id, questions).await,
            )?;
        }

        let outcome = self.settle(
            chat_id,
            self.store
                .record_diagnostic_answer(chat_id, question, option)
                .await,
        )?;
        let progress = self.store.get(chat_id).await?;
        let questions = &progress.diagnostic_questions;
        let total = questions.len();

        match outcome {
            AnswerOutcome::Recorded { next } => match questions.get(next) {
                Some(question) => Ok(vec![replies::diagnostic_question(
                    chat_id, next, total, question,
                )]),
                None => Ok(vec![replies::diagnostic_unavailable(chat_id)]),
            },
            AnswerOutcome::AllAnswered => {
                self.settle(chat_id, self.store.complete_diagnostic(chat_id).await)?;
                info!(chat_id = %chat_id, "Diagnostic completed");
                let summary = self.content.diagnostic_summary(chat_id, &progress).await;
                Ok(vec![replies::diagnostic_complete(chat_id, &summary)])
            }
            AnswerOutcome::Rejected { expected } => {
                info!(chat_id = %chat_id, question, option, expected, "Out-of-order diagnostic answer");
                match questions.get(expected) {
                    Some(question) if !progress.diagnostic_done => Ok(vec![
                        replies::diagnostic_question(chat_id, expected, total, question),
                    ]),
                    _ => {
                        let summary = self.content.diagnostic_summary(chat_id, &progress).await;
                        Ok(vec![replies::diagnostic_complete(chat_id, &summary)])
                    }
                }
            }
        }
    }
}
