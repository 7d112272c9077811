//! Free text: sphere and skill input, and answers to training cases.

use tracing::info;

use super::engine::{DialogueEngine, EngineResult};
use crate::application::AnswerContext;
use crate::domain::coaching::{replies, DEFAULT_SPHERE};
use crate::domain::foundation::ChatId;

/// Skill name stored when the user sends an empty skill.
const UNNAMED_SKILL: &str = "другой навык";

impl DialogueEngine {
    pub(super) async fn on_text(&self, chat_id: ChatId, text: &str) -> EngineResult {
        let text = text.trim();
        let progress = self.store.get(chat_id).await?;

        if progress.awaiting_sphere() {
            let sphere = if text.is_empty() { DEFAULT_SPHERE } else { text };
            self.settle(chat_id, self.store.set_sphere(chat_id, sphere).await)?;
            info!(chat_id = %chat_id, sphere = %sphere, "Sphere set from text");
            // The action that asked for the sphere is not resumed.
            return Ok(vec![replies::sphere_set_from_text(chat_id, sphere)]);
        }

        if progress.awaiting_skill() {
            let skill = if text.is_empty() { UNNAMED_SKILL } else { text };
            self.settle(chat_id, self.store.set_skill(chat_id, skill).await)?;
            self.settle(chat_id, self.store.set_training_pending(chat_id, true).await)?;
            info!(chat_id = %chat_id, skill = %skill, "Skill set from text");

            let mut actions = vec![replies::preparing_training(chat_id)];
            actions.extend(self.serve_training_case(chat_id).await?);
            return Ok(actions);
        }

        if progress.training_case_pending {
            if let Some(case_text) = progress.current_case() {
                let evaluation = self
                    .evaluator
                    .evaluate(AnswerContext {
                        chat_id,
                        sphere: self.catalog().sphere_display(&progress.sphere),
                        skill: self.catalog().skill_label(&progress.skill),
                        case_text,
                        answer: text,
                    })
                    .await;
                if evaluation.advance {
                    self.settle(chat_id, self.store.set_training_pending(chat_id, false).await)?;
                }
                info!(chat_id = %chat_id, index = progress.training_index, advance = evaluation.advance, "Answer evaluated");
                return Ok(evaluation.actions);
            }
        }

        Ok(vec![replies::neutral_prompt(chat_id)])
    }
}

#[cfg(test)]
mod tests {
    use super::super::engine::testing::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::coaching::ConversationProgress;

    const GOOD_ANSWER: &str =
        "Давай обсудим конкретные действия и ожидания с примерами уже на следующей неделе";

    #[tokio::test]
    async fn sphere_text_does_not_resume_deferred_action() {
        let harness = Harness::new();
        harness.action("training:start").await;

        let actions = harness.text("  Бухгалтерия ").await;

        assert_eq!(actions.len(), 1);
        assert!(!texts(&actions)[0].starts_with("Кейс"));
        let progress = harness.progress().await;
        assert_eq!(progress.sphere, "Бухгалтерия");
        assert!(progress.sphere_chosen);
        assert!(!progress.training_case_pending);
    }

    #[tokio::test]
    async fn empty_sphere_text_uses_default() {
        let harness = Harness::new();
        harness.action("sphere:custom").await;

        harness.text("   ").await;

        assert_eq!(harness.progress().await.sphere, "general");
    }

    #[tokio::test]
    async fn skill_text_serves_first_case() {
        let harness = Harness::new();
        harness.action("sphere:it").await;
        harness.action("skill:feedback").await;

        let actions = harness.text("переговоры").await;

        assert_eq!(actions.len(), 2);
        assert!(texts(&actions)[1].starts_with("Кейс 1:"));
        let progress = harness.progress().await;
        assert_eq!(progress.skill, "переговоры");
        assert!(progress.skill_chosen);
        assert!(progress.training_case_pending);
        assert!(!progress.training_cases.is_empty());
    }

    #[tokio::test]
    async fn good_answer_clears_pending_without_advancing() {
        let harness = Harness::new();
        harness.action("sphere:it").await;
        harness.action("skill:feedback").await;
        harness.text("feedback").await;

        let actions = harness.text(GOOD_ANSWER).await;

        assert_eq!(data(&actions), vec!["case:next"]);
        let progress = harness.progress().await;
        assert!(!progress.training_case_pending);
        assert_eq!(progress.training_index, 0);
    }

    #[tokio::test]
    async fn weak_answer_keeps_case_pending() {
        let harness = Harness::new();
        harness.action("sphere:it").await;
        harness.action("skill:feedback").await;
        harness.text("feedback").await;

        harness.text("не знаю").await;

        assert!(harness.progress().await.training_case_pending);
    }

    #[tokio::test]
    async fn generated_feedback_is_used_when_available() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"cases":["Сгенерированный кейс"]}"#)
            .with_response(
                r#"{"actions":[{"type":"send_message","text":"ИИ: хорошо","keyboard":{"inline":[[{"text":"Дальше","data":"case:next"}]]}}]}"#,
            );
        let harness = Harness::with_provider(&provider);
        harness.action("sphere:it").await;
        harness.action("skill:feedback").await;

        let served = harness.text("feedback").await;
        let feedback = harness.text("коротко").await;

        assert!(texts(&served)[1].contains("Сгенерированный кейс"));
        assert_eq!(texts(&feedback), vec!["ИИ: хорошо"]);
        assert!(!harness.progress().await.training_case_pending);
    }

    #[tokio::test]
    async fn generator_outage_uses_catalog_and_heuristics() {
        let provider = MockAIProvider::new().failing(MockError::Unavailable {
            message: "down".to_string(),
        });
        let harness = Harness::with_provider(&provider);
        harness.action("sphere:it").await;
        harness.action("skill:feedback").await;

        let served = harness.text("feedback").await;
        let feedback = harness.text(GOOD_ANSWER).await;

        assert!(texts(&served)[1].starts_with("Кейс 1:"));
        assert_eq!(data(&feedback), vec!["case:next"]);
    }

    #[tokio::test]
    async fn idle_text_gets_neutral_prompt() {
        let harness = Harness::new();

        let actions = harness.text("привет").await;

        assert_eq!(actions.len(), 1);
        assert_eq!(harness.progress().await, ConversationProgress::default());
    }
}
