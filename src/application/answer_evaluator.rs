//! Answer Evaluator - feedback on a training case answer.
//!
//! Generated feedback is used when a generator is configured and returns at
//! least one action; otherwise the keyword heuristic decides for this turn.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::domain::coaching::{replies, AnswerHeuristics, Keyboard, OutputAction, Verdict};
use crate::domain::foundation::ChatId;
use crate::ports::{ContentGenerator, GenerationContext, GenerationResult};

/// Button data a generated reply uses to let the user move on.
const ADVANCE_PREFIX: &str = "case:next";

/// Where the feedback came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EvaluationSource {
    Generated,
    Heuristic(Verdict),
}

/// Feedback for one answer.
#[derive(Debug, Clone, PartialEq)]
pub struct Evaluation {
    pub actions: Vec<OutputAction>,
    /// True when the case is done and its pending flag should clear.
    pub advance: bool,
    pub source: EvaluationSource,
}

/// What is being evaluated.
#[derive(Debug, Clone, Copy)]
pub struct AnswerContext<'a> {
    pub chat_id: ChatId,
    pub sphere: &'a str,
    pub skill: &'a str,
    pub case_text: &'a str,
    pub answer: &'a str,
}

pub struct AnswerEvaluator {
    generator: Option<Arc<dyn ContentGenerator>>,
    heuristics: AnswerHeuristics,
}

impl AnswerEvaluator {
    pub fn new(generator: Option<Arc<dyn ContentGenerator>>, heuristics: AnswerHeuristics) -> Self {
        Self {
            generator,
            heuristics,
        }
    }

    pub async fn evaluate(&self, answer: AnswerContext<'_>) -> Evaluation {
        if let Some(generator) = &self.generator {
            let context = GenerationContext::new(answer.chat_id, answer.sphere, answer.skill);
            match generator
                .evaluate_answer(&context, answer.case_text, answer.answer)
                .await
            {
                Ok(GenerationResult::Ok(actions)) => {
                    return finish_generated(answer.chat_id, actions);
                }
                Ok(other) => {
                    warn!(chat_id = %answer.chat_id, result = other.kind(), "Generated evaluation unusable, using heuristics");
                }
                Err(e) => {
                    warn!(chat_id = %answer.chat_id, error = %e, "Evaluation failed, using heuristics");
                }
            }
        }

        self.heuristic(answer.chat_id, answer.answer)
    }

    fn heuristic(&self, chat_id: ChatId, answer: &str) -> Evaluation {
        let verdict = self.heuristics.evaluate(answer);
        debug!(chat_id = %chat_id, score = verdict.score, good = verdict.is_good, "Heuristic verdict");
        Evaluation {
            actions: vec![replies::heuristic_feedback(chat_id, &verdict)],
            advance: verdict.is_good,
            source: EvaluationSource::Heuristic(verdict),
        }
    }
}

/// Addresses generated messages to the chat, appends the navigation rows and
/// detects whether the model offered to move on.
fn finish_generated(chat_id: ChatId, mut actions: Vec<OutputAction>) -> Evaluation {
    let mut advance = false;
    for message in actions.iter_mut().filter_map(OutputAction::as_message_mut) {
        message.chat_id = chat_id;
        let keyboard = message.keyboard.get_or_insert_with(Keyboard::default);
        for row in replies::navigation_rows() {
            keyboard.push_row(row);
        }
        advance |= keyboard.has_data_prefix(ADVANCE_PREFIX);
    }

    Evaluation {
        actions,
        advance,
        source: EvaluationSource::Generated,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{LlmContentGenerator, MockAIProvider, MockError};

    const GOOD_ANSWER: &str =
        "Давай обсудим конкретные действия и ожидания с примерами уже на следующей неделе";

    fn answer(text: &str) -> AnswerContext<'_> {
        AnswerContext {
            chat_id: ChatId::new(77),
            sphere: "it",
            skill: "feedback",
            case_text: "Кейс",
            answer: text,
        }
    }

    fn evaluator(provider: &MockAIProvider) -> AnswerEvaluator {
        let generator = LlmContentGenerator::new(Arc::new(provider.clone()), 0.2);
        AnswerEvaluator::new(Some(Arc::new(generator)), AnswerHeuristics::default())
    }

    fn all_data(actions: &[OutputAction]) -> Vec<String> {
        actions
            .iter()
            .filter_map(OutputAction::as_message)
            .filter_map(|m| m.keyboard.as_ref())
            .flat_map(|k| k.buttons().map(|b| b.data.clone()).collect::<Vec<_>>())
            .collect()
    }

    #[tokio::test]
    async fn heuristic_good_answer_advances() {
        let evaluator = AnswerEvaluator::new(None, AnswerHeuristics::default());

        let evaluation = evaluator.evaluate(answer(GOOD_ANSWER)).await;

        assert!(evaluation.advance);
        assert!(matches!(evaluation.source, EvaluationSource::Heuristic(ref v) if v.is_good));
        assert_eq!(all_data(&evaluation.actions), vec!["case:next"]);
    }

    #[tokio::test]
    async fn heuristic_weak_answer_offers_retry() {
        let evaluator = AnswerEvaluator::new(None, AnswerHeuristics::default());

        let evaluation = evaluator.evaluate(answer("не знаю")).await;

        assert!(!evaluation.advance);
        assert!(all_data(&evaluation.actions).contains(&"case:retry".to_string()));
    }

    #[tokio::test]
    async fn generated_actions_are_addressed_and_navigable() {
        let provider = MockAIProvider::new().with_response(
            r#"{"actions":[{"type":"send_message","chat_id":1,"text":"<b>Хорошо</b>",
               "keyboard":{"inline":[[{"text":"Дальше","data":"case:next"}]]}}]}"#,
        );

        let evaluation = evaluator(&provider).evaluate(answer("что угодно")).await;

        assert_eq!(evaluation.source, EvaluationSource::Generated);
        assert!(evaluation.advance);
        let message = evaluation.actions[0].as_message().unwrap();
        assert_eq!(message.chat_id, ChatId::new(77));
        assert_eq!(
            all_data(&evaluation.actions),
            vec!["case:next", "action:start", "action:skill:feedback"]
        );
    }

    #[tokio::test]
    async fn generated_retry_keeps_case_pending() {
        let provider = MockAIProvider::new().with_response(
            r#"{"actions":[{"type":"send_message","text":"Слабо","keyboard":{"inline":[[{"text":"Ещё","data":"case:retry"}]]}}]}"#,
        );

        let evaluation = evaluator(&provider).evaluate(answer(GOOD_ANSWER)).await;

        assert!(!evaluation.advance);
        assert_eq!(evaluation.source, EvaluationSource::Generated);
    }

    #[tokio::test]
    async fn empty_generated_actions_fall_back_for_this_turn() {
        let provider = MockAIProvider::new()
            .with_response(r#"{"actions":[]}"#)
            .with_response(r#"{"actions":[{"type":"send_message","text":"ok"}]}"#);
        let evaluator = evaluator(&provider);

        let first = evaluator.evaluate(answer(GOOD_ANSWER)).await;
        let second = evaluator.evaluate(answer(GOOD_ANSWER)).await;

        assert!(matches!(first.source, EvaluationSource::Heuristic(_)));
        assert!(first.advance);
        assert_eq!(second.source, EvaluationSource::Generated);
    }

    #[tokio::test]
    async fn generator_error_falls_back() {
        let provider = MockAIProvider::new().failing(MockError::AuthenticationFailed);

        let evaluation = evaluator(&provider).evaluate(answer("коротко")).await;

        assert!(matches!(evaluation.source, EvaluationSource::Heuristic(_)));
        assert!(!evaluation.advance);
    }
}
