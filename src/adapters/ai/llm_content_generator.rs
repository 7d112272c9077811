//! LLM Content Generator - `ContentGenerator` over any `AIProvider`.
//!
//! Builds Russian-language prompts for diagnostics, training cases, diagnostic
//! summaries and answer evaluation, then parses the JSON the model returns.
//! Models often wrap JSON in a fenced code block or add a sentence around it,
//! so parsing strips fences and falls back to the outermost `{...}` span.

use async_trait::async_trait;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::domain::coaching::{ConversationProgress, DiagnosticQuestion, OutputAction};
use crate::domain::foundation::ChatId;
use crate::domain::practice::{PracticeSkill, ScoredFeedback, DEFAULT_SCORE};
use crate::ports::{
    AIError, AIProvider, CompletionRequest, ContentGenerator, GenerationContext,
    GenerationResult, MessageRole, RequestMetadata, RequestPurpose,
};

const EVALUATION_SYSTEM_PROMPT: &str = concat!(
    "Ты тренер по навыкам обратной связи и ИПР. ",
    "Всегда отвечай JSON без текста вокруг. ",
    r#"Формат: {"actions":[{"type":"send_message","text":"...","parse_mode":"HTML","keyboard":{"inline":[[{"text":"...","data":"..."}]]}}]} "#,
    "Текст должен быть кратким, на русском, без Markdown, только HTML (b, i, code, ul/li). ",
    "Если ответ ок — предложи кнопку 'Дальше' (data: case:next). ",
    "Если слабый — кнопка 'Попробовать снова' (data: case:retry) и короткая подсказка."
);

/// Content generator backed by a chat-completion model.
pub struct LlmContentGenerator {
    provider: Arc<dyn AIProvider>,
    temperature: f32,
}

impl LlmContentGenerator {
    pub fn new(provider: Arc<dyn AIProvider>, temperature: f32) -> Self {
        Self {
            provider,
            temperature,
        }
    }

    async fn ask(
        &self,
        chat_id: ChatId,
        purpose: RequestPurpose,
        system_prompt: Option<&str>,
        prompt: String,
    ) -> Result<String, AIError> {
        let metadata = RequestMetadata::new(chat_id, purpose, Uuid::new_v4().to_string());
        let mut request = CompletionRequest::new(metadata)
            .with_message(MessageRole::User, prompt)
            .with_temperature(self.temperature);
        if let Some(system) = system_prompt {
            request = request.with_system_prompt(system);
        }

        let response = self.provider.complete(request).await?;
        debug!(
            chat_id = %chat_id,
            purpose = purpose.as_str(),
            chars = response.content.len(),
            "Model answered"
        );
        Ok(response.content)
    }
}

fn diagnostic_prompt(context: &GenerationContext, count: usize, options: usize) -> String {
    format!(
        "Сформируй краткую диагностику по выбранному навыку. \
         Сфера: {sphere}. Навык/тематика: {skill}. \
         Нужно {count} вопросов. Формат строго JSON без пояснений: \
         {{\"questions\":[{{\"question\":\"...\",\"options\":[\"opt1\",\"opt2\",\"opt3\"]}},...]}} \
         Каждый вопрос должен иметь ровно {options} варианта ответа. \
         Кратко, по-деловому, на русском.",
        sphere = context.sphere,
        skill = context.skill,
    )
}

fn cases_prompt(context: &GenerationContext, count: usize) -> String {
    format!(
        "Сформулируй {count} кейсов-вопросов для тренажёра навыка '{skill}' в сфере '{sphere}'. \
         Каждый кейс — это реалистичная рабочая ситуация с вопросом к пользователю. \
         Формат кейса: описание ситуации (2-3 предложения) + вопрос 'Как ты поступишь?' или аналогичный. \
         Кейсы должны быть разнообразными, с нарастающей сложностью. \
         Ответ верни строгим JSON: {{\"cases\": [\"кейс1\", \"кейс2\", ..., \"кейс{count}\"]}} без пояснений.",
        skill = context.skill,
        sphere = context.sphere,
    )
}

fn summary_prompt(context: &GenerationContext, progress: &ConversationProgress) -> String {
    let lines: Vec<String> = progress
        .diagnostic_questions
        .iter()
        .enumerate()
        .map(|(idx, question)| {
            let chosen = progress
                .chosen_option(idx)
                .and_then(|option| question.options.get(option))
                .map(String::as_str)
                .unwrap_or("");
            format!("Q{}: {} | выбран: {}", idx + 1, question.text, chosen)
        })
        .collect();

    format!(
        "Подведи итоги диагностики.\nСфера: {}\nНавык/тематика: {}\n\
         Вопросы и выбранные ответы:\n{}\n\
         Сформулируй краткий вывод и совет следующего шага. Ответ верни текстом на русском, 1-2 абзаца.",
        context.sphere,
        context.skill,
        lines.join("\n"),
    )
}

fn evaluation_prompt(context: &GenerationContext, case_text: &str, answer: &str) -> String {
    format!(
        "Сфера: {}\nНавык: {}\nКейс: {}\nОтвет пользователя: {}\n\
         Оцени ответ и верни JSON с действиями (см. формат).",
        context.sphere, context.skill, case_text, answer
    )
}

fn situation_prompt(skill: &PracticeSkill) -> String {
    format!(
        "Сгенерируй реалистичную рабочую ситуацию для тренировки навыка.\n\
         Навык: {}\nОписание: {}\nТеоретическая база: {}\n\n\
         Требования к ситуации:\n\
         - 2-3 предложения описания контекста\n\
         - Конкретная проблема или вызов\n\
         - Вопрос к пользователю 'Как вы поступите?' или аналогичный\n\
         - На русском языке\n\n\
         Верни только текст ситуации, без JSON и пояснений.",
        skill.name, skill.description, skill.theory_doc
    )
}

fn scoring_prompt(skill: &PracticeSkill, situation: &str, answer: &str) -> String {
    format!(
        "Оцени ответ пользователя на тренировочную ситуацию.\n\n\
         Навык: {}\nОписание навыка: {}\nТеоретическая база: {}\n\n\
         Ситуация:\n{}\n\nОтвет пользователя:\n{}\n\n\
         Требования к оценке:\n\
         1. Оцени по шкале 1-10, где 1-3: нет конкретики, 4-6: есть пробелы, \
         7-8: хороший ответ с конкретикой, 9-10: глубокое понимание\n\
         2. Дай конструктивную обратную связь на русском языке\n\
         3. Укажи сильные стороны ответа и что можно улучшить\n\n\
         Верни строго JSON: {{\"score\": <число 1-10>, \"feedback\": \"<текст обратной связи>\"}}",
        skill.name, skill.description, skill.theory_doc, situation, answer
    )
}

/// Removes a surrounding ``` fence (with optional language tag).
fn strip_fences(raw: &str) -> &str {
    let trimmed = raw.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    let body = rest.split_once('\n').map(|(_, body)| body).unwrap_or("");
    body.trim_end().strip_suffix("```").unwrap_or(body).trim()
}

/// Parses a JSON object out of model output.
fn parse_json_object(raw: &str) -> Option<Value> {
    let candidate = strip_fences(raw);
    if let Ok(value @ Value::Object(_)) = serde_json::from_str(candidate) {
        return Some(value);
    }
    let start = candidate.find('{')?;
    let end = candidate.rfind('}')?;
    if end <= start {
        return None;
    }
    match serde_json::from_str(&candidate[start..=end]) {
        Ok(value @ Value::Object(_)) => Some(value),
        _ => None,
    }
}

fn value_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.trim().to_string(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn array_field<'a>(object: &'a Value, key: &str) -> &'a [Value] {
    object
        .get(key)
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or(&[])
}

fn parse_questions(raw: &str, count: usize, options: usize) -> GenerationResult<DiagnosticQuestion> {
    let Some(object) = parse_json_object(raw) else {
        return GenerationResult::Malformed(raw.to_string());
    };

    let questions = array_field(&object, "questions")
        .iter()
        .filter_map(|item| {
            let text = item
                .get("question")
                .or_else(|| item.get("text"))
                .map(value_text)
                .unwrap_or_default();
            let opts: Vec<String> = array_field(item, "options")
                .iter()
                .map(value_text)
                .filter(|o| !o.is_empty())
                .take(options)
                .collect();
            (!text.is_empty() && !opts.is_empty()).then(|| DiagnosticQuestion::new(text, opts))
        })
        .take(count)
        .collect();

    GenerationResult::from_items(questions)
}

fn parse_cases(raw: &str, count: usize) -> GenerationResult<String> {
    let Some(object) = parse_json_object(raw) else {
        return GenerationResult::Malformed(raw.to_string());
    };

    let cases = array_field(&object, "cases")
        .iter()
        .map(value_text)
        .filter(|c| !c.is_empty())
        .take(count)
        .collect();

    GenerationResult::from_items(cases)
}

fn parse_actions(raw: &str) -> GenerationResult<OutputAction> {
    let Some(object) = parse_json_object(raw) else {
        return GenerationResult::Malformed(raw.to_string());
    };

    let actions = array_field(&object, "actions")
        .iter()
        .filter_map(|item| {
            let mut item = item.clone();
            // The recipient is always set by the caller.
            if let Some(fields) = item.as_object_mut() {
                fields.remove("chat_id");
            }
            match serde_json::from_value::<OutputAction>(item) {
                Ok(action) => Some(action),
                Err(e) => {
                    warn!(error = %e, "Dropping unreadable generated action");
                    None
                }
            }
        })
        .collect();

    GenerationResult::from_items(actions)
}

fn parse_scored(raw: &str) -> GenerationResult<ScoredFeedback> {
    let Some(object) = parse_json_object(raw) else {
        return GenerationResult::Malformed(raw.to_string());
    };

    let feedback = object.get("feedback").map(value_text).unwrap_or_default();
    if feedback.is_empty() {
        return GenerationResult::Empty;
    }
    let score = match object.get("score") {
        Some(Value::Number(n)) => n.as_f64().map(|f| f.round() as i64),
        Some(Value::String(s)) => s.trim().parse::<i64>().ok(),
        _ => None,
    }
    .unwrap_or(DEFAULT_SCORE as i64);

    GenerationResult::Ok(vec![ScoredFeedback::new(score, feedback)])
}

#[async_trait]
impl ContentGenerator for LlmContentGenerator {
    async fn generate_diagnostic(
        &self,
        context: &GenerationContext,
        count: usize,
        options: usize,
    ) -> Result<GenerationResult<DiagnosticQuestion>, AIError> {
        let raw = self
            .ask(
                context.chat_id,
                RequestPurpose::DiagnosticQuestions,
                None,
                diagnostic_prompt(context, count, options),
            )
            .await?;
        Ok(parse_questions(&raw, count, options))
    }

    async fn generate_cases(
        &self,
        context: &GenerationContext,
        count: usize,
    ) -> Result<GenerationResult<String>, AIError> {
        let raw = self
            .ask(
                context.chat_id,
                RequestPurpose::TrainingCases,
                None,
                cases_prompt(context, count),
            )
            .await?;
        Ok(parse_cases(&raw, count))
    }

    async fn summarize_diagnostic(
        &self,
        context: &GenerationContext,
        progress: &ConversationProgress,
    ) -> Result<GenerationResult<String>, AIError> {
        let raw = self
            .ask(
                context.chat_id,
                RequestPurpose::DiagnosticSummary,
                None,
                summary_prompt(context, progress),
            )
            .await?;
        let summary = raw.trim();
        if summary.is_empty() {
            Ok(GenerationResult::Empty)
        } else {
            Ok(GenerationResult::Ok(vec![summary.to_string()]))
        }
    }

    async fn evaluate_answer(
        &self,
        context: &GenerationContext,
        case_text: &str,
        answer: &str,
    ) -> Result<GenerationResult<OutputAction>, AIError> {
        let raw = self
            .ask(
                context.chat_id,
                RequestPurpose::AnswerEvaluation,
                Some(EVALUATION_SYSTEM_PROMPT),
                evaluation_prompt(context, case_text, answer),
            )
            .await?;
        Ok(parse_actions(&raw))
    }

    async fn generate_situation(
        &self,
        chat_id: ChatId,
        skill: &PracticeSkill,
    ) -> Result<GenerationResult<String>, AIError> {
        let raw = self
            .ask(
                chat_id,
                RequestPurpose::PracticeSituation,
                None,
                situation_prompt(skill),
            )
            .await?;
        let situation = strip_fences(&raw);
        if situation.is_empty() {
            Ok(GenerationResult::Empty)
        } else {
            Ok(GenerationResult::Ok(vec![situation.to_string()]))
        }
    }

    async fn score_answer(
        &self,
        chat_id: ChatId,
        skill: &PracticeSkill,
        situation: &str,
        answer: &str,
    ) -> Result<GenerationResult<ScoredFeedback>, AIError> {
        let raw = self
            .ask(
                chat_id,
                RequestPurpose::PracticeScoring,
                None,
                scoring_prompt(skill, situation, answer),
            )
            .await?;
        Ok(parse_scored(&raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::ai::{MockAIProvider, MockError};
    use crate::domain::practice::SkillLibrary;

    fn context() -> GenerationContext {
        GenerationContext::new(ChatId::new(42), "it", "feedback")
    }

    fn generator(provider: &MockAIProvider) -> LlmContentGenerator {
        LlmContentGenerator::new(Arc::new(provider.clone()), 0.2)
    }

    // ════════════════════════════════════════════════════════════════════════
    // Parsing
    // ════════════════════════════════════════════════════════════════════════

    #[test]
    fn strip_fences_handles_language_tag() {
        let raw = "```json\n{\"cases\":[\"a\"]}\n```";
        assert_eq!(strip_fences(raw), "{\"cases\":[\"a\"]}");
        assert_eq!(strip_fences("  {\"a\":1} "), "{\"a\":1}");
    }

    #[test]
    fn json_is_found_inside_prose() {
        let value = parse_json_object("Вот ответ: {\"cases\":[\"x\"]} Удачи!").unwrap();
        assert_eq!(value["cases"][0], "x");
    }

    #[test]
    fn non_object_json_is_malformed() {
        assert!(matches!(parse_cases("[1,2]", 3), GenerationResult::Malformed(_)));
        assert!(matches!(parse_cases("nonsense", 3), GenerationResult::Malformed(_)));
    }

    #[test]
    fn cases_are_trimmed_filtered_and_truncated() {
        let raw = r#"{"cases":["  первый ", "", "   ", "второй", "третий"]}"#;
        let result = parse_cases(raw, 2);
        assert_eq!(
            result,
            GenerationResult::Ok(vec!["первый".to_string(), "второй".to_string()])
        );
    }

    #[test]
    fn missing_cases_key_is_empty() {
        assert_eq!(parse_cases(r#"{"other":[]}"#, 3), GenerationResult::Empty);
    }

    #[test]
    fn questions_drop_incomplete_items() {
        let raw = r#"{"questions":[
            {"question":"Как часто?","options":["редко"," часто ","всегда","иногда"]},
            {"question":"","options":["a"]},
            {"question":"Без вариантов","options":[]},
            {"text":"Альтернативное поле","options":["x"]}
        ]}"#;

        let GenerationResult::Ok(questions) = parse_questions(raw, 5, 3) else {
            panic!("expected questions");
        };

        assert_eq!(questions.len(), 2);
        assert_eq!(questions[0].options, vec!["редко", "часто", "всегда"]);
        assert_eq!(questions[1].text, "Альтернативное поле");
    }

    #[test]
    fn actions_lose_generated_chat_id() {
        let raw = r#"{"actions":[{"type":"send_message","chat_id":"<int>","text":"Хорошо",
            "keyboard":{"inline":[[{"text":"Дальше","data":"case:next"}]]}}]}"#;

        let GenerationResult::Ok(actions) = parse_actions(raw) else {
            panic!("expected actions");
        };

        let message = actions[0].as_message().unwrap();
        assert_eq!(message.chat_id, ChatId::default());
        assert!(message.keyboard.as_ref().unwrap().has_data_prefix("case:next"));
    }

    #[test]
    fn empty_actions_are_empty() {
        assert_eq!(parse_actions(r#"{"actions":[]}"#), GenerationResult::Empty);
    }

    // ════════════════════════════════════════════════════════════════════════
    // Provider round trips
    // ════════════════════════════════════════════════════════════════════════

    #[tokio::test]
    async fn generate_cases_sends_prompt_with_skill_and_sphere() {
        let provider = MockAIProvider::new().with_response(r#"{"cases":["Кейс 1"]}"#);

        let result = generator(&provider).generate_cases(&context(), 10).await.unwrap();

        assert_eq!(result, GenerationResult::Ok(vec!["Кейс 1".to_string()]));
        let calls = provider.get_calls();
        assert_eq!(calls[0].metadata.purpose, RequestPurpose::TrainingCases);
        assert!(calls[0].messages[0].content.contains("'feedback' в сфере 'it'"));
        assert!(calls[0].system_prompt.is_none());
    }

    #[tokio::test]
    async fn evaluate_answer_uses_system_prompt() {
        let provider = MockAIProvider::new().with_response(
            r#"{"actions":[{"type":"send_message","text":"Отлично"}]}"#,
        );

        let result = generator(&provider)
            .evaluate_answer(&context(), "Кейс", "Ответ")
            .await
            .unwrap();

        assert_eq!(result.kind(), "ok");
        let call = &provider.get_calls()[0];
        assert!(call.system_prompt.as_deref().unwrap().contains("case:next"));
        assert!(call.messages[0].content.contains("Ответ пользователя: Ответ"));
    }

    #[tokio::test]
    async fn summary_lists_chosen_options() {
        let provider = MockAIProvider::new().with_response("  Итог: всё хорошо.  ");
        let mut progress = ConversationProgress::default();
        progress.set_diagnostic_questions(vec![
            DiagnosticQuestion::new("Вопрос A", ["нет", "да"]),
            DiagnosticQuestion::new("Вопрос B", ["x", "y"]),
        ]);
        progress.record_diagnostic_answer(0, 1);
        progress.record_diagnostic_answer(1, 0);

        let result = generator(&provider)
            .summarize_diagnostic(&context(), &progress)
            .await
            .unwrap();

        assert_eq!(result, GenerationResult::Ok(vec!["Итог: всё хорошо.".to_string()]));
        let prompt = &provider.get_calls()[0].messages[0].content;
        assert!(prompt.contains("Q1: Вопрос A | выбран: да"));
        assert!(prompt.contains("Q2: Вопрос B | выбран: x"));
    }

    #[tokio::test]
    async fn blank_summary_is_empty() {
        let provider = MockAIProvider::new().with_response("   ");

        let result = generator(&provider)
            .summarize_diagnostic(&context(), &ConversationProgress::default())
            .await
            .unwrap();

        assert_eq!(result, GenerationResult::Empty);
    }

    #[tokio::test]
    async fn provider_errors_propagate() {
        let provider = MockAIProvider::new().with_error(MockError::Network {
            message: "reset".to_string(),
        });

        let err = generator(&provider)
            .generate_diagnostic(&context(), 3, 3)
            .await
            .unwrap_err();

        assert!(matches!(err, AIError::Network(_)));
    }

    #[test]
    fn scored_feedback_clamps_and_defaults() {
        assert_eq!(
            parse_scored(r#"{"score": 14, "feedback": "Отлично"}"#),
            GenerationResult::Ok(vec![ScoredFeedback::new(10, "Отлично")])
        );
        assert_eq!(
            parse_scored(r#"{"score": "7", "feedback": "Хорошо"}"#),
            GenerationResult::Ok(vec![ScoredFeedback::new(7, "Хорошо")])
        );
        assert_eq!(
            parse_scored(r#"{"feedback": "Без оценки"}"#),
            GenerationResult::Ok(vec![ScoredFeedback::new(5, "Без оценки")])
        );
        assert_eq!(parse_scored(r#"{"score": 8}"#), GenerationResult::Empty);
        assert!(matches!(parse_scored("оценка 8"), GenerationResult::Malformed(_)));
    }

    #[tokio::test]
    async fn situation_prompt_carries_skill_theory() {
        let provider = MockAIProvider::new().with_response("```\nСитуация: срыв сроков.\n```");
        let library = SkillLibrary::builtin();
        let skill = library.skill("management", "delegation").unwrap();

        let result = generator(&provider)
            .generate_situation(ChatId::new(3), skill)
            .await
            .unwrap();

        assert_eq!(result, GenerationResult::Ok(vec!["Ситуация: срыв сроков.".to_string()]));
        let call = &provider.get_calls()[0];
        assert_eq!(call.metadata.purpose, RequestPurpose::PracticeSituation);
        assert!(call.messages[0].content.contains(&skill.theory_doc));
    }
}
