//! Content Provider - diagnostic questions, training cases and summaries.
//!
//! Prefers the configured generator and falls back to the static catalog on
//! any failure: transport error, malformed payload or empty result.

use std::sync::Arc;
use tracing::{info, warn};

use crate::domain::coaching::{
    interpret_diagnostic, Catalog, ConversationProgress, DiagnosticQuestion, DEFAULT_SPHERE,
};
use crate::domain::foundation::ChatId;
use crate::ports::{ContentGenerator, GenerationContext, GenerationResult};

/// How much content to request from the generator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContentLimits {
    pub diagnostic_questions: usize,
    pub options_per_question: usize,
    pub training_cases: usize,
}

impl Default for ContentLimits {
    fn default() -> Self {
        Self {
            diagnostic_questions: 3,
            options_per_question: 3,
            training_cases: 10,
        }
    }
}

pub struct ContentProvider {
    generator: Option<Arc<dyn ContentGenerator>>,
    catalog: Arc<Catalog>,
    limits: ContentLimits,
}

impl ContentProvider {
    pub fn new(
        generator: Option<Arc<dyn ContentGenerator>>,
        catalog: Arc<Catalog>,
        limits: ContentLimits,
    ) -> Self {
        Self {
            generator,
            catalog,
            limits,
        }
    }

    /// Catalog-only provider.
    pub fn static_only(catalog: Arc<Catalog>) -> Self {
        Self::new(None, catalog, ContentLimits::default())
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn generation_enabled(&self) -> bool {
        self.generator.is_some()
    }

    fn context(&self, chat_id: ChatId, progress: &ConversationProgress, skill: &str) -> GenerationContext {
        let sphere = if progress.sphere.trim().is_empty() {
            DEFAULT_SPHERE
        } else {
            self.catalog.sphere_display(&progress.sphere)
        };
        GenerationContext::new(chat_id, sphere, self.catalog.skill_label(skill))
    }

    /// Questions already held by `progress`, else generated, else the catalog's.
    pub async fn ensure_diagnostic_questions(
        &self,
        chat_id: ChatId,
        progress: &ConversationProgress,
    ) -> Vec<DiagnosticQuestion> {
        if !progress.diagnostic_questions.is_empty() {
            return progress.diagnostic_questions.clone();
        }

        if let Some(generator) = &self.generator {
            let context = self.context(chat_id, progress, &progress.skill);
            let limits = self.limits;
            match generator
                .generate_diagnostic(
                    &context,
                    limits.diagnostic_questions,
                    limits.options_per_question,
                )
                .await
            {
                Ok(GenerationResult::Ok(questions)) => {
                    let questions = normalize_questions(questions, limits);
                    if !questions.is_empty() {
                        info!(chat_id = %chat_id, count = questions.len(), "Generated diagnostic questions");
                        return questions;
                    }
                    warn!(chat_id = %chat_id, "Generated diagnostic had no usable questions, using catalog");
                }
                Ok(other) => {
                    warn!(chat_id = %chat_id, result = other.kind(), "Diagnostic generation unusable, using catalog");
                }
                Err(e) => {
                    warn!(chat_id = %chat_id, error = %e, "Diagnostic generation failed, using catalog");
                }
            }
        }

        self.catalog.diagnostic_questions().to_vec()
    }

    /// Cases already held by `progress`, else generated, else the catalog's
    /// cases for `skill`. May be empty.
    pub async fn ensure_training_cases(
        &self,
        chat_id: ChatId,
        progress: &ConversationProgress,
        skill: &str,
    ) -> Vec<String> {
        if !progress.training_cases.is_empty() {
            return progress.training_cases.clone();
        }

        if let Some(generator) = &self.generator {
            let context = self.context(chat_id, progress, skill);
            match generator
                .generate_cases(&context, self.limits.training_cases)
                .await
            {
                Ok(GenerationResult::Ok(cases)) => {
                    let cases = normalize_texts(cases, self.limits.training_cases);
                    if !cases.is_empty() {
                        info!(chat_id = %chat_id, skill = %skill, count = cases.len(), "Generated training cases");
                        return cases;
                    }
                    warn!(chat_id = %chat_id, skill = %skill, "Generated cases were blank, using catalog");
                }
                Ok(other) => {
                    warn!(chat_id = %chat_id, skill = %skill, result = other.kind(), "Case generation unusable, using catalog");
                }
                Err(e) => {
                    warn!(chat_id = %chat_id, skill = %skill, error = %e, "Case generation failed, using catalog");
                }
            }
        }

        self.catalog.cases_for(skill).to_vec()
    }

    /// Summary of a finished diagnostic: generated, else interpreted from the
    /// chosen options.
    pub async fn diagnostic_summary(
        &self,
        chat_id: ChatId,
        progress: &ConversationProgress,
    ) -> String {
        if let Some(generator) = &self.generator {
            let context = self.context(chat_id, progress, &progress.skill);
            match generator.summarize_diagnostic(&context, progress).await {
                Ok(GenerationResult::Ok(parts)) => {
                    if let Some(summary) = normalize_texts(parts, 1).pop() {
                        return summary;
                    }
                    warn!(chat_id = %chat_id, "Generated diagnostic summary was blank, interpreting locally");
                }
                Ok(other) => {
                    warn!(chat_id = %chat_id, result = other.kind(), "Diagnostic summary unusable, interpreting locally");
                }
                Err(e) => {
                    warn!(chat_id = %chat_id, error = %e, "Diagnostic summary failed, interpreting locally");
                }
            }
        }

        interpret_diagnostic(progress, &self.catalog.diagnostic_positive_markers)
    }
}

fn normalize_texts(items: Vec<String>, limit: usize) -> Vec<String> {
    items
        .into_iter()
        .map(|item| item.trim().to_string())
        .filter(|item| !item.is_empty())
        .take(limit)
        .collect()
}

fn normalize_questions(
    questions: Vec<DiagnosticQuestion>,
    limits: ContentLimits,
) -> Vec<DiagnosticQuestion> {
    questions
        .into_iter()
        .filter_map(|q| {
            let options = normalize_texts(q.options, limits.options_per_question);
            let text = q.text.trim();
            (!text.is_empty() && !options.is_empty()).then(|| DiagnosticQuestion::new(text, options))
        })
        .take(limits.diagnostic_questions)
        .collect()
}
