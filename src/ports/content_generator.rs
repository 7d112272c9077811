//! Content Generator Port - Generated coaching content.
//!
//! A generator turns a conversation's context into diagnostic questions,
//! training cases, a diagnostic summary or feedback actions, and serves
//! skill practice with situations and scored feedback. Transport
//! problems are `AIError`s; a response that arrived but is unusable is
//! reported as [`GenerationResult::Empty`] or [`GenerationResult::Malformed`]
//! so callers handle every outcome explicitly.

use async_trait::async_trait;

use crate::domain::coaching::{ConversationProgress, DiagnosticQuestion, OutputAction};
use crate::domain::foundation::ChatId;
use crate::domain::practice::{PracticeSkill, ScoredFeedback};
use crate::ports::AIError;

/// Outcome of a generation call that reached the backend.
#[derive(Debug, Clone, PartialEq)]
pub enum GenerationResult<T> {
    /// At least one usable item.
    Ok(Vec<T>),
    /// The backend answered with nothing usable.
    Empty,
    /// The backend answered with something that could not be parsed.
    Malformed(String),
}

impl<T> GenerationResult<T> {
    /// Wraps parsed items, mapping an empty list to `Empty`.
    pub fn from_items(items: Vec<T>) -> Self {
        if items.is_empty() {
            Self::Empty
        } else {
            Self::Ok(items)
        }
    }

    /// Short label for logs.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Ok(_) => "ok",
            Self::Empty => "empty",
            Self::Malformed(_) => "malformed",
        }
    }
}

/// What the generator knows about the conversation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerationContext {
    pub chat_id: ChatId,
    pub sphere: String,
    pub skill: String,
}

impl GenerationContext {
    pub fn new(chat_id: ChatId, sphere: impl Into<String>, skill: impl Into<String>) -> Self {
        Self {
            chat_id,
            sphere: sphere.into(),
            skill: skill.into(),
        }
    }
}

/// Port for generated coaching content.
#[async_trait]
pub trait ContentGenerator: Send + Sync {
    /// Up to `count` questions with up to `options` options each.
    async fn generate_diagnostic(
        &self,
        context: &GenerationContext,
        count: usize,
        options: usize,
    ) -> Result<GenerationResult<DiagnosticQuestion>, AIError>;

    /// Up to `count` training cases for the context's skill and sphere.
    async fn generate_cases(
        &self,
        context: &GenerationContext,
        count: usize,
    ) -> Result<GenerationResult<String>, AIError>;

    /// A one-item result holding the summary text of a finished diagnostic.
    async fn summarize_diagnostic(
        &self,
        context: &GenerationContext,
        progress: &ConversationProgress,
    ) -> Result<GenerationResult<String>, AIError>;

    /// Feedback actions for an answer to a case.
    async fn evaluate_answer(
        &self,
        context: &GenerationContext,
        case_text: &str,
        answer: &str,
    ) -> Result<GenerationResult<OutputAction>, AIError>;

    /// A one-item result holding a practice situation for `skill`.
    async fn generate_situation(
        &self,
        chat_id: ChatId,
        skill: &PracticeSkill,
    ) -> Result<GenerationResult<String>, AIError>;

    /// A one-item result scoring an answer to a practice situation.
    async fn score_answer(
        &self,
        chat_id: ChatId,
        skill: &PracticeSkill,
        situation: &str,
        answer: &str,
    ) -> Result<GenerationResult<ScoredFeedback>, AIError>;
}
