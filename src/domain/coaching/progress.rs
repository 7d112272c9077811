//! Per-conversation progress record.
//!
//! `ConversationProgress` tracks four orthogonal axes of a coaching dialogue:
//!
//! - **Sphere**: unset, awaiting free text (`sphere_pending`), or chosen
//! - **Skill**: unset, awaiting free text (`skill_pending`), or chosen
//! - **Diagnostic**: not started, in progress (`answers.len()` is the current
//!   question), or done
//! - **Training**: idle, a case pending at `training_index`, or exhausted once
//!   the index passes the end of `training_cases`
//!
//! The mutation methods here are the only way the progress store changes a
//! record, so the reset cascades live in one place: entering the pending state
//! of an earlier stage clears every later stage, never the other way round.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::Timestamp;

/// Sphere used until the user picks one.
pub const DEFAULT_SPHERE: &str = "general";

/// Skill used until the user picks one.
pub const DEFAULT_SKILL: &str = "feedback";

/// One multiple-choice diagnostic question.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosticQuestion {
    pub text: String,
    pub options: Vec<String>,
}

impl DiagnosticQuestion {
    pub fn new<I, S>(text: impl Into<String>, options: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            text: text.into(),
            options: options.into_iter().map(Into::into).collect(),
        }
    }
}

/// Result of recording one diagnostic answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerOutcome {
    /// Answer stored; `next` is the index of the question to ask now.
    Recorded { next: usize },
    /// Answer stored and every question now has an answer.
    AllAnswered,
    /// Not the answer expected next (duplicate, out of order, or unknown
    /// option); nothing was stored.
    Rejected { expected: usize },
}

/// Durable state of one conversation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ConversationProgress {
    pub sphere: String,
    pub sphere_chosen: bool,
    pub sphere_pending: bool,

    pub skill: String,
    pub skill_chosen: bool,
    pub skill_pending: bool,

    pub diagnostic_questions: Vec<DiagnosticQuestion>,
    /// Encoded as `"<question>:<option>"`, one per answered question.
    pub diagnostic_answers: Vec<String>,
    pub diagnostic_done: bool,

    pub training_cases: Vec<String>,
    pub training_index: usize,
    pub training_case_pending: bool,

    pub last_reminder: Option<Timestamp>,
}

impl Default for ConversationProgress {
    fn default() -> Self {
        Self {
            sphere: DEFAULT_SPHERE.to_string(),
            sphere_chosen: false,
            sphere_pending: false,
            skill: DEFAULT_SKILL.to_string(),
            skill_chosen: false,
            skill_pending: false,
            diagnostic_questions: Vec::new(),
            diagnostic_answers: Vec::new(),
            diagnostic_done: false,
            training_cases: Vec::new(),
            training_index: 0,
            training_case_pending: false,
            last_reminder: None,
        }
    }
}

impl ConversationProgress {
    // ─────────────────────────────────────────────────────────────────────
    // Sphere axis
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_sphere(&mut self, sphere: impl Into<String>) {
        self.sphere = sphere.into();
        self.sphere_chosen = true;
        self.sphere_pending = false;
        self.diagnostic_questions.clear();
    }

    /// Entering sphere input resets every later stage.
    pub fn set_sphere_pending(&mut self, pending: bool) {
        self.sphere_pending = pending;
        if pending {
            self.sphere_chosen = false;
            self.skill_pending = false;
            self.diagnostic_questions.clear();
            self.training_case_pending = false;
            self.training_index = 0;
            self.training_cases.clear();
        }
    }

    /// True while a free-text sphere is expected.
    pub fn awaiting_sphere(&self) -> bool {
        self.sphere_pending && !self.sphere_chosen
    }

    // ─────────────────────────────────────────────────────────────────────
    // Skill axis
    // ─────────────────────────────────────────────────────────────────────

    pub fn set_skill(&mut self, skill: impl Into<String>) {
        self.skill = skill.into();
        self.skill_chosen = true;
        self.skill_pending = false;
        self.training_cases.clear();
        self.training_index = 0;
        self.training_case_pending = false;
    }

    /// Entering skill input clears the chosen skill and any pending case.
    /// The sphere is left alone.
    pub fn set_skill_pending(&mut self, pending: bool) {
        self.skill_pending = pending;
        if pending {
            self.skill_chosen = false;
            self.training_case_pending = false;
        }
    }

    /// True while a free-text skill is expected.
    pub fn awaiting_skill(&self) -> bool {
        self.skill_pending && !self.skill_chosen
    }

    // ─────────────────────────────────────────────────────────────────────
    // Diagnostic axis
    // ─────────────────────────────────────────────────────────────────────

    pub fn reset_diagnostic(&mut self) {
        self.diagnostic_questions.clear();
        self.diagnostic_answers.clear();
        self.diagnostic_done = false;
    }

    pub fn set_diagnostic_questions(&mut self, questions: Vec<DiagnosticQuestion>) {
        self.diagnostic_questions = questions;
    }

    /// Appends an answer only when it is for the next unanswered question and
    /// names an existing option.
    pub fn record_diagnostic_answer(&mut self, question: usize, option: usize) -> AnswerOutcome {
        let expected = self.diagnostic_answers.len();
        let valid_option = self
            .diagnostic_questions
            .get(question)
            .is_some_and(|q| option < q.options.len());

        if question != expected || !valid_option {
            return AnswerOutcome::Rejected { expected };
        }

        self.diagnostic_answers.push(format!("{question}:{option}"));
        let next = self.diagnostic_answers.len();
        if next == self.diagnostic_questions.len() {
            AnswerOutcome::AllAnswered
        } else {
            AnswerOutcome::Recorded { next }
        }
    }

    pub fn complete_diagnostic(&mut self) {
        self.diagnostic_done = true;
    }

    /// Option index chosen for a question, if answered.
    pub fn chosen_option(&self, question: usize) -> Option<usize> {
        self.diagnostic_answers
            .get(question)
            .and_then(|a| a.rsplit(':').next())
            .and_then(|o| o.parse().ok())
    }

    /// Text of each chosen option, in question order.
    pub fn chosen_option_texts(&self) -> Vec<&str> {
        self.diagnostic_questions
            .iter()
            .enumerate()
            .filter_map(|(idx, q)| {
                self.chosen_option(idx)
                    .and_then(|o| q.options.get(o))
                    .map(String::as_str)
            })
            .collect()
    }

    // ─────────────────────────────────────────────────────────────────────
    // Training axis
    // ─────────────────────────────────────────────────────────────────────

    /// Moves to the next case and marks it pending. Returns the new index.
    pub fn increment_training(&mut self) -> usize {
        self.training_index += 1;
        self.training_case_pending = true;
        self.training_index
    }

    pub fn set_training_pending(&mut self, pending: bool) {
        self.training_case_pending = pending;
    }

    pub fn set_training_cases(&mut self, cases: Vec<String>) {
        self.training_cases = cases;
    }

    /// Back to the first case, pending. Optionally drops the cached cases so
    /// they are fetched again.
    pub fn restart_training(&mut self, clear_cases: bool) {
        self.training_index = 0;
        self.training_case_pending = true;
        if clear_cases {
            self.training_cases.clear();
        }
    }

    /// Case at the current index, if there is one.
    pub fn current_case(&self) -> Option<&str> {
        self.training_cases
            .get(self.training_index)
            .map(String::as_str)
    }

    pub fn cases_exhausted(&self) -> bool {
        self.training_index >= self.training_cases.len()
    }

    pub fn set_last_reminder(&mut self, at: Timestamp) {
        self.last_reminder = Some(at);
    }
}
