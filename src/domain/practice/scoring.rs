//! Scores for practice answers.

use serde::{Deserialize, Serialize};

/// Lowest and highest score on the practice scale.
pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 10;

/// Score given when the model omits one.
pub const DEFAULT_SCORE: u8 = 5;

const BRIEF_WORDS: usize = 20;
const DETAILED_WORDS: usize = 50;

/// Feedback text with its score.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoredFeedback {
    pub score: u8,
    pub feedback: String,
}

impl ScoredFeedback {
    /// Clamps the score onto the practice scale.
    pub fn new(score: i64, feedback: impl Into<String>) -> Self {
        let score = score.clamp(MIN_SCORE as i64, MAX_SCORE as i64) as u8;
        Self {
            score,
            feedback: feedback.into(),
        }
    }
}

/// Scores an answer by its length alone.
pub fn score_by_length(answer: &str) -> ScoredFeedback {
    let words = answer.split_whitespace().count();
    if words < BRIEF_WORDS {
        ScoredFeedback::new(
            3,
            "Ответ слишком краткий. Попробуйте дать более развёрнутый ответ с конкретными примерами и действиями.",
        )
    } else if words < DETAILED_WORDS {
        ScoredFeedback::new(
            5,
            "Неплохо, но можно добавить больше конкретики. Опишите конкретные шаги и ожидаемые результаты.",
        )
    } else {
        ScoredFeedback::new(
            7,
            "Хороший развёрнутый ответ. Продолжайте практиковаться для закрепления навыка.",
        )
    }
}
