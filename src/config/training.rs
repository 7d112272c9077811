//! Training and answer-scoring configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Knobs for heuristic scoring, catalog loading and event replay.
#[derive(Debug, Clone, Deserialize)]
pub struct TrainingConfig {
    /// Comma-separated keywords that earn a point when found in an answer
    #[serde(default = "default_positive_keywords")]
    pub positive_keywords: String,

    /// Minimum score for a "good" verdict
    #[serde(default = "default_good_score")]
    pub good_score: u32,

    /// Answers with more words than this earn one extra point
    #[serde(default = "default_long_answer_words")]
    pub long_answer_words: usize,

    /// Optional YAML file replacing the built-in catalog
    pub catalog_path: Option<String>,

    /// Optional YAML file replacing the built-in skill practice library
    pub skill_library_path: Option<String>,

    /// Number of answered event ids remembered for replay
    #[serde(default = "default_replay_cache_size")]
    pub replay_cache_size: usize,
}

impl TrainingConfig {
    /// Keywords as a lower-cased list
    pub fn positive_keywords_list(&self) -> Vec<String> {
        self.positive_keywords
            .split(',')
            .map(|kw| kw.trim().to_lowercase())
            .filter(|kw| !kw.is_empty())
            .collect()
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.good_score == 0 {
            return Err(ValidationError::ZeroCount("training.good_score"));
        }
        Ok(())
    }
}

impl Default for TrainingConfig {
    fn default() -> Self {
        Self {
            positive_keywords: default_positive_keywords(),
            good_score: default_good_score(),
            long_answer_words: default_long_answer_words(),
            catalog_path: None,
            skill_library_path: None,
            replay_cache_size: default_replay_cache_size(),
        }
    }
}

fn default_positive_keywords() -> String {
    "конструктив,конкретно,действия,пример,ожидания".to_string()
}

fn default_good_score() -> u32 {
    2
}

fn default_long_answer_words() -> usize {
    12
}

fn default_replay_cache_size() -> usize {
    1024
}
