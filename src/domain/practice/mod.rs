//! Skill practice: a library of skill blocks, one-situation practice
//! sessions and answer scoring.

mod library;
mod scoring;
mod session;

pub use library::{BlockOverview, PracticeSkill, SkillBlock, SkillLibrary};
pub use scoring::{score_by_length, ScoredFeedback, DEFAULT_SCORE, MAX_SCORE, MIN_SCORE};
pub use session::{
    summarize_progress, FeedbackSource, PracticeAnswer, PracticeSession, SessionStatus,
    SkillProgress,
};
