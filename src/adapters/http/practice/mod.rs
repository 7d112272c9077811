//! Skill practice HTTP adapter: the skill library, situations, answers and
//! progress.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    BlocksResponse, FeedbackResponse, GenerateSituationRequest, ProgressResponse,
    SessionDetailResponse, SessionSummary, SessionsParams, SessionsResponse, SituationResponse,
    SkillSummary, SubmitAnswerRequest,
};
pub use handlers::PracticeHandlers;
pub use routes::practice_routes;
