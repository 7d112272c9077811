//! Coaching HTTP adapter: event ingestion, health, metrics and history.

mod dto;
mod handlers;
mod routes;

pub use dto::{
    ConversationsResponse, ErrorResponse, EventDto, HealthResponse, HistoryParams,
    HistoryResponse, IngestPayload, IngestResponse, UserDto,
};
pub use handlers::CoachingHandlers;
pub use routes::coaching_routes;
