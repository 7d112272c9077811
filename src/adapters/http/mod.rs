//! HTTP adapters - REST API implementations.
//!
//! [`router`] assembles the coaching and practice endpoints with request
//! tracing, a request timeout and the backend header.

pub mod coaching;
pub mod middleware;
pub mod practice;

use std::time::Duration;

use axum::{middleware::from_fn, Router};
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};

pub use coaching::{coaching_routes, CoachingHandlers};
pub use practice::{practice_routes, PracticeHandlers};

/// The full application router.
pub fn router(
    coaching: CoachingHandlers,
    practice: PracticeHandlers,
    request_timeout: Duration,
) -> Router {
    coaching_routes(coaching)
        .merge(practice_routes(practice))
        .layer(TimeoutLayer::new(request_timeout))
        .layer(TraceLayer::new_for_http())
        .layer(from_fn(middleware::backend_header_middleware))
}
