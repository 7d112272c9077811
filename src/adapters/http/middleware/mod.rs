//! HTTP middleware for axum.
//!
//! This module contains middleware layers for cross-cutting concerns:
//!
//! - `backend_header` - Tags every response with the backend name

pub mod backend_header;

pub use backend_header::{backend_header_middleware, BACKEND_NAME, X_BACKEND};
