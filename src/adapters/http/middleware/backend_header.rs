//! Backend identification header.
//!
//! Every response, errors included, carries `X-Backend: skill-coach` so the
//! transport can tell which backend answered.

use axum::{
    extract::Request,
    http::{HeaderName, HeaderValue},
    middleware::Next,
    response::Response,
};

pub static X_BACKEND: HeaderName = HeaderName::from_static("x-backend");

pub const BACKEND_NAME: &str = "skill-coach";

pub async fn backend_header_middleware(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    response
        .headers_mut()
        .insert(X_BACKEND.clone(), HeaderValue::from_static(BACKEND_NAME));
    response
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::{body::Body, http::StatusCode, middleware, routing::get, Router};
    use tower::ServiceExt;

    #[tokio::test]
    async fn header_is_added_to_not_found_responses() {
        let app = Router::new()
            .route("/", get(|| async { "ok" }))
            .layer(middleware::from_fn(backend_header_middleware));

        let response = app
            .oneshot(
                axum::http::Request::builder()
                    .uri("/missing")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(response.headers()[&X_BACKEND], BACKEND_NAME);
    }
}
