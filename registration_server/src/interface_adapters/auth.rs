use axum::{
    extract::{Request, State},
    http::{header::AUTHORIZATION, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
    Json,
};
use subtle::ConstantTimeEq;

use crate::interface_adapters::protocol::ErrorResponse;
use crate::interface_adapters::state::AppState;

// Guards admin routes with the configured bearer token.
pub async fn require_admin(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let presented = req
        .headers()
        .get(AUTHORIZATION)
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "));

    match presented {
        Some(token) if token_matches(token, &state.policy.admin_token) => next.run(req).await,
        Some(_) => {
            tracing::warn!(path = %req.uri().path(), "rejected admin request with wrong token");
            unauthorized()
        }
        None => unauthorized(),
    }
}

fn token_matches(presented: &str, expected: &str) -> bool {
    // An empty configured token never authorizes anything.
    !expected.is_empty() && bool::from(presented.as_bytes().ct_eq(expected.as_bytes()))
}

fn unauthorized() -> Response {
    (
        StatusCode::UNAUTHORIZED,
        Json(ErrorResponse {
            message: "admin authentication required".to_string(),
            errors: Vec::new(),
        }),
    )
        .into_response()
}
