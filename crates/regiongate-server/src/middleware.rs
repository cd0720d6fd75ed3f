//! Request middleware: request ids and the admin secret gate.

use axum::{
    Json,
    body::Body,
    extract::State,
    http::{HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use serde_json::json;
use uuid::Uuid;

use crate::server::AppState;

/// Header carrying the shared admin secret on privileged requests.
///
/// Header names are matched case-insensitively, so clients may send
/// `secretKey` as well.
pub const ADMIN_SECRET_HEADER: &str = "secretkey";

/// Attaches a request id to every request and response.
pub async fn request_id(mut req: Request<Body>, next: Next) -> Response {
    let header_name = HeaderName::from_static("x-request-id");

    // If the incoming request already has a request-id, preserve it; otherwise generate one
    let req_id_value = req
        .headers()
        .get(&header_name)
        .cloned()
        .unwrap_or_else(|| HeaderValue::from_str(&Uuid::new_v4().to_string()).unwrap());

    // Add to request extensions for downstream usage (e.g., logging)
    req.extensions_mut().insert(req_id_value.clone());

    let mut res = next.run(req).await;

    // Add/propagate the request id header to response
    res.headers_mut().insert(header_name, req_id_value);

    res
}

/// Rejects privileged requests whose `secretKey` header does not match the
/// secret recovered at startup.
///
/// The comparison target is decrypted once during bootstrap; this
/// middleware never touches the ciphertext.
pub async fn require_admin_secret(
    State(state): State<AppState>,
    req: Request<Body>,
    next: Next,
) -> Response {
    let authorized = req
        .headers()
        .get(ADMIN_SECRET_HEADER)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|value| state.admin.verify(value));

    if authorized {
        next.run(req).await
    } else {
        tracing::warn!(path = %req.uri().path(), "unauthorized access to privileged route");
        (
            StatusCode::UNAUTHORIZED,
            Json(json!({ "code": 401, "msg": "unauthorized" })),
        )
            .into_response()
    }
}
