//! HTTP handlers for the membership and prompt endpoints.
//!
//! Response bodies use a flat `{"code": ..., "msg": ...}` envelope; the
//! check endpoint answers `{"code": 200, "allowed": ..., "promptwords": ...}`.

use axum::{
    Json,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use tracing::{error, info, warn};

use regiongate_storage::{MembershipError, PromptError, RegionCode};

use crate::server::AppState;

#[derive(Debug, Deserialize)]
pub struct RegionRequest {
    pub regioncode: String,
}

#[derive(Debug, Deserialize)]
pub struct PromptRequest {
    pub prompt: String,
}

#[derive(Serialize)]
pub struct HealthResponse<'a> {
    status: &'a str,
}

pub async fn root() -> impl IntoResponse {
    let body = json!({
        "service": "RegionGate",
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    });
    (StatusCode::OK, Json(body))
}

pub async fn healthz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ok" }))
}

pub async fn readyz() -> impl IntoResponse {
    (StatusCode::OK, Json(HealthResponse { status: "ready" }))
}

fn envelope(status: StatusCode, msg: &str) -> (StatusCode, Json<Value>) {
    (
        status,
        Json(json!({ "code": status.as_u16(), "msg": msg })),
    )
}

fn parse_region_code(raw: String, operation: &str) -> Result<RegionCode, Response> {
    RegionCode::new(raw).map_err(|e| {
        warn!(error = %e, operation, "invalid region code");
        envelope(StatusCode::BAD_REQUEST, "invalid region code").into_response()
    })
}

/// `POST /ratelimit/open`: marks a region code as allowed.
pub async fn open_region(
    State(state): State<AppState>,
    Json(req): Json<RegionRequest>,
) -> Response {
    let code = match parse_region_code(req.regioncode, "open") {
        Ok(c) => c,
        Err(rejection) => return rejection,
    };

    match state.memberships.insert(&code).await {
        Ok(sync) => {
            if sync.is_degraded() {
                warn!(code = %code, "region opened with degraded cache");
            }
            info!(code = %code, "region opened");
            envelope(StatusCode::OK, "region opened").into_response()
        }
        Err(MembershipError::AlreadyExists { .. }) => {
            warn!(code = %code, "open rejected: region already exists");
            envelope(StatusCode::CONFLICT, "already exists").into_response()
        }
        Err(MembershipError::Store(e)) => {
            error!(code = %code, error = %e, category = %e.category(), "insert failed");
            envelope(StatusCode::INTERNAL_SERVER_ERROR, "insert failed").into_response()
        }
    }
}

/// `POST /ratelimit/close`: marks a region code as denied.
///
/// Closing a region that was never opened succeeds; deletion is idempotent.
pub async fn close_region(
    State(state): State<AppState>,
    Json(req): Json<RegionRequest>,
) -> Response {
    let code = match parse_region_code(req.regioncode, "close") {
        Ok(c) => c,
        Err(rejection) => return rejection,
    };

    match state.memberships.delete(&code).await {
        Ok(sync) => {
            if sync.is_degraded() {
                warn!(code = %code, "region closed with degraded cache");
            }
            info!(code = %code, "region closed");
            envelope(StatusCode::OK, "region closed").into_response()
        }
        Err(e) => {
            error!(code = %code, error = %e, "delete failed");
            envelope(StatusCode::INTERNAL_SERVER_ERROR, "delete failed").into_response()
        }
    }
}

/// `POST /ratelimit/check`: answers whether a region code is allowed.
///
/// Public. The prompt text rides along; its failures are swallowed to an
/// empty string and never affect the membership answer.
pub async fn check_region(
    State(state): State<AppState>,
    Json(req): Json<RegionRequest>,
) -> Response {
    let code = match parse_region_code(req.regioncode, "check") {
        Ok(c) => c,
        Err(rejection) => return rejection,
    };

    let lookup = match state.memberships.exists(&code).await {
        Ok(l) => l,
        Err(e) => {
            error!(code = %code, error = %e, "check failed");
            return envelope(StatusCode::INTERNAL_SERVER_ERROR, "check failed").into_response();
        }
    };

    let prompt = match state.prompt.get().await {
        Ok(text) => text,
        Err(e) => {
            warn!(error = %e, "prompt text unavailable, returning empty");
            String::new()
        }
    };

    info!(code = %code, allowed = lookup.allowed, source = ?lookup.source, "region checked");
    (
        StatusCode::OK,
        Json(json!({
            "code": 200,
            "allowed": lookup.allowed,
            "promptwords": prompt,
        })),
    )
        .into_response()
}

/// `POST /ratelimit/prompt`: write-through prompt update.
pub async fn update_prompt(
    State(state): State<AppState>,
    Json(req): Json<PromptRequest>,
) -> Response {
    match state.prompt.set(&req.prompt).await {
        Ok(()) => {
            info!("prompt updated");
            envelope(StatusCode::OK, "prompt updated").into_response()
        }
        Err(PromptError::Cache(e)) => {
            error!(error = %e, "prompt cache write failed");
            envelope(StatusCode::INTERNAL_SERVER_ERROR, "cache write failed").into_response()
        }
        Err(PromptError::File(e)) => {
            error!(error = %e, "prompt file write failed");
            envelope(StatusCode::INTERNAL_SERVER_ERROR, "file write failed").into_response()
        }
        Err(e) => {
            error!(error = %e, "prompt update failed");
            envelope(StatusCode::INTERNAL_SERVER_ERROR, "prompt update failed").into_response()
        }
    }
}
