//! QR badge endpoints

use axum::{extract::State, Json};
use chrono::Utc;

use crate::{
    error::AppResult,
    models::qr::{QrPayload, ScanRequest},
};

use super::AuthenticatedUser;

/// The authenticated user's badge payload, to be rendered as a QR code by
/// the client
#[utoipa::path(
    get,
    path = "/qr/badge",
    tag = "qr",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Badge payload", body = QrPayload),
        (status = 401, description = "Not authenticated")
    )
)]
pub async fn badge(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<QrPayload>> {
    let payload = state.services.qr.badge(claims.user_id, Utc::now())?;
    Ok(Json(payload))
}

/// Validate scanned badge text (operator only). Returns the member identity
/// to confirm the borrow against; each failure kind keeps the scanner armed
/// for another attempt.
#[utoipa::path(
    post,
    path = "/qr/scan",
    tag = "qr",
    security(("bearer_auth" = [])),
    request_body = ScanRequest,
    responses(
        (status = 200, description = "Validated member identity", body = QrPayload),
        (status = 400, description = "Malformed or expired payload"),
        (status = 404, description = "Unknown member")
    )
)]
pub async fn scan(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<ScanRequest>,
) -> AppResult<Json<QrPayload>> {
    claims.require_admin()?;

    let payload = state.services.qr.scan(&request.data, Utc::now())?;
    Ok(Json(payload))
}
