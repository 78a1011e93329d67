//! Borrow management endpoints

use axum::{
    extract::{Path, State},
    http::StatusCode,
    Json,
};
use chrono::{Duration, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::{
    error::{AppError, AppResult},
    models::borrow::{BorrowDetails, BorrowHistory, BorrowRecord, UpdateBorrow},
};

use super::AuthenticatedUser;

/// Create borrow request, as confirmed by the operator after a scan
#[derive(Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateBorrowRequest {
    /// Borrowing user, from the validated badge
    pub user_id: i32,
    /// Selected book
    pub book_id: i32,
    /// Loan duration in days; the configured default applies when absent
    pub days: Option<i64>,
    /// Loan price; the configured default applies when absent
    pub price: Option<f64>,
}

/// Borrow response with the created record
#[derive(Serialize, ToSchema)]
pub struct BorrowResponse {
    pub record: BorrowRecord,
    pub message: String,
}

/// Create a borrow record (operator only). The loan window starts now; the
/// book flips to unavailable with the record.
#[utoipa::path(
    post,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    request_body = CreateBorrowRequest,
    responses(
        (status = 201, description = "Borrow created", body = BorrowResponse),
        (status = 400, description = "Invalid request"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Book not available")
    )
)]
pub async fn create_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Json(request): Json<CreateBorrowRequest>,
) -> AppResult<(StatusCode, Json<BorrowResponse>)> {
    claims.require_admin()?;

    let days = request
        .days
        .unwrap_or(state.config.borrows.default_duration_days);
    if days < 1 {
        return Err(AppError::Validation(
            "borrow duration must be at least one day".to_string(),
        ));
    }
    let price = request.price.unwrap_or(state.config.borrows.default_price);

    let borrow_date = Utc::now();
    let return_date = borrow_date + Duration::days(days);

    let record = state
        .services
        .borrows
        .create_borrow(request.user_id, request.book_id, borrow_date, return_date, price)
        .await?;

    Ok((
        StatusCode::CREATED,
        Json(BorrowResponse {
            record,
            message: "Book borrowed successfully".to_string(),
        }),
    ))
}

/// Return a borrowed book (operator only)
#[utoipa::path(
    post,
    path = "/borrows/{id}/return",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    responses(
        (status = 200, description = "Book returned", body = BorrowRecord),
        (status = 404, description = "Borrow record not found"),
        (status = 409, description = "Already returned")
    )
)]
pub async fn return_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
) -> AppResult<Json<BorrowRecord>> {
    claims.require_admin()?;

    let record = state.services.borrows.return_borrow(id)?;
    Ok(Json(record))
}

/// Amend a borrow record (operator only): extend the due date or correct
/// the price
#[utoipa::path(
    put,
    path = "/borrows/{id}",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "Borrow record ID")
    ),
    request_body = UpdateBorrow,
    responses(
        (status = 200, description = "Borrow updated", body = BorrowRecord),
        (status = 404, description = "Borrow record not found")
    )
)]
pub async fn update_borrow(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(id): Path<i32>,
    Json(update): Json<UpdateBorrow>,
) -> AppResult<Json<BorrowRecord>> {
    claims.require_admin()?;

    let record = state.services.borrows.update_borrow(id, update)?;
    Ok(Json(record))
}

/// All borrow records with derived lifecycle, for the operator overview
#[utoipa::path(
    get,
    path = "/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "All borrow records", body = Vec<BorrowDetails>),
        (status = 403, description = "Admin privileges required")
    )
)]
pub async fn list_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
) -> AppResult<Json<Vec<BorrowDetails>>> {
    claims.require_admin()?;

    let details = state.services.borrows.list_all(Utc::now())?;
    Ok(Json(details))
}

/// A user's borrow history, bucketed into active and completed
#[utoipa::path(
    get,
    path = "/users/{id}/borrows",
    tag = "borrows",
    security(("bearer_auth" = [])),
    params(
        ("id" = i32, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User's borrow history", body = BorrowHistory),
        (status = 404, description = "User not found")
    )
)]
pub async fn get_user_borrows(
    State(state): State<crate::AppState>,
    AuthenticatedUser(claims): AuthenticatedUser,
    Path(user_id): Path<i32>,
) -> AppResult<Json<BorrowHistory>> {
    claims.require_self_or_admin(user_id)?;

    let history = state.services.borrows.user_history(user_id, Utc::now())?;
    Ok(Json(history))
}
