//! Client preference endpoints

use axum::{extract::State, Json};

use crate::{error::AppResult, storage::ThemePreference};

use super::AuthenticatedUser;

/// Get the persisted theme preference
#[utoipa::path(
    get,
    path = "/settings/theme",
    tag = "settings",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Theme preference", body = ThemePreference)
    )
)]
pub async fn get_theme(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
) -> AppResult<Json<ThemePreference>> {
    let theme = state.services.settings.get_theme()?;
    Ok(Json(theme))
}

/// Persist the theme preference
#[utoipa::path(
    put,
    path = "/settings/theme",
    tag = "settings",
    security(("bearer_auth" = [])),
    request_body = ThemePreference,
    responses(
        (status = 200, description = "Theme preference saved", body = ThemePreference)
    )
)]
pub async fn update_theme(
    State(state): State<crate::AppState>,
    AuthenticatedUser(_claims): AuthenticatedUser,
    Json(theme): Json<ThemePreference>,
) -> AppResult<Json<ThemePreference>> {
    let saved = state.services.settings.set_theme(theme)?;
    Ok(Json(saved))
}
