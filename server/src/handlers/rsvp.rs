use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, State};
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::services::rsvp;
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::success;

#[derive(Debug, Deserialize)]
pub struct ToggleRsvp {
    /// The registration state the client is currently showing.
    pub rsvped: bool,
}

pub async fn rsvp_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let status = rsvp::status(state.store.as_ref(), id, user.viewer()).await?;
    Ok(success(status, "RSVP status loaded"))
}

pub async fn toggle_rsvp(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
    body: Result<Json<ToggleRsvp>, JsonRejection>,
) -> AppResult<Response> {
    // Anonymous callers are refused before the body is looked at.
    let viewer = user.viewer().ok_or_else(AppError::auth_required)?;
    let Json(body) = body?;

    let status = rsvp::toggle(state.store.as_ref(), id, Some(viewer), body.rsvped).await?;
    let message = if status.rsvped {
        "RSVP confirmed"
    } else {
        "RSVP cancelled"
    };
    Ok(success(status, message))
}
