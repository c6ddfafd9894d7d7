use axum::extract::{Path, State};
use axum::response::Response;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::services::approval::{self, Decision};
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::success;

pub async fn pending_events(
    State(state): State<AppState>,
    user: CurrentUser,
) -> AppResult<Response> {
    let events = approval::list_pending(state.store.as_ref(), user.viewer()).await?;
    Ok(success(events, "Pending events loaded"))
}

pub async fn approve_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let reviewed =
        approval::review(state.store.as_ref(), user.viewer(), id, Decision::Approve).await?;
    Ok(success(reviewed, "Event approved!"))
}

pub async fn reject_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let reviewed =
        approval::review(state.store.as_ref(), user.viewer(), id, Decision::Reject).await?;
    Ok(success(reviewed, "Event rejected"))
}
