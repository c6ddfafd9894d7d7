use axum::extract::rejection::JsonRejection;
use axum::extract::{Path, Query, State};
use axum::response::Response;
use axum::Json;
use uuid::Uuid;

use crate::auth::CurrentUser;
use crate::services::filter::{EventFilter, ListEventsParams};
use crate::services::listing;
use crate::services::submission::{self, SubmissionForm};
use crate::state::AppState;
use crate::utils::error::{AppError, AppResult};
use crate::utils::response::{created, success};

pub async fn list_events(
    State(state): State<AppState>,
    Query(params): Query<ListEventsParams>,
) -> AppResult<Response> {
    let filter = EventFilter::try_from(params)?;
    let listing = listing::list_events(state.store.as_ref(), &filter).await?;
    let message = format!(
        "{} event{} found",
        listing.count,
        if listing.count == 1 { "" } else { "s" }
    );
    Ok(success(listing, message))
}

pub async fn get_event(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<Uuid>,
) -> AppResult<Response> {
    let detail = listing::event_detail(state.store.as_ref(), id, user.viewer()).await?;
    Ok(success(detail, "Event loaded"))
}

pub async fn submit_event(
    State(state): State<AppState>,
    user: CurrentUser,
    form: Result<Json<SubmissionForm>, JsonRejection>,
) -> AppResult<Response> {
    let viewer = user.viewer().ok_or_else(AppError::auth_required)?;
    let Json(form) = form?;

    let submitted = submission::submit(state.store.as_ref(), Some(viewer), form).await?;
    Ok(created(
        submitted,
        "Event submitted successfully! It will be reviewed by our admin team.",
    ))
}
