use axum::extract::State;
use axum::response::Response;
use chrono::Utc;

use crate::auth::CurrentUser;
use crate::services::listing;
use crate::state::AppState;
use crate::utils::error::AppResult;
use crate::utils::response::success;

pub async fn my_events(State(state): State<AppState>, user: CurrentUser) -> AppResult<Response> {
    let today = Utc::now().date_naive();
    let mine = listing::my_events(state.store.as_ref(), user.viewer(), today).await?;
    Ok(success(mine, "Your events"))
}

pub async fn leaderboard(State(state): State<AppState>) -> AppResult<Response> {
    let entries = listing::leaderboard(state.store.as_ref()).await?;
    Ok(success(entries, "Club leaderboard"))
}
