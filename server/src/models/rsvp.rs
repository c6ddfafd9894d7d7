use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct RsvpRow {
    pub id: Uuid,
    pub event_id: Uuid,
    pub user_id: Uuid,
    pub created_at: DateTime<Utc>,
}

/// What the viewer sees next to an event: their own registration flag and the
/// number of registrations, alongside the (unenforced) capacity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct RsvpState {
    pub rsvped: bool,
    pub count: i64,
    pub capacity: Option<u32>,
}
