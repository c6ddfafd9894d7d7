use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

use super::EventCategory;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, FromRow)]
pub struct Club {
    pub id: Uuid,
    pub name: String,
    pub category: EventCategory,
    pub rating: Decimal,
    pub total_reviews: i32,
    pub events_hosted: i32,
    /// Rating change compared to the previous month.
    pub trend: Decimal,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeaderboardEntry {
    pub rank: usize,
    #[serde(flatten)]
    pub club: Club,
}
