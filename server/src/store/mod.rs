//! Persistence boundary for events, RSVPs, roles and clubs.
//!
//! Services only ever see [`EventStore`]; the PostgreSQL implementation backs
//! the running server and [`MemoryStore`] backs the tests.

use async_trait::async_trait;
use chrono::NaiveDate;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{Club, EventRow, EventStatus, NewEvent, Role, RsvpRow};

pub mod memory;
pub mod postgres;

pub use memory::MemoryStore;
pub use postgres::PgEventStore;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("database error")]
    Database(#[from] sqlx::Error),

    /// The row already exists (duplicate RSVP for the same user and event).
    #[error("row already exists")]
    Conflict,

    #[error("row not found")]
    NotFound,
}

pub type StoreResult<T> = Result<T, StoreError>;

#[async_trait]
pub trait EventStore: Send + Sync {
    /// Approved events, ascending by date, optionally restricted to one day.
    async fn list_approved_events(&self, date: Option<NaiveDate>) -> StoreResult<Vec<EventRow>>;

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<EventRow>>;

    async fn count_rsvps(&self, event_id: Uuid) -> StoreResult<i64>;

    async fn get_user_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<RsvpRow>>;

    /// Fails with [`StoreError::Conflict`] when the pair is already registered
    /// and with [`StoreError::NotFound`] when the event does not exist.
    async fn insert_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    async fn delete_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()>;

    /// Inserts with `pending` status and returns the new id.
    async fn insert_event(&self, event: NewEvent) -> StoreResult<Uuid>;

    /// Moves a pending event to `status`. Fails with [`StoreError::NotFound`]
    /// when no pending event has that id.
    async fn update_event_status(&self, id: Uuid, status: EventStatus) -> StoreResult<()>;

    /// Pending submissions, newest first.
    async fn list_pending_events(&self) -> StoreResult<Vec<EventRow>>;

    async fn get_user_role(&self, user_id: Uuid) -> StoreResult<Option<Role>>;

    /// Every event the user holds an RSVP for, ascending by date.
    async fn list_rsvped_events(&self, user_id: Uuid) -> StoreResult<Vec<EventRow>>;

    /// Clubs ordered by rating, then review count, both descending.
    async fn list_clubs(&self) -> StoreResult<Vec<Club>>;
}
