use async_trait::async_trait;
use chrono::NaiveDate;
use sqlx::PgPool;
use uuid::Uuid;

use super::{EventStore, StoreError, StoreResult};
use crate::models::{Club, EventRow, EventStatus, NewEvent, Role, RsvpRow};

const FOREIGN_KEY_VIOLATION: &str = "23503";

const EVENT_COLUMNS: &str = "e.id, e.title, e.description, e.category, e.location, e.event_date, \
     e.start_time, e.end_time, e.organizer_name, e.organizer_email, e.capacity, \
     e.accessibility, e.prerequisites, e.status, e.submitted_by, e.created_at, \
     (SELECT COUNT(*) FROM event_rsvps r WHERE r.event_id = e.id) AS registered";

#[derive(Clone)]
pub struct PgEventStore {
    pool: PgPool,
}

impl PgEventStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

fn is_foreign_key_violation(err: &sqlx::Error) -> bool {
    matches!(err, sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION))
}

#[async_trait]
impl EventStore for PgEventStore {
    async fn list_approved_events(&self, date: Option<NaiveDate>) -> StoreResult<Vec<EventRow>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e
             WHERE e.status = 'approved' AND ($1::date IS NULL OR e.event_date = $1)
             ORDER BY e.event_date ASC, e.created_at ASC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(date)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<EventRow>> {
        let sql = format!("SELECT {EVENT_COLUMNS} FROM events e WHERE e.id = $1");
        let row = sqlx::query_as::<_, EventRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn count_rsvps(&self, event_id: Uuid) -> StoreResult<i64> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM event_rsvps WHERE event_id = $1")
            .bind(event_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    async fn get_user_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<RsvpRow>> {
        let row = sqlx::query_as::<_, RsvpRow>(
            "SELECT id, event_id, user_id, created_at FROM event_rsvps
             WHERE event_id = $1 AND user_id = $2",
        )
        .bind(event_id)
        .bind(user_id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(row)
    }

    async fn insert_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let result = sqlx::query(
            "INSERT INTO event_rsvps (id, event_id, user_id)
             VALUES ($1, $2, $3)
             ON CONFLICT (event_id, user_id) DO NOTHING",
        )
        .bind(Uuid::new_v4())
        .bind(event_id)
        .bind(user_id)
        .execute(&self.pool)
        .await
        .map_err(|e| {
            // The event row is gone.
            if is_foreign_key_violation(&e) {
                StoreError::NotFound
            } else {
                StoreError::Database(e)
            }
        })?;

        if result.rows_affected() == 0 {
            return Err(StoreError::Conflict);
        }
        Ok(())
    }

    async fn delete_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        sqlx::query("DELETE FROM event_rsvps WHERE event_id = $1 AND user_id = $2")
            .bind(event_id)
            .bind(user_id)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Uuid> {
        let (id,): (Uuid,) = sqlx::query_as(
            "INSERT INTO events (id, title, description, category, location, event_date,
                 start_time, end_time, organizer_name, organizer_email, capacity,
                 accessibility, prerequisites, status, submitted_by)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, 'pending', $14)
             RETURNING id",
        )
        .bind(Uuid::new_v4())
        .bind(&event.title)
        .bind(&event.description)
        .bind(event.category)
        .bind(event.location)
        .bind(event.event_date)
        .bind(&event.start_time)
        .bind(&event.end_time)
        .bind(&event.organizer_name)
        .bind(&event.organizer_email)
        .bind(event.capacity)
        .bind(&event.accessibility)
        .bind(&event.prerequisites)
        .bind(event.submitted_by)
        .fetch_one(&self.pool)
        .await?;
        Ok(id)
    }

    async fn update_event_status(&self, id: Uuid, status: EventStatus) -> StoreResult<()> {
        let result = sqlx::query(
            "UPDATE events SET status = $2, updated_at = NOW()
             WHERE id = $1 AND status = 'pending'",
        )
        .bind(id)
        .bind(status)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound);
        }
        Ok(())
    }

    async fn list_pending_events(&self) -> StoreResult<Vec<EventRow>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e
             WHERE e.status = 'pending'
             ORDER BY e.created_at DESC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn get_user_role(&self, user_id: Uuid) -> StoreResult<Option<Role>> {
        let role: Option<(Role,)> = sqlx::query_as("SELECT role FROM user_roles WHERE user_id = $1")
            .bind(user_id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(role.map(|(role,)| role))
    }

    async fn list_rsvped_events(&self, user_id: Uuid) -> StoreResult<Vec<EventRow>> {
        let sql = format!(
            "SELECT {EVENT_COLUMNS} FROM events e
             JOIN event_rsvps mine ON mine.event_id = e.id
             WHERE mine.user_id = $1
             ORDER BY e.event_date ASC, e.created_at ASC"
        );
        let rows = sqlx::query_as::<_, EventRow>(&sql)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(rows)
    }

    async fn list_clubs(&self) -> StoreResult<Vec<Club>> {
        let clubs = sqlx::query_as::<_, Club>(
            "SELECT id, name, category, rating, total_reviews, events_hosted, trend
             FROM clubs
             ORDER BY rating DESC, total_reviews DESC",
        )
        .fetch_all(&self.pool)
        .await?;
        Ok(clubs)
    }
}
