use std::collections::HashMap;

use async_trait::async_trait;
use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{EventStore, StoreError, StoreResult};
use crate::models::{Club, EventRow, EventStatus, NewEvent, Role, RsvpRow};

#[derive(Default)]
struct Tables {
    events: Vec<EventRow>,
    rsvps: Vec<RsvpRow>,
    roles: HashMap<Uuid, Role>,
    clubs: Vec<Club>,
}

impl Tables {
    fn with_count(&self, row: &EventRow) -> EventRow {
        let mut row = row.clone();
        row.registered = Some(self.count(row.id));
        row
    }

    fn count(&self, event_id: Uuid) -> i64 {
        self.rsvps.iter().filter(|r| r.event_id == event_id).count() as i64
    }
}

/// In-process store with the same ordering and uniqueness rules as the
/// PostgreSQL schema.
#[derive(Default)]
pub struct MemoryStore {
    tables: RwLock<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn set_role(&self, user_id: Uuid, role: Role) {
        self.tables.write().await.roles.insert(user_id, role);
    }

    pub async fn add_club(&self, club: Club) {
        self.tables.write().await.clubs.push(club);
    }

    /// Inserts a row as-is, keeping its status.
    pub async fn put_event(&self, row: EventRow) {
        self.tables.write().await.events.push(row);
    }
}

#[async_trait]
impl EventStore for MemoryStore {
    async fn list_approved_events(&self, date: Option<NaiveDate>) -> StoreResult<Vec<EventRow>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<EventRow> = tables
            .events
            .iter()
            .filter(|e| e.status == EventStatus::Approved)
            .filter(|e| date.map_or(true, |d| e.event_date == d))
            .map(|e| tables.with_count(e))
            .collect();
        rows.sort_by_key(|e| (e.event_date, e.created_at));
        Ok(rows)
    }

    async fn get_event(&self, id: Uuid) -> StoreResult<Option<EventRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .events
            .iter()
            .find(|e| e.id == id)
            .map(|e| tables.with_count(e)))
    }

    async fn count_rsvps(&self, event_id: Uuid) -> StoreResult<i64> {
        Ok(self.tables.read().await.count(event_id))
    }

    async fn get_user_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<Option<RsvpRow>> {
        let tables = self.tables.read().await;
        Ok(tables
            .rsvps
            .iter()
            .find(|r| r.event_id == event_id && r.user_id == user_id)
            .cloned())
    }

    async fn insert_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        if !tables.events.iter().any(|e| e.id == event_id) {
            return Err(StoreError::NotFound);
        }
        if tables
            .rsvps
            .iter()
            .any(|r| r.event_id == event_id && r.user_id == user_id)
        {
            return Err(StoreError::Conflict);
        }
        tables.rsvps.push(RsvpRow {
            id: Uuid::new_v4(),
            event_id,
            user_id,
            created_at: Utc::now(),
        });
        Ok(())
    }

    async fn delete_rsvp(&self, event_id: Uuid, user_id: Uuid) -> StoreResult<()> {
        self.tables
            .write()
            .await
            .rsvps
            .retain(|r| !(r.event_id == event_id && r.user_id == user_id));
        Ok(())
    }

    async fn insert_event(&self, event: NewEvent) -> StoreResult<Uuid> {
        let id = Uuid::new_v4();
        let row = EventRow {
            id,
            title: event.title,
            description: Some(event.description),
            category: event.category,
            location: event.location,
            event_date: event.event_date,
            start_time: event.start_time,
            end_time: event.end_time,
            organizer_name: event.organizer_name,
            organizer_email: event.organizer_email,
            capacity: event.capacity,
            accessibility: Some(event.accessibility),
            prerequisites: Some(event.prerequisites),
            status: EventStatus::Pending,
            submitted_by: event.submitted_by,
            created_at: Utc::now(),
            registered: None,
        };
        self.tables.write().await.events.push(row);
        Ok(id)
    }

    async fn update_event_status(&self, id: Uuid, status: EventStatus) -> StoreResult<()> {
        let mut tables = self.tables.write().await;
        let row = tables
            .events
            .iter_mut()
            .find(|e| e.id == id && e.status == EventStatus::Pending)
            .ok_or(StoreError::NotFound)?;
        row.status = status;
        Ok(())
    }

    async fn list_pending_events(&self) -> StoreResult<Vec<EventRow>> {
        let tables = self.tables.read().await;
        // Newest first; rows inserted later win ties on the timestamp.
        let mut rows: Vec<EventRow> = tables
            .events
            .iter()
            .rev()
            .filter(|e| e.status == EventStatus::Pending)
            .map(|e| tables.with_count(e))
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        Ok(rows)
    }

    async fn get_user_role(&self, user_id: Uuid) -> StoreResult<Option<Role>> {
        Ok(self.tables.read().await.roles.get(&user_id).copied())
    }

    async fn list_rsvped_events(&self, user_id: Uuid) -> StoreResult<Vec<EventRow>> {
        let tables = self.tables.read().await;
        let mut rows: Vec<EventRow> = tables
            .events
            .iter()
            .filter(|e| {
                tables
                    .rsvps
                    .iter()
                    .any(|r| r.event_id == e.id && r.user_id == user_id)
            })
            .map(|e| tables.with_count(e))
            .collect();
        rows.sort_by_key(|e| (e.event_date, e.created_at));
        Ok(rows)
    }

    async fn list_clubs(&self) -> StoreResult<Vec<Club>> {
        let mut clubs = self.tables.read().await.clubs.clone();
        clubs.sort_by(|a, b| {
            b.rating
                .cmp(&a.rating)
                .then_with(|| b.total_reviews.cmp(&a.total_reviews))
        });
        Ok(clubs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::fixtures::new_event;

    #[tokio::test]
    async fn test_duplicate_rsvp_is_a_conflict() {
        let store = MemoryStore::new();
        let id = store
            .insert_event(new_event("Quiz Night", "2025-04-01", Uuid::new_v4()))
            .await
            .unwrap();
        let user = Uuid::new_v4();

        store.insert_rsvp(id, user).await.unwrap();
        assert!(matches!(
            store.insert_rsvp(id, user).await,
            Err(StoreError::Conflict)
        ));
        assert_eq!(store.count_rsvps(id).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_rsvp_requires_existing_event() {
        let store = MemoryStore::new();
        assert!(matches!(
            store.insert_rsvp(Uuid::new_v4(), Uuid::new_v4()).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_submitted_events_start_pending() {
        let store = MemoryStore::new();
        let id = store
            .insert_event(new_event("Quiz Night", "2025-04-01", Uuid::new_v4()))
            .await
            .unwrap();

        let row = store.get_event(id).await.unwrap().unwrap();
        assert_eq!(row.status, EventStatus::Pending);
        assert!(store.list_approved_events(None).await.unwrap().is_empty());
        assert_eq!(store.list_pending_events().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_status_update_only_moves_pending_rows() {
        let store = MemoryStore::new();
        let id = store
            .insert_event(new_event("Quiz Night", "2025-04-01", Uuid::new_v4()))
            .await
            .unwrap();

        store
            .update_event_status(id, EventStatus::Approved)
            .await
            .unwrap();
        assert!(matches!(
            store.update_event_status(id, EventStatus::Rejected).await,
            Err(StoreError::NotFound)
        ));
    }

    #[tokio::test]
    async fn test_approved_listing_is_ascending_by_date() {
        let store = MemoryStore::new();
        let submitter = Uuid::new_v4();
        for (title, date) in [("Late", "2025-06-01"), ("Early", "2025-01-15"), ("Mid", "2025-03-03")] {
            let id = store
                .insert_event(new_event(title, date, submitter))
                .await
                .unwrap();
            store
                .update_event_status(id, EventStatus::Approved)
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_approved_events(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Early", "Mid", "Late"]);

        let day = NaiveDate::from_ymd_opt(2025, 3, 3);
        let on_day = store.list_approved_events(day).await.unwrap();
        assert_eq!(on_day.len(), 1);
        assert_eq!(on_day[0].title, "Mid");
    }

    #[tokio::test]
    async fn test_same_day_events_keep_submission_order() {
        let store = MemoryStore::new();
        let submitter = Uuid::new_v4();
        for (title, start) in [("Morning Run", "9:00"), ("Brunch", "10:00")] {
            let mut event = new_event(title, "2025-03-03", submitter);
            event.start_time = start.to_string();
            let id = store.insert_event(event).await.unwrap();
            store
                .update_event_status(id, EventStatus::Approved)
                .await
                .unwrap();
        }

        let titles: Vec<String> = store
            .list_approved_events(None)
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.title)
            .collect();
        assert_eq!(titles, vec!["Morning Run", "Brunch"]);
    }
}
