use tracing::{debug, info};
use uuid::Uuid;

use crate::models::{EventRow, EventStatus, RsvpState, Viewer};
use crate::store::{EventStore, StoreError};
use crate::utils::error::{AppError, AppResult};

async fn approved_event(store: &dyn EventStore, event_id: Uuid) -> AppResult<EventRow> {
    store
        .get_event(event_id)
        .await?
        .filter(|e| e.status == EventStatus::Approved)
        .ok_or_else(|| AppError::event_not_found(event_id))
}

fn capacity_of(event: &EventRow) -> Option<u32> {
    event.capacity.and_then(|c| u32::try_from(c).ok())
}

/// Current registration state of `event_id` as seen by `viewer`.
pub async fn status(
    store: &dyn EventStore,
    event_id: Uuid,
    viewer: Option<&Viewer>,
) -> AppResult<RsvpState> {
    let event = approved_event(store, event_id).await?;

    let rsvped = match viewer {
        Some(viewer) => store.get_user_rsvp(event_id, viewer.id).await?.is_some(),
        None => false,
    };
    let count = store.count_rsvps(event_id).await?;

    Ok(RsvpState {
        rsvped,
        count,
        capacity: capacity_of(&event),
    })
}

/// Flips the viewer's registration from `currently_rsvped`.
///
/// A duplicate insert is absorbed, and the returned count is always re-read
/// from the store rather than adjusted locally. Capacity is never enforced.
#[tracing::instrument(skip(store, viewer), fields(user_id = tracing::field::Empty))]
pub async fn toggle(
    store: &dyn EventStore,
    event_id: Uuid,
    viewer: Option<&Viewer>,
    currently_rsvped: bool,
) -> AppResult<RsvpState> {
    let viewer = viewer.ok_or_else(AppError::auth_required)?;
    tracing::Span::current().record("user_id", tracing::field::display(viewer.id));

    let event = approved_event(store, event_id).await?;

    let rsvped = if currently_rsvped {
        store.delete_rsvp(event_id, viewer.id).await?;
        info!("RSVP cancelled");
        false
    } else {
        match store.insert_rsvp(event_id, viewer.id).await {
            Ok(()) => info!("RSVP registered"),
            Err(StoreError::Conflict) => debug!("RSVP already present, nothing to insert"),
            Err(e) => return Err(e.into()),
        }
        true
    };

    let count = store.count_rsvps(event_id).await?;

    Ok(RsvpState {
        rsvped,
        count,
        capacity: capacity_of(&event),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::fixtures::row;
    use crate::store::MemoryStore;

    async fn store_with_event() -> (MemoryStore, Uuid) {
        let store = MemoryStore::new();
        let event = row("Robotics Night", "2025-03-14");
        let id = event.id;
        store.put_event(event).await;
        (store, id)
    }

    #[tokio::test]
    async fn test_anonymous_toggle_is_refused_without_mutation() {
        let (store, id) = store_with_event().await;

        let result = toggle(&store, id, None, false).await;
        assert!(matches!(result, Err(AppError::AuthError(_))));
        assert_eq!(store.count_rsvps(id).await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_toggle_twice_restores_original_state() {
        let (store, id) = store_with_event().await;
        let viewer = Viewer::new(Uuid::new_v4());
        store.insert_rsvp(id, Uuid::new_v4()).await.unwrap();

        let before = status(&store, id, Some(&viewer)).await.unwrap();
        assert_eq!((before.rsvped, before.count), (false, 1));

        let on = toggle(&store, id, Some(&viewer), before.rsvped).await.unwrap();
        assert_eq!((on.rsvped, on.count), (true, 2));

        let off = toggle(&store, id, Some(&viewer), on.rsvped).await.unwrap();
        assert_eq!(off, before);
    }

    #[tokio::test]
    async fn test_stale_duplicate_insert_is_not_double_counted() {
        let (store, id) = store_with_event().await;
        let viewer = Viewer::new(Uuid::new_v4());

        let first = toggle(&store, id, Some(&viewer), false).await.unwrap();
        let second = toggle(&store, id, Some(&viewer), false).await.unwrap();

        assert!(second.rsvped);
        assert_eq!(first.count, 1);
        assert_eq!(second.count, 1);
    }

    #[tokio::test]
    async fn test_capacity_is_displayed_but_not_enforced() {
        let store = MemoryStore::new();
        let mut event = row("Tiny Seminar", "2025-03-14");
        event.capacity = Some(1);
        let id = event.id;
        store.put_event(event).await;

        for _ in 0..3 {
            toggle(&store, id, Some(&Viewer::new(Uuid::new_v4())), false)
                .await
                .unwrap();
        }

        let state = status(&store, id, None).await.unwrap();
        assert_eq!(state.count, 3);
        assert_eq!(state.capacity, Some(1));
        assert!(!state.rsvped);
    }

    #[tokio::test]
    async fn test_pending_events_cannot_be_rsvped() {
        let store = MemoryStore::new();
        let mut event = row("Not Yet", "2025-03-14");
        event.status = EventStatus::Pending;
        let id = event.id;
        store.put_event(event).await;

        let viewer = Viewer::new(Uuid::new_v4());
        let result = toggle(&store, id, Some(&viewer), false).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }
}
