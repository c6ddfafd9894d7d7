use serde::Serialize;
use tracing::info;
use uuid::Uuid;

use crate::models::{Event, EventStatus, Role, Viewer};
use crate::store::{EventStore, StoreError};
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Approve,
    Reject,
}

impl Decision {
    pub fn target(self) -> EventStatus {
        match self {
            Decision::Approve => EventStatus::Approved,
            Decision::Reject => EventStatus::Rejected,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct Reviewed {
    pub id: Uuid,
    pub status: EventStatus,
    /// False when the event already carried the requested status.
    pub changed: bool,
}

/// Resolves `viewer` to an admin, refusing anonymous and non-admin callers.
pub async fn require_admin<'a>(
    store: &dyn EventStore,
    viewer: Option<&'a Viewer>,
) -> AppResult<&'a Viewer> {
    let viewer = viewer.ok_or_else(AppError::auth_required)?;
    match store.get_user_role(viewer.id).await? {
        Some(Role::Admin) => Ok(viewer),
        _ => Err(AppError::Forbidden("Access denied. Admin only.".to_string())),
    }
}

pub async fn list_pending(store: &dyn EventStore, viewer: Option<&Viewer>) -> AppResult<Vec<Event>> {
    require_admin(store, viewer).await?;
    let rows = store.list_pending_events().await?;
    Ok(rows.into_iter().map(Event::from).collect())
}

/// Moves a pending event to approved or rejected.
///
/// Repeating the decision an event already carries succeeds without a write;
/// reversing a decision is refused because both outcomes are terminal.
#[tracing::instrument(skip(store, viewer))]
pub async fn review(
    store: &dyn EventStore,
    viewer: Option<&Viewer>,
    event_id: Uuid,
    decision: Decision,
) -> AppResult<Reviewed> {
    let admin = require_admin(store, viewer).await?;
    let target = decision.target();

    let event = store
        .get_event(event_id)
        .await?
        .ok_or_else(|| AppError::event_not_found(event_id))?;

    match event.status {
        status if status == target => {
            return Ok(Reviewed {
                id: event_id,
                status,
                changed: false,
            })
        }
        status if status.is_terminal() => {
            return Err(AppError::Conflict(format!(
                "Event has already been {}",
                status.as_str()
            )))
        }
        _ => {}
    }

    match store.update_event_status(event_id, target).await {
        Ok(()) => {}
        // Someone else reviewed it between the read and the write.
        Err(StoreError::NotFound) => {
            return Err(AppError::Conflict("Event has already been reviewed".to_string()))
        }
        Err(e) => return Err(e.into()),
    }
    info!(admin_id = %admin.id, status = target.as_str(), "Event reviewed");

    Ok(Reviewed {
        id: event_id,
        status: target,
        changed: true,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::event::fixtures::new_event;
    use crate::store::MemoryStore;

    async fn setup() -> (MemoryStore, Viewer, Uuid) {
        let store = MemoryStore::new();
        let admin = Viewer::new(Uuid::new_v4());
        store.set_role(admin.id, Role::Admin).await;
        let id = store
            .insert_event(new_event("Campus Fair", "2025-05-01", Uuid::new_v4()))
            .await
            .unwrap();
        (store, admin, id)
    }

    #[tokio::test]
    async fn test_approve_moves_event_to_public_listing() {
        let (store, admin, id) = setup().await;

        let reviewed = review(&store, Some(&admin), id, Decision::Approve).await.unwrap();
        assert_eq!(reviewed.status, EventStatus::Approved);
        assert!(reviewed.changed);

        let approved = store.list_approved_events(None).await.unwrap();
        assert!(approved.iter().any(|e| e.id == id));
        let pending = list_pending(&store, Some(&admin)).await.unwrap();
        assert!(pending.iter().all(|e| e.id != id));
    }

    #[tokio::test]
    async fn test_reject_keeps_event_hidden() {
        let (store, admin, id) = setup().await;

        review(&store, Some(&admin), id, Decision::Reject).await.unwrap();
        assert!(store.list_approved_events(None).await.unwrap().is_empty());
        assert!(list_pending(&store, Some(&admin)).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_repeated_decision_is_idempotent() {
        let (store, admin, id) = setup().await;

        review(&store, Some(&admin), id, Decision::Approve).await.unwrap();
        let again = review(&store, Some(&admin), id, Decision::Approve).await.unwrap();
        assert_eq!(again.status, EventStatus::Approved);
        assert!(!again.changed);
    }

    #[tokio::test]
    async fn test_reversing_a_decision_is_a_conflict() {
        let (store, admin, id) = setup().await;

        review(&store, Some(&admin), id, Decision::Approve).await.unwrap();
        let result = review(&store, Some(&admin), id, Decision::Reject).await;
        assert!(matches!(result, Err(AppError::Conflict(_))));
        assert_eq!(
            store.get_event(id).await.unwrap().unwrap().status,
            EventStatus::Approved
        );
    }

    #[tokio::test]
    async fn test_only_admins_may_review() {
        let (store, _, id) = setup().await;
        let student = Viewer::new(Uuid::new_v4());
        store.set_role(student.id, Role::User).await;

        let anonymous = review(&store, None, id, Decision::Approve).await;
        assert!(matches!(anonymous, Err(AppError::AuthError(_))));

        let forbidden = review(&store, Some(&student), id, Decision::Approve).await;
        assert!(matches!(forbidden, Err(AppError::Forbidden(_))));

        let no_role = list_pending(&store, Some(&Viewer::new(Uuid::new_v4()))).await;
        assert!(matches!(no_role, Err(AppError::Forbidden(_))));
    }

    #[tokio::test]
    async fn test_unknown_event_is_not_found() {
        let (store, admin, _) = setup().await;
        let result = review(&store, Some(&admin), Uuid::new_v4(), Decision::Reject).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_pending_listing_is_newest_first() {
        let (store, admin, first) = setup().await;
        let second = store
            .insert_event(new_event("Book Swap", "2025-02-01", Uuid::new_v4()))
            .await
            .unwrap();

        let ids: Vec<Uuid> = list_pending(&store, Some(&admin))
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.id)
            .collect();
        assert_eq!(ids, vec![second, first]);
    }
}
