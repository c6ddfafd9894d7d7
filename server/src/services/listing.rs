use chrono::NaiveDate;
use serde::Serialize;
use uuid::Uuid;

use crate::models::{Event, EventStatus, LeaderboardEntry, Viewer};
use crate::services::filter::EventFilter;
use crate::store::EventStore;
use crate::utils::error::{AppError, AppResult};

#[derive(Debug, Clone, Serialize)]
pub struct EventListing {
    pub events: Vec<Event>,
    pub count: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct EventDetail {
    #[serde(flatten)]
    pub event: Event,
    pub is_rsvped: bool,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct MyEvents {
    pub upcoming: Vec<Event>,
    pub past: Vec<Event>,
}

/// Approved events narrowed by `filter`. The day restriction is pushed down
/// to the store and applied again in memory.
pub async fn list_events(store: &dyn EventStore, filter: &EventFilter) -> AppResult<EventListing> {
    let rows = store.list_approved_events(filter.date).await?;
    let events = filter.apply(rows.into_iter().map(Event::from).collect());
    tracing::debug!(count = events.len(), "Listed events");

    Ok(EventListing {
        count: events.len(),
        events,
    })
}

pub async fn event_detail(
    store: &dyn EventStore,
    id: Uuid,
    viewer: Option<&Viewer>,
) -> AppResult<EventDetail> {
    let event = store
        .get_event(id)
        .await?
        .filter(|e| e.status == EventStatus::Approved)
        .map(Event::from)
        .ok_or_else(|| AppError::event_not_found(id))?;

    let is_rsvped = match viewer {
        Some(viewer) => store.get_user_rsvp(id, viewer.id).await?.is_some(),
        None => false,
    };

    Ok(EventDetail { event, is_rsvped })
}

/// The viewer's RSVP'd events, split around `today` (which counts as
/// upcoming).
pub async fn my_events(
    store: &dyn EventStore,
    viewer: Option<&Viewer>,
    today: NaiveDate,
) -> AppResult<MyEvents> {
    let viewer = viewer.ok_or_else(AppError::auth_required)?;

    let (upcoming, past): (Vec<Event>, Vec<Event>) = store
        .list_rsvped_events(viewer.id)
        .await?
        .into_iter()
        .map(Event::from)
        .partition(|e| e.date >= today);

    Ok(MyEvents { upcoming, past })
}

pub async fn leaderboard(store: &dyn EventStore) -> AppResult<Vec<LeaderboardEntry>> {
    let clubs = store.list_clubs().await?;
    Ok(clubs
        .into_iter()
        .enumerate()
        .map(|(i, club)| LeaderboardEntry { rank: i + 1, club })
        .collect())
}

#[cfg(test)]
mod tests {
    use rust_decimal::Decimal;

    use super::*;
    use crate::models::event::fixtures::row;
    use crate::models::{Club, EventCategory};
    use crate::store::MemoryStore;

    fn day(s: &str) -> NaiveDate {
        NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap()
    }

    #[tokio::test]
    async fn test_listing_hides_unapproved_and_counts_results() {
        let store = MemoryStore::new();
        let mut pending = row("Secret Draft", "2025-04-01");
        pending.status = EventStatus::Pending;
        store.put_event(pending).await;
        store.put_event(row("Hack Night", "2025-04-02")).await;
        store.put_event(row("Open Mic", "2025-04-01")).await;

        let listing = list_events(&store, &EventFilter::default()).await.unwrap();
        let titles: Vec<&str> = listing.events.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(titles, vec!["Open Mic", "Hack Night"]);
        assert_eq!(listing.count, 2);

        let filter = EventFilter {
            query: "hack".into(),
            ..Default::default()
        };
        assert_eq!(list_events(&store, &filter).await.unwrap().count, 1);
    }

    #[tokio::test]
    async fn test_detail_carries_count_and_viewer_flag() {
        let store = MemoryStore::new();
        let event = row("Hack Night", "2025-04-02");
        let id = event.id;
        store.put_event(event).await;
        let viewer = Viewer::new(Uuid::new_v4());
        store.insert_rsvp(id, viewer.id).await.unwrap();

        let detail = event_detail(&store, id, Some(&viewer)).await.unwrap();
        assert!(detail.is_rsvped);
        assert_eq!(detail.event.registered, 1);

        let anonymous = event_detail(&store, id, None).await.unwrap();
        assert!(!anonymous.is_rsvped);
    }

    #[tokio::test]
    async fn test_detail_of_pending_event_is_not_found() {
        let store = MemoryStore::new();
        let mut event = row("Secret Draft", "2025-04-01");
        event.status = EventStatus::Pending;
        let id = event.id;
        store.put_event(event).await;

        let result = event_detail(&store, id, None).await;
        assert!(matches!(result, Err(AppError::NotFound(_))));
    }

    #[tokio::test]
    async fn test_my_events_split_on_today() {
        let store = MemoryStore::new();
        let viewer = Viewer::new(Uuid::new_v4());
        for (title, date) in [("Past Talk", "2025-01-10"), ("Today Lab", "2025-03-01"), ("Next Gig", "2025-05-20")] {
            let event = row(title, date);
            let id = event.id;
            store.put_event(event).await;
            store.insert_rsvp(id, viewer.id).await.unwrap();
        }
        store.put_event(row("Not Mine", "2025-05-21")).await;

        let mine = my_events(&store, Some(&viewer), day("2025-03-01")).await.unwrap();
        let upcoming: Vec<&str> = mine.upcoming.iter().map(|e| e.title.as_str()).collect();
        let past: Vec<&str> = mine.past.iter().map(|e| e.title.as_str()).collect();
        assert_eq!(upcoming, vec!["Today Lab", "Next Gig"]);
        assert_eq!(past, vec!["Past Talk"]);

        let anonymous = my_events(&store, None, day("2025-03-01")).await;
        assert!(matches!(anonymous, Err(AppError::AuthError(_))));
    }

    #[tokio::test]
    async fn test_leaderboard_ranks_by_rating_then_reviews() {
        let store = MemoryStore::new();
        for (name, rating, reviews) in [
            ("Career Services", Decimal::new(45, 1), 210),
            ("Tech Club", Decimal::new(48, 1), 156),
            ("Chess Society", Decimal::new(45, 1), 89),
        ] {
            store
                .add_club(Club {
                    id: Uuid::new_v4(),
                    name: name.to_string(),
                    category: EventCategory::Social,
                    rating,
                    total_reviews: reviews,
                    events_hosted: 10,
                    trend: Decimal::ZERO,
                })
                .await;
        }

        let board = leaderboard(&store).await.unwrap();
        let ranked: Vec<(usize, &str)> = board
            .iter()
            .map(|e| (e.rank, e.club.name.as_str()))
            .collect();
        assert_eq!(
            ranked,
            vec![(1, "Tech Club"), (2, "Career Services"), (3, "Chess Society")]
        );
    }
}
