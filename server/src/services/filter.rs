//! Narrowing of an already loaded event listing.
//!
//! Predicates AND together and each one is a no-op when its selection is
//! empty. The input order is kept as-is: listings arrive sorted by date from
//! the store and the filter never re-sorts.

use chrono::NaiveDate;
use serde::Deserialize;

use crate::models::{Event, EventCategory, EventLocation};
use crate::utils::error::AppError;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct EventFilter {
    pub query: String,
    pub categories: Vec<EventCategory>,
    pub locations: Vec<EventLocation>,
    pub date: Option<NaiveDate>,
}

impl EventFilter {
    pub fn matches(&self, event: &Event) -> bool {
        self.matches_query(event)
            && (self.categories.is_empty() || self.categories.contains(&event.category))
            && (self.locations.is_empty() || self.locations.contains(&event.location))
            && self.date.map_or(true, |d| event.date == d)
    }

    fn matches_query(&self, event: &Event) -> bool {
        let needle = self.query.trim().to_lowercase();
        if needle.is_empty() {
            return true;
        }
        [&event.title, &event.description, &event.organizer]
            .iter()
            .any(|field| field.to_lowercase().contains(&needle))
    }

    pub fn apply(&self, events: Vec<Event>) -> Vec<Event> {
        events.into_iter().filter(|e| self.matches(e)).collect()
    }
}

/// Query string of `GET /api/events`. Selections are comma separated.
#[derive(Debug, Default, Deserialize)]
pub struct ListEventsParams {
    pub q: Option<String>,
    pub categories: Option<String>,
    pub locations: Option<String>,
    pub date: Option<String>,
}

impl TryFrom<ListEventsParams> for EventFilter {
    type Error = AppError;

    fn try_from(params: ListEventsParams) -> Result<Self, Self::Error> {
        let date = match params.date.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => Some(NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|_| {
                AppError::ValidationError(format!("Invalid date '{}', expected YYYY-MM-DD", raw))
            })?),
        };

        Ok(Self {
            query: params.q.unwrap_or_default(),
            categories: parse_selection(params.categories.as_deref(), "category")?,
            locations: parse_selection(params.locations.as_deref(), "location")?,
            date,
        })
    }
}

fn parse_selection<T: std::str::FromStr>(raw: Option<&str>, what: &str) -> Result<Vec<T>, AppError> {
    raw.unwrap_or_default()
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(|s| {
            s.parse()
                .map_err(|_| AppError::ValidationError(format!("Unknown {} '{}'", what, s)))
        })
        .collect()
}
