//! Event submission form: fail-fast validation and persistence as `pending`.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;
use validator::Validate;

use crate::models::{EventCategory, EventLocation, EventStatus, NewEvent, Viewer};
use crate::store::EventStore;
use crate::utils::error::{AppError, AppResult};

pub const TITLE_MESSAGE: &str = "Title must be at least 3 characters";
pub const CATEGORY_MESSAGE: &str = "Please select a valid category";
pub const DESCRIPTION_MESSAGE: &str = "Description must be at least 10 characters";
pub const DATE_MESSAGE: &str = "Please provide a valid event date";
pub const START_TIME_MESSAGE: &str = "Start time is required";
pub const END_TIME_MESSAGE: &str = "End time is required";
pub const LOCATION_MESSAGE: &str = "Please select a valid location";
pub const ORGANIZER_MESSAGE: &str = "Organizer name must be at least 2 characters";
pub const CONTACT_MESSAGE: &str = "Please provide a valid contact email";
pub const CAPACITY_MESSAGE: &str = "Capacity must be a whole number";
pub const NEGATIVE_CAPACITY_MESSAGE: &str = "Capacity cannot be negative";

/// Raw form payload, every field as typed by the organizer.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubmissionForm {
    #[serde(default)]
    pub title: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub date: String,
    #[serde(default)]
    pub start_time: String,
    #[serde(default)]
    pub end_time: String,
    #[serde(default)]
    pub location: String,
    #[serde(default)]
    pub organizer: String,
    #[serde(default)]
    pub contact: String,
    pub capacity: Option<String>,
    pub prerequisites: Option<String>,
    pub accessibility: Option<String>,
}

#[derive(Validate)]
struct ContactEmail {
    #[validate(email)]
    email: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct Submitted {
    pub id: Uuid,
    pub status: EventStatus,
}

fn ensure(ok: bool, message: &str) -> AppResult<()> {
    if ok {
        Ok(())
    } else {
        Err(AppError::ValidationError(message.to_string()))
    }
}

fn lines(raw: Option<&str>) -> Vec<String> {
    raw.unwrap_or_default()
        .lines()
        .map(str::trim)
        .filter(|l| !l.is_empty())
        .map(String::from)
        .collect()
}

impl SubmissionForm {
    /// Checks the rules in form order and reports only the first failure.
    pub fn validate(&self, submitted_by: Uuid) -> AppResult<NewEvent> {
        let title = self.title.trim();
        ensure(title.chars().count() >= 3, TITLE_MESSAGE)?;

        let category: EventCategory = self
            .category
            .parse()
            .map_err(|_| AppError::ValidationError(CATEGORY_MESSAGE.to_string()))?;

        let description = self.description.trim();
        ensure(description.chars().count() >= 10, DESCRIPTION_MESSAGE)?;

        let event_date = NaiveDate::parse_from_str(self.date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::ValidationError(DATE_MESSAGE.to_string()))?;

        let start_time = self.start_time.trim();
        ensure(!start_time.is_empty(), START_TIME_MESSAGE)?;
        let end_time = self.end_time.trim();
        ensure(!end_time.is_empty(), END_TIME_MESSAGE)?;

        let location: EventLocation = self
            .location
            .parse()
            .map_err(|_| AppError::ValidationError(LOCATION_MESSAGE.to_string()))?;

        let organizer = self.organizer.trim();
        ensure(organizer.chars().count() >= 2, ORGANIZER_MESSAGE)?;

        let contact = self.contact.trim();
        ensure(
            ContactEmail {
                email: contact.to_string(),
            }
            .validate()
            .is_ok(),
            CONTACT_MESSAGE,
        )?;

        let capacity = match self.capacity.as_deref().map(str::trim) {
            None | Some("") => None,
            Some(raw) => {
                let value: i32 = raw
                    .parse()
                    .map_err(|_| AppError::ValidationError(CAPACITY_MESSAGE.to_string()))?;
                ensure(value >= 0, NEGATIVE_CAPACITY_MESSAGE)?;
                Some(value)
            }
        };

        Ok(NewEvent {
            title: title.to_string(),
            description: description.to_string(),
            category,
            location,
            event_date,
            start_time: start_time.to_string(),
            end_time: end_time.to_string(),
            organizer_name: organizer.to_string(),
            organizer_email: contact.to_string(),
            capacity,
            accessibility: lines(self.accessibility.as_deref()),
            prerequisites: lines(self.prerequisites.as_deref()),
            submitted_by,
        })
    }
}

#[tracing::instrument(skip(store, viewer, form), fields(title = %form.title))]
pub async fn submit(
    store: &dyn EventStore,
    viewer: Option<&Viewer>,
    form: SubmissionForm,
) -> AppResult<Submitted> {
    let viewer = viewer.ok_or_else(AppError::auth_required)?;
    let event = form.validate(viewer.id)?;

    let id = store.insert_event(event).await?;
    info!(event_id = %id, submitted_by = %viewer.id, "Event submitted for review");

    Ok(Submitted {
        id,
        status: EventStatus::Pending,
    })
}
