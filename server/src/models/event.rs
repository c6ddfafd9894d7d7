use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use uuid::Uuid;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_category")]
pub enum EventCategory {
    #[serde(rename = "Academic")]
    #[sqlx(rename = "Academic")]
    Academic,
    #[serde(rename = "Sports")]
    #[sqlx(rename = "Sports")]
    Sports,
    #[serde(rename = "Career Services")]
    #[sqlx(rename = "Career Services")]
    CareerServices,
    #[serde(rename = "Social")]
    #[sqlx(rename = "Social")]
    Social,
    #[serde(rename = "Arts & Culture")]
    #[sqlx(rename = "Arts & Culture")]
    ArtsAndCulture,
    #[serde(rename = "Technical")]
    #[sqlx(rename = "Technical")]
    Technical,
}

impl EventCategory {
    pub const ALL: [EventCategory; 6] = [
        EventCategory::Academic,
        EventCategory::Sports,
        EventCategory::CareerServices,
        EventCategory::Social,
        EventCategory::ArtsAndCulture,
        EventCategory::Technical,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventCategory::Academic => "Academic",
            EventCategory::Sports => "Sports",
            EventCategory::CareerServices => "Career Services",
            EventCategory::Social => "Social",
            EventCategory::ArtsAndCulture => "Arts & Culture",
            EventCategory::Technical => "Technical",
        }
    }

    /// Short value sent by the submission form's select box.
    pub fn slug(self) -> &'static str {
        match self {
            EventCategory::Academic => "academic",
            EventCategory::Sports => "sports",
            EventCategory::CareerServices => "career",
            EventCategory::Social => "social",
            EventCategory::ArtsAndCulture => "arts",
            EventCategory::Technical => "technical",
        }
    }
}

impl fmt::Display for EventCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|c| c.label().eq_ignore_ascii_case(s) || c.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_location")]
pub enum EventLocation {
    #[serde(rename = "Library")]
    #[sqlx(rename = "Library")]
    Library,
    #[serde(rename = "Field House")]
    #[sqlx(rename = "Field House")]
    FieldHouse,
    #[serde(rename = "Student Center")]
    #[sqlx(rename = "Student Center")]
    StudentCenter,
    #[serde(rename = "Main Hall")]
    #[sqlx(rename = "Main Hall")]
    MainHall,
    #[serde(rename = "Remote/Online")]
    #[sqlx(rename = "Remote/Online")]
    RemoteOnline,
    #[serde(rename = "Engineering Building")]
    #[sqlx(rename = "Engineering Building")]
    EngineeringBuilding,
    #[serde(rename = "Arts Center")]
    #[sqlx(rename = "Arts Center")]
    ArtsCenter,
}

impl EventLocation {
    pub const ALL: [EventLocation; 7] = [
        EventLocation::Library,
        EventLocation::FieldHouse,
        EventLocation::StudentCenter,
        EventLocation::MainHall,
        EventLocation::RemoteOnline,
        EventLocation::EngineeringBuilding,
        EventLocation::ArtsCenter,
    ];

    pub fn label(self) -> &'static str {
        match self {
            EventLocation::Library => "Library",
            EventLocation::FieldHouse => "Field House",
            EventLocation::StudentCenter => "Student Center",
            EventLocation::MainHall => "Main Hall",
            EventLocation::RemoteOnline => "Remote/Online",
            EventLocation::EngineeringBuilding => "Engineering Building",
            EventLocation::ArtsCenter => "Arts Center",
        }
    }

    pub fn slug(self) -> &'static str {
        match self {
            EventLocation::Library => "library",
            EventLocation::FieldHouse => "field-house",
            EventLocation::StudentCenter => "student-center",
            EventLocation::MainHall => "main-hall",
            EventLocation::RemoteOnline => "remote",
            EventLocation::EngineeringBuilding => "engineering",
            EventLocation::ArtsCenter => "arts-center",
        }
    }
}

impl fmt::Display for EventLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for EventLocation {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|l| l.label().eq_ignore_ascii_case(s) || l.slug().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownVariant(s.to_string()))
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown value '{0}'")]
pub struct UnknownVariant(pub String);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type)]
#[sqlx(type_name = "event_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum EventStatus {
    Pending,
    Approved,
    Rejected,
}

impl EventStatus {
    pub fn as_str(self) -> &'static str {
        match self {
            EventStatus::Pending => "pending",
            EventStatus::Approved => "approved",
            EventStatus::Rejected => "rejected",
        }
    }

    pub fn is_terminal(self) -> bool {
        !matches!(self, EventStatus::Pending)
    }
}

/// Row shape of the `events` table, plus the derived RSVP count when the
/// query selects it.
#[derive(Debug, Clone, FromRow)]
pub struct EventRow {
    pub id: Uuid,
    pub title: String,
    pub description: Option<String>,
    pub category: EventCategory,
    pub location: EventLocation,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub organizer_name: String,
    pub organizer_email: String,
    pub capacity: Option<i32>,
    pub accessibility: Option<Vec<String>>,
    pub prerequisites: Option<Vec<String>>,
    pub status: EventStatus,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
    #[sqlx(default)]
    pub registered: Option<i64>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Event {
    pub id: Uuid,
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub location: EventLocation,
    pub date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub organizer: String,
    pub organizer_contact: String,
    pub capacity: Option<u32>,
    pub registered: i64,
    pub accessibility: Vec<String>,
    pub prerequisites: Vec<String>,
    pub status: EventStatus,
    pub submitted_by: Uuid,
    pub created_at: DateTime<Utc>,
}

impl From<EventRow> for Event {
    fn from(row: EventRow) -> Self {
        Self {
            id: row.id,
            title: row.title,
            description: row.description.unwrap_or_default(),
            category: row.category,
            location: row.location,
            date: row.event_date,
            start_time: row.start_time,
            end_time: row.end_time,
            organizer: row.organizer_name,
            organizer_contact: row.organizer_email,
            capacity: row.capacity.and_then(|c| u32::try_from(c).ok()),
            registered: row.registered.unwrap_or(0),
            accessibility: row.accessibility.unwrap_or_default(),
            prerequisites: row.prerequisites.unwrap_or_default(),
            status: row.status,
            submitted_by: row.submitted_by,
            created_at: row.created_at,
        }
    }
}

/// A validated submission ready to be inserted. The store always writes it
/// with `pending` status.
#[derive(Debug, Clone, PartialEq)]
pub struct NewEvent {
    pub title: String,
    pub description: String,
    pub category: EventCategory,
    pub location: EventLocation,
    pub event_date: NaiveDate,
    pub start_time: String,
    pub end_time: String,
    pub organizer_name: String,
    pub organizer_email: String,
    pub capacity: Option<i32>,
    pub accessibility: Vec<String>,
    pub prerequisites: Vec<String>,
    pub submitted_by: Uuid,
}
