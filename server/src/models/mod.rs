pub mod club;
pub mod event;
pub mod rsvp;
pub mod user;

pub use club::{Club, LeaderboardEntry};
pub use event::{Event, EventCategory, EventLocation, EventRow, EventStatus, NewEvent};
pub use rsvp::{RsvpRow, RsvpState};
pub use user::{Role, Viewer};
