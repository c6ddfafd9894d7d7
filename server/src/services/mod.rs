//! Core operations. Every function receives the store and the viewer
//! explicitly; nothing here reads request or session state.

pub mod approval;
pub mod filter;
pub mod listing;
pub mod rsvp;
pub mod submission;
