//! Utilities shared by the Huddle crates: logger setup and time helpers.

pub mod logger;
pub mod time;
