// Schedule service
// API contract, HTTP client, and the calendar controller built on them

pub mod api;
pub mod client;
pub mod controller;

pub use api::{AutoAssignOutcome, ScheduleApi};
pub use client::HttpScheduleClient;
pub use controller::{CalendarController, LoadState};
