// Day layout service
// Pure time/pixel math and overlap-aware block placement

pub mod engine;
pub mod grid;

pub use engine::{layout, DayLayout, EventBlock, MIN_EVENT_HEIGHT};
pub use grid::TimeGrid;
