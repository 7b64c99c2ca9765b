// View modules for the timeline surface

pub mod day_strip;
pub mod day_timeline;
pub mod palette;

pub use day_strip::{DayStrip, DayStripResponse};
pub use day_timeline::{DayTimelineView, TimelineResponse, EMPTY_STATE_TEXT};
