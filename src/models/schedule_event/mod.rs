// Schedule event module
// Timeline entry model for the AURA schedule API

use std::fmt;

use chrono::{DateTime, Local};
use serde::Deserialize;

use crate::utils::date::deserialize_flexible_datetime;

/// Opaque event identifier.
///
/// The schedule API emits integer ids for tasks and string ids for derived
/// routine blocks; both forms are unique within a day's timeline.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Deserialize)]
#[serde(untagged)]
pub enum EventId {
    Int(i64),
    Text(String),
}

impl fmt::Display for EventId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EventId::Int(id) => write!(f, "{}", id),
            EventId::Text(id) => write!(f, "{}", id),
        }
    }
}

impl From<i64> for EventId {
    fn from(id: i64) -> Self {
        EventId::Int(id)
    }
}

impl From<&str> for EventId {
    fn from(id: &str) -> Self {
        EventId::Text(id.to_string())
    }
}

/// Category of a timeline entry; drives color and reschedulability.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EventType {
    Task,
    #[serde(alias = "routine")]
    Class,
    Work,
    Meal,
    Break,
    Free,
    Event,
    Prep,
    #[serde(other)]
    Other,
}

impl EventType {
    /// Only tasks can be dragged to another day.
    pub fn is_reschedulable(self) -> bool {
        self == EventType::Task
    }
}

/// Task priority; only meaningful when `event_type` is `Task`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Urgent,
    High,
    Medium,
    Low,
}

/// One entry of a day's routine timeline.
///
/// `start`/`end` are optional because the API's timestamps are parsed
/// leniently: an entry with a missing or unparseable start is carried
/// through to the layout engine, which skips and counts it rather than
/// failing the render.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct ScheduleEvent {
    pub id: EventId,
    pub title: String,
    #[serde(default, deserialize_with = "deserialize_flexible_datetime")]
    pub start: Option<DateTime<Local>>,
    #[serde(default, deserialize_with = "deserialize_flexible_datetime")]
    pub end: Option<DateTime<Local>>,
    #[serde(rename = "type", default = "EventType::default_wire")]
    pub event_type: EventType,
    #[serde(default)]
    pub priority: Option<Priority>,
    #[serde(default)]
    pub color: Option<String>,
    #[serde(default)]
    pub completed: Option<bool>,
}

impl EventType {
    fn default_wire() -> Self {
        EventType::Event
    }
}

impl ScheduleEvent {
    /// Create a builder for constructing events with optional fields.
    pub fn builder() -> ScheduleEventBuilder {
        ScheduleEventBuilder::new()
    }

    /// Validate an event before it is handed to the layout engine.
    pub fn validate(&self) -> Result<(), String> {
        if self.title.trim().is_empty() {
            return Err("Event title cannot be empty".to_string());
        }

        if let Some(ref color) = self.color {
            if !color.starts_with('#') || (color.len() != 7 && color.len() != 4) {
                return Err("Color must be in hex format (#RRGGBB or #RGB)".to_string());
            }
        }

        Ok(())
    }

    /// Whether this entry represents open time rather than a drawn block.
    pub fn is_free_time(&self) -> bool {
        self.event_type == EventType::Free
    }

    pub fn is_completed(&self) -> bool {
        self.completed.unwrap_or(false)
    }
}

/// Builder for creating events with optional fields.
pub struct ScheduleEventBuilder {
    id: Option<EventId>,
    title: Option<String>,
    start: Option<DateTime<Local>>,
    end: Option<DateTime<Local>>,
    event_type: EventType,
    priority: Option<Priority>,
    color: Option<String>,
    completed: Option<bool>,
}

impl ScheduleEventBuilder {
    pub fn new() -> Self {
        Self {
            id: None,
            title: None,
            start: None,
            end: None,
            event_type: EventType::Event,
            priority: None,
            color: None,
            completed: None,
        }
    }

    pub fn id(mut self, id: impl Into<EventId>) -> Self {
        self.id = Some(id.into());
        self
    }

    pub fn title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn start(mut self, start: DateTime<Local>) -> Self {
        self.start = Some(start);
        self
    }

    pub fn end(mut self, end: DateTime<Local>) -> Self {
        self.end = Some(end);
        self
    }

    pub fn event_type(mut self, event_type: EventType) -> Self {
        self.event_type = event_type;
        self
    }

    pub fn priority(mut self, priority: Priority) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn color(mut self, color: impl Into<String>) -> Self {
        self.color = Some(color.into());
        self
    }

    pub fn completed(mut self, completed: bool) -> Self {
        self.completed = Some(completed);
        self
    }

    pub fn build(self) -> Result<ScheduleEvent, String> {
        let id = self.id.ok_or("Event id is required")?;
        let title = self.title.ok_or("Event title is required")?;

        let event = ScheduleEvent {
            id,
            title,
            start: self.start,
            end: self.end,
            event_type: self.event_type,
            priority: self.priority,
            color: self.color,
            completed: self.completed,
        };

        event.validate()?;
        Ok(event)
    }
}

impl Default for ScheduleEventBuilder {
    fn default() -> Self {
        Self::new()
    }
}
