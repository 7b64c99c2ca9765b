//! Contract with the AURA schedule backend.
//!
//! The backend owns task storage and the auto-scheduling engine; this
//! client only consumes the documented endpoints. The trait exists so the
//! controller can be driven against a mock in tests.

use anyhow::Result;
use chrono::{NaiveDate, NaiveDateTime};
use serde::{Deserialize, Serialize};

use crate::models::schedule_event::{EventId, ScheduleEvent};

/// `GET /schedule/routine?date=YYYY-MM-DD`
#[derive(Debug, Clone, Deserialize)]
pub struct RoutineResponse {
    #[serde(default)]
    pub timeline: Vec<ScheduleEvent>,
}

/// `POST /schedule/auto-assign?date=YYYY-MM-DD`
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct AutoAssignOutcome {
    pub message: String,
    #[serde(default)]
    pub scheduled: Option<u32>,
}

/// Body of `PUT /tasks/{id}` when rescheduling.
#[derive(Debug, Clone, Serialize)]
pub struct TaskDueDateUpdate {
    pub due_date: String,
}

/// Body of `POST /tasks`.
#[derive(Debug, Clone, Serialize)]
pub struct NewTask {
    pub title: String,
    pub due_date: String,
}

/// Operations the schedule backend exposes to this client.
#[cfg_attr(test, mockall::automock)]
pub trait ScheduleApi: Send + Sync {
    /// Fetch the routine timeline for one calendar day.
    fn fetch_routine(&self, date: NaiveDate) -> Result<Vec<ScheduleEvent>>;

    /// Ask the backend to place unscheduled tasks into free slots.
    fn auto_assign(&self, date: NaiveDate) -> Result<AutoAssignOutcome>;

    /// Move a task to a new due date.
    fn update_task_due_date(&self, id: &EventId, due: NaiveDateTime) -> Result<()>;

    /// Create a new task due at the given time.
    fn create_task(&self, title: &str, due: NaiveDateTime) -> Result<()>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule_event::EventType;

    #[test]
    fn test_routine_response_parses_backend_payload() {
        let raw = r##"{
            "timeline": [
                {"id": 1, "title": "Finish essay", "type": "task",
                 "priority": "high",
                 "start": "2024-06-01T09:00:00", "end": "2024-06-01T10:00:00"},
                {"id": "prep-1", "title": "Prep for Class", "type": "prep",
                 "color": "#facc15",
                 "start": "2024-06-01T08:30:00", "end": "2024-06-01T09:00:00"},
                {"id": "free-1", "title": "Free", "type": "free",
                 "start": "2024-06-01T10:00:00", "end": "2024-06-01T12:00:00"}
            ]
        }"##;

        let response: RoutineResponse = serde_json::from_str(raw).unwrap();
        assert_eq!(response.timeline.len(), 3);
        assert_eq!(response.timeline[0].event_type, EventType::Task);
        assert_eq!(response.timeline[1].color.as_deref(), Some("#facc15"));
        assert!(response.timeline[2].is_free_time());
    }

    #[test]
    fn test_routine_response_tolerates_missing_timeline() {
        let response: RoutineResponse = serde_json::from_str("{}").unwrap();
        assert!(response.timeline.is_empty());
    }

    #[test]
    fn test_auto_assign_outcome_with_and_without_count() {
        let with: AutoAssignOutcome =
            serde_json::from_str(r#"{"message": "Scheduled 3 tasks", "scheduled": 3}"#).unwrap();
        assert_eq!(with.message, "Scheduled 3 tasks");
        assert_eq!(with.scheduled, Some(3));

        let without: AutoAssignOutcome =
            serde_json::from_str(r#"{"message": "No tasks to schedule"}"#).unwrap();
        assert_eq!(without.scheduled, None);
    }

    #[test]
    fn test_task_update_body_shape() {
        let body = TaskDueDateUpdate {
            due_date: "2024-06-02T09:00:00".to_string(),
        };
        let json = serde_json::to_value(&body).unwrap();
        assert_eq!(json["due_date"], "2024-06-02T09:00:00");
    }
}
