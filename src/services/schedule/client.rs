use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use chrono::{NaiveDate, NaiveDateTime};
use reqwest::blocking::{Client, Response};

use crate::models::schedule_event::{EventId, ScheduleEvent};
use crate::models::settings::Settings;
use crate::utils::date::{format_api_date, format_due_date};

use super::api::{AutoAssignOutcome, NewTask, RoutineResponse, ScheduleApi, TaskDueDateUpdate};

/// Blocking HTTP client for the schedule backend.
///
/// Built once at startup; every request is bounded by the configured
/// timeout. Runs on worker threads, never on the UI thread.
pub struct HttpScheduleClient {
    client: Client,
    base_url: String,
}

impl HttpScheduleClient {
    pub fn new(settings: &Settings) -> Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_secs(settings.request_timeout_secs))
            .build()
            .context("Failed to build schedule API HTTP client")?;

        Ok(Self {
            client,
            base_url: settings.api_base_url.trim_end_matches('/').to_string(),
        })
    }

    fn check_status(response: Response, action: &str) -> Result<Response> {
        let status = response.status();
        if !status.is_success() {
            return Err(anyhow!("{} failed with HTTP status {}", action, status));
        }
        Ok(response)
    }
}

impl ScheduleApi for HttpScheduleClient {
    fn fetch_routine(&self, date: NaiveDate) -> Result<Vec<ScheduleEvent>> {
        let url = format!(
            "{}/schedule/routine?date={}",
            self.base_url,
            format_api_date(date)
        );

        let response = self
            .client
            .get(&url)
            .send()
            .context("Network error fetching routine")?;
        let response = Self::check_status(response, "Routine fetch")?;

        let routine: RoutineResponse = response
            .json()
            .context("Failed to decode routine response")?;
        Ok(routine.timeline)
    }

    fn auto_assign(&self, date: NaiveDate) -> Result<AutoAssignOutcome> {
        let url = format!(
            "{}/schedule/auto-assign?date={}",
            self.base_url,
            format_api_date(date)
        );

        let response = self
            .client
            .post(&url)
            .send()
            .context("Network error during auto-schedule")?;
        let response = Self::check_status(response, "Auto-schedule")?;

        response
            .json()
            .context("Failed to decode auto-schedule response")
    }

    fn update_task_due_date(&self, id: &EventId, due: NaiveDateTime) -> Result<()> {
        let url = format!("{}/tasks/{}", self.base_url, id);
        let body = TaskDueDateUpdate {
            due_date: format_due_date(due),
        };

        let response = self
            .client
            .put(&url)
            .json(&body)
            .send()
            .with_context(|| format!("Network error rescheduling task {}", id))?;
        Self::check_status(response, "Task reschedule")?;

        Ok(())
    }

    fn create_task(&self, title: &str, due: NaiveDateTime) -> Result<()> {
        let url = format!("{}/tasks", self.base_url);
        let body = NewTask {
            title: title.to_string(),
            due_date: format_due_date(due),
        };

        let response = self
            .client
            .post(&url)
            .json(&body)
            .send()
            .context("Network error creating task")?;
        Self::check_status(response, "Task creation")?;

        Ok(())
    }
}
