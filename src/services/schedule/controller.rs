//! Calendar orchestration.
//!
//! Owns the displayed date and load state, issues routine fetches on worker
//! threads, and applies their results on the UI thread via [`poll`].
//! Responses carry the sequence number of the fetch that produced them;
//! only the most recently issued fetch may render, so a slow response for
//! an older navigation can never overwrite a newer one.
//!
//! [`poll`]: CalendarController::poll

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;
use std::thread;

use chrono::{Local, NaiveDate, NaiveDateTime, NaiveTime};

use crate::models::schedule_event::{EventId, EventType, ScheduleEvent};
use crate::services::notification::{Notifier, Severity};

use super::api::ScheduleApi;

/// Where a task lands when its original time-of-day is unknown.
pub fn default_task_time() -> NaiveTime {
    NaiveTime::from_hms_opt(9, 0, 0).unwrap()
}

/// Load state of the displayed day.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadState {
    Idle,
    Loading,
    Ready,
    Error,
}

#[derive(Debug)]
enum WorkerMessage {
    RoutineFetched {
        seq: u64,
        date: NaiveDate,
        result: Result<Vec<ScheduleEvent>, String>,
    },
    ActionFinished(ActionOutcome),
}

#[derive(Debug)]
enum ActionOutcome {
    AutoAssign(Result<super::api::AutoAssignOutcome, String>),
    Reschedule(Result<String, String>),
    CreateTask(Result<String, String>),
}

pub struct CalendarController {
    cursor: NaiveDate,
    load_state: LoadState,
    error_message: Option<String>,
    events: Vec<ScheduleEvent>,
    fetch_seq: u64,
    action_in_flight: bool,
    activated: bool,
    api: Arc<dyn ScheduleApi>,
    notifier: Arc<dyn Notifier>,
    worker_tx: Sender<WorkerMessage>,
    worker_rx: Receiver<WorkerMessage>,
}

impl CalendarController {
    pub fn new(api: Arc<dyn ScheduleApi>, notifier: Arc<dyn Notifier>) -> Self {
        let (worker_tx, worker_rx) = mpsc::channel();
        Self {
            cursor: Local::now().date_naive(),
            load_state: LoadState::Idle,
            error_message: None,
            events: Vec::new(),
            fetch_seq: 0,
            action_in_flight: false,
            activated: false,
            api,
            notifier,
            worker_tx,
            worker_rx,
        }
    }

    pub fn cursor(&self) -> NaiveDate {
        self.cursor
    }

    pub fn load_state(&self) -> LoadState {
        self.load_state
    }

    pub fn error_message(&self) -> Option<&str> {
        self.error_message.as_deref()
    }

    pub fn events(&self) -> &[ScheduleEvent] {
        &self.events
    }

    pub fn is_loading(&self) -> bool {
        self.load_state == LoadState::Loading
    }

    pub fn action_in_flight(&self) -> bool {
        self.action_in_flight
    }

    /// Lifecycle entry point called by the owning shell when the calendar
    /// surface becomes active. Performs the initial fetch exactly once.
    pub fn on_activate(&mut self) {
        if self.activated {
            return;
        }
        self.activated = true;
        self.refresh();
    }

    /// Display a different day.
    pub fn navigate(&mut self, date: NaiveDate) {
        let seq = self.begin_fetch(date);
        self.spawn_routine_fetch(seq, date);
    }

    pub fn prev_day(&mut self) {
        self.navigate(self.cursor - chrono::Duration::days(1));
    }

    pub fn next_day(&mut self) {
        self.navigate(self.cursor + chrono::Duration::days(1));
    }

    pub fn go_to_today(&mut self) {
        self.navigate(Local::now().date_naive());
    }

    /// Re-fetch the displayed day.
    pub fn refresh(&mut self) {
        let seq = self.begin_fetch(self.cursor);
        self.spawn_routine_fetch(seq, self.cursor);
    }

    /// Ask the backend to place unscheduled tasks, then re-fetch.
    ///
    /// Any delivered server response triggers the refresh, whatever its
    /// scheduled count; only a transport failure leaves the current view
    /// untouched.
    pub fn auto_schedule(&mut self) {
        if self.action_in_flight {
            return;
        }
        self.action_in_flight = true;

        let api = Arc::clone(&self.api);
        let tx = self.worker_tx.clone();
        let date = self.cursor;

        thread::spawn(move || {
            let result = api.auto_assign(date).map_err(|err| err.to_string());
            let _ = tx.send(WorkerMessage::ActionFinished(ActionOutcome::AutoAssign(
                result,
            )));
        });
    }

    /// Move a task to another day, keeping its time-of-day.
    pub fn reschedule_task(&mut self, id: EventId, new_date: NaiveDate) {
        let Some(due) = self.due_for_reschedule(&id, new_date) else {
            log::warn!("Ignoring reschedule of non-task entry {}", id);
            return;
        };

        if self.action_in_flight {
            return;
        }
        self.action_in_flight = true;

        let api = Arc::clone(&self.api);
        let tx = self.worker_tx.clone();

        thread::spawn(move || {
            let result = run_reschedule(api.as_ref(), &id, due);
            let _ = tx.send(WorkerMessage::ActionFinished(ActionOutcome::Reschedule(
                result,
            )));
        });
    }

    /// Create a task starting at the clicked slot, then re-fetch.
    pub fn create_task(&mut self, title: String, start: NaiveDateTime) {
        if self.action_in_flight {
            return;
        }
        self.action_in_flight = true;

        let api = Arc::clone(&self.api);
        let tx = self.worker_tx.clone();

        thread::spawn(move || {
            let result = run_create_task(api.as_ref(), &title, start);
            let _ = tx.send(WorkerMessage::ActionFinished(ActionOutcome::CreateTask(
                result,
            )));
        });
    }

    /// Apply pending worker results. Returns whether anything changed and
    /// the frame should repaint.
    pub fn poll(&mut self) -> bool {
        let mut changed = false;
        while let Ok(message) = self.worker_rx.try_recv() {
            self.handle_message(message);
            changed = true;
        }
        changed
    }

    /// Reschedule target time: the task's current time-of-day, or the
    /// default slot when the entry is no longer in the fetched set.
    /// `None` for entries that exist but are not reschedulable.
    fn due_for_reschedule(&self, id: &EventId, new_date: NaiveDate) -> Option<NaiveDateTime> {
        match self.events.iter().find(|event| &event.id == id) {
            Some(event) if event.event_type != EventType::Task => None,
            Some(event) => {
                let time = event
                    .start
                    .map(|start| start.time())
                    .unwrap_or_else(default_task_time);
                Some(new_date.and_time(time))
            }
            None => Some(new_date.and_time(default_task_time())),
        }
    }

    fn begin_fetch(&mut self, date: NaiveDate) -> u64 {
        self.cursor = date;
        self.load_state = LoadState::Loading;
        self.error_message = None;
        self.fetch_seq += 1;
        self.fetch_seq
    }

    fn spawn_routine_fetch(&self, seq: u64, date: NaiveDate) {
        let api = Arc::clone(&self.api);
        let tx = self.worker_tx.clone();

        thread::spawn(move || {
            let result = api.fetch_routine(date).map_err(|err| err.to_string());
            let _ = tx.send(WorkerMessage::RoutineFetched { seq, date, result });
        });
    }

    fn handle_message(&mut self, message: WorkerMessage) {
        match message {
            WorkerMessage::RoutineFetched { seq, date, result } => {
                if seq != self.fetch_seq {
                    log::debug!(
                        "Discarding stale routine response for {} (seq {} < {})",
                        date,
                        seq,
                        self.fetch_seq
                    );
                    return;
                }

                match result {
                    Ok(events) => {
                        self.events = events;
                        self.load_state = LoadState::Ready;
                        self.error_message = None;
                    }
                    Err(err) => {
                        log::warn!("Routine fetch for {} failed: {}", date, err);
                        self.events.clear();
                        self.load_state = LoadState::Error;
                        self.error_message = Some(err);
                    }
                }
            }
            WorkerMessage::ActionFinished(outcome) => {
                self.action_in_flight = false;
                self.handle_action(outcome);
            }
        }
    }

    fn handle_action(&mut self, outcome: ActionOutcome) {
        match outcome {
            ActionOutcome::AutoAssign(Ok(outcome)) => {
                let severity = if outcome.scheduled.unwrap_or(0) > 0 {
                    Severity::Success
                } else {
                    Severity::Info
                };
                self.notifier.notify(&outcome.message, severity);
                self.refresh();
            }
            ActionOutcome::AutoAssign(Err(err)) => {
                self.notifier
                    .notify(&format!("Auto-schedule failed: {}", err), Severity::Error);
            }
            ActionOutcome::Reschedule(Ok(message))
            | ActionOutcome::CreateTask(Ok(message)) => {
                self.notifier.notify(&message, Severity::Success);
                self.refresh();
            }
            ActionOutcome::Reschedule(Err(err)) => {
                self.notifier
                    .notify(&format!("Reschedule failed: {}", err), Severity::Error);
            }
            ActionOutcome::CreateTask(Err(err)) => {
                self.notifier
                    .notify(&format!("Task creation failed: {}", err), Severity::Error);
            }
        }
    }
}

fn run_reschedule(
    api: &dyn ScheduleApi,
    id: &EventId,
    due: NaiveDateTime,
) -> Result<String, String> {
    api.update_task_due_date(id, due)
        .map_err(|err| err.to_string())?;
    Ok(format!("Task moved to {}", due.format("%B %d, %H:%M")))
}

fn run_create_task(
    api: &dyn ScheduleApi,
    title: &str,
    start: NaiveDateTime,
) -> Result<String, String> {
    api.create_task(title, start).map_err(|err| err.to_string())?;
    Ok(format!("Task \"{}\" created", title))
}
