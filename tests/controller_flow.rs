// End-to-end controller scenarios against a scripted schedule backend
// Exercises the navigate/fetch/render cycle, the stale-response guard, and
// the auto-schedule and reschedule round trips over real worker threads

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::{anyhow, Result};
use chrono::{Local, NaiveDate, NaiveDateTime, TimeZone};

use aura_timeline::models::schedule_event::{EventId, EventType, Priority, ScheduleEvent};
use aura_timeline::services::notification::{Notifier, Severity};
use aura_timeline::services::schedule::{
    AutoAssignOutcome, CalendarController, LoadState, ScheduleApi,
};

/// Scripted stand-in for the schedule backend.
///
/// Routines, failures, and per-day response delays are configured up
/// front; every mutating call is recorded for assertions.
#[derive(Default)]
struct ScriptedApi {
    routines: Mutex<HashMap<NaiveDate, Vec<ScheduleEvent>>>,
    failing_dates: Mutex<HashSet<NaiveDate>>,
    delays: Mutex<HashMap<NaiveDate, Duration>>,
    fetch_count: AtomicUsize,
    auto_assign_reply: Mutex<Option<std::result::Result<AutoAssignOutcome, String>>>,
    reschedule_calls: Mutex<Vec<(EventId, NaiveDateTime)>>,
    created_tasks: Mutex<Vec<(String, NaiveDateTime)>>,
}

impl ScriptedApi {
    fn with_routine(date: NaiveDate, events: Vec<ScheduleEvent>) -> Arc<Self> {
        let api = Arc::new(Self::default());
        api.routines.lock().unwrap().insert(date, events);
        api
    }

    fn set_delay(&self, date: NaiveDate, delay: Duration) {
        self.delays.lock().unwrap().insert(date, delay);
    }

    fn fail_on(&self, date: NaiveDate) {
        self.failing_dates.lock().unwrap().insert(date);
    }

    fn script_auto_assign(&self, reply: std::result::Result<AutoAssignOutcome, String>) {
        *self.auto_assign_reply.lock().unwrap() = Some(reply);
    }

    fn fetches(&self) -> usize {
        self.fetch_count.load(Ordering::SeqCst)
    }
}

impl ScheduleApi for ScriptedApi {
    fn fetch_routine(&self, date: NaiveDate) -> Result<Vec<ScheduleEvent>> {
        let delay = self.delays.lock().unwrap().get(&date).copied();
        if let Some(delay) = delay {
            thread::sleep(delay);
        }
        self.fetch_count.fetch_add(1, Ordering::SeqCst);

        if self.failing_dates.lock().unwrap().contains(&date) {
            return Err(anyhow!("connection refused"));
        }
        Ok(self
            .routines
            .lock()
            .unwrap()
            .get(&date)
            .cloned()
            .unwrap_or_default())
    }

    fn auto_assign(&self, _date: NaiveDate) -> Result<AutoAssignOutcome> {
        match self.auto_assign_reply.lock().unwrap().clone() {
            Some(Ok(outcome)) => Ok(outcome),
            Some(Err(message)) => Err(anyhow!(message)),
            None => Err(anyhow!("no auto-assign reply scripted")),
        }
    }

    fn update_task_due_date(&self, id: &EventId, due: NaiveDateTime) -> Result<()> {
        self.reschedule_calls.lock().unwrap().push((id.clone(), due));
        Ok(())
    }

    fn create_task(&self, title: &str, due: NaiveDateTime) -> Result<()> {
        self.created_tasks
            .lock()
            .unwrap()
            .push((title.to_string(), due));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingNotifier {
    messages: Mutex<Vec<(String, Severity)>>,
}

impl RecordingNotifier {
    fn recorded(&self) -> Vec<(String, Severity)> {
        self.messages.lock().unwrap().clone()
    }
}

impl Notifier for RecordingNotifier {
    fn notify(&self, message: &str, severity: Severity) {
        self.messages
            .lock()
            .unwrap()
            .push((message.to_string(), severity));
    }
}

/// Poll the controller until `done` holds or the deadline passes.
fn pump(
    controller: &mut CalendarController,
    timeout_ms: u64,
    mut done: impl FnMut(&CalendarController) -> bool,
) {
    let deadline = Instant::now() + Duration::from_millis(timeout_ms);
    while Instant::now() < deadline {
        controller.poll();
        if done(controller) {
            return;
        }
        thread::sleep(Duration::from_millis(5));
    }
    panic!("timed out waiting for the controller");
}

fn date(day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(2024, 6, day).unwrap()
}

fn task(id: i64, day: u32, hour: u32, minute: u32) -> ScheduleEvent {
    let start = Local.with_ymd_and_hms(2024, 6, day, hour, minute, 0).unwrap();
    ScheduleEvent::builder()
        .id(id)
        .title(format!("Task {}", id))
        .event_type(EventType::Task)
        .priority(Priority::Medium)
        .start(start)
        .end(start + chrono::Duration::hours(1))
        .build()
        .unwrap()
}

#[test]
fn test_navigate_fetches_and_reaches_ready() {
    let api = ScriptedApi::with_routine(date(1), vec![task(1, 1, 9, 0)]);
    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(api, notifier);

    controller.navigate(date(1));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Ready);

    assert_eq!(controller.cursor(), date(1));
    assert_eq!(controller.events().len(), 1);
    assert_eq!(controller.events()[0].id, 1.into());
}

#[test]
fn test_fetch_failure_reaches_error_state_with_message() {
    let api = Arc::new(ScriptedApi::default());
    api.fail_on(date(1));
    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(api, notifier);

    controller.navigate(date(1));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Error);

    assert_eq!(controller.error_message(), Some("connection refused"));
    assert!(controller.events().is_empty());
    // The cursor keeps the navigated date so retry targets the right day
    assert_eq!(controller.cursor(), date(1));
}

#[test]
fn test_slow_stale_fetch_never_overwrites_newer_navigation() {
    let api = ScriptedApi::with_routine(date(1), vec![task(1, 1, 9, 0)]);
    api.routines
        .lock()
        .unwrap()
        .insert(date(2), vec![task(2, 2, 10, 0)]);
    api.set_delay(date(1), Duration::from_millis(200));

    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(Arc::clone(&api) as Arc<dyn ScheduleApi>, notifier);

    // The fetch for June 1 is still in flight when June 2 is requested
    controller.navigate(date(1));
    controller.navigate(date(2));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Ready);

    assert_eq!(controller.cursor(), date(2));
    assert_eq!(controller.events()[0].id, 2.into());

    // Let the slow June 1 response straggle in, then drain it
    thread::sleep(Duration::from_millis(300));
    controller.poll();

    assert_eq!(controller.cursor(), date(2));
    assert_eq!(controller.events().len(), 1);
    assert_eq!(controller.events()[0].id, 2.into());
}

#[test]
fn test_auto_schedule_surfaces_message_and_refreshes_once() {
    let api = ScriptedApi::with_routine(date(1), Vec::new());
    api.script_auto_assign(Ok(AutoAssignOutcome {
        message: "Scheduled 3 tasks".to_string(),
        scheduled: Some(3),
    }));

    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(
        Arc::clone(&api) as Arc<dyn ScheduleApi>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );

    controller.navigate(date(1));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Ready);
    let fetches_before = api.fetches();

    controller.auto_schedule();
    pump(&mut controller, 2000, |c| {
        !c.action_in_flight() && c.load_state() == LoadState::Ready
    });

    let recorded = notifier.recorded();
    assert_eq!(recorded.len(), 1);
    assert_eq!(recorded[0].0, "Scheduled 3 tasks");
    assert_eq!(api.fetches(), fetches_before + 1);
}

#[test]
fn test_auto_schedule_transport_failure_keeps_current_view() {
    let api = ScriptedApi::with_routine(date(1), vec![task(1, 1, 9, 0)]);
    api.script_auto_assign(Err("gateway timeout".to_string()));

    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(
        Arc::clone(&api) as Arc<dyn ScheduleApi>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );

    controller.navigate(date(1));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Ready);
    let fetches_before = api.fetches();

    controller.auto_schedule();
    pump(&mut controller, 2000, |c| !c.action_in_flight());

    // No refresh was issued and the previous data is intact
    assert_eq!(api.fetches(), fetches_before);
    assert_eq!(controller.load_state(), LoadState::Ready);
    assert_eq!(controller.events().len(), 1);
    assert_eq!(notifier.recorded()[0].1, Severity::Error);
}

#[test]
fn test_reschedule_drop_issues_one_put_then_one_refresh() {
    let api = ScriptedApi::with_routine(date(1), vec![task(1, 1, 14, 30)]);
    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(
        Arc::clone(&api) as Arc<dyn ScheduleApi>,
        notifier,
    );

    controller.navigate(date(1));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Ready);
    let fetches_before = api.fetches();

    controller.reschedule_task(1.into(), date(2));
    pump(&mut controller, 2000, |c| {
        !c.action_in_flight() && c.load_state() == LoadState::Ready
    });

    let calls = api.reschedule_calls.lock().unwrap().clone();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, EventId::Int(1));
    // Time-of-day is preserved across the day change
    assert_eq!(
        calls[0].1,
        date(2).and_hms_opt(14, 30, 0).unwrap()
    );
    assert_eq!(api.fetches(), fetches_before + 1);
}

#[test]
fn test_create_task_posts_then_refreshes() {
    let api = ScriptedApi::with_routine(date(1), Vec::new());
    let notifier = Arc::new(RecordingNotifier::default());
    let mut controller = CalendarController::new(
        Arc::clone(&api) as Arc<dyn ScheduleApi>,
        Arc::clone(&notifier) as Arc<dyn Notifier>,
    );

    controller.navigate(date(1));
    pump(&mut controller, 2000, |c| c.load_state() == LoadState::Ready);
    let fetches_before = api.fetches();

    let start = date(1).and_hms_opt(15, 0, 0).unwrap();
    controller.create_task("Write report".to_string(), start);
    pump(&mut controller, 2000, |c| {
        !c.action_in_flight() && c.load_state() == LoadState::Ready
    });

    let created = api.created_tasks.lock().unwrap().clone();
    assert_eq!(created, vec![("Write report".to_string(), start)]);
    assert_eq!(api.fetches(), fetches_before + 1);
    assert_eq!(notifier.recorded()[0].1, Severity::Success);
}
