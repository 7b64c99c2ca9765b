use chrono::{NaiveDate, NaiveTime};
use egui::{Context, Id};

use crate::models::schedule_event::EventId;

/// State of an in-progress task drag.
///
/// Created when a drag starts on a task block in the timeline; day strip
/// cells update `hovered_date` while the pointer passes over them; the
/// originating view reads the final state on release.
#[derive(Clone, Debug)]
pub struct DragContext {
    pub event_id: EventId,
    pub title: String,
    pub origin_date: NaiveDate,
    pub start_time: Option<NaiveTime>,
    pub hovered_date: Option<NaiveDate>,
}

pub struct DragManager;

impl DragManager {
    fn storage_id() -> Id {
        Id::new("task_drag_state")
    }

    pub fn begin(ctx: &Context, context: DragContext) {
        ctx.memory_mut(|mem| {
            mem.data.insert_temp(Self::storage_id(), context);
        });
    }

    pub fn active(ctx: &Context) -> Option<DragContext> {
        ctx.memory_mut(|mem| mem.data.get_temp::<DragContext>(Self::storage_id()))
    }

    pub fn is_active(ctx: &Context) -> bool {
        Self::active(ctx).is_some()
    }

    /// Record which day cell, if any, the pointer is currently over.
    /// Cleared every frame so a drop outside the strip has no target.
    pub fn set_hovered_date(ctx: &Context, date: Option<NaiveDate>) {
        let id = Self::storage_id();
        ctx.memory_mut(|mem| {
            if let Some(mut state) = mem.data.get_temp::<DragContext>(id) {
                state.hovered_date = date;
                mem.data.insert_temp(id, state);
            }
        });
    }

    /// Take the drag state on release.
    pub fn finish(ctx: &Context) -> Option<DragContext> {
        let id = Self::storage_id();
        let mut result = None;
        ctx.memory_mut(|mem| {
            if let Some(current) = mem.data.get_temp::<DragContext>(id) {
                result = Some(current);
                mem.data.remove::<DragContext>(id);
            }
        });
        result
    }

    pub fn cancel(ctx: &Context) {
        ctx.memory_mut(|mem| {
            mem.data.remove::<DragContext>(Self::storage_id());
        });
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> DragContext {
        DragContext {
            event_id: EventId::Int(1),
            title: "Essay".to_string(),
            origin_date: NaiveDate::from_ymd_opt(2024, 6, 1).unwrap(),
            start_time: NaiveTime::from_hms_opt(14, 30, 0),
            hovered_date: None,
        }
    }

    #[test]
    fn test_begin_update_finish_cycle() {
        let ctx = Context::default();
        assert!(!DragManager::is_active(&ctx));

        DragManager::begin(&ctx, context());
        assert!(DragManager::is_active(&ctx));

        let target = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        DragManager::set_hovered_date(&ctx, Some(target));

        let finished = DragManager::finish(&ctx).unwrap();
        assert_eq!(finished.hovered_date, Some(target));
        assert!(!DragManager::is_active(&ctx));
    }

    #[test]
    fn test_hover_target_can_be_cleared() {
        let ctx = Context::default();
        DragManager::begin(&ctx, context());

        let target = NaiveDate::from_ymd_opt(2024, 6, 2).unwrap();
        DragManager::set_hovered_date(&ctx, Some(target));
        DragManager::set_hovered_date(&ctx, None);

        assert_eq!(DragManager::finish(&ctx).unwrap().hovered_date, None);
    }

    #[test]
    fn test_cancel_clears_state() {
        let ctx = Context::default();
        DragManager::begin(&ctx, context());
        DragManager::cancel(&ctx);
        assert!(DragManager::finish(&ctx).is_none());
    }
}
