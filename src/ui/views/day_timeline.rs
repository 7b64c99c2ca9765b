//! Continuous day timeline.
//!
//! Renders one day as a 24-hour pixel surface: hour guide lines, event
//! blocks positioned by the layout engine, the current time indicator, and
//! the two interaction affordances (click-to-create on empty space,
//! drag-to-reschedule for task blocks). The view only emits intents; the
//! controller performs every mutation.

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use egui::{Color32, CursorIcon, FontId, Pos2, Rect, Sense, Stroke, Vec2};

use crate::models::schedule_event::{EventId, ScheduleEvent};
use crate::services::layout::{DayLayout, TimeGrid};
use crate::ui::drag::{DragContext, DragManager};

use super::palette::color_for;

pub const TIME_LABEL_WIDTH: f32 = 50.0;
pub const COLUMN_SPACING: f32 = 2.0;

/// Marker text rendered when the day has nothing to draw.
pub const EMPTY_STATE_TEXT: &str = "No events scheduled.";

/// Intents emitted by one frame of the timeline.
#[derive(Default)]
pub struct TimelineResponse {
    /// Click on empty grid space at this candidate start time.
    pub create_requested: Option<NaiveDateTime>,
    /// Task dropped onto a different day.
    pub reschedule_requested: Option<(EventId, NaiveDate)>,
    /// Whether the empty-state marker was shown this frame.
    pub empty_state_shown: bool,
}

pub struct DayTimelineView;

impl DayTimelineView {
    pub fn show(
        ui: &mut egui::Ui,
        date: NaiveDate,
        events: &[ScheduleEvent],
        layout: &DayLayout,
        grid: &TimeGrid,
    ) -> TimelineResponse {
        let mut result = TimelineResponse::default();

        let desired_size = Vec2::new(ui.available_width(), grid.total_height());
        let drag_sense = Sense::click_and_drag().union(Sense::hover());
        let (rect, response) = ui.allocate_exact_size(desired_size, drag_sense);

        let dark_mode = ui.style().visuals.dark_mode;
        let (hour_line_color, label_color, surface_bg) = if dark_mode {
            (
                Color32::from_gray(60),
                Color32::GRAY,
                Color32::from_gray(32),
            )
        } else {
            (
                Color32::from_rgb(220, 220, 220),
                Color32::GRAY,
                Color32::from_rgb(250, 250, 250),
            )
        };

        ui.painter().rect_filled(rect, 0.0, surface_bg);

        // Hour guide lines across the full 24-hour window
        for hour in 0..24u32 {
            let y = rect.top() + grid.to_pixels(hour, 0);
            ui.painter().line_segment(
                [
                    Pos2::new(rect.left() + TIME_LABEL_WIDTH, y),
                    Pos2::new(rect.right(), y),
                ],
                Stroke::new(1.0, hour_line_color),
            );
            ui.painter().text(
                Pos2::new(rect.left() + TIME_LABEL_WIDTH - 6.0, y),
                egui::Align2::RIGHT_TOP,
                format!("{:02}:00", hour),
                FontId::proportional(12.0),
                label_color,
            );
        }

        let lane_left = rect.left() + TIME_LABEL_WIDTH + COLUMN_SPACING;
        let lane_width = (rect.width() - TIME_LABEL_WIDTH - 2.0 * COLUMN_SPACING).max(0.0);

        let mut event_hitboxes: Vec<(Rect, &ScheduleEvent)> = Vec::new();

        for event in events {
            let Some(block) = layout.block(&event.id) else {
                continue;
            };

            let column_width = lane_width / block.column_count as f32;
            let block_rect = Rect::from_min_size(
                Pos2::new(
                    lane_left + block.column as f32 * column_width + 1.0,
                    rect.top() + block.top + 1.0,
                ),
                Vec2::new(
                    (column_width - COLUMN_SPACING).max(4.0),
                    (block.height - 2.0).max(4.0),
                ),
            );

            Self::render_block(ui, block_rect, event);
            event_hitboxes.push((block_rect, event));
        }

        if layout.is_empty() {
            ui.painter().text(
                Pos2::new(rect.center().x, rect.top() + 40.0),
                egui::Align2::CENTER_CENTER,
                EMPTY_STATE_TEXT,
                FontId::proportional(14.0),
                label_color,
            );
            result.empty_state_shown = true;
        }

        if date == Local::now().date_naive() {
            Self::draw_current_time_indicator(ui, rect, grid);
        }

        let pointer_pos = response.interact_pointer_pos();
        let pointer_event = pointer_pos.and_then(|pos| {
            event_hitboxes
                .iter()
                .rev()
                .find(|(hit_rect, _)| hit_rect.contains(pos))
                .map(|(_, event)| *event)
        });

        // Click on empty grid space proposes a new entry at that time
        if response.clicked() && pointer_event.is_none() {
            if let Some(pos) = pointer_pos {
                let (hour, minute) = grid.from_pixels(pos.y - rect.top());
                if let Some(time) = chrono::NaiveTime::from_hms_opt(hour, minute, 0) {
                    result.create_requested = Some(date.and_time(time));
                }
            }
        }

        if response.drag_started() {
            if let Some(event) = pointer_event {
                if event.event_type.is_reschedulable() {
                    DragManager::begin(
                        ui.ctx(),
                        DragContext {
                            event_id: event.id.clone(),
                            title: event.title.clone(),
                            origin_date: date,
                            start_time: event.start.map(|start| start.time()),
                            hovered_date: None,
                        },
                    );
                }
            }
        }

        if response.dragged() && DragManager::is_active(ui.ctx()) {
            ui.output_mut(|out| out.cursor_icon = CursorIcon::Grabbing);
        }

        if response.drag_stopped() {
            if let Some(drag) = DragManager::finish(ui.ctx()) {
                match drag.hovered_date {
                    Some(target) if target != drag.origin_date => {
                        result.reschedule_requested = Some((drag.event_id, target));
                    }
                    _ => {}
                }
            }
        }

        result
    }

    fn render_block(ui: &mut egui::Ui, block_rect: Rect, event: &ScheduleEvent) {
        let base_color = color_for(event);
        let event_color = if event.is_completed() {
            base_color.linear_multiply(0.4)
        } else {
            base_color
        };

        ui.painter().rect_filled(block_rect, 2.0, event_color);

        // Accent bar on the left edge
        let bar_rect = Rect::from_min_size(block_rect.min, Vec2::new(3.0, block_rect.height()));
        ui.painter()
            .rect_filled(bar_rect, 2.0, event_color.linear_multiply(0.7));

        let text_left = bar_rect.right() + 5.0;
        let text_width = (block_rect.right() - text_left - 4.0).max(0.0);

        let title_job = egui::text::LayoutJob::simple(
            event.title.clone(),
            FontId::proportional(13.0),
            Color32::WHITE,
            text_width,
        );
        let galley = ui.fonts(|f| f.layout_job(title_job));
        ui.painter().galley(
            Pos2::new(text_left, block_rect.top() + 2.0),
            galley,
            Color32::WHITE,
        );

        // Time range fits only on taller blocks
        if block_rect.height() >= 34.0 {
            if let (Some(start), Some(end)) = (event.start, event.end) {
                let time_str = format!(
                    "{:02}:{:02} - {:02}:{:02}",
                    start.hour(),
                    start.minute(),
                    end.hour(),
                    end.minute()
                );
                ui.painter().text(
                    Pos2::new(text_left, block_rect.top() + 18.0),
                    egui::Align2::LEFT_TOP,
                    time_str,
                    FontId::proportional(10.0),
                    Color32::WHITE,
                );
            }
        }
    }

    /// Render the failed-fetch state in place of the timeline surface.
    /// Returns whether the user asked to retry.
    pub fn show_error(ui: &mut egui::Ui, message: &str) -> bool {
        let mut retry = false;

        ui.vertical_centered(|ui| {
            ui.add_space(60.0);
            ui.colored_label(Color32::from_rgb(220, 80, 80), "Could not load this day");
            ui.label(message);
            ui.add_space(8.0);
            if ui.button("Retry").clicked() {
                retry = true;
            }
        });

        retry
    }

    fn draw_current_time_indicator(ui: &mut egui::Ui, rect: Rect, grid: &TimeGrid) {
        let now = Local::now().time();
        let y = rect.top() + grid.to_pixels(now.hour(), now.minute());

        let line_color = Color32::from_rgb(255, 100, 100);
        let x_start = rect.left() + TIME_LABEL_WIDTH;

        ui.painter()
            .circle_filled(Pos2::new(x_start - 4.0, y), 3.0, line_color);
        ui.painter().line_segment(
            [Pos2::new(x_start, y), Pos2::new(rect.right(), y)],
            Stroke::new(2.0, line_color),
        );
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::schedule_event::EventType;
    use crate::services::layout;
    use chrono::TimeZone;

    fn run_frame(events: Vec<ScheduleEvent>) -> TimelineResponse {
        let grid = TimeGrid::new(1.0);
        let day_layout = layout::layout(&events, &grid);
        let date = NaiveDate::from_ymd_opt(2024, 6, 1).unwrap();

        let ctx = egui::Context::default();
        let mut captured = None;
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                captured = Some(DayTimelineView::show(ui, date, &events, &day_layout, &grid));
            });
        });
        captured.unwrap()
    }

    #[test]
    fn test_empty_day_shows_empty_state_marker() {
        let response = run_frame(Vec::new());
        assert!(response.empty_state_shown);
    }

    #[test]
    fn test_day_with_events_has_no_empty_state() {
        let event = ScheduleEvent::builder()
            .id(1)
            .title("Standup")
            .event_type(EventType::Work)
            .start(Local.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
            .end(Local.with_ymd_and_hms(2024, 6, 1, 9, 30, 0).unwrap())
            .build()
            .unwrap();

        let response = run_frame(vec![event]);
        assert!(!response.empty_state_shown);
        assert!(response.create_requested.is_none());
        assert!(response.reschedule_requested.is_none());
    }

    #[test]
    fn test_error_state_renders_without_retry_by_default() {
        let ctx = egui::Context::default();
        let mut retry = true;
        let _ = ctx.run(Default::default(), |ctx| {
            egui::CentralPanel::default().show(ctx, |ui| {
                retry = DayTimelineView::show_error(ui, "connection refused");
            });
        });
        assert!(!retry);
    }

    #[test]
    fn test_free_only_day_shows_empty_state() {
        let free = ScheduleEvent::builder()
            .id("free-1")
            .title("Free")
            .event_type(EventType::Free)
            .start(Local.with_ymd_and_hms(2024, 6, 1, 9, 0, 0).unwrap())
            .end(Local.with_ymd_and_hms(2024, 6, 1, 12, 0, 0).unwrap())
            .build()
            .unwrap();

        let response = run_frame(vec![free]);
        assert!(response.empty_state_shown);
    }
}
