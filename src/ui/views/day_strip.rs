//! Week strip above the timeline.
//!
//! Seven day cells for the cursor's week: click to navigate, and during an
//! active task drag each cell doubles as a drop target for rescheduling.

use chrono::{Datelike, Local, NaiveDate};
use egui::{Color32, FontId, Pos2, Sense, Stroke, Vec2};

use crate::ui::drag::DragManager;
use crate::utils::date::week_start;

const CELL_HEIGHT: f32 = 48.0;
const CELL_SPACING: f32 = 4.0;
const WEEKDAY_LABELS: [&str; 7] = ["Sun", "Mon", "Tue", "Wed", "Thu", "Fri", "Sat"];

/// Result of one frame of the strip.
#[derive(Default)]
pub struct DayStripResponse {
    pub navigate_to: Option<NaiveDate>,
}

pub struct DayStrip;

impl DayStrip {
    pub fn show(ui: &mut egui::Ui, cursor: NaiveDate) -> DayStripResponse {
        let mut result = DayStripResponse::default();

        let today = Local::now().date_naive();
        let start = week_start(cursor);
        let drag_active = DragManager::is_active(ui.ctx());

        let dark_mode = ui.style().visuals.dark_mode;
        let (cell_bg, cursor_bg, text_color, today_color) = if dark_mode {
            (
                Color32::from_gray(40),
                Color32::from_rgb(45, 70, 110),
                Color32::from_gray(200),
                Color32::from_rgb(120, 170, 255),
            )
        } else {
            (
                Color32::from_rgb(240, 240, 240),
                Color32::from_rgb(210, 228, 250),
                Color32::from_gray(60),
                Color32::from_rgb(40, 100, 200),
            )
        };

        let mut hovered_drop_target = None;

        ui.horizontal(|ui| {
            ui.spacing_mut().item_spacing.x = CELL_SPACING;
            let cell_width = (ui.available_width() - CELL_SPACING * 6.0) / 7.0;

            for day_offset in 0..7 {
                let date = start + chrono::Duration::days(day_offset);
                let (rect, response) = ui.allocate_exact_size(
                    Vec2::new(cell_width, CELL_HEIGHT),
                    Sense::click().union(Sense::hover()),
                );

                let is_cursor = date == cursor;
                let bg = if is_cursor { cursor_bg } else { cell_bg };
                ui.painter().rect_filled(rect, 6.0, bg);

                // Drop target feedback while a task drag is underway.
                // contains_pointer rather than hovered: hover is suppressed
                // on other widgets while the timeline block is being dragged.
                if drag_active && response.contains_pointer() {
                    hovered_drop_target = Some(date);
                    let highlight = rect.shrink(2.0);
                    ui.painter().rect_filled(
                        highlight,
                        4.0,
                        Color32::from_rgba_unmultiplied(120, 200, 120, 35),
                    );
                    ui.painter().rect_stroke(
                        highlight,
                        4.0,
                        Stroke::new(1.5, Color32::from_rgb(120, 200, 120)),
                    );
                }

                let label_color = if date == today { today_color } else { text_color };
                let weekday = WEEKDAY_LABELS[date.weekday().num_days_from_sunday() as usize];
                ui.painter().text(
                    Pos2::new(rect.center().x, rect.top() + 8.0),
                    egui::Align2::CENTER_TOP,
                    weekday,
                    FontId::proportional(11.0),
                    label_color,
                );
                ui.painter().text(
                    Pos2::new(rect.center().x, rect.bottom() - 8.0),
                    egui::Align2::CENTER_BOTTOM,
                    format!("{}", date.day()),
                    FontId::proportional(15.0),
                    label_color,
                );

                if date == today {
                    ui.painter()
                        .rect_stroke(rect, 6.0, Stroke::new(1.0, today_color));
                }

                if response.clicked() {
                    result.navigate_to = Some(date);
                }
            }
        });

        if drag_active {
            DragManager::set_hovered_date(ui.ctx(), hovered_drop_target);
        }

        result
    }
}
