//! Application shell.
//!
//! Hosts the header bar, week strip, and day timeline, and owns the single
//! [`CalendarController`] every view intent is routed through. The update
//! loop polls the controller's worker channel each frame, so all state
//! mutation stays on the UI thread.

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveDateTime};
use egui::{Align, Color32, FontId, Layout, Rect, RichText, Vec2};

use crate::models::settings::Settings;
use crate::services::layout::{self, DayLayout, TimeGrid};
use crate::services::notification::Notifier;
use crate::services::schedule::{CalendarController, LoadState, ScheduleApi};
use crate::ui::drag::DragManager;
use crate::ui::views::{DayStrip, DayTimelineView};

/// State of the new-task dialog opened by click-to-create.
struct NewTaskDialog {
    start: NaiveDateTime,
    title: String,
}

pub struct AuraApp {
    controller: CalendarController,
    grid: TimeGrid,
    new_task: Option<NewTaskDialog>,
}

impl AuraApp {
    pub fn new(
        settings: &Settings,
        api: Arc<dyn ScheduleApi>,
        notifier: Arc<dyn Notifier>,
    ) -> Self {
        Self {
            controller: CalendarController::new(api, notifier),
            grid: TimeGrid::new(settings.pixels_per_minute),
            new_task: None,
        }
    }

    /// One frame of the application. Split out of [`eframe::App::update`]
    /// so tests can drive it without an `eframe::Frame`.
    fn frame(&mut self, ctx: &egui::Context) {
        self.controller.on_activate();

        if self.controller.poll() {
            ctx.request_repaint();
        }
        if self.controller.is_loading() || self.controller.action_in_flight() {
            ctx.request_repaint_after(Duration::from_millis(100));
        }
        if self.controller.cursor() == Local::now().date_naive() {
            // Keep the current-time indicator moving
            ctx.request_repaint_after(Duration::from_secs(60));
        }

        if ctx.input(|i| i.key_pressed(egui::Key::Escape)) {
            DragManager::cancel(ctx);
        }

        let day_layout = layout::layout(self.controller.events(), &self.grid);

        self.render_header(ctx);
        self.render_status_bar(ctx, &day_layout);
        self.render_central(ctx, &day_layout);
        self.render_new_task_dialog(ctx);
        render_drag_overlay(ctx);
    }

    fn render_header(&mut self, ctx: &egui::Context) {
        egui::TopBottomPanel::top("header").show(ctx, |ui| {
            ui.add_space(4.0);
            ui.horizontal(|ui| {
                if ui.button("◀").clicked() {
                    self.controller.prev_day();
                }
                if ui.button("Today").clicked() {
                    self.controller.go_to_today();
                }
                if ui.button("▶").clicked() {
                    self.controller.next_day();
                }

                ui.add_space(12.0);
                ui.label(
                    RichText::new(self.controller.cursor().format("%A, %B %d, %Y").to_string())
                        .size(16.0)
                        .strong(),
                );

                ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                    let actions_enabled = !self.controller.action_in_flight();
                    if ui
                        .add_enabled(actions_enabled, egui::Button::new("Magic Schedule"))
                        .on_hover_text("Let AURA place unscheduled tasks into free slots")
                        .clicked()
                    {
                        self.controller.auto_schedule();
                    }
                    if ui.button("Refresh").clicked() {
                        self.controller.refresh();
                    }
                });
            });
            ui.add_space(4.0);
        });
    }

    fn render_status_bar(&self, ctx: &egui::Context, day_layout: &DayLayout) {
        egui::TopBottomPanel::bottom("status_bar")
            .exact_height(24.0)
            .show(ctx, |ui| {
                ui.horizontal_centered(|ui| {
                    ui.label(RichText::new(format!("{} events", day_layout.len())).size(12.0));

                    if day_layout.skipped > 0 {
                        ui.separator();
                        ui.colored_label(
                            Color32::from_rgb(220, 160, 60),
                            RichText::new(format!(
                                "{} malformed {} ignored",
                                day_layout.skipped,
                                if day_layout.skipped == 1 { "entry" } else { "entries" }
                            ))
                            .size(12.0),
                        );
                    }

                    ui.with_layout(Layout::right_to_left(Align::Center), |ui| {
                        let status = match self.controller.load_state() {
                            LoadState::Idle => "",
                            LoadState::Loading => "Loading…",
                            LoadState::Ready => "Up to date",
                            LoadState::Error => "Fetch failed",
                        };
                        ui.label(RichText::new(status).size(12.0));
                        if self.controller.action_in_flight() {
                            ui.spinner();
                        }
                    });
                });
            });
    }

    fn render_central(&mut self, ctx: &egui::Context, day_layout: &DayLayout) {
        egui::CentralPanel::default().show(ctx, |ui| {
            let strip = DayStrip::show(ui, self.controller.cursor());
            if let Some(date) = strip.navigate_to {
                self.controller.navigate(date);
            }
            ui.add_space(6.0);

            match self.controller.load_state() {
                LoadState::Idle | LoadState::Loading => {
                    ui.centered_and_justified(|ui| {
                        ui.spinner();
                    });
                }
                LoadState::Error => {
                    let message = self
                        .controller
                        .error_message()
                        .unwrap_or("Unknown error")
                        .to_string();
                    if DayTimelineView::show_error(ui, &message) {
                        self.controller.refresh();
                    }
                }
                LoadState::Ready => {
                    let response = egui::ScrollArea::vertical()
                        .auto_shrink([false; 2])
                        .show(ui, |ui| {
                            DayTimelineView::show(
                                ui,
                                self.controller.cursor(),
                                self.controller.events(),
                                day_layout,
                                &self.grid,
                            )
                        })
                        .inner;

                    if let Some(start) = response.create_requested {
                        self.new_task = Some(NewTaskDialog {
                            start,
                            title: String::new(),
                        });
                    }
                    if let Some((id, date)) = response.reschedule_requested {
                        self.controller.reschedule_task(id, date);
                    }
                }
            }
        });
    }

    fn render_new_task_dialog(&mut self, ctx: &egui::Context) {
        let Some(dialog) = &mut self.new_task else {
            return;
        };

        let mut close = false;
        let mut submit = None;

        egui::Window::new("New task")
            .collapsible(false)
            .resizable(false)
            .anchor(egui::Align2::CENTER_CENTER, Vec2::ZERO)
            .show(ctx, |ui| {
                ui.label(format!("Starts {}", dialog.start.format("%A at %H:%M")));
                ui.add_space(4.0);
                ui.text_edit_singleline(&mut dialog.title);
                ui.add_space(8.0);

                ui.horizontal(|ui| {
                    let can_create = !dialog.title.trim().is_empty();
                    if ui
                        .add_enabled(can_create, egui::Button::new("Create"))
                        .clicked()
                    {
                        submit = Some((dialog.title.trim().to_string(), dialog.start));
                        close = true;
                    }
                    if ui.button("Cancel").clicked() {
                        close = true;
                    }
                });
            });

        if let Some((title, start)) = submit {
            self.controller.create_task(title, start);
        }
        if close {
            self.new_task = None;
        }
    }
}

impl eframe::App for AuraApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.frame(ctx);
    }
}

/// Floating label following the pointer during a task drag.
fn render_drag_overlay(ctx: &egui::Context) {
    let Some(drag) = DragManager::active(ctx) else {
        return;
    };
    let Some(pos) = ctx.pointer_latest_pos() else {
        return;
    };

    let painter = ctx.layer_painter(egui::LayerId::new(
        egui::Order::Tooltip,
        egui::Id::new("task_drag_overlay"),
    ));
    let galley = painter.layout_no_wrap(
        drag.title.clone(),
        FontId::proportional(12.0),
        Color32::WHITE,
    );
    let rect = Rect::from_min_size(
        pos + egui::vec2(14.0, 10.0),
        galley.size() + egui::vec2(12.0, 6.0),
    );
    painter.rect_filled(rect, 4.0, Color32::from_rgba_unmultiplied(40, 40, 40, 230));
    painter.galley(rect.min + egui::vec2(6.0, 3.0), galley, Color32::WHITE);
}
