//! Block colors for the day timeline.
//!
//! Every entry gets a deterministic color from its `(type, priority)` pair
//! unless the backend supplied an explicit override.

use egui::Color32;

use crate::models::schedule_event::{EventType, Priority, ScheduleEvent};

/// Parse a `#RRGGBB` hex color.
pub fn parse_color(hex: &str) -> Option<Color32> {
    if hex.is_empty() {
        return None;
    }

    let hex = hex.trim_start_matches('#');
    if hex.len() != 6 {
        return None;
    }

    let r = u8::from_str_radix(&hex[0..2], 16).ok()?;
    let g = u8::from_str_radix(&hex[2..4], 16).ok()?;
    let b = u8::from_str_radix(&hex[4..6], 16).ok()?;

    Some(Color32::from_rgb(r, g, b))
}

fn task_color(priority: Option<Priority>) -> Color32 {
    match priority {
        Some(Priority::Urgent) => Color32::from_rgb(0xdc, 0x26, 0x26),
        Some(Priority::High) => Color32::from_rgb(0xf9, 0x73, 0x16),
        Some(Priority::Medium) | None => Color32::from_rgb(0x3b, 0x82, 0xf6),
        Some(Priority::Low) => Color32::from_rgb(0x94, 0xa3, 0xb8),
    }
}

fn base_color(event_type: EventType, priority: Option<Priority>) -> Color32 {
    match event_type {
        EventType::Task => task_color(priority),
        EventType::Class => Color32::from_rgb(0x8b, 0x5c, 0xf6),
        EventType::Work => Color32::from_rgb(0x63, 0x66, 0xf1),
        EventType::Meal => Color32::from_rgb(0x22, 0xc5, 0x5e),
        EventType::Break => Color32::from_rgb(0x14, 0xb8, 0xa6),
        EventType::Event => Color32::from_rgb(0x0e, 0xa5, 0xe9),
        EventType::Prep => Color32::from_rgb(0xfa, 0xcc, 0x15),
        EventType::Free | EventType::Other => Color32::from_rgb(0x9c, 0xa3, 0xaf),
    }
}

/// Display color of a timeline entry.
pub fn color_for(event: &ScheduleEvent) -> Color32 {
    event
        .color
        .as_deref()
        .and_then(parse_color)
        .unwrap_or_else(|| base_color(event.event_type, event.priority))
}
