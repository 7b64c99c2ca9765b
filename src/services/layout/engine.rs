//! Day layout computation.
//!
//! Turns a day's timeline entries into positioned blocks: vertical extent
//! from the time grid, side-by-side columns for overlapping entries so no
//! block fully occludes another.

use std::collections::HashMap;

use chrono::Timelike;

use crate::models::schedule_event::{EventId, ScheduleEvent};

use super::grid::{TimeGrid, MINUTES_PER_DAY};

/// Floor for rendered block height. Keeps zero-duration entries visible
/// and clickable.
pub const MIN_EVENT_HEIGHT: f32 = 18.0;

/// Position of one event block within the day surface.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EventBlock {
    pub top: f32,
    pub height: f32,
    pub column: usize,
    /// Columns used by this block's overlap cluster; every member of the
    /// cluster shares the same value so widths stay consistent.
    pub column_count: usize,
}

/// Derived layout for one day. Recomputed on every render, never persisted.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DayLayout {
    blocks: HashMap<EventId, EventBlock>,
    /// Entries ignored because they carried no usable start time.
    pub skipped: usize,
}

impl DayLayout {
    pub fn block(&self, id: &EventId) -> Option<&EventBlock> {
        self.blocks.get(id)
    }

    /// Number of drawable blocks.
    pub fn len(&self) -> usize {
        self.blocks.len()
    }

    pub fn is_empty(&self) -> bool {
        self.blocks.is_empty()
    }
}

/// Drawable entry after filtering, in minutes-of-day.
struct Span<'a> {
    id: &'a EventId,
    start_min: u32,
    duration_min: u32,
}

/// Compute the day layout for `events` under `grid`.
///
/// Entries with `type == free` are informational open time and are not
/// drawn. Entries without a parseable start are skipped and counted in
/// [`DayLayout::skipped`]. Pure with respect to its inputs: the same
/// events and grid always produce the same layout.
pub fn layout(events: &[ScheduleEvent], grid: &TimeGrid) -> DayLayout {
    let mut result = DayLayout::default();
    let mut spans: Vec<Span<'_>> = Vec::with_capacity(events.len());

    for event in events {
        if event.is_free_time() {
            continue;
        }

        let Some(start) = event.start else {
            log::warn!("Skipping timeline entry {} with no start time", event.id);
            result.skipped += 1;
            continue;
        };

        let start_min = start.hour() * 60 + start.minute();
        let duration_min = match event.end {
            // Inverted ranges clamp to zero duration instead of failing
            Some(end) => {
                let seconds = (end - start).num_seconds();
                ((seconds as f64 / 60.0).round().max(0.0)) as u32
            }
            None => 0,
        };

        spans.push(Span {
            id: &event.id,
            start_min,
            duration_min,
        });
    }

    spans.sort_by(|a, b| {
        a.start_min
            .cmp(&b.start_min)
            .then_with(|| a.id.cmp(b.id))
    });

    fn flush_cluster(
        cluster: &mut Vec<(&EventId, usize)>,
        column_ends: &mut Vec<u32>,
        out: &mut DayLayout,
    ) {
        let column_count = column_ends.len().max(1);
        for (id, column) in cluster.drain(..) {
            if let Some(block) = out.blocks.get_mut(id) {
                block.column = column;
                block.column_count = column_count;
            }
        }
        column_ends.clear();
    }

    // Greedy interval partitioning: walk entries in start order, assign each
    // to the lowest-numbered column whose previous occupant has ended, and
    // close a cluster once nothing is still running.
    let mut column_ends: Vec<u32> = Vec::new();
    let mut cluster: Vec<(&EventId, usize)> = Vec::new();
    let mut cluster_end: u32 = 0;

    for span in &spans {
        let top = grid.to_pixels(span.start_min / 60, span.start_min % 60);
        let height = (span.duration_min as f32 * grid.pixels_per_minute()).max(MIN_EVENT_HEIGHT);
        // Keep blocks inside the 24-hour surface
        let height = height.min(grid.total_height() - top);

        result.blocks.insert(
            span.id.clone(),
            EventBlock {
                top,
                height,
                column: 0,
                column_count: 1,
            },
        );

        if !cluster.is_empty() && span.start_min >= cluster_end {
            flush_cluster(&mut cluster, &mut column_ends, &mut result);
        }

        let end_min = span
            .start_min
            .saturating_add(span.duration_min)
            .min(MINUTES_PER_DAY);

        let column = match column_ends
            .iter()
            .position(|&col_end| col_end <= span.start_min)
        {
            Some(free) => {
                column_ends[free] = end_min;
                free
            }
            None => {
                column_ends.push(end_min);
                column_ends.len() - 1
            }
        };

        cluster.push((span.id, column));
        cluster_end = cluster_end.max(end_min);
    }

    flush_cluster(&mut cluster, &mut column_ends, &mut result);

    result
}
