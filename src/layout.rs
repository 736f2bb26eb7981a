//! Option button geometry and pointer hit testing.
//!
//! Everything here works in canvas-local coordinates (origin at the top left
//! of the drawing surface) and is recomputed from the viewport on every call,
//! so a resize can never leave stale bounds behind.

use egui::{pos2, vec2, Pos2, Rect, Vec2};

/// Widths below this use the single column layout.
pub const BREAKPOINT: f32 = 550.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    Narrow,
    Wide,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LayoutMetrics {
    pub mode: LayoutMode,
    pub margin: f32,
    pub button_height: f32,
    pub spacing_y: f32,
    pub start_y: f32,
}

impl LayoutMetrics {
    pub fn for_width(width: f32) -> Self {
        if width < BREAKPOINT {
            Self {
                mode: LayoutMode::Narrow,
                margin: 20.0,
                button_height: 50.0,
                spacing_y: 65.0,
                start_y: 180.0,
            }
        } else {
            Self {
                mode: LayoutMode::Wide,
                margin: 50.0,
                button_height: 60.0,
                spacing_y: 80.0,
                start_y: 220.0,
            }
        }
    }

    pub fn button_width(&self, width: f32) -> f32 {
        match self.mode {
            LayoutMode::Narrow => width - self.margin * 2.0,
            LayoutMode::Wide => (width - self.margin * 3.0) / 2.0,
        }
    }

    fn rows(&self, count: usize) -> usize {
        match self.mode {
            LayoutMode::Narrow => count,
            LayoutMode::Wide => (count + 1) / 2,
        }
    }
}

pub fn option_bounds(viewport: Vec2, count: usize) -> Vec<Rect> {
    let m = LayoutMetrics::for_width(viewport.x);
    let w = m.button_width(viewport.x);

    (0..count)
        .map(|i| {
            let (x, y) = match m.mode {
                LayoutMode::Narrow => (m.margin, m.start_y + i as f32 * m.spacing_y),
                LayoutMode::Wide => {
                    let x = if i % 2 == 0 { m.margin } else { m.margin * 2.0 + w };
                    (x, m.start_y + (i / 2) as f32 * m.spacing_y)
                }
            };
            Rect::from_min_size(pos2(x, y), vec2(w, m.button_height))
        })
        .collect()
}

/// First rectangle, in option order, whose interior holds the point. Edges
/// do not count.
pub fn hit_test(pointer: Pos2, rects: &[Rect]) -> Option<usize> {
    rects.iter().position(|r| strictly_contains(r, pointer))
}

pub fn strictly_contains(rect: &Rect, p: Pos2) -> bool {
    p.x > rect.min.x && p.x < rect.max.x && p.y > rect.min.y && p.y < rect.max.y
}

/// Bottom edge of the last row of buttons.
pub fn options_area_end(viewport: Vec2, count: usize) -> f32 {
    let m = LayoutMetrics::for_width(viewport.x);
    let rows = m.rows(count) as f32;
    m.start_y + rows * m.spacing_y - (m.spacing_y - m.button_height)
}

/// Area the answer feedback may land in: below the buttons, away from the
/// edges. Collapses to a line when the window is too short to fit it.
pub fn feedback_region(viewport: Vec2, count: usize) -> Rect {
    let top = options_area_end(viewport, count) + 30.0;
    let bottom = (viewport.y - 30.0).max(top);
    Rect::from_min_max(
        pos2(viewport.x * 0.1, top),
        pos2(viewport.x * 0.9, bottom),
    )
}

/// Box the question prompt is wrapped into, directly above the buttons.
pub fn question_rect(viewport: Vec2) -> Rect {
    let m = LayoutMetrics::for_width(viewport.x);
    Rect::from_min_size(
        pos2(m.margin, m.start_y - 100.0),
        vec2(viewport.x - m.margin * 2.0, 100.0),
    )
}

/// Font size that grows from `lo` at width 400 to `hi` at width 800.
pub fn text_scale(width: f32, lo: f32, hi: f32) -> f32 {
    let t = ((width - 400.0) / 400.0).clamp(0.0, 1.0);
    lo + (hi - lo) * t
}
