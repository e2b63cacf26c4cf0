//! A layer: one paint surface plus its draw-state stack.

use log::warn;

use super::color::Color;
use super::state::{DrawState, RectMode};
use crate::backend::{Image, PaintSurface};

/// One drawable layer of a sketch.
///
/// Every drawing call targets whichever layer is currently active on the
/// sketch. The layer pairs the backend surface with the draw-state that the
/// surface itself does not track (paint toggles, colors, line width, rect
/// origin, text style); `save`/`restore` snapshot both sides together so a
/// frame can never leak state into the next one.
pub struct Layer {
    surface: Box<dyn PaintSurface>,
    state: DrawState,
    stack: Vec<DrawState>,
}

impl Layer {
    pub(crate) fn new(surface: Box<dyn PaintSurface>) -> Self {
        Self {
            surface,
            state: DrawState::default(),
            stack: Vec::new(),
        }
    }

    /// Read access to the current draw-state.
    pub fn state(&self) -> &DrawState {
        &self.state
    }

    /// How many saved states are stacked up.
    pub fn stack_depth(&self) -> usize {
        self.stack.len()
    }

    /// Pushes the current draw-state (and the surface's transform).
    pub fn save(&mut self) {
        self.stack.push(self.state.clone());
        self.surface.save();
    }

    /// Pops the most recent draw-state snapshot.
    ///
    /// A restore without a matching save is ignored with a warning; the
    /// surface is only popped when a snapshot actually existed, keeping the
    /// two stacks in lockstep.
    pub fn restore(&mut self) {
        match self.stack.pop() {
            Some(snapshot) => {
                self.state = snapshot;
                self.surface.restore();
            }
            None => warn!("restore without matching save, ignoring"),
        }
    }

    pub(crate) fn set_fill(&mut self, color: Option<Color>) {
        match color {
            Some(color) => {
                self.state.fill_color = color;
                self.state.fill_enabled = true;
            }
            None => self.state.fill_enabled = false,
        }
    }

    pub(crate) fn set_stroke(&mut self, color: Option<Color>) {
        match color {
            Some(color) => {
                self.state.stroke_color = color;
                self.state.stroke_enabled = true;
            }
            None => self.state.stroke_enabled = false,
        }
    }

    pub(crate) fn set_line_width(&mut self, width: f64) {
        self.state.line_width = width;
        self.state.stroke_enabled = true;
    }

    pub(crate) fn set_rect_mode(&mut self, mode: RectMode) {
        self.state.rect_mode = mode;
    }

    pub(crate) fn set_text_style(&mut self, style: super::state::TextStyle) {
        self.state.text = style;
    }

    pub(crate) fn clear(&mut self, width: u32, height: u32) {
        self.surface
            .clear(0.0, 0.0, f64::from(width), f64::from(height));
    }

    pub(crate) fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        let offset = self.state.rect_mode.offset();
        let (ox, oy) = (x - w * offset, y - h * offset);
        if self.state.fill_enabled {
            self.surface.fill_rect(ox, oy, w, h, self.state.fill_color);
        }
        if self.state.stroke_enabled {
            self.surface
                .stroke_rect(ox, oy, w, h, self.state.stroke_color, self.state.line_width);
        }
    }

    pub(crate) fn ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64) {
        if self.state.fill_enabled {
            self.surface
                .fill_ellipse(cx, cy, rx, ry, self.state.fill_color);
        }
        if self.state.stroke_enabled {
            self.surface.stroke_ellipse(
                cx,
                cy,
                rx,
                ry,
                self.state.stroke_color,
                self.state.line_width,
            );
        }
    }

    pub(crate) fn arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64) {
        if self.state.fill_enabled {
            self.surface
                .fill_arc(cx, cy, r, start, end, self.state.fill_color);
        }
        if self.state.stroke_enabled {
            self.surface.stroke_arc(
                cx,
                cy,
                r,
                start,
                end,
                self.state.stroke_color,
                self.state.line_width,
            );
        }
    }

    pub(crate) fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        // Lines are pure stroke geometry; the fill toggle does not apply.
        self.surface.line(
            x1,
            y1,
            x2,
            y2,
            self.state.stroke_color,
            self.state.line_width,
        );
    }

    pub(crate) fn image(&mut self, image: &Image, x: f64, y: f64, size: Option<(f64, f64)>) {
        self.surface.draw_image(image, x, y, size);
    }

    pub(crate) fn text(&mut self, content: &str, x: f64, y: f64) {
        // Text always paints with the fill color, enabled or not, with the
        // baseline nudged so the given y lands near the visual center.
        let nudge = self.state.text.size / 3.0;
        self.surface
            .fill_text(content, x, y + nudge, &self.state.text, self.state.fill_color);
    }

    pub(crate) fn translate(&mut self, x: f64, y: f64) {
        self.surface.translate(x, y);
    }

    pub(crate) fn rotate(&mut self, angle: f64) {
        self.surface.rotate(angle);
    }

    pub(crate) fn scale(&mut self, sx: f64, sy: f64) {
        self.surface.scale(sx, sy);
    }
}

impl std::fmt::Debug for Layer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Layer")
            .field("state", &self.state)
            .field("stack_depth", &self.stack.len())
            .finish()
    }
}
