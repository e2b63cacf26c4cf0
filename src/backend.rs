//! Drawing-backend interface and a recording reference implementation.
//!
//! The runtime never rasterizes anything itself. Each layer owns a
//! [`PaintSurface`] provided by a [`RenderBackend`], and all drawing calls
//! lower to the small capability set defined here: clear, shape primitives,
//! images, text, state save/restore, and affine transforms.
//!
//! [`RecordingBackend`] implements the interface by logging every call as a
//! [`DrawCommand`]. It is what the tests run against, and it doubles as a
//! reference for writing real backends.

use std::cell::RefCell;
use std::rc::Rc;

use crate::draw::color::Color;
use crate::draw::state::TextStyle;
use crate::error::{Error, Result};

/// An image previously loaded through the backend.
///
/// The handle is opaque to the runtime; only the backend knows what the id
/// refers to. Dimensions are whatever the backend reported at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Image {
    /// Backend-assigned identifier.
    pub id: u64,
    /// Pixel width as reported by the backend.
    pub width: u32,
    /// Pixel height as reported by the backend.
    pub height: u32,
}

/// One drawable surface, owned by a single layer.
///
/// Transform state (translate/rotate/scale) is the surface's own business
/// and must participate in `save`/`restore`; paint colors and widths are
/// passed explicitly with every call, so surfaces need not retain them.
pub trait PaintSurface {
    /// Clears a region to transparent.
    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64);
    /// Fills an axis-aligned rectangle.
    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color);
    /// Outlines an axis-aligned rectangle.
    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color, width: f64);
    /// Fills an axis-aligned ellipse given center and radii.
    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Color);
    /// Outlines an axis-aligned ellipse given center and radii.
    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Color, width: f64);
    /// Fills a circular arc (pie) between two angles in radians.
    fn fill_arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, color: Color);
    /// Outlines a circular arc between two angles in radians.
    fn stroke_arc(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        start: f64,
        end: f64,
        color: Color,
        width: f64,
    );
    /// Draws a straight line segment.
    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64);
    /// Draws an image at natural size, or stretched when `size` is given.
    fn draw_image(&mut self, image: &Image, x: f64, y: f64, size: Option<(f64, f64)>);
    /// Draws a run of text centered on `x`.
    fn fill_text(&mut self, content: &str, x: f64, y: f64, style: &TextStyle, color: Color);
    /// Pushes the surface's transform state.
    fn save(&mut self);
    /// Pops the surface's transform state.
    fn restore(&mut self);
    /// Translates the current transform.
    fn translate(&mut self, x: f64, y: f64);
    /// Rotates the current transform by `angle` radians.
    fn rotate(&mut self, angle: f64);
    /// Scales the current transform.
    fn scale(&mut self, sx: f64, sy: f64);
}

/// Factory for paint surfaces and images.
pub trait RenderBackend {
    /// Creates a surface of the given pixel size.
    fn create_surface(&mut self, width: u32, height: u32) -> Box<dyn PaintSurface>;

    /// Loads an image from a backend-defined source string.
    ///
    /// # Errors
    /// Returns [`Error::ImageUnsupported`] when the backend cannot produce
    /// an image for `source`.
    fn load_image(&mut self, source: &str) -> Result<Image>;
}

/// One recorded drawing call.
///
/// Mirrors [`PaintSurface`] one variant per method, so a command log reads
/// like a transcript of everything a frame drew.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    /// A cleared region.
    Clear { x: f64, y: f64, w: f64, h: f64 },
    /// A filled rectangle.
    FillRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
    },
    /// An outlined rectangle.
    StrokeRect {
        x: f64,
        y: f64,
        w: f64,
        h: f64,
        color: Color,
        width: f64,
    },
    /// A filled ellipse.
    FillEllipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        color: Color,
    },
    /// An outlined ellipse.
    StrokeEllipse {
        cx: f64,
        cy: f64,
        rx: f64,
        ry: f64,
        color: Color,
        width: f64,
    },
    /// A filled arc.
    FillArc {
        cx: f64,
        cy: f64,
        r: f64,
        start: f64,
        end: f64,
        color: Color,
    },
    /// An outlined arc.
    StrokeArc {
        cx: f64,
        cy: f64,
        r: f64,
        start: f64,
        end: f64,
        color: Color,
        width: f64,
    },
    /// A line segment.
    Line {
        x1: f64,
        y1: f64,
        x2: f64,
        y2: f64,
        color: Color,
        width: f64,
    },
    /// A drawn image.
    Image {
        id: u64,
        x: f64,
        y: f64,
        size: Option<(f64, f64)>,
    },
    /// A run of text.
    Text {
        content: String,
        x: f64,
        y: f64,
        style: TextStyle,
        color: Color,
    },
    /// A transform-state push.
    Save,
    /// A transform-state pop.
    Restore,
    /// A translation.
    Translate { x: f64, y: f64 },
    /// A rotation in radians.
    Rotate { angle: f64 },
    /// A scale.
    Scale { sx: f64, sy: f64 },
}

/// Shared handle to one surface's command log.
pub type CommandLog = Rc<RefCell<Vec<DrawCommand>>>;

/// A backend that records every drawing call instead of rasterizing.
///
/// Clones share state, so keep one clone on the test side and hand the
/// other to the runtime; [`RecordingBackend::surface_log`] then exposes the
/// commands each created surface received.
///
/// Image loading accepts any source string and fabricates a handle with a
/// fixed 64x64 size, unless the source was registered with an explicit size
/// via [`RecordingBackend::register_image`].
#[derive(Clone, Default)]
pub struct RecordingBackend {
    inner: Rc<RefCell<RecorderState>>,
}

#[derive(Default)]
struct RecorderState {
    logs: Vec<CommandLog>,
    sizes: Vec<(u32, u32)>,
    images: Vec<(String, u32, u32)>,
}

impl RecordingBackend {
    /// Creates an empty recording backend.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of surfaces created so far.
    pub fn surface_count(&self) -> usize {
        self.inner.borrow().logs.len()
    }

    /// The command log of the `index`-th created surface.
    ///
    /// Surfaces are numbered in creation order across all sketches.
    pub fn surface_log(&self, index: usize) -> Option<CommandLog> {
        self.inner.borrow().logs.get(index).cloned()
    }

    /// The size the `index`-th surface was created with.
    pub fn surface_size(&self, index: usize) -> Option<(u32, u32)> {
        self.inner.borrow().sizes.get(index).copied()
    }

    /// Pre-registers an image source with an explicit size.
    pub fn register_image(&self, source: &str, width: u32, height: u32) {
        self.inner
            .borrow_mut()
            .images
            .push((source.to_string(), width, height));
    }
}

impl RenderBackend for RecordingBackend {
    fn create_surface(&mut self, width: u32, height: u32) -> Box<dyn PaintSurface> {
        let log: CommandLog = Rc::new(RefCell::new(Vec::new()));
        let mut inner = self.inner.borrow_mut();
        inner.logs.push(Rc::clone(&log));
        inner.sizes.push((width, height));
        Box::new(RecordingSurface { log })
    }

    fn load_image(&mut self, source: &str) -> Result<Image> {
        if source.is_empty() {
            return Err(Error::ImageUnsupported(source.to_string()));
        }
        let mut inner = self.inner.borrow_mut();
        let id = match inner.images.iter().position(|(name, ..)| name == source) {
            Some(existing) => existing,
            None => {
                inner.images.push((source.to_string(), 64, 64));
                inner.images.len() - 1
            }
        };
        let (_, width, height) = inner.images[id];
        Ok(Image {
            id: id as u64,
            width,
            height,
        })
    }
}

/// The surface type handed out by [`RecordingBackend`].
pub struct RecordingSurface {
    log: CommandLog,
}

impl RecordingSurface {
    fn push(&mut self, command: DrawCommand) {
        self.log.borrow_mut().push(command);
    }
}

impl PaintSurface for RecordingSurface {
    fn clear(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.push(DrawCommand::Clear { x, y, w, h });
    }

    fn fill_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color) {
        self.push(DrawCommand::FillRect { x, y, w, h, color });
    }

    fn stroke_rect(&mut self, x: f64, y: f64, w: f64, h: f64, color: Color, width: f64) {
        self.push(DrawCommand::StrokeRect {
            x,
            y,
            w,
            h,
            color,
            width,
        });
    }

    fn fill_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Color) {
        self.push(DrawCommand::FillEllipse {
            cx,
            cy,
            rx,
            ry,
            color,
        });
    }

    fn stroke_ellipse(&mut self, cx: f64, cy: f64, rx: f64, ry: f64, color: Color, width: f64) {
        self.push(DrawCommand::StrokeEllipse {
            cx,
            cy,
            rx,
            ry,
            color,
            width,
        });
    }

    fn fill_arc(&mut self, cx: f64, cy: f64, r: f64, start: f64, end: f64, color: Color) {
        self.push(DrawCommand::FillArc {
            cx,
            cy,
            r,
            start,
            end,
            color,
        });
    }

    fn stroke_arc(
        &mut self,
        cx: f64,
        cy: f64,
        r: f64,
        start: f64,
        end: f64,
        color: Color,
        width: f64,
    ) {
        self.push(DrawCommand::StrokeArc {
            cx,
            cy,
            r,
            start,
            end,
            color,
            width,
        });
    }

    fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, color: Color, width: f64) {
        self.push(DrawCommand::Line {
            x1,
            y1,
            x2,
            y2,
            color,
            width,
        });
    }

    fn draw_image(&mut self, image: &Image, x: f64, y: f64, size: Option<(f64, f64)>) {
        self.push(DrawCommand::Image {
            id: image.id,
            x,
            y,
            size,
        });
    }

    fn fill_text(&mut self, content: &str, x: f64, y: f64, style: &TextStyle, color: Color) {
        self.push(DrawCommand::Text {
            content: content.to_string(),
            x,
            y,
            style: style.clone(),
            color,
        });
    }

    fn save(&mut self) {
        self.push(DrawCommand::Save);
    }

    fn restore(&mut self) {
        self.push(DrawCommand::Restore);
    }

    fn translate(&mut self, x: f64, y: f64) {
        self.push(DrawCommand::Translate { x, y });
    }

    fn rotate(&mut self, angle: f64) {
        self.push(DrawCommand::Rotate { angle });
    }

    fn scale(&mut self, sx: f64, sy: f64) {
        self.push(DrawCommand::Scale { sx, sy });
    }
}
