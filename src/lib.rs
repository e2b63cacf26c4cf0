//! A small creative-coding runtime: sketches, layers, and a shared frame
//! scheduler.
//!
//! One [`Runtime`] drives any number of [`Sketch`]es from a single host
//! animation-frame callback. Each sketch has its own target frame rate,
//! play/pause state, layers, pointer state, and per-frame hook; drawing
//! goes through an immediate-mode API lowered onto a pluggable
//! [`backend::RenderBackend`].
//!
//! ```no_run
//! use sketchloop::{ManualHost, RecordingBackend, Runtime, SketchConfig};
//!
//! let host = ManualHost::new((800, 600));
//! let mut runtime = Runtime::new(host.clone(), RecordingBackend::new());
//!
//! let id = runtime.create_sketch(SketchConfig::default())?;
//! runtime.on_frame(id, |sketch| {
//!     sketch.background("slategray");
//!     sketch.fill((255.0, 120.0, 0.0));
//!     sketch.circle(200.0, 200.0, 40.0);
//!     Ok(())
//! })?;
//!
//! runtime.start();
//! loop {
//!     host.advance(16);
//!     runtime.tick();
//! }
//! # Ok::<(), sketchloop::Error>(())
//! ```

pub mod backend;
pub mod config;
pub mod context;
pub mod draw;
pub mod entity;
pub mod error;
pub mod host;
pub mod input;
pub mod runtime;
pub mod sketch;
pub mod timing;
pub mod util;

pub use backend::{DrawCommand, Image, PaintSurface, RecordingBackend, RenderBackend};
pub use config::{Dimension, SketchConfig};
pub use context::ContextSlot;
pub use draw::{Color, ColorMode, Paint, RectMode, TextStyle};
pub use entity::{Entity, EntityId};
pub use error::Error;
pub use host::{Host, ManualHost};
pub use input::{Key, KeyboardState, PointerButton, PointerState, SketchEvent};
pub use runtime::{Runtime, SketchId};
pub use sketch::Sketch;
pub use timing::FramePacer;
pub use util::Vec2;
