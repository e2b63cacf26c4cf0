//! Drawing primitives: colors, draw-state, and layers.
//!
//! This module defines the state the runtime keeps on top of the backend's
//! paint surfaces:
//! - [`Color`] / [`Paint`]: the color model and what `fill`/`stroke` accept
//! - [`DrawState`]: the per-layer snapshot saved and restored each frame
//! - [`Layer`]: one paint surface plus its draw-state stack

pub mod color;
pub mod layer;
pub mod state;

// Re-export commonly used types at module level
pub use color::{Color, ColorMode, Paint};
pub use layer::Layer;
pub use state::{DrawState, RectMode, TextStyle};

// Re-export color constants for public API
#[allow(unused_imports)]
pub use color::{BLACK, BLUE, GREEN, RED, TRANSPARENT, WHITE};
