//! Input state: pointer and keyboard tables plus the event types hosts
//! translate their native input into.

pub mod events;
pub mod keyboard;
pub mod pointer;

// Re-export commonly used types at module level
pub use events::{Key, PointerButton, SketchEvent};
pub use keyboard::KeyboardState;
pub use pointer::PointerState;
