//! The single-slot "currently active sketch" register.
//!
//! While a sketch's hook runs, the runtime installs a view of that sketch
//! here. Code that is handed the context (entity batches, embedder probes)
//! can then read "the sketch I am running inside" without being passed it
//! explicitly. Outside any activation the facades fall back to the host
//! window's values.

use crate::error::{Error, Result};
use crate::input::PointerState;
use crate::runtime::SketchId;

/// Read-only view of the sketch currently executing a hook.
#[derive(Debug, Clone, PartialEq)]
pub struct ActiveView {
    /// The active sketch's id.
    pub id: SketchId,
    /// The active sketch's name.
    pub name: String,
    /// The active sketch's width in pixels.
    pub width: u32,
    /// The active sketch's height in pixels.
    pub height: u32,
    /// Snapshot of the active sketch's pointer.
    pub pointer: PointerState,
}

/// Holds at most one [`ActiveView`] at a time.
///
/// Activation never nests: installing a view while one is present is an
/// error and leaves the slot untouched. The runtime pairs every successful
/// activation with a deactivation on all exit paths, including hook
/// failure, so the slot state is purely a function of "is a hook running
/// right now".
#[derive(Debug)]
pub struct ContextSlot {
    active: Option<ActiveView>,
    window: (u32, u32),
}

impl ContextSlot {
    pub(crate) fn new(window: (u32, u32)) -> Self {
        Self {
            active: None,
            window,
        }
    }

    /// Installs `view` as the active sketch.
    ///
    /// # Errors
    /// Returns [`Error::SketchAlreadyActive`] when a view is already
    /// installed; the existing view stays in place.
    pub(crate) fn activate(&mut self, view: ActiveView) -> Result<()> {
        if let Some(current) = &self.active {
            return Err(Error::SketchAlreadyActive(current.name.clone()));
        }
        self.active = Some(view);
        Ok(())
    }

    /// Clears the slot, restoring window-default facades.
    ///
    /// Unconditional: deactivating an empty slot is a no-op.
    pub(crate) fn deactivate(&mut self) {
        self.active = None;
    }

    /// The active view, if a hook is currently running.
    pub fn active(&self) -> Option<&ActiveView> {
        self.active.as_ref()
    }

    /// True while a sketch is active.
    pub fn is_active(&self) -> bool {
        self.active.is_some()
    }

    /// Width facade: the active sketch's width, else the window's.
    pub fn width(&self) -> u32 {
        self.active.as_ref().map_or(self.window.0, |v| v.width)
    }

    /// Height facade: the active sketch's height, else the window's.
    pub fn height(&self) -> u32 {
        self.active.as_ref().map_or(self.window.1, |v| v.height)
    }

    /// Pointer facade: only meaningful while a sketch is active.
    pub fn pointer(&self) -> Option<PointerState> {
        self.active.as_ref().map(|v| v.pointer)
    }
}
