//! Per-sketch pointer state.

use super::events::PointerButton;
use crate::util::Vec2;

/// Snapshot of one sketch's pointer.
///
/// Coordinates are relative to the sketch's container, floored to whole
/// pixels. The press origin keeps the position where the current button
/// went down, which is what drag gestures measure against.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct PointerState {
    /// Current position.
    pub position: Vec2,
    /// Position where the current press started.
    pub press_origin: Vec2,
    /// The button currently held, if any.
    pub button: Option<PointerButton>,
}

impl PointerState {
    /// True while any button is held.
    pub fn is_down(&self) -> bool {
        self.button.is_some()
    }

    pub(crate) fn moved(&mut self, x: f64, y: f64) {
        self.position.set(x.floor(), y.floor());
    }

    pub(crate) fn pressed(&mut self, button: PointerButton) {
        self.button = Some(button);
        self.press_origin = self.position;
    }

    pub(crate) fn released(&mut self) {
        self.button = None;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn press_records_origin_and_button() {
        let mut pointer = PointerState::default();
        pointer.moved(10.6, 20.2);
        pointer.pressed(PointerButton::Left);

        assert!(pointer.is_down());
        assert_eq!(pointer.press_origin, Vec2::new(10.0, 20.0));

        pointer.moved(50.0, 60.0);
        assert_eq!(pointer.press_origin, Vec2::new(10.0, 20.0));

        pointer.released();
        assert!(!pointer.is_down());
    }

    #[test]
    fn positions_are_floored() {
        let mut pointer = PointerState::default();
        pointer.moved(3.9, 7.1);
        assert_eq!(pointer.position, Vec2::new(3.0, 7.0));
    }
}
