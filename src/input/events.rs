//! Generic input event types for cross-host compatibility.

/// Generic key representation.
///
/// Host embeddings map their native key codes to these values before
/// handing them to the runtime, so sketch code is never exposed to
/// platform scancodes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Regular character key (a-z, 0-9, symbols).
    Char(char),
    /// Escape key.
    Escape,
    /// Return/Enter key.
    Return,
    /// Backspace key.
    Backspace,
    /// Tab key.
    Tab,
    /// Space bar.
    Space,
    /// Shift modifier.
    Shift,
    /// Ctrl modifier.
    Ctrl,
    /// Alt modifier.
    Alt,
    /// Up arrow.
    Up,
    /// Down arrow.
    Down,
    /// Left arrow.
    Left,
    /// Right arrow.
    Right,
    /// Unmapped or unrecognized key.
    Unknown,
}

/// Pointer button identification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PointerButton {
    /// Left/primary button.
    Left,
    /// Middle button.
    Middle,
    /// Right/secondary button.
    Right,
}

/// Per-sketch pointer events a hook can subscribe to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SketchEvent {
    /// The pointer moved inside the sketch's container.
    PointerMoved,
    /// A pointer button went down inside the container.
    PointerPressed,
    /// A pointer button was released.
    PointerReleased,
}
