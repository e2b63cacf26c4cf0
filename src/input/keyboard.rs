//! Process-wide keyboard state table.

use std::collections::HashSet;

use super::events::Key;

/// Which keys are currently held down.
///
/// Keyboard input is global (one table per runtime, not per sketch); any
/// sketch's code can query it by key identity.
#[derive(Debug, Default)]
pub struct KeyboardState {
    down: HashSet<Key>,
}

impl KeyboardState {
    /// Creates an empty table with no keys held.
    pub fn new() -> Self {
        Self::default()
    }

    /// True while `key` is held down.
    pub fn is_down(&self, key: Key) -> bool {
        self.down.contains(&key)
    }

    pub(crate) fn pressed(&mut self, key: Key) {
        self.down.insert(key);
    }

    pub(crate) fn released(&mut self, key: Key) {
        self.down.remove(&key);
    }
}
