//! Host capabilities: the clock, frame scheduling, and containers.
//!
//! The runtime needs exactly one timing capability from its embedding: run
//! a callback once before the next repaint. Everything else here (window
//! size, container lookup) only feeds construction and the context
//! facades. [`ManualHost`] implements the trait with a hand-driven clock
//! for headless embeddings and tests.

use std::cell::RefCell;
use std::collections::HashMap;
use std::rc::Rc;

use crate::timing::Millis;

/// What the embedding environment provides to the runtime.
pub trait Host {
    /// Current monotonic time in milliseconds.
    fn now(&self) -> Millis;

    /// The host window's size, used as the facade fallback.
    fn window_size(&self) -> (u32, u32);

    /// Measured size of an existing named container, if it exists.
    fn container_size(&self, name: &str) -> Option<(u32, u32)>;

    /// Creates a fresh container and returns its measured size.
    fn create_container(&mut self, name: &str) -> (u32, u32);

    /// Schedules the runtime's tick to run once before the next repaint.
    ///
    /// The runtime calls this after every tick while running; an embedding
    /// wires it to its animation-frame primitive.
    fn request_frame(&mut self);
}

/// A host with a hand-driven clock and explicit containers.
///
/// Clones share state: keep one clone to advance time and inspect frame
/// requests, give the other to the runtime.
#[derive(Clone)]
pub struct ManualHost {
    inner: Rc<RefCell<ManualHostState>>,
}

struct ManualHostState {
    now: Millis,
    window: (u32, u32),
    containers: HashMap<String, (u32, u32)>,
    frame_requests: u64,
}

impl ManualHost {
    /// Creates a host with the given window size, at time zero.
    pub fn new(window: (u32, u32)) -> Self {
        Self {
            inner: Rc::new(RefCell::new(ManualHostState {
                now: 0,
                window,
                containers: HashMap::new(),
                frame_requests: 0,
            })),
        }
    }

    /// Registers a container as existing with a measured size.
    pub fn add_container(&self, name: &str, width: u32, height: u32) {
        self.inner
            .borrow_mut()
            .containers
            .insert(name.to_string(), (width, height));
    }

    /// Moves the clock forward by `ms`.
    pub fn advance(&self, ms: Millis) {
        self.inner.borrow_mut().now += ms;
    }

    /// Sets the clock to an absolute time.
    pub fn set_now(&self, now: Millis) {
        self.inner.borrow_mut().now = now;
    }

    /// How many animation frames the runtime has requested so far.
    pub fn frame_requests(&self) -> u64 {
        self.inner.borrow().frame_requests
    }
}

impl Host for ManualHost {
    fn now(&self) -> Millis {
        self.inner.borrow().now
    }

    fn window_size(&self) -> (u32, u32) {
        self.inner.borrow().window
    }

    fn container_size(&self, name: &str) -> Option<(u32, u32)> {
        self.inner.borrow().containers.get(name).copied()
    }

    fn create_container(&mut self, name: &str) -> (u32, u32) {
        let mut inner = self.inner.borrow_mut();
        let size = inner.window;
        inner.containers.insert(name.to_string(), size);
        size
    }

    fn request_frame(&mut self) {
        self.inner.borrow_mut().frame_requests += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_the_clock() {
        let host = ManualHost::new((800, 600));
        let runtime_side = host.clone();

        host.advance(250);
        assert_eq!(runtime_side.now(), 250);

        host.set_now(1000);
        assert_eq!(runtime_side.now(), 1000);
    }

    #[test]
    fn created_containers_become_queryable() {
        let mut host = ManualHost::new((800, 600));
        assert_eq!(host.container_size("stage"), None);

        host.add_container("stage", 320, 240);
        assert_eq!(host.container_size("stage"), Some((320, 240)));

        let size = host.create_container("sketch-0");
        assert_eq!(size, (800, 600));
        assert_eq!(host.container_size("sketch-0"), Some((800, 600)));
    }
}
