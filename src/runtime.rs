//! The scheduler: sketch registry, drive loop, and event dispatch.

use log::{debug, error, info};

use crate::backend::{Image, RenderBackend};
use crate::config::SketchConfig;
use crate::context::ContextSlot;
use crate::draw::layer::Layer;
use crate::entity::{Entity, EntityId};
use crate::error::{Error, Result};
use crate::host::Host;
use crate::input::events::{Key, PointerButton, SketchEvent};
use crate::input::keyboard::KeyboardState;
use crate::sketch::Sketch;
use crate::timing::FramePacer;

/// Stable identity of a sketch within its runtime.
///
/// Sketches are never destroyed, so an id stays valid for the life of the
/// runtime that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SketchId(usize);

impl SketchId {
    pub(crate) fn from_index(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(self) -> usize {
        self.0
    }
}

/// Hook run once per host tick, before any sketch ticks.
pub type GlobalHook = Box<dyn FnMut() -> anyhow::Result<()>>;

/// Hook run for every key press, after the keyboard table updates.
pub type KeyHook = Box<dyn FnMut(Key) -> anyhow::Result<()>>;

/// The process-wide driver converting host frame ticks into sketch ticks.
///
/// One runtime owns every sketch, the host and backend collaborators, the
/// global keyboard table, and the active-sketch context slot. The host
/// calls [`Runtime::tick`] once per animation frame; everything else
/// happens from there.
///
/// Hook failures anywhere (global, frame, event, entity) are logged and
/// contained: one sketch's error never blocks another sketch's tick, and
/// the next host frame is always requested.
pub struct Runtime {
    host: Box<dyn Host>,
    backend: Box<dyn RenderBackend>,
    sketches: Vec<Sketch>,
    /// Registration order; ticks replay this order every frame.
    order: Vec<SketchId>,
    running: bool,
    global_hook: Option<GlobalHook>,
    key_hook: Option<KeyHook>,
    keyboard: KeyboardState,
    context: ContextSlot,
}

impl Runtime {
    /// Creates a runtime on top of the given host and drawing backend.
    pub fn new(host: impl Host + 'static, backend: impl RenderBackend + 'static) -> Self {
        let window = host.window_size();
        Self {
            host: Box::new(host),
            backend: Box::new(backend),
            sketches: Vec::new(),
            order: Vec::new(),
            running: false,
            global_hook: None,
            key_hook: None,
            keyboard: KeyboardState::new(),
            context: ContextSlot::new(window),
        }
    }

    // ========================================================================
    // Sketch construction and registry
    // ========================================================================

    /// Builds a sketch from `config`, registering it unless the config
    /// opts out.
    ///
    /// # Errors
    /// Returns [`Error::UnknownContainer`] when a named container does not
    /// resolve; other sketches are unaffected.
    pub fn create_sketch(&mut self, mut config: SketchConfig) -> Result<SketchId> {
        config.validate_and_clamp();
        let id = SketchId::from_index(self.sketches.len());

        let (name, container_size) = match &config.container {
            Some(name) => {
                let size = self
                    .host
                    .container_size(name)
                    .ok_or_else(|| Error::UnknownContainer(name.clone()))?;
                (name.clone(), size)
            }
            None => {
                let name = format!("sketch-{}", self.sketches.len());
                let size = self.host.create_container(&name);
                (name, size)
            }
        };

        let width = config.width.resolve(container_size.0);
        let height = config.height_or_width().resolve(container_size.1);
        let now = self.host.now();

        let mut layers = Vec::with_capacity(config.layers);
        for _ in 0..config.layers {
            layers.push(Layer::new(self.backend.create_surface(width, height)));
        }

        // Construction-time scale, applied exactly once. Layers adopted
        // later are not rescaled.
        let (scale_x, scale_y) = (config.scale_x, config.scale_y_or_x());
        if scale_x != 1.0 || scale_y != 1.0 {
            for layer in &mut layers {
                layer.scale(scale_x, scale_y);
            }
        }

        info!(
            "created sketch '{name}' ({width}x{height}, {} layers, {:.0} fps)",
            config.layers, config.frame_rate
        );

        self.sketches.push(Sketch::new(
            id,
            name.clone(),
            name,
            width,
            height,
            layers,
            !config.autoplay,
            FramePacer::new(config.frame_rate, now),
            now,
        ));
        if config.register {
            self.order.push(id);
        }
        Ok(id)
    }

    /// Registers a sketch created with `register = false`.
    ///
    /// Registration is idempotent; the original position is kept.
    pub fn register(&mut self, id: SketchId) -> Result<()> {
        self.get(id)?;
        if self.order.contains(&id) {
            debug!("sketch {id:?} already registered");
            return Ok(());
        }
        self.order.push(id);
        Ok(())
    }

    /// Read access to a sketch.
    pub fn sketch(&self, id: SketchId) -> Option<&Sketch> {
        self.sketches.get(id.index())
    }

    /// Write access to a sketch.
    pub fn sketch_mut(&mut self, id: SketchId) -> Option<&mut Sketch> {
        self.sketches.get_mut(id.index())
    }

    /// Finds a sketch by its unique name.
    pub fn sketch_by_name(&self, name: &str) -> Option<SketchId> {
        self.sketches
            .iter()
            .find(|sketch| sketch.name() == name)
            .map(Sketch::id)
    }

    /// How many sketches exist (registered or not).
    pub fn sketch_count(&self) -> usize {
        self.sketches.len()
    }

    fn get(&self, id: SketchId) -> Result<&Sketch> {
        self.sketches.get(id.index()).ok_or(Error::UnknownSketch(id))
    }

    fn get_mut(&mut self, id: SketchId) -> Result<&mut Sketch> {
        self.sketches
            .get_mut(id.index())
            .ok_or(Error::UnknownSketch(id))
    }

    // ========================================================================
    // Drive loop
    // ========================================================================

    /// Begins the drive loop if it is not already running.
    pub fn start(&mut self) {
        if self.running {
            debug!("drive loop already running");
            return;
        }
        self.running = true;
        debug!("drive loop started");
        self.host.request_frame();
    }

    /// Begins the drive loop with a hook run once per tick, before any
    /// sketch ticks.
    pub fn start_with(&mut self, hook: impl FnMut() -> anyhow::Result<()> + 'static) {
        self.global_hook = Some(Box::new(hook));
        self.start();
    }

    /// Halts the drive loop. Per-sketch pause state is untouched, and the
    /// loop can be started again later.
    pub fn stop(&mut self) {
        self.running = false;
        debug!("drive loop stopped");
    }

    /// True while the drive loop is running.
    pub fn is_running(&self) -> bool {
        self.running
    }

    /// One host animation frame.
    ///
    /// No-op while stopped. Otherwise: the global hook (if any), then every
    /// registered sketch's tick in registration order, then a request for
    /// the next host frame. The next frame is requested no matter what the
    /// hooks did.
    pub fn tick(&mut self) {
        if !self.running {
            return;
        }

        if let Some(hook) = self.global_hook.as_mut() {
            if let Err(err) = hook() {
                error!("global hook failed: {err:#}");
            }
        }

        let now = self.host.now();
        for i in 0..self.order.len() {
            let id = self.order[i];
            let Self {
                sketches, context, ..
            } = self;
            if let Some(sketch) = sketches.get_mut(id.index()) {
                sketch.tick(now, context);
            }
        }

        self.host.request_frame();
    }

    // ========================================================================
    // Per-sketch lifecycle and hooks
    // ========================================================================

    /// Pauses a sketch; effective at its next tick.
    pub fn pause(&mut self, id: SketchId) -> Result<()> {
        let now = self.host.now();
        let sketch = self.get_mut(id)?;
        sketch.touch_clock(now);
        sketch.pause();
        Ok(())
    }

    /// Pauses a sketch and arms a one-shot resume after `delay_ms`.
    pub fn pause_for(&mut self, id: SketchId, delay_ms: u64) -> Result<()> {
        let now = self.host.now();
        let sketch = self.get_mut(id)?;
        sketch.touch_clock(now);
        sketch.pause_for(delay_ms);
        Ok(())
    }

    /// Resumes a sketch (idempotent).
    pub fn resume(&mut self, id: SketchId) -> Result<()> {
        self.get_mut(id)?.resume();
        Ok(())
    }

    /// Installs a sketch's per-frame hook, re-basing its pacing at the
    /// current host time.
    pub fn on_frame(
        &mut self,
        id: SketchId,
        hook: impl FnMut(&mut Sketch) -> anyhow::Result<()> + 'static,
    ) -> Result<()> {
        let now = self.host.now();
        let sketch = self.get_mut(id)?;
        sketch.touch_clock(now);
        sketch.on_frame(hook);
        Ok(())
    }

    /// Runs a one-time setup hook with the sketch activated around it,
    /// mirroring the per-frame protocol.
    pub fn init(
        &mut self,
        id: SketchId,
        hook: impl FnOnce(&mut Sketch) -> anyhow::Result<()>,
    ) -> Result<()> {
        let Self {
            sketches, context, ..
        } = self;
        let sketch = sketches.get_mut(id.index()).ok_or(Error::UnknownSketch(id))?;
        match context.activate(sketch.view()) {
            Ok(()) => {
                let result = hook(sketch);
                context.deactivate();
                if let Err(err) = result {
                    error!("init hook failed on '{}': {err:#}", sketch.name());
                }
            }
            Err(err) => error!("could not activate '{}': {err}", sketch.name()),
        }
        Ok(())
    }

    /// Subscribes a hook to one of a sketch's pointer events.
    pub fn on_event(
        &mut self,
        id: SketchId,
        event: SketchEvent,
        hook: impl FnMut(&mut Sketch) -> anyhow::Result<()> + 'static,
    ) -> Result<()> {
        self.get_mut(id)?.on_event(event, hook);
        Ok(())
    }

    /// Adds a backend-created layer to a sketch and makes it active.
    pub fn add_layer(&mut self, id: SketchId) -> Result<usize> {
        let (width, height) = {
            let sketch = self.get(id)?;
            (sketch.width(), sketch.height())
        };
        let surface = self.backend.create_surface(width, height);
        Ok(self.get_mut(id)?.adopt_layer(surface))
    }

    // ========================================================================
    // Input dispatch
    // ========================================================================

    /// Reports pointer motion inside a sketch's container.
    pub fn pointer_moved(&mut self, id: SketchId, x: f64, y: f64) -> Result<()> {
        let now = self.host.now();
        let Self {
            sketches, context, ..
        } = self;
        let sketch = sketches.get_mut(id.index()).ok_or(Error::UnknownSketch(id))?;
        sketch.touch_clock(now);
        sketch.pointer_mut().moved(x, y);
        sketch.fire_event(SketchEvent::PointerMoved, context);
        Ok(())
    }

    /// Reports a pointer button press inside a sketch's container.
    pub fn pointer_pressed(&mut self, id: SketchId, button: PointerButton) -> Result<()> {
        let now = self.host.now();
        let Self {
            sketches, context, ..
        } = self;
        let sketch = sketches.get_mut(id.index()).ok_or(Error::UnknownSketch(id))?;
        sketch.touch_clock(now);
        sketch.pointer_mut().pressed(button);
        sketch.fire_event(SketchEvent::PointerPressed, context);
        Ok(())
    }

    /// Reports a pointer button release.
    pub fn pointer_released(&mut self, id: SketchId) -> Result<()> {
        let now = self.host.now();
        let Self {
            sketches, context, ..
        } = self;
        let sketch = sketches.get_mut(id.index()).ok_or(Error::UnknownSketch(id))?;
        sketch.touch_clock(now);
        sketch.pointer_mut().released();
        sketch.fire_event(SketchEvent::PointerReleased, context);
        Ok(())
    }

    /// Reports a key press (keyboard input is global, not per sketch).
    pub fn key_pressed(&mut self, key: Key) {
        self.keyboard.pressed(key);
        if let Some(hook) = self.key_hook.as_mut() {
            if let Err(err) = hook(key) {
                error!("key hook failed: {err:#}");
            }
        }
    }

    /// Reports a key release.
    pub fn key_released(&mut self, key: Key) {
        self.keyboard.released(key);
    }

    /// True while `key` is held down.
    pub fn key_is_down(&self, key: Key) -> bool {
        self.keyboard.is_down(key)
    }

    /// Installs the global key-press hook.
    pub fn on_key_pressed(&mut self, hook: impl FnMut(Key) -> anyhow::Result<()> + 'static) {
        self.key_hook = Some(Box::new(hook));
    }

    // ========================================================================
    // Entities and assets
    // ========================================================================

    /// Appends an entity to `target`, or to the active sketch when no
    /// target is given.
    ///
    /// # Errors
    /// Returns [`Error::NoActiveSketch`] when neither a target nor an
    /// active sketch exists.
    pub fn add_entity(&mut self, target: Option<SketchId>, entity: Entity) -> Result<EntityId> {
        let id = target
            .or_else(|| self.context.active().map(|view| view.id))
            .ok_or(Error::NoActiveSketch)?;
        Ok(self.get_mut(id)?.add_entity(entity))
    }

    /// Runs a sketch's entity batch with the sketch activated around the
    /// whole batch (symmetric activate/deactivate).
    pub fn run_entities(&mut self, id: SketchId) -> Result<()> {
        let Self {
            sketches, context, ..
        } = self;
        let sketch = sketches.get_mut(id.index()).ok_or(Error::UnknownSketch(id))?;
        match context.activate(sketch.view()) {
            Ok(()) => {
                sketch.run_entities();
                context.deactivate();
            }
            Err(err) => error!("could not activate '{}': {err}", sketch.name()),
        }
        Ok(())
    }

    /// Loads an image through the drawing backend.
    pub fn load_image(&mut self, source: &str) -> Result<Image> {
        self.backend.load_image(source)
    }

    /// Read access to the active-sketch context facades.
    pub fn context(&self) -> &ContextSlot {
        &self.context
    }
}
