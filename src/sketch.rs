//! A sketch: one drawing surface with its own animation loop state.

use log::{debug, error};

use crate::backend::{Image, PaintSurface};
use crate::context::{ActiveView, ContextSlot};
use crate::draw::color::{ColorMode, Paint};
use crate::draw::layer::Layer;
use crate::draw::state::{RectMode, TextStyle};
use crate::entity::{Entities, Entity, EntityId};
use crate::error::{Error, Result};
use crate::input::events::SketchEvent;
use crate::input::pointer::PointerState;
use crate::runtime::SketchId;
use crate::timing::{FramePacer, Millis};

/// Per-frame hook signature.
///
/// The hook receives the sketch it runs on; drawing, input queries, and
/// entity management all go through that parameter. Returning an error
/// aborts only this frame: the error is logged at the tick boundary and
/// the loop keeps going.
pub type FrameHook = Box<dyn FnMut(&mut Sketch) -> anyhow::Result<()>>;

/// An independently paused/resumed drawing target.
///
/// A sketch owns one or more [`Layer`]s, its own frame pacing, its pointer
/// state, an optional per-frame hook, and an entity list. Sketches are
/// created through [`Runtime::create_sketch`](crate::runtime::Runtime::create_sketch)
/// and live for the rest of the process; pausing is the only way to quiet
/// one.
pub struct Sketch {
    id: SketchId,
    name: String,
    container: String,
    width: u32,
    height: u32,
    layers: Vec<Layer>,
    active_layer: usize,
    paused: bool,
    pacer: FramePacer,
    frame_count: u64,
    color_mode: ColorMode,
    pointer: PointerState,
    frame_hook: Option<FrameHook>,
    event_hooks: Vec<(SketchEvent, FrameHook)>,
    entities: Entities,
    resume_deadlines: Vec<Millis>,
    /// Time of the most recent tick or dispatch, used to anchor delays.
    clock: Millis,
}

impl Sketch {
    #[allow(clippy::too_many_arguments)]
    pub(crate) fn new(
        id: SketchId,
        name: String,
        container: String,
        width: u32,
        height: u32,
        layers: Vec<Layer>,
        paused: bool,
        pacer: FramePacer,
        clock: Millis,
    ) -> Self {
        // Drawing initially targets the topmost layer, like a freshly
        // added layer would.
        let active_layer = layers.len().saturating_sub(1);
        Self {
            id,
            name,
            container,
            width,
            height,
            layers,
            active_layer,
            paused,
            pacer,
            frame_count: 0,
            color_mode: ColorMode::default(),
            pointer: PointerState::default(),
            frame_hook: None,
            event_hooks: Vec::new(),
            entities: Entities::default(),
            resume_deadlines: Vec::new(),
            clock,
        }
    }

    // ========================================================================
    // Identity and state accessors
    // ========================================================================

    /// The sketch's id in the runtime.
    pub fn id(&self) -> SketchId {
        self.id
    }

    /// The sketch's unique name (its container's name).
    pub fn name(&self) -> &str {
        &self.name
    }

    /// The host container the sketch is attached to.
    pub fn container(&self) -> &str {
        &self.container
    }

    /// Width in pixels.
    pub fn width(&self) -> u32 {
        self.width
    }

    /// Height in pixels.
    pub fn height(&self) -> u32 {
        self.height
    }

    /// True while the sketch is paused.
    pub fn paused(&self) -> bool {
        self.paused
    }

    /// How many frames have run since the frame hook was installed.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Frames actually produced during the previous second.
    pub fn frame_rate(&self) -> u32 {
        self.pacer.realized_fps()
    }

    /// Retargets the frame rate immediately.
    pub fn set_frame_rate(&mut self, fps: f64) {
        self.pacer.set_rate(fps);
    }

    /// The sketch's pointer snapshot.
    pub fn pointer(&self) -> &PointerState {
        &self.pointer
    }

    /// The active color mode for numeric paint inputs.
    pub fn color_mode(&self) -> ColorMode {
        self.color_mode
    }

    /// Switches how numeric paint inputs are interpreted.
    ///
    /// Colors already set on any layer keep their channels.
    pub fn set_color_mode(&mut self, mode: ColorMode) {
        self.color_mode = mode;
    }

    // ========================================================================
    // Play/pause lifecycle
    // ========================================================================

    /// Pauses the loop; takes effect at the next scheduler tick.
    pub fn pause(&mut self) {
        self.paused = true;
    }

    /// Pauses and arms a one-shot resume after `delay_ms`.
    ///
    /// The delay is anchored at the most recent tick and cannot be
    /// cancelled once armed. Overlapping calls each arm their own
    /// deadline; since [`Sketch::resume`] is idempotent, extra firings
    /// are harmless.
    pub fn pause_for(&mut self, delay_ms: Millis) {
        self.paused = true;
        self.resume_deadlines.push(self.clock + delay_ms);
    }

    /// Resumes the loop (idempotent).
    pub fn resume(&mut self) {
        self.paused = false;
    }

    // ========================================================================
    // Hooks
    // ========================================================================

    /// Installs the per-frame hook, re-basing pacing and the frame count.
    pub fn on_frame(
        &mut self,
        hook: impl FnMut(&mut Sketch) -> anyhow::Result<()> + 'static,
    ) {
        self.frame_hook = Some(Box::new(hook));
        self.pacer.reset(self.clock);
        self.frame_count = 0;
    }

    /// Subscribes a hook to one of the sketch's pointer events.
    ///
    /// Hooks run with the sketch activated in the context, mirroring the
    /// frame protocol; multiple hooks per event run in subscription order.
    pub fn on_event(
        &mut self,
        event: SketchEvent,
        hook: impl FnMut(&mut Sketch) -> anyhow::Result<()> + 'static,
    ) {
        self.event_hooks.push((event, Box::new(hook)));
    }

    // ========================================================================
    // Layers
    // ========================================================================

    /// Number of layers.
    pub fn layer_count(&self) -> usize {
        self.layers.len()
    }

    /// Index of the layer drawing calls currently target.
    pub fn active_layer(&self) -> usize {
        self.active_layer
    }

    /// Read access to a layer.
    pub fn layer(&self, index: usize) -> Option<&Layer> {
        self.layers.get(index)
    }

    /// Adopts an externally created surface as a new layer and makes it
    /// the active one. Returns the new layer's index.
    pub fn adopt_layer(&mut self, surface: Box<dyn PaintSurface>) -> usize {
        self.layers.push(Layer::new(surface));
        self.active_layer = self.layers.len() - 1;
        self.active_layer
    }

    /// Switches which layer subsequent drawing calls target.
    ///
    /// # Errors
    /// Returns [`Error::LayerOutOfRange`] for an index past the layer
    /// list; the active layer is left unchanged.
    pub fn set_layer(&mut self, index: usize) -> Result<()> {
        if index >= self.layers.len() {
            return Err(Error::LayerOutOfRange {
                index,
                count: self.layers.len(),
            });
        }
        self.active_layer = index;
        Ok(())
    }

    fn active(&mut self) -> &mut Layer {
        // The construction invariant guarantees at least one layer, and
        // set_layer bounds-checks, so the index is always valid.
        &mut self.layers[self.active_layer]
    }

    // ========================================================================
    // Paint state
    // ========================================================================

    /// Sets the fill color, or disables filling for [`Paint::Off`].
    pub fn fill(&mut self, paint: impl Into<Paint>) {
        let color = paint.into().resolve(self.color_mode);
        self.active().set_fill(color);
    }

    /// Disables filling.
    pub fn no_fill(&mut self) {
        self.active().set_fill(None);
    }

    /// Sets the stroke color, or disables stroking for [`Paint::Off`].
    pub fn stroke(&mut self, paint: impl Into<Paint>) {
        let color = paint.into().resolve(self.color_mode);
        self.active().set_stroke(color);
    }

    /// Disables stroking.
    pub fn no_stroke(&mut self) {
        self.active().set_stroke(None);
    }

    /// Sets the stroke width and re-enables stroking.
    pub fn stroke_weight(&mut self, width: f64) {
        self.active().set_line_width(width);
    }

    /// Switches the rectangle origin mode on the active layer.
    pub fn rect_mode(&mut self, mode: RectMode) {
        self.active().set_rect_mode(mode);
    }

    /// Replaces the text style on the active layer.
    pub fn text_style(&mut self, style: TextStyle) {
        self.active().set_text_style(style);
    }

    // ========================================================================
    // Drawing
    // ========================================================================

    /// Draws a rectangle honoring the active rect mode.
    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64) {
        self.active().rect(x, y, w, h);
    }

    /// Draws an ellipse centered at (x, y) with the given radii.
    pub fn ellipse(&mut self, x: f64, y: f64, rx: f64, ry: f64) {
        self.active().ellipse(x, y, rx, ry);
    }

    /// Draws a circle centered at (x, y).
    pub fn circle(&mut self, x: f64, y: f64, r: f64) {
        self.active().ellipse(x, y, r, r);
    }

    /// Draws a circular arc; `w` is the diameter, angles are radians.
    pub fn arc(&mut self, x: f64, y: f64, w: f64, start: f64, end: f64) {
        self.active().arc(x, y, w / 2.0, start, end);
    }

    /// Draws a line segment with the current stroke settings.
    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64) {
        self.active().line(x1, y1, x2, y2);
    }

    /// Draws an image at its natural size.
    pub fn image(&mut self, image: &Image, x: f64, y: f64) {
        self.active().image(image, x, y, None);
    }

    /// Draws an image stretched to the given size.
    pub fn image_sized(&mut self, image: &Image, x: f64, y: f64, w: f64, h: f64) {
        self.active().image(image, x, y, Some((w, h)));
    }

    /// Draws text centered on x at the given baseline.
    pub fn text(&mut self, content: &str, x: f64, y: f64) {
        self.active().text(content, x, y);
    }

    /// Paints the whole surface with a color, without disturbing the
    /// caller's draw-state: the fill/stroke/rect-mode changes happen
    /// inside a save/restore pair.
    pub fn background(&mut self, paint: impl Into<Paint>) {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        let color = paint.into().resolve(self.color_mode);
        let layer = self.active();
        layer.save();
        layer.set_fill(color);
        layer.set_stroke(None);
        layer.set_rect_mode(RectMode::Center);
        layer.rect(w / 2.0, h / 2.0, w, h);
        layer.restore();
    }

    /// Stretches an image over the whole surface (corner-anchored).
    pub fn background_image(&mut self, image: &Image) {
        let (w, h) = (f64::from(self.width), f64::from(self.height));
        self.active().image(image, 0.0, 0.0, Some((w, h)));
    }

    /// Clears the active layer.
    pub fn clear(&mut self) {
        let (w, h) = (self.width, self.height);
        self.active().clear(w, h);
    }

    /// Clears every layer.
    pub fn clear_all(&mut self) {
        let (w, h) = (self.width, self.height);
        for layer in &mut self.layers {
            layer.clear(w, h);
        }
    }

    /// Translates the active layer's transform.
    pub fn translate(&mut self, x: f64, y: f64) {
        self.active().translate(x, y);
    }

    /// Rotates the active layer's transform by `angle` radians.
    pub fn rotate(&mut self, angle: f64) {
        self.active().rotate(angle);
    }

    /// Scales the active layer's transform.
    pub fn scale(&mut self, sx: f64, sy: f64) {
        self.active().scale(sx, sy);
    }

    /// Pushes the active layer's draw-state.
    pub fn save(&mut self) {
        self.active().save();
    }

    /// Pops the active layer's draw-state.
    pub fn restore(&mut self) {
        self.active().restore();
    }

    // ========================================================================
    // Entities
    // ========================================================================

    /// Appends an entity to this sketch's list.
    pub fn add_entity(&mut self, entity: Entity) -> EntityId {
        self.entities.add(entity, self.id)
    }

    /// Removes an entity by identity. Returns false if it was not found.
    pub fn remove_entity(&mut self, id: EntityId) -> bool {
        self.entities.remove(id)
    }

    /// Number of entities currently attached.
    pub fn entity_count(&self) -> usize {
        self.entities.len()
    }

    /// Iterates the attached entities in insertion order.
    pub fn entities(&self) -> impl Iterator<Item = &Entity> {
        self.entities.iter()
    }

    /// Finds an entity by name.
    pub fn entity_by_name(&self, name: &str) -> Option<&Entity> {
        self.entities.by_name(name)
    }

    /// Runs every entity's update then render hook, in insertion order.
    ///
    /// Assumes the caller already has this sketch active in the context
    /// (frame hooks do); use
    /// [`Runtime::run_entities`](crate::runtime::Runtime::run_entities)
    /// outside a hook. A hook error skips only that hook invocation.
    /// Entities removed during the batch finish their pass and are swept
    /// afterwards; entities added during the batch run from the next
    /// batch on.
    pub fn run_entities(&mut self) {
        let mut batch = self.entities.take_batch();
        for entity in batch.iter_mut() {
            if let Some(mut hook) = entity.take_update() {
                if let Err(err) = hook(entity, self) {
                    error!("entity update hook failed on '{}': {err:#}", self.name);
                }
                entity.put_update(hook);
            }
            if let Some(mut hook) = entity.take_render() {
                if let Err(err) = hook(entity, self) {
                    error!("entity render hook failed on '{}': {err:#}", self.name);
                }
                entity.put_render(hook);
            }
        }
        self.entities.merge_batch(batch);
    }

    // ========================================================================
    // Scheduler protocol
    // ========================================================================

    pub(crate) fn view(&self) -> ActiveView {
        ActiveView {
            id: self.id,
            name: self.name.clone(),
            width: self.width,
            height: self.height,
            pointer: self.pointer,
        }
    }

    pub(crate) fn pointer_mut(&mut self) -> &mut PointerState {
        &mut self.pointer
    }

    pub(crate) fn touch_clock(&mut self, now: Millis) {
        self.clock = now;
    }

    /// One scheduler tick: fire armed resumes, check due-ness, and run the
    /// frame with the full save/activate/hook/deactivate/restore protocol.
    ///
    /// Layer restoration and context deactivation run even when the hook
    /// fails, so no frame can leak draw-state or leave the slot occupied.
    pub(crate) fn tick(&mut self, now: Millis, ctx: &mut ContextSlot) {
        self.clock = now;

        if !self.resume_deadlines.is_empty() {
            let due = self.resume_deadlines.iter().any(|&deadline| deadline <= now);
            self.resume_deadlines.retain(|&deadline| deadline > now);
            if due {
                debug!("delayed resume fired for '{}'", self.name);
                self.resume();
            }
        }

        if self.paused || !self.pacer.is_due(now) {
            return;
        }

        for layer in &mut self.layers {
            layer.save();
        }

        match ctx.activate(self.view()) {
            Ok(()) => {
                let result = self.run_frame_hook();
                ctx.deactivate();
                if let Err(err) = result {
                    error!("frame hook failed on '{}': {err:#}", self.name);
                }
            }
            Err(err) => {
                // Unreachable through the scheduler, which never nests
                // ticks; reported loudly in case an embedding finds a way.
                error!("could not activate '{}': {err}", self.name);
            }
        }

        for layer in &mut self.layers {
            layer.restore();
        }

        self.frame_count += 1;
    }

    fn run_frame_hook(&mut self) -> anyhow::Result<()> {
        let Some(mut hook) = self.frame_hook.take() else {
            return Ok(());
        };
        let result = hook(self);
        // A hook may have installed a replacement for itself; keep that
        // one, otherwise put the running hook back.
        if self.frame_hook.is_none() {
            self.frame_hook = Some(hook);
        }
        result
    }

    /// Fires every hook subscribed to `event`, activating the context
    /// around each invocation.
    pub(crate) fn fire_event(&mut self, event: SketchEvent, ctx: &mut ContextSlot) {
        let mut hooks = std::mem::take(&mut self.event_hooks);
        for (kind, hook) in hooks.iter_mut() {
            if *kind != event {
                continue;
            }
            match ctx.activate(self.view()) {
                Ok(()) => {
                    let result = hook(self);
                    ctx.deactivate();
                    if let Err(err) = result {
                        error!("{event:?} hook failed on '{}': {err:#}", self.name);
                    }
                }
                Err(err) => error!("could not activate '{}': {err}", self.name),
            }
        }
        // Hooks subscribed during dispatch land after the existing ones.
        let added = std::mem::replace(&mut self.event_hooks, hooks);
        self.event_hooks.extend(added);
    }
}

impl std::fmt::Debug for Sketch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Sketch")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("size", &(self.width, self.height))
            .field("layers", &self.layers.len())
            .field("paused", &self.paused)
            .field("frame_count", &self.frame_count)
            .finish()
    }
}
