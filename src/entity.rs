//! Lightweight entity list: per-object update/render hooks on a sketch.

use crate::runtime::SketchId;
use crate::sketch::Sketch;
use crate::util::Vec2;

/// Identity of an entity within its owning sketch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EntityId(u64);

/// Hook signature shared by update and render phases.
///
/// Hooks get the entity itself plus the sketch the batch is running on, so
/// render hooks draw through the same API as frame hooks.
pub type EntityHook = Box<dyn FnMut(&mut Entity, &mut Sketch) -> anyhow::Result<()>>;

/// One user object attached to a sketch.
///
/// Entities carry a position, an optional name for lookup, and optional
/// update/render hooks that run once per entity batch in insertion order.
pub struct Entity {
    /// The entity's position, freely mutated by its hooks.
    pub position: Vec2,
    name: Option<String>,
    update: Option<EntityHook>,
    render: Option<EntityHook>,
    id: Option<EntityId>,
    owner: Option<SketchId>,
    alive: bool,
}

impl Entity {
    /// Creates an entity at the given position with no hooks.
    pub fn new(x: f64, y: f64) -> Self {
        Self {
            position: Vec2::new(x, y),
            name: None,
            update: None,
            render: None,
            id: None,
            owner: None,
            alive: true,
        }
    }

    /// Names the entity for later lookup.
    pub fn named(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    /// Attaches the update hook (builder form).
    pub fn on_update(
        mut self,
        hook: impl FnMut(&mut Entity, &mut Sketch) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.update = Some(Box::new(hook));
        self
    }

    /// Attaches the render hook (builder form).
    pub fn on_render(
        mut self,
        hook: impl FnMut(&mut Entity, &mut Sketch) -> anyhow::Result<()> + 'static,
    ) -> Self {
        self.render = Some(Box::new(hook));
        self
    }

    /// Replaces the update hook.
    pub fn set_update(
        &mut self,
        hook: impl FnMut(&mut Entity, &mut Sketch) -> anyhow::Result<()> + 'static,
    ) {
        self.update = Some(Box::new(hook));
    }

    /// Replaces the render hook.
    pub fn set_render(
        &mut self,
        hook: impl FnMut(&mut Entity, &mut Sketch) -> anyhow::Result<()> + 'static,
    ) {
        self.render = Some(Box::new(hook));
    }

    /// The entity's name, if it has one.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// The id assigned when the entity was added to a sketch.
    pub fn id(&self) -> Option<EntityId> {
        self.id
    }

    /// The sketch this entity belongs to, once added.
    pub fn owner(&self) -> Option<SketchId> {
        self.owner
    }

    /// Marks the entity for removal from its owner's list.
    ///
    /// Inside a running batch the current pass still completes; the entity
    /// is swept when the batch ends.
    pub fn remove(&mut self) {
        self.alive = false;
    }

    pub(crate) fn is_alive(&self) -> bool {
        self.alive
    }

    pub(crate) fn take_update(&mut self) -> Option<EntityHook> {
        self.update.take()
    }

    pub(crate) fn put_update(&mut self, hook: EntityHook) {
        if self.update.is_none() {
            self.update = Some(hook);
        }
    }

    pub(crate) fn take_render(&mut self) -> Option<EntityHook> {
        self.render.take()
    }

    pub(crate) fn put_render(&mut self, hook: EntityHook) {
        if self.render.is_none() {
            self.render = Some(hook);
        }
    }
}

impl std::fmt::Debug for Entity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Entity")
            .field("position", &self.position)
            .field("name", &self.name)
            .field("id", &self.id)
            .field("owner", &self.owner)
            .field("alive", &self.alive)
            .finish()
    }
}

/// The ordered entity collection owned by one sketch.
#[derive(Debug, Default)]
pub(crate) struct Entities {
    items: Vec<Entity>,
    next_id: u64,
}

impl Entities {
    pub(crate) fn add(&mut self, mut entity: Entity, owner: SketchId) -> EntityId {
        let id = EntityId(self.next_id);
        self.next_id += 1;
        entity.id = Some(id);
        entity.owner = Some(owner);
        entity.alive = true;
        self.items.push(entity);
        id
    }

    /// Removes by identity. O(n) over the list, which stays fine for the
    /// entity counts sketches realistically carry.
    pub(crate) fn remove(&mut self, id: EntityId) -> bool {
        let before = self.items.len();
        self.items.retain(|entity| entity.id != Some(id));
        self.items.len() != before
    }

    pub(crate) fn len(&self) -> usize {
        self.items.len()
    }

    pub(crate) fn iter(&self) -> impl Iterator<Item = &Entity> {
        self.items.iter()
    }

    pub(crate) fn by_name(&self, name: &str) -> Option<&Entity> {
        self.items.iter().find(|entity| entity.name() == Some(name))
    }

    /// Takes the whole list for a batch run, leaving an empty list that
    /// collects entities added while the batch executes.
    pub(crate) fn take_batch(&mut self) -> Vec<Entity> {
        std::mem::take(&mut self.items)
    }

    /// Reinstates a finished batch: removed entities are swept, and
    /// entities added during the batch keep their position after the
    /// survivors.
    pub(crate) fn merge_batch(&mut self, mut batch: Vec<Entity>) {
        batch.retain(Entity::is_alive);
        let added = std::mem::replace(&mut self.items, batch);
        self.items.extend(added.into_iter().filter(Entity::is_alive));
    }
}
