//! # Engine
//!
//! The central container for all entities, components and the screen.
//! Every array is allocated once from the [`EngineConfig`] at creation.
//!
//! # Invalid references
//!
//! Component getters never fail. An out-of-range id reads a pristine
//! default and writes into a scratch dummy that is reset on every access,
//! so a stale or bogus id degrades into a harmless no-op.

use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use rowguelike_shared::RawInput;

use super::builder::EntityBuilder;
use super::component::{
    Collider, Hitpoints, InputHandler, Position, Text, Timer, Velocity,
};
use super::entity::{Capabilities, EntityId};
use super::storage::ComponentStorage;
use super::tags::{Tag, TagTable};
use crate::config::EngineConfig;
use crate::display::DrawContext;
use crate::error::{EngineError, EngineResult};
use crate::scratch::ScratchBlock;

/// One value per component kind, used as the target of invalid references.
#[derive(Clone, Debug, Default)]
struct DummyValues {
    capabilities: Capabilities,
    position: Position,
    velocity: Velocity,
    hitpoints: Hitpoints,
    collider: Collider,
    text: Text,
    input_handler: InputHandler,
    timer: Timer,
}

/// The entity runtime.
///
/// # Example
///
/// ```rust,ignore
/// let mut engine = Engine::new(EngineConfig::default())?;
///
/// let player = EntityBuilder::new()
///     .control()
///     .velocity(0, 0)
///     .text("@")
///     .spawn(&mut engine)?;
///
/// engine.set_input(RawInput { right: true, ..RawInput::NONE });
/// engine.tick();
/// ```
#[derive(Debug)]
pub struct Engine {
    config: EngineConfig,
    /// Capability flags per slot. Empty means free.
    pub(crate) entities: Box<[Capabilities]>,
    tags: TagTable,

    // =========================================================================
    // Component Storages
    // =========================================================================
    pub(crate) positions: ComponentStorage<Position>,
    pub(crate) velocities: ComponentStorage<Velocity>,
    pub(crate) hitpoints: ComponentStorage<Hitpoints>,
    pub(crate) colliders: ComponentStorage<Collider>,
    pub(crate) texts: ComponentStorage<Text>,
    pub(crate) input_handlers: ComponentStorage<InputHandler>,
    pub(crate) timers: ComponentStorage<Timer>,

    pub(crate) input: RawInput,
    pub(crate) draw: DrawContext,
    scratch: ScratchBlock,
    rng: ChaCha8Rng,
    pub(crate) tick_count: u64,

    dummy: DummyValues,
    defaults: DummyValues,
}

/// Generates the read and write accessor for one component kind.
macro_rules! component_access {
    ($($doc:literal, $get:ident, $get_mut:ident, $storage:ident, $dummy:ident: $ty:ty;)*) => {
        $(
            #[doc = concat!("Returns the ", $doc, " of `id`, or a default if `id` is out of range.")]
            #[inline]
            #[must_use]
            pub fn $get(&self, id: EntityId) -> &$ty {
                self.$storage.get(id.index()).unwrap_or(&self.defaults.$dummy)
            }

            #[doc = concat!("Mutable ", $doc, " of `id`. Out-of-range ids get a dummy whose writes are discarded.")]
            #[inline]
            pub fn $get_mut(&mut self, id: EntityId) -> &mut $ty {
                let index = id.index();
                if index < self.$storage.capacity() {
                    return &mut self.$storage.as_mut_slice()[index];
                }
                self.dummy.$dummy = <$ty>::default();
                &mut self.dummy.$dummy
            }
        )*
    };
}

/// Id of the slot at `index`. Capacity is bounded by `u16`.
#[inline]
#[allow(clippy::cast_possible_truncation)]
pub(crate) const fn id_at(index: usize) -> EntityId {
    EntityId::new(index as u16)
}

impl Engine {
    /// Creates an engine with every slot free and a blank screen.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] if the config fails validation.
    pub fn new(config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::build(config))
    }

    fn build(config: EngineConfig) -> Self {
        let capacity = config.capacity();
        tracing::info!(
            "Engine created: {} entity slots, {} tags, {}x{} screen",
            capacity,
            config.max_tags,
            config.screen_width,
            config.screen_height
        );

        Self {
            entities: vec![Capabilities::EMPTY; capacity].into_boxed_slice(),
            tags: TagTable::new(usize::from(config.max_tags)),
            positions: ComponentStorage::new(capacity),
            velocities: ComponentStorage::new(capacity),
            hitpoints: ComponentStorage::new(capacity),
            colliders: ComponentStorage::new(capacity),
            texts: ComponentStorage::new(capacity),
            input_handlers: ComponentStorage::new(capacity),
            timers: ComponentStorage::new(capacity),
            input: RawInput::NONE,
            draw: DrawContext::new(
                config.screen_width,
                config.screen_height,
                config.move_outside_screen,
            ),
            scratch: ScratchBlock::new(
                usize::from(config.shared_numbers),
                usize::from(config.shared_strings),
                usize::from(config.shared_refs),
            ),
            rng: ChaCha8Rng::seed_from_u64(config.seed),
            tick_count: 0,
            dummy: DummyValues::default(),
            defaults: DummyValues::default(),
            config,
        }
    }

    /// Frees every slot, unsets every tag, zeroes all component data and
    /// blanks the screen.
    ///
    /// The scratch block and an attached display sink survive.
    pub fn reset(&mut self) {
        self.entities.fill(Capabilities::EMPTY);
        self.tags.clear();
        self.positions.clear();
        self.velocities.clear();
        self.hitpoints.clear();
        self.colliders.clear();
        self.texts.clear();
        self.input_handlers.clear();
        self.timers.clear();
        self.input = RawInput::NONE;
        self.draw.clear_all();
        self.rng = ChaCha8Rng::seed_from_u64(self.config.seed);
        self.tick_count = 0;
        tracing::info!("Engine reset: {} slots freed", self.capacity());
    }

    /// The configuration this engine was built from.
    #[inline]
    #[must_use]
    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Number of entity slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entities.len()
    }

    /// Ticks run since creation or the last reset.
    #[inline]
    #[must_use]
    pub const fn tick_count(&self) -> u64 {
        self.tick_count
    }

    // =========================================================================
    // Entity table
    // =========================================================================

    /// True if at least one slot is free.
    #[inline]
    #[must_use]
    pub fn can_spawn(&self) -> bool {
        self.entities.iter().any(|caps| caps.is_empty())
    }

    /// Returns the lowest free slot without reserving it.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CapacityExhausted`] if every slot is active.
    pub fn allocate(&self) -> EngineResult<EntityId> {
        self.entities
            .iter()
            .position(|caps| caps.is_empty())
            .map(id_at)
            .ok_or(EngineError::CapacityExhausted {
                capacity: self.capacity(),
            })
    }

    /// True if `id` is in range and its flags are non-empty.
    #[inline]
    #[must_use]
    pub fn is_active(&self, id: EntityId) -> bool {
        self.entities
            .get(id.index())
            .is_some_and(|caps| !caps.is_empty())
    }

    /// Number of active slots.
    #[must_use]
    pub fn active_count(&self) -> usize {
        self.entities.iter().filter(|caps| !caps.is_empty()).count()
    }

    /// Iterates over the ids of active slots in increasing order.
    pub fn active_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.entities
            .iter()
            .enumerate()
            .filter(|(_, caps)| !caps.is_empty())
            .map(|(index, _)| id_at(index))
    }

    /// Frees the slot of `id`. Component data stays until overwritten.
    ///
    /// Out-of-range ids are ignored.
    pub fn remove(&mut self, id: EntityId) {
        if let Some(caps) = self.entities.get_mut(id.index()) {
            caps.clear();
            tracing::trace!("Removed entity {}", id);
        }
    }

    /// Capability flags of `id`, empty if out of range.
    #[inline]
    #[must_use]
    pub fn capabilities(&self, id: EntityId) -> Capabilities {
        self.entities.get(id.index()).copied().unwrap_or_default()
    }

    /// Mutable capability flags of `id`. Clearing them removes the entity.
    #[inline]
    pub fn capabilities_mut(&mut self, id: EntityId) -> &mut Capabilities {
        let index = id.index();
        if index < self.entities.len() {
            return &mut self.entities[index];
        }
        self.dummy.capabilities = Capabilities::EMPTY;
        &mut self.dummy.capabilities
    }

    // =========================================================================
    // Tags
    // =========================================================================

    /// Points `tag` at `id`. Out-of-range tags are ignored.
    pub fn set_tag(&mut self, id: EntityId, tag: Tag) {
        if !self.tags.set(tag, id) {
            tracing::debug!("Tag {} out of range, {} not tagged", tag, id);
        }
    }

    /// Entity last tagged with `tag`. May be stale.
    #[inline]
    #[must_use]
    pub fn entity_by_tag(&self, tag: Tag) -> Option<EntityId> {
        self.tags.get(tag)
    }

    /// Capability flags of the entity tagged `tag`, empty if unset.
    #[inline]
    #[must_use]
    pub fn capabilities_by_tag(&self, tag: Tag) -> Capabilities {
        self.entity_by_tag(tag)
            .map(|id| self.capabilities(id))
            .unwrap_or_default()
    }

    // =========================================================================
    // Components
    // =========================================================================

    component_access! {
        "position", position, position_mut, positions, position: Position;
        "velocity", velocity, velocity_mut, velocities, velocity: Velocity;
        "hitpoints", hitpoints, hitpoints_mut, hitpoints, hitpoints: Hitpoints;
        "collider", collider, collider_mut, colliders, collider: Collider;
        "text", text, text_mut, texts, text: Text;
        "input handler", input_handler, input_handler_mut, input_handlers, input_handler: InputHandler;
        "timer", timer, timer_mut, timers, timer: Timer;
    }

    // =========================================================================
    // Spawning
    // =========================================================================

    /// Starts a builder with `capabilities` preset.
    #[inline]
    pub fn make(&self, capabilities: Capabilities) -> EntityBuilder {
        EntityBuilder::with_capabilities(capabilities)
    }

    /// Builder pre-filled with a copy of an active entity.
    ///
    /// Inactive or out-of-range ids give an empty builder. The tag is not
    /// copied.
    pub fn clone_entity(&self, id: EntityId) -> EntityBuilder {
        if !self.is_active(id) {
            return EntityBuilder::new();
        }
        EntityBuilder {
            capabilities: self.capabilities(id),
            position: *self.position(id),
            random_position: false,
            velocity: *self.velocity(id),
            hitpoints: *self.hitpoints(id),
            collider: self.collider(id).clone(),
            text: self.text(id).clone(),
            input_handler: self.input_handler(id).clone(),
            timer: self.timer(id).clone(),
            tag: None,
        }
    }

    /// Commits a builder into the lowest free slot.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::CapacityExhausted`] without touching any
    /// state if no slot is free.
    pub fn spawn(&mut self, builder: &EntityBuilder) -> EngineResult<EntityId> {
        let id = match self.allocate() {
            Ok(id) => id,
            Err(err) => {
                tracing::debug!("Spawn rejected: {}", err);
                return Err(err);
            }
        };
        let index = id.index();

        let mut position = builder.position;
        if builder.random_position {
            use rand::Rng;
            position.x = self.rng.gen_range(0..i16::from(self.config.screen_width));
            position.y = self.rng.gen_range(0..i16::from(self.config.screen_height));
        }

        self.entities[index] = builder.capabilities;
        self.positions.set(index, position);
        self.velocities.set(index, builder.velocity);
        self.hitpoints.set(index, builder.hitpoints);
        self.colliders.set(index, builder.collider.clone());
        self.texts.set(index, builder.text.clone());
        self.input_handlers.set(index, builder.input_handler.clone());
        self.timers.set(index, builder.timer.clone());

        if let Some(tag) = builder.tag {
            self.set_tag(id, tag);
        }

        tracing::trace!(
            "Spawned entity {} with capabilities {:#09b}",
            id,
            builder.capabilities.bits()
        );
        Ok(id)
    }

    // =========================================================================
    // Host interface
    // =========================================================================

    /// Input snapshot for the current tick.
    #[inline]
    #[must_use]
    pub const fn input(&self) -> RawInput {
        self.input
    }

    /// Stores the input snapshot for the next tick.
    #[inline]
    pub fn set_input(&mut self, input: RawInput) {
        self.input = input;
    }

    /// Screen buffer and sink.
    #[inline]
    #[must_use]
    pub const fn draw(&self) -> &DrawContext {
        &self.draw
    }

    /// Mutable screen buffer and sink.
    #[inline]
    pub fn draw_mut(&mut self) -> &mut DrawContext {
        &mut self.draw
    }

    /// Shared scratch values.
    #[inline]
    #[must_use]
    pub const fn scratch(&self) -> &ScratchBlock {
        &self.scratch
    }

    /// Mutable shared scratch values.
    #[inline]
    pub fn scratch_mut(&mut self) -> &mut ScratchBlock {
        &mut self.scratch
    }

    /// The engine's seeded RNG, for callbacks that need randomness.
    #[inline]
    pub fn rng_mut(&mut self) -> &mut ChaCha8Rng {
        &mut self.rng
    }
}

impl Default for Engine {
    fn default() -> Self {
        Self::build(EngineConfig::default())
    }
}
