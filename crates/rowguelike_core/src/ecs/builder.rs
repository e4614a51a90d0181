//! # Entity Builder
//!
//! Collects component values and capability flags for one entity without
//! touching the engine. [`EntityBuilder::spawn`] is the only step with a side
//! effect, and it either commits everything or nothing.
//!
//! Every setter raises the capability its component implies, so
//! `.timer(4, f)` alone is enough to get a ticking entity.

use rowguelike_shared::{RawInput, MAX_TEXT_ROWS};

use super::component::{
    Collider, ColliderFn, Hitpoints, InputFn, InputHandler, Position, Text, TextRow, Timer,
    TimerFn, Velocity,
};
use super::engine::Engine;
use super::entity::{Capabilities, EntityId};
use super::tags::Tag;
use crate::error::EngineResult;

/// Pending entity, committed with [`EntityBuilder::spawn`].
///
/// A builder is a plain value: it can be kept and spawned many times.
///
/// # Example
///
/// ```rust,ignore
/// let bullet = EntityBuilder::new()
///     .text("-")
///     .position(3, 0)
///     .velocity(1, 0)
///     .hitpoints(1)
///     .collider(1, hit_peer);
///
/// if let Ok(id) = bullet.spawn(&mut engine) {
///     engine.set_tag(id, BULLET_TAG);
/// }
/// ```
#[derive(Clone, Debug, Default)]
#[must_use]
pub struct EntityBuilder {
    pub(crate) capabilities: Capabilities,
    pub(crate) position: Position,
    pub(crate) random_position: bool,
    pub(crate) velocity: Velocity,
    pub(crate) hitpoints: Hitpoints,
    pub(crate) collider: Collider,
    pub(crate) text: Text,
    pub(crate) input_handler: InputHandler,
    pub(crate) timer: Timer,
    pub(crate) tag: Option<Tag>,
}

impl EntityBuilder {
    /// Empty builder with no capabilities.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder with `capabilities` preset.
    ///
    /// Presetting a callback capability without supplying the callback
    /// leaves it unset; the pipeline then skips it.
    pub fn with_capabilities(capabilities: Capabilities) -> Self {
        Self {
            capabilities,
            ..Self::default()
        }
    }

    /// Capabilities the entity will spawn with.
    #[must_use]
    pub fn pending_capabilities(&self) -> Capabilities {
        self.capabilities
    }

    /// Adds capabilities without setting any component.
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.capabilities |= capabilities;
        self
    }

    /// Start position.
    pub fn position(mut self, x: i16, y: i16) -> Self {
        self.position.x = x;
        self.position.y = y;
        self.random_position = false;
        self
    }

    /// Start facing.
    pub fn facing(mut self, facing: i16) -> Self {
        self.position.facing = facing;
        self
    }

    /// Random on-screen start position, rolled by the engine at spawn.
    pub fn random_position(mut self) -> Self {
        self.random_position = true;
        self
    }

    /// Velocity; marks the entity as moving.
    pub fn velocity(mut self, vx: i16, vy: i16) -> Self {
        self.capabilities.insert(Capabilities::MOVE);
        self.velocity = Velocity::new(vx, vy);
        self
    }

    /// Velocity kept for game logic only; the movement pass ignores it.
    pub fn velocity_without_move(mut self, vx: i16, vy: i16) -> Self {
        self.velocity = Velocity::new(vx, vy);
        self
    }

    /// Hitpoints; the entity dies when they reach exactly zero.
    pub fn hitpoints(mut self, hp: i16) -> Self {
        self.capabilities.insert(Capabilities::HEALTH);
        self.hitpoints = Hitpoints { hp };
        self
    }

    /// Collision value and callback `(engine, receiver, peer)`.
    pub fn collider<F>(mut self, value: i16, handler: F) -> Self
    where
        F: Fn(&mut Engine, EntityId, EntityId) + 'static,
    {
        self.capabilities.insert(Capabilities::COLLIDER);
        self.collider = Collider {
            value,
            handler: Some(ColliderFn::new(handler)),
        };
        self
    }

    /// Text for the first row. Accepts `&'static str`, `String` or `Rc<str>`.
    pub fn text(self, row0: impl Into<TextRow>) -> Self {
        self.text_line(0, row0)
    }

    /// Text for one row. Rows past the text capacity are ignored.
    pub fn text_line(mut self, row: usize, content: impl Into<TextRow>) -> Self {
        if row >= MAX_TEXT_ROWS {
            return self;
        }
        self.capabilities.insert(Capabilities::TEXT);
        self.text.set_row(row, Some(content.into()));
        self
    }

    /// Fills one row with `byte` from the entity column to the screen edge.
    pub fn fill_line(self, row: usize, byte: u8) -> Self {
        self.text_line(row, TextRow::Fill(byte))
    }

    /// Input callback `(engine, receiver, raw input)`.
    pub fn input_handler<F>(mut self, handler: F) -> Self
    where
        F: Fn(&mut Engine, EntityId, RawInput) + 'static,
    {
        self.capabilities.insert(Capabilities::INPUT_HANDLER);
        self.input_handler = InputHandler {
            handler: Some(InputFn::new(handler)),
        };
        self
    }

    /// Callback fired every `frames` ticks.
    pub fn timer<F>(mut self, frames: u16, handler: F) -> Self
    where
        F: Fn(&mut Engine, EntityId) + 'static,
    {
        self.capabilities.insert(Capabilities::TIMER);
        self.timer = Timer {
            current_frame: 0,
            frame_count: frames,
            handler: Some(TimerFn::new(handler)),
        };
        self
    }

    /// Callback fired on every tick.
    pub fn each_tick<F>(self, handler: F) -> Self
    where
        F: Fn(&mut Engine, EntityId) + 'static,
    {
        self.timer(0, handler)
    }

    /// Tag applied on spawn.
    pub fn tag(mut self, tag: Tag) -> Self {
        self.tag = Some(tag);
        self
    }

    /// Velocity follows the direction buttons.
    pub fn control(mut self) -> Self {
        self.capabilities.insert(Capabilities::CONTROL);
        self
    }

    /// Commits the entity into the lowest free slot.
    ///
    /// # Errors
    ///
    /// Returns [`crate::EngineError::CapacityExhausted`] if the table is
    /// full; the engine is left untouched.
    pub fn spawn(&self, engine: &mut Engine) -> EngineResult<EntityId> {
        engine.spawn(self)
    }

    /// Spawns and writes the id into `out`.
    ///
    /// On a full table `out` keeps its old value. Check
    /// [`Engine::can_spawn`] first when exhaustion matters.
    pub fn spawn_into(&self, engine: &mut Engine, out: &mut EntityId) {
        if let Ok(id) = engine.spawn(self) {
            *out = id;
        }
    }
}
