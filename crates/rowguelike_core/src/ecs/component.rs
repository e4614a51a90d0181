//! # Component Types
//!
//! Plain data components (`Position`, `Velocity`, `Hitpoints`) are `Pod`.
//! Behavior components (`Collider`, `InputHandler`, `Timer`) carry a shared
//! handler that the pipeline clones out of storage before calling, so the
//! handler can take `&mut Engine` while it runs.

use std::fmt;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};
use rowguelike_shared::{RawInput, MAX_TEXT_ROWS};

use super::engine::Engine;
use super::entity::EntityId;

/// Grid position of an entity.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Position {
    /// Column.
    pub x: i16,
    /// Row.
    pub y: i16,
    /// Direction the entity faces. Free for game use.
    pub facing: i16,
}

impl Position {
    /// Creates a position facing 0.
    #[inline]
    #[must_use]
    pub const fn new(x: i16, y: i16) -> Self {
        Self { x, y, facing: 0 }
    }
}

/// Per-tick movement delta.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(C)]
pub struct Velocity {
    /// Columns per tick.
    pub vx: i16,
    /// Rows per tick.
    pub vy: i16,
    /// Reserved.
    pub rotation: i16,
}

impl Velocity {
    /// Creates a velocity with no rotation.
    #[inline]
    #[must_use]
    pub const fn new(vx: i16, vy: i16) -> Self {
        Self { vx, vy, rotation: 0 }
    }

    /// Zero velocity.
    pub const ZERO: Self = Self::new(0, 0);
}

/// Health of an entity. Exactly zero means dead at the next lifetime pass.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Hitpoints {
    /// Remaining hitpoints.
    pub hp: i16,
}

// =============================================================================
// HANDLERS
// =============================================================================

/// Collision callback: `(engine, receiver, peer)`.
#[derive(Clone)]
pub struct ColliderFn(Rc<dyn Fn(&mut Engine, EntityId, EntityId)>);

impl ColliderFn {
    /// Wraps a closure or function.
    pub fn new(f: impl Fn(&mut Engine, EntityId, EntityId) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the callback.
    #[inline]
    pub fn call(&self, engine: &mut Engine, receiver: EntityId, peer: EntityId) {
        (self.0)(engine, receiver, peer);
    }
}

/// Input callback: `(engine, receiver, raw input)`.
#[derive(Clone)]
pub struct InputFn(Rc<dyn Fn(&mut Engine, EntityId, RawInput)>);

impl InputFn {
    /// Wraps a closure or function.
    pub fn new(f: impl Fn(&mut Engine, EntityId, RawInput) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// Invokes the callback.
    #[inline]
    pub fn call(&self, engine: &mut Engine, receiver: EntityId, input: RawInput) {
        (self.0)(engine, receiver, input);
    }
}

/// Timer callback: `(engine, receiver)`.
#[derive(Clone)]
pub struct TimerFn(Rc<dyn Fn(&mut Engine, EntityId)>);

impl TimerFn {
    /// Wraps a closure or function.
    pub fn new(f: impl Fn(&mut Engine, EntityId) + 'static) -> Self {
        Self(Rc::new(f))
    }

    /// A callback that does nothing.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(|_, _| {})
    }

    /// Invokes the callback.
    #[inline]
    pub fn call(&self, engine: &mut Engine, receiver: EntityId) {
        (self.0)(engine, receiver);
    }
}

macro_rules! opaque_debug {
    ($($name:ident),*) => {
        $(
            impl fmt::Debug for $name {
                fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                    f.write_str(concat!(stringify!($name), "(..)"))
                }
            }
        )*
    };
}

opaque_debug!(ColliderFn, InputFn, TimerFn);

// =============================================================================
// BEHAVIOR COMPONENTS
// =============================================================================

/// Collision participant.
#[derive(Clone, Debug, Default)]
pub struct Collider {
    /// Damage or identity value, read by peers.
    pub value: i16,
    /// Called once per peer per tick.
    pub handler: Option<ColliderFn>,
}

/// Receiver of the raw input snapshot.
#[derive(Clone, Debug, Default)]
pub struct InputHandler {
    /// Called once per tick.
    pub handler: Option<InputFn>,
}

/// Frame counter with a callback.
///
/// `current_frame` stays within `0..=frame_count`.
#[derive(Clone, Debug, Default)]
pub struct Timer {
    /// Frames counted since the last fire.
    pub current_frame: u16,
    /// Threshold. Zero fires every tick.
    pub frame_count: u16,
    /// Called when the threshold is reached.
    pub handler: Option<TimerFn>,
}

/// Content of one text row.
///
/// Runtime text (a formatted score) goes in as [`TextRow::Shared`]; the
/// allocation happens once when the row is built, never during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TextRow {
    /// A fixed string.
    Str(&'static str),
    /// A string built at runtime, shared between the builder and the entity.
    Shared(Rc<str>),
    /// One byte repeated to the end of the screen row.
    Fill(u8),
}

impl TextRow {
    /// The row's string, `None` for fills.
    #[inline]
    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::Str(text) => Some(text),
            Self::Shared(text) => Some(text),
            Self::Fill(_) => None,
        }
    }
}

impl From<&'static str> for TextRow {
    fn from(text: &'static str) -> Self {
        Self::Str(text)
    }
}

impl From<String> for TextRow {
    fn from(text: String) -> Self {
        Self::Shared(text.into())
    }
}

impl From<Rc<str>> for TextRow {
    fn from(text: Rc<str>) -> Self {
        Self::Shared(text)
    }
}

/// Text drawn relative to the entity position, one entry per screen row.
///
/// `None` rows leave the screen buffer untouched.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Text {
    /// Row contents; only the first `screen_height` rows are drawn.
    pub rows: [Option<TextRow>; MAX_TEXT_ROWS],
}

impl Default for Text {
    fn default() -> Self {
        Self {
            rows: std::array::from_fn(|_| None),
        }
    }
}

impl Text {
    /// Returns a row, `None` if empty or out of range.
    #[inline]
    #[must_use]
    pub fn row(&self, row: usize) -> Option<&TextRow> {
        self.rows.get(row).and_then(Option::as_ref)
    }

    /// Sets a row. Out-of-range rows are ignored.
    #[inline]
    pub fn set_row(&mut self, row: usize, content: Option<TextRow>) {
        if let Some(slot) = self.rows.get_mut(row) {
            *slot = content;
        }
    }
}
