//! # Rowguelike Core Engine
//!
//! Fixed-capacity Entity Component System for games on character displays:
//! a 16x2 LCD, a terminal, anything that draws rows of text.
//!
//! ## Architecture Rules
//!
//! 1. **Fixed capacity** - every table is sized once from [`EngineConfig`]
//! 2. **Capability flags** - an entity is the set of systems that act on it
//! 3. **Fixed pass order** - input, movement, collision, lifetime, timer, render
//!
//! ## Example
//!
//! ```rust,ignore
//! use rowguelike_core::{prefabs, Engine, EngineConfig, RawInput};
//!
//! let mut engine = Engine::new(EngineConfig::default())?;
//! prefabs::background(b' ').spawn(&mut engine)?;
//! prefabs::player_char("@").position(3, 1).spawn(&mut engine)?;
//!
//! engine.set_input(RawInput { right: true, ..RawInput::NONE });
//! engine.tick();
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod config;
pub mod display;
pub mod ecs;
pub mod error;
pub mod prefabs;
pub mod scratch;

pub use config::EngineConfig;
pub use display::{DisplaySink, DrawContext};
pub use ecs::{
    Capabilities, Collider, ColliderFn, ComponentStorage, Engine, EntityBuilder, EntityId,
    Hitpoints, InputFn, InputHandler, Position, Tag, Text, TextRow, Timer, TimerFn, Velocity,
};
pub use error::{EngineError, EngineResult};
pub use rowguelike_shared::{Glyph, MomentaryInput, RawInput};
pub use scratch::{ScratchBlock, ScratchValue};
