//! # Entity Component System
//!
//! A fixed-capacity ECS for character-grid games.
//!
//! ## Design
//!
//! - Every storage is allocated once at engine creation
//! - Components live in dense per-kind arrays indexed by entity id
//! - Entity ids are plain slot indices; a freed id is reused as is
//! - An entity exists while its capability flags are non-empty

mod builder;
mod component;
mod engine;
mod entity;
mod storage;
mod systems;
mod tags;

pub use builder::EntityBuilder;
pub use component::{
    Collider, ColliderFn, Hitpoints, InputFn, InputHandler, Position, Text, TextRow, Timer,
    TimerFn, Velocity,
};
pub use engine::Engine;
pub use entity::{Capabilities, EntityId};
pub use storage::ComponentStorage;
pub use tags::{Tag, TagTable};
