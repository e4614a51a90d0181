//! # Prefabs
//!
//! Ready-made callbacks and builders for common game pieces.
//!
//! ```rust,ignore
//! let wall = prefabs::background(b'.').spawn(&mut engine)?;
//! let bullet = EntityBuilder::new()
//!     .text("-")
//!     .velocity(1, 0)
//!     .hitpoints(1)
//!     .collider(1, prefabs::hit_peer)
//!     .timer(12, prefabs::remove_this);
//! ```

use rowguelike_shared::{RawInput, MAX_TEXT_ROWS};

use crate::ecs::{EntityBuilder, EntityId, TextRow, TimerFn};
use crate::Engine;

// =============================================================================
// Collision
// =============================================================================

/// True if both entities occupy the same cell with the same facing.
#[must_use]
pub fn test_hit(engine: &Engine, receiver: EntityId, peer: EntityId) -> bool {
    engine.position(receiver) == engine.position(peer)
}

/// On a hit, the receiver loses the peer's collider value.
pub fn hit_receiver(engine: &mut Engine, receiver: EntityId, peer: EntityId) {
    if test_hit(engine, receiver, peer) {
        let value = engine.collider(peer).value;
        damage(engine, receiver, value);
    }
}

/// On a hit, the peer loses the receiver's collider value.
pub fn hit_peer(engine: &mut Engine, receiver: EntityId, peer: EntityId) {
    if test_hit(engine, receiver, peer) {
        let value = engine.collider(receiver).value;
        damage(engine, peer, value);
    }
}

/// Hitpoints never drop below zero, so the lifetime pass always sees the kill.
fn damage(engine: &mut Engine, target: EntityId, value: i16) {
    let hitpoints = engine.hitpoints_mut(target);
    hitpoints.hp = if hitpoints.hp > value {
        hitpoints.hp.saturating_sub(value)
    } else {
        0
    };
}

// =============================================================================
// Input
// =============================================================================

/// Steers along one axis at a time and refuses to reverse.
///
/// Buttons are checked left, right, up, down; the first one that does not
/// point against the current velocity wins.
pub fn non_inverting_control(engine: &mut Engine, receiver: EntityId, input: RawInput) {
    let velocity = engine.velocity_mut(receiver);
    let (vx, vy) = if input.left && velocity.vx != 1 {
        (-1, 0)
    } else if input.right && velocity.vx != -1 {
        (1, 0)
    } else if input.up && velocity.vy != 1 {
        (0, -1)
    } else if input.down && velocity.vy != -1 {
        (0, 1)
    } else {
        return;
    };
    velocity.vx = vx;
    velocity.vy = vy;
}

// =============================================================================
// Timers
// =============================================================================

/// Runs `f` on the first expiry, then disarms the timer. The entity stays.
pub fn timer_once<F>(f: F) -> impl Fn(&mut Engine, EntityId) + 'static
where
    F: Fn(&mut Engine, EntityId) + 'static,
{
    move |engine, receiver| {
        f(engine, receiver);
        engine.timer_mut(receiver).handler = Some(TimerFn::noop());
    }
}

/// Runs `f` on the first expiry, then removes the entity.
pub fn timer_once_and_remove<F>(f: F) -> impl Fn(&mut Engine, EntityId) + 'static
where
    F: Fn(&mut Engine, EntityId) + 'static,
{
    move |engine, receiver| {
        f(engine, receiver);
        engine.remove(receiver);
    }
}

/// Removes the entity when its timer expires.
pub fn remove_this(engine: &mut Engine, receiver: EntityId) {
    engine.remove(receiver);
}

// =============================================================================
// Builders
// =============================================================================

/// Full-screen backdrop of `symbol`, drawn from (0, 0).
///
/// Spawn it first: the render pass draws in id order, so later entities
/// land on top.
pub fn background(symbol: u8) -> EntityBuilder {
    (0..MAX_TEXT_ROWS).fold(EntityBuilder::new().position(0, 0), |builder, row| {
        builder.fill_line(row, symbol)
    })
}

/// Player-steered glyph: moves with the direction buttons.
pub fn player_char(text: impl Into<TextRow>) -> EntityBuilder {
    EntityBuilder::new().velocity(0, 0).control().text(text)
}
