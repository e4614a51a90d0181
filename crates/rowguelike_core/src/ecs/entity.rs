//! # Entity Management
//!
//! An entity is nothing but a slot index plus the capability flags stored
//! for that slot. A slot whose flags are empty is free.
//!
//! Ids are raw indices without a generation counter: after a remove and a
//! respawn, an old id addresses the new occupant of the slot.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use bytemuck::{Pod, Zeroable};

/// Identifier of an entity slot.
///
/// Doubles as the index into every component array.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct EntityId(u16);

impl EntityId {
    /// Creates an id for the given slot index.
    #[inline]
    #[must_use]
    pub const fn new(index: u16) -> Self {
        Self(index)
    }

    /// Returns the slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// Returns the raw id value.
    #[inline]
    #[must_use]
    pub const fn raw(self) -> u16 {
        self.0
    }
}

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Bitmask of behaviors an entity currently has.
///
/// Tracks which systems process the entity. Empty means the slot is free.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct Capabilities(u8);

impl Capabilities {
    /// No capabilities: a free slot.
    pub const EMPTY: Self = Self(0);
    /// Position is integrated by velocity each tick.
    pub const MOVE: Self = Self(1 << 0);
    /// Velocity is overwritten from the direction buttons.
    pub const CONTROL: Self = Self(1 << 1);
    /// Culled by the lifetime pass when hitpoints reach zero.
    pub const HEALTH: Self = Self(1 << 2);
    /// Offered to the collision pass.
    pub const COLLIDER: Self = Self(1 << 3);
    /// Drawn by the render pass.
    pub const TEXT: Self = Self(1 << 4);
    /// Receives the raw input snapshot.
    pub const INPUT_HANDLER: Self = Self(1 << 5);
    /// Counts frames and fires a callback.
    pub const TIMER: Self = Self(1 << 6);

    /// Creates flags from raw bits.
    #[inline]
    #[must_use]
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    #[inline]
    #[must_use]
    pub const fn bits(self) -> u8 {
        self.0
    }

    /// True for a free slot.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// True if every flag in `other` is set.
    #[inline]
    #[must_use]
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Sets the flags in `other`.
    #[inline]
    pub fn insert(&mut self, other: Self) {
        self.0 |= other.0;
    }

    /// Clears the flags in `other`.
    #[inline]
    pub fn remove(&mut self, other: Self) {
        self.0 &= !other.0;
    }

    /// Clears every flag, freeing the slot.
    #[inline]
    pub fn clear(&mut self) {
        self.0 = 0;
    }
}

impl BitOr for Capabilities {
    type Output = Self;

    #[inline]
    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Capabilities {
    #[inline]
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entity_id_index() {
        let id = EntityId::new(12);
        assert_eq!(id.index(), 12);
        assert_eq!(id.raw(), 12);
        assert_eq!(id.to_string(), "#12");
    }

    #[test]
    fn test_capability_mask() {
        let mut caps = Capabilities::MOVE | Capabilities::CONTROL;
        assert!(caps.contains(Capabilities::MOVE));
        assert!(!caps.contains(Capabilities::TIMER));
        assert!(!caps.contains(Capabilities::MOVE | Capabilities::TIMER));

        caps.insert(Capabilities::TIMER);
        assert!(caps.contains(Capabilities::TIMER));

        caps.remove(Capabilities::MOVE);
        assert!(!caps.contains(Capabilities::MOVE));

        caps.clear();
        assert!(caps.is_empty());
    }

    #[test]
    fn test_flag_bits_are_distinct() {
        let all = [
            Capabilities::MOVE,
            Capabilities::CONTROL,
            Capabilities::HEALTH,
            Capabilities::COLLIDER,
            Capabilities::TEXT,
            Capabilities::INPUT_HANDLER,
            Capabilities::TIMER,
        ];
        let combined = all.iter().fold(Capabilities::EMPTY, |acc, c| acc | *c);
        assert_eq!(combined.bits().count_ones() as usize, all.len());
    }
}
