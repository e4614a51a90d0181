//! Input snapshots handed from the display host to the engine.
//!
//! The host samples its buttons once per tick and writes a [`RawInput`]
//! into the engine before ticking. [`MomentaryInput`] turns held buttons
//! into single-tick presses for menus and fire buttons.

use serde::{Deserialize, Serialize};

/// Button state for one tick: four directions plus select.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RawInput {
    /// Left is held.
    pub left: bool,
    /// Right is held.
    pub right: bool,
    /// Up is held.
    pub up: bool,
    /// Down is held.
    pub down: bool,
    /// Select/fire is held.
    pub select: bool,
}

impl RawInput {
    /// No buttons held.
    pub const NONE: Self = Self {
        left: false,
        right: false,
        up: false,
        down: false,
        select: false,
    };

    /// Returns true if any direction is held.
    #[inline]
    #[must_use]
    pub const fn any_direction(&self) -> bool {
        self.left || self.right || self.up || self.down
    }

    /// Returns true if any button at all is held.
    #[inline]
    #[must_use]
    pub const fn any_button(&self) -> bool {
        self.any_direction() || self.select
    }
}

/// A button that reports true only on the tick it went down.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MomentaryValue {
    last: bool,
    current: bool,
}

impl MomentaryValue {
    /// Records this tick's raw state.
    #[inline]
    pub fn set(&mut self, held: bool) {
        self.last = self.current;
        self.current = held;
    }

    /// True if the button is held now and was not held on the previous tick.
    #[inline]
    #[must_use]
    pub const fn pressed(&self) -> bool {
        self.current && !self.last
    }
}

/// Edge-triggered view over a stream of [`RawInput`] snapshots.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct MomentaryInput {
    /// Left edge.
    pub left: MomentaryValue,
    /// Right edge.
    pub right: MomentaryValue,
    /// Up edge.
    pub up: MomentaryValue,
    /// Down edge.
    pub down: MomentaryValue,
    /// Select edge.
    pub select: MomentaryValue,
}

impl MomentaryInput {
    /// Feeds the next raw snapshot.
    pub fn update(&mut self, raw: RawInput) {
        self.left.set(raw.left);
        self.right.set(raw.right);
        self.up.set(raw.up);
        self.down.set(raw.down);
        self.select.set(raw.select);
    }

    /// Buttons that went down on the latest update.
    #[must_use]
    pub const fn pressed(&self) -> RawInput {
        RawInput {
            left: self.left.pressed(),
            right: self.right.pressed(),
            up: self.up.pressed(),
            down: self.down.pressed(),
            select: self.select.pressed(),
        }
    }
}
