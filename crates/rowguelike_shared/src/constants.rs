//! # Display & Capacity Constants
//!
//! Defaults for the engine configuration and hard limits baked into the
//! component layout.
//!
//! **CRITICAL:** `MAX_TEXT_ROWS` and `GLYPH_ROWS` size fixed arrays.
//! Changing them changes the memory footprint of every entity slot.

// =============================================================================
// SCREEN DEFAULTS
// =============================================================================

/// Default screen width in character cells (16x2 LCD).
pub const DEFAULT_SCREEN_WIDTH: u8 = 16;

/// Default screen height in character rows (16x2 LCD).
pub const DEFAULT_SCREEN_HEIGHT: u8 = 2;

/// Largest screen height a text component can address.
///
/// Covers the 40x25 terminal layout.
pub const MAX_TEXT_ROWS: usize = 32;

// =============================================================================
// CAPACITY DEFAULTS
// =============================================================================

/// Default number of entity slots.
pub const DEFAULT_MAX_ENTITIES: u16 = 64;

/// Default number of tag slots.
pub const DEFAULT_MAX_TAGS: u8 = 32;

/// Default number of scratch number slots.
pub const DEFAULT_SHARED_NUMBERS: u8 = 8;

/// Default number of scratch string slots.
pub const DEFAULT_SHARED_STRINGS: u8 = 4;

/// Default number of scratch external-reference slots.
pub const DEFAULT_SHARED_REFS: u8 = 2;

// =============================================================================
// GLYPHS
// =============================================================================

/// Pixel rows in one custom character (HD44780 5x8 cell).
pub const GLYPH_ROWS: usize = 8;

/// Glyph slots offered by an HD44780-compatible controller.
pub const HD44780_GLYPH_SLOTS: u8 = 8;
