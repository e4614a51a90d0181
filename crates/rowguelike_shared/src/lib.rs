//! # Rowguelike Shared
//!
//! Common types used by both the engine and the display hosts.
//!
//! ## CRITICAL RULE
//!
//! This crate must NEVER depend on `rowguelike_core`.
//! A terminal emulator or an LCD adapter samples input and defines glyphs
//! with these types alone.

#![deny(missing_docs)]
#![deny(unsafe_code)]

pub mod constants;
pub mod glyph;
pub mod input;

pub use constants::{
    DEFAULT_MAX_ENTITIES, DEFAULT_MAX_TAGS, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH,
    GLYPH_ROWS, MAX_TEXT_ROWS,
};
pub use glyph::Glyph;
pub use input::{MomentaryInput, MomentaryValue, RawInput};
