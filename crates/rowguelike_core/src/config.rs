//! # Engine Configuration
//!
//! Capacities and screen geometry. Every array in the engine is sized from
//! these values once, at construction; nothing grows afterwards.
//!
//! ```toml
//! max_entities = 32
//! screen_width = 20
//! screen_height = 4
//! move_outside_screen = false
//! ```

use std::path::Path;

use rowguelike_shared::constants::{
    DEFAULT_MAX_ENTITIES, DEFAULT_MAX_TAGS, DEFAULT_SCREEN_HEIGHT, DEFAULT_SCREEN_WIDTH,
    DEFAULT_SHARED_NUMBERS, DEFAULT_SHARED_REFS, DEFAULT_SHARED_STRINGS, MAX_TEXT_ROWS,
};
use serde::{Deserialize, Serialize};

use crate::error::{EngineError, EngineResult};

/// Construction-time limits for an [`crate::Engine`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Number of entity slots.
    pub max_entities: u16,
    /// Number of tag slots.
    pub max_tags: u8,
    /// Screen width in character cells.
    pub screen_width: u8,
    /// Screen height in character rows.
    pub screen_height: u8,
    /// Scratch number slots.
    pub shared_numbers: u8,
    /// Scratch string slots.
    pub shared_strings: u8,
    /// Scratch external-reference slots.
    pub shared_refs: u8,
    /// Skip clamping positions and text writes to the screen.
    pub move_outside_screen: bool,
    /// Seed for the engine's deterministic RNG.
    pub seed: u64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            max_entities: DEFAULT_MAX_ENTITIES,
            max_tags: DEFAULT_MAX_TAGS,
            screen_width: DEFAULT_SCREEN_WIDTH,
            screen_height: DEFAULT_SCREEN_HEIGHT,
            shared_numbers: DEFAULT_SHARED_NUMBERS,
            shared_strings: DEFAULT_SHARED_STRINGS,
            shared_refs: DEFAULT_SHARED_REFS,
            move_outside_screen: false,
            seed: 0,
        }
    }
}

impl EngineConfig {
    /// Default config with a different entity capacity.
    #[must_use]
    pub fn with_capacity(max_entities: u16) -> Self {
        Self {
            max_entities,
            ..Self::default()
        }
    }

    /// Default config with a different screen size.
    #[must_use]
    pub fn with_screen(screen_width: u8, screen_height: u8) -> Self {
        Self {
            screen_width,
            screen_height,
            ..Self::default()
        }
    }

    /// Parses a config from TOML. Missing keys take their defaults.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::ConfigParse`] on malformed TOML and
    /// [`EngineError::InvalidConfig`] if a value is out of range.
    pub fn from_toml_str(source: &str) -> EngineResult<Self> {
        let config: Self = toml::from_str(source)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads and parses a TOML config file.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Io`] if the file cannot be read, otherwise as
    /// [`EngineConfig::from_toml_str`].
    pub fn load(path: impl AsRef<Path>) -> EngineResult<Self> {
        let path = path.as_ref();
        let source = std::fs::read_to_string(path)?;
        let config = Self::from_toml_str(&source)?;
        tracing::info!(
            "Loaded engine config from {}: {} entities, {}x{} screen",
            path.display(),
            config.max_entities,
            config.screen_width,
            config.screen_height
        );
        Ok(config)
    }

    /// Checks every limit the engine relies on.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::InvalidConfig`] naming the first bad field.
    pub fn validate(&self) -> EngineResult<()> {
        if self.max_entities == 0 {
            return Err(EngineError::InvalidConfig(
                "max_entities must be greater than zero".into(),
            ));
        }
        if self.screen_width == 0 || self.screen_height == 0 {
            return Err(EngineError::InvalidConfig(format!(
                "screen must be at least 1x1, got {}x{}",
                self.screen_width, self.screen_height
            )));
        }
        if usize::from(self.screen_height) > MAX_TEXT_ROWS {
            return Err(EngineError::InvalidConfig(format!(
                "screen_height {} exceeds the {MAX_TEXT_ROWS} rows a text component holds",
                self.screen_height
            )));
        }
        Ok(())
    }

    /// Entity capacity as an array length.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        usize::from(self.max_entities)
    }

    /// Last addressable column.
    #[inline]
    #[must_use]
    pub fn last_column(&self) -> i16 {
        i16::from(self.screen_width) - 1
    }

    /// Last addressable row.
    #[inline]
    #[must_use]
    pub fn last_row(&self) -> i16 {
        i16::from(self.screen_height) - 1
    }
}
