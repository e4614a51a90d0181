//! # Tag Table
//!
//! Small integer names for entities ("the player", "the ball").
//!
//! Entries are never invalidated: after the tagged entity is removed the tag
//! keeps pointing at its slot until it is set again.

use super::entity::EntityId;

/// Tag key.
pub type Tag = u8;

/// Fixed-size mapping from [`Tag`] to [`EntityId`].
#[derive(Clone, Debug)]
pub struct TagTable {
    entries: Box<[Option<EntityId>]>,
}

impl TagTable {
    /// Creates a table with `capacity` unset tags.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        Self {
            entries: vec![None; capacity].into_boxed_slice(),
        }
    }

    /// Number of tag slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.entries.len()
    }

    /// Points `tag` at `id`. Out-of-range tags are ignored.
    ///
    /// Returns `false` if the tag was out of range.
    #[inline]
    pub fn set(&mut self, tag: Tag, id: EntityId) -> bool {
        match self.entries.get_mut(usize::from(tag)) {
            Some(slot) => {
                *slot = Some(id);
                true
            }
            None => false,
        }
    }

    /// Looks up a tag. `None` if unset or out of range.
    #[inline]
    #[must_use]
    pub fn get(&self, tag: Tag) -> Option<EntityId> {
        self.entries.get(usize::from(tag)).copied().flatten()
    }

    /// Unsets every tag.
    pub fn clear(&mut self) {
        self.entries.fill(None);
    }
}
