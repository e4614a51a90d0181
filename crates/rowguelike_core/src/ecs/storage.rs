//! # Component Storage
//!
//! Pre-allocated, dense component storage with zero runtime allocations.
//!
//! - All slots are allocated when the engine is built
//! - Access is O(1) via entity index
//! - A free slot keeps its stale value until the next spawn overwrites it

/// Pre-allocated storage for a single component type.
///
/// # Example
///
/// ```rust,ignore
/// let mut storage: ComponentStorage<Position> = ComponentStorage::new(64);
/// storage.set(0, Position::new(1, 2));
/// ```
#[derive(Clone, Debug)]
pub struct ComponentStorage<C> {
    /// The dense array of components.
    data: Box<[C]>,
}

impl<C: Clone + Default> ComponentStorage<C> {
    /// Creates storage with every slot set to the default value.
    ///
    /// # Panics
    ///
    /// Panics if capacity is zero.
    #[must_use]
    pub fn new(capacity: usize) -> Self {
        assert!(capacity > 0, "Capacity must be greater than zero");

        Self {
            data: vec![C::default(); capacity].into_boxed_slice(),
        }
    }

    /// Returns the number of slots.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.data.len()
    }

    /// Gets a component by entity index, `None` if out of bounds.
    #[inline]
    #[must_use]
    pub fn get(&self, index: usize) -> Option<&C> {
        self.data.get(index)
    }

    /// Gets a mutable component by entity index, `None` if out of bounds.
    #[inline]
    pub fn get_mut(&mut self, index: usize) -> Option<&mut C> {
        self.data.get_mut(index)
    }

    /// Overwrites a slot in place.
    ///
    /// Returns `false` if the index was out of bounds.
    #[inline]
    pub fn set(&mut self, index: usize, component: C) -> bool {
        if let Some(slot) = self.data.get_mut(index) {
            *slot = component;
            true
        } else {
            false
        }
    }

    /// Returns a slice of all components.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[C] {
        &self.data
    }

    /// Returns a mutable slice of all components.
    #[inline]
    pub fn as_mut_slice(&mut self) -> &mut [C] {
        &mut self.data
    }

    /// Resets every slot to the default value.
    pub fn clear(&mut self) {
        for slot in self.data.iter_mut() {
            *slot = C::default();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ecs::component::Position;

    #[test]
    fn test_storage_creation() {
        let storage: ComponentStorage<Position> = ComponentStorage::new(64);
        assert_eq!(storage.capacity(), 64);
        assert!(storage.as_slice().iter().all(|p| *p == Position::default()));
    }

    #[test]
    fn test_storage_get_set() {
        let mut storage: ComponentStorage<Position> = ComponentStorage::new(8);

        let pos = Position::new(1, 2);
        assert!(storage.set(5, pos));
        assert_eq!(storage.get(5), Some(&pos));

        storage.clear();
        assert_eq!(storage.get(5), Some(&Position::default()));
    }

    #[test]
    fn test_storage_bounds() {
        let mut storage: ComponentStorage<Position> = ComponentStorage::new(8);
        assert!(storage.get(8).is_none());
        assert!(storage.get(7).is_some());
        assert!(!storage.set(8, Position::new(1, 1)));
    }

    #[test]
    #[should_panic(expected = "Capacity must be greater than zero")]
    fn test_zero_capacity_panics() {
        let _ = ComponentStorage::<Position>::new(0);
    }
}
