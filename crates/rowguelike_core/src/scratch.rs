//! # Scratch Block
//!
//! Game state that outlives any single entity: scores, counters, a handle
//! to a larger structure that drives collision decisions.
//!
//! The block is **not** cleared by [`crate::Engine::reset`]. Games that
//! restart must re-populate it themselves.

use std::any::Any;
use std::fmt;
use std::rc::Rc;

use bytemuck::{Pod, Zeroable};

/// One 32-bit scratch slot with several integer views.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Pod, Zeroable)]
#[repr(transparent)]
pub struct ScratchValue([u8; 4]);

impl ScratchValue {
    /// All-zero value.
    pub const ZERO: Self = Self([0; 4]);

    /// From four unsigned bytes.
    #[inline]
    #[must_use]
    pub const fn from_u8s(bytes: [u8; 4]) -> Self {
        Self(bytes)
    }

    /// From four signed bytes.
    #[inline]
    #[must_use]
    pub fn from_i8s(values: [i8; 4]) -> Self {
        bytemuck::cast(values)
    }

    /// From two unsigned halves.
    #[inline]
    #[must_use]
    pub fn from_u16s(values: [u16; 2]) -> Self {
        bytemuck::cast(values)
    }

    /// From two signed halves.
    #[inline]
    #[must_use]
    pub fn from_i16s(values: [i16; 2]) -> Self {
        bytemuck::cast(values)
    }

    /// From one signed word.
    #[inline]
    #[must_use]
    pub fn from_i32(value: i32) -> Self {
        bytemuck::cast(value)
    }

    /// As four unsigned bytes.
    #[inline]
    #[must_use]
    pub const fn as_u8s(self) -> [u8; 4] {
        self.0
    }

    /// As four signed bytes.
    #[inline]
    #[must_use]
    pub fn as_i8s(self) -> [i8; 4] {
        bytemuck::cast(self.0)
    }

    /// As two unsigned halves.
    #[inline]
    #[must_use]
    pub fn as_u16s(self) -> [u16; 2] {
        bytemuck::cast(self.0)
    }

    /// As two signed halves.
    #[inline]
    #[must_use]
    pub fn as_i16s(self) -> [i16; 2] {
        bytemuck::cast(self.0)
    }

    /// As one signed word.
    #[inline]
    #[must_use]
    pub fn as_i32(self) -> i32 {
        bytemuck::cast(self.0)
    }
}

/// Fixed-size bag of numbers, strings and opaque external references.
///
/// Out-of-range reads return defaults; out-of-range writes are dropped.
pub struct ScratchBlock {
    numbers: Box<[ScratchValue]>,
    strings: Box<[Option<Rc<str>>]>,
    refs: Box<[Option<Rc<dyn Any>>]>,
}

impl ScratchBlock {
    /// Creates a zeroed block.
    #[must_use]
    pub fn new(numbers: usize, strings: usize, refs: usize) -> Self {
        Self {
            numbers: vec![ScratchValue::ZERO; numbers].into_boxed_slice(),
            strings: (0..strings).map(|_| None).collect(),
            refs: (0..refs).map(|_| None).collect(),
        }
    }

    /// Number slot, zero if out of range.
    #[inline]
    #[must_use]
    pub fn number(&self, index: usize) -> ScratchValue {
        self.numbers.get(index).copied().unwrap_or_default()
    }

    /// Stores a number slot.
    #[inline]
    pub fn set_number(&mut self, index: usize, value: ScratchValue) {
        if let Some(slot) = self.numbers.get_mut(index) {
            *slot = value;
        }
    }

    /// String slot, `None` if unset or out of range.
    #[inline]
    #[must_use]
    pub fn string(&self, index: usize) -> Option<&str> {
        self.strings.get(index)?.as_deref()
    }

    /// Shared handle to a string slot, ready to hand to a [`crate::TextRow`].
    #[must_use]
    pub fn shared_string(&self, index: usize) -> Option<Rc<str>> {
        self.strings.get(index)?.clone()
    }

    /// Stores a string slot. Accepts `&str`, `String` or `Rc<str>`.
    #[inline]
    pub fn set_string(&mut self, index: usize, value: Option<impl Into<Rc<str>>>) {
        let value: Option<Rc<str>> = value.map(Into::into);
        if let Some(slot) = self.strings.get_mut(index) {
            *slot = value;
        }
    }

    /// Stores an external reference.
    pub fn set_external(&mut self, index: usize, value: Option<Rc<dyn Any>>) {
        if let Some(slot) = self.refs.get_mut(index) {
            *slot = value;
        }
    }

    /// Returns the external reference in `index` if it holds a `T`.
    #[must_use]
    pub fn external<T: Any>(&self, index: usize) -> Option<Rc<T>> {
        let value = self.refs.get(index)?.as_ref()?;
        Rc::clone(value).downcast::<T>().ok()
    }

    /// Zeroes every slot.
    pub fn clear(&mut self) {
        self.numbers.fill(ScratchValue::ZERO);
        self.strings.iter_mut().for_each(|slot| *slot = None);
        self.refs.iter_mut().for_each(|slot| *slot = None);
    }
}

impl fmt::Debug for ScratchBlock {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ScratchBlock")
            .field("numbers", &self.numbers)
            .field("strings", &self.strings)
            .field("refs", &self.refs.iter().filter(|r| r.is_some()).count())
            .finish()
    }
}
