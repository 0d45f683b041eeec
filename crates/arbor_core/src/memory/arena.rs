//! # Frame Arena
//!
//! Typed storage for transient values that all die at the same moment.

use std::marker::PhantomData;

/// A frame-scoped arena.
///
/// Allocation is a push; handles are plain indices. Everything is dropped at
/// once by [`FrameArena::reset`], which keeps the backing capacity so a
/// steady-state frame performs no heap allocation.
///
/// Handles from before a reset are stale. They are not detected as such if
/// the arena has since grown past their index, so owners must drop every
/// handle when they reset the arena.
///
/// # Thread Safety
///
/// This arena is NOT thread-safe. Use one arena per frame driver.
///
/// # Example
///
/// ```rust
/// use arbor_core::FrameArena;
///
/// let mut arena = FrameArena::new();
/// let a = arena.alloc(String::from("rule"));
/// assert_eq!(arena.get(a).map(String::as_str), Some("rule"));
///
/// arena.reset();
/// assert!(arena.is_empty());
/// ```
#[derive(Debug)]
pub struct FrameArena<T> {
    /// Values allocated this frame.
    items: Vec<T>,
    /// Largest number of values ever live at once.
    high_water: usize,
}

/// Handle to a value in a [`FrameArena`].
#[derive(Debug)]
pub struct ArenaRef<T> {
    index: u32,
    _marker: PhantomData<fn() -> T>,
}

impl<T> ArenaRef<T> {
    /// Returns the raw index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

// Manual impls: derives would require `T: Clone` etc.
impl<T> Clone for ArenaRef<T> {
    fn clone(&self) -> Self {
        *self
    }
}

impl<T> Copy for ArenaRef<T> {}

impl<T> PartialEq for ArenaRef<T> {
    fn eq(&self, other: &Self) -> bool {
        self.index == other.index
    }
}

impl<T> Eq for ArenaRef<T> {}

impl<T> FrameArena<T> {
    /// Creates an empty arena.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            items: Vec::new(),
            high_water: 0,
        }
    }

    /// Creates an arena with pre-reserved room for `capacity` values.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            items: Vec::with_capacity(capacity),
            high_water: 0,
        }
    }

    /// Stores a value for the rest of the frame.
    pub fn alloc(&mut self, value: T) -> ArenaRef<T> {
        let index = u32::try_from(self.items.len()).unwrap_or(u32::MAX);
        self.items.push(value);
        self.high_water = self.high_water.max(self.items.len());
        ArenaRef {
            index,
            _marker: PhantomData,
        }
    }

    /// Gets a value allocated this frame.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: ArenaRef<T>) -> Option<&T> {
        self.items.get(handle.index())
    }

    /// Gets mutable access to a value allocated this frame.
    #[inline]
    pub fn get_mut(&mut self, handle: ArenaRef<T>) -> Option<&mut T> {
        self.items.get_mut(handle.index())
    }

    /// Returns the number of values allocated this frame.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Returns true if nothing has been allocated since the last reset.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Returns the largest number of values ever live at once.
    #[inline]
    #[must_use]
    pub const fn high_water(&self) -> usize {
        self.high_water
    }

    /// Drops every value, keeping the backing capacity.
    #[inline]
    pub fn reset(&mut self) {
        self.items.clear();
    }
}

impl<T> Default for FrameArena<T> {
    fn default() -> Self {
        Self::new()
    }
}
