//! # Slot Pool
//!
//! Growable slot allocator for objects that live across many frames and are
//! recycled instead of freed.

use std::ops::{Index, IndexMut};

/// A pool of recyclable slots with a LIFO free list.
///
/// Released slots keep their value (and whatever heap capacity it owns) and
/// are handed out again by [`Pool::acquire`] before the pool grows. Nothing
/// is ever deallocated individually; memory is returned only when the pool
/// itself is dropped.
///
/// # Thread Safety
///
/// This pool is NOT thread-safe. It is owned by exactly one frame driver.
///
/// # Example
///
/// ```rust
/// use arbor_core::Pool;
///
/// let mut pool: Pool<Vec<u32>> = Pool::new();
/// let (a, recycled) = pool.acquire();
/// assert!(!recycled);
/// pool.release(a);
///
/// // The released slot comes back first, allocation intact.
/// let (b, recycled) = pool.acquire();
/// assert!(recycled);
/// assert_eq!(a, b);
/// ```
#[derive(Debug)]
pub struct Pool<T> {
    /// The storage array. Released slots stay populated.
    storage: Vec<T>,
    /// Liveness per slot.
    live: Vec<bool>,
    /// Free list - indices of released slots.
    free_list: Vec<PoolHandle>,
}

/// Handle to a slot in a [`Pool`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PoolHandle {
    /// Index into the pool.
    index: u32,
}

impl PoolHandle {
    /// Returns the raw slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.index as usize
    }
}

impl<T: Default> Pool<T> {
    /// Creates an empty pool.
    #[must_use]
    pub fn new() -> Self {
        Self::with_capacity(0)
    }

    /// Creates an empty pool with room for `capacity` slots before growing.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            storage: Vec::with_capacity(capacity),
            live: Vec::with_capacity(capacity),
            free_list: Vec::new(),
        }
    }

    /// Takes a slot, preferring the most recently released one.
    ///
    /// Returns the handle and whether the slot was recycled. A recycled slot
    /// still holds the value it had when it was released; the caller decides
    /// what to reset.
    pub fn acquire(&mut self) -> (PoolHandle, bool) {
        if let Some(handle) = self.free_list.pop() {
            self.live[handle.index()] = true;
            return (handle, true);
        }

        let index = u32::try_from(self.storage.len()).unwrap_or(u32::MAX);
        self.storage.push(T::default());
        self.live.push(true);
        (PoolHandle { index }, false)
    }
}

impl<T> Pool<T> {
    /// Returns the number of slots ever allocated.
    #[inline]
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.storage.len()
    }

    /// Returns the number of live slots.
    #[inline]
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.storage.len() - self.free_list.len()
    }

    /// Returns the released slots, most recently released last.
    #[inline]
    #[must_use]
    pub fn free_list(&self) -> &[PoolHandle] {
        &self.free_list
    }

    /// Returns true if the handle refers to a live slot.
    #[inline]
    #[must_use]
    pub fn is_live(&self, handle: PoolHandle) -> bool {
        self.live.get(handle.index()).copied().unwrap_or(false)
    }

    /// Puts a live slot on the free list.
    ///
    /// Returns false if the handle was not live (double release or foreign
    /// handle); the pool is left untouched in that case.
    pub fn release(&mut self, handle: PoolHandle) -> bool {
        match self.live.get_mut(handle.index()) {
            Some(live) if *live => {
                *live = false;
                self.free_list.push(handle);
                true
            }
            _ => false,
        }
    }

    /// Gets a reference to a live slot.
    #[inline]
    #[must_use]
    pub fn get(&self, handle: PoolHandle) -> Option<&T> {
        if self.is_live(handle) {
            self.storage.get(handle.index())
        } else {
            None
        }
    }

    /// Gets a mutable reference to a live slot.
    #[inline]
    pub fn get_mut(&mut self, handle: PoolHandle) -> Option<&mut T> {
        if self.is_live(handle) {
            self.storage.get_mut(handle.index())
        } else {
            None
        }
    }

    /// Iterates over all live slots.
    pub fn iter(&self) -> impl Iterator<Item = (PoolHandle, &T)> {
        self.storage
            .iter()
            .zip(&self.live)
            .enumerate()
            .filter(|(_, (_, live))| **live)
            .map(|(index, (value, _))| {
                #[allow(clippy::cast_possible_truncation)]
                let handle = PoolHandle { index: index as u32 };
                (handle, value)
            })
    }
}

// Indexing addresses the slot whether or not it is live; handles are only
// ever minted by this pool, so the index is always in bounds.
impl<T> Index<PoolHandle> for Pool<T> {
    type Output = T;

    #[inline]
    fn index(&self, handle: PoolHandle) -> &T {
        &self.storage[handle.index()]
    }
}

impl<T> IndexMut<PoolHandle> for Pool<T> {
    #[inline]
    fn index_mut(&mut self, handle: PoolHandle) -> &mut T {
        &mut self.storage[handle.index()]
    }
}

impl<T: Default> Default for Pool<T> {
    fn default() -> Self {
        Self::new()
    }
}
