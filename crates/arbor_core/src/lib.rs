//! # ARBOR Core
//!
//! Storage and identity primitives for the ARBOR retained box tree:
//! - Recycling slot pool for boxes that outlive a frame
//! - Frame arena for data that lives exactly one pass
//! - Keyed label hashing for stable box identity
//!
//! ## Architecture Rules
//!
//! 1. **No per-frame frees** - Boxes are recycled through a free list
//! 2. **Deterministic identity** - The same label path always yields the same key
//! 3. **Single owner** - Nothing here is shared across threads
//!
//! ## Example
//!
//! ```rust
//! use arbor_core::{hash_label, Pool};
//!
//! let mut boxes: Pool<u64> = Pool::new();
//! let (slot, _) = boxes.acquire();
//! if let Some(key) = boxes.get_mut(slot) {
//!     *key = hash_label("root", 0);
//! }
//! ```

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod hash;
pub mod math;
pub mod memory;

pub use hash::hash_label;
pub use math::{Vec2, Vec4};
pub use memory::{ArenaRef, FrameArena, Pool, PoolHandle};
