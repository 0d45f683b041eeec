//! # Memory Management
//!
//! Recycling pools and frame arenas for the retained box tree.
//!
//! ## Design Philosophy
//!
//! Boxes survive across frames and are recycled, not freed. Data that lives
//! for exactly one pass (style rules, derived rules) goes into an arena that
//! is reset wholesale.

mod arena;
mod pool;

pub use arena::{ArenaRef, FrameArena};
pub use pool::{Pool, PoolHandle};
