//! # Box Store
//!
//! Persistent box identity on top of a recycling [`Pool`].
//!
//! Every pass rebuilds the parent/child links from the declarative calls,
//! while the boxes themselves (style, geometry, scroll offset) survive as
//! long as their label path keeps being declared.
//!
//! ## Lifecycle
//!
//! ```text
//! begin_box(label) ─▶ key = hash(label, parent key)
//!                     ├─ cached, touched this pass ─▶ KeyCollision
//!                     ├─ cached                     ─▶ reuse, clear links
//!                     └─ unknown                    ─▶ pool slot, reset all
//! sweep()          ─▶ untouched boxes go back to the free list
//! ```

use std::collections::HashMap;
use std::ops::{Index, IndexMut};

use arbor_core::{hash_label, ArenaRef, Pool, PoolHandle, Vec4};

use crate::cascade::StyleRule;
use crate::error::{UiError, UiResult};
use crate::layout::Rect;
use crate::pattern::SiblingPosition;
use crate::signal::Signal;
use crate::style::UiStyle;

bitflags::bitflags! {
    /// Behaviour switches of a box, fixed at declaration.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct BoxFlags: u8 {
        /// Receives signals.
        const REACTIVE      = 1 << 0;
        /// Reachable with Tab navigation.
        const CAN_FOCUS     = 1 << 1;
        /// Not drawn.
        const INVISIBLE     = 1 << 2;
        /// Clips its subtree. Set by the clip manager.
        const CLIPPING      = 1 << 3;
        /// Ignored by the hover hit test.
        const CLICK_THROUGH = 1 << 4;
        /// Renders its label as centred text.
        const DRAW_TEXT     = 1 << 5;
    }
}

/// Stable handle to a box.
///
/// Valid until the box is swept; a swept slot may be handed to a different
/// box later.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BoxId(PoolHandle);

impl BoxId {
    /// Returns the pool slot index.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self.0.index()
    }

    #[inline]
    pub(crate) const fn handle(self) -> PoolHandle {
        self.0
    }
}

/// A persistent node of the box tree.
#[derive(Debug, Clone, Default)]
pub struct UiBox {
    /// Hash of the label seeded with the parent key.
    pub key: u64,
    /// Label as declared this pass.
    pub label: String,
    /// Behaviour flags.
    pub flags: BoxFlags,
    /// Live style; what layout and rendering read.
    pub style: UiStyle,
    /// Style requested this pass; the cascade blends `style` toward it.
    pub next_style: UiStyle,
    /// Rules declared inside this box, valid for the current pass only.
    pub rules: Vec<ArenaRef<StyleRule>>,
    /// Tags matched by `.name` selectors.
    pub tags: Vec<String>,
    /// Signal computed when the box was opened.
    pub signal: Signal,
    /// Generation bit, equal to the store's flag once touched this pass.
    pub gc_flag: bool,
    /// Enclosing box, `None` for the root.
    pub parent: Option<BoxId>,
    /// Position in the parent's child list.
    pub child_index: usize,
    /// Children in declaration order.
    pub children: Vec<BoxId>,
    /// Resolved geometry.
    pub rect: Rect,
    /// Extent of the rendered label, updated by text measurement.
    pub text_rect: Rect,
    /// Scroll offset in `x`/`y`, content extent in `width`/`height`.
    pub content: Rect,
    /// Grid cell coordinates (x, y, w, h) for grid cells.
    pub grid_cell: Option<Vec4>,
}

impl UiBox {
    fn clear_links(&mut self) {
        self.parent = None;
        self.child_index = 0;
        self.tags.clear();
        self.children.clear();
        self.rules.clear();
    }

    fn recycle(&mut self) {
        self.clear_links();
        self.style = UiStyle::DEFAULT;
        self.signal = Signal::default();
        self.rect = Rect::ZERO;
        self.text_rect = Rect::ZERO;
        self.content = Rect::ZERO;
        self.grid_cell = None;
    }

    /// Returns true if the box carries the tag.
    #[must_use]
    pub fn has_tag(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t == tag)
    }
}

/// Identity map, pool and per-pass traversal state.
#[derive(Debug, Default)]
pub struct BoxStore {
    pub(crate) pool: Pool<UiBox>,
    cache: HashMap<u64, BoxId>,
    gc_flag: bool,
    /// A pass was begun and not yet swept.
    open_pass: bool,
    stack: Vec<BoxId>,
    pub(crate) depth_first: Vec<BoxId>,
}

impl BoxStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts a new declaration pass.
    ///
    /// The previous pass's depth-first order is dropped; boxes stay cached
    /// until the next [`sweep`](Self::sweep). If the previous pass was
    /// abandoned before its sweep, every cached box is marked untouched
    /// again so it can be redeclared.
    pub fn begin_pass(&mut self) {
        if self.open_pass {
            let untouched = !self.gc_flag;
            for id in self.cache.values() {
                self.pool[id.0].gc_flag = untouched;
            }
            tracing::debug!("previous pass abandoned, {} boxes reset", self.cache.len());
        }
        self.open_pass = true;
        self.stack.clear();
        self.depth_first.clear();
    }

    /// Opens a box under the current top of stack.
    ///
    /// # Errors
    ///
    /// [`UiError::KeyCollision`] if the key was already declared this pass.
    pub fn begin_box(&mut self, flags: BoxFlags, label: &str) -> UiResult<BoxId> {
        let gc_flag = self.gc_flag;
        let parent = self.stack.last().copied();
        let seed = parent.map_or(0, |p| self[p].key);
        let key = hash_label(label, seed);

        let id = if let Some(&id) = self.cache.get(&key) {
            let node = &mut self[id];
            if node.gc_flag == gc_flag {
                tracing::error!("box label hash collision: [{}] vs [{}]", node.label, label);
                return Err(UiError::KeyCollision {
                    label: label.to_owned(),
                    existing: node.label.clone(),
                });
            }
            node.clear_links();
            id
        } else {
            let (handle, _) = self.pool.acquire();
            let id = BoxId(handle);
            let node = &mut self[id];
            node.recycle();
            node.key = key;
            self.cache.insert(key, id);
            id
        };

        let child_index = match parent {
            Some(p) => {
                let siblings = &mut self[p].children;
                siblings.push(id);
                siblings.len() - 1
            }
            None => 0,
        };

        let node = &mut self[id];
        node.next_style = UiStyle::DEFAULT;
        node.label.clear();
        node.label.push_str(label);
        node.gc_flag = gc_flag;
        node.flags = flags;
        node.parent = parent;
        node.child_index = child_index;

        self.depth_first.push(id);
        self.stack.push(id);
        Ok(id)
    }

    /// Closes the innermost open box.
    ///
    /// # Errors
    ///
    /// [`UiError::UnbalancedEnd`] if nothing is open.
    pub fn end_box(&mut self) -> UiResult<BoxId> {
        self.stack.pop().ok_or_else(|| {
            tracing::error!("end_box called with no open box");
            UiError::UnbalancedEnd
        })
    }

    /// Re-enters an already declared box so new children attach to it.
    pub fn push_parent(&mut self, id: BoxId) {
        self.stack.push(id);
    }

    /// Leaves a box entered with [`push_parent`](Self::push_parent).
    ///
    /// # Errors
    ///
    /// [`UiError::UnbalancedEnd`] if nothing is open.
    pub fn pop_parent(&mut self) -> UiResult<BoxId> {
        self.end_box()
    }

    /// Evicts every cached box not declared this pass, then flips the
    /// generation bit.
    ///
    /// Returns the evicted handles in slot order. They are back on the free
    /// list when this returns.
    pub fn sweep(&mut self) -> Vec<BoxId> {
        let flag = self.gc_flag;
        let pool = &self.pool;
        let mut evicted = Vec::new();

        self.cache.retain(|_, id| {
            let touched = pool[id.0].gc_flag == flag;
            if !touched {
                evicted.push(*id);
            }
            touched
        });

        evicted.sort_unstable();
        for id in &evicted {
            self.pool.release(id.0);
        }
        self.gc_flag = !flag;
        self.open_pass = false;

        tracing::debug!(
            "sweep: {} live, {} evicted, {} free",
            self.cache.len(),
            evicted.len(),
            self.pool.free_list().len()
        );
        evicted
    }

    /// Returns true if `ancestor` is `node` or one of its ancestors.
    #[must_use]
    pub fn is_ancestor_or_self(&self, ancestor: BoxId, node: BoxId) -> bool {
        let mut cursor = Some(node);
        // Bounded walk; parent links of swept boxes may be stale.
        for _ in 0..=self.pool.capacity() {
            match cursor {
                Some(id) if id == ancestor => return true,
                Some(id) => cursor = self[id].parent,
                None => return false,
            }
        }
        false
    }

    /// Position of `id` among its siblings, `None` for a root.
    #[must_use]
    pub fn sibling_position(&self, id: BoxId) -> Option<SiblingPosition> {
        let node = &self[id];
        node.parent.map(|p| SiblingPosition {
            index: node.child_index,
            count: self[p].children.len(),
        })
    }

    /// Boxes declared this pass, in declaration (pre-order) order.
    #[must_use]
    pub fn depth_first(&self) -> &[BoxId] {
        &self.depth_first
    }

    /// First box declared this pass.
    #[must_use]
    pub fn root(&self) -> Option<BoxId> {
        self.depth_first.first().copied()
    }

    /// Innermost open box.
    #[must_use]
    pub fn top(&self) -> Option<BoxId> {
        self.stack.last().copied()
    }

    /// Number of open boxes.
    #[must_use]
    pub fn open_count(&self) -> usize {
        self.stack.len()
    }

    /// Looks up the box with the given key.
    #[must_use]
    pub fn lookup(&self, key: u64) -> Option<BoxId> {
        self.cache.get(&key).copied()
    }

    /// Number of cached boxes.
    #[must_use]
    pub fn live_count(&self) -> usize {
        self.cache.len()
    }

    /// Returns true if the slot of `id` is on the free list.
    #[must_use]
    pub fn is_free(&self, id: BoxId) -> bool {
        self.pool.free_list().contains(&id.0)
    }
}

impl Index<BoxId> for BoxStore {
    type Output = UiBox;

    #[inline]
    fn index(&self, id: BoxId) -> &UiBox {
        &self.pool[id.0]
    }
}

impl IndexMut<BoxId> for BoxStore {
    #[inline]
    fn index_mut(&mut self, id: BoxId) -> &mut UiBox {
        &mut self.pool[id.0]
    }
}
