//! Clip rectangle stack.
//!
//! The bottom entry is the window and is never popped. Every push is
//! intersected with the current top, so the top is always the visible and
//! hit-testable region.

use crate::error::{UiError, UiResult};
use crate::layout::Rect;
use crate::tree::{BoxFlags, BoxId, BoxStore};

/// Stack of nested clip rectangles.
#[derive(Debug, Clone)]
pub struct ClipStack {
    stack: Vec<Rect>,
}

impl ClipStack {
    /// Creates a stack holding only the root clip.
    #[must_use]
    pub fn new(root: Rect) -> Self {
        let mut stack = Vec::with_capacity(16);
        stack.push(root);
        Self { stack }
    }

    /// Replaces the root clip and drops everything above it.
    pub fn set_root(&mut self, root: Rect) {
        self.stack.clear();
        self.stack.push(root);
    }

    /// Current clip.
    #[must_use]
    pub fn top(&self) -> Rect {
        self.stack.last().copied().unwrap_or(Rect::ZERO)
    }

    /// Number of entries, root included.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.stack.len()
    }

    /// Narrows the clip to `rect`.
    pub fn push_rect(&mut self, rect: Rect) -> Rect {
        let clip = rect.intersect(&self.top());
        self.stack.push(clip);
        clip
    }

    /// Narrows the clip to a box's rect inset by its borders and marks the
    /// box as clipping.
    pub fn push_box(&mut self, store: &mut BoxStore, id: BoxId) -> Rect {
        let node = &mut store[id];
        node.flags |= BoxFlags::CLIPPING;
        let inner = node.rect.inset(node.style.border_widths);
        self.push_rect(inner)
    }

    /// Restores the previous clip.
    ///
    /// # Errors
    ///
    /// [`UiError::UnbalancedClip`] when only the root clip is left.
    pub fn pop(&mut self) -> UiResult<Rect> {
        if self.stack.len() <= 1 {
            tracing::error!("clip stack underflow");
            return Err(UiError::UnbalancedClip);
        }
        self.stack.pop().ok_or(UiError::UnbalancedClip)
    }
}

impl Default for ClipStack {
    fn default() -> Self {
        Self::new(Rect::ZERO)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use arbor_core::Vec4;

    #[test]
    fn test_push_intersects_with_top() {
        let mut clip = ClipStack::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        clip.push_rect(Rect::new(700.0, 500.0, 300.0, 300.0));
        assert_eq!(clip.top(), Rect::new(700.0, 500.0, 100.0, 100.0));

        clip.push_rect(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(clip.top().width, 0.0);

        clip.pop().unwrap();
        clip.pop().unwrap();
        assert_eq!(clip.top(), Rect::new(0.0, 0.0, 800.0, 600.0));
    }

    #[test]
    fn test_root_cannot_be_popped() {
        let mut clip = ClipStack::new(Rect::new(0.0, 0.0, 10.0, 10.0));
        assert_eq!(clip.pop(), Err(UiError::UnbalancedClip));
        assert_eq!(clip.depth(), 1);
    }

    #[test]
    fn test_box_clip_is_inset_by_borders() {
        let mut store = BoxStore::new();
        store.begin_pass();
        let id = store.begin_box(BoxFlags::empty(), "panel").unwrap();
        store[id].rect = Rect::new(10.0, 10.0, 100.0, 100.0);
        store[id].style.border_widths = Vec4::new(1.0, 2.0, 3.0, 4.0);

        let mut clip = ClipStack::new(Rect::new(0.0, 0.0, 800.0, 600.0));
        let top = clip.push_box(&mut store, id);

        assert_eq!(top, Rect::new(11.0, 12.0, 96.0, 94.0));
        assert!(store[id].flags.contains(BoxFlags::CLIPPING));
    }
}
