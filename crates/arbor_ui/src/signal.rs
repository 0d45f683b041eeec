//! # Signal Router
//!
//! Interaction singletons (hovered, active, focused) and the per-box
//! signal protocol built on top of them.
//!
//! ```text
//!            press on hovered box
//!   idle ───────────────────────────▶ active = box, pressed
//!    ▲                                   │ every later event: pressed,
//!    │   release: clicked iff hovered    │ hovered re-tested live
//!    └───────────────────────────────────┘
//! ```

use arbor_core::Vec2;

use crate::input::{Event, Key, PRIMARY};
use crate::layout::Rect;
use crate::tree::{BoxFlags, BoxId, BoxStore};

/// Derived interaction state of a reactive box for the current event.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Signal {
    /// The pointer is over the box (and inside the clip).
    pub hovered: bool,
    /// The box holds the primary button.
    pub pressed: bool,
    /// Released over the box, or activated from the keyboard.
    pub clicked: bool,
    /// The box has keyboard focus.
    pub focused: bool,
}

/// Interaction singletons.
#[derive(Debug, Clone, Default)]
pub struct Interaction {
    /// Topmost box under the pointer, from the last hit test.
    pub hovered: Option<BoxId>,
    /// Box holding the primary button.
    pub active: Option<BoxId>,
    /// Box with keyboard focus.
    pub focused: Option<BoxId>,
    /// Position of the focused box in the depth-first order.
    pub focus_idx: usize,
}

impl Interaction {
    /// Drops every singleton that references `id`.
    pub fn forget(&mut self, id: BoxId) {
        if self.active == Some(id) {
            self.active = None;
        }
        if self.hovered == Some(id) {
            self.hovered = None;
        }
        if self.focused == Some(id) {
            self.focused = None;
        }
    }

    /// Computes the signal of `id` for `event`, updating `active`.
    ///
    /// `clip` is the clip rect in effect where the box is declared.
    pub fn signal_for(
        &mut self,
        id: BoxId,
        store: &BoxStore,
        event: &Event,
        mouse: Vec2,
        clip: Rect,
    ) -> Signal {
        let node = &store[id];
        let mut sig = Signal::default();

        if !node.flags.contains(BoxFlags::REACTIVE) {
            return sig;
        }

        sig.focused = self.focused == Some(id);
        sig.clicked = sig.focused && event.is_key_press(Key::Enter);

        let hovered = self.hovered.is_some_and(|h| store.is_ancestor_or_self(id, h))
            && node.rect.intersect(&clip).contains_strict(mouse);

        match self.active {
            None => {
                sig.hovered = hovered;
                if self.hovered == Some(id) && event.is_press(PRIMARY) {
                    self.active = Some(id);
                    sig.pressed = true;
                }
            }
            Some(active) if active == id => {
                sig.hovered = hovered;
                if event.is_release(PRIMARY) {
                    self.active = None;
                    sig.clicked |= hovered;
                } else {
                    sig.pressed = true;
                }
            }
            Some(_) => {}
        }

        sig
    }

    /// Moves focus to the next focusable box, wrapping at the end.
    ///
    /// Returns the newly focused box; with nothing focusable, focus is left
    /// untouched and `None` is returned.
    pub fn focus_next(&mut self, store: &BoxStore) -> Option<BoxId> {
        self.step_focus(store, true)
    }

    /// Moves focus to the previous focusable box, wrapping at the start.
    pub fn focus_prev(&mut self, store: &BoxStore) -> Option<BoxId> {
        self.step_focus(store, false)
    }

    fn step_focus(&mut self, store: &BoxStore, forward: bool) -> Option<BoxId> {
        let order = store.depth_first();
        let len = order.len();
        if len == 0 {
            return None;
        }

        let start = self
            .focused
            .and_then(|f| order.iter().position(|&b| b == f))
            .unwrap_or(self.focus_idx.min(len - 1));

        for step in 1..=len {
            let idx = if forward {
                (start + step) % len
            } else {
                (start + len - step) % len
            };
            let candidate = order[idx];
            if store[candidate].flags.contains(BoxFlags::CAN_FOCUS) {
                self.focus_idx = idx;
                self.focused = Some(candidate);
                tracing::debug!("focus moved to [{}] at {}", store[candidate].label, idx);
                return Some(candidate);
            }
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::MouseButton;

    fn store_with(flags: &[BoxFlags]) -> (BoxStore, Vec<BoxId>) {
        let mut store = BoxStore::new();
        store.begin_pass();
        let root = store.begin_box(BoxFlags::empty(), "root").unwrap();
        let mut ids = vec![root];
        for (i, f) in flags.iter().enumerate() {
            ids.push(store.begin_box(*f, &format!("b{i}")).unwrap());
            store.end_box().unwrap();
        }
        store.end_box().unwrap();
        (store, ids)
    }

    #[test]
    fn test_focus_wraps_both_ways() {
        let f = BoxFlags::CAN_FOCUS;
        let (store, ids) = store_with(&[f, BoxFlags::empty(), f]);
        let mut it = Interaction::default();

        assert_eq!(it.focus_next(&store), Some(ids[1]));
        assert_eq!(it.focus_next(&store), Some(ids[3]));
        assert_eq!(it.focus_next(&store), Some(ids[1]));
        assert_eq!(it.focus_prev(&store), Some(ids[3]));
    }

    #[test]
    fn test_focus_with_nothing_focusable() {
        let (store, _) = store_with(&[BoxFlags::empty(), BoxFlags::REACTIVE]);
        let mut it = Interaction::default();

        for _ in 0..3 {
            assert_eq!(it.focus_next(&store), None);
        }
        assert_eq!(it.focused, None);
    }

    #[test]
    fn test_press_then_release_clicks() {
        let (mut store, ids) = store_with(&[BoxFlags::REACTIVE]);
        let b = ids[1];
        store[b].rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let clip = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mouse = Vec2::new(50.0, 50.0);

        let mut it = Interaction { hovered: Some(b), ..Interaction::default() };

        let press = Event::mouse_press(MouseButton::Left);
        let sig = it.signal_for(b, &store, &press, mouse, clip);
        assert!(sig.pressed && sig.hovered);
        assert_eq!(it.active, Some(b));

        let sig = it.signal_for(b, &store, &Event::Dummy, mouse, clip);
        assert!(sig.pressed);

        let release = Event::mouse_release(MouseButton::Left);
        let sig = it.signal_for(b, &store, &release, mouse, clip);
        assert!(sig.clicked && !sig.pressed);
        assert_eq!(it.active, None);
    }

    #[test]
    fn test_release_outside_does_not_click() {
        let (mut store, ids) = store_with(&[BoxFlags::REACTIVE]);
        let b = ids[1];
        store[b].rect = Rect::new(0.0, 0.0, 100.0, 100.0);
        let clip = Rect::new(0.0, 0.0, 800.0, 600.0);
        let mut it = Interaction { active: Some(b), ..Interaction::default() };

        let release = Event::mouse_release(MouseButton::Left);
        let sig = it.signal_for(b, &store, &release, Vec2::new(300.0, 300.0), clip);
        assert!(!sig.clicked);
        assert_eq!(it.active, None);
    }

    #[test]
    fn test_enter_clicks_focused_box() {
        let (store, ids) = store_with(&[BoxFlags::REACTIVE | BoxFlags::CAN_FOCUS]);
        let mut it = Interaction { focused: Some(ids[1]), ..Interaction::default() };

        let sig = it.signal_for(ids[1], &store, &Event::key_press(Key::Enter), Vec2::ZERO, Rect::ZERO);
        assert!(sig.focused && sig.clicked);
    }

    #[test]
    fn test_non_reactive_box_has_no_signal() {
        let (store, ids) = store_with(&[BoxFlags::CAN_FOCUS]);
        let mut it = Interaction { focused: Some(ids[1]), ..Interaction::default() };
        let sig = it.signal_for(ids[1], &store, &Event::Dummy, Vec2::ZERO, Rect::ZERO);
        assert_eq!(sig, Signal::default());
    }
}
