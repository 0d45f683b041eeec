//! Scroll offset arithmetic.
//!
//! A scroll container stores its offset in `content.x`/`content.y`. Offsets
//! are zero or negative: `-(content - view)` shows the far end. Scroll bars
//! work in knob space instead, where `0` is the near end and the knob can
//! travel `(1 - ratio) * track`.

use arbor_core::Vec2;

use crate::layout::Rect;
use crate::style::Axis;

/// Fraction of the content that is visible, in `0..=1`.
#[must_use]
pub fn scrollbar_ratio(view: f32, content: f32) -> f32 {
    if content <= 0.0 {
        1.0
    } else {
        (view / content).clamp(0.0, 1.0)
    }
}

/// Clamps a content offset to `[-(content - view), 0]`.
///
/// Content that fits in the view always sits at offset zero.
#[must_use]
pub fn clamp_offset(offset: f32, content: f32, view: f32) -> f32 {
    if content <= view {
        0.0
    } else {
        offset.clamp(-(content - view), 0.0)
    }
}

/// Clamps a knob position to its travel on a track of length `track`.
#[must_use]
pub fn clamp_knob(knob: f32, ratio: f32, track: f32) -> f32 {
    knob.clamp(0.0, ((1.0 - ratio) * track).max(0.0))
}

/// Converts a content offset to a knob position.
#[must_use]
pub fn offset_to_knob(offset: f32, content: f32, view: f32) -> f32 {
    if content <= 0.0 {
        0.0
    } else {
        offset.abs() / content * view
    }
}

/// Converts a knob position back to a content offset.
#[must_use]
pub fn knob_to_offset(knob: f32, content: f32, view: f32) -> f32 {
    if view <= 0.0 {
        0.0
    } else {
        -(knob / view * content)
    }
}

/// Nudges `offset` so the focused rect is brought inside the container.
///
/// The far edge is checked first: a focused box wider than the container
/// ends up with its far edge aligned.
#[must_use]
pub fn follow_focus(container: Rect, focused: Rect, offset: Vec2) -> Vec2 {
    let mut out = offset;
    for axis in Axis::ALL {
        let far_f = focused.pos(axis) + focused.size(axis);
        let far_c = container.pos(axis) + container.size(axis);
        let slot = out.get_mut(axis.index());

        if far_f > far_c {
            *slot -= far_f - far_c;
        } else if focused.pos(axis) < container.pos(axis) {
            *slot += container.pos(axis) - focused.pos(axis);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_and_clamp() {
        let ratio = scrollbar_ratio(200.0, 500.0);
        assert!((ratio - 0.4).abs() < 1e-6);

        assert_eq!(clamp_offset(-1000.0, 500.0, 200.0), -300.0);
        assert_eq!(clamp_offset(50.0, 500.0, 200.0), 0.0);
        assert_eq!(clamp_offset(-20.0, 100.0, 200.0), 0.0);
    }

    #[test]
    fn test_knob_round_trip_at_the_far_end() {
        let (content, view) = (500.0, 200.0);
        let ratio = scrollbar_ratio(view, content);

        let knob = clamp_knob(10_000.0, ratio, view);
        assert!((knob - 120.0).abs() < 1e-4);

        let offset = knob_to_offset(knob, content, view);
        assert!((offset + 300.0).abs() < 1e-3);
        assert!((offset_to_knob(offset, content, view) - knob).abs() < 1e-3);
    }

    #[test]
    fn test_follow_focus_both_directions() {
        let container = Rect::new(0.0, 0.0, 100.0, 100.0);

        let below = Rect::new(10.0, 120.0, 20.0, 20.0);
        assert_eq!(follow_focus(container, below, Vec2::ZERO), Vec2::new(0.0, -40.0));

        let above = Rect::new(10.0, -30.0, 20.0, 20.0);
        assert_eq!(follow_focus(container, above, Vec2::new(0.0, -50.0)), Vec2::new(0.0, -20.0));

        let inside = Rect::new(10.0, 10.0, 20.0, 20.0);
        assert_eq!(follow_focus(container, inside, Vec2::new(-5.0, -5.0)), Vec2::new(-5.0, -5.0));
    }
}
