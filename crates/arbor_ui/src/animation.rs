//! Exponential smoothing of live style toward its target.
//!
//! Each step closes the fraction `1 - EPSILON^(dt/duration)` of the gap, so
//! after `duration` seconds the value is within 0.1% of the target no matter
//! how the time was split into steps. Gaps at or below `EPSILON` snap.

use arbor_core::{Vec2, Vec4};

use crate::style::{Color, Size, StyleMask, UiStyle};

/// Residual fraction after one full duration, and the snap threshold.
pub const EPSILON: f32 = 0.001;

/// Moves `current` toward `target` by one step of `dt` seconds.
///
/// A non-positive `duration` snaps immediately.
#[inline]
#[must_use]
pub fn approach(current: f32, target: f32, dt: f32, duration: f32) -> f32 {
    if (current - target).abs() <= EPSILON || duration <= 0.0 {
        target
    } else {
        current + (target - current) * (1.0 - EPSILON.powf(dt / duration))
    }
}

/// A value that can be smoothed toward a target.
pub trait Animate: Copy {
    /// Advances `self` one step toward `target`.
    fn animate(&mut self, target: Self, dt: f32, duration: f32);
}

impl Animate for f32 {
    fn animate(&mut self, target: Self, dt: f32, duration: f32) {
        *self = approach(*self, target, dt, duration);
    }
}

impl Animate for Vec2 {
    fn animate(&mut self, target: Self, dt: f32, duration: f32) {
        self.x.animate(target.x, dt, duration);
        self.y.animate(target.y, dt, duration);
    }
}

impl Animate for Vec4 {
    fn animate(&mut self, target: Self, dt: f32, duration: f32) {
        self.x.animate(target.x, dt, duration);
        self.y.animate(target.y, dt, duration);
        self.z.animate(target.z, dt, duration);
        self.w.animate(target.w, dt, duration);
    }
}

impl Animate for Color {
    fn animate(&mut self, target: Self, dt: f32, duration: f32) {
        self.r.animate(target.r, dt, duration);
        self.g.animate(target.g, dt, duration);
        self.b.animate(target.b, dt, duration);
        self.a.animate(target.a, dt, duration);
    }
}

// Only the value moves; kind and strictness switch at once.
impl Animate for Size {
    fn animate(&mut self, target: Self, dt: f32, duration: f32) {
        self.kind = target.kind;
        self.strictness = target.strictness;
        self.value.animate(target.value, dt, duration);
    }
}

/// Smooths masked attributes, copies the rest.
fn blend<T: Animate>(current: &mut T, target: T, animate: bool, dt: f32, duration: f32) {
    if animate {
        current.animate(target, dt, duration);
    } else {
        *current = target;
    }
}

/// Blends a box's live style toward its resolved target for one step.
///
/// The mask and duration are read from `target`. Kinds, axis, alignment,
/// floating offsets, overflow and edge softness are always copied.
pub fn animate_style(current: &mut UiStyle, target: &UiStyle, dt: f32) {
    let mask = target.animation_mask;
    let d = target.animation_time;
    let on = |bit: StyleMask| mask.contains(bit);

    blend(&mut current.size[0], target.size[0], on(StyleMask::WIDTH), dt, d);
    blend(&mut current.size[1], target.size[1], on(StyleMask::HEIGHT), dt, d);
    blend(&mut current.bg_color, target.bg_color, on(StyleMask::BG_COLOR), dt, d);
    current.bg_color2 = match (current.bg_color2, target.bg_color2) {
        (Some(mut live), Some(goal)) if on(StyleMask::BG_COLOR2) => {
            live.animate(goal, dt, d);
            Some(live)
        }
        (_, goal) => goal,
    };
    blend(&mut current.text_color, target.text_color, on(StyleMask::TEXT_COLOR), dt, d);
    blend(&mut current.radius, target.radius, on(StyleMask::RADIUS), dt, d);
    blend(&mut current.padding, target.padding, on(StyleMask::PADDING), dt, d);
    blend(&mut current.spacing, target.spacing, on(StyleMask::SPACING), dt, d);
    blend(&mut current.border_color, target.border_color, on(StyleMask::BORDER_COLOR), dt, d);
    blend(&mut current.border_widths, target.border_widths, on(StyleMask::BORDER_WIDTHS), dt, d);
    blend(
        &mut current.inset_shadow_color,
        target.inset_shadow_color,
        on(StyleMask::INSET_SHADOW_COLOR),
        dt,
        d,
    );
    blend(
        &mut current.outset_shadow_color,
        target.outset_shadow_color,
        on(StyleMask::OUTSET_SHADOW_COLOR),
        dt,
        d,
    );
    blend(
        &mut current.inset_shadow_width,
        target.inset_shadow_width,
        on(StyleMask::INSET_SHADOW_WIDTH),
        dt,
        d,
    );
    blend(
        &mut current.outset_shadow_width,
        target.outset_shadow_width,
        on(StyleMask::OUTSET_SHADOW_WIDTH),
        dt,
        d,
    );
    blend(&mut current.shadow_offsets, target.shadow_offsets, on(StyleMask::SHADOW_OFFSETS), dt, d);
    blend(&mut current.blur_radius, target.blur_radius, on(StyleMask::BLUR_RADIUS), dt, d);

    current.axis = target.axis;
    current.align = target.align;
    current.edge_softness = target.edge_softness;
    current.floating = target.floating;
    current.overflow = target.overflow;
    current.animation_mask = target.animation_mask;
    current.animation_time = target.animation_time;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Attr, SizeKind};

    #[test]
    fn test_approach_snaps_within_epsilon() {
        assert_eq!(approach(10.0005, 10.0, 0.016, 0.15), 10.0);
        assert_eq!(approach(0.0, 10.0, 0.016, 0.0), 10.0);
    }

    #[test]
    fn test_converges_after_duration() {
        let duration = 0.15;
        let dt = 0.01;
        let mut v = 0.0_f32;
        let mut t = 0.0;
        while t < duration * 1.1 {
            v = approach(v, 100.0, dt, duration);
            t += dt;
        }
        assert!((v - 100.0).abs() <= 0.1, "v = {v}");
    }

    #[test]
    fn test_step_count_does_not_change_result() {
        let one = approach(0.0, 1.0, 0.1, 0.2);
        let mut two = approach(0.0, 1.0, 0.05, 0.2);
        two = approach(two, 1.0, 0.05, 0.2);
        assert!((one - two).abs() < 1e-5);
    }

    #[test]
    fn test_unmasked_attributes_copy_verbatim() {
        let mut live = UiStyle::default();
        let mut target = UiStyle::default();
        target.set(Attr::Spacing, 8.0_f32.into()).unwrap();
        target.set(Attr::Width, Size::pixels(200.0, 1.0).into()).unwrap();
        target.animation_mask = StyleMask::WIDTH;

        animate_style(&mut live, &target, 0.016);

        assert_eq!(live.spacing, 8.0);
        assert_eq!(live.size[0].kind, SizeKind::Pixels);
        assert_eq!(live.size[0].strictness, 1.0);
        assert!(live.size[0].value > 0.0 && live.size[0].value < 200.0);
    }

    #[test]
    fn test_gradient_appears_without_smoothing() {
        let mut live = UiStyle::default();
        let mut target = UiStyle::default();
        target.bg_color2 = Some(Color::WHITE);
        target.animation_mask = StyleMask::BG_COLOR2;

        animate_style(&mut live, &target, 0.016);
        assert_eq!(live.bg_color2, Some(Color::WHITE));
    }
}
