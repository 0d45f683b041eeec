//! Scroll container and its scroll bars.
//!
//! The container clips its children and allows overflow on both axes. Its
//! content offset lives in `content.x`/`content.y`; a bar is only shown on
//! an axis whose content is larger than the view.

use arbor_core::Vec2;

use crate::context::UiContext;
use crate::error::UiResult;
use crate::input::{Event, Key};
use crate::layout::Rect;
use crate::scroll::{clamp_knob, clamp_offset, follow_focus, knob_to_offset, offset_to_knob, scrollbar_ratio};
use crate::style::{Attr, Axis, Color, Size};
use crate::tree::{BoxFlags, BoxId};

use super::{float_attr, size_attr};

/// Declares a scroll container; `body` declares its children.
///
/// # Errors
///
/// Whatever `body` returns, or a structural error from the container.
pub fn scroll_box<F>(ui: &mut UiContext, label: &str, body: F) -> UiResult<BoxId>
where
    F: FnOnce(&mut UiContext, BoxId) -> UiResult<()>,
{
    let id = ui.begin_box(BoxFlags::REACTIVE, label)?;
    ui.style_box(id, Attr::OverflowX, true)?;
    ui.style_box(id, Attr::OverflowY, true)?;
    ui.push_clip_box(id);

    body(ui, id)?;

    let rect = ui.node(id).rect;
    let content = ui.node(id).content;
    let mut offset = Vec2::new(content.x, content.y);

    if ui.event().is_key_press(Key::Tab) {
        if let Some(focused) = ui.focused().filter(|&f| f != id && ui.store().is_ancestor_or_self(id, f)) {
            offset = follow_focus(rect, ui.node(focused).rect, offset);
        }
    }

    let scroll = ui.config().scroll;
    let hovered = ui.signal(id).hovered;
    let ctrl = ui.input().ctrl_held();

    for axis in Axis::ALL {
        let i = axis.index();
        let view = rect.size(axis);
        let extent = content.size(axis);
        let slot = offset.get_mut(i);

        if view >= extent {
            *slot = 0.0;
            continue;
        }

        let ratio = scrollbar_ratio(view, extent);
        let mut knob = offset_to_knob(*slot, extent, view);
        let bar = match axis {
            Axis::Horizontal => Rect::new(0.0, rect.height - scroll.bar_width, rect.width, scroll.bar_width),
            Axis::Vertical => Rect::new(rect.width - scroll.bar_width, 0.0, scroll.bar_width, rect.height),
        };
        let bar_label = match axis {
            Axis::Horizontal => "scroll_bar_x",
            Axis::Vertical => "scroll_bar_y",
        };
        scroll_bar(ui, bar_label, axis, bar, ratio, &mut knob)?;
        *slot = knob_to_offset(knob, extent, view);

        // Ctrl routes the wheel to the horizontal axis.
        let wants_wheel = ctrl == (axis == Axis::Horizontal);
        if hovered && wants_wheel {
            if let Some(wheel) = ui.event().scroll() {
                *slot += scroll.wheel_speed * wheel.y;
                ui.eat_event();
            }
        }

        *slot = clamp_offset(*slot, extent, view);
    }

    let node = ui.node_mut(id);
    node.content.x = offset.x;
    node.content.y = offset.y;

    ui.pop_clip()?;
    ui.end_box()?;
    Ok(id)
}

/// Declares a scroll bar along `axis`.
///
/// `rect` is relative to the parent's origin. `knob` is the knob position
/// on the track, updated by clicks on the track, knob drags and the wheel.
///
/// # Errors
///
/// [`UiError::KeyCollision`](crate::UiError::KeyCollision) on a reused label.
pub fn scroll_bar(
    ui: &mut UiContext,
    label: &str,
    axis: Axis,
    rect: Rect,
    ratio: f32,
    knob: &mut f32,
) -> UiResult<BoxId> {
    let across = axis.other();
    let track = rect.size(axis);
    let wheel_speed = match axis {
        Axis::Horizontal => ui.config().scroll.bar_wheel_speed_x,
        Axis::Vertical => ui.config().scroll.bar_wheel_speed_y,
    };

    ui.boxed(BoxFlags::REACTIVE, label, |ui, bar| {
        let pad = ui.node(bar).style.padding_on(across);
        let live = ui.node(bar).rect;

        ui.style(float_attr(axis), rect.pos(axis))?;
        ui.style(float_attr(across), rect.pos(across) - 2.0 * pad)?;
        ui.style(size_attr(axis), Size::pixels(track, 1.0))?;
        ui.style(size_attr(across), Size::children_sum(1.0))?;
        ui.style(Attr::BgColor, Color::rgba(0.0, 0.0, 0.0, 0.4))?;
        ui.style(Attr::Axis, axis)?;
        ui.style(Attr::Padding, Vec2::splat(4.0))?;
        ui.style(Attr::EdgeSoftness, 0.0_f32)?;

        let signal = ui.signal(bar);
        if signal.pressed {
            let grab = ui.mouse().get(axis.index()) - live.pos(axis) - ratio * track / 2.0;
            *knob = clamp_knob(grab, ratio, track);
        }
        if signal.hovered {
            if let Some(wheel) = ui.event().scroll() {
                *knob = clamp_knob(*knob - wheel_speed * wheel.y, ratio, track);
                ui.eat_event();
            }
        }

        for pattern in [
            ".hover #scroll_bar_knob",
            ".press #scroll_bar_knob",
            "#scroll_bar_knob.hover",
            "#scroll_bar_knob.press",
        ] {
            ui.style_rule(pattern, |ui| ui.style(Attr::BgColor, Color::rgba(1.0, 1.0, 1.0, 0.8)))?;
        }

        let lead = *knob;
        ui.boxed(BoxFlags::CLICK_THROUGH | BoxFlags::INVISIBLE, "scroll_bar_spacer", |ui, _| {
            ui.style(size_attr(axis), Size::pixels(lead, 0.0))
        })?;

        ui.boxed(BoxFlags::REACTIVE, "scroll_bar_knob", |ui, k| {
            ui.style(size_attr(across), Size::pixels(rect.size(across), 1.0))?;
            ui.style(size_attr(axis), Size::pixels(ratio * track, 1.0))?;
            ui.style(Attr::BgColor, Color::rgba(1.0, 1.0, 1.0, 0.4))?;
            ui.style(Attr::EdgeSoftness, 0.0_f32)?;

            if ui.signal(k).pressed && matches!(ui.event(), Event::MouseMove { .. }) {
                let moved = ui.mouse_delta().get(axis.index());
                *knob = clamp_knob(*knob + moved, ratio, track);
            }
            Ok(())
        })?;

        Ok(())
    })
}
