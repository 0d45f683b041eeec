//! Horizontal value slider.

use arbor_core::Vec4;

use crate::context::UiContext;
use crate::error::UiResult;
use crate::input::Key;
use crate::style::{Align, Attr, Color, Size};
use crate::tree::{BoxFlags, BoxId};

/// Arrow-key step.
const KEY_STEP: f32 = 0.1;

/// Wheel step in pixels of track.
const WHEEL_STEP: f32 = 10.0;

/// A focusable slider editing `value` in `0..=1`.
///
/// Left/Right step by 0.1 while focused, a press jumps to the cursor and
/// dragging follows it, the wheel nudges it while hovered.
///
/// # Errors
///
/// [`UiError::KeyCollision`](crate::UiError::KeyCollision) on a reused label.
pub fn slider(ui: &mut UiContext, label: &str, value: &mut f32) -> UiResult<BoxId> {
    ui.boxed(BoxFlags::REACTIVE | BoxFlags::CAN_FOCUS, label, |ui, id| {
        ui.tag("slider")?;
        ui.style(Attr::Width, Size::percent(1.0, 0.0))?;
        ui.style(Attr::Height, Size::pixels(20.0, 1.0))?;
        ui.style(Attr::EdgeSoftness, 0.0_f32)?;
        ui.style(Attr::Spacing, 0.0_f32)?;
        ui.style(Attr::AlignY, Align::Middle)?;

        ui.style_rule(".focus", |ui| {
            ui.style(Attr::BorderWidths, Vec4::splat(2.0))?;
            ui.style(Attr::BorderColor, Color::rgba(1.0, 1.0, 1.0, 0.8))
        })?;

        let signal = ui.signal(id);
        let rect = ui.node(id).rect;

        if signal.focused {
            let step = if ui.event().is_key_press(Key::Left) {
                Some(-KEY_STEP)
            } else if ui.event().is_key_press(Key::Right) {
                Some(KEY_STEP)
            } else {
                None
            };
            if let Some(step) = step {
                *value = (*value + step).clamp(0.0, 1.0);
                ui.eat_event();
            }
        }

        if signal.pressed && rect.width > 0.0 {
            *value = ((ui.mouse().x - rect.x) / rect.width).clamp(0.0, 1.0);
        }

        if signal.hovered && rect.width > 0.0 {
            if let Some(wheel) = ui.event().scroll() {
                *value = (*value - WHEEL_STEP * wheel.y / rect.width).clamp(0.0, 1.0);
                ui.eat_event();
            }
        }

        let fill = *value;
        ui.boxed(BoxFlags::CLICK_THROUGH, "slider_track", |ui, _| {
            ui.style(Attr::FloatX, 0.0_f32)?;
            ui.style(Attr::Width, Size::percent(1.0, 0.0))?;
            ui.style(Attr::Height, Size::pixels(4.0, 0.0))?;
            ui.style(Attr::BgColor, Color::rgba(1.0, 1.0, 1.0, 0.8))?;
            ui.style(Attr::EdgeSoftness, 0.0_f32)?;

            ui.boxed(BoxFlags::empty(), "slider_track_fill", |ui, _| {
                ui.style(Attr::Width, Size::percent(fill, 0.0))?;
                ui.style(Attr::Height, Size::percent(1.0, 0.0))?;
                ui.style(Attr::BgColor, Color::rgba(1.0, 0.0, 1.0, 0.8))?;
                ui.style(Attr::EdgeSoftness, 0.0_f32)
            })?;
            Ok(())
        })?;

        let knob = (rect.height - 8.0).max(8.0);

        ui.boxed(BoxFlags::CLICK_THROUGH | BoxFlags::INVISIBLE, "slider_spacer", |ui, _| {
            let lead = (fill - knob / (2.0 * knob.max(rect.width))).max(0.0);
            ui.style(Attr::Width, Size::percent(lead, 0.0))?;
            ui.style(Attr::Height, Size::pixels(2.0, 0.0))?;
            ui.style(Attr::EdgeSoftness, 0.0_f32)
        })?;

        ui.boxed(BoxFlags::CLICK_THROUGH, "slider_knob", |ui, _| {
            ui.style(Attr::BgColor, Color::WHITE)?;
            ui.style(Attr::Width, Size::pixels(knob, 1.0))?;
            ui.style(Attr::Height, Size::pixels(knob, 1.0))?;
            ui.style(Attr::Radius, Vec4::splat(knob / 2.0))
        })?;

        Ok(())
    })
}
