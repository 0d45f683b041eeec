//! Push button.

use arbor_core::Vec4;

use crate::context::UiContext;
use crate::error::UiResult;
use crate::style::{Attr, Color, Size};
use crate::tree::{BoxFlags, BoxId};

/// A focusable text button tagged `button`.
///
/// While hovered it shows a soft highlight that follows the cursor,
/// clipped to the button. Read [`Signal::clicked`](crate::Signal) on the
/// returned box to react to it.
///
/// # Errors
///
/// [`UiError::KeyCollision`](crate::UiError::KeyCollision) on a reused label.
pub fn button(ui: &mut UiContext, label: &str) -> UiResult<BoxId> {
    let flags = BoxFlags::REACTIVE | BoxFlags::CAN_FOCUS | BoxFlags::DRAW_TEXT;
    ui.boxed(flags, label, |ui, id| {
        ui.tag("button")?;

        if ui.signal(id).hovered {
            let rect = ui.node(id).rect;
            let mouse = ui.mouse();
            let s = rect.height / 8.0;

            ui.push_clip_box(id);
            ui.boxed(BoxFlags::CLICK_THROUGH, "button_highlight", |ui, _| {
                ui.style(Attr::EdgeSoftness, 60.0_f32)?;
                ui.style(Attr::Radius, Vec4::splat(s))?;
                ui.style(Attr::FloatX, mouse.x - rect.x - s)?;
                ui.style(Attr::FloatY, mouse.y - rect.y - s)?;
                ui.style(Attr::BgColor, Color::rgba(1.0, 1.0, 1.0, 0.2))?;
                ui.style(Attr::Width, Size::pixels(2.0 * s, 1.0))?;
                ui.style(Attr::Height, Size::pixels(2.0 * s, 1.0))
            })?;
            ui.pop_clip()?;
        }

        Ok(())
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::input::{Event, Key};

    fn sized_button(ui: &mut UiContext) -> UiResult<BoxId> {
        ui.style_rule(".button", |ui| {
            ui.style(Attr::Width, Size::pixels(120.0, 1.0))?;
            ui.style(Attr::Height, Size::pixels(40.0, 1.0))
        })?;
        button(ui, "ok")
    }

    #[test]
    fn test_highlight_only_while_hovered() {
        let mut ui = UiContext::new(UiConfig::default());
        let mut id = None;
        ui.frame(&[], 0.016, |ui| {
            id = Some(sized_button(ui)?);
            Ok(())
        })
        .unwrap();
        let id = id.unwrap();
        assert!(ui.node(id).children.is_empty());
        assert!(ui.node(id).has_tag("button"));

        ui.frame(&[Event::MouseMove { x: 20.0, y: 20.0 }, Event::Dummy], 0.016, |ui| {
            sized_button(ui).map(|_| ())
        })
        .unwrap();

        let node = ui.node(id);
        assert!(node.signal.hovered);
        assert!(node.has_tag("hover"));
        assert!(node.flags.contains(BoxFlags::CLIPPING));

        let highlight = ui.node(node.children[0]);
        assert_eq!(highlight.label, "button_highlight");
        // s = 40 / 8; centred on the cursor.
        assert_eq!(highlight.rect, crate::layout::Rect::new(15.0, 15.0, 10.0, 10.0));
    }

    #[test]
    fn test_enter_clicks_the_focused_button() {
        let mut ui = UiContext::new(UiConfig::default());
        let mut clicked = false;
        ui.frame(&[], 0.016, |ui| sized_button(ui).map(|_| ())).unwrap();
        ui.frame(&[Event::key_press(Key::Tab), Event::key_press(Key::Enter)], 0.016, |ui| {
            let id = sized_button(ui)?;
            clicked |= ui.signal(id).clicked;
            Ok(())
        })
        .unwrap();

        assert!(clicked);
    }
}
