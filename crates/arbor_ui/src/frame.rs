//! # Frame Driver
//!
//! Runs the per-event pipeline and hands the solved tree to the renderer.
//!
//! ```text
//! frame(events, dt, build)
//!   for event in events:                 one pass per event, dt / n each
//!     input.apply(event)
//!     Tab / Shift+Tab ─▶ focus step over the previous pass's order
//!     build()      declarative calls under the root box
//!     sweep()      evict undeclared boxes, forget their singletons
//!     measure      intrinsic text sizes
//!     cascade()    rules ─▶ next_style ─▶ animated style
//!     solve()      five passes per axis
//!     hover        pre-order hit test against the clip stack
//!   render()       once, after the last pass
//! ```

use arbor_core::Vec2;

use crate::cascade::cascade;
use crate::clip::ClipStack;
use crate::context::UiContext;
use crate::error::{UiError, UiResult};
use crate::input::{Event, Key};
use crate::layout::{self, Rect};
use crate::render::DrawBatch;
use crate::style::{Attr, Size};
use crate::text::measure_text;
use crate::tree::{BoxFlags, BoxId, BoxStore};

/// Result of one frame.
#[derive(Debug, Default)]
pub struct FrameOutput {
    /// Vertex batches in submission order.
    pub batches: Vec<DrawBatch>,
    /// Number of build passes run.
    pub passes: usize,
}

impl UiContext {
    /// Runs one frame.
    ///
    /// `build` declares the tree under the root box and is called once per
    /// event. An empty queue still runs one pass.
    ///
    /// # Errors
    ///
    /// Any structural error raised by `build`, plus
    /// [`UiError::UnclosedBoxes`] when `build` leaves boxes open. The frame
    /// is abandoned at the first error.
    pub fn frame<F>(&mut self, events: &[Event], dt: f32, mut build: F) -> UiResult<FrameOutput>
    where
        F: FnMut(&mut Self) -> UiResult<()>,
    {
        let events: &[Event] = if events.is_empty() { &[Event::Dummy] } else { events };

        #[allow(clippy::cast_precision_loss)]
        let pass_dt = dt / events.len() as f32;

        for event in events {
            self.run_pass(*event, pass_dt, &mut build)?;
        }

        let batches = self
            .renderer
            .render(&mut self.store, self.shaper.as_mut(), self.window)?;

        Ok(FrameOutput { batches, passes: events.len() })
    }

    fn run_pass<F>(&mut self, event: Event, dt: f32, build: &mut F) -> UiResult<()>
    where
        F: FnMut(&mut Self) -> UiResult<()>,
    {
        tracing::trace!("dispatch {:?}", event);

        self.event = event;
        self.dt = dt;
        self.input.apply(&event);

        if let Event::WindowSize { width, height } = event {
            self.window = Rect::new(0.0, 0.0, width, height);
        }

        if event.is_key_press(Key::Tab) && !self.store.depth_first().is_empty() {
            if self.input.shift_held() {
                self.interaction.focus_prev(&self.store);
            } else {
                self.interaction.focus_next(&self.store);
            }
        }

        self.begin_pass();
        self.build_root(build)?;

        for id in self.store.sweep() {
            self.interaction.forget(id);
        }

        self.measure_text();
        cascade(&mut self.store, &self.rules, dt);
        layout::solve(&mut self.store);
        self.interaction.hovered = hit_test(&self.store, self.window, self.input.mouse());
        Ok(())
    }

    fn build_root<F>(&mut self, build: &mut F) -> UiResult<()>
    where
        F: FnMut(&mut Self) -> UiResult<()>,
    {
        let window = self.window;
        let root = self.begin_box(BoxFlags::empty(), "root")?;
        self.style_box(root, Attr::Width, Size::pixels(window.width, 0.0))?;
        self.style_box(root, Attr::Height, Size::pixels(window.height, 0.0))?;
        self.style_box(root, Attr::Padding, Vec2::ZERO)?;
        self.style_box(root, Attr::Spacing, 0.0_f32)?;
        self.store[root].rect = window;

        build(self)?;

        match self.store.open_count() {
            1 => {}
            0 => {
                tracing::error!("build closed the root box");
                return Err(UiError::UnbalancedEnd);
            }
            n => {
                tracing::error!("{} box(es) left open at the end of the build", n - 1);
                return Err(UiError::UnclosedBoxes { count: n - 1 });
            }
        }
        self.end_box()?;
        Ok(())
    }

    fn measure_text(&mut self) {
        let spacing = self.config.text.line_spacing;
        let BoxStore { pool, depth_first, .. } = &mut self.store;
        for id in depth_first.iter() {
            let node = &mut pool[id.handle()];
            if node.flags.contains(BoxFlags::DRAW_TEXT) {
                let size = measure_text(self.shaper.as_ref(), &node.label, spacing);
                node.text_rect.width = size.x;
                node.text_rect.height = size.y;
            }
        }
    }
}

/// Topmost box under `mouse`, honouring clipping and click-through.
#[must_use]
pub fn hit_test(store: &BoxStore, window: Rect, mouse: Vec2) -> Option<BoxId> {
    let root = store.root()?;
    let mut clip = ClipStack::new(window);
    let mut hovered = None;
    visit(store, root, mouse, &mut clip, &mut hovered);
    hovered
}

fn visit(store: &BoxStore, id: BoxId, mouse: Vec2, clip: &mut ClipStack, hovered: &mut Option<BoxId>) {
    let node = &store[id];

    if !node.flags.contains(BoxFlags::CLICK_THROUGH) && node.rect.intersect(&clip.top()).contains_strict(mouse) {
        *hovered = Some(id);
    }

    let clipping = node.flags.contains(BoxFlags::CLIPPING);
    if clipping {
        clip.push_rect(node.rect.inset(node.style.border_widths));
    }

    for &child in &node.children {
        visit(store, child, mouse, clip, hovered);
    }

    if clipping {
        // Balanced with the push above.
        let _ = clip.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::input::{Modifiers, MouseButton};

    fn square(ui: &mut UiContext, flags: BoxFlags, label: &str, side: f32) -> UiResult<BoxId> {
        ui.boxed(flags, label, |ui, _| {
            ui.style(Attr::Width, Size::pixels(side, 1.0))?;
            ui.style(Attr::Height, Size::pixels(side, 1.0))
        })
    }

    #[test]
    fn test_root_fills_window() {
        let mut ui = UiContext::new(UiConfig::default());
        let out = ui.frame(&[], 0.016, |_| Ok(())).unwrap();
        assert_eq!(out.passes, 1);

        let root = ui.store().root().unwrap();
        assert_eq!(ui.node(root).rect, Rect::new(0.0, 0.0, 800.0, 600.0));

        ui.frame(&[Event::WindowSize { width: 300.0, height: 200.0 }], 0.016, |_| Ok(()))
            .unwrap();
        assert_eq!(ui.node(root).rect, Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(ui.window(), Rect::new(0.0, 0.0, 300.0, 200.0));
    }

    #[test]
    fn test_unclosed_box_is_fatal() {
        let mut ui = UiContext::new(UiConfig::default());
        let err = ui
            .frame(&[], 0.016, |ui| {
                ui.begin_box(BoxFlags::empty(), "a")?;
                ui.begin_box(BoxFlags::empty(), "b")?;
                Ok(())
            })
            .unwrap_err();
        assert_eq!(err, UiError::UnclosedBoxes { count: 2 });
    }

    #[test]
    fn test_closing_the_root_is_fatal() {
        let mut ui = UiContext::new(UiConfig::default());
        let err = ui.frame(&[], 0.016, |ui| ui.end_box().map(|_| ())).unwrap_err();
        assert_eq!(err, UiError::UnbalancedEnd);
    }

    #[test]
    fn test_hover_picks_topmost() {
        let mut ui = UiContext::new(UiConfig::default());
        let build = |ui: &mut UiContext| -> UiResult<()> {
            ui.boxed(BoxFlags::REACTIVE, "outer", |ui, _| {
                ui.style(Attr::Width, Size::pixels(100.0, 1.0))?;
                ui.style(Attr::Height, Size::pixels(100.0, 1.0))?;
                square(ui, BoxFlags::REACTIVE, "inner", 50.0)?;
                Ok(())
            })?;
            Ok(())
        };

        ui.frame(&[Event::MouseMove { x: 10.0, y: 10.0 }], 0.016, build).unwrap();
        let inner = ui.hovered().unwrap();
        assert_eq!(ui.node(inner).label, "inner");

        ui.frame(&[Event::MouseMove { x: 80.0, y: 80.0 }], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.hovered().unwrap()).label, "outer");
    }

    #[test]
    fn test_click_through_is_skipped_but_children_are_not() {
        let mut ui = UiContext::new(UiConfig::default());
        let build = |ui: &mut UiContext| -> UiResult<()> {
            ui.boxed(BoxFlags::CLICK_THROUGH, "ghost", |ui, _| {
                ui.style(Attr::Width, Size::pixels(100.0, 1.0))?;
                ui.style(Attr::Height, Size::pixels(100.0, 1.0))?;
                square(ui, BoxFlags::empty(), "solid", 20.0)?;
                Ok(())
            })?;
            Ok(())
        };

        ui.frame(&[Event::MouseMove { x: 50.0, y: 50.0 }], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.hovered().unwrap()).label, "root");

        ui.frame(&[Event::MouseMove { x: 5.0, y: 5.0 }], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.hovered().unwrap()).label, "solid");
    }

    #[test]
    fn test_clipped_child_is_not_hovered_outside_the_clip() {
        let mut ui = UiContext::new(UiConfig::default());
        let build = |ui: &mut UiContext| -> UiResult<()> {
            ui.boxed(BoxFlags::empty(), "window", |ui, id| {
                ui.style(Attr::Width, Size::pixels(50.0, 1.0))?;
                ui.style(Attr::Height, Size::pixels(50.0, 1.0))?;
                ui.style(Attr::OverflowX, true)?;
                ui.push_clip_box(id);
                square(ui, BoxFlags::empty(), "wide", 200.0)?;
                ui.pop_clip()?;
                Ok(())
            })?;
            Ok(())
        };

        ui.frame(&[Event::MouseMove { x: 100.0, y: 10.0 }], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.hovered().unwrap()).label, "root");

        ui.frame(&[Event::MouseMove { x: 10.0, y: 10.0 }], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.hovered().unwrap()).label, "wide");
    }

    #[test]
    fn test_click_across_passes() {
        let mut ui = UiContext::new(UiConfig::default());
        let mut clicks = 0;
        let events = [
            Event::MouseMove { x: 10.0, y: 10.0 },
            Event::mouse_press(MouseButton::Left),
            Event::mouse_release(MouseButton::Left),
        ];

        // The first frame gives the button a rect to hit.
        ui.frame(&[], 0.016, |ui| square(ui, BoxFlags::REACTIVE, "button", 40.0).map(|_| ()))
            .unwrap();
        ui.frame(&events, 0.016, |ui| {
            let id = square(ui, BoxFlags::REACTIVE, "button", 40.0)?;
            if ui.signal(id).clicked {
                clicks += 1;
            }
            Ok(())
        })
        .unwrap();

        assert_eq!(clicks, 1);
        assert_eq!(ui.active(), None);
    }

    #[test]
    fn test_shift_tab_goes_backwards() {
        let mut ui = UiContext::new(UiConfig::default());
        let build = |ui: &mut UiContext| -> UiResult<()> {
            for label in ["a", "b", "c"] {
                square(ui, BoxFlags::REACTIVE | BoxFlags::CAN_FOCUS, label, 10.0)?;
            }
            Ok(())
        };
        let shift_tab = Event::Press { button: crate::input::Button::Key(Key::Tab), mods: Modifiers::SHIFT };

        ui.frame(&[], 0.016, build).unwrap();
        ui.frame(&[Event::key_press(Key::Tab)], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.focused().unwrap()).label, "a");

        ui.frame(&[Event::key_release(Key::Tab), shift_tab], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.focused().unwrap()).label, "c");
    }

    #[test]
    fn test_held_shift_key_reverses_tab() {
        let mut ui = UiContext::new(UiConfig::default());
        let build = |ui: &mut UiContext| -> UiResult<()> {
            for label in ["a", "b", "c"] {
                square(ui, BoxFlags::REACTIVE | BoxFlags::CAN_FOCUS, label, 10.0)?;
            }
            Ok(())
        };

        ui.frame(&[], 0.016, build).unwrap();
        ui.frame(&[Event::key_press(Key::Tab)], 0.016, build).unwrap();
        assert_eq!(ui.node(ui.focused().unwrap()).label, "a");

        let events = [Event::key_press(Key::LeftShift), Event::key_press(Key::Tab)];
        ui.frame(&events, 0.016, build).unwrap();
        assert_eq!(ui.node(ui.focused().unwrap()).label, "c");

        let events = [Event::key_release(Key::LeftShift), Event::key_press(Key::Tab)];
        ui.frame(&events, 0.016, build).unwrap();
        assert_eq!(ui.node(ui.focused().unwrap()).label, "a");
    }
}
