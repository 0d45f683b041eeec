//! # UI Context
//!
//! The single owner of every piece of engine state. Widgets and
//! application code receive `&mut UiContext` and declare boxes, rules and
//! styles through it; nothing in the engine is global.
//!
//! ## Example
//!
//! ```rust
//! use arbor_ui::{Attr, BoxFlags, Event, Size, UiConfig, UiContext};
//!
//! let mut ui = UiContext::new(UiConfig::default());
//! ui.frame(&[Event::Dummy], 0.016, |ui| {
//!     ui.style_rule(".panel", |ui| ui.style(Attr::Spacing, 4.0_f32))?;
//!     ui.boxed(BoxFlags::empty(), "panel", |ui, _| {
//!         ui.tag("panel")?;
//!         ui.style(Attr::Width, Size::pixels(120.0, 1.0))
//!     })?;
//!     Ok(())
//! })
//! .unwrap();
//! ```

use arbor_core::{ArenaRef, FrameArena, Vec2};

use crate::cascade::StyleRule;
use crate::clip::ClipStack;
use crate::config::UiConfig;
use crate::error::{UiError, UiResult};
use crate::input::{Event, InputState};
use crate::layout::Rect;
use crate::pattern::Pattern;
use crate::render::Renderer;
use crate::signal::{Interaction, Signal};
use crate::style::{Attr, StyleValue};
use crate::text::TextShaper;
use crate::tree::{BoxFlags, BoxId, BoxStore, UiBox};

/// Engine state for one UI instance.
pub struct UiContext {
    pub(crate) config: UiConfig,
    pub(crate) store: BoxStore,
    pub(crate) input: InputState,
    pub(crate) interaction: Interaction,
    pub(crate) clip: ClipStack,
    pub(crate) rules: FrameArena<StyleRule>,
    open_rule: Option<ArenaRef<StyleRule>>,
    pub(crate) event: Event,
    pub(crate) window: Rect,
    pub(crate) dt: f32,
    pub(crate) shaper: Box<dyn TextShaper>,
    pub(crate) renderer: Renderer,
}

impl std::fmt::Debug for UiContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UiContext")
            .field("window", &self.window)
            .field("boxes", &self.store.live_count())
            .field("interaction", &self.interaction)
            .finish_non_exhaustive()
    }
}

impl UiContext {
    /// Creates a context using the built-in monospace shaper.
    #[must_use]
    pub fn new(config: UiConfig) -> Self {
        let shaper = Box::new(config.text.shaper());
        Self::with_shaper(config, shaper)
    }

    /// Creates a context with a custom text backend.
    #[must_use]
    pub fn with_shaper(config: UiConfig, shaper: Box<dyn TextShaper>) -> Self {
        let window = Rect::new(0.0, 0.0, config.window.width, config.window.height);
        let renderer = Renderer::new(config.render.max_batch_vertices, config.text.line_spacing);
        Self {
            config,
            store: BoxStore::new(),
            input: InputState::new(),
            interaction: Interaction::default(),
            clip: ClipStack::new(window),
            rules: FrameArena::with_capacity(64),
            open_rule: None,
            event: Event::Dummy,
            window,
            dt: 0.0,
            shaper,
            renderer,
        }
    }

    // =========================================================================
    // Boxes
    // =========================================================================

    /// Opens a box under the innermost open box and computes its signal.
    ///
    /// Reactive boxes are tagged `focus`, `hover` and `press` according to
    /// that signal.
    ///
    /// # Errors
    ///
    /// [`UiError::KeyCollision`] if `label` was already used under the same
    /// parent this pass.
    pub fn begin_box(&mut self, flags: BoxFlags, label: &str) -> UiResult<BoxId> {
        let id = self.store.begin_box(flags, label)?;

        let signal = self.interaction.signal_for(
            id,
            &self.store,
            &self.event,
            self.input.mouse(),
            self.clip.top(),
        );

        let node = &mut self.store[id];
        node.signal = signal;
        for (on, tag) in [(signal.focused, "focus"), (signal.hovered, "hover"), (signal.pressed, "press")] {
            if on {
                node.tags.push(tag.to_owned());
            }
        }

        Ok(id)
    }

    /// Closes the innermost open box.
    ///
    /// # Errors
    ///
    /// [`UiError::UnbalancedEnd`] if nothing is open.
    pub fn end_box(&mut self) -> UiResult<BoxId> {
        self.store.end_box()
    }

    /// Opens a box, runs `body` inside it and closes it.
    ///
    /// # Errors
    ///
    /// Whatever `begin_box` or `body` returns.
    pub fn boxed<F>(&mut self, flags: BoxFlags, label: &str, body: F) -> UiResult<BoxId>
    where
        F: FnOnce(&mut Self, BoxId) -> UiResult<()>,
    {
        let id = self.begin_box(flags, label)?;
        body(self, id)?;
        self.end_box()?;
        Ok(id)
    }

    /// Runs `body` with `id` re-entered as the parent of new boxes.
    ///
    /// # Errors
    ///
    /// Whatever `body` returns.
    pub fn with_parent<F, T>(&mut self, id: BoxId, body: F) -> UiResult<T>
    where
        F: FnOnce(&mut Self) -> UiResult<T>,
    {
        self.store.push_parent(id);
        let out = body(self)?;
        self.store.pop_parent()?;
        Ok(out)
    }

    /// Innermost open box.
    ///
    /// # Errors
    ///
    /// [`UiError::NoOpenBox`] outside any box.
    pub fn current(&self) -> UiResult<BoxId> {
        self.store.top().ok_or_else(|| {
            tracing::error!("no box is open");
            UiError::NoOpenBox
        })
    }

    /// A box by handle.
    #[must_use]
    pub fn node(&self, id: BoxId) -> &UiBox {
        &self.store[id]
    }

    /// A box by handle, mutably.
    pub fn node_mut(&mut self, id: BoxId) -> &mut UiBox {
        &mut self.store[id]
    }

    /// Signal computed when the box was opened this pass.
    #[must_use]
    pub fn signal(&self, id: BoxId) -> Signal {
        self.store[id].signal
    }

    /// The box store.
    #[must_use]
    pub fn store(&self) -> &BoxStore {
        &self.store
    }

    // =========================================================================
    // Styles
    // =========================================================================

    /// Sets an attribute on the open style rule, or on the innermost open
    /// box's target style when no rule is open.
    ///
    /// # Errors
    ///
    /// [`UiError::AttributeKind`] on a value of the wrong kind,
    /// [`UiError::NoOpenBox`] outside any box.
    pub fn style(&mut self, attr: Attr, value: impl Into<StyleValue>) -> UiResult<()> {
        let value = value.into();
        if let Some(rule) = self.open_rule.and_then(|r| self.rules.get_mut(r)) {
            rule.style.set(attr, value)?;
            rule.mask |= attr.mask();
            return Ok(());
        }
        let id = self.current()?;
        self.style_box(id, attr, value)
    }

    /// Sets an attribute on a specific box's target style.
    ///
    /// # Errors
    ///
    /// [`UiError::AttributeKind`] on a value of the wrong kind.
    pub fn style_box(&mut self, id: BoxId, attr: Attr, value: impl Into<StyleValue>) -> UiResult<()> {
        self.store[id].next_style.set(attr, value.into())
    }

    /// Declares a rule scoped to the innermost open box's subtree (the box
    /// itself included). `body` sets the rule's attributes with
    /// [`style`](Self::style).
    ///
    /// # Errors
    ///
    /// [`UiError::NestedStyleRule`] inside another rule, any pattern parse
    /// error, and whatever `body` returns.
    pub fn style_rule<F>(&mut self, pattern: &str, body: F) -> UiResult<()>
    where
        F: FnOnce(&mut Self) -> UiResult<()>,
    {
        if self.open_rule.is_some() {
            tracing::error!("style rule [{}] declared inside another rule", pattern);
            return Err(UiError::NestedStyleRule);
        }

        let owner = self.current()?;
        let pattern = Pattern::parse(pattern)?;
        let rule = self.rules.alloc(StyleRule::new(pattern));
        self.store[owner].rules.push(rule);

        self.open_rule = Some(rule);
        let out = body(self);
        self.open_rule = None;
        out
    }

    /// Adds a tag to the innermost open box.
    ///
    /// # Errors
    ///
    /// [`UiError::NoOpenBox`] outside any box.
    pub fn tag(&mut self, tag: &str) -> UiResult<()> {
        let id = self.current()?;
        self.tag_box(id, tag);
        Ok(())
    }

    /// Adds a tag to a specific box.
    pub fn tag_box(&mut self, id: BoxId, tag: &str) {
        let node = &mut self.store[id];
        if !node.has_tag(tag) {
            node.tags.push(tag.to_owned());
        }
    }

    // =========================================================================
    // Input
    // =========================================================================

    /// The event being processed.
    #[must_use]
    pub fn event(&self) -> &Event {
        &self.event
    }

    /// Marks the current event as consumed.
    pub fn eat_event(&mut self) {
        self.event = Event::Eaten;
    }

    /// Cursor position.
    #[must_use]
    pub fn mouse(&self) -> Vec2 {
        self.input.mouse()
    }

    /// Cursor movement caused by the current event.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        self.input.mouse_delta()
    }

    /// Cursor and button state.
    #[must_use]
    pub fn input(&self) -> &InputState {
        &self.input
    }

    /// Interaction singletons.
    #[must_use]
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Box with keyboard focus.
    #[must_use]
    pub fn focused(&self) -> Option<BoxId> {
        self.interaction.focused
    }

    /// Box holding the primary button.
    #[must_use]
    pub fn active(&self) -> Option<BoxId> {
        self.interaction.active
    }

    /// Topmost box under the cursor.
    #[must_use]
    pub fn hovered(&self) -> Option<BoxId> {
        self.interaction.hovered
    }

    // =========================================================================
    // Clip, window, config
    // =========================================================================

    /// Narrows the clip to a box's border-inset rect and marks it clipping.
    pub fn push_clip_box(&mut self, id: BoxId) -> Rect {
        self.clip.push_box(&mut self.store, id)
    }

    /// Narrows the clip to `rect`.
    pub fn push_clip(&mut self, rect: Rect) -> Rect {
        self.clip.push_rect(rect)
    }

    /// Restores the previous clip.
    ///
    /// # Errors
    ///
    /// [`UiError::UnbalancedClip`] when only the root clip is left.
    pub fn pop_clip(&mut self) -> UiResult<Rect> {
        self.clip.pop()
    }

    /// Current clip rect.
    #[must_use]
    pub fn clip(&self) -> Rect {
        self.clip.top()
    }

    /// Window rect.
    #[must_use]
    pub fn window(&self) -> Rect {
        self.window
    }

    /// Time step of the current pass, in seconds.
    #[must_use]
    pub fn dt(&self) -> f32 {
        self.dt
    }

    /// Engine configuration.
    #[must_use]
    pub fn config(&self) -> &UiConfig {
        &self.config
    }

    pub(crate) fn begin_pass(&mut self) {
        self.rules.reset();
        self.open_rule = None;
        self.store.begin_pass();
        self.clip.set_root(self.window);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::{Color, Size};

    fn open_root(ui: &mut UiContext) -> BoxId {
        ui.begin_pass();
        ui.begin_box(BoxFlags::empty(), "root").unwrap()
    }

    #[test]
    fn test_style_without_rule_targets_box() {
        let mut ui = UiContext::new(UiConfig::default());
        let root = open_root(&mut ui);
        ui.style(Attr::Spacing, 3.0_f32).unwrap();
        assert_eq!(ui.node(root).next_style.spacing, 3.0);
        assert!(ui.node(root).rules.is_empty());
    }

    #[test]
    fn test_style_inside_rule_targets_rule() {
        let mut ui = UiContext::new(UiConfig::default());
        let root = open_root(&mut ui);
        ui.style_rule(".x", |ui| ui.style(Attr::BgColor, Color::WHITE)).unwrap();

        assert_eq!(ui.node(root).next_style.bg_color, Color::TRANSPARENT);
        let rule = ui.rules.get(ui.node(root).rules[0]).unwrap();
        assert_eq!(rule.style.bg_color, Color::WHITE);
        assert!(rule.mask.contains(Attr::BgColor.mask()));
    }

    #[test]
    fn test_nested_rule_is_fatal() {
        let mut ui = UiContext::new(UiConfig::default());
        open_root(&mut ui);
        let err = ui
            .style_rule(".a", |ui| ui.style_rule(".b", |_| Ok(())))
            .unwrap_err();
        assert_eq!(err, UiError::NestedStyleRule);

        // The failed rule does not leave a rule open.
        ui.style(Attr::Spacing, 1.0_f32).unwrap();
    }

    #[test]
    fn test_wrong_value_kind_is_fatal() {
        let mut ui = UiContext::new(UiConfig::default());
        open_root(&mut ui);
        let err = ui.style(Attr::Width, 10.0_f32).unwrap_err();
        assert!(matches!(err, UiError::AttributeKind { attr: "width", .. }));
        assert!(ui.style(Attr::Width, Size::pixels(10.0, 1.0)).is_ok());
    }

    #[test]
    fn test_bad_pattern_is_fatal() {
        let mut ui = UiContext::new(UiConfig::default());
        open_root(&mut ui);
        assert!(matches!(ui.style_rule("#", |_| Ok(())), Err(UiError::ExpectedSelectorName(_))));
    }

    #[test]
    fn test_style_outside_box() {
        let mut ui = UiContext::new(UiConfig::default());
        ui.begin_pass();
        assert_eq!(ui.style(Attr::Spacing, 1.0_f32), Err(UiError::NoOpenBox));
        assert_eq!(ui.tag("x"), Err(UiError::NoOpenBox));
    }

    #[test]
    fn test_tags_are_not_duplicated() {
        let mut ui = UiContext::new(UiConfig::default());
        let root = open_root(&mut ui);
        ui.tag("a").unwrap();
        ui.tag("a").unwrap();
        assert_eq!(ui.node(root).tags, vec!["a".to_owned()]);
    }
}
