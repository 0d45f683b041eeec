//! Input events and the cursor/button state they drive.
//!
//! The frame driver applies events one at a time, in arrival order. State
//! here always reflects the event currently being processed.

#![allow(missing_docs)]

use arbor_core::Vec2;

/// Mouse button.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Left mouse button.
    Left,
    /// Right mouse button.
    Right,
    /// Middle mouse button (scroll wheel click).
    Middle,
}

/// Keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Enter/Return key, the activation key for focused boxes.
    Enter,
    /// Tab key, moves focus.
    Tab,
    /// Arrow left.
    Left,
    /// Arrow right.
    Right,
    /// Left shift; reverses Tab while held.
    LeftShift,
    /// Right shift.
    RightShift,
    /// Left control; selects the horizontal wheel axis while held.
    LeftControl,
    /// Right control.
    RightControl,
}

/// Modifier keys reported with a press or release.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    /// Shift key is held.
    pub shift: bool,
    /// Control key is held.
    pub ctrl: bool,
}

impl Modifiers {
    /// No modifiers.
    pub const NONE: Self = Self { shift: false, ctrl: false };
    /// Shift only.
    pub const SHIFT: Self = Self { shift: true, ctrl: false };
    /// Control only.
    pub const CTRL: Self = Self { shift: false, ctrl: true };
}

/// Anything that can be pressed and released.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    /// Keyboard key.
    Key(Key),
    /// Mouse button.
    Mouse(MouseButton),
}

/// Primary pointer button.
pub const PRIMARY: Button = Button::Mouse(MouseButton::Left);

/// One input event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Event {
    /// No input; forces a pass.
    Dummy,
    /// Already consumed by a widget; outer widgets ignore it.
    Eaten,
    /// The window changed size.
    WindowSize { width: f32, height: f32 },
    /// The cursor moved to an absolute position.
    MouseMove { x: f32, y: f32 },
    /// Wheel movement in notches; positive `y` is away from the user.
    Scroll { x: f32, y: f32 },
    /// A key or mouse button went down.
    Press { button: Button, mods: Modifiers },
    /// A key or mouse button went up.
    Release { button: Button, mods: Modifiers },
}

impl Event {
    /// Key press without modifiers.
    #[must_use]
    pub const fn key_press(key: Key) -> Self {
        Self::Press { button: Button::Key(key), mods: Modifiers::NONE }
    }

    /// Key release without modifiers.
    #[must_use]
    pub const fn key_release(key: Key) -> Self {
        Self::Release { button: Button::Key(key), mods: Modifiers::NONE }
    }

    /// Mouse button press.
    #[must_use]
    pub const fn mouse_press(button: MouseButton) -> Self {
        Self::Press { button: Button::Mouse(button), mods: Modifiers::NONE }
    }

    /// Mouse button release.
    #[must_use]
    pub const fn mouse_release(button: MouseButton) -> Self {
        Self::Release { button: Button::Mouse(button), mods: Modifiers::NONE }
    }

    /// Returns true if this is a press of `button`.
    #[must_use]
    pub fn is_press(&self, button: Button) -> bool {
        matches!(self, Self::Press { button: b, .. } if *b == button)
    }

    /// Returns true if this is a release of `button`.
    #[must_use]
    pub fn is_release(&self, button: Button) -> bool {
        matches!(self, Self::Release { button: b, .. } if *b == button)
    }

    /// Returns true if this is a press of `key`.
    #[must_use]
    pub fn is_key_press(&self, key: Key) -> bool {
        self.is_press(Button::Key(key))
    }

    /// Wheel delta, if this is a scroll event.
    #[must_use]
    pub const fn scroll(&self) -> Option<Vec2> {
        match *self {
            Self::Scroll { x, y } => Some(Vec2::new(x, y)),
            _ => None,
        }
    }
}

/// Cursor and button state for the current event.
#[derive(Debug, Clone, Default)]
pub struct InputState {
    /// Current mouse X position.
    pub mouse_x: f32,
    /// Current mouse Y position.
    pub mouse_y: f32,
    /// Mouse X position before the current event.
    pub prev_mouse_x: f32,
    /// Mouse Y position before the current event.
    pub prev_mouse_y: f32,
    /// Modifier keys reported by the last press or release.
    pub modifiers: Modifiers,
    /// Keys and mouse buttons currently held.
    held: Vec<Button>,
}

impl InputState {
    /// Creates a new empty input state.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Applies one event.
    ///
    /// The cursor delta covers this event only; anything but a mouse move
    /// leaves it at zero.
    pub fn apply(&mut self, event: &Event) {
        self.prev_mouse_x = self.mouse_x;
        self.prev_mouse_y = self.mouse_y;

        match *event {
            Event::MouseMove { x, y } => {
                self.mouse_x = x;
                self.mouse_y = y;
            }
            Event::Press { button, mods } => {
                if !self.held.contains(&button) {
                    self.held.push(button);
                }
                self.modifiers = mods;
            }
            Event::Release { button, mods } => {
                self.held.retain(|&b| b != button);
                self.modifiers = mods;
            }
            Event::Dummy | Event::Eaten | Event::WindowSize { .. } | Event::Scroll { .. } => {}
        }
    }

    /// Returns the cursor position.
    #[must_use]
    pub const fn mouse(&self) -> Vec2 {
        Vec2::new(self.mouse_x, self.mouse_y)
    }

    /// Returns the cursor movement caused by the current event.
    #[must_use]
    pub fn mouse_delta(&self) -> Vec2 {
        Vec2::new(self.mouse_x - self.prev_mouse_x, self.mouse_y - self.prev_mouse_y)
    }

    /// Returns true if the button is currently held.
    #[must_use]
    pub fn is_held(&self, button: Button) -> bool {
        self.held.contains(&button)
    }

    /// Returns true if either control key is down.
    #[must_use]
    pub fn ctrl_held(&self) -> bool {
        self.modifiers.ctrl
            || self.is_held(Button::Key(Key::LeftControl))
            || self.is_held(Button::Key(Key::RightControl))
    }

    /// Returns true if either shift key is down.
    #[must_use]
    pub fn shift_held(&self) -> bool {
        self.modifiers.shift
            || self.is_held(Button::Key(Key::LeftShift))
            || self.is_held(Button::Key(Key::RightShift))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mouse_button_held() {
        let mut input = InputState::new();

        input.apply(&Event::mouse_press(MouseButton::Left));
        assert!(input.is_held(PRIMARY));

        input.apply(&Event::Dummy);
        assert!(input.is_held(PRIMARY));

        input.apply(&Event::mouse_release(MouseButton::Left));
        assert!(!input.is_held(PRIMARY));
    }

    #[test]
    fn test_mouse_delta_is_per_event() {
        let mut input = InputState::new();
        input.apply(&Event::MouseMove { x: 10.0, y: 5.0 });
        input.apply(&Event::MouseMove { x: 14.0, y: 2.0 });
        assert_eq!(input.mouse_delta(), Vec2::new(4.0, -3.0));

        input.apply(&Event::Scroll { x: 0.0, y: 1.0 });
        assert_eq!(input.mouse_delta(), Vec2::ZERO);
        assert_eq!(input.mouse(), Vec2::new(14.0, 2.0));
    }

    #[test]
    fn test_ctrl_from_key_or_modifiers() {
        let mut input = InputState::new();
        input.apply(&Event::key_press(Key::LeftControl));
        assert!(input.ctrl_held());
        input.apply(&Event::key_release(Key::LeftControl));
        assert!(!input.ctrl_held());

        input.apply(&Event::Press { button: Button::Key(Key::Enter), mods: Modifiers::CTRL });
        assert!(input.ctrl_held());
    }

    #[test]
    fn test_shift_from_key_or_modifiers() {
        let mut input = InputState::new();
        input.apply(&Event::key_press(Key::RightShift));
        assert!(input.shift_held());
        assert!(!input.ctrl_held());
        input.apply(&Event::key_release(Key::RightShift));
        assert!(!input.shift_held());

        input.apply(&Event::Press { button: Button::Key(Key::Tab), mods: Modifiers::SHIFT });
        assert!(input.shift_held());
    }

    #[test]
    fn test_event_predicates() {
        let e = Event::key_press(Key::Enter);
        assert!(e.is_key_press(Key::Enter));
        assert!(!e.is_release(Button::Key(Key::Enter)));
        assert_eq!(Event::Scroll { x: 0.0, y: -2.0 }.scroll(), Some(Vec2::new(0.0, -2.0)));
    }
}
