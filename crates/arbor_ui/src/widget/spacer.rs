//! Invisible boxes that take up the rest of the parent.

use crate::context::UiContext;
use crate::error::UiResult;
use crate::style::{Attr, Size};
use crate::tree::{BoxFlags, BoxId};

/// Fills the remaining width of the parent.
///
/// # Errors
///
/// [`UiError::KeyCollision`](crate::UiError::KeyCollision) on a reused label.
pub fn hspacer(ui: &mut UiContext, label: &str) -> UiResult<BoxId> {
    ui.boxed(BoxFlags::INVISIBLE, label, |ui, _| {
        ui.style(Attr::Width, Size::percent(1.0, 0.0))
    })
}

/// Fills the remaining height of the parent.
///
/// # Errors
///
/// [`UiError::KeyCollision`](crate::UiError::KeyCollision) on a reused label.
pub fn vspacer(ui: &mut UiContext, label: &str) -> UiResult<BoxId> {
    ui.boxed(BoxFlags::INVISIBLE, label, |ui, _| {
        ui.style(Attr::Height, Size::percent(1.0, 0.0))
    })
}
