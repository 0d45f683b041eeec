//! Widgets built on the public box API.
//!
//! Every widget is a plain function over [`UiContext`](crate::UiContext)
//! returning the handle of its outermost box. Widgets with a body take a
//! closure that declares their children.

mod button;
mod grid;
mod scroll_box;
mod slider;
mod spacer;

pub use button::button;
pub use grid::{grid, grid_cell};
pub use scroll_box::{scroll_bar, scroll_box};
pub use slider::slider;
pub use spacer::{hspacer, vspacer};

use crate::style::{Attr, Axis};

/// Size attribute along `axis`.
const fn size_attr(axis: Axis) -> Attr {
    match axis {
        Axis::Horizontal => Attr::Width,
        Axis::Vertical => Attr::Height,
    }
}

/// Floating offset attribute along `axis`.
const fn float_attr(axis: Axis) -> Attr {
    match axis {
        Axis::Horizontal => Attr::FloatX,
        Axis::Vertical => Attr::FloatY,
    }
}
