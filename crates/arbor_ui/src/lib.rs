//! # ARBOR UI
//!
//! Immediate-mode interface on top of a retained box tree:
//! - Boxes keep their identity across frames through hashed label paths
//! - CSS-like rules cascade by specificity and animate into live style
//! - A per-axis, five-pass layout solver handles upward and downward sizes
//! - Hover, press, click and focus signals are derived per event
//!
//! ## Architecture
//!
//! ```text
//! ┌──────────────────────────────────────────────────────────────┐
//! │                     PER-EVENT PIPELINE                       │
//! ├──────────────────────────────────────────────────────────────┤
//! │  Event → Build → Sweep → Cascade → Layout → Hit Test         │
//! │    ↓       ↓       ↓        ↓         ↓         ↓            │
//! │  Input  Signals  Free   Specificity  5 passes  Hovered       │
//! │  State  + Tags   List   + Animation  per axis  singleton     │
//! └──────────────────────────────────────────────────────────────┘
//!                     once per frame: Render → DrawBatch[]
//! ```
//!
//! ## Rules
//!
//! - One [`UiContext`] owns everything; there is no global state
//! - Structural errors abort the frame and are returned to the caller
//! - Glyph failures are logged and never leave the renderer

#![deny(missing_docs)]
#![deny(unsafe_code)]
#![deny(clippy::all)]
#![warn(clippy::pedantic)]
#![deny(clippy::perf)]

pub mod animation;
pub mod cascade;
pub mod clip;
pub mod config;
pub mod context;
pub mod error;
pub mod frame;
pub mod input;
pub mod layout;
pub mod pattern;
pub mod render;
pub mod scroll;
pub mod signal;
pub mod style;
pub mod text;
pub mod tree;
pub mod widget;

pub use cascade::StyleRule;
pub use clip::ClipStack;
pub use config::UiConfig;
pub use context::UiContext;
pub use error::{GlyphError, UiError, UiResult};
pub use frame::{hit_test, FrameOutput};
pub use input::{Button, Event, InputState, Key, Modifiers, MouseButton, PRIMARY};
pub use layout::Rect;
pub use pattern::{Pattern, Specificity};
pub use render::{BatchKind, DrawBatch, RectVertex, Renderer};
pub use signal::{Interaction, Signal};
pub use style::{Align, Attr, Axis, Color, Size, SizeKind, StyleMask, StyleValue, UiStyle};
pub use text::{MonospaceShaper, TextShaper};
pub use tree::{BoxFlags, BoxId, BoxStore, UiBox};
