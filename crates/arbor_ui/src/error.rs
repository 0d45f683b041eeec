//! # UI Error Types
//!
//! Structural errors are fatal: they mean the declarative call tree is
//! wrong, and the frame that hit one is abandoned. Glyph errors are soft and
//! never leave the renderer.

use thiserror::Error;

/// Fatal errors raised while building or driving a frame.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum UiError {
    /// Two boxes resolved to the same key within one pass.
    #[error("box label hash collision: [{existing}] vs [{label}]")]
    KeyCollision {
        /// Label of the box being opened.
        label: String,
        /// Label of the box that already owns the key this pass.
        existing: String,
    },

    /// A `#`, `.` selector with no name after it.
    #[error("expected selector name: [{0}]")]
    ExpectedSelectorName(String),

    /// An atom that does not start with `*`, `#`, `.` or `:`.
    #[error("invalid selector: [{0}]")]
    InvalidSelector(String),

    /// A `:` selector naming an unknown pseudo tag.
    #[error("invalid pseudo tag: [{0}]")]
    InvalidPseudo(String),

    /// A pattern with no segments at all.
    #[error("empty selector pattern")]
    EmptyPattern,

    /// A style rule opened while another one is open.
    #[error("style rule declarations cannot be nested")]
    NestedStyleRule,

    /// A style attribute set with a value of the wrong kind.
    #[error("attribute {attr} expects a value of type {expected}")]
    AttributeKind {
        /// Attribute name.
        attr: &'static str,
        /// Expected value kind.
        expected: &'static str,
    },

    /// An operation that needs an open box was called with none open.
    #[error("no box is open")]
    NoOpenBox,

    /// `end_box` without a matching `begin_box`.
    #[error("end_box called with no open box")]
    UnbalancedEnd,

    /// The build callback returned with boxes still open.
    #[error("{count} box(es) left open at the end of the build")]
    UnclosedBoxes {
        /// Number of boxes still on the stack (root excluded).
        count: usize,
    },

    /// A clip pop that would remove the root clip.
    #[error("clip stack underflow")]
    UnbalancedClip,

    /// Invalid configuration file.
    #[error("invalid configuration: {0}")]
    Config(String),
}

/// Soft failures from the glyph layer.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GlyphError {
    /// The glyph bitmap does not fit in an atlas slot.
    #[error("glyph {glyph} is {width}x{height}, atlas slot is {slot}")]
    TooLarge {
        /// Glyph index.
        glyph: u32,
        /// Bitmap width.
        width: u32,
        /// Bitmap height.
        height: u32,
        /// Atlas slot edge.
        slot: u32,
    },

    /// Shaping or rasterization failed.
    #[error("shaping failed: {0}")]
    Shaping(String),
}

/// Result type for UI operations.
pub type UiResult<T> = Result<T, UiError>;
