//! # Box Style
//!
//! A flat set of independently settable attributes. Every attribute has a
//! bit in [`StyleMask`], which is how style rules record what they set and
//! how the animation system knows what to smooth.

use arbor_core::{Vec2, Vec4};
use bitflags::bitflags;

use crate::error::{UiError, UiResult};

/// RGBA color.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    /// Red component (0-1).
    pub r: f32,
    /// Green component (0-1).
    pub g: f32,
    /// Blue component (0-1).
    pub b: f32,
    /// Alpha component (0-1).
    pub a: f32,
}

impl Color {
    /// Transparent black.
    pub const TRANSPARENT: Self = Self::rgba(0.0, 0.0, 0.0, 0.0);
    /// Solid black.
    pub const BLACK: Self = Self::rgba(0.0, 0.0, 0.0, 1.0);
    /// Solid white.
    pub const WHITE: Self = Self::rgba(1.0, 1.0, 1.0, 1.0);

    /// Creates a color from RGBA values (0-1).
    #[must_use]
    pub const fn rgba(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    /// Creates a color from RGB values (0-1) with full alpha.
    #[must_use]
    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::rgba(r, g, b, 1.0)
    }

    /// Converts to array format.
    #[must_use]
    pub const fn to_array(self) -> [f32; 4] {
        [self.r, self.g, self.b, self.a]
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::TRANSPARENT
    }
}

/// How a box's extent on one axis is determined.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum SizeKind {
    /// Intrinsic size of the box's label text, plus padding.
    Text,
    /// Fixed number of pixels.
    Pixels,
    /// Fraction of the parent's inner extent.
    PercentOfParent,
    /// Sum (or max, on the cross axis) of the children.
    #[default]
    ChildrenSum,
}

/// Size of a box on one axis.
///
/// `strictness` is the fraction of the size that may not be given up when
/// the parent overflows: 1 never shrinks, 0 shrinks freely.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Size {
    /// Sizing mode.
    pub kind: SizeKind,
    /// Pixels or fraction, depending on `kind`.
    pub value: f32,
    /// Resistance to overflow shrinking (0-1).
    pub strictness: f32,
}

impl Size {
    /// Creates a size.
    #[must_use]
    pub const fn new(kind: SizeKind, value: f32, strictness: f32) -> Self {
        Self { kind, value, strictness }
    }

    /// Fixed pixel size.
    #[must_use]
    pub const fn pixels(value: f32, strictness: f32) -> Self {
        Self::new(SizeKind::Pixels, value, strictness)
    }

    /// Fraction of the parent's inner extent.
    #[must_use]
    pub const fn percent(value: f32, strictness: f32) -> Self {
        Self::new(SizeKind::PercentOfParent, value, strictness)
    }

    /// Intrinsic text size.
    #[must_use]
    pub const fn text(strictness: f32) -> Self {
        Self::new(SizeKind::Text, 0.0, strictness)
    }

    /// Sum of the children.
    #[must_use]
    pub const fn children_sum(strictness: f32) -> Self {
        Self::new(SizeKind::ChildrenSum, 0.0, strictness)
    }
}

/// Layout axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Axis {
    /// Left to right.
    #[default]
    Horizontal = 0,
    /// Top to bottom.
    Vertical = 1,
}

impl Axis {
    /// Both axes, in solving order.
    pub const ALL: [Self; 2] = [Self::Horizontal, Self::Vertical];

    /// Index used for per-axis arrays.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The perpendicular axis.
    #[inline]
    #[must_use]
    pub const fn other(self) -> Self {
        match self {
            Self::Horizontal => Self::Vertical,
            Self::Vertical => Self::Horizontal,
        }
    }
}

/// Alignment of children within a box, per axis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Align {
    /// Left/top.
    #[default]
    Start,
    /// Centered.
    Middle,
    /// Right/bottom.
    End,
}

/// Style attribute identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[allow(missing_docs)]
pub enum Attr {
    Width,
    Height,
    Axis,
    BgColor,
    BgColor2,
    TextColor,
    Radius,
    Padding,
    Spacing,
    AlignX,
    AlignY,
    FloatX,
    FloatY,
    OverflowX,
    OverflowY,
    EdgeSoftness,
    BorderColor,
    BorderWidths,
    InsetShadowColor,
    OutsetShadowColor,
    InsetShadowWidth,
    OutsetShadowWidth,
    ShadowOffsets,
    BlurRadius,
    Animation,
    AnimationTime,
}

impl Attr {
    /// Number of attributes.
    pub const COUNT: usize = 26;

    /// Every attribute, in declaration order.
    pub const ALL: [Self; Self::COUNT] = [
        Self::Width,
        Self::Height,
        Self::Axis,
        Self::BgColor,
        Self::BgColor2,
        Self::TextColor,
        Self::Radius,
        Self::Padding,
        Self::Spacing,
        Self::AlignX,
        Self::AlignY,
        Self::FloatX,
        Self::FloatY,
        Self::OverflowX,
        Self::OverflowY,
        Self::EdgeSoftness,
        Self::BorderColor,
        Self::BorderWidths,
        Self::InsetShadowColor,
        Self::OutsetShadowColor,
        Self::InsetShadowWidth,
        Self::OutsetShadowWidth,
        Self::ShadowOffsets,
        Self::BlurRadius,
        Self::Animation,
        Self::AnimationTime,
    ];

    /// Index into per-attribute tables.
    #[inline]
    #[must_use]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// The mask bit for this attribute.
    #[inline]
    #[must_use]
    pub const fn mask(self) -> StyleMask {
        StyleMask::from_bits_truncate(1 << self as u32)
    }

    /// Attribute name, for diagnostics.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Width => "width",
            Self::Height => "height",
            Self::Axis => "axis",
            Self::BgColor => "bg_color",
            Self::BgColor2 => "bg_color2",
            Self::TextColor => "text_color",
            Self::Radius => "radius",
            Self::Padding => "padding",
            Self::Spacing => "spacing",
            Self::AlignX => "align_x",
            Self::AlignY => "align_y",
            Self::FloatX => "float_x",
            Self::FloatY => "float_y",
            Self::OverflowX => "overflow_x",
            Self::OverflowY => "overflow_y",
            Self::EdgeSoftness => "edge_softness",
            Self::BorderColor => "border_color",
            Self::BorderWidths => "border_widths",
            Self::InsetShadowColor => "inset_shadow_color",
            Self::OutsetShadowColor => "outset_shadow_color",
            Self::InsetShadowWidth => "inset_shadow_width",
            Self::OutsetShadowWidth => "outset_shadow_width",
            Self::ShadowOffsets => "shadow_offsets",
            Self::BlurRadius => "blur_radius",
            Self::Animation => "animation",
            Self::AnimationTime => "animation_time",
        }
    }

    /// Name of the value kind this attribute accepts.
    #[must_use]
    pub const fn expected_kind(self) -> &'static str {
        match self {
            Self::Width | Self::Height => "Size",
            Self::Axis => "Axis",
            Self::AlignX | Self::AlignY => "Align",
            Self::OverflowX | Self::OverflowY => "bool",
            Self::Animation => "StyleMask",
            Self::Padding | Self::ShadowOffsets => "Vec2",
            Self::Radius | Self::BorderWidths => "Vec4",
            Self::BgColor
            | Self::BgColor2
            | Self::TextColor
            | Self::BorderColor
            | Self::InsetShadowColor
            | Self::OutsetShadowColor => "Color",
            Self::Spacing
            | Self::FloatX
            | Self::FloatY
            | Self::EdgeSoftness
            | Self::InsetShadowWidth
            | Self::OutsetShadowWidth
            | Self::BlurRadius
            | Self::AnimationTime => "f32",
        }
    }
}

bitflags! {
    /// One bit per [`Attr`].
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct StyleMask: u32 {
        /// Width.
        const WIDTH = 1 << 0;
        /// Height.
        const HEIGHT = 1 << 1;
        /// Layout axis.
        const AXIS = 1 << 2;
        /// Background color.
        const BG_COLOR = 1 << 3;
        /// Gradient color.
        const BG_COLOR2 = 1 << 4;
        /// Text color.
        const TEXT_COLOR = 1 << 5;
        /// Corner radii.
        const RADIUS = 1 << 6;
        /// Padding.
        const PADDING = 1 << 7;
        /// Spacing between children.
        const SPACING = 1 << 8;
        /// Horizontal alignment.
        const ALIGN_X = 1 << 9;
        /// Vertical alignment.
        const ALIGN_Y = 1 << 10;
        /// Horizontal floating offset.
        const FLOAT_X = 1 << 11;
        /// Vertical floating offset.
        const FLOAT_Y = 1 << 12;
        /// Horizontal overflow.
        const OVERFLOW_X = 1 << 13;
        /// Vertical overflow.
        const OVERFLOW_Y = 1 << 14;
        /// Edge softness.
        const EDGE_SOFTNESS = 1 << 15;
        /// Border color.
        const BORDER_COLOR = 1 << 16;
        /// Border widths.
        const BORDER_WIDTHS = 1 << 17;
        /// Inset shadow color.
        const INSET_SHADOW_COLOR = 1 << 18;
        /// Outset shadow color.
        const OUTSET_SHADOW_COLOR = 1 << 19;
        /// Inset shadow width.
        const INSET_SHADOW_WIDTH = 1 << 20;
        /// Outset shadow width.
        const OUTSET_SHADOW_WIDTH = 1 << 21;
        /// Shadow offsets.
        const SHADOW_OFFSETS = 1 << 22;
        /// Background blur radius.
        const BLUR_RADIUS = 1 << 23;
        /// Animation mask.
        const ANIMATION = 1 << 24;
        /// Animation duration.
        const ANIMATION_TIME = 1 << 25;
    }
}

/// A value for one style attribute.
#[derive(Debug, Clone, Copy, PartialEq)]
#[allow(missing_docs)]
pub enum StyleValue {
    Size(Size),
    Axis(Axis),
    Align(Align),
    Flag(bool),
    Mask(StyleMask),
    Scalar(f32),
    Vec2(Vec2),
    Vec4(Vec4),
    Color(Color),
}

impl From<Size> for StyleValue {
    fn from(v: Size) -> Self {
        Self::Size(v)
    }
}

impl From<Axis> for StyleValue {
    fn from(v: Axis) -> Self {
        Self::Axis(v)
    }
}

impl From<Align> for StyleValue {
    fn from(v: Align) -> Self {
        Self::Align(v)
    }
}

impl From<bool> for StyleValue {
    fn from(v: bool) -> Self {
        Self::Flag(v)
    }
}

impl From<StyleMask> for StyleValue {
    fn from(v: StyleMask) -> Self {
        Self::Mask(v)
    }
}

impl From<f32> for StyleValue {
    fn from(v: f32) -> Self {
        Self::Scalar(v)
    }
}

impl From<Vec2> for StyleValue {
    fn from(v: Vec2) -> Self {
        Self::Vec2(v)
    }
}

impl From<Vec4> for StyleValue {
    fn from(v: Vec4) -> Self {
        Self::Vec4(v)
    }
}

impl From<Color> for StyleValue {
    fn from(v: Color) -> Self {
        Self::Color(v)
    }
}

/// Resolved style of a box.
///
/// Edge-ordered `Vec4`s (`border_widths`) are left, top, right, bottom.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UiStyle {
    /// Width and height.
    pub size: [Size; 2],
    /// Axis along which children flow.
    pub axis: Axis,
    /// Background color (top edge of the gradient).
    pub bg_color: Color,
    /// Bottom edge of a vertical gradient; `None` draws a flat fill.
    pub bg_color2: Option<Color>,
    /// Label text color.
    pub text_color: Color,
    /// Corner radii.
    pub radius: Vec4,
    /// Inner padding per axis.
    pub padding: Vec2,
    /// Gap between flowing children.
    pub spacing: f32,
    /// Child alignment per axis.
    pub align: [Align; 2],
    /// Anti-aliasing width of the edges.
    pub edge_softness: f32,
    /// Offset from the parent's origin; `None` flows normally.
    pub floating: [Option<f32>; 2],
    /// Whether children may exceed the box per axis.
    pub overflow: [bool; 2],
    /// Border color.
    pub border_color: Color,
    /// Border widths (left, top, right, bottom).
    pub border_widths: Vec4,
    /// Inset shadow color.
    pub inset_shadow_color: Color,
    /// Outset shadow color.
    pub outset_shadow_color: Color,
    /// Inset shadow width.
    pub inset_shadow_width: f32,
    /// Outset shadow width.
    pub outset_shadow_width: f32,
    /// Shadow offsets.
    pub shadow_offsets: Vec2,
    /// Background blur radius; 0 disables blur.
    pub blur_radius: f32,
    /// Attributes smoothed over time instead of snapped.
    pub animation_mask: StyleMask,
    /// Smoothing duration in seconds.
    pub animation_time: f32,
}

impl UiStyle {
    /// Style every box starts each pass with.
    pub const DEFAULT: Self = Self {
        size: [Size::children_sum(0.0), Size::children_sum(0.0)],
        axis: Axis::Horizontal,
        bg_color: Color::TRANSPARENT,
        bg_color2: None,
        text_color: Color::rgba(1.0, 1.0, 1.0, 0.8),
        radius: Vec4::ZERO,
        padding: Vec2::ZERO,
        spacing: 0.0,
        align: [Align::Start, Align::Start],
        edge_softness: 1.0,
        floating: [None, None],
        overflow: [false, false],
        border_color: Color::TRANSPARENT,
        border_widths: Vec4::ZERO,
        inset_shadow_color: Color::TRANSPARENT,
        outset_shadow_color: Color::TRANSPARENT,
        inset_shadow_width: 0.0,
        outset_shadow_width: 0.0,
        shadow_offsets: Vec2::ZERO,
        blur_radius: 0.0,
        animation_mask: StyleMask::empty(),
        animation_time: 0.15,
    };

    /// Sets one attribute.
    ///
    /// # Errors
    ///
    /// [`UiError::AttributeKind`] if `value` is not the kind `attr` takes.
    pub fn set(&mut self, attr: Attr, value: StyleValue) -> UiResult<()> {
        use StyleValue as V;

        match (attr, value) {
            (Attr::Width, V::Size(v)) => self.size[0] = v,
            (Attr::Height, V::Size(v)) => self.size[1] = v,
            (Attr::Axis, V::Axis(v)) => self.axis = v,
            (Attr::BgColor, V::Color(v)) => self.bg_color = v,
            (Attr::BgColor2, V::Color(v)) => self.bg_color2 = Some(v),
            (Attr::TextColor, V::Color(v)) => self.text_color = v,
            (Attr::Radius, V::Vec4(v)) => self.radius = v,
            (Attr::Padding, V::Vec2(v)) => self.padding = v,
            (Attr::Spacing, V::Scalar(v)) => self.spacing = v,
            (Attr::AlignX, V::Align(v)) => self.align[0] = v,
            (Attr::AlignY, V::Align(v)) => self.align[1] = v,
            (Attr::FloatX, V::Scalar(v)) => self.floating[0] = (!v.is_nan()).then_some(v),
            (Attr::FloatY, V::Scalar(v)) => self.floating[1] = (!v.is_nan()).then_some(v),
            (Attr::OverflowX, V::Flag(v)) => self.overflow[0] = v,
            (Attr::OverflowY, V::Flag(v)) => self.overflow[1] = v,
            (Attr::EdgeSoftness, V::Scalar(v)) => self.edge_softness = v,
            (Attr::BorderColor, V::Color(v)) => self.border_color = v,
            (Attr::BorderWidths, V::Vec4(v)) => self.border_widths = v,
            (Attr::InsetShadowColor, V::Color(v)) => self.inset_shadow_color = v,
            (Attr::OutsetShadowColor, V::Color(v)) => self.outset_shadow_color = v,
            (Attr::InsetShadowWidth, V::Scalar(v)) => self.inset_shadow_width = v,
            (Attr::OutsetShadowWidth, V::Scalar(v)) => self.outset_shadow_width = v,
            (Attr::ShadowOffsets, V::Vec2(v)) => self.shadow_offsets = v,
            (Attr::BlurRadius, V::Scalar(v)) => self.blur_radius = v,
            (Attr::Animation, V::Mask(v)) => self.animation_mask = v,
            (Attr::AnimationTime, V::Scalar(v)) => self.animation_time = v,
            (attr, _) => {
                tracing::error!("attribute {} set with a value of the wrong kind", attr.name());
                return Err(UiError::AttributeKind {
                    attr: attr.name(),
                    expected: attr.expected_kind(),
                });
            }
        }

        Ok(())
    }

    /// Copies one attribute from another style.
    pub fn copy_attr(&mut self, from: &Self, attr: Attr) {
        match attr {
            Attr::Width => self.size[0] = from.size[0],
            Attr::Height => self.size[1] = from.size[1],
            Attr::Axis => self.axis = from.axis,
            Attr::BgColor => self.bg_color = from.bg_color,
            Attr::BgColor2 => self.bg_color2 = from.bg_color2,
            Attr::TextColor => self.text_color = from.text_color,
            Attr::Radius => self.radius = from.radius,
            Attr::Padding => self.padding = from.padding,
            Attr::Spacing => self.spacing = from.spacing,
            Attr::AlignX => self.align[0] = from.align[0],
            Attr::AlignY => self.align[1] = from.align[1],
            Attr::FloatX => self.floating[0] = from.floating[0],
            Attr::FloatY => self.floating[1] = from.floating[1],
            Attr::OverflowX => self.overflow[0] = from.overflow[0],
            Attr::OverflowY => self.overflow[1] = from.overflow[1],
            Attr::EdgeSoftness => self.edge_softness = from.edge_softness,
            Attr::BorderColor => self.border_color = from.border_color,
            Attr::BorderWidths => self.border_widths = from.border_widths,
            Attr::InsetShadowColor => self.inset_shadow_color = from.inset_shadow_color,
            Attr::OutsetShadowColor => self.outset_shadow_color = from.outset_shadow_color,
            Attr::InsetShadowWidth => self.inset_shadow_width = from.inset_shadow_width,
            Attr::OutsetShadowWidth => self.outset_shadow_width = from.outset_shadow_width,
            Attr::ShadowOffsets => self.shadow_offsets = from.shadow_offsets,
            Attr::BlurRadius => self.blur_radius = from.blur_radius,
            Attr::Animation => self.animation_mask = from.animation_mask,
            Attr::AnimationTime => self.animation_time = from.animation_time,
        }
    }

    /// Size on an axis.
    #[inline]
    #[must_use]
    pub const fn size_on(&self, axis: Axis) -> Size {
        self.size[axis.index()]
    }

    /// Padding on an axis.
    #[inline]
    #[must_use]
    pub const fn padding_on(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.padding.x,
            Axis::Vertical => self.padding.y,
        }
    }

    /// Floating offset on an axis.
    #[inline]
    #[must_use]
    pub const fn floating_on(&self, axis: Axis) -> Option<f32> {
        self.floating[axis.index()]
    }
}

impl Default for UiStyle {
    fn default() -> Self {
        Self::DEFAULT
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_style() {
        let s = UiStyle::default();
        assert_eq!(s.size[0].kind, SizeKind::ChildrenSum);
        assert_eq!(s.size[1].kind, SizeKind::ChildrenSum);
        assert!(s.bg_color2.is_none());
        assert_eq!(s.text_color, Color::rgba(1.0, 1.0, 1.0, 0.8));
        assert_eq!(s.edge_softness, 1.0);
        assert_eq!(s.floating, [None, None]);
        assert!((s.animation_time - 0.15).abs() < f32::EPSILON);
    }

    #[test]
    fn test_attr_mask_matches_bitflags() {
        assert_eq!(Attr::Width.mask(), StyleMask::WIDTH);
        assert_eq!(Attr::BgColor.mask(), StyleMask::BG_COLOR);
        assert_eq!(Attr::AnimationTime.mask(), StyleMask::ANIMATION_TIME);
        for (i, attr) in Attr::ALL.iter().enumerate() {
            assert_eq!(attr.index(), i);
        }
    }

    #[test]
    fn test_set_wrong_kind_fails() {
        let mut s = UiStyle::default();
        let err = s.set(Attr::Width, StyleValue::Scalar(10.0)).unwrap_err();
        assert_eq!(
            err,
            UiError::AttributeKind { attr: "width", expected: "Size" }
        );
        assert_eq!(s, UiStyle::default());
    }

    #[test]
    fn test_set_floating_nan_clears() {
        let mut s = UiStyle::default();
        s.set(Attr::FloatX, 12.0_f32.into()).unwrap();
        assert_eq!(s.floating_on(Axis::Horizontal), Some(12.0));
        s.set(Attr::FloatX, f32::NAN.into()).unwrap();
        assert_eq!(s.floating_on(Axis::Horizontal), None);
    }

    #[test]
    fn test_copy_attr_only_touches_one_field() {
        let mut src = UiStyle::default();
        src.set(Attr::BgColor, Color::WHITE.into()).unwrap();
        src.set(Attr::Spacing, 4.0_f32.into()).unwrap();

        let mut dst = UiStyle::default();
        dst.copy_attr(&src, Attr::BgColor);

        assert_eq!(dst.bg_color, Color::WHITE);
        assert_eq!(dst.spacing, 0.0);
    }

    #[test]
    fn test_color_defaults_to_transparent() {
        assert_eq!(Color::default(), Color::TRANSPARENT);
        assert_eq!(Color::rgb(0.25, 0.5, 1.0).to_array(), [0.25, 0.5, 1.0, 1.0]);
    }
}
