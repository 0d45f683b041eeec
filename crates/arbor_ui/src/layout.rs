//! # Layout Solver
//!
//! Sizes and positions every box declared this pass, one axis at a time.
//!
//! ```text
//! per axis:
//!   1. standalone   pre-order   Pixels, Text
//!   2. downward     post-order  ChildrenSum (sum on own axis, max across)
//!   3. upward       pre-order   PercentOfParent
//!   4. overflow     pre-order   shrink children by their slack
//!   5. position     pre-order   flow, alignment, floating, floor
//! ```
//!
//! A `ChildrenSum` parent with a `PercentOfParent` child on the same axis
//! would need its own size to compute itself. The downward pass breaks that
//! cycle by turning the parent into `PercentOfParent(1)` for this layout.

use arbor_core::{Pool, Vec2, Vec4};

use crate::style::{Align, Axis, Size, SizeKind};
use crate::tree::{BoxId, BoxStore, UiBox};

/// A rectangle in screen coordinates.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Rect {
    /// X position (left edge).
    pub x: f32,
    /// Y position (top edge).
    pub y: f32,
    /// Width.
    pub width: f32,
    /// Height.
    pub height: f32,
}

impl Rect {
    /// A zero-sized rect at the origin.
    pub const ZERO: Self = Self {
        x: 0.0,
        y: 0.0,
        width: 0.0,
        height: 0.0,
    };

    /// Creates a new rectangle.
    #[must_use]
    pub const fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Self { x, y, width, height }
    }

    /// Returns the right edge.
    #[must_use]
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    /// Returns the bottom edge.
    #[must_use]
    pub fn bottom(&self) -> f32 {
        self.y + self.height
    }

    /// Origin on `axis`.
    #[inline]
    #[must_use]
    pub const fn pos(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.x,
            Axis::Vertical => self.y,
        }
    }

    /// Extent on `axis`.
    #[inline]
    #[must_use]
    pub const fn size(&self, axis: Axis) -> f32 {
        match axis {
            Axis::Horizontal => self.width,
            Axis::Vertical => self.height,
        }
    }

    /// Sets the origin on `axis`.
    #[inline]
    pub fn set_pos(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.x = value,
            Axis::Vertical => self.y = value,
        }
    }

    /// Sets the extent on `axis`.
    #[inline]
    pub fn set_size(&mut self, axis: Axis, value: f32) {
        match axis {
            Axis::Horizontal => self.width = value,
            Axis::Vertical => self.height = value,
        }
    }

    /// Returns true if the point lies strictly inside; edges do not count.
    #[must_use]
    pub fn contains_strict(&self, point: Vec2) -> bool {
        point.x > self.x && point.x < self.right() && point.y > self.y && point.y < self.bottom()
    }

    /// Intersection of two rectangles. Disjoint inputs give an empty rect
    /// (zero width or height), never a negative one.
    #[must_use]
    pub fn intersect(&self, other: &Self) -> Self {
        let x = self.x.max(other.x);
        let y = self.y.max(other.y);
        let right = self.right().min(other.right());
        let bottom = self.bottom().min(other.bottom());

        Self::new(x, y, (right - x).max(0.0), (bottom - y).max(0.0))
    }

    /// Shrinks by per-edge amounts (left, top, right, bottom).
    #[must_use]
    pub fn inset(&self, edges: Vec4) -> Self {
        Self::new(
            self.x + edges.x,
            self.y + edges.y,
            self.width - edges.x - edges.z,
            self.height - edges.y - edges.w,
        )
    }

    /// Expands the rectangle by the given amount on all sides.
    #[must_use]
    pub fn expand(&self, amount: f32) -> Self {
        Self::new(
            self.x - amount,
            self.y - amount,
            self.width + amount * 2.0,
            self.height + amount * 2.0,
        )
    }

    /// Rounds every component down to whole pixels.
    #[must_use]
    pub fn floor(&self) -> Self {
        Self::new(self.x.floor(), self.y.floor(), self.width.floor(), self.height.floor())
    }
}

/// Offset of content of extent `content` inside a box of extent `size`.
#[inline]
#[must_use]
pub fn align_offset(align: Align, size: f32, content: f32) -> f32 {
    match align {
        Align::Start => 0.0,
        Align::Middle => (size / 2.0 - content / 2.0).floor(),
        Align::End => size - content,
    }
}

/// Runs all five passes on both axes.
pub fn solve(store: &mut BoxStore) {
    let BoxStore { pool, depth_first, .. } = store;
    for axis in Axis::ALL {
        solve_axis(pool, depth_first, axis);
    }
}

fn solve_axis(pool: &mut Pool<UiBox>, order: &[BoxId], axis: Axis) {
    standalone_pass(pool, order, axis);
    downward_pass(pool, order, axis);
    upward_pass(pool, order, axis);
    overflow_pass(pool, order, axis);
    position_pass(pool, order, axis);
}

#[inline]
fn node(pool: &Pool<UiBox>, id: BoxId) -> &UiBox {
    &pool[id.handle()]
}

#[inline]
fn node_mut(pool: &mut Pool<UiBox>, id: BoxId) -> &mut UiBox {
    &mut pool[id.handle()]
}

fn is_floating(node: &UiBox, axis: Axis) -> bool {
    node.style.floating_on(axis).is_some()
}

/// Sum of the in-flow children on `axis` plus the spacing between them.
fn flow_extent(pool: &Pool<UiBox>, id: BoxId, axis: Axis) -> f32 {
    let parent = node(pool, id);
    let mut total = 0.0;
    let mut count = 0_u32;
    for &c in &parent.children {
        let child = node(pool, c);
        if !is_floating(child, axis) {
            total += child.rect.size(axis);
            count += 1;
        }
    }
    if count > 1 {
        #[allow(clippy::cast_precision_loss)]
        let gaps = (count - 1) as f32;
        total += gaps * parent.style.spacing;
    }
    total
}

fn standalone_pass(pool: &mut Pool<UiBox>, order: &[BoxId], axis: Axis) {
    for &id in order {
        let b = node_mut(pool, id);
        let size = b.style.size_on(axis);
        match size.kind {
            SizeKind::Pixels => b.rect.set_size(axis, size.value),
            SizeKind::Text => {
                let extent = b.text_rect.size(axis) + 2.0 * b.style.padding_on(axis);
                b.rect.set_size(axis, extent);
            }
            SizeKind::ChildrenSum | SizeKind::PercentOfParent => {}
        }
    }
}

fn downward_pass(pool: &mut Pool<UiBox>, order: &[BoxId], axis: Axis) {
    let i = axis.index();

    for &id in order.iter().rev() {
        let b = node(pool, id);
        if b.style.size[i].kind != SizeKind::ChildrenSum {
            continue;
        }

        let percent_child = b
            .children
            .iter()
            .any(|&c| node(pool, c).style.size[i].kind == SizeKind::PercentOfParent);

        if percent_child {
            let b = node_mut(pool, id);
            let strictness = b.style.size[i].strictness;
            b.style.size[i] = Size::percent(1.0, strictness);
            tracing::debug!("layout cycle: [{}] {:?} reclassified to percent(1)", b.label, axis);
            continue;
        }

        let pad = b.style.padding_on(axis);
        let size = if b.style.axis == axis {
            2.0 * pad + flow_extent(pool, id, axis)
        } else {
            b.children
                .iter()
                .map(|&c| node(pool, c))
                .filter(|c| !is_floating(c, axis))
                .fold(2.0 * pad, |acc, c| acc.max(c.rect.size(axis) + 2.0 * pad))
        };

        node_mut(pool, id).rect.set_size(axis, size);
    }
}

fn upward_pass(pool: &mut Pool<UiBox>, order: &[BoxId], axis: Axis) {
    for &id in order {
        let b = node(pool, id);
        let size = b.style.size_on(axis);
        if size.kind != SizeKind::PercentOfParent {
            continue;
        }
        let Some(parent) = b.parent.map(|p| node(pool, p)) else {
            continue;
        };

        let inner = parent.rect.size(axis) - 2.0 * parent.style.padding_on(axis);
        node_mut(pool, id).rect.set_size(axis, size.value * inner);
    }
}

fn slack(child: &UiBox, axis: Axis) -> f32 {
    child.rect.size(axis) * (1.0 - child.style.size_on(axis).strictness)
}

fn overflow_pass(pool: &mut Pool<UiBox>, order: &[BoxId], axis: Axis) {
    let i = axis.index();

    for &id in order {
        let b = node(pool, id);
        if b.style.overflow[i] || b.children.is_empty() {
            continue;
        }

        let inner = b.rect.size(axis) - 2.0 * b.style.padding_on(axis);

        if b.style.axis == axis {
            let overflow = flow_extent(pool, id, axis) - inner;
            if overflow <= 0.0 {
                continue;
            }

            let total_slack: f32 = b
                .children
                .iter()
                .map(|&c| node(pool, c))
                .filter(|c| !is_floating(c, axis))
                .map(|c| slack(c, axis))
                .sum();

            if total_slack < overflow {
                continue;
            }

            let fraction = overflow / total_slack;
            for k in 0..node(pool, id).children.len() {
                let cid = node(pool, id).children[k];
                let c = node_mut(pool, cid);
                if is_floating(c, axis) {
                    continue;
                }
                let cut = slack(c, axis) * fraction;
                let size = c.rect.size(axis);
                c.rect.set_size(axis, size - cut);
            }
        } else {
            for k in 0..b.children.len() {
                let cid = node(pool, id).children[k];
                let c = node_mut(pool, cid);
                if is_floating(c, axis) {
                    continue;
                }
                let size = c.rect.size(axis);
                let overflow = size - inner;
                if overflow > 0.0 && slack(c, axis) >= overflow {
                    c.rect.set_size(axis, size - overflow);
                }
            }
        }
    }
}

fn position_pass(pool: &mut Pool<UiBox>, order: &[BoxId], axis: Axis) {
    let i = axis.index();

    for &id in order {
        let b = node(pool, id);
        if b.children.is_empty() {
            continue;
        }

        let origin = b.rect.pos(axis);
        let size = b.rect.size(axis);
        let pad = b.style.padding_on(axis);
        let spacing = b.style.spacing;
        let align = b.style.align[i];
        let offset = b.content.pos(axis);
        let flow = b.style.axis == axis;

        if flow {
            let content = 2.0 * pad + flow_extent(pool, id, axis);
            node_mut(pool, id).content.set_size(axis, content.floor());

            let mut cursor = origin + pad + align_offset(align, size, content) + offset;
            for k in 0..node(pool, id).children.len() {
                let cid = node(pool, id).children[k];
                let c = node_mut(pool, cid);
                if let Some(float) = c.style.floating_on(axis) {
                    c.rect.set_pos(axis, origin + float);
                } else {
                    c.rect.set_pos(axis, cursor);
                    cursor += c.rect.size(axis) + spacing;
                }
            }
        } else {
            let mut content_max = 0.0_f32;
            for k in 0..node(pool, id).children.len() {
                let cid = node(pool, id).children[k];
                let c = node_mut(pool, cid);
                if let Some(float) = c.style.floating_on(axis) {
                    c.rect.set_pos(axis, origin + float);
                } else {
                    let content = c.rect.size(axis) + 2.0 * pad;
                    content_max = content_max.max(content).floor();
                    c.rect.set_pos(axis, origin + pad + align_offset(align, size, content) + offset);
                }
            }
            node_mut(pool, id).content.set_size(axis, content_max);
        }

        for k in 0..node(pool, id).children.len() {
            let cid = node(pool, id).children[k];
            let c = node_mut(pool, cid);
            c.rect = c.rect.floor();
        }
    }
}
