//! UI rendering hand-off.
//!
//! Walks the solved tree and emits vertex batches for a GPU backend. The
//! engine never issues draw calls; a batch boundary is where the backend
//! has to flush (clip change, blur, or a full buffer).
//!
//! Vertex positions are in window pixels with the Y axis pointing up, the
//! way a GL viewport expects them.

use arbor_core::{Vec2, Vec4};

use crate::clip::ClipStack;
use crate::error::UiResult;
use crate::layout::Rect;
use crate::style::{Color, UiStyle};
use crate::text::{layout_text, TextShaper};
use crate::tree::{BoxFlags, BoxId, BoxStore};

/// One corner of a rect quad. Six of these make a rect.
#[repr(C)]
#[derive(Debug, Clone, Copy, Default, PartialEq, bytemuck::Pod, bytemuck::Zeroable)]
pub struct RectVertex {
    /// Corner position.
    pub position: [f32; 2],
    /// Fill colour at this corner.
    pub color: [f32; 4],
    /// Top-left of the expanded rect.
    pub top_left: [f32; 2],
    /// Bottom-right of the expanded rect.
    pub bottom_right: [f32; 2],
    /// Corner radii.
    pub radius: [f32; 4],
    /// Anti-aliasing width.
    pub edge_softness: f32,
    /// Border colour.
    pub border_color: [f32; 4],
    /// Border widths (left, top, right, bottom).
    pub border_widths: [f32; 4],
    /// Inner shadow colour.
    pub inset_shadow_color: [f32; 4],
    /// Drop shadow colour.
    pub outset_shadow_color: [f32; 4],
    /// Drop shadow width.
    pub outset_shadow_width: f32,
    /// Inner shadow width.
    pub inset_shadow_width: f32,
    /// Shadow offsets.
    pub shadow_offsets: [f32; 2],
    /// Atlas coordinates in pixels.
    pub uv: [f32; 2],
    /// Glyph tint.
    pub text_color: [f32; 4],
    /// 1.0 for coverage glyphs, 0.0 otherwise.
    pub text_is_grayscale: f32,
}

/// Everything needed to emit one rect quad.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RectAttributes {
    /// Rect in window pixels, Y down.
    pub rect: Rect,
    /// Top colour.
    pub color: Color,
    /// Bottom colour; `None` for a flat fill.
    pub color2: Option<Color>,
    /// Corner radii.
    pub radius: Vec4,
    /// Anti-aliasing width.
    pub edge_softness: f32,
    /// Border colour.
    pub border_color: Color,
    /// Border widths.
    pub border_widths: Vec4,
    /// Inner shadow colour.
    pub inset_shadow_color: Color,
    /// Drop shadow colour.
    pub outset_shadow_color: Color,
    /// Inner shadow width.
    pub inset_shadow_width: f32,
    /// Drop shadow width.
    pub outset_shadow_width: f32,
    /// Shadow offsets.
    pub shadow_offsets: Vec2,
    /// Atlas region (x, y, w, h).
    pub texture_rect: Vec4,
    /// Glyph tint.
    pub text_color: Color,
    /// Coverage glyph.
    pub text_is_grayscale: bool,
}

impl RectAttributes {
    /// Attributes of a box background.
    #[must_use]
    pub fn from_style(rect: Rect, style: &UiStyle) -> Self {
        Self {
            rect,
            color: style.bg_color,
            color2: style.bg_color2,
            radius: style.radius,
            edge_softness: style.edge_softness,
            border_color: style.border_color,
            border_widths: style.border_widths,
            inset_shadow_color: style.inset_shadow_color,
            outset_shadow_color: style.outset_shadow_color,
            inset_shadow_width: style.inset_shadow_width,
            outset_shadow_width: style.outset_shadow_width,
            shadow_offsets: style.shadow_offsets,
            ..Self::default()
        }
    }
}

/// What a batch asks the backend to do.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BatchKind {
    /// Draw the vertices as triangles.
    Rects,
    /// Blur what is already drawn under `rect`.
    Blur {
        /// Region to blur, Y down.
        rect: Rect,
        /// Kernel radius, at least 1.
        radius: f32,
        /// Corner radii of the blurred region.
        corner_radius: Vec4,
    },
}

/// A run of work with one clip rect.
#[derive(Debug, Clone)]
pub struct DrawBatch {
    /// Batch kind.
    pub kind: BatchKind,
    /// Vertices; empty for blur batches.
    pub vertices: Vec<RectVertex>,
    /// Scissor rect, Y down.
    pub clip: Rect,
}

/// Collects vertices and cuts them into batches.
#[derive(Debug)]
pub struct Renderer {
    vertices: Vec<RectVertex>,
    batches: Vec<DrawBatch>,
    clip: ClipStack,
    max_batch_vertices: usize,
    line_spacing: f32,
    window_height: f32,
}

impl Renderer {
    /// Creates a renderer.
    #[must_use]
    pub fn new(max_batch_vertices: usize, line_spacing: f32) -> Self {
        Self {
            vertices: Vec::with_capacity(max_batch_vertices),
            batches: Vec::with_capacity(64),
            clip: ClipStack::default(),
            max_batch_vertices: max_batch_vertices.max(6),
            line_spacing,
            window_height: 0.0,
        }
    }

    /// Begins a new frame.
    pub fn begin_frame(&mut self, window: Rect) {
        self.vertices.clear();
        self.batches.clear();
        self.clip.set_root(window);
        self.window_height = window.height;
    }

    /// Closes the pending batch, if it has anything in it.
    pub fn flush(&mut self) {
        if self.vertices.is_empty() {
            return;
        }
        let vertices = std::mem::replace(&mut self.vertices, Vec::with_capacity(self.max_batch_vertices));
        self.batches.push(DrawBatch {
            kind: BatchKind::Rects,
            vertices,
            clip: self.clip.top(),
        });
    }

    /// Emits one quad.
    pub fn draw_rect(&mut self, a: &RectAttributes) {
        if self.vertices.len() + 6 >= self.max_batch_vertices {
            self.flush();
        }

        let color = a.color.to_array();
        let color2 = a.color2.unwrap_or(a.color).to_array();

        let grow = 2.0 * a.outset_shadow_width + 2.0 * a.edge_softness;
        let left = a.rect.x - grow;
        let right = a.rect.right() + grow;
        let top = self.window_height - (a.rect.y - grow);
        let bottom = self.window_height - (a.rect.bottom() + grow);

        let tr = a.texture_rect;
        let vertex = |x: f32, y: f32, u: f32, v: f32, color: [f32; 4]| RectVertex {
            position: [x, y],
            color,
            top_left: [left, top],
            bottom_right: [right, bottom],
            radius: a.radius.to_array(),
            edge_softness: a.edge_softness,
            border_color: a.border_color.to_array(),
            border_widths: a.border_widths.to_array(),
            inset_shadow_color: a.inset_shadow_color.to_array(),
            outset_shadow_color: a.outset_shadow_color.to_array(),
            outset_shadow_width: a.outset_shadow_width,
            inset_shadow_width: a.inset_shadow_width,
            shadow_offsets: a.shadow_offsets.to_array(),
            uv: [u, v],
            text_color: a.text_color.to_array(),
            text_is_grayscale: if a.text_is_grayscale { 1.0 } else { 0.0 },
        };

        self.vertices.extend_from_slice(&[
            vertex(left, top, tr.x, tr.y, color),
            vertex(left, bottom, tr.x, tr.y + tr.w, color2),
            vertex(right, bottom, tr.x + tr.z, tr.y + tr.w, color2),
            vertex(right, bottom, tr.x + tr.z, tr.y + tr.w, color2),
            vertex(right, top, tr.x + tr.z, tr.y, color),
            vertex(left, top, tr.x, tr.y, color),
        ]);
    }

    /// Renders the tree rooted at the first declared box.
    ///
    /// Text boxes get their `text_rect` updated.
    ///
    /// # Errors
    ///
    /// Only on an unbalanced clip, which a well-formed tree never produces.
    pub fn render(
        &mut self,
        store: &mut BoxStore,
        shaper: &mut dyn TextShaper,
        window: Rect,
    ) -> UiResult<Vec<DrawBatch>> {
        self.begin_frame(window);
        if let Some(root) = store.root() {
            self.render_box(store, shaper, root)?;
        }
        Ok(self.end_frame())
    }

    /// Flushes and hands over the frame's batches.
    pub fn end_frame(&mut self) -> Vec<DrawBatch> {
        self.flush();
        std::mem::take(&mut self.batches)
    }

    fn render_box(&mut self, store: &mut BoxStore, shaper: &mut dyn TextShaper, id: BoxId) -> UiResult<()> {
        let node = &store[id];
        let style = node.style;
        let rect = node.rect;
        let flags = node.flags;

        if style.blur_radius != 0.0 {
            self.flush();
            self.batches.push(DrawBatch {
                kind: BatchKind::Blur {
                    rect,
                    radius: style.blur_radius.trunc().max(1.0),
                    corner_radius: style.radius,
                },
                vertices: Vec::new(),
                clip: self.clip.top(),
            });
        }

        if !flags.contains(BoxFlags::INVISIBLE) {
            self.draw_rect(&RectAttributes::from_style(rect, &style));
        }

        let clipping = flags.contains(BoxFlags::CLIPPING);
        if clipping {
            self.flush();
            self.clip.push_box(store, id);
        }

        for k in 0..store[id].children.len() {
            let child = store[id].children[k];
            self.render_box(store, shaper, child)?;
        }

        if flags.contains(BoxFlags::DRAW_TEXT) {
            let text_rect = store[id].text_rect;
            let origin = Vec2::new(
                (rect.x + rect.width / 2.0 - text_rect.width / 2.0).floor(),
                (rect.y + rect.height / 2.0 + text_rect.height / 2.0).floor(),
            );
            let (glyphs, measured) = layout_text(shaper, &store[id].label, origin, self.line_spacing);
            for glyph in &glyphs {
                self.draw_rect(&RectAttributes {
                    rect: glyph.rect,
                    texture_rect: glyph.slot.texture_rect,
                    text_color: style.text_color,
                    text_is_grayscale: glyph.slot.grayscale,
                    ..RectAttributes::default()
                });
            }
            store[id].text_rect = measured;
        }

        if clipping {
            self.flush();
            self.clip.pop()?;
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::text::MonospaceShaper;

    fn window() -> Rect {
        Rect::new(0.0, 0.0, 800.0, 600.0)
    }

    fn tree(flags: &[BoxFlags]) -> (BoxStore, Vec<BoxId>) {
        let mut store = BoxStore::new();
        store.begin_pass();
        let mut ids = vec![store.begin_box(BoxFlags::empty(), "root").unwrap()];
        store[ids[0]].rect = window();
        for (i, f) in flags.iter().enumerate() {
            let id = store.begin_box(*f, &format!("b{i}")).unwrap();
            store[id].rect = Rect::new(10.0, 10.0, 100.0, 40.0);
            store[id].style.edge_softness = 0.0;
            ids.push(id);
            store.end_box().unwrap();
        }
        store.end_box().unwrap();
        (store, ids)
    }

    #[test]
    fn test_quad_corners_and_gradient() {
        let mut r = Renderer::new(2400, 2.0);
        r.begin_frame(window());
        r.draw_rect(&RectAttributes {
            rect: Rect::new(10.0, 20.0, 100.0, 50.0),
            color: Color::WHITE,
            color2: Some(Color::BLACK),
            ..RectAttributes::default()
        });
        let batches = r.end_frame();

        assert_eq!(batches.len(), 1);
        let v = &batches[0].vertices;
        assert_eq!(v.len(), 6);
        assert_eq!(v[0].position, [10.0, 580.0]);
        assert_eq!(v[2].position, [110.0, 530.0]);
        assert_eq!(v[0].color, Color::WHITE.to_array());
        assert_eq!(v[1].color, Color::BLACK.to_array());
        assert_eq!(v[5], v[0]);
    }

    #[test]
    fn test_shadow_room_is_added() {
        let mut r = Renderer::new(2400, 2.0);
        r.begin_frame(window());
        r.draw_rect(&RectAttributes {
            rect: Rect::new(10.0, 10.0, 10.0, 10.0),
            outset_shadow_width: 3.0,
            edge_softness: 1.0,
            ..RectAttributes::default()
        });
        let v = r.end_frame().remove(0).vertices;
        assert_eq!(v[0].top_left[0], 2.0);
        assert_eq!(v[0].bottom_right[0], 28.0);
    }

    #[test]
    fn test_full_batch_is_split() {
        let mut r = Renderer::new(12, 2.0);
        r.begin_frame(window());
        for _ in 0..3 {
            r.draw_rect(&RectAttributes::default());
        }
        let batches = r.end_frame();
        assert_eq!(batches.len(), 3);
        assert!(batches.iter().all(|b| b.vertices.len() == 6));
    }

    #[test]
    fn test_invisible_boxes_emit_nothing() {
        let (mut store, _) = tree(&[BoxFlags::INVISIBLE, BoxFlags::empty()]);
        let mut shaper = MonospaceShaper::new(8.0, 16.0, 32);
        let batches = Renderer::new(2400, 2.0).render(&mut store, &mut shaper, window()).unwrap();
        let total: usize = batches.iter().map(|b| b.vertices.len()).sum();
        assert_eq!(total, 12);
    }

    #[test]
    fn test_clipping_box_cuts_batches() {
        let (mut store, ids) = tree(&[BoxFlags::CLIPPING]);
        let mut shaper = MonospaceShaper::new(8.0, 16.0, 32);
        let batches = Renderer::new(2400, 2.0).render(&mut store, &mut shaper, window()).unwrap();

        assert_eq!(batches.len(), 1);
        assert_eq!(batches[0].clip, window());
        assert!(store[ids[1]].flags.contains(BoxFlags::CLIPPING));
    }

    #[test]
    fn test_text_updates_text_rect() {
        let (mut store, ids) = tree(&[BoxFlags::DRAW_TEXT]);
        let mut shaper = MonospaceShaper::new(8.0, 16.0, 32);
        let batches = Renderer::new(2400, 2.0).render(&mut store, &mut shaper, window()).unwrap();

        let total: usize = batches.iter().map(|b| b.vertices.len()).sum();
        assert_eq!(total, 6 * 4);
        assert_eq!(store[ids[1]].text_rect.width, 16.0);
        assert_eq!(store[ids[1]].text_rect.height, 16.0);
    }

    #[test]
    fn test_blur_gets_its_own_batch() {
        let (mut store, ids) = tree(&[BoxFlags::empty()]);
        store[ids[1]].style.blur_radius = 2.5;
        let mut shaper = MonospaceShaper::new(8.0, 16.0, 32);
        let batches = Renderer::new(2400, 2.0).render(&mut store, &mut shaper, window()).unwrap();

        assert_eq!(batches.len(), 3);
        assert!(matches!(batches[1].kind, BatchKind::Blur { radius, .. } if radius == 2.0));
    }
}
