//! Grid of cells placed in basic-cell units.
//!
//! A grid divides its own rect into `columns x rows` basic cells, where the
//! counts come from the furthest cell edges. Each cell is a floating child
//! sized in pixels from the grid's rect of the previous pass, so the grid
//! itself must not be sized from its children.

use arbor_core::{Vec2, Vec4};

use crate::context::UiContext;
use crate::error::UiResult;
use crate::style::{Attr, Color, Size};
use crate::tree::{BoxFlags, BoxId};

/// Declares a grid filling its parent; `body` declares its cells.
///
/// # Errors
///
/// Whatever `body` returns, or a structural error from the grid box.
pub fn grid<F>(ui: &mut UiContext, label: &str, body: F) -> UiResult<BoxId>
where
    F: FnOnce(&mut UiContext, BoxId) -> UiResult<()>,
{
    ui.boxed(BoxFlags::empty(), label, |ui, id| {
        ui.style(Attr::Width, Size::percent(1.0, 0.0))?;
        ui.style(Attr::Height, Size::percent(1.0, 0.0))?;

        body(ui, id)?;

        let rect = ui.node(id).rect;
        let cells: Vec<(BoxId, Vec4)> = ui
            .node(id)
            .children
            .iter()
            .filter_map(|&c| ui.node(c).grid_cell.map(|cell| (c, cell)))
            .collect();

        let (columns, rows) = cells
            .iter()
            .fold((0.0_f32, 0.0_f32), |(cols, rows), (_, c)| (cols.max(c.x + c.z), rows.max(c.y + c.w)));
        if columns <= 0.0 || rows <= 0.0 {
            return Ok(());
        }

        let cell_w = (rect.width / columns).floor();
        let cell_h = (rect.height / rows).floor();

        for (cell, c) in cells {
            ui.style_box(cell, Attr::FloatX, c.x * cell_w)?;
            ui.style_box(cell, Attr::FloatY, c.y * cell_h)?;
            ui.style_box(cell, Attr::Width, Size::pixels(c.z * cell_w, 1.0))?;
            ui.style_box(cell, Attr::Height, Size::pixels(c.w * cell_h, 1.0))?;
        }

        Ok(())
    })
}

/// Declares a cell starting at basic cell (`x`, `y`) and spanning `w` by
/// `h` basic cells.
///
/// # Errors
///
/// Whatever `body` returns, or a key collision when two cells start at the
/// same basic cell.
pub fn grid_cell<F>(ui: &mut UiContext, x: f32, y: f32, w: f32, h: f32, body: F) -> UiResult<BoxId>
where
    F: FnOnce(&mut UiContext, BoxId) -> UiResult<()>,
{
    ui.boxed(BoxFlags::empty(), &format!("grid_cell_{x}_{y}"), |ui, id| {
        ui.style(Attr::FloatX, 0.0_f32)?;
        ui.style(Attr::FloatY, 0.0_f32)?;
        ui.style(Attr::Padding, Vec2::splat(8.0))?;
        ui.style(Attr::BgColor, Color::rgba(0.0, 0.0, 0.0, 0.4))?;
        ui.style(Attr::BorderWidths, Vec4::splat(1.0))?;
        ui.style(Attr::BorderColor, Color::rgba(0.0, 0.0, 0.0, 0.8))?;
        ui.style(Attr::EdgeSoftness, 0.0_f32)?;
        ui.node_mut(id).grid_cell = Some(Vec4::new(x, y, w, h));

        body(ui, id)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::UiConfig;
    use crate::layout::Rect;

    fn build(ui: &mut UiContext) -> UiResult<()> {
        grid(ui, "board", |ui, _| {
            grid_cell(ui, 0.0, 0.0, 3.0, 2.0, |_, _| Ok(()))?;
            grid_cell(ui, 3.0, 0.0, 5.0, 2.0, |_, _| Ok(()))?;
            grid_cell(ui, 0.0, 2.0, 8.0, 4.0, |_, _| Ok(()))?;
            Ok(())
        })
        .map(|_| ())
    }

    #[test]
    fn test_cells_follow_the_previous_rect() {
        let mut ui = UiContext::new(UiConfig::default());
        ui.frame(&[], 0.016, build).unwrap();
        ui.frame(&[], 0.016, build).unwrap();

        let root = ui.store().root().unwrap();
        let board = ui.node(root).children[0];
        assert_eq!(ui.node(board).rect, Rect::new(0.0, 0.0, 800.0, 600.0));

        // 8 columns of 100 px, 6 rows of 100 px.
        let rects: Vec<Rect> = ui.node(board).children.iter().map(|&c| ui.node(c).rect).collect();
        assert_eq!(rects[0], Rect::new(0.0, 0.0, 300.0, 200.0));
        assert_eq!(rects[1], Rect::new(300.0, 0.0, 500.0, 200.0));
        assert_eq!(rects[2], Rect::new(0.0, 200.0, 800.0, 400.0));
    }

    #[test]
    fn test_duplicate_cell_origin_collides() {
        let mut ui = UiContext::new(UiConfig::default());
        let err = ui
            .frame(&[], 0.016, |ui| {
                grid(ui, "board", |ui, _| {
                    grid_cell(ui, 1.0, 1.0, 1.0, 1.0, |_, _| Ok(()))?;
                    grid_cell(ui, 1.0, 1.0, 2.0, 2.0, |_, _| Ok(()))?;
                    Ok(())
                })
                .map(|_| ())
            })
            .unwrap_err();
        assert!(matches!(err, crate::UiError::KeyCollision { .. }));
    }
}
