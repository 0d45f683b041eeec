//! # ARBOR Headless Runner
//!
//! Drives the showcase tree through a scripted event queue with no window
//! and no GPU, then prints the solved tree and the batch summary.
//!
//! ```bash
//! # Default configuration
//! RUST_LOG=arbor_ui=debug cargo run -p arbor_ui --features bin --bin arbor_headless
//!
//! # Explicit configuration file
//! cargo run -p arbor_ui --features bin --bin arbor_headless -- arbor.toml
//! ```

use arbor_ui::widget::{button, grid, grid_cell, hspacer, scroll_box, slider};
use arbor_ui::{
    Attr, Axis, BoxId, Event, FrameOutput, Key, MouseButton, Size, UiConfig, UiContext, UiResult,
};
use tracing_subscriber::EnvFilter;

/// Frame time used for every scripted frame.
const DT: f32 = 1.0 / 60.0;

/// State owned by the caller between frames.
#[derive(Debug, Default)]
struct Showcase {
    volume: f32,
    clicks: u32,
}

fn build(ui: &mut UiContext, state: &mut Showcase) -> UiResult<()> {
    ui.style_rule(".button", |ui| {
        ui.style(Attr::Width, Size::pixels(120.0, 1.0))?;
        ui.style(Attr::Height, Size::pixels(32.0, 1.0))
    })?;

    ui.boxed(arbor_ui::BoxFlags::empty(), "toolbar", |ui, _| {
        ui.style(Attr::Spacing, 8.0_f32)?;
        let ok = button(ui, "ok")?;
        if ui.signal(ok).clicked {
            state.clicks += 1;
        }
        hspacer(ui, "toolbar_gap")?;
        button(ui, "cancel")?;
        Ok(())
    })?;

    slider(ui, "volume", &mut state.volume)?;

    scroll_box(ui, "list", |ui, _| {
        ui.style(Attr::Axis, Axis::Vertical)?;
        ui.style(Attr::Width, Size::pixels(300.0, 1.0))?;
        ui.style(Attr::Height, Size::pixels(160.0, 1.0))?;
        for i in 0..12 {
            button(ui, &format!("item{i}"))?;
        }
        Ok(())
    })?;

    grid(ui, "board", |ui, _| {
        for (i, (x, y)) in [(0.0, 0.0), (1.0, 0.0), (0.0, 1.0)].into_iter().enumerate() {
            grid_cell(ui, x, y, 1.0, 1.0, |ui, _| {
                button(ui, &format!("cell{i}")).map(|_| ())
            })?;
        }
        grid_cell(ui, 1.0, 1.0, 1.0, 1.0, |_, _| Ok(()))?;
        Ok(())
    })?;

    Ok(())
}

fn script() -> Vec<Vec<Event>> {
    vec![
        vec![Event::MouseMove { x: 20.0, y: 12.0 }],
        vec![
            Event::mouse_press(MouseButton::Left),
            Event::mouse_release(MouseButton::Left),
        ],
        vec![Event::key_press(Key::Tab), Event::key_press(Key::Tab)],
        vec![Event::MouseMove { x: 150.0, y: 120.0 }],
        vec![Event::Scroll { x: 0.0, y: -4.0 }],
        vec![Event::WindowSize { width: 1024.0, height: 768.0 }],
        vec![],
    ]
}

fn print_tree(ui: &UiContext, id: BoxId, depth: usize) {
    let node = ui.node(id);
    let r = node.rect;
    println!(
        "{:indent$}{} [{:.0}, {:.0}, {:.0} x {:.0}]{}",
        "",
        node.label,
        r.x,
        r.y,
        r.width,
        r.height,
        if node.tags.is_empty() { String::new() } else { format!(" .{}", node.tags.join(".")) },
        indent = depth * 2,
    );
    for &child in &node.children {
        print_tree(ui, child, depth + 1);
    }
}

fn summarize(frame: usize, out: &FrameOutput) {
    let vertices: usize = out.batches.iter().map(|b| b.vertices.len()).sum();
    println!(
        "frame {frame}: {} passes, {} batches, {vertices} vertices",
        out.passes,
        out.batches.len()
    );
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = match std::env::args().nth(1) {
        Some(path) => UiConfig::load(path)?,
        None => UiConfig::default(),
    };

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log.filter));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    tracing::info!(
        width = config.window.width,
        height = config.window.height,
        "starting headless run"
    );

    let mut ui = UiContext::new(config);
    let mut state = Showcase { volume: 0.5, clicks: 0 };

    for (frame, events) in script().iter().enumerate() {
        let out = ui.frame(events, DT, |ui| build(ui, &mut state))?;
        summarize(frame, &out);
    }

    println!();
    if let Some(root) = ui.store().root() {
        print_tree(&ui, root, 0);
    }
    println!();
    println!("live boxes: {}", ui.store().live_count());
    println!("clicks on ok: {}", state.clicks);
    println!("volume: {:.2}", state.volume);
    if let Some(focused) = ui.focused() {
        println!("focused: {}", ui.node(focused).label);
    }

    Ok(())
}
