// Windowed host for one scratch panel.
// • The window is the panel's container; resizing the window resizes it.
// • Hold Left Mouse and drag to scratch the foreground away.
// • C clears the surface, E toggles input. ESC quits.
// • Once enough is scratched the surface disappears and the background stays.

mod config;
mod draw;

use std::time::Instant;

use anyhow::Context;
use clap::Parser;
use minifb::Key;
use tracing_subscriber::EnvFilter;

use config::{Args, DemoConfig};
use draw::{Drawer, Scene, draw_text_5x7};
use scratch_panel::{
    Callbacks, Document, FileLoader, FrameBuffer, InputEvent, OptionKey, OptionValue, Phase, ScratchPanel,
};

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let config = DemoConfig::load(&args)?;
    let (w, h) = (config.window.width, config.window.height);

    /* --- Document + panel --- */
    let mut doc = Document::new();
    let container = doc.create_container(&config.panel.element_id, w, h);
    let callbacks = Callbacks::new()
        .on_ready(|| tracing::info!("ready: drag to scratch"))
        .on_complete(|| tracing::info!("card revealed"));
    let mut panel = ScratchPanel::new(&doc, config.panel.clone(), callbacks)
        .context("mounting scratch panel")?;

    /* --- Window --- */
    let mut drawer = Drawer::new(&config.window.title, w, h)?;
    let mut screen = FrameBuffer::new(w, h);
    let mut scene = Scene::new();
    let loader = FileLoader::new();

    // Loading is synchronous here; readiness still waits for the background delay.
    panel.load_foreground(&loader, Instant::now());

    let mut was_down = false;
    let mut last_pos: Option<(f32, f32)> = None;

    /* ------------------------------ Main loop ------------------------------ */
    while drawer.is_open() && !drawer.esc_pressed() {
        panel.tick(Instant::now());

        /* 1) Window resize -> container resize -> panel resize */
        let size = drawer.size();
        if size != container.borrow().client_size() && size.0 > 0 && size.1 > 0 {
            container.borrow_mut().set_client_size(size.0, size.1);
            panel.handle_resize();
            screen = FrameBuffer::new(size.0, size.1);
        }

        /* 2) Keys */
        if drawer.pressed_once(Key::C) {
            panel.clear();
        }
        if drawer.pressed_once(Key::E) {
            let enabled = panel.options().enabled;
            panel.set_option(OptionKey::Enabled, OptionValue::Flag(!enabled))?;
        }

        /* 3) Mouse -> start / move / end */
        let down = drawer.left_mouse_down();
        let pos = drawer.mouse_pos();
        let event = match (was_down, down, pos) {
            (false, true, Some((x, y))) => Some(InputEvent::pointer(Phase::Start, x, y)),
            (true, true, Some((x, y))) if last_pos != Some((x, y)) => {
                Some(InputEvent::pointer(Phase::Move, x, y))
            }
            (true, false, _) => {
                let (x, y) = pos.or(last_pos).unwrap_or_default();
                Some(InputEvent::pointer(Phase::End, x, y))
            }
            _ => None,
        };
        if let Some(event) = event {
            panel.handle_input(&event);
        }
        was_down = down;
        if pos.is_some() {
            last_pos = pos;
        }

        /* 4) Draw backdrop + surface, then progress */
        {
            let container = container.borrow();
            let surface = panel.is_mounted().then(|| panel.surface());
            scene.render(&mut screen, container.backdrop(), surface, &loader);
        }

        let hud = if panel.is_completed() {
            "DONE".to_string()
        } else if !panel.options().enabled {
            format!("{:.1}% | OFF", panel.percent_scratched())
        } else {
            format!("{:.1}%", panel.percent_scratched())
        };
        draw_text_5x7(&mut screen, 8, 8, &hud, 0x00_FF_FF_FF);

        drawer.present(&screen)?;
    }

    Ok(())
}
