use anyhow::{Context, Result};
use image::{Rgba, RgbaImage};
use img_tissue_core::prelude::*;
use img_tissue_image::{load_texture, RasterSurface};
use minifb::*;
use std::time::{Duration, Instant};
use tracing_subscriber::EnvFilter;

const DEFAULT_SIZE: u32 = 256;
const BACKDROP: u8 = 32;
const SNAPSHOT_PATH: &str = "./tissue.json";

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let texture = match std::env::args().nth(1) {
        Some(path) => load_texture(&path).with_context(|| format!("Cannot open image: {}", path))?,
        None => checkerboard(DEFAULT_SIZE, DEFAULT_SIZE),
    };
    let (width, height) = texture.dimensions();
    let settings = TissueSettings {
        title: "Image Tissue Playground".to_owned(),
        ..Default::default()
    };

    let options = WindowOptions {
        scale: if width <= DEFAULT_SIZE && height <= DEFAULT_SIZE {
            Scale::X2
        } else {
            Scale::X1
        },
        ..Default::default()
    };
    let mut window = Window::new(&settings.title, width as _, height as _, options)
        .context("Could not create window")?;
    window.limit_update_rate(Some(Duration::from_micros(16600)));

    let mut surface = RasterSurface::new(texture);
    surface.set_bounds(SurfaceBounds::new(0.0, 0.0, width as _, height as _));
    let mut tissue = ImgTissue::with_settings(surface, FrameQueue::default(), &settings);
    tissue.set_image_size(width as _, height as _)?;

    let timer = Instant::now();
    let mut last_buttons = (false, false);
    let mut dirty = true;

    while window.is_open() && !window.is_key_down(Key::Escape) {
        let now = timer.elapsed().as_secs_f64() * 1000.0;
        let buttons = (
            window.get_mouse_down(MouseButton::Left),
            window.get_mouse_down(MouseButton::Right),
        );
        if let Some((x, y)) = window.get_mouse_pos(MouseMode::Discard) {
            let point = Coord::new(x as _, y as _);
            if buttons.0 && !last_buttons.0 {
                tissue.zoom_in(point, settings.duration);
            } else if buttons.1 && !last_buttons.1 {
                tissue.zoom_out(point, settings.duration);
            }
        }
        last_buttons = buttons;
        if window.is_key_pressed(Key::R, KeyRepeat::No) {
            tissue.reset();
            dirty = true;
        }
        let grid = tissue.grid();
        if window.is_key_pressed(Key::Right, KeyRepeat::Yes) {
            tissue.set_columns(grid.columns() + 1);
        }
        if window.is_key_pressed(Key::Left, KeyRepeat::Yes) {
            tissue.set_columns(grid.columns().saturating_sub(1));
        }
        if window.is_key_pressed(Key::Down, KeyRepeat::Yes) {
            tissue.set_rows(grid.rows() + 1);
        }
        if window.is_key_pressed(Key::Up, KeyRepeat::Yes) {
            tissue.set_rows(grid.rows().saturating_sub(1));
        }
        if tissue.grid() != grid {
            tracing::info!(grid = %tissue.grid(), "grid changed");
            dirty = true;
        }
        if window.is_key_pressed(Key::S, KeyRepeat::No) {
            save_snapshot(&tissue);
        }

        if tissue.tick(now) || dirty {
            dirty = false;
            let buffer = to_buffer(tissue.surface_mut().render());
            window
                .update_with_buffer(&buffer, width as _, height as _)
                .context("Could not update window buffer")?;
        } else {
            window.update();
        }
    }
    Ok(())
}

fn save_snapshot(tissue: &ImgTissue<RasterSurface, FrameQueue>) {
    let mesh = match tissue.mesh() {
        Some(mesh) => mesh,
        None => return,
    };
    match serde_json::to_string(mesh) {
        Ok(content) => match std::fs::write(SNAPSHOT_PATH, content) {
            Ok(_) => tracing::info!(path = SNAPSHOT_PATH, "mesh saved"),
            Err(error) => tracing::error!(%error, "cannot save mesh"),
        },
        Err(error) => tracing::error!(%error, "cannot serialize mesh"),
    }
}

/// Composite canvas over dark backdrop into `0RGB` window pixels.
fn to_buffer(canvas: &RgbaImage) -> Vec<u32> {
    canvas
        .pixels()
        .map(|Rgba([r, g, b, a])| {
            let mix = |c: u8| {
                let a = *a as u32;
                (c as u32 * a + BACKDROP as u32 * (255 - a)) / 255
            };
            mix(*b) | (mix(*g) << 8) | (mix(*r) << 16)
        })
        .collect::<Vec<_>>()
}

fn checkerboard(width: u32, height: u32) -> RgbaImage {
    RgbaImage::from_fn(width, height, |x, y| {
        let cell = ((x / 32) + (y / 32)) % 2 == 0;
        let r = (x * 255 / width.max(1)) as u8;
        let g = (y * 255 / height.max(1)) as u8;
        if cell {
            Rgba([r, g, 200, 255])
        } else {
            Rgba([255 - r, 255 - g, 60, 255])
        }
    })
}
