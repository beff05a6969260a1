//! Resource generator for canvas-ruler.
//!
//! Writes a small pixel font for the ruler labels, the origin icons for the
//! ruler corner, and a few rendered preview strips built from them.

use anyhow::{Context, Result};
use canvas_ruler_core::{
    encode_png, new_surface, AtlasCache, Axis, CornerWidget, DocOrigin, EventBus, FsGlyphSource,
    PaintContext, Paintable, RulerConfig, RulerWidget, Unit, ViewTransform,
};
use image::{imageops, Rgba, RgbaImage};
use std::fs;
use std::path::Path;

/// Font sizes shipped with the rulers.
const FONT_SIZES: [u32; 5] = [5, 6, 7, 8, 9];

/// 3x5 bitmaps, one string per row, `#` for ink.
const PATTERNS: [(&str, [&str; 5]); 12] = [
    ("dot", ["...", "...", "...", "...", ".#."]),
    ("-", ["...", "...", "###", "...", "..."]),
    ("0", ["###", "#.#", "#.#", "#.#", "###"]),
    ("1", [".#.", "##.", ".#.", ".#.", "###"]),
    ("2", ["###", "..#", "###", "#..", "###"]),
    ("3", ["###", "..#", ".##", "..#", "###"]),
    ("4", ["#.#", "#.#", "###", "..#", "..#"]),
    ("5", ["###", "#..", "###", "..#", "###"]),
    ("6", ["###", "#..", "###", "#.#", "###"]),
    ("7", ["###", "..#", ".#.", ".#.", ".#."]),
    ("8", ["###", "#.#", "###", "#.#", "###"]),
    ("9", ["###", "#.#", "###", "..#", "###"]),
];

const ICON_SIZE: u32 = 19;

fn main() -> Result<()> {
    let resources = Path::new("resources");
    let preview_dir = Path::new("tests/fixtures/output");
    fs::create_dir_all(preview_dir)?;

    println!("Generating ruler resources...\n");

    for size in FONT_SIZES {
        generate_font(resources, size)?;
    }
    generate_icons(resources)?;
    generate_previews(resources, preview_dir)?;

    println!("\nAll resources generated successfully!");
    Ok(())
}

/// Render one glyph pattern at `font_size` pixels tall, with one column of
/// spacing on the right.
fn horizontal_glyph(pattern: &[&str; 5], font_size: u32) -> RgbaImage {
    let scale = (font_size / 5).max(1);
    let top = font_size.saturating_sub(5 * scale);
    let mut glyph = RgbaImage::from_pixel(3 * scale + 1, font_size, Rgba([0, 0, 0, 0]));
    for (row, line) in pattern.iter().enumerate() {
        for (col, c) in line.chars().enumerate() {
            if c != '#' {
                continue;
            }
            for dy in 0..scale {
                for dx in 0..scale {
                    let x = col as u32 * scale + dx;
                    let y = top + row as u32 * scale + dy;
                    if y < font_size {
                        glyph.put_pixel(x, y, Rgba([0, 0, 0, 255]));
                    }
                }
            }
        }
    }
    glyph
}

/// Write `ruler-font{N}px/` with horizontal and rotated vertical glyphs.
fn generate_font(resources: &Path, font_size: u32) -> Result<()> {
    let source = FsGlyphSource::new(resources);
    let dir = source.font_dir(font_size);
    println!("  Creating: {}", dir.display());
    fs::create_dir_all(&dir)?;

    for (name, pattern) in &PATTERNS {
        let glyph = horizontal_glyph(pattern, font_size);
        glyph
            .save(dir.join(format!("h{}.png", name)))
            .with_context(|| format!("writing h{}.png", name))?;
        // Vertical labels read bottom to top.
        imageops::rotate270(&glyph)
            .save(dir.join(format!("v{}.png", name)))
            .with_context(|| format!("writing v{}.png", name))?;
    }
    Ok(())
}

/// Draw the three origin icons: a cross for the page center, and a corner
/// bracket for the lower-left and upper-left origins.
fn generate_icons(resources: &Path) -> Result<()> {
    let ink = Rgba([0, 0, 0, 255]);
    let last = ICON_SIZE - 3;

    for origin in DocOrigin::ALL {
        let path = CornerWidget::icon_path(resources, origin);
        println!("  Creating: {}", path.display());
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }

        let mut icon = RgbaImage::from_pixel(ICON_SIZE, ICON_SIZE, Rgba([0, 0, 0, 0]));
        match origin {
            DocOrigin::Center => {
                let mid = ICON_SIZE / 2;
                for i in 2..=last {
                    icon.put_pixel(i, mid, ink);
                    icon.put_pixel(mid, i, ink);
                }
            }
            DocOrigin::LowerLeft => {
                for i in 2..=last {
                    icon.put_pixel(2, i, ink);
                    icon.put_pixel(i, last, ink);
                }
            }
            DocOrigin::UpperLeft => {
                for i in 2..=last {
                    icon.put_pixel(2, i, ink);
                    icon.put_pixel(i, 2, ink);
                }
            }
        }
        icon.save(&path)
            .with_context(|| format!("writing {}", path.display()))?;
    }
    Ok(())
}

/// Paint preview strips at a few zoom levels from the generated resources.
fn generate_previews(resources: &Path, output_dir: &Path) -> Result<()> {
    let config = RulerConfig::with_resource_dir(resources);
    let mut atlases = AtlasCache::with_resource_dir(resources);
    let mut bus = EventBus::new();
    let mut top = RulerWidget::new(Axis::Horizontal, &mut bus);
    let mut left = RulerWidget::new(Axis::Vertical, &mut bus);
    let mut corner = CornerWidget::load(resources, DocOrigin::LowerLeft, &mut bus)?;

    for zoom in [0.25, 1.0, 4.0] {
        let view =
            ViewTransform::new(zoom, (400.0, 300.0), (595.0, 842.0)).with_unit(Unit::Millimeter);
        let mut ctx = PaintContext {
            view: &view,
            config: &config,
            atlases: &mut atlases,
        };

        let mut hsurface = new_surface(800, 20, config.ruler_bg);
        top.paint(&mut ctx, &mut hsurface)?;
        write_png(&output_dir.join(format!("ruler-h-{}x.png", zoom)), &hsurface)?;

        let mut vsurface = new_surface(20, 600, config.ruler_bg);
        left.paint(&mut ctx, &mut vsurface)?;
        write_png(&output_dir.join(format!("ruler-v-{}x.png", zoom)), &vsurface)?;
    }

    let view = ViewTransform::new(1.0, (400.0, 300.0), (595.0, 842.0));
    let mut surface = new_surface(20, 20, config.ruler_bg);
    corner.paint(
        &mut PaintContext {
            view: &view,
            config: &config,
            atlases: &mut atlases,
        },
        &mut surface,
    )?;
    write_png(&output_dir.join("corner.png"), &surface)?;
    Ok(())
}

fn write_png(path: &Path, image: &RgbaImage) -> Result<()> {
    println!("  Creating: {}", path.display());
    fs::write(path, encode_png(image)?)?;
    Ok(())
}
