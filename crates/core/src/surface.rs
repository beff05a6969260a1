//! Pixel surfaces the ruler widgets paint onto.
//!
//! The ruler draws 1px, non-antialiased strokes and alpha-composited glyph
//! bitmaps, so the only backend needed is an in-memory RGBA buffer. Hosts
//! copy the finished buffer onto their own widget.

use crate::config::{to_rgb8, Rgb};
use crate::error::{Result, RulerError};
use image::{imageops, Rgba, RgbaImage};
use std::io::Cursor;

/// Minimal drawing target used by the compositor and the widgets.
pub trait Surface {
    fn width(&self) -> u32;

    fn height(&self) -> u32;

    /// Paint the whole surface with an opaque color.
    fn clear(&mut self, color: [u8; 3]);

    /// Set one opaque pixel. Coordinates outside the surface are ignored.
    fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 3]);

    /// Alpha-composite `image` with its top-left corner at `(x, y)`, clipped.
    fn blit(&mut self, image: &RgbaImage, x: i64, y: i64);

    /// Horizontal 1px line covering columns `x0..=x1`.
    fn hline(&mut self, x0: i64, x1: i64, y: i64, color: [u8; 3]) {
        let (from, to) = (x0.min(x1).max(0), x0.max(x1).min(self.width() as i64 - 1));
        for x in from..=to {
            self.set_pixel(x, y, color);
        }
    }

    /// Vertical 1px line covering rows `y0..=y1`.
    fn vline(&mut self, x: i64, y0: i64, y1: i64, color: [u8; 3]) {
        let (from, to) = (y0.min(y1).max(0), y0.max(y1).min(self.height() as i64 - 1));
        for y in from..=to {
            self.set_pixel(x, y, color);
        }
    }
}

impl Surface for RgbaImage {
    fn width(&self) -> u32 {
        self.dimensions().0
    }

    fn height(&self) -> u32 {
        self.dimensions().1
    }

    fn clear(&mut self, color: [u8; 3]) {
        let [r, g, b] = color;
        for pixel in self.pixels_mut() {
            *pixel = Rgba([r, g, b, 255]);
        }
    }

    fn set_pixel(&mut self, x: i64, y: i64, color: [u8; 3]) {
        let (w, h) = self.dimensions();
        if x < 0 || y < 0 || x >= w as i64 || y >= h as i64 {
            return;
        }
        let [r, g, b] = color;
        self.put_pixel(x as u32, y as u32, Rgba([r, g, b, 255]));
    }

    fn blit(&mut self, image: &RgbaImage, x: i64, y: i64) {
        imageops::overlay(self, image, x, y);
    }
}

/// Create an opaque surface filled with `background`.
pub fn new_surface(width: u32, height: u32, background: Rgb) -> RgbaImage {
    let mut surface = RgbaImage::new(width, height);
    surface.clear(to_rgb8(background));
    surface
}

/// Linear blend between two colors, `t` in `[0, 1]`.
pub fn lerp_rgb(from: [u8; 3], to: [u8; 3], t: f64) -> [u8; 3] {
    let t = t.clamp(0.0, 1.0);
    let mut out = [0u8; 3];
    for i in 0..3 {
        out[i] = (from[i] as f64 + (to[i] as f64 - from[i] as f64) * t).round() as u8;
    }
    out
}

/// Encode a surface to PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut buffer = Cursor::new(Vec::new());

    let mut encoder = png::Encoder::new(&mut buffer, image.width(), image.height());
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Fast);

    let mut writer = encoder.write_header().map_err(|e| {
        RulerError::PngEncodingError(format!("Failed to write PNG header: {}", e))
    })?;

    writer.write_image_data(image.as_raw()).map_err(|e| {
        RulerError::PngEncodingError(format!("Failed to write PNG data: {}", e))
    })?;

    drop(writer);

    Ok(buffer.into_inner())
}

#[cfg(test)]
mod tests {
    use super::*;

    const PNG_MAGIC: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];

    #[test]
    fn test_new_surface_is_filled() {
        let surface = new_surface(4, 3, [1.0, 1.0, 1.0]);
        assert!(surface.pixels().all(|p| *p == Rgba([255, 255, 255, 255])));
    }

    #[test]
    fn test_set_pixel_clips() {
        let mut surface = new_surface(2, 2, [1.0, 1.0, 1.0]);
        surface.set_pixel(-1, 0, [0, 0, 0]);
        surface.set_pixel(2, 1, [0, 0, 0]);
        surface.set_pixel(1, 1, [0, 0, 0]);
        assert_eq!(*surface.get_pixel(1, 1), Rgba([0, 0, 0, 255]));
        assert_eq!(*surface.get_pixel(0, 0), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_lines_are_clipped_to_surface() {
        let mut surface = new_surface(5, 5, [1.0, 1.0, 1.0]);
        surface.hline(-3, 10, 4, [0, 0, 0]);
        surface.vline(0, 2, -8, [0, 0, 0]);
        for x in 0..5 {
            assert_eq!(surface.get_pixel(x, 4)[0], 0);
        }
        for y in 0..=2 {
            assert_eq!(surface.get_pixel(0, y)[0], 0);
        }
        assert_eq!(surface.get_pixel(0, 3)[0], 255);
    }

    #[test]
    fn test_blit_composites_alpha_and_clips() {
        let mut surface = new_surface(4, 4, [1.0, 1.0, 1.0]);
        let mut glyph = RgbaImage::new(2, 2);
        glyph.put_pixel(0, 0, Rgba([0, 0, 0, 255]));
        glyph.put_pixel(1, 1, Rgba([0, 0, 0, 0]));

        surface.blit(&glyph, -1, 3);
        surface.blit(&glyph, 2, 2);

        assert_eq!(*surface.get_pixel(2, 2), Rgba([0, 0, 0, 255]));
        assert_eq!(*surface.get_pixel(3, 3), Rgba([255, 255, 255, 255]));
    }

    #[test]
    fn test_lerp_rgb() {
        assert_eq!(lerp_rgb([0, 0, 0], [255, 255, 255], 0.5), [128, 128, 128]);
        assert_eq!(lerp_rgb([10, 20, 30], [0, 0, 0], 0.0), [10, 20, 30]);
        assert_eq!(lerp_rgb([10, 20, 30], [0, 0, 0], 7.0), [0, 0, 0]);
    }

    #[test]
    fn test_encode_png_small_surface() {
        let surface = new_surface(10, 3, [0.9, 0.9, 0.9]);
        let png_data = encode_png(&surface).unwrap();
        assert!(png_data.len() > 8);
        assert_eq!(&png_data[0..8], &PNG_MAGIC);
    }
}
