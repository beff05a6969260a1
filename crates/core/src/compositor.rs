//! Draws a planned [`TickSet`] onto a ruler strip.

use crate::atlas::GlyphAtlas;
use crate::config::{to_rgb8, RulerConfig};
use crate::error::{Result, RulerError};
use crate::surface::Surface;
use crate::ticks::{Axis, AxisSpec, TickSet};

/// Stroke lengths, label offsets and color used by the compositor.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CompositorStyle {
    pub small_tick: u32,
    pub large_tick: u32,
    /// Offset across the strip.
    pub text_vshift: i32,
    /// Offset along the axis.
    pub text_hshift: i32,
    pub fg: [u8; 3],
}

impl CompositorStyle {
    pub fn from_config(config: &RulerConfig) -> Self {
        Self {
            small_tick: config.ruler_small_tick,
            large_tick: config.ruler_large_tick,
            text_vshift: config.ruler_text_vshift,
            text_hshift: config.ruler_text_hshift,
            fg: to_rgb8(config.ruler_fg),
        }
    }
}

/// Renders baseline, tick strokes and glyph labels.
#[derive(Debug, Clone, Copy)]
pub struct GlyphCompositor {
    style: CompositorStyle,
}

impl GlyphCompositor {
    pub fn new(style: CompositorStyle) -> Self {
        Self { style }
    }

    pub fn style(&self) -> &CompositorStyle {
        &self.style
    }

    /// Draw `ticks` with the measuring edge along the far side of the strip:
    /// the bottom row for a horizontal ruler, the right column for a vertical
    /// one.
    pub fn render<S: Surface + ?Sized>(
        &self,
        ticks: &TickSet,
        axis: &AxisSpec,
        atlas: &GlyphAtlas,
        surface: &mut S,
    ) -> Result<()> {
        let orientation = atlas.key().orientation;
        if orientation != axis.axis {
            return Err(RulerError::InvalidConfig(format!(
                "{:?} glyph atlas used for a {:?} ruler",
                orientation, axis.axis
            )));
        }

        match axis.axis {
            Axis::Horizontal => self.render_horizontal(ticks, atlas, surface),
            Axis::Vertical => self.render_vertical(ticks, atlas, surface),
        }
    }

    fn render_horizontal<S: Surface + ?Sized>(
        &self,
        ticks: &TickSet,
        atlas: &GlyphAtlas,
        surface: &mut S,
    ) -> Result<()> {
        let style = &self.style;
        let (w, h) = (surface.width() as i64, surface.height() as i64);

        surface.hline(0, w - 1, h - 1, style.fg);
        for &x in &ticks.minor_ticks {
            surface.vline(x.floor() as i64, h - style.small_tick as i64, h - 1, style.fg);
        }
        for tick in &ticks.major_ticks {
            surface.vline(
                tick.position.floor() as i64,
                h - style.large_tick as i64,
                h - 1,
                style.fg,
            );
        }

        for tick in &ticks.major_ticks {
            let mut pos = tick.position;
            for ch in tick.label.chars() {
                let glyph = atlas.glyph(ch)?;
                let x = pos.trunc() as i64 + style.text_hshift as i64;
                surface.blit(&glyph.bitmap, x, style.text_vshift as i64);
                pos += glyph.advance as f64;
            }
        }
        Ok(())
    }

    fn render_vertical<S: Surface + ?Sized>(
        &self,
        ticks: &TickSet,
        atlas: &GlyphAtlas,
        surface: &mut S,
    ) -> Result<()> {
        let style = &self.style;
        let (w, h) = (surface.width() as i64, surface.height() as i64);

        surface.vline(w - 1, 0, h - 1, style.fg);
        for &y in &ticks.minor_ticks {
            surface.hline(w - style.small_tick as i64, w - 1, y.floor() as i64, style.fg);
        }
        for tick in &ticks.major_ticks {
            surface.hline(
                w - style.large_tick as i64,
                w - 1,
                tick.position.floor() as i64,
                style.fg,
            );
        }

        // Vertical glyphs stack upward from the tick.
        for tick in &ticks.major_ticks {
            let mut pos = tick.position;
            for ch in tick.label.chars() {
                let glyph = atlas.glyph(ch)?;
                let advance = glyph.advance as i64;
                let y = pos.trunc() as i64 - advance - style.text_hshift as i64;
                surface.blit(&glyph.bitmap, style.text_vshift as i64, y);
                pos -= glyph.advance as f64;
            }
        }
        Ok(())
    }
}
