//! Ruler and corner widgets.
//!
//! Widgets own no windowing resources. The host hands them a [`Surface`] to
//! paint, forwards pointer input, and publishes [`RulerEvent`]s on the bus
//! the widgets subscribed to at construction.

use crate::atlas::{load_mask, tint, AtlasCache};
use crate::compositor::{CompositorStyle, GlyphCompositor};
use crate::config::{to_rgb8, ConfigKey, RulerConfig};
use crate::error::Result;
use crate::events::{EventBus, RulerEvent, Subscription};
use crate::guide::{DragState, Guide, GuideHost, GuideInteraction, PointerEvent};
use crate::surface::{lerp_rgb, Surface};
use crate::ticks::{Axis, AxisSpec, TickPlanner, TickSet};
use crate::view::{DocOrigin, ViewTransform};
use image::RgbaImage;
use std::collections::HashMap;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Size of the origin icons drawn in the ruler corner.
const ORIGIN_ICON_SIZE: i64 = 19;

/// Everything a widget needs to paint one frame.
pub struct PaintContext<'a> {
    pub view: &'a ViewTransform,
    pub config: &'a RulerConfig,
    pub atlases: &'a mut AtlasCache,
}

/// A widget that can draw itself onto a surface.
pub trait Paintable {
    fn paint(&mut self, ctx: &mut PaintContext<'_>, surface: &mut dyn Surface) -> Result<()>;
}

/// A horizontal or vertical ruler strip.
#[derive(Debug)]
pub struct RulerWidget {
    axis: Axis,
    events: Subscription,
    interaction: GuideInteraction,
    /// Size of the last painted surface; `None` until the first paint.
    size: Option<(f64, f64)>,
    needs_repaint: bool,
}

impl RulerWidget {
    pub fn new(axis: Axis, bus: &mut EventBus) -> Self {
        Self {
            axis,
            events: bus.subscribe(),
            interaction: GuideInteraction::new(axis),
            size: None,
            needs_repaint: true,
        }
    }

    pub fn axis(&self) -> Axis {
        self.axis
    }

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    pub fn drag_state(&self) -> DragState {
        self.interaction.state()
    }

    /// Plan ticks for a strip of `size` pixels.
    pub fn plan(
        &self,
        view: &ViewTransform,
        config: &RulerConfig,
        size: (u32, u32),
    ) -> Result<TickSet> {
        TickPlanner::new(config).compute_ticks(view, &self.axis_spec(size))
    }

    fn axis_spec(&self, (w, h): (u32, u32)) -> AxisSpec {
        let length = match self.axis {
            Axis::Horizontal => w,
            Axis::Vertical => h,
        };
        AxisSpec {
            axis: self.axis,
            viewport_length_px: length as f64,
        }
    }

    /// Handle every queued event.
    ///
    /// Font size or foreground changes rebuild the glyph atlases before the
    /// next paint. A failed rebuild keeps the previous atlases; the queue is
    /// still fully drained and the first rebuild error is returned after it.
    /// Returns whether the widget needs repainting.
    pub fn pump(&mut self, config: &RulerConfig, atlases: &mut AtlasCache) -> Result<bool> {
        let mut first_error = None;
        let events: Vec<RulerEvent> = self.events.drain().collect();
        for event in events {
            self.needs_repaint = true;
            let RulerEvent::ConfigChanged { key } = event else {
                continue;
            };
            if first_error.is_some()
                || !key.affects_glyphs()
                || atlases
                    .cached(config.ruler_font_size, config.ruler_fg, self.axis)
                    .is_some()
            {
                continue;
            }
            if let Err(e) = atlases.rebuild(config.ruler_font_size, config.ruler_fg) {
                warn!("{:?} ruler glyph rebuild failed: {}", self.axis, e);
                first_error = Some(e);
            }
        }
        match first_error {
            Some(e) => Err(e),
            None => Ok(self.needs_repaint),
        }
    }

    /// Forward pointer input to the guide drag. Returns a created guide.
    ///
    /// The strip size comes from the last paint, so input arriving before the
    /// widget was ever painted is ignored.
    pub fn handle_pointer<H: GuideHost + ?Sized>(
        &mut self,
        event: PointerEvent,
        host: &mut H,
    ) -> Option<Guide> {
        let Some(size) = self.size else {
            debug!("{:?} ruler not painted yet, ignoring {:?}", self.axis, event);
            return None;
        };
        self.interaction.handle(event, size, host)
    }
}

impl Paintable for RulerWidget {
    fn paint(&mut self, ctx: &mut PaintContext<'_>, surface: &mut dyn Surface) -> Result<()> {
        let size = (surface.width(), surface.height());
        self.size = Some((size.0 as f64, size.1 as f64));
        surface.clear(to_rgb8(ctx.config.ruler_bg));

        let axis = self.axis_spec(size);
        let ticks = TickPlanner::new(ctx.config).compute_ticks(ctx.view, &axis)?;
        let atlas = ctx
            .atlases
            .get(ctx.config.ruler_font_size, ctx.config.ruler_fg, self.axis)?;
        GlyphCompositor::new(CompositorStyle::from_config(ctx.config)).render(
            &ticks,
            &axis,
            &atlas,
            surface,
        )?;

        self.needs_repaint = false;
        Ok(())
    }
}

/// The square where the two rulers meet. Shows the document origin
/// convention and switches it when clicked.
#[derive(Debug)]
pub struct CornerWidget {
    events: Subscription,
    origin: DocOrigin,
    /// Untinted icon masks, one per origin.
    icons: HashMap<DocOrigin, RgbaImage>,
    needs_repaint: bool,
}

impl CornerWidget {
    /// Icon file for `origin` below `resource_dir`.
    pub fn icon_path(resource_dir: &Path, origin: DocOrigin) -> PathBuf {
        let name = match origin {
            DocOrigin::Center => "origin-center.png",
            DocOrigin::LowerLeft => "origin-ll.png",
            DocOrigin::UpperLeft => "origin-lu.png",
        };
        resource_dir.join("icons").join(name)
    }

    /// Load the origin icons from `<resource_dir>/icons/`.
    pub fn load(resource_dir: &Path, origin: DocOrigin, bus: &mut EventBus) -> Result<Self> {
        let mut icons = HashMap::with_capacity(DocOrigin::ALL.len());
        for o in DocOrigin::ALL {
            icons.insert(o, load_mask(&Self::icon_path(resource_dir, o))?);
        }
        Ok(Self::with_icons(icons, origin, bus))
    }

    pub fn with_icons(
        icons: HashMap<DocOrigin, RgbaImage>,
        origin: DocOrigin,
        bus: &mut EventBus,
    ) -> Self {
        Self {
            events: bus.subscribe(),
            origin,
            icons,
            needs_repaint: true,
        }
    }

    pub fn origin(&self) -> DocOrigin {
        self.origin
    }

    pub fn needs_repaint(&self) -> bool {
        self.needs_repaint
    }

    /// Handle queued events; repaint only when the shown origin or the ruler
    /// colors change.
    pub fn pump(&mut self) -> bool {
        let events: Vec<RulerEvent> = self.events.drain().collect();
        for event in events {
            match event {
                RulerEvent::DocOriginChanged(origin) if origin != self.origin => {
                    debug!("Ruler corner origin {:?} -> {:?}", self.origin, origin);
                    self.origin = origin;
                    self.needs_repaint = true;
                }
                RulerEvent::ConfigChanged {
                    key: ConfigKey::Foreground | ConfigKey::Background,
                } => self.needs_repaint = true,
                _ => {}
            }
        }
        self.needs_repaint
    }

    /// A click on the corner: the origin the document should switch to.
    /// The host applies it and publishes [`RulerEvent::DocOriginChanged`].
    pub fn click(&self) -> DocOrigin {
        let next = self.origin.next();
        info!("Switching document origin to {:?}", next);
        next
    }
}

impl Paintable for CornerWidget {
    fn paint(&mut self, ctx: &mut PaintContext<'_>, surface: &mut dyn Surface) -> Result<()> {
        let (w, h) = (surface.width() as i64, surface.height() as i64);
        let fg = to_rgb8(ctx.config.ruler_fg);
        let bg = to_rgb8(ctx.config.ruler_bg);

        surface.clear(bg);
        // Edge gradients run over twice the widget size, so they only reach
        // the midpoint color at the far end.
        for x in 0..w {
            surface.set_pixel(x, h - 1, lerp_rgb(bg, fg, x as f64 / (2 * w) as f64));
        }
        for y in 0..h {
            surface.set_pixel(w - 1, y, lerp_rgb(bg, fg, y as f64 / (2 * h) as f64));
        }

        if let Some(icon) = self.icons.get(&self.origin) {
            let shift = (w - ORIGIN_ICON_SIZE).div_euclid(2) + 1;
            surface.blit(&tint(icon, fg), shift, shift);
        }

        self.needs_repaint = false;
        Ok(())
    }
}
