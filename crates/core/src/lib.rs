//! # canvas-ruler-core
//!
//! Rulers for a vector graphics canvas.
//!
//! This library computes and draws the horizontal and vertical rulers that
//! frame a drawing canvas:
//!
//! - **Tick planning** that adapts the tick pitch to the current zoom
//! - **Glyph atlases** of pre-rendered digit bitmaps, tinted once per color
//! - **Compositing** of ticks and labels onto an RGBA surface
//! - **Guide dragging** from a ruler strip onto the canvas
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use canvas_ruler_core::{
//!     AtlasCache, Axis, EventBus, PaintContext, Paintable, RulerConfig, RulerWidget,
//!     ViewTransform, encode_png, new_surface,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let config = RulerConfig::with_resource_dir("resources");
//!     let mut atlases = AtlasCache::with_resource_dir(&config.resource_dir);
//!     let mut bus = EventBus::new();
//!     let mut ruler = RulerWidget::new(Axis::Horizontal, &mut bus);
//!
//!     // 100% zoom, page center 300px right of and 200px below the top-left
//!     let view = ViewTransform::new(1.0, (300.0, 200.0), (595.0, 842.0));
//!
//!     let mut surface = new_surface(800, 20, config.ruler_bg);
//!     let mut ctx = PaintContext {
//!         view: &view,
//!         config: &config,
//!         atlases: &mut atlases,
//!     };
//!     ruler.paint(&mut ctx, &mut surface)?;
//!
//!     std::fs::write("ruler.png", encode_png(&surface)?)?;
//!     Ok(())
//! }
//! ```
//!
//! ## Reacting to Changes
//!
//! ```rust,no_run
//! use canvas_ruler_core::{
//!     AtlasCache, Axis, ConfigKey, EventBus, RulerConfig, RulerEvent, RulerWidget,
//! };
//!
//! fn main() -> anyhow::Result<()> {
//!     let mut config = RulerConfig::default();
//!     let mut atlases = AtlasCache::with_resource_dir(&config.resource_dir);
//!     let mut bus = EventBus::new();
//!     let mut top = RulerWidget::new(Axis::Horizontal, &mut bus);
//!
//!     for key in config.apply_overrides(&serde_json::json!({ "ruler_font_size": 7 }))? {
//!         bus.publish(RulerEvent::ConfigChanged { key });
//!     }
//!     if top.pump(&config, &mut atlases)? {
//!         // schedule a repaint
//!     }
//!     Ok(())
//! }
//! ```

pub mod atlas;
pub mod compositor;
pub mod config;
pub mod error;
pub mod events;
pub mod guide;
pub mod surface;
pub mod ticks;
pub mod view;
pub mod widget;

// Re-export main types for convenience
pub use atlas::{AtlasCache, AtlasKey, FsGlyphSource, Glyph, GlyphAtlas, GlyphSource};
pub use compositor::{CompositorStyle, GlyphCompositor};
pub use config::{ConfigKey, Rgb, RulerConfig};
pub use error::{Result, RulerError};
pub use events::{EventBus, RulerEvent, Subscription};
pub use guide::{
    CursorKind, DragState, Guide, GuideHost, GuideInteraction, GuideOrientation, GuideSink,
    InteractionHost, PointerEvent, SnapResult, Snapper,
};
pub use surface::{encode_png, new_surface, Surface};
pub use ticks::{Axis, AxisSpec, MajorTick, TickPlanner, TickSet};
pub use view::{DocOrigin, Point, Unit, ViewTransform};
pub use widget::{CornerWidget, PaintContext, Paintable, RulerWidget};

use std::fs::File;
use std::path::Path;
use std::sync::Mutex;
use tracing::Level;

/// Initialize the library's logging.
/// Call this once at application startup if you want to see logs.
pub fn init_logging() {
    use tracing_subscriber::{fmt, prelude::*, EnvFilter};

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(EnvFilter::from_default_env())
        .init();
}

/// Parse a log level name. Accepts `DEBUG`, `INFO`, `WARN`, `WARNING` and
/// `ERROR` in any case; anything else is `INFO`.
pub fn parse_level(name: &str) -> Level {
    match name.trim().to_ascii_uppercase().as_str() {
        "DEBUG" => Level::DEBUG,
        "WARN" | "WARNING" => Level::WARN,
        "ERROR" => Level::ERROR,
        _ => Level::INFO,
    }
}

/// Send logs at `level` and above to `path`, truncating it.
///
/// Fails if the file cannot be created or a global subscriber is already set.
pub fn init_file_logging(path: &Path, level: Level) -> Result<()> {
    use tracing_subscriber::{filter::LevelFilter, fmt, prelude::*};

    let file = File::create(path)?;
    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(Mutex::new(file))
                .with_ansi(false),
        )
        .with(LevelFilter::from_level(level))
        .try_init()
        .map_err(|e| RulerError::InvalidConfig(format!("logging already initialized: {}", e)))
}
