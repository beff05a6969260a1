//! View transform between document space and device pixels.
//!
//! Document coordinates are in points with the page centred on (0, 0) and Y
//! growing upward. Device coordinates are widget pixels with Y growing
//! downward.

use crate::error::{Result, RulerError};
use serde::{Deserialize, Serialize};

/// A 2D point, either in device pixels or document points.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Self { x, y }
    }
}

/// Which page location maps to the displayed coordinate (0, 0).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocOrigin {
    Center,
    LowerLeft,
    UpperLeft,
}

impl DocOrigin {
    pub const ALL: [DocOrigin; 3] = [DocOrigin::Center, DocOrigin::LowerLeft, DocOrigin::UpperLeft];

    /// The origin that follows this one when the ruler corner is clicked.
    pub fn next(self) -> Self {
        match self {
            DocOrigin::Center => DocOrigin::LowerLeft,
            DocOrigin::LowerLeft => DocOrigin::UpperLeft,
            DocOrigin::UpperLeft => DocOrigin::Center,
        }
    }
}

/// Measurement unit of displayed coordinates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Unit {
    Millimeter,
    Centimeter,
    Meter,
    Inch,
    Foot,
    Point,
    Pixel,
}

impl Unit {
    /// Size of one unit in points.
    pub fn points_per_unit(self) -> f64 {
        match self {
            Unit::Millimeter => 72.0 / 25.4,
            Unit::Centimeter => 72.0 / 2.54,
            Unit::Meter => 72.0 / 0.0254,
            Unit::Inch => 72.0,
            Unit::Foot => 864.0,
            Unit::Point => 1.0,
            Unit::Pixel => 0.75,
        }
    }

    /// Number of units in one point.
    pub fn units_per_point(self) -> f64 {
        1.0 / self.points_per_unit()
    }
}

/// Read-only snapshot of the canvas view the rulers measure.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewTransform {
    /// Device pixels per document point.
    pub zoom: f64,
    /// Device position of the document point (0, 0).
    pub pan_offset: (f64, f64),
    /// Page width and height in points.
    pub page_size: (f64, f64),
    pub doc_origin: DocOrigin,
    pub unit: Unit,
}

impl ViewTransform {
    pub fn new(zoom: f64, pan_offset: (f64, f64), page_size: (f64, f64)) -> Self {
        Self {
            zoom,
            pan_offset,
            page_size,
            doc_origin: DocOrigin::LowerLeft,
            unit: Unit::Millimeter,
        }
    }

    pub fn with_origin(mut self, origin: DocOrigin) -> Self {
        self.doc_origin = origin;
        self
    }

    pub fn with_unit(mut self, unit: Unit) -> Self {
        self.unit = unit;
        self
    }

    /// Reject views that cannot produce a finite tick plan.
    pub fn validate(&self) -> Result<()> {
        if !self.zoom.is_finite() || self.zoom <= 0.0 {
            return Err(RulerError::InvalidViewState(format!(
                "zoom must be a positive number, got {}",
                self.zoom
            )));
        }
        let (px, py) = self.pan_offset;
        let (pw, ph) = self.page_size;
        if ![px, py, pw, ph].iter().all(|v| v.is_finite()) {
            return Err(RulerError::InvalidViewState(format!(
                "non-finite pan {:?} or page size {:?}",
                self.pan_offset, self.page_size
            )));
        }
        Ok(())
    }

    /// Project a document point to device pixels.
    pub fn doc_to_win(&self, p: Point) -> Point {
        Point::new(
            p.x * self.zoom + self.pan_offset.0,
            -p.y * self.zoom + self.pan_offset.1,
        )
    }

    /// Inverse of [`doc_to_win`](Self::doc_to_win).
    pub fn win_to_doc(&self, p: Point) -> Point {
        Point::new(
            (p.x - self.pan_offset.0) / self.zoom,
            -(p.y - self.pan_offset.1) / self.zoom,
        )
    }

    /// Device position of the displayed origin for the current convention.
    pub fn origin_px(&self) -> Point {
        let (pw, ph) = self.page_size;
        let doc = match self.doc_origin {
            DocOrigin::LowerLeft => Point::new(-pw / 2.0, -ph / 2.0),
            DocOrigin::UpperLeft => Point::new(-pw / 2.0, ph / 2.0),
            DocOrigin::Center => Point::default(),
        };
        self.doc_to_win(doc)
    }

    /// Size of one display unit in device pixels.
    pub fn unit_pitch_px(&self) -> f64 {
        self.unit.points_per_unit() * self.zoom
    }
}
