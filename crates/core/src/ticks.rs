//! Tick planning: where minor ticks and labeled major ticks fall along a ruler.
//!
//! The grid is phase-locked to the document, so the same document coordinate
//! lands on the same tick whatever the scroll position.

use crate::config::RulerConfig;
use crate::error::{Result, RulerError};
use crate::view::{DocOrigin, Point, ViewTransform};
use serde::{Deserialize, Serialize};
use tracing::debug;

/// On-screen distance the label pitch is rounded towards.
pub const LABEL_TARGET_PX: f64 = 50.0;

/// Major pitch above which every minor interval gets a half-step tick.
pub const HALF_STEP_MIN_PITCH: f64 = 10.0;

/// Pixels added to the snap distance to get the minimum tick pitch.
pub const SNAP_PITCH_MARGIN: f64 = 3.0;

/// Ruler orientation. A horizontal ruler measures X, a vertical one Y.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Axis {
    Horizontal,
    Vertical,
}

impl Axis {
    pub fn is_vertical(self) -> bool {
        self == Axis::Vertical
    }
}

/// The measuring axis of one ruler widget.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisSpec {
    pub axis: Axis,
    /// Widget extent along the measuring axis, in pixels.
    pub viewport_length_px: f64,
}

impl AxisSpec {
    pub fn horizontal(viewport_length_px: f64) -> Self {
        Self {
            axis: Axis::Horizontal,
            viewport_length_px,
        }
    }

    pub fn vertical(viewport_length_px: f64) -> Self {
        Self {
            axis: Axis::Vertical,
            viewport_length_px,
        }
    }

    fn validate(&self) -> Result<()> {
        if !self.viewport_length_px.is_finite() || self.viewport_length_px < 0.0 {
            return Err(RulerError::InvalidViewState(format!(
                "viewport length must be a non-negative number, got {}",
                self.viewport_length_px
            )));
        }
        Ok(())
    }
}

/// A labeled tick.
#[derive(Debug, Clone, PartialEq)]
pub struct MajorTick {
    /// Device pixel position along the axis.
    pub position: f64,
    pub label: String,
}

/// Ticks for one repaint. Positions increase along the axis and may fall
/// outside the viewport; the compositor clips.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct TickSet {
    pub minor_ticks: Vec<f64>,
    pub major_ticks: Vec<MajorTick>,
    /// Resolved minor pitch in pixels.
    pub pitch: f64,
    /// Resolved label pitch in pixels.
    pub label_pitch: f64,
}

/// Grow a raw unit pitch until it clears `min_pitch`, then halve it once when
/// there is room for a denser grid.
pub fn grow_pitch(raw_pitch: f64, min_pitch: f64) -> Result<f64> {
    if !raw_pitch.is_finite() || raw_pitch <= 0.0 {
        return Err(RulerError::InvalidViewState(format!(
            "unit pitch must be a positive number, got {}",
            raw_pitch
        )));
    }
    if !min_pitch.is_finite() {
        return Err(RulerError::InvalidConfig(format!(
            "minimum tick pitch must be finite, got {}",
            min_pitch
        )));
    }

    let mut pitch = raw_pitch;
    let mut k = 0.0;
    while pitch < min_pitch {
        k += 0.5;
        pitch *= 10.0 * k;
    }
    if pitch / 2.0 > min_pitch && pitch / 2.0 > raw_pitch {
        pitch /= 2.0;
    }
    Ok(pitch)
}

/// Position of the first grid line at or after device position 0.
pub fn phase_offset(origin_px: f64, pitch: f64) -> f64 {
    let cycles = origin_px / pitch;
    (cycles - cycles.floor()) * pitch
}

/// Format a displayed coordinate.
///
/// `fractional` labels keep up to four decimals; otherwise the value is
/// rounded to an integer. Zero always prints as `"0"`.
pub fn format_label(value: f64, fractional: bool) -> String {
    if fractional {
        let rounded = (value * 1e4).round() / 1e4;
        if rounded == 0.0 {
            return "0".to_string();
        }
        let text = format!("{:.4}", rounded);
        text.trim_end_matches('0').trim_end_matches('.').to_string()
    } else {
        let rounded = value.round();
        if rounded == 0.0 {
            return "0".to_string();
        }
        format!("{}", rounded as i64)
    }
}

/// Visit `start + i * step` for `i = -1, 0, 1, ...` until a visited position
/// reaches `length`. That last position is still visited.
fn walk_grid(start: f64, step: f64, length: f64, mut visit: impl FnMut(f64)) {
    let mut i = -1i64;
    let mut pos = 0.0;
    while pos < length {
        pos = start + i as f64 * step;
        visit(pos);
        i += 1;
    }
}

/// Plans tick positions for rulers sharing one configuration.
#[derive(Debug, Clone, Copy)]
pub struct TickPlanner {
    min_pitch: f64,
}

impl TickPlanner {
    pub fn new(config: &RulerConfig) -> Self {
        Self {
            min_pitch: config.min_tick_pitch(),
        }
    }

    /// Minimum tick pitch in pixels.
    pub fn min_pitch(&self) -> f64 {
        self.min_pitch
    }

    pub fn compute_ticks(&self, view: &ViewTransform, axis: &AxisSpec) -> Result<TickSet> {
        // A negative snap distance would let the pitch shrink below a pixel.
        if self.min_pitch.is_nan() || self.min_pitch < SNAP_PITCH_MARGIN {
            return Err(RulerError::InvalidConfig(format!(
                "minimum tick pitch must be at least {}px, got {}",
                SNAP_PITCH_MARGIN, self.min_pitch
            )));
        }
        view.validate()?;
        axis.validate()?;

        let origin = view.origin_px();
        let origin_px = match axis.axis {
            Axis::Horizontal => origin.x,
            Axis::Vertical => origin.y,
        };
        let raw_pitch = view.unit_pitch_px();
        let pitch = grow_pitch(raw_pitch, self.min_pitch)?;
        let length = axis.viewport_length_px;

        let mut minor_ticks = Vec::new();
        walk_grid(phase_offset(origin_px, pitch), pitch, length, |pos| {
            minor_ticks.push(pos);
            if pitch > HALF_STEP_MIN_PITCH {
                minor_ticks.push(pos + pitch * 0.5);
            }
        });

        let coef = match (LABEL_TARGET_PX / pitch).round() {
            c if c == 0.0 => 1.0,
            c => c,
        };
        let label_pitch = pitch * coef;
        let fractional = label_pitch / raw_pitch < 1.0;

        let mut major_ticks = Vec::new();
        walk_grid(phase_offset(origin_px, label_pitch), label_pitch, length, |pos| {
            let value = document_value(view, axis.axis, pos);
            major_ticks.push(MajorTick {
                position: pos,
                label: format_label(value, fractional),
            });
        });

        debug!(
            "{:?} ruler: pitch {:.3}px, label pitch {:.3}px, {} minor / {} major ticks",
            axis.axis,
            pitch,
            label_pitch,
            minor_ticks.len(),
            major_ticks.len()
        );

        Ok(TickSet {
            minor_ticks,
            major_ticks,
            pitch,
            label_pitch,
        })
    }
}

/// Displayed coordinate, in view units, of a device position along `axis`.
///
/// The vertical axis of an upper-left origin counts downward, so its value
/// is negated; the horizontal axis is the same for both corner origins.
fn document_value(view: &ViewTransform, axis: Axis, pos: f64) -> f64 {
    let (pw, ph) = view.page_size;
    let value = match axis {
        Axis::Horizontal => {
            let shift = match view.doc_origin {
                DocOrigin::Center => 0.0,
                _ => pw / 2.0,
            };
            view.win_to_doc(Point::new(pos, 0.0)).x + shift
        }
        Axis::Vertical => {
            let shift = match view.doc_origin {
                DocOrigin::Center => 0.0,
                DocOrigin::LowerLeft => ph / 2.0,
                DocOrigin::UpperLeft => -ph / 2.0,
            };
            let y = view.win_to_doc(Point::new(0.0, pos)).y + shift;
            if view.doc_origin == DocOrigin::UpperLeft {
                -y
            } else {
                y
            }
        }
    };
    value * view.unit.units_per_point()
}
