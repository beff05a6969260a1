//! Dragging a guide line out of a ruler.
//!
//! Pressing on a ruler starts a drag. While the pointer moves, the host's
//! canvas shows a preview line at the snapped position. Releasing the pointer
//! over the canvas (past the ruler strip) creates a guide; releasing over the
//! strip itself cancels.

use crate::error::Result;
use crate::ticks::Axis;
use crate::view::Point;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

/// Orientation of a guide line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum GuideOrientation {
    Horizontal,
    Vertical,
}

/// A guide to create, positioned in document points.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Guide {
    /// Document Y for horizontal guides, X for vertical ones.
    pub offset: f64,
    pub orientation: GuideOrientation,
}

/// A snapped point in both coordinate spaces.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    pub device: Point,
    pub document: Point,
}

/// Snapping service. `snap_x` / `snap_y` say which coordinates may move.
pub trait Snapper {
    fn snap_point(&self, point: Point, snap_x: bool, snap_y: bool) -> Result<SnapResult>;
}

/// Document command sink.
pub trait GuideSink {
    fn create_guides(&mut self, guides: &[Guide]);
}

/// Cursors a ruler switches between.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorKind {
    Default,
    HorizontalGuide,
    VerticalGuide,
}

/// Windowing-side effects of a guide drag.
pub trait InteractionHost {
    fn capture_pointer(&mut self);

    fn release_pointer(&mut self);

    fn set_cursor(&mut self, cursor: CursorKind);

    /// Put the canvas in guide mode with a live preview line.
    fn begin_guide_preview(&mut self, orientation: GuideOrientation);

    /// Move the preview line; `None` hides it.
    fn update_guide_preview(&mut self, position: Option<Point>);

    /// Restore the previous canvas mode, drop the preview and redraw.
    fn end_guide_preview(&mut self);
}

/// Everything a guide drag talks to.
pub trait GuideHost: Snapper + GuideSink + InteractionHost {}

impl<T: Snapper + GuideSink + InteractionHost + ?Sized> GuideHost for T {}

/// Pointer input routed to one ruler, in ruler-widget pixels.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PointerEvent {
    Down(Point),
    Move(Point),
    Up(Point),
    /// The windowing system revoked the pointer grab.
    CaptureLost,
}

/// Drag progress.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum DragState {
    #[default]
    Idle,
    Dragging {
        start: Point,
        last_point: Option<Point>,
    },
}

/// Guide-drag state machine of one ruler.
#[derive(Debug, Clone)]
pub struct GuideInteraction {
    axis: Axis,
    state: DragState,
    /// Ruler strip size captured when the drag started.
    strip_size: (f64, f64),
}

impl GuideInteraction {
    pub fn new(axis: Axis) -> Self {
        Self {
            axis,
            state: DragState::Idle,
            strip_size: (0.0, 0.0),
        }
    }

    pub fn state(&self) -> DragState {
        self.state
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, DragState::Dragging { .. })
    }

    pub fn orientation(&self) -> GuideOrientation {
        match self.axis {
            Axis::Horizontal => GuideOrientation::Horizontal,
            Axis::Vertical => GuideOrientation::Vertical,
        }
    }

    /// Feed one pointer event. Returns the guide created by a release, if any.
    pub fn handle<H: GuideHost + ?Sized>(
        &mut self,
        event: PointerEvent,
        strip_size: (f64, f64),
        host: &mut H,
    ) -> Option<Guide> {
        match event {
            PointerEvent::Down(point) => {
                self.pointer_down(point, strip_size, host);
                None
            }
            PointerEvent::Move(point) => {
                self.pointer_move(point, host);
                None
            }
            PointerEvent::Up(point) => self.pointer_up(point, host),
            PointerEvent::CaptureLost => {
                self.capture_lost(host);
                None
            }
        }
    }

    fn pointer_down<H: GuideHost + ?Sized>(
        &mut self,
        point: Point,
        strip_size: (f64, f64),
        host: &mut H,
    ) {
        if self.is_dragging() {
            return;
        }
        self.strip_size = strip_size;
        host.set_cursor(self.guide_cursor());
        host.capture_pointer();
        host.begin_guide_preview(self.orientation());
        self.state = DragState::Dragging {
            start: point,
            last_point: None,
        };
        debug!("Started {:?} guide drag at {:?}", self.orientation(), point);
    }

    fn pointer_move<H: GuideHost + ?Sized>(&mut self, point: Point, host: &mut H) {
        let DragState::Dragging { start, .. } = self.state else {
            return;
        };
        self.state = DragState::Dragging {
            start,
            last_point: Some(point),
        };
        let preview = self.snap(point, host).map(|snapped| snapped.device);
        host.update_guide_preview(preview);
    }

    fn pointer_up<H: GuideHost + ?Sized>(&mut self, point: Point, host: &mut H) -> Option<Guide> {
        if !self.is_dragging() {
            return None;
        }
        host.release_pointer();

        let guide = if self.past_strip(self.to_canvas(point)) {
            self.snap(point, host).map(|snapped| Guide {
                offset: match self.axis {
                    Axis::Horizontal => snapped.document.y,
                    Axis::Vertical => snapped.document.x,
                },
                orientation: self.orientation(),
            })
        } else {
            debug!("Guide released over the ruler strip, discarded");
            None
        };
        if let Some(guide) = guide {
            host.create_guides(&[guide]);
        }

        host.set_cursor(CursorKind::Default);
        host.end_guide_preview();
        self.state = DragState::Idle;
        guide
    }

    fn capture_lost<H: GuideHost + ?Sized>(&mut self, host: &mut H) {
        host.release_pointer();
        host.set_cursor(CursorKind::Default);
        if self.is_dragging() {
            host.end_guide_preview();
            self.state = DragState::Idle;
        }
    }

    fn guide_cursor(&self) -> CursorKind {
        match self.axis {
            Axis::Horizontal => CursorKind::HorizontalGuide,
            Axis::Vertical => CursorKind::VerticalGuide,
        }
    }

    /// Ruler-widget point to canvas-viewport point.
    fn to_canvas(&self, point: Point) -> Point {
        let (w, h) = self.strip_size;
        match self.axis {
            Axis::Horizontal => Point::new(point.x, point.y - h),
            Axis::Vertical => Point::new(point.x - w, point.y),
        }
    }

    fn past_strip(&self, canvas: Point) -> bool {
        match self.axis {
            Axis::Horizontal => canvas.y > 0.0,
            Axis::Vertical => canvas.x > 0.0,
        }
    }

    /// Snap along the guide's free coordinate only.
    fn snap<H: GuideHost + ?Sized>(&self, point: Point, host: &H) -> Option<SnapResult> {
        let canvas = self.to_canvas(point);
        let (snap_x, snap_y) = match self.axis {
            Axis::Horizontal => (false, true),
            Axis::Vertical => (true, false),
        };
        match host.snap_point(canvas, snap_x, snap_y) {
            Ok(snapped) => Some(snapped),
            Err(e) => {
                warn!("Guide snapping failed at {:?}: {}", canvas, e);
                None
            }
        }
    }
}
