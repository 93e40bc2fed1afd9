//! Zoom and pan state for the rendered grid.
//!
//! The grid is laid out inside a container rectangle at zoom 1. Zooming
//! scales it around the container center and the pan offset moves that
//! center. The offset is clamped to `|scaled size - unscaled size| / 2` on
//! each axis, so at zoom 1 the grid exactly fills its container and cannot
//! be panned at all.

use glam::Vec2;
use sim_garden_core::CellCoord;

use crate::ScreenRect;

/// Smallest supported zoom level.
pub const MIN_ZOOM: f32 = 0.5;
/// Largest supported zoom level.
pub const MAX_ZOOM: f32 = 2.0;
/// Multiplicative zoom change applied per wheel notch.
pub const WHEEL_ZOOM_STEP: f32 = 1.1;
/// Pointer travel in pixels below which a press and release count as a click.
pub const CLICK_SLOP: f32 = 4.0;

const ZOOM_SNAP: f32 = 1e-4;

/// Zoom and offset applied to the grid when drawing.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewportTransform {
    /// Scale factor relative to the container.
    pub zoom: f32,
    /// Displacement of the grid center from the container center in pixels.
    pub offset: Vec2,
}

impl ViewportTransform {
    /// Transform that leaves the grid filling its container.
    pub const IDENTITY: Self = Self {
        zoom: 1.0,
        offset: Vec2::ZERO,
    };

    /// Maps a point in unscaled grid space (`0..bounds.size`) to the screen.
    #[must_use]
    pub fn grid_to_screen(&self, bounds: ScreenRect, local: Vec2) -> Vec2 {
        bounds.center() + self.offset + (local - bounds.size * 0.5) * self.zoom
    }

    /// Inverse of [`ViewportTransform::grid_to_screen`].
    #[must_use]
    pub fn screen_to_grid(&self, bounds: ScreenRect, point: Vec2) -> Vec2 {
        (point - bounds.center() - self.offset) / self.zoom + bounds.size * 0.5
    }
}

impl Default for ViewportTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}

#[derive(Clone, Copy, Debug)]
struct Drag {
    anchor: Vec2,
    start: Vec2,
    last: Vec2,
    travelled: bool,
}

/// Pointer-driven zoom and pan state.
#[derive(Clone, Copy, Debug)]
pub struct Viewport {
    bounds: ScreenRect,
    transform: ViewportTransform,
    drag: Option<Drag>,
}

impl Viewport {
    /// Creates an identity viewport for a container.
    #[must_use]
    pub fn new(bounds: ScreenRect) -> Self {
        Self {
            bounds,
            transform: ViewportTransform::IDENTITY,
            drag: None,
        }
    }

    /// Container the grid fills at zoom 1.
    #[must_use]
    pub fn bounds(&self) -> ScreenRect {
        self.bounds
    }

    /// Current zoom and offset.
    #[must_use]
    pub fn transform(&self) -> ViewportTransform {
        self.transform
    }

    /// Current zoom level.
    #[must_use]
    pub fn zoom(&self) -> f32 {
        self.transform.zoom
    }

    /// Current pan offset.
    #[must_use]
    pub fn offset(&self) -> Vec2 {
        self.transform.offset
    }

    /// Reports whether a drag gesture is in progress.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.drag.is_some()
    }

    /// Moves or resizes the container, re-clamping the offset.
    pub fn set_bounds(&mut self, bounds: ScreenRect) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        self.transform.offset = self.clamp_offset(self.transform.offset);
    }

    /// Largest offset magnitude allowed on each axis at the current zoom.
    #[must_use]
    pub fn max_offset(&self) -> Vec2 {
        let size = self.bounds.size;
        (size * self.transform.zoom - size).abs() * 0.5
    }

    /// Restores zoom 1 and a centered grid.
    pub fn reset(&mut self) {
        self.transform = ViewportTransform::IDENTITY;
        self.drag = None;
    }

    /// Applies a wheel notch anchored at `cursor`. Negative `delta_y` zooms in.
    pub fn wheel(&mut self, delta_y: f32, cursor: Vec2) {
        if delta_y < 0.0 {
            self.zoom_at(WHEEL_ZOOM_STEP, cursor);
        } else if delta_y > 0.0 {
            self.zoom_at(WHEEL_ZOOM_STEP.recip(), cursor);
        }
    }

    /// Applies a pinch gesture scaling by `scale` around `center`.
    pub fn pinch(&mut self, scale: f32, center: Vec2) {
        if scale.is_finite() && scale > 0.0 {
            self.zoom_at(scale, center);
        }
    }

    /// Multiplies the zoom by `factor`, keeping the grid point under `anchor` fixed.
    pub fn zoom_at(&mut self, factor: f32, anchor: Vec2) {
        let previous = self.transform.zoom;
        let mut zoom = (previous * factor).clamp(MIN_ZOOM, MAX_ZOOM);
        if (zoom - 1.0).abs() < ZOOM_SNAP {
            zoom = 1.0;
        }
        if zoom == previous {
            return;
        }

        let relative = anchor - self.bounds.center();
        let offset = relative - (relative - self.transform.offset) * (zoom / previous);
        self.transform.zoom = zoom;
        self.transform.offset = self.clamp_offset(offset);
        if let Some(drag) = &mut self.drag {
            drag.anchor = drag.last - self.transform.offset;
        }
    }

    /// Begins a drag gesture at `point`.
    pub fn drag_start(&mut self, point: Vec2) {
        self.drag = Some(Drag {
            anchor: point - self.transform.offset,
            start: point,
            last: point,
            travelled: false,
        });
    }

    /// Pans so the grid follows the pointer since the drag started.
    pub fn drag_move(&mut self, point: Vec2) {
        let Some(drag) = &mut self.drag else {
            return;
        };
        if point.distance(drag.start) > CLICK_SLOP {
            drag.travelled = true;
        }
        drag.last = point;
        let desired = point - drag.anchor;
        self.transform.offset = self.clamp_offset(desired);
    }

    /// Ends the drag gesture.
    ///
    /// Returns `true` when the pointer never left the click slop, meaning the
    /// gesture should be treated as a click at its start position.
    pub fn drag_end(&mut self, point: Vec2) -> bool {
        let Some(drag) = self.drag.take() else {
            return false;
        };
        !drag.travelled && point.distance(drag.start) <= CLICK_SLOP
    }

    /// Maps a point in unscaled grid space to the screen.
    #[must_use]
    pub fn grid_to_screen(&self, local: Vec2) -> Vec2 {
        self.transform.grid_to_screen(self.bounds, local)
    }

    /// Maps a screen point to unscaled grid space.
    #[must_use]
    pub fn screen_to_grid(&self, point: Vec2) -> Vec2 {
        self.transform.screen_to_grid(self.bounds, point)
    }

    /// Cell of a `rows x columns` grid under the screen point, if any.
    #[must_use]
    pub fn cell_at(&self, point: Vec2, rows: u32, columns: u32) -> Option<CellCoord> {
        if rows == 0 || columns == 0 {
            return None;
        }
        let size = self.bounds.size;
        if size.x <= f32::EPSILON || size.y <= f32::EPSILON {
            return None;
        }

        let local = self.screen_to_grid(point);
        if local.x < 0.0 || local.y < 0.0 || local.x >= size.x || local.y >= size.y {
            return None;
        }
        let column = (local.x / size.x * columns as f32) as u32;
        let row = (local.y / size.y * rows as f32) as u32;
        Some(CellCoord::new(column.min(columns - 1), row.min(rows - 1)))
    }

    fn clamp_offset(&self, offset: Vec2) -> Vec2 {
        let max = self.max_offset();
        offset.clamp(-max, max)
    }
}
