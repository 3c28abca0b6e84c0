//! Grid snapping for dragged card positions.

use kurbo::Point;

/// Grid cell size used when snapping is enabled without an explicit size.
pub const GRID_SIZE: f64 = 20.0;

/// Result of a snap operation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SnapResult {
    /// The snapped point.
    pub point: Point,
    /// Whether snapping moved the point at all.
    pub moved: bool,
}

/// Snap a point to the nearest grid intersection.
pub fn snap_to_grid(point: Point, grid_size: f64) -> SnapResult {
    if grid_size <= 0.0 {
        return SnapResult { point, moved: false };
    }
    let snapped = Point::new(
        (point.x / grid_size).round() * grid_size,
        (point.y / grid_size).round() * grid_size,
    );
    SnapResult {
        point: snapped,
        moved: snapped != point,
    }
}
