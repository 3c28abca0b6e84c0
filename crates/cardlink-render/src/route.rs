//! Connector routing between card anchors.

use cardlink_core::style::{Anchor, ArrowOverlay, ConnectorKind};
use kurbo::{BezPath, Point, Rect, Vec2};

/// Attachment point at the middle of a frame's side.
pub fn anchor_point(frame: Rect, anchor: Anchor) -> Point {
    let center = frame.center();
    match anchor {
        Anchor::Top => Point::new(center.x, frame.y0),
        Anchor::Bottom => Point::new(center.x, frame.y1),
        Anchor::Left => Point::new(frame.x0, center.y),
        Anchor::Right => Point::new(frame.x1, center.y),
    }
}

fn outward(anchor: Anchor) -> Vec2 {
    let (x, y) = anchor.outward();
    Vec2::new(x, y)
}

/// A routed connector: the polyline plus its drawable paths.
#[derive(Debug, Clone)]
pub struct Route {
    pub points: Vec<Point>,
    pub path: BezPath,
    pub arrow: BezPath,
}

impl Route {
    pub fn start(&self) -> Option<Point> {
        self.points.first().copied()
    }

    pub fn end(&self) -> Option<Point> {
        self.points.last().copied()
    }
}

/// Route a connector from one card side to another.
pub fn route(
    from: Rect,
    from_anchor: Anchor,
    to: Rect,
    to_anchor: Anchor,
    kind: ConnectorKind,
    arrow: &ArrowOverlay,
) -> Route {
    let points = match kind {
        ConnectorKind::Flowchart { stub, gap } => flowchart_points(
            anchor_point(from, from_anchor),
            from_anchor,
            anchor_point(to, to_anchor),
            to_anchor,
            stub,
            gap,
        ),
        ConnectorKind::Straight => vec![anchor_point(from, from_anchor), anchor_point(to, to_anchor)],
    };
    Route {
        path: polyline_path(&points),
        arrow: arrow_head(&points, arrow),
        points,
    }
}

/// Orthogonal route: gap, stub out of the source, one elbow pair, stub into the target.
pub fn flowchart_points(
    from: Point,
    from_anchor: Anchor,
    to: Point,
    to_anchor: Anchor,
    stub: (f64, f64),
    gap: f64,
) -> Vec<Point> {
    let from_dir = outward(from_anchor);
    let to_dir = outward(to_anchor);
    let start = from + from_dir * gap;
    let end = to + to_dir * gap;
    let start_out = start + from_dir * stub.0;
    let end_in = end + to_dir * stub.1;

    let (m1, m2) = if from_anchor.is_vertical() {
        let mid_y = (start_out.y + end_in.y) / 2.0;
        (Point::new(start_out.x, mid_y), Point::new(end_in.x, mid_y))
    } else {
        let mid_x = (start_out.x + end_in.x) / 2.0;
        (Point::new(mid_x, start_out.y), Point::new(mid_x, end_in.y))
    };

    simplify(vec![start, start_out, m1, m2, end_in, end])
}

/// Drop repeated points and interior points on a straight run.
fn simplify(points: Vec<Point>) -> Vec<Point> {
    let mut out: Vec<Point> = Vec::with_capacity(points.len());
    for p in points {
        if out.last().is_some_and(|last| last.distance(p) < 1e-9) {
            continue;
        }
        if out.len() >= 2 {
            let a = out[out.len() - 2];
            let b = out[out.len() - 1];
            let cross = (b - a).cross(p - b);
            let forward = (b - a).dot(p - b) > 0.0;
            if cross.abs() < 1e-9 && forward {
                out.pop();
            }
        }
        out.push(p);
    }
    out
}

fn polyline_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    for p in rest {
        path.line_to(*p);
    }
    path
}

/// Point and unit direction at a fraction of the polyline's length.
pub fn point_along(points: &[Point], location: f64) -> Option<(Point, Vec2)> {
    let total: f64 = points.windows(2).map(|w| w[0].distance(w[1])).sum();
    if total <= f64::EPSILON {
        return None;
    }
    let mut remaining = total * location.clamp(0.0, 1.0);
    for w in points.windows(2) {
        let len = w[0].distance(w[1]);
        if len <= f64::EPSILON {
            continue;
        }
        if remaining <= len {
            let dir = (w[1] - w[0]) / len;
            return Some((w[0] + dir * remaining, dir));
        }
        remaining -= len;
    }
    let n = points.len();
    let dir = (points[n - 1] - points[n - 2]).normalize();
    Some((points[n - 1], dir))
}

/// Closed triangular arrow head whose tip sits at `overlay.location`.
fn arrow_head(points: &[Point], overlay: &ArrowOverlay) -> BezPath {
    let mut path = BezPath::new();
    let Some((tip, dir)) = point_along(points, overlay.location) else {
        return path;
    };
    let perp = Vec2::new(-dir.y, dir.x);
    let back = tip - dir * overlay.length;
    let half = overlay.width / 2.0;

    path.move_to(tip);
    path.line_to(back + perp * half);
    path.line_to(back - perp * half);
    path.close_path();
    path
}
