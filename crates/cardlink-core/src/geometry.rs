//! Translates relative gesture deltas into absolute card geometry.
//!
//! The gesture source only reports deltas. The tracker keeps the last known
//! absolute position of every card it has seen and writes the result back to
//! the [`CardStore`] on every call, so stored and tracked geometry never drift.

use crate::card::{CardError, CardId, CardStore};
use crate::snap::snap_to_grid;
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use thiserror::Error;

/// Default lower bound for card width and height.
pub const MIN_CARD_SIZE: f64 = 20.0;

/// Geometry errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeometryError {
    #[error("Card not found: {0}")]
    UnknownCard(CardId),
    #[error("Gesture delta is not a finite number")]
    NonFinite,
}

impl From<CardError> for GeometryError {
    fn from(err: CardError) -> Self {
        match err {
            CardError::NotFound(id) => GeometryError::UnknownCard(id),
        }
    }
}

/// One resize-move step reported by the gesture source.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ResizeDelta {
    /// How far the left edge moved (positive = right).
    pub delta_left: f64,
    /// How far the top edge moved (positive = down).
    pub delta_top: f64,
    /// New absolute width.
    pub width: f64,
    /// New absolute height.
    pub height: f64,
}

impl ResizeDelta {
    fn is_finite(&self) -> bool {
        self.delta_left.is_finite()
            && self.delta_top.is_finite()
            && self.width.is_finite()
            && self.height.is_finite()
    }
}

#[derive(Debug, Clone, Copy)]
struct Tracked {
    /// Absolute position before grid snapping.
    position: Point,
    /// Position last written to the store.
    stored: Point,
}

/// Per-card absolute transform tracking.
#[derive(Debug, Clone)]
pub struct GeometryTracker {
    tracked: HashMap<CardId, Tracked>,
    min_size: f64,
    snap_grid: Option<f64>,
}

impl Default for GeometryTracker {
    fn default() -> Self {
        Self::new(MIN_CARD_SIZE, None)
    }
}

impl GeometryTracker {
    pub fn new(min_size: f64, snap_grid: Option<f64>) -> Self {
        Self {
            tracked: HashMap::new(),
            min_size: min_size.max(0.0),
            snap_grid: snap_grid.filter(|g| *g > 0.0),
        }
    }

    /// Last known unsnapped position of a card, if it has been moved.
    pub fn tracked_position(&self, id: &CardId) -> Option<Point> {
        self.tracked.get(id).map(|t| t.position)
    }

    /// Apply a drag-move delta and return the new stored position.
    pub fn apply_drag_delta(
        &mut self,
        cards: &mut CardStore,
        id: &CardId,
        dx: f64,
        dy: f64,
    ) -> Result<Point, GeometryError> {
        if !dx.is_finite() || !dy.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        let start = self.current_position(cards, id)?;
        let position = clamp_to_canvas(start + Vec2::new(dx, dy));
        let stored = match self.snap_grid {
            Some(grid) => snap_to_grid(position, grid).point,
            None => position,
        };

        cards.update_position(id, stored.x, stored.y)?;
        self.tracked.insert(id.clone(), Tracked { position, stored });
        Ok(stored)
    }

    /// Apply a resize-move step and return the card's new frame.
    ///
    /// Moving the left or top edge shifts the anchor by the edge delta while
    /// the opposite edge stays put, so the extent on that axis follows from
    /// the fixed edge. The moved edge is snapped to the grid when snapping is
    /// enabled and kept on the canvas. Sizes below the minimum are clamped.
    pub fn apply_resize_delta(
        &mut self,
        cards: &mut CardStore,
        id: &CardId,
        delta: ResizeDelta,
    ) -> Result<Rect, GeometryError> {
        if !delta.is_finite() {
            return Err(GeometryError::NonFinite);
        }
        let frame = cards
            .get(id)
            .map(|c| c.frame())
            .ok_or_else(|| GeometryError::UnknownCard(id.clone()))?;

        let mut leading = Point::new(frame.x0 + delta.delta_left, frame.y0 + delta.delta_top);
        if let Some(grid) = self.snap_grid {
            leading = snap_to_grid(leading, grid).point;
        }
        let (x, width) = resize_axis(frame.x0, frame.x1, delta.delta_left, leading.x, delta.width, self.min_size);
        let (y, height) = resize_axis(frame.y0, frame.y1, delta.delta_top, leading.y, delta.height, self.min_size);
        if width != delta.width || height != delta.height {
            log::debug!(
                "Clamped resize of {} from {}x{} to {}x{}",
                id, delta.width, delta.height, width, height
            );
        }

        let position = Point::new(x, y);
        cards.update_position(id, position.x, position.y)?;
        cards.update_size(id, width, height)?;
        self.tracked.insert(
            id.clone(),
            Tracked {
                position,
                stored: position,
            },
        );
        Ok(Rect::from_origin_size(position, (width, height)))
    }

    /// Tracked position, re-seeded from the store when another path moved the card.
    fn current_position(&self, cards: &CardStore, id: &CardId) -> Result<Point, GeometryError> {
        let card = cards
            .get(id)
            .ok_or_else(|| GeometryError::UnknownCard(id.clone()))?;
        let stored = card.position();
        match self.tracked.get(id) {
            Some(t) if t.stored == stored => Ok(t.position),
            Some(_) => {
                log::debug!("Re-seeding tracked geometry for {} from store", id);
                Ok(stored)
            }
            None => Ok(stored),
        }
    }
}

/// Resize one axis spanning `start..end`. Returns the new start and extent.
///
/// A moved leading edge lands on `leading`, clamped to the canvas and to at
/// most `end - min`; the trailing edge never moves. Otherwise the start is
/// kept and the requested extent is clamped to the minimum.
fn resize_axis(start: f64, end: f64, edge_delta: f64, leading: f64, new_extent: f64, min: f64) -> (f64, f64) {
    if edge_delta == 0.0 {
        return (start, new_extent.max(min));
    }
    let new_start = leading.min(end - min).max(0.0);
    (new_start, end - new_start)
}

fn clamp_to_canvas(point: Point) -> Point {
    Point::new(point.x.max(0.0), point.y.max(0.0))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn setup() -> (CardStore, CardId) {
        let mut cards = CardStore::new();
        let id = cards.create_card().id().clone();
        (cards, id)
    }

    #[test]
    fn test_drag_updates_store() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();

        let p = tracker.apply_drag_delta(&mut cards, &id, 15.0, -30.0).unwrap();
        assert_eq!(p, Point::new(115.0, 70.0));
        assert_eq!(cards.get(&id).unwrap().position(), Point::new(115.0, 70.0));
    }

    #[test]
    fn test_drag_deltas_accumulate() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();

        for _ in 0..4 {
            tracker.apply_drag_delta(&mut cards, &id, 2.5, 1.0).unwrap();
        }
        assert_eq!(cards.get(&id).unwrap().position(), Point::new(110.0, 104.0));
    }

    #[test]
    fn test_drag_reseeds_after_external_move() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();
        tracker.apply_drag_delta(&mut cards, &id, 10.0, 10.0).unwrap();

        cards.update_position(&id, 300.0, 300.0).unwrap();
        let p = tracker.apply_drag_delta(&mut cards, &id, 1.0, 1.0).unwrap();
        assert_eq!(p, Point::new(301.0, 301.0));
    }

    #[test]
    fn test_drag_unknown_card() {
        let (mut cards, _) = setup();
        let mut tracker = GeometryTracker::default();
        let ghost = CardId::from("card-5");
        assert_eq!(
            tracker.apply_drag_delta(&mut cards, &ghost, 1.0, 1.0),
            Err(GeometryError::UnknownCard(ghost))
        );
    }

    #[test]
    fn test_drag_rejects_nan() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();
        assert_eq!(
            tracker.apply_drag_delta(&mut cards, &id, f64::NAN, 0.0),
            Err(GeometryError::NonFinite)
        );
        assert_eq!(cards.get(&id).unwrap().position(), Point::new(100.0, 100.0));
    }

    #[test]
    fn test_drag_with_grid_snaps_stored_position() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::new(MIN_CARD_SIZE, Some(20.0));

        // 100 + 6 = 106 rounds back to 100; the tracker keeps 106.
        let p = tracker.apply_drag_delta(&mut cards, &id, 6.0, 0.0).unwrap();
        assert_eq!(p, Point::new(100.0, 100.0));
        // 106 + 6 = 112 rounds to 120.
        let p = tracker.apply_drag_delta(&mut cards, &id, 6.0, 0.0).unwrap();
        assert_eq!(p, Point::new(120.0, 100.0));
        assert_eq!(tracker.tracked_position(&id), Some(Point::new(112.0, 100.0)));
    }

    #[test]
    fn test_resize_from_left_keeps_right_edge() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();
        let right = cards.get(&id).unwrap().frame().x1;

        let frame = tracker
            .apply_resize_delta(
                &mut cards,
                &id,
                ResizeDelta {
                    delta_left: 30.0,
                    delta_top: 0.0,
                    width: 170.0,
                    height: 120.0,
                },
            )
            .unwrap();

        assert_eq!(frame.x0, 130.0);
        assert_eq!(frame.width(), 170.0);
        assert_eq!(frame.x1, right);
        assert_eq!(cards.get(&id).unwrap().frame(), frame);
    }

    #[test]
    fn test_resize_from_right_keeps_anchor() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();

        let frame = tracker
            .apply_resize_delta(
                &mut cards,
                &id,
                ResizeDelta {
                    delta_left: 0.0,
                    delta_top: 0.0,
                    width: 260.0,
                    height: 90.0,
                },
            )
            .unwrap();

        assert_eq!(frame.origin(), Point::new(100.0, 100.0));
        assert_eq!((frame.width(), frame.height()), (260.0, 90.0));
    }

    #[test]
    fn test_resize_clamps_degenerate_size() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();

        let frame = tracker
            .apply_resize_delta(
                &mut cards,
                &id,
                ResizeDelta {
                    delta_left: 0.0,
                    delta_top: 130.0,
                    width: -10.0,
                    height: -10.0,
                },
            )
            .unwrap();

        assert_eq!(frame.width(), MIN_CARD_SIZE);
        assert_eq!(frame.height(), MIN_CARD_SIZE);
        // Top edge was dragged past the bottom; the bottom edge stays at 220.
        assert_eq!(frame.y1, 220.0);
        assert_eq!(frame.x0, 100.0);
    }

    #[test]
    fn test_drag_after_resize_uses_new_anchor() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();
        tracker
            .apply_resize_delta(
                &mut cards,
                &id,
                ResizeDelta {
                    delta_left: -20.0,
                    delta_top: -20.0,
                    width: 220.0,
                    height: 140.0,
                },
            )
            .unwrap();

        let p = tracker.apply_drag_delta(&mut cards, &id, 5.0, 5.0).unwrap();
        assert_eq!(p, Point::new(85.0, 85.0));
    }

    #[test]
    fn test_left_resize_after_snapped_drag_keeps_right_edge() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::new(MIN_CARD_SIZE, Some(20.0));
        tracker.apply_drag_delta(&mut cards, &id, 6.0, 0.0).unwrap();
        let before = cards.get(&id).unwrap().frame();
        assert_eq!((before.x0, before.x1), (100.0, 300.0));

        let frame = tracker
            .apply_resize_delta(
                &mut cards,
                &id,
                ResizeDelta {
                    delta_left: 10.0,
                    delta_top: 0.0,
                    width: 190.0,
                    height: 120.0,
                },
            )
            .unwrap();

        // 110 snaps to 120; the right edge does not move.
        assert_eq!(frame.x0, 120.0);
        assert_eq!(frame.x1, 300.0);
        assert_eq!(cards.get(&id).unwrap().frame(), frame);
    }

    #[test]
    fn test_left_resize_at_canvas_edge_keeps_right_edge() {
        let (mut cards, id) = setup();
        let mut tracker = GeometryTracker::default();
        tracker.apply_drag_delta(&mut cards, &id, -100.0, -100.0).unwrap();

        let frame = tracker
            .apply_resize_delta(
                &mut cards,
                &id,
                ResizeDelta {
                    delta_left: -30.0,
                    delta_top: -15.0,
                    width: 230.0,
                    height: 135.0,
                },
            )
            .unwrap();

        assert_eq!(frame.origin(), Point::ZERO);
        assert_eq!(frame.x1, 200.0);
        assert_eq!(frame.y1, 120.0);
    }
}
