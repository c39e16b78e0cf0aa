//! Card tilt and background parallax from pointer position

use serde::Serialize;

use super::{Point, Rect};

pub const DEFAULT_MAX_TILT_DEG: f32 = 10.0;
/// Parallax shift in pixels for a layer of depth 1.0 at the viewport edge
pub const PARALLAX_RANGE: f32 = 20.0;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Tilt {
    /// Degrees around the horizontal axis; positive tips the top edge back
    pub rotate_x: f32,
    /// Degrees around the vertical axis; positive turns the right edge back
    pub rotate_y: f32,
}

impl Tilt {
    pub fn css_transform(&self) -> String {
        format!("perspective(1000px) rotateX({:.2}deg) rotateY({:.2}deg)", self.rotate_x, self.rotate_y)
    }
}

/// Rotation for a pointer over `card`. The card leans towards the pointer;
/// outside the card (or for an empty card) it rests flat.
pub fn tilt_for(pointer: Point, card: Rect, max_deg: f32) -> Tilt {
    if card.width <= 0.0 || card.height <= 0.0 || !card.contains(pointer) {
        return Tilt::default();
    }
    let c = card.center();
    let nx = (pointer.x - c.x) / (card.width / 2.0);
    let ny = (pointer.y - c.y) / (card.height / 2.0);
    Tilt { rotate_x: -ny * max_deg, rotate_y: nx * max_deg }
}

/// Offset for a background layer; deeper layers move further, against the pointer.
pub fn parallax_offset(pointer: Point, viewport: Rect, depth: f32) -> Point {
    if viewport.width <= 0.0 || viewport.height <= 0.0 {
        return Point::default();
    }
    let c = viewport.center();
    let nx = ((pointer.x - c.x) / (viewport.width / 2.0)).clamp(-1.0, 1.0);
    let ny = ((pointer.y - c.y) / (viewport.height / 2.0)).clamp(-1.0, 1.0);
    Point::new(-nx * depth * PARALLAX_RANGE, -ny * depth * PARALLAX_RANGE)
}
