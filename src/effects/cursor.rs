//! Custom cursor: a dot pinned to the pointer and a ring that trails it

use serde::Serialize;

use super::{clamp_dt, Point};

/// Ring catch-up rate (fraction of the remaining gap per 1/60 s frame)
pub const RING_FOLLOW: f32 = 0.15;
pub const RING_HOVER_SCALE: f32 = 1.5;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CursorFrame {
    pub dot: Point,
    pub ring: Point,
    pub ring_scale: f32,
    pub visible: bool,
}

#[derive(Debug, Clone)]
pub struct CursorFollower {
    dot: Point,
    ring: Point,
    hovering: bool,
    visible: bool,
    follow: f32,
}

impl Default for CursorFollower {
    fn default() -> Self { Self::new(RING_FOLLOW) }
}

impl CursorFollower {
    pub fn new(follow: f32) -> Self {
        Self { dot: Point::default(), ring: Point::default(), hovering: false, visible: false, follow: follow.clamp(0.0, 1.0) }
    }

    pub fn on_pointer_move(&mut self, p: Point) {
        if !self.visible {
            // first sighting: no trailing in from the corner
            self.ring = p;
        }
        self.dot = p;
        self.visible = true;
    }

    pub fn on_pointer_leave(&mut self) {
        self.visible = false;
    }

    /// Pointer entered or left a link/button.
    pub fn set_hover(&mut self, hovering: bool) {
        self.hovering = hovering;
    }

    pub fn step(&mut self, dt: f32) -> CursorFrame {
        let frames = clamp_dt(dt) * 60.0;
        let t = 1.0 - (1.0 - self.follow).powf(frames);
        self.ring.x += (self.dot.x - self.ring.x) * t;
        self.ring.y += (self.dot.y - self.ring.y) * t;
        self.frame()
    }

    pub fn frame(&self) -> CursorFrame {
        CursorFrame {
            dot: self.dot,
            ring: self.ring,
            ring_scale: if self.hovering { RING_HOVER_SCALE } else { 1.0 },
            visible: self.visible,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ring_trails_then_converges() {
        let mut cursor = CursorFollower::default();
        cursor.on_pointer_move(Point::new(0.0, 0.0));
        cursor.on_pointer_move(Point::new(100.0, 0.0));

        let first = cursor.step(1.0 / 60.0);
        assert_eq!(first.dot, Point::new(100.0, 0.0));
        assert!((first.ring.x - 15.0).abs() < 1e-3);

        for _ in 0..200 {
            cursor.step(1.0 / 60.0);
        }
        assert!((cursor.frame().ring.x - 100.0).abs() < 0.01);
    }

    #[test]
    fn first_move_snaps_ring() {
        let mut cursor = CursorFollower::default();
        assert!(!cursor.frame().visible);
        cursor.on_pointer_move(Point::new(40.0, 60.0));
        assert_eq!(cursor.frame().ring, Point::new(40.0, 60.0));
        assert!(cursor.frame().visible);
    }

    #[test]
    fn hover_scales_ring() {
        let mut cursor = CursorFollower::default();
        cursor.set_hover(true);
        assert_eq!(cursor.frame().ring_scale, RING_HOVER_SCALE);
        cursor.set_hover(false);
        assert_eq!(cursor.frame().ring_scale, 1.0);
    }
}
