//! Effects - per-frame state for the page's decorative interactions
//!
//! Every effect is independent: it owns its state, takes pointer/timer events
//! and exposes what to draw. Nothing here touches presence or other effects.
//!
//! | Effect | Driver | Output |
//! |--------|--------|--------|
//! | `particles` | frame + pointer | particle positions, link lines |
//! | `cursor` | frame + pointer | dot / ring positions, ring scale |
//! | `tilt` | pointer | card rotation, parallax offsets |
//! | `ripple` | click + frame | ripple circle geometry, opacity |
//! | `loading` | frame + page ready | overlay opacity, visibility |
//! | `clock` | 1s timer | clock / date text |
//! | `tooltip` | hover | tooltip placement |
//! | `sound` | hover / click / load | cue and volume to play, if any |

pub mod clock;
pub mod cursor;
pub mod loading;
pub mod particles;
pub mod ripple;
pub mod sound;
pub mod tilt;
pub mod tooltip;

use serde::Serialize;

/// Longest frame step applied at once; avoids jumps after a stalled tab.
pub const MAX_FRAME_DT: f32 = 0.05;

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub fn new(x: f32, y: f32) -> Self { Self { x, y } }

    pub fn distance(&self, other: Point) -> f32 {
        ((self.x - other.x).powi(2) + (self.y - other.y).powi(2)).sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self { Self { x, y, width, height } }

    pub fn center(&self) -> Point {
        Point::new(self.x + self.width / 2.0, self.y + self.height / 2.0)
    }

    pub fn right(&self) -> f32 { self.x + self.width }
    pub fn bottom(&self) -> f32 { self.y + self.height }

    pub fn contains(&self, p: Point) -> bool {
        p.x >= self.x && p.x <= self.right() && p.y >= self.y && p.y <= self.bottom()
    }
}

pub(crate) fn clamp_dt(dt: f32) -> f32 {
    if dt.is_finite() { dt.clamp(0.0, MAX_FRAME_DT) } else { 0.0 }
}
