//! Click ripples on buttons and links

use serde::Serialize;

use super::{clamp_dt, Point, Rect};

/// Seconds from spawn to fully faded
pub const RIPPLE_LIFETIME: f32 = 0.6;
/// Scale reached at the end of the lifetime
pub const RIPPLE_END_SCALE: f32 = 4.0;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Ripple {
    /// Top-left of the ripple square, relative to the element
    pub left: f32,
    pub top: f32,
    /// Diameter before scaling
    pub size: f32,
    age: f32,
}

impl Ripple {
    /// A ripple centered on `click`, sized to the element's larger side.
    pub fn at(click: Point, element: Rect) -> Self {
        let size = element.width.max(element.height);
        Self {
            left: click.x - element.x - size / 2.0,
            top: click.y - element.y - size / 2.0,
            size,
            age: 0.0,
        }
    }

    pub fn progress(&self) -> f32 {
        (self.age / RIPPLE_LIFETIME).clamp(0.0, 1.0)
    }

    pub fn scale(&self) -> f32 {
        self.progress() * RIPPLE_END_SCALE
    }

    pub fn opacity(&self) -> f32 {
        1.0 - self.progress()
    }

    pub fn is_done(&self) -> bool {
        self.age >= RIPPLE_LIFETIME
    }
}

/// Live ripples for one element; finished ones are dropped on `step`.
#[derive(Debug, Default)]
pub struct Ripples {
    live: Vec<Ripple>,
}

impl Ripples {
    pub fn new() -> Self { Self::default() }

    pub fn on_click(&mut self, click: Point, element: Rect) {
        self.live.push(Ripple::at(click, element));
    }

    pub fn step(&mut self, dt: f32) {
        let dt = clamp_dt(dt);
        for r in &mut self.live {
            r.age += dt;
        }
        self.live.retain(|r| !r.is_done());
    }

    pub fn live(&self) -> &[Ripple] {
        &self.live
    }
}
