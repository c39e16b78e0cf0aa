//! Loading overlay that stays up for a minimum time, then fades out

use serde::Serialize;

pub const DEFAULT_MIN_DISPLAY: f32 = 0.8;
pub const DEFAULT_FADE: f32 = 0.5;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum LoadingPhase {
    Loading,
    FadingOut,
    Hidden,
}

#[derive(Debug, Clone)]
pub struct LoadingScreen {
    phase: LoadingPhase,
    shown_for: f32,
    fade_elapsed: f32,
    ready: bool,
    min_display: f32,
    fade: f32,
}

impl Default for LoadingScreen {
    fn default() -> Self { Self::new(DEFAULT_MIN_DISPLAY, DEFAULT_FADE) }
}

impl LoadingScreen {
    /// Durations in seconds.
    pub fn new(min_display: f32, fade: f32) -> Self {
        Self {
            phase: LoadingPhase::Loading,
            shown_for: 0.0,
            fade_elapsed: 0.0,
            ready: false,
            min_display: min_display.max(0.0),
            fade: fade.max(0.0),
        }
    }

    pub fn phase(&self) -> LoadingPhase {
        self.phase
    }

    /// The page finished loading.
    pub fn on_ready(&mut self) {
        self.ready = true;
        self.advance();
    }

    /// Not clamped: a backgrounded tab should still get rid of the overlay.
    pub fn step(&mut self, dt: f32) -> f32 {
        let dt = if dt.is_finite() { dt.max(0.0) } else { 0.0 };
        match self.phase {
            LoadingPhase::Loading => self.shown_for += dt,
            LoadingPhase::FadingOut => self.fade_elapsed += dt,
            LoadingPhase::Hidden => {}
        }
        self.advance();
        self.opacity()
    }

    pub fn opacity(&self) -> f32 {
        match self.phase {
            LoadingPhase::Loading => 1.0,
            LoadingPhase::FadingOut if self.fade > 0.0 => (1.0 - self.fade_elapsed / self.fade).clamp(0.0, 1.0),
            _ => 0.0,
        }
    }

    pub fn is_visible(&self) -> bool {
        self.phase != LoadingPhase::Hidden
    }

    fn advance(&mut self) {
        if self.phase == LoadingPhase::Loading && self.ready && self.shown_for >= self.min_display {
            self.phase = LoadingPhase::FadingOut;
        }
        if self.phase == LoadingPhase::FadingOut && self.fade_elapsed >= self.fade {
            self.phase = LoadingPhase::Hidden;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn waits_for_ready() {
        let mut screen = LoadingScreen::new(0.5, 0.25);
        screen.step(2.0);
        assert_eq!(screen.phase(), LoadingPhase::Loading);
        assert_eq!(screen.opacity(), 1.0);

        screen.on_ready();
        assert_eq!(screen.phase(), LoadingPhase::FadingOut);
        screen.step(0.125);
        assert!((screen.opacity() - 0.5).abs() < 1e-6);
        screen.step(0.125);
        assert_eq!(screen.phase(), LoadingPhase::Hidden);
        assert!(!screen.is_visible());
    }

    #[test]
    fn honors_minimum_display() {
        let mut screen = LoadingScreen::new(0.5, 0.25);
        screen.on_ready();
        assert_eq!(screen.phase(), LoadingPhase::Loading);
        screen.step(0.25);
        assert_eq!(screen.phase(), LoadingPhase::Loading);
        screen.step(0.25);
        assert_eq!(screen.phase(), LoadingPhase::FadingOut);
    }

    #[test]
    fn zero_durations_hide_at_once() {
        let mut screen = LoadingScreen::new(0.0, 0.0);
        screen.on_ready();
        assert_eq!(screen.phase(), LoadingPhase::Hidden);
        assert_eq!(screen.opacity(), 0.0);
    }
}
