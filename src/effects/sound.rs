//! Ambient interface sounds: which cue plays for which interaction
//!
//! No audio device work happens here. [`SoundBoard::on_event`] answers with a
//! [`PlayRequest`] (cue + final volume) or nothing, and the host plays it.

use serde::Serialize;
use std::collections::HashMap;

/// Master volume for a fresh board
pub const DEFAULT_VOLUME: f32 = 0.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SoundEvent {
    Hover,
    Click,
    Load,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Cue {
    /// Soft tick when the pointer enters a link or button
    Tick,
    /// Press on a link or button
    Pop,
    /// Page finished loading
    Chime,
}

impl Cue {
    pub fn for_event(event: SoundEvent) -> Self {
        match event {
            SoundEvent::Hover => Cue::Tick,
            SoundEvent::Click => Cue::Pop,
            SoundEvent::Load => Cue::Chime,
        }
    }

    /// Seconds before the same cue may play again
    pub fn cooldown(&self) -> f64 {
        match self {
            Cue::Tick => 0.08,
            Cue::Pop => 0.05,
            Cue::Chime => 2.0,
        }
    }

    /// Per-cue level, multiplied by the master volume
    pub fn gain(&self) -> f32 {
        match self {
            Cue::Tick => 0.3,
            Cue::Pop => 0.6,
            Cue::Chime => 1.0,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PlayRequest {
    pub cue: Cue,
    pub volume: f32,
}

#[derive(Debug)]
pub struct SoundBoard {
    muted: bool,
    volume: f32,
    clock: f64,
    last_played: HashMap<Cue, f64>,
}

impl Default for SoundBoard {
    fn default() -> Self {
        Self { muted: false, volume: DEFAULT_VOLUME, clock: 0.0, last_played: HashMap::new() }
    }
}

impl SoundBoard {
    pub fn new() -> Self { Self::default() }

    pub fn is_muted(&self) -> bool { self.muted }

    pub fn volume(&self) -> f32 { self.volume }

    /// Flips mute and returns the new state.
    pub fn toggle_mute(&mut self) -> bool {
        self.muted = !self.muted;
        self.muted
    }

    pub fn set_muted(&mut self, muted: bool) {
        self.muted = muted;
    }

    /// Clamped to `0..=1`; non-finite values are ignored.
    pub fn set_volume(&mut self, volume: f32) {
        if volume.is_finite() {
            self.volume = volume.clamp(0.0, 1.0);
        }
    }

    /// Advances the cooldown clock. Not capped like frame steps: a long pause
    /// really does expire every cooldown.
    pub fn step(&mut self, dt: f32) {
        if dt.is_finite() && dt > 0.0 {
            self.clock += f64::from(dt);
        }
    }

    pub fn on_event(&mut self, event: SoundEvent) -> Option<PlayRequest> {
        if self.muted {
            return None;
        }
        let cue = Cue::for_event(event);
        let volume = self.volume * cue.gain();
        if volume <= 0.0 {
            return None;
        }

        if let Some(last) = self.last_played.get(&cue) {
            if self.clock - last < cue.cooldown() {
                tracing::trace!(?cue, "Skipping cue during cooldown");
                return None;
            }
        }
        self.last_played.insert(cue, self.clock);
        Some(PlayRequest { cue, volume })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn events_map_to_cues() {
        let mut board = SoundBoard::new();
        let hover = board.on_event(SoundEvent::Hover).unwrap();
        assert_eq!(hover.cue, Cue::Tick);
        assert!((hover.volume - DEFAULT_VOLUME * 0.3).abs() < 1e-6);

        assert_eq!(board.on_event(SoundEvent::Click).unwrap().cue, Cue::Pop);
        let load = board.on_event(SoundEvent::Load).unwrap();
        assert_eq!(load.cue, Cue::Chime);
        assert!((load.volume - DEFAULT_VOLUME).abs() < 1e-6);
    }

    #[test]
    fn cooldown_is_per_cue() {
        let mut board = SoundBoard::new();
        assert!(board.on_event(SoundEvent::Hover).is_some());
        // a different cue is not held back
        assert!(board.on_event(SoundEvent::Click).is_some());

        board.step(0.05);
        assert!(board.on_event(SoundEvent::Hover).is_none());
        board.step(0.05);
        assert!(board.on_event(SoundEvent::Hover).is_some());

        // suppressed attempts do not restart the cooldown
        board.step(0.04);
        assert!(board.on_event(SoundEvent::Hover).is_none());
        board.step(0.05);
        assert!(board.on_event(SoundEvent::Hover).is_some());
    }

    #[test]
    fn long_pause_expires_cooldown() {
        let mut board = SoundBoard::new();
        assert!(board.on_event(SoundEvent::Load).is_some());
        board.step(1.0);
        assert!(board.on_event(SoundEvent::Load).is_none());
        board.step(1.5);
        assert!(board.on_event(SoundEvent::Load).is_some());

        board.step(f32::NAN);
        board.step(-3.0);
        assert!(board.on_event(SoundEvent::Load).is_none());
    }

    #[test]
    fn mute_and_volume() {
        let mut board = SoundBoard::new();
        assert!(board.toggle_mute());
        assert!(board.on_event(SoundEvent::Click).is_none());
        assert!(!board.toggle_mute());
        // muted presses did not start a cooldown
        assert!(board.on_event(SoundEvent::Click).is_some());

        board.set_volume(3.0);
        assert_eq!(board.volume(), 1.0);
        board.set_volume(f32::NAN);
        assert_eq!(board.volume(), 1.0);
        board.set_volume(-1.0);
        assert_eq!(board.volume(), 0.0);
        board.step(1.0);
        assert!(board.on_event(SoundEvent::Click).is_none());

        board.set_volume(0.5);
        board.set_muted(true);
        assert!(board.is_muted());
        assert!(board.on_event(SoundEvent::Hover).is_none());
    }
}
