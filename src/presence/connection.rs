//! Reconnect bookkeeping for the presence socket

use std::time::Duration;

pub const DEFAULT_MAX_RECONNECT_ATTEMPTS: u32 = 5;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReconnectDecision {
    Retry { attempt: u32, delay: Duration },
    Fallback,
}

/// Consecutive reconnect attempts since the last successful open
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionState {
    attempt: u32,
    ceiling: u32,
    base_delay: Duration,
}

impl ConnectionState {
    pub fn new(ceiling: u32, base_delay: Duration) -> Self {
        Self { attempt: 0, ceiling, base_delay }
    }

    pub fn attempt(&self) -> u32 { self.attempt }
    pub fn ceiling(&self) -> u32 { self.ceiling }

    pub fn on_open(&mut self) {
        self.attempt = 0;
    }

    /// Linear backoff: attempt N waits N × base delay.
    pub fn reconnect_delay(&self, attempt: u32) -> Duration {
        self.base_delay.saturating_mul(attempt)
    }

    pub fn on_unclean_close(&mut self) -> ReconnectDecision {
        self.attempt = self.attempt.saturating_add(1);
        if self.attempt <= self.ceiling {
            ReconnectDecision::Retry { attempt: self.attempt, delay: self.reconnect_delay(self.attempt) }
        } else {
            ReconnectDecision::Fallback
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_delays() {
        let state = ConnectionState::new(5, Duration::from_secs(2));
        for n in 1..=5u32 {
            assert_eq!(state.reconnect_delay(n), Duration::from_secs(2 * n as u64));
        }
        assert!(state.reconnect_delay(2) >= state.reconnect_delay(1));
    }

    #[test]
    fn sixth_failure_falls_back() {
        let mut state = ConnectionState::new(5, Duration::from_millis(100));
        for n in 1..=5 {
            assert_eq!(
                state.on_unclean_close(),
                ReconnectDecision::Retry { attempt: n, delay: Duration::from_millis(100 * n as u64) }
            );
        }
        assert_eq!(state.on_unclean_close(), ReconnectDecision::Fallback);
    }

    #[test]
    fn open_resets_counter() {
        let mut state = ConnectionState::new(5, Duration::from_secs(1));
        state.on_unclean_close();
        state.on_unclean_close();
        assert_eq!(state.attempt(), 2);
        state.on_open();
        assert_eq!(state.attempt(), 0);
        assert_eq!(
            state.on_unclean_close(),
            ReconnectDecision::Retry { attempt: 1, delay: Duration::from_secs(1) }
        );
    }

    #[test]
    fn zero_ceiling_never_retries() {
        let mut state = ConnectionState::new(0, Duration::from_secs(1));
        assert_eq!(state.on_unclean_close(), ReconnectDecision::Fallback);
    }
}
