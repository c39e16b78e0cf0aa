//! Fallback status generator
//!
//! Synthetic presence for when the live source is gone. A pure function of the
//! local time and an RNG; the thresholds and weights live in [`FallbackPolicy`].

use chrono::Timelike;
use rand::Rng;
use serde::{Deserialize, Serialize};

use super::types::{PresenceSnapshot, Status};

/// Two candidate statuses; `primary` is chosen with probability `primary_weight`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct WeightedPair {
    pub primary: Status,
    pub secondary: Status,
    pub primary_weight: f64,
}

impl WeightedPair {
    fn pick<R: Rng + ?Sized>(&self, rng: &mut R) -> Status {
        let weight = self.primary_weight.clamp(0.0, 1.0);
        if rng.gen_bool(weight) { self.primary } else { self.secondary }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FallbackPolicy {
    /// First active hour (inclusive, local time)
    pub active_from_hour: u32,
    /// End of active hours (exclusive). May be smaller than `active_from_hour`
    /// for windows that wrap past midnight.
    pub active_until_hour: u32,
    pub active: WeightedPair,
    pub inactive: WeightedPair,
}

impl Default for FallbackPolicy {
    fn default() -> Self {
        Self {
            active_from_hour: 9,
            active_until_hour: 23,
            active: WeightedPair { primary: Status::Online, secondary: Status::Idle, primary_weight: 0.7 },
            inactive: WeightedPair { primary: Status::Idle, secondary: Status::Offline, primary_weight: 0.3 },
        }
    }
}

impl FallbackPolicy {
    pub fn is_active_hour(&self, hour: u32) -> bool {
        let (from, until) = (self.active_from_hour % 24, self.active_until_hour % 24);
        if from <= until {
            hour >= from && hour < until
        } else {
            hour >= from || hour < until
        }
    }
}

/// One synthetic snapshot for the given moment. Never carries activities.
pub fn synthetic_snapshot<T, R>(policy: &FallbackPolicy, now: &T, rng: &mut R) -> PresenceSnapshot
where
    T: Timelike,
    R: Rng + ?Sized,
{
    let pair = if policy.is_active_hour(now.hour()) { &policy.active } else { &policy.inactive };
    PresenceSnapshot::new(pair.pick(rng))
}
