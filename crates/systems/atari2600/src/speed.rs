//! Poll interval for manual control

use crate::decision::{FASTER_KEY, SLOWER_KEY};
use emu_core::KeyState;
use std::fmt;
use std::time::Duration;

/// Milliseconds slept between key polls, always within [MIN, MAX]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct PlaybackSpeed(u32);

impl PlaybackSpeed {
    pub const MIN: u32 = 10;
    pub const MAX: u32 = 100;
    pub const STEP: u32 = 5;
    pub const DEFAULT: u32 = 50;

    /// Clamps out-of-range values
    pub fn new(millis: u32) -> Self {
        Self(millis.clamp(Self::MIN, Self::MAX))
    }

    pub fn millis(self) -> u32 {
        self.0
    }

    pub fn as_duration(self) -> Duration {
        Duration::from_millis(u64::from(self.0))
    }

    pub fn faster(&mut self) {
        self.0 = self.0.saturating_sub(Self::STEP).max(Self::MIN);
    }

    pub fn slower(&mut self) {
        self.0 = (self.0 + Self::STEP).min(Self::MAX);
    }

    /// Apply at most one adjustment for the held speed keys; faster wins when
    /// both are held. Returns true when the interval changed.
    pub fn adjust(&mut self, keys: &KeyState) -> bool {
        let before = self.0;
        if keys.is_down(FASTER_KEY) {
            self.faster();
        } else if keys.is_down(SLOWER_KEY) {
            self.slower();
        }
        self.0 != before
    }
}

impl Default for PlaybackSpeed {
    fn default() -> Self {
        Self(Self::DEFAULT)
    }
}

impl fmt::Display for PlaybackSpeed {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}ms", self.0)
    }
}
