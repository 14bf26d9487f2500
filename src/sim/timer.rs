//! Polled countdown timer
//!
//! No callbacks: owners call `tick` with the elapsed time of each step and
//! ask `expired` when they care.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Countdown {
    duration: f32,
    remaining: f32,
}

impl Countdown {
    pub fn new(duration: f32) -> Self {
        Self {
            duration,
            remaining: duration,
        }
    }

    /// A countdown that has already run out
    pub fn expired_new(duration: f32) -> Self {
        Self {
            duration,
            remaining: 0.0,
        }
    }

    /// Consume `dt` seconds; never goes below zero
    pub fn tick(&mut self, dt: f32) {
        if dt > 0.0 {
            self.remaining = (self.remaining - dt).max(0.0);
        }
    }

    #[inline]
    pub fn expired(&self) -> bool {
        self.remaining <= 0.0
    }

    /// Restart from the full duration
    pub fn reset(&mut self) {
        self.remaining = self.duration;
    }

    #[inline]
    pub fn remaining(&self) -> f32 {
        self.remaining
    }

    #[inline]
    pub fn duration(&self) -> f32 {
        self.duration
    }

    pub fn elapsed(&self) -> f32 {
        self.duration - self.remaining
    }

    /// True while running with less than `threshold` seconds left
    pub fn remaining_below(&self, threshold: f32) -> bool {
        self.remaining < threshold
    }
}
