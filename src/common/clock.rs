//! Simulation clock.
//!
//! Every delayed effect (cooldowns, timers, restart) is expressed as
//! "not before T + delta" against this clock, never as a frame count.

use std::time::Duration;

use bevy::prelude::*;

#[derive(Resource, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SimClock {
    elapsed: Duration,
}

impl SimClock {
    pub fn at_ms(ms: u64) -> Self {
        Self { elapsed: Duration::from_millis(ms) }
    }

    #[inline]
    pub fn now_ms(&self) -> u64 {
        self.elapsed.as_millis() as u64
    }

    #[inline]
    pub fn advance(&mut self, dt: Duration) {
        self.elapsed += dt;
    }
}

/// Accumulate the fixed-step delta.
///
/// Accumulating (instead of copying `elapsed`) keeps manual advances made by
/// tests or tools intact.
pub fn advance_clock(time: Res<Time<Fixed>>, mut clock: ResMut<SimClock>) {
    clock.advance(time.delta());
}
