//! Tick phases inside `FixedUpdate`.
//!
//! ```text
//! Clock -> Timers -> Control -> Spawn -> Collide -> Sweep
//! ```
//!
//! Bevy inserts command sync points between chained sets, so entities
//! allocated in `Spawn` are visible to `Collide` within the same tick.

use bevy::prelude::*;

#[derive(SystemSet, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TickSet {
    /// Advance the simulation clock.
    Clock,
    /// Drain due scheduler entries.
    Timers,
    /// Player input, AI steering, camera coupling.
    Control,
    /// Reactive spawns and the pool allocator.
    Spawn,
    /// Overlap detection and resolution.
    Collide,
    /// Out-of-region cleanup.
    Sweep,
}

pub fn configure(app: &mut App) {
    app.configure_sets(
        FixedUpdate,
        (
            TickSet::Clock,
            TickSet::Timers,
            TickSet::Control,
            TickSet::Spawn,
            TickSet::Collide,
            TickSet::Sweep,
        )
            .chain(),
    );
}
