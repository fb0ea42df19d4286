//! Core plugin: shared resources, the fixed tick and its phase ordering.

use bevy::prelude::*;

use crate::common::clock::{SimClock, advance_clock};
use crate::common::schedule::{self, TickSet};
use crate::common::tunables::Tunables;

pub const TICK_HZ: f64 = 60.0;

pub fn plugin(app: &mut App) {
    app.insert_resource(Tunables::default());
    app.insert_resource(ClearColor(Color::srgb(0.02, 0.02, 0.06)));
    app.insert_resource(SimClock::default());
    app.insert_resource(Time::<Fixed>::from_hz(TICK_HZ));

    schedule::configure(app);
    app.add_systems(FixedUpdate, advance_clock.in_set(TickSet::Clock));
}
