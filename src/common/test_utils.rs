//! Test helpers.
//!
//! `World::run_system_once` (via the `RunSystemOnce` trait) executes a system
//! without building a full schedule. Systems that use `Commands` only enqueue
//! structural changes, so we call `world.flush()` before returning.

use avian2d::prelude::CollisionStart;
use bevy::ecs::message::Messages;
use bevy::ecs::system::{IntoSystem, RunSystemOnce};
use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::feedback::ScreenShake;
use crate::plugins::player::RocketSlot;
use crate::plugins::pool::{EntityPool, SpawnRequest};
use crate::plugins::scheduler::Scheduler;
use crate::plugins::session::GameSession;
use crate::plugins::spawner::SpawnRng;
use crate::plugins::world::ScrollCamera;

/// Run a system once on the given world, then flush deferred commands.
/// Returns the system output.
pub fn run_system_once<T, Out, Marker>(world: &mut World, system: T) -> Out
where
    T: IntoSystem<(), Out, Marker>,
{
    let out = world.run_system_once(system).expect("system run failed");
    world.flush();
    out
}

/// A bare world with every gameplay resource the tick systems read.
pub fn sim_world(now_ms: u64) -> World {
    let mut world = World::new();
    world.insert_resource(Tunables::default());
    world.insert_resource(SimClock::at_ms(now_ms));
    world.insert_resource(EntityPool::default());
    world.insert_resource(Scheduler::default());
    world.insert_resource(GameSession::default());
    world.insert_resource(RocketSlot::default());
    world.insert_resource(ScrollCamera::default());
    world.insert_resource(SpawnRng::seeded(7));
    world.insert_resource(ScreenShake::default());
    world.init_resource::<NextState<GameState>>();
    world.init_resource::<Messages<SpawnRequest>>();
    world.init_resource::<Messages<CollisionStart>>();
    world
}

/// Report an overlap the way avian does: colliders live on their bodies.
pub fn write_collision_start(world: &mut World, a: Entity, b: Entity) {
    world.write_message(CollisionStart {
        collider1: a,
        collider2: b,
        body1: Some(a),
        body2: Some(b),
    });
}
