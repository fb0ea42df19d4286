//! Spawner: placement rules for new entities, plus the reactive star burst.
//!
//! Repeating cow/UFO timers live in the scheduler; this module only decides
//! *where* and *how fast* a new entity starts. Everything spawns just above
//! the camera's top edge so it drifts into view.

use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::common::clock::SimClock;
use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::pool::{Category, EntityPool, SpawnRequest};
use crate::plugins::session::GameSession;
use crate::plugins::world::ScrollCamera;

/// Randomness for spawn placement. Seed it for reproducible runs.
#[derive(Resource, Debug)]
pub struct SpawnRng(pub StdRng);

impl Default for SpawnRng {
    fn default() -> Self {
        Self(StdRng::from_entropy())
    }
}

impl SpawnRng {
    pub fn seeded(seed: u64) -> Self {
        Self(StdRng::seed_from_u64(seed))
    }
}

const STAR_X: (f32, f32) = (50.0, 750.0);
const STAR_LEAD: (f32, f32) = (50.0, 300.0);
const STAR_DRIFT: (f32, f32) = (10.0, 30.0);
const SPAWN_X: (f32, f32) = (100.0, 700.0);
const SPAWN_LEAD: f32 = 50.0;
const COW_VX: (f32, f32) = (-50.0, 50.0);
const COW_VY: (f32, f32) = (-20.0, 30.0);

pub fn star_request(rng: &mut impl Rng, scroll: &ScrollCamera) -> SpawnRequest {
    let x = rng.gen_range(STAR_X.0..=STAR_X.1);
    let y = scroll.top() - rng.gen_range(STAR_LEAD.0..=STAR_LEAD.1);
    let vy = rng.gen_range(STAR_DRIFT.0..=STAR_DRIFT.1);
    SpawnRequest::new(Category::Star, Vec2::new(x, y), Vec2::new(0.0, vy))
}

pub fn cow_request(rng: &mut impl Rng, scroll: &ScrollCamera) -> SpawnRequest {
    let x = rng.gen_range(SPAWN_X.0..=SPAWN_X.1);
    let vel = Vec2::new(
        rng.gen_range(COW_VX.0..=COW_VX.1),
        rng.gen_range(COW_VY.0..=COW_VY.1),
    );
    SpawnRequest::new(Category::Cow, Vec2::new(x, scroll.top() - SPAWN_LEAD), vel)
}

/// UFOs start at rest; their pursuit timer fires on the next tick.
pub fn ufo_request(rng: &mut impl Rng, scroll: &ScrollCamera, category: Category) -> SpawnRequest {
    debug_assert!(category.is_ufo());
    let x = rng.gen_range(SPAWN_X.0..=SPAWN_X.1);
    SpawnRequest::new(category, Vec2::new(x, scroll.top() - SPAWN_LEAD), Vec2::ZERO)
}

/// Write one burst of star requests. The allocator trims it to the cap.
pub fn request_star_burst(
    rng: &mut impl Rng,
    scroll: &ScrollCamera,
    count: usize,
    requests: &mut MessageWriter<SpawnRequest>,
) {
    for _ in 0..count {
        requests.write(star_request(rng, scroll));
    }
}

/// Refill stars once none remain below the camera's top edge, throttled.
pub fn replenish_stars(
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    scroll: Res<ScrollCamera>,
    pool: Option<Res<EntityPool>>,
    mut session: ResMut<GameSession>,
    mut rng: ResMut<SpawnRng>,
    mut requests: MessageWriter<SpawnRequest>,
    q_stars: Query<(Entity, &Transform, &Category)>,
) {
    let Some(pool) = pool else {
        error!("EntityPool is not initialized; star refill skipped");
        return;
    };

    let now = clock.now_ms();
    if !session.star_refill_due(now, tunables.star_respawn_throttle_ms) {
        return;
    }

    let any_visible = q_stars.iter().any(|(e, tf, c)| {
        *c == Category::Star && pool.is_active(e) && tf.translation.y > scroll.top()
    });
    if any_visible {
        return;
    }

    request_star_burst(&mut rng.0, &scroll, tunables.star_burst, &mut requests);
    session.mark_star_refill(now);
    debug!("star burst requested at {now} ms");
}

pub fn plugin(app: &mut App) {
    app.init_resource::<SpawnRng>();
    app.add_systems(
        FixedUpdate,
        replenish_stars
            .in_set(TickSet::Spawn)
            .before(crate::plugins::pool::allocator::allocate_spawns)
            .run_if(in_state(GameState::Playing)),
    );
}
