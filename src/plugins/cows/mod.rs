//! Cows: flee behaviour, the transient alarm state, knock-back bookkeeping,
//! bouncing off the world edges and a cosmetic tilt.
//!
//! Flee is checked every tick for every (UFO, cow) pair. That is O(U x C),
//! at most 7 x 5 with the pool caps.

use avian2d::prelude::*;
use bevy::prelude::*;
use rand::Rng;

use crate::common::clock::SimClock;
use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::bearing_velocity;
use crate::plugins::pool::{Category, EntityPool};
use crate::plugins::world::confine;

const CALM: Color = Color::srgb(0.95, 0.95, 0.92);
const ALARMED: Color = Color::srgb(1.0, 0.0, 0.0);
const WOBBLE_DEG: (f32, f32) = (-90.0, 90.0);
const WOBBLE_SECS: (f32, f32) = (2.0, 5.0);

#[derive(Component, Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Cow {
    /// Alarm tint stays on until this time.
    pub alarmed_until_ms: Option<u64>,
    /// Hit by a rocket bullet; removal is already scheduled.
    pub knocked: bool,
}

impl Cow {
    #[inline]
    pub fn is_alarmed(&self) -> bool {
        self.alarmed_until_ms.is_some()
    }

    /// Mark as knocked. Returns `true` only the first time.
    #[inline]
    pub fn knock(&mut self) -> bool {
        !std::mem::replace(&mut self.knocked, true)
    }
}

/// Slow back-and-forth tilt (render only).
///
/// Swings linearly from upright to `amplitude` over `half_period_secs`, then
/// back, forever.
#[derive(Component, Debug, Clone, Copy, PartialEq)]
pub struct Wobble {
    /// Radians.
    pub amplitude: f32,
    pub half_period_secs: f32,
    pub elapsed_secs: f32,
}

impl Wobble {
    pub fn random(rng: &mut impl Rng) -> Self {
        Self {
            amplitude: rng.gen_range(WOBBLE_DEG.0..=WOBBLE_DEG.1).to_radians(),
            half_period_secs: rng.gen_range(WOBBLE_SECS.0..=WOBBLE_SECS.1),
            elapsed_secs: 0.0,
        }
    }

    pub fn angle(&self) -> f32 {
        let phase = (self.elapsed_secs / self.half_period_secs).rem_euclid(2.0);
        let t = if phase <= 1.0 { phase } else { 2.0 - phase };
        self.amplitude * t
    }
}

/// Escape velocity if `cow` is inside the UFO's scare radius.
#[inline]
pub fn flee_velocity(ufo: Vec2, cow: Vec2, tunables: &Tunables) -> Option<Vec2> {
    (ufo.distance(cow) < tunables.flee_distance)
        .then(|| bearing_velocity(ufo, cow, tunables.flee_speed))
}

pub fn flee_from_ufos(
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    pool: Option<Res<EntityPool>>,
    q_ufos: Query<(Entity, &Category, &Transform), Without<Cow>>,
    mut q_cows: Query<(Entity, &Transform, &mut LinearVelocity, &mut Cow)>,
) {
    let Some(pool) = pool else {
        error!("EntityPool is not initialized; cow flee skipped");
        return;
    };

    let ufos: Vec<Vec2> = q_ufos
        .iter()
        .filter(|(e, c, _)| c.is_ufo() && pool.is_active(*e))
        .map(|(_, _, tf)| tf.translation.truncate())
        .collect();
    if ufos.is_empty() {
        return;
    }

    let alarm_until = clock.now_ms() + tunables.alarm_ms;

    for (e, tf, mut vel, mut cow) in &mut q_cows {
        if cow.knocked || !pool.is_active(e) {
            continue;
        }
        let pos = tf.translation.truncate();
        for ufo in &ufos {
            if let Some(v) = flee_velocity(*ufo, pos, &tunables) {
                vel.0 = v;
                cow.alarmed_until_ms = Some(alarm_until);
            }
        }
    }
}

pub fn clear_expired_alarms(clock: Res<SimClock>, mut q_cows: Query<&mut Cow>) {
    let now = clock.now_ms();
    for mut cow in &mut q_cows {
        if cow.alarmed_until_ms.is_some_and(|until| now >= until) {
            cow.alarmed_until_ms = None;
        }
    }
}

/// Elastic bounce: clamp into the world and point the velocity back inward.
pub fn bounce_off_world(
    tunables: Res<Tunables>,
    mut q_cows: Query<(&mut Transform, &mut LinearVelocity), With<Cow>>,
) {
    let radius = Category::Cow.hit_radius();
    for (mut tf, mut vel) in &mut q_cows {
        let pos = tf.translation.truncate();
        let (inside, hit) = confine(pos, radius, tunables.world_size);
        if !hit.any() {
            continue;
        }
        if hit.x {
            vel.x = if inside.x > pos.x { vel.x.abs() } else { -vel.x.abs() };
        }
        if hit.y {
            vel.y = if inside.y > pos.y { vel.y.abs() } else { -vel.y.abs() };
        }
        tf.translation.x = inside.x;
        tf.translation.y = inside.y;
    }
}

fn tint_alarmed_cows(mut q_cows: Query<(&Cow, &mut Sprite), Changed<Cow>>) {
    for (cow, mut sprite) in &mut q_cows {
        sprite.color = if cow.is_alarmed() { ALARMED } else { CALM };
    }
}

fn wobble_cows(time: Res<Time>, mut q_cows: Query<(&mut Wobble, &mut Transform)>) {
    let dt = time.delta_secs();
    for (mut wobble, mut tf) in &mut q_cows {
        wobble.elapsed_secs += dt;
        tf.rotation = Quat::from_rotation_z(wobble.angle());
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (clear_expired_alarms, flee_from_ufos, bounce_off_world)
            .chain()
            .in_set(TickSet::Control)
            .run_if(in_state(GameState::Playing)),
    );
    app.add_systems(Update, (tint_alarmed_cows, wobble_cows));
}
