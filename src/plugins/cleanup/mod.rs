//! Sweep: return entities to the pool once they can no longer matter.
//!
//! Anything that falls more than `cleanup_buffer` below the camera's top edge
//! is gone for good (the camera never scrolls back that far fast enough for
//! it to re-enter). Projectiles get tighter bounds since they only travel
//! away from the rocket.

use bevy::prelude::*;

use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::pool::{Category, EntityPool};
use crate::plugins::world::{ScrollCamera, within_world};

/// Pooled entity lies strictly further than the buffer below the top edge.
#[inline]
pub fn left_behind(y: f32, scroll: &ScrollCamera, tunables: &Tunables) -> bool {
    y > scroll.top() + tunables.cleanup_buffer
}

/// Projectile has left the region where it can still hit anything.
pub fn projectile_escaped(
    category: Category,
    pos: Vec2,
    scroll: &ScrollCamera,
    tunables: &Tunables,
) -> bool {
    match category {
        Category::RocketBullet => {
            pos.y < scroll.top() - tunables.bullet_top_margin
                || !within_world(pos, tunables.world_size, 0.0)
        }
        Category::UfoBullet => {
            !within_world(pos, tunables.world_size, tunables.ufo_bullet_world_margin)
        }
        _ => false,
    }
}

pub fn sweep_behind_camera(
    mut commands: Commands,
    tunables: Res<Tunables>,
    scroll: Res<ScrollCamera>,
    pool: Option<ResMut<EntityPool>>,
    q_pooled: Query<(Entity, &Transform), With<Category>>,
) {
    let Some(mut pool) = pool else {
        error!("EntityPool is not initialized; sweep skipped");
        return;
    };

    let mut swept = 0usize;
    for (e, tf) in &q_pooled {
        if left_behind(tf.translation.y, &scroll, &tunables)
            && pool.destroy(&mut commands, e).is_ok()
        {
            swept += 1;
        }
    }
    if swept > 0 {
        debug!("swept {swept} entities behind the camera");
    }
}

pub fn sweep_escaped_projectiles(
    mut commands: Commands,
    tunables: Res<Tunables>,
    scroll: Res<ScrollCamera>,
    pool: Option<ResMut<EntityPool>>,
    q_pooled: Query<(Entity, &Transform, &Category)>,
) {
    let Some(mut pool) = pool else {
        error!("EntityPool is not initialized; projectile sweep skipped");
        return;
    };

    for (e, tf, category) in &q_pooled {
        if projectile_escaped(*category, tf.translation.truncate(), &scroll, &tunables) {
            if let Err(err) = pool.destroy(&mut commands, e) {
                debug!("escaped projectile not destroyed: {err}");
            }
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        (sweep_behind_camera, sweep_escaped_projectiles)
            .chain()
            .in_set(TickSet::Sweep)
            .run_if(in_state(GameState::Playing)),
    );
}
