//! Entity pool: bounded bookkeeping of every non-rocket entity.
//!
//! # Invariants
//! - `active_count(c) <= c.cap()` for every category, after any sequence of
//!   `create` / `destroy`.
//! - An entity is counted from the moment `create` reserves it (the spawn
//!   command itself is deferred), so a burst of requests in one tick cannot
//!   overshoot the cap.
//! - `destroy` removes the entity from the registry immediately. A second
//!   `destroy` of the same entity in the same pass is `NotTracked`, which is
//!   how resolvers and sweepers skip entities that died earlier in the tick.
//!
//! Capacity rejection is a throttle, not a failure: callers log and move on.

use avian2d::prelude::*;
use bevy::platform::collections::HashMap;
use bevy::prelude::*;
use thiserror::Error;

use crate::common::layers::Layer;
use crate::common::schedule::TickSet;
use crate::common::state::GameState;

pub mod allocator;
pub mod messages;

pub use messages::SpawnRequest;

/// Entity category: the tag every pooled entity carries.
///
/// Movement, AI and collision dispatch by matching on this tag.
#[derive(Component, Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Star,
    Cow,
    ChasingUfo,
    AggressiveUfo,
    RocketBullet,
    UfoBullet,
}

impl Category {
    pub const COUNT: usize = 6;

    pub const ALL: [Category; Self::COUNT] = [
        Category::Star,
        Category::Cow,
        Category::ChasingUfo,
        Category::AggressiveUfo,
        Category::RocketBullet,
        Category::UfoBullet,
    ];

    #[inline]
    pub const fn index(self) -> usize {
        match self {
            Category::Star => 0,
            Category::Cow => 1,
            Category::ChasingUfo => 2,
            Category::AggressiveUfo => 3,
            Category::RocketBullet => 4,
            Category::UfoBullet => 5,
        }
    }

    /// Maximum simultaneous population.
    #[inline]
    pub const fn cap(self) -> usize {
        match self {
            Category::Star => 30,
            Category::Cow => 5,
            Category::ChasingUfo => 3,
            Category::AggressiveUfo => 4,
            Category::RocketBullet => 20,
            Category::UfoBullet => 10,
        }
    }

    #[inline]
    pub const fn is_ufo(self) -> bool {
        matches!(self, Category::ChasingUfo | Category::AggressiveUfo)
    }

    /// Collider radius in pixels.
    #[inline]
    pub const fn hit_radius(self) -> f32 {
        match self {
            Category::Star => 14.0,
            Category::Cow => 18.0,
            Category::ChasingUfo => 26.0,
            Category::AggressiveUfo => 30.0,
            Category::RocketBullet => 4.0,
            Category::UfoBullet => 5.0,
        }
    }

    /// Layer membership and filter. Pooled bodies only ever touch the rocket
    /// and rocket bullets.
    pub fn collision_layers(self) -> CollisionLayers {
        match self {
            Category::Star => CollisionLayers::new(Layer::Star, [Layer::Rocket]),
            Category::Cow => CollisionLayers::new(Layer::Cow, [Layer::Rocket, Layer::RocketBullet]),
            Category::ChasingUfo | Category::AggressiveUfo => {
                CollisionLayers::new(Layer::Ufo, [Layer::Rocket, Layer::RocketBullet])
            }
            Category::RocketBullet => CollisionLayers::new(Layer::RocketBullet, [Layer::Cow, Layer::Ufo]),
            Category::UfoBullet => CollisionLayers::new(Layer::UfoBullet, [Layer::Rocket]),
        }
    }

    pub const fn label(self) -> &'static str {
        match self {
            Category::Star => "Star",
            Category::Cow => "Cow",
            Category::ChasingUfo => "ChasingUfo",
            Category::AggressiveUfo => "AggressiveUfo",
            Category::RocketBullet => "RocketBullet",
            Category::UfoBullet => "UfoBullet",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PoolError {
    #[error("{category:?} pool is full ({cap} active)")]
    AtCapacity { category: Category, cap: usize },
    #[error("entity {0} is not an active pool member")]
    NotTracked(Entity),
}

#[derive(Resource, Debug, Default)]
pub struct EntityPool {
    members: HashMap<Entity, Category>,
    counts: [usize; Category::COUNT],
}

impl EntityPool {
    #[inline]
    pub fn active_count(&self, category: Category) -> usize {
        self.counts[category.index()]
    }

    #[cfg(test)]
    pub fn total(&self) -> usize {
        self.members.len()
    }

    #[inline]
    pub fn is_active(&self, e: Entity) -> bool {
        self.members.contains_key(&e)
    }

    #[inline]
    pub fn category_of(&self, e: Entity) -> Option<Category> {
        self.members.get(&e).copied()
    }

    /// Active members of one category. Order is unspecified.
    pub fn members(&self, category: Category) -> impl Iterator<Item = Entity> + '_ {
        self.members
            .iter()
            .filter(move |(_, c)| **c == category)
            .map(|(e, _)| *e)
    }

    /// Reserve a slot and spawn `bundle` tagged with `category`.
    pub fn create<B: Bundle>(
        &mut self,
        commands: &mut Commands,
        category: Category,
        bundle: B,
    ) -> Result<Entity, PoolError> {
        let cap = category.cap();
        if self.active_count(category) >= cap {
            return Err(PoolError::AtCapacity { category, cap });
        }

        let e = commands.spawn((category, bundle)).id();
        self.members.insert(e, category);
        self.counts[category.index()] += 1;
        Ok(e)
    }

    /// Register an entity spawned by hand. Test support.
    #[cfg(test)]
    pub fn adopt(&mut self, e: Entity, category: Category) -> Result<(), PoolError> {
        let cap = category.cap();
        if self.active_count(category) >= cap {
            return Err(PoolError::AtCapacity { category, cap });
        }
        if self.members.insert(e, category).is_none() {
            self.counts[category.index()] += 1;
        }
        Ok(())
    }

    /// Deactivate and despawn. Fails if `e` was already destroyed.
    pub fn destroy(&mut self, commands: &mut Commands, e: Entity) -> Result<Category, PoolError> {
        let category = self.members.remove(&e).ok_or(PoolError::NotTracked(e))?;
        self.counts[category.index()] -= 1;
        commands.entity(e).despawn();
        Ok(category)
    }

    /// Despawn every member. Returns how many were removed.
    pub fn clear(&mut self, commands: &mut Commands) -> usize {
        let removed = self.members.len();
        for (e, _) in self.members.drain() {
            commands.entity(e).despawn();
        }
        self.counts = [0; Category::COUNT];
        removed
    }
}

/// Maintain spawn request message buffers.
///
/// Messages are double-buffered; `update()` advances buffers.
fn update_spawn_messages(mut msgs: ResMut<bevy::ecs::message::Messages<SpawnRequest>>) {
    msgs.update();
}

pub fn plugin(app: &mut App) {
    app.insert_resource(EntityPool::default());
    app.init_resource::<bevy::ecs::message::Messages<SpawnRequest>>();
    app.add_systems(PostUpdate, update_spawn_messages);

    app.add_systems(
        FixedUpdate,
        allocator::allocate_spawns
            .in_set(TickSet::Spawn)
            .run_if(in_state(GameState::Playing)),
    );
}

#[cfg(test)]
mod tests;
