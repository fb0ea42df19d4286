//! Collision resolver: avian overlap reports mapped to gameplay rules.
//!
//! | Pair                           | Effect                                        |
//! |--------------------------------|-----------------------------------------------|
//! | rocket × UFO bullet            | bullet destroyed, health − 1, screen shake    |
//! | rocket × star                  | star destroyed, score + 1                     |
//! | rocket × cow                   | cow destroyed, rescues + 1, health + 1 (≤ 3)  |
//! | rocket bullet × cow            | bullet destroyed, cow knocked up, removed 2 s later |
//! | rocket × UFO                   | UFO destroyed, health − 1, screen shake       |
//! | rocket bullet × UFO            | both destroyed                                |
//!
//! ```text
//! FixedPostUpdate (avian): sensor overlap -> CollisionStart
//! FixedUpdate / Collide:   CollisionStart -> classify -> sort by rule -> apply
//! ```
//!
//! Contacts of one tick resolve in table order, so a rescue lands before a
//! ram on the same tick and a bullet hit lands before both. Liveness comes
//! from the pool registry and the rocket slot and is re-checked before every
//! rule: an entity destroyed earlier in the pass is skipped, and once the
//! rocket is gone no further rocket rule fires (one game over per session).

use avian2d::prelude::*;
use bevy::ecs::message::MessageReader;
use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::cows::Cow;
use crate::plugins::feedback::ScreenShake;
use crate::plugins::player::RocketSlot;
use crate::plugins::pool::{Category, EntityPool};
use crate::plugins::scheduler::{Scheduler, TimedAction};
use crate::plugins::session::{GameSession, HitOutcome, end_game};

const BULLET_SHAKE: (f32, f32) = (0.2, 0.02);
const RAM_SHAKE: (f32, f32) = (0.3, 0.02);

/// Collision participant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Actor {
    Rocket,
    Pooled(Category),
}

/// Declaration order is resolution order within a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum ContactRule {
    BulletHitsRocket,
    CollectStar,
    RescueCow,
    KnockCow,
    RamUfo,
    ShootUfo,
}

/// Rule for the ordered pair `(a, b)`; `None` if that order has none.
pub fn contact_rule(a: Actor, b: Actor) -> Option<ContactRule> {
    match (a, b) {
        (Actor::Rocket, Actor::Pooled(Category::Star)) => Some(ContactRule::CollectStar),
        (Actor::Rocket, Actor::Pooled(Category::Cow)) => Some(ContactRule::RescueCow),
        (Actor::Rocket, Actor::Pooled(Category::UfoBullet)) => Some(ContactRule::BulletHitsRocket),
        (Actor::Rocket, Actor::Pooled(c)) if c.is_ufo() => Some(ContactRule::RamUfo),
        (Actor::Pooled(Category::RocketBullet), Actor::Pooled(Category::Cow)) => {
            Some(ContactRule::KnockCow)
        }
        (Actor::Pooled(Category::RocketBullet), Actor::Pooled(c)) if c.is_ufo() => {
            Some(ContactRule::ShootUfo)
        }
        _ => None,
    }
}

/// One classified contact, participants in rule order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Contact {
    pub rule: ContactRule,
    pub first: Entity,
    pub second: Entity,
}

/// Gameplay role of a live entity, if it has one.
#[inline]
fn actor_of(e: Entity, pool: &EntityPool, rocket: &RocketSlot) -> Option<Actor> {
    if rocket.get() == Some(e) {
        return Some(Actor::Rocket);
    }
    pool.category_of(e).map(Actor::Pooled)
}

/// Colliders sit on their body entity; fall back to the collider otherwise.
#[inline]
fn owners(ev: &CollisionStart) -> (Entity, Entity) {
    (
        ev.body1.unwrap_or(ev.collider1),
        ev.body2.unwrap_or(ev.collider2),
    )
}

pub fn classify(a: Entity, b: Entity, pool: &EntityPool, rocket: &RocketSlot) -> Option<Contact> {
    let (ra, rb) = (actor_of(a, pool, rocket)?, actor_of(b, pool, rocket)?);
    contact_rule(ra, rb)
        .map(|rule| Contact {
            rule,
            first: a,
            second: b,
        })
        .or_else(|| {
            contact_rule(rb, ra).map(|rule| Contact {
                rule,
                first: b,
                second: a,
            })
        })
}

#[inline]
fn is_live(e: Entity, pool: &EntityPool, rocket: &RocketSlot) -> bool {
    actor_of(e, pool, rocket).is_some()
}

pub fn resolve_contacts(
    mut commands: Commands,
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    pool: Option<ResMut<EntityPool>>,
    mut session: ResMut<GameSession>,
    mut scheduler: ResMut<Scheduler>,
    mut rocket: ResMut<RocketSlot>,
    mut shake: ResMut<ScreenShake>,
    mut next_state: ResMut<NextState<GameState>>,
    mut started: MessageReader<CollisionStart>,
    mut q_cows: Query<(&mut LinearVelocity, &mut Cow)>,
) {
    let Some(mut pool) = pool else {
        started.clear();
        error!("EntityPool is not initialized; collisions skipped this tick");
        return;
    };

    let mut contacts: Vec<Contact> = started
        .read()
        .filter_map(|ev| {
            let (a, b) = owners(ev);
            classify(a, b, &pool, &rocket)
        })
        .collect();
    contacts.sort_by_key(|c| c.rule);

    let now = clock.now_ms();

    for Contact {
        rule,
        first,
        second,
    } in contacts
    {
        if !is_live(first, &pool, &rocket) || !is_live(second, &pool, &rocket) {
            continue;
        }

        let damage = match rule {
            ContactRule::CollectStar => {
                if pool.destroy(&mut commands, second).is_ok() {
                    session.collect_star();
                }
                false
            }
            ContactRule::RescueCow => {
                if pool.destroy(&mut commands, second).is_ok() {
                    session.rescue_cow();
                    info!("cow rescued (total {})", session.cows_rescued());
                }
                false
            }
            ContactRule::BulletHitsRocket => {
                let hit = pool.destroy(&mut commands, second).is_ok();
                if hit {
                    shake.trigger(BULLET_SHAKE.0, BULLET_SHAKE.1);
                }
                hit
            }
            ContactRule::RamUfo => {
                let hit = pool.destroy(&mut commands, second).is_ok();
                if hit {
                    shake.trigger(RAM_SHAKE.0, RAM_SHAKE.1);
                }
                hit
            }
            ContactRule::KnockCow => {
                if pool.destroy(&mut commands, first).is_ok() {
                    if let Ok((mut vel, mut cow)) = q_cows.get_mut(second) {
                        vel.y = -tunables.knock_speed;
                        if cow.knock() {
                            scheduler.after(
                                now,
                                tunables.knock_despawn_ms,
                                TimedAction::DespawnCow(second),
                            );
                        }
                    }
                }
                false
            }
            ContactRule::ShootUfo => {
                if pool.destroy(&mut commands, first).is_ok() {
                    if let Err(err) = pool.destroy(&mut commands, second) {
                        debug!("shot UFO already gone: {err}");
                    }
                }
                false
            }
        };

        if damage && session.take_hit() == HitOutcome::Depleted {
            end_game(&mut commands, &mut rocket, &mut next_state, &session);
        }
    }
}

pub fn plugin(app: &mut App) {
    app.add_systems(
        FixedUpdate,
        resolve_contacts
            .in_set(TickSet::Collide)
            .run_if(in_state(GameState::Playing)),
    );
}
