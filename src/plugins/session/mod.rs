//! Session bookkeeping and the Playing ⇄ GameOver cycle.
//!
//! ```text
//!            health reaches 0 (collision resolver)
//!   Playing ──────────────────────────────────────> GameOver
//!      ^                                               │
//!      └──────── Restart timer (3000 ms) ──────────────┘
//! ```
//!
//! `GameSession` is the single source of truth for score, health and
//! rescues. Mutation goes through methods so the health clamp and the
//! one-shot depletion are enforced in one place.

use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::player::{RocketSlot, spawn_rocket};
use crate::plugins::pool::EntityPool;
use crate::plugins::scheduler::{Scheduler, TimedAction, arm_spawn_timers};
use crate::plugins::world::ScrollCamera;

/// Final numbers surfaced to the presentation layer at game over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FinalTally {
    pub score: u32,
    pub cows_rescued: u32,
}

/// Result of the rocket taking one point of damage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HitOutcome {
    Survived,
    /// This hit took the last point of health.
    Depleted,
    /// Health was already zero; nothing changed.
    AlreadyDown,
}

#[derive(Resource, Debug, Clone, PartialEq, Eq)]
pub struct GameSession {
    score: u32,
    health: u8,
    cows_rescued: u32,
    last_star_refill_ms: Option<u64>,
    last_fired_ms: Option<u64>,
    final_tally: Option<FinalTally>,
}

impl Default for GameSession {
    fn default() -> Self {
        Self {
            score: 0,
            health: Self::MAX_HEALTH,
            cows_rescued: 0,
            last_star_refill_ms: None,
            last_fired_ms: None,
            final_tally: None,
        }
    }
}

impl GameSession {
    pub const MAX_HEALTH: u8 = 3;

    #[inline]
    pub fn score(&self) -> u32 {
        self.score
    }

    #[inline]
    pub fn health(&self) -> u8 {
        self.health
    }

    #[inline]
    pub fn cows_rescued(&self) -> u32 {
        self.cows_rescued
    }

    #[inline]
    pub fn is_game_over(&self) -> bool {
        self.final_tally.is_some()
    }

    /// Set once, at the moment health reaches zero.
    #[inline]
    pub fn final_tally(&self) -> Option<FinalTally> {
        self.final_tally
    }

    pub fn reset(&mut self) {
        *self = Self::default();
    }

    pub fn collect_star(&mut self) {
        self.score += 1;
    }

    /// A rescue always counts; health is topped up but never past the max.
    pub fn rescue_cow(&mut self) {
        self.cows_rescued += 1;
        self.health = (self.health + 1).min(Self::MAX_HEALTH);
    }

    pub fn take_hit(&mut self) -> HitOutcome {
        if self.health == 0 {
            return HitOutcome::AlreadyDown;
        }
        self.health -= 1;
        if self.health > 0 {
            return HitOutcome::Survived;
        }
        self.final_tally = Some(FinalTally {
            score: self.score,
            cows_rescued: self.cows_rescued,
        });
        HitOutcome::Depleted
    }

    /// Shot cooldown: a shot is allowed not before `last + cooldown`.
    pub fn try_fire(&mut self, now_ms: u64, cooldown_ms: u64) -> bool {
        if self.last_fired_ms.is_some_and(|last| now_ms < last + cooldown_ms) {
            return false;
        }
        self.last_fired_ms = Some(now_ms);
        true
    }

    #[inline]
    pub fn star_refill_due(&self, now_ms: u64, throttle_ms: u64) -> bool {
        self.last_star_refill_ms
            .is_none_or(|last| now_ms >= last + throttle_ms)
    }

    #[inline]
    pub fn mark_star_refill(&mut self, now_ms: u64) {
        self.last_star_refill_ms = Some(now_ms);
    }
}

/// Rocket destroyed: stop routing input to it and leave `Playing`.
pub fn end_game(
    commands: &mut Commands,
    rocket: &mut RocketSlot,
    next_state: &mut NextState<GameState>,
    session: &GameSession,
) {
    if let Some(e) = rocket.take() {
        commands.entity(e).despawn();
    }
    next_state.set(GameState::GameOver);

    if let Some(tally) = session.final_tally() {
        info!(
            "game over: {} stars, {} cows rescued",
            tally.score, tally.cows_rescued
        );
    }
}

/// OnEnter(Playing): wipe the previous session and start a new one.
///
/// Pools end up empty; the first stars arrive on the next tick through the
/// reactive refill because the refill throttle is unset after `reset`.
pub fn begin_session(
    mut commands: Commands,
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    mut session: ResMut<GameSession>,
    mut scheduler: ResMut<Scheduler>,
    mut rocket: ResMut<RocketSlot>,
    mut scroll: ResMut<ScrollCamera>,
    pool: Option<ResMut<EntityPool>>,
) {
    let cleared = match pool {
        Some(mut pool) => pool.clear(&mut commands),
        None => {
            error!("EntityPool is not initialized; previous entities were not cleared");
            0
        }
    };

    if let Some(old) = rocket.take() {
        commands.entity(old).despawn();
    }

    session.reset();
    scheduler.clear();
    arm_spawn_timers(&mut scheduler, clock.now_ms(), &tunables);

    rocket.set(spawn_rocket(&mut commands, &tunables));
    *scroll = ScrollCamera::centered_on(tunables.rocket_spawn, &tunables);

    info!("session started ({cleared} stale entities cleared)");
}

/// OnEnter(GameOver): cancel everything pending and arm the restart.
pub fn enter_game_over(
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    mut scheduler: ResMut<Scheduler>,
) {
    scheduler.clear();
    scheduler.after(clock.now_ms(), tunables.restart_delay_ms, TimedAction::Restart);
}

pub fn plugin(app: &mut App) {
    app.insert_resource(GameSession::default());
    app.add_systems(OnEnter(GameState::Playing), begin_session);
    app.add_systems(OnEnter(GameState::GameOver), enter_game_over);
}
