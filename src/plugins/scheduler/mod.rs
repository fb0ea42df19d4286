//! Timer scheduler: a min-priority queue of `(fire_at, action)` entries drained
//! at each tick boundary.
//!
//! ```text
//! spawn timers  ─┐
//! UFO steering  ─┼─> Scheduler (BinaryHeap) ──pop_due(now)──> dispatch_timed_actions
//! delayed kills ─┘          ^                                       │
//!                           └──────────── rearm (repeating) ────────┘
//! ```
//!
//! Cancellation is `clear()`. Entries that name an entity are re-validated on
//! every firing: a dead actor drops its entry, a dead target turns the firing
//! into a no-op.

use std::cmp::{Ordering, Reverse};
use std::collections::BinaryHeap;

use avian2d::prelude::*;
use bevy::ecs::message::MessageWriter;
use bevy::prelude::*;

use crate::common::clock::SimClock;
use crate::common::schedule::TickSet;
use crate::common::state::GameState;
use crate::common::tunables::Tunables;
use crate::plugins::enemies::{pursuit_velocity, ufo_shot};
use crate::plugins::player::RocketSlot;
use crate::plugins::pool::{Category, EntityPool, SpawnRequest};
use crate::plugins::spawner::{self, SpawnRng};
use crate::plugins::world::ScrollCamera;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TimedAction {
    SpawnCow,
    SpawnChasingUfo,
    SpawnAggressiveUfo,
    /// Re-aim a UFO at the rocket.
    Pursue(Entity),
    /// Aggressive UFO shot at the rocket.
    Fire(Entity),
    /// Delayed removal of a cow knocked by a rocket bullet.
    DespawnCow(Entity),
    /// Leave `GameOver`.
    Restart,
}

/// A popped entry.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Due {
    pub at_ms: u64,
    pub action: TimedAction,
    pub period_ms: Option<u64>,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    at_ms: u64,
    seq: u64,
    action: TimedAction,
    period_ms: Option<u64>,
}

// Heap order is (fire time, insertion order); the action payload is not part of it.
impl PartialEq for Entry {
    fn eq(&self, other: &Self) -> bool {
        self.at_ms == other.at_ms && self.seq == other.seq
    }
}

impl Eq for Entry {}

impl PartialOrd for Entry {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for Entry {
    fn cmp(&self, other: &Self) -> Ordering {
        (self.at_ms, self.seq).cmp(&(other.at_ms, other.seq))
    }
}

#[derive(Resource, Debug, Default)]
pub struct Scheduler {
    queue: BinaryHeap<Reverse<Entry>>,
    next_seq: u64,
}

impl Scheduler {
    fn push(&mut self, at_ms: u64, action: TimedAction, period_ms: Option<u64>) {
        let seq = self.next_seq;
        self.next_seq += 1;
        self.queue.push(Reverse(Entry {
            at_ms,
            seq,
            action,
            period_ms,
        }));
    }

    /// One-shot: fires not before `now + delay_ms`.
    pub fn after(&mut self, now_ms: u64, delay_ms: u64, action: TimedAction) {
        self.push(now_ms + delay_ms, action, None);
    }

    /// Repeating: first firing at `first_at_ms`, then every `period_ms`
    /// for as long as the dispatcher re-arms it.
    pub fn every(&mut self, first_at_ms: u64, period_ms: u64, action: TimedAction) {
        self.push(first_at_ms, action, Some(period_ms.max(1)));
    }

    /// Pop the earliest entry if it is due at `now_ms`.
    pub fn pop_due(&mut self, now_ms: u64) -> Option<Due> {
        if self.queue.peek()?.0.at_ms > now_ms {
            return None;
        }
        let Reverse(entry) = self.queue.pop()?;
        Some(Due {
            at_ms: entry.at_ms,
            action: entry.action,
            period_ms: entry.period_ms,
        })
    }

    /// Put a repeating entry back. The next firing is the first period
    /// boundary strictly after `now_ms`, so missed periods coalesce.
    pub fn rearm(&mut self, due: Due, now_ms: u64) {
        let Some(period) = due.period_ms else {
            return;
        };
        let mut next = due.at_ms + period;
        if next <= now_ms {
            let missed = (now_ms - next) / period + 1;
            next += missed * period;
        }
        self.push(next, due.action, Some(period));
    }

    /// Drop every pending entry.
    pub fn clear(&mut self) {
        self.queue.clear();
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.queue.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    /// Number of pending entries for `action`.
    #[cfg(test)]
    pub fn pending(&self, action: TimedAction) -> usize {
        self.queue.iter().filter(|e| e.0.action == action).count()
    }

    /// Earliest pending firing time of `action`.
    #[cfg(test)]
    pub fn next_fire_of(&self, action: TimedAction) -> Option<u64> {
        self.queue
            .iter()
            .filter(|e| e.0.action == action)
            .map(|e| e.0.at_ms)
            .min()
    }
}

/// Arm the repeating spawn timers of a fresh session.
pub fn arm_spawn_timers(scheduler: &mut Scheduler, now_ms: u64, tunables: &Tunables) {
    scheduler.every(
        now_ms + tunables.cow_interval_ms,
        tunables.cow_interval_ms,
        TimedAction::SpawnCow,
    );
    scheduler.every(
        now_ms + tunables.chasing_ufo_interval_ms,
        tunables.chasing_ufo_interval_ms,
        TimedAction::SpawnChasingUfo,
    );
    scheduler.every(
        now_ms + tunables.aggressive_ufo_interval_ms,
        tunables.aggressive_ufo_interval_ms,
        TimedAction::SpawnAggressiveUfo,
    );
}

/// Drain everything due this tick.
///
/// Spawns are only requested here; the allocator materializes them later in
/// the same tick.
pub fn dispatch_timed_actions(
    mut commands: Commands,
    clock: Res<SimClock>,
    tunables: Res<Tunables>,
    scroll: Res<ScrollCamera>,
    rocket: Res<RocketSlot>,
    mut scheduler: ResMut<Scheduler>,
    mut rng: ResMut<SpawnRng>,
    pool: Option<ResMut<EntityPool>>,
    mut requests: MessageWriter<SpawnRequest>,
    mut next_state: ResMut<NextState<GameState>>,
    q_tf: Query<&Transform>,
    mut q_vel: Query<&mut LinearVelocity>,
) {
    let Some(mut pool) = pool else {
        error!("EntityPool is not initialized; timers not dispatched this tick");
        return;
    };

    let now = clock.now_ms();
    let target = rocket
        .get()
        .and_then(|e| q_tf.get(e).ok())
        .map(|tf| tf.translation.truncate());

    while let Some(due) = scheduler.pop_due(now) {
        let keep = match due.action {
            TimedAction::SpawnCow => {
                requests.write(spawner::cow_request(&mut rng.0, &scroll));
                true
            }
            TimedAction::SpawnChasingUfo => {
                requests.write(spawner::ufo_request(
                    &mut rng.0,
                    &scroll,
                    Category::ChasingUfo,
                ));
                true
            }
            TimedAction::SpawnAggressiveUfo => {
                requests.write(spawner::ufo_request(
                    &mut rng.0,
                    &scroll,
                    Category::AggressiveUfo,
                ));
                true
            }
            TimedAction::Pursue(ufo) => {
                if !pool.is_active(ufo) {
                    debug!("pursuit timer for {ufo} retired");
                    false
                } else {
                    if let (Some(target), Ok(tf), Ok(mut vel)) =
                        (target, q_tf.get(ufo), q_vel.get_mut(ufo))
                    {
                        vel.0 = pursuit_velocity(tf.translation.truncate(), target, &tunables);
                    }
                    true
                }
            }
            TimedAction::Fire(ufo) => {
                if !pool.is_active(ufo) {
                    false
                } else {
                    if let (Some(target), Ok(tf)) = (target, q_tf.get(ufo)) {
                        requests.write(ufo_shot(tf.translation.truncate(), target, &tunables));
                    }
                    true
                }
            }
            TimedAction::DespawnCow(cow) => {
                if let Err(err) = pool.destroy(&mut commands, cow) {
                    debug!("delayed cow removal skipped: {err}");
                }
                false
            }
            TimedAction::Restart => {
                info!("restarting session");
                next_state.set(GameState::Playing);
                false
            }
        };

        if keep {
            scheduler.rearm(due, now);
        }
    }
}

pub fn plugin(app: &mut App) {
    app.insert_resource(Scheduler::default());
    app.add_systems(
        FixedUpdate,
        dispatch_timed_actions.in_set(TickSet::Timers),
    );
}
