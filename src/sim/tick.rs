//! Per-frame simulation step
//!
//! The host drives two independent tasks against the same `GameState`:
//! [`frame`] on every animation frame and [`spawn_tick`] on the spawn
//! interval. Neither calls the other.

use glam::Vec2;
use rand::Rng;

use super::collision::{circle_contact, diagonal_kick, hits_floor, side_wall, wall_clamp_x};
use super::fruit::{Fruit, KIND_COUNT};
use super::schedule::Deferred;
use super::state::{GameEvent, GamePhase, GameState};

/// Start a session. Does nothing (returns false) if one is already
/// running, so a double click never doubles the timers.
pub fn start(state: &mut GameState) -> bool {
    if state.is_running() {
        return false;
    }
    state.reset();
    state.phase = GamePhase::Running;
    state.push_event(GameEvent::Started);
    state.push_event(GameEvent::ScoreChanged(state.score));
    log::info!("Game started");
    true
}

/// Advance every live fruit by one frame
pub fn frame(state: &mut GameState, now_ms: f64) {
    if !state.is_running() {
        return;
    }
    state.now_ms = now_ms;

    for event in state.scheduler.take_due(now_ms) {
        fire(state, event);
    }

    // Fruit merged away mid-frame are skipped
    let ids: Vec<u32> = state.fruits.iter().map(|f| f.id).collect();
    for id in ids {
        if !state.is_running() {
            break;
        }
        step_fruit(state, id);
    }
}

/// Spawn timer body: drop a random fruit if the box is calm
pub fn spawn_tick(state: &mut GameState) -> Option<u32> {
    if !can_spawn(state) {
        return None;
    }
    let margin = state.tuning.spawn_margin;
    let width = state.tuning.field_width;
    let x = state.rng.random_range(margin..width - margin);
    let rank = state.rng.random_range(0..KIND_COUNT as u8);
    spawn_fruit(state, x, rank)
}

/// Drop a fruit of `rank` at `x` on the spawn line. Refused while another
/// fruit is active or anything is still moving.
pub fn spawn_fruit(state: &mut GameState, x: f32, rank: u8) -> Option<u32> {
    if !can_spawn(state) {
        return None;
    }
    let id = state.next_entity_id();
    let fruit = Fruit::new(id, Vec2::new(x, 0.0), rank, state.fall_speed());
    let rank = fruit.rank();
    state.fruits.push(fruit);
    state.active = Some(id);
    state.top_rank = state.top_rank.max(rank);
    state.push_event(GameEvent::Spawned { fruit: id, rank });
    log::debug!("Spawned fruit {} (rank {}) at x={:.1}", id, rank, x);
    Some(id)
}

fn can_spawn(state: &GameState) -> bool {
    state.is_running() && state.active.is_none() && state.all_stopped()
}

fn fire(state: &mut GameState, event: Deferred) {
    match event {
        Deferred::RestoreFall { fruit } => {
            let speed = state.fall_speed();
            // Cancelled on removal, but a missing fruit is still a no-op
            if let Some(f) = state.fruit_mut(fruit) {
                f.vel.y = speed;
            }
        }
    }
}

/// Move, wall-clamp and collide one fruit
fn step_fruit(state: &mut GameState, id: u32) {
    let Some(idx) = state.index_of(id) else {
        return;
    };
    let width = state.tuning.field_width;
    let height = state.tuning.field_height;

    if !state.fruits[idx].stopped {
        let fruit = &mut state.fruits[idx];
        fruit.pos += fruit.vel;
        let radius = fruit.radius();

        if hits_floor(fruit.pos, radius, height) {
            fruit.pos.y = height - radius;
            fruit.stopped = true;
            fruit.vel.x = 0.0;
            fruit.bounce_count = 0;
            state.release_active(id);
            check_game_over(state);
            return;
        }

        if let Some(wall) = side_wall(fruit.pos, radius, width) {
            fruit.pos.x = wall_clamp_x(wall, radius, width);
            fruit.vel.x = 0.0;
        }

        resolve_collisions(state, id);
    }

    settle_if_spent(state, id);
}

/// A fruit that has bounced itself out eventually just stops
fn settle_if_spent(state: &mut GameState, id: u32) {
    let settle_bounces = state.tuning.settle_bounce_count;
    let settle_speed = state.tuning.settle_speed;
    let Some(fruit) = state.fruit_mut(id) else {
        return;
    };
    if fruit.bounce_count > settle_bounces && fruit.vel.y.abs() < settle_speed {
        fruit.vel.y = 0.0;
        fruit.stopped = true;
        state.release_active(id);
        check_game_over(state);
    }
}

/// Collide fruit `id` against the rest of the box. The first overlapping
/// fruit in collection order wins.
pub(crate) fn resolve_collisions(state: &mut GameState, id: u32) {
    let Some(idx) = state.index_of(id) else {
        return;
    };
    let a = state.fruits[idx];
    let hit = state
        .fruits
        .iter()
        .enumerate()
        .filter(|(i, _)| *i != idx)
        .find_map(|(_, b)| {
            circle_contact(a.pos, a.radius(), b.pos, b.radius()).map(|contact| (*b, contact))
        });

    let Some((other, contact)) = hit else {
        return;
    };

    if other.rank() == a.rank() {
        merge(state, id, other.id);
        return;
    }

    let t = &state.tuning;
    let (side_kick, diagonal_scale) = (t.side_kick, t.diagonal_kick_scale);
    let (impulse, decay) = (t.bounce_impulse, t.bounce_decay);
    let due = state.now_ms + t.restore_delay_ms;

    let kick_x = if contact.is_side_on() {
        if state.rng.random_bool(0.5) {
            -side_kick
        } else {
            side_kick
        }
    } else {
        diagonal_kick(contact.angle, diagonal_scale)
    };

    let fruit = &mut state.fruits[idx];
    fruit.pos += contact.separation();
    fruit.vel.x = kick_x;
    fruit.vel.y = -impulse * fruit.bounce_damping;
    fruit.bounce_damping *= decay;
    fruit.bounce_count += 1;
    fruit.stopped = false;

    state.scheduler.schedule(due, Deferred::RestoreFall { fruit: id });
}

/// Merge `other` into `id` (same rank). Below the top rank `id` grows and
/// `other` leaves; at the top rank both leave for a flat bonus.
pub(crate) fn merge(state: &mut GameState, id: u32, other: u32) {
    let Some(fruit) = state.fruit_mut(id) else {
        return;
    };
    fruit.merging = true;

    match fruit.promote() {
        Some(new_rank) => {
            state.remove_fruit(other);
            let points = state.tuning.merge_points_per_rank * (new_rank as u64 + 1);
            state.add_score(points);
            state.top_rank = state.top_rank.max(new_rank);
            state.push_event(GameEvent::Merged {
                fruit: id,
                rank: new_rank,
                points,
            });
            log::debug!("Merged into rank {} (+{})", new_rank, points);

            if let Some(fruit) = state.fruit_mut(id) {
                fruit.stopped = false;
            }
            resolve_collisions(state, id);
            state.unfreeze_all();
        }
        None => {
            state.remove_fruit(id);
            state.remove_fruit(other);
            let points = state.tuning.top_rank_bonus;
            state.add_score(points);
            state.active = None;
            state.push_event(GameEvent::TopRankCleared { points });
            log::debug!("Top-rank pair cleared (+{})", points);
            state.unfreeze_all();
        }
    }

    if let Some(fruit) = state.fruit_mut(id) {
        fruit.merging = false;
    }
}

/// End the session once the settled pile reaches the spawn line
fn check_game_over(state: &mut GameState) {
    if !state.is_running() || !state.overflowed() {
        return;
    }
    state.phase = GamePhase::GameOver;
    state.active = None;
    state.scheduler.clear();
    state.push_event(GameEvent::GameOver {
        score: state.score,
        top_rank: state.top_rank,
    });
    log::info!(
        "Game over: score {}, top rank {}",
        state.score,
        state.top_rank
    );
}
