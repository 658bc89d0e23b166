//! Game state and session lifecycle
//!
//! One `GameState` is one play session. The host owns it and hands it to
//! the frame tick, the spawn tick and the input handlers in turn.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::fruit::Fruit;
use super::schedule::Scheduler;
use crate::tuning::Tuning;

/// Session lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GamePhase {
    /// Created, start not pressed yet
    Ready,
    /// Frame loop and spawner are live
    Running,
    /// The box overflowed; timers must stop
    GameOver,
}

/// Things the host reacts to (score display, timers, alert)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GameEvent {
    Started,
    Spawned { fruit: u32, rank: u8 },
    Merged { fruit: u32, rank: u8, points: u64 },
    /// Two top-rank fruit met and both left the box
    TopRankCleared { points: u64 },
    ScoreChanged(u64),
    GameOver { score: u64, top_rank: u8 },
}

/// Complete session state
#[derive(Debug, Clone)]
pub struct GameState {
    /// Balance parameters, fixed for the session
    pub tuning: Tuning,
    pub phase: GamePhase,
    /// Live fruit in spawn order
    pub fruits: Vec<Fruit>,
    /// The fruit under player control, if any
    pub active: Option<u32>,
    pub score: u64,
    /// Highest rank reached this session
    pub top_rank: u8,
    /// Deferred velocity restores
    pub scheduler: Scheduler,
    /// Host clock at the current frame (ms)
    pub now_ms: f64,
    /// Events since the host last drained them
    events: Vec<GameEvent>,
    pub(crate) rng: Pcg32,
    next_id: u32,
}

impl GameState {
    pub fn new(seed: u64, tuning: Tuning) -> Self {
        Self {
            tuning,
            phase: GamePhase::Ready,
            fruits: Vec::new(),
            active: None,
            score: 0,
            top_rank: 0,
            scheduler: Scheduler::new(),
            now_ms: 0.0,
            events: Vec::new(),
            rng: Pcg32::seed_from_u64(seed),
            next_id: 1,
        }
    }

    /// Clear the box and score for a fresh run. Pending restores are dropped
    /// so none of them can reach a fruit of the new run.
    pub fn reset(&mut self) {
        self.fruits.clear();
        self.active = None;
        self.score = 0;
        self.top_rank = 0;
        self.scheduler.clear();
        self.events.clear();
    }

    /// Allocate a new entity ID
    pub fn next_entity_id(&mut self) -> u32 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    #[inline]
    pub fn is_running(&self) -> bool {
        self.phase == GamePhase::Running
    }

    pub fn index_of(&self, id: u32) -> Option<usize> {
        self.fruits.iter().position(|f| f.id == id)
    }

    pub fn fruit(&self, id: u32) -> Option<&Fruit> {
        self.fruits.iter().find(|f| f.id == id)
    }

    pub fn fruit_mut(&mut self, id: u32) -> Option<&mut Fruit> {
        self.fruits.iter_mut().find(|f| f.id == id)
    }

    /// The player-controlled fruit
    pub fn active_fruit(&self) -> Option<&Fruit> {
        self.active.and_then(|id| self.fruit(id))
    }

    pub fn active_fruit_mut(&mut self) -> Option<&mut Fruit> {
        let id = self.active?;
        self.fruit_mut(id)
    }

    /// Drop control of `id` if it is the active fruit
    pub fn release_active(&mut self, id: u32) {
        if self.active == Some(id) {
            self.active = None;
        }
    }

    /// Take a fruit out of the box, cancelling anything scheduled for it
    pub fn remove_fruit(&mut self, id: u32) -> Option<Fruit> {
        let idx = self.index_of(id)?;
        self.scheduler.cancel_fruit(id);
        self.release_active(id);
        Some(self.fruits.remove(idx))
    }

    /// True when nothing is moving (vacuously true for an empty box)
    pub fn all_stopped(&self) -> bool {
        self.fruits.iter().all(|f| f.stopped)
    }

    /// Let every fruit move again after the pile changed shape
    pub fn unfreeze_all(&mut self) {
        for fruit in &mut self.fruits {
            fruit.stopped = false;
            fruit.merging = false;
        }
    }

    /// Settled pile reaching the spawn line. Fruit mid-merge don't count.
    pub fn overflowed(&self) -> bool {
        self.all_stopped() && self.fruits.iter().any(|f| f.top() <= 0.0 && !f.merging)
    }

    /// Current ambient fall speed
    #[inline]
    pub fn fall_speed(&self) -> f32 {
        self.tuning.fall_speed(self.score)
    }

    pub fn add_score(&mut self, points: u64) {
        self.score += points;
        self.push_event(GameEvent::ScoreChanged(self.score));
    }

    pub fn push_event(&mut self, event: GameEvent) {
        self.events.push(event);
    }

    /// Hand pending events to the host
    pub fn drain_events(&mut self) -> Vec<GameEvent> {
        std::mem::take(&mut self.events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::schedule::Deferred;
    use glam::Vec2;

    fn state_with(fruits: &[(f32, f32, u8)]) -> GameState {
        let mut state = GameState::new(1, Tuning::default());
        for &(x, y, rank) in fruits {
            let id = state.next_entity_id();
            state.fruits.push(Fruit::new(id, Vec2::new(x, y), rank, 2.0));
        }
        state
    }

    #[test]
    fn test_remove_fruit_cancels_restores_and_control() {
        let mut state = state_with(&[(200.0, 500.0, 1), (600.0, 500.0, 2)]);
        state.active = Some(1);
        state.scheduler.schedule(100.0, Deferred::RestoreFall { fruit: 1 });
        state.scheduler.schedule(100.0, Deferred::RestoreFall { fruit: 2 });

        let removed = state.remove_fruit(1).unwrap();
        assert_eq!(removed.rank(), 1);
        assert_eq!(state.active, None);
        assert!(!state.scheduler.has_pending(1));
        assert!(state.scheduler.has_pending(2));
        assert!(state.remove_fruit(1).is_none());
    }

    #[test]
    fn test_overflow_needs_everything_stopped() {
        let mut state = state_with(&[(400.0, 30.0, 0), (400.0, 1100.0, 5)]);
        // Top edge of fruit 1 is at -10, but fruit 2 is still moving
        state.fruits[0].stopped = true;
        assert!(!state.overflowed());

        state.fruits[1].stopped = true;
        assert!(state.overflowed());

        state.fruits[0].merging = true;
        assert!(!state.overflowed());
    }

    #[test]
    fn test_reset_clears_session() {
        let mut state = state_with(&[(400.0, 500.0, 3)]);
        state.active = Some(1);
        state.add_score(120);
        state.top_rank = 4;
        state.scheduler.schedule(10.0, Deferred::RestoreFall { fruit: 1 });

        state.reset();
        assert!(state.fruits.is_empty());
        assert_eq!(state.active, None);
        assert_eq!(state.score, 0);
        assert_eq!(state.top_rank, 0);
        assert!(state.scheduler.is_empty());
        assert!(state.drain_events().is_empty());
        assert!(state.all_stopped());
    }

    #[test]
    fn test_events_drain_once() {
        let mut state = GameState::new(1, Tuning::default());
        state.add_score(40);
        assert_eq!(state.drain_events(), vec![GameEvent::ScoreChanged(40)]);
        assert!(state.drain_events().is_empty());
    }
}
