//! Player input applied to the active fruit
//!
//! Handlers run between frames on the host's event queue, so they mutate
//! the state directly instead of buffering.

use super::state::GameState;

/// Player input, already converted to field units
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum InputEvent {
    /// Pointer or touch moved to this x. Not clamped here; the next frame's
    /// wall check does that.
    MoveTo(f32),
    NudgeLeft,
    NudgeRight,
    /// Pointer down / touch start
    FastDropStart,
    /// Down arrow key. Same as `FastDropStart`, but only while the active
    /// fruit is still in flight.
    KeyFastDrop,
    /// Down arrow up / pointer up / touch end
    FastDropEnd,
}

/// Apply one input. Returns whether it touched the active fruit.
pub fn apply_input(state: &mut GameState, event: InputEvent) -> bool {
    let nudge = state.tuning.nudge_step;
    let normal = state.fall_speed();
    let fast = state.tuning.fast_fall_speed(state.score);

    let Some(fruit) = state.active_fruit_mut() else {
        return false;
    };

    match event {
        InputEvent::MoveTo(_)
        | InputEvent::NudgeLeft
        | InputEvent::NudgeRight
        | InputEvent::KeyFastDrop
            if fruit.stopped =>
        {
            false
        }
        InputEvent::MoveTo(x) => {
            fruit.pos.x = x;
            true
        }
        InputEvent::NudgeLeft => {
            fruit.pos.x -= nudge;
            true
        }
        InputEvent::NudgeRight => {
            fruit.pos.x += nudge;
            true
        }
        InputEvent::FastDropStart | InputEvent::KeyFastDrop => {
            fruit.vel.y = fast;
            true
        }
        InputEvent::FastDropEnd => {
            fruit.vel.y = normal;
            true
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::tick::{spawn_fruit, start};
    use crate::tuning::Tuning;

    fn with_active() -> (GameState, u32) {
        let mut state = GameState::new(3, Tuning::default());
        start(&mut state);
        let id = spawn_fruit(&mut state, 400.0, 2).unwrap();
        (state, id)
    }

    #[test]
    fn test_move_and_nudge() {
        let (mut state, id) = with_active();

        assert!(apply_input(&mut state, InputEvent::MoveTo(250.0)));
        assert_eq!(state.fruit(id).unwrap().pos.x, 250.0);

        apply_input(&mut state, InputEvent::NudgeLeft);
        apply_input(&mut state, InputEvent::NudgeLeft);
        apply_input(&mut state, InputEvent::NudgeRight);
        assert_eq!(state.fruit(id).unwrap().pos.x, 240.0);

        // No clamp at input time
        apply_input(&mut state, InputEvent::MoveTo(-50.0));
        assert_eq!(state.fruit(id).unwrap().pos.x, -50.0);
    }

    #[test]
    fn test_fast_drop_tracks_score() {
        let (mut state, id) = with_active();
        state.score = 4000;

        apply_input(&mut state, InputEvent::FastDropStart);
        assert_eq!(state.fruit(id).unwrap().vel.y, 6.0);

        apply_input(&mut state, InputEvent::FastDropEnd);
        assert_eq!(state.fruit(id).unwrap().vel.y, 3.0);
    }

    #[test]
    fn test_stopped_fruit_ignores_movement() {
        let (mut state, id) = with_active();
        state.fruit_mut(id).unwrap().stopped = true;

        assert!(!apply_input(&mut state, InputEvent::MoveTo(100.0)));
        assert!(!apply_input(&mut state, InputEvent::NudgeRight));
        assert_eq!(state.fruit(id).unwrap().pos.x, 400.0);

        // Fast drop only needs an active fruit
        assert!(apply_input(&mut state, InputEvent::FastDropStart));
    }

    #[test]
    fn test_key_fast_drop_needs_fruit_in_flight() {
        let (mut state, id) = with_active();

        assert!(apply_input(&mut state, InputEvent::KeyFastDrop));
        assert_eq!(state.fruit(id).unwrap().vel.y, 5.0);
        apply_input(&mut state, InputEvent::FastDropEnd);

        state.fruit_mut(id).unwrap().stopped = true;
        assert!(!apply_input(&mut state, InputEvent::KeyFastDrop));
        assert_eq!(state.fruit(id).unwrap().vel.y, 2.0);
    }

    #[test]
    fn test_no_active_fruit() {
        let mut state = GameState::new(3, Tuning::default());
        assert!(!apply_input(&mut state, InputEvent::MoveTo(100.0)));
        assert!(!apply_input(&mut state, InputEvent::FastDropStart));
    }
}
