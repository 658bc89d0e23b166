//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Host-supplied clock only
//! - Seeded RNG only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod collision;
pub mod fruit;
pub mod input;
pub mod schedule;
pub mod state;
pub mod tick;

pub use collision::{Contact, circle_contact};
pub use fruit::{FRUIT_KINDS, Fruit, FruitColor, FruitKind, KIND_COUNT, TOP_RANK};
pub use input::{InputEvent, apply_input};
pub use schedule::{Deferred, IntervalTimer, Scheduler};
pub use state::{GameEvent, GamePhase, GameState};
pub use tick::{frame, spawn_fruit, spawn_tick, start};
