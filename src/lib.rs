//! Fruit Merge - drop fruit, merge matching pairs, don't overflow the box
//!
//! Core modules:
//! - `sim`: Deterministic simulation (fruit physics, merges, game state)
//! - `renderer`: Display list and Canvas 2D backend
//! - `tuning`: Data-driven game balance

pub mod renderer;
pub mod sim;
pub mod tuning;

pub use tuning::{Tuning, TuningError};

/// Game configuration constants
pub mod consts {
    /// Play field dimensions (logical canvas units)
    pub const FIELD_WIDTH: f32 = 800.0;
    pub const FIELD_HEIGHT: f32 = 1200.0;

    /// Horizontal inset for spawn positions
    pub const SPAWN_MARGIN: f32 = 10.0;
    /// Spawner cadence (ms)
    pub const SPAWN_INTERVAL_MS: f64 = 1000.0;
    /// Delay before a bounced fruit resumes falling (ms)
    pub const RESTORE_DELAY_MS: f64 = 100.0;

    /// Fall speed at score 0 (units per frame)
    pub const BASE_FALL_SPEED: f32 = 2.0;
    /// Score needed for each +1 of fall speed
    pub const FALL_SPEED_SCORE_STEP: u64 = 4000;
    /// Extra fall speed while fast drop is held
    pub const FAST_DROP_BOOST: f32 = 3.0;
    /// Arrow key horizontal nudge
    pub const NUDGE_STEP: f32 = 10.0;

    /// Upward velocity applied on a bounce (scaled by damping)
    pub const BOUNCE_IMPULSE: f32 = 5.0;
    /// Damping multiplier applied after each bounce
    pub const BOUNCE_DECAY: f32 = 0.6;
    /// Horizontal speed for side-on contacts (random direction)
    pub const SIDE_KICK: f32 = 1.0;
    /// Scale for cos(angle) horizontal kick on top/bottom contacts
    pub const DIAGONAL_KICK_SCALE: f32 = 2.0;

    /// A fruit that bounced more than this many times may settle
    pub const SETTLE_BOUNCE_COUNT: u32 = 10;
    /// Vertical speed below which a bouncing fruit settles
    pub const SETTLE_SPEED: f32 = 0.1;

    /// Points per rank for a merge: points * (new_rank + 1)
    pub const MERGE_POINTS_PER_RANK: u64 = 20;
    /// Flat bonus for merging two top-rank fruit
    pub const TOP_RANK_BONUS: u64 = 100;

    /// Frame period used by the headless driver (60 Hz)
    pub const HEADLESS_FRAME_MS: f64 = 1000.0 / 60.0;
}
