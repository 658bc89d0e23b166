//! Data-driven game balance
//!
//! Every gameplay constant the simulation reads goes through [`Tuning`].
//! Defaults come from [`crate::consts`]; overrides are partial JSON objects
//! (missing fields keep their default).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::consts::*;

/// Errors raised when loading or validating a tuning override.
#[derive(Debug, Error)]
pub enum TuningError {
    #[error("tuning json is malformed: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("field dimensions must be positive (got {width}x{height})")]
    NonPositiveField { width: f32, height: f32 },
    #[error("spawn margin {margin} leaves no room in a field {width} wide")]
    SpawnMarginTooLarge { margin: f32, width: f32 },
    #[error("fall speed score step must be non-zero")]
    ZeroScoreStep,
    #[error("bounce decay {0} must be between 0.0 and 1.0 (exclusive)")]
    DecayOutOfRange(f32),
    #[error("{name} interval must be positive (got {value} ms)")]
    NonPositiveInterval { name: &'static str, value: f64 },
}

/// Game balance parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Tuning {
    // === Field ===
    pub field_width: f32,
    pub field_height: f32,
    pub spawn_margin: f32,

    // === Timing ===
    pub spawn_interval_ms: f64,
    pub restore_delay_ms: f64,

    // === Falling ===
    pub base_fall_speed: f32,
    pub fall_speed_score_step: u64,
    pub fast_drop_boost: f32,
    pub nudge_step: f32,

    // === Bouncing ===
    pub bounce_impulse: f32,
    pub bounce_decay: f32,
    pub side_kick: f32,
    pub diagonal_kick_scale: f32,
    pub settle_bounce_count: u32,
    pub settle_speed: f32,

    // === Scoring ===
    pub merge_points_per_rank: u64,
    pub top_rank_bonus: u64,
}

impl Default for Tuning {
    fn default() -> Self {
        Self {
            field_width: FIELD_WIDTH,
            field_height: FIELD_HEIGHT,
            spawn_margin: SPAWN_MARGIN,

            spawn_interval_ms: SPAWN_INTERVAL_MS,
            restore_delay_ms: RESTORE_DELAY_MS,

            base_fall_speed: BASE_FALL_SPEED,
            fall_speed_score_step: FALL_SPEED_SCORE_STEP,
            fast_drop_boost: FAST_DROP_BOOST,
            nudge_step: NUDGE_STEP,

            bounce_impulse: BOUNCE_IMPULSE,
            bounce_decay: BOUNCE_DECAY,
            side_kick: SIDE_KICK,
            diagonal_kick_scale: DIAGONAL_KICK_SCALE,
            settle_bounce_count: SETTLE_BOUNCE_COUNT,
            settle_speed: SETTLE_SPEED,

            merge_points_per_rank: MERGE_POINTS_PER_RANK,
            top_rank_bonus: TOP_RANK_BONUS,
        }
    }
}

impl Tuning {
    /// Parse a (possibly partial) JSON override and validate it
    pub fn from_json(json: &str) -> Result<Self, TuningError> {
        let tuning: Tuning = serde_json::from_str(json)?;
        tuning.validate()?;
        Ok(tuning)
    }

    /// Reject values the simulation can't run with
    pub fn validate(&self) -> Result<(), TuningError> {
        if self.field_width <= 0.0 || self.field_height <= 0.0 {
            return Err(TuningError::NonPositiveField {
                width: self.field_width,
                height: self.field_height,
            });
        }
        if self.spawn_margin < 0.0 || self.spawn_margin * 2.0 >= self.field_width {
            return Err(TuningError::SpawnMarginTooLarge {
                margin: self.spawn_margin,
                width: self.field_width,
            });
        }
        if self.fall_speed_score_step == 0 {
            return Err(TuningError::ZeroScoreStep);
        }
        if !(self.bounce_decay > 0.0 && self.bounce_decay < 1.0) {
            return Err(TuningError::DecayOutOfRange(self.bounce_decay));
        }
        if self.spawn_interval_ms <= 0.0 {
            return Err(TuningError::NonPositiveInterval {
                name: "spawn",
                value: self.spawn_interval_ms,
            });
        }
        if self.restore_delay_ms < 0.0 {
            return Err(TuningError::NonPositiveInterval {
                name: "restore",
                value: self.restore_delay_ms,
            });
        }
        Ok(())
    }

    /// Fall speed for the given score: a step function that grows by one
    /// every `fall_speed_score_step` points
    #[inline]
    pub fn fall_speed(&self, score: u64) -> f32 {
        self.base_fall_speed + (score / self.fall_speed_score_step) as f32
    }

    /// Fall speed while fast drop is held
    #[inline]
    pub fn fast_fall_speed(&self, score: u64) -> f32 {
        self.fall_speed(score) + self.fast_drop_boost
    }

    /// LocalStorage key
    #[allow(dead_code)]
    const STORAGE_KEY: &'static str = "fruit_merge_tuning";

    /// Load a tuning override from LocalStorage (WASM only)
    #[cfg(target_arch = "wasm32")]
    pub fn load() -> Self {
        let storage = web_sys::window()
            .and_then(|w| w.local_storage().ok())
            .flatten();

        if let Some(storage) = storage {
            if let Ok(Some(json)) = storage.get_item(Self::STORAGE_KEY) {
                match Self::from_json(&json) {
                    Ok(tuning) => {
                        log::info!("Loaded tuning override from LocalStorage");
                        return tuning;
                    }
                    Err(e) => log::warn!("Ignoring tuning override: {}", e),
                }
            }
        }

        Self::default()
    }

    /// Load a tuning override from a JSON file (native)
    #[cfg(not(target_arch = "wasm32"))]
    pub fn load_file(path: &std::path::Path) -> Self {
        let parsed = std::fs::read_to_string(path)
            .map_err(|e| e.to_string())
            .and_then(|json| Self::from_json(&json).map_err(|e| e.to_string()));

        match parsed {
            Ok(tuning) => {
                log::info!("Loaded tuning from {}", path.display());
                tuning
            }
            Err(e) => {
                log::warn!("Ignoring tuning file {}: {}", path.display(), e);
                Self::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_fall_speed_steps() {
        let tuning = Tuning::default();
        assert_eq!(tuning.fall_speed(0), 2.0);
        assert_eq!(tuning.fall_speed(3999), 2.0);
        assert_eq!(tuning.fall_speed(4000), 3.0);
        assert_eq!(tuning.fall_speed(8000), 4.0);
        assert_eq!(tuning.fast_fall_speed(0), 5.0);
    }

    #[test]
    fn test_partial_override_keeps_defaults() {
        let tuning = Tuning::from_json(r#"{ "base_fall_speed": 3.0 }"#).unwrap();
        assert_eq!(tuning.base_fall_speed, 3.0);
        assert_eq!(tuning.field_width, FIELD_WIDTH);
        assert_eq!(tuning.top_rank_bonus, TOP_RANK_BONUS);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(matches!(
            Tuning::from_json(r#"{ "fall_speed_score_step": 0 }"#),
            Err(TuningError::ZeroScoreStep)
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "bounce_decay": 1.5 }"#),
            Err(TuningError::DecayOutOfRange(_))
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "spawn_margin": 400.0 }"#),
            Err(TuningError::SpawnMarginTooLarge { .. })
        ));
        assert!(matches!(
            Tuning::from_json(r#"{ "field_height": -1.0 }"#),
            Err(TuningError::NonPositiveField { .. })
        ));
        assert!(matches!(
            Tuning::from_json("not json"),
            Err(TuningError::Parse(_))
        ));
    }

    proptest! {
        #[test]
        fn prop_fall_speed_is_monotonic(a in 0u64..1_000_000, b in 0u64..1_000_000) {
            let tuning = Tuning::default();
            let (lo, hi) = if a <= b { (a, b) } else { (b, a) };
            prop_assert!(tuning.fall_speed(lo) <= tuning.fall_speed(hi));
        }
    }
}
