//! Centralized balance and tuning constants for the fishing simulation.
//!
//! These values define the deterministic math for bite, struggle and reel
//! resolution. Keeping them together ensures that game feel can only be
//! adjusted via code changes reviewed in version control, rather than through
//! external JSON assets.

// Logging targets ----------------------------------------------------------
pub(crate) const LOG_TARGET_MACHINE: &str = "hopeless_catch::machine";
pub(crate) const LOG_TARGET_SESSION: &str = "hopeless_catch::session";
pub(crate) const LOG_TARGET_CATALOG: &str = "hopeless_catch::catalog";

// Gauges -------------------------------------------------------------------
pub const LINE_STRESS_MAX: f32 = 100.0;
pub const REEL_PROGRESS_MAX: f32 = 100.0;
pub const STRUGGLE_INTENSITY_MAX: f32 = 200.0;

// Struggle protocol --------------------------------------------------------
pub(crate) const STRUGGLE_ROLL_MIN: u32 = 3;
pub(crate) const STRUGGLE_ROLL_MAX: u32 = 8;
pub(crate) const STRUGGLE_INTENSITY_GAIN_REELING: f32 = 5.0;
pub(crate) const STRUGGLE_STRESS_GAIN_REELING: f32 = 10.0;
pub(crate) const STRUGGLE_INTENSITY_DECAY: f32 = 1.5;
pub(crate) const STRUGGLE_STRESS_DECAY: f32 = 5.0;
/// Fraction of the stress ceiling a passive player is held at instead of snapping.
pub(crate) const STRUGGLE_PASSIVE_STRESS_HOLD: f32 = 0.9;
/// Stress carried into the reel protocol is capped here.
pub(crate) const STRUGGLE_EXIT_STRESS_CAP: f32 = 20.0;

// Reel protocol ------------------------------------------------------------
pub(crate) const REEL_PULL_INTERVAL_BASE: f32 = 3.0;
pub(crate) const REEL_PULL_DURATION_BASE: f32 = 1.0;
pub(crate) const REEL_PULL_DURATION_PER_DIFFICULTY: f32 = 0.5;
pub(crate) const REEL_STRESS_GAIN_AGAINST_PULL: f32 = 40.0;
pub(crate) const REEL_SPEED_BASE: f32 = 15.0;
pub(crate) const REEL_SPEED_PER_DIFFICULTY: f32 = 2.0;
pub(crate) const REEL_STRESS_GAIN_REELING: f32 = 6.0;
/// Reeling only gains ground while stress is under this fraction of the ceiling.
pub(crate) const REEL_SAFE_STRESS_FRACTION: f32 = 0.8;
pub(crate) const REEL_FISH_STRENGTH_BASE: f32 = 8.0;
pub(crate) const REEL_FISH_STRENGTH_PER_DIFFICULTY: f32 = 1.5;
pub(crate) const REEL_DECAY_PULLING: f32 = 1.5;
pub(crate) const REEL_DECAY_RESTING: f32 = 0.7;
pub(crate) const REEL_STRESS_RELAX: f32 = 20.0;

// Player assists -----------------------------------------------------------
pub(crate) const MANUAL_REEL_PROGRESS: f32 = 5.0;
pub(crate) const MANUAL_REEL_STRESS: f32 = 3.0;
pub(crate) const EASE_LINE_STRESS: f32 = 15.0;
pub(crate) const EASE_LINE_INTENSITY: f32 = 10.0;

// Bite timing defaults -----------------------------------------------------
pub(crate) const BITE_DELAY_MIN_SECS: u32 = 2;
pub(crate) const BITE_DELAY_MAX_SECS: u32 = 8;
pub(crate) const BITE_WINDOW_SECS: f32 = 3.0;
pub(crate) const RAIN_BITE_MULTIPLIER: f32 = 0.7;
pub(crate) const WIND_BITE_THRESHOLD: f32 = 15.0;
pub(crate) const WIND_BITE_MULTIPLIER: f32 = 1.3;

// Attempt resolution -------------------------------------------------------
pub(crate) const POST_CATCH_DELAY_SECS: f32 = 0.9;
pub(crate) const POST_ESCAPE_DELAY_SECS: f32 = 0.0;

// Casting ------------------------------------------------------------------
pub(crate) const CAST_POWER_RATE: f32 = 1.5;
pub(crate) const CAST_MAX_DISTANCE: f32 = 120.0;

// Catalog bounds -----------------------------------------------------------
pub const DIFFICULTY_MIN: u8 = 1;
pub const DIFFICULTY_MAX: u8 = 10;
