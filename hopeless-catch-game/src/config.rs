//! Tunable fishing timings.
//!
//! Curves that define game feel stay in `constants.rs`; this module only holds
//! the knobs an embedding app may reasonably want to adjust (accessibility
//! windows, weather sensitivity, resolution holds).

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::constants::{
    BITE_DELAY_MAX_SECS, BITE_DELAY_MIN_SECS, BITE_WINDOW_SECS, CAST_MAX_DISTANCE,
    CAST_POWER_RATE, POST_CATCH_DELAY_SECS, POST_ESCAPE_DELAY_SECS, RAIN_BITE_MULTIPLIER,
    WIND_BITE_MULTIPLIER, WIND_BITE_THRESHOLD,
};

#[derive(Debug, Clone, PartialEq, Error)]
pub enum FishingConfigError {
    #[error("fishing config could not be parsed: {0}")]
    Parse(String),
    #[error("bite delay minimum {min}s exceeds maximum {max}s")]
    DelayMinExceedsMax { min: u32, max: u32 },
    #[error("{field} must be at least {min:.2} (got {value:.2})")]
    MinViolation {
        field: &'static str,
        min: f32,
        value: f32,
    },
    #[error("{field} must be between {min:.2} and {max:.2} (got {value:.2})")]
    RangeViolation {
        field: &'static str,
        min: f32,
        max: f32,
        value: f32,
    },
}

fn check_range(field: &'static str, value: f32, min: f32, max: f32) -> Result<(), FishingConfigError> {
    if (min..=max).contains(&value) {
        Ok(())
    } else {
        Err(FishingConfigError::RangeViolation {
            field,
            min,
            max,
            value,
        })
    }
}

fn check_min(field: &'static str, value: f32, min: f32) -> Result<(), FishingConfigError> {
    if value.is_finite() && value >= min {
        Ok(())
    } else {
        Err(FishingConfigError::MinViolation { field, min, value })
    }
}

/// Bite delay and reaction window settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BiteConfig {
    #[serde(default = "BiteConfig::default_delay_min_secs")]
    pub delay_min_secs: u32,
    #[serde(default = "BiteConfig::default_delay_max_secs")]
    pub delay_max_secs: u32,
    #[serde(default = "BiteConfig::default_window_secs")]
    pub window_secs: f32,
    #[serde(default = "BiteConfig::default_rain_multiplier")]
    pub rain_multiplier: f32,
    #[serde(default = "BiteConfig::default_wind_threshold")]
    pub wind_threshold: f32,
    #[serde(default = "BiteConfig::default_wind_multiplier")]
    pub wind_multiplier: f32,
}

impl BiteConfig {
    const fn default_delay_min_secs() -> u32 {
        BITE_DELAY_MIN_SECS
    }

    const fn default_delay_max_secs() -> u32 {
        BITE_DELAY_MAX_SECS
    }

    const fn default_window_secs() -> f32 {
        BITE_WINDOW_SECS
    }

    const fn default_rain_multiplier() -> f32 {
        RAIN_BITE_MULTIPLIER
    }

    const fn default_wind_threshold() -> f32 {
        WIND_BITE_THRESHOLD
    }

    const fn default_wind_multiplier() -> f32 {
        WIND_BITE_MULTIPLIER
    }

    fn validate(&self) -> Result<(), FishingConfigError> {
        if self.delay_min_secs > self.delay_max_secs {
            return Err(FishingConfigError::DelayMinExceedsMax {
                min: self.delay_min_secs,
                max: self.delay_max_secs,
            });
        }
        check_range("bite.window_secs", self.window_secs, 0.5, 30.0)?;
        check_range("bite.rain_multiplier", self.rain_multiplier, 0.1, 5.0)?;
        check_min("bite.wind_threshold", self.wind_threshold, 0.0)?;
        check_range("bite.wind_multiplier", self.wind_multiplier, 0.1, 5.0)?;
        Ok(())
    }
}

impl Default for BiteConfig {
    fn default() -> Self {
        Self {
            delay_min_secs: Self::default_delay_min_secs(),
            delay_max_secs: Self::default_delay_max_secs(),
            window_secs: Self::default_window_secs(),
            rain_multiplier: Self::default_rain_multiplier(),
            wind_threshold: Self::default_wind_threshold(),
            wind_multiplier: Self::default_wind_multiplier(),
        }
    }
}

/// Cast power meter settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CastConfig {
    #[serde(default = "CastConfig::default_power_rate")]
    pub power_rate: f32,
    #[serde(default = "CastConfig::default_max_distance")]
    pub max_distance: f32,
}

impl CastConfig {
    const fn default_power_rate() -> f32 {
        CAST_POWER_RATE
    }

    const fn default_max_distance() -> f32 {
        CAST_MAX_DISTANCE
    }

    fn validate(&self) -> Result<(), FishingConfigError> {
        check_range("cast.power_rate", self.power_rate, 0.1, 10.0)?;
        check_min("cast.max_distance", self.max_distance, 1.0)?;
        Ok(())
    }
}

impl Default for CastConfig {
    fn default() -> Self {
        Self {
            power_rate: Self::default_power_rate(),
            max_distance: Self::default_max_distance(),
        }
    }
}

/// Top-level fishing configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishingConfig {
    #[serde(default)]
    pub bite: BiteConfig,
    #[serde(default)]
    pub cast: CastConfig,
    #[serde(default = "FishingConfig::default_post_catch_delay_secs")]
    pub post_catch_delay_secs: f32,
    #[serde(default = "FishingConfig::default_post_escape_delay_secs")]
    pub post_escape_delay_secs: f32,
}

impl FishingConfig {
    #[must_use]
    pub const fn default_post_catch_delay_secs() -> f32 {
        POST_CATCH_DELAY_SECS
    }

    #[must_use]
    pub const fn default_post_escape_delay_secs() -> f32 {
        POST_ESCAPE_DELAY_SECS
    }

    /// Parse and validate a configuration document.
    ///
    /// # Errors
    ///
    /// Returns `FishingConfigError::Parse` for malformed JSON, or the first
    /// bound violation found by [`FishingConfig::validate`].
    pub fn from_json(json: &str) -> Result<Self, FishingConfigError> {
        let cfg: Self =
            serde_json::from_str(json).map_err(|err| FishingConfigError::Parse(err.to_string()))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Validate configuration invariants.
    ///
    /// # Errors
    ///
    /// Returns `FishingConfigError` when any field violates the documented bounds.
    pub fn validate(&self) -> Result<(), FishingConfigError> {
        self.bite.validate()?;
        self.cast.validate()?;
        check_range("post_catch_delay_secs", self.post_catch_delay_secs, 0.0, 10.0)?;
        check_range("post_escape_delay_secs", self.post_escape_delay_secs, 0.0, 10.0)?;
        Ok(())
    }
}

impl Default for FishingConfig {
    fn default() -> Self {
        Self {
            bite: BiteConfig::default(),
            cast: CastConfig::default(),
            post_catch_delay_secs: Self::default_post_catch_delay_secs(),
            post_escape_delay_secs: Self::default_post_escape_delay_secs(),
        }
    }
}
