//! Wait-for-bite timer and reaction window.
//!
//! The timer keeps its own tick-driven clock, rebased to zero whenever a wait
//! or a bite starts; bite timestamps and reaction times are measured against
//! it, never against wall time.

use serde::{Deserialize, Serialize};

use crate::bait::BaitKind;
use crate::config::BiteConfig;
use crate::numbers::{sanitize_dt, u32_to_f32};
use crate::rng::RandomSource;
use crate::weather::WeatherModifiers;

/// What a tick of the bite timer observed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BiteSignal {
    /// Not started, or still waiting for a fish (or waiting on the player).
    Waiting,
    /// A fish took the bait this tick.
    Bite,
    /// The reaction window elapsed without a hook attempt.
    Missed,
}

/// Outcome of a hook-set attempt against an active bite.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct HookAttempt {
    pub reaction_secs: f32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct BiteTimer {
    started: bool,
    delay_secs: f32,
    elapsed_secs: f32,
    clock_secs: f32,
    bite_started_at: Option<f32>,
    window_secs: f32,
}

impl Default for BiteTimer {
    fn default() -> Self {
        Self::new()
    }
}

impl BiteTimer {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            started: false,
            delay_secs: 0.0,
            elapsed_secs: 0.0,
            clock_secs: 0.0,
            bite_started_at: None,
            window_secs: crate::constants::BITE_WINDOW_SECS,
        }
    }

    /// Roll a fresh delay for `bait` and begin waiting.
    pub fn start(&mut self, bait: BaitKind, cfg: &BiteConfig, rng: &mut dyn RandomSource) {
        let base = rng.int_inclusive(cfg.delay_min_secs, cfg.delay_max_secs);
        self.delay_secs = u32_to_f32(base) * bait.delay_multiplier();
        self.window_secs = cfg.window_secs;
        self.elapsed_secs = 0.0;
        self.clock_secs = 0.0;
        self.bite_started_at = None;
        self.started = true;
    }

    /// Advance by `dt` seconds.
    pub fn tick(&mut self, dt: f32, weather: &WeatherModifiers, cfg: &BiteConfig) -> BiteSignal {
        let dt = sanitize_dt(dt);
        self.clock_secs += dt;
        if !self.started {
            return BiteSignal::Waiting;
        }
        match self.bite_started_at {
            None => {
                self.elapsed_secs += dt;
                let adjusted = self.delay_secs * weather.bite_multiplier(cfg);
                if self.elapsed_secs >= adjusted {
                    self.bite_started_at = Some(self.clock_secs);
                    BiteSignal::Bite
                } else {
                    BiteSignal::Waiting
                }
            }
            Some(started_at) => {
                if self.clock_secs - started_at > self.window_secs {
                    self.bite_started_at = None;
                    self.started = false;
                    BiteSignal::Missed
                } else {
                    BiteSignal::Waiting
                }
            }
        }
    }

    /// Consume the active bite, reporting how long the player took.
    ///
    /// Returns `None` when no bite is active. The reaction time is informative
    /// only; success is rolled by the caller from the bait's hook chance.
    pub fn attempt_hook(&mut self) -> Option<HookAttempt> {
        let started_at = self.bite_started_at.take()?;
        self.started = false;
        Some(HookAttempt {
            reaction_secs: (self.clock_secs - started_at).max(0.0),
        })
    }

    /// Start a bite immediately.
    pub fn force_bite(&mut self) {
        self.started = true;
        self.clock_secs = 0.0;
        self.bite_started_at = Some(0.0);
    }

    /// Override the rolled delay.
    pub fn set_delay(&mut self, delay_secs: f32) {
        self.delay_secs = sanitize_dt(delay_secs);
    }

    pub fn reset(&mut self) {
        *self = Self::new();
    }

    #[must_use]
    pub const fn is_biting(&self) -> bool {
        self.bite_started_at.is_some()
    }

    #[must_use]
    pub const fn is_waiting(&self) -> bool {
        self.started && self.bite_started_at.is_none()
    }

    #[must_use]
    pub const fn delay_secs(&self) -> f32 {
        self.delay_secs
    }

    #[must_use]
    pub const fn elapsed_secs(&self) -> f32 {
        self.elapsed_secs
    }

    #[must_use]
    pub const fn window_secs(&self) -> f32 {
        self.window_secs
    }

    /// Seconds left in the reaction window, zero without a bite.
    #[must_use]
    pub fn bite_time_remaining(&self) -> f32 {
        self.bite_started_at.map_or(0.0, |started_at| {
            (self.window_secs - (self.clock_secs - started_at)).max(0.0)
        })
    }
}
