use crate::config::CastConfig;
use crate::numbers::sanitize_dt;

/// Oscillating power meter shown while the player lines up a cast.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CastMeter {
    power: f32,
    rising: bool,
}

impl Default for CastMeter {
    fn default() -> Self {
        Self::new()
    }
}

impl CastMeter {
    #[must_use]
    pub const fn new() -> Self {
        Self {
            power: 0.0,
            rising: true,
        }
    }

    pub fn start(&mut self) {
        *self = Self::new();
    }

    /// Sweep the meter, bouncing between empty and full.
    pub fn update(&mut self, dt: f32, cfg: &CastConfig) {
        let step = sanitize_dt(dt) * cfg.power_rate;
        if self.rising {
            self.power += step;
            if self.power >= 1.0 {
                self.power = 1.0;
                self.rising = false;
            }
        } else {
            self.power -= step;
            if self.power <= 0.0 {
                self.power = 0.0;
                self.rising = true;
            }
        }
    }

    /// Current power in `[0, 1]`.
    #[must_use]
    pub const fn power(&self) -> f32 {
        self.power
    }

    /// Distance the bobber would travel at the current power.
    #[must_use]
    pub fn distance(&self, cfg: &CastConfig) -> f32 {
        self.power * cfg.max_distance
    }
}
