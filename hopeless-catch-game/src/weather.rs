use serde::{Deserialize, Serialize};

use crate::config::BiteConfig;

/// Weather as the fishing core sees it, sampled every tick.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct WeatherModifiers {
    #[serde(default)]
    pub is_raining: bool,
    #[serde(default)]
    pub wind_speed: f32,
}

impl WeatherModifiers {
    #[must_use]
    pub const fn calm() -> Self {
        Self {
            is_raining: false,
            wind_speed: 0.0,
        }
    }

    #[must_use]
    pub const fn rain() -> Self {
        Self {
            is_raining: true,
            wind_speed: 0.0,
        }
    }

    #[must_use]
    pub const fn windy(wind_speed: f32) -> Self {
        Self {
            is_raining: false,
            wind_speed,
        }
    }

    /// Factor applied to the bite delay. Rain wins over wind.
    #[must_use]
    pub fn bite_multiplier(&self, cfg: &BiteConfig) -> f32 {
        if self.is_raining {
            cfg.rain_multiplier
        } else if self.wind_speed > cfg.wind_threshold {
            cfg.wind_multiplier
        } else {
            1.0
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rain_shortens_and_wind_lengthens() {
        let cfg = BiteConfig::default();
        assert!((WeatherModifiers::calm().bite_multiplier(&cfg) - 1.0).abs() < f32::EPSILON);
        assert!((WeatherModifiers::rain().bite_multiplier(&cfg) - 0.7).abs() < f32::EPSILON);
        assert!((WeatherModifiers::windy(20.0).bite_multiplier(&cfg) - 1.3).abs() < f32::EPSILON);
        assert!((WeatherModifiers::windy(15.0).bite_multiplier(&cfg) - 1.0).abs() < f32::EPSILON);
    }

    #[test]
    fn rain_takes_precedence_over_wind() {
        let storm = WeatherModifiers {
            is_raining: true,
            wind_speed: 40.0,
        };
        assert!((storm.bite_multiplier(&BiteConfig::default()) - 0.7).abs() < f32::EPSILON);
    }
}
