use std::fmt;
use std::str::FromStr;

use hopeless_catch_game::FishingPhase;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;
use serde::{Serialize, Serializer};

/// What an angler can see of the fight on a given frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FightView {
    pub phase: FishingPhase,
    pub line_stress: f32,
    pub reel_progress: f32,
    pub intensity: f32,
    pub fish_pulling: bool,
}

/// Frame inputs chosen by a [`AnglerPolicy`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FightInput {
    pub hold_reel: bool,
    pub tap_reel: bool,
    pub ease_line: bool,
}

/// Policy interface for automated anglers.
pub trait AnglerPolicy {
    /// Name used for logging/debug output.
    fn name(&self) -> &'static str;

    /// Seconds to wait after a bite before striking.
    fn hook_delay_secs(&mut self) -> f32;

    /// Inputs for one frame of a hooked fight.
    fn fight(&mut self, view: &FightView, frame_secs: f32) -> FightInput;
}

/// Built-in angling strategies for automated runs.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum Strategy {
    Patient,
    Aggressive,
    Balanced,
    Tapper,
}

impl Strategy {
    pub const ALL: [Self; 4] = [
        Self::Patient,
        Self::Aggressive,
        Self::Balanced,
        Self::Tapper,
    ];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Patient => "patient",
            Self::Aggressive => "aggressive",
            Self::Balanced => "balanced",
            Self::Tapper => "tapper",
        }
    }

    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Patient => "Patient",
            Self::Aggressive => "Aggressive",
            Self::Balanced => "Balanced",
            Self::Tapper => "Tapper",
        }
    }

    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Patient => "Slow strike, lets every struggle drain, reels into pulls up to 75 stress",
            Self::Aggressive => "Instant strike, holds the reel the whole fight",
            Self::Balanced => "Jittered strike, eases big struggles, reels and taps between pulls",
            Self::Tapper => "Never holds the reel, lands fish with taps between pulls",
        }
    }

    #[must_use]
    pub fn create_policy(self, seed: u64) -> Box<dyn AnglerPolicy + Send> {
        match self {
            Self::Patient => Box::new(PatientPolicy),
            Self::Aggressive => Box::new(AggressivePolicy),
            Self::Balanced => Box::new(BalancedPolicy::new(seed)),
            Self::Tapper => Box::new(TapperPolicy::new(seed)),
        }
    }
}

impl Serialize for Strategy {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.key())
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for Strategy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|strategy| strategy.key().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown strategy: {s}"))
    }
}

struct PatientPolicy;
struct AggressivePolicy;

struct BalancedPolicy {
    rng: ChaCha20Rng,
    ease_cooldown: f32,
}

impl BalancedPolicy {
    const EASE_INTERVAL_SECS: f32 = 0.5;

    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed),
            ease_cooldown: 0.0,
        }
    }
}

struct TapperPolicy {
    rng: ChaCha20Rng,
    tap_cooldown: f32,
}

impl TapperPolicy {
    const TAP_INTERVAL_SECS: f32 = 0.2;

    fn new(seed: u64) -> Self {
        Self {
            rng: ChaCha20Rng::seed_from_u64(seed ^ 0x7A99),
            tap_cooldown: 0.0,
        }
    }
}

impl AnglerPolicy for PatientPolicy {
    fn name(&self) -> &'static str {
        "Patient"
    }

    fn hook_delay_secs(&mut self) -> f32 {
        0.8
    }

    fn fight(&mut self, view: &FightView, _frame_secs: f32) -> FightInput {
        match view.phase {
            FishingPhase::Reeling => FightInput {
                hold_reel: !view.fish_pulling || view.line_stress < 75.0,
                ..FightInput::default()
            },
            _ => FightInput::default(),
        }
    }
}

impl AnglerPolicy for AggressivePolicy {
    fn name(&self) -> &'static str {
        "Aggressive"
    }

    fn hook_delay_secs(&mut self) -> f32 {
        0.0
    }

    fn fight(&mut self, view: &FightView, _frame_secs: f32) -> FightInput {
        FightInput {
            hold_reel: view.phase.is_fighting(),
            ..FightInput::default()
        }
    }
}

impl AnglerPolicy for BalancedPolicy {
    fn name(&self) -> &'static str {
        "Balanced"
    }

    fn hook_delay_secs(&mut self) -> f32 {
        self.rng.gen_range(0.15..0.6)
    }

    fn fight(&mut self, view: &FightView, frame_secs: f32) -> FightInput {
        match view.phase {
            FishingPhase::Struggling => {
                self.ease_cooldown -= frame_secs;
                let ease = view.intensity > 20.0 && self.ease_cooldown <= 0.0;
                if ease {
                    self.ease_cooldown = Self::EASE_INTERVAL_SECS;
                }
                FightInput {
                    ease_line: ease,
                    ..FightInput::default()
                }
            }
            FishingPhase::Reeling => FightInput {
                hold_reel: !view.fish_pulling || view.line_stress < 60.0,
                tap_reel: !view.fish_pulling && view.reel_progress > 90.0,
                ease_line: view.fish_pulling && view.line_stress > 85.0,
            },
            _ => {
                self.ease_cooldown = 0.0;
                FightInput::default()
            }
        }
    }
}

impl AnglerPolicy for TapperPolicy {
    fn name(&self) -> &'static str {
        "Tapper"
    }

    fn hook_delay_secs(&mut self) -> f32 {
        self.rng.gen_range(0.25..0.9)
    }

    fn fight(&mut self, view: &FightView, frame_secs: f32) -> FightInput {
        if view.phase != FishingPhase::Reeling {
            self.tap_cooldown = 0.0;
            return FightInput::default();
        }
        self.tap_cooldown -= frame_secs;
        let tap = !view.fish_pulling && self.tap_cooldown <= 0.0;
        if tap {
            self.tap_cooldown = Self::TAP_INTERVAL_SECS;
        }
        FightInput {
            hold_reel: false,
            tap_reel: tap,
            ease_line: view.fish_pulling && view.line_stress > 50.0,
        }
    }
}
