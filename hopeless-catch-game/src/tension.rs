//! Line tension simulation for the struggle and reel protocols.
//!
//! A hooked fish first struggles: the player must stop reeling until the
//! struggle intensity drains. The reel protocol then plays tug-of-war between
//! reel progress and the fish's periodic pulls. Gauges are clamped after every
//! mutation, and a gauge hitting its ceiling is reported in the same call.

use serde::{Deserialize, Serialize};

use crate::constants::{
    EASE_LINE_INTENSITY, EASE_LINE_STRESS, LINE_STRESS_MAX, MANUAL_REEL_PROGRESS,
    MANUAL_REEL_STRESS, REEL_DECAY_PULLING, REEL_DECAY_RESTING, REEL_FISH_STRENGTH_BASE,
    REEL_FISH_STRENGTH_PER_DIFFICULTY, REEL_PROGRESS_MAX, REEL_PULL_DURATION_BASE,
    REEL_PULL_DURATION_PER_DIFFICULTY, REEL_PULL_INTERVAL_BASE, REEL_SAFE_STRESS_FRACTION,
    REEL_SPEED_BASE, REEL_SPEED_PER_DIFFICULTY, REEL_STRESS_GAIN_AGAINST_PULL,
    REEL_STRESS_GAIN_REELING, REEL_STRESS_RELAX, STRUGGLE_EXIT_STRESS_CAP,
    STRUGGLE_INTENSITY_DECAY, STRUGGLE_INTENSITY_GAIN_REELING, STRUGGLE_INTENSITY_MAX,
    STRUGGLE_PASSIVE_STRESS_HOLD, STRUGGLE_ROLL_MAX, STRUGGLE_ROLL_MIN,
    STRUGGLE_STRESS_DECAY, STRUGGLE_STRESS_GAIN_REELING,
};
use crate::error::{FishingError, TensionProtocol};
use crate::numbers::{clamp_gauge, sanitize_dt, u32_to_f32};
use crate::rng::RandomSource;

/// Per-tick verdict of the tension simulation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TensionSignal {
    ContinueStruggling,
    StartReeling,
    ContinueReeling,
    LineBreak,
    CatchSuccess,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct StruggleState {
    pub intensity: f32,
    pub line_stress: f32,
    /// Intensity rolled at hook time.
    pub resistance: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ReelState {
    pub progress: f32,
    pub line_stress: f32,
    pub fish_pulling: bool,
    pub pull_timer: f32,
    pub pull_remaining: f32,
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
enum Protocol {
    #[default]
    Idle,
    Struggle(StruggleState),
    Reel(ReelState),
}

#[derive(Debug, Clone, Default)]
pub struct TensionSimulator {
    protocol: Protocol,
    difficulty: f32,
    pull_override: Option<bool>,
}

impl TensionSimulator {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Begin the struggle for a fish of `difficulty`.
    pub fn start_struggle(&mut self, difficulty: u8, rng: &mut dyn RandomSource) -> StruggleState {
        self.difficulty = f32::from(difficulty);
        let roll = u32_to_f32(rng.int_inclusive(STRUGGLE_ROLL_MIN, STRUGGLE_ROLL_MAX));
        let intensity = clamp_gauge(self.difficulty * roll, STRUGGLE_INTENSITY_MAX);
        let state = StruggleState {
            intensity,
            line_stress: 0.0,
            resistance: intensity,
        };
        self.protocol = Protocol::Struggle(state);
        state
    }

    /// Advance the struggle by `dt`.
    ///
    /// On [`TensionSignal::StartReeling`] the simulator has already switched
    /// to the reel protocol, carrying over at most 20 stress.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::WrongTensionProtocol`] outside the struggle.
    pub fn update_struggle(&mut self, dt: f32, reeling: bool) -> Result<TensionSignal, FishingError> {
        let Protocol::Struggle(state) = &mut self.protocol else {
            return Err(self.wrong(TensionProtocol::Struggle));
        };
        let dt = sanitize_dt(dt);
        if reeling {
            state.intensity += STRUGGLE_INTENSITY_GAIN_REELING * dt;
            state.line_stress += STRUGGLE_STRESS_GAIN_REELING * dt;
        } else {
            state.intensity -= STRUGGLE_INTENSITY_DECAY * dt;
            state.line_stress -= STRUGGLE_STRESS_DECAY * dt;
        }
        state.intensity = clamp_gauge(state.intensity, STRUGGLE_INTENSITY_MAX);
        state.line_stress = clamp_gauge(state.line_stress, LINE_STRESS_MAX);

        if state.line_stress >= LINE_STRESS_MAX {
            if reeling {
                return Ok(TensionSignal::LineBreak);
            }
            state.line_stress = LINE_STRESS_MAX * STRUGGLE_PASSIVE_STRESS_HOLD;
        }

        if state.intensity <= 0.0 {
            let carried = state.line_stress.min(STRUGGLE_EXIT_STRESS_CAP);
            self.protocol = Protocol::Reel(ReelState {
                progress: 0.0,
                line_stress: carried,
                fish_pulling: false,
                pull_timer: 0.0,
                pull_remaining: 0.0,
            });
            return Ok(TensionSignal::StartReeling);
        }
        Ok(TensionSignal::ContinueStruggling)
    }

    /// Advance the reel tug-of-war by `dt`.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::WrongTensionProtocol`] outside the reel.
    pub fn update_reel(&mut self, dt: f32, reeling: bool) -> Result<TensionSignal, FishingError> {
        let difficulty = self.difficulty;
        let pull_override = self.pull_override;
        let Protocol::Reel(state) = &mut self.protocol else {
            return Err(self.wrong(TensionProtocol::Reel));
        };
        let dt = sanitize_dt(dt);

        match pull_override {
            Some(forced) => state.fish_pulling = forced,
            None => advance_pull_cycle(state, dt, difficulty),
        }
        let pulling = state.fish_pulling;

        if reeling {
            if pulling {
                state.line_stress += REEL_STRESS_GAIN_AGAINST_PULL * dt;
            } else if state.line_stress < LINE_STRESS_MAX * REEL_SAFE_STRESS_FRACTION {
                let speed = REEL_SPEED_BASE - REEL_SPEED_PER_DIFFICULTY * difficulty;
                state.progress += speed * dt;
                state.line_stress += REEL_STRESS_GAIN_REELING * dt;
            }
        } else {
            let strength = REEL_FISH_STRENGTH_BASE + REEL_FISH_STRENGTH_PER_DIFFICULTY * difficulty;
            let decay = if pulling {
                REEL_DECAY_PULLING
            } else {
                REEL_DECAY_RESTING
            };
            state.progress -= strength * decay * dt;
        }
        if !(reeling && pulling) {
            state.line_stress -= REEL_STRESS_RELAX * dt;
        }
        state.line_stress = clamp_gauge(state.line_stress, LINE_STRESS_MAX);
        state.progress = clamp_gauge(state.progress, REEL_PROGRESS_MAX);

        if state.line_stress >= LINE_STRESS_MAX {
            return Ok(TensionSignal::LineBreak);
        }
        if state.progress >= REEL_PROGRESS_MAX {
            return Ok(TensionSignal::CatchSuccess);
        }
        Ok(TensionSignal::ContinueReeling)
    }

    /// Tap-to-reel burst. Returns whether any progress was made.
    pub fn manual_reel(&mut self) -> bool {
        let Protocol::Reel(state) = &mut self.protocol else {
            return false;
        };
        if state.line_stress >= LINE_STRESS_MAX * REEL_SAFE_STRESS_FRACTION {
            return false;
        }
        state.progress = clamp_gauge(state.progress + MANUAL_REEL_PROGRESS, REEL_PROGRESS_MAX);
        state.line_stress = clamp_gauge(state.line_stress + MANUAL_REEL_STRESS, LINE_STRESS_MAX);
        true
    }

    /// Give the fish slack: drops stress and, while struggling, intensity.
    pub fn ease_line(&mut self) -> bool {
        match &mut self.protocol {
            Protocol::Idle => false,
            Protocol::Struggle(state) => {
                state.line_stress = clamp_gauge(state.line_stress - EASE_LINE_STRESS, LINE_STRESS_MAX);
                state.intensity =
                    clamp_gauge(state.intensity - EASE_LINE_INTENSITY, STRUGGLE_INTENSITY_MAX);
                true
            }
            Protocol::Reel(state) => {
                state.line_stress = clamp_gauge(state.line_stress - EASE_LINE_STRESS, LINE_STRESS_MAX);
                true
            }
        }
    }

    /// Pin the fish's pull state, or hand it back to the pull timer with `None`.
    pub fn override_pulling(&mut self, pulling: Option<bool>) {
        self.pull_override = pulling;
        if let (Some(forced), Protocol::Reel(state)) = (pulling, &mut self.protocol) {
            state.fish_pulling = forced;
        }
    }

    /// Set line stress directly (clamped). Used by tutorials and tests.
    pub fn set_line_stress(&mut self, stress: f32) {
        let stress = clamp_gauge(stress, LINE_STRESS_MAX);
        match &mut self.protocol {
            Protocol::Idle => {}
            Protocol::Struggle(state) => state.line_stress = stress,
            Protocol::Reel(state) => state.line_stress = stress,
        }
    }

    /// Set reel progress directly (clamped). No effect outside the reel.
    pub fn set_reel_progress(&mut self, progress: f32) {
        if let Protocol::Reel(state) = &mut self.protocol {
            state.progress = clamp_gauge(progress, REEL_PROGRESS_MAX);
        }
    }

    /// Drop all state. The pull override survives a reset.
    pub fn reset(&mut self) {
        self.protocol = Protocol::Idle;
        self.difficulty = 0.0;
    }

    #[must_use]
    pub const fn protocol(&self) -> TensionProtocol {
        match self.protocol {
            Protocol::Idle => TensionProtocol::Idle,
            Protocol::Struggle(_) => TensionProtocol::Struggle,
            Protocol::Reel(_) => TensionProtocol::Reel,
        }
    }

    #[must_use]
    pub const fn struggle(&self) -> Option<&StruggleState> {
        match &self.protocol {
            Protocol::Struggle(state) => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub const fn reel(&self) -> Option<&ReelState> {
        match &self.protocol {
            Protocol::Reel(state) => Some(state),
            _ => None,
        }
    }

    #[must_use]
    pub const fn line_stress(&self) -> f32 {
        match &self.protocol {
            Protocol::Idle => 0.0,
            Protocol::Struggle(state) => state.line_stress,
            Protocol::Reel(state) => state.line_stress,
        }
    }

    #[must_use]
    pub const fn reel_progress(&self) -> f32 {
        match &self.protocol {
            Protocol::Reel(state) => state.progress,
            _ => 0.0,
        }
    }

    #[must_use]
    pub const fn intensity(&self) -> f32 {
        match &self.protocol {
            Protocol::Struggle(state) => state.intensity,
            _ => 0.0,
        }
    }

    #[must_use]
    pub const fn is_fish_pulling(&self) -> bool {
        match &self.protocol {
            Protocol::Reel(state) => state.fish_pulling,
            _ => false,
        }
    }

    fn wrong(&self, expected: TensionProtocol) -> FishingError {
        FishingError::WrongTensionProtocol {
            expected,
            actual: self.protocol(),
        }
    }
}

fn advance_pull_cycle(state: &mut ReelState, dt: f32, difficulty: f32) {
    state.pull_timer += dt;
    if state.pull_timer > REEL_PULL_INTERVAL_BASE + difficulty {
        state.fish_pulling = true;
        state.pull_timer = 0.0;
        state.pull_remaining =
            REEL_PULL_DURATION_BASE + REEL_PULL_DURATION_PER_DIFFICULTY * difficulty;
    }
    if state.fish_pulling {
        state.pull_remaining -= dt;
        if state.pull_remaining <= 0.0 {
            state.fish_pulling = false;
            state.pull_remaining = 0.0;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    fn struggling(difficulty: u8, draw: f64) -> TensionSimulator {
        let mut sim = TensionSimulator::new();
        sim.start_struggle(difficulty, &mut ScriptedRandom::constant(draw));
        sim
    }

    fn reeling(difficulty: u8) -> TensionSimulator {
        let mut sim = struggling(difficulty, 0.0);
        while sim.update_struggle(1.0, false).unwrap() == TensionSignal::ContinueStruggling {}
        assert_eq!(sim.protocol(), TensionProtocol::Reel);
        sim
    }

    #[test]
    fn struggle_intensity_scales_with_difficulty() {
        let low = struggling(2, 0.0);
        assert!((low.intensity() - 6.0).abs() < f32::EPSILON);
        let high = struggling(4, 0.99);
        assert!((high.intensity() - 32.0).abs() < f32::EPSILON);
        assert_eq!(high.struggle().map(|s| s.resistance), Some(32.0));
    }

    #[test]
    fn reeling_during_struggle_builds_stress_until_break() {
        let mut sim = struggling(5, 0.5);
        let mut signal = TensionSignal::ContinueStruggling;
        for _ in 0..20 {
            signal = sim.update_struggle(1.0, true).unwrap();
            if signal == TensionSignal::LineBreak {
                break;
            }
        }
        assert_eq!(signal, TensionSignal::LineBreak);
        assert!((sim.line_stress() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn passive_stress_is_held_below_the_ceiling() {
        let mut sim = struggling(5, 0.5);
        sim.set_line_stress(100.0);
        let signal = sim.update_struggle(0.0, false).unwrap();
        assert_eq!(signal, TensionSignal::ContinueStruggling);
        assert!((sim.line_stress() - 90.0).abs() < f32::EPSILON);
    }

    #[test]
    fn drained_struggle_hands_over_to_the_reel() {
        let mut sim = struggling(1, 0.0);
        sim.set_line_stress(60.0);
        assert_eq!(sim.update_struggle(1.0, false).unwrap(), TensionSignal::ContinueStruggling);
        assert_eq!(sim.update_struggle(1.0, false).unwrap(), TensionSignal::StartReeling);
        assert!((sim.line_stress() - 20.0).abs() < f32::EPSILON);
        assert!((sim.reel_progress() - 0.0).abs() < f32::EPSILON);
    }

    #[test]
    fn protocols_reject_each_others_updates() {
        let mut sim = struggling(3, 0.0);
        assert_eq!(
            sim.update_reel(0.1, true),
            Err(FishingError::WrongTensionProtocol {
                expected: TensionProtocol::Reel,
                actual: TensionProtocol::Struggle,
            })
        );
        let mut idle = TensionSimulator::new();
        assert!(idle.update_struggle(0.1, false).is_err());
    }

    #[test]
    fn steady_reeling_lands_an_easy_fish() {
        let mut sim = reeling(2);
        sim.override_pulling(Some(false));
        let mut signal = TensionSignal::ContinueReeling;
        for _ in 0..200 {
            signal = sim.update_reel(0.1, true).unwrap();
            if signal != TensionSignal::ContinueReeling {
                break;
            }
        }
        assert_eq!(signal, TensionSignal::CatchSuccess);
        assert!((sim.reel_progress() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn reeling_into_a_pull_snaps_the_line() {
        let mut sim = reeling(3);
        sim.override_pulling(Some(true));
        sim.set_line_stress(95.0);
        assert_eq!(sim.update_reel(1.0, true).unwrap(), TensionSignal::LineBreak);
        assert!((sim.line_stress() - 100.0).abs() < f32::EPSILON);
    }

    #[test]
    fn slack_line_loses_ground_faster_during_pulls() {
        let mut resting = reeling(2);
        resting.override_pulling(Some(false));
        resting.set_reel_progress(50.0);
        resting.update_reel(1.0, false).unwrap();
        assert!((resting.reel_progress() - (50.0 - 11.0 * 0.7)).abs() < 1e-4);

        let mut pulling = reeling(2);
        pulling.override_pulling(Some(true));
        pulling.set_reel_progress(50.0);
        pulling.update_reel(1.0, false).unwrap();
        assert!((pulling.reel_progress() - (50.0 - 11.0 * 1.5)).abs() < 1e-4);
    }

    #[test]
    fn pull_cycle_follows_difficulty() {
        let mut sim = reeling(2);
        for _ in 0..10 {
            sim.update_reel(0.5, false).unwrap();
        }
        assert!(!sim.is_fish_pulling());
        sim.update_reel(0.25, false).unwrap();
        assert!(sim.is_fish_pulling());
        for _ in 0..3 {
            sim.update_reel(0.5, false).unwrap();
        }
        assert!(sim.is_fish_pulling());
        sim.update_reel(0.5, false).unwrap();
        assert!(!sim.is_fish_pulling());
    }

    #[test]
    fn manual_reel_respects_the_safe_zone() {
        let mut sim = reeling(4);
        assert!(sim.manual_reel());
        assert!((sim.reel_progress() - 5.0).abs() < f32::EPSILON);
        sim.set_line_stress(85.0);
        assert!(!sim.manual_reel());
        assert!((sim.reel_progress() - 5.0).abs() < f32::EPSILON);
    }

    #[test]
    fn ease_line_relieves_stress_and_intensity() {
        let mut sim = struggling(5, 0.0);
        sim.set_line_stress(30.0);
        assert!(sim.ease_line());
        assert!((sim.line_stress() - 15.0).abs() < f32::EPSILON);
        assert!((sim.intensity() - 5.0).abs() < f32::EPSILON);
        let mut idle = TensionSimulator::new();
        assert!(!idle.ease_line());
    }

    #[test]
    fn gauges_stay_clamped_under_random_input() {
        let mut sim = struggling(6, 0.3);
        let mut draws = ScriptedRandom::new(vec![0.1, 0.9, 0.4, 0.7, 0.2, 0.95, 0.55]);
        for _ in 0..2_000 {
            let dt = u32_to_f32(draws.int_inclusive(0, 100)) / 100.0;
            let reel = draws.next_f64() > 0.5;
            let signal = match sim.protocol() {
                TensionProtocol::Struggle => sim.update_struggle(dt, reel).unwrap(),
                TensionProtocol::Reel => sim.update_reel(dt, reel).unwrap(),
                TensionProtocol::Idle => break,
            };
            assert!((0.0..=100.0).contains(&sim.line_stress()));
            assert!((0.0..=100.0).contains(&sim.reel_progress()));
            assert!((0.0..=200.0).contains(&sim.intensity()));
            if matches!(signal, TensionSignal::LineBreak | TensionSignal::CatchSuccess) {
                sim.start_struggle(6, &mut draws);
            }
        }
    }
}
