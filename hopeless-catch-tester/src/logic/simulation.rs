use anyhow::{Context, Result, bail};
use serde::Serialize;

use hopeless_catch_game::constants::{LINE_STRESS_MAX, REEL_PROGRESS_MAX};
use hopeless_catch_game::{
    AnglerSettings, CatalogSource, FishingEngine, FishingEvent, FishingPhase, FishingSession,
    FishingStats,
};

use crate::logic::policy::{AnglerPolicy, FightInput, FightView, Strategy};

const LOG_TARGET: &str = "hopeless_catch_tester::simulation";

/// Configuration for one simulated angler.
#[derive(Debug, Clone)]
pub struct SimulationConfig {
    pub seed: u64,
    pub strategy: Strategy,
    pub attempts: u32,
    pub settings: AnglerSettings,
    pub frame_secs: f32,
    pub attempt_cap_secs: f32,
}

impl SimulationConfig {
    #[must_use]
    pub fn new(strategy: Strategy, seed: u64, settings: AnglerSettings) -> Self {
        Self {
            seed,
            strategy,
            attempts: 25,
            settings,
            frame_secs: 1.0 / 60.0,
            attempt_cap_secs: 300.0,
        }
    }

    #[must_use]
    pub fn with_attempts(mut self, attempts: u32) -> Self {
        self.attempts = attempts;
        self
    }
}

/// Aggregated outcome of a simulated run.
#[derive(Debug, Clone, Serialize)]
pub struct SimulationResult {
    pub strategy: Strategy,
    pub seed: u64,
    pub settings: AnglerSettings,
    pub attempts: u32,
    /// Fights the angler gave up on after the attempt cap.
    pub abandoned: u32,
    pub simulated_secs: f64,
    pub stats: FishingStats,
    pub violations: Vec<String>,
}

impl SimulationResult {
    #[must_use]
    pub fn passed(&self) -> bool {
        self.violations.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum AttemptEnd {
    Resolved,
    Abandoned,
}

/// Play `config.attempts` casts with the configured strategy.
///
/// # Errors
///
/// Fails when the session cannot be created or the engine rejects an action
/// the angler is allowed to take.
pub fn run_simulation<S: CatalogSource>(
    engine: &FishingEngine<S>,
    config: &SimulationConfig,
) -> Result<SimulationResult> {
    let mut session = engine
        .create_observed_session(config.seed, config.settings.clone(), FishingStats::new())
        .with_context(|| format!("creating session in {}", config.settings.room))?;
    let mut policy = config.strategy.create_policy(config.seed);
    let mut violations = Vec::new();
    let mut abandoned = 0_u32;
    let mut simulated_secs = 0.0_f64;

    log::info!(
        target: LOG_TARGET,
        "{} angler fishing {} with seed {}",
        policy.name(),
        config.settings.room,
        config.seed
    );

    for attempt in 0..config.attempts {
        let (end, secs) = play_attempt(&mut session, policy.as_mut(), config, &mut violations)
            .with_context(|| format!("attempt {attempt} with seed {}", config.seed))?;
        simulated_secs += f64::from(secs);
        if end == AttemptEnd::Abandoned {
            log::debug!(target: LOG_TARGET, "attempt {attempt} abandoned after {secs:.1}s");
            abandoned += 1;
        }
        if session.machine().phase() != FishingPhase::Idle {
            violations.push(format!(
                "attempt {attempt} ended in {} instead of idle",
                session.machine().phase()
            ));
            session.reset();
        }
    }

    let stats = session.into_observer();
    check_balance(&stats, abandoned, &mut violations);

    Ok(SimulationResult {
        strategy: config.strategy,
        seed: config.seed,
        settings: config.settings.clone(),
        attempts: config.attempts,
        abandoned,
        simulated_secs,
        stats,
        violations,
    })
}

fn play_attempt(
    session: &mut FishingSession<'_, FishingStats>,
    policy: &mut dyn AnglerPolicy,
    config: &SimulationConfig,
    violations: &mut Vec<String>,
) -> Result<(AttemptEnd, f32)> {
    let frame = config.frame_secs;
    if !session.ready().is_applied() || !session.confirm_cast().is_applied() {
        bail!("could not cast from {}", session.machine().phase());
    }
    session.tick(frame, false);
    let mut elapsed = frame;
    let released = session.release_cast();
    if !released.is_applied() {
        bail!("could not release cast from {}", session.machine().phase());
    }
    if released.events().contains(&FishingEvent::ReturnedToIdle) {
        return Ok((AttemptEnd::Resolved, elapsed));
    }

    let mut strike_at: Option<f32> = None;
    let mut bite_secs = 0.0_f32;
    while elapsed < config.attempt_cap_secs {
        let phase = session.machine().phase();
        if phase == FishingPhase::Biting {
            let delay = *strike_at.get_or_insert_with(|| policy.hook_delay_secs());
            if bite_secs >= delay {
                let outcome = session.hook()?;
                if outcome.events().contains(&FishingEvent::ReturnedToIdle) {
                    return Ok((AttemptEnd::Resolved, elapsed));
                }
            }
            bite_secs += frame;
        }

        let input = if phase.is_fighting() {
            policy.fight(&fight_view(session), frame)
        } else {
            FightInput::default()
        };
        if input.ease_line {
            session.ease_line();
        }
        if input.tap_reel {
            session.manual_reel();
        }

        let events = session.tick(frame, input.hold_reel);
        elapsed += frame;
        check_gauges(session, violations);
        if events.contains(&FishingEvent::ReturnedToIdle) {
            return Ok((AttemptEnd::Resolved, elapsed));
        }
    }

    session.reset();
    Ok((AttemptEnd::Abandoned, elapsed))
}

fn fight_view(session: &FishingSession<'_, FishingStats>) -> FightView {
    let machine = session.machine();
    let tension = machine.tension();
    FightView {
        phase: machine.phase(),
        line_stress: tension.line_stress(),
        reel_progress: tension.reel_progress(),
        intensity: tension.intensity(),
        fish_pulling: tension.is_fish_pulling(),
    }
}

fn check_gauges(session: &FishingSession<'_, FishingStats>, violations: &mut Vec<String>) {
    let tension = session.machine().tension();
    let stress = tension.line_stress();
    let progress = tension.reel_progress();
    if !(0.0..=LINE_STRESS_MAX).contains(&stress) {
        violations.push(format!("line stress {stress} out of range"));
    }
    if !(0.0..=REEL_PROGRESS_MAX).contains(&progress) {
        violations.push(format!("reel progress {progress} out of range"));
    }
}

fn check_balance(stats: &FishingStats, abandoned: u32, violations: &mut Vec<String>) {
    let resolved = stats.catches
        + stats.bites_missed
        + stats.fish_escaped
        + stats.casts_aborted
        + u64::from(abandoned);
    if resolved != stats.casts {
        violations.push(format!(
            "{} casts but {resolved} resolutions (catches {}, missed {}, escaped {}, aborted {}, abandoned {abandoned})",
            stats.casts, stats.catches, stats.bites_missed, stats.fish_escaped, stats.casts_aborted
        ));
    }
    if stats.lines_broken > stats.fish_escaped {
        violations.push(format!(
            "{} broken lines but only {} escapes",
            stats.lines_broken, stats.fish_escaped
        ));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hopeless_catch_game::{BaitKind, EmbeddedCatalog, TimeOfDay};

    fn engine() -> FishingEngine<EmbeddedCatalog> {
        FishingEngine::new(EmbeddedCatalog).unwrap()
    }

    #[test]
    fn every_strategy_finishes_clean_at_the_dock() {
        let engine = engine();
        for strategy in Strategy::ALL {
            let config =
                SimulationConfig::new(strategy, 1_337, AnglerSettings::default()).with_attempts(6);
            let result = run_simulation(&engine, &config).unwrap();
            assert!(result.passed(), "{strategy}: {:?}", result.violations);
            assert_eq!(result.stats.casts, 6);
            assert!(result.simulated_secs > 0.0);
        }
    }

    #[test]
    fn aggressive_angler_snaps_lines() {
        let engine = engine();
        let config = SimulationConfig::new(Strategy::Aggressive, 7, AnglerSettings::default())
            .with_attempts(8);
        let result = run_simulation(&engine, &config).unwrap();
        assert!(result.passed(), "{:?}", result.violations);
        assert_eq!(result.stats.catches, 0);
        assert_eq!(result.stats.lines_broken, result.stats.hooks_set);
    }

    #[test]
    fn patient_angler_lands_dock_fish() {
        let engine = engine();
        let config =
            SimulationConfig::new(Strategy::Patient, 42, AnglerSettings::default()).with_attempts(8);
        let result = run_simulation(&engine, &config).unwrap();
        assert!(result.passed(), "{:?}", result.violations);
        assert_eq!(result.stats.lines_broken, 0);
        assert_eq!(
            result.stats.catches + u64::from(result.abandoned),
            result.stats.hooks_set
        );
        assert!(
            result
                .stats
                .catches_by_species
                .keys()
                .all(|id| id == "sunfish" || id == "bass")
        );
    }

    #[test]
    fn empty_bait_box_aborts_every_cast() {
        let engine = engine();
        let settings = AnglerSettings {
            selected_bait: None,
            time_of_day: TimeOfDay::Night,
            ..AnglerSettings::default()
        };
        let config = SimulationConfig::new(Strategy::Balanced, 3, settings).with_attempts(4);
        let result = run_simulation(&engine, &config).unwrap();
        assert!(result.passed(), "{:?}", result.violations);
        assert_eq!(result.stats.casts_aborted, 4);
        assert!(result.stats.bait_used.get(&BaitKind::Worms).is_none());
    }

    #[test]
    fn unknown_room_is_an_error() {
        let settings = AnglerSettings {
            room: "sunken_chapel".into(),
            ..AnglerSettings::default()
        };
        let config = SimulationConfig::new(Strategy::Patient, 1, settings);
        assert!(run_simulation(&engine(), &config).is_err());
    }
}
