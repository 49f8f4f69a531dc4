//! Phase orchestration for a single fishing line.
//!
//! The machine is tick-driven: the embedding loop calls
//! [`FishingStateMachine::update`] every frame and forwards button presses to
//! the player-action methods. Player actions that make no sense in the current
//! phase come back as [`ActionOutcome::NotApplicable`] so rapid double input
//! is harmless.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::bait::BaitKind;
use crate::bite::{BiteSignal, BiteTimer};
use crate::casting::CastMeter;
use crate::config::FishingConfig;
use crate::constants::{LOG_TARGET_MACHINE, REEL_PROGRESS_MAX};
use crate::error::FishingError;
use crate::events::{EventBuffer, FishingEvent, FishingObserver, HookedFish, NullObserver};
use crate::fish::{FishCatalog, FishSpecies};
use crate::numbers::sanitize_dt;
use crate::rng::FishingRng;
use crate::tension::{TensionSignal, TensionSimulator};
use crate::weather::WeatherModifiers;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FishingPhase {
    #[default]
    Idle,
    Ready,
    Casting,
    Bobbing,
    Biting,
    Struggling,
    Reeling,
    Caught,
    Escaped,
}

impl FishingPhase {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Idle => "idle",
            Self::Ready => "ready",
            Self::Casting => "casting",
            Self::Bobbing => "bobbing",
            Self::Biting => "biting",
            Self::Struggling => "struggling",
            Self::Reeling => "reeling",
            Self::Caught => "caught",
            Self::Escaped => "escaped",
        }
    }

    /// A fish is on the line.
    #[must_use]
    pub const fn is_fighting(self) -> bool {
        matches!(self, Self::Struggling | Self::Reeling)
    }
}

impl fmt::Display for FishingPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// Per-tick inputs owned outside the core.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct FishingContext {
    pub weather: WeatherModifiers,
    /// Reel button held this frame.
    pub reel_held: bool,
}

impl FishingContext {
    #[must_use]
    pub const fn calm(reel_held: bool) -> Self {
        Self {
            weather: WeatherModifiers::calm(),
            reel_held,
        }
    }
}

/// Result of a player action.
#[derive(Debug, Clone, PartialEq)]
pub enum ActionOutcome {
    Applied(EventBuffer),
    NotApplicable {
        operation: &'static str,
        phase: FishingPhase,
    },
}

impl ActionOutcome {
    #[must_use]
    pub const fn is_applied(&self) -> bool {
        matches!(self, Self::Applied(_))
    }

    #[must_use]
    pub fn events(&self) -> &[FishingEvent] {
        match self {
            Self::Applied(events) => events,
            Self::NotApplicable { .. } => &[],
        }
    }
}

#[derive(Debug)]
pub struct FishingStateMachine<O = NullObserver> {
    phase: FishingPhase,
    config: FishingConfig,
    rng: FishingRng,
    bite: BiteTimer,
    tension: TensionSimulator,
    cast: CastMeter,
    bait: Option<BaitKind>,
    current_catch: Option<HookedFish>,
    last_catch: Option<HookedFish>,
    last_cast_power: f32,
    hold_remaining: f32,
    observer: O,
}

impl FishingStateMachine<NullObserver> {
    #[must_use]
    pub fn new(config: FishingConfig, rng: FishingRng) -> Self {
        Self::with_observer(config, rng, NullObserver)
    }
}

impl<O: FishingObserver> FishingStateMachine<O> {
    #[must_use]
    pub fn with_observer(config: FishingConfig, rng: FishingRng, observer: O) -> Self {
        Self {
            phase: FishingPhase::Idle,
            config,
            rng,
            bite: BiteTimer::new(),
            tension: TensionSimulator::new(),
            cast: CastMeter::new(),
            bait: None,
            current_catch: None,
            last_catch: None,
            last_cast_power: 0.0,
            hold_remaining: 0.0,
            observer,
        }
    }

    // Player actions -------------------------------------------------------

    /// Raise the rod.
    pub fn request_ready(&mut self) -> ActionOutcome {
        if self.phase != FishingPhase::Idle {
            return self.not_applicable("request_ready");
        }
        self.transition(FishingPhase::Ready);
        ActionOutcome::Applied(EventBuffer::new())
    }

    /// Start the power meter.
    pub fn confirm_cast(&mut self) -> ActionOutcome {
        if self.phase != FishingPhase::Ready {
            return self.not_applicable("confirm_cast");
        }
        let mut events = EventBuffer::new();
        self.cast.start();
        self.transition(FishingPhase::Casting);
        self.emit(&mut events, FishingEvent::CastStarted);
        ActionOutcome::Applied(events)
    }

    /// Release the cast. The bait read here is fixed for the whole attempt.
    pub fn resolve_cast(&mut self, bait: Option<BaitKind>) -> ActionOutcome {
        if self.phase != FishingPhase::Casting {
            return self.not_applicable("resolve_cast");
        }
        let mut events = EventBuffer::new();
        let Some(bait) = bait else {
            self.emit(&mut events, FishingEvent::CastAborted);
            self.enter_idle(&mut events);
            return ActionOutcome::Applied(events);
        };
        let power = self.cast.power();
        self.last_cast_power = power;
        self.bait = Some(bait);
        self.bite.start(bait, &self.config.bite, self.rng.bite());
        log::debug!(
            target: LOG_TARGET_MACHINE,
            "cast with {bait} at power {power:.2}, bite in {:.2}s",
            self.bite.delay_secs()
        );
        self.transition(FishingPhase::Bobbing);
        self.emit(&mut events, FishingEvent::BaitUsed { bait, power });
        ActionOutcome::Applied(events)
    }

    /// Try to set the hook on an active bite, drawing the species from `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::EmptyCandidatePool`] when called during a bite
    /// with no candidates; the machine state is left untouched.
    pub fn attempt_hook(&mut self, pool: &[&FishSpecies]) -> Result<ActionOutcome, FishingError> {
        if self.phase != FishingPhase::Biting {
            return Ok(self.not_applicable("attempt_hook"));
        }
        if pool.is_empty() {
            log::warn!(target: LOG_TARGET_MACHINE, "hook attempted with no candidate fish");
            return Err(FishingError::EmptyCandidatePool);
        }
        let Some(attempt) = self.bite.attempt_hook() else {
            return Ok(self.not_applicable("attempt_hook"));
        };
        let bait = self.bait.unwrap_or(BaitKind::Worms);
        let hooked = self.rng.hook().next_f64() < bait.hook_chance();
        let mut events = EventBuffer::new();
        self.emit(
            &mut events,
            FishingEvent::HookAttempted {
                reaction_secs: attempt.reaction_secs,
                hooked,
            },
        );

        if !hooked {
            log::debug!(
                target: LOG_TARGET_MACHINE,
                "hook missed after {:.2}s with {bait}",
                attempt.reaction_secs
            );
            self.emit(&mut events, FishingEvent::FishEscaped);
            self.enter_escaped(&mut events);
            return Ok(ActionOutcome::Applied(events));
        }

        let species = FishCatalog::select_weighted(pool, bait, self.rng.selection())?;
        let fish = HookedFish::from(species);
        self.tension.start_struggle(fish.difficulty, self.rng.struggle());
        log::debug!(
            target: LOG_TARGET_MACHINE,
            "hooked {} (difficulty {}) after {:.2}s",
            fish.id,
            fish.difficulty,
            attempt.reaction_secs
        );
        self.current_catch = Some(fish.clone());
        self.transition(FishingPhase::Struggling);
        self.emit(&mut events, FishingEvent::FishHooked(fish));
        Ok(ActionOutcome::Applied(events))
    }

    /// Tap-to-reel while reeling. Landing the fish with a tap resolves the catch at once.
    pub fn manual_reel(&mut self) -> ActionOutcome {
        if self.phase != FishingPhase::Reeling {
            return self.not_applicable("manual_reel");
        }
        let mut events = EventBuffer::new();
        if self.tension.manual_reel() && self.tension.reel_progress() >= REEL_PROGRESS_MAX {
            self.land_catch(&mut events);
        }
        ActionOutcome::Applied(events)
    }

    /// Give the fish slack.
    pub fn ease_line(&mut self) -> ActionOutcome {
        if !self.phase.is_fighting() {
            return self.not_applicable("ease_line");
        }
        self.tension.ease_line();
        ActionOutcome::Applied(EventBuffer::new())
    }

    /// Make a fish bite right now.
    pub fn force_bite(&mut self) -> ActionOutcome {
        if self.phase != FishingPhase::Bobbing {
            return self.not_applicable("force_bite");
        }
        let mut events = EventBuffer::new();
        self.bite.force_bite();
        self.transition(FishingPhase::Biting);
        self.emit(&mut events, FishingEvent::BiteStarted);
        ActionOutcome::Applied(events)
    }

    /// Drop everything and return to Idle without raising events.
    pub fn reset(&mut self) {
        if self.phase != FishingPhase::Idle {
            log::debug!(target: LOG_TARGET_MACHINE, "reset from {}", self.phase);
        }
        self.clear_attempt();
        self.phase = FishingPhase::Idle;
    }

    // Frame update ---------------------------------------------------------

    /// Advance the active phase by `dt` seconds.
    pub fn update(&mut self, dt: f32, ctx: &FishingContext) -> EventBuffer {
        let clean_dt = sanitize_dt(dt);
        if clean_dt.to_bits() != dt.to_bits() && dt != 0.0 {
            log::debug!(target: LOG_TARGET_MACHINE, "ignoring invalid frame delta {dt}");
        }
        let dt = clean_dt;
        let mut events = EventBuffer::new();
        match self.phase {
            FishingPhase::Idle | FishingPhase::Ready => {}
            FishingPhase::Casting => self.cast.update(dt, &self.config.cast),
            FishingPhase::Bobbing | FishingPhase::Biting => {
                match self.bite.tick(dt, &ctx.weather, &self.config.bite) {
                    BiteSignal::Waiting => {}
                    BiteSignal::Bite => {
                        self.transition(FishingPhase::Biting);
                        self.emit(&mut events, FishingEvent::BiteStarted);
                    }
                    BiteSignal::Missed => {
                        self.emit(&mut events, FishingEvent::BiteMissed);
                        self.enter_idle(&mut events);
                    }
                }
            }
            FishingPhase::Struggling => {
                match self.tension.update_struggle(dt, ctx.reel_held) {
                    Ok(TensionSignal::StartReeling) => {
                        self.transition(FishingPhase::Reeling);
                        self.emit(&mut events, FishingEvent::ReelingStarted);
                    }
                    Ok(TensionSignal::LineBreak) => self.snap_line(&mut events),
                    Ok(_) => {}
                    Err(err) => self.desync(&err),
                }
            }
            FishingPhase::Reeling => match self.tension.update_reel(dt, ctx.reel_held) {
                Ok(TensionSignal::CatchSuccess) => self.land_catch(&mut events),
                Ok(TensionSignal::LineBreak) => self.snap_line(&mut events),
                Ok(_) => {}
                Err(err) => self.desync(&err),
            },
            FishingPhase::Caught | FishingPhase::Escaped => {
                self.hold_remaining -= dt;
                if self.hold_remaining <= 0.0 {
                    self.enter_idle(&mut events);
                }
            }
        }
        events
    }

    // Accessors ------------------------------------------------------------

    #[must_use]
    pub const fn phase(&self) -> FishingPhase {
        self.phase
    }

    #[must_use]
    pub const fn bait(&self) -> Option<BaitKind> {
        self.bait
    }

    #[must_use]
    pub const fn current_catch(&self) -> Option<&HookedFish> {
        self.current_catch.as_ref()
    }

    /// Most recently landed fish, kept after the attempt ends.
    #[must_use]
    pub const fn last_catch(&self) -> Option<&HookedFish> {
        self.last_catch.as_ref()
    }

    #[must_use]
    pub const fn last_cast_power(&self) -> f32 {
        self.last_cast_power
    }

    #[must_use]
    pub const fn cast_meter(&self) -> &CastMeter {
        &self.cast
    }

    #[must_use]
    pub const fn bite_timer(&self) -> &BiteTimer {
        &self.bite
    }

    /// Mutable bite timer for tutorials and tests that need an exact delay.
    pub fn bite_timer_mut(&mut self) -> &mut BiteTimer {
        &mut self.bite
    }

    #[must_use]
    pub const fn tension(&self) -> &TensionSimulator {
        &self.tension
    }

    /// Mutable tension simulator for tutorials and tests (pull overrides, gauge setup).
    pub fn tension_mut(&mut self) -> &mut TensionSimulator {
        &mut self.tension
    }

    #[must_use]
    pub const fn config(&self) -> &FishingConfig {
        &self.config
    }

    #[must_use]
    pub const fn observer(&self) -> &O {
        &self.observer
    }

    pub fn observer_mut(&mut self) -> &mut O {
        &mut self.observer
    }

    pub fn into_observer(self) -> O {
        self.observer
    }

    /// Swap the random streams, keeping all other state.
    pub fn reseed(&mut self, rng: FishingRng) {
        self.rng = rng;
    }

    #[must_use]
    pub const fn rng(&self) -> &FishingRng {
        &self.rng
    }

    // Internals ------------------------------------------------------------

    fn land_catch(&mut self, events: &mut EventBuffer) {
        let Some(fish) = self.current_catch.take() else {
            self.desync(&FishingError::UnknownSpecies("<none on line>".into()));
            return;
        };
        log::debug!(target: LOG_TARGET_MACHINE, "landed {}", fish.id);
        self.last_catch = Some(fish.clone());
        self.tension.reset();
        self.bite.reset();
        self.transition(FishingPhase::Caught);
        self.emit(events, FishingEvent::CatchSuccess(fish));
        self.hold_remaining = self.config.post_catch_delay_secs;
        if self.hold_remaining <= 0.0 {
            self.enter_idle(events);
        }
    }

    fn snap_line(&mut self, events: &mut EventBuffer) {
        log::debug!(
            target: LOG_TARGET_MACHINE,
            "line snapped during {} on {:?}",
            self.phase,
            self.current_catch.as_ref().map(|fish| fish.id.as_str())
        );
        self.emit(events, FishingEvent::LineBreak);
        self.emit(events, FishingEvent::FishEscaped);
        self.enter_escaped(events);
    }

    fn enter_escaped(&mut self, events: &mut EventBuffer) {
        let hold = self.config.post_escape_delay_secs;
        if hold <= 0.0 {
            self.enter_idle(events);
            return;
        }
        self.current_catch = None;
        self.tension.reset();
        self.bite.reset();
        self.hold_remaining = hold;
        self.transition(FishingPhase::Escaped);
    }

    fn enter_idle(&mut self, events: &mut EventBuffer) {
        self.clear_attempt();
        self.transition(FishingPhase::Idle);
        self.emit(events, FishingEvent::ReturnedToIdle);
    }

    fn clear_attempt(&mut self) {
        self.current_catch = None;
        self.bait = None;
        self.hold_remaining = 0.0;
        self.bite.reset();
        self.tension.reset();
        self.cast.start();
    }

    fn transition(&mut self, to: FishingPhase) {
        log::debug!(target: LOG_TARGET_MACHINE, "{} -> {to}", self.phase);
        self.phase = to;
    }

    fn emit(&mut self, events: &mut EventBuffer, event: FishingEvent) {
        self.observer.on_event(&event);
        events.push(event);
    }

    fn desync(&mut self, err: &FishingError) {
        log::warn!(
            target: LOG_TARGET_MACHINE,
            "sub-state out of step with phase {}: {err}; resetting",
            self.phase
        );
        self.reset();
    }

    fn not_applicable(&self, operation: &'static str) -> ActionOutcome {
        log::trace!(target: LOG_TARGET_MACHINE, "{operation} ignored in {}", self.phase);
        ActionOutcome::NotApplicable {
            operation,
            phase: self.phase,
        }
    }
}
