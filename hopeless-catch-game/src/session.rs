//! Session wrapper tying a fishing machine to world data and player settings.

use serde::{Deserialize, Serialize};

use crate::bait::BaitKind;
use crate::config::FishingConfig;
use crate::constants::LOG_TARGET_SESSION;
use crate::error::FishingError;
use crate::events::{EventBuffer, FishingObserver, NullObserver};
use crate::fish::{FishCatalog, FishSpecies, TimeOfDay};
use crate::machine::{ActionOutcome, FishingContext, FishingPhase, FishingStateMachine};
use crate::rng::FishingRng;
use crate::rooms::RoomTable;
use crate::weather::WeatherModifiers;

pub const DEFAULT_ROOM: &str = "lake_shallow_dock";

/// Where and how the player is fishing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnglerSettings {
    #[serde(default = "AnglerSettings::default_room")]
    pub room: String,
    #[serde(default)]
    pub time_of_day: TimeOfDay,
    #[serde(default)]
    pub peaceful: bool,
    #[serde(default = "AnglerSettings::default_bait")]
    pub selected_bait: Option<BaitKind>,
    #[serde(default)]
    pub weather: WeatherModifiers,
}

impl AnglerSettings {
    fn default_room() -> String {
        DEFAULT_ROOM.to_string()
    }

    const fn default_bait() -> Option<BaitKind> {
        Some(BaitKind::Worms)
    }
}

impl Default for AnglerSettings {
    fn default() -> Self {
        Self {
            room: Self::default_room(),
            time_of_day: TimeOfDay::Day,
            peaceful: false,
            selected_bait: Self::default_bait(),
            weather: WeatherModifiers::calm(),
        }
    }
}

#[derive(Debug)]
pub struct FishingSession<'w, O = NullObserver> {
    machine: FishingStateMachine<O>,
    catalog: &'w FishCatalog,
    rooms: &'w RoomTable,
    settings: AnglerSettings,
    seed: u64,
}

impl<'w> FishingSession<'w, NullObserver> {
    /// Construct a session with no observer.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] if `settings.room` is not in `rooms`.
    pub fn new(
        catalog: &'w FishCatalog,
        rooms: &'w RoomTable,
        config: FishingConfig,
        settings: AnglerSettings,
        seed: u64,
    ) -> Result<Self, FishingError> {
        Self::with_observer(catalog, rooms, config, settings, seed, NullObserver)
    }
}

impl<'w, O: FishingObserver> FishingSession<'w, O> {
    /// Construct a session whose machine reports to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] if `settings.room` is not in `rooms`.
    pub fn with_observer(
        catalog: &'w FishCatalog,
        rooms: &'w RoomTable,
        config: FishingConfig,
        settings: AnglerSettings,
        seed: u64,
        observer: O,
    ) -> Result<Self, FishingError> {
        if !rooms.contains(&settings.room) {
            return Err(FishingError::UnknownRoom(settings.room));
        }
        let machine =
            FishingStateMachine::with_observer(config, FishingRng::from_user_seed(seed), observer);
        log::debug!(
            target: LOG_TARGET_SESSION,
            "session seed {seed} in {} ({})",
            settings.room,
            settings.time_of_day
        );
        Ok(Self {
            machine,
            catalog,
            rooms,
            settings,
            seed,
        })
    }

    /// Advance one frame with the current weather.
    pub fn tick(&mut self, dt: f32, reel_held: bool) -> EventBuffer {
        let ctx = FishingContext {
            weather: self.settings.weather,
            reel_held,
        };
        self.machine.update(dt, &ctx)
    }

    /// The single "action" button: raise, cast, release, hook or tap-reel
    /// depending on the phase.
    ///
    /// # Errors
    ///
    /// Propagates hook-time pool errors from [`FishingSession::hook`].
    pub fn press_action(&mut self) -> Result<ActionOutcome, FishingError> {
        match self.machine.phase() {
            FishingPhase::Idle => Ok(self.machine.request_ready()),
            FishingPhase::Ready => Ok(self.machine.confirm_cast()),
            FishingPhase::Casting => Ok(self.release_cast()),
            FishingPhase::Biting => self.hook(),
            FishingPhase::Reeling => Ok(self.machine.manual_reel()),
            phase => Ok(ActionOutcome::NotApplicable {
                operation: "press_action",
                phase,
            }),
        }
    }

    pub fn ready(&mut self) -> ActionOutcome {
        self.machine.request_ready()
    }

    pub fn confirm_cast(&mut self) -> ActionOutcome {
        self.machine.confirm_cast()
    }

    /// Release the cast with whatever bait is selected right now.
    pub fn release_cast(&mut self) -> ActionOutcome {
        self.machine.resolve_cast(self.settings.selected_bait)
    }

    /// Set the hook, drawing from the current room's pool.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] or
    /// [`FishingError::EmptyCandidatePool`] when no pool can be built.
    pub fn hook(&mut self) -> Result<ActionOutcome, FishingError> {
        if self.machine.phase() != FishingPhase::Biting {
            return self.machine.attempt_hook(&[]);
        }
        let pool = self.rooms.candidate_pool(
            self.catalog,
            &self.settings.room,
            self.settings.time_of_day,
            self.settings.peaceful,
        )?;
        self.machine.attempt_hook(&pool)
    }

    pub fn manual_reel(&mut self) -> ActionOutcome {
        self.machine.manual_reel()
    }

    pub fn ease_line(&mut self) -> ActionOutcome {
        self.machine.ease_line()
    }

    pub fn force_bite(&mut self) -> ActionOutcome {
        self.machine.force_bite()
    }

    pub fn reset(&mut self) {
        self.machine.reset();
    }

    /// Species that could take the bait here right now.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] if the room was removed from the table.
    pub fn candidate_pool(&self) -> Result<Vec<&'w FishSpecies>, FishingError> {
        self.rooms.candidate_pool(
            self.catalog,
            &self.settings.room,
            self.settings.time_of_day,
            self.settings.peaceful,
        )
    }

    /// Move to another fishing spot. Takes effect for the next hook.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] and keeps the old room.
    pub fn set_room(&mut self, room: &str) -> Result<(), FishingError> {
        if !self.rooms.contains(room) {
            return Err(FishingError::UnknownRoom(room.to_string()));
        }
        room.clone_into(&mut self.settings.room);
        Ok(())
    }

    pub fn set_time_of_day(&mut self, time: TimeOfDay) {
        self.settings.time_of_day = time;
    }

    pub fn set_peaceful(&mut self, peaceful: bool) {
        self.settings.peaceful = peaceful;
    }

    /// Change the selected bait. An attempt already in the water keeps its bait.
    pub fn select_bait(&mut self, bait: Option<BaitKind>) {
        self.settings.selected_bait = bait;
    }

    pub fn set_weather(&mut self, weather: WeatherModifiers) {
        self.settings.weather = weather;
    }

    #[must_use]
    pub const fn settings(&self) -> &AnglerSettings {
        &self.settings
    }

    #[must_use]
    pub const fn seed(&self) -> u64 {
        self.seed
    }

    #[must_use]
    pub const fn catalog(&self) -> &'w FishCatalog {
        self.catalog
    }

    /// Borrow the underlying machine.
    #[must_use]
    pub const fn machine(&self) -> &FishingStateMachine<O> {
        &self.machine
    }

    /// Apply a closure to the mutable machine.
    pub fn with_machine_mut<R>(&mut self, f: impl FnOnce(&mut FishingStateMachine<O>) -> R) -> R {
        f(&mut self.machine)
    }

    /// Deterministically reseed the random streams.
    pub fn reseed(&mut self, seed: u64) {
        self.seed = seed;
        self.machine.reseed(FishingRng::from_user_seed(seed));
    }

    pub fn observer(&self) -> &O {
        self.machine.observer()
    }

    /// Consume the session, returning its observer.
    #[must_use]
    pub fn into_observer(self) -> O {
        self.machine.into_observer()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::FishingEvent;
    use crate::rng::ScriptedRandom;
    use crate::stats::FishingStats;

    fn session(settings: AnglerSettings) -> FishingSession<'static, FishingStats> {
        FishingSession::with_observer(
            FishCatalog::embedded(),
            RoomTable::embedded(),
            FishingConfig::default(),
            settings,
            77,
            FishingStats::new(),
        )
        .unwrap()
    }

    #[test]
    fn unknown_room_is_rejected_up_front() {
        let settings = AnglerSettings {
            room: "attic".into(),
            ..AnglerSettings::default()
        };
        let err = FishingSession::new(
            FishCatalog::embedded(),
            RoomTable::embedded(),
            FishingConfig::default(),
            settings,
            1,
        )
        .unwrap_err();
        assert_eq!(err, FishingError::UnknownRoom("attic".into()));
    }

    #[test]
    fn action_button_walks_the_cast_sequence() {
        let mut session = session(AnglerSettings::default());
        assert!(session.press_action().unwrap().is_applied());
        assert_eq!(session.machine().phase(), FishingPhase::Ready);
        session.press_action().unwrap();
        assert_eq!(session.machine().phase(), FishingPhase::Casting);
        session.tick(0.2, false);
        session.press_action().unwrap();
        assert_eq!(session.machine().phase(), FishingPhase::Bobbing);
        assert_eq!(session.machine().bait(), Some(BaitKind::Worms));
        assert!(!session.press_action().unwrap().is_applied());
        assert_eq!(session.observer().casts, 1);
    }

    #[test]
    fn bait_change_mid_attempt_waits_for_next_cast() {
        let mut session = session(AnglerSettings::default());
        session.ready();
        session.confirm_cast();
        session.release_cast();
        session.select_bait(Some(BaitKind::Cheese));
        assert_eq!(session.machine().bait(), Some(BaitKind::Worms));
        assert_eq!(session.settings().selected_bait, Some(BaitKind::Cheese));
    }

    #[test]
    fn hook_draws_from_the_room() {
        let mut session = session(AnglerSettings {
            room: "mountain_waterfall_cave".into(),
            ..AnglerSettings::default()
        });
        session.with_machine_mut(|machine| {
            machine.reseed(
                FishingRng::from_user_seed(5).with_hook(Box::new(ScriptedRandom::constant(0.0))),
            );
        });
        session.ready();
        session.confirm_cast();
        session.release_cast();
        session.force_bite();
        let outcome = session.hook().unwrap();
        let hooked = outcome.events().iter().find_map(|event| match event {
            FishingEvent::FishHooked(fish) => Some(fish.id.clone()),
            _ => None,
        });
        assert_eq!(hooked.as_deref(), Some("catfish"));
        assert_eq!(session.machine().phase(), FishingPhase::Struggling);
    }

    #[test]
    fn settings_changes_are_validated() {
        let mut session = session(AnglerSettings::default());
        assert!(session.set_room("lake_deep_pool").is_ok());
        assert_eq!(
            session.set_room("nowhere"),
            Err(FishingError::UnknownRoom("nowhere".into()))
        );
        assert_eq!(session.settings().room, "lake_deep_pool");
        session.set_time_of_day(TimeOfDay::Night);
        session.set_peaceful(true);
        let pool = session.candidate_pool().unwrap();
        assert!(pool.iter().all(|fish| !fish.horror));
    }

    #[test]
    fn reseed_updates_seed() {
        let mut session = session(AnglerSettings::default());
        session.reseed(1234);
        assert_eq!(session.seed(), 1234);
        session.reset();
        assert_eq!(session.machine().phase(), FishingPhase::Idle);
    }
}
