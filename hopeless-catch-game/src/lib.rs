//! Hopeless Catch Fishing Engine
//!
//! Platform-agnostic fishing core for the Hopeless Catch horror fishing game:
//! bite timing, hook-set resolution, struggle and reel tension, and
//! bait-weighted fish selection. Rendering, audio and persistence live outside
//! this crate and talk to it through [`FishingObserver`] events and the
//! per-tick [`FishingContext`].

pub mod bait;
pub mod bite;
pub mod casting;
pub mod config;
pub mod constants;
pub mod error;
pub mod events;
pub mod fish;
pub mod machine;
pub mod numbers;
pub mod rng;
pub mod rooms;
pub mod session;
pub mod stats;
pub mod tension;
pub mod weather;

// Re-export commonly used types
pub use bait::{BaitCatalog, BaitInfo, BaitKind};
pub use bite::{BiteSignal, BiteTimer, HookAttempt};
pub use casting::CastMeter;
pub use config::{BiteConfig, CastConfig, FishingConfig, FishingConfigError};
pub use error::{FishingError, TensionProtocol};
pub use events::{EventBuffer, FishingEvent, FishingObserver, HookedFish, NullObserver};
pub use fish::{FishCatalog, FishSpecies, Rarity, TensionPattern, TimeOfDay};
pub use machine::{ActionOutcome, FishingContext, FishingPhase, FishingStateMachine};
pub use rng::{CountingRng, FishingRng, RandomSource, ScriptedRandom};
pub use rooms::{RoomFish, RoomTable};
pub use session::{AnglerSettings, DEFAULT_ROOM, FishingSession};
pub use stats::FishingStats;
pub use tension::{ReelState, StruggleState, TensionSignal, TensionSimulator};
pub use weather::WeatherModifiers;

use thiserror::Error;

/// Trait for abstracting catalog loading.
/// Platform-specific implementations should provide this.
pub trait CatalogSource {
    type Error: std::error::Error + Send + Sync + 'static;

    /// Load the fish species catalog.
    ///
    /// # Errors
    ///
    /// Returns an error if the catalog cannot be loaded.
    fn load_fish_catalog(&self) -> Result<FishCatalog, Self::Error>;

    /// Load the room membership table.
    ///
    /// # Errors
    ///
    /// Returns an error if the table cannot be loaded.
    fn load_room_table(&self) -> Result<RoomTable, Self::Error>;

    /// Load fishing tunables. Defaults when the platform has nothing to say.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration exists but cannot be loaded.
    fn load_config(&self) -> Result<FishingConfig, Self::Error> {
        Ok(FishingConfig::default())
    }
}

/// Catalog source backed by the data compiled into this crate.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmbeddedCatalog;

impl CatalogSource for EmbeddedCatalog {
    type Error = FishingError;

    fn load_fish_catalog(&self) -> Result<FishCatalog, Self::Error> {
        let catalog = FishCatalog::embedded();
        catalog.validate()?;
        Ok(catalog.clone())
    }

    fn load_room_table(&self) -> Result<RoomTable, Self::Error> {
        Ok(RoomTable::embedded().clone())
    }
}

#[derive(Debug, Error)]
pub enum EngineError<E>
where
    E: std::error::Error + Send + Sync + 'static,
{
    #[error("catalog source failed: {0}")]
    Source(#[source] E),
    #[error("fishing data rejected: {0}")]
    Data(#[from] FishingError),
    #[error("fishing config rejected: {0}")]
    Config(#[from] FishingConfigError),
}

/// Main engine holding loaded world data and spawning fishing sessions.
pub struct FishingEngine<S>
where
    S: CatalogSource,
{
    source: S,
    catalog: FishCatalog,
    rooms: RoomTable,
    config: FishingConfig,
}

impl<S> FishingEngine<S>
where
    S: CatalogSource,
{
    /// Load and cross-validate everything `source` provides.
    ///
    /// # Errors
    ///
    /// Returns an error if loading fails, the config is out of bounds, or a
    /// room references a species missing from the catalog.
    pub fn new(source: S) -> Result<Self, EngineError<S::Error>> {
        let (catalog, rooms, config) = Self::load_all(&source)?;
        Ok(Self {
            source,
            catalog,
            rooms,
            config,
        })
    }

    fn load_all(
        source: &S,
    ) -> Result<(FishCatalog, RoomTable, FishingConfig), EngineError<S::Error>> {
        let catalog = source.load_fish_catalog().map_err(EngineError::Source)?;
        let rooms = source.load_room_table().map_err(EngineError::Source)?;
        let config = source.load_config().map_err(EngineError::Source)?;
        catalog.validate()?;
        rooms.validate_against(&catalog)?;
        config.validate()?;
        Ok((catalog, rooms, config))
    }

    /// Re-read the source, keeping the old data if anything fails.
    ///
    /// # Errors
    ///
    /// Same conditions as [`FishingEngine::new`].
    pub fn reload(&mut self) -> Result<(), EngineError<S::Error>> {
        let (catalog, rooms, config) = Self::load_all(&self.source)?;
        self.catalog = catalog;
        self.rooms = rooms;
        self.config = config;
        Ok(())
    }

    /// Start a fishing session with no observer.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] for an unknown starting room.
    pub fn create_session(
        &self,
        seed: u64,
        settings: AnglerSettings,
    ) -> Result<FishingSession<'_>, FishingError> {
        FishingSession::new(&self.catalog, &self.rooms, self.config.clone(), settings, seed)
    }

    /// Start a fishing session reporting to `observer`.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] for an unknown starting room.
    pub fn create_observed_session<O: FishingObserver>(
        &self,
        seed: u64,
        settings: AnglerSettings,
        observer: O,
    ) -> Result<FishingSession<'_, O>, FishingError> {
        FishingSession::with_observer(
            &self.catalog,
            &self.rooms,
            self.config.clone(),
            settings,
            seed,
            observer,
        )
    }

    #[must_use]
    pub const fn catalog(&self) -> &FishCatalog {
        &self.catalog
    }

    #[must_use]
    pub const fn rooms(&self) -> &RoomTable {
        &self.rooms
    }

    #[must_use]
    pub const fn config(&self) -> &FishingConfig {
        &self.config
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::convert::Infallible;

    struct FixtureSource {
        config: &'static str,
    }

    impl CatalogSource for FixtureSource {
        type Error = Infallible;

        fn load_fish_catalog(&self) -> Result<FishCatalog, Self::Error> {
            Ok(FishCatalog::embedded().clone())
        }

        fn load_room_table(&self) -> Result<RoomTable, Self::Error> {
            Ok(RoomTable::from_json(
                r#"{"rooms":[{"id":"test_pond","fish":["sunfish","catfish"]}]}"#,
            )
            .unwrap())
        }

        fn load_config(&self) -> Result<FishingConfig, Self::Error> {
            Ok(serde_json::from_str(self.config).unwrap())
        }
    }

    #[test]
    fn embedded_source_builds_sessions() {
        let engine = FishingEngine::new(EmbeddedCatalog).unwrap();
        assert_eq!(engine.catalog().all().len(), 9);
        let mut session = engine.create_session(42, AnglerSettings::default()).unwrap();
        session.press_action().unwrap();
        assert_eq!(session.machine().phase(), FishingPhase::Ready);
    }

    #[test]
    fn fixture_source_supplies_rooms_and_config() {
        let engine = FishingEngine::new(FixtureSource {
            config: r#"{"post_catch_delay_secs":0.0}"#,
        })
        .unwrap();
        assert!(engine.config().post_catch_delay_secs.abs() < f32::EPSILON);
        let settings = AnglerSettings {
            room: "test_pond".into(),
            ..AnglerSettings::default()
        };
        let session = engine
            .create_observed_session(3, settings, FishingStats::new())
            .unwrap();
        let ids: Vec<&str> = session
            .candidate_pool()
            .unwrap()
            .iter()
            .map(|fish| fish.id.as_str())
            .collect();
        assert_eq!(ids, vec!["sunfish", "catfish"]);
        assert!(engine.create_session(3, AnglerSettings::default()).is_err());
    }

    #[test]
    fn invalid_config_is_rejected_at_load() {
        let err = FishingEngine::new(FixtureSource {
            config: r#"{"bite":{"window_secs":99.0}}"#,
        })
        .err()
        .unwrap();
        assert!(matches!(err, EngineError::Config(_)));
    }

    #[test]
    fn reload_keeps_engine_usable() {
        let mut engine = FishingEngine::new(EmbeddedCatalog).unwrap();
        engine.reload().unwrap();
        assert!(engine.rooms().contains(DEFAULT_ROOM));
    }
}
