//! Fish species catalog and bait-weighted species selection.

use std::collections::{BTreeMap, HashSet};
use std::fmt;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::bait::BaitKind;
use crate::constants::{DIFFICULTY_MAX, DIFFICULTY_MIN, LOG_TARGET_CATALOG};
use crate::error::FishingError;
use crate::rng::RandomSource;

const EMBEDDED_FISH_DATA: &str = include_str!("../data/fish.json");

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Rarity {
    Common,
    Uncommon,
    Rare,
    Legendary,
}

/// Per-species fight style tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TensionPattern {
    Steady,
    Erratic,
    Aggressive,
    Passive,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TimeOfDay {
    #[default]
    Day,
    Night,
}

impl TimeOfDay {
    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Day => "day",
            Self::Night => "night",
        }
    }
}

impl fmt::Display for TimeOfDay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

/// One catchable species. Immutable once loaded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FishSpecies {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    #[serde(default)]
    pub night_only: bool,
    #[serde(default)]
    pub horror: bool,
    pub difficulty: u8,
    pub tension_pattern: TensionPattern,
    #[serde(default)]
    pub bait_multipliers: BTreeMap<BaitKind, f64>,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub horror_description: Option<String>,
}

impl FishSpecies {
    /// Attraction weight for `bait`, 1.0 when the species has no entry.
    #[must_use]
    pub fn bait_multiplier(&self, bait: BaitKind) -> f64 {
        self.bait_multipliers.get(&bait).copied().unwrap_or(1.0)
    }

    /// Text shown in the journal; horror species prefer their unsettling variant.
    #[must_use]
    pub fn display_description(&self) -> &str {
        match (&self.horror_description, self.horror) {
            (Some(text), true) => text,
            _ => &self.description,
        }
    }
}

/// Loaded species list.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FishCatalog {
    #[serde(default)]
    species: Vec<FishSpecies>,
}

impl FishCatalog {
    /// Parse and validate a catalog document.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::InvalidCatalog`] when the JSON is malformed or
    /// the species list breaks a catalog rule.
    pub fn from_json(json: &str) -> Result<Self, FishingError> {
        let catalog: Self = serde_json::from_str(json)
            .map_err(|err| FishingError::InvalidCatalog(err.to_string()))?;
        catalog.validate()?;
        log::debug!(
            target: LOG_TARGET_CATALOG,
            "loaded fish catalog with {} species",
            catalog.species.len()
        );
        Ok(catalog)
    }

    /// Build a catalog from already-constructed species.
    ///
    /// # Errors
    ///
    /// Same rules as [`FishCatalog::from_json`].
    pub fn from_species(species: Vec<FishSpecies>) -> Result<Self, FishingError> {
        let catalog = Self { species };
        catalog.validate()?;
        Ok(catalog)
    }

    /// Built-in nine-species catalog, parsed once.
    #[must_use]
    pub fn embedded() -> &'static Self {
        static CATALOG: OnceLock<FishCatalog> = OnceLock::new();
        CATALOG.get_or_init(|| {
            Self::from_json(EMBEDDED_FISH_DATA).unwrap_or_else(|err| {
                log::error!(target: LOG_TARGET_CATALOG, "embedded fish catalog rejected: {err}");
                Self::default()
            })
        })
    }

    /// Check ids, difficulty bounds and multipliers.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::InvalidCatalog`] describing the first violation.
    pub fn validate(&self) -> Result<(), FishingError> {
        let mut seen = HashSet::new();
        for fish in &self.species {
            if fish.id.trim().is_empty() {
                return Err(FishingError::InvalidCatalog("species id must not be empty".into()));
            }
            if !seen.insert(fish.id.as_str()) {
                return Err(FishingError::InvalidCatalog(format!(
                    "duplicate species id '{}'",
                    fish.id
                )));
            }
            if !(DIFFICULTY_MIN..=DIFFICULTY_MAX).contains(&fish.difficulty) {
                return Err(FishingError::InvalidCatalog(format!(
                    "'{}' difficulty {} outside {DIFFICULTY_MIN}..={DIFFICULTY_MAX}",
                    fish.id, fish.difficulty
                )));
            }
            for (bait, multiplier) in &fish.bait_multipliers {
                if !multiplier.is_finite() || *multiplier <= 0.0 {
                    return Err(FishingError::InvalidCatalog(format!(
                        "'{}' has non-positive {bait} multiplier {multiplier}",
                        fish.id
                    )));
                }
            }
        }
        if !self.species.iter().any(|fish| !fish.night_only) {
            return Err(FishingError::InvalidCatalog(
                "catalog needs at least one day fish".into(),
            ));
        }
        Ok(())
    }

    #[must_use]
    pub fn all(&self) -> &[FishSpecies] {
        &self.species
    }

    #[must_use]
    pub fn by_id(&self, id: &str) -> Option<&FishSpecies> {
        self.species.iter().find(|fish| fish.id == id)
    }

    #[must_use]
    pub fn day_fish(&self) -> Vec<&FishSpecies> {
        self.species.iter().filter(|fish| !fish.night_only).collect()
    }

    #[must_use]
    pub fn night_fish(&self) -> Vec<&FishSpecies> {
        self.species.iter().filter(|fish| fish.night_only).collect()
    }

    /// Species that can bite at `time` under the given mode.
    ///
    /// Peaceful mode keeps to day fish and drops anything tagged horror.
    #[must_use]
    pub fn available_fish(&self, time: TimeOfDay, peaceful: bool) -> Vec<&FishSpecies> {
        self.species
            .iter()
            .filter(|fish| {
                if peaceful {
                    !fish.night_only && !fish.horror
                } else {
                    time == TimeOfDay::Night || !fish.night_only
                }
            })
            .collect()
    }

    /// Bait-weighted draw over `pool`.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::EmptyCandidatePool`] when `pool` is empty.
    pub fn select_weighted<'a>(
        pool: &[&'a FishSpecies],
        bait: BaitKind,
        rng: &mut dyn RandomSource,
    ) -> Result<&'a FishSpecies, FishingError> {
        let Some(first) = pool.first().copied() else {
            log::warn!(target: LOG_TARGET_CATALOG, "weighted selection on empty pool");
            return Err(FishingError::EmptyCandidatePool);
        };
        let total: f64 = pool.iter().map(|fish| fish.bait_multiplier(bait)).sum();
        let roll = rng.next_f64() * total;
        let mut cumulative = 0.0;
        for &fish in pool {
            cumulative += fish.bait_multiplier(bait);
            if cumulative >= roll {
                return Ok(fish);
            }
        }
        Ok(first)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rng::ScriptedRandom;

    fn species(id: &str, night_only: bool, difficulty: u8) -> FishSpecies {
        FishSpecies {
            id: id.to_string(),
            name: id.to_string(),
            rarity: Rarity::Common,
            night_only,
            horror: night_only,
            difficulty,
            tension_pattern: TensionPattern::Steady,
            bait_multipliers: BTreeMap::new(),
            description: String::new(),
            horror_description: None,
        }
    }

    #[test]
    fn embedded_catalog_has_five_day_and_four_night_fish() {
        let catalog = FishCatalog::embedded();
        assert_eq!(catalog.all().len(), 9);
        assert_eq!(catalog.day_fish().len(), 5);
        assert_eq!(catalog.night_fish().len(), 4);
        assert!(catalog.night_fish().iter().all(|fish| fish.horror));
    }

    #[test]
    fn fishman_is_the_legendary_boss() {
        let fishman = FishCatalog::embedded().by_id("fishman").unwrap();
        assert_eq!(fishman.name, "The Fishman");
        assert_eq!(fishman.rarity, Rarity::Legendary);
        assert_eq!(fishman.difficulty, 10);
        assert!((fishman.bait_multiplier(BaitKind::Minnows) - 2.0).abs() < f64::EPSILON);
        assert!(fishman.display_description().contains("always been watching"));
    }

    #[test]
    fn missing_multiplier_defaults_to_one() {
        let fish = species("plain", false, 1);
        assert!((fish.bait_multiplier(BaitKind::Corn) - 1.0).abs() < f64::EPSILON);
        assert_eq!(fish.display_description(), "");
    }

    #[test]
    fn night_play_includes_day_fish() {
        let catalog = FishCatalog::embedded();
        assert_eq!(catalog.available_fish(TimeOfDay::Day, false).len(), 5);
        assert_eq!(catalog.available_fish(TimeOfDay::Night, false).len(), 9);
        assert_eq!(catalog.available_fish(TimeOfDay::Night, true).len(), 5);
    }

    #[test]
    fn validation_rejects_bad_rows() {
        let dup = FishCatalog::from_species(vec![species("a", false, 2), species("a", false, 3)]);
        assert!(matches!(dup, Err(FishingError::InvalidCatalog(msg)) if msg.contains("duplicate")));

        let hard = FishCatalog::from_species(vec![species("a", false, 11)]);
        assert!(matches!(hard, Err(FishingError::InvalidCatalog(_))));

        let night = FishCatalog::from_species(vec![species("a", true, 2)]);
        assert!(matches!(night, Err(FishingError::InvalidCatalog(msg)) if msg.contains("day fish")));

        let mut zero = species("z", false, 2);
        zero.bait_multipliers.insert(BaitKind::Worms, 0.0);
        assert!(FishCatalog::from_species(vec![zero]).is_err());
    }

    #[test]
    fn malformed_json_is_an_invalid_catalog() {
        let err = FishCatalog::from_json("{\"species\": 3}").unwrap_err();
        assert!(matches!(err, FishingError::InvalidCatalog(_)));
    }

    #[test]
    fn selection_walks_cumulative_weights() {
        let mut a = species("a", false, 1);
        a.bait_multipliers.insert(BaitKind::Worms, 1.0);
        let mut b = species("b", false, 1);
        b.bait_multipliers.insert(BaitKind::Worms, 3.0);
        let pool = vec![&a, &b];

        let mut low = ScriptedRandom::constant(0.2);
        let pick = FishCatalog::select_weighted(&pool, BaitKind::Worms, &mut low).unwrap();
        assert_eq!(pick.id, "a");

        let mut high = ScriptedRandom::constant(0.3);
        let pick = FishCatalog::select_weighted(&pool, BaitKind::Worms, &mut high).unwrap();
        assert_eq!(pick.id, "b");
    }

    #[test]
    fn empty_pool_fails_loudly() {
        let mut rng = ScriptedRandom::constant(0.5);
        let result = FishCatalog::select_weighted(&[], BaitKind::Worms, &mut rng);
        assert_eq!(result, Err(FishingError::EmptyCandidatePool));
    }
}
