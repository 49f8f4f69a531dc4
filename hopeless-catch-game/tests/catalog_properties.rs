use std::collections::{HashMap, HashSet};

use hopeless_catch_game::{BaitKind, FishCatalog, FishSpecies, RandomSource, TimeOfDay};
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha20Rng;

#[derive(Debug)]
struct ChaChaSource(ChaCha20Rng);

impl ChaChaSource {
    fn seeded(seed: u64) -> Self {
        Self(ChaCha20Rng::seed_from_u64(seed))
    }
}

impl RandomSource for ChaChaSource {
    fn next_f64(&mut self) -> f64 {
        self.0.gen_range(0.0..1.0)
    }
}

#[test]
fn weighted_selection_tracks_bait_multipliers() {
    const DRAWS: u32 = 10_000;
    let catalog = FishCatalog::embedded();
    let pool: Vec<&FishSpecies> = catalog.all().iter().collect();

    for (idx, bait) in BaitKind::ALL.into_iter().enumerate() {
        let mut rng = ChaChaSource::seeded(0x5EED + idx as u64);
        let mut hits: HashMap<&str, u32> = HashMap::new();
        for _ in 0..DRAWS {
            let fish = FishCatalog::select_weighted(&pool, bait, &mut rng).unwrap();
            *hits.entry(fish.id.as_str()).or_default() += 1;
        }

        let total: f64 = pool.iter().map(|fish| fish.bait_multiplier(bait)).sum();
        for fish in &pool {
            let expected = fish.bait_multiplier(bait) / total;
            let observed = f64::from(hits.get(fish.id.as_str()).copied().unwrap_or(0))
                / f64::from(DRAWS);
            assert!(
                (observed - expected).abs() < 0.05,
                "{bait}: {} drawn {observed:.3}, expected {expected:.3}",
                fish.id
            );
        }
    }
}

#[test]
fn minnows_favour_the_fishman_over_corn() {
    let catalog = FishCatalog::embedded();
    let pool = catalog.available_fish(TimeOfDay::Night, false);
    let count = |bait: BaitKind| {
        let mut rng = ChaChaSource::seeded(11);
        (0..5_000)
            .filter(|_| {
                FishCatalog::select_weighted(&pool, bait, &mut rng)
                    .map(|fish| fish.id == "fishman")
                    .unwrap_or(false)
            })
            .count()
    };
    assert!(count(BaitKind::Minnows) > count(BaitKind::Corn) * 5);
}

#[test]
fn peaceful_mode_never_offers_horror_or_night_fish() {
    let catalog = FishCatalog::embedded();
    for time in [TimeOfDay::Day, TimeOfDay::Night] {
        let pool = catalog.available_fish(time, true);
        assert!(!pool.is_empty());
        assert!(pool.iter().all(|fish| !fish.horror), "{time}");
        assert!(pool.iter().all(|fish| !fish.night_only), "{time}");
    }
}

#[test]
fn day_and_night_partition_the_catalog() {
    let catalog = FishCatalog::embedded();
    let day: HashSet<&str> = catalog.day_fish().iter().map(|f| f.id.as_str()).collect();
    let night: HashSet<&str> = catalog.night_fish().iter().map(|f| f.id.as_str()).collect();
    let all: HashSet<&str> = catalog.all().iter().map(|f| f.id.as_str()).collect();

    assert!(day.is_disjoint(&night));
    let union: HashSet<&str> = day.union(&night).copied().collect();
    assert_eq!(union, all);
}

#[test]
fn every_species_is_well_formed() {
    for fish in FishCatalog::embedded().all() {
        assert!((1..=10).contains(&fish.difficulty), "{}", fish.id);
        assert!(!fish.description.is_empty(), "{}", fish.id);
        for bait in BaitKind::ALL {
            assert!(fish.bait_multiplier(bait) > 0.0, "{} / {bait}", fish.id);
        }
        if fish.horror {
            assert!(fish.horror_description.is_some(), "{}", fish.id);
        }
    }
}
