use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::bait::BaitKind;
use crate::events::{FishingEvent, FishingObserver};
use crate::numbers::{ratio_pct, secs_to_millis, u64_to_f64};

/// Running fishing statistics, fed by machine events.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct FishingStats {
    pub casts: u64,
    pub casts_aborted: u64,
    pub bait_used: BTreeMap<BaitKind, u64>,
    pub bites: u64,
    pub bites_missed: u64,
    pub hook_attempts: u64,
    pub hooks_set: u64,
    pub catches: u64,
    pub catches_by_species: BTreeMap<String, u64>,
    pub horror_catches: u64,
    pub lines_broken: u64,
    pub fish_escaped: u64,
    pub reaction_secs_total: f64,
    /// Quickest strike seen, in whole milliseconds.
    #[serde(default)]
    pub fastest_reaction_ms: Option<u32>,
}

impl FishingStats {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Mean reaction time over all hook attempts.
    #[must_use]
    pub fn mean_reaction_secs(&self) -> f64 {
        if self.hook_attempts == 0 {
            return 0.0;
        }
        self.reaction_secs_total / u64_to_f64(self.hook_attempts)
    }

    /// Landed fish as a percentage of casts that put bait in the water.
    #[must_use]
    pub fn catch_rate_pct(&self) -> f64 {
        ratio_pct(self.catches, self.casts.saturating_sub(self.casts_aborted))
    }

    fn record_reaction_ms(&mut self, ms: u32) {
        self.fastest_reaction_ms = Some(self.fastest_reaction_ms.map_or(ms, |best| best.min(ms)));
    }

    pub fn merge(&mut self, other: &Self) {
        self.casts += other.casts;
        self.casts_aborted += other.casts_aborted;
        for (bait, count) in &other.bait_used {
            *self.bait_used.entry(*bait).or_default() += count;
        }
        self.bites += other.bites;
        self.bites_missed += other.bites_missed;
        self.hook_attempts += other.hook_attempts;
        self.hooks_set += other.hooks_set;
        self.catches += other.catches;
        for (species, count) in &other.catches_by_species {
            *self.catches_by_species.entry(species.clone()).or_default() += count;
        }
        self.horror_catches += other.horror_catches;
        self.lines_broken += other.lines_broken;
        self.fish_escaped += other.fish_escaped;
        self.reaction_secs_total += other.reaction_secs_total;
        if let Some(ms) = other.fastest_reaction_ms {
            self.record_reaction_ms(ms);
        }
    }
}

impl FishingObserver for FishingStats {
    fn on_event(&mut self, event: &FishingEvent) {
        match event {
            FishingEvent::CastStarted => self.casts += 1,
            FishingEvent::CastAborted => self.casts_aborted += 1,
            FishingEvent::BaitUsed { bait, .. } => {
                *self.bait_used.entry(*bait).or_default() += 1;
            }
            FishingEvent::BiteStarted => self.bites += 1,
            FishingEvent::BiteMissed => self.bites_missed += 1,
            FishingEvent::HookAttempted {
                reaction_secs,
                hooked,
            } => {
                self.hook_attempts += 1;
                self.reaction_secs_total += f64::from(*reaction_secs);
                self.record_reaction_ms(secs_to_millis(*reaction_secs));
                if *hooked {
                    self.hooks_set += 1;
                }
            }
            FishingEvent::CatchSuccess(fish) => {
                self.catches += 1;
                *self.catches_by_species.entry(fish.id.clone()).or_default() += 1;
                if fish.horror {
                    self.horror_catches += 1;
                }
            }
            FishingEvent::LineBreak => self.lines_broken += 1,
            FishingEvent::FishEscaped => self.fish_escaped += 1,
            FishingEvent::FishHooked(_)
            | FishingEvent::ReelingStarted
            | FishingEvent::ReturnedToIdle => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::events::HookedFish;
    use crate::fish::Rarity;

    fn eel() -> HookedFish {
        HookedFish {
            id: "whispering_eel".into(),
            name: "Whispering Eel".into(),
            rarity: Rarity::Rare,
            difficulty: 9,
            horror: true,
        }
    }

    #[test]
    fn counts_a_full_attempt() {
        let mut stats = FishingStats::new();
        for event in [
            FishingEvent::CastStarted,
            FishingEvent::BaitUsed {
                bait: BaitKind::Minnows,
                power: 0.4,
            },
            FishingEvent::BiteStarted,
            FishingEvent::HookAttempted {
                reaction_secs: 0.5,
                hooked: true,
            },
            FishingEvent::FishHooked(eel()),
            FishingEvent::ReelingStarted,
            FishingEvent::CatchSuccess(eel()),
            FishingEvent::ReturnedToIdle,
        ] {
            stats.on_event(&event);
        }
        assert_eq!(stats.casts, 1);
        assert_eq!(stats.bait_used.get(&BaitKind::Minnows), Some(&1));
        assert_eq!(stats.catches, 1);
        assert_eq!(stats.horror_catches, 1);
        assert_eq!(stats.catches_by_species.get("whispering_eel"), Some(&1));
        assert!((stats.mean_reaction_secs() - 0.5).abs() < 1e-9);
        assert_eq!(stats.fastest_reaction_ms, Some(500));
        assert!((stats.catch_rate_pct() - 100.0).abs() < 1e-9);
    }

    #[test]
    fn line_break_counts_as_escape_too() {
        let mut stats = FishingStats::new();
        stats.on_event(&FishingEvent::LineBreak);
        stats.on_event(&FishingEvent::FishEscaped);
        assert_eq!(stats.lines_broken, 1);
        assert_eq!(stats.fish_escaped, 1);
        assert!((stats.catch_rate_pct() - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn merge_adds_counters() {
        let mut a = FishingStats::new();
        a.on_event(&FishingEvent::CatchSuccess(eel()));
        let mut b = a.clone();
        b.on_event(&FishingEvent::BiteMissed);
        a.merge(&b);
        assert_eq!(a.catches, 2);
        assert_eq!(a.bites_missed, 1);
        assert_eq!(a.catches_by_species.get("whispering_eel"), Some(&2));
    }

    #[test]
    fn fastest_reaction_survives_merge() {
        let strike = |secs: f32| FishingEvent::HookAttempted {
            reaction_secs: secs,
            hooked: false,
        };
        let mut a = FishingStats::new();
        a.on_event(&strike(0.8));
        a.on_event(&strike(0.25));
        let mut b = FishingStats::new();
        b.on_event(&strike(0.1234));
        assert_eq!(a.fastest_reaction_ms, Some(250));
        a.merge(&b);
        assert_eq!(a.fastest_reaction_ms, Some(123));
        a.merge(&FishingStats::new());
        assert_eq!(a.fastest_reaction_ms, Some(123));
    }
}
