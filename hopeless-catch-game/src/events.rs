//! Discrete notifications raised by the fishing state machine.
//!
//! Presentation, audio and statistics subscribe through [`FishingObserver`].
//! Observers receive events synchronously and only get a shared reference, so
//! they cannot reach back into the machine mid-update.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::bait::BaitKind;
use crate::fish::{FishSpecies, Rarity};

/// Snapshot of the species on the line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HookedFish {
    pub id: String,
    pub name: String,
    pub rarity: Rarity,
    pub difficulty: u8,
    pub horror: bool,
}

impl From<&FishSpecies> for HookedFish {
    fn from(species: &FishSpecies) -> Self {
        Self {
            id: species.id.clone(),
            name: species.name.clone(),
            rarity: species.rarity,
            difficulty: species.difficulty,
            horror: species.horror,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum FishingEvent {
    CastStarted,
    BaitUsed { bait: BaitKind, power: f32 },
    CastAborted,
    BiteStarted,
    BiteMissed,
    HookAttempted { reaction_secs: f32, hooked: bool },
    FishHooked(HookedFish),
    ReelingStarted,
    LineBreak,
    FishEscaped,
    CatchSuccess(HookedFish),
    ReturnedToIdle,
}

impl FishingEvent {
    /// Short machine-readable label.
    #[must_use]
    pub const fn key(&self) -> &'static str {
        match self {
            Self::CastStarted => "cast_started",
            Self::BaitUsed { .. } => "bait_used",
            Self::CastAborted => "cast_aborted",
            Self::BiteStarted => "bite_started",
            Self::BiteMissed => "bite_missed",
            Self::HookAttempted { .. } => "hook_attempted",
            Self::FishHooked(_) => "fish_hooked",
            Self::ReelingStarted => "reeling_started",
            Self::LineBreak => "line_break",
            Self::FishEscaped => "fish_escaped",
            Self::CatchSuccess(_) => "catch_success",
            Self::ReturnedToIdle => "returned_to_idle",
        }
    }
}

/// Events raised by one machine call.
pub type EventBuffer = SmallVec<[FishingEvent; 4]>;

/// Subscriber for fishing events.
pub trait FishingObserver {
    fn on_event(&mut self, _event: &FishingEvent) {}
}

/// Observer that ignores everything.
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl FishingObserver for NullObserver {}

impl FishingObserver for Vec<FishingEvent> {
    fn on_event(&mut self, event: &FishingEvent) {
        self.push(event.clone());
    }
}

impl<O: FishingObserver + ?Sized> FishingObserver for &mut O {
    fn on_event(&mut self, event: &FishingEvent) {
        (**self).on_event(event);
    }
}

impl<A: FishingObserver, B: FishingObserver> FishingObserver for (A, B) {
    fn on_event(&mut self, event: &FishingEvent) {
        self.0.on_event(event);
        self.1.on_event(event);
    }
}
