use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::FishingError;

/// Bait the player can put on the hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BaitKind {
    Worms,
    Minnows,
    Cheese,
    Corn,
}

impl BaitKind {
    pub const ALL: [Self; 4] = [Self::Worms, Self::Minnows, Self::Cheese, Self::Corn];

    #[must_use]
    pub const fn key(self) -> &'static str {
        match self {
            Self::Worms => "worms",
            Self::Minnows => "minnows",
            Self::Cheese => "cheese",
            Self::Corn => "corn",
        }
    }

    /// Scale applied to the rolled bite delay. Lower bites sooner.
    #[must_use]
    pub const fn delay_multiplier(self) -> f32 {
        match self {
            Self::Minnows => 0.6,
            Self::Worms => 1.0,
            Self::Cheese => 1.2,
            Self::Corn => 1.1,
        }
    }

    /// Probability that a hook-set attempt on an active bite succeeds.
    #[must_use]
    pub const fn hook_chance(self) -> f64 {
        match self {
            Self::Minnows => 0.9,
            Self::Worms => 0.75,
            Self::Cheese => 0.6,
            Self::Corn => 0.5,
        }
    }
}

impl fmt::Display for BaitKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for BaitKind {
    type Err = FishingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let trimmed = s.trim();
        Self::ALL
            .into_iter()
            .find(|kind| kind.key().eq_ignore_ascii_case(trimmed))
            .ok_or_else(|| FishingError::UnknownBait(trimmed.to_string()))
    }
}

/// Display data for one bait kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct BaitInfo {
    pub kind: BaitKind,
    pub display_name: &'static str,
    pub description: &'static str,
}

const BAIT_TABLE: [BaitInfo; 4] = [
    BaitInfo {
        kind: BaitKind::Worms,
        display_name: "Worms",
        description: "Classic fishing bait.",
    },
    BaitInfo {
        kind: BaitKind::Minnows,
        display_name: "Minnows",
        description: "Live bait for bigger catches.",
    },
    BaitInfo {
        kind: BaitKind::Cheese,
        display_name: "Cheese",
        description: "Attracts curious fish.",
    },
    BaitInfo {
        kind: BaitKind::Corn,
        display_name: "Corn",
        description: "Sweet and effective.",
    },
];

/// Read-only bait lookup.
#[derive(Debug, Clone, Copy, Default)]
pub struct BaitCatalog;

impl BaitCatalog {
    #[must_use]
    pub const fn all() -> &'static [BaitInfo] {
        &BAIT_TABLE
    }

    #[must_use]
    pub const fn by_kind(kind: BaitKind) -> &'static BaitInfo {
        match kind {
            BaitKind::Worms => &BAIT_TABLE[0],
            BaitKind::Minnows => &BAIT_TABLE[1],
            BaitKind::Cheese => &BAIT_TABLE[2],
            BaitKind::Corn => &BAIT_TABLE[3],
        }
    }
}
