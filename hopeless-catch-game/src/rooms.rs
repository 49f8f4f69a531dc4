//! Room membership: which species swim in which fishing spot.

use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::constants::LOG_TARGET_CATALOG;
use crate::error::FishingError;
use crate::fish::{FishCatalog, FishSpecies, TimeOfDay};

const EMBEDDED_ROOM_DATA: &str = include_str!("../data/rooms.json");

/// Room id and the species ids that live there.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomFish {
    pub id: String,
    #[serde(default)]
    pub fish: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RoomTable {
    #[serde(default)]
    rooms: Vec<RoomFish>,
}

impl RoomTable {
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed into a room table.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    #[must_use]
    pub fn embedded() -> &'static Self {
        static TABLE: OnceLock<RoomTable> = OnceLock::new();
        TABLE.get_or_init(|| {
            Self::from_json(EMBEDDED_ROOM_DATA).unwrap_or_else(|err| {
                log::error!(target: LOG_TARGET_CATALOG, "embedded room table rejected: {err}");
                Self::default()
            })
        })
    }

    /// Every room references species that exist in `catalog`.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownSpecies`] for the first dangling id.
    pub fn validate_against(&self, catalog: &FishCatalog) -> Result<(), FishingError> {
        for room in &self.rooms {
            if let Some(missing) = room.fish.iter().find(|id| catalog.by_id(id).is_none()) {
                return Err(FishingError::UnknownSpecies(missing.clone()));
            }
        }
        Ok(())
    }

    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.rooms.iter().map(|room| room.id.as_str())
    }

    #[must_use]
    pub fn contains(&self, room_id: &str) -> bool {
        self.rooms.iter().any(|room| room.id == room_id)
    }

    /// Species in `room_id` that are currently available, in catalog order.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] if the room is not in the table.
    pub fn room_fish<'c>(
        &self,
        catalog: &'c FishCatalog,
        room_id: &str,
        time: TimeOfDay,
        peaceful: bool,
    ) -> Result<Vec<&'c FishSpecies>, FishingError> {
        let room = self
            .rooms
            .iter()
            .find(|room| room.id == room_id)
            .ok_or_else(|| FishingError::UnknownRoom(room_id.to_string()))?;
        Ok(catalog
            .available_fish(time, peaceful)
            .into_iter()
            .filter(|fish| room.fish.iter().any(|id| *id == fish.id))
            .collect())
    }

    /// Hook-time pool for a room. A room with nothing biting right now falls
    /// back to the first available day fish so a hooked line always has a catch.
    /// Peaceful mode keeps horror species out of the fallback too.
    ///
    /// # Errors
    ///
    /// Returns [`FishingError::UnknownRoom`] for an unknown room and
    /// [`FishingError::EmptyCandidatePool`] if no day fish qualifies.
    pub fn candidate_pool<'c>(
        &self,
        catalog: &'c FishCatalog,
        room_id: &str,
        time: TimeOfDay,
        peaceful: bool,
    ) -> Result<Vec<&'c FishSpecies>, FishingError> {
        let pool = self.room_fish(catalog, room_id, time, peaceful)?;
        if !pool.is_empty() {
            return Ok(pool);
        }
        log::debug!(
            target: LOG_TARGET_CATALOG,
            "room {room_id} has no {time} fish, falling back to day fish"
        );
        catalog
            .available_fish(TimeOfDay::Day, peaceful)
            .into_iter()
            .next()
            .map(|fish| vec![fish])
            .ok_or(FishingError::EmptyCandidatePool)
    }
}
