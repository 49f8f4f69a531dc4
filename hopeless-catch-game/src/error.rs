//! Error taxonomy for contract violations in the fishing core.
//!
//! Gameplay outcomes (missed bites, escapes, snapped lines) are never errors;
//! they travel through [`crate::events::FishingEvent`]. The variants here mark
//! data or caller bugs that should fail loudly.

use thiserror::Error;

/// Which half of the tension simulation a call expected to be active.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TensionProtocol {
    Idle,
    Struggle,
    Reel,
}

/// Errors raised by catalog loading, candidate selection and sub-state misuse.
#[derive(Debug, Error, PartialEq)]
pub enum FishingError {
    #[error("cannot select a fish from an empty candidate pool")]
    EmptyCandidatePool,
    #[error("fish catalog invalid: {0}")]
    InvalidCatalog(String),
    #[error("unknown bait '{0}'")]
    UnknownBait(String),
    #[error("unknown room '{0}'")]
    UnknownRoom(String),
    #[error("unknown fish species '{0}'")]
    UnknownSpecies(String),
    #[error("tension simulator expected the {expected:?} protocol but is in {actual:?}")]
    WrongTensionProtocol {
        expected: TensionProtocol,
        actual: TensionProtocol,
    },
}
