//! Errors surfaced by tournament operations.

use thiserror::Error;

use crate::models::PlayerId;
use crate::storage::StorageError;

/// Errors returned by store and pairing operations.
#[derive(Debug, Error)]
pub enum TournamentError {
    #[error("Store error: {0}")]
    Store(#[from] StorageError),

    #[error("No registered player with id {0}")]
    InvalidPlayer(PlayerId),

    #[error("Player {0} cannot be reported as both winner and loser")]
    SelfMatch(PlayerId),

    #[error("Cannot pair an odd number of players ({0})")]
    OddPlayerCount(usize),

    #[error("Every pairing of the current standings contains a rematch")]
    NoRematchFreePairing,
}

pub type Result<T> = std::result::Result<T, TournamentError>;
