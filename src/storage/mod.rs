//! Player and match persistence.
//!
//! - JSONL files holding the players and matches tables
//! - The [`TournamentStore`] contract the pairing engine consumes
//! - An in-memory store and a file-backed store implementing it

mod jsonl;
mod jsonl_store;
mod memory;
mod tables;

pub use jsonl::*;
pub use jsonl_store::*;
pub use memory::*;

use std::path::PathBuf;
use thiserror::Error;

use crate::error::Result;
use crate::models::{MatchRecord, PlayerId, Standing};

/// Errors that can occur in the underlying persistence layer.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON serialization error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Corrupt store: {0}")]
    Corrupt(String),

    #[error("Store lock poisoned by a panicked writer")]
    LockPoisoned,
}

/// Configuration for storage paths.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub data_dir: PathBuf,
}

impl StorageConfig {
    pub fn new(data_dir: PathBuf) -> Self {
        Self { data_dir }
    }

    pub fn players_path(&self) -> PathBuf {
        self.data_dir.join(Table::Players.filename())
    }

    pub fn matches_path(&self) -> PathBuf {
        self.data_dir.join(Table::Matches.filename())
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self::new(PathBuf::from("./data"))
    }
}

/// Operations the pairing engine needs from a player/match store.
///
/// Every call is synchronous and either completes or fails as a unit.
pub trait TournamentStore {
    /// Delete all match records. Players are untouched.
    fn reset_matches(&self) -> Result<()>;

    /// Delete all player records.
    fn reset_players(&self) -> Result<()>;

    fn count_players(&self) -> Result<usize>;

    /// Register a player with an empty record and return the assigned id.
    fn register_player(&self, name: &str) -> Result<PlayerId>;

    /// All players ordered by wins descending, ties by ascending id.
    fn player_standings(&self) -> Result<Vec<Standing>>;

    /// Record a result: the winner's wins, both players' match counts and
    /// the match log are updated together or not at all.
    fn report_match(&self, winner: PlayerId, loser: PlayerId) -> Result<MatchRecord>;

    /// Every recorded match, oldest first.
    fn match_history(&self) -> Result<Vec<MatchRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_storage_config_paths() {
        let config = StorageConfig::new(PathBuf::from("/data"));

        assert_eq!(config.players_path(), PathBuf::from("/data/players.jsonl"));
        assert_eq!(config.matches_path(), PathBuf::from("/data/matches.jsonl"));
    }

    #[test]
    fn test_storage_config_default() {
        let config = StorageConfig::default();
        assert_eq!(config.data_dir, PathBuf::from("./data"));
    }
}
