//! In-memory store, used by tests and by callers embedding the engine.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::tables::Tables;
use super::{StorageError, TournamentStore};
use crate::error::{Result, TournamentError};
use crate::models::{MatchRecord, PlayerId, Standing};

/// A [`TournamentStore`] holding both tables behind one mutex.
#[derive(Debug, Default)]
pub struct MemoryStore {
    tables: Mutex<Tables>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn lock(&self) -> Result<MutexGuard<'_, Tables>> {
        self.tables
            .lock()
            .map_err(|_| TournamentError::Store(StorageError::LockPoisoned))
    }
}

impl TournamentStore for MemoryStore {
    fn reset_matches(&self) -> Result<()> {
        let mut tables = self.lock()?;
        tables.matches.clear();
        info!("Deleted all matches");
        Ok(())
    }

    fn reset_players(&self) -> Result<()> {
        let mut tables = self.lock()?;
        tables.players.clear();
        info!("Deleted all players");
        Ok(())
    }

    fn count_players(&self) -> Result<usize> {
        Ok(self.lock()?.players.len())
    }

    fn register_player(&self, name: &str) -> Result<PlayerId> {
        let mut tables = self.lock()?;
        Ok(tables.register_player(name)?.id)
    }

    fn player_standings(&self) -> Result<Vec<Standing>> {
        let standings = self.lock()?.standings();
        debug!("Read standings for {} players", standings.len());
        Ok(standings)
    }

    fn report_match(&self, winner: PlayerId, loser: PlayerId) -> Result<MatchRecord> {
        self.lock()?.report_match(winner, loser)
    }

    fn match_history(&self) -> Result<Vec<MatchRecord>> {
        Ok(self.lock()?.matches.clone())
    }
}
