//! File-backed store over the JSONL players and matches tables.
//!
//! Every operation runs inside a [`Session`]: the store lock is taken, the
//! tables are loaded, and the lock is released when the session goes out of
//! scope, on success and error paths alike. Multi-table writes are staged to
//! temp files and only swapped in once every file has been written.

use std::sync::{Mutex, MutexGuard};

use tracing::{debug, info};

use super::tables::Tables;
use super::{JsonlReader, JsonlWriter, StorageConfig, StorageError, TournamentStore};
use crate::error::Result;
use crate::models::{MatchRecord, Player, PlayerId, Standing};

/// A [`TournamentStore`] persisted as `players.jsonl` and `matches.jsonl`
/// under the configured data directory.
#[derive(Debug)]
pub struct JsonlStore {
    config: StorageConfig,
    lock: Mutex<()>,
}

impl JsonlStore {
    pub fn new(config: StorageConfig) -> Self {
        Self {
            config,
            lock: Mutex::new(()),
        }
    }

    pub fn config(&self) -> &StorageConfig {
        &self.config
    }

    fn guard(&self) -> Result<MutexGuard<'_, ()>> {
        Ok(self.lock.lock().map_err(|_| StorageError::LockPoisoned)?)
    }

    fn session(&self) -> Result<Session<'_>> {
        let guard = self.guard()?;
        let tables = Tables {
            players: JsonlReader::new(self.config.players_path()).read_all()?,
            matches: JsonlReader::new(self.config.matches_path()).read_all()?,
        };
        tables.check()?;
        debug!(
            "Opened session: {} players, {} matches",
            tables.players.len(),
            tables.matches.len()
        );
        Ok(Session {
            config: &self.config,
            tables,
            _guard: guard,
        })
    }
}

/// Scoped access to the store: holds the lock and a snapshot of both tables.
struct Session<'a> {
    config: &'a StorageConfig,
    tables: Tables,
    _guard: MutexGuard<'a, ()>,
}

impl Session<'_> {
    fn players_writer(&self) -> JsonlWriter<Player> {
        JsonlWriter::new(self.config.players_path())
    }

    fn matches_writer(&self) -> JsonlWriter<MatchRecord> {
        JsonlWriter::new(self.config.matches_path())
    }

    /// Write both tables to staged files, then swap them in. Nothing on disk
    /// changes unless both stages were written.
    fn commit(self) -> Result<()> {
        let matches = self.matches_writer().stage(&self.tables.matches)?;
        let players = self.players_writer().stage(&self.tables.players)?;
        matches.commit()?;
        players.commit()?;
        Ok(())
    }
}

impl TournamentStore for JsonlStore {
    // Resets only hold the lock: a table that fails to load must still be
    // clearable.
    fn reset_matches(&self) -> Result<()> {
        let _guard = self.guard()?;
        JsonlWriter::<MatchRecord>::new(self.config.matches_path()).write_all(&[])?;
        info!("Deleted all matches");
        Ok(())
    }

    fn reset_players(&self) -> Result<()> {
        let _guard = self.guard()?;
        JsonlWriter::<Player>::new(self.config.players_path()).write_all(&[])?;
        info!("Deleted all players");
        Ok(())
    }

    fn count_players(&self) -> Result<usize> {
        Ok(self.session()?.tables.players.len())
    }

    fn register_player(&self, name: &str) -> Result<PlayerId> {
        let mut session = self.session()?;
        let player = session.tables.register_player(name)?.clone();
        session.players_writer().append(&player)?;
        Ok(player.id)
    }

    fn player_standings(&self) -> Result<Vec<Standing>> {
        let session = self.session()?;
        Ok(session.tables.standings())
    }

    fn report_match(&self, winner: PlayerId, loser: PlayerId) -> Result<MatchRecord> {
        let mut session = self.session()?;
        let record = session.tables.report_match(winner, loser)?;
        session.commit()?;
        Ok(record)
    }

    fn match_history(&self) -> Result<Vec<MatchRecord>> {
        let session = self.session()?;
        Ok(session.tables.matches)
    }
}
