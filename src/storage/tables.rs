//! In-memory table state shared by the store implementations.

use std::collections::HashSet;

use tracing::info;

use super::StorageError;
use crate::error::{Result, TournamentError};
use crate::models::{MatchRecord, Player, PlayerId, Standing};

#[derive(Debug, Default, Clone)]
pub(crate) struct Tables {
    pub players: Vec<Player>,
    pub matches: Vec<MatchRecord>,
}

impl Tables {
    /// Next id in the player sequence. Restarts at 1 once the table is emptied.
    fn next_player_id(&self) -> std::result::Result<PlayerId, StorageError> {
        match self.players.iter().map(|p| p.id).max() {
            None => Ok(PlayerId::new(1)),
            Some(last) => last.next().ok_or_else(|| {
                StorageError::Corrupt(format!("player id sequence exhausted at {}", last))
            }),
        }
    }

    pub fn register_player(&mut self, name: &str) -> Result<&Player> {
        let id = self.next_player_id()?;
        self.players.push(Player::new(id, name));
        info!("Registered player {} as id {}", name, id);
        Ok(&self.players[self.players.len() - 1])
    }

    pub fn standings(&self) -> Vec<Standing> {
        Standing::rank(&self.players)
    }

    /// Reject tables loaded from disk that break the row invariants.
    pub fn check(&self) -> std::result::Result<(), StorageError> {
        let mut seen = HashSet::new();
        for p in &self.players {
            if !seen.insert(p.id) {
                return Err(StorageError::Corrupt(format!("duplicate player id {}", p.id)));
            }
            if p.wins > p.matches {
                return Err(StorageError::Corrupt(format!(
                    "player {} has {} wins in {} matches",
                    p.id, p.wins, p.matches
                )));
            }
        }
        for m in &self.matches {
            if m.winner != m.player1 && m.winner != m.player2 {
                return Err(StorageError::Corrupt(format!(
                    "match {} winner {} did not play",
                    m.id, m.winner
                )));
            }
        }
        Ok(())
    }

    fn position(&self, id: PlayerId) -> Result<usize> {
        self.players
            .iter()
            .position(|p| p.id == id)
            .ok_or(TournamentError::InvalidPlayer(id))
    }

    /// Apply a result to both players and the match log. Validation happens
    /// before any mutation, so an error leaves the tables untouched.
    pub fn report_match(&mut self, winner: PlayerId, loser: PlayerId) -> Result<MatchRecord> {
        if winner == loser {
            return Err(TournamentError::SelfMatch(winner));
        }
        let w = self.position(winner)?;
        let l = self.position(loser)?;

        self.players[w].record_win();
        self.players[l].record_loss();

        let record = MatchRecord::new(self.matches.len(), winner, loser);
        self.matches.push(record.clone());

        info!("Reported match {}: {} beat {}", record.id, winner, loser);
        Ok(record)
    }
}
