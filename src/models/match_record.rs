//! Match record model: one append-only entry per reported result.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::{MatchId, PlayerId};

/// The outcome of a single match. Never updated once recorded.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MatchRecord {
    /// Unique identifier (derived from log position + participants)
    pub id: MatchId,

    pub player1: PlayerId,

    pub player2: PlayerId,

    /// Always equal to `player1` or `player2`
    pub winner: PlayerId,

    /// When this result was reported
    pub recorded_at: DateTime<Utc>,
}

impl MatchRecord {
    /// Build the record for a reported result. `sequence` is the record's
    /// position in the match log and keeps repeat pairings distinct.
    pub fn new(sequence: usize, winner: PlayerId, loser: PlayerId) -> Self {
        let sequence = sequence.to_string();
        let id = MatchId::generate(&[
            sequence.as_str(),
            &winner.to_string(),
            &loser.to_string(),
        ]);

        Self {
            id,
            player1: winner,
            player2: loser,
            winner,
            recorded_at: Utc::now(),
        }
    }

    pub fn loser(&self) -> PlayerId {
        if self.winner == self.player1 {
            self.player2
        } else {
            self.player1
        }
    }

    /// Whether this match was played between `a` and `b`, in either seat.
    pub fn is_between(&self, a: PlayerId, b: PlayerId) -> bool {
        (self.player1 == a && self.player2 == b) || (self.player1 == b && self.player2 == a)
    }
}
