//! Standings: players ranked by win record.

use serde::{Deserialize, Serialize};

use super::{Player, PlayerId};

/// One row of the standings table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Standing {
    pub id: PlayerId,
    pub name: String,
    pub wins: u32,
    pub matches: u32,
}

impl Standing {
    pub fn losses(&self) -> u32 {
        self.matches - self.wins
    }

    /// Rank players by wins descending. Equal win counts fall back to
    /// ascending id so the order (and any pairing built on it) is reproducible.
    pub fn rank<'a, I>(players: I) -> Vec<Standing>
    where
        I: IntoIterator<Item = &'a Player>,
    {
        let mut standings: Vec<Standing> = players.into_iter().map(Standing::from).collect();
        standings.sort_by(|a, b| b.wins.cmp(&a.wins).then(a.id.cmp(&b.id)));
        standings
    }
}

impl From<&Player> for Standing {
    fn from(player: &Player) -> Self {
        Self {
            id: player.id,
            name: player.name.clone(),
            wins: player.wins,
            matches: player.matches,
        }
    }
}
