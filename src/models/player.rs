//! Registered player model.

use serde::{Deserialize, Serialize};

use super::PlayerId;

/// A registered player and their running record.
///
/// `matches >= wins` holds for every player the store hands out.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Player {
    /// Store-assigned id
    pub id: PlayerId,

    /// Full name as registered (not unique)
    #[serde(rename = "player_name")]
    pub name: String,

    /// Matches won
    #[serde(default)]
    pub wins: u32,

    /// Matches played
    #[serde(default)]
    pub matches: u32,
}

impl Player {
    /// Create a freshly registered player with an empty record.
    pub fn new(id: PlayerId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
            wins: 0,
            matches: 0,
        }
    }

    pub fn record_win(&mut self) {
        self.wins += 1;
        self.matches += 1;
    }

    pub fn record_loss(&mut self) {
        self.matches += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_player_has_empty_record() {
        let player = Player::new(PlayerId::new(1), "Alice");
        assert_eq!(player.wins, 0);
        assert_eq!(player.matches, 0);
    }

    #[test]
    fn test_record_win_and_loss() {
        let mut player = Player::new(PlayerId::new(1), "Alice");
        player.record_win();
        player.record_loss();
        player.record_win();

        assert_eq!(player.wins, 2);
        assert_eq!(player.matches, 3);
    }

    #[test]
    fn test_player_row_uses_player_name_column() {
        let player = Player::new(PlayerId::new(3), "Bob");
        let json = serde_json::to_string(&player).unwrap();
        assert_eq!(json, r#"{"id":3,"player_name":"Bob","wins":0,"matches":0}"#);
    }

    #[test]
    fn test_player_row_counters_default_to_zero() {
        let player: Player = serde_json::from_str(r#"{"id":4,"player_name":"Cara"}"#).unwrap();
        assert_eq!(player.wins, 0);
        assert_eq!(player.matches, 0);
    }
}
