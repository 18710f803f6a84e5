//! Swiss-system round pairing.
//!
//! Players are paired with a neighbour in the standings, so opponents have an
//! equal or nearly equal win record:
//! - [`swiss_pairings`]: greedy adjacent walk, blind to match history
//! - [`rematch_free_pairings`]: same order, but skips opponents already faced
//! - [`pair_next_round`]: runs either one against a store snapshot

mod matching;

use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::{Result, TournamentError};
use crate::models::{MatchRecord, Pairing, PlayerId, Standing};
use crate::storage::TournamentStore;

/// How the next round is drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PairingPolicy {
    /// Pair standings positions (0,1), (2,3), ... regardless of history.
    #[default]
    Adjacent,
    /// Pair as close in the standings as possible without repeating a match.
    AvoidRematches,
}

fn ensure_even(standings: &[Standing]) -> Result<()> {
    if standings.len() % 2 != 0 {
        return Err(TournamentError::OddPlayerCount(standings.len()));
    }
    Ok(())
}

/// Pair standings rows two at a time, in order.
///
/// Row `2k` takes the first seat of pairing `k` and row `2k + 1` the second.
pub fn swiss_pairings(standings: &[Standing]) -> Result<Vec<Pairing>> {
    ensure_even(standings)?;

    Ok(standings
        .chunks_exact(2)
        .map(|pair| Pairing::new(&pair[0], &pair[1]))
        .collect())
}

/// Unordered set of player pairs that have already met.
#[derive(Debug, Default)]
pub struct MatchHistory {
    played: HashSet<(PlayerId, PlayerId)>,
}

impl MatchHistory {
    pub fn from_records(records: &[MatchRecord]) -> Self {
        let played = records
            .iter()
            .map(|m| Self::key(m.player1, m.player2))
            .collect();
        Self { played }
    }

    fn key(a: PlayerId, b: PlayerId) -> (PlayerId, PlayerId) {
        if a <= b {
            (a, b)
        } else {
            (b, a)
        }
    }

    pub fn have_played(&self, a: PlayerId, b: PlayerId) -> bool {
        self.played.contains(&Self::key(a, b))
    }
}

/// Pair standings rows so nobody meets an opponent they have already played.
///
/// The highest unpaired row takes the nearest unpaired row below it that is
/// not a rematch, provided everyone left over can still be paired. Whether a
/// rematch-free pairing of the remaining rows exists is decided by a maximum
/// matching, so the draw stays polynomial even when no pairing exists. With no
/// prior meetings in the way this gives the same result as [`swiss_pairings`].
pub fn rematch_free_pairings(
    standings: &[Standing],
    history: &MatchHistory,
) -> Result<Vec<Pairing>> {
    ensure_even(standings)?;

    let n = standings.len();
    let allowed: Vec<Vec<bool>> = (0..n)
        .map(|i| {
            (0..n)
                .map(|j| i != j && !history.have_played(standings[i].id, standings[j].id))
                .collect()
        })
        .collect();

    let mut paired = vec![false; n];
    if !can_complete(&allowed, &paired) {
        return Err(TournamentError::NoRematchFreePairing);
    }

    let mut pairings = Vec::with_capacity(n / 2);
    for i in 0..n {
        if paired[i] {
            continue;
        }
        paired[i] = true;

        let mut partner = None;
        for j in (i + 1)..n {
            if paired[j] || !allowed[i][j] {
                continue;
            }
            paired[j] = true;
            if can_complete(&allowed, &paired) {
                partner = Some(j);
                break;
            }
            paired[j] = false;
        }

        let j = partner.ok_or(TournamentError::NoRematchFreePairing)?;
        pairings.push(Pairing::new(&standings[i], &standings[j]));
    }

    Ok(pairings)
}

/// Whether the rows not yet paired admit a perfect rematch-free pairing.
fn can_complete(allowed: &[Vec<bool>], paired: &[bool]) -> bool {
    let open: Vec<usize> = (0..paired.len()).filter(|&i| !paired[i]).collect();
    if open.is_empty() {
        return true;
    }

    let adj: Vec<Vec<usize>> = open
        .iter()
        .map(|&i| {
            open.iter()
                .enumerate()
                .filter(|&(_, &j)| allowed[i][j])
                .map(|(k, _)| k)
                .collect()
        })
        .collect();

    if adj.iter().any(|edges| edges.is_empty()) {
        return false;
    }
    matching::maximum_matching_size(&adj) * 2 == open.len()
}

/// Draw the next round from the store's current standings.
pub fn pair_next_round<S: TournamentStore + ?Sized>(
    store: &S,
    policy: PairingPolicy,
) -> Result<Vec<Pairing>> {
    let standings = store.player_standings()?;
    debug!("Pairing {} players with {:?}", standings.len(), policy);

    let pairings = match policy {
        PairingPolicy::Adjacent => swiss_pairings(&standings)?,
        PairingPolicy::AvoidRematches => {
            let history = MatchHistory::from_records(&store.match_history()?);
            rematch_free_pairings(&standings, &history)?
        }
    };

    info!("Drew {} pairings for the next round", pairings.len());
    Ok(pairings)
}
