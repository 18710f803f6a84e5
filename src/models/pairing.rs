//! Pairing model: two players drawn against each other for the next round.

use serde::{Deserialize, Serialize};

use super::{PlayerId, Standing};

/// A next-round pairing, with names denormalized for display.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pairing {
    pub id1: PlayerId,
    pub name1: String,
    pub id2: PlayerId,
    pub name2: String,
}

impl Pairing {
    /// Pair two standings rows. `first` takes the `id1`/`name1` seat.
    pub fn new(first: &Standing, second: &Standing) -> Self {
        Self {
            id1: first.id,
            name1: first.name.clone(),
            id2: second.id,
            name2: second.name.clone(),
        }
    }

    pub fn ids(&self) -> [PlayerId; 2] {
        [self.id1, self.id2]
    }
}
