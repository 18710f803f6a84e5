//! # Swiss Tournament
//!
//! Player registry, match results and next-round pairing for a Swiss-system
//! tournament.
//!
//! ## Architecture
//!
//! - **models**: Players, match records, standings and pairings
//! - **storage**: The store contract plus in-memory and JSONL backends
//! - **pairing**: Next-round pairing from a standings snapshot
//! - **config**: Configuration loading and validation

pub mod config;
pub mod error;
pub mod models;
pub mod pairing;
pub mod storage;

pub use error::{Result, TournamentError};
pub use models::*;
pub use pairing::{pair_next_round, swiss_pairings, PairingPolicy};
pub use storage::{JsonlStore, MemoryStore, StorageConfig, TournamentStore};
