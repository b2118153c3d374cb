use std::collections::HashMap;

use enum_iterator::Sequence;
use serde::{Deserialize, Serialize};
use time::format_description::well_known::Rfc3339;
use time::OffsetDateTime;

pub type PlayerId = i32;

pub const TOTAL_CARDS: i32 = 60;
pub const MIN_PLAYERS: i32 = 3;
pub const MAX_PLAYERS: i32 = 6;

// Bumping this invalidates every saved snapshot (no migration, see store.rs)
pub const SCHEMA_VERSION: i32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct Player {
    pub id: PlayerId,
    pub name: String,
    // 0-based, fixed for the whole game, defines turn order
    pub seat_index: i32,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, Sequence, PartialEq, Eq, Hash)]
#[serde(rename_all = "camelCase")]
pub enum Phase {
    #[default]
    Setup,
    Bidding,
    Playing,
    Scoring,
    // Reserved in the snapshot schema; no transition assigns it
    RoundComplete,
    GameComplete,
}

#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub enum Edition {
    #[default]
    Deluxe,
}

/// One deal of the game. `None` in `bids`/`tricks` means "not yet entered";
/// the score maps stay `None` until the round is finalized.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RoundEntry {
    // 1-based; also the number of cards dealt and the highest legal bid
    pub round_number: i32,
    pub dealer_seat_index: i32,
    pub bids: HashMap<PlayerId, Option<i32>>,
    pub tricks: HashMap<PlayerId, Option<i32>>,
    pub scores_delta: Option<HashMap<PlayerId, i32>>,
    pub scores_total: Option<HashMap<PlayerId, i32>>,
    pub finalized: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    pub version: i32,
    pub edition: Edition,
    pub num_players: i32,
    pub players: Vec<Player>,
    // Seat that deals round 1; chosen by the caller at game start
    pub first_dealer_seat_index: i32,
    pub max_rounds: i32,
    pub current_round_index: usize,
    pub phase: Phase,
    pub rounds: Vec<RoundEntry>,
    pub created_at_iso: String,
    pub updated_at_iso: String,
}

impl GameState {
    /// The pristine pre-setup state: no players, no rounds.
    pub fn empty() -> Self {
        let now = now_iso();
        Self {
            version: SCHEMA_VERSION,
            edition: Edition::Deluxe,
            num_players: 0,
            players: vec![],
            first_dealer_seat_index: 0,
            max_rounds: 0,
            current_round_index: 0,
            phase: Phase::Setup,
            rounds: vec![],
            created_at_iso: now.clone(),
            updated_at_iso: now,
        }
    }
}

pub fn now_iso() -> String {
    OffsetDateTime::now_utc()
        .format(&Rfc3339)
        .unwrap_or_default()
}
