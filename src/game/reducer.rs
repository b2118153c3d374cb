// The state machine. `reduce` is the sole mutator of GameState: it takes a
// snapshot and an action and returns the next snapshot, leaving the input
// untouched. It never fails; an action that does not apply to the current
// state comes back as the same state with a refreshed timestamp.

use std::collections::HashMap;

use crate::game::model::{now_iso, GameState, Phase, Player, PlayerId, RoundEntry};
use crate::game::rules::{dealer_seat_index, max_rounds, round_scores};
use crate::game::selectors::all_bids_valid;

#[derive(Debug, Clone, PartialEq)]
pub enum Action {
    /// Allocate players and every round up front, then open round 1 bidding.
    /// The caller is responsible for a count in range and non-empty trimmed
    /// names; the payload is applied as given.
    SetupGame {
        names: Vec<String>,
        num_players: i32,
        first_dealer_seat_index: i32,
    },
    /// `None` retracts a previously entered bid.
    SetBid {
        player_id: PlayerId,
        bid: Option<i32>,
    },
    ConfirmBids,
    StartScoring,
    SetTricks {
        player_id: PlayerId,
        tricks: Option<i32>,
    },
    FinalizeRound,
    /// Wholesale replacement from a persisted snapshot.
    LoadGame { state: GameState },
    NewGame,
}

/// Owns the authoritative snapshot for the hosting process. Constructed
/// once; every apply swaps in the snapshot `reduce` produced.
pub struct GameMachine {
    state: GameState,
}

impl GameMachine {
    pub fn new() -> Self {
        Self {
            state: GameState::empty(),
        }
    }

    pub fn state(&self) -> &GameState {
        &self.state
    }

    pub fn apply(&mut self, action: Action) -> &GameState {
        self.state = reduce(&self.state, action);
        &self.state
    }
}

impl Default for GameMachine {
    fn default() -> Self {
        Self::new()
    }
}

pub fn reduce(state: &GameState, action: Action) -> GameState {
    match action {
        Action::SetupGame {
            names,
            num_players,
            first_dealer_seat_index,
        } => create_game_state(names, num_players, first_dealer_seat_index),
        Action::SetBid { player_id, bid } => {
            with_current_round(state, |round| {
                if let Some(slot) = round.bids.get_mut(&player_id) {
                    *slot = bid;
                }
            })
        }
        Action::ConfirmBids => {
            // No-op until every bid is entered and in range; the machine is
            // the last line of defense when no UI gate sits in front of it.
            let mut next = state.clone();
            if all_bids_valid(state) {
                next.phase = Phase::Playing;
            }
            with_updated_at(next)
        }
        Action::StartScoring => {
            let mut next = state.clone();
            next.phase = Phase::Scoring;
            with_updated_at(next)
        }
        Action::SetTricks { player_id, tricks } => {
            with_current_round(state, |round| {
                if let Some(slot) = round.tricks.get_mut(&player_id) {
                    *slot = tricks;
                }
            })
        }
        Action::FinalizeRound => finalize_round(state),
        Action::LoadGame { state } => with_updated_at(state),
        Action::NewGame => GameState::empty(),
    }
}

fn with_updated_at(mut state: GameState) -> GameState {
    state.updated_at_iso = now_iso();
    state
}

/// Applies `update` to the current round, or absorbs the action when no
/// round is active.
fn with_current_round(state: &GameState, update: impl FnOnce(&mut RoundEntry)) -> GameState {
    let mut next = state.clone();
    if let Some(round) = next.rounds.get_mut(state.current_round_index) {
        update(round);
    }
    with_updated_at(next)
}

fn create_game_state(names: Vec<String>, num_players: i32, first_dealer_seat_index: i32) -> GameState {
    let players: Vec<Player> = names
        .into_iter()
        .take(num_players.max(0) as usize)
        .enumerate()
        .map(|(index, name)| Player {
            id: index as PlayerId,
            name,
            seat_index: index as i32,
        })
        .collect();
    let max_rounds = max_rounds(num_players);
    let rounds = (1..=max_rounds)
        .map(|round_number| RoundEntry {
            round_number,
            dealer_seat_index: dealer_seat_index(round_number, num_players, first_dealer_seat_index),
            bids: unset_record(&players),
            tricks: unset_record(&players),
            scores_delta: None,
            scores_total: None,
            finalized: false,
        })
        .collect();

    let mut state = GameState::empty();
    state.num_players = num_players;
    state.players = players;
    state.first_dealer_seat_index = first_dealer_seat_index;
    state.max_rounds = max_rounds;
    state.phase = Phase::Bidding;
    state.rounds = rounds;
    state
}

fn unset_record(players: &[Player]) -> HashMap<PlayerId, Option<i32>> {
    players.iter().map(|player| (player.id, None)).collect()
}

/// Flattens a bid/trick record once every player has entered a value.
fn complete_record(record: &HashMap<PlayerId, Option<i32>>) -> Option<HashMap<PlayerId, i32>> {
    record
        .iter()
        .map(|(&player_id, &value)| value.map(|value| (player_id, value)))
        .collect()
}

fn finalize_round(state: &GameState) -> GameState {
    let round_index = state.current_round_index;
    let Some(round) = state.rounds.get(round_index) else {
        return with_updated_at(state.clone());
    };
    // Finalization is idempotent: a second request for the same round is
    // absorbed rather than rescored.
    if round.finalized {
        return with_updated_at(state.clone());
    }
    let (Some(bids), Some(tricks)) = (
        complete_record(&round.bids),
        complete_record(&round.tricks),
    ) else {
        return with_updated_at(state.clone());
    };

    let scores_delta = round_scores(&bids, &tricks);
    let scores_total: HashMap<PlayerId, i32> = state
        .players
        .iter()
        .map(|player| {
            let previous_total = round_index
                .checked_sub(1)
                .and_then(|index| state.rounds.get(index))
                .and_then(|previous| previous.scores_total.as_ref())
                .and_then(|totals| totals.get(&player.id))
                .copied()
                .unwrap_or(0);
            (player.id, previous_total + scores_delta[&player.id])
        })
        .collect();

    let mut next = state.clone();
    {
        let round = &mut next.rounds[round_index];
        round.scores_delta = Some(scores_delta);
        round.scores_total = Some(scores_total);
        round.finalized = true;
    }
    let is_last_round = round_index + 1 >= state.max_rounds as usize;
    if is_last_round {
        // index keeps pointing at the final round
        next.phase = Phase::GameComplete;
    } else {
        next.current_round_index = round_index + 1;
        next.phase = Phase::Bidding;
    }
    with_updated_at(next)
}
