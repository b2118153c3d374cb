// Pure queries over a GameState snapshot. Nothing here mutates or caches;
// every view is recomputed from the state it is handed.

use std::collections::HashMap;

use crate::game::model::{GameState, Player, PlayerId, RoundEntry};
use crate::game::validation::{all_entered, is_valid_bid, tricks_sum_valid};

pub fn current_round(state: &GameState) -> Option<&RoundEntry> {
    state.rounds.get(state.current_round_index)
}

pub fn dealer_player(state: &GameState) -> Option<&Player> {
    let round = current_round(state)?;
    state
        .players
        .iter()
        .find(|player| player.seat_index == round.dealer_seat_index)
}

/// Running totals counting finalized rounds only; a round that is partially
/// filled in contributes nothing until it is finalized.
pub fn cumulative_scores(state: &GameState) -> HashMap<PlayerId, i32> {
    let mut totals: HashMap<PlayerId, i32> =
        state.players.iter().map(|player| (player.id, 0)).collect();
    for round in &state.rounds {
        if !round.finalized {
            continue;
        }
        if let Some(deltas) = &round.scores_delta {
            for (player_id, delta) in deltas {
                *totals.entry(*player_id).or_insert(0) += delta;
            }
        }
    }
    totals
}

/// Players in the order they bid: the seat to the dealer's left first,
/// wrapping around the table, dealer last. With no active round the plain
/// seat order is returned.
pub fn bidding_order(state: &GameState) -> Vec<&Player> {
    let mut ordered: Vec<&Player> = state.players.iter().collect();
    ordered.sort_by_key(|player| player.seat_index);
    let Some(round) = current_round(state) else {
        return ordered;
    };
    let Some(dealer_position) = ordered
        .iter()
        .position(|player| player.seat_index == round.dealer_seat_index)
    else {
        return ordered;
    };
    ordered.rotate_left(dealer_position + 1);
    ordered
}

pub fn all_bids_complete(state: &GameState) -> bool {
    current_round(state).is_some_and(|round| all_entered(&round.bids))
}

/// Stricter than completeness: every bid entered and in range for the round.
/// Gates the bidding -> playing transition.
pub fn all_bids_valid(state: &GameState) -> bool {
    current_round(state).is_some_and(|round| {
        round
            .bids
            .values()
            .all(|&bid| is_valid_bid(bid, round.round_number))
    })
}

pub fn all_tricks_complete(state: &GameState) -> bool {
    current_round(state).is_some_and(|round| all_entered(&round.tricks))
}

pub fn tricks_sum_ok(state: &GameState) -> bool {
    current_round(state).is_some_and(|round| tricks_sum_valid(&round.tricks, round.round_number))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::game::model::{Edition, Phase, SCHEMA_VERSION};

    fn player(id: PlayerId, name: &str, seat_index: i32) -> Player {
        Player {
            id,
            name: name.to_string(),
            seat_index,
        }
    }

    fn round(round_number: i32, dealer_seat_index: i32, player_ids: &[PlayerId]) -> RoundEntry {
        RoundEntry {
            round_number,
            dealer_seat_index,
            bids: player_ids.iter().map(|&id| (id, None)).collect(),
            tricks: player_ids.iter().map(|&id| (id, None)).collect(),
            scores_delta: None,
            scores_total: None,
            finalized: false,
        }
    }

    fn four_player_state() -> GameState {
        GameState {
            version: SCHEMA_VERSION,
            edition: Edition::Deluxe,
            num_players: 4,
            players: vec![
                player(0, "Ada", 0),
                player(1, "Brook", 1),
                player(2, "Casey", 2),
                player(3, "Devin", 3),
            ],
            first_dealer_seat_index: 1,
            max_rounds: 15,
            current_round_index: 0,
            phase: Phase::Bidding,
            rounds: vec![round(1, 1, &[0, 1, 2, 3]), round(2, 2, &[0, 1, 2, 3])],
            created_at_iso: String::new(),
            updated_at_iso: String::new(),
        }
    }

    #[test]
    fn test_current_round() {
        let mut state = four_player_state();
        assert_eq!(current_round(&state).unwrap().round_number, 1);
        state.current_round_index = 5;
        assert!(current_round(&state).is_none());
        assert!(current_round(&GameState::empty()).is_none());
    }

    #[test]
    fn test_dealer_player() {
        let state = four_player_state();
        assert_eq!(dealer_player(&state).unwrap().name, "Brook");
        assert!(dealer_player(&GameState::empty()).is_none());
    }

    #[test]
    fn test_bidding_order_dealer_bids_last() {
        let state = four_player_state();
        let order: Vec<PlayerId> = bidding_order(&state).iter().map(|p| p.id).collect();
        // dealer sits at seat 1, so seat 2 opens and the dealer closes
        assert_eq!(order, vec![2, 3, 0, 1]);
    }

    #[test]
    fn test_bidding_order_without_active_round() {
        let mut state = four_player_state();
        state.current_round_index = 10;
        let order: Vec<PlayerId> = bidding_order(&state).iter().map(|p| p.id).collect();
        assert_eq!(order, vec![0, 1, 2, 3]);
    }

    #[test]
    fn test_cumulative_scores_skip_unfinalized_rounds() {
        let mut state = four_player_state();
        state.rounds[0].finalized = true;
        state.rounds[0].scores_delta =
            Some(HashMap::from([(0, 50), (1, -20), (2, 33), (3, 0)]));
        // second round has deltas but was never finalized; it must not count
        state.rounds[1].scores_delta =
            Some(HashMap::from([(0, 10), (1, 10), (2, 10), (3, 10)]));

        let totals = cumulative_scores(&state);
        assert_eq!(totals[&0], 50);
        assert_eq!(totals[&1], -20);
        assert_eq!(totals[&2], 33);
        assert_eq!(totals[&3], 0);
    }

    #[test]
    fn test_cumulative_scores_accumulate_in_sequence() {
        let mut state = four_player_state();
        state.rounds.push(round(3, 3, &[0, 1, 2, 3]));
        let deltas = [50, -20, 33];
        let expected = [50, 30, 63];
        for (index, (delta, expected)) in deltas.iter().zip(expected).enumerate() {
            state.rounds[index].finalized = true;
            state.rounds[index].scores_delta =
                Some(HashMap::from([(0, *delta), (1, 0), (2, 0), (3, 0)]));
            assert_eq!(cumulative_scores(&state)[&0], expected);
        }
    }

    #[test]
    fn test_completeness_checks() {
        let mut state = four_player_state();
        assert!(!all_bids_complete(&state));
        assert!(!all_bids_valid(&state));
        for id in 0..4 {
            state.rounds[0].bids.insert(id, Some(0));
        }
        assert!(all_bids_complete(&state));
        assert!(all_bids_valid(&state));
        // complete but out of range for round 1
        state.rounds[0].bids.insert(0, Some(2));
        assert!(all_bids_complete(&state));
        assert!(!all_bids_valid(&state));
    }

    #[test]
    fn test_tricks_sum_ok() {
        let mut state = four_player_state();
        assert!(!tricks_sum_ok(&state));
        for id in 0..4 {
            state.rounds[0].tricks.insert(id, Some(0));
        }
        assert!(!tricks_sum_ok(&state));
        state.rounds[0].tricks.insert(2, Some(1));
        assert!(tricks_sum_ok(&state));
        assert!(all_tricks_complete(&state));
    }
}
