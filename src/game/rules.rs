use std::collections::HashMap;

use crate::game::model::{PlayerId, TOTAL_CARDS};

/// Number of rounds in a game: as many full deals as the deck allows.
/// Any remainder of the 60 cards is simply never dealt.
/// Expects a player count in `[MIN_PLAYERS, MAX_PLAYERS]`.
pub fn max_rounds(num_players: i32) -> i32 {
    TOTAL_CARDS / num_players
}

/// The deal rotates one seat clockwise every round, wrapping around the
/// table; round 1 is dealt by whichever seat was picked at game start.
pub fn dealer_seat_index(round_number: i32, num_players: i32, first_dealer_seat_index: i32) -> i32 {
    (first_dealer_seat_index + round_number - 1) % num_players
}

/// An exact bid earns 20 plus 10 per trick taken; a missed bid costs
/// 10 per trick of error. Bounds checking is the caller's job (the reducer
/// only scores rounds the validation layer has passed).
pub fn player_score(bid: i32, tricks: i32) -> i32 {
    if bid == tricks {
        20 + 10 * tricks
    } else {
        -10 * (bid - tricks).abs()
    }
}

/// Per-player score deltas for one round. Both maps must cover the same
/// players; the result is this round's contribution only, not a running total.
pub fn round_scores(
    bids: &HashMap<PlayerId, i32>,
    tricks: &HashMap<PlayerId, i32>,
) -> HashMap<PlayerId, i32> {
    bids.iter()
        .map(|(&player_id, &bid)| (player_id, player_score(bid, tricks[&player_id])))
        .collect()
}
