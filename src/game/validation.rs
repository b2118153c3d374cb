use std::collections::HashMap;

use crate::game::model::PlayerId;

/// A bid is legal once entered and within `[0, round_number]` (you can bid
/// at most one trick per card dealt).
pub fn is_valid_bid(bid: Option<i32>, round_number: i32) -> bool {
    match bid {
        Some(bid) => (0..=round_number).contains(&bid),
        None => false,
    }
}

pub fn is_valid_tricks(tricks: Option<i32>, round_number: i32) -> bool {
    match tricks {
        Some(tricks) => (0..=round_number).contains(&tricks),
        None => false,
    }
}

/// Every player has reported and the reported tricks account for exactly the
/// tricks in play this round: none lost, none double-counted.
pub fn tricks_sum_valid(tricks: &HashMap<PlayerId, Option<i32>>, round_number: i32) -> bool {
    let mut sum = 0;
    for value in tricks.values() {
        match value {
            Some(tricks) => sum += tricks,
            None => return false,
        }
    }
    sum == round_number
}

/// Used for both bid and trick records to gate phase transitions.
pub fn all_entered(record: &HashMap<PlayerId, Option<i32>>) -> bool {
    record.values().all(|value| value.is_some())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_is_valid_bid() {
        assert!(is_valid_bid(Some(0), 3));
        assert!(is_valid_bid(Some(3), 3));
        assert!(!is_valid_bid(Some(4), 3));
        assert!(!is_valid_bid(Some(-1), 3));
        assert!(!is_valid_bid(None, 3));
    }

    #[test]
    fn test_is_valid_tricks() {
        assert!(is_valid_tricks(Some(0), 1));
        assert!(is_valid_tricks(Some(1), 1));
        assert!(!is_valid_tricks(Some(2), 1));
        assert!(!is_valid_tricks(None, 1));
    }

    #[test]
    fn test_tricks_sum_valid() {
        // round 1, 4 players: exactly one trick to account for
        let tricks = HashMap::from([(0, Some(1)), (1, Some(0)), (2, Some(0)), (3, Some(0))]);
        assert!(tricks_sum_valid(&tricks, 1));

        let tricks = HashMap::from([(0, Some(1)), (1, Some(1)), (2, Some(0)), (3, Some(0))]);
        assert!(!tricks_sum_valid(&tricks, 1));

        let tricks = HashMap::from([(0, Some(1)), (1, None), (2, Some(0)), (3, Some(0))]);
        assert!(!tricks_sum_valid(&tricks, 1));
    }

    #[test]
    fn test_all_entered() {
        let record = HashMap::from([(0, Some(2)), (1, Some(0))]);
        assert!(all_entered(&record));

        let record = HashMap::from([(0, Some(2)), (1, None)]);
        assert!(!all_entered(&record));

        assert!(all_entered(&HashMap::new()));
    }
}
