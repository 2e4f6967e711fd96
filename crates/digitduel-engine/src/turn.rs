//! Turn scheduler: decides who guesses next.
//!
//! Rotation is the circular successor in member join order. When the
//! current holder has left the session, rotation continuity is not
//! preserved — the caller reseats the turn to the first remaining member.
//! Only turn-uniqueness matters, not fairness after departures.

use digitduel_protocol::PlayerId;

/// Returns the circular successor of `current` within `order`.
///
/// Returns `None` when `order` is empty or `current` is no longer in it;
/// the caller should then fall back to the first member.
pub fn next_holder(order: &[PlayerId], current: PlayerId) -> Option<PlayerId> {
    let index = order.iter().position(|p| *p == current)?;
    Some(order[(index + 1) % order.len()])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pid(id: u64) -> PlayerId {
        PlayerId(id)
    }

    #[test]
    fn test_next_holder_advances_in_join_order() {
        let order = [pid(1), pid(2), pid(3)];
        assert_eq!(next_holder(&order, pid(1)), Some(pid(2)));
        assert_eq!(next_holder(&order, pid(2)), Some(pid(3)));
    }

    #[test]
    fn test_next_holder_wraps_around() {
        let order = [pid(1), pid(2), pid(3)];
        assert_eq!(next_holder(&order, pid(3)), Some(pid(1)));
    }

    #[test]
    fn test_next_holder_single_member_keeps_turn() {
        let order = [pid(7)];
        assert_eq!(next_holder(&order, pid(7)), Some(pid(7)));
    }

    #[test]
    fn test_next_holder_missing_current_returns_none() {
        let order = [pid(1), pid(2)];
        assert_eq!(next_holder(&order, pid(9)), None);
    }

    #[test]
    fn test_next_holder_empty_order_returns_none() {
        assert_eq!(next_holder(&[], pid(1)), None);
    }
}
