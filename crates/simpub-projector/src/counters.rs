//! Checked counter steps.
//!
//! Counters are `u64` and never wrap. Underflow means a relation was
//! removed that the counter never saw, which is corruption, not input.

use crate::error::ProjectionError;

/// `value + 1`, or [`ProjectionError::CounterOverflow`].
pub(crate) fn increment(
    value: u64,
    field: &'static str,
    owner: &str,
) -> Result<u64, ProjectionError> {
    value
        .checked_add(1)
        .ok_or_else(|| ProjectionError::CounterOverflow {
            field,
            owner: owner.to_owned(),
        })
}

/// `value - 1`, or [`ProjectionError::CounterUnderflow`].
pub(crate) fn decrement(
    value: u64,
    field: &'static str,
    owner: &str,
) -> Result<u64, ProjectionError> {
    value
        .checked_sub(1)
        .ok_or_else(|| ProjectionError::CounterUnderflow {
            field,
            owner: owner.to_owned(),
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn increment_adds_one() {
        assert_eq!(increment(4, "likes_count", "QmP").ok(), Some(5));
    }

    #[test]
    fn increment_refuses_to_wrap() {
        let result = increment(u64::MAX, "likes_count", "QmP");
        assert!(matches!(
            result,
            Err(ProjectionError::CounterOverflow {
                field: "likes_count",
                ..
            })
        ));
    }

    #[test]
    fn decrement_refuses_to_go_negative() {
        let result = decrement(0, "followers_count", "0xa");
        assert!(matches!(
            result,
            Err(ProjectionError::CounterUnderflow { ref owner, .. }) if owner == "0xa"
        ));
    }
}
