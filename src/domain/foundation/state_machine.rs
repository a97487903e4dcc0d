//! State machine trait for lifecycle status enums.

use super::ValidationError;

/// Trait for status enums whose transitions form a state machine.
///
/// Implementors declare which transitions are legal and get a validated
/// `transition_to` for free.
pub trait StateMachine: Sized + Copy + PartialEq + std::fmt::Debug {
    /// Returns true if transition from self to target is valid.
    fn can_transition_to(&self, target: &Self) -> bool;

    /// Performs the transition, returning an error if it is not valid.
    fn transition_to(&self, target: Self) -> Result<Self, ValidationError> {
        if self.can_transition_to(&target) {
            Ok(target)
        } else {
            Err(ValidationError::invalid(
                "status",
                format!("cannot transition from {:?} to {:?}", self, target),
            ))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    enum Phase {
        Open,
        Settled,
        Closed,
    }

    impl StateMachine for Phase {
        fn can_transition_to(&self, target: &Self) -> bool {
            use Phase::*;
            matches!((self, target), (Open, Settled) | (Settled, Closed))
        }
    }

    #[test]
    fn valid_transition_succeeds() {
        assert_eq!(Phase::Open.transition_to(Phase::Settled), Ok(Phase::Settled));
    }

    #[test]
    fn invalid_transition_fails() {
        assert!(Phase::Open.transition_to(Phase::Closed).is_err());
        assert!(Phase::Closed.transition_to(Phase::Open).is_err());
    }
}
