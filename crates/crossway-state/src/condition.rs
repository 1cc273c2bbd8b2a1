//! Authoritative experiment condition state machine
//!
//! Server-owned, single source of truth. The condition starts unset, is
//! mutated only by an explicit operator command, and is immutable between
//! mutations. Every valid transition produces exactly one broadcast;
//! invalid input is rejected with a warning and leaves the state untouched.

use tracing::{info, warn};

use crossway_core::{Condition, MAX_CONDITION, MIN_CONDITION};

/// The server's experiment condition state
#[derive(Debug, Default)]
pub struct ConditionMachine {
    current: Option<Condition>,
}

impl ConditionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently selected condition, if any
    pub fn current(&self) -> Option<Condition> {
        self.current
    }

    /// Apply an operator's condition command. Returns the new condition if
    /// the transition was valid (the caller must broadcast it), `None` if
    /// the input was rejected. Rejection leaves the current state in place.
    pub fn set_condition(&mut self, n: i32) -> Option<Condition> {
        match Condition::new(n) {
            Some(condition) => {
                info!(condition = n, "condition selected");
                self.current = Some(condition);
                Some(condition)
            }
            None => {
                warn!(
                    condition = n,
                    "invalid condition number, must be between {} and {}",
                    MIN_CONDITION,
                    MAX_CONDITION
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_starts_unset() {
        assert_eq!(ConditionMachine::new().current(), None);
    }

    #[test]
    fn test_valid_transition() {
        let mut machine = ConditionMachine::new();
        let accepted = machine.set_condition(7);
        assert_eq!(accepted.map(|c| c.number()), Some(7));
        assert_eq!(machine.current().map(|c| c.number()), Some(7));
    }

    #[test]
    fn test_invalid_input_rejected_state_persists() {
        let mut machine = ConditionMachine::new();
        machine.set_condition(4);

        for n in [0, 13, -1, 100] {
            assert!(machine.set_condition(n).is_none(), "n = {}", n);
            assert_eq!(machine.current().map(|c| c.number()), Some(4));
        }
    }

    #[test]
    fn test_invalid_input_before_first_selection() {
        let mut machine = ConditionMachine::new();
        assert!(machine.set_condition(0).is_none());
        assert_eq!(machine.current(), None);
    }

    #[test]
    fn test_every_valid_transition_accepted() {
        let mut machine = ConditionMachine::new();
        for n in MIN_CONDITION..=MAX_CONDITION {
            assert!(machine.set_condition(n).is_some());
            assert_eq!(machine.current().map(|c| c.number()), Some(n));
        }
    }
}
