//! Policy lifecycle status
//!
//! The underwriting core only ever emits `Pending`. Transitions are owned by
//! the review flows; the table here lets callers ask whether a move is legal
//! without duplicating it.

use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PolicyStatus {
    #[default]
    Pending,
    Active,
    Rejected,
    Cancelled,
    Expired,
}

impl PolicyStatus {
    /// Checks if a transition to the target status is valid
    pub fn can_transition_to(&self, target: PolicyStatus) -> bool {
        use PolicyStatus::*;
        matches!(
            (self, target),
            (Pending, Active)
                | (Pending, Rejected)
                | (Pending, Cancelled)
                | (Active, Cancelled)
                | (Active, Expired)
        )
    }
}

impl fmt::Display for PolicyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            PolicyStatus::Pending => "pending",
            PolicyStatus::Active => "active",
            PolicyStatus::Rejected => "rejected",
            PolicyStatus::Cancelled => "cancelled",
            PolicyStatus::Expired => "expired",
        };
        f.write_str(s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pending_transitions() {
        assert!(PolicyStatus::Pending.can_transition_to(PolicyStatus::Active));
        assert!(PolicyStatus::Pending.can_transition_to(PolicyStatus::Rejected));
        assert!(!PolicyStatus::Pending.can_transition_to(PolicyStatus::Expired));
    }

    #[test]
    fn test_terminal_states_have_no_exits() {
        let all = [
            PolicyStatus::Pending,
            PolicyStatus::Active,
            PolicyStatus::Rejected,
            PolicyStatus::Cancelled,
            PolicyStatus::Expired,
        ];
        for status in [PolicyStatus::Rejected, PolicyStatus::Cancelled, PolicyStatus::Expired] {
            assert!(all.iter().all(|t| !status.can_transition_to(*t)));
        }
    }
}
