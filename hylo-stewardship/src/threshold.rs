// SPDX-License-Identifier: MIT OR Apache-2.0

//! Trust thresholds of self-stewarded roles.
//!
//! Everything in here is a pure function of the current ledger state and the number of active
//! group members: evaluating the same state twice always leads to the same decision.
use serde::{Deserialize, Serialize};

use crate::types::RoleStatus;

/// Policy describing how many trust expressions a member needs to hold a role.
///
/// The effective number of required trust expressions is never lower than one.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Threshold {
    /// Absolute number of trust expressions.
    Count(u32),

    /// Percentage of the active group membership, rounded up.
    Percent(u8),

    /// Scales with the group size, starting at half of the other members for small groups and
    /// slowly falling to 30% of them for large ones.
    #[default]
    Scaled,
}

impl Threshold {
    /// Number of trust expressions required for a group with the given number of active members.
    pub fn required(&self, active_members: u32) -> u32 {
        let members = u64::from(active_members);

        let required = match self {
            Threshold::Count(count) => u64::from(*count),
            Threshold::Percent(percent) => {
                let percent = u64::from((*percent).min(100));
                (members * percent).div_ceil(100)
            }
            Threshold::Scaled => {
                if members <= 2 {
                    1
                } else if members <= 5 {
                    // Half of the other members.
                    (members - 1).div_ceil(2)
                } else {
                    // One percent less for every member above five, but never below 30%.
                    let percent = 50u64.saturating_sub(members - 5).max(30);
                    ((members - 1) * percent).div_ceil(100)
                }
            }
        };

        u32::try_from(required.max(1)).unwrap_or(u32::MAX)
    }

    pub(crate) fn kind(&self) -> &'static str {
        match self {
            Threshold::Count(_) => "count",
            Threshold::Percent(_) => "percent",
            Threshold::Scaled => "scaled",
        }
    }

    pub(crate) fn value(&self) -> u32 {
        match self {
            Threshold::Count(count) => *count,
            Threshold::Percent(percent) => u32::from(*percent),
            Threshold::Scaled => 0,
        }
    }

    pub(crate) fn from_parts(kind: &str, value: u32) -> Option<Self> {
        match kind {
            "count" => Some(Threshold::Count(value)),
            "percent" => u8::try_from(value).ok().map(Threshold::Percent),
            "scaled" => Some(Threshold::Scaled),
            _ => None,
        }
    }
}

/// What the evaluator does with a (role, trustee) pair.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Decision {
    /// Threshold reached and the trustee doesn't hold the role yet.
    Grant,

    /// Threshold not reached (anymore) and the trustee holds a non-bootstrap role.
    Revoke,

    /// Nothing changes.
    Keep,
}

/// Inputs of a threshold decision for a single trustee.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Evaluation {
    /// Trust expressions for the trustee, self votes excluded.
    pub trust_count: u32,

    /// Effective number of required trust expressions.
    pub threshold_required: u32,

    /// The trustee currently holds the role.
    pub assigned: bool,

    /// The role is marked as bootstrap and is never revoked automatically.
    pub bootstrap: bool,
}

impl Evaluation {
    pub fn new(
        threshold: &Threshold,
        active_members: u32,
        trust_count: u32,
        assigned: bool,
        bootstrap: bool,
    ) -> Self {
        Self {
            trust_count,
            threshold_required: threshold.required(active_members),
            assigned,
            bootstrap,
        }
    }

    pub fn is_met(&self) -> bool {
        self.trust_count >= self.threshold_required
    }

    pub fn decision(&self) -> Decision {
        match (self.is_met(), self.assigned) {
            (true, false) => Decision::Grant,
            (false, true) if !self.bootstrap => Decision::Revoke,
            _ => Decision::Keep,
        }
    }
}

/// Status of a role after all decisions were applied.
pub fn role_status(holders: usize, counted_votes: bool) -> RoleStatus {
    if holders > 0 {
        RoleStatus::Active
    } else if counted_votes {
        RoleStatus::Pending
    } else {
        RoleStatus::Vacant
    }
}

#[cfg(test)]
mod tests {
    use crate::types::RoleStatus;

    use super::{Decision, Evaluation, Threshold, role_status};

    #[test]
    fn count_threshold() {
        assert_eq!(Threshold::Count(3).required(50), 3);
        assert_eq!(Threshold::Count(3).required(0), 3);

        // Zero would make everybody a holder, the threshold never drops below one.
        assert_eq!(Threshold::Count(0).required(10), 1);
    }

    #[test]
    fn percent_threshold() {
        assert_eq!(Threshold::Percent(50).required(10), 5);
        assert_eq!(Threshold::Percent(50).required(9), 5);
        assert_eq!(Threshold::Percent(33).required(10), 4);
        assert_eq!(Threshold::Percent(100).required(7), 7);
        assert_eq!(Threshold::Percent(250).required(7), 7);
        assert_eq!(Threshold::Percent(10).required(0), 1);
    }

    #[test]
    fn scaled_threshold() {
        let expected = [
            (0, 1),
            (1, 1),
            (2, 1),
            (3, 1),
            (4, 2),
            (5, 2),
            (6, 3),
            (10, 5),
            (25, 8),
            (50, 15),
            (500, 150),
        ];

        for (members, required) in expected {
            assert_eq!(
                Threshold::Scaled.required(members),
                required,
                "{members} members"
            );
        }
    }

    #[test]
    fn threshold_parts() {
        for threshold in [Threshold::Count(4), Threshold::Percent(20), Threshold::Scaled] {
            assert_eq!(
                Threshold::from_parts(threshold.kind(), threshold.value()),
                Some(threshold)
            );
        }

        assert_eq!(Threshold::from_parts("percent", 300), None);
        assert_eq!(Threshold::from_parts("majority", 1), None);
    }

    #[test]
    fn decisions() {
        let threshold = Threshold::Count(3);

        // Reaching the threshold grants the role.
        let evaluation = Evaluation::new(&threshold, 10, 3, false, false);
        assert!(evaluation.is_met());
        assert_eq!(evaluation.decision(), Decision::Grant);

        // .. unless it is already held.
        let evaluation = Evaluation::new(&threshold, 10, 4, true, false);
        assert_eq!(evaluation.decision(), Decision::Keep);

        // Falling below revokes it.
        let evaluation = Evaluation::new(&threshold, 10, 2, true, false);
        assert!(!evaluation.is_met());
        assert_eq!(evaluation.decision(), Decision::Revoke);

        // .. except for bootstrap roles.
        let evaluation = Evaluation::new(&threshold, 10, 0, true, true);
        assert_eq!(evaluation.decision(), Decision::Keep);

        // Nothing to do for members without the role and without enough trust.
        let evaluation = Evaluation::new(&threshold, 10, 1, false, false);
        assert_eq!(evaluation.decision(), Decision::Keep);
    }

    #[test]
    fn decisions_are_deterministic() {
        let threshold = Threshold::Scaled;
        for members in 0..60 {
            for count in 0..20 {
                for assigned in [true, false] {
                    let a = Evaluation::new(&threshold, members, count, assigned, false);
                    let b = Evaluation::new(&threshold, members, count, assigned, false);
                    assert_eq!(a.decision(), b.decision());
                    assert_eq!(a.is_met(), count >= threshold.required(members));
                }
            }
        }
    }

    #[test]
    fn status() {
        assert_eq!(role_status(0, false), RoleStatus::Vacant);
        assert_eq!(role_status(0, true), RoleStatus::Pending);
        assert_eq!(role_status(2, true), RoleStatus::Active);
        assert_eq!(role_status(1, false), RoleStatus::Active);
    }
}
