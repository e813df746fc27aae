// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::types::{GroupId, GroupMode, UserId};

const SECONDS_PER_HOUR: u64 = 60 * 60;
const SECONDS_PER_DAY: u64 = SECONDS_PER_HOUR * 24;

/// Governance settings of a group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(default)]
pub struct GroupSettings {
    /// Members may express trust in themselves. Self votes mark volunteers but are never counted.
    pub allow_self_voting: bool,

    /// Minimum age of a membership before the member can express trust.
    pub min_member_age_days: u32,

    /// A trustor can change their trust in the same trustee for the same role only once within
    /// this many hours. Zero disables the limit.
    pub trust_rate_limit_hours: u32,
}

impl GroupSettings {
    /// Returns true if trust last changed at `last_change` may change again at `now`.
    pub fn allows_trust_change(&self, last_change: Option<u64>, now: u64) -> bool {
        let window = u64::from(self.trust_rate_limit_hours) * SECONDS_PER_HOUR;
        match last_change {
            Some(last_change) if window > 0 => now.saturating_sub(last_change) >= window,
            _ => true,
        }
    }
}

impl Default for GroupSettings {
    fn default() -> Self {
        Self {
            allow_self_voting: true,
            min_member_age_days: 0,
            trust_rate_limit_hours: 0,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Group {
    pub id: GroupId,
    pub mode: GroupMode,
    pub active: bool,
    pub settings: GroupSettings,
}

impl Group {
    pub fn new(id: GroupId, mode: GroupMode) -> Self {
        Self {
            id,
            mode,
            active: true,
            settings: GroupSettings::default(),
        }
    }

    pub fn settings(mut self, settings: GroupSettings) -> Self {
        self.settings = settings;
        self
    }

    pub fn is_self_stewarded(&self) -> bool {
        self.mode == GroupMode::SelfStewarded
    }
}

/// Membership of a user in a group.
///
/// Only active memberships allow holding group roles and casting or receiving trust.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Membership {
    pub group_id: GroupId,
    pub user_id: UserId,
    pub active: bool,

    /// Position of the group in the member's navigation.
    pub nav_order: Option<i64>,

    /// Unix timestamp in seconds.
    pub joined_at: u64,
}

impl Membership {
    pub fn new(group_id: GroupId, user_id: UserId, joined_at: u64) -> Self {
        Self {
            group_id,
            user_id,
            active: true,
            nav_order: None,
            joined_at,
        }
    }

    /// Returns true if the membership existed for at least the given number of days at `now`.
    pub fn is_older_than(&self, days: u32, now: u64) -> bool {
        let min_age = u64::from(days) * SECONDS_PER_DAY;
        now.saturating_sub(self.joined_at) >= min_age
    }
}

#[cfg(test)]
mod tests {
    use crate::types::{GroupId, UserId};

    use super::{GroupSettings, Membership};

    #[test]
    fn membership_age() {
        let day = 60 * 60 * 24;
        let membership = Membership::new(GroupId::new(1), UserId::new(2), 10 * day);

        assert!(membership.is_older_than(0, 10 * day));
        assert!(!membership.is_older_than(1, 10 * day));
        assert!(membership.is_older_than(3, 13 * day));
        assert!(!membership.is_older_than(3, 13 * day - 1));

        // Clocks going backwards never make a membership older.
        assert!(!membership.is_older_than(1, 0));
    }

    #[test]
    fn trust_rate_limit() {
        let hour = 60 * 60;
        let settings = GroupSettings {
            trust_rate_limit_hours: 2,
            ..GroupSettings::default()
        };

        assert!(settings.allows_trust_change(None, 0));
        assert!(!settings.allows_trust_change(Some(10 * hour), 10 * hour));
        assert!(!settings.allows_trust_change(Some(10 * hour), 12 * hour - 1));
        assert!(settings.allows_trust_change(Some(10 * hour), 12 * hour));

        // Without a window every change is allowed.
        assert!(GroupSettings::default().allows_trust_change(Some(10 * hour), 10 * hour));
    }
}
