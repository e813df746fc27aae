// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::types::{CommonRoleId, GroupId, UserId};

/// Common role handed to a user.
///
/// Grants without a group scope are attached to the platform-wide profile and apply in every
/// group, scoped grants only inside the given group.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct CommonRoleGrant {
    pub common_role_id: CommonRoleId,
    pub user_id: UserId,
    pub group_id: Option<GroupId>,
}

impl CommonRoleGrant {
    pub fn platform(common_role_id: CommonRoleId, user_id: UserId) -> Self {
        Self {
            common_role_id,
            user_id,
            group_id: None,
        }
    }

    pub fn scoped(common_role_id: CommonRoleId, user_id: UserId, group_id: GroupId) -> Self {
        Self {
            common_role_id,
            user_id,
            group_id: Some(group_id),
        }
    }

    /// Returns true if the grant is effective inside the given group.
    pub fn applies_to(&self, group_id: GroupId) -> bool {
        self.group_id.is_none_or(|scope| scope == group_id)
    }
}
