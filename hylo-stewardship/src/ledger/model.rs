// SPDX-License-Identifier: MIT OR Apache-2.0

use serde::{Deserialize, Serialize};

use crate::types::{GroupId, GroupRoleId, TrustExpressionId, UserId};

/// Identifies a trust expression, there can only ever be one per key.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct TrustKey {
    pub group_id: GroupId,
    pub role_id: GroupRoleId,
    pub trustor_id: UserId,
    pub trustee_id: UserId,
}

impl TrustKey {
    pub fn new(group_id: GroupId, role_id: GroupRoleId, trustor_id: UserId, trustee_id: UserId) -> Self {
        Self {
            group_id,
            role_id,
            trustor_id,
            trustee_id,
        }
    }

    /// Self votes mark the trustee as a volunteer, they never count towards a threshold.
    pub fn is_self_vote(&self) -> bool {
        self.trustor_id == self.trustee_id
    }
}

/// A trustor's vote for a trustee to hold a group role.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TrustExpression {
    pub id: TrustExpressionId,
    pub group_id: GroupId,
    pub role_id: GroupRoleId,
    pub trustor_id: UserId,
    pub trustee_id: UserId,

    /// Unix timestamp in seconds.
    pub created_at: u64,
}

impl TrustExpression {
    pub fn key(&self) -> TrustKey {
        TrustKey::new(self.group_id, self.role_id, self.trustor_id, self.trustee_id)
    }
}
