// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use thiserror::Error;

use crate::types::{CommonRoleId, GroupId, GroupRoleId, ResponsibilityId, UserId};

/// Errors returned by the stewardship engine.
///
/// Validation errors are meant to be translated into a user-facing message by the caller. Re-casting
/// an identical trust expression is not an error, see `VoteOutcome::AlreadyCast`.
#[derive(Debug, Error)]
pub enum StewardshipError<E>
where
    E: Error,
{
    /// Trustor, trustee or grantee holds no active membership in the group.
    #[error("user {user} is not an active member of group {group}")]
    InvalidTarget { group: GroupId, user: UserId },

    /// Self voting is disabled for this role.
    #[error("user {user} can not express trust in themselves for role {role}")]
    SelfVoteDisallowed { role: GroupRoleId, user: UserId },

    /// Direct grant or revoke of a role which is governed by trust, outside of the bootstrap
    /// exception, or an evaluator write to an admin-assigned role.
    #[error("role {role} in group {group} can not be changed by {authority}")]
    UnauthorizedGrant {
        group: GroupId,
        role: GroupRoleId,
        authority: &'static str,
    },

    #[error("group role {0} not found")]
    RoleNotFound(GroupRoleId),

    #[error("common role {0} not found")]
    CommonRoleNotFound(CommonRoleId),

    #[error("responsibility {0} not found")]
    ResponsibilityNotFound(ResponsibilityId),

    #[error("group {0} not found")]
    GroupNotFound(GroupId),

    #[error("group {0} already exists")]
    GroupExists(GroupId),

    /// Deactivated groups keep their data but don't accept changes anymore.
    #[error("group {0} is inactive")]
    GroupInactive(GroupId),

    /// Roles can only be voted on in self-stewarded groups.
    #[error("group {0} is not self-stewarded")]
    NotSelfStewarded(GroupId),

    /// Self-stewarded groups hand out roles by trust only.
    #[error("group {0} is not admined")]
    NotAdmined(GroupId),

    /// Trust can only be expressed for trust-assigned roles.
    #[error("role {0} is not assigned by trust")]
    RoleNotTrustAssigned(GroupRoleId),

    /// The group requires a minimum membership age before members can express trust.
    #[error("user {user} must be a member for at least {days} days before expressing trust")]
    MembershipTooRecent { user: UserId, days: u32 },

    /// The same trust was changed too recently.
    #[error("user {user} can change this trust only once every {hours} hours")]
    TrustRateLimited { user: UserId, hours: u32 },

    /// Error occurred in the underlying store.
    #[error(transparent)]
    Store(#[from] E),
}
