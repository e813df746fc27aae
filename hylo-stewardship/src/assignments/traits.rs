// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::assignments::CommonRoleGrant;
use crate::traits::Transaction;
use crate::types::{GroupId, GroupRoleId, UserId};

/// Store API for role assignments.
///
/// All writes are idempotent, repeating one reports `false` instead of failing.
pub trait AssignmentStore: Transaction {
    /// Returns `true` when the assignment was created.
    fn assign_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns `true` when an assignment was removed.
    fn unassign_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove all group role assignments of a user inside a group and return how many there were.
    fn unassign_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, Self::Error>>;

    /// Holders of a role, ordered.
    fn role_holders(
        &self,
        role_id: GroupRoleId,
    ) -> impl Future<Output = Result<Vec<UserId>, Self::Error>>;

    /// Group roles assigned to a user inside a group, ordered.
    fn assigned_group_roles(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<GroupRoleId>, Self::Error>>;

    /// Returns `true` when the grant was created.
    fn grant_common_role(
        &self,
        grant: &CommonRoleGrant,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Returns `true` when the grant was removed.
    fn revoke_common_role(
        &self,
        grant: &CommonRoleGrant,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// All common role grants of a user, scoped or not.
    fn common_role_grants(
        &self,
        user_id: UserId,
    ) -> impl Future<Output = Result<Vec<CommonRoleGrant>, Self::Error>>;
}
