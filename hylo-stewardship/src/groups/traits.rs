// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::groups::{Group, Membership};
use crate::traits::Transaction;
use crate::types::{GroupId, UserId};

/// Store API for groups and their memberships.
pub trait GroupStore: Transaction {
    /// Insert a group.
    ///
    /// Returns `false` when a group with the same id already exists, the stored group stays
    /// untouched in that case.
    fn insert_group(&self, group: &Group) -> impl Future<Output = Result<bool, Self::Error>>;

    fn group(&self, id: GroupId) -> impl Future<Output = Result<Option<Group>, Self::Error>>;

    /// Overwrite mode, active flag and settings of a group.
    ///
    /// Returns `false` when the group does not exist.
    fn update_group(&self, group: &Group) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Insert a membership or overwrite an existing one for the same group and user.
    fn upsert_membership(
        &self,
        membership: &Membership,
    ) -> impl Future<Output = Result<(), Self::Error>>;

    fn membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> impl Future<Output = Result<Option<Membership>, Self::Error>>;

    /// Mark a membership as inactive.
    ///
    /// Returns `true` when an active membership was deactivated.
    fn deactivate_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Ids of all active members, ordered.
    fn active_members(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<Vec<UserId>, Self::Error>>;

    fn active_member_count(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<u32, Self::Error>>;
}
