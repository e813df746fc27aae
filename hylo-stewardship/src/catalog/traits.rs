// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::catalog::{
    CommonRole, GroupRole, NewCommonRole, NewGroupRole, NewResponsibility, Responsibility, RoleRef,
};
use crate::traits::Transaction;
use crate::types::{CommonRoleId, GroupId, GroupRoleId, ResponsibilityId};

/// Store API for common roles, group roles and the responsibilities they carry.
///
/// Role / responsibility pairs are unique, attaching the same responsibility twice must not create
/// a second entry.
pub trait CatalogStore: Transaction {
    /// Insert a responsibility and return it with its assigned id.
    ///
    /// System responsibilities are unique by title, inserting a known one returns the stored
    /// responsibility unchanged.
    fn insert_responsibility(
        &self,
        responsibility: &NewResponsibility,
    ) -> impl Future<Output = Result<Responsibility, Self::Error>>;

    fn responsibility(
        &self,
        id: ResponsibilityId,
    ) -> impl Future<Output = Result<Option<Responsibility>, Self::Error>>;

    /// Get the system responsibility with the given title.
    fn system_responsibility(
        &self,
        title: &str,
    ) -> impl Future<Output = Result<Option<Responsibility>, Self::Error>>;

    /// All system responsibilities plus the custom ones scoped to the group.
    fn group_responsibilities(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<Vec<Responsibility>, Self::Error>>;

    /// Insert a common role and return it with its assigned id.
    fn insert_common_role(
        &self,
        role: &NewCommonRole,
    ) -> impl Future<Output = Result<CommonRole, Self::Error>>;

    fn common_role(
        &self,
        id: CommonRoleId,
    ) -> impl Future<Output = Result<Option<CommonRole>, Self::Error>>;

    fn common_roles(&self) -> impl Future<Output = Result<Vec<CommonRole>, Self::Error>>;

    /// Overwrite name, emoji and description of a common role.
    ///
    /// Returns `false` when the role does not exist.
    fn update_common_role(
        &self,
        role: &CommonRole,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Insert a group role and return it with its assigned id.
    ///
    /// New roles start out as vacant with empty threshold counters.
    fn insert_group_role(
        &self,
        role: &NewGroupRole,
    ) -> impl Future<Output = Result<GroupRole, Self::Error>>;

    fn group_role(
        &self,
        id: GroupRoleId,
    ) -> impl Future<Output = Result<Option<GroupRole>, Self::Error>>;

    /// All roles owned by the group, active or not, ordered by id.
    fn group_roles(
        &self,
        group_id: GroupId,
    ) -> impl Future<Output = Result<Vec<GroupRole>, Self::Error>>;

    /// Overwrite all mutable fields of a group role.
    ///
    /// Returns `false` when the role does not exist.
    fn update_group_role(&self, role: &GroupRole)
    -> impl Future<Output = Result<bool, Self::Error>>;

    /// Attach a responsibility to a role.
    ///
    /// Returns `true` when the pair was inserted, `false` when it already existed.
    fn attach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Detach a responsibility from a role.
    ///
    /// Returns `true` when the pair was removed, `false` when it was not attached.
    fn detach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Responsibilities carried by a role, ordered by id.
    fn role_responsibilities(
        &self,
        role: RoleRef,
    ) -> impl Future<Output = Result<Vec<Responsibility>, Self::Error>>;
}
