// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;
use std::convert::Infallible;

use crate::assignments::{AssignmentStore, CommonRoleGrant};
use crate::memory::MemoryStore;
use crate::types::{GroupId, GroupRoleId, UserId};

#[derive(Clone, Debug, Default)]
pub(crate) struct AssignmentTables {
    group_roles: BTreeSet<(GroupId, GroupRoleId, UserId)>,
    common_roles: BTreeSet<CommonRoleGrant>,
}

impl AssignmentStore for MemoryStore {
    async fn assign_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> Result<bool, Infallible> {
        Ok(self
            .state()
            .await
            .assignments
            .group_roles
            .insert((group_id, role_id, user_id)))
    }

    async fn unassign_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> Result<bool, Infallible> {
        Ok(self
            .state()
            .await
            .assignments
            .group_roles
            .remove(&(group_id, role_id, user_id)))
    }

    async fn unassign_member(&self, group_id: GroupId, user_id: UserId) -> Result<u64, Infallible> {
        let mut state = self.state().await;
        let group_roles = &mut state.assignments.group_roles;

        let before = group_roles.len();
        group_roles.retain(|(group, _, user)| *group != group_id || *user != user_id);
        Ok((before - group_roles.len()) as u64)
    }

    async fn role_holders(&self, role_id: GroupRoleId) -> Result<Vec<UserId>, Infallible> {
        let mut holders: Vec<UserId> = self
            .state()
            .await
            .assignments
            .group_roles
            .iter()
            .filter(|(_, role, _)| *role == role_id)
            .map(|(_, _, user)| *user)
            .collect();
        holders.sort();
        Ok(holders)
    }

    async fn assigned_group_roles(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Vec<GroupRoleId>, Infallible> {
        Ok(self
            .state()
            .await
            .assignments
            .group_roles
            .iter()
            .filter(|(group, _, user)| *group == group_id && *user == user_id)
            .map(|(_, role, _)| *role)
            .collect())
    }

    async fn grant_common_role(&self, grant: &CommonRoleGrant) -> Result<bool, Infallible> {
        Ok(self.state().await.assignments.common_roles.insert(*grant))
    }

    async fn revoke_common_role(&self, grant: &CommonRoleGrant) -> Result<bool, Infallible> {
        Ok(self.state().await.assignments.common_roles.remove(grant))
    }

    async fn common_role_grants(&self, user_id: UserId) -> Result<Vec<CommonRoleGrant>, Infallible> {
        Ok(self
            .state()
            .await
            .assignments
            .common_roles
            .iter()
            .filter(|grant| grant.user_id == user_id)
            .copied()
            .collect())
    }
}
