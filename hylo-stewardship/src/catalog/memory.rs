// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::{BTreeMap, BTreeSet};
use std::convert::Infallible;

use crate::catalog::{
    CatalogStore, CommonRole, GroupRole, NewCommonRole, NewGroupRole, NewResponsibility,
    Responsibility, RoleRef,
};
use crate::memory::MemoryStore;
use crate::types::{
    CommonRoleId, GroupId, GroupRoleId, ResponsibilityId, ResponsibilityType, RoleStatus,
};

#[derive(Clone, Debug, Default)]
pub(crate) struct CatalogTables {
    responsibilities: BTreeMap<ResponsibilityId, Responsibility>,
    common_roles: BTreeMap<CommonRoleId, CommonRole>,
    group_roles: BTreeMap<GroupRoleId, GroupRole>,
    role_responsibilities: BTreeSet<(RoleRef, ResponsibilityId)>,
}

impl CatalogStore for MemoryStore {
    async fn insert_responsibility(
        &self,
        responsibility: &NewResponsibility,
    ) -> Result<Responsibility, Infallible> {
        let mut state = self.state().await;
        if responsibility.kind == ResponsibilityType::System {
            let existing = state.catalog.responsibilities.values().find(|existing| {
                existing.kind == ResponsibilityType::System
                    && existing.title == responsibility.title
            });
            if let Some(existing) = existing {
                return Ok(existing.clone());
            }
        }

        let responsibility = Responsibility {
            id: ResponsibilityId::new(state.next_id()),
            title: responsibility.title.clone(),
            description: responsibility.description.clone(),
            kind: responsibility.kind,
            group_id: responsibility.group_id,
        };
        state
            .catalog
            .responsibilities
            .insert(responsibility.id, responsibility.clone());
        Ok(responsibility)
    }

    async fn responsibility(
        &self,
        id: ResponsibilityId,
    ) -> Result<Option<Responsibility>, Infallible> {
        Ok(self.state().await.catalog.responsibilities.get(&id).cloned())
    }

    async fn system_responsibility(
        &self,
        title: &str,
    ) -> Result<Option<Responsibility>, Infallible> {
        Ok(self
            .state()
            .await
            .catalog
            .responsibilities
            .values()
            .find(|responsibility| {
                responsibility.kind == ResponsibilityType::System && responsibility.title == title
            })
            .cloned())
    }

    async fn group_responsibilities(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<Responsibility>, Infallible> {
        Ok(self
            .state()
            .await
            .catalog
            .responsibilities
            .values()
            .filter(|responsibility| {
                responsibility.group_id.is_none() || responsibility.group_id == Some(group_id)
            })
            .cloned()
            .collect())
    }

    async fn insert_common_role(&self, role: &NewCommonRole) -> Result<CommonRole, Infallible> {
        let mut state = self.state().await;
        let role = CommonRole {
            id: CommonRoleId::new(state.next_id()),
            name: role.name.clone(),
            emoji: role.emoji.clone(),
            description: role.description.clone(),
        };
        state.catalog.common_roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn common_role(&self, id: CommonRoleId) -> Result<Option<CommonRole>, Infallible> {
        Ok(self.state().await.catalog.common_roles.get(&id).cloned())
    }

    async fn common_roles(&self) -> Result<Vec<CommonRole>, Infallible> {
        Ok(self
            .state()
            .await
            .catalog
            .common_roles
            .values()
            .cloned()
            .collect())
    }

    async fn update_common_role(&self, role: &CommonRole) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        match state.catalog.common_roles.get_mut(&role.id) {
            Some(existing) => {
                *existing = role.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn insert_group_role(&self, role: &NewGroupRole) -> Result<GroupRole, Infallible> {
        let mut state = self.state().await;
        let role = GroupRole {
            id: GroupRoleId::new(state.next_id()),
            group_id: role.group_id,
            name: role.name.clone(),
            description: role.description.clone(),
            emoji: role.emoji.clone(),
            active: true,
            assignment: role.assignment,
            status: RoleStatus::Vacant,
            threshold: role.threshold,
            threshold_required: 0,
            threshold_current: 0,
            bootstrap: role.bootstrap,
            allow_self_voting: role.allow_self_voting,
        };
        state.catalog.group_roles.insert(role.id, role.clone());
        Ok(role)
    }

    async fn group_role(&self, id: GroupRoleId) -> Result<Option<GroupRole>, Infallible> {
        Ok(self.state().await.catalog.group_roles.get(&id).cloned())
    }

    async fn group_roles(&self, group_id: GroupId) -> Result<Vec<GroupRole>, Infallible> {
        Ok(self
            .state()
            .await
            .catalog
            .group_roles
            .values()
            .filter(|role| role.group_id == group_id)
            .cloned()
            .collect())
    }

    async fn update_group_role(&self, role: &GroupRole) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        match state.catalog.group_roles.get_mut(&role.id) {
            Some(existing) => {
                // The owning group of a role never changes.
                let group_id = existing.group_id;
                *existing = GroupRole {
                    group_id,
                    ..role.clone()
                };
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn attach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> Result<bool, Infallible> {
        Ok(self
            .state()
            .await
            .catalog
            .role_responsibilities
            .insert((role, responsibility_id)))
    }

    async fn detach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> Result<bool, Infallible> {
        Ok(self
            .state()
            .await
            .catalog
            .role_responsibilities
            .remove(&(role, responsibility_id)))
    }

    async fn role_responsibilities(&self, role: RoleRef) -> Result<Vec<Responsibility>, Infallible> {
        let state = self.state().await;
        Ok(state
            .catalog
            .role_responsibilities
            .iter()
            .filter(|(attached_to, _)| *attached_to == role)
            .filter_map(|(_, id)| state.catalog.responsibilities.get(id))
            .cloned()
            .collect())
    }
}
