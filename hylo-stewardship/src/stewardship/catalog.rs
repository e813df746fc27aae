// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info};

use crate::catalog::{
    CommonRole, GroupRole, NewCommonRole, NewGroupRole, NewResponsibility, Responsibility, RoleRef,
};
use crate::error::StewardshipError;
use crate::stewardship::{EngineResult, Stewardship, StewardshipStore};
use crate::types::{Assignment, CommonRoleId, GroupId, GroupRoleId, ResponsibilityId};

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    /// Add a responsibility to the catalog.
    ///
    /// Custom responsibilities scoped to a group require the group to exist. Creating a system
    /// responsibility with a known title returns the existing one.
    pub async fn create_responsibility(
        &self,
        responsibility: NewResponsibility,
    ) -> EngineResult<Responsibility, S> {
        self.atomic(async || {
            if let Some(group_id) = responsibility.group_id {
                self.load_active_group(group_id).await?;
            }
            let responsibility = self.store.insert_responsibility(&responsibility).await?;
            debug!(id = %responsibility.id, title = %responsibility.title, "created responsibility");
            Ok(responsibility)
        })
        .await
    }

    pub async fn create_common_role(&self, role: NewCommonRole) -> EngineResult<CommonRole, S> {
        self.atomic(async || {
            let role = self.store.insert_common_role(&role).await?;
            debug!(id = %role.id, name = %role.name, "created common role");
            Ok(role)
        })
        .await
    }

    pub async fn rename_common_role(
        &self,
        role_id: CommonRoleId,
        name: &str,
    ) -> EngineResult<CommonRole, S> {
        self.atomic(async || {
            let mut role = self.load_common_role(role_id).await?;
            role.name = name.to_string();
            self.store.update_common_role(&role).await?;
            Ok(role)
        })
        .await
    }

    /// Add a role to a group.
    ///
    /// Trust-assigned roles can only be created in self-stewarded groups, admin-assigned roles
    /// only in admined groups.
    pub async fn create_group_role(&self, role: NewGroupRole) -> EngineResult<GroupRole, S> {
        self.atomic(async || {
            let group = self.load_active_group(role.group_id).await?;
            match role.assignment {
                Assignment::Trust if !group.is_self_stewarded() => {
                    return Err(StewardshipError::NotSelfStewarded(group.id));
                }
                Assignment::Admin if group.is_self_stewarded() => {
                    return Err(StewardshipError::NotAdmined(group.id));
                }
                _ => (),
            }

            let role = self.store.insert_group_role(&role).await?;
            debug!(id = %role.id, group = %role.group_id, name = %role.name, "created group role");
            self.refresh_role(role).await
        })
        .await
    }

    pub async fn rename_group_role(
        &self,
        role_id: GroupRoleId,
        name: &str,
    ) -> EngineResult<GroupRole, S> {
        self.atomic(async || {
            let mut role = self.load_role(role_id).await?;
            role.name = name.to_string();
            self.store.update_group_role(&role).await?;
            Ok(role)
        })
        .await
    }

    /// Activate or deactivate a group role.
    ///
    /// Holders of inactive roles keep their assignment but don't gain any responsibilities from
    /// it, inactive roles can not receive trust.
    pub async fn set_group_role_active(
        &self,
        role_id: GroupRoleId,
        active: bool,
    ) -> EngineResult<GroupRole, S> {
        self.atomic(async || {
            let mut role = self.load_role(role_id).await?;
            if role.active != active {
                role.active = active;
                self.store.update_group_role(&role).await?;
                info!(id = %role.id, group = %role.group_id, active, "changed group role activity");
            }
            Ok(role)
        })
        .await
    }

    /// Attach a responsibility to a role.
    ///
    /// Returns `false` when it was attached already. Custom responsibilities of one group can not
    /// be attached to roles of another group or to common roles.
    pub async fn attach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> EngineResult<bool, S> {
        self.atomic(async || {
            let scope = self.role_scope(role).await?;
            let responsibility = self
                .store
                .responsibility(responsibility_id)
                .await?
                .filter(|responsibility| {
                    responsibility.group_id.is_none() || responsibility.group_id == scope
                })
                .ok_or(StewardshipError::ResponsibilityNotFound(responsibility_id))?;

            let attached = self
                .store
                .attach_responsibility(role, responsibility.id)
                .await?;
            if attached {
                debug!(%role, title = %responsibility.title, "attached responsibility");
            }
            Ok(attached)
        })
        .await
    }

    /// Detach a responsibility from a role.
    ///
    /// Returns `false` when it was not attached.
    pub async fn detach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> EngineResult<bool, S> {
        self.atomic(async || {
            self.role_scope(role).await?;
            let detached = self
                .store
                .detach_responsibility(role, responsibility_id)
                .await?;
            if detached {
                debug!(%role, responsibility = %responsibility_id, "detached responsibility");
            }
            Ok(detached)
        })
        .await
    }

    /// Responsibilities carried by a role, ordered by id.
    pub async fn list_responsibilities(&self, role: RoleRef) -> EngineResult<Vec<Responsibility>, S> {
        self.atomic(async || {
            self.role_scope(role).await?;
            Ok(self.store.role_responsibilities(role).await?)
        })
        .await
    }

    /// System responsibilities plus the custom ones of the group.
    pub async fn list_group_responsibilities(
        &self,
        group_id: GroupId,
    ) -> EngineResult<Vec<Responsibility>, S> {
        self.atomic(async || {
            self.load_group(group_id).await?;
            Ok(self.store.group_responsibilities(group_id).await?)
        })
        .await
    }

    pub async fn list_group_roles(&self, group_id: GroupId) -> EngineResult<Vec<GroupRole>, S> {
        self.atomic(async || {
            self.load_group(group_id).await?;
            Ok(self.store.group_roles(group_id).await?)
        })
        .await
    }

    pub async fn list_common_roles(&self) -> EngineResult<Vec<CommonRole>, S> {
        self.atomic(async || Ok(self.store.common_roles().await?))
            .await
    }

    pub async fn group_role(&self, role_id: GroupRoleId) -> EngineResult<GroupRole, S> {
        self.atomic(async || self.load_role(role_id).await).await
    }

    /// Trust-assigned group role mirroring a common role inside a self-stewarded group.
    ///
    /// The mirror carries name, emoji, description and responsibilities of the common role and is
    /// created on first use. Members vote on it like on any other trust-assigned role.
    pub async fn trust_role_for_common_role(
        &self,
        common_role_id: CommonRoleId,
        group_id: GroupId,
    ) -> EngineResult<GroupRole, S> {
        self.atomic(async || {
            let common_role = self.load_common_role(common_role_id).await?;
            let group = self.load_active_group(group_id).await?;
            if !group.is_self_stewarded() {
                return Err(StewardshipError::NotSelfStewarded(group_id));
            }

            let existing = self
                .store
                .group_roles(group_id)
                .await?
                .into_iter()
                .find(|role| role.is_trust_assigned() && role.name == common_role.name);
            if let Some(role) = existing {
                return Ok(role);
            }

            let mut new_role = NewGroupRole::new(group_id, &common_role.name)
                .trust(self.config.default_threshold);
            new_role.emoji = common_role.emoji.clone();
            new_role.description = common_role.description.clone();
            let role = self.store.insert_group_role(&new_role).await?;

            for responsibility in self
                .store
                .role_responsibilities(RoleRef::Common(common_role_id))
                .await?
            {
                self.store
                    .attach_responsibility(RoleRef::Group(role.id), responsibility.id)
                    .await?;
            }

            info!(
                common_role = %common_role_id,
                group = %group_id,
                role = %role.id,
                "created trust role for common role"
            );
            self.refresh_role(role).await
        })
        .await
    }

    pub(crate) async fn load_common_role(
        &self,
        role_id: CommonRoleId,
    ) -> EngineResult<CommonRole, S> {
        self.store
            .common_role(role_id)
            .await?
            .ok_or(StewardshipError::CommonRoleNotFound(role_id))
    }

    /// Check that the role exists and return the group its custom responsibilities may come from.
    async fn role_scope(&self, role: RoleRef) -> EngineResult<Option<GroupId>, S> {
        match role {
            RoleRef::Common(role_id) => {
                self.load_common_role(role_id).await?;
                Ok(None)
            }
            RoleRef::Group(role_id) => Ok(Some(self.load_role(role_id).await?.group_id)),
        }
    }
}
