// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, info};

use crate::catalog::{
    ADD_MEMBERS, ADMINISTRATION, GroupRole, MANAGE_CONTENT, NewGroupRole, NewResponsibility,
    REMOVE_MEMBERS, RoleRef,
};
use crate::error::StewardshipError;
use crate::groups::{Group, GroupSettings, Membership};
use crate::stewardship::{Authority, EngineResult, Stewardship, StewardshipStore};
use crate::types::{GroupId, UserId, now};

/// Roles seeded into every new self-stewarded group, each carrying the system responsibility of
/// the same title.
const BOOTSTRAP_ROLES: [&str; 4] = [ADMINISTRATION, ADD_MEMBERS, REMOVE_MEMBERS, MANAGE_CONTENT];

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    /// Register a group with its creator as first member.
    ///
    /// Self-stewarded groups are seeded with bootstrap roles for administration, adding members,
    /// removing members and managing content. The creator holds all of them until trust or the
    /// bootstrap retirement takes over. Returns the seeded roles.
    pub async fn create_group(
        &self,
        group: Group,
        creator: UserId,
    ) -> EngineResult<Vec<GroupRole>, S> {
        self.atomic(async || {
            if !self.store.insert_group(&group).await? {
                return Err(StewardshipError::GroupExists(group.id));
            }
            self.store
                .upsert_membership(&Membership::new(group.id, creator, now()))
                .await?;
            info!(group = %group.id, mode = %group.mode, %creator, "created group");

            if !group.is_self_stewarded() {
                return Ok(Vec::new());
            }

            let mut roles = Vec::with_capacity(BOOTSTRAP_ROLES.len());
            for title in BOOTSTRAP_ROLES {
                let responsibility = self
                    .store
                    .insert_responsibility(&NewResponsibility::system(title))
                    .await?;
                let role = self
                    .store
                    .insert_group_role(
                        &NewGroupRole::new(group.id, title)
                            .trust(self.config.default_threshold)
                            .bootstrap(true),
                    )
                    .await?;
                self.store
                    .attach_responsibility(RoleRef::Group(role.id), responsibility.id)
                    .await?;
                self.write_assignment(Authority::BootstrapOverride, &group, &role, creator, true)
                    .await?;
                roles.push(self.refresh_role(role).await?);
            }

            Ok(roles)
        })
        .await
    }

    pub async fn group(&self, group_id: GroupId) -> EngineResult<Group, S> {
        self.atomic(async || self.load_group(group_id).await)
            .await
    }

    /// Change the governance settings of a group.
    pub async fn update_group_settings(
        &self,
        group_id: GroupId,
        settings: GroupSettings,
    ) -> EngineResult<Group, S> {
        self.atomic(async || {
            let mut group = self.load_group(group_id).await?;
            group.settings = settings;
            self.store.update_group(&group).await?;
            debug!(group = %group_id, ?settings, "updated group settings");
            Ok(group)
        })
        .await
    }

    /// Activate or deactivate a group.
    ///
    /// Inactive groups keep memberships, roles and trust but reject changes to them. Their group
    /// roles and scoped common roles don't resolve to any responsibilities until the group is
    /// activated again.
    pub async fn set_group_active(
        &self,
        group_id: GroupId,
        active: bool,
    ) -> EngineResult<Group, S> {
        self.atomic(async || {
            let mut group = self.load_group(group_id).await?;
            if group.active != active {
                group.active = active;
                self.store.update_group(&group).await?;
                info!(group = %group_id, active, "changed group activity");
            }
            Ok(group)
        })
        .await
    }

    /// Active members of a group, ordered.
    pub async fn members(&self, group_id: GroupId) -> EngineResult<Vec<UserId>, S> {
        self.atomic(async || {
            self.load_group(group_id).await?;
            Ok(self.store.active_members(group_id).await?)
        })
        .await
    }

    /// Add a member to a group and re-evaluate all roles of it.
    ///
    /// Returns `false` when the user is an active member already. Former members rejoin with a
    /// fresh membership age.
    pub async fn join_group(&self, group_id: GroupId, user_id: UserId) -> EngineResult<bool, S> {
        self.atomic(async || {
            self.load_active_group(group_id).await?;

            let previous = self.store.membership(group_id, user_id).await?;
            if previous.as_ref().is_some_and(|membership| membership.active) {
                return Ok(false);
            }

            let mut membership = Membership::new(group_id, user_id, now());
            membership.nav_order = previous.and_then(|membership| membership.nav_order);
            self.store.upsert_membership(&membership).await?;
            info!(group = %group_id, user = %user_id, "member joined");

            self.evaluate_group(group_id).await?;
            Ok(true)
        })
        .await
    }

    /// Remove a member from a group and re-evaluate all roles of it.
    ///
    /// Trust given and received by the member in this group is withdrawn and all group role
    /// assignments of the member are removed. Returns `false` when the user was no active member.
    pub async fn leave_group(&self, group_id: GroupId, user_id: UserId) -> EngineResult<bool, S> {
        self.atomic(async || {
            self.load_group(group_id).await?;

            if !self.store.deactivate_membership(group_id, user_id).await? {
                return Ok(false);
            }

            let withdrawn = self.store.delete_member_trust(group_id, user_id).await?;
            let unassigned = self.store.unassign_member(group_id, user_id).await?;
            info!(
                group = %group_id,
                user = %user_id,
                withdrawn,
                unassigned,
                "member left"
            );

            self.evaluate_group(group_id).await?;
            Ok(true)
        })
        .await
    }
}
