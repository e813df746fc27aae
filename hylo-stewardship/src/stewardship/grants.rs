// SPDX-License-Identifier: MIT OR Apache-2.0

use std::error::Error;

use tracing::{debug, info};

use crate::assignments::CommonRoleGrant;
use crate::catalog::GroupRole;
use crate::error::StewardshipError;
use crate::groups::Group;
use crate::stewardship::{Authority, EngineResult, Stewardship, StewardshipStore};
use crate::types::{Assignment, GroupId, GroupMode, GroupRoleId, UserId};

/// Check if the authority may write assignments of the role.
///
/// This is the only place deciding who changes which assignments:
///
/// - administrators hand out admin-assigned roles of admined groups
/// - the threshold evaluator hands out trust-assigned roles
/// - the bootstrap override hands out trust-assigned roles while they are marked as bootstrap
pub(crate) fn authorize<E: Error>(
    authority: Authority,
    group: &Group,
    role: &GroupRole,
) -> Result<(), StewardshipError<E>> {
    let allowed = match authority {
        Authority::Admin => {
            group.mode == GroupMode::Admined && role.assignment == Assignment::Admin
        }
        Authority::ThresholdEvaluator => role.assignment == Assignment::Trust,
        Authority::BootstrapOverride => role.assignment == Assignment::Trust && role.bootstrap,
    };

    if allowed {
        Ok(())
    } else {
        Err(StewardshipError::UnauthorizedGrant {
            group: group.id,
            role: role.id,
            authority: authority.as_str(),
        })
    }
}

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    /// Grant an admin-assigned role of an admined group to a member.
    ///
    /// Returns `false` when the member holds the role already.
    pub async fn grant(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> EngineResult<bool, S> {
        self.atomic(async || {
            let group = self.load_active_group(group_id).await?;
            let role = self.load_active_group_role(group_id, role_id).await?;
            self.write_assignment(Authority::Admin, &group, &role, user_id, true)
                .await
        })
        .await
    }

    /// Revoke an admin-assigned role of an admined group.
    ///
    /// Returns `false` when the user did not hold the role.
    pub async fn revoke(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> EngineResult<bool, S> {
        self.atomic(async || {
            let group = self.load_active_group(group_id).await?;
            let role = self.load_group_role(group_id, role_id).await?;
            self.write_assignment(Authority::Admin, &group, &role, user_id, false)
                .await
        })
        .await
    }

    /// Grant a bootstrap role without trust expressions.
    pub async fn bootstrap_grant(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> EngineResult<bool, S> {
        self.atomic(async || {
            let group = self.load_active_group(group_id).await?;
            let role = self.load_active_group_role(group_id, role_id).await?;
            let changed = self
                .write_assignment(Authority::BootstrapOverride, &group, &role, user_id, true)
                .await?;
            self.refresh_role(role).await?;
            Ok(changed)
        })
        .await
    }

    /// Revoke a bootstrap role from a holder.
    pub async fn bootstrap_revoke(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> EngineResult<bool, S> {
        self.atomic(async || {
            let group = self.load_active_group(group_id).await?;
            let role = self.load_group_role(group_id, role_id).await?;
            let changed = self
                .write_assignment(Authority::BootstrapOverride, &group, &role, user_id, false)
                .await?;
            self.refresh_role(role).await?;
            Ok(changed)
        })
        .await
    }

    /// Current holders of a group role, ordered.
    pub async fn role_holders(&self, role_id: GroupRoleId) -> EngineResult<Vec<UserId>, S> {
        self.atomic(async || {
            self.load_role(role_id).await?;
            Ok(self.store.role_holders(role_id).await?)
        })
        .await
    }

    /// Hand out a common role, platform-wide or scoped to a group.
    ///
    /// Scoped grants require an active membership in the group.
    pub async fn grant_common_role(&self, grant: CommonRoleGrant) -> EngineResult<bool, S> {
        self.atomic(async || {
            self.load_common_role(grant.common_role_id).await?;
            if let Some(group_id) = grant.group_id {
                self.load_active_group(group_id).await?;
                self.require_active_member(group_id, grant.user_id).await?;
            }

            let granted = self.store.grant_common_role(&grant).await?;
            if granted {
                info!(
                    common_role = %grant.common_role_id,
                    user = %grant.user_id,
                    group = ?grant.group_id,
                    "granted common role"
                );
            }
            Ok(granted)
        })
        .await
    }

    pub async fn revoke_common_role(&self, grant: CommonRoleGrant) -> EngineResult<bool, S> {
        self.atomic(async || {
            self.load_common_role(grant.common_role_id).await?;

            let revoked = self.store.revoke_common_role(&grant).await?;
            if revoked {
                info!(
                    common_role = %grant.common_role_id,
                    user = %grant.user_id,
                    group = ?grant.group_id,
                    "revoked common role"
                );
            }
            Ok(revoked)
        })
        .await
    }

    /// Assign or unassign a group role after checking the authority.
    ///
    /// Both directions are idempotent and report `false` when nothing changed.
    pub(crate) async fn write_assignment(
        &self,
        authority: Authority,
        group: &Group,
        role: &GroupRole,
        user_id: UserId,
        assign: bool,
    ) -> EngineResult<bool, S> {
        authorize(authority, group, role)?;

        let changed = if assign {
            self.require_active_member(group.id, user_id).await?;
            self.store
                .assign_group_role(group.id, role.id, user_id)
                .await?
        } else {
            self.store
                .unassign_group_role(group.id, role.id, user_id)
                .await?
        };

        if changed {
            info!(
                group = %group.id,
                role = %role.id,
                user = %user_id,
                authority = authority.as_str(),
                "{} role",
                if assign { "granted" } else { "revoked" }
            );
        } else {
            debug!(group = %group.id, role = %role.id, user = %user_id, assign, "assignment unchanged");
        }

        Ok(changed)
    }
}
