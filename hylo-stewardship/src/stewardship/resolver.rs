// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use tracing::trace;

use crate::catalog::{Responsibility, RoleRef};
use crate::stewardship::{EngineResult, Stewardship, StewardshipStore};
use crate::types::{GroupId, UserId};

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    /// Effective responsibilities of a user inside a group.
    ///
    /// Union of the responsibilities of
    ///
    /// 1. common roles granted to the user platform-wide
    /// 2. common roles granted to the user inside this group
    /// 3. active group roles assigned to the user inside this group
    ///
    /// The latter two only count while the user is an active member of an active group.
    pub async fn resolve(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> EngineResult<BTreeSet<Responsibility>, S> {
        self.atomic(async || self.resolve_in(user_id, group_id).await)
            .await
    }

    /// Returns true if the user carries a responsibility with the given title inside the group.
    pub async fn has_responsibility(
        &self,
        user_id: UserId,
        group_id: GroupId,
        title: &str,
    ) -> EngineResult<bool, S> {
        let responsibilities = self.resolve(user_id, group_id).await?;
        Ok(responsibilities
            .iter()
            .any(|responsibility| responsibility.title == title))
    }

    /// System responsibilities of a user across the given groups.
    pub async fn system_responsibilities(
        &self,
        user_id: UserId,
        group_ids: &[GroupId],
    ) -> EngineResult<Vec<(GroupId, Responsibility)>, S> {
        self.atomic(async || {
            let mut result = Vec::new();
            for group_id in group_ids {
                let responsibilities = self.resolve_in(user_id, *group_id).await?;
                result.extend(
                    responsibilities
                        .into_iter()
                        .filter(Responsibility::is_system)
                        .map(|responsibility| (*group_id, responsibility)),
                );
            }
            Ok(result)
        })
        .await
    }

    async fn resolve_in(
        &self,
        user_id: UserId,
        group_id: GroupId,
    ) -> EngineResult<BTreeSet<Responsibility>, S> {
        // Inactive groups only keep platform-wide grants.
        let group_active = self
            .store
            .group(group_id)
            .await?
            .is_some_and(|group| group.active);
        let is_member = group_active && self.is_active_member(group_id, user_id).await?;
        let mut responsibilities = BTreeSet::new();

        for grant in self.store.common_role_grants(user_id).await? {
            let applies = match grant.group_id {
                None => true,
                Some(_) => is_member && grant.applies_to(group_id),
            };
            if applies {
                responsibilities.extend(
                    self.store
                        .role_responsibilities(RoleRef::Common(grant.common_role_id))
                        .await?,
                );
            }
        }

        if is_member {
            for role_id in self.store.assigned_group_roles(group_id, user_id).await? {
                let Some(role) = self.store.group_role(role_id).await? else {
                    continue;
                };
                if !role.active {
                    continue;
                }
                responsibilities.extend(
                    self.store
                        .role_responsibilities(RoleRef::Group(role_id))
                        .await?,
                );
            }
        }

        trace!(
            user = %user_id,
            group = %group_id,
            count = responsibilities.len(),
            "resolved responsibilities"
        );
        Ok(responsibilities)
    }
}
