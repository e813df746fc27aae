// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::groups::{Group, GroupStore, Membership};
use crate::memory::MemoryStore;
use crate::types::{GroupId, UserId};

#[derive(Clone, Debug, Default)]
pub(crate) struct GroupTables {
    groups: BTreeMap<GroupId, Group>,
    memberships: BTreeMap<(GroupId, UserId), Membership>,
}

impl GroupTables {
    fn active_members(&self, group_id: GroupId) -> impl Iterator<Item = UserId> + '_ {
        self.memberships
            .range((group_id, UserId::new(i64::MIN))..=(group_id, UserId::new(i64::MAX)))
            .filter(|(_, membership)| membership.active)
            .map(|((_, user_id), _)| *user_id)
    }
}

impl GroupStore for MemoryStore {
    async fn insert_group(&self, group: &Group) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        if state.groups.groups.contains_key(&group.id) {
            return Ok(false);
        }
        state.groups.groups.insert(group.id, group.clone());
        Ok(true)
    }

    async fn group(&self, id: GroupId) -> Result<Option<Group>, Infallible> {
        Ok(self.state().await.groups.groups.get(&id).cloned())
    }

    async fn update_group(&self, group: &Group) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        match state.groups.groups.get_mut(&group.id) {
            Some(existing) => {
                *existing = group.clone();
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn upsert_membership(&self, membership: &Membership) -> Result<(), Infallible> {
        self.state().await.groups.memberships.insert(
            (membership.group_id, membership.user_id),
            membership.clone(),
        );
        Ok(())
    }

    async fn membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<Membership>, Infallible> {
        Ok(self
            .state()
            .await
            .groups
            .memberships
            .get(&(group_id, user_id))
            .cloned())
    }

    async fn deactivate_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        match state.groups.memberships.get_mut(&(group_id, user_id)) {
            Some(membership) if membership.active => {
                membership.active = false;
                Ok(true)
            }
            _ => Ok(false),
        }
    }

    async fn active_members(&self, group_id: GroupId) -> Result<Vec<UserId>, Infallible> {
        Ok(self
            .state()
            .await
            .groups
            .active_members(group_id)
            .collect())
    }

    async fn active_member_count(&self, group_id: GroupId) -> Result<u32, Infallible> {
        let count = self.state().await.groups.active_members(group_id).count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }
}
