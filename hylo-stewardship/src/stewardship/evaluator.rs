// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeSet;

use tracing::{debug, info};

use crate::catalog::GroupRole;
use crate::stewardship::{Authority, EngineResult, Stewardship, StewardshipStore};
use crate::threshold::{Decision, Evaluation, role_status};
use crate::types::{GroupId, GroupRoleId, UserId};

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    /// Re-evaluate every trustee and holder of a role and refresh its cached threshold state.
    ///
    /// Admin-assigned roles are returned unchanged.
    pub async fn recalculate_role(&self, role_id: GroupRoleId) -> EngineResult<GroupRole, S> {
        self.atomic(async || {
            let role = self.load_role(role_id).await?;
            self.evaluate_role(role).await
        })
        .await
    }

    /// Re-evaluate all roles of a group.
    ///
    /// Needs to run whenever the number of active members changed as percentage and scaled
    /// thresholds depend on it. Joining and leaving members trigger this automatically.
    pub async fn recalculate_group(&self, group_id: GroupId) -> EngineResult<Vec<GroupRole>, S> {
        self.atomic(async || self.evaluate_group(group_id).await)
            .await
    }

    pub(crate) async fn evaluate_group(&self, group_id: GroupId) -> EngineResult<Vec<GroupRole>, S> {
        self.load_group(group_id).await?;

        let members = self.store.active_member_count(group_id).await?;
        let retire_bootstrap = self.config.retires_bootstrap(members);

        let mut roles = Vec::new();
        for mut role in self.store.group_roles(group_id).await? {
            if role.bootstrap && retire_bootstrap {
                role.bootstrap = false;
                self.store.update_group_role(&role).await?;
                info!(
                    role = %role.id,
                    group = %group_id,
                    members,
                    "retired bootstrap role"
                );
            }
            roles.push(self.evaluate_role(role).await?);
        }

        Ok(roles)
    }

    pub(crate) async fn evaluate_role(&self, role: GroupRole) -> EngineResult<GroupRole, S> {
        if !role.is_trust_assigned() {
            return Ok(role);
        }

        let members = self.store.active_member_count(role.group_id).await?;
        let counts = self.store.trust_counts(role.id).await?;
        let holders = self.store.role_holders(role.id).await?;

        let trustees: BTreeSet<UserId> = counts.keys().chain(holders.iter()).copied().collect();
        for trustee in trustees {
            let evaluation = Evaluation::new(
                &role.threshold,
                members,
                counts.get(&trustee).copied().unwrap_or_default(),
                holders.contains(&trustee),
                role.bootstrap,
            );
            self.apply(&role, trustee, &evaluation).await?;
        }

        self.refresh_role(role).await
    }

    /// Evaluate a single trustee after a change in the ledger.
    pub(crate) async fn evaluate_trustee(
        &self,
        role: &GroupRole,
        trustee: UserId,
    ) -> EngineResult<Evaluation, S> {
        let members = self.store.active_member_count(role.group_id).await?;
        let trust_count = self.store.trust_count(role.id, trustee).await?;
        let assigned = self.store.role_holders(role.id).await?.contains(&trustee);

        let evaluation = Evaluation::new(
            &role.threshold,
            members,
            trust_count,
            assigned,
            role.bootstrap,
        );
        debug!(
            role = %role.id,
            %trustee,
            trust_count,
            required = evaluation.threshold_required,
            "evaluated trustee"
        );

        self.apply(role, trustee, &evaluation).await?;
        self.refresh_role(role.clone()).await?;

        Ok(evaluation)
    }

    async fn apply(
        &self,
        role: &GroupRole,
        trustee: UserId,
        evaluation: &Evaluation,
    ) -> EngineResult<(), S> {
        match evaluation.decision() {
            Decision::Grant => {
                // Only active members can hold roles.
                if !self.is_active_member(role.group_id, trustee).await? {
                    debug!(role = %role.id, %trustee, "skip grant for inactive member");
                    return Ok(());
                }
                let group = self.load_group(role.group_id).await?;
                self.write_assignment(Authority::ThresholdEvaluator, &group, role, trustee, true)
                    .await?;
            }
            Decision::Revoke => {
                let group = self.load_group(role.group_id).await?;
                self.write_assignment(Authority::ThresholdEvaluator, &group, role, trustee, false)
                    .await?;
            }
            Decision::Keep => (),
        }
        Ok(())
    }

    /// Update the cached threshold numbers and the status of a trust-assigned role.
    pub(crate) async fn refresh_role(&self, mut role: GroupRole) -> EngineResult<GroupRole, S> {
        if !role.is_trust_assigned() {
            return Ok(role);
        }

        let members = self.store.active_member_count(role.group_id).await?;
        let counts = self.store.trust_counts(role.id).await?;
        let holders = self.store.role_holders(role.id).await?;

        let threshold_required = role.threshold.required(members);
        let threshold_current = counts.values().copied().max().unwrap_or_default();
        let status = role_status(holders.len(), !counts.is_empty());

        if role.threshold_required == threshold_required
            && role.threshold_current == threshold_current
            && role.status == status
        {
            return Ok(role);
        }

        if role.status != status {
            info!(
                role = %role.id,
                group = %role.group_id,
                from = %role.status,
                to = %status,
                "role status changed"
            );
        }

        role.threshold_required = threshold_required;
        role.threshold_current = threshold_current;
        role.status = status;
        self.store.update_group_role(&role).await?;

        Ok(role)
    }
}
