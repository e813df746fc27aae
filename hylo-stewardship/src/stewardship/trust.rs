// SPDX-License-Identifier: MIT OR Apache-2.0

use tracing::{debug, warn};

use crate::error::StewardshipError;
use crate::groups::Group;
use crate::ledger::{TrustExpression, TrustKey};
use crate::stewardship::{
    Candidate, EngineResult, Stewardship, StewardshipStore, VoteOutcome, WithdrawalOutcome,
};
use crate::types::{GroupId, GroupRoleId, UserId, now};

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    /// Express trust in a member to hold a role and re-evaluate the trustee.
    ///
    /// Expressing the same trust twice is a no-op reported as [`VoteOutcome::AlreadyCast`]. Self
    /// votes are recorded to mark volunteers but never count towards the threshold.
    pub async fn cast_trust(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        trustor_id: UserId,
        trustee_id: UserId,
    ) -> EngineResult<VoteOutcome, S> {
        self.atomic(async || {
            let group = self.load_active_group(group_id).await?;
            let role = self.load_active_group_role(group_id, role_id).await?;
            if !role.is_trust_assigned() {
                return Err(StewardshipError::RoleNotTrustAssigned(role_id));
            }
            if !group.is_self_stewarded() {
                return Err(StewardshipError::NotSelfStewarded(group_id));
            }

            let trustor = self.require_active_member(group_id, trustor_id).await?;
            self.require_active_member(group_id, trustee_id).await?;

            let key = TrustKey::new(group_id, role_id, trustor_id, trustee_id);
            let allow_self_voting = role
                .allow_self_voting
                .unwrap_or(group.settings.allow_self_voting);
            if key.is_self_vote() && !allow_self_voting {
                return Err(StewardshipError::SelfVoteDisallowed {
                    role: role_id,
                    user: trustor_id,
                });
            }

            let now = now();
            let min_age = group.settings.min_member_age_days;
            if !trustor.is_older_than(min_age, now) {
                return Err(StewardshipError::MembershipTooRecent {
                    user: trustor_id,
                    days: min_age,
                });
            }

            if !self.store.insert_trust_expression(&key, now).await? {
                debug!(?key, "trust was already expressed");
                return Ok(VoteOutcome::AlreadyCast);
            }
            self.track_trust_change(&group, &key, now).await?;
            debug!(?key, "expressed trust");

            let evaluation = self.evaluate_trustee(&role, trustee_id).await?;
            Ok(VoteOutcome::Cast(evaluation))
        })
        .await
    }

    /// Withdraw trust expressed earlier and re-evaluate the trustee.
    ///
    /// Withdrawing trust which was never expressed is a no-op reported as
    /// [`WithdrawalOutcome::NotCast`].
    pub async fn withdraw_trust(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        trustor_id: UserId,
        trustee_id: UserId,
    ) -> EngineResult<WithdrawalOutcome, S> {
        self.atomic(async || {
            let group = self.load_active_group(group_id).await?;
            let role = self.load_group_role(group_id, role_id).await?;

            let key = TrustKey::new(group_id, role_id, trustor_id, trustee_id);
            if !self.store.delete_trust_expression(&key).await? {
                return Ok(WithdrawalOutcome::NotCast);
            }
            self.track_trust_change(&group, &key, now()).await?;
            debug!(?key, "withdrew trust");

            let evaluation = self.evaluate_trustee(&role, trustee_id).await?;
            Ok(WithdrawalOutcome::Withdrawn(evaluation))
        })
        .await
    }

    /// Fails when the trustor changed this trust within the rate limit window of the group.
    ///
    /// Called after the expression was written so that no-op casts and withdrawals are never
    /// limited. The caller's transaction undoes the write on error.
    async fn track_trust_change(
        &self,
        group: &Group,
        key: &TrustKey,
        now: u64,
    ) -> EngineResult<(), S> {
        let last_change = self.store.last_trust_change(key).await?;
        if !group.settings.allows_trust_change(last_change, now) {
            warn!(?key, "trust changed too often");
            return Err(StewardshipError::TrustRateLimited {
                user: key.trustor_id,
                hours: group.settings.trust_rate_limit_hours,
            });
        }
        self.store.record_trust_change(key, now).await?;
        Ok(())
    }

    /// All trust expressed for a role, ordered by creation.
    pub async fn trust_expressions(
        &self,
        role_id: GroupRoleId,
    ) -> EngineResult<Vec<TrustExpression>, S> {
        self.atomic(async || {
            self.load_role(role_id).await?;
            Ok(self.store.trust_expressions(role_id).await?)
        })
        .await
    }

    /// Trust a member expressed for a role, ordered by creation.
    pub async fn trust_given_by(
        &self,
        role_id: GroupRoleId,
        trustor_id: UserId,
    ) -> EngineResult<Vec<TrustExpression>, S> {
        self.atomic(async || {
            self.load_role(role_id).await?;
            Ok(self.store.trust_given_by(role_id, trustor_id).await?)
        })
        .await
    }

    /// Active members who volunteered for a role and don't hold it yet.
    ///
    /// Ordered by trust count, highest first.
    pub async fn candidates(&self, role_id: GroupRoleId) -> EngineResult<Vec<Candidate>, S> {
        self.atomic(async || {
            let role = self.load_role(role_id).await?;
            let holders = self.store.role_holders(role_id).await?;
            let counts = self.store.trust_counts(role_id).await?;

            let mut candidates = Vec::new();
            for user_id in self.store.volunteers(role_id).await? {
                if holders.contains(&user_id)
                    || !self.is_active_member(role.group_id, user_id).await?
                {
                    continue;
                }
                candidates.push(Candidate {
                    user_id,
                    trust_count: counts.get(&user_id).copied().unwrap_or_default(),
                });
            }

            candidates.sort_by(|a, b| {
                b.trust_count
                    .cmp(&a.trust_count)
                    .then(a.user_id.cmp(&b.user_id))
            });
            Ok(candidates)
        })
        .await
    }
}
