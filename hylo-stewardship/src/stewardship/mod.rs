// SPDX-License-Identifier: MIT OR Apache-2.0

//! Stewardship engine combining role catalog, trust ledger, threshold evaluator, role assignments
//! and the responsibility resolver on top of one store.
//!
//! Every operation runs inside its own store transaction. Mutations validate their input, write to
//! the ledger, run the threshold evaluator and apply its grants and revokes before committing. Any
//! error rolls back all changes made during the operation.
mod catalog;
mod evaluator;
mod grants;
mod groups;
mod resolver;
mod trust;

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::assignments::AssignmentStore;
use crate::catalog::{CatalogStore, GroupRole};
use crate::config::Config;
use crate::error::StewardshipError;
use crate::groups::{Group, GroupStore, Membership};
use crate::ledger::TrustStore;
use crate::threshold::Evaluation;
use crate::traits::Transaction;
use crate::types::{GroupId, GroupRoleId, UserId};

/// Store offering everything the engine needs.
pub trait StewardshipStore: CatalogStore + GroupStore + TrustStore + AssignmentStore {}

impl<S> StewardshipStore for S where S: CatalogStore + GroupStore + TrustStore + AssignmentStore {}

pub(crate) type EngineResult<T, S> = Result<T, StewardshipError<<S as Transaction>::Error>>;

/// Result of casting a trust expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteOutcome {
    /// The expression was recorded and the trustee re-evaluated.
    Cast(Evaluation),

    /// The same trustor already expressed trust in the same trustee for this role.
    AlreadyCast,
}

/// Result of withdrawing a trust expression.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum WithdrawalOutcome {
    /// The expression was removed and the trustee re-evaluated.
    Withdrawn(Evaluation),

    /// There was nothing to withdraw.
    NotCast,
}

/// Member who volunteered for a role without holding it yet.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Candidate {
    pub user_id: UserId,

    /// Trust expressed by others, self votes excluded.
    pub trust_count: u32,
}

/// Party writing to the role assignments.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum Authority {
    /// Group administrator, only for admin-assigned roles in admined groups.
    Admin,

    /// Threshold evaluator, only for trust-assigned roles.
    ThresholdEvaluator,

    /// Seeding of new groups, only for bootstrap roles.
    BootstrapOverride,
}

impl Authority {
    pub(crate) fn as_str(&self) -> &'static str {
        match self {
            Authority::Admin => "admin",
            Authority::ThresholdEvaluator => "threshold evaluator",
            Authority::BootstrapOverride => "bootstrap override",
        }
    }
}

/// Role based responsibility resolution for groups, with roles in self-stewarded groups being
/// handed out by peer trust.
///
/// ## Example
///
/// ```rust
/// # use hylo_stewardship::{
/// #     Config, GroupId, GroupMode, MemoryStore, NewGroupRole, StewardshipError, Stewardship,
/// #     Threshold, UserId, VoteOutcome,
/// # };
/// # use hylo_stewardship::groups::Group;
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> Result<(), StewardshipError<std::convert::Infallible>> {
/// let stewardship = Stewardship::new(MemoryStore::new(), Config::default());
///
/// let group = GroupId::new(1);
/// let (alice, bob) = (UserId::new(1), UserId::new(2));
///
/// stewardship
///     .create_group(Group::new(group, GroupMode::SelfStewarded), alice)
///     .await?;
/// stewardship.join_group(group, bob).await?;
///
/// let host = stewardship
///     .create_group_role(NewGroupRole::new(group, "Host").trust(Threshold::Count(1)))
///     .await?;
///
/// let outcome = stewardship.cast_trust(group, host.id, alice, bob).await?;
/// assert!(matches!(outcome, VoteOutcome::Cast(evaluation) if evaluation.is_met()));
/// assert_eq!(stewardship.role_holders(host.id).await?, vec![bob]);
/// # Ok(())
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct Stewardship<S> {
    store: S,
    config: Config,
}

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    pub fn new(store: S, config: Config) -> Self {
        Self { store, config }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Run the given operation inside a store transaction.
    ///
    /// Commits when the operation succeeded, rolls back otherwise. A failing rollback is logged,
    /// the error of the operation is returned in that case.
    pub(crate) async fn atomic<F, R>(&self, f: F) -> EngineResult<R, S>
    where
        F: AsyncFnOnce() -> EngineResult<R, S>,
    {
        let permit = self.store.begin().await?;

        match f().await {
            Ok(value) => {
                self.store.commit(permit).await?;
                Ok(value)
            }
            Err(err) => {
                if let Err(rollback_err) = self.store.rollback(permit).await {
                    warn!(%err, %rollback_err, "rollback after failed operation failed");
                }
                Err(err)
            }
        }
    }
}

impl<S> Stewardship<S>
where
    S: StewardshipStore,
{
    pub(crate) async fn load_group(&self, group_id: GroupId) -> EngineResult<Group, S> {
        self.store
            .group(group_id)
            .await?
            .ok_or(StewardshipError::GroupNotFound(group_id))
    }

    /// Group accepting changes, inactive groups are rejected.
    pub(crate) async fn load_active_group(&self, group_id: GroupId) -> EngineResult<Group, S> {
        let group = self.load_group(group_id).await?;
        if !group.active {
            return Err(StewardshipError::GroupInactive(group_id));
        }
        Ok(group)
    }

    pub(crate) async fn load_role(&self, role_id: GroupRoleId) -> EngineResult<GroupRole, S> {
        self.store
            .group_role(role_id)
            .await?
            .ok_or(StewardshipError::RoleNotFound(role_id))
    }

    /// Role owned by the given group, active or not.
    pub(crate) async fn load_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
    ) -> EngineResult<GroupRole, S> {
        match self.store.group_role(role_id).await? {
            Some(role) if role.group_id == group_id => Ok(role),
            _ => Err(StewardshipError::RoleNotFound(role_id)),
        }
    }

    /// Role owned by the given group, inactive roles are treated as missing.
    pub(crate) async fn load_active_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
    ) -> EngineResult<GroupRole, S> {
        let role = self.load_group_role(group_id, role_id).await?;
        if !role.active {
            return Err(StewardshipError::RoleNotFound(role_id));
        }
        Ok(role)
    }

    pub(crate) async fn is_active_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> EngineResult<bool, S> {
        let membership = self.store.membership(group_id, user_id).await?;
        Ok(membership.is_some_and(|membership| membership.active))
    }

    pub(crate) async fn require_active_member(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> EngineResult<Membership, S> {
        match self.store.membership(group_id, user_id).await? {
            Some(membership) if membership.active => Ok(membership),
            _ => Err(StewardshipError::InvalidTarget {
                group: group_id,
                user: user_id,
            }),
        }
    }
}
