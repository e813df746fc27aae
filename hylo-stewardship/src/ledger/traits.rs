// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use crate::ledger::{TrustExpression, TrustKey};
use crate::traits::Transaction;
use crate::types::{GroupId, GroupRoleId, UserId};

/// Store API for the trust ledger.
pub trait TrustStore: Transaction {
    /// Record a trust expression.
    ///
    /// Returns `false` when an expression with the same key exists already.
    fn insert_trust_expression(
        &self,
        key: &TrustKey,
        created_at: u64,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove a trust expression.
    ///
    /// Returns `false` when no expression with this key existed.
    fn delete_trust_expression(
        &self,
        key: &TrustKey,
    ) -> impl Future<Output = Result<bool, Self::Error>>;

    /// Remove every expression in the group given by or given to the user.
    ///
    /// Returns the number of removed expressions.
    fn delete_member_trust(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> impl Future<Output = Result<u64, Self::Error>>;

    /// All expressions for a role, ordered by id.
    fn trust_expressions(
        &self,
        role_id: GroupRoleId,
    ) -> impl Future<Output = Result<Vec<TrustExpression>, Self::Error>>;

    /// Expressions a trustor cast for a role, ordered by id.
    fn trust_given_by(
        &self,
        role_id: GroupRoleId,
        trustor_id: UserId,
    ) -> impl Future<Output = Result<Vec<TrustExpression>, Self::Error>>;

    /// Number of expressions for the trustee, self votes excluded.
    fn trust_count(
        &self,
        role_id: GroupRoleId,
        trustee_id: UserId,
    ) -> impl Future<Output = Result<u32, Self::Error>>;

    /// Counted expressions per trustee, self votes excluded.
    ///
    /// Trustees without any counted expression are not part of the map.
    fn trust_counts(
        &self,
        role_id: GroupRoleId,
    ) -> impl Future<Output = Result<BTreeMap<UserId, u32>, Self::Error>>;

    /// Members who expressed trust in themselves for a role, ordered.
    fn volunteers(
        &self,
        role_id: GroupRoleId,
    ) -> impl Future<Output = Result<Vec<UserId>, Self::Error>>;

    /// Time of the last cast or withdrawal of this trust, if any.
    ///
    /// Change times outlive the expression they belong to.
    fn last_trust_change(
        &self,
        key: &TrustKey,
    ) -> impl Future<Output = Result<Option<u64>, Self::Error>>;

    /// Remember when this trust was cast or withdrawn, replacing the previous time.
    fn record_trust_change(
        &self,
        key: &TrustKey,
        changed_at: u64,
    ) -> impl Future<Output = Result<(), Self::Error>>;
}
