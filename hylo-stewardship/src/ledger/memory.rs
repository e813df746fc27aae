// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;
use std::convert::Infallible;

use crate::ledger::{TrustExpression, TrustKey, TrustStore};
use crate::memory::MemoryStore;
use crate::types::{GroupId, GroupRoleId, TrustExpressionId, UserId};

#[derive(Clone, Debug, Default)]
pub(crate) struct LedgerTables {
    expressions: BTreeMap<TrustExpressionId, TrustExpression>,
    keys: BTreeMap<TrustKey, TrustExpressionId>,
    changes: BTreeMap<TrustKey, u64>,
}

impl LedgerTables {
    fn for_role(&self, role_id: GroupRoleId) -> impl Iterator<Item = &TrustExpression> {
        self.expressions
            .values()
            .filter(move |expression| expression.role_id == role_id)
    }
}

impl TrustStore for MemoryStore {
    async fn insert_trust_expression(
        &self,
        key: &TrustKey,
        created_at: u64,
    ) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        if state.ledger.keys.contains_key(key) {
            return Ok(false);
        }

        let id = TrustExpressionId::new(state.next_id());
        state.ledger.keys.insert(*key, id);
        state.ledger.expressions.insert(
            id,
            TrustExpression {
                id,
                group_id: key.group_id,
                role_id: key.role_id,
                trustor_id: key.trustor_id,
                trustee_id: key.trustee_id,
                created_at,
            },
        );
        Ok(true)
    }

    async fn delete_trust_expression(&self, key: &TrustKey) -> Result<bool, Infallible> {
        let mut state = self.state().await;
        match state.ledger.keys.remove(key) {
            Some(id) => {
                state.ledger.expressions.remove(&id);
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_member_trust(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<u64, Infallible> {
        let mut state = self.state().await;
        let ledger = &mut state.ledger;

        let before = ledger.keys.len();
        ledger.keys.retain(|key, _| {
            key.group_id != group_id || (key.trustor_id != user_id && key.trustee_id != user_id)
        });
        ledger.expressions.retain(|_, expression| {
            expression.group_id != group_id
                || (expression.trustor_id != user_id && expression.trustee_id != user_id)
        });

        Ok((before - ledger.keys.len()) as u64)
    }

    async fn trust_expressions(
        &self,
        role_id: GroupRoleId,
    ) -> Result<Vec<TrustExpression>, Infallible> {
        Ok(self
            .state()
            .await
            .ledger
            .for_role(role_id)
            .cloned()
            .collect())
    }

    async fn trust_given_by(
        &self,
        role_id: GroupRoleId,
        trustor_id: UserId,
    ) -> Result<Vec<TrustExpression>, Infallible> {
        Ok(self
            .state()
            .await
            .ledger
            .for_role(role_id)
            .filter(|expression| expression.trustor_id == trustor_id)
            .cloned()
            .collect())
    }

    async fn trust_count(
        &self,
        role_id: GroupRoleId,
        trustee_id: UserId,
    ) -> Result<u32, Infallible> {
        let count = self
            .state()
            .await
            .ledger
            .for_role(role_id)
            .filter(|expression| {
                expression.trustee_id == trustee_id && !expression.key().is_self_vote()
            })
            .count();
        Ok(u32::try_from(count).unwrap_or(u32::MAX))
    }

    async fn trust_counts(
        &self,
        role_id: GroupRoleId,
    ) -> Result<BTreeMap<UserId, u32>, Infallible> {
        let state = self.state().await;
        let mut counts: BTreeMap<UserId, u32> = BTreeMap::new();
        for expression in state.ledger.for_role(role_id) {
            if expression.key().is_self_vote() {
                continue;
            }
            *counts.entry(expression.trustee_id).or_default() += 1;
        }
        Ok(counts)
    }

    async fn volunteers(&self, role_id: GroupRoleId) -> Result<Vec<UserId>, Infallible> {
        let mut volunteers: Vec<UserId> = self
            .state()
            .await
            .ledger
            .for_role(role_id)
            .filter(|expression| expression.key().is_self_vote())
            .map(|expression| expression.trustee_id)
            .collect();
        volunteers.sort();
        Ok(volunteers)
    }

    async fn last_trust_change(&self, key: &TrustKey) -> Result<Option<u64>, Infallible> {
        Ok(self.state().await.ledger.changes.get(key).copied())
    }

    async fn record_trust_change(&self, key: &TrustKey, changed_at: u64) -> Result<(), Infallible> {
        self.state().await.ledger.changes.insert(*key, changed_at);
        Ok(())
    }
}
