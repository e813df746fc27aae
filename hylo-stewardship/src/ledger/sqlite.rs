// SPDX-License-Identifier: MIT OR Apache-2.0

use std::collections::BTreeMap;

use sqlx::{FromRow, query, query_as, query_scalar};

use crate::ledger::{TrustExpression, TrustKey, TrustStore};
use crate::sqlite::{DecodeError, SqliteError, SqliteStore, decode_u32};
use crate::types::{GroupId, GroupRoleId, TrustExpressionId, UserId};

impl TrustStore for SqliteStore {
    async fn insert_trust_expression(
        &self,
        key: &TrustKey,
        created_at: u64,
    ) -> Result<bool, SqliteError> {
        let created_at = i64::try_from(created_at)
            .map_err(|_| SqliteError::Decode("created_at".into(), DecodeError::OutOfRange))?;

        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT OR IGNORE
                    INTO
                        trust_expressions_v1 (
                            group_id,
                            group_role_id,
                            trustor_id,
                            trustee_id,
                            created_at
                        )
                    VALUES
                        (?, ?, ?, ?, ?)
                    ",
                )
                .bind(key.group_id.as_i64())
                .bind(key.role_id.as_i64())
                .bind(key.trustor_id.as_i64())
                .bind(key.trustee_id.as_i64())
                .bind(created_at)
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_trust_expression(&self, key: &TrustKey) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    DELETE FROM
                        trust_expressions_v1
                    WHERE
                        group_id = ?
                        AND group_role_id = ?
                        AND trustor_id = ?
                        AND trustee_id = ?
                    ",
                )
                .bind(key.group_id.as_i64())
                .bind(key.role_id.as_i64())
                .bind(key.trustor_id.as_i64())
                .bind(key.trustee_id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn delete_member_trust(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<u64, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    DELETE FROM
                        trust_expressions_v1
                    WHERE
                        group_id = ?
                        AND (trustor_id = ? OR trustee_id = ?)
                    ",
                )
                .bind(group_id.as_i64())
                .bind(user_id.as_i64())
                .bind(user_id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected())
    }

    async fn trust_expressions(
        &self,
        role_id: GroupRoleId,
    ) -> Result<Vec<TrustExpression>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, TrustExpressionRow>(
                    "
                    SELECT
                        id,
                        group_id,
                        group_role_id,
                        trustor_id,
                        trustee_id,
                        created_at
                    FROM
                        trust_expressions_v1
                    WHERE
                        group_role_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(role_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(TrustExpression::try_from).collect()
    }

    async fn trust_given_by(
        &self,
        role_id: GroupRoleId,
        trustor_id: UserId,
    ) -> Result<Vec<TrustExpression>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, TrustExpressionRow>(
                    "
                    SELECT
                        id,
                        group_id,
                        group_role_id,
                        trustor_id,
                        trustee_id,
                        created_at
                    FROM
                        trust_expressions_v1
                    WHERE
                        group_role_id = ?
                        AND trustor_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(role_id.as_i64())
                .bind(trustor_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(TrustExpression::try_from).collect()
    }

    async fn trust_count(
        &self,
        role_id: GroupRoleId,
        trustee_id: UserId,
    ) -> Result<u32, SqliteError> {
        let count = self
            .read(async |conn| {
                let count = query_scalar::<_, i64>(
                    "
                    SELECT
                        COUNT(*)
                    FROM
                        trust_expressions_v1
                    WHERE
                        group_role_id = ?
                        AND trustee_id = ?
                        AND trustor_id != trustee_id
                    ",
                )
                .bind(role_id.as_i64())
                .bind(trustee_id.as_i64())
                .fetch_one(&mut *conn)
                .await?;
                Ok(count)
            })
            .await?;

        decode_u32("count", count)
    }

    async fn trust_counts(
        &self,
        role_id: GroupRoleId,
    ) -> Result<BTreeMap<UserId, u32>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, (i64, i64)>(
                    "
                    SELECT
                        trustee_id,
                        COUNT(*)
                    FROM
                        trust_expressions_v1
                    WHERE
                        group_role_id = ?
                        AND trustor_id != trustee_id
                    GROUP BY
                        trustee_id
                    ",
                )
                .bind(role_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        rows.into_iter()
            .map(|(trustee_id, count)| Ok((UserId::new(trustee_id), decode_u32("count", count)?)))
            .collect()
    }

    async fn volunteers(&self, role_id: GroupRoleId) -> Result<Vec<UserId>, SqliteError> {
        let user_ids = self
            .read(async |conn| {
                let user_ids = query_scalar::<_, i64>(
                    "
                    SELECT
                        trustee_id
                    FROM
                        trust_expressions_v1
                    WHERE
                        group_role_id = ?
                        AND trustor_id = trustee_id
                    ORDER BY
                        trustee_id
                    ",
                )
                .bind(role_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(user_ids)
            })
            .await?;

        Ok(user_ids.into_iter().map(UserId::new).collect())
    }

    async fn last_trust_change(&self, key: &TrustKey) -> Result<Option<u64>, SqliteError> {
        let changed_at = self
            .read(async |conn| {
                let changed_at = query_scalar::<_, i64>(
                    "
                    SELECT
                        changed_at
                    FROM
                        trust_changes_v1
                    WHERE
                        group_id = ?
                        AND group_role_id = ?
                        AND trustor_id = ?
                        AND trustee_id = ?
                    ",
                )
                .bind(key.group_id.as_i64())
                .bind(key.role_id.as_i64())
                .bind(key.trustor_id.as_i64())
                .bind(key.trustee_id.as_i64())
                .fetch_optional(&mut *conn)
                .await?;
                Ok(changed_at)
            })
            .await?;

        changed_at
            .map(|changed_at| {
                u64::try_from(changed_at)
                    .map_err(|_| SqliteError::Decode("changed_at".into(), DecodeError::OutOfRange))
            })
            .transpose()
    }

    async fn record_trust_change(
        &self,
        key: &TrustKey,
        changed_at: u64,
    ) -> Result<(), SqliteError> {
        let changed_at = i64::try_from(changed_at)
            .map_err(|_| SqliteError::Decode("changed_at".into(), DecodeError::OutOfRange))?;

        self.tx(async |conn| {
            query(
                "
                INSERT INTO
                    trust_changes_v1 (
                        group_id,
                        group_role_id,
                        trustor_id,
                        trustee_id,
                        changed_at
                    )
                VALUES
                    (?, ?, ?, ?, ?)
                ON CONFLICT (group_id, group_role_id, trustor_id, trustee_id)
                DO UPDATE SET
                    changed_at = excluded.changed_at
                ",
            )
            .bind(key.group_id.as_i64())
            .bind(key.role_id.as_i64())
            .bind(key.trustor_id.as_i64())
            .bind(key.trustee_id.as_i64())
            .bind(changed_at)
            .execute(&mut *conn)
            .await?;
            Ok(())
        })
        .await
    }
}

#[derive(Debug, FromRow)]
struct TrustExpressionRow {
    id: i64,
    group_id: i64,
    group_role_id: i64,
    trustor_id: i64,
    trustee_id: i64,
    created_at: i64,
}

impl TryFrom<TrustExpressionRow> for TrustExpression {
    type Error = SqliteError;

    fn try_from(row: TrustExpressionRow) -> Result<Self, Self::Error> {
        Ok(TrustExpression {
            id: TrustExpressionId::new(row.id),
            group_id: GroupId::new(row.group_id),
            role_id: GroupRoleId::new(row.group_role_id),
            trustor_id: UserId::new(row.trustor_id),
            trustee_id: UserId::new(row.trustee_id),
            created_at: u64::try_from(row.created_at)
                .map_err(|_| SqliteError::Decode("created_at".into(), DecodeError::OutOfRange))?,
        })
    }
}
