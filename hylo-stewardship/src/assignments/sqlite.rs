// SPDX-License-Identifier: MIT OR Apache-2.0

use sqlx::{query, query_as, query_scalar};

use crate::assignments::{AssignmentStore, CommonRoleGrant};
use crate::sqlite::{SqliteError, SqliteStore};
use crate::types::{CommonRoleId, GroupId, GroupRoleId, UserId};

impl AssignmentStore for SqliteStore {
    async fn assign_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT OR IGNORE
                    INTO
                        group_memberships_group_roles_v1 (
                            group_id,
                            group_role_id,
                            user_id
                        )
                    VALUES
                        (?, ?, ?)
                    ",
                )
                .bind(group_id.as_i64())
                .bind(role_id.as_i64())
                .bind(user_id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unassign_group_role(
        &self,
        group_id: GroupId,
        role_id: GroupRoleId,
        user_id: UserId,
    ) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    DELETE FROM
                        group_memberships_group_roles_v1
                    WHERE
                        group_id = ?
                        AND group_role_id = ?
                        AND user_id = ?
                    ",
                )
                .bind(group_id.as_i64())
                .bind(role_id.as_i64())
                .bind(user_id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn unassign_member(&self, group_id: GroupId, user_id: UserId) -> Result<u64, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    DELETE FROM
                        group_memberships_group_roles_v1
                    WHERE
                        group_id = ?
                        AND user_id = ?
                    ",
                )
                .bind(group_id.as_i64())
                .bind(user_id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected())
    }

    async fn role_holders(&self, role_id: GroupRoleId) -> Result<Vec<UserId>, SqliteError> {
        let user_ids = self
            .read(async |conn| {
                let user_ids = query_scalar::<_, i64>(
                    "
                    SELECT
                        user_id
                    FROM
                        group_memberships_group_roles_v1
                    WHERE
                        group_role_id = ?
                    ORDER BY
                        user_id
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

    async fn assigned_group_roles(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Vec<GroupRoleId>, SqliteError> {
        let role_ids = self
            .read(async |conn| {
                let role_ids = query_scalar::<_, i64>(
                    "
                    SELECT
                        group_role_id
                    FROM
                        group_memberships_group_roles_v1
                    WHERE
                        group_id = ?
                        AND user_id = ?
                    ORDER BY
                        group_role_id
                    ",
                )
                .bind(group_id.as_i64())
                .bind(user_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(role_ids)
            })
            .await?;

        Ok(role_ids.into_iter().map(GroupRoleId::new).collect())
    }

    async fn grant_common_role(&self, grant: &CommonRoleGrant) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT OR IGNORE
                    INTO
                        common_roles_users_v1 (
                            common_role_id,
                            user_id,
                            group_id
                        )
                    VALUES
                        (?, ?, ?)
                    ",
                )
                .bind(grant.common_role_id.as_i64())
                .bind(grant.user_id.as_i64())
                .bind(grant.group_id.map(|id| id.as_i64()))
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn revoke_common_role(&self, grant: &CommonRoleGrant) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                // `IS` also matches the NULL scope of platform-wide grants.
                let result = query(
                    "
                    DELETE FROM
                        common_roles_users_v1
                    WHERE
                        common_role_id = ?
                        AND user_id = ?
                        AND group_id IS ?
                    ",
                )
                .bind(grant.common_role_id.as_i64())
                .bind(grant.user_id.as_i64())
                .bind(grant.group_id.map(|id| id.as_i64()))
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn common_role_grants(&self, user_id: UserId) -> Result<Vec<CommonRoleGrant>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, (i64, Option<i64>)>(
                    "
                    SELECT
                        common_role_id,
                        group_id
                    FROM
                        common_roles_users_v1
                    WHERE
                        user_id = ?
                    ORDER BY
                        common_role_id,
                        group_id
                    ",
                )
                .bind(user_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        Ok(rows
            .into_iter()
            .map(|(common_role_id, group_id)| CommonRoleGrant {
                common_role_id: CommonRoleId::new(common_role_id),
                user_id,
                group_id: group_id.map(GroupId::new),
            })
            .collect())
    }
}
