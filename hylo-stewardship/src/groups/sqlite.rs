// SPDX-License-Identifier: MIT OR Apache-2.0

use sqlx::{FromRow, query, query_as, query_scalar};

use crate::groups::{Group, GroupSettings, GroupStore, Membership};
use crate::sqlite::{DecodeError, SqliteError, SqliteStore, decode_str, decode_u32};
use crate::types::{GroupId, UserId};

impl GroupStore for SqliteStore {
    async fn insert_group(&self, group: &Group) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT OR IGNORE
                    INTO
                        groups_v1 (
                            id,
                            mode,
                            active,
                            allow_self_voting,
                            min_member_age_days,
                            trust_rate_limit_hours
                        )
                    VALUES
                        (?, ?, ?, ?, ?, ?)
                    ",
                )
                .bind(group.id.as_i64())
                .bind(group.mode.as_str())
                .bind(group.active)
                .bind(group.settings.allow_self_voting)
                .bind(i64::from(group.settings.min_member_age_days))
                .bind(i64::from(group.settings.trust_rate_limit_hours))
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn group(&self, id: GroupId) -> Result<Option<Group>, SqliteError> {
        let row = self
            .read(async |conn| {
                let row = query_as::<_, GroupRow>(
                    "
                    SELECT
                        id,
                        mode,
                        active,
                        allow_self_voting,
                        min_member_age_days,
                        trust_rate_limit_hours
                    FROM
                        groups_v1
                    WHERE
                        id = ?
                    ",
                )
                .bind(id.as_i64())
                .fetch_optional(&mut *conn)
                .await?;
                Ok(row)
            })
            .await?;

        row.map(Group::try_from).transpose()
    }

    async fn update_group(&self, group: &Group) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    UPDATE
                        groups_v1
                    SET
                        mode = ?,
                        active = ?,
                        allow_self_voting = ?,
                        min_member_age_days = ?,
                        trust_rate_limit_hours = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(group.mode.as_str())
                .bind(group.active)
                .bind(group.settings.allow_self_voting)
                .bind(i64::from(group.settings.min_member_age_days))
                .bind(i64::from(group.settings.trust_rate_limit_hours))
                .bind(group.id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn upsert_membership(&self, membership: &Membership) -> Result<(), SqliteError> {
        let joined_at = i64::try_from(membership.joined_at)
            .map_err(|_| SqliteError::Decode("joined_at".into(), DecodeError::OutOfRange))?;

        self.tx(async |conn| {
            query(
                "
                INSERT INTO
                    group_memberships_v1 (
                        group_id,
                        user_id,
                        active,
                        nav_order,
                        joined_at
                    )
                VALUES
                    (?, ?, ?, ?, ?)
                ON CONFLICT (group_id, user_id) DO UPDATE SET
                    active = excluded.active,
                    nav_order = excluded.nav_order,
                    joined_at = excluded.joined_at
                ",
            )
            .bind(membership.group_id.as_i64())
            .bind(membership.user_id.as_i64())
            .bind(membership.active)
            .bind(membership.nav_order)
            .bind(joined_at)
            .execute(&mut *conn)
            .await?;
            Ok(())
        })
        .await
    }

    async fn membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<Option<Membership>, SqliteError> {
        let row = self
            .read(async |conn| {
                let row = query_as::<_, MembershipRow>(
                    "
                    SELECT
                        group_id,
                        user_id,
                        active,
                        nav_order,
                        joined_at
                    FROM
                        group_memberships_v1
                    WHERE
                        group_id = ?
                        AND user_id = ?
                    ",
                )
                .bind(group_id.as_i64())
                .bind(user_id.as_i64())
                .fetch_optional(&mut *conn)
                .await?;
                Ok(row)
            })
            .await?;

        row.map(Membership::try_from).transpose()
    }

    async fn deactivate_membership(
        &self,
        group_id: GroupId,
        user_id: UserId,
    ) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    UPDATE
                        group_memberships_v1
                    SET
                        active = 0
                    WHERE
                        group_id = ?
                        AND user_id = ?
                        AND active = 1
                    ",
                )
                .bind(group_id.as_i64())
                .bind(user_id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn active_members(&self, group_id: GroupId) -> Result<Vec<UserId>, SqliteError> {
        let user_ids = self
            .read(async |conn| {
                let user_ids = query_scalar::<_, i64>(
                    "
                    SELECT
                        user_id
                    FROM
                        group_memberships_v1
                    WHERE
                        group_id = ?
                        AND active = 1
                    ORDER BY
                        user_id
                    ",
                )
                .bind(group_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(user_ids)
            })
            .await?;

        Ok(user_ids.into_iter().map(UserId::new).collect())
    }

    async fn active_member_count(&self, group_id: GroupId) -> Result<u32, SqliteError> {
        let count = self
            .read(async |conn| {
                let count = query_scalar::<_, i64>(
                    "
                    SELECT
                        COUNT(*)
                    FROM
                        group_memberships_v1
                    WHERE
                        group_id = ?
                        AND active = 1
                    ",
                )
                .bind(group_id.as_i64())
                .fetch_one(&mut *conn)
                .await?;
                Ok(count)
            })
            .await?;

        decode_u32("count", count)
    }
}

#[derive(Debug, FromRow)]
struct GroupRow {
    id: i64,
    mode: String,
    active: bool,
    allow_self_voting: bool,
    min_member_age_days: i64,
    trust_rate_limit_hours: i64,
}

impl TryFrom<GroupRow> for Group {
    type Error = SqliteError;

    fn try_from(row: GroupRow) -> Result<Self, Self::Error> {
        Ok(Group {
            id: GroupId::new(row.id),
            mode: decode_str("mode", &row.mode)?,
            active: row.active,
            settings: GroupSettings {
                allow_self_voting: row.allow_self_voting,
                min_member_age_days: decode_u32("min_member_age_days", row.min_member_age_days)?,
                trust_rate_limit_hours: decode_u32(
                    "trust_rate_limit_hours",
                    row.trust_rate_limit_hours,
                )?,
            },
        })
    }
}

#[derive(Debug, FromRow)]
struct MembershipRow {
    group_id: i64,
    user_id: i64,
    active: bool,
    nav_order: Option<i64>,
    joined_at: i64,
}

impl TryFrom<MembershipRow> for Membership {
    type Error = SqliteError;

    fn try_from(row: MembershipRow) -> Result<Self, Self::Error> {
        Ok(Membership {
            group_id: GroupId::new(row.group_id),
            user_id: UserId::new(row.user_id),
            active: row.active,
            nav_order: row.nav_order,
            joined_at: u64::try_from(row.joined_at)
                .map_err(|_| SqliteError::Decode("joined_at".into(), DecodeError::OutOfRange))?,
        })
    }
}
