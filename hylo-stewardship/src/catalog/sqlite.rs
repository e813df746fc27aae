// SPDX-License-Identifier: MIT OR Apache-2.0

use sqlx::{FromRow, query, query_as};

use crate::catalog::{
    CatalogStore, CommonRole, GroupRole, NewCommonRole, NewGroupRole, NewResponsibility,
    Responsibility, RoleRef,
};
use crate::sqlite::{DecodeError, SqliteError, SqliteStore, decode_str, decode_u32};
use crate::threshold::Threshold;
use crate::types::{
    CommonRoleId, GroupId, GroupRoleId, ResponsibilityId, ResponsibilityType, RoleStatus,
};

/// Join table and owning column for responsibilities attached to the given kind of role.
fn attachment_table(role: RoleRef) -> (&'static str, &'static str, i64) {
    match role {
        RoleRef::Common(id) => (
            "common_roles_responsibilities_v1",
            "common_role_id",
            id.as_i64(),
        ),
        RoleRef::Group(id) => (
            "group_roles_responsibilities_v1",
            "group_role_id",
            id.as_i64(),
        ),
    }
}

impl CatalogStore for SqliteStore {
    async fn insert_responsibility(
        &self,
        responsibility: &NewResponsibility,
    ) -> Result<Responsibility, SqliteError> {
        if responsibility.kind == ResponsibilityType::System {
            if let Some(existing) = self.system_responsibility(&responsibility.title).await? {
                return Ok(existing);
            }
        }

        let id = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT INTO
                        responsibilities_v1 (
                            title,
                            description,
                            type,
                            group_id
                        )
                    VALUES
                        (?, ?, ?, ?)
                    ",
                )
                .bind(&responsibility.title)
                .bind(&responsibility.description)
                .bind(responsibility.kind.as_str())
                .bind(responsibility.group_id.map(|id| id.as_i64()))
                .execute(&mut *conn)
                .await?;
                Ok(result.last_insert_rowid())
            })
            .await?;

        Ok(Responsibility {
            id: ResponsibilityId::new(id),
            title: responsibility.title.clone(),
            description: responsibility.description.clone(),
            kind: responsibility.kind,
            group_id: responsibility.group_id,
        })
    }

    async fn responsibility(
        &self,
        id: ResponsibilityId,
    ) -> Result<Option<Responsibility>, SqliteError> {
        let row = self
            .read(async |conn| {
                let row = query_as::<_, ResponsibilityRow>(
                    "
                    SELECT
                        id,
                        title,
                        description,
                        type,
                        group_id
                    FROM
                        responsibilities_v1
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

        row.map(Responsibility::try_from).transpose()
    }

    async fn system_responsibility(
        &self,
        title: &str,
    ) -> Result<Option<Responsibility>, SqliteError> {
        let row = self
            .read(async |conn| {
                let row = query_as::<_, ResponsibilityRow>(
                    "
                    SELECT
                        id,
                        title,
                        description,
                        type,
                        group_id
                    FROM
                        responsibilities_v1
                    WHERE
                        type = 'system'
                        AND title = ?
                    ORDER BY
                        id
                    LIMIT 1
                    ",
                )
                .bind(title)
                .fetch_optional(&mut *conn)
                .await?;
                Ok(row)
            })
            .await?;

        row.map(Responsibility::try_from).transpose()
    }

    async fn group_responsibilities(
        &self,
        group_id: GroupId,
    ) -> Result<Vec<Responsibility>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, ResponsibilityRow>(
                    "
                    SELECT
                        id,
                        title,
                        description,
                        type,
                        group_id
                    FROM
                        responsibilities_v1
                    WHERE
                        group_id IS NULL
                        OR group_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(group_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(Responsibility::try_from).collect()
    }

    async fn insert_common_role(&self, role: &NewCommonRole) -> Result<CommonRole, SqliteError> {
        let id = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT INTO
                        common_roles_v1 (
                            name,
                            emoji,
                            description
                        )
                    VALUES
                        (?, ?, ?)
                    ",
                )
                .bind(&role.name)
                .bind(&role.emoji)
                .bind(&role.description)
                .execute(&mut *conn)
                .await?;
                Ok(result.last_insert_rowid())
            })
            .await?;

        Ok(CommonRole {
            id: CommonRoleId::new(id),
            name: role.name.clone(),
            emoji: role.emoji.clone(),
            description: role.description.clone(),
        })
    }

    async fn common_role(&self, id: CommonRoleId) -> Result<Option<CommonRole>, SqliteError> {
        let row = self
            .read(async |conn| {
                let row = query_as::<_, CommonRoleRow>(
                    "
                    SELECT
                        id,
                        name,
                        emoji,
                        description
                    FROM
                        common_roles_v1
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

        Ok(row.map(CommonRole::from))
    }

    async fn common_roles(&self) -> Result<Vec<CommonRole>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, CommonRoleRow>(
                    "
                    SELECT
                        id,
                        name,
                        emoji,
                        description
                    FROM
                        common_roles_v1
                    ORDER BY
                        id
                    ",
                )
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        Ok(rows.into_iter().map(CommonRole::from).collect())
    }

    async fn update_common_role(&self, role: &CommonRole) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    UPDATE
                        common_roles_v1
                    SET
                        name = ?,
                        emoji = ?,
                        description = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(&role.name)
                .bind(&role.emoji)
                .bind(&role.description)
                .bind(role.id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn insert_group_role(&self, role: &NewGroupRole) -> Result<GroupRole, SqliteError> {
        let id = self
            .tx(async |conn| {
                let result = query(
                    "
                    INSERT INTO
                        groups_roles_v1 (
                            group_id,
                            name,
                            description,
                            emoji,
                            active,
                            assignment,
                            status,
                            threshold_kind,
                            threshold_value,
                            threshold_required,
                            threshold_current,
                            bootstrap,
                            allow_self_voting
                        )
                    VALUES
                        (?, ?, ?, ?, 1, ?, ?, ?, ?, 0, 0, ?, ?)
                    ",
                )
                .bind(role.group_id.as_i64())
                .bind(&role.name)
                .bind(&role.description)
                .bind(&role.emoji)
                .bind(role.assignment.as_str())
                .bind(RoleStatus::Vacant.as_str())
                .bind(role.threshold.kind())
                .bind(i64::from(role.threshold.value()))
                .bind(role.bootstrap)
                .bind(role.allow_self_voting)
                .execute(&mut *conn)
                .await?;
                Ok(result.last_insert_rowid())
            })
            .await?;

        Ok(GroupRole {
            id: GroupRoleId::new(id),
            group_id: role.group_id,
            name: role.name.clone(),
            description: role.description.clone(),
            emoji: role.emoji.clone(),
            active: true,
            assignment: role.assignment,
            status: RoleStatus::Vacant,
            threshold: role.threshold,
            threshold_required: 0,
            threshold_current: 0,
            bootstrap: role.bootstrap,
            allow_self_voting: role.allow_self_voting,
        })
    }

    async fn group_role(&self, id: GroupRoleId) -> Result<Option<GroupRole>, SqliteError> {
        let row = self
            .read(async |conn| {
                let row = query_as::<_, GroupRoleRow>(
                    "
                    SELECT
                        id,
                        group_id,
                        name,
                        description,
                        emoji,
                        active,
                        assignment,
                        status,
                        threshold_kind,
                        threshold_value,
                        threshold_required,
                        threshold_current,
                        bootstrap,
                        allow_self_voting
                    FROM
                        groups_roles_v1
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

        row.map(GroupRole::try_from).transpose()
    }

    async fn group_roles(&self, group_id: GroupId) -> Result<Vec<GroupRole>, SqliteError> {
        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, GroupRoleRow>(
                    "
                    SELECT
                        id,
                        group_id,
                        name,
                        description,
                        emoji,
                        active,
                        assignment,
                        status,
                        threshold_kind,
                        threshold_value,
                        threshold_required,
                        threshold_current,
                        bootstrap,
                        allow_self_voting
                    FROM
                        groups_roles_v1
                    WHERE
                        group_id = ?
                    ORDER BY
                        id
                    ",
                )
                .bind(group_id.as_i64())
                .fetch_all(&mut *conn)
                .await?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(GroupRole::try_from).collect()
    }

    async fn update_group_role(&self, role: &GroupRole) -> Result<bool, SqliteError> {
        let result = self
            .tx(async |conn| {
                let result = query(
                    "
                    UPDATE
                        groups_roles_v1
                    SET
                        name = ?,
                        description = ?,
                        emoji = ?,
                        active = ?,
                        assignment = ?,
                        status = ?,
                        threshold_kind = ?,
                        threshold_value = ?,
                        threshold_required = ?,
                        threshold_current = ?,
                        bootstrap = ?,
                        allow_self_voting = ?
                    WHERE
                        id = ?
                    ",
                )
                .bind(&role.name)
                .bind(&role.description)
                .bind(&role.emoji)
                .bind(role.active)
                .bind(role.assignment.as_str())
                .bind(role.status.as_str())
                .bind(role.threshold.kind())
                .bind(i64::from(role.threshold.value()))
                .bind(i64::from(role.threshold_required))
                .bind(i64::from(role.threshold_current))
                .bind(role.bootstrap)
                .bind(role.allow_self_voting)
                .bind(role.id.as_i64())
                .execute(&mut *conn)
                .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn attach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> Result<bool, SqliteError> {
        let (table, column, role_id) = attachment_table(role);
        let sql = format!(
            "
            INSERT OR IGNORE
            INTO
                {table} (
                    {column},
                    responsibility_id
                )
            VALUES
                (?, ?)
            "
        );

        let result = self
            .tx(async |conn| {
                let result = query(&sql)
                    .bind(role_id)
                    .bind(responsibility_id.as_i64())
                    .execute(&mut *conn)
                    .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn detach_responsibility(
        &self,
        role: RoleRef,
        responsibility_id: ResponsibilityId,
    ) -> Result<bool, SqliteError> {
        let (table, column, role_id) = attachment_table(role);
        let sql = format!(
            "
            DELETE FROM
                {table}
            WHERE
                {column} = ?
                AND responsibility_id = ?
            "
        );

        let result = self
            .tx(async |conn| {
                let result = query(&sql)
                    .bind(role_id)
                    .bind(responsibility_id.as_i64())
                    .execute(&mut *conn)
                    .await?;
                Ok(result)
            })
            .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn role_responsibilities(&self, role: RoleRef) -> Result<Vec<Responsibility>, SqliteError> {
        let (table, column, role_id) = attachment_table(role);
        let sql = format!(
            "
            SELECT
                responsibilities_v1.id,
                responsibilities_v1.title,
                responsibilities_v1.description,
                responsibilities_v1.type,
                responsibilities_v1.group_id
            FROM
                {table}
                INNER JOIN responsibilities_v1
                    ON responsibilities_v1.id = {table}.responsibility_id
            WHERE
                {table}.{column} = ?
            ORDER BY
                responsibilities_v1.id
            "
        );

        let rows = self
            .read(async |conn| {
                let rows = query_as::<_, ResponsibilityRow>(&sql)
                    .bind(role_id)
                    .fetch_all(&mut *conn)
                    .await?;
                Ok(rows)
            })
            .await?;

        rows.into_iter().map(Responsibility::try_from).collect()
    }
}

#[derive(Debug, FromRow)]
struct ResponsibilityRow {
    id: i64,
    title: String,
    description: Option<String>,
    #[sqlx(rename = "type")]
    kind: String,
    group_id: Option<i64>,
}

impl TryFrom<ResponsibilityRow> for Responsibility {
    type Error = SqliteError;

    fn try_from(row: ResponsibilityRow) -> Result<Self, Self::Error> {
        Ok(Responsibility {
            id: ResponsibilityId::new(row.id),
            title: row.title,
            description: row.description,
            kind: decode_str("type", &row.kind)?,
            group_id: row.group_id.map(GroupId::new),
        })
    }
}

#[derive(Debug, FromRow)]
struct CommonRoleRow {
    id: i64,
    name: String,
    emoji: Option<String>,
    description: Option<String>,
}

impl From<CommonRoleRow> for CommonRole {
    fn from(row: CommonRoleRow) -> Self {
        CommonRole {
            id: CommonRoleId::new(row.id),
            name: row.name,
            emoji: row.emoji,
            description: row.description,
        }
    }
}

#[derive(Debug, FromRow)]
struct GroupRoleRow {
    id: i64,
    group_id: i64,
    name: String,
    description: Option<String>,
    emoji: Option<String>,
    active: bool,
    assignment: String,
    status: String,
    threshold_kind: String,
    threshold_value: i64,
    threshold_required: i64,
    threshold_current: i64,
    bootstrap: bool,
    allow_self_voting: Option<bool>,
}

impl TryFrom<GroupRoleRow> for GroupRole {
    type Error = SqliteError;

    fn try_from(row: GroupRoleRow) -> Result<Self, Self::Error> {
        let threshold_value = decode_u32("threshold_value", row.threshold_value)?;
        let threshold = Threshold::from_parts(&row.threshold_kind, threshold_value)
            .ok_or_else(|| SqliteError::Decode("threshold_kind".into(), DecodeError::FromStr))?;

        Ok(GroupRole {
            id: GroupRoleId::new(row.id),
            group_id: GroupId::new(row.group_id),
            name: row.name,
            description: row.description,
            emoji: row.emoji,
            active: row.active,
            assignment: decode_str("assignment", &row.assignment)?,
            status: decode_str("status", &row.status)?,
            threshold,
            threshold_required: decode_u32("threshold_required", row.threshold_required)?,
            threshold_current: decode_u32("threshold_current", row.threshold_current)?,
            bootstrap: row.bootstrap,
            allow_self_voting: row.allow_self_voting,
        })
    }
}
