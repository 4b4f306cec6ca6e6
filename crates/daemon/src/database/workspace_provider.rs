use async_trait::async_trait;
use sqlx::{QueryBuilder, Sqlite};
use uuid::Uuid;

use common::prelude::{Log, LogFilter, OwnerId, Space, Vault, WorkspaceError, WorkspaceProvider};

use crate::database::models::{
    LogRow, SpaceRow, VaultRow, LOG_COLUMNS, SPACE_COLUMNS, VAULT_COLUMNS,
};
use crate::database::types::DUuid;
use crate::database::Database;

type Result<T> = std::result::Result<T, WorkspaceError<sqlx::Error>>;

/// Upper bound on ids bound into a single `IN (...)` list
const ID_CHUNK: usize = 500;

/// Push `column IN (?, ?, ...)` for the given ids
fn push_in_list(qb: &mut QueryBuilder<'_, Sqlite>, column: &str, ids: &[Uuid]) {
    qb.push(column);
    qb.push(" IN (");
    let mut separated = qb.separated(", ");
    for id in ids {
        separated.push_bind(DUuid::from(*id));
    }
    separated.push_unseparated(")");
}

/// Map a failed vault or log write, turning a unique path index violation
/// into `Conflict`
fn write_error(err: sqlx::Error, kind: &str, path: &str) -> WorkspaceError<sqlx::Error> {
    match err {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => {
            WorkspaceError::Conflict(format!("{} already exists at {}", kind, path))
        }
        err => WorkspaceError::Provider(err),
    }
}

#[async_trait]
impl WorkspaceProvider for Database {
    type Error = sqlx::Error;

    async fn insert_space(&self, space: &Space) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO spaces (id, owner_id, name, created_at, updated_at)
            VALUES (?1, ?2, ?3, ?4, ?5)
            "#,
        )
        .bind(DUuid::from(space.id))
        .bind(space.owner_id.as_str())
        .bind(&space.name)
        .bind(space.created_at)
        .bind(space.updated_at)
        .execute(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(())
    }

    async fn get_space(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Space>> {
        let row = sqlx::query_as::<_, SpaceRow>(&format!(
            "SELECT {} FROM spaces WHERE id = ?1 AND owner_id = ?2",
            SPACE_COLUMNS
        ))
        .bind(DUuid::from(id))
        .bind(owner.as_str())
        .fetch_optional(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(row.map(Into::into))
    }

    async fn list_spaces(&self, owner: &OwnerId) -> Result<Vec<Space>> {
        let rows = sqlx::query_as::<_, SpaceRow>(&format!(
            "SELECT {} FROM spaces WHERE owner_id = ?1 ORDER BY rowid ASC",
            SPACE_COLUMNS
        ))
        .bind(owner.as_str())
        .fetch_all(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn update_space(&self, space: &Space) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE spaces
            SET name = ?1, updated_at = ?2
            WHERE id = ?3 AND owner_id = ?4
            "#,
        )
        .bind(&space.name)
        .bind(space.updated_at)
        .bind(DUuid::from(space.id))
        .bind(space.owner_id.as_str())
        .execute(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_space(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM spaces WHERE id = ?1 AND owner_id = ?2")
            .bind(DUuid::from(id))
            .bind(owner.as_str())
            .execute(&**self)
            .await
            .map_err(WorkspaceError::Provider)?;

        Ok(result.rows_affected() > 0)
    }

    async fn insert_vault(&self, vault: &Vault) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO vaults (
                id, space_id, owner_id, name, path, parent_vault_id,
                created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)
            "#,
        )
        .bind(DUuid::from(vault.id))
        .bind(DUuid::from(vault.space_id))
        .bind(vault.owner_id.as_str())
        .bind(&vault.name)
        .bind(&vault.path)
        .bind(vault.parent_vault_id.map(DUuid::from))
        .bind(vault.created_at)
        .bind(vault.updated_at)
        .execute(&**self)
        .await
        .map_err(|e| write_error(e, "vault", &vault.path))?;

        Ok(())
    }

    async fn get_vault(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Vault>> {
        let row = sqlx::query_as::<_, VaultRow>(&format!(
            "SELECT {} FROM vaults WHERE id = ?1 AND owner_id = ?2",
            VAULT_COLUMNS
        ))
        .bind(DUuid::from(id))
        .bind(owner.as_str())
        .fetch_optional(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(row.map(Into::into))
    }

    async fn list_vaults(&self, owner: &OwnerId, space_id: Option<Uuid>) -> Result<Vec<Vault>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM vaults WHERE owner_id = ",
            VAULT_COLUMNS
        ));
        qb.push_bind(owner.as_str().to_string());
        if let Some(space_id) = space_id {
            qb.push(" AND space_id = ");
            qb.push_bind(DUuid::from(space_id));
        }
        qb.push(" ORDER BY rowid ASC");

        let rows = qb
            .build_query_as::<VaultRow>()
            .fetch_all(&**self)
            .await
            .map_err(WorkspaceError::Provider)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_vault_by_path(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
    ) -> Result<Option<Vault>> {
        let row = sqlx::query_as::<_, VaultRow>(&format!(
            "SELECT {} FROM vaults WHERE owner_id = ?1 AND space_id = ?2 AND path = ?3",
            VAULT_COLUMNS
        ))
        .bind(owner.as_str())
        .bind(DUuid::from(space_id))
        .bind(path)
        .fetch_optional(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(row.map(Into::into))
    }

    async fn child_vaults(&self, owner: &OwnerId, parent_ids: &[Uuid]) -> Result<Vec<Vault>> {
        let mut children = Vec::new();
        for chunk in parent_ids.chunks(ID_CHUNK) {
            let mut qb = QueryBuilder::<Sqlite>::new(format!(
                "SELECT {} FROM vaults WHERE owner_id = ",
                VAULT_COLUMNS
            ));
            qb.push_bind(owner.as_str().to_string());
            qb.push(" AND ");
            push_in_list(&mut qb, "parent_vault_id", chunk);
            qb.push(" ORDER BY rowid ASC");

            let rows = qb
                .build_query_as::<VaultRow>()
                .fetch_all(&**self)
                .await
                .map_err(WorkspaceError::Provider)?;
            children.extend(rows.into_iter().map(Vault::from));
        }

        Ok(children)
    }

    async fn update_vault(&self, vault: &Vault) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE vaults
            SET name = ?1, path = ?2, updated_at = ?3
            WHERE id = ?4 AND owner_id = ?5
            "#,
        )
        .bind(&vault.name)
        .bind(&vault.path)
        .bind(vault.updated_at)
        .bind(DUuid::from(vault.id))
        .bind(vault.owner_id.as_str())
        .execute(&**self)
        .await
        .map_err(|e| write_error(e, "vault", &vault.path))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_vaults(&self, owner: &OwnerId, ids: &[Uuid]) -> Result<u64> {
        let mut removed = 0;
        for chunk in ids.chunks(ID_CHUNK) {
            let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM vaults WHERE owner_id = ");
            qb.push_bind(owner.as_str().to_string());
            qb.push(" AND ");
            push_in_list(&mut qb, "id", chunk);

            let result = qb
                .build()
                .execute(&**self)
                .await
                .map_err(WorkspaceError::Provider)?;
            removed += result.rows_affected();
        }

        Ok(removed)
    }

    async fn delete_vaults_in_space(&self, owner: &OwnerId, space_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM vaults WHERE owner_id = ?1 AND space_id = ?2")
            .bind(owner.as_str())
            .bind(DUuid::from(space_id))
            .execute(&**self)
            .await
            .map_err(WorkspaceError::Provider)?;

        Ok(result.rows_affected())
    }

    async fn insert_log(&self, log: &Log) -> Result<()> {
        sqlx::query(
            r#"
            INSERT INTO logs (
                id, space_id, vault_id, owner_id, name, path, language,
                content, created_at, updated_at
            )
            VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)
            "#,
        )
        .bind(DUuid::from(log.id))
        .bind(DUuid::from(log.space_id))
        .bind(DUuid::from(log.vault_id))
        .bind(log.owner_id.as_str())
        .bind(&log.name)
        .bind(&log.path)
        .bind(&log.language)
        .bind(&log.content)
        .bind(log.created_at)
        .bind(log.updated_at)
        .execute(&**self)
        .await
        .map_err(|e| write_error(e, "log", &log.path))?;

        Ok(())
    }

    async fn get_log(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Log>> {
        let row = sqlx::query_as::<_, LogRow>(&format!(
            "SELECT {} FROM logs WHERE id = ?1 AND owner_id = ?2",
            LOG_COLUMNS
        ))
        .bind(DUuid::from(id))
        .bind(owner.as_str())
        .fetch_optional(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(row.map(Into::into))
    }

    async fn list_logs(&self, owner: &OwnerId, filter: LogFilter) -> Result<Vec<Log>> {
        let mut qb = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {} FROM logs WHERE owner_id = ",
            LOG_COLUMNS
        ));
        qb.push_bind(owner.as_str().to_string());
        if let Some(space_id) = filter.space_id {
            qb.push(" AND space_id = ");
            qb.push_bind(DUuid::from(space_id));
        }
        if let Some(vault_id) = filter.vault_id {
            qb.push(" AND vault_id = ");
            qb.push_bind(DUuid::from(vault_id));
        }
        qb.push(" ORDER BY rowid ASC");

        let rows = qb
            .build_query_as::<LogRow>()
            .fetch_all(&**self)
            .await
            .map_err(WorkspaceError::Provider)?;

        Ok(rows.into_iter().map(Into::into).collect())
    }

    async fn find_log_by_path(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
    ) -> Result<Option<Log>> {
        let row = sqlx::query_as::<_, LogRow>(&format!(
            "SELECT {} FROM logs WHERE owner_id = ?1 AND space_id = ?2 AND path = ?3",
            LOG_COLUMNS
        ))
        .bind(owner.as_str())
        .bind(DUuid::from(space_id))
        .bind(path)
        .fetch_optional(&**self)
        .await
        .map_err(WorkspaceError::Provider)?;

        Ok(row.map(Into::into))
    }

    async fn update_log(&self, log: &Log) -> Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE logs
            SET name = ?1, path = ?2, language = ?3, content = ?4, updated_at = ?5
            WHERE id = ?6 AND owner_id = ?7
            "#,
        )
        .bind(&log.name)
        .bind(&log.path)
        .bind(&log.language)
        .bind(&log.content)
        .bind(log.updated_at)
        .bind(DUuid::from(log.id))
        .bind(log.owner_id.as_str())
        .execute(&**self)
        .await
        .map_err(|e| write_error(e, "log", &log.path))?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_log(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let result = sqlx::query("DELETE FROM logs WHERE id = ?1 AND owner_id = ?2")
            .bind(DUuid::from(id))
            .bind(owner.as_str())
            .execute(&**self)
            .await
            .map_err(WorkspaceError::Provider)?;

        Ok(result.rows_affected() > 0)
    }

    async fn delete_logs_in_vaults(&self, owner: &OwnerId, vault_ids: &[Uuid]) -> Result<u64> {
        let mut removed = 0;
        for chunk in vault_ids.chunks(ID_CHUNK) {
            let mut qb = QueryBuilder::<Sqlite>::new("DELETE FROM logs WHERE owner_id = ");
            qb.push_bind(owner.as_str().to_string());
            qb.push(" AND ");
            push_in_list(&mut qb, "vault_id", chunk);

            let result = qb
                .build()
                .execute(&**self)
                .await
                .map_err(WorkspaceError::Provider)?;
            removed += result.rows_affected();
        }

        Ok(removed)
    }

    async fn delete_logs_in_space(&self, owner: &OwnerId, space_id: Uuid) -> Result<u64> {
        let result = sqlx::query("DELETE FROM logs WHERE owner_id = ?1 AND space_id = ?2")
            .bind(owner.as_str())
            .bind(DUuid::from(space_id))
            .execute(&**self)
            .await
            .map_err(WorkspaceError::Provider)?;

        Ok(result.rows_affected())
    }
}
