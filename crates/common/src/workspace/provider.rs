use std::fmt::{Debug, Display};

use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use super::model::{Log, LogFilter, Space, Vault};
use crate::owner::OwnerId;

/// Which kind of record a lookup was after
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum EntityKind {
    Space,
    Vault,
    Log,
}

impl Display for EntityKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            EntityKind::Space => f.write_str("space"),
            EntityKind::Vault => f.write_str("vault"),
            EntityKind::Log => f.write_str("log"),
        }
    }
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum WorkspaceError<T> {
    #[error("unhandled workspace provider error: {0}")]
    Provider(#[from] T),
    /// A required field is missing or empty
    #[error("invalid input: {0}")]
    InvalidInput(String),
    /// A referenced record exists but does not fit
    ///  where it was referenced from, e.g. a log
    ///  whose vault lives in a different space
    #[error("invalid reference: {0}")]
    InvalidReference(String),
    /// Nothing with this id exists for the caller
    #[error("{kind} not found: {id}")]
    NotFound { kind: EntityKind, id: Uuid },
    /// The write would duplicate a path within a space
    #[error("conflict: {0}")]
    Conflict(String),
}

impl<T> WorkspaceError<T> {
    pub fn not_found(kind: EntityKind, id: Uuid) -> Self {
        Self::NotFound { kind, id }
    }
}

/// Storage seam for the workspace hierarchy.
///
/// Every call is scoped to an owner: rows owned by anyone else are invisible
/// and are neither returned, updated, nor deleted. Providers only store and
/// fetch; path resolution, reference checks and cascades live above them in
/// [`super::Workspace`] and [`super::cascade`].
///
/// Vault and log writes that would give two records the same path within a
/// space must fail with [`WorkspaceError::Conflict`] and leave the store as
/// it was.
///
/// List calls return records in insertion order.
#[async_trait]
pub trait WorkspaceProvider: Send + Sync + Debug + Clone + 'static {
    type Error: Display + Debug;

    // Spaces

    async fn insert_space(&self, space: &Space) -> Result<(), WorkspaceError<Self::Error>>;

    async fn get_space(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> Result<Option<Space>, WorkspaceError<Self::Error>>;

    async fn list_spaces(&self, owner: &OwnerId) -> Result<Vec<Space>, WorkspaceError<Self::Error>>;

    /// Overwrite the mutable fields of a space.
    /// Returns `false` if no owned row matched.
    async fn update_space(&self, space: &Space) -> Result<bool, WorkspaceError<Self::Error>>;

    async fn delete_space(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> Result<bool, WorkspaceError<Self::Error>>;

    // Vaults

    async fn insert_vault(&self, vault: &Vault) -> Result<(), WorkspaceError<Self::Error>>;

    async fn get_vault(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> Result<Option<Vault>, WorkspaceError<Self::Error>>;

    /// List vaults, optionally constrained to one space
    async fn list_vaults(
        &self,
        owner: &OwnerId,
        space_id: Option<Uuid>,
    ) -> Result<Vec<Vault>, WorkspaceError<Self::Error>>;

    /// Look a vault up by its full path within a space
    async fn find_vault_by_path(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
    ) -> Result<Option<Vault>, WorkspaceError<Self::Error>>;

    /// All vaults whose parent is one of `parent_ids`
    async fn child_vaults(
        &self,
        owner: &OwnerId,
        parent_ids: &[Uuid],
    ) -> Result<Vec<Vault>, WorkspaceError<Self::Error>>;

    async fn update_vault(&self, vault: &Vault) -> Result<bool, WorkspaceError<Self::Error>>;

    /// Delete the listed vaults, returning how many rows went away.
    /// Ids that do not exist are skipped.
    async fn delete_vaults(
        &self,
        owner: &OwnerId,
        ids: &[Uuid],
    ) -> Result<u64, WorkspaceError<Self::Error>>;

    async fn delete_vaults_in_space(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
    ) -> Result<u64, WorkspaceError<Self::Error>>;

    // Logs

    async fn insert_log(&self, log: &Log) -> Result<(), WorkspaceError<Self::Error>>;

    async fn get_log(
        &self,
        owner: &OwnerId,
        id: Uuid,
    ) -> Result<Option<Log>, WorkspaceError<Self::Error>>;

    async fn list_logs(
        &self,
        owner: &OwnerId,
        filter: LogFilter,
    ) -> Result<Vec<Log>, WorkspaceError<Self::Error>>;

    async fn find_log_by_path(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
    ) -> Result<Option<Log>, WorkspaceError<Self::Error>>;

    async fn update_log(&self, log: &Log) -> Result<bool, WorkspaceError<Self::Error>>;

    async fn delete_log(&self, owner: &OwnerId, id: Uuid)
        -> Result<bool, WorkspaceError<Self::Error>>;

    /// Delete every log that lives in one of `vault_ids`
    async fn delete_logs_in_vaults(
        &self,
        owner: &OwnerId,
        vault_ids: &[Uuid],
    ) -> Result<u64, WorkspaceError<Self::Error>>;

    async fn delete_logs_in_space(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
    ) -> Result<u64, WorkspaceError<Self::Error>>;
}
