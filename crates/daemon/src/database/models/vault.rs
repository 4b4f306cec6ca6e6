use sqlx::FromRow;
use time::OffsetDateTime;

use common::prelude::{OwnerId, Vault};

use crate::database::types::DUuid;

pub const VAULT_COLUMNS: &str =
    "id, space_id, owner_id, name, path, parent_vault_id, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct VaultRow {
    pub id: DUuid,
    pub space_id: DUuid,
    pub owner_id: String,
    pub name: String,
    pub path: String,
    pub parent_vault_id: Option<DUuid>,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<VaultRow> for Vault {
    fn from(row: VaultRow) -> Self {
        Self {
            id: row.id.into(),
            space_id: row.space_id.into(),
            owner_id: OwnerId::new(row.owner_id),
            name: row.name,
            path: row.path,
            parent_vault_id: row.parent_vault_id.map(Into::into),
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
