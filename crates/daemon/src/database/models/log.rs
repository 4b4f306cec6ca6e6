use sqlx::FromRow;
use time::OffsetDateTime;

use common::prelude::{Log, OwnerId};

use crate::database::types::DUuid;

pub const LOG_COLUMNS: &str =
    "id, space_id, vault_id, owner_id, name, path, language, content, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct LogRow {
    pub id: DUuid,
    pub space_id: DUuid,
    pub vault_id: DUuid,
    pub owner_id: String,
    pub name: String,
    pub path: String,
    pub language: String,
    pub content: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<LogRow> for Log {
    fn from(row: LogRow) -> Self {
        Self {
            id: row.id.into(),
            space_id: row.space_id.into(),
            vault_id: row.vault_id.into(),
            owner_id: OwnerId::new(row.owner_id),
            name: row.name,
            path: row.path,
            language: row.language,
            content: row.content,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
