use sqlx::FromRow;
use time::OffsetDateTime;

use common::prelude::{OwnerId, Space};

use crate::database::types::DUuid;

pub const SPACE_COLUMNS: &str = "id, owner_id, name, created_at, updated_at";

#[derive(Debug, Clone, FromRow)]
pub struct SpaceRow {
    pub id: DUuid,
    pub owner_id: String,
    pub name: String,
    pub created_at: OffsetDateTime,
    pub updated_at: OffsetDateTime,
}

impl From<SpaceRow> for Space {
    fn from(row: SpaceRow) -> Self {
        Self {
            id: row.id.into(),
            owner_id: OwnerId::new(row.owner_id),
            name: row.name,
            created_at: row.created_at,
            updated_at: row.updated_at,
        }
    }
}
