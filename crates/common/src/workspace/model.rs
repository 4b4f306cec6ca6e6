use serde::{Deserialize, Serialize};
use time::OffsetDateTime;
use uuid::Uuid;

use crate::owner::OwnerId;

/// Top-level container; has no parent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Space {
    pub id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Space {
    pub fn new(owner: &OwnerId, name: impl Into<String>) -> Self {
        let now = OffsetDateTime::now_utc();
        Self {
            id: Uuid::new_v4(),
            owner_id: owner.clone(),
            name: name.into(),
            created_at: now,
            updated_at: now,
        }
    }
}

/// Folder-like node inside a space. Vaults nest through `parent_vault_id`,
/// which always points at a vault in the same space.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Vault {
    pub id: Uuid,
    pub space_id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    /// Slash-joined names from the root vault down to this one
    pub path: String,
    #[serde(
        default,
        alias = "parentId",
        skip_serializing_if = "Option::is_none"
    )]
    pub parent_vault_id: Option<Uuid>,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

impl Vault {
    pub fn is_root(&self) -> bool {
        self.parent_vault_id.is_none()
    }
}

/// A single code file. Always lives in exactly one vault.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Log {
    pub id: Uuid,
    pub space_id: Uuid,
    pub vault_id: Uuid,
    pub owner_id: OwnerId,
    pub name: String,
    pub path: String,
    pub language: String,
    #[serde(default, alias = "code")]
    pub content: String,
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Parameters for creating a vault
#[derive(Debug, Clone)]
pub struct NewVault {
    pub space_id: Uuid,
    pub name: String,
    pub parent_vault_id: Option<Uuid>,
}

/// Parameters for creating a log
#[derive(Debug, Clone, Default)]
pub struct NewLog {
    pub space_id: Uuid,
    pub vault_id: Uuid,
    pub name: String,
    pub content: Option<String>,
    /// Explicit language tag; inferred from `name` when absent or blank
    pub language: Option<String>,
}

/// Partial update of a log. `None` leaves the field as it is.
#[derive(Debug, Clone, Default)]
pub struct LogPatch {
    pub name: Option<String>,
    pub content: Option<String>,
    pub language: Option<String>,
}

/// Optional constraints applied on top of the owner scope when listing logs
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LogFilter {
    pub space_id: Option<Uuid>,
    pub vault_id: Option<Uuid>,
}

impl LogFilter {
    pub fn space(space_id: Uuid) -> Self {
        Self {
            space_id: Some(space_id),
            vault_id: None,
        }
    }

    pub fn vault(vault_id: Uuid) -> Self {
        Self {
            space_id: None,
            vault_id: Some(vault_id),
        }
    }

    pub fn matches(&self, log: &Log) -> bool {
        self.space_id.map_or(true, |id| log.space_id == id)
            && self.vault_id.map_or(true, |id| log.vault_id == id)
    }
}
