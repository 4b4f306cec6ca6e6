use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use async_trait::async_trait;
use uuid::Uuid;

use super::model::{Log, LogFilter, Space, Vault};
use super::provider::{WorkspaceError, WorkspaceProvider};
use crate::owner::OwnerId;

/// In-memory workspace provider backed by insertion-ordered vectors
#[derive(Debug, Clone)]
pub struct MemoryWorkspaceProvider {
    inner: Arc<RwLock<MemoryWorkspaceProviderInner>>,
}

#[derive(Debug, Default)]
struct MemoryWorkspaceProviderInner {
    spaces: Vec<Space>,
    vaults: Vec<Vault>,
    logs: Vec<Log>,
}

#[derive(thiserror::Error, Debug, Clone, PartialEq, Eq)]
pub enum MemoryWorkspaceProviderError {
    #[error("memory provider error: {0}")]
    Internal(String),
}

type Result<T> = std::result::Result<T, WorkspaceError<MemoryWorkspaceProviderError>>;

impl MemoryWorkspaceProvider {
    pub fn new() -> Self {
        Self {
            inner: Arc::new(RwLock::new(MemoryWorkspaceProviderInner::default())),
        }
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, MemoryWorkspaceProviderInner>> {
        self.inner.read().map_err(|e| {
            WorkspaceError::Provider(MemoryWorkspaceProviderError::Internal(format!(
                "failed to acquire read lock: {}",
                e
            )))
        })
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, MemoryWorkspaceProviderInner>> {
        self.inner.write().map_err(|e| {
            WorkspaceError::Provider(MemoryWorkspaceProviderError::Internal(format!(
                "failed to acquire write lock: {}",
                e
            )))
        })
    }
}

impl Default for MemoryWorkspaceProvider {
    fn default() -> Self {
        Self::new()
    }
}

fn vault_path_taken(vaults: &[Vault], vault: &Vault) -> bool {
    vaults.iter().any(|v| {
        v.id != vault.id
            && v.owner_id == vault.owner_id
            && v.space_id == vault.space_id
            && v.path == vault.path
    })
}

fn log_path_taken(logs: &[Log], log: &Log) -> bool {
    logs.iter().any(|l| {
        l.id != log.id
            && l.owner_id == log.owner_id
            && l.space_id == log.space_id
            && l.path == log.path
    })
}

/// Drop every element matching `pred`, returning how many were removed
fn remove_where<T>(items: &mut Vec<T>, pred: impl Fn(&T) -> bool) -> u64 {
    let before = items.len();
    items.retain(|item| !pred(item));
    (before - items.len()) as u64
}

#[async_trait]
impl WorkspaceProvider for MemoryWorkspaceProvider {
    type Error = MemoryWorkspaceProviderError;

    async fn insert_space(&self, space: &Space) -> Result<()> {
        self.write()?.spaces.push(space.clone());
        Ok(())
    }

    async fn get_space(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Space>> {
        let inner = self.read()?;
        Ok(inner
            .spaces
            .iter()
            .find(|s| s.id == id && &s.owner_id == owner)
            .cloned())
    }

    async fn list_spaces(&self, owner: &OwnerId) -> Result<Vec<Space>> {
        let inner = self.read()?;
        Ok(inner
            .spaces
            .iter()
            .filter(|s| &s.owner_id == owner)
            .cloned()
            .collect())
    }

    async fn update_space(&self, space: &Space) -> Result<bool> {
        let mut inner = self.write()?;
        match inner
            .spaces
            .iter_mut()
            .find(|s| s.id == space.id && s.owner_id == space.owner_id)
        {
            Some(existing) => {
                existing.name = space.name.clone();
                existing.updated_at = space.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_space(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let mut inner = self.write()?;
        let removed = remove_where(&mut inner.spaces, |s| s.id == id && &s.owner_id == owner);
        Ok(removed > 0)
    }

    async fn insert_vault(&self, vault: &Vault) -> Result<()> {
        let mut inner = self.write()?;
        if vault_path_taken(&inner.vaults, vault) {
            return Err(WorkspaceError::Conflict(format!(
                "vault already exists at {}",
                vault.path
            )));
        }
        inner.vaults.push(vault.clone());
        Ok(())
    }

    async fn get_vault(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Vault>> {
        let inner = self.read()?;
        Ok(inner
            .vaults
            .iter()
            .find(|v| v.id == id && &v.owner_id == owner)
            .cloned())
    }

    async fn list_vaults(&self, owner: &OwnerId, space_id: Option<Uuid>) -> Result<Vec<Vault>> {
        let inner = self.read()?;
        Ok(inner
            .vaults
            .iter()
            .filter(|v| &v.owner_id == owner && space_id.map_or(true, |id| v.space_id == id))
            .cloned()
            .collect())
    }

    async fn find_vault_by_path(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
    ) -> Result<Option<Vault>> {
        let inner = self.read()?;
        Ok(inner
            .vaults
            .iter()
            .find(|v| &v.owner_id == owner && v.space_id == space_id && v.path == path)
            .cloned())
    }

    async fn child_vaults(&self, owner: &OwnerId, parent_ids: &[Uuid]) -> Result<Vec<Vault>> {
        let inner = self.read()?;
        Ok(inner
            .vaults
            .iter()
            .filter(|v| {
                &v.owner_id == owner
                    && v
                        .parent_vault_id
                        .is_some_and(|parent| parent_ids.contains(&parent))
            })
            .cloned()
            .collect())
    }

    async fn update_vault(&self, vault: &Vault) -> Result<bool> {
        let mut inner = self.write()?;
        if vault_path_taken(&inner.vaults, vault) {
            return Err(WorkspaceError::Conflict(format!(
                "vault already exists at {}",
                vault.path
            )));
        }
        match inner
            .vaults
            .iter_mut()
            .find(|v| v.id == vault.id && v.owner_id == vault.owner_id)
        {
            Some(existing) => {
                existing.name = vault.name.clone();
                existing.path = vault.path.clone();
                existing.updated_at = vault.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_vaults(&self, owner: &OwnerId, ids: &[Uuid]) -> Result<u64> {
        let mut inner = self.write()?;
        Ok(remove_where(&mut inner.vaults, |v| {
            &v.owner_id == owner && ids.contains(&v.id)
        }))
    }

    async fn delete_vaults_in_space(&self, owner: &OwnerId, space_id: Uuid) -> Result<u64> {
        let mut inner = self.write()?;
        Ok(remove_where(&mut inner.vaults, |v| {
            &v.owner_id == owner && v.space_id == space_id
        }))
    }

    async fn insert_log(&self, log: &Log) -> Result<()> {
        let mut inner = self.write()?;
        if log_path_taken(&inner.logs, log) {
            return Err(WorkspaceError::Conflict(format!(
                "log already exists at {}",
                log.path
            )));
        }
        inner.logs.push(log.clone());
        Ok(())
    }

    async fn get_log(&self, owner: &OwnerId, id: Uuid) -> Result<Option<Log>> {
        let inner = self.read()?;
        Ok(inner
            .logs
            .iter()
            .find(|l| l.id == id && &l.owner_id == owner)
            .cloned())
    }

    async fn list_logs(&self, owner: &OwnerId, filter: LogFilter) -> Result<Vec<Log>> {
        let inner = self.read()?;
        Ok(inner
            .logs
            .iter()
            .filter(|l| &l.owner_id == owner && filter.matches(l))
            .cloned()
            .collect())
    }

    async fn find_log_by_path(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
    ) -> Result<Option<Log>> {
        let inner = self.read()?;
        Ok(inner
            .logs
            .iter()
            .find(|l| &l.owner_id == owner && l.space_id == space_id && l.path == path)
            .cloned())
    }

    async fn update_log(&self, log: &Log) -> Result<bool> {
        let mut inner = self.write()?;
        if log_path_taken(&inner.logs, log) {
            return Err(WorkspaceError::Conflict(format!(
                "log already exists at {}",
                log.path
            )));
        }
        match inner
            .logs
            .iter_mut()
            .find(|l| l.id == log.id && l.owner_id == log.owner_id)
        {
            Some(existing) => {
                existing.name = log.name.clone();
                existing.path = log.path.clone();
                existing.language = log.language.clone();
                existing.content = log.content.clone();
                existing.updated_at = log.updated_at;
                Ok(true)
            }
            None => Ok(false),
        }
    }

    async fn delete_log(&self, owner: &OwnerId, id: Uuid) -> Result<bool> {
        let mut inner = self.write()?;
        let removed = remove_where(&mut inner.logs, |l| l.id == id && &l.owner_id == owner);
        Ok(removed > 0)
    }

    async fn delete_logs_in_vaults(&self, owner: &OwnerId, vault_ids: &[Uuid]) -> Result<u64> {
        let mut inner = self.write()?;
        Ok(remove_where(&mut inner.logs, |l| {
            &l.owner_id == owner && vault_ids.contains(&l.vault_id)
        }))
    }

    async fn delete_logs_in_space(&self, owner: &OwnerId, space_id: Uuid) -> Result<u64> {
        let mut inner = self.write()?;
        Ok(remove_where(&mut inner.logs, |l| {
            &l.owner_id == owner && l.space_id == space_id
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_space_lookup_is_owner_scoped() {
        let provider = MemoryWorkspaceProvider::new();
        let alice = OwnerId::new("alice");
        let bob = OwnerId::new("bob");

        let space = Space::new(&alice, "notes");
        provider.insert_space(&space).await.unwrap();

        assert!(provider.get_space(&alice, space.id).await.unwrap().is_some());
        assert!(provider.get_space(&bob, space.id).await.unwrap().is_none());
        assert!(!provider.delete_space(&bob, space.id).await.unwrap());
        assert!(provider.delete_space(&alice, space.id).await.unwrap());
    }

    #[tokio::test]
    async fn test_bulk_deletes_on_absent_ids_are_noops() {
        let provider = MemoryWorkspaceProvider::new();
        let owner = OwnerId::default();

        let removed = provider
            .delete_vaults(&owner, &[Uuid::new_v4(), Uuid::new_v4()])
            .await
            .unwrap();
        assert_eq!(removed, 0);

        let removed = provider
            .delete_logs_in_space(&owner, Uuid::new_v4())
            .await
            .unwrap();
        assert_eq!(removed, 0);
    }
}
