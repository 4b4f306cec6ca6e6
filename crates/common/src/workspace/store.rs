use time::OffsetDateTime;
use uuid::Uuid;

use super::cascade::{self, CascadeReport};
use super::language::infer_language;
use super::model::{Log, LogFilter, LogPatch, NewLog, NewVault, Space, Vault};
use super::path::resolve_path;
use super::provider::{EntityKind, WorkspaceError, WorkspaceProvider};
use super::tree::{build_tree, TreeNode};
use crate::owner::OwnerId;

type Result<T, E> = std::result::Result<T, WorkspaceError<E>>;

/// Entity store for spaces, vaults and logs.
///
/// Owns the rules the provider does not: name validation, reference checks,
/// path resolution, path uniqueness and the cascades.
#[derive(Debug, Clone)]
pub struct Workspace<P: WorkspaceProvider> {
    provider: P,
}

fn validate_name<E>(name: &str, what: &str) -> Result<String, E> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(WorkspaceError::InvalidInput(format!(
            "{} name must not be empty",
            what
        )));
    }
    Ok(trimmed.to_string())
}

impl<P: WorkspaceProvider> Workspace<P> {
    pub fn new(provider: P) -> Self {
        Self { provider }
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    // Spaces

    pub async fn create_space(&self, owner: &OwnerId, name: &str) -> Result<Space, P::Error> {
        let name = validate_name::<P::Error>(name, "space")?;
        let space = Space::new(owner, name);
        self.provider.insert_space(&space).await?;
        tracing::debug!(space_id = %space.id, "space created");
        Ok(space)
    }

    pub async fn get_space(&self, owner: &OwnerId, id: Uuid) -> Result<Space, P::Error> {
        self.provider
            .get_space(owner, id)
            .await?
            .ok_or(WorkspaceError::not_found(EntityKind::Space, id))
    }

    pub async fn list_spaces(&self, owner: &OwnerId) -> Result<Vec<Space>, P::Error> {
        self.provider.list_spaces(owner).await
    }

    pub async fn rename_space(
        &self,
        owner: &OwnerId,
        id: Uuid,
        name: &str,
    ) -> Result<Space, P::Error> {
        let name = validate_name::<P::Error>(name, "space")?;
        let mut space = self.get_space(owner, id).await?;
        space.name = name;
        space.updated_at = OffsetDateTime::now_utc();
        if !self.provider.update_space(&space).await? {
            return Err(WorkspaceError::not_found(EntityKind::Space, id));
        }
        Ok(space)
    }

    pub async fn delete_space(&self, owner: &OwnerId, id: Uuid) -> Result<CascadeReport, P::Error> {
        cascade::delete_space(&self.provider, owner, id).await
    }

    // Vaults

    pub async fn create_vault(&self, owner: &OwnerId, new: NewVault) -> Result<Vault, P::Error> {
        let name = validate_name::<P::Error>(&new.name, "vault")?;
        let space = self.get_space(owner, new.space_id).await?;

        let parent_path = match new.parent_vault_id {
            Some(parent_id) => {
                let parent = self
                    .provider
                    .get_vault(owner, parent_id)
                    .await?
                    .filter(|p| p.space_id == space.id)
                    .ok_or(WorkspaceError::not_found(EntityKind::Vault, parent_id))?;
                Some(parent.path)
            }
            None => None,
        };

        let path = resolve_path(&name, parent_path.as_deref());
        self.ensure_vault_path_free(owner, space.id, &path, None)
            .await?;

        let now = OffsetDateTime::now_utc();
        let vault = Vault {
            id: Uuid::new_v4(),
            space_id: space.id,
            owner_id: owner.clone(),
            name,
            path,
            parent_vault_id: new.parent_vault_id,
            created_at: now,
            updated_at: now,
        };
        self.provider.insert_vault(&vault).await?;
        tracing::debug!(vault_id = %vault.id, path = %vault.path, "vault created");
        Ok(vault)
    }

    pub async fn get_vault(&self, owner: &OwnerId, id: Uuid) -> Result<Vault, P::Error> {
        self.provider
            .get_vault(owner, id)
            .await?
            .ok_or(WorkspaceError::not_found(EntityKind::Vault, id))
    }

    pub async fn list_vaults(
        &self,
        owner: &OwnerId,
        space_id: Option<Uuid>,
    ) -> Result<Vec<Vault>, P::Error> {
        self.provider.list_vaults(owner, space_id).await
    }

    /// Rename a vault and rewrite the paths of everything nested below it.
    pub async fn rename_vault(
        &self,
        owner: &OwnerId,
        id: Uuid,
        name: &str,
    ) -> Result<Vault, P::Error> {
        let name = validate_name::<P::Error>(name, "vault")?;
        let mut vault = self.get_vault(owner, id).await?;

        // a parent that has since vanished leaves the vault at the top level
        let parent_path = match vault.parent_vault_id {
            Some(parent_id) => self
                .provider
                .get_vault(owner, parent_id)
                .await?
                .map(|parent| parent.path),
            None => None,
        };

        let path = resolve_path(&name, parent_path.as_deref());
        self.ensure_vault_path_free(owner, vault.space_id, &path, Some(vault.id))
            .await?;

        // every rebased path is checked before the first write
        let plan = cascade::plan_repath(&self.provider, owner, &vault, &path).await?;

        vault.path = path;
        vault.name = name;
        vault.updated_at = OffsetDateTime::now_utc();
        if !self.provider.update_vault(&vault).await? {
            return Err(WorkspaceError::not_found(EntityKind::Vault, id));
        }

        let report = plan.apply(&self.provider).await?;
        tracing::debug!(
            vault_id = %vault.id,
            vaults = report.vaults,
            logs = report.logs,
            "vault renamed"
        );
        Ok(vault)
    }

    pub async fn delete_vault(&self, owner: &OwnerId, id: Uuid) -> Result<CascadeReport, P::Error> {
        cascade::delete_vault(&self.provider, owner, id).await
    }

    // Logs

    pub async fn create_log(&self, owner: &OwnerId, new: NewLog) -> Result<Log, P::Error> {
        let name = validate_name::<P::Error>(&new.name, "log")?;
        let vault = self.get_vault(owner, new.vault_id).await?;
        if vault.space_id != new.space_id {
            return Err(WorkspaceError::InvalidReference(format!(
                "vault {} does not belong to space {}",
                vault.id, new.space_id
            )));
        }

        let path = resolve_path(&name, Some(&vault.path));
        self.ensure_log_path_free(owner, vault.space_id, &path, None)
            .await?;

        let language = match new.language {
            Some(language) if !language.trim().is_empty() => language,
            _ => infer_language(&name).to_string(),
        };

        let now = OffsetDateTime::now_utc();
        let log = Log {
            id: Uuid::new_v4(),
            space_id: vault.space_id,
            vault_id: vault.id,
            owner_id: owner.clone(),
            name,
            path,
            language,
            content: new.content.unwrap_or_default(),
            created_at: now,
            updated_at: now,
        };
        self.provider.insert_log(&log).await?;
        tracing::debug!(log_id = %log.id, path = %log.path, "log created");
        Ok(log)
    }

    pub async fn get_log(&self, owner: &OwnerId, id: Uuid) -> Result<Log, P::Error> {
        self.provider
            .get_log(owner, id)
            .await?
            .ok_or(WorkspaceError::not_found(EntityKind::Log, id))
    }

    pub async fn list_logs(
        &self,
        owner: &OwnerId,
        filter: LogFilter,
    ) -> Result<Vec<Log>, P::Error> {
        self.provider.list_logs(owner, filter).await
    }

    /// Apply a partial update. Renaming recomputes the path from the vault's
    /// current path and re-infers the language unless one is supplied.
    pub async fn update_log(
        &self,
        owner: &OwnerId,
        id: Uuid,
        patch: LogPatch,
    ) -> Result<Log, P::Error> {
        let mut log = self.get_log(owner, id).await?;

        if let Some(name) = patch.name {
            let name = validate_name::<P::Error>(&name, "log")?;
            let vault = self.get_vault(owner, log.vault_id).await?;
            let path = resolve_path(&name, Some(&vault.path));
            self.ensure_log_path_free(owner, log.space_id, &path, Some(log.id))
                .await?;
            log.language = infer_language(&name).to_string();
            log.path = path;
            log.name = name;
        }
        if let Some(language) = patch.language.filter(|l| !l.trim().is_empty()) {
            log.language = language;
        }
        if let Some(content) = patch.content {
            log.content = content;
        }
        log.updated_at = OffsetDateTime::now_utc();

        if !self.provider.update_log(&log).await? {
            return Err(WorkspaceError::not_found(EntityKind::Log, id));
        }
        Ok(log)
    }

    pub async fn delete_log(&self, owner: &OwnerId, id: Uuid) -> Result<(), P::Error> {
        if !self.provider.delete_log(owner, id).await? {
            return Err(WorkspaceError::not_found(EntityKind::Log, id));
        }
        Ok(())
    }

    // Tree

    /// Nested view of every vault and log in a space
    pub async fn tree(&self, owner: &OwnerId, space_id: Uuid) -> Result<Vec<TreeNode>, P::Error> {
        self.get_space(owner, space_id).await?;
        let vaults = self.provider.list_vaults(owner, Some(space_id)).await?;
        let logs = self
            .provider
            .list_logs(owner, LogFilter::space(space_id))
            .await?;
        Ok(build_tree(&vaults, &logs))
    }

    async fn ensure_vault_path_free(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
        except: Option<Uuid>,
    ) -> Result<(), P::Error> {
        match self.provider.find_vault_by_path(owner, space_id, path).await? {
            Some(existing) if Some(existing.id) != except => Err(WorkspaceError::Conflict(
                format!("vault already exists at {}", path),
            )),
            _ => Ok(()),
        }
    }

    async fn ensure_log_path_free(
        &self,
        owner: &OwnerId,
        space_id: Uuid,
        path: &str,
        except: Option<Uuid>,
    ) -> Result<(), P::Error> {
        match self.provider.find_log_by_path(owner, space_id, path).await? {
            Some(existing) if Some(existing.id) != except => Err(WorkspaceError::Conflict(
                format!("log already exists at {}", path),
            )),
            _ => Ok(()),
        }
    }
}
