//! Cascading deletes and repaths over a [`WorkspaceProvider`]
//!
//! Each cascade is a fixed sequence of bulk steps. Steps that find nothing
//! to touch are no-ops, so a cascade that failed half way can simply be
//! run again. Nothing here is transactional.

use std::collections::HashSet;

use time::OffsetDateTime;
use uuid::Uuid;

use super::model::{Log, LogFilter, Vault};
use super::path::rebase_path;
use super::provider::{EntityKind, WorkspaceError, WorkspaceProvider};
use crate::owner::OwnerId;

/// Rows touched by a cascade
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CascadeReport {
    pub vaults: u64,
    pub logs: u64,
}

/// Delete a space together with every vault and log inside it.
pub async fn delete_space<P: WorkspaceProvider>(
    provider: &P,
    owner: &OwnerId,
    space_id: Uuid,
) -> Result<CascadeReport, WorkspaceError<P::Error>> {
    if provider.get_space(owner, space_id).await?.is_none() {
        return Err(WorkspaceError::not_found(EntityKind::Space, space_id));
    }

    let logs = provider.delete_logs_in_space(owner, space_id).await?;
    let vaults = provider.delete_vaults_in_space(owner, space_id).await?;

    if !provider.delete_space(owner, space_id).await? {
        return Err(WorkspaceError::not_found(EntityKind::Space, space_id));
    }

    tracing::debug!(%space_id, vaults, logs, "space deleted");
    Ok(CascadeReport { vaults, logs })
}

/// Collect every vault below `root_id`, breadth first.
///
/// The root itself is not included. A visited set keeps malformed parent
/// cycles from looping.
pub async fn descendant_vaults<P: WorkspaceProvider>(
    provider: &P,
    owner: &OwnerId,
    root_id: Uuid,
) -> Result<Vec<Vault>, WorkspaceError<P::Error>> {
    let mut visited = HashSet::from([root_id]);
    let mut frontier = vec![root_id];
    let mut descendants = Vec::new();

    while !frontier.is_empty() {
        let children = provider.child_vaults(owner, &frontier).await?;
        frontier = Vec::new();
        for child in children {
            if visited.insert(child.id) {
                frontier.push(child.id);
                descendants.push(child);
            }
        }
    }

    Ok(descendants)
}

/// Delete a vault, all vaults nested below it, and every log any of them holds.
pub async fn delete_vault<P: WorkspaceProvider>(
    provider: &P,
    owner: &OwnerId,
    vault_id: Uuid,
) -> Result<CascadeReport, WorkspaceError<P::Error>> {
    if provider.get_vault(owner, vault_id).await?.is_none() {
        return Err(WorkspaceError::not_found(EntityKind::Vault, vault_id));
    }

    let descendant_ids: Vec<Uuid> = descendant_vaults(provider, owner, vault_id)
        .await?
        .into_iter()
        .map(|v| v.id)
        .collect();

    let mut all_ids = Vec::with_capacity(descendant_ids.len() + 1);
    all_ids.push(vault_id);
    all_ids.extend_from_slice(&descendant_ids);

    let logs = provider.delete_logs_in_vaults(owner, &all_ids).await?;
    let mut vaults = provider.delete_vaults(owner, &descendant_ids).await?;

    if provider.delete_vaults(owner, &[vault_id]).await? == 0 {
        return Err(WorkspaceError::not_found(EntityKind::Vault, vault_id));
    }
    vaults += 1;

    tracing::debug!(%vault_id, vaults, logs, "vault deleted");
    Ok(CascadeReport { vaults, logs })
}

/// Rebased copies of everything below a vault that is about to move.
///
/// Built by [`plan_repath`] before anything is written, so a rename whose
/// cascade would collide is refused while the tree is still intact.
#[derive(Debug, Clone, Default)]
pub struct RepathPlan {
    vaults: Vec<Vault>,
    logs: Vec<Log>,
}

impl RepathPlan {
    pub fn vaults(&self) -> &[Vault] {
        &self.vaults
    }

    pub fn logs(&self) -> &[Log] {
        &self.logs
    }

    /// Write every rebased path. Only call this once the moved vault itself
    /// has been written.
    pub async fn apply<P: WorkspaceProvider>(
        self,
        provider: &P,
    ) -> Result<CascadeReport, WorkspaceError<P::Error>> {
        let mut report = CascadeReport::default();
        for vault in &self.vaults {
            if provider.update_vault(vault).await? {
                report.vaults += 1;
            }
        }
        for log in &self.logs {
            if provider.update_log(log).await? {
                report.logs += 1;
            }
        }
        Ok(report)
    }
}

/// Work out the new path of every vault and log below `vault` once it moves
/// from its stored path to `new_path`.
///
/// Fails with `Conflict` if any rebased path is already held by a record
/// other than the one being moved there. Nothing is written.
pub async fn plan_repath<P: WorkspaceProvider>(
    provider: &P,
    owner: &OwnerId,
    vault: &Vault,
    new_path: &str,
) -> Result<RepathPlan, WorkspaceError<P::Error>> {
    let old_path = vault.path.as_str();
    let mut plan = RepathPlan::default();
    if old_path == new_path {
        return Ok(plan);
    }

    let now = OffsetDateTime::now_utc();
    let descendants = descendant_vaults(provider, owner, vault.id).await?;

    for mut child in descendants.iter().cloned() {
        let Some(path) = rebase_path(&child.path, old_path, new_path) else {
            continue;
        };
        if let Some(holder) = provider
            .find_vault_by_path(owner, child.space_id, &path)
            .await?
        {
            if holder.id != child.id {
                return Err(WorkspaceError::Conflict(format!(
                    "vault already exists at {}",
                    path
                )));
            }
        }
        child.path = path;
        child.updated_at = now;
        plan.vaults.push(child);
    }

    let vault_ids = std::iter::once(vault.id).chain(descendants.iter().map(|v| v.id));
    for vault_id in vault_ids {
        for mut log in provider.list_logs(owner, LogFilter::vault(vault_id)).await? {
            let Some(path) = rebase_path(&log.path, old_path, new_path) else {
                continue;
            };
            if let Some(holder) = provider.find_log_by_path(owner, log.space_id, &path).await? {
                if holder.id != log.id {
                    return Err(WorkspaceError::Conflict(format!(
                        "log already exists at {}",
                        path
                    )));
                }
            }
            log.path = path;
            log.updated_at = now;
            plan.logs.push(log);
        }
    }

    Ok(plan)
}
