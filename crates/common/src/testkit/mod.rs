//! Shared fixtures for exercising a [`WorkspaceProvider`] end to end
//!
//! Any provider can be checked against the same scenarios by building a
//! [`Workspace`] over it and handing it to [`seed_workspace`].
//!
//! # Example
//!
//! ```rust,ignore
//! use common::testkit::seed_workspace;
//! use common::prelude::*;
//!
//! #[tokio::test]
//! async fn test_cascade() {
//!     let ws = Workspace::new(MemoryWorkspaceProvider::new());
//!     let seed = seed_workspace(&ws, &OwnerId::default()).await;
//!     ws.delete_vault(&OwnerId::default(), seed.root.id).await.unwrap();
//! }
//! ```

pub mod scenarios;

use crate::owner::OwnerId;
use crate::workspace::{Log, NewLog, NewVault, Space, Vault, Workspace, WorkspaceProvider};

/// The seeded hierarchy:
///
/// ```text
/// project
/// └── root
///     ├── mid
///     │   ├── leaf
///     │   │   └── deep.rs
///     │   └── app.py
///     ├── side
///     └── index.js
/// ```
#[derive(Debug, Clone)]
pub struct Seed {
    pub space: Space,
    pub root: Vault,
    pub mid: Vault,
    pub side: Vault,
    pub leaf: Vault,
    pub index_js: Log,
    pub app_py: Log,
    pub deep_rs: Log,
}

impl Seed {
    pub fn vault_ids(&self) -> Vec<uuid::Uuid> {
        vec![self.root.id, self.mid.id, self.side.id, self.leaf.id]
    }

    pub fn log_ids(&self) -> Vec<uuid::Uuid> {
        vec![self.index_js.id, self.app_py.id, self.deep_rs.id]
    }
}

/// Populate a workspace with the [`Seed`] hierarchy. Panics on any failure.
pub async fn seed_workspace<P: WorkspaceProvider>(ws: &Workspace<P>, owner: &OwnerId) -> Seed {
    let space = ws.create_space(owner, "project").await.unwrap();

    let root = add_vault(ws, owner, &space, "root", None).await;
    let mid = add_vault(ws, owner, &space, "mid", Some(&root)).await;
    let side = add_vault(ws, owner, &space, "side", Some(&root)).await;
    let leaf = add_vault(ws, owner, &space, "leaf", Some(&mid)).await;

    let index_js = add_log(ws, owner, &root, "index.js", "console.log(1)").await;
    let app_py = add_log(ws, owner, &mid, "app.py", "print(1)").await;
    let deep_rs = add_log(ws, owner, &leaf, "deep.rs", "fn main() {}").await;

    Seed {
        space,
        root,
        mid,
        side,
        leaf,
        index_js,
        app_py,
        deep_rs,
    }
}

pub async fn add_vault<P: WorkspaceProvider>(
    ws: &Workspace<P>,
    owner: &OwnerId,
    space: &Space,
    name: &str,
    parent: Option<&Vault>,
) -> Vault {
    ws.create_vault(
        owner,
        NewVault {
            space_id: space.id,
            name: name.to_string(),
            parent_vault_id: parent.map(|p| p.id),
        },
    )
    .await
    .unwrap()
}

pub async fn add_log<P: WorkspaceProvider>(
    ws: &Workspace<P>,
    owner: &OwnerId,
    vault: &Vault,
    name: &str,
    content: &str,
) -> Log {
    ws.create_log(
        owner,
        NewLog {
            space_id: vault.space_id,
            vault_id: vault.id,
            name: name.to_string(),
            content: Some(content.to_string()),
            language: None,
        },
    )
    .await
    .unwrap()
}
