//! Behavioural scenarios every [`WorkspaceProvider`] must pass
//!
//! Each scenario takes a fresh, empty workspace and panics on failure.

use uuid::Uuid;

use super::{add_log, add_vault, seed_workspace};
use crate::owner::OwnerId;
use crate::workspace::{
    EntityKind, Log, LogFilter, LogPatch, NewLog, NewVault, NodeKind, Vault, Workspace,
    WorkspaceError, WorkspaceProvider,
};

/// Root paths equal the name; child paths join the parent's path.
pub async fn paths_follow_parents<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;

    assert_eq!(seed.root.path, "root");
    assert_eq!(seed.mid.path, "root/mid");
    assert_eq!(seed.leaf.path, "root/mid/leaf");
    assert_eq!(seed.deep_rs.path, "root/mid/leaf/deep.rs");
    assert_eq!(seed.deep_rs.language, "rust");
    assert_eq!(seed.app_py.language, "python");

    let fetched = ws.get_vault(&owner, seed.leaf.id).await.unwrap();
    assert_eq!(fetched.path, "root/mid/leaf");
    assert_eq!(fetched.parent_vault_id, Some(seed.mid.id));
}

/// Deleting a space leaves nothing behind that references it.
pub async fn space_delete_cascades<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;
    let other = seed_workspace(ws, &owner).await;

    let report = ws.delete_space(&owner, seed.space.id).await.unwrap();
    assert_eq!(report.vaults, 4);
    assert_eq!(report.logs, 3);

    assert!(matches!(
        ws.get_space(&owner, seed.space.id).await,
        Err(WorkspaceError::NotFound {
            kind: EntityKind::Space,
            ..
        })
    ));
    assert!(ws
        .list_vaults(&owner, Some(seed.space.id))
        .await
        .unwrap()
        .is_empty());
    assert!(ws
        .list_logs(&owner, LogFilter::space(seed.space.id))
        .await
        .unwrap()
        .is_empty());

    // unrelated spaces are untouched
    assert_eq!(
        ws.list_vaults(&owner, Some(other.space.id)).await.unwrap().len(),
        4
    );
}

/// Deleting the top of a three level chain removes every vault and log below.
pub async fn vault_delete_is_transitive<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;

    let report = ws.delete_vault(&owner, seed.root.id).await.unwrap();
    assert_eq!(report.vaults, 4);
    assert_eq!(report.logs, 3);

    for id in seed.vault_ids() {
        assert!(ws.get_vault(&owner, id).await.is_err());
    }
    for id in seed.log_ids() {
        assert!(ws.get_log(&owner, id).await.is_err());
    }
    // the space itself survives
    ws.get_space(&owner, seed.space.id).await.unwrap();
}

/// Deleting an inner vault spares its parent and siblings.
pub async fn vault_delete_spares_siblings<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;

    ws.delete_vault(&owner, seed.mid.id).await.unwrap();

    ws.get_vault(&owner, seed.root.id).await.unwrap();
    ws.get_vault(&owner, seed.side.id).await.unwrap();
    ws.get_log(&owner, seed.index_js.id).await.unwrap();
    assert!(ws.get_vault(&owner, seed.leaf.id).await.is_err());
    assert!(ws.get_log(&owner, seed.app_py.id).await.is_err());
    assert!(ws.get_log(&owner, seed.deep_rs.id).await.is_err());
}

/// A missing root is reported without touching anything, and a repeated
/// delete is safe.
pub async fn cascade_rerun_is_safe<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;

    let missing = Uuid::new_v4();
    assert!(matches!(
        ws.delete_vault(&owner, missing).await,
        Err(WorkspaceError::NotFound { id, .. }) if id == missing
    ));
    assert_eq!(ws.list_vaults(&owner, None).await.unwrap().len(), 4);

    // simulate a cascade that died after removing the logs
    ws.provider()
        .delete_logs_in_space(&owner, seed.space.id)
        .await
        .unwrap();

    let report = ws.delete_space(&owner, seed.space.id).await.unwrap();
    assert_eq!(report.logs, 0);
    assert_eq!(report.vaults, 4);

    assert!(matches!(
        ws.delete_space(&owner, seed.space.id).await,
        Err(WorkspaceError::NotFound { .. })
    ));
}

/// Renaming a vault repaths every descendant vault and log.
pub async fn vault_rename_repaths_descendants<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;

    let renamed = ws.rename_vault(&owner, seed.mid.id, "core").await.unwrap();
    assert_eq!(renamed.path, "root/core");
    assert_eq!(renamed.name, "core");

    let leaf = ws.get_vault(&owner, seed.leaf.id).await.unwrap();
    assert_eq!(leaf.path, "root/core/leaf");
    let app = ws.get_log(&owner, seed.app_py.id).await.unwrap();
    assert_eq!(app.path, "root/core/app.py");
    let deep = ws.get_log(&owner, seed.deep_rs.id).await.unwrap();
    assert_eq!(deep.path, "root/core/leaf/deep.rs");

    // outside the renamed subtree nothing moves
    let side = ws.get_vault(&owner, seed.side.id).await.unwrap();
    assert_eq!(side.path, "root/side");
    let index = ws.get_log(&owner, seed.index_js.id).await.unwrap();
    assert_eq!(index.path, "root/index.js");
}

/// Renaming a log touches only that log.
pub async fn log_rename_is_local<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let space = ws.create_space(&owner, "solo").await.unwrap();
    let vault = add_vault(ws, &owner, &space, "src", None).await;
    let a = add_log(ws, &owner, &vault, "a.js", "1").await;
    let b = add_log(ws, &owner, &vault, "b.js", "2").await;

    let updated = ws
        .update_log(
            &owner,
            a.id,
            LogPatch {
                name: Some("a.py".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.path, "src/a.py");
    assert_eq!(updated.language, "python");
    assert_eq!(updated.content, "1");

    let sibling = ws.get_log(&owner, b.id).await.unwrap();
    assert_eq!(sibling.path, b.path);
    assert_eq!(sibling.language, b.language);
    let parent = ws.get_vault(&owner, vault.id).await.unwrap();
    assert_eq!(parent.path, vault.path);
    assert_eq!(parent.name, vault.name);

    let updated = ws
        .update_log(
            &owner,
            a.id,
            LogPatch {
                content: Some("print(2)".to_string()),
                ..Default::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.content, "print(2)");
    assert_eq!(updated.path, "src/a.py");
}

/// One root vault holding two logs and a child vault with one log.
pub async fn tree_nests_children<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let space = ws.create_space(&owner, "tree").await.unwrap();
    let root = add_vault(ws, &owner, &space, "root", None).await;
    add_log(ws, &owner, &root, "one.js", "").await;
    add_log(ws, &owner, &root, "two.js", "").await;
    let child = add_vault(ws, &owner, &space, "child", Some(&root)).await;
    add_log(ws, &owner, &child, "three.js", "").await;

    let tree = ws.tree(&owner, space.id).await.unwrap();
    assert_eq!(tree.len(), 1);
    assert_eq!(tree[0].children.len(), 3);

    // child vaults come before logs
    let first = &tree[0].children[0];
    assert_eq!(first.kind, NodeKind::Vault);
    assert_eq!(first.id, child.id);
    assert_eq!(first.children.len(), 1);
    assert_eq!(tree[0].children[1].name, "one.js");
    assert_eq!(tree[0].children[2].name, "two.js");

    let empty = ws.create_space(&owner, "empty").await.unwrap();
    assert!(ws.tree(&owner, empty.id).await.unwrap().is_empty());
    assert!(ws
        .list_vaults(&owner, Some(empty.id))
        .await
        .unwrap()
        .is_empty());
}

/// Records owned by someone else behave as if they did not exist.
pub async fn owner_isolation<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let alice = OwnerId::new("alice");
    let mallory = OwnerId::new("mallory");
    let seed = seed_workspace(ws, &alice).await;

    assert!(ws.get_space(&mallory, seed.space.id).await.is_err());
    assert!(ws.get_log(&mallory, seed.index_js.id).await.is_err());
    assert!(ws.list_spaces(&mallory).await.unwrap().is_empty());
    assert!(matches!(
        ws.delete_vault(&mallory, seed.root.id).await,
        Err(WorkspaceError::NotFound { .. })
    ));
    assert!(matches!(
        ws.delete_log(&mallory, seed.index_js.id).await,
        Err(WorkspaceError::NotFound { .. })
    ));
    assert!(matches!(
        ws.delete_space(&mallory, seed.space.id).await,
        Err(WorkspaceError::NotFound { .. })
    ));

    assert_eq!(ws.list_vaults(&alice, None).await.unwrap().len(), 4);
}

/// Reference, validation and uniqueness failures map to the right errors.
pub async fn rejects_bad_writes<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;
    let other = ws.create_space(&owner, "other").await.unwrap();

    // parent in a different space
    let result = ws
        .create_vault(
            &owner,
            NewVault {
                space_id: other.id,
                name: "x".to_string(),
                parent_vault_id: Some(seed.root.id),
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(WorkspaceError::NotFound {
            kind: EntityKind::Vault,
            ..
        })
    ));

    // unknown space
    let result = ws
        .create_vault(
            &owner,
            NewVault {
                space_id: Uuid::new_v4(),
                name: "x".to_string(),
                parent_vault_id: None,
            },
        )
        .await;
    assert!(matches!(
        result,
        Err(WorkspaceError::NotFound {
            kind: EntityKind::Space,
            ..
        })
    ));

    // log whose vault lives elsewhere
    let result = ws
        .create_log(
            &owner,
            NewLog {
                space_id: other.id,
                vault_id: seed.root.id,
                name: "x.js".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(WorkspaceError::InvalidReference(_))));

    // blank names
    assert!(matches!(
        ws.create_space(&owner, "   ").await,
        Err(WorkspaceError::InvalidInput(_))
    ));
    assert!(matches!(
        ws.rename_vault(&owner, seed.mid.id, "").await,
        Err(WorkspaceError::InvalidInput(_))
    ));

    // duplicate paths
    let result = ws
        .create_vault(
            &owner,
            NewVault {
                space_id: seed.space.id,
                name: "mid".to_string(),
                parent_vault_id: Some(seed.root.id),
            },
        )
        .await;
    assert!(matches!(result, Err(WorkspaceError::Conflict(_))));
    assert!(matches!(
        ws.rename_vault(&owner, seed.side.id, "mid").await,
        Err(WorkspaceError::Conflict(_))
    ));
    let result = ws
        .create_log(
            &owner,
            NewLog {
                space_id: seed.space.id,
                vault_id: seed.root.id,
                name: "index.js".to_string(),
                ..Default::default()
            },
        )
        .await;
    assert!(matches!(result, Err(WorkspaceError::Conflict(_))));

    // same name in another space is fine
    add_vault(ws, &owner, &other, "root", None).await;
}

/// A rename whose cascade would land on an occupied path is refused before
/// anything moves.
pub async fn rename_refuses_nested_collision<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let space = ws.create_space(&owner, "clash").await.unwrap();

    // "b/x" is a single root vault whose name holds a slash
    let taken = add_vault(ws, &owner, &space, "b/x", None).await;
    let a = add_vault(ws, &owner, &space, "a", None).await;
    let x = add_vault(ws, &owner, &space, "x", Some(&a)).await;

    let result = ws.rename_vault(&owner, a.id, "b").await;
    assert!(matches!(result, Err(WorkspaceError::Conflict(_))));

    assert_eq!(ws.get_vault(&owner, a.id).await.unwrap().path, "a");
    assert_eq!(ws.get_vault(&owner, x.id).await.unwrap().path, "a/x");
    assert_eq!(ws.get_vault(&owner, taken.id).await.unwrap().path, "b/x");

    // the same holds when the collision is on a log
    let p = add_vault(ws, &owner, &space, "p", None).await;
    let held = add_log(ws, &owner, &p, "e/f.js", "").await;
    let e = add_vault(ws, &owner, &space, "e", None).await;
    let f = add_log(ws, &owner, &e, "f.js", "").await;
    assert_eq!(held.path, "p/e/f.js");

    let result = ws.rename_vault(&owner, e.id, "p/e").await;
    assert!(matches!(result, Err(WorkspaceError::Conflict(_))));
    assert_eq!(ws.get_vault(&owner, e.id).await.unwrap().path, "e");
    assert_eq!(ws.get_log(&owner, f.id).await.unwrap().path, "e/f.js");

    let mut paths: Vec<String> = ws
        .list_vaults(&owner, Some(space.id))
        .await
        .unwrap()
        .into_iter()
        .map(|v| v.path)
        .collect();
    let total = paths.len();
    paths.sort();
    paths.dedup();
    assert_eq!(paths.len(), total);
}

/// A provider refuses a second record at an occupied path with `Conflict`,
/// even when the store's own check was skipped or raced.
pub async fn provider_refuses_duplicate_paths<P: WorkspaceProvider>(ws: &Workspace<P>) {
    let owner = OwnerId::default();
    let seed = seed_workspace(ws, &owner).await;

    let twin = Vault {
        id: Uuid::new_v4(),
        ..seed.side.clone()
    };
    assert!(matches!(
        ws.provider().insert_vault(&twin).await,
        Err(WorkspaceError::Conflict(_))
    ));

    let twin = Log {
        id: Uuid::new_v4(),
        ..seed.app_py.clone()
    };
    assert!(matches!(
        ws.provider().insert_log(&twin).await,
        Err(WorkspaceError::Conflict(_))
    ));

    // moving a record onto a taken path is refused too
    let moved = Vault {
        path: seed.mid.path.clone(),
        ..seed.side.clone()
    };
    assert!(matches!(
        ws.provider().update_vault(&moved).await,
        Err(WorkspaceError::Conflict(_))
    ));
    assert_eq!(
        ws.get_vault(&owner, seed.side.id).await.unwrap().path,
        "root/side"
    );
}
