//! Workspace behaviour over the SQLite provider; the same scenarios the
//! in-memory provider is held to.

mod common;

use ::common::prelude::{NewVault, OwnerId, WorkspaceError};
use ::common::testkit::scenarios;

#[tokio::test]
async fn test_paths_follow_parents() {
    scenarios::paths_follow_parents(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_space_delete_cascades() {
    scenarios::space_delete_cascades(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_vault_delete_is_transitive() {
    scenarios::vault_delete_is_transitive(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_vault_delete_spares_siblings() {
    scenarios::vault_delete_spares_siblings(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_cascade_rerun_is_safe() {
    scenarios::cascade_rerun_is_safe(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_vault_rename_repaths_descendants() {
    scenarios::vault_rename_repaths_descendants(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_log_rename_is_local() {
    scenarios::log_rename_is_local(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_tree_nests_children() {
    scenarios::tree_nests_children(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_owner_isolation() {
    scenarios::owner_isolation(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_rejects_bad_writes() {
    scenarios::rejects_bad_writes(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_rename_refuses_nested_collision() {
    scenarios::rename_refuses_nested_collision(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_provider_refuses_duplicate_paths() {
    scenarios::provider_refuses_duplicate_paths(&common::sqlite_workspace().await).await;
}

#[tokio::test]
async fn test_racing_creates_yield_one_conflict() {
    let ws = common::sqlite_workspace().await;
    let owner = OwnerId::default();
    let space = ws.create_space(&owner, "race").await.unwrap();
    let new_vault = || NewVault {
        space_id: space.id,
        name: "dup".to_string(),
        parent_vault_id: None,
    };

    let (first, second) = tokio::join!(
        ws.create_vault(&owner, new_vault()),
        ws.create_vault(&owner, new_vault())
    );
    let results = [first, second];
    assert_eq!(results.iter().filter(|r| r.is_ok()).count(), 1);
    assert!(results
        .iter()
        .any(|r| matches!(r, Err(WorkspaceError::Conflict(_)))));
    assert_eq!(ws.list_vaults(&owner, Some(space.id)).await.unwrap().len(), 1);
}

#[tokio::test]
async fn test_database_ping() {
    common::memory_database().await.ping().await.unwrap();
}
