//! Entity store edge cases that do not need a full fixture

mod common;

use ::common::prelude::*;
use ::common::workspace::EntityKind;
use uuid::Uuid;

#[tokio::test]
async fn test_explicit_language_wins_over_inference() {
    let ws = common::memory_workspace();
    let owner = OwnerId::default();
    let space = ws.create_space(&owner, "langs").await.unwrap();
    let vault = ws
        .create_vault(
            &owner,
            NewVault {
                space_id: space.id,
                name: "scripts".to_string(),
                parent_vault_id: None,
            },
        )
        .await
        .unwrap();

    let log = ws
        .create_log(
            &owner,
            NewLog {
                space_id: space.id,
                vault_id: vault.id,
                name: "build".to_string(),
                content: None,
                language: Some("python".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(log.language, "python");
    assert_eq!(log.content, "");

    let blank = ws
        .create_log(
            &owner,
            NewLog {
                space_id: space.id,
                vault_id: vault.id,
                name: "run.go".to_string(),
                content: None,
                language: Some("  ".to_string()),
            },
        )
        .await
        .unwrap();
    assert_eq!(blank.language, "go");
}

#[tokio::test]
async fn test_rename_space_keeps_id() {
    let ws = common::memory_workspace();
    let owner = OwnerId::default();
    let space = ws.create_space(&owner, "before").await.unwrap();

    let renamed = ws.rename_space(&owner, space.id, " after ").await.unwrap();
    assert_eq!(renamed.id, space.id);
    assert_eq!(renamed.name, "after");
    assert!(renamed.updated_at >= space.updated_at);

    let listed = ws.list_spaces(&owner).await.unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].name, "after");
}

#[tokio::test]
async fn test_missing_records_report_their_kind() {
    let ws = common::memory_workspace();
    let owner = OwnerId::default();
    let id = Uuid::new_v4();

    match ws.get_log(&owner, id).await {
        Err(WorkspaceError::NotFound { kind, id: missing }) => {
            assert_eq!(kind, EntityKind::Log);
            assert_eq!(missing, id);
        }
        other => panic!("expected NotFound, got {:?}", other),
    }
    assert!(matches!(
        ws.tree(&owner, id).await,
        Err(WorkspaceError::NotFound {
            kind: EntityKind::Space,
            ..
        })
    ));
    assert!(ws.list_vaults(&owner, Some(id)).await.unwrap().is_empty());
}

#[tokio::test]
async fn test_log_listing_filters() {
    let ws = common::memory_workspace();
    let owner = OwnerId::default();
    let seed = ::common::testkit::seed_workspace(&ws, &owner).await;

    let all = ws.list_logs(&owner, LogFilter::default()).await.unwrap();
    assert_eq!(all.len(), 3);
    let in_root = ws
        .list_logs(&owner, LogFilter::vault(seed.root.id))
        .await
        .unwrap();
    assert_eq!(in_root.len(), 1);
    assert_eq!(in_root[0].id, seed.index_js.id);
}
