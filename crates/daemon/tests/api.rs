//! HTTP surface tests driven through the full router

mod common;

use axum::body::Body;
use http::{Request, StatusCode};
use serde_json::{json, Value};

use common::{request, send, test_router};

async fn create(router: &axum::Router, uri: &str, body: Value) -> Value {
    let (status, value) = send(router, request("POST", uri, Some(body))).await;
    assert_eq!(status, StatusCode::CREATED, "create {} failed: {}", uri, value);
    value
}

fn id_of(value: &Value) -> String {
    value["id"].as_str().unwrap().to_string()
}

#[tokio::test]
async fn test_status_routes() {
    let router = test_router().await;

    for probe in ["/_status/livez", "/_status/readyz", "/_status/version"] {
        let (status, _) = send(&router, request("GET", probe, None)).await;
        assert_eq!(status, StatusCode::OK, "{}", probe);
    }
}

#[tokio::test]
async fn test_writes_require_token() {
    let router = test_router().await;

    let unauthenticated = Request::builder()
        .method("POST")
        .uri("/api/v0/spaces")
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from(json!({"name": "demo"}).to_string()))
        .unwrap();
    let (status, body) = send(&router, unauthenticated).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(body["code"], "UNAUTHORIZED");

    let wrong_token = Request::builder()
        .method("DELETE")
        .uri(format!("/api/v0/spaces/{}", uuid::Uuid::new_v4()))
        .header(http::header::AUTHORIZATION, "Bearer nope")
        .body(Body::empty())
        .unwrap();
    let (status, _) = send(&router, wrong_token).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    // reads pass without a token
    let read = Request::builder()
        .method("GET")
        .uri("/api/v0/spaces")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, read).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!([]));
}

#[tokio::test]
async fn test_build_and_read_tree() {
    let router = test_router().await;

    let space = create(&router, "/api/v0/spaces", json!({"name": "demo"})).await;
    let space_id = id_of(&space);

    let src = create(
        &router,
        "/api/v0/vaults",
        json!({"spaceId": space_id, "name": "src"}),
    )
    .await;
    assert_eq!(src["path"], "src");
    assert!(src.get("parentVaultId").is_none());

    let util = create(
        &router,
        "/api/v0/vaults",
        json!({"spaceId": space_id, "name": "util", "parentId": id_of(&src)}),
    )
    .await;
    assert_eq!(util["path"], "src/util");
    assert_eq!(util["parentVaultId"], src["id"]);

    let log = create(
        &router,
        "/api/v0/logs",
        json!({
            "spaceId": space_id,
            "vaultId": id_of(&util),
            "name": "helpers.py",
            "code": "print(1)"
        }),
    )
    .await;
    assert_eq!(log["path"], "src/util/helpers.py");
    assert_eq!(log["language"], "python");
    assert_eq!(log["content"], "print(1)");

    let (status, tree) = send(
        &router,
        request("GET", &format!("/api/v0/tree?spaceId={}", space_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(tree.as_array().unwrap().len(), 1);
    assert_eq!(tree[0]["type"], "vault");
    assert_eq!(tree[0]["children"][0]["name"], "util");
    assert_eq!(tree[0]["children"][0]["children"][0]["type"], "log");
    assert_eq!(tree[0]["children"][0]["children"][0]["language"], "python");

    let (status, logs) = send(
        &router,
        request("GET", &format!("/api/v0/logs?vaultId={}", id_of(&util)), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(logs.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn test_vault_rename_moves_nested_paths() {
    let router = test_router().await;

    let space_id = id_of(&create(&router, "/api/v0/spaces", json!({"name": "demo"})).await);
    let root = create(
        &router,
        "/api/v0/vaults",
        json!({"spaceId": space_id, "name": "src"}),
    )
    .await;
    let log = create(
        &router,
        "/api/v0/logs",
        json!({"spaceId": space_id, "vaultId": id_of(&root), "name": "main.rs"}),
    )
    .await;

    let (status, renamed) = send(
        &router,
        request(
            "PUT",
            &format!("/api/v0/vaults/{}", id_of(&root)),
            Some(json!({"name": "lib"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(renamed["path"], "lib");

    let (_, log) = send(
        &router,
        request("GET", &format!("/api/v0/logs/{}", id_of(&log)), None),
    )
    .await;
    assert_eq!(log["path"], "lib/main.rs");
    assert_eq!(log["language"], "rust");
}

#[tokio::test]
async fn test_error_codes() {
    let router = test_router().await;
    let space_id = id_of(&create(&router, "/api/v0/spaces", json!({"name": "demo"})).await);

    // malformed id
    let (status, body) = send(&router, request("GET", "/api/v0/spaces/not-a-uuid", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    // well-formed but unknown id
    let (status, body) = send(
        &router,
        request(
            "GET",
            &format!("/api/v0/vaults/{}", uuid::Uuid::new_v4()),
            None,
        ),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");

    // missing parent reference
    let (status, body) = send(
        &router,
        request("POST", "/api/v0/vaults", Some(json!({"name": "src"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REFERENCE");

    // empty name
    let (status, body) = send(
        &router,
        request(
            "POST",
            "/api/v0/vaults",
            Some(json!({"spaceId": space_id, "name": "  "})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    // duplicate sibling
    create(
        &router,
        "/api/v0/vaults",
        json!({"spaceId": space_id, "name": "src"}),
    )
    .await;
    let (status, body) = send(
        &router,
        request(
            "POST",
            "/api/v0/vaults",
            Some(json!({"spaceId": space_id, "name": "src"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["code"], "CONFLICT");

    // tree without a space
    let (status, body) = send(&router, request("GET", "/api/v0/tree", None)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");

    // body that is not JSON
    let bad_json = Request::builder()
        .method("POST")
        .uri("/api/v0/spaces")
        .header(http::header::AUTHORIZATION, format!("Bearer {}", common::ADMIN_TOKEN))
        .header(http::header::CONTENT_TYPE, "application/json")
        .body(Body::from("{not json"))
        .unwrap();
    let (status, body) = send(&router, bad_json).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_log_space_must_match_vault() {
    let router = test_router().await;

    let first = id_of(&create(&router, "/api/v0/spaces", json!({"name": "one"})).await);
    let second = id_of(&create(&router, "/api/v0/spaces", json!({"name": "two"})).await);
    let vault = create(
        &router,
        "/api/v0/vaults",
        json!({"spaceId": first, "name": "src"}),
    )
    .await;

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/api/v0/logs",
            Some(json!({"spaceId": second, "vaultId": id_of(&vault), "name": "a.js"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_REFERENCE");
}

#[tokio::test]
async fn test_space_delete_cascades() {
    let router = test_router().await;

    let space_id = id_of(&create(&router, "/api/v0/spaces", json!({"name": "demo"})).await);
    let vault = create(
        &router,
        "/api/v0/vaults",
        json!({"spaceId": space_id, "name": "src"}),
    )
    .await;
    create(
        &router,
        "/api/v0/logs",
        json!({"spaceId": space_id, "vaultId": id_of(&vault), "name": "a.go"}),
    )
    .await;

    let (status, body) = send(
        &router,
        request("DELETE", &format!("/api/v0/spaces/{}", space_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["message"], "Space deleted successfully");

    let (_, vaults) = send(
        &router,
        request("GET", &format!("/api/v0/vaults?spaceId={}", space_id), None),
    )
    .await;
    assert_eq!(vaults, json!([]));
    let (_, logs) = send(
        &router,
        request("GET", &format!("/api/v0/logs?spaceId={}", space_id), None),
    )
    .await;
    assert_eq!(logs, json!([]));

    let (status, _) = send(
        &router,
        request("DELETE", &format!("/api/v0/spaces/{}", space_id), None),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn test_run_proxies_to_runner() {
    let router = test_router().await;

    let (status, body) = send(
        &router,
        request(
            "POST",
            "/api/v0/run",
            Some(json!({"language": "python", "code": "print(1)"})),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["stdout"], "print(1)");
    assert_eq!(body["code"], 0);

    let (status, body) = send(
        &router,
        request("POST", "/api/v0/run", Some(json!({"language": "python"}))),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["code"], "INVALID_INPUT");
}

#[tokio::test]
async fn test_generate_falls_back_then_exhausts() {
    let router = test_router().await;
    let body = json!({"prompt": "print hi", "language": "python"});

    // the first provider fails, the second answers
    let (status, generated) = send(
        &router,
        request("POST", "/api/v0/ai/generate", Some(body.clone())),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(generated["provider"], "gemini");
    assert_eq!(generated["code"], "print('hi')");

    // the second provider's window is spent and the first still fails
    let (status, failure) = send(
        &router,
        request("POST", "/api/v0/ai/generate", Some(body)),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_GATEWAY);
    assert_eq!(failure["code"], "PROVIDER_UNAVAILABLE");
}

#[tokio::test]
async fn test_unknown_route_is_json_404() {
    let router = test_router().await;

    let req = Request::builder()
        .uri("/api/v0/nope")
        .header(http::header::ACCEPT, "application/json")
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, req).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["code"], "NOT_FOUND");
}
