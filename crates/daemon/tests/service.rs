//! Service lifecycle: start over an in-memory store, then stop on request

use std::time::Duration;

use codeflow_daemon::{start_service, ServiceConfig};

#[tokio::test]
async fn test_start_then_shutdown() {
    let config = ServiceConfig {
        api_port: 0,
        ..Default::default()
    };

    let (state, handle) = start_service(&config).await;
    state.database().ping().await.unwrap();

    handle.shutdown();
    tokio::time::timeout(Duration::from_secs(5), handle.wait())
        .await
        .unwrap();
}
