use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, DeletedResponse, Owner, RecordId, CASCADE_DEADLINE,
};
use crate::ServiceState;

/// Delete a space together with every vault and log in it
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteSpaceRequest {
    pub space_id: Uuid,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
) -> Result<Response, ApiFailure> {
    let report = with_deadline(CASCADE_DEADLINE, state.workspace().delete_space(&owner, id)).await?;

    tracing::info!(
        space_id = %id,
        vaults = report.vaults,
        logs = report.logs,
        "space deleted"
    );
    Ok((
        http::StatusCode::OK,
        Json(DeletedResponse {
            message: "Space deleted successfully".to_string(),
        }),
    )
        .into_response())
}

impl ApiRequest for DeleteSpaceRequest {
    type Response = DeletedResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/spaces/{}", self.space_id))
            .unwrap();
        client.delete(full_url)
    }
}
