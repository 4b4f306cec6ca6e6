use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, DeletedResponse, Owner, RecordId, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DeleteLogRequest {
    pub log_id: Uuid,
}

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
) -> Result<Response, ApiFailure> {
    with_deadline(SINGLE_OP_DEADLINE, state.workspace().delete_log(&owner, id)).await?;

    tracing::info!(log_id = %id, "log deleted");
    Ok((
        http::StatusCode::OK,
        Json(DeletedResponse {
            message: "Log deleted successfully".to_string(),
        }),
    )
        .into_response())
}

impl ApiRequest for DeleteLogRequest {
    type Response = DeletedResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/logs/{}", self.log_id))
            .unwrap();
        client.delete(full_url)
    }
}
