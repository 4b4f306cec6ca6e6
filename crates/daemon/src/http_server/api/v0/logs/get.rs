use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Log;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, Owner, RecordId, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetLogRequest {
    pub log_id: Uuid,
}

pub type GetLogResponse = Log;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
) -> Result<Response, ApiFailure> {
    let log = with_deadline(SINGLE_OP_DEADLINE, state.workspace().get_log(&owner, id)).await?;
    Ok((http::StatusCode::OK, Json(log)).into_response())
}

impl ApiRequest for GetLogRequest {
    type Response = GetLogResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/logs/{}", self.log_id))
            .unwrap();
        client.get(full_url)
    }
}
