use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::{Log, LogPatch};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, ApiJson, Owner, RecordId, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

/// Request body for updating a log (used by handler). Absent fields are left alone.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct UpdateLogBody {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, alias = "content", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

/// Full request for updating a log (used by client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateLogRequest {
    pub log_id: Uuid,
    #[serde(flatten)]
    pub body: UpdateLogBody,
}

pub type UpdateLogResponse = Log;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
    ApiJson(req): ApiJson<UpdateLogBody>,
) -> Result<Response, ApiFailure> {
    let patch = LogPatch {
        name: req.name,
        content: req.code,
        language: req.language,
    };
    let log = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().update_log(&owner, id, patch),
    )
    .await?;

    Ok((http::StatusCode::OK, Json(log)).into_response())
}

impl ApiRequest for UpdateLogRequest {
    type Response = UpdateLogResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/logs/{}", self.log_id))
            .unwrap();
        client.put(full_url).json(&self.body)
    }
}
