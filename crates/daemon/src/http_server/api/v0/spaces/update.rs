use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Space;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, ApiJson, Owner, RecordId, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

/// Request body for renaming a space (used by handler)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSpaceBody {
    #[serde(default)]
    pub name: String,
}

/// Full request for renaming a space (used by client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateSpaceRequest {
    pub space_id: Uuid,
    #[serde(flatten)]
    pub body: UpdateSpaceBody,
}

pub type UpdateSpaceResponse = Space;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
    ApiJson(req): ApiJson<UpdateSpaceBody>,
) -> Result<Response, ApiFailure> {
    let space = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().rename_space(&owner, id, &req.name),
    )
    .await?;

    Ok((http::StatusCode::OK, Json(space)).into_response())
}

impl ApiRequest for UpdateSpaceRequest {
    type Response = UpdateSpaceResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/spaces/{}", self.space_id))
            .unwrap();
        client.put(full_url).json(&self.body)
    }
}
