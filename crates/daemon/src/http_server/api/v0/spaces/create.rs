use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Space;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, ApiJson, Owner, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateSpaceRequest {
    #[serde(default)]
    pub name: String,
}

pub type CreateSpaceResponse = Space;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiJson(req): ApiJson<CreateSpaceRequest>,
) -> Result<Response, ApiFailure> {
    let space = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().create_space(&owner, &req.name),
    )
    .await?;

    tracing::info!(space_id = %space.id, name = %space.name, "space created");
    Ok((http::StatusCode::CREATED, Json(space)).into_response())
}

impl ApiRequest for CreateSpaceRequest {
    type Response = CreateSpaceResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/spaces").unwrap();
        client.post(full_url).json(&self)
    }
}
