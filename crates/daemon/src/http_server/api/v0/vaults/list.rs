use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Vault;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    parse_optional_id, with_deadline, ApiFailure, ApiQuery, Owner, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

/// List the caller's vaults, optionally only those in one space
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ListVaultsRequest {
    #[serde(rename = "spaceId", default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
pub struct ListVaultsQuery {
    #[serde(rename = "spaceId")]
    pub space_id: Option<String>,
}

pub type ListVaultsResponse = Vec<Vault>;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiQuery(query): ApiQuery<ListVaultsQuery>,
) -> Result<Response, ApiFailure> {
    let space_id = parse_optional_id(query.space_id.as_deref(), "spaceId")?;
    let vaults = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().list_vaults(&owner, space_id),
    )
    .await?;

    Ok((http::StatusCode::OK, Json(vaults)).into_response())
}

impl ApiRequest for ListVaultsRequest {
    type Response = ListVaultsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/vaults").unwrap();
        client.get(full_url).query(&self)
    }
}
