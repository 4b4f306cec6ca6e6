use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::TreeNode;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    parse_optional_id, with_deadline, ApiFailure, ApiQuery, Owner, CASCADE_DEADLINE,
};
use crate::ServiceState;

/// Nested view of one space's vaults and logs
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeRequest {
    pub space_id: Uuid,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeQuery {
    pub space_id: Option<String>,
}

pub type TreeResponse = Vec<TreeNode>;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiQuery(query): ApiQuery<TreeQuery>,
) -> Result<Response, ApiFailure> {
    let space_id = parse_optional_id(query.space_id.as_deref(), "spaceId")?
        .ok_or_else(|| ApiFailure::InvalidInput("spaceId query parameter required".to_string()))?;

    let tree = with_deadline(CASCADE_DEADLINE, state.workspace().tree(&owner, space_id)).await?;
    Ok((http::StatusCode::OK, Json(tree)).into_response())
}

impl ApiRequest for TreeRequest {
    type Response = TreeResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/tree").unwrap();
        client.get(full_url).query(&self)
    }
}
