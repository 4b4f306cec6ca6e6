use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::{Log, LogFilter};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    parse_optional_id, with_deadline, ApiFailure, ApiQuery, Owner, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

/// List the caller's logs, narrowed by space and/or vault when given
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsRequest {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub space_id: Option<Uuid>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub vault_id: Option<Uuid>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ListLogsQuery {
    pub space_id: Option<String>,
    pub vault_id: Option<String>,
}

pub type ListLogsResponse = Vec<Log>;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiQuery(query): ApiQuery<ListLogsQuery>,
) -> Result<Response, ApiFailure> {
    let filter = LogFilter {
        space_id: parse_optional_id(query.space_id.as_deref(), "spaceId")?,
        vault_id: parse_optional_id(query.vault_id.as_deref(), "vaultId")?,
    };
    let logs = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().list_logs(&owner, filter),
    )
    .await?;

    Ok((http::StatusCode::OK, Json(logs)).into_response())
}

impl ApiRequest for ListLogsRequest {
    type Response = ListLogsResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/logs").unwrap();
        client.get(full_url).query(&self)
    }
}
