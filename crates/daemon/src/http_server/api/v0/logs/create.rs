use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{Log, NewLog};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    parse_reference, with_deadline, ApiFailure, ApiJson, Owner, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateLogRequest {
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub vault_id: Option<String>,
    #[serde(default)]
    pub name: String,
    /// Source text; `content` is accepted as well
    #[serde(default, alias = "content", skip_serializing_if = "Option::is_none")]
    pub code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

pub type CreateLogResponse = Log;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiJson(req): ApiJson<CreateLogRequest>,
) -> Result<Response, ApiFailure> {
    let space_id = parse_reference(req.space_id.as_deref(), "spaceId")?;
    let vault_id = parse_reference(req.vault_id.as_deref(), "vaultId")?;

    let log = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().create_log(
            &owner,
            NewLog {
                space_id,
                vault_id,
                name: req.name,
                content: req.code,
                language: req.language,
            },
        ),
    )
    .await?;

    tracing::info!(log_id = %log.id, path = %log.path, language = %log.language, "log created");
    Ok((http::StatusCode::CREATED, Json(log)).into_response())
}

impl ApiRequest for CreateLogRequest {
    type Response = CreateLogResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/logs").unwrap();
        client.post(full_url).json(&self)
    }
}
