use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::{NewVault, Vault};

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    parse_optional_id, parse_reference, with_deadline, ApiFailure, ApiJson, Owner,
    SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

/// Ids travel as strings so that a missing or malformed reference is reported
/// as such rather than as a generic body error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CreateVaultRequest {
    #[serde(default)]
    pub space_id: Option<String>,
    #[serde(default)]
    pub name: String,
    #[serde(default, alias = "parentVaultId", skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
}

pub type CreateVaultResponse = Vault;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiJson(req): ApiJson<CreateVaultRequest>,
) -> Result<Response, ApiFailure> {
    let space_id = parse_reference(req.space_id.as_deref(), "spaceId")?;
    let parent_vault_id = parse_optional_id(req.parent_id.as_deref(), "parentId")?;

    let vault = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().create_vault(
            &owner,
            NewVault {
                space_id,
                name: req.name,
                parent_vault_id,
            },
        ),
    )
    .await?;

    tracing::info!(vault_id = %vault.id, path = %vault.path, "vault created");
    Ok((http::StatusCode::CREATED, Json(vault)).into_response())
}

impl ApiRequest for CreateVaultRequest {
    type Response = CreateVaultResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/vaults").unwrap();
        client.post(full_url).json(&self)
    }
}
