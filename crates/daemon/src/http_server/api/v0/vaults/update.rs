use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Vault;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, ApiJson, Owner, RecordId, CASCADE_DEADLINE,
};
use crate::ServiceState;

/// Request body for renaming a vault (used by handler)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVaultBody {
    #[serde(default)]
    pub name: String,
}

/// Full request for renaming a vault (used by client)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpdateVaultRequest {
    pub vault_id: Uuid,
    #[serde(flatten)]
    pub body: UpdateVaultBody,
}

pub type UpdateVaultResponse = Vault;

/// Renaming rewrites every nested path, so it runs under the cascade deadline.
pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
    ApiJson(req): ApiJson<UpdateVaultBody>,
) -> Result<Response, ApiFailure> {
    let vault = with_deadline(
        CASCADE_DEADLINE,
        state.workspace().rename_vault(&owner, id, &req.name),
    )
    .await?;

    tracing::info!(vault_id = %vault.id, path = %vault.path, "vault renamed");
    Ok((http::StatusCode::OK, Json(vault)).into_response())
}

impl ApiRequest for UpdateVaultRequest {
    type Response = UpdateVaultResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/vaults/{}", self.vault_id))
            .unwrap();
        client.put(full_url).json(&self.body)
    }
}
