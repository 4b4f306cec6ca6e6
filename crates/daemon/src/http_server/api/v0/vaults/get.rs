use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use common::prelude::Vault;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{
    with_deadline, ApiFailure, Owner, RecordId, SINGLE_OP_DEADLINE,
};
use crate::ServiceState;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GetVaultRequest {
    pub vault_id: Uuid,
}

pub type GetVaultResponse = Vault;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    RecordId(id): RecordId,
) -> Result<Response, ApiFailure> {
    let vault = with_deadline(SINGLE_OP_DEADLINE, state.workspace().get_vault(&owner, id)).await?;
    Ok((http::StatusCode::OK, Json(vault)).into_response())
}

impl ApiRequest for GetVaultRequest {
    type Response = GetVaultResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url
            .join(&format!("/api/v0/vaults/{}", self.vault_id))
            .unwrap();
        client.get(full_url)
    }
}
