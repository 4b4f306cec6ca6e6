use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::prelude::Space;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{with_deadline, ApiFailure, Owner, SINGLE_OP_DEADLINE};
use crate::ServiceState;

/// List every space the caller owns
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct ListSpacesRequest;

pub type ListSpacesResponse = Vec<Space>;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
) -> Result<Response, ApiFailure> {
    let spaces = with_deadline(
        SINGLE_OP_DEADLINE,
        state.workspace().list_spaces(&owner),
    )
    .await?;

    Ok((http::StatusCode::OK, Json(spaces)).into_response())
}

impl ApiRequest for ListSpacesRequest {
    type Response = ListSpacesResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/spaces").unwrap();
        client.get(full_url)
    }
}
