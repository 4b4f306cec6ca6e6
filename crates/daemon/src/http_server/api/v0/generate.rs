use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};

use crate::generate::{GenerateError, GenerateInput, Generated};
use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{ApiJson, ErrorBody, Owner};
use crate::ServiceState;

pub type GenerateRequest = GenerateInput;
pub type GenerateResponse = Generated;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiJson(req): ApiJson<GenerateRequest>,
) -> Result<Response, GenerateError> {
    tracing::debug!(%owner, language = ?req.language, "generating code");
    let generated = state.generator().generate(&req).await?;
    tracing::info!(provider = %generated.provider, bytes = generated.code.len(), "code generated");
    Ok((http::StatusCode::OK, Json(generated)).into_response())
}

impl IntoResponse for GenerateError {
    fn into_response(self) -> Response {
        let message = self.to_string();
        match self {
            GenerateError::EmptyPrompt => {
                ErrorBody::response(http::StatusCode::BAD_REQUEST, "INVALID_INPUT", message)
            }
            GenerateError::RateLimited => ErrorBody::response(
                http::StatusCode::TOO_MANY_REQUESTS,
                "RATE_LIMITED",
                message,
            ),
            GenerateError::NotConfigured(_) => ErrorBody::response(
                http::StatusCode::BAD_GATEWAY,
                "API_KEY_INVALID",
                message,
            ),
            GenerateError::ProviderUnavailable(_) => ErrorBody::response(
                http::StatusCode::BAD_GATEWAY,
                "PROVIDER_UNAVAILABLE",
                "No AI provider available",
            ),
        }
    }
}

impl ApiRequest for GenerateRequest {
    type Response = GenerateResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/ai/generate").unwrap();
        client.post(full_url).json(&self)
    }
}
