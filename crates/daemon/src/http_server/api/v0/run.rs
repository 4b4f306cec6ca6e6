use axum::extract::State;
use axum::response::{IntoResponse, Response};
use axum::Json;
use reqwest::{Client, RequestBuilder, Url};
use serde::{Deserialize, Serialize};

use common::workspace::DEFAULT_LANGUAGE;

use crate::http_server::api::client::ApiRequest;
use crate::http_server::api::v0::error::{ApiJson, ErrorBody, Owner};
use crate::runner::{Execution, RunnerError};
use crate::ServiceState;

/// Execute a snippet on the configured execution service
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RunRequest {
    #[serde(default)]
    pub language: String,
    #[serde(default)]
    pub code: String,
}

pub type RunResponse = Execution;

pub async fn handler(
    State(state): State<ServiceState>,
    Owner(owner): Owner,
    ApiJson(req): ApiJson<RunRequest>,
) -> Result<Response, RunError> {
    if req.code.trim().is_empty() {
        return Err(RunError::EmptyCode);
    }
    let language = match req.language.trim() {
        "" => DEFAULT_LANGUAGE,
        language => language,
    };

    tracing::debug!(%owner, language, "running code");
    let execution = state.runner().execute(language, &req.code).await?;
    Ok((http::StatusCode::OK, Json(execution)).into_response())
}

#[derive(Debug, thiserror::Error)]
pub enum RunError {
    #[error("code must not be empty")]
    EmptyCode,
    #[error(transparent)]
    Runner(#[from] RunnerError),
}

impl IntoResponse for RunError {
    fn into_response(self) -> Response {
        match self {
            RunError::EmptyCode => ErrorBody::response(
                http::StatusCode::BAD_REQUEST,
                "INVALID_INPUT",
                self.to_string(),
            ),
            RunError::Runner(RunnerError::Timeout) => ErrorBody::response(
                http::StatusCode::GATEWAY_TIMEOUT,
                "TIMEOUT",
                "execution service timed out",
            ),
            RunError::Runner(e) => {
                tracing::warn!(error = %e, "code execution failed");
                ErrorBody::response(
                    http::StatusCode::BAD_GATEWAY,
                    "PROVIDER_UNAVAILABLE",
                    "failed to execute code",
                )
            }
        }
    }
}

impl ApiRequest for RunRequest {
    type Response = RunResponse;

    fn build_request(self, base_url: &Url, client: &Client) -> RequestBuilder {
        let full_url = base_url.join("/api/v0/run").unwrap();
        client.post(full_url).json(&self)
    }
}
