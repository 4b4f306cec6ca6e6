//! Proxy to a Piston-compatible code execution service

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use url::Url;

use common::workspace::{runner_language, source_filename};

pub const DEFAULT_PISTON_URL: &str = "https://emkc.org/api/v2/piston";

const EXECUTE_TIMEOUT: Duration = Duration::from_secs(10);

/// Result of running a snippet
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Execution {
    pub stdout: String,
    pub stderr: String,
    #[serde(rename = "code")]
    pub exit_code: i64,
    pub output: String,
}

#[derive(Debug, thiserror::Error)]
pub enum RunnerError {
    #[error("execution service timed out")]
    Timeout,
    #[error("execution service request failed: {0}")]
    Request(reqwest::Error),
    #[error("execution service returned {0}: {1}")]
    Status(u16, String),
}

impl From<reqwest::Error> for RunnerError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            RunnerError::Timeout
        } else {
            RunnerError::Request(err)
        }
    }
}

#[async_trait]
pub trait CodeRunner: Send + Sync + 'static {
    /// Run `code`, tagged with one of the workspace language tags.
    async fn execute(&self, language: &str, code: &str) -> Result<Execution, RunnerError>;
}

#[derive(Debug, Serialize)]
struct PistonFile<'a> {
    name: &'a str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct PistonRequest<'a> {
    language: &'a str,
    version: &'a str,
    files: Vec<PistonFile<'a>>,
    stdin: &'a str,
    args: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct PistonResponse {
    #[serde(default)]
    run: PistonRun,
}

#[derive(Debug, Default, Deserialize)]
struct PistonRun {
    #[serde(default)]
    stdout: String,
    #[serde(default)]
    stderr: String,
    #[serde(default)]
    code: Option<i64>,
    #[serde(default)]
    output: String,
}

#[derive(Debug, Clone)]
pub struct PistonRunner {
    client: Client,
    base_url: Url,
}

impl PistonRunner {
    pub fn new(base_url: Url) -> Result<Self, RunnerError> {
        let client = Client::builder().timeout(EXECUTE_TIMEOUT).build()?;
        Ok(Self { client, base_url })
    }

    fn execute_url(&self) -> String {
        format!("{}/execute", self.base_url.as_str().trim_end_matches('/'))
    }
}

#[async_trait]
impl CodeRunner for PistonRunner {
    async fn execute(&self, language: &str, code: &str) -> Result<Execution, RunnerError> {
        let request = PistonRequest {
            language: runner_language(language),
            version: "*",
            files: vec![PistonFile {
                name: source_filename(language),
                content: code,
            }],
            stdin: "",
            args: Vec::new(),
        };

        tracing::debug!(language = request.language, "submitting code for execution");
        let response = self
            .client
            .post(self.execute_url())
            .json(&request)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(RunnerError::Status(status.as_u16(), body));
        }

        let parsed: PistonResponse = response.json().await?;
        Ok(Execution {
            stdout: parsed.run.stdout,
            stderr: parsed.run.stderr,
            exit_code: parsed.run.code.unwrap_or_default(),
            output: parsed.run.output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_shape() {
        let request = PistonRequest {
            language: runner_language("java"),
            version: "*",
            files: vec![PistonFile {
                name: source_filename("java"),
                content: "class Main {}",
            }],
            stdin: "",
            args: Vec::new(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["language"], "java");
        assert_eq!(json["version"], "*");
        assert_eq!(json["files"][0]["name"], "Main.java");
        assert_eq!(json["stdin"], "");
        assert!(json["args"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_response_tolerates_missing_fields() {
        let parsed: PistonResponse =
            serde_json::from_str(r#"{"run": {"stdout": "hi\n", "code": 0}}"#).unwrap();
        assert_eq!(parsed.run.stdout, "hi\n");
        assert_eq!(parsed.run.stderr, "");
        assert_eq!(parsed.run.code, Some(0));
    }

    #[test]
    fn test_execute_url_joins_cleanly() {
        let runner = PistonRunner::new(Url::parse("http://localhost:2000/api/v2/").unwrap())
            .unwrap();
        assert_eq!(runner.execute_url(), "http://localhost:2000/api/v2/execute");
    }

    #[test]
    fn test_execution_serializes_exit_code_as_code() {
        let json = serde_json::to_value(Execution {
            exit_code: 1,
            ..Default::default()
        })
        .unwrap();
        assert_eq!(json["code"], 1);
    }
}
