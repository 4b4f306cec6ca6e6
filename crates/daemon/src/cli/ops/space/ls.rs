use clap::Args;

use codeflow_daemon::http_server::api::client::ApiError;
use codeflow_daemon::http_server::api::v0::spaces::ListSpacesRequest;

#[derive(Args, Debug, Clone)]
pub struct Ls;

#[derive(Debug, thiserror::Error)]
pub enum SpaceLsError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Ls {
    type Error = SpaceLsError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let spaces = client.call(ListSpacesRequest).await?;

        if spaces.is_empty() {
            return Ok("No spaces found".to_string());
        }
        Ok(spaces
            .iter()
            .map(|space| format!("{}  {}", space.id, space.name))
            .collect::<Vec<_>>()
            .join("\n"))
    }
}
