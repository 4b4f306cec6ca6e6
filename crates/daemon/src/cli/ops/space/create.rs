use clap::Args;

use codeflow_daemon::http_server::api::client::ApiError;
use codeflow_daemon::http_server::api::v0::spaces::CreateSpaceRequest;

#[derive(Args, Debug, Clone)]
pub struct Create {
    /// Name of the new space
    pub name: String,
}

#[derive(Debug, thiserror::Error)]
pub enum SpaceCreateError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Create {
    type Error = SpaceCreateError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();
        let space = client
            .call(CreateSpaceRequest {
                name: self.name.clone(),
            })
            .await?;

        Ok(format!("Created space {} ({})", space.name, space.id))
    }
}
