use clap::Args;
use uuid::Uuid;

use codeflow_daemon::http_server::api::client::ApiError;
use codeflow_daemon::http_server::api::v0::spaces::DeleteSpaceRequest;

#[derive(Args, Debug, Clone)]
pub struct Rm {
    /// Space ID (or use --name)
    #[arg(long, group = "space_identifier")]
    pub space_id: Option<Uuid>,

    /// Space name (or use --space-id)
    #[arg(long, group = "space_identifier")]
    pub name: Option<String>,
}

#[derive(Debug, thiserror::Error)]
pub enum SpaceRmError {
    #[error("API error: {0}")]
    Api(#[from] ApiError),
    #[error("Either --space-id or --name must be provided")]
    NoSpaceIdentifier,
}

#[async_trait::async_trait]
impl crate::cli::op::Op for Rm {
    type Error = SpaceRmError;
    type Output = String;

    async fn execute(&self, ctx: &crate::cli::op::OpContext) -> Result<Self::Output, Self::Error> {
        let mut client = ctx.client.clone();

        let space_id = if let Some(id) = self.space_id {
            id
        } else if let Some(ref name) = self.name {
            client.resolve_space_name(name).await?
        } else {
            return Err(SpaceRmError::NoSpaceIdentifier);
        };

        let response = client.call(DeleteSpaceRequest { space_id }).await?;
        Ok(response.message)
    }
}
