use axum::routing::{get, post};
use axum::Router;

pub mod error;
pub mod generate;
pub mod logs;
pub mod run;
pub mod spaces;
pub mod tree;
pub mod vaults;

pub use error::{DeletedResponse, ErrorBody};

use crate::ServiceState;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .nest("/spaces", spaces::router(state.clone()))
        .nest("/vaults", vaults::router(state.clone()))
        .nest("/logs", logs::router(state.clone()))
        .route("/tree", get(tree::handler))
        .route("/run", post(run::handler))
        .route("/ai/generate", post(generate::handler))
        .with_state(state)
}
