use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::CreateSpaceRequest;
pub use delete::DeleteSpaceRequest;
pub use get::GetSpaceRequest;
pub use list::ListSpacesRequest;
pub use update::UpdateSpaceRequest;

pub fn router(state: ServiceState) -> Router<ServiceState> {
    Router::new()
        .route("/", get(list::handler).post(create::handler))
        .route(
            "/:id",
            get(get::handler)
                .put(update::handler)
                .delete(delete::handler),
        )
        .with_state(state)
}
