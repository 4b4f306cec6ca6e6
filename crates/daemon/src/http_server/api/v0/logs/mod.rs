use axum::routing::get;
use axum::Router;

use crate::ServiceState;

pub mod create;
pub mod delete;
pub mod get;
pub mod list;
pub mod update;

pub use create::CreateLogRequest;
pub use delete::DeleteLogRequest;
pub use get::GetLogRequest;
pub use list::ListLogsRequest;
pub use update::UpdateLogRequest;

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
