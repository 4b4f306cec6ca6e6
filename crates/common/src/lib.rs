/**
 * Identity that every record is scoped to.
 */
pub mod owner;
/**
 * Fixtures shared by provider integration tests.
 */
pub mod testkit;
/**
 * Helper for setting build version information
 *  at compile time.
 */
pub mod version;
/**
 * The space / vault / log hierarchy: the data
 *  model, the storage seam, and the rules that
 *  keep paths and references consistent.
 */
pub mod workspace;

pub mod prelude {
    pub use crate::owner::OwnerId;
    pub use crate::version::build_info;
    pub use crate::workspace::{
        build_tree, infer_language, resolve_path, Log, LogFilter, LogPatch, MemoryWorkspaceProvider,
        NewLog, NewVault, NodeKind, Space, TreeNode, Vault, Workspace, WorkspaceError,
        WorkspaceProvider,
    };
}
