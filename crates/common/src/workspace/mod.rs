pub mod cascade;
mod language;
mod memory;
mod model;
mod path;
mod provider;
mod store;
mod tree;

pub use cascade::CascadeReport;
pub use language::{infer_language, runner_language, source_filename, DEFAULT_LANGUAGE};
pub use memory::{MemoryWorkspaceProvider, MemoryWorkspaceProviderError};
pub use model::{Log, LogFilter, LogPatch, NewLog, NewVault, Space, Vault};
pub use path::{rebase_path, resolve_path};
pub use provider::{EntityKind, WorkspaceError, WorkspaceProvider};
pub use store::Workspace;
pub use tree::{build_tree, NodeKind, TreeNode};
