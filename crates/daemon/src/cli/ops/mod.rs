pub mod daemon;
pub mod health;
pub mod init;
pub mod space;
pub mod tree;
pub mod version;

pub use daemon::Daemon;
pub use health::Health;
pub use init::Init;
pub use space::Space;
pub use tree::Tree;
pub use version::Version;
