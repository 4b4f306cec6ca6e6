mod log;
mod space;
mod vault;

pub use log::{LogRow, LOG_COLUMNS};
pub use space::{SpaceRow, SPACE_COLUMNS};
pub use vault::{VaultRow, VAULT_COLUMNS};
