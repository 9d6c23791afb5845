//! Vault storage: the record model, the on-disk JSON codec, and the
//! store that ties them to the filesystem.

pub mod codec;
pub mod record;
pub mod store;

pub use record::Record;
pub use store::{VaultStore, VAULT_FILE_NAME};
