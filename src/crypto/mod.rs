//! Cryptographic primitives: master key management and value encryption.

pub mod cipher;
pub mod master_key;

pub use cipher::Cipher;
pub use master_key::{obtain_key, MasterKey, KEY_FILE_NAME, KEY_LEN};
