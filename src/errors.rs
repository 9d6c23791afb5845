use std::path::PathBuf;
use thiserror::Error;

/// All errors that can occur in PassVault.
#[derive(Debug, Error)]
pub enum PassVaultError {
    // --- Key errors (fatal at startup) ---
    #[error("Key file {path} holds {actual} bytes, expected {expected} — refusing to start")]
    KeyLengthMismatch {
        path: PathBuf,
        expected: usize,
        actual: usize,
    },

    #[error("Could not initialize the encryption key: {0}")]
    KeyInit(String),

    // --- Crypto errors ---
    #[error("Encryption failed: {0}")]
    EncryptionFailed(String),

    #[error("Decryption failed — value was not produced by this key")]
    DecryptionFailed,

    // --- Vault format errors ---
    #[error("Invalid timestamp in vault record: {0}")]
    InvalidTimestamp(String),

    // --- Config errors ---
    #[error("Config file error: {0}")]
    ConfigError(String),

    // --- IO errors ---
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    // --- CLI errors ---
    #[error("Command failed: {0}")]
    CommandFailed(String),

    #[error("No record matches '{0}'")]
    RecordNotFound(String),
}

/// Convenience type alias for PassVault results.
pub type Result<T> = std::result::Result<T, PassVaultError>;
