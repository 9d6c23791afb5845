//! Master key persistence for PassVault.
//!
//! The vault key is a single 32-byte random value stored verbatim in
//! `master.key` next to the vault file. It is created the first time the
//! vault is opened and read back on every later start. There is no
//! passphrase and no derivation step: the file *is* the key.

use std::fs;
use std::path::Path;

use rand::rngs::OsRng;
use rand::TryRngCore;
use zeroize::Zeroize;

use crate::errors::{PassVaultError, Result};

/// Length of the master key in bytes (256 bits).
pub const KEY_LEN: usize = 32;

/// Name of the key file inside the vault directory.
pub const KEY_FILE_NAME: &str = "master.key";

/// A wrapper around the 32-byte master key that zeroes its memory when
/// dropped, so key material does not linger after the process is done
/// with it.
#[derive(Zeroize)]
#[zeroize(drop)]
pub struct MasterKey {
    bytes: [u8; KEY_LEN],
}

impl MasterKey {
    /// Create a new `MasterKey` from raw bytes.
    pub fn new(bytes: [u8; KEY_LEN]) -> Self {
        Self { bytes }
    }

    /// Access the raw key bytes (e.g. to build a cipher).
    pub fn as_bytes(&self) -> &[u8; KEY_LEN] {
        &self.bytes
    }
}

/// Load the master key from `base_dir/master.key`, generating and
/// persisting a fresh one if the file does not exist yet.
///
/// A key file of the wrong length is a configuration error, not something
/// to repair: the vault cannot be decrypted with a truncated or padded
/// key, so startup aborts instead. Directory or write failures while
/// persisting a new key are equally fatal — there is no vault without a
/// key.
pub fn obtain_key(base_dir: &Path) -> Result<MasterKey> {
    let key_path = base_dir.join(KEY_FILE_NAME);

    if key_path.exists() {
        let mut data = fs::read(&key_path)
            .map_err(|e| PassVaultError::KeyInit(format!("failed to read key file: {e}")))?;

        if data.len() != KEY_LEN {
            let actual = data.len();
            data.zeroize();
            return Err(PassVaultError::KeyLengthMismatch {
                path: key_path,
                expected: KEY_LEN,
                actual,
            });
        }

        let mut bytes = [0u8; KEY_LEN];
        bytes.copy_from_slice(&data);
        data.zeroize();
        return Ok(MasterKey::new(bytes));
    }

    // First run: generate 32 cryptographically random bytes and persist
    // them before returning the key for immediate use.
    let mut bytes = [0u8; KEY_LEN];
    OsRng
        .try_fill_bytes(&mut bytes)
        .map_err(|e| PassVaultError::KeyInit(format!("OS random source failed: {e}")))?;

    fs::create_dir_all(base_dir)
        .map_err(|e| PassVaultError::KeyInit(format!("cannot create vault directory: {e}")))?;

    fs::write(&key_path, bytes)
        .map_err(|e| PassVaultError::KeyInit(format!("failed to write key file: {e}")))?;

    // On Unix, restrict permissions to owner-only read/write.
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = fs::Permissions::from_mode(0o600);
        fs::set_permissions(&key_path, perms).map_err(|e| {
            PassVaultError::KeyInit(format!("failed to set key file permissions: {e}"))
        })?;
    }

    Ok(MasterKey::new(bytes))
}
