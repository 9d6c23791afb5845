//! Value encryption for the vault.
//!
//! Passwords are encrypted one at a time with AES-256 in ECB mode with
//! PKCS#7 padding, then base64-encoded so the result can live inside a
//! JSON string. There is no per-value nonce: encryption is deterministic,
//! and identical plaintexts under the same key produce identical
//! ciphertexts. The empty string is stored as-is, unencrypted.

use aes::cipher::{block_padding::Pkcs7, BlockDecryptMut, BlockEncryptMut, KeyInit};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};

use crate::crypto::master_key::MasterKey;
use crate::errors::{PassVaultError, Result};

type Aes256EcbEnc = ecb::Encryptor<aes::Aes256>;
type Aes256EcbDec = ecb::Decryptor<aes::Aes256>;

/// Encrypts and decrypts individual vault values under the master key.
pub struct Cipher {
    key: MasterKey,
}

impl Cipher {
    /// Build a cipher that will use `key` for all operations.
    pub fn new(key: MasterKey) -> Self {
        Self { key }
    }

    /// Encrypt a plaintext value to a base64 string.
    ///
    /// The empty string encrypts to itself.
    pub fn encrypt(&self, plaintext: &str) -> Result<String> {
        if plaintext.is_empty() {
            return Ok(String::new());
        }

        let enc = Aes256EcbEnc::new_from_slice(self.key.as_bytes())
            .map_err(|e| PassVaultError::EncryptionFailed(e.to_string()))?;
        let ciphertext = enc.encrypt_padded_vec_mut::<Pkcs7>(plaintext.as_bytes());

        Ok(BASE64.encode(ciphertext))
    }

    /// Decrypt a base64 string produced by [`Cipher::encrypt`].
    ///
    /// The empty string decrypts to itself. Any failure along the way
    /// (bad base64, wrong block length, padding mismatch, non-UTF-8
    /// plaintext) is reported as [`PassVaultError::DecryptionFailed`];
    /// callers decide whether that is fatal.
    pub fn decrypt(&self, encoded: &str) -> Result<String> {
        if encoded.is_empty() {
            return Ok(String::new());
        }

        let ciphertext = BASE64
            .decode(encoded)
            .map_err(|_| PassVaultError::DecryptionFailed)?;

        let dec = Aes256EcbDec::new_from_slice(self.key.as_bytes())
            .map_err(|_| PassVaultError::DecryptionFailed)?;
        let plaintext = dec
            .decrypt_padded_vec_mut::<Pkcs7>(&ciphertext)
            .map_err(|_| PassVaultError::DecryptionFailed)?;

        String::from_utf8(plaintext).map_err(|_| PassVaultError::DecryptionFailed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_cipher() -> Cipher {
        Cipher::new(MasterKey::new([7u8; 32]))
    }

    #[test]
    fn round_trip_restores_plaintext() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("Tr0ub4dor&3").unwrap();

        assert_ne!(encrypted, "Tr0ub4dor&3");
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), "Tr0ub4dor&3");
    }

    #[test]
    fn empty_string_passes_through_unchanged() {
        let cipher = test_cipher();
        assert_eq!(cipher.encrypt("").unwrap(), "");
        assert_eq!(cipher.decrypt("").unwrap(), "");
    }

    #[test]
    fn encryption_is_deterministic() {
        let cipher = test_cipher();
        let a = cipher.encrypt("same input").unwrap();
        let b = cipher.encrypt("same input").unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn output_is_valid_base64() {
        let cipher = test_cipher();
        let encrypted = cipher.encrypt("hello").unwrap();
        assert!(BASE64.decode(&encrypted).is_ok());
    }

    #[test]
    fn wrong_key_fails_to_decrypt() {
        let cipher = test_cipher();
        let other = Cipher::new(MasterKey::new([8u8; 32]));

        let encrypted = cipher.encrypt("secret").unwrap();
        let result = other.decrypt(&encrypted);
        // Either the padding check rejects it or the bytes are garbage;
        // both surface as DecryptionFailed or a different plaintext.
        match result {
            Err(PassVaultError::DecryptionFailed) => {}
            Ok(text) => assert_ne!(text, "secret"),
            Err(other) => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn plain_text_input_fails_to_decrypt() {
        let cipher = test_cipher();
        assert!(matches!(
            cipher.decrypt("not base64 at all!"),
            Err(PassVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn valid_base64_with_bad_block_length_fails() {
        let cipher = test_cipher();
        // Decodes to 5 bytes, which is not a multiple of the AES block.
        let bogus = BASE64.encode(b"hello");
        assert!(matches!(
            cipher.decrypt(&bogus),
            Err(PassVaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn unicode_round_trips() {
        let cipher = test_cipher();
        let input = "pässwörd — ☃ — 密码";
        let encrypted = cipher.encrypt(input).unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), input);
    }

    #[test]
    fn long_values_round_trip_across_blocks() {
        let cipher = test_cipher();
        let input = "x".repeat(1000);
        let encrypted = cipher.encrypt(&input).unwrap();
        assert_eq!(cipher.decrypt(&encrypted).unwrap(), input);
    }
}
