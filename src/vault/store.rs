//! The vault store.
//!
//! `VaultStore` is the only type the command layer talks to. It owns the
//! in-memory record collection for the session, the cipher that guards
//! password fields, and the path of the default vault file. Passwords are
//! plaintext in memory; they are encrypted immediately before
//! serialization and decrypted right after parsing.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::{SystemTime, UNIX_EPOCH};

use chrono::Local;

use crate::crypto::{obtain_key, Cipher};
use crate::errors::Result;
use crate::vault::codec;
use crate::vault::record::Record;

/// Name of the default vault file inside the vault directory.
pub const VAULT_FILE_NAME: &str = "vault.json";

static LAST_ID: AtomicU64 = AtomicU64::new(0);

/// Orchestrates key manager, cipher, and codec against the filesystem.
pub struct VaultStore {
    vault_path: PathBuf,
    cipher: Cipher,
    records: Vec<Record>,
}

impl VaultStore {
    /// Open the vault under `base_dir`: obtain the master key (generating
    /// it on first use) and load any existing records into the session.
    ///
    /// Key problems are the only fatal outcome here; a missing or broken
    /// vault file just yields an empty session.
    pub fn open(base_dir: &Path) -> Result<Self> {
        let key = obtain_key(base_dir)?;
        let mut store = Self {
            vault_path: base_dir.join(VAULT_FILE_NAME),
            cipher: Cipher::new(key),
            records: Vec::new(),
        };
        store.records = store.load_default();
        Ok(store)
    }

    /// Read-only view of the session records.
    pub fn records(&self) -> &[Record] {
        &self.records
    }

    /// Read the default vault file. A missing, unreadable, or unparseable
    /// file yields an empty list; the caller never sees a failure.
    pub fn load_default(&self) -> Vec<Record> {
        self.read_records(&self.vault_path).unwrap_or_default()
    }

    /// Read records from an arbitrary vault file.
    ///
    /// `None` covers every failure: a path without a `.json` extension
    /// (checked case-insensitively), an unreadable file, or unparseable
    /// content.
    pub fn load_from(&self, path: &Path) -> Option<Vec<Record>> {
        if !has_json_extension(path) {
            return None;
        }
        self.read_records(path)
    }

    /// Write `records` to the default vault file.
    pub fn save_default(&self, records: &[Record]) -> bool {
        self.save_to(&self.vault_path, records)
    }

    /// Write `records` to `path`, encrypting every password field first.
    ///
    /// Returns true only when the payload was non-empty, the file was
    /// written, and it exists afterwards. An extension mismatch or any
    /// I/O failure returns false without touching the target; the records
    /// themselves are never mutated.
    pub fn save_to(&self, path: &Path, records: &[Record]) -> bool {
        if !has_json_extension(path) {
            return false;
        }

        let encrypted = match self.encrypt_passwords(records) {
            Ok(encrypted) => encrypted,
            Err(err) => {
                tracing::error!(error = %err, "could not encrypt records for saving");
                return false;
            }
        };

        let payload = codec::serialize_records(&encrypted);
        if payload.is_empty() {
            return false;
        }

        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() && fs::create_dir_all(parent).is_err() {
                return false;
            }
        }
        if fs::write(path, &payload).is_err() {
            return false;
        }
        path.exists()
    }

    /// Build a new record with a fresh id and the current local time.
    ///
    /// The record is not added to the session; pass it to
    /// [`VaultStore::add`] for that.
    pub fn create(&self, service: &str, username: &str, password: &str, notes: &str) -> Record {
        Record {
            id: next_id(),
            service: service.to_string(),
            username: username.to_string(),
            password: password.to_string(),
            notes: notes.to_string(),
            created_at: Local::now().naive_local(),
        }
    }

    /// Add a record to the session and persist the vault.
    pub fn add(&mut self, record: Record) -> bool {
        self.records.push(record);
        self.save_default(&self.records)
    }

    /// Remove the record with the given id from the session and persist.
    /// Returns false when no record matched or the vault could not be
    /// written.
    pub fn remove(&mut self, id: &str) -> bool {
        let before = self.records.len();
        self.records.retain(|record| record.id != id);
        if self.records.len() == before {
            return false;
        }
        self.save_default(&self.records)
    }

    /// Merge records from an external vault file into the session.
    ///
    /// Incoming records are added only when no session record already
    /// carries their id; existing records are never replaced or removed.
    /// The vault is persisted afterwards even when nothing was added.
    /// Returns the number of records added, or `None` when the file could
    /// not be read.
    pub fn import_from(&mut self, path: &Path) -> Option<usize> {
        let incoming = self.load_from(path)?;

        let mut added = 0;
        for record in incoming {
            if !self.records.iter().any(|existing| existing.id == record.id) {
                self.records.push(record);
                added += 1;
            }
        }
        self.save_default(&self.records);
        Some(added)
    }

    /// Write the session records to an external vault file.
    pub fn export_to(&self, path: &Path) -> bool {
        self.save_to(path, &self.records)
    }

    /// Find a session record by exact id, falling back to the first
    /// case-insensitive service-name match.
    pub fn find(&self, query: &str) -> Option<&Record> {
        self.records
            .iter()
            .find(|record| record.id == query)
            .or_else(|| {
                self.records
                    .iter()
                    .find(|record| record.service.eq_ignore_ascii_case(query))
            })
    }

    fn read_records(&self, path: &Path) -> Option<Vec<Record>> {
        let text = fs::read_to_string(path).ok()?;
        let mut records = codec::parse_records(&text).ok()?;

        // Foreign or legacy files may hold passwords this key cannot
        // decrypt; keep the raw text instead of dropping the record.
        for record in &mut records {
            match self.cipher.decrypt(&record.password) {
                Ok(plain) => record.password = plain,
                Err(_) => {
                    tracing::debug!(id = %record.id, "password not decryptable with this key, keeping raw value");
                }
            }
        }
        Some(records)
    }

    fn encrypt_passwords(&self, records: &[Record]) -> Result<Vec<Record>> {
        records
            .iter()
            .map(|record| {
                let mut copy = record.clone();
                copy.password = self.cipher.encrypt(&record.password)?;
                Ok(copy)
            })
            .collect()
    }
}

/// Case-insensitive check that a path names a `.json` file.
fn has_json_extension(path: &Path) -> bool {
    path.file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".json"))
        .unwrap_or(false)
}

/// Produce a fresh opaque id: the current nanosecond clock reading in hex,
/// bumped past the previous id when the clock has not advanced, so ids
/// stay unique within the process.
fn next_id() -> String {
    let now_nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or(0);

    let mut prev = LAST_ID.load(Ordering::Relaxed);
    loop {
        let candidate = if now_nanos > prev { now_nanos } else { prev + 1 };
        match LAST_ID.compare_exchange(prev, candidate, Ordering::Relaxed, Ordering::Relaxed) {
            Ok(_) => return format!("{candidate:x}"),
            Err(actual) => prev = actual,
        }
    }
}
