//! The credential record stored in a vault.

use chrono::NaiveDateTime;

/// One credential entry in the vault.
///
/// The `password` field holds plaintext while the record is in memory.
/// Encryption happens at the serialization boundary in the store, never
/// here.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Opaque unique token assigned at creation, never reassigned.
    pub id: String,
    /// The service or site this credential belongs to.
    pub service: String,
    /// Login name; empty when not supplied.
    pub username: String,
    /// The secret itself.
    pub password: String,
    /// Free-form notes; empty when not supplied.
    pub notes: String,
    /// Set once when the record is created.
    pub created_at: NaiveDateTime,
}
