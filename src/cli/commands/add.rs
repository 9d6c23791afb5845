//! `passvault add` — store a new credential in the vault.

use std::io::{self, IsTerminal, Read};

use crate::cli::output;
use crate::cli::{load_settings, open_store, Cli};
use crate::errors::{PassVaultError, Result};
use crate::generator;

/// Execute the `add` command.
pub fn execute(
    cli: &Cli,
    service: &str,
    username: Option<&str>,
    password: Option<&str>,
    notes: Option<&str>,
    generate: bool,
    length: Option<usize>,
) -> Result<()> {
    if service.trim().is_empty() {
        return Err(PassVaultError::CommandFailed(
            "service cannot be empty".to_string(),
        ));
    }

    // Determine the password from one of four sources.
    let secret_value = if let Some(p) = password {
        // Source 1: Inline value on the command line.
        output::warning("Password provided on command line — it may appear in shell history.");
        p.to_string()
    } else if generate {
        // Source 2: Fresh random password.
        let settings = load_settings()?;
        generator::generate(length.unwrap_or(settings.generator_length))
    } else if !io::stdin().is_terminal() {
        // Source 3: Piped input (stdin is not a terminal).
        let mut buf = String::new();
        io::stdin().read_to_string(&mut buf)?;
        buf.trim_end().to_string()
    } else {
        // Source 4: Interactive secure prompt (default).
        dialoguer::Password::new()
            .with_prompt(format!("Enter password for {service}"))
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("password prompt: {e}")))?
    };

    if secret_value.trim().is_empty() {
        return Err(PassVaultError::CommandFailed(
            "password cannot be empty".to_string(),
        ));
    }

    let mut store = open_store(cli)?;
    let record = store.create(
        service,
        username.unwrap_or(""),
        &secret_value,
        notes.unwrap_or(""),
    );
    let id = record.id.clone();

    if !store.add(record) {
        return Err(PassVaultError::CommandFailed(
            "could not write the vault file".to_string(),
        ));
    }

    output::success(&format!(
        "Credential for '{}' added ({} total)",
        service,
        store.records().len()
    ));
    if generate {
        output::tip(&format!("Generated password stored under id {id}."));
        output::tip("Run `passvault show <SERVICE> --copy` to use it.");
    }

    Ok(())
}
