//! `passvault delete` — remove a credential from the vault.

use dialoguer::Confirm;

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `delete` command.
pub fn execute(cli: &Cli, query: &str, force: bool) -> Result<()> {
    let mut store = open_store(cli)?;

    let (id, service) = match store.find(query) {
        Some(record) => (record.id.clone(), record.service.clone()),
        None => return Err(PassVaultError::RecordNotFound(query.to_string())),
    };

    // Unless --force is set, ask for confirmation before deleting.
    if !force {
        let confirmed = Confirm::new()
            .with_prompt(format!("Delete the credential for '{service}' ({id})?"))
            .default(false)
            .interact()
            .map_err(|e| PassVaultError::CommandFailed(format!("confirm prompt: {e}")))?;

        if !confirmed {
            output::info("Cancelled.");
            return Ok(());
        }
    }

    if !store.remove(&id) {
        return Err(PassVaultError::CommandFailed(
            "could not write the vault file".to_string(),
        ));
    }

    output::success(&format!("Deleted the credential for '{service}'"));
    Ok(())
}
