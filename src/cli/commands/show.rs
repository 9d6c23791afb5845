//! `passvault show` — print one credential, or copy its password.

use crate::cli::output;
use crate::cli::{copy_to_clipboard, open_store, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `show` command.
pub fn execute(cli: &Cli, query: &str, copy: bool) -> Result<()> {
    let store = open_store(cli)?;
    let record = store
        .find(query)
        .ok_or_else(|| PassVaultError::RecordNotFound(query.to_string()))?;

    println!("service:  {}", record.service);
    println!("username: {}", record.username);
    if copy {
        copy_to_clipboard(&record.password)?;
    } else {
        println!("password: {}", record.password);
    }
    println!("notes:    {}", record.notes);
    println!("created:  {}", record.created_at.format("%Y-%m-%d %H:%M"));
    println!("id:       {}", record.id);

    if copy {
        output::success("Password copied to the clipboard.");
    }

    Ok(())
}
