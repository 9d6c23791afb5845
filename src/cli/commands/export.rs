//! `passvault export` — write the vault's records to another file.
//!
//! The exported file has the same shape as the vault itself, with every
//! password encrypted under this vault's key.

use crate::cli::output;
use crate::cli::{ensure_json_extension, open_store, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `export` command.
pub fn execute(cli: &Cli, output_path: &str) -> Result<()> {
    let store = open_store(cli)?;
    let dest = ensure_json_extension(output_path);

    if !store.export_to(&dest) {
        return Err(PassVaultError::CommandFailed(format!(
            "could not write {}",
            dest.display()
        )));
    }

    output::success(&format!(
        "Exported {} record(s) to {}",
        store.records().len(),
        dest.display()
    ));

    Ok(())
}
