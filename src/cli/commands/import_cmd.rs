//! `passvault import` — merge records from another vault file.
//!
//! Records whose id already exists in the vault are left untouched; only
//! records with new ids are added.

use std::path::Path;

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::{PassVaultError, Result};

/// Execute the `import` command.
pub fn execute(cli: &Cli, file_path: &str) -> Result<()> {
    let source = Path::new(file_path);

    if !source.exists() {
        return Err(PassVaultError::CommandFailed(format!(
            "import file not found: {}",
            source.display()
        )));
    }

    let mut store = open_store(cli)?;

    match store.import_from(source) {
        Some(added) => {
            if added == 0 {
                output::info("No new records — everything in that file is already present.");
            } else {
                output::success(&format!(
                    "Imported {} new record(s) from {} ({} total)",
                    added,
                    source.display(),
                    store.records().len()
                ));
            }
            Ok(())
        }
        None => Err(PassVaultError::CommandFailed(format!(
            "could not read {} as a vault file (is it .json?)",
            source.display()
        ))),
    }
}
