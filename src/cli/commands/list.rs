//! `passvault list` — display all credentials in a table.

use crate::cli::output;
use crate::cli::{open_store, Cli};
use crate::errors::Result;

/// Execute the `list` command.
pub fn execute(cli: &Cli) -> Result<()> {
    let store = open_store(cli)?;
    let records = store.records();

    output::info(&format!("{} credential(s)", records.len()));
    output::print_records_table(records);

    Ok(())
}
