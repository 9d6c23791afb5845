//! `passvault generate` — produce a random password without storing it.

use crate::cli::output;
use crate::cli::{copy_to_clipboard, load_settings};
use crate::errors::Result;
use crate::generator;

/// Execute the `generate` command.
pub fn execute(length: Option<usize>, copy: bool) -> Result<()> {
    let settings = load_settings()?;
    let password = generator::generate(length.unwrap_or(settings.generator_length));

    if copy {
        copy_to_clipboard(&password)?;
        output::success("Generated password copied to the clipboard.");
    } else {
        println!("{password}");
    }

    Ok(())
}
