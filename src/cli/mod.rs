//! CLI module — Clap argument parser, output helpers, and command implementations.

pub mod commands;
pub mod output;

use std::path::{Path, PathBuf};

use clap::Parser;

use crate::config::Settings;
use crate::errors::{PassVaultError, Result};
use crate::vault::VaultStore;

/// PassVault CLI: local encrypted password manager.
#[derive(Parser)]
#[command(
    name = "passvault",
    about = "Local encrypted password manager",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Vault directory (default: ~/.passvault, or vault_dir from ~/.passvault.toml)
    #[arg(long, global = true)]
    pub dir: Option<String>,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Add a credential to the vault
    Add {
        /// Service or site the credential belongs to
        service: String,

        /// Login name
        #[arg(short, long)]
        username: Option<String>,

        /// Password (omit for interactive prompt)
        #[arg(short, long)]
        password: Option<String>,

        /// Free-form notes
        #[arg(short, long)]
        notes: Option<String>,

        /// Generate the password instead of prompting
        #[arg(short, long, conflicts_with = "password")]
        generate: bool,

        /// Length of the generated password
        #[arg(long, requires = "generate")]
        length: Option<usize>,
    },

    /// List all credentials
    List,

    /// Show one credential
    Show {
        /// Record id or service name
        query: String,

        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Delete a credential
    Delete {
        /// Record id or service name
        query: String,

        /// Skip confirmation prompt
        #[arg(short, long)]
        force: bool,
    },

    /// Generate a random password
    Generate {
        /// Password length (default from config, minimum 6)
        length: Option<usize>,

        /// Copy the password to the clipboard instead of printing it
        #[arg(short, long)]
        copy: bool,
    },

    /// Import credentials from another vault file (additive merge by id)
    Import {
        /// Path of the vault file to import (.json)
        file: String,
    },

    /// Export the vault to a file
    Export {
        /// Destination path (.json is appended when missing)
        output: String,
    },

    /// Generate shell completion scripts
    Completions {
        /// Shell to generate completions for (bash, zsh, fish, powershell)
        shell: String,
    },
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Load settings from the config file in the home directory.
pub fn load_settings() -> Result<Settings> {
    Settings::load(&home_dir()?)
}

/// Resolve the vault directory for this invocation: `--dir` wins, then the
/// config file, then `~/.passvault`.
pub fn resolve_base_dir(cli: &Cli) -> Result<PathBuf> {
    if let Some(dir) = &cli.dir {
        return Ok(PathBuf::from(dir));
    }
    let home = home_dir()?;
    let settings = Settings::load(&home)?;
    Ok(settings.base_dir(&home))
}

/// Open the vault store for this invocation, creating the key on first use.
pub fn open_store(cli: &Cli) -> Result<VaultStore> {
    let base_dir = resolve_base_dir(cli)?;
    VaultStore::open(&base_dir)
}

/// Copy text to the system clipboard.
pub fn copy_to_clipboard(text: &str) -> Result<()> {
    let mut clipboard = arboard::Clipboard::new()
        .map_err(|e| PassVaultError::CommandFailed(format!("clipboard: {e}")))?;
    clipboard
        .set_text(text.to_string())
        .map_err(|e| PassVaultError::CommandFailed(format!("clipboard: {e}")))
}

/// Append `.json` to a path whose file name does not already end with it
/// (case-insensitive). The store rejects non-`.json` paths outright;
/// fixing up user input before the call is this layer's job.
pub fn ensure_json_extension(path: &str) -> PathBuf {
    let ends_with_json = Path::new(path)
        .file_name()
        .map(|name| name.to_string_lossy().to_lowercase().ends_with(".json"))
        .unwrap_or(false);

    if ends_with_json {
        PathBuf::from(path)
    } else {
        PathBuf::from(format!("{path}.json"))
    }
}

fn home_dir() -> Result<PathBuf> {
    dirs::home_dir().ok_or_else(|| {
        PassVaultError::ConfigError("could not determine the home directory".to_string())
    })
}
