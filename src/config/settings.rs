use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::errors::{PassVaultError, Result};

/// User-level configuration, loaded from `~/.passvault.toml`.
///
/// Every field has a sensible default so PassVault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Directory where the vault and key files live. Relative values are
    /// resolved against the home directory.
    #[serde(default = "default_vault_dir")]
    pub vault_dir: String,

    /// Length used by `passvault generate` when no length is given.
    #[serde(default = "default_generator_length")]
    pub generator_length: usize,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_vault_dir() -> String {
    ".passvault".to_string()
}

fn default_generator_length() -> usize {
    16
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            vault_dir: default_vault_dir(),
            generator_length: default_generator_length(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the home directory.
    const FILE_NAME: &'static str = ".passvault.toml";

    /// Load settings from `<home_dir>/.passvault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(home_dir: &Path) -> Result<Self> {
        let config_path = home_dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            PassVaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Resolve the vault directory against the home directory.
    ///
    /// An absolute `vault_dir` is used as-is; a relative one is joined
    /// under `home_dir`.
    pub fn base_dir(&self, home_dir: &Path) -> PathBuf {
        let dir = Path::new(&self.vault_dir);
        if dir.is_absolute() {
            dir.to_path_buf()
        } else {
            home_dir.join(dir)
        }
    }
}

// ── Tests ────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    #[test]
    fn default_settings_are_sensible() {
        let s = Settings::default();
        assert_eq!(s.vault_dir, ".passvault");
        assert_eq!(s.generator_length, 16);
    }

    #[test]
    fn load_returns_defaults_when_no_config_file() {
        let tmp = TempDir::new().unwrap();
        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, ".passvault");
    }

    #[test]
    fn load_parses_toml_file() {
        let tmp = TempDir::new().unwrap();
        let config = r#"
vault_dir = "secrets"
generator_length = 24
"#;
        fs::write(tmp.path().join(".passvault.toml"), config).unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "secrets");
        assert_eq!(settings.generator_length, 24);
    }

    #[test]
    fn load_uses_defaults_for_missing_fields() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "vault_dir = \"v\"\n").unwrap();

        let settings = Settings::load(tmp.path()).unwrap();
        assert_eq!(settings.vault_dir, "v");
        // Rest should be defaults
        assert_eq!(settings.generator_length, 16);
    }

    #[test]
    fn load_errors_on_invalid_toml() {
        let tmp = TempDir::new().unwrap();
        fs::write(tmp.path().join(".passvault.toml"), "not valid {{toml").unwrap();

        let result = Settings::load(tmp.path());
        assert!(result.is_err());
    }

    #[test]
    fn base_dir_joins_relative_paths_under_home() {
        let s = Settings::default();
        let home = Path::new("/home/user");
        assert_eq!(s.base_dir(home), PathBuf::from("/home/user/.passvault"));
    }

    #[test]
    fn base_dir_keeps_absolute_paths() {
        let s = Settings {
            vault_dir: "/var/lib/passvault".to_string(),
            ..Settings::default()
        };
        assert_eq!(
            s.base_dir(Path::new("/home/user")),
            PathBuf::from("/var/lib/passvault")
        );
    }
}
