//! Project configuration management for `mdshelf.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── index      # [index]
//! │   ├── serve      # [serve]
//! │   ├── cache      # [cache]
//! │   └── push       # [push]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError
//! │   └── handle     # Global config handle
//! └── mod.rs         # ShelfConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section   | Purpose                                        |
//! |-----------|------------------------------------------------|
//! | `[index]` | Content directory and index generation         |
//! | `[serve]` | Preview server (interface, port)               |
//! | `[cache]` | Offline cache generation, manifest, shell      |
//! | `[push]`  | Push notification defaults                     |

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{CacheConfig, IndexConfig, PushConfig, ServeConfig};
pub use types::{ConfigError, cfg, init_config};

use crate::{
    cli::{Cli, Commands, IndexArgs, ServeArgs},
    log,
};
use anyhow::{Result, bail};
use serde::{Deserialize, Serialize};
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing mdshelf.toml
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ShelfConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file (internal use only)
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Project root directory - parent of config file (internal use only)
    #[serde(skip)]
    pub root: PathBuf,

    /// Content indexing settings
    #[serde(default)]
    pub index: IndexConfig,

    /// Preview server settings
    #[serde(default)]
    pub serve: ServeConfig,

    /// Offline cache settings
    #[serde(default)]
    pub cache: CacheConfig,

    /// Push notification defaults
    #[serde(default)]
    pub push: PushConfig,
}

impl Default for ShelfConfig {
    fn default() -> Self {
        Self {
            cli: None,
            config_path: PathBuf::new(),
            root: PathBuf::new(),
            index: IndexConfig::default(),
            serve: ServeConfig::default(),
            cache: CacheConfig::default(),
            push: PushConfig::default(),
        }
    }
}

impl ShelfConfig {
    /// Load configuration from CLI arguments.
    ///
    /// For non-Init commands, searches upward from cwd to find the config
    /// file. The project root is determined by the config file's parent
    /// directory.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let (config_path, exists) = Self::resolve_config_path(cli)?;

        // Validate config existence (skip for init)
        if !cli.is_init() && !exists {
            log!(
                "error";
                "Config file '{}' not found. Run 'mdshelf init' to create a new project.",
                cli.config.display()
            );
            std::process::exit(1);
        }

        // Load or create default config
        let mut config = if exists && !cli.is_init() {
            Self::from_path(&config_path)?
        } else {
            Self::default()
        };

        // Set paths and apply CLI options
        config.config_path = config_path;
        config.cli = Some(cli);
        config.finalize(cli);

        // Full validation (skip for init: no config file yet)
        if !cli.is_init() {
            config.validate()?;
        }

        Ok(config)
    }

    /// Resolve config file path based on command.
    fn resolve_config_path(cli: &Cli) -> Result<(PathBuf, bool)> {
        let cwd = std::env::current_dir()?;

        match &cli.command {
            Commands::Init { name: Some(name) } => {
                let path = cwd.join(name).join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            Commands::Init { name: None } => {
                let path = cwd.join(&cli.config);
                let exists = path.exists();
                Ok((path, exists))
            }
            _ => match find_config_file(&cli.config) {
                Some(path) => Ok((path, true)),
                None => Ok((cwd.join(&cli.config), false)),
            },
        }
    }

    /// Finalize configuration after loading.
    fn finalize(&mut self, cli: &Cli) {
        // Resolve root path
        let root = match &cli.command {
            Commands::Init { name: Some(name) } => {
                std::env::current_dir().unwrap_or_default().join(name)
            }
            Commands::Init { name: None } => std::env::current_dir().unwrap_or_default(),
            _ => self
                .config_path
                .parent()
                .map(Path::to_path_buf)
                .unwrap_or_default(),
        };

        self.root = crate::utils::path::normalize_path(&root);
        self.config_path = crate::utils::path::normalize_path(&self.config_path);
        self.normalize_paths();
        self.apply_command_options(cli);
    }

    /// Normalize content path relative to the root directory.
    fn normalize_paths(&mut self) {
        let cli = self.get_cli();

        // Apply CLI path override first
        Self::update_option(&mut self.index.content, cli.content.as_ref());

        self.index.content =
            crate::utils::path::normalize_path(&self.root.join(&self.index.content));
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file path with unknown field detection.
    fn from_path(path: &Path) -> Result<Self> {
        let content =
            fs::read_to_string(path).map_err(|err| ConfigError::Io(path.to_path_buf(), err))?;

        let (config, ignored) = Self::parse_with_ignored(&content)?;

        if !ignored.is_empty() {
            Self::print_unknown_fields_warning(&ignored, path);
        }

        Ok(config)
    }

    /// Parse TOML content, collecting any unknown fields.
    fn parse_with_ignored(content: &str) -> Result<(Self, Vec<String>)> {
        let mut ignored = Vec::new();
        let deserializer = toml::Deserializer::new(content);
        let config = serde_ignored::deserialize(deserializer, |path: serde_ignored::Path| {
            ignored.push(path.to_string());
        })?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        // Show only the filename since the config always sits at project root
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        eprintln!();
        log!("warning"; "unknown fields in {}:", display_path);
        log!("warning"; "ignoring:");
        for field in fields {
            eprintln!("- {}", field);
        }
        eprintln!();
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Join a path with the root directory.
    pub fn root_join(&self, path: impl AsRef<Path>) -> PathBuf {
        self.root.join(path)
    }

    /// Get CLI arguments reference
    pub const fn get_cli(&self) -> &'static Cli {
        self.cli.unwrap()
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Apply command-specific configuration options.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Index { args } => self.apply_index_args(args),
            Commands::Serve { args } => self.apply_serve_args(args),
            Commands::Init { .. } => {}
        }
    }

    /// Apply index arguments from CLI.
    fn apply_index_args(&mut self, args: &IndexArgs) {
        crate::logger::set_verbose(args.verbose);
        Self::update_option(&mut self.index.recursive, args.recursive.as_ref());
    }

    /// Apply serve arguments from CLI.
    fn apply_serve_args(&mut self, args: &ServeArgs) {
        crate::logger::set_verbose(args.verbose);
        Self::update_option(&mut self.serve.interface, args.interface.as_ref());
        Self::update_option(&mut self.serve.port, args.port.as_ref());
        Self::update_option(&mut self.cache.offline, args.offline.as_ref());
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration for the current command.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut errors = Vec::new();

        if !self.config_path.exists() {
            bail!(ConfigError::Validation("config file not found".into()));
        }

        if self.cache.version.is_empty() {
            errors.push("cache.version must not be empty".to_string());
        }

        if self.cache.offline {
            if self.cache.precache.is_empty() {
                errors.push("cache.precache must list at least one asset".to_string());
            }
            for entry in &self.cache.precache {
                if !entry.starts_with('/') {
                    errors.push(format!("cache.precache entry '{entry}' must start with '/'"));
                }
            }
            if !self.cache.shell.starts_with('/') {
                errors.push(format!("cache.shell '{}' must start with '/'", self.cache.shell));
            }
            if !self.cache.index_path.starts_with('/') {
                errors.push(format!(
                    "cache.index_path '{}' must start with '/'",
                    self.cache.index_path
                ));
            }
        }

        // Command-specific validation
        if matches!(self.get_cli().command, Commands::Index { .. })
            && !self.index.content.is_dir()
        {
            errors.push(format!(
                "content directory '{}' does not exist",
                self.index.content.display()
            ));
        }

        if errors.is_empty() {
            Ok(())
        } else {
            bail!(ConfigError::Validation(errors.join("\n")))
        }
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config from a TOML fragment.
/// Panics if there are unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(extra: &str) -> ShelfConfig {
    let (parsed, ignored) = ShelfConfig::parse_with_ignored(extra).unwrap();
    assert!(
        ignored.is_empty(),
        "test config has unknown fields: {:?}",
        ignored
    );
    parsed
}

// ============================================================================
// tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str_invalid_toml() {
        // Invalid TOML syntax - unclosed bracket
        let result: Result<ShelfConfig, _> = toml::from_str("[index\ncontent = \"docs\"");
        assert!(result.is_err());
    }

    #[test]
    fn test_shelf_config_default() {
        let config = ShelfConfig::default();

        assert!(config.cli.is_none());
        assert_eq!(config.config_path, PathBuf::new());
        assert_eq!(config.index.extension, "md");
        assert!(config.cache.offline);
        assert_eq!(config.serve.port, 8377);
    }

    #[test]
    fn test_get_root_default() {
        let config = ShelfConfig::default();
        assert_eq!(config.get_root(), Path::new(""));
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[index]\ncontent = \"docs\"\n[unknown_section]\nfield = \"value\"";
        let (config, ignored) = ShelfConfig::parse_with_ignored(content).unwrap();

        // Config should parse successfully
        assert_eq!(config.index.content, PathBuf::from("docs"));

        // Unknown fields should be collected
        assert!(!ignored.is_empty());
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_no_unknown_fields() {
        let content = "[cache]\nversion = \"v2\"";
        let (_, ignored) = ShelfConfig::parse_with_ignored(content).unwrap();
        assert!(ignored.is_empty());
    }
}
