//! Configuration management for `deschema.toml`.
//!
//! # Module Structure
//!
//! ```text
//! config/
//! ├── section/       # Configuration section definitions
//! │   ├── build      # [build]
//! │   └── serve      # [serve]
//! ├── types/         # Utility types
//! │   ├── error      # ConfigError, ConfigDiagnostics, FieldPath
//! │   └── handle     # Global config handle
//! └── mod.rs         # SiteConfig (this file)
//! ```
//!
//! # Sections
//!
//! | Section     | Purpose                                        |
//! |-------------|------------------------------------------------|
//! | `[strip]`   | Stripping modes and provider suppression flags |
//! | `[build]`   | Rendered site location, output, extensions     |
//! | `[serve]`   | Stripping HTTP server                          |
//!
//! A missing config file is not an error: every mode defaults to disabled
//! and CLI flags decide.

pub mod section;
pub mod types;
mod util;

use util::find_config_file;

pub use section::{BuildConfig, ServeConfig};
pub use types::{ConfigDiagnostics, ConfigError, FieldPath, cfg, init_config, reload_config};

use crate::{
    cli::{Cli, Commands, ModeArgs},
    debug, log,
    strip::StripConfig,
    utils::{hash, path::normalize_path},
};
use anyhow::{Context, Result};
use serde::Deserialize;
use std::{
    fs,
    path::{Path, PathBuf},
};

// ============================================================================
// root configuration
// ============================================================================

/// Root configuration structure representing deschema.toml
#[derive(Debug, Clone, Default, Deserialize)]
pub struct SiteConfig {
    /// CLI arguments reference (internal use only)
    #[serde(skip)]
    pub cli: Option<&'static Cli>,

    /// Absolute path to the config file, whether or not it exists
    #[serde(skip)]
    pub config_path: PathBuf,

    /// Hash of the config file content this was loaded from (0 if none)
    #[serde(skip)]
    pub content_hash: u64,

    /// Project root directory - parent of config file, or cwd
    #[serde(skip)]
    pub root: PathBuf,

    /// Stripping modes
    #[serde(default)]
    pub strip: StripConfig,

    /// Batch rewrite settings
    #[serde(default)]
    pub build: BuildConfig,

    /// Server settings
    #[serde(default)]
    pub serve: ServeConfig,
}

impl SiteConfig {
    /// Load configuration from CLI arguments.
    ///
    /// Searches upward from cwd for the config file. The project root is the
    /// config file's parent directory, or cwd when there is none.
    pub fn load(cli: &'static Cli) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current working directory")?;
        let found = find_config_file(&cli.config, &cwd);

        let mut config = match &found {
            Some(path) => {
                let content = fs::read_to_string(path)
                    .map_err(|err| ConfigError::Io(path.clone(), err))?;
                let mut config = Self::from_content(&content, path)?;
                config.content_hash = hash::compute(&content);
                config
            }
            None => {
                debug!("config"; "{} not found, using defaults", cli.config.display());
                Self::default()
            }
        };

        let root = found
            .as_deref()
            .and_then(Path::parent)
            .map(Path::to_path_buf)
            .unwrap_or_else(|| cwd.clone());

        config.config_path = found.unwrap_or_else(|| cwd.join(&cli.config));
        config.cli = Some(cli);
        config.finalize(cli, &root);
        config.validate()?;

        Ok(config)
    }

    /// Parse configuration from TOML string
    pub fn from_str(content: &str) -> Result<Self> {
        let config: Self = toml::from_str(content).map_err(ConfigError::from)?;
        Ok(config)
    }

    /// Parse file content with unknown field detection.
    fn from_content(content: &str, path: &Path) -> Result<Self> {
        let (config, ignored) = Self::parse_with_ignored(content)?;

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
        })
        .map_err(ConfigError::from)?;
        Ok((config, ignored))
    }

    /// Print warning about unknown fields.
    ///
    /// No confirmation prompt: stdin may carry the page being stripped.
    fn print_unknown_fields_warning(fields: &[String], path: &Path) {
        let display_path = path
            .file_name()
            .map(|n| n.to_string_lossy())
            .unwrap_or_else(|| path.to_string_lossy());
        log!("warning"; "unknown fields in {}, ignoring:", display_path);
        for field in fields {
            eprintln!("- {}", field);
        }
    }

    /// Get the root directory path
    pub fn get_root(&self) -> &Path {
        &self.root
    }

    /// Get path relative to the project root
    pub fn root_relative(&self, path: impl AsRef<Path>) -> PathBuf {
        path.as_ref()
            .strip_prefix(&self.root)
            .map(Path::to_path_buf)
            .unwrap_or_else(|_| path.as_ref().to_path_buf())
    }

    /// Directory served by `deschema serve`.
    pub fn serve_root(&self) -> &Path {
        self.serve.root.as_deref().unwrap_or(&self.build.input)
    }

    // ========================================================================
    // cli configuration updates
    // ========================================================================

    /// Normalize file paths against `root`, then apply CLI overrides.
    fn finalize(&mut self, cli: &Cli, root: &Path) {
        let root = normalize_path(root);
        self.normalize_paths(&root);
        self.root = root;
        self.apply_command_options(cli);
    }

    /// Apply command-specific configuration options.
    ///
    /// CLI paths are relative to cwd, not to the project root.
    fn apply_command_options(&mut self, cli: &Cli) {
        match &cli.command {
            Commands::Strip { args } => {
                self.apply_mode_args(&args.modes);
                if let Some(output) = &args.output {
                    self.build.output = Some(normalize_path(output));
                }
            }
            Commands::Serve { args } => {
                self.apply_mode_args(&args.modes);
                Self::update_option(&mut self.serve.interface, args.interface.as_ref());
                Self::update_option(&mut self.serve.port, args.port.as_ref());
                if let Some(root) = &args.root {
                    self.serve.root = Some(normalize_path(root));
                }
            }
            // Scan reports every construct regardless of modes
            Commands::Scan { .. } => {}
        }
    }

    /// Apply stripping mode flags from CLI.
    fn apply_mode_args(&mut self, modes: &ModeArgs) {
        let strip = &mut self.strip;
        Self::update_option(&mut strip.microdata, modes.microdata.as_ref());
        Self::update_option(&mut strip.rdfa, modes.rdfa.as_ref());
        Self::update_option(&mut strip.jsonld, modes.jsonld.as_ref());
        Self::update_option(&mut strip.yoast_jsonld, modes.yoast_jsonld.as_ref());
        Self::update_option(&mut strip.woocommerce_jsonld, modes.woocommerce_jsonld.as_ref());
        Self::update_option(
            &mut strip.woocommerce_mail_jsonld,
            modes.woocommerce_mail_jsonld.as_ref(),
        );
    }

    /// Update config option if CLI value is provided.
    fn update_option<T: Clone>(config_option: &mut T, cli_option: Option<&T>) {
        if let Some(option) = cli_option {
            *config_option = option.clone();
        }
    }

    // ========================================================================
    // path normalization
    // ========================================================================

    /// Normalize config-file paths relative to the project root.
    fn normalize_paths(&mut self, root: &Path) {
        self.build.input = normalize_path(&root.join(&self.build.input));
        if let Some(output) = self.build.output.take() {
            self.build.output = Some(normalize_path(&root.join(output)));
        }
        if let Some(serve_root) = self.serve.root.take() {
            self.serve.root = Some(normalize_path(&root.join(serve_root)));
        }
    }

    // ========================================================================
    // validation
    // ========================================================================

    /// Validate configuration.
    ///
    /// Collects all validation errors and returns them at once.
    pub fn validate(&self) -> Result<()> {
        let mut diag = ConfigDiagnostics::new();

        self.build.validate(&mut diag);
        self.serve.validate(&mut diag);

        if let Some(Commands::Strip { .. } | Commands::Serve { .. }) =
            self.cli.map(|cli| &cli.command)
            && !self.strip.has_text_passes()
            && !self.strip.has_provider_flags()
        {
            diag.note(
                FieldPath::new("strip"),
                "no stripping mode enabled, pages pass through unchanged",
            );
        }

        diag.into_result()
            .map_err(|e| ConfigError::Diagnostics(e).into())
    }
}

// ============================================================================
// Test Helpers (available to all modules via `use crate::config::test_*`)
// ============================================================================

/// Parse config, panicking on unknown fields (to catch config typos in tests).
#[cfg(test)]
pub fn test_parse_config(content: &str) -> SiteConfig {
    let (parsed, ignored) = SiteConfig::parse_with_ignored(content).unwrap();
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
    use crate::cli::{StripArgs, ServeArgs};
    use clap::Parser;

    fn leak_cli(args: &[&str]) -> &'static Cli {
        Box::leak(Box::new(Cli::parse_from(args)))
    }

    #[test]
    fn test_from_str_invalid_toml() {
        assert!(SiteConfig::from_str("[strip\nmicrodata = true").is_err());
    }

    #[test]
    fn test_strip_section() {
        let config = test_parse_config("[strip]\nmicrodata = true\njsonld = true");
        assert!(config.strip.microdata);
        assert!(config.strip.jsonld);
        assert!(!config.strip.rdfa);
        assert!(!config.strip.yoast_jsonld);
    }

    #[test]
    fn test_strip_section_legacy_keys() {
        let config = test_parse_config("[strip]\nrm_jsonld = true\nwoocommerceJsonld = true");
        assert!(config.strip.jsonld);
        assert!(config.strip.woocommerce_jsonld);
    }

    #[test]
    fn test_site_config_default() {
        let config = SiteConfig::default();
        assert!(config.cli.is_none());
        assert_eq!(config.strip, StripConfig::default());
        assert_eq!(config.serve.port, 5288);
    }

    #[test]
    fn test_unknown_fields_detected() {
        let content = "[strip]\nmicrodata = true\nmicrodta = true\n[unknown_section]\nfield = 1";
        let (config, ignored) = SiteConfig::parse_with_ignored(content).unwrap();

        assert!(config.strip.microdata);
        assert!(ignored.iter().any(|f| f.contains("microdta")));
        assert!(ignored.iter().any(|f| f.contains("unknown_section")));
    }

    #[test]
    fn test_cli_modes_override_file() {
        let cli = leak_cli(&["deschema", "strip", "--rdfa", "--microdata=false"]);
        let mut config = test_parse_config("[strip]\nmicrodata = true\njsonld = true");
        config.apply_command_options(cli);

        assert!(!config.strip.microdata);
        assert!(config.strip.rdfa);
        assert!(config.strip.jsonld);
    }

    #[test]
    fn test_cli_serve_overrides() {
        let cli = leak_cli(&["deschema", "serve", "-p", "9000", "--yoast-jsonld"]);
        let mut config = test_parse_config("[serve]\nport = 3000");
        config.apply_command_options(cli);

        assert_eq!(config.serve.port, 9000);
        assert!(config.strip.yoast_jsonld);
        assert!(matches!(cli.command, Commands::Serve { args: ServeArgs { root: None, .. } }));
    }

    #[test]
    fn test_scan_ignores_modes() {
        let cli = leak_cli(&["deschema", "scan"]);
        let mut config = test_parse_config("[strip]\nrdfa = true");
        config.apply_command_options(cli);
        assert!(config.strip.rdfa);
        assert!(!config.strip.microdata);
    }

    #[test]
    fn test_normalize_paths_against_root() {
        let mut config = test_parse_config("[build]\ninput = \"site\"\noutput = \"clean\"");
        config.normalize_paths(Path::new("/srv/project"));

        assert_eq!(config.build.input, PathBuf::from("/srv/project/site"));
        assert_eq!(config.build.output, Some(PathBuf::from("/srv/project/clean")));
        assert_eq!(config.serve_root(), Path::new("/srv/project/site"));
    }

    #[test]
    fn test_validate_collects_errors() {
        let mut config = test_parse_config(
            "[build]\nextensions = []\n[serve]\nadmin_prefixes = [\"admin\"]",
        );
        config.cli = Some(leak_cli(&["deschema", "scan"]));
        let err = config.validate().unwrap_err();
        let diag = match err.downcast_ref::<ConfigError>() {
            Some(ConfigError::Diagnostics(diag)) => diag,
            other => panic!("unexpected error: {other:?}"),
        };
        assert_eq!(diag.len(), 2);
    }

    #[test]
    fn test_strip_args_paths() {
        let cli = leak_cli(&["deschema", "strip", "a.html", "public", "-o", "out"]);
        let Commands::Strip { args } = &cli.command else {
            panic!("expected strip");
        };
        let StripArgs { paths, output, .. } = args;
        assert_eq!(paths.len(), 2);
        assert_eq!(output.as_deref(), Some(Path::new("out")));
    }
}
