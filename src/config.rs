//! Configuration management with layered loading
//!
//! Precedence (lowest to highest):
//! 1. Compiled defaults
//! 2. Global config: `$XDG_CONFIG_HOME/rstree/rstree.toml`
//! 3. Local config: file passed via `--config`
//! 4. Environment variables: `RSTREE_*` prefix

use std::path::{Path, PathBuf};

use config::{Config, ConfigError, Environment};
use directories::ProjectDirs;
use serde::de::{DeserializeOwned, IntoDeserializer};
use serde::{Deserialize, Serialize};

use crate::application::ApplicationError;
use crate::domain::{
    BuildOptions, DuplicatePolicy, LookupStrategy, DEFAULT_MAX_DEPTH, MAX_DEPTH_LIMIT,
};

/// How a forest is printed.
#[derive(
    Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum,
)]
#[serde(rename_all = "kebab-case")]
pub enum OutputFormat {
    /// Indented tree, selected nodes marked with `*`
    #[default]
    Tree,
    /// Pretty-printed JSON
    Json,
}

/// Raw settings for intermediate parsing (`None` means "not specified").
#[derive(Debug, Clone, Deserialize, Default)]
#[serde(default)]
pub struct RawSettings {
    pub max_depth: Option<usize>,
    pub duplicates: Option<DuplicatePolicy>,
    pub strategy: Option<LookupStrategy>,
    pub format: Option<OutputFormat>,
}

/// Unified configuration for rstree.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Settings {
    /// Deepest hierarchy accepted before assembly fails
    pub max_depth: usize,
    /// Treatment of records sharing an id
    pub duplicates: DuplicatePolicy,
    /// Child lookup strategy
    pub strategy: LookupStrategy,
    /// Default output format
    pub format: OutputFormat,
}

impl Default for Settings {
    fn default() -> Self {
        let options = BuildOptions::default();
        Self {
            max_depth: options.max_depth,
            duplicates: options.duplicates,
            strategy: options.strategy,
            format: OutputFormat::default(),
        }
    }
}

/// Get the XDG config directory for rstree.
pub fn global_config_dir() -> Option<PathBuf> {
    ProjectDirs::from("", "", "rstree").map(|dirs| dirs.config_dir().to_path_buf())
}

/// Get the path to the global config file.
pub fn global_config_path() -> Option<PathBuf> {
    global_config_dir().map(|dir| dir.join("rstree.toml"))
}

/// Load a TOML file into RawSettings for manual merging.
fn load_raw_settings(path: &Path) -> Result<RawSettings, ApplicationError> {
    let content = std::fs::read_to_string(path).map_err(|e| ApplicationError::Config {
        message: format!("read {}: {}", path.display(), e),
    })?;
    toml::from_str(&content).map_err(|e| ApplicationError::Config {
        message: format!("parse {}: {}", path.display(), e),
    })
}

impl Settings {
    /// Options for the tree builder.
    pub fn build_options(&self) -> BuildOptions {
        BuildOptions {
            max_depth: self.max_depth,
            duplicates: self.duplicates,
            strategy: self.strategy,
        }
    }

    /// Overlay wins wherever it specifies a value.
    pub fn merge_with(&self, overlay: &RawSettings) -> Self {
        Self {
            max_depth: overlay.max_depth.unwrap_or(self.max_depth),
            duplicates: overlay.duplicates.unwrap_or(self.duplicates),
            strategy: overlay.strategy.unwrap_or(self.strategy),
            format: overlay.format.unwrap_or(self.format),
        }
    }

    /// Load settings with layered precedence.
    ///
    /// # Arguments
    /// * `local_path` - Optional config file given on the command line; it must exist
    pub fn load(local_path: Option<&Path>) -> Result<Self, ApplicationError> {
        // 1. Start with defaults
        let mut current = Self::default();

        // 2. Global config
        if let Some(global_path) = global_config_path() {
            if global_path.exists() {
                let raw = load_raw_settings(&global_path)?;
                current = current.merge_with(&raw);
            }
        }

        // 3. Local config
        if let Some(local) = local_path {
            let raw = load_raw_settings(local)?;
            current = current.merge_with(&raw);
        }

        // 4. Environment variables (explicit override)
        current = Self::apply_env_overrides(current)?;

        current.validate()?;
        Ok(current)
    }

    /// Apply RSTREE_* environment variables as explicit overrides.
    fn apply_env_overrides(mut settings: Self) -> Result<Self, ApplicationError> {
        // Use config crate just for env var parsing
        let config = Config::builder()
            .add_source(
                Environment::with_prefix("RSTREE")
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()
            .map_err(config_err)?;

        if let Ok(val) = config.get_string("max_depth") {
            settings.max_depth = val.trim().parse().map_err(|e| ApplicationError::Config {
                message: format!("RSTREE_MAX_DEPTH={val}: {e}"),
            })?;
        }
        if let Ok(val) = config.get_string("duplicates") {
            settings.duplicates = parse_enum("RSTREE_DUPLICATES", &val)?;
        }
        if let Ok(val) = config.get_string("strategy") {
            settings.strategy = parse_enum("RSTREE_STRATEGY", &val)?;
        }
        if let Ok(val) = config.get_string("format") {
            settings.format = parse_enum("RSTREE_FORMAT", &val)?;
        }

        Ok(settings)
    }

    fn validate(&self) -> Result<(), ApplicationError> {
        if self.max_depth == 0 || self.max_depth > MAX_DEPTH_LIMIT {
            return Err(ApplicationError::Config {
                message: format!(
                    "max_depth must be between 1 and {MAX_DEPTH_LIMIT}, got {}",
                    self.max_depth
                ),
            });
        }
        Ok(())
    }

    /// Show the effective configuration as TOML.
    pub fn to_toml(&self) -> Result<String, ApplicationError> {
        toml::to_string_pretty(self).map_err(|e| ApplicationError::Config {
            message: format!("serialize config: {e}"),
        })
    }

    /// Generate a template config file.
    pub fn template() -> String {
        format!(
            r#"# rstree configuration
#
# Locations (by precedence, lowest to highest):
#   Global: ~/.config/rstree/rstree.toml
#   Local:  file passed with --config
#   Env:    RSTREE_* environment variables (e.g. RSTREE_STRATEGY=scan)

# Deepest hierarchy accepted (1 to {MAX_DEPTH_LIMIT}); deeper chains (usually
# duplicate ids forming a loop) abort assembly with an error
# max_depth = {DEFAULT_MAX_DEPTH}

# Records sharing an id: "preserve" keeps all (duplicated subtrees possible),
# "first-wins" keeps the first record per id
# duplicates = "preserve"

# Child lookup: "index" (linear) or "scan" (quadratic, same output)
# strategy = "index"

# Output: "tree" or "json"
# format = "tree"
"#
        )
    }
}

fn parse_enum<T: DeserializeOwned>(name: &str, value: &str) -> Result<T, ApplicationError> {
    let deserializer: serde::de::value::StrDeserializer<'_, serde::de::value::Error> =
        value.trim().into_deserializer();
    T::deserialize(deserializer).map_err(|e| ApplicationError::Config {
        message: format!("{name}={value}: {e}"),
    })
}

fn config_err(e: ConfigError) -> ApplicationError {
    ApplicationError::Config {
        message: e.to_string(),
    }
}
