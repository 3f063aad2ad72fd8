//! Engine configuration
//!
//! Loaded once at startup from an optional TOML file and `SCAFFOLD_*`
//! environment variables, then passed by reference to the registry and the
//! scaffold manager.

use std::path::{Path, PathBuf};

use config::{Config, Environment, File, FileFormat};
use serde::{Deserialize, Serialize};

use crate::{conflict_guard::ConflictPolicy, error::Result};

/// Environment variable prefix
pub const ENV_PREFIX: &str = "SCAFFOLD";

/// Extensions whose files are copied verbatim
pub const DEFAULT_BINARY_EXTENSIONS: &[&str] = &[
    "png", "jpg", "jpeg", "gif", "bmp", "ico", "webp", "tiff", "pdf", "woff", "woff2", "ttf",
    "otf", "eot", "zip", "gz", "tgz", "tar", "jar", "wasm", "exe", "dll", "so", "dylib", "mp3",
    "mp4", "wav", "sqlite", "db",
];

/// Configuration shared by all engine operations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Template roots, lowest precedence first
    pub template_roots: Vec<PathBuf>,
    /// Policy used when the caller does not choose one
    pub default_policy: ConflictPolicy,
    /// Lowercase extensions (without dot) treated as binary
    pub binary_extensions: Vec<String>,
    /// Retry transient IO failures once
    pub retry_transient_io: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            template_roots: default_template_roots(),
            default_policy: ConflictPolicy::Abort,
            binary_extensions: DEFAULT_BINARY_EXTENSIONS
                .iter()
                .map(|ext| ext.to_string())
                .collect(),
            retry_transient_io: true,
        }
    }
}

impl EngineConfig {
    /// Configuration reading templates from the given roots only
    pub fn with_roots(roots: Vec<PathBuf>) -> Self {
        Self {
            template_roots: roots,
            ..Default::default()
        }
    }

    /// Whether `path` should be copied verbatim based on its extension
    pub fn is_binary_path(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| {
                let ext = ext.to_ascii_lowercase();
                self.binary_extensions.iter().any(|b| b.eq_ignore_ascii_case(&ext))
            })
            .unwrap_or(false)
    }
}

/// Templates shipped with scaffold
///
/// An installed binary finds them next to the executable, either in
/// `<bin>/templates` or in `<prefix>/share/scaffold/templates`. Builds run
/// from the workspace fall back to the source tree.
pub fn bundled_templates_dir() -> PathBuf {
    std::env::current_exe()
        .ok()
        .and_then(|exe| installed_templates_dir(&exe))
        .unwrap_or_else(|| PathBuf::from(concat!(env!("CARGO_MANIFEST_DIR"), "/../../templates")))
}

fn installed_templates_dir(exe: &Path) -> Option<PathBuf> {
    let bin_dir = exe.parent()?;
    let candidates = [
        bin_dir.join("templates"),
        bin_dir.join("..").join("share").join("scaffold").join("templates"),
    ];
    candidates.into_iter().find(|dir| dir.is_dir())
}

/// Bundled templates first, then the per-user data directory
pub fn default_template_roots() -> Vec<PathBuf> {
    let mut roots = vec![bundled_templates_dir()];
    if let Some(data_dir) = dirs::data_dir() {
        roots.push(data_dir.join("scaffold").join("templates"));
    }
    roots
}

/// Loads [`EngineConfig`] from file and environment
pub struct ConfigManager {
    /// Configuration file path
    config_path: PathBuf,
    /// Environment prefix
    env_prefix: String,
}

impl ConfigManager {
    /// Create a configuration manager using the default config path
    pub fn new() -> Self {
        Self {
            config_path: Self::default_config_path(),
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Create with custom config path
    pub fn with_path(path: PathBuf) -> Self {
        Self {
            config_path: path,
            env_prefix: ENV_PREFIX.to_string(),
        }
    }

    /// Use a different environment prefix
    pub fn with_env_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.env_prefix = prefix.into();
        self
    }

    /// Path of the configuration file
    pub fn config_path(&self) -> &Path {
        &self.config_path
    }

    /// Get default config path
    fn default_config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("scaffold")
            .join("config.toml")
    }

    /// Load the configuration
    ///
    /// A missing file is not an error; unset keys keep their defaults.
    pub fn load(&self) -> Result<EngineConfig> {
        let config = Config::builder()
            .add_source(File::new(&self.config_path.to_string_lossy(), FileFormat::Toml).required(false))
            .add_source(
                Environment::with_prefix(&self.env_prefix)
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("template_roots")
                    .with_list_parse_key("binary_extensions"),
            )
            .build()?;

        Ok(config.try_deserialize()?)
    }
}

impl Default for ConfigManager {
    fn default() -> Self {
        Self::new()
    }
}
