//! Configuration for Trackify.
//!
//! Settings are layered: `.trackify/trackify.toml` → environment → CLI flags,
//! each layer overriding the one before it. The resolved [`TrackifyConfig`]
//! produces the [`Backend`] the data service is built with.
//!
//! # Configuration File Format
//!
//! ```toml
//! [backend]
//! kind = "local"          # "remote" | "local"
//! api_url = "http://localhost:5000/api"
//! data_dir = ".trackify/data"
//! ```
//!
//! # Environment
//!
//! | Variable            | Overrides          |
//! |---------------------|--------------------|
//! | `TRACKIFY_BACKEND`  | `backend.kind`     |
//! | `TRACKIFY_API_URL`  | `backend.api_url`  |
//! | `TRACKIFY_DATA_DIR` | `backend.data_dir` |

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::store::Backend;
use crate::store::remote::DEFAULT_API_URL;

/// Directory under the project root holding config and local data.
pub const CONFIG_DIR: &str = ".trackify";
pub const CONFIG_FILE: &str = "trackify.toml";
pub const DEFAULT_DATA_DIR: &str = ".trackify/data";

pub const ENV_BACKEND: &str = "TRACKIFY_BACKEND";
pub const ENV_API_URL: &str = "TRACKIFY_API_URL";
pub const ENV_DATA_DIR: &str = "TRACKIFY_DATA_DIR";

/// Which store implementation to use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    #[default]
    Local,
    Remote,
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BackendKind::Local => write!(f, "local"),
            BackendKind::Remote => write!(f, "remote"),
        }
    }
}

impl std::str::FromStr for BackendKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "local" => Ok(BackendKind::Local),
            "remote" => Ok(BackendKind::Remote),
            _ => anyhow::bail!("Invalid backend '{}'. Valid values: local, remote", s),
        }
    }
}

/// `[backend]` section.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BackendSection {
    #[serde(default)]
    pub kind: BackendKind,
    /// Base URL of the tracker API, used when `kind = "remote"`
    #[serde(default = "default_api_url")]
    pub api_url: String,
    /// Local data directory, relative to the project directory unless absolute
    #[serde(default = "default_data_dir")]
    pub data_dir: String,
}

fn default_api_url() -> String {
    DEFAULT_API_URL.to_string()
}

fn default_data_dir() -> String {
    DEFAULT_DATA_DIR.to_string()
}

impl Default for BackendSection {
    fn default() -> Self {
        Self {
            kind: BackendKind::default(),
            api_url: default_api_url(),
            data_dir: default_data_dir(),
        }
    }
}

/// Contents of `trackify.toml`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TrackifyToml {
    #[serde(default)]
    pub backend: BackendSection,
}

impl TrackifyToml {
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self> {
        toml::from_str(content).context("Failed to parse trackify.toml")
    }

    /// Load `trackify.toml` from `config_dir`, or defaults if it is absent.
    pub fn load_or_default(config_dir: &Path) -> Result<Self> {
        let config_path = config_dir.join(CONFIG_FILE);
        if config_path.exists() {
            Self::load(&config_path)
        } else {
            Ok(Self::default())
        }
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let content = toml::to_string_pretty(self).context("Failed to serialize trackify.toml")?;
        std::fs::write(path, content)
            .with_context(|| format!("Failed to write config file: {}", path.display()))?;
        Ok(())
    }

    /// Validate the file's values and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        validate_values(&self.backend.api_url, &self.backend.data_dir)
    }
}

fn validate_values(api_url: &str, data_dir: &str) -> Vec<String> {
    let mut warnings = Vec::new();

    match reqwest::Url::parse(api_url) {
        Ok(url) if matches!(url.scheme(), "http" | "https") => {}
        Ok(url) => warnings.push(format!(
            "Invalid api_url '{}': scheme '{}' is not http or https",
            api_url,
            url.scheme()
        )),
        Err(e) => warnings.push(format!("Invalid api_url '{}': {}", api_url, e)),
    }

    if data_dir.trim().is_empty() {
        warnings.push("data_dir is empty".to_string());
    }

    warnings
}

/// One override layer. Each `Some` replaces the value beneath it.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub backend: Option<String>,
    pub api_url: Option<String>,
    pub data_dir: Option<String>,
}

impl Overrides {
    /// Read the `TRACKIFY_*` variables from the process environment.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read the `TRACKIFY_*` variables through `lookup`. Empty values count
    /// as unset.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        Self {
            backend: get(ENV_BACKEND),
            api_url: get(ENV_API_URL),
            data_dir: get(ENV_DATA_DIR),
        }
    }
}

/// Fully resolved configuration.
#[derive(Debug, Clone)]
pub struct TrackifyConfig {
    pub project_dir: PathBuf,
    /// Path to the .trackify directory
    pub config_dir: PathBuf,
    /// Parsed trackify.toml (defaults if the file is absent)
    pub toml: TrackifyToml,
    pub kind: BackendKind,
    pub api_url: String,
    pub data_dir: PathBuf,
}

impl TrackifyConfig {
    /// Load the file under `project_dir` and apply environment then `cli`.
    pub fn load(project_dir: &Path, cli: &Overrides) -> Result<Self> {
        let project_dir = project_dir
            .canonicalize()
            .context("Failed to resolve project directory")?;
        let toml = TrackifyToml::load_or_default(&project_dir.join(CONFIG_DIR))?;
        Self::resolve(project_dir, toml, &Overrides::from_env(), cli)
    }

    /// Layer `env` then `cli` over `toml`.
    pub fn resolve(
        project_dir: PathBuf,
        toml: TrackifyToml,
        env: &Overrides,
        cli: &Overrides,
    ) -> Result<Self> {
        let kind = match cli.backend.as_deref().or(env.backend.as_deref()) {
            Some(value) => value.parse()?,
            None => toml.backend.kind,
        };
        let api_url = cli
            .api_url
            .clone()
            .or_else(|| env.api_url.clone())
            .unwrap_or_else(|| toml.backend.api_url.clone());
        let data_dir = cli
            .data_dir
            .clone()
            .or_else(|| env.data_dir.clone())
            .unwrap_or_else(|| toml.backend.data_dir.clone());

        Ok(Self {
            config_dir: project_dir.join(CONFIG_DIR),
            data_dir: project_dir.join(data_dir),
            project_dir,
            toml,
            kind,
            api_url,
        })
    }

    pub fn config_path(&self) -> PathBuf {
        self.config_dir.join(CONFIG_FILE)
    }

    pub fn backend(&self) -> Backend {
        match self.kind {
            BackendKind::Local => Backend::Local {
                data_dir: self.data_dir.clone(),
            },
            BackendKind::Remote => Backend::Remote {
                base_url: self.api_url.clone(),
            },
        }
    }

    /// Validate the effective values and return any warnings.
    pub fn validate(&self) -> Vec<String> {
        let data_dir = if self.data_dir == self.project_dir {
            String::new()
        } else {
            self.data_dir.display().to_string()
        };
        validate_values(&self.api_url, &data_dir)
    }
}
