//! Settings for the atlas CLI.
//!
//! Built-in defaults are overlaid by `.atlas/settings.toml` and then by
//! `ATLAS_*` variables. Command flags such as `-k` and `-n` win over all three.
//!
//! # Environment
//!
//! Nested keys are joined with a double underscore:
//! - `ATLAS_CLUSTERING__DEFAULT_K=5` sets `clustering.default_k`
//! - `ATLAS_SIMILARITY__DEFAULT_TOP_N=20` sets `similarity.default_top_n`
//! - `ATLAS_LOGGING__LEVEL=debug` sets `logging.level`

use crate::error::{AtlasError, AtlasResult};
use crate::vector::MAX_CLUSTERS;
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Directory holding the settings file and, by default, the entity file.
pub const CONFIG_DIR: &str = ".atlas";

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "ATLAS_";

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq)]
pub struct Settings {
    /// Version of the configuration schema
    #[serde(default = "default_version")]
    pub version: u32,

    /// Entity file loaded when no --input is given
    #[serde(default = "default_data_path")]
    pub data_path: PathBuf,

    /// Global debug mode
    #[serde(default = "default_false")]
    pub debug: bool,

    /// Clustering settings
    #[serde(default)]
    pub clustering: ClusteringConfig,

    /// Similarity search settings
    #[serde(default)]
    pub similarity: SimilarityConfig,

    /// Logging settings
    #[serde(default)]
    pub logging: LoggingConfig,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct ClusteringConfig {
    /// Cluster count used when -k is not given
    #[serde(default = "default_k")]
    pub default_k: usize,

    /// Extra Lloyd passes after the seed pass (0 keeps the single-pass baseline)
    #[serde(default)]
    pub refine_iterations: usize,

    /// Entity count at which assignment runs in parallel
    #[serde(default = "default_cluster_parallel_threshold")]
    pub parallel_threshold: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct SimilarityConfig {
    /// Result cap used when -n is not given
    #[serde(default = "default_top_n")]
    pub default_top_n: usize,

    /// Candidate count at which scoring runs in parallel
    #[serde(default = "default_similarity_parallel_threshold")]
    pub parallel_threshold: usize,
}

#[derive(Debug, Deserialize, Serialize, Clone, PartialEq, Eq)]
pub struct LoggingConfig {
    /// Default filter directive when RUST_LOG is unset
    #[serde(default = "default_log_level")]
    pub level: String,
}

// serde defaults
fn default_version() -> u32 {
    1
}
fn default_data_path() -> PathBuf {
    PathBuf::from(CONFIG_DIR).join("entities.json")
}
fn default_false() -> bool {
    false
}
fn default_k() -> usize {
    3
}
fn default_cluster_parallel_threshold() -> usize {
    crate::vector::ClusterEngine::new().parallel_threshold()
}
fn default_top_n() -> usize {
    10
}
fn default_similarity_parallel_threshold() -> usize {
    crate::vector::SimilarityRanker::new().parallel_threshold()
}
fn default_log_level() -> String {
    "warn".to_string()
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            version: default_version(),
            data_path: default_data_path(),
            debug: false,
            clustering: ClusteringConfig::default(),
            similarity: SimilarityConfig::default(),
            logging: LoggingConfig::default(),
        }
    }
}

impl Default for ClusteringConfig {
    fn default() -> Self {
        Self {
            default_k: default_k(),
            refine_iterations: 0,
            parallel_threshold: default_cluster_parallel_threshold(),
        }
    }
}

impl Default for SimilarityConfig {
    fn default() -> Self {
        Self {
            default_top_n: default_top_n(),
            parallel_threshold: default_similarity_parallel_threshold(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

impl Settings {
    /// Settings for the enclosing workspace, or defaults when none is found.
    pub fn load() -> AtlasResult<Self> {
        // Walk up from the current directory
        let config_path = Self::find_workspace_config()
            .unwrap_or_else(|| PathBuf::from(CONFIG_DIR).join("settings.toml"));

        Self::load_from(config_path)
    }

    /// Settings layered over `path`. A missing file contributes nothing.
    pub fn load_from(path: impl AsRef<Path>) -> AtlasResult<Self> {
        let settings: Settings = Self::figment(path.as_ref())
            .extract()
            .map_err(|e| AtlasError::Config {
                reason: e.to_string(),
            })?;

        settings.validate()?;
        Ok(settings)
    }

    fn figment(path: &Path) -> Figment {
        Figment::new()
            .merge(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            // Double underscore separates nested levels; single underscores stay in field names
            .merge(Env::prefixed(ENV_PREFIX).map(|key| {
                key.as_str()
                    .to_lowercase()
                    .replace("__", ".")
                    .into()
            }))
    }

    /// Reject values no query can run with
    pub fn validate(&self) -> AtlasResult<()> {
        if self.clustering.default_k == 0 || self.clustering.default_k > MAX_CLUSTERS {
            return Err(AtlasError::Config {
                reason: format!("clustering.default_k must be between 1 and {MAX_CLUSTERS}"),
            });
        }
        if self.similarity.default_top_n == 0 {
            return Err(AtlasError::Config {
                reason: "similarity.default_top_n must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// First `.atlas/settings.toml` found between the current directory and `/`.
    fn find_workspace_config() -> Option<PathBuf> {
        Self::workspace_root().map(|root| root.join(CONFIG_DIR).join("settings.toml"))
    }

    /// Directory that contains `.atlas`, if any.
    pub fn workspace_root() -> Option<PathBuf> {
        let current = std::env::current_dir().ok()?;

        current
            .ancestors()
            .find(|ancestor| ancestor.join(CONFIG_DIR).is_dir())
            .map(Path::to_path_buf)
    }

    /// Effective settings rendered as TOML.
    pub fn to_toml(&self) -> AtlasResult<String> {
        toml::to_string_pretty(self).map_err(|e| AtlasError::Config {
            reason: format!("Failed to serialize settings: {e}"),
        })
    }

    /// Writes the settings to `path`, creating parent directories.
    pub fn save(&self, path: impl AsRef<Path>) -> AtlasResult<()> {
        let path = path.as_ref();
        let io_error = |e: std::io::Error| AtlasError::Config {
            reason: format!("Failed to write '{}': {e}", path.display()),
        };

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }
        std::fs::write(path, self.to_toml()?).map_err(io_error)
    }

    /// Writes a commented settings template into `dir/.atlas`.
    pub fn init_config_file(dir: impl AsRef<Path>, force: bool) -> AtlasResult<PathBuf> {
        let config_path = dir.as_ref().join(CONFIG_DIR).join("settings.toml");

        if !force && config_path.exists() {
            return Err(AtlasError::Config {
                reason: format!(
                    "Configuration file already exists at '{}'. Use --force to overwrite",
                    config_path.display()
                ),
            });
        }

        let io_error = |e: std::io::Error| AtlasError::Config {
            reason: format!("Failed to write '{}': {e}", config_path.display()),
        };

        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent).map_err(io_error)?;
        }

        let defaults = Settings::default();
        let template = format!(
            r#"# Entity Atlas Configuration File

# Version of the configuration schema
version = 1

# Entity file loaded when no --input is given (relative to the working directory)
data_path = "{data_path}"

# Global debug mode
debug = false

[clustering]
# Number of clusters when -k is not given
default_k = {default_k}

# Extra refinement passes after the seed pass.
# 0 keeps the fast single-pass behavior: centroids are the seed entities.
refine_iterations = 0

# Entity count at which assignment runs on all cores
parallel_threshold = {cluster_threshold}

[similarity]
# Number of results when -n is not given
default_top_n = {top_n}

# Candidate count at which scoring runs on all cores
parallel_threshold = {similarity_threshold}

[logging]
# Default log filter (overridden by RUST_LOG), e.g. "info" or "entity_atlas=debug"
level = "{level}"
"#,
            data_path = defaults.data_path.display(),
            default_k = defaults.clustering.default_k,
            cluster_threshold = defaults.clustering.parallel_threshold,
            top_n = defaults.similarity.default_top_n,
            similarity_threshold = defaults.similarity.parallel_threshold,
            level = defaults.logging.level,
        );

        std::fs::write(&config_path, template).map_err(io_error)?;
        Ok(config_path)
    }
}
