//! Registry configuration (`shaderdex.toml`)
//!
//! Every field has a default, so an empty file (or no file) yields a working
//! configuration. Sections mirror the subsystems they tune.

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::ConfigError;

/// Configuration file name looked up in [`config_dir`].
pub const CONFIG_FILE_NAME: &str = "shaderdex.toml";

/// Shader registry configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, Default)]
pub struct RegistryConfig {
    /// Script corpus discovery
    #[serde(default)]
    pub scripts: ScriptsConfig,
    /// Hash table sizing
    #[serde(default)]
    pub tables: TablesConfig,
    /// Resolve-time behaviour
    #[serde(default)]
    pub resolve: ResolveConfig,
}

/// Where shader scripts are found and how many are accepted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScriptsConfig {
    /// Directory holding the scripts, relative to the source root (default: "scripts")
    #[serde(default = "default_scripts_dir")]
    pub dir: String,
    /// Script file extension without the dot (default: "shader")
    #[serde(default = "default_script_extension")]
    pub extension: String,
    /// Files beyond this count are dropped with a warning (default: 4096)
    #[serde(default = "default_max_files")]
    pub max_files: usize,
    /// Largest script file accepted, in bytes (default: 16 MiB)
    #[serde(default = "default_max_file_bytes")]
    pub max_file_bytes: u64,
}

/// Bucket counts of the two hash tables. Both must be powers of two.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TablesConfig {
    /// Corpus index buckets (default: 2048)
    #[serde(default = "default_corpus_hash_size")]
    pub corpus_hash_size: usize,
    /// Shader cache buckets (default: 1024)
    #[serde(default = "default_shader_hash_size")]
    pub shader_hash_size: usize,
}

/// Resolve path tuning.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResolveConfig {
    /// Lightmaps present in the loaded world (default: 0)
    #[serde(default)]
    pub num_lightmaps: i32,
    /// Longest remap chain followed before giving up (default: 16)
    #[serde(default = "default_max_remap_depth")]
    pub max_remap_depth: usize,
    /// Log every explicit shader as it is parsed (default: false)
    #[serde(default)]
    pub print_shaders: bool,
}

fn default_scripts_dir() -> String {
    "scripts".to_string()
}
fn default_script_extension() -> String {
    "shader".to_string()
}
fn default_max_files() -> usize {
    4096
}
fn default_max_file_bytes() -> u64 {
    16 * 1024 * 1024
}
fn default_corpus_hash_size() -> usize {
    shaderdex_shared::CORPUS_HASH_SIZE
}
fn default_shader_hash_size() -> usize {
    shaderdex_shared::SHADER_HASH_SIZE
}
fn default_max_remap_depth() -> usize {
    16
}

impl Default for ScriptsConfig {
    fn default() -> Self {
        Self {
            dir: default_scripts_dir(),
            extension: default_script_extension(),
            max_files: default_max_files(),
            max_file_bytes: default_max_file_bytes(),
        }
    }
}

impl Default for TablesConfig {
    fn default() -> Self {
        Self {
            corpus_hash_size: default_corpus_hash_size(),
            shader_hash_size: default_shader_hash_size(),
        }
    }
}

impl Default for ResolveConfig {
    fn default() -> Self {
        Self {
            num_lightmaps: 0,
            max_remap_depth: default_max_remap_depth(),
            print_shaders: false,
        }
    }
}

impl TablesConfig {
    /// Replace every size that is not a power of two with its default.
    pub fn repair(&mut self) {
        let fields = [
            (
                "tables.corpus_hash_size",
                &mut self.corpus_hash_size,
                default_corpus_hash_size(),
            ),
            (
                "tables.shader_hash_size",
                &mut self.shader_hash_size,
                default_shader_hash_size(),
            ),
        ];
        for (field, value, default) in fields {
            if !value.is_power_of_two() {
                tracing::warn!(
                    "{} must be a power of two, got {}; using {}",
                    field,
                    value,
                    default
                );
                *value = default;
            }
        }
    }
}

impl RegistryConfig {
    /// Read and validate a configuration file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    /// Load from [`config_dir`] if a config file exists there, otherwise defaults.
    pub fn load_default() -> Result<Self, ConfigError> {
        match config_dir().map(|dir| dir.join(CONFIG_FILE_NAME)) {
            Some(path) if path.exists() => Self::load(&path),
            _ => Ok(Self::default()),
        }
    }

    /// Check the hash table sizes.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("tables.corpus_hash_size", self.tables.corpus_hash_size),
            ("tables.shader_hash_size", self.tables.shader_hash_size),
        ];
        for (field, value) in sizes {
            if !value.is_power_of_two() {
                return Err(ConfigError::InvalidHashSize { field, value });
            }
        }
        Ok(())
    }
}

/// Returns the platform-specific configuration directory.
///
/// On Linux: `~/.config/shaderdex`
///
/// Returns `None` if the home directory cannot be determined.
pub fn config_dir() -> Option<PathBuf> {
    directories::ProjectDirs::from("io", "shaderdex", "shaderdex")
        .map(|dirs| dirs.config_dir().to_path_buf())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = RegistryConfig::default();
        assert_eq!(config.scripts.dir, "scripts");
        assert_eq!(config.scripts.extension, "shader");
        assert_eq!(config.scripts.max_files, 4096);
        assert_eq!(config.tables.corpus_hash_size, 2048);
        assert_eq!(config.tables.shader_hash_size, 1024);
        assert_eq!(config.resolve.num_lightmaps, 0);
        assert_eq!(config.resolve.max_remap_depth, 16);
        assert!(!config.resolve.print_shaders);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn empty_toml_is_default() {
        let config: RegistryConfig = toml::from_str("").unwrap();
        assert_eq!(config, RegistryConfig::default());
    }

    #[test]
    fn partial_sections_keep_other_defaults() {
        let config: RegistryConfig = toml::from_str(
            r#"
            [scripts]
            dir = "materials"

            [resolve]
            num_lightmaps = 4
            "#,
        )
        .unwrap();
        assert_eq!(config.scripts.dir, "materials");
        assert_eq!(config.scripts.extension, "shader");
        assert_eq!(config.resolve.num_lightmaps, 4);
        assert_eq!(config.resolve.max_remap_depth, 16);
        assert_eq!(config.tables, TablesConfig::default());
    }

    #[test]
    fn rejects_non_power_of_two_tables() {
        let mut config = RegistryConfig::default();
        config.tables.shader_hash_size = 1000;
        assert!(matches!(
            config.validate(),
            Err(ConfigError::InvalidHashSize {
                field: "tables.shader_hash_size",
                value: 1000
            })
        ));
    }

    #[test]
    fn repair_resets_bad_table_sizes() {
        let mut tables = TablesConfig {
            corpus_hash_size: 0,
            shader_hash_size: 512,
        };
        tables.repair();
        assert_eq!(tables.corpus_hash_size, 2048);
        assert_eq!(tables.shader_hash_size, 512);

        tables.shader_hash_size = 1000;
        tables.repair();
        assert_eq!(tables.shader_hash_size, 1024);
    }

    #[test]
    fn load_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tables]\ncorpus_hash_size = 512\n").unwrap();

        let config = RegistryConfig::load(&path).unwrap();
        assert_eq!(config.tables.corpus_hash_size, 512);
    }

    #[test]
    fn load_reports_parse_errors() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[tables\n").unwrap();

        assert!(matches!(
            RegistryConfig::load(&path),
            Err(ConfigError::Parse { .. })
        ));
    }

    #[test]
    fn round_trips_through_toml() {
        let mut config = RegistryConfig::default();
        config.resolve.print_shaders = true;
        let text = toml::to_string_pretty(&config).unwrap();
        let parsed: RegistryConfig = toml::from_str(&text).unwrap();
        assert_eq!(parsed, config);
    }
}
