use crate::constants::{CONFIG_ENV_VAR, DEFAULT_FEATURIZERS, DEFAULT_MAX_TREE_DEPTH};
use crate::error::{Error, IntoCoreError, Result};
use crate::merge::CollisionPolicy;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Main configuration for textfeat.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
#[serde(default)]
pub struct TextfeatConfig {
    /// Which featurizers run, in merge order.
    pub featurizers: FeaturizerSelection,

    /// Combiner behaviour.
    pub combiner: CombinerConfig,

    /// Linguistic toolkit resources.
    pub toolkit: ToolkitConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,
}

/// Ordered list of enabled featurizers.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct FeaturizerSelection {
    /// Registered featurizer names.
    pub enabled: Vec<String>,
}

/// Combiner configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct CombinerConfig {
    /// Policy applied when two featurizers emit the same key.
    pub collision_policy: CollisionPolicy,

    /// Log and return every overwritten key.
    pub report_collisions: bool,

    /// Sequential or parallel featurizer invocation.
    pub run_mode: RunMode,

    /// Worker threads used in parallel mode.
    pub max_workers: usize,
}

/// How the combiner invokes featurizers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
    /// One featurizer after another on the calling thread.
    #[default]
    Sequential,

    /// Featurizers run concurrently; results are merged in list order.
    Parallel,
}

/// Linguistic toolkit configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct ToolkitConfig {
    /// Word valence lexicon replacing the bundled one.
    pub sentiment_lexicon: Option<PathBuf>,

    /// Category dictionary (LIWC format) replacing the bundled one.
    pub category_dictionary: Option<PathBuf>,

    /// Deepest dependency tree walked before it is rejected.
    pub max_tree_depth: usize,

    /// Key naming for per-sentence sentiment features.
    pub sentence_keys: SentenceKeyStyle,
}

/// Key naming for per-sentence sentiment features.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SentenceKeyStyle {
    /// Bare sentence index: `0`, `1`, ...
    #[default]
    Positional,

    /// `sentiment_sentence_0`, `sentiment_sentence_1`, ...
    Namespaced,
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level.
    pub level: LogLevel,

    /// Log format.
    pub format: LogFormat,
}

/// Log level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    /// Error level.
    Error,

    /// Warning level.
    Warn,

    /// Info level.
    Info,

    /// Debug level.
    Debug,

    /// Trace level.
    Trace,
}

impl LogLevel {
    /// Directive string understood by tracing filters.
    pub fn as_str(&self) -> &'static str {
        match self {
            LogLevel::Error => "error",
            LogLevel::Warn => "warn",
            LogLevel::Info => "info",
            LogLevel::Debug => "debug",
            LogLevel::Trace => "trace",
        }
    }
}

/// Log format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// JSON format.
    Json,

    /// Text format.
    Text,
}

impl TextfeatConfig {
    /// Default location of the configuration file.
    ///
    /// `TEXTFEAT_CONFIG` takes precedence over the platform config directory.
    pub fn default_path() -> Result<PathBuf> {
        if let Ok(path) = std::env::var(CONFIG_ENV_VAR) {
            return Ok(PathBuf::from(path));
        }
        let dir = dirs::config_dir()
            .ok_or_else(|| Error::Config("Cannot find config directory".to_string()))?;
        Ok(dir.join("textfeat").join("config.toml"))
    }

    /// Load configuration from file.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| Error::FileSystem(format!("Failed to read config file: {}", e)))?;

        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Parse(format!("Failed to parse config: {}", e)))?;
        config.validate()?;
        debug!("Loaded configuration from {}", path.display());
        Ok(config)
    }

    /// Save configuration to file.
    pub fn save(&self, path: &Path) -> Result<()> {
        let content = self.to_toml()?;

        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        std::fs::write(path, content)
            .map_err(|e| Error::FileSystem(format!("Failed to write config file: {}", e)))?;
        debug!("Saved configuration to {}", path.display());
        Ok(())
    }

    /// Render configuration as TOML.
    pub fn to_toml(&self) -> Result<String> {
        toml::to_string_pretty(self).with_context("Failed to serialize config")
    }

    /// Check internal consistency.
    ///
    /// Featurizer names are checked against the registry separately, when
    /// the combiner is built.
    pub fn validate(&self) -> Result<()> {
        if self.featurizers.enabled.is_empty() {
            return Err(Error::validation("at least one featurizer must be enabled"));
        }

        let mut seen = HashSet::new();
        for name in &self.featurizers.enabled {
            if !seen.insert(name.as_str()) {
                return Err(Error::validation(format!(
                    "featurizer '{}' is enabled more than once",
                    name
                )));
            }
        }

        if self.toolkit.max_tree_depth == 0 {
            return Err(Error::validation("toolkit.max_tree_depth must be positive"));
        }
        if self.combiner.max_workers == 0 {
            return Err(Error::validation("combiner.max_workers must be positive"));
        }
        Ok(())
    }
}

impl Default for FeaturizerSelection {
    fn default() -> Self {
        Self {
            enabled: DEFAULT_FEATURIZERS.iter().map(|s| s.to_string()).collect(),
        }
    }
}

impl Default for CombinerConfig {
    fn default() -> Self {
        Self {
            collision_policy: CollisionPolicy::LastWriteWins,
            report_collisions: false,
            run_mode: RunMode::Sequential,
            max_workers: num_cpus::get(),
        }
    }
}

impl Default for ToolkitConfig {
    fn default() -> Self {
        Self {
            sentiment_lexicon: None,
            category_dictionary: None,
            max_tree_depth: DEFAULT_MAX_TREE_DEPTH,
            sentence_keys: SentenceKeyStyle::Positional,
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: LogLevel::Warn,
            format: LogFormat::Text,
        }
    }
}
