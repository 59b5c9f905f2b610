use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use thiserror::Error;

use screenplay_engine::corrector::CorrectorConfig;
use screenplay_engine::counters::ChronometryConfig;
use screenplay_engine::reports::ReportQuery;
use screenplay_engine::template::{Template, TemplateError, TemplateLibrary};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {config_path}: {source}")]
    ConfigReadError {
        config_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config file at {config_path}: {source}")]
    ConfigParseError {
        config_path: PathBuf,
        source: toml::de::Error,
    },

    #[error("Invalid config at {config_path}: {reason}")]
    Invalid { config_path: PathBuf, reason: String },

    #[error("Failed to read template file at {template_path}: {source}")]
    TemplateReadError {
        template_path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to load template file at {template_path}: {source}")]
    TemplateError {
        template_path: PathBuf,
        source: TemplateError,
    },
}

fn default_template_name() -> String {
    "Default".to_string()
}

/// Project settings: which template to use and how to time and correct.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Config {
    /// Built-in template used when `template_path` is not set.
    #[serde(default = "default_template_name")]
    pub template: String,
    /// Template file; `~` and `$VARS` are expanded on load.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub template_path: Option<PathBuf>,
    #[serde(default)]
    pub chronometry: ChronometryConfig,
    #[serde(default)]
    pub corrector: CorrectorConfig,
    #[serde(default)]
    pub reports: ReportQuery,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            template: default_template_name(),
            template_path: None,
            chronometry: ChronometryConfig::default(),
            corrector: CorrectorConfig::default(),
            reports: ReportQuery::default(),
        }
    }
}

impl Config {
    pub fn load_from_path<P: AsRef<Path>>(config_path: P) -> Result<Option<Self>, ConfigError> {
        let config_path = config_path.as_ref();
        if !config_path.exists() {
            return Ok(None);
        }

        let content = std::fs::read_to_string(config_path).map_err(|source| {
            ConfigError::ConfigReadError {
                config_path: config_path.to_path_buf(),
                source,
            }
        })?;

        let mut config: Config =
            toml::from_str(&content).map_err(|source| ConfigError::ConfigParseError {
                config_path: config_path.to_path_buf(),
                source,
            })?;

        config
            .chronometry
            .validate()
            .map_err(|err| ConfigError::Invalid {
                config_path: config_path.to_path_buf(),
                reason: err.to_string(),
            })?;

        // Expand shell variables and tilde in the template path
        config.template_path = config
            .template_path
            .map(|path| Self::expand_path(&path).unwrap_or(path));

        log::debug!("Loaded config from {}", config_path.display());
        Ok(Some(config))
    }

    pub fn load() -> Result<Option<Self>, ConfigError> {
        let config_path = Self::config_path();
        Self::load_from_path(&config_path)
    }

    pub fn save_to_path<P: AsRef<Path>>(&self, config_path: P) -> anyhow::Result<()> {
        let config_path = config_path.as_ref();
        if let Some(parent) = config_path.parent() {
            std::fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        std::fs::write(config_path, content)?;
        Ok(())
    }

    pub fn save(&self) -> anyhow::Result<()> {
        let config_path = Self::config_path();
        self.save_to_path(&config_path)
    }

    pub fn config_path() -> PathBuf {
        let config_dir = shellexpand::tilde("~/.config/screenplay-engine");
        PathBuf::from(config_dir.as_ref()).join("config.toml")
    }

    /// The template file if one is configured, else the named built-in
    /// (falling back to "Default" for unknown names).
    pub fn load_template(&self) -> Result<Template, ConfigError> {
        let Some(template_path) = &self.template_path else {
            return Ok(TemplateLibrary::with_builtins().get_or_default(&self.template));
        };
        let bytes = std::fs::read(template_path).map_err(|source| ConfigError::TemplateReadError {
            template_path: template_path.clone(),
            source,
        })?;
        Template::load(&bytes).map_err(|source| ConfigError::TemplateError {
            template_path: template_path.clone(),
            source,
        })
    }

    fn expand_path(path: &Path) -> Option<PathBuf> {
        let path_str = path.to_string_lossy();
        match shellexpand::full(&path_str) {
            Ok(expanded) => Some(PathBuf::from(expanded.as_ref())),
            Err(_) => None,
        }
    }
}
