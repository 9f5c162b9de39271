//! Configuration for a Mirage model session, plus tracing setup.

#![forbid(unsafe_code)]

use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

/// The universal root reference type of the modelled language.
pub const DEFAULT_ROOT_TYPE: &str = "java.lang.Object";

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse toml config: {0}")]
    Toml(String),
    #[error("invalid config: {0}")]
    Invalid(String),
}

impl From<toml::de::Error> for ConfigError {
    fn from(err: toml::de::Error) -> Self {
        // Keep the message without the source snippet.
        ConfigError::Toml(err.message().to_string())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MirageConfig {
    #[serde(default)]
    pub model: ModelConfig,
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl MirageConfig {
    pub fn from_toml_str(text: &str) -> Result<Self, ConfigError> {
        let config: MirageConfig = toml::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a config file from TOML.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let text = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&text)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let root = self.model.root_type.trim();
        if root.is_empty() {
            return Err(ConfigError::Invalid("model.root_type must not be empty".to_string()));
        }
        if let Some(name) = self.model.preload.iter().find(|name| name.trim().is_empty()) {
            return Err(ConfigError::Invalid(format!(
                "model.preload contains a blank entry: {name:?}"
            )));
        }
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ModelConfig {
    /// Qualified name of the universal root reference type.
    #[serde(default = "ModelConfig::default_root_type")]
    pub root_type: String,

    /// Retry `a.b.Outer.Inner` as `a.b.Outer$Inner` when a qualified-name lookup misses.
    #[serde(default = "ModelConfig::default_nested_binary_fallback")]
    pub nested_binary_fallback: bool,

    /// Types materialized eagerly when a context is created.
    #[serde(default)]
    pub preload: Vec<String>,
}

impl ModelConfig {
    fn default_root_type() -> String {
        DEFAULT_ROOT_TYPE.to_owned()
    }

    fn default_nested_binary_fallback() -> bool {
        true
    }
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            root_type: Self::default_root_type(),
            nested_binary_fallback: Self::default_nested_binary_fallback(),
            preload: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LoggingConfig {
    /// A simple level (`info`, `debug`, ...) or a full `EnvFilter` directive string.
    #[serde(default = "LoggingConfig::default_level")]
    pub level: String,

    /// Emit logs in JSON format.
    #[serde(default)]
    pub json: bool,
}

impl LoggingConfig {
    fn default_level() -> String {
        "info".to_owned()
    }

    pub(crate) fn normalize_level_directives(input: &str) -> String {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return Self::default_level();
        }

        match trimmed.to_ascii_lowercase().as_str() {
            "trace" => "trace".to_owned(),
            "debug" => "debug".to_owned(),
            "info" => "info".to_owned(),
            "warn" | "warning" => "warn".to_owned(),
            "error" => "error".to_owned(),
            _ => trimmed.to_owned(),
        }
    }

    /// The effective filter. `RUST_LOG`, when set, is merged after the configured directives.
    pub fn env_filter(&self) -> tracing_subscriber::EnvFilter {
        let config_directives = Self::normalize_level_directives(&self.level);
        let fallback = || {
            tracing_subscriber::EnvFilter::try_new(&config_directives).unwrap_or_else(|_| {
                tracing_subscriber::EnvFilter::default()
                    .add_directive(tracing_subscriber::filter::LevelFilter::INFO.into())
            })
        };

        let env_directives = std::env::var("RUST_LOG")
            .ok()
            .map(|value| value.trim().to_owned())
            .filter(|value| !value.is_empty());

        match env_directives {
            Some(env_directives) => {
                tracing_subscriber::EnvFilter::try_new(format!("{config_directives},{env_directives}"))
                    .or_else(|_| tracing_subscriber::EnvFilter::try_new(env_directives))
                    .unwrap_or_else(|_| fallback())
            }
            None => fallback(),
        }
    }
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: Self::default_level(),
            json: false,
        }
    }
}

static TRACING_INSTALLED: OnceLock<bool> = OnceLock::new();

/// Install the global tracing subscriber (stderr, optionally JSON).
///
/// Returns `true` only for the call that installed it; later calls are no-ops.
pub fn init_tracing(config: &LoggingConfig) -> bool {
    use tracing_subscriber::layer::SubscriberExt;
    use tracing_subscriber::Layer;

    let mut installed_now = false;
    TRACING_INSTALLED.get_or_init(|| {
        let layer = if config.json {
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        } else {
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(false)
                .boxed()
        };
        let subscriber = tracing_subscriber::registry()
            .with(config.env_filter())
            .with(layer);
        installed_now = tracing::subscriber::set_global_default(subscriber).is_ok();
        if installed_now {
            tracing::debug!(target: "mirage.config", level = %config.level, "tracing initialized");
        }
        installed_now
    });
    installed_now
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn level_directives_are_normalized() {
        assert_eq!(LoggingConfig::normalize_level_directives(" WARNING "), "warn");
        assert_eq!(LoggingConfig::normalize_level_directives(""), "info");
        assert_eq!(
            LoggingConfig::normalize_level_directives("mirage.types=trace"),
            "mirage.types=trace"
        );
    }

    #[test]
    fn debug_filter_enables_debug_events() {
        use tracing_subscriber::layer::SubscriberExt;

        let config = LoggingConfig {
            level: "debug".to_string(),
            json: false,
        };
        let subscriber = tracing_subscriber::registry().with(config.env_filter());
        tracing::subscriber::with_default(subscriber, || {
            assert!(tracing::enabled!(tracing::Level::DEBUG));
            assert!(!tracing::enabled!(tracing::Level::TRACE));
        });
    }
}
