use serde::Deserialize;
use std::ops::{Deref, DerefMut};
use std::path::PathBuf;
use std::sync::Arc;

/// Top-level configuration of a host embedding the model layer.
#[derive(Default, Debug, Clone, Deserialize)]
#[serde(default)]
pub struct MaskaradeConfigInner {
    pub logging: LoggingConfig,
    pub factory: FactoryConfig,
}

/// Thin Arc-wrapped config for inexpensive cloning into subsystems.
#[derive(Default, Debug, Clone, Deserialize)]
pub struct MaskaradeConfig {
    #[serde(flatten, default)]
    inner: Arc<MaskaradeConfigInner>,
}

impl Deref for MaskaradeConfig {
    type Target = MaskaradeConfigInner;

    fn deref(&self) -> &Self::Target {
        &self.inner
    }
}

impl DerefMut for MaskaradeConfig {
    fn deref_mut(&mut self) -> &mut MaskaradeConfigInner {
        Arc::make_mut(&mut self.inner)
    }
}

/// Logging sink settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Logger name, also the prefix of rolling log files.
    pub name: String,
    /// Minimum level (`trace`, `debug`, `info`, `warn`, `error`, `off`).
    pub level: String,
    pub console: bool,
    /// Directory for rolling log files; `None` disables file output.
    pub path: Option<PathBuf>,
    pub json: bool,
    pub max_files: usize,
    /// Extra directives such as `maskarade_model=debug`.
    pub env_filter: Option<String>,
}

/// Model factory settings.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct FactoryConfig {
    /// Reject name templates referencing parameters that were not supplied.
    /// When `false`, such placeholders are kept verbatim.
    pub strict_placeholders: bool,
}

// --- Default ---

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            name: "maskarade".to_owned(),
            level: "info".to_owned(),
            console: true,
            path: None,
            json: false,
            max_files: 10,
            env_filter: None,
        }
    }
}

impl Default for FactoryConfig {
    fn default() -> Self {
        Self { strict_placeholders: true }
    }
}
