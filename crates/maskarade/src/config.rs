use config::{Config, Environment, File};
use serde::de::DeserializeOwned;
use std::borrow::Cow;
use std::path::{Path, PathBuf};
use tracing::info;

const DEFAULT_CONFIG_FILE: &str = "maskarade";
const ENV_PREFIX: &str = "MASKARADE";

#[maskarade_derive::maskarade_error]
pub enum ConfigError {
    #[error("Config error{}: {source}", format_context(.context))]
    Config { source: config::ConfigError, context: Option<Cow<'static, str>> },
}

/// Loads a configuration file and overlays environment overrides.
///
/// 1. **Base file**: `path`, or `maskarade` in the working directory. The extension may be
///    omitted; every format the `config` crate knows is tried.
/// 2. **Environment**: variables prefixed with `MASKARADE__`. Nested keys use double
///    underscores (`MASKARADE__LOGGING__LEVEL=debug` maps to `logging.level`).
///
/// # Errors
/// * The file cannot be found or parsed.
/// * The merged settings do not fit `T`.
///
/// # Example
/// ```rust
/// use maskarade::config::load_config;
/// use maskarade::domain::config::MaskaradeConfig;
///
/// let cfg: MaskaradeConfig = load_config(Some("config/local")).unwrap_or_default();
/// assert!(cfg.factory.strict_placeholders);
/// ```
pub fn load_config<T>(path: Option<impl AsRef<Path>>) -> Result<T, ConfigError>
where
    T: DeserializeOwned,
{
    let effective_path =
        path.map_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE), |p| p.as_ref().to_path_buf());

    let builder = Config::builder()
        .add_source(File::from(effective_path.as_path()).required(true))
        .add_source(
            Environment::with_prefix(ENV_PREFIX).separator("__").convert_case(config::Case::Snake),
        );

    info!(path = %effective_path.display(), "Loading config");

    let config = builder
        .build()
        .context("Failed to build config")?
        .try_deserialize::<T>()
        .context("Failed to deserialize config")?;

    Ok(config)
}
