use maskarade_domain::config::LoggingConfig;
use maskarade_logger::{LevelFilter, Logger, LoggerError, LoggerErrorExt};

/// Initializes the global logger from the `logging` section of the configuration.
///
/// # Errors
/// [`LoggerError::Level`] for an unknown level name, otherwise whatever
/// [`maskarade_logger::LoggerBuilder::init`] reports.
pub fn init_logger(config: &LoggingConfig) -> Result<Logger, LoggerError> {
    let level = config
        .level
        .parse::<LevelFilter>()
        .context(format!("logging.level = `{}`", config.level))?;

    let builder = Logger::builder().name(config.name.as_str()).console(config.console).level(level);
    let builder = match &config.env_filter {
        Some(filter) => builder.env_filter(filter.as_str()),
        None => builder,
    };

    match &config.path {
        Some(path) => builder.path(path).max_files(config.max_files).json(config.json).init(),
        None => builder.init(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_levels_are_rejected_before_anything_is_installed() {
        let config = LoggingConfig { level: "chatty".to_owned(), ..LoggingConfig::default() };
        let err = init_logger(&config).unwrap_err();
        assert_eq!(err.kind(), "Level");
        assert!(err.to_string().contains("logging.level = `chatty`"));
    }
}
