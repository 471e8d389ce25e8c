use crate::config::ConfigError;
use maskarade_logger::LoggerError;
use maskarade_model::{FinalizationError, ModelError, UsageError};
use std::borrow::Cow;

/// Errors surfaced to host applications.
#[maskarade_derive::maskarade_error]
pub enum Error {
    #[error("{source}{}", format_context(.context))]
    Finalization { source: FinalizationError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Model { source: ModelError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Usage { source: UsageError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Config { source: ConfigError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Logger { source: LoggerError, context: Option<Cow<'static, str>> },
}
