use crate::error::{FinalizationError, TemplateError, UsageError};
use std::borrow::Cow;

/// Umbrella error of operations that combine declaration, templating and binding.
#[maskarade_derive::maskarade_error]
pub enum ModelError {
    #[error("{source}{}", format_context(.context))]
    Finalization { source: FinalizationError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Template { source: TemplateError, context: Option<Cow<'static, str>> },

    #[error("{source}{}", format_context(.context))]
    Usage { source: UsageError, context: Option<Cow<'static, str>> },
}

impl ModelError {
    /// The wrapped finalization error, if that is what failed.
    #[must_use]
    pub const fn as_finalization(&self) -> Option<&FinalizationError> {
        match self {
            Self::Finalization { source, .. } => Some(source),
            _ => None,
        }
    }
}
