use crate::error::ConnectorError;
use std::borrow::Cow;

/// A call made in a state that does not allow it. Fatal to the call only.
#[maskarade_derive::maskarade_error]
pub enum UsageError {
    /// `read`/`write`/`emit` on a reference without a connector.
    #[error("A connector is required to operate on `{reference}` model reference{}", format_context(.context))]
    Unbound { reference: String, context: Option<Cow<'static, str>> },

    /// Binding a model type that never passed finalization.
    #[error("Cannot bind model `{model}` if it is not marked as final{}", format_context(.context))]
    NotFinal { model: String, context: Option<Cow<'static, str>> },

    #[error("Connector failure{}: {source}", format_context(.context))]
    Connector { source: ConnectorError, context: Option<Cow<'static, str>> },

    #[error("Value decoding failure{}: {source}", format_context(.context))]
    Decode { source: serde_json::Error, context: Option<Cow<'static, str>> },
}
