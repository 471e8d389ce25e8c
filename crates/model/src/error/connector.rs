use std::borrow::Cow;

/// Failures reported by a [`crate::ModelConnector`] implementation.
#[maskarade_derive::maskarade_error]
pub enum ConnectorError {
    /// The external source cannot be reached (closed, disconnected, shut down).
    #[error("Connector unavailable{}: {message}", format_context(.context))]
    Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },

    /// The external source has no value under this name.
    #[error("Unknown reference `{reference}`{}", format_context(.context))]
    UnknownReference { reference: String, context: Option<Cow<'static, str>> },

    #[error("Internal connector fault{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}
