use std::borrow::Cow;

/// A name template that cannot be rendered.
#[maskarade_derive::maskarade_error]
pub enum TemplateError {
    #[error("Template `{template}` references unknown parameter `{key}`{}", format_context(.context))]
    MissingParameter { template: String, key: String, context: Option<Cow<'static, str>> },

    #[error("Malformed template `{template}` at byte {position}{}: {message}", format_context(.context))]
    Malformed {
        template: String,
        position: usize,
        message: Cow<'static, str>,
        context: Option<Cow<'static, str>>,
    },
}
