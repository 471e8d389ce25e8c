use maskarade_derive::maskarade_error;
use std::borrow::Cow;

#[maskarade_error]
pub enum DemoError {
    #[error("Decode error{}: {source}", format_context(.context))]
    Decode {
        #[source]
        source: std::num::ParseIntError,
        context: Option<Cow<'static, str>>,
    },

    #[error("Reference `{reference}` is not bound{}", format_context(.context))]
    Unbound { reference: String, context: Option<Cow<'static, str>> },

    #[error("Internal error{}: {message}", format_context(.context))]
    Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
}

fn parse(raw: &str) -> Result<u32, DemoError> {
    let value = raw.parse::<u32>().context("parsing sensor value")?;
    Ok(value)
}

fn main() {
    assert!(parse("42").is_ok());

    let err = parse("x").unwrap_err();
    assert!(err.to_string().contains("(parsing sensor value)"));

    let err: DemoError = "boom".into();
    assert!(matches!(err, DemoError::Internal { .. }));
}
