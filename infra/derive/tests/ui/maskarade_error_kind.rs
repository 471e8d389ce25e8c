use maskarade_derive::maskarade_error;
use std::borrow::Cow;

#[maskarade_error]
pub enum LookupError {
    #[error("Reference `{reference}` not found{}", format_context(.context))]
    NotFound { reference: String, context: Option<Cow<'static, str>> },

    #[error("Registry is sealed")]
    Sealed {},
}

fn lookup(reference: &str) -> Result<(), LookupError> {
    Err(LookupError::NotFound { reference: reference.to_owned(), context: None })
}

fn main() {
    let err = lookup("plant.pump").context("resolving binding").unwrap_err();
    assert_eq!(err.kind(), "NotFound");
    assert_eq!(err.to_string(), "Reference `plant.pump` not found (resolving binding)");
    assert_eq!(LookupError::Sealed {}.kind(), "Sealed");
}
