#![allow(unreachable_pub)]
#![allow(clippy::needless_pass_by_value)]

//! # Macros
//!
//! Procedural macros shared by the Maskarade crates.
//!
//! ## Usage
//! ```toml
//! [dependencies]
//! maskarade-derive.workspace = true
//! thiserror.workspace = true
//! ```
//!
//! Examples below are `ignore`d because a proc-macro crate cannot use its own macros;
//! the `tests/ui` cases compile them for real.

mod macros;

use proc_macro::TokenStream;
use syn::{DeriveInput, parse_macro_input};

/// Attribute macro for declaring the error enums of the model layer.
///
/// # Features
///
/// * **Automatic Derives**: Injects `#[derive(Debug, thiserror::Error)]` unless already present.
/// * **Context Support**: Generates a companion `<Name>Ext` trait that adds `.context()`
///   to any `Result` that can be converted into this error type.
/// * **Standard Conversions**: Implements `From<T>` for variants holding a `source` field
///   (or a field marked `#[source]`/`#[from]`), so `?` lifts upstream errors.
/// * **Internal Fallback**: `From<&'static str>` and `From<String>` when an `Internal`
///   variant exists.
/// * **Kind**: `fn kind(&self) -> &'static str` returning the variant name, handy as a
///   structured `tracing` field.
///
/// # Requirements
///
/// 1. Applied to an **enum** with named-field variants only.
/// 2. A `context` field, when present, must be `Option<Cow<'static, str>>`.
/// 3. Variants with a source must also carry a `context` field.
///
/// # Example
///
/// ```rust,ignore
/// use maskarade_derive::maskarade_error;
/// use std::borrow::Cow;
///
/// #[maskarade_error]
/// pub enum ConnectorError {
///     #[error("Connector unavailable{}: {message}", format_context(.context))]
///     Unavailable { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
///
///     #[error("Internal connector fault{}: {message}", format_context(.context))]
///     Internal { message: Cow<'static, str>, context: Option<Cow<'static, str>> },
/// }
///
/// fn fetch() -> Result<(), ConnectorError> {
///     Err("socket closed".into())
/// }
///
/// let err = fetch().context("reading `boiler.temperature`").unwrap_err();
/// assert_eq!(err.kind(), "Internal");
/// ```
#[proc_macro_attribute]
pub fn maskarade_error(_args: TokenStream, item: TokenStream) -> TokenStream {
    let input = parse_macro_input!(item as DeriveInput);
    macros::error::expand(input).into()
}
