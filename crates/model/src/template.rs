//! Name templates for external references and factory-made model types.
//!
//! Syntax: `{key}` is replaced by the parameter `key`; `{{` and `}}` produce literal
//! braces. Positional placeholders (`{}`) and format specifications (`{id:03}`) are
//! rejected.

use crate::error::TemplateError;
use std::collections::BTreeMap;
use std::fmt::{self, Display};

/// Named substitution values for [`NameTemplate::render`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormatParams(BTreeMap<String, String>);

impl FormatParams {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a parameter, builder style.
    #[must_use]
    pub fn with(mut self, key: impl Into<String>, value: impl Display) -> Self {
        self.insert(key, value);
        self
    }

    pub fn insert(&mut self, key: impl Into<String>, value: impl Display) {
        self.0.insert(key.into(), value.to_string());
    }

    #[must_use]
    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Display> FromIterator<(K, V)> for FormatParams {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut params = Self::new();
        for (key, value) in iter {
            params.insert(key, value);
        }
        params
    }
}

/// What to do with a placeholder whose parameter was not supplied.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Placeholders {
    /// Fail with [`TemplateError::MissingParameter`].
    #[default]
    Strict,
    /// Keep `{key}` in the output.
    Lenient,
}

impl Placeholders {
    #[must_use]
    pub const fn from_strict(strict: bool) -> Self {
        if strict { Self::Strict } else { Self::Lenient }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment<'a> {
    Text(String),
    Key(&'a str),
}

/// A parsed name template.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NameTemplate<'a> {
    source: &'a str,
    segments: Vec<Segment<'a>>,
}

impl<'a> NameTemplate<'a> {
    /// Parses `source`.
    ///
    /// # Errors
    /// [`TemplateError::Malformed`] on an unclosed `{`, a lone `}`, an empty key or a
    /// format specification.
    pub fn parse(source: &'a str) -> Result<Self, TemplateError> {
        let mut segments = Vec::new();
        let mut text = String::new();
        let mut chars = source.char_indices().peekable();

        while let Some((position, ch)) = chars.next() {
            match ch {
                '{' if chars.peek().is_some_and(|&(_, next)| next == '{') => {
                    chars.next();
                    text.push('{');
                },
                '}' if chars.peek().is_some_and(|&(_, next)| next == '}') => {
                    chars.next();
                    text.push('}');
                },
                '{' => {
                    let start = position + 1;
                    let Some(len) = source[start..].find('}') else {
                        return Err(malformed(source, position, "unclosed '{'"));
                    };
                    let key = &source[start..start + len];
                    validate_key(source, position, key)?;
                    if !text.is_empty() {
                        segments.push(Segment::Text(std::mem::take(&mut text)));
                    }
                    segments.push(Segment::Key(key));
                    while chars.peek().is_some_and(|&(i, _)| i <= start + len) {
                        chars.next();
                    }
                },
                '}' => return Err(malformed(source, position, "single '}' encountered")),
                other => text.push(other),
            }
        }

        if !text.is_empty() {
            segments.push(Segment::Text(text));
        }

        Ok(Self { source, segments })
    }

    #[must_use]
    pub const fn source(&self) -> &'a str {
        self.source
    }

    /// Placeholder keys in order of appearance.
    pub fn keys(&self) -> impl Iterator<Item = &'a str> + '_ {
        self.segments.iter().filter_map(|segment| match segment {
            Segment::Key(key) => Some(*key),
            Segment::Text(_) => None,
        })
    }

    /// Substitutes `params` into the template.
    ///
    /// # Errors
    /// [`TemplateError::MissingParameter`] in [`Placeholders::Strict`] mode when a key
    /// has no parameter.
    pub fn render(&self, params: &FormatParams, mode: Placeholders) -> Result<String, TemplateError> {
        let mut out = String::with_capacity(self.source.len());
        for segment in &self.segments {
            match segment {
                Segment::Text(text) => out.push_str(text),
                Segment::Key(key) => match (params.get(key), mode) {
                    (Some(value), _) => out.push_str(value),
                    (None, Placeholders::Lenient) => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    },
                    (None, Placeholders::Strict) => {
                        return Err(TemplateError::MissingParameter {
                            template: self.source.to_owned(),
                            key: (*key).to_owned(),
                            context: None,
                        });
                    },
                },
            }
        }
        Ok(out)
    }
}

impl Display for NameTemplate<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.source)
    }
}

/// Parses and renders `template` in one step.
///
/// # Errors
/// See [`NameTemplate::parse`] and [`NameTemplate::render`].
pub fn render(template: &str, params: &FormatParams, mode: Placeholders) -> Result<String, TemplateError> {
    NameTemplate::parse(template)?.render(params, mode)
}

fn validate_key(source: &str, position: usize, key: &str) -> Result<(), TemplateError> {
    if key.trim().is_empty() {
        return Err(malformed(source, position, "positional placeholders are not supported"));
    }
    if key.contains('{') {
        return Err(malformed(source, position, "nested '{' inside a placeholder"));
    }
    if key.contains([':', '!']) {
        return Err(malformed(source, position, "format specifications are not supported"));
    }
    Ok(())
}

fn malformed(source: &str, position: usize, message: &'static str) -> TemplateError {
    TemplateError::Malformed {
        template: source.to_owned(),
        position,
        message: message.into(),
        context: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn renders_named_placeholders() {
        let params = FormatParams::new().with("site", "north").with("id", 7);
        let name = render("plant.{site}.boiler-{id}.temp", &params, Placeholders::Strict).unwrap();
        assert_eq!(name, "plant.north.boiler-7.temp");
    }

    #[test]
    fn escaped_braces_are_literal() {
        let name = render("{{raw}}-{id}", &FormatParams::new().with("id", 1), Placeholders::Strict);
        assert_eq!(name.unwrap(), "{raw}-1");
    }

    #[test]
    fn missing_parameter_depends_on_mode() {
        let params = FormatParams::new();
        let err = render("dev-{id}", &params, Placeholders::Strict).unwrap_err();
        assert!(matches!(err, TemplateError::MissingParameter { ref key, .. } if key == "id"));

        let kept = render("dev-{id}", &params, Placeholders::Lenient).unwrap();
        assert_eq!(kept, "dev-{id}");
    }

    #[test]
    fn malformed_templates_are_rejected() {
        for (source, position) in [("dev-{id", 4), ("dev-}", 4), ("dev-{}", 4), ("dev-{id:03}", 4)] {
            match NameTemplate::parse(source) {
                Err(TemplateError::Malformed { position: at, .. }) => assert_eq!(at, position, "{source}"),
                other => panic!("expected malformed error for {source}, got {other:?}"),
            }
        }
    }

    #[test]
    fn keys_are_listed_in_order() {
        let template = NameTemplate::parse("{site}.{id}.{site}").unwrap();
        assert_eq!(template.keys().collect::<Vec<_>>(), ["site", "id", "site"]);
        assert_eq!(template.to_string(), "{site}.{id}.{site}");
    }

    #[test]
    fn params_collect_from_pairs() {
        let params: FormatParams = [("id", 3), ("zone", 12)].into_iter().collect();
        assert_eq!(params.get("zone"), Some("12"));
        assert_eq!(params.len(), 2);
    }

    proptest! {
        #[test]
        fn substituted_value_appears_verbatim(value in "[a-zA-Z0-9_.-]{1,16}") {
            let params = FormatParams::new().with("id", &value);
            let name = render("dev-{id}.temp", &params, Placeholders::Strict).unwrap();
            prop_assert_eq!(name, format!("dev-{value}.temp"));
        }
    }
}
