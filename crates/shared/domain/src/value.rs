use serde::{Deserialize, Serialize};
use serde_json::Value;
use strum_macros::{Display, EnumIter, EnumString, IntoStaticStr};

/// Declared type of the value behind a reference.
///
/// Values come from an external source, so the constraint is advisory:
/// [`ValueType::matches`] decides whether a mismatch warning is due, nothing more.
#[derive(
    Debug,
    Clone,
    Copy,
    Default,
    PartialEq,
    Eq,
    Hash,
    Serialize,
    Deserialize,
    Display,
    EnumString,
    EnumIter,
    IntoStaticStr,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum ValueType {
    /// Accepts every value.
    #[default]
    Any,
    Null,
    Bool,
    /// Signed or unsigned integral numbers.
    Integer,
    /// Floating-point numbers only.
    Float,
    /// Any number.
    Number,
    String,
    Array,
    Object,
}

impl ValueType {
    /// Whether `value` conforms to this type.
    #[must_use]
    pub fn matches(self, value: &Value) -> bool {
        match (self, value) {
            (Self::Any, _)
            | (Self::Null, Value::Null)
            | (Self::Bool, Value::Bool(_))
            | (Self::Number, Value::Number(_))
            | (Self::String, Value::String(_))
            | (Self::Array, Value::Array(_))
            | (Self::Object, Value::Object(_)) => true,
            (Self::Integer, Value::Number(n)) => !n.is_f64(),
            (Self::Float, Value::Number(n)) => n.is_f64(),
            _ => false,
        }
    }

    /// The most specific type describing `value`.
    #[must_use]
    pub fn of(value: &Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(_) => Self::Bool,
            Value::Number(n) if n.is_f64() => Self::Float,
            Value::Number(_) => Self::Integer,
            Value::String(_) => Self::String,
            Value::Array(_) => Self::Array,
            Value::Object(_) => Self::Object,
        }
    }
}
