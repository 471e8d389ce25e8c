use std::borrow::Cow;
use std::fmt;

/// A field declared by more than one model of an inheritance chain.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RepeatedField {
    pub field: String,
    /// Declaring models, most-ancestral first.
    pub models: Vec<String>,
}

impl fmt::Display for RepeatedField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} @ [{}]", self.field, self.models.join(", "))
    }
}

/// An external name that cannot be registered because it is already taken.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReferenceConflict {
    pub field: String,
    pub reference: String,
    /// Model currently owning `reference`.
    pub owner: String,
}

impl fmt::Display for ReferenceConflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (`{}`) @ {}", self.field, self.reference, self.owner)
    }
}

/// A model type failed to become final. The type stays draft and cannot be bound.
#[maskarade_derive::maskarade_error]
pub enum FinalizationError {
    #[error("Some fields of `{model}` are declared multiple times{}:{}", format_context(.context), bullets(.fields))]
    DuplicateDeclaration {
        model: String,
        fields: Vec<RepeatedField>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Some fields of `{model}` are not initialized{}:{}", format_context(.context), bullets(.fields))]
    MissingImplementation {
        model: String,
        fields: Vec<String>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Some attributes of `{model}` are referenced multiple times{}:{}", format_context(.context), bullets(.conflicts))]
    DuplicateReference {
        model: String,
        conflicts: Vec<ReferenceConflict>,
        context: Option<Cow<'static, str>>,
    },

    #[error("Model `{model}` is already final{}", format_context(.context))]
    AlreadyFinal { model: String, context: Option<Cow<'static, str>> },
}

impl FinalizationError {
    /// Name of the model type that failed.
    #[must_use]
    pub fn model(&self) -> &str {
        match self {
            Self::DuplicateDeclaration { model, .. }
            | Self::MissingImplementation { model, .. }
            | Self::DuplicateReference { model, .. }
            | Self::AlreadyFinal { model, .. } => model,
        }
    }
}

fn bullets<T: fmt::Display>(items: &[T]) -> String {
    items.iter().map(|item| format!("\n\t-> {item}")).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn messages_list_every_item() {
        let err = FinalizationError::DuplicateReference {
            model: "Boiler".to_owned(),
            conflicts: vec![
                ReferenceConflict {
                    field: "temp".to_owned(),
                    reference: "boiler.temp".to_owned(),
                    owner: "Heater".to_owned(),
                },
                ReferenceConflict {
                    field: "flow".to_owned(),
                    reference: "boiler.flow".to_owned(),
                    owner: "Boiler".to_owned(),
                },
            ],
            context: None,
        };

        let text = err.to_string();
        assert!(text.starts_with("Some attributes of `Boiler` are referenced multiple times:"));
        assert!(text.contains("\n\t-> temp (`boiler.temp`) @ Heater"));
        assert!(text.contains("\n\t-> flow (`boiler.flow`) @ Boiler"));
        assert_eq!(err.model(), "Boiler");
        assert_eq!(err.kind(), "DuplicateReference");
    }

    #[test]
    fn context_is_rendered_before_the_list() {
        let err: Result<(), _> = Err(FinalizationError::MissingImplementation {
            model: "Pump".to_owned(),
            fields: vec!["speed".to_owned()],
            context: None,
        });

        let text = err.context("declaring plant models").unwrap_err().to_string();
        assert_eq!(
            text,
            "Some fields of `Pump` are not initialized (declaring plant models):\n\t-> speed"
        );
    }
}
