use std::fmt;

use super::BindingAttribute;
use crate::Error;

use Cardinality::{Many, Single};
use Direction::{Input, Output};
use ElementKind::{Document, Json, Text, Typed};

/// Whether a binding reads documents or writes them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Direction {
    Input,
    Output,
}

/// One document or a sequence of them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Cardinality {
    Single,
    Many,
}

/// What each bound element is exposed as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementKind {
    /// The service's own document representation.
    Document,
    /// An untyped JSON value.
    Json,
    /// A user type (de)serialized through serde.
    Typed,
    /// Raw JSON text.
    Text,
}

/// A binding parameter shape: direction, cardinality and element kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ParameterShape {
    pub direction: Direction,
    pub cardinality: Cardinality,
    pub element: ElementKind,
}

impl ParameterShape {
    pub const fn new(direction: Direction, cardinality: Cardinality, element: ElementKind) -> Self {
        Self {
            direction,
            cardinality,
            element,
        }
    }

    pub fn is_supported(&self) -> bool {
        SUPPORTED_SHAPES.contains(self)
    }

    /// Checks the shape is supported and that the attribute carries the
    /// lookup fields the shape needs (and none it can't use).
    pub fn validate(&self, parameter: &str, attribute: &BindingAttribute) -> Result<(), Error> {
        if !self.is_supported() {
            return Err(Error::UnsupportedShape {
                parameter: parameter.to_string(),
                shape: *self,
            });
        }

        let invalid = |reason: &str| -> Result<(), Error> {
            Err(Error::InvalidAttribute(format!("{parameter}: {reason}")))
        };

        match (self.direction, self.cardinality) {
            (Direction::Input, Cardinality::Single) if attribute.id().is_none() => {
                invalid("single-document input requires an id")
            }
            (Direction::Input, Cardinality::Single) if attribute.sql_query().is_some() => {
                invalid("single-document input cannot use a sql query")
            }
            (Direction::Input, Cardinality::Many) if attribute.id().is_some() => {
                invalid("collection input cannot use an id; use a sql query")
            }
            (Direction::Output, _) if attribute.id().is_some() || attribute.sql_query().is_some() => {
                invalid("output bindings take neither an id nor a sql query")
            }
            _ => Ok(()),
        }
    }
}

impl fmt::Display for ParameterShape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:?} {:?} of {:?}",
            self.direction, self.cardinality, self.element
        )
    }
}

/// Every parameter shape the binding layer accepts.
///
/// Text is write-only: reading hands out documents or typed values.
pub const SUPPORTED_SHAPES: &[ParameterShape] = &[
    ParameterShape::new(Input, Single, Document),
    ParameterShape::new(Input, Single, Json),
    ParameterShape::new(Input, Single, Typed),
    ParameterShape::new(Input, Many, Document),
    ParameterShape::new(Input, Many, Json),
    ParameterShape::new(Input, Many, Typed),
    ParameterShape::new(Output, Single, Document),
    ParameterShape::new(Output, Single, Json),
    ParameterShape::new(Output, Single, Typed),
    ParameterShape::new(Output, Single, Text),
    ParameterShape::new(Output, Many, Document),
    ParameterShape::new(Output, Many, Json),
    ParameterShape::new(Output, Many, Typed),
    ParameterShape::new(Output, Many, Text),
];

#[cfg(test)]
mod tests {
    use super::*;

    fn attribute() -> BindingAttribute {
        BindingAttribute::new("ItemDB", "ItemCollection")
    }

    #[test]
    fn test_text_input_unsupported() {
        for cardinality in [Single, Many] {
            let shape = ParameterShape::new(Input, cardinality, Text);
            assert!(!shape.is_supported());
            assert!(matches!(
                shape.validate("item", &attribute().with_id("1")),
                Err(Error::UnsupportedShape { .. })
            ));
        }
    }

    #[test]
    fn test_every_output_shape_accepts_plain_attribute() {
        for shape in SUPPORTED_SHAPES.iter().filter(|s| s.direction == Output) {
            assert!(shape.validate("out", &attribute()).is_ok(), "{shape}");
        }
    }

    #[test]
    fn test_single_input_requires_id() {
        let shape = ParameterShape::new(Input, Single, Typed);

        assert!(shape.validate("item", &attribute()).is_err());
        assert!(shape.validate("item", &attribute().with_id("42")).is_ok());
        assert!(shape
            .validate("item", &attribute().with_sql_query("SELECT * FROM c"))
            .is_err());
    }

    #[test]
    fn test_many_input_rejects_id() {
        let shape = ParameterShape::new(Input, Many, Json);

        assert!(shape.validate("items", &attribute()).is_ok());
        assert!(shape
            .validate("items", &attribute().with_sql_query("SELECT * FROM c"))
            .is_ok());
        assert!(shape.validate("items", &attribute().with_id("42")).is_err());
    }

    #[test]
    fn test_output_rejects_lookup_fields() {
        let shape = ParameterShape::new(Output, Many, Document);

        assert!(shape.validate("docs", &attribute().with_id("1")).is_err());
        assert!(shape
            .validate("docs", &attribute().with_sql_query("SELECT * FROM c"))
            .is_err());
    }

    #[test]
    fn test_display() {
        assert_eq!(
            ParameterShape::new(Output, Many, Text).to_string(),
            "Output Many of Text"
        );
    }
}
