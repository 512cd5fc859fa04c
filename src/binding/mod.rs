//! Binding declarations: the attribute describing the target collection and
//! the parameter shapes a binding may take.

mod attribute;
mod shape;

pub use attribute::BindingAttribute;
pub use shape::{Cardinality, Direction, ElementKind, ParameterShape, SUPPORTED_SHAPES};

/// A validated binding: parameter name, shape and attribute snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BindingDeclaration {
    parameter: String,
    shape: ParameterShape,
    attribute: BindingAttribute,
}

impl BindingDeclaration {
    /// Validates `shape` against `attribute` and the supported shape table.
    pub fn new(
        parameter: impl Into<String>,
        shape: ParameterShape,
        attribute: BindingAttribute,
    ) -> Result<Self, crate::Error> {
        let parameter = parameter.into();
        attribute.validate()?;
        shape.validate(&parameter, &attribute)?;
        Ok(Self {
            parameter,
            shape,
            attribute,
        })
    }

    pub fn parameter(&self) -> &str {
        &self.parameter
    }

    pub fn shape(&self) -> ParameterShape {
        self.shape
    }

    pub fn attribute(&self) -> &BindingAttribute {
        &self.attribute
    }
}
