//! Parameter declarations and their resolved descriptors.

use fnwrap_primitives::{NativeType, SchemaType};
use serde_json::Value;

/// One documented input of a tool.
#[derive(Clone, Debug, PartialEq)]
pub struct ParameterDescriptor {
    name: String,
    schema_type: SchemaType,
    enum_values: Option<Vec<Value>>,
    description: Option<String>,
}

impl ParameterDescriptor {
    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the schema type tag.
    #[must_use]
    pub const fn schema_type(&self) -> SchemaType {
        self.schema_type
    }

    /// Returns the allowed values, if the parameter was declared as a list.
    #[must_use]
    pub fn enum_values(&self) -> Option<&[Value]> {
        self.enum_values.as_deref()
    }

    /// Returns the attached description.
    #[must_use]
    pub fn description(&self) -> Option<&str> {
        self.description.as_deref()
    }

    pub(crate) fn attach_description(&mut self, description: &str) {
        self.description = Some(description.to_owned());
    }
}

/// How a parameter was declared.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum DeclaredKind {
    Native(NativeType),
    Enum(Vec<Value>),
}

/// A parameter as supplied to the builder, before resolution.
#[derive(Clone, Debug, PartialEq)]
pub(crate) struct Declaration {
    pub(crate) name: String,
    pub(crate) kind: DeclaredKind,
    pub(crate) description: String,
}

impl Declaration {
    /// Resolves the type tag. Empty enumerations resolve to nothing and the
    /// parameter is left out of the descriptor.
    pub(crate) fn resolve(&self) -> Option<ParameterDescriptor> {
        let (schema_type, enum_values) = match &self.kind {
            DeclaredKind::Enum(values) if values.is_empty() => return None,
            DeclaredKind::Enum(values) => (SchemaType::Array, Some(values.clone())),
            DeclaredKind::Native(native) => (native.schema_type(), None),
        };

        Some(ParameterDescriptor {
            name: self.name.clone(),
            schema_type,
            enum_values,
            description: None,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn declaration(kind: DeclaredKind) -> Declaration {
        Declaration {
            name: "unit".into(),
            kind,
            description: "Temperature unit".into(),
        }
    }

    #[test]
    fn enum_declarations_resolve_to_array() {
        let resolved = declaration(DeclaredKind::Enum(vec![
            json!("celsius"),
            json!("fahrenheit"),
        ]))
        .resolve()
        .unwrap();

        assert_eq!(resolved.schema_type(), SchemaType::Array);
        assert_eq!(
            resolved.enum_values(),
            Some(&[json!("celsius"), json!("fahrenheit")][..])
        );
        assert_eq!(resolved.description(), None);
    }

    #[test]
    fn empty_enum_is_dropped() {
        assert!(declaration(DeclaredKind::Enum(Vec::new())).resolve().is_none());
    }

    #[test]
    fn native_declarations_use_type_table() {
        let resolved = declaration(DeclaredKind::Native(NativeType::Float))
            .resolve()
            .unwrap();
        assert_eq!(resolved.schema_type(), SchemaType::Number);
        assert!(resolved.enum_values().is_none());
    }
}
