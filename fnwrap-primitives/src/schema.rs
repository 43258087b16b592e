//! Schema type tags and the native-type table.

use std::collections::{BTreeMap, HashMap};
use std::fmt;

use serde::{Deserialize, Serialize};

/// Type tag understood by function-calling models.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SchemaType {
    /// Whole numbers.
    Integer,
    /// Floating point numbers.
    Number,
    /// Text.
    String,
    /// `true` / `false`.
    Boolean,
    /// Sequences, and parameters restricted to an enumerated list.
    Array,
    /// Key/value maps.
    Object,
    /// The null value.
    Null,
}

impl SchemaType {
    /// Returns the wire tag.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Integer => "integer",
            Self::Number => "number",
            Self::String => "string",
            Self::Boolean => "boolean",
            Self::Array => "array",
            Self::Object => "object",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for SchemaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Declared native type of a parameter.
///
/// Anything that is not one of the known kinds is carried as
/// [`NativeType::Other`] and described to the model as a string. The fallback
/// is part of the contract: callers may declare domain types (dates, paths,
/// identifiers) that the model should pass as text.
#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub enum NativeType {
    /// Signed or unsigned integer.
    Integer,
    /// Floating point number.
    Float,
    /// Text.
    Str,
    /// Boolean flag.
    Bool,
    /// Homogeneous list.
    List,
    /// Fixed-size tuple.
    Tuple,
    /// Map / dictionary.
    Dict,
    /// The unit / none value.
    None,
    /// Any other named type.
    Other(String),
}

impl NativeType {
    /// Resolves a type name as written in keyword manifests.
    #[must_use]
    pub fn from_type_name(name: &str) -> Self {
        match name.trim() {
            "int" | "integer" => Self::Integer,
            "float" | "number" => Self::Float,
            "str" | "string" => Self::Str,
            "bool" | "boolean" => Self::Bool,
            "list" | "array" => Self::List,
            "tuple" => Self::Tuple,
            "dict" | "object" => Self::Dict,
            "None" | "none" | "null" => Self::None,
            other => Self::Other(other.to_owned()),
        }
    }

    /// Maps the native type onto its schema tag.
    #[must_use]
    pub const fn schema_type(&self) -> SchemaType {
        match self {
            Self::Integer => SchemaType::Integer,
            Self::Float => SchemaType::Number,
            Self::Str | Self::Other(_) => SchemaType::String,
            Self::Bool => SchemaType::Boolean,
            Self::List | Self::Tuple => SchemaType::Array,
            Self::Dict => SchemaType::Object,
            Self::None => SchemaType::Null,
        }
    }
}

/// Rust types with a known native-type mapping.
pub trait JsonSchemaType {
    /// Native type used when describing the parameter.
    fn native_type() -> NativeType;
}

macro_rules! native_type_for {
    ($kind:expr => $($ty:ty),+ $(,)?) => {
        $(
            impl JsonSchemaType for $ty {
                fn native_type() -> NativeType {
                    $kind
                }
            }
        )+
    };
}

native_type_for!(NativeType::Integer => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize);
native_type_for!(NativeType::Float => f32, f64);
native_type_for!(NativeType::Str => String, &str, char);
native_type_for!(NativeType::Bool => bool);
native_type_for!(NativeType::None => ());
native_type_for!(NativeType::Dict => serde_json::Map<String, serde_json::Value>);

impl<T> JsonSchemaType for Vec<T> {
    fn native_type() -> NativeType {
        NativeType::List
    }
}

impl<T> JsonSchemaType for &[T] {
    fn native_type() -> NativeType {
        NativeType::List
    }
}

impl<T, const N: usize> JsonSchemaType for [T; N] {
    fn native_type() -> NativeType {
        NativeType::Tuple
    }
}

impl<K, V, S> JsonSchemaType for HashMap<K, V, S> {
    fn native_type() -> NativeType {
        NativeType::Dict
    }
}

impl<K, V> JsonSchemaType for BTreeMap<K, V> {
    fn native_type() -> NativeType {
        NativeType::Dict
    }
}

impl<T: JsonSchemaType> JsonSchemaType for Option<T> {
    fn native_type() -> NativeType {
        T::native_type()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn type_names_follow_table() {
        assert_eq!(NativeType::from_type_name("int").schema_type(), SchemaType::Integer);
        assert_eq!(NativeType::from_type_name("float").schema_type(), SchemaType::Number);
        assert_eq!(NativeType::from_type_name("tuple").schema_type(), SchemaType::Array);
        assert_eq!(NativeType::from_type_name("dict").schema_type(), SchemaType::Object);
        assert_eq!(NativeType::from_type_name("None").schema_type(), SchemaType::Null);
    }

    #[test]
    fn unknown_types_fall_back_to_string() {
        let native = NativeType::from_type_name("datetime");
        assert_eq!(native, NativeType::Other("datetime".into()));
        assert_eq!(native.schema_type(), SchemaType::String);
    }

    #[test]
    fn rust_types_map_to_schema_tags() {
        assert_eq!(u32::native_type().schema_type(), SchemaType::Integer);
        assert_eq!(f64::native_type().schema_type(), SchemaType::Number);
        assert_eq!(String::native_type().schema_type(), SchemaType::String);
        assert_eq!(<Vec<String>>::native_type().schema_type(), SchemaType::Array);
        assert_eq!(
            <HashMap<String, i64>>::native_type().schema_type(),
            SchemaType::Object
        );
        assert_eq!(<Option<bool>>::native_type().schema_type(), SchemaType::Boolean);
    }

    #[test]
    fn schema_type_serializes_lowercase() {
        let json = serde_json::to_string(&SchemaType::Boolean).unwrap();
        assert_eq!(json, "\"boolean\"");
    }
}
