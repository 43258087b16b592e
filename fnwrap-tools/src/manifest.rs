//! Keyword-style tool manifests.
//!
//! A manifest is a flat JSON object: `purpose`, optional `required`, the
//! `function` to bind, and one key per parameter. A parameter key maps to a
//! native type name (`"str"`, `"int"`, ...) or to a list of allowed values;
//! its description lives under the same key with [`DESCRIPTION_SUFFIX`]
//! appended.
//!
//! ```json
//! {
//!   "purpose": "Get the current weather in a given location.",
//!   "required": ["location"],
//!   "function": "get_current_weather",
//!   "location": "str",
//!   "location_description": "The city and state, e.g. San Francisco, CA",
//!   "unit": ["celsius", "fahrenheit"],
//!   "unit_description": "The unit of temperature"
//! }
//! ```

use std::collections::BTreeSet;

use fnwrap_primitives::{Error, NativeType, Result};
use fnwrap_registry::{FunctionRegistry, NativeFunction};
use serde::Deserialize;
use serde_json::{Map, Value};

use crate::{ToolBuilder, ToolDescriptor};

/// Key suffix marking a parameter description.
pub const DESCRIPTION_SUFFIX: &str = "_description";

/// Loosely-typed construction arguments for a [`ToolDescriptor`].
#[derive(Clone, Debug, PartialEq, Deserialize)]
pub struct ToolManifest {
    purpose: String,
    #[serde(default)]
    required: Option<Vec<String>>,
    #[serde(default)]
    function: Option<Value>,
    #[serde(flatten)]
    arguments: Map<String, Value>,
}

impl ToolManifest {
    /// Decodes a manifest from a JSON value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the value is not an object with a
    /// string `purpose`, or if `required` is neither absent, `null`, nor a
    /// list of strings.
    pub fn from_value(value: Value) -> Result<Self> {
        serde_json::from_value(value)
            .map_err(|err| Error::validation(format!("invalid tool manifest: {err}")))
    }

    /// Decodes a manifest from JSON text.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Validation`] if the text is not a valid manifest.
    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|err| Error::validation(format!("invalid tool manifest: {err}")))
    }

    /// Resolves the manifest into a typed builder, binding `function` against
    /// the supplied implementations.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] when no `function` is given,
    /// [`Error::TypeKind`] when it does not name one of `functions`, and
    /// [`Error::Validation`] when a parameter and its description do not pair
    /// up or have unusable values.
    pub fn into_builder(self, functions: &[NativeFunction]) -> Result<ToolBuilder> {
        let function = resolve_function(self.function.as_ref(), functions)?;

        let mut described = BTreeSet::new();
        let mut declared = BTreeSet::new();
        for key in self.arguments.keys() {
            match key.strip_suffix(DESCRIPTION_SUFFIX) {
                Some(param) => described.insert(param),
                None => declared.insert(key.as_str()),
            };
        }

        if let Some(orphan) = described.difference(&declared).next() {
            return Err(Error::validation(format!(
                "description provided for `{orphan}`, but `{orphan}` parameter is not present"
            )));
        }
        if let Some(undocumented) = declared.difference(&described).next() {
            return Err(Error::validation(format!(
                "every declared parameter must have a description; `{undocumented}` has none"
            )));
        }

        let mut builder = ToolDescriptor::builder(self.purpose)
            .function(function)
            .required(self.required.unwrap_or_default());

        for name in declared {
            let description_key = format!("{name}{DESCRIPTION_SUFFIX}");
            let description = match self.arguments.get(&description_key) {
                Some(Value::String(description)) => description.clone(),
                _ => {
                    return Err(Error::validation(format!(
                        "`{description_key}` must be a string"
                    )));
                }
            };

            builder = match &self.arguments[name] {
                Value::String(type_name) => {
                    builder.param_of(name, NativeType::from_type_name(type_name), description)
                }
                Value::Array(values) => builder.enum_param(name, values.clone(), description),
                other => {
                    return Err(Error::validation(format!(
                        "parameter `{name}` must be a type name or a list of values, found {other}"
                    )));
                }
            };
        }

        Ok(builder)
    }

    /// Resolves the manifest and builds the descriptor, registering the bound
    /// function in `registry`.
    ///
    /// # Errors
    ///
    /// See [`ToolManifest::into_builder`] and [`ToolBuilder::build`].
    pub fn build(
        self,
        functions: &[NativeFunction],
        registry: &FunctionRegistry,
    ) -> Result<ToolDescriptor> {
        self.into_builder(functions)?.build(registry)
    }
}

fn resolve_function(
    reference: Option<&Value>,
    functions: &[NativeFunction],
) -> Result<NativeFunction> {
    match reference {
        None | Some(Value::Null) => Err(Error::missing_argument("function")),
        Some(Value::String(name)) => functions
            .iter()
            .find(|function| function.name() == name)
            .cloned()
            .ok_or_else(|| {
                Error::type_kind("function", format!("`{name}` is not a callable function"))
            }),
        Some(other) => Err(Error::type_kind(
            "function",
            format!("expected the name of a callable function, found {other}"),
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnwrap_primitives::SchemaType;
    use fnwrap_registry::Signature;
    use serde_json::json;

    fn functions() -> Vec<NativeFunction> {
        vec![NativeFunction::new(
            "get_current_weather",
            Signature::new()
                .required("location")
                .optional("unit", "fahrenheit"),
            |args| Ok(json!(args.str("unit")?)),
        )]
    }

    fn manifest(value: Value) -> ToolManifest {
        ToolManifest::from_value(value).unwrap()
    }

    #[test]
    fn builds_descriptor_from_keyword_arguments() {
        let registry = FunctionRegistry::new();
        let tool = manifest(json!({
            "purpose": "Get the current weather in a given location.",
            "required": ["location"],
            "function": "get_current_weather",
            "location": "str",
            "location_description": "The city and state, e.g. San Francisco, CA",
            "unit": ["celsius", "fahrenheit"],
            "unit_description": "The unit of temperature, e.g. celsius or fahrenheit",
        }))
        .build(&functions(), &registry)
        .unwrap();

        assert_eq!(tool.name(), "get_current_weather");
        assert_eq!(
            tool.parameter("location").unwrap().schema_type(),
            SchemaType::String
        );
        assert_eq!(tool.parameter("unit").unwrap().schema_type(), SchemaType::Array);
        assert!(registry.contains("get_current_weather"));
    }

    #[test]
    fn undocumented_parameter_fails_before_registration() {
        let registry = FunctionRegistry::new();
        let err = manifest(json!({
            "purpose": "Get weather",
            "function": "get_current_weather",
            "location": "str",
            "location_description": "City",
            "unit": ["celsius", "fahrenheit"],
        }))
        .build(&functions(), &registry)
        .expect_err("unit has no description");

        assert!(matches!(err, Error::Validation { ref reason } if reason.contains("unit")));
        assert!(registry.is_empty());
    }

    #[test]
    fn orphan_description_is_rejected() {
        let err = manifest(json!({
            "purpose": "Get weather",
            "function": "get_current_weather",
            "location": "str",
            "location_description": "City",
            "country_description": "Country",
        }))
        .into_builder(&functions())
        .expect_err("country is not declared");

        assert!(matches!(err, Error::Validation { ref reason } if reason.contains("country")));
    }

    #[test]
    fn missing_function_is_missing_argument() {
        let err = manifest(json!({ "purpose": "Get weather" }))
            .into_builder(&functions())
            .expect_err("function is mandatory");
        assert_eq!(err, Error::missing_argument("function"));
    }

    #[test]
    fn non_callable_function_is_type_kind() {
        let err = manifest(json!({ "purpose": "Get weather", "function": 42 }))
            .into_builder(&functions())
            .expect_err("a number is not callable");
        assert!(matches!(err, Error::TypeKind { .. }));

        let err = manifest(json!({ "purpose": "Get weather", "function": "nope" }))
            .into_builder(&functions())
            .expect_err("unknown names are not callable");
        assert!(matches!(err, Error::TypeKind { .. }));
    }

    #[test]
    fn unknown_type_names_become_strings() {
        let registry = FunctionRegistry::new();
        let tool = manifest(json!({
            "purpose": "Get weather",
            "function": "get_current_weather",
            "location": "GeoPoint",
            "location_description": "Where",
        }))
        .build(&functions(), &registry)
        .unwrap();

        assert_eq!(
            tool.parameter("location").unwrap().schema_type(),
            SchemaType::String
        );
    }

    #[test]
    fn empty_enum_is_left_out() {
        let registry = FunctionRegistry::new();
        let tool = manifest(json!({
            "purpose": "Get weather",
            "function": "get_current_weather",
            "location": "str",
            "location_description": "City",
            "unit": [],
            "unit_description": "Unit",
        }))
        .build(&functions(), &registry)
        .unwrap();

        let properties = tool.to_wire().function.parameters.properties;
        assert_eq!(properties.keys().collect::<Vec<_>>(), ["location"]);
    }

    #[test]
    fn non_string_description_is_rejected() {
        let err = manifest(json!({
            "purpose": "Get weather",
            "function": "get_current_weather",
            "location": "str",
            "location_description": 7,
        }))
        .into_builder(&functions())
        .expect_err("description must be text");
        assert!(matches!(err, Error::Validation { .. }));
    }

    #[test]
    fn null_required_means_none_required() {
        let registry = FunctionRegistry::new();
        let tool = manifest(json!({
            "purpose": "Get weather",
            "required": null,
            "function": "get_current_weather",
            "location": "str",
            "location_description": "City",
        }))
        .build(&functions(), &registry)
        .unwrap();

        assert!(tool.required().is_empty());
        assert!(tool.to_wire().function.parameters.required.is_empty());
    }

    #[test]
    fn missing_purpose_is_invalid() {
        let err = ToolManifest::from_json(r#"{"function":"get_current_weather"}"#)
            .expect_err("purpose is mandatory");
        assert!(matches!(err, Error::Validation { .. }));
    }
}
