//! Function-calling wire format.

use std::collections::BTreeMap;

use fnwrap_primitives::SchemaType;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::ToolDescriptor;

/// Outer tag of a serialized tool.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    /// A callable function.
    #[default]
    Function,
}

/// A tool as sent to a completion service.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireTool {
    /// Always [`ToolKind::Function`].
    #[serde(rename = "type")]
    pub kind: ToolKind,
    /// Function schema.
    pub function: WireFunction,
}

/// Name, description and parameter schema of a tool.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireFunction {
    /// Function name used when the model requests a call.
    pub name: String,
    /// What the function does.
    pub description: String,
    /// Parameter object schema.
    pub parameters: WireParameters,
}

/// Object schema describing the function's parameters.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireParameters {
    /// Always [`SchemaType::Object`].
    #[serde(rename = "type")]
    pub kind: SchemaType,
    /// One entry per parameter.
    pub properties: BTreeMap<String, WireProperty>,
    /// Parameters the model must always supply.
    pub required: Vec<String>,
}

/// Schema of a single parameter.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct WireProperty {
    /// Type tag.
    #[serde(rename = "type")]
    pub kind: SchemaType,
    /// Allowed values.
    #[serde(rename = "enum", default, skip_serializing_if = "Option::is_none")]
    pub enum_values: Option<Vec<Value>>,
    /// Human-readable description.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
}

impl ToolDescriptor {
    /// Serializes the descriptor into the function-calling wire format.
    #[must_use]
    pub fn to_wire(&self) -> WireTool {
        let properties = self
            .parameters()
            .iter()
            .map(|param| {
                let property = WireProperty {
                    kind: param.schema_type(),
                    enum_values: param
                        .enum_values()
                        .filter(|values| !values.is_empty())
                        .map(<[Value]>::to_vec),
                    description: param
                        .description()
                        .filter(|description| !description.is_empty())
                        .map(str::to_owned),
                };
                (param.name().to_owned(), property)
            })
            .collect();

        let required = self
            .parameters()
            .iter()
            .map(|param| param.name())
            .filter(|name| self.required().iter().any(|required| required == name))
            .map(str::to_owned)
            .collect();

        WireTool {
            kind: ToolKind::Function,
            function: WireFunction {
                name: self.name().to_owned(),
                description: self.purpose().to_owned(),
                parameters: WireParameters {
                    kind: SchemaType::Object,
                    properties,
                    required,
                },
            },
        }
    }

    /// Serializes the descriptor into a JSON value.
    #[must_use]
    pub fn to_value(&self) -> Value {
        // Serializing plain strings, maps and JSON values cannot fail.
        serde_json::to_value(self.to_wire()).unwrap_or(Value::Null)
    }
}

/// Serializes a set of descriptors, preserving order.
#[must_use]
pub fn serialize_tools(tools: &[ToolDescriptor]) -> Vec<WireTool> {
    tools.iter().map(ToolDescriptor::to_wire).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnwrap_registry::{FunctionRegistry, NativeFunction, Signature};
    use serde_json::json;

    fn weather_tool(registry: &FunctionRegistry) -> ToolDescriptor {
        ToolDescriptor::builder("Get the current weather in a given location.")
            .function(NativeFunction::new(
                "get_current_weather",
                Signature::new()
                    .required("location")
                    .optional("unit", "fahrenheit"),
                |_| Ok(Value::Null),
            ))
            .required(["location"])
            .param::<String>("location", "The city and state, e.g. San Francisco, CA")
            .enum_param(
                "unit",
                ["celsius", "fahrenheit"],
                "The unit of temperature, e.g. celsius or fahrenheit",
            )
            .build(registry)
            .unwrap()
    }

    #[test]
    fn serializes_function_calling_shape() {
        let registry = FunctionRegistry::new();
        let value = weather_tool(&registry).to_value();

        assert_eq!(
            value,
            json!({
                "type": "function",
                "function": {
                    "name": "get_current_weather",
                    "description": "Get the current weather in a given location.",
                    "parameters": {
                        "type": "object",
                        "properties": {
                            "location": {
                                "type": "string",
                                "description": "The city and state, e.g. San Francisco, CA"
                            },
                            "unit": {
                                "type": "array",
                                "enum": ["celsius", "fahrenheit"],
                                "description": "The unit of temperature, e.g. celsius or fahrenheit"
                            }
                        },
                        "required": ["location"]
                    }
                }
            })
        );
    }

    #[test]
    fn serialization_is_idempotent() {
        let registry = FunctionRegistry::new();
        let tool = weather_tool(&registry);
        assert_eq!(tool.to_wire(), tool.to_wire());
        assert_eq!(tool.to_value(), tool.to_value());
    }

    #[test]
    fn required_only_lists_declared_parameters() {
        let registry = FunctionRegistry::new();
        let tool = ToolDescriptor::builder("Get the current time")
            .function(NativeFunction::new(
                "get_current_time",
                Signature::new().required("location"),
                |_| Ok(Value::Null),
            ))
            .required(["location", "timezone"])
            .param::<String>("location", "City")
            .build(&registry)
            .unwrap();

        assert_eq!(tool.to_wire().function.parameters.required, ["location"]);
    }

    #[test]
    fn wire_round_trips_through_json() {
        let registry = FunctionRegistry::new();
        let wire = weather_tool(&registry).to_wire();
        let encoded = serde_json::to_string(&wire).unwrap();
        let decoded: WireTool = serde_json::from_str(&encoded).unwrap();
        assert_eq!(decoded, wire);
    }

    #[test]
    fn serialize_tools_preserves_order() {
        let registry = FunctionRegistry::new();
        let weather = weather_tool(&registry);
        let ping = ToolDescriptor::builder("Ping")
            .function(NativeFunction::new("ping", Signature::new(), |_| {
                Ok(Value::Null)
            }))
            .build(&registry)
            .unwrap();

        let names: Vec<_> = serialize_tools(&[ping, weather])
            .into_iter()
            .map(|tool| tool.function.name)
            .collect();
        assert_eq!(names, ["ping", "get_current_weather"]);
    }
}
