//! Registry that stores native functions keyed by name.

use std::collections::HashMap;
use std::sync::RwLock;

use fnwrap_primitives::{Error, Result};
use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::NativeFunction;

/// Dispatch table from function name to implementation.
///
/// Populate it during start-up, then share it (typically behind an `Arc`)
/// with whatever dispatches model-issued calls. Registration after start-up
/// is allowed and serialised by the internal lock.
#[derive(Default)]
pub struct FunctionRegistry {
    inner: RwLock<HashMap<String, NativeFunction>>,
}

impl std::fmt::Debug for FunctionRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let names = self.names().unwrap_or_default();
        f.debug_struct("FunctionRegistry")
            .field("registered", &names)
            .finish()
    }
}

impl FunctionRegistry {
    /// Creates an empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `function` under its own name, replacing any previous
    /// registration of that name.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryPoisoned`] if the internal lock is poisoned.
    pub fn register(&self, function: NativeFunction) -> Result<()> {
        let mut inner = self.inner.write().map_err(|_| Error::RegistryPoisoned)?;
        let name = function.name().to_owned();
        if inner.insert(name.clone(), function).is_some() {
            debug!(function = %name, "replaced existing registration");
        } else {
            debug!(function = %name, "registered function");
        }
        Ok(())
    }

    /// Returns a point-in-time copy of the whole mapping.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryPoisoned`] if the internal lock is poisoned.
    pub fn snapshot(&self) -> Result<HashMap<String, NativeFunction>> {
        let inner = self.inner.read().map_err(|_| Error::RegistryPoisoned)?;
        Ok(inner.clone())
    }

    /// Returns the function registered under `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<NativeFunction> {
        let inner = self.inner.read().ok()?;
        inner.get(name).cloned()
    }

    /// Returns `true` if `name` is registered.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.inner
            .read()
            .is_ok_and(|inner| inner.contains_key(name))
    }

    /// Lists registered names in sorted order.
    ///
    /// # Errors
    ///
    /// Returns [`Error::RegistryPoisoned`] if the internal lock is poisoned.
    pub fn names(&self) -> Result<Vec<String>> {
        let inner = self.inner.read().map_err(|_| Error::RegistryPoisoned)?;
        let mut names: Vec<_> = inner.keys().cloned().collect();
        names.sort();
        Ok(names)
    }

    /// Returns the number of registered functions.
    #[must_use]
    pub fn len(&self) -> usize {
        self.inner.read().map_or(0, |inner| inner.len())
    }

    /// Returns `true` if nothing is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Invokes `name` with named arguments, applying declared defaults for
    /// omitted parameters. The function's result is returned unchanged.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NotRegistered`] for unknown names, [`Error::Binding`]
    /// when the arguments do not fit the signature, [`Error::Execution`]
    /// when the implementation fails, and [`Error::RegistryPoisoned`] if the
    /// internal lock is poisoned.
    pub fn call(&self, name: &str, args: Map<String, Value>) -> Result<Value> {
        // The lock is released before the body runs so a function may
        // register further functions.
        let function = self.lookup(name)?.ok_or_else(|| Error::NotRegistered {
            name: name.to_owned(),
        })?;

        debug!(function = %name, args = args.len(), "calling function");
        function.call(args).inspect_err(|err| {
            warn!(function = %name, error = %err, "function call failed");
        })
    }

    /// Decodes a JSON-encoded argument object and invokes `name` with it.
    ///
    /// A blank payload is treated as an empty object.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MalformedArguments`] if the payload is not a JSON
    /// object, otherwise behaves like [`FunctionRegistry::call`].
    pub fn call_json(&self, name: &str, arguments: &str) -> Result<Value> {
        if self.lookup(name)?.is_none() {
            return Err(Error::NotRegistered {
                name: name.to_owned(),
            });
        }
        let args = decode_arguments(name, arguments)?;
        self.call(name, args)
    }

    fn lookup(&self, name: &str) -> Result<Option<NativeFunction>> {
        let inner = self.inner.read().map_err(|_| Error::RegistryPoisoned)?;
        Ok(inner.get(name).cloned())
    }
}

fn decode_arguments(function: &str, arguments: &str) -> Result<Map<String, Value>> {
    if arguments.trim().is_empty() {
        return Ok(Map::new());
    }

    let value: Value =
        serde_json::from_str(arguments).map_err(|err| Error::MalformedArguments {
            function: function.to_owned(),
            reason: err.to_string(),
        })?;

    match value {
        Value::Object(map) => Ok(map),
        other => Err(Error::MalformedArguments {
            function: function.to_owned(),
            reason: format!("expected a JSON object, found {}", kind_of(&other)),
        }),
    }
}

fn kind_of(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Signature;
    use serde_json::json;

    fn get_current_weather() -> NativeFunction {
        NativeFunction::new(
            "get_current_weather",
            Signature::new()
                .required("location")
                .optional("unit", "fahrenheit"),
            |args| {
                Ok(json!({
                    "location": args.str("location")?,
                    "unit": args.str("unit")?,
                }))
            },
        )
    }

    fn object(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn register_and_call_applies_defaults() {
        let registry = FunctionRegistry::new();
        registry.register(get_current_weather()).unwrap();

        let output = registry
            .call("get_current_weather", object(json!({ "location": "Paris" })))
            .unwrap();
        assert_eq!(output, json!({ "location": "Paris", "unit": "fahrenheit" }));
    }

    #[test]
    fn second_registration_overwrites_first() {
        let registry = FunctionRegistry::new();
        registry
            .register(NativeFunction::new("greet", Signature::new(), |_| {
                Ok(json!("first"))
            }))
            .unwrap();
        registry
            .register(NativeFunction::new("greet", Signature::new(), |_| {
                Ok(json!("second"))
            }))
            .unwrap();

        assert_eq!(registry.len(), 1);
        assert_eq!(registry.call("greet", Map::new()).unwrap(), json!("second"));
    }

    #[test]
    fn unknown_function_is_not_registered() {
        let registry = FunctionRegistry::new();
        let err = registry
            .call("undefined_name", Map::new())
            .expect_err("unknown function should error");
        assert!(matches!(err, Error::NotRegistered { name } if name == "undefined_name"));
    }

    #[test]
    fn call_json_decodes_arguments() {
        let registry = FunctionRegistry::new();
        registry.register(get_current_weather()).unwrap();

        let output = registry
            .call_json(
                "get_current_weather",
                r#"{"location":"Tokyo","unit":"celsius"}"#,
            )
            .unwrap();
        assert_eq!(output["unit"], "celsius");
    }

    #[test]
    fn call_json_rejects_non_objects() {
        let registry = FunctionRegistry::new();
        registry.register(get_current_weather()).unwrap();

        let err = registry
            .call_json("get_current_weather", "[\"Paris\"]")
            .expect_err("array payload should fail");
        assert!(matches!(err, Error::MalformedArguments { .. }));

        let err = registry
            .call_json("get_current_weather", "{")
            .expect_err("broken JSON should fail");
        assert!(matches!(err, Error::MalformedArguments { .. }));
    }

    #[test]
    fn blank_payload_means_no_arguments() {
        let registry = FunctionRegistry::new();
        registry
            .register(NativeFunction::new("ping", Signature::new(), |_| {
                Ok(json!("pong"))
            }))
            .unwrap();
        assert_eq!(registry.call_json("ping", "  ").unwrap(), json!("pong"));
    }

    #[test]
    fn snapshot_and_names_reflect_registrations() {
        let registry = FunctionRegistry::new();
        assert!(registry.is_empty());
        registry.register(get_current_weather()).unwrap();
        registry
            .register(NativeFunction::new("ping", Signature::new(), |_| Ok(Value::Null)))
            .unwrap();

        let snapshot = registry.snapshot().unwrap();
        assert_eq!(snapshot.len(), 2);
        assert!(snapshot.contains_key("ping"));
        assert_eq!(registry.names().unwrap(), ["get_current_weather", "ping"]);
    }

    #[test]
    fn poisoned_lock_is_reported_by_calls() {
        let registry = FunctionRegistry::new();
        registry
            .register(NativeFunction::new("ping", Signature::new(), |_| Ok(json!("pong"))))
            .unwrap();

        std::thread::scope(|scope| {
            let writer = scope.spawn(|| {
                let _guard = registry.inner.write().unwrap();
                panic!("writer panicked while holding the lock");
            });
            assert!(writer.join().is_err());
        });

        assert_eq!(registry.call("ping", Map::new()), Err(Error::RegistryPoisoned));
        assert_eq!(registry.call_json("ping", "{}"), Err(Error::RegistryPoisoned));
    }
}
