//! Declared parameter lists and argument binding.

use fnwrap_primitives::{Error, Result};
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

/// One declared parameter of a native function.
#[derive(Clone, Debug, PartialEq)]
pub struct ParamSpec {
    name: String,
    default: Option<Value>,
}

impl ParamSpec {
    /// Declares a parameter that must always be supplied.
    #[must_use]
    pub fn required(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            default: None,
        }
    }

    /// Declares a parameter that falls back to `default` when omitted.
    #[must_use]
    pub fn optional(name: impl Into<String>, default: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            default: Some(default.into()),
        }
    }

    /// Returns the parameter name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the default value, if any.
    #[must_use]
    pub fn default(&self) -> Option<&Value> {
        self.default.as_ref()
    }
}

/// Ordered parameter list of a native function.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Signature {
    params: Vec<ParamSpec>,
}

impl Signature {
    /// Creates an empty signature.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a parameter without a default.
    #[must_use]
    pub fn required(self, name: impl Into<String>) -> Self {
        self.with_param(ParamSpec::required(name))
    }

    /// Appends a parameter with a default value.
    #[must_use]
    pub fn optional(self, name: impl Into<String>, default: impl Into<Value>) -> Self {
        self.with_param(ParamSpec::optional(name, default))
    }

    /// Appends a parameter, replacing an earlier declaration of the same name
    /// in place.
    #[must_use]
    pub fn with_param(mut self, param: ParamSpec) -> Self {
        match self.params.iter_mut().find(|p| p.name == param.name) {
            Some(existing) => *existing = param,
            None => self.params.push(param),
        }
        self
    }

    /// Returns the declared parameters in order.
    #[must_use]
    pub fn params(&self) -> &[ParamSpec] {
        &self.params
    }

    /// Returns `true` if a parameter with the supplied name is declared.
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.params.iter().any(|p| p.name == name)
    }

    /// Binds named arguments to this signature, applying defaults.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] when `args` names a parameter that is not
    /// declared, or omits a parameter that has no default.
    pub fn bind(&self, function: &str, mut args: Map<String, Value>) -> Result<BoundArguments> {
        if let Some(unexpected) = args.keys().find(|key| !self.contains(key)) {
            return Err(Error::binding(
                function,
                format!("unexpected argument `{unexpected}`"),
            ));
        }

        let mut values = Vec::with_capacity(self.params.len());
        let mut missing = Vec::new();
        for param in &self.params {
            match args.remove(&param.name).or_else(|| param.default.clone()) {
                Some(value) => values.push((param.name.clone(), value)),
                None => missing.push(format!("`{}`", param.name)),
            }
        }

        if !missing.is_empty() {
            return Err(Error::binding(
                function,
                format!("missing required argument(s) {}", missing.join(", ")),
            ));
        }

        Ok(BoundArguments {
            function: function.to_owned(),
            values,
        })
    }
}

/// Arguments bound to a signature, in declaration order, defaults applied.
#[derive(Clone, Debug, PartialEq)]
pub struct BoundArguments {
    function: String,
    values: Vec<(String, Value)>,
}

impl BoundArguments {
    /// Returns the name of the function these arguments were bound for.
    #[must_use]
    pub fn function(&self) -> &str {
        &self.function
    }

    /// Returns the value bound to `name`.
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values
            .iter()
            .find_map(|(key, value)| (key == name).then_some(value))
    }

    /// Returns the bound string argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the argument is absent or not a string.
    pub fn str(&self, name: &str) -> Result<&str> {
        self.expect(name)?
            .as_str()
            .ok_or_else(|| self.mismatch(name, "a string"))
    }

    /// Returns the bound string argument, or `fallback` when it is absent or
    /// `null`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the argument is bound to a non-string.
    pub fn str_or<'a>(&'a self, name: &str, fallback: &'a str) -> Result<&'a str> {
        match self.get(name) {
            None | Some(Value::Null) => Ok(fallback),
            Some(value) => value.as_str().ok_or_else(|| self.mismatch(name, "a string")),
        }
    }

    /// Returns the bound integer argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the argument is absent or not an integer.
    pub fn i64(&self, name: &str) -> Result<i64> {
        self.expect(name)?
            .as_i64()
            .ok_or_else(|| self.mismatch(name, "an integer"))
    }

    /// Returns the bound numeric argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the argument is absent or not a number.
    pub fn f64(&self, name: &str) -> Result<f64> {
        self.expect(name)?
            .as_f64()
            .ok_or_else(|| self.mismatch(name, "a number"))
    }

    /// Returns the bound boolean argument.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the argument is absent or not a boolean.
    pub fn bool(&self, name: &str) -> Result<bool> {
        self.expect(name)?
            .as_bool()
            .ok_or_else(|| self.mismatch(name, "a boolean"))
    }

    /// Deserializes the bound argument into `T`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the argument is absent or does not
    /// deserialize into `T`.
    pub fn deserialize<T: DeserializeOwned>(&self, name: &str) -> Result<T> {
        let value = self.expect(name)?.clone();
        serde_json::from_value(value).map_err(|err| {
            Error::binding(&self.function, format!("argument `{name}` is invalid: {err}"))
        })
    }

    /// Iterates over `(name, value)` pairs in declaration order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(key, value)| (key.as_str(), value))
    }

    /// Returns the number of bound arguments.
    #[must_use]
    pub fn len(&self) -> usize {
        self.values.len()
    }

    /// Returns `true` if nothing was bound.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    fn expect(&self, name: &str) -> Result<&Value> {
        self.get(name).ok_or_else(|| {
            Error::binding(&self.function, format!("argument `{name}` is not declared"))
        })
    }

    fn mismatch(&self, name: &str, expected: &str) -> Error {
        Error::binding(
            &self.function,
            format!("argument `{name}` must be {expected}"),
        )
    }
}
