//! Tool descriptors and their builder.

use std::collections::HashSet;

use fnwrap_primitives::{Error, JsonSchemaType, NativeType, Result};
use fnwrap_registry::{FunctionRegistry, NativeFunction};
use serde_json::Value;
use tracing::{debug, info, warn};

use crate::ParameterDescriptor;
use crate::parameter::{DeclaredKind, Declaration};

/// Schema of one native function, as advertised to a completion service.
#[derive(Clone, Debug)]
pub struct ToolDescriptor {
    name: String,
    purpose: String,
    parameters: Vec<ParameterDescriptor>,
    required: Vec<String>,
    function: NativeFunction,
}

impl ToolDescriptor {
    /// Starts building a descriptor with the supplied purpose.
    #[must_use]
    pub fn builder(purpose: impl Into<String>) -> ToolBuilder {
        ToolBuilder {
            purpose: purpose.into(),
            function: None,
            required: Vec::new(),
            declarations: Vec::new(),
        }
    }

    /// Returns the tool name, which is the bound function's name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the trimmed purpose.
    #[must_use]
    pub fn purpose(&self) -> &str {
        &self.purpose
    }

    /// Returns the resolved parameters in declaration order.
    #[must_use]
    pub fn parameters(&self) -> &[ParameterDescriptor] {
        &self.parameters
    }

    /// Returns the parameter called `name`.
    #[must_use]
    pub fn parameter(&self, name: &str) -> Option<&ParameterDescriptor> {
        self.parameters.iter().find(|param| param.name() == name)
    }

    /// Returns the names declared as always required.
    #[must_use]
    pub fn required(&self) -> &[String] {
        &self.required
    }

    /// Returns the bound function.
    #[must_use]
    pub fn function(&self) -> &NativeFunction {
        &self.function
    }
}

/// Builder for [`ToolDescriptor`].
///
/// Every parameter is declared together with its description, so a
/// parameter cannot be left undocumented.
#[derive(Clone, Debug)]
pub struct ToolBuilder {
    purpose: String,
    function: Option<NativeFunction>,
    required: Vec<String>,
    declarations: Vec<Declaration>,
}

impl ToolBuilder {
    /// Binds the native function the descriptor describes.
    #[must_use]
    pub fn function(mut self, function: NativeFunction) -> Self {
        self.function = Some(function);
        self
    }

    /// Declares the parameters that must always be supplied.
    #[must_use]
    pub fn required<I, S>(mut self, names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.required = names.into_iter().map(Into::into).collect();
        self
    }

    /// Declares a parameter typed after the Rust type `T`.
    #[must_use]
    pub fn param<T: JsonSchemaType>(
        self,
        name: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        self.param_of(name, T::native_type(), description)
    }

    /// Declares a parameter with an explicit native type.
    #[must_use]
    pub fn param_of(
        self,
        name: impl Into<String>,
        native: NativeType,
        description: impl Into<String>,
    ) -> Self {
        self.declare(name.into(), DeclaredKind::Native(native), description.into())
    }

    /// Declares a parameter restricted to an enumerated list of values.
    ///
    /// An empty list is accepted and leaves the parameter out of the
    /// descriptor.
    #[must_use]
    pub fn enum_param<I, V>(
        self,
        name: impl Into<String>,
        values: I,
        description: impl Into<String>,
    ) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values = values.into_iter().map(Into::into).collect();
        self.declare(name.into(), DeclaredKind::Enum(values), description.into())
    }

    fn declare(mut self, name: String, kind: DeclaredKind, description: String) -> Self {
        self.declarations.push(Declaration {
            name,
            kind,
            description,
        });
        self
    }

    /// Validates the declarations, builds the descriptor, and registers the
    /// bound function in `registry` under its own name.
    ///
    /// Nothing is registered when validation fails.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] if no function was bound and
    /// [`Error::Validation`] if the purpose is blank, a parameter is declared
    /// twice, or a parameter has a blank description.
    pub fn build(self, registry: &FunctionRegistry) -> Result<ToolDescriptor> {
        let descriptor = self.finish()?;
        registry.register(descriptor.function.clone())?;
        info!(
            tool = %descriptor.name,
            parameters = descriptor.parameters.len(),
            "tool registered"
        );
        Ok(descriptor)
    }

    fn finish(self) -> Result<ToolDescriptor> {
        let purpose = self.purpose.trim().to_owned();
        if purpose.is_empty() {
            return Err(Error::validation("tool purpose cannot be empty"));
        }

        let function = self
            .function
            .ok_or_else(|| Error::missing_argument("function"))?;

        let mut seen = HashSet::new();
        for declaration in &self.declarations {
            if !seen.insert(declaration.name.as_str()) {
                return Err(Error::validation(format!(
                    "parameter `{}` is declared more than once",
                    declaration.name
                )));
            }
            if declaration.description.trim().is_empty() {
                return Err(Error::validation(format!(
                    "every declared parameter must have a description; `{}` has none",
                    declaration.name
                )));
            }
        }

        let mut parameters: Vec<ParameterDescriptor> = self
            .declarations
            .iter()
            .filter_map(|declaration| {
                let resolved = declaration.resolve();
                if resolved.is_none() {
                    debug!(parameter = %declaration.name, "dropping parameter with empty enum");
                }
                resolved
            })
            .collect();

        for declaration in &self.declarations {
            if let Some(param) = parameters
                .iter_mut()
                .find(|param| param.name() == declaration.name)
            {
                param.attach_description(&declaration.description);
            }
        }

        for name in &self.required {
            if !parameters.iter().any(|param| param.name() == name) {
                warn!(
                    tool = %function.name(),
                    parameter = %name,
                    "required parameter is not declared and will not be advertised"
                );
            }
        }

        for param in &parameters {
            if !function.signature().contains(param.name()) {
                warn!(
                    tool = %function.name(),
                    parameter = %param.name(),
                    "declared parameter is missing from the function signature"
                );
            }
        }

        Ok(ToolDescriptor {
            name: function.name().to_owned(),
            purpose,
            parameters,
            required: self.required,
            function,
        })
    }
}
