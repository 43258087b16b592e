//! Named native functions with explicit signatures.

use std::fmt;
use std::sync::Arc;

use fnwrap_primitives::{Error, Result};
use serde_json::{Map, Value};

use crate::{BoundArguments, Signature};

type FunctionBody = dyn Fn(&BoundArguments) -> Result<Value> + Send + Sync;

/// A callable implementation together with the name and signature it is
/// dispatched by.
#[derive(Clone)]
pub struct NativeFunction {
    name: String,
    signature: Signature,
    body: Arc<FunctionBody>,
}

impl fmt::Debug for NativeFunction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("NativeFunction")
            .field("name", &self.name)
            .field("signature", &self.signature)
            .finish_non_exhaustive()
    }
}

impl NativeFunction {
    /// Wraps `body` as the implementation of `name`.
    #[must_use]
    pub fn new<F>(name: impl Into<String>, signature: Signature, body: F) -> Self
    where
        F: Fn(&BoundArguments) -> Result<Value> + Send + Sync + 'static,
    {
        Self {
            name: name.into(),
            signature,
            body: Arc::new(body),
        }
    }

    /// Returns the name the function is registered under.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Returns the declared signature.
    #[must_use]
    pub fn signature(&self) -> &Signature {
        &self.signature
    }

    /// Binds `args` against the signature and runs the body.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Binding`] if the arguments do not fit the signature,
    /// or [`Error::Execution`] if the body fails.
    pub fn call(&self, args: Map<String, Value>) -> Result<Value> {
        let bound = self.signature.bind(&self.name, args)?;
        (self.body)(&bound).map_err(|err| match err {
            Error::Execution { function, reason } if function.is_empty() => Error::Execution {
                function: self.name.clone(),
                reason,
            },
            other => other,
        })
    }
}
