//! Dispatch table turning model-issued calls into native invocations.
//!
//! Functions declare an explicit [`Signature`]; the [`FunctionRegistry`] binds
//! named arguments against it, applies defaults for omitted parameters, and
//! invokes the body.

#![warn(missing_docs, clippy::pedantic)]

mod function;
mod registry;
mod signature;

pub use function::NativeFunction;
pub use registry::FunctionRegistry;
pub use signature::{BoundArguments, ParamSpec, Signature};
