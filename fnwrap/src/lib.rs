//! Describe native functions to function-calling models and dispatch the
//! calls they request.
//!
//! This crate bundles the workspace crates behind feature flags. The core
//! (descriptor builder and function registry) is always available.

#![warn(missing_docs, clippy::pedantic)]

/// Re-export shared primitives for convenience.
pub use fnwrap_primitives as primitives;

/// Invocation registry.
pub use fnwrap_registry as registry;

/// Tool descriptor builder and wire format.
pub use fnwrap_tools as tools;

/// Completion-service contract and dispatch (enabled by `adapters` feature).
#[cfg(feature = "adapters")]
pub use fnwrap_adapters as adapters;

/// Configuration loading (enabled by `config` feature).
#[cfg(feature = "config")]
pub use fnwrap_config as config;

/// Tracing setup (enabled by `telemetry` feature).
#[cfg(feature = "telemetry")]
pub use fnwrap_telemetry as telemetry;

pub use fnwrap_primitives::{Error, Result};
pub use fnwrap_registry::{FunctionRegistry, NativeFunction, Signature};
pub use fnwrap_tools::{ToolDescriptor, ToolManifest, serialize_tools};
