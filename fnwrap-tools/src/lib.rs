//! Tool descriptors for function-calling models.
//!
//! A [`ToolDescriptor`] describes one native function: its name, purpose, and
//! documented parameters. Descriptors are built either with the typed
//! [`ToolBuilder`] or from a loosely-typed [`ToolManifest`]; building one
//! registers the function in a [`fnwrap_registry::FunctionRegistry`] so the
//! calls a model requests can be dispatched back to it.

#![warn(missing_docs, clippy::pedantic)]

mod descriptor;
mod manifest;
mod parameter;
mod wire;

pub use descriptor::{ToolBuilder, ToolDescriptor};
pub use manifest::{DESCRIPTION_SUFFIX, ToolManifest};
pub use parameter::ParameterDescriptor;
pub use wire::{ToolKind, WireFunction, WireParameters, WireProperty, WireTool, serialize_tools};
