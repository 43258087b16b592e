//! Executes model-requested tool calls against a function registry.

use std::fmt;
use std::sync::Arc;

use fnwrap_registry::FunctionRegistry;
use serde_json::Value;
use tracing::{info, warn};

use crate::traits::{AdapterResult, ChatMessage, ToolCallRequest};

/// Runs requested calls and wraps their results as tool messages.
#[derive(Clone)]
pub struct ToolDispatcher {
    registry: Arc<FunctionRegistry>,
}

impl fmt::Debug for ToolDispatcher {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ToolDispatcher")
            .field("registry", &self.registry)
            .finish()
    }
}

impl ToolDispatcher {
    /// Creates a dispatcher over `registry`.
    #[must_use]
    pub fn new(registry: Arc<FunctionRegistry>) -> Self {
        Self { registry }
    }

    /// Returns the registry calls are dispatched to.
    #[must_use]
    pub fn registry(&self) -> &Arc<FunctionRegistry> {
        &self.registry
    }

    /// Executes one call and returns the tool message answering it.
    ///
    /// String results become the message content verbatim; any other value
    /// is JSON-encoded.
    ///
    /// # Errors
    ///
    /// Returns [`crate::traits::AdapterError::Tool`] when the function is not
    /// registered, the arguments do not decode or bind, or the function fails.
    pub fn dispatch(&self, call: &ToolCallRequest) -> AdapterResult<ChatMessage> {
        let output = self
            .registry
            .call_json(&call.name, &call.arguments)
            .inspect_err(|err| {
                warn!(call_id = %call.id, function = %call.name, error = %err, "tool call rejected");
            })?;

        info!(call_id = %call.id, function = %call.name, "tool call completed");
        Ok(ChatMessage::tool(&call.id, &call.name, render(output)))
    }

    /// Executes every call in order, stopping at the first failure.
    ///
    /// # Errors
    ///
    /// Returns the first error raised by [`ToolDispatcher::dispatch`].
    pub fn dispatch_all(&self, calls: &[ToolCallRequest]) -> AdapterResult<Vec<ChatMessage>> {
        calls.iter().map(|call| self.dispatch(call)).collect()
    }
}

fn render(output: Value) -> String {
    match output {
        Value::String(text) => text,
        other => other.to_string(),
    }
}
