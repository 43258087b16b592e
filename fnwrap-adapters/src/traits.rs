//! Completion-service contract and shared data structures.

use std::fmt;

use async_trait::async_trait;
use fnwrap_config::ToolChoice;
use fnwrap_tools::WireTool;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Result alias used by completion services.
pub type AdapterResult<T> = Result<T, AdapterError>;

/// Error type shared by completion-service implementations.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// Service is misconfigured or missing credentials.
    #[error("adapter not configured: {reason}")]
    Configuration {
        /// Additional context for the failure.
        reason: String,
    },

    /// The supplied request was invalid.
    #[error("invalid completion request: {reason}")]
    InvalidRequest {
        /// Reason describing why the request could not be processed.
        reason: String,
    },

    /// The service returned a malformed response.
    #[error("adapter response error: {reason}")]
    Response {
        /// Additional context about the response failure.
        reason: String,
    },

    /// A requested tool call could not be executed.
    #[error("tool call failed: {source}")]
    Tool {
        /// Error raised by the registry or the function itself.
        #[from]
        source: fnwrap_primitives::Error,
    },
}

impl AdapterError {
    /// Convenience constructor for invalid requests.
    #[must_use]
    pub fn invalid_request(reason: impl Into<String>) -> Self {
        Self::InvalidRequest {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for configuration issues.
    #[must_use]
    pub fn configuration(reason: impl Into<String>) -> Self {
        Self::Configuration {
            reason: reason.into(),
        }
    }

    /// Convenience constructor for malformed responses.
    #[must_use]
    pub fn response(reason: impl Into<String>) -> Self {
        Self::Response {
            reason: reason.into(),
        }
    }
}

/// Minimal metadata describing a completion service instance.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct AdapterMetadata {
    provider: &'static str,
    model: String,
}

impl AdapterMetadata {
    /// Creates metadata for the supplied provider and model identifier.
    #[must_use]
    pub fn new(provider: &'static str, model: impl Into<String>) -> Self {
        Self {
            provider,
            model: model.into(),
        }
    }

    /// Returns the provider identifier (e.g., "openai").
    #[must_use]
    pub const fn provider(&self) -> &'static str {
        self.provider
    }

    /// Returns the configured model name.
    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }
}

/// Roles supported in chat-style conversations.
#[derive(Clone, Copy, Debug, Deserialize, Serialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum MessageRole {
    /// System messages steer the assistant behaviour.
    System,
    /// User-authored content.
    User,
    /// Assistant (model) responses.
    Assistant,
    /// Results of tool calls.
    Tool,
}

impl fmt::Display for MessageRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::System => "system",
            Self::User => "user",
            Self::Assistant => "assistant",
            Self::Tool => "tool",
        })
    }
}

/// A call the model asked for: function name plus JSON-encoded arguments.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ToolCallRequest {
    /// Identifier echoed back in the tool message.
    pub id: String,
    /// Name of the function to invoke.
    pub name: String,
    /// Encoded argument object.
    pub arguments: String,
}

impl ToolCallRequest {
    /// Creates a call request.
    #[must_use]
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        arguments: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            arguments: arguments.into(),
        }
    }
}

/// One message of a conversation.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct ChatMessage {
    role: MessageRole,
    #[serde(default)]
    content: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<ToolCallRequest>,
}

impl ChatMessage {
    /// Creates a message with the given role and content.
    #[must_use]
    pub fn new(role: MessageRole, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            name: None,
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    /// Creates a system message.
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self::new(MessageRole::System, content)
    }

    /// Creates a user message.
    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self::new(MessageRole::User, content)
    }

    /// Creates an assistant message.
    #[must_use]
    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(MessageRole::Assistant, content)
    }

    /// Creates a tool message answering the call `tool_call_id`.
    #[must_use]
    pub fn tool(
        tool_call_id: impl Into<String>,
        name: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            tool_call_id: Some(tool_call_id.into()),
            ..Self::new(MessageRole::Tool, content)
        }
    }

    /// Attaches the tool calls requested by an assistant message.
    #[must_use]
    pub fn with_tool_calls(mut self, tool_calls: Vec<ToolCallRequest>) -> Self {
        self.tool_calls = tool_calls;
        self
    }

    /// Returns the message role.
    #[must_use]
    pub const fn role(&self) -> MessageRole {
        self.role
    }

    /// Returns the message content.
    #[must_use]
    pub fn content(&self) -> &str {
        &self.content
    }

    /// Returns the function name for tool messages.
    #[must_use]
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }

    /// Returns the answered call identifier for tool messages.
    #[must_use]
    pub fn tool_call_id(&self) -> Option<&str> {
        self.tool_call_id.as_deref()
    }

    /// Returns the tool calls requested by an assistant message.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        &self.tool_calls
    }
}

/// Request submitted to a completion service.
#[derive(Clone, Debug, Serialize, PartialEq)]
pub struct CompletionRequest {
    messages: Vec<ChatMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    tool_choice: ToolChoice,
}

impl CompletionRequest {
    /// Creates a request with the supplied conversation.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if the message list is empty.
    pub fn new(messages: Vec<ChatMessage>) -> AdapterResult<Self> {
        if messages.is_empty() {
            return Err(AdapterError::invalid_request(
                "completion request requires at least one message",
            ));
        }

        Ok(Self {
            messages,
            tools: Vec::new(),
            tool_choice: ToolChoice::Auto,
        })
    }

    /// Advertises tools the model may call.
    #[must_use]
    pub fn with_tools(mut self, tools: Vec<WireTool>) -> Self {
        self.tools = tools;
        self
    }

    /// Sets the tool-choice policy.
    #[must_use]
    pub fn with_tool_choice(mut self, tool_choice: ToolChoice) -> Self {
        self.tool_choice = tool_choice;
        self
    }

    /// Returns the conversation.
    #[must_use]
    pub fn messages(&self) -> &[ChatMessage] {
        &self.messages
    }

    /// Returns the advertised tools.
    #[must_use]
    pub fn tools(&self) -> &[WireTool] {
        &self.tools
    }

    /// Returns the tool-choice policy.
    #[must_use]
    pub const fn tool_choice(&self) -> ToolChoice {
        self.tool_choice
    }
}

/// Reply from a completion service.
#[derive(Clone, Debug, Deserialize, Serialize, PartialEq, Eq)]
pub struct CompletionResponse {
    message: ChatMessage,
}

impl CompletionResponse {
    /// Wraps the assistant message.
    #[must_use]
    pub fn new(message: ChatMessage) -> Self {
        Self { message }
    }

    /// Returns the assistant message.
    #[must_use]
    pub fn message(&self) -> &ChatMessage {
        &self.message
    }

    /// Consumes the response, returning the assistant message.
    #[must_use]
    pub fn into_message(self) -> ChatMessage {
        self.message
    }

    /// Returns the tool calls the model requested, possibly none.
    #[must_use]
    pub fn tool_calls(&self) -> &[ToolCallRequest] {
        self.message.tool_calls()
    }
}

/// Trait implemented by completion services.
#[async_trait]
pub trait CompletionService: Send + Sync {
    /// Returns basic metadata describing the service instance.
    fn metadata(&self) -> &AdapterMetadata;

    /// Sends the conversation and advertised tools, returning the model's
    /// reply.
    async fn complete(&self, request: CompletionRequest) -> AdapterResult<CompletionResponse>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn validates_request_messages() {
        let err = CompletionRequest::new(Vec::new()).expect_err("messages required");
        assert!(matches!(err, AdapterError::InvalidRequest { .. }));
    }

    #[test]
    fn builds_request() {
        let request = CompletionRequest::new(vec![ChatMessage::user("ping")])
            .unwrap()
            .with_tool_choice(ToolChoice::Required);

        assert_eq!(request.messages().len(), 1);
        assert!(request.tools().is_empty());
        assert_eq!(request.tool_choice(), ToolChoice::Required);
    }

    #[test]
    fn tool_message_carries_call_id() {
        let message = ChatMessage::tool("call_1", "get_current_time", "3:00 PM");
        assert_eq!(message.role(), MessageRole::Tool);
        assert_eq!(message.tool_call_id(), Some("call_1"));
        assert_eq!(message.name(), Some("get_current_time"));
    }

    /// Replies with the latest user message, prefixed by the system prompt.
    struct EchoService {
        metadata: AdapterMetadata,
    }

    #[async_trait]
    impl CompletionService for EchoService {
        fn metadata(&self) -> &AdapterMetadata {
            &self.metadata
        }

        async fn complete(&self, request: CompletionRequest) -> AdapterResult<CompletionResponse> {
            let find = |role: MessageRole| {
                request
                    .messages()
                    .iter()
                    .rev()
                    .find(|message| message.role() == role)
                    .map_or("", ChatMessage::content)
            };
            let reply = format!("[{}] {}", find(MessageRole::System), find(MessageRole::User));
            Ok(CompletionResponse::new(ChatMessage::assistant(reply)))
        }
    }

    #[tokio::test]
    async fn services_answer_through_the_trait_object() {
        let service: Box<dyn CompletionService> = Box::new(EchoService {
            metadata: AdapterMetadata::new("echo", "echo-1"),
        });
        assert_eq!(service.metadata().provider(), "echo");
        assert_eq!(service.metadata().model(), "echo-1");

        let request = CompletionRequest::new(vec![
            ChatMessage::system("be brief"),
            ChatMessage::user("ping"),
        ])
        .unwrap();
        let response = service.complete(request).await.unwrap();

        assert_eq!(response.message().role(), MessageRole::Assistant);
        assert_eq!(response.message().content(), "[be brief] ping");
        assert!(response.tool_calls().is_empty());
    }

    #[test]
    fn core_errors_convert_into_adapter_errors() {
        let err: AdapterError = fnwrap_primitives::Error::NotRegistered {
            name: "missing".into(),
        }
        .into();
        assert!(matches!(err, AdapterError::Tool { .. }));
        assert!(err.to_string().contains("missing"));
    }
}
