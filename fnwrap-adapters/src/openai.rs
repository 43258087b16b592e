//! Chat-completions wire codec.
//!
//! Encodes a [`CompletionRequest`] into the body expected by
//! OpenAI-compatible `/v1/chat/completions` endpoints and decodes their
//! replies, including requested tool calls. Transport is left to the caller.

use std::fmt;

use fnwrap_config::{CompletionConfig, OPENAI_API_KEY_ENV, ToolChoice};
use fnwrap_tools::{ToolKind, WireTool};
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::traits::{
    AdapterError, AdapterMetadata, AdapterResult, ChatMessage, CompletionRequest,
    CompletionResponse, MessageRole, ToolCallRequest,
};

/// Encoder/decoder bound to one configured model.
#[derive(Clone)]
pub struct OpenAiCodec {
    metadata: AdapterMetadata,
    endpoint: String,
    api_key: Option<String>,
    tool_choice: ToolChoice,
}

impl fmt::Debug for OpenAiCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OpenAiCodec")
            .field("metadata", &self.metadata)
            .field("endpoint", &self.endpoint)
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("tool_choice", &self.tool_choice)
            .finish()
    }
}

impl OpenAiCodec {
    /// Creates a codec from the supplied configuration.
    #[must_use]
    pub fn new(config: &CompletionConfig) -> Self {
        Self {
            metadata: AdapterMetadata::new("openai", config.model()),
            endpoint: format!("{}v1/chat/completions", config.base_url()),
            api_key: config.api_key().map(str::to_owned),
            tool_choice: config.tool_choice(),
        }
    }

    /// Returns the `Authorization` header value for requests.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Configuration`] if no API key is configured.
    pub fn authorization(&self) -> AdapterResult<String> {
        let key = self.api_key.as_deref().ok_or_else(|| {
            AdapterError::configuration(format!(
                "OpenAI requests require an API key; set {OPENAI_API_KEY_ENV}"
            ))
        })?;
        Ok(format!("Bearer {key}"))
    }

    /// Returns the adapter metadata.
    #[must_use]
    pub fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    /// Returns the chat-completions endpoint URL.
    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Encodes `request` as a JSON request body.
    ///
    /// The request's own tool choice wins unless it is the default `auto`,
    /// in which case the configured policy applies.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::InvalidRequest`] if encoding fails.
    pub fn encode(&self, request: &CompletionRequest) -> AdapterResult<Vec<u8>> {
        let body = self.build_request(request);
        serde_json::to_vec(&body).map_err(|err| {
            AdapterError::invalid_request(format!("failed to encode OpenAI request: {err}"))
        })
    }

    /// Decodes a chat-completions response body.
    ///
    /// # Errors
    ///
    /// Returns [`AdapterError::Response`] if the body is not a valid response
    /// or carries no message.
    pub fn decode(&self, body: &[u8]) -> AdapterResult<CompletionResponse> {
        let response: ChatCompletionResponse = serde_json::from_slice(body).map_err(|err| {
            AdapterError::response(format!("failed to decode OpenAI response: {err}"))
        })?;

        let message = response
            .choices
            .into_iter()
            .find_map(|choice| choice.message)
            .ok_or_else(|| AdapterError::response("OpenAI response contained no message"))?;

        let tool_calls: Vec<ToolCallRequest> = message
            .tool_calls
            .into_iter()
            .map(|call| ToolCallRequest::new(call.id, call.function.name, call.function.arguments))
            .collect();

        debug!(
            model = %self.metadata.model(),
            tool_calls = tool_calls.len(),
            "decoded completion response"
        );

        Ok(CompletionResponse::new(
            ChatMessage::assistant(message.content.unwrap_or_default()).with_tool_calls(tool_calls),
        ))
    }

    fn build_request(&self, request: &CompletionRequest) -> ChatCompletionRequest {
        let tool_choice = match request.tool_choice() {
            ToolChoice::Auto => self.tool_choice,
            explicit => explicit,
        };
        let tools = request.tools().to_vec();

        ChatCompletionRequest {
            model: self.metadata.model().to_owned(),
            messages: request.messages().iter().map(map_message).collect(),
            tool_choice: (!tools.is_empty()).then_some(tool_choice),
            tools,
        }
    }
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<OpenAiMessage>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tools: Vec<WireTool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<ToolChoice>,
}

#[derive(Debug, Serialize)]
struct OpenAiMessage {
    role: MessageRole,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    tool_calls: Vec<OpenAiToolCall>,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiToolCall {
    id: String,
    #[serde(rename = "type", default)]
    kind: ToolKind,
    function: OpenAiFunctionCall,
}

#[derive(Debug, Serialize, Deserialize)]
struct OpenAiFunctionCall {
    name: String,
    #[serde(default)]
    arguments: String,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    #[serde(default)]
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<OpenAiToolCall>,
}

fn map_message(message: &ChatMessage) -> OpenAiMessage {
    let tool_calls: Vec<OpenAiToolCall> = message
        .tool_calls()
        .iter()
        .map(|call| OpenAiToolCall {
            id: call.id.clone(),
            kind: ToolKind::Function,
            function: OpenAiFunctionCall {
                name: call.name.clone(),
                arguments: call.arguments.clone(),
            },
        })
        .collect();

    // Assistant turns that only request tools carry no content.
    let content = if message.content().is_empty() && !tool_calls.is_empty() {
        None
    } else {
        Some(message.content().to_owned())
    };

    OpenAiMessage {
        role: message.role(),
        content,
        name: message.name().map(str::to_owned),
        tool_call_id: message.tool_call_id().map(str::to_owned),
        tool_calls,
    }
}
