//! Offline stand-in for a chat-completions model.
//!
//! On the first turn it asks for one call per (advertised tool, mentioned
//! city) pair. Once tool results are in the conversation it summarises them.

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use fnwrap::adapters::traits::{
    AdapterMetadata, AdapterResult, ChatMessage, CompletionRequest, CompletionResponse,
    CompletionService, MessageRole, ToolCallRequest,
};
use serde_json::json;

const CITIES: [&str; 3] = ["San Francisco", "Tokyo", "Paris"];

pub struct ScriptedModel {
    metadata: AdapterMetadata,
    next_call: AtomicUsize,
}

impl ScriptedModel {
    pub fn new(model: &str) -> Self {
        Self {
            metadata: AdapterMetadata::new("scripted", model),
            next_call: AtomicUsize::new(0),
        }
    }

    fn plan_calls(&self, request: &CompletionRequest) -> Vec<ToolCallRequest> {
        let Some(prompt) = request
            .messages()
            .iter()
            .rev()
            .find(|message| message.role() == MessageRole::User)
            .map(|message| message.content().to_lowercase())
        else {
            return Vec::new();
        };

        let mut calls = Vec::new();
        for tool in request.tools() {
            let topic = tool.function.name.trim_start_matches("get_current_");
            if !prompt.contains(topic) {
                continue;
            }
            for city in CITIES
                .iter()
                .filter(|city| prompt.contains(&city.to_lowercase()))
            {
                let id = self.next_call.fetch_add(1, Ordering::SeqCst);
                calls.push(ToolCallRequest::new(
                    format!("call_{id}"),
                    tool.function.name.clone(),
                    json!({ "location": city }).to_string(),
                ));
            }
        }
        calls
    }
}

#[async_trait]
impl CompletionService for ScriptedModel {
    fn metadata(&self) -> &AdapterMetadata {
        &self.metadata
    }

    async fn complete(&self, request: CompletionRequest) -> AdapterResult<CompletionResponse> {
        let answered = request
            .messages()
            .iter()
            .any(|message| message.role() == MessageRole::Tool);

        if !answered {
            let calls = self.plan_calls(&request);
            if !calls.is_empty() {
                return Ok(CompletionResponse::new(
                    ChatMessage::assistant("").with_tool_calls(calls),
                ));
            }
        }

        let findings: Vec<String> = request
            .messages()
            .iter()
            .filter(|message| message.role() == MessageRole::Tool)
            .map(|message| format!("{}: {}", message.name().unwrap_or("tool"), message.content()))
            .collect();

        let reply = if findings.is_empty() {
            "I can only help with the weather and the time.".to_owned()
        } else {
            findings.join("\n")
        };
        Ok(CompletionResponse::new(ChatMessage::assistant(reply)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fnwrap::tools::{ToolKind, WireFunction, WireParameters, WireTool};
    use fnwrap::primitives::SchemaType;

    fn tool(name: &str) -> WireTool {
        WireTool {
            kind: ToolKind::Function,
            function: WireFunction {
                name: name.into(),
                description: String::new(),
                parameters: WireParameters {
                    kind: SchemaType::Object,
                    properties: Default::default(),
                    required: Vec::new(),
                },
            },
        }
    }

    #[tokio::test]
    async fn requests_one_call_per_city_and_topic() {
        let model = ScriptedModel::new("scripted-1");
        let request = CompletionRequest::new(vec![ChatMessage::user(
            "What's the weather like in Tokyo and Paris?",
        )])
        .unwrap()
        .with_tools(vec![tool("get_current_weather"), tool("get_current_time")]);

        let response = model.complete(request).await.unwrap();
        let names: Vec<&str> = response
            .tool_calls()
            .iter()
            .map(|call| call.name.as_str())
            .collect();
        assert_eq!(names, ["get_current_weather", "get_current_weather"]);
        assert_eq!(response.tool_calls()[1].arguments, r#"{"location":"Paris"}"#);
    }

    #[tokio::test]
    async fn summarises_tool_results() {
        let model = ScriptedModel::new("scripted-1");
        let request = CompletionRequest::new(vec![
            ChatMessage::user("time in Paris?"),
            ChatMessage::tool("call_0", "get_current_time", "9:00 PM"),
        ])
        .unwrap();

        let response = model.complete(request).await.unwrap();
        assert!(response.tool_calls().is_empty());
        assert_eq!(response.message().content(), "get_current_time: 9:00 PM");
    }
}
