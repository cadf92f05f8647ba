//! LLM chat seam and the OpenAI-backed implementation.

use crate::error::{PrataError, Result};
use async_openai::config::OpenAIConfig;
use async_openai::types::{
    ChatCompletionMessageToolCall, ChatCompletionRequestAssistantMessageArgs,
    ChatCompletionRequestMessage, ChatCompletionRequestSystemMessageArgs,
    ChatCompletionRequestToolMessageArgs, ChatCompletionRequestUserMessageArgs,
    ChatCompletionTool, ChatCompletionToolType, CreateChatCompletionRequestArgs, FunctionCall,
};
use async_openai::Client;
use async_trait::async_trait;
use std::time::Duration;

/// Default timeout for LLM API requests (5 minutes).
const DEFAULT_TIMEOUT_SECS: u64 = 300;

/// Role of a conversation message.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChatRole {
    System,
    User,
    Assistant,
    Tool,
}

/// One message in a reply conversation.
#[derive(Debug, Clone)]
pub struct ChatMessage {
    pub role: ChatRole,
    pub content: String,
    /// Set on `Tool` messages: which call this is the result of.
    pub tool_call_id: Option<String>,
    /// Set on `Assistant` messages that requested tool calls.
    pub tool_calls: Vec<ToolInvocation>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::System,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::User,
            content: content.into(),
            tool_call_id: None,
            tool_calls: Vec::new(),
        }
    }

    pub fn assistant_tool_calls(calls: Vec<ToolInvocation>) -> Self {
        Self {
            role: ChatRole::Assistant,
            content: String::new(),
            tool_call_id: None,
            tool_calls: calls,
        }
    }

    pub fn tool(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: ChatRole::Tool,
            content: content.into(),
            tool_call_id: Some(call_id.into()),
            tool_calls: Vec::new(),
        }
    }
}

/// A tool call requested by the model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub id: String,
    pub name: String,
    pub arguments: String,
}

/// One model turn: final text, tool call requests, or both.
#[derive(Debug, Clone, Default)]
pub struct ChatOutcome {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolInvocation>,
}

/// Seam over the LLM provider so sessions are testable offline.
#[async_trait]
pub trait ChatModel: Send + Sync {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ChatOutcome>;
}

/// Production chat model backed by the OpenAI API.
pub struct OpenAiChatModel {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiChatModel {
    /// Create a model handle with the default request timeout.
    pub fn new(model: &str) -> Self {
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            client: Client::with_config(OpenAIConfig::default()).with_http_client(http_client),
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(
        &self,
        messages: &[ChatMessage],
        tools: &[ChatCompletionTool],
    ) -> Result<ChatOutcome> {
        let mut request_messages: Vec<ChatCompletionRequestMessage> =
            Vec::with_capacity(messages.len());

        for message in messages {
            let converted: ChatCompletionRequestMessage = match message.role {
                ChatRole::System => ChatCompletionRequestSystemMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| PrataError::OpenAI(e.to_string()))?
                    .into(),
                ChatRole::User => ChatCompletionRequestUserMessageArgs::default()
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| PrataError::OpenAI(e.to_string()))?
                    .into(),
                ChatRole::Assistant => {
                    let mut builder = ChatCompletionRequestAssistantMessageArgs::default();
                    if !message.content.is_empty() {
                        builder.content(message.content.clone());
                    }
                    if !message.tool_calls.is_empty() {
                        let calls: Vec<ChatCompletionMessageToolCall> = message
                            .tool_calls
                            .iter()
                            .map(|c| ChatCompletionMessageToolCall {
                                id: c.id.clone(),
                                r#type: ChatCompletionToolType::Function,
                                function: FunctionCall {
                                    name: c.name.clone(),
                                    arguments: c.arguments.clone(),
                                },
                            })
                            .collect();
                        builder.tool_calls(calls);
                    }
                    builder
                        .build()
                        .map_err(|e| PrataError::OpenAI(e.to_string()))?
                        .into()
                }
                ChatRole::Tool => ChatCompletionRequestToolMessageArgs::default()
                    .tool_call_id(message.tool_call_id.clone().unwrap_or_default())
                    .content(message.content.clone())
                    .build()
                    .map_err(|e| PrataError::OpenAI(e.to_string()))?
                    .into(),
            };
            request_messages.push(converted);
        }

        let mut request = CreateChatCompletionRequestArgs::default();
        request.model(&self.model).messages(request_messages);
        if !tools.is_empty() {
            request.tools(tools.to_vec());
        }
        let request = request
            .build()
            .map_err(|e| PrataError::OpenAI(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e| PrataError::OpenAI(e.to_string()))?;

        let choice = response
            .choices
            .first()
            .ok_or_else(|| PrataError::OpenAI("No response from model".to_string()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .iter()
            .flatten()
            .map(|tc| ToolInvocation {
                id: tc.id.clone(),
                name: tc.function.name.clone(),
                arguments: tc.function.arguments.clone(),
            })
            .collect();

        Ok(ChatOutcome {
            content: choice.message.content.clone(),
            tool_calls,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_message_constructors() {
        let system = ChatMessage::system("rules");
        assert_eq!(system.role, ChatRole::System);
        assert!(system.tool_calls.is_empty());

        let tool = ChatMessage::tool("call_1", "result");
        assert_eq!(tool.role, ChatRole::Tool);
        assert_eq!(tool.tool_call_id.as_deref(), Some("call_1"));
    }

    #[test]
    fn test_assistant_tool_calls_message() {
        let msg = ChatMessage::assistant_tool_calls(vec![ToolInvocation {
            id: "call_1".to_string(),
            name: "get_weather".to_string(),
            arguments: r#"{"city":"Oslo"}"#.to_string(),
        }]);
        assert_eq!(msg.role, ChatRole::Assistant);
        assert_eq!(msg.tool_calls.len(), 1);
        assert!(msg.content.is_empty());
    }
}
