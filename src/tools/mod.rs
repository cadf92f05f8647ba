//! Tool definitions and dispatch for the assistant.
//!
//! A tool is one external call the LLM may invoke mid-conversation.
//! Failures are returned as data, never raised: the model narrates them
//! to the user instead of the session aborting. Tools must be safe for
//! the model to retry.

mod email;
mod search;
mod weather;

pub use email::EmailTool;
pub use search::SearchTool;
pub use weather::WeatherTool;

use async_openai::types::{ChatCompletionTool, ChatCompletionToolType, FunctionObject};
use async_trait::async_trait;
use std::sync::Arc;

/// A callable capability exposed to the LLM.
#[async_trait]
pub trait Tool: Send + Sync {
    /// Name the LLM invokes the tool by.
    fn name(&self) -> &'static str;

    /// Description shown to the LLM when deciding whether to call.
    fn description(&self) -> &'static str;

    /// JSON schema for the tool's parameters.
    fn parameters(&self) -> serde_json::Value;

    /// Perform the call. Failures come back as `ToolOutput::Error`.
    async fn call(&self, args: serde_json::Value) -> ToolOutput;
}

/// Result of a tool call, success or describable failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ToolOutput {
    Success(String),
    Error(String),
}

impl ToolOutput {
    pub fn success(msg: impl Into<String>) -> Self {
        ToolOutput::Success(msg.into())
    }

    pub fn error(msg: impl Into<String>) -> Self {
        ToolOutput::Error(msg.into())
    }

    /// Text fed back to the LLM regardless of outcome.
    pub fn text(&self) -> &str {
        match self {
            ToolOutput::Success(s) | ToolOutput::Error(s) => s,
        }
    }

    pub fn is_error(&self) -> bool {
        matches!(self, ToolOutput::Error(_))
    }
}

/// Ordered table of tools, keyed by name.
///
/// Iteration and definition export preserve registration order. The
/// empty registry is a supported degenerate case.
#[derive(Default, Clone)]
pub struct ToolRegistry {
    tools: Vec<Arc<dyn Tool>>,
}

impl ToolRegistry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a tool. Order of registration is preserved.
    pub fn register(&mut self, tool: Arc<dyn Tool>) {
        self.tools.push(tool);
    }

    /// Look up a tool by name.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn Tool>> {
        self.tools.iter().find(|t| t.name() == name)
    }

    /// Tool names in registration order.
    pub fn names(&self) -> Vec<&'static str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.tools.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tools.is_empty()
    }

    /// Export OpenAI function definitions for all registered tools.
    pub fn definitions(&self) -> Vec<ChatCompletionTool> {
        self.tools
            .iter()
            .map(|t| ChatCompletionTool {
                r#type: ChatCompletionToolType::Function,
                function: FunctionObject {
                    name: t.name().to_string(),
                    description: Some(t.description().to_string()),
                    parameters: Some(t.parameters()),
                    strict: None,
                },
            })
            .collect()
    }

    /// Parse raw JSON arguments and invoke the named tool.
    ///
    /// Unknown names and malformed argument JSON become `ToolOutput::Error`
    /// so the model can recover.
    pub async fn dispatch(&self, name: &str, raw_args: &str) -> ToolOutput {
        let Some(tool) = self.get(name) else {
            return ToolOutput::error(format!("Unknown tool: {}", name));
        };

        let raw = if raw_args.trim().is_empty() {
            "{}"
        } else {
            raw_args
        };
        let args: serde_json::Value = match serde_json::from_str(raw) {
            Ok(v) => v,
            Err(e) => return ToolOutput::error(format!("Invalid tool arguments: {}", e)),
        };

        tool.call(args).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct EchoTool {
        name: &'static str,
    }

    #[async_trait]
    impl Tool for EchoTool {
        fn name(&self) -> &'static str {
            self.name
        }

        fn description(&self) -> &'static str {
            "Echo the input back"
        }

        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({
                "type": "object",
                "properties": {
                    "text": { "type": "string" }
                },
                "required": ["text"]
            })
        }

        async fn call(&self, args: serde_json::Value) -> ToolOutput {
            match args["text"].as_str() {
                Some(text) => ToolOutput::success(text),
                None => ToolOutput::error("Missing 'text' argument"),
            }
        }
    }

    #[test]
    fn test_registry_preserves_order() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "first" }));
        registry.register(Arc::new(EchoTool { name: "second" }));
        registry.register(Arc::new(EchoTool { name: "third" }));

        assert_eq!(registry.names(), vec!["first", "second", "third"]);
        let defs = registry.definitions();
        assert_eq!(defs.len(), 3);
        assert_eq!(defs[0].function.name, "first");
        assert_eq!(defs[2].function.name, "third");
    }

    #[test]
    fn test_empty_registry_is_legal() {
        let registry = ToolRegistry::new();
        assert!(registry.is_empty());
        assert!(registry.definitions().is_empty());
    }

    #[tokio::test]
    async fn test_dispatch_unknown_tool_is_error_output() {
        let registry = ToolRegistry::new();
        let output = registry.dispatch("missing", "{}").await;
        assert!(output.is_error());
        assert!(output.text().contains("Unknown tool"));
    }

    #[tokio::test]
    async fn test_dispatch_malformed_arguments_is_error_output() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "echo" }));
        let output = registry.dispatch("echo", "{not json").await;
        assert!(output.is_error());
        assert!(output.text().contains("Invalid tool arguments"));
    }

    #[tokio::test]
    async fn test_dispatch_empty_arguments_treated_as_object() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "echo" }));
        let output = registry.dispatch("echo", "").await;
        // Reaches the tool, which reports its own missing argument.
        assert_eq!(output, ToolOutput::error("Missing 'text' argument"));
    }

    #[tokio::test]
    async fn test_dispatch_invokes_tool() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(EchoTool { name: "echo" }));
        let output = registry.dispatch("echo", r#"{"text": "hello"}"#).await;
        assert_eq!(output, ToolOutput::success("hello"));
    }
}
