//! Assistant definition: fixed instructions bound to a tool set.

use crate::config::{Settings, AGENT_INSTRUCTIONS};
use crate::tools::{EmailTool, SearchTool, ToolRegistry, WeatherTool};
use std::sync::Arc;

/// The capability object a session drives: instruction text plus the
/// ordered set of tools the LLM may call. Immutable after construction.
pub struct Assistant {
    instructions: String,
    tools: ToolRegistry,
}

impl Assistant {
    /// Build the stock assistant: weather, web search, and email, in
    /// that order, bound to the fixed agent instructions.
    pub fn new(settings: &Settings) -> Self {
        let mut tools = ToolRegistry::new();
        tools.register(Arc::new(WeatherTool::new(&settings.weather)));
        tools.register(Arc::new(SearchTool::new(&settings.search)));
        tools.register(Arc::new(EmailTool::new(settings.email.clone())));

        Self::with_registry(AGENT_INSTRUCTIONS, tools)
    }

    /// Build an assistant with an arbitrary tool set. An empty registry
    /// is legal; the assistant then answers without tools.
    pub fn with_registry(instructions: impl Into<String>, tools: ToolRegistry) -> Self {
        Self {
            instructions: instructions.into(),
            tools,
        }
    }

    pub fn instructions(&self) -> &str {
        &self.instructions
    }

    pub fn tools(&self) -> &ToolRegistry {
        &self.tools
    }
}
