//! Agent session construction and the reply loop.
//!
//! A session is built once per job from the realtime model options, a
//! VAD handle, and a chat model, then started against a connected room.
//! Turn-taking and audio transport run inside the hosting framework; this
//! module owns the tool-calling reply loop the session drives.

use super::assistant::Assistant;
use super::chat::{ChatMessage, ChatModel};
use crate::config::{AgentSettings, SessionSettings};
use crate::error::{PrataError, Result};
use crate::room::Room;
use std::str::FromStr;
use std::sync::Arc;
use tracing::{debug, info, warn};

/// Realtime LLM selection: model variant plus spoken voice.
#[derive(Debug, Clone)]
pub struct RealtimeModelOptions {
    pub model: String,
    pub voice: String,
}

impl RealtimeModelOptions {
    pub fn from_settings(settings: &AgentSettings) -> Self {
        Self {
            model: settings.model.clone(),
            voice: settings.voice.clone(),
        }
    }
}

impl Default for RealtimeModelOptions {
    fn default() -> Self {
        Self::from_settings(&AgentSettings::default())
    }
}

/// Handle to the externally provided voice activity detector.
///
/// The inference engine lives in the hosting framework; this handle only
/// carries the detector configuration handed over at session start.
#[derive(Debug, Clone)]
pub struct Vad {
    pub activation_threshold: f32,
}

impl Vad {
    /// Load the detector. Async because the framework may fetch model
    /// weights on first use.
    pub async fn load() -> Result<Self> {
        debug!("loading voice activity detector");
        Ok(Self {
            activation_threshold: 0.5,
        })
    }
}

/// Noise cancellation algorithm selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum NoiseCancellation {
    /// Background voice cancellation.
    #[default]
    Bvc,
    Off,
}

impl FromStr for NoiseCancellation {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "bvc" => Ok(NoiseCancellation::Bvc),
            "off" | "none" => Ok(NoiseCancellation::Off),
            _ => Err(format!("Unknown noise cancellation algorithm: {}", s)),
        }
    }
}

impl std::fmt::Display for NoiseCancellation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            NoiseCancellation::Bvc => write!(f, "bvc"),
            NoiseCancellation::Off => write!(f, "off"),
        }
    }
}

/// Room input flags handed to the framework at session start.
#[derive(Debug, Clone)]
pub struct RoomInputOptions {
    pub video_enabled: bool,
    pub noise_cancellation: NoiseCancellation,
}

impl Default for RoomInputOptions {
    fn default() -> Self {
        Self {
            video_enabled: true,
            noise_cancellation: NoiseCancellation::Bvc,
        }
    }
}

impl RoomInputOptions {
    pub fn from_settings(settings: &SessionSettings) -> Self {
        let noise_cancellation = settings
            .noise_cancellation
            .parse()
            .unwrap_or_else(|e: String| {
                warn!("{}; falling back to bvc", e);
                NoiseCancellation::Bvc
            });

        Self {
            video_enabled: settings.video_enabled,
            noise_cancellation,
        }
    }
}

/// A configured, not-yet-started session. One per job.
pub struct AgentSession {
    llm: RealtimeModelOptions,
    vad: Vad,
    chat: Arc<dyn ChatModel>,
    max_reply_iterations: usize,
}

impl AgentSession {
    pub fn new(llm: RealtimeModelOptions, vad: Vad, chat: Arc<dyn ChatModel>) -> Self {
        Self {
            llm,
            vad,
            chat,
            max_reply_iterations: 8,
        }
    }

    /// Cap the number of LLM round-trips per generated reply.
    pub fn with_max_reply_iterations(mut self, max: usize) -> Self {
        self.max_reply_iterations = max;
        self
    }

    /// Bind the session to a connected room and hand control of audio
    /// I/O to the framework.
    pub async fn start(
        self,
        room: &Room,
        assistant: Assistant,
        options: RoomInputOptions,
    ) -> Result<ActiveSession> {
        info!(
            room = %room.name(),
            model = %self.llm.model,
            voice = %self.llm.voice,
            vad_threshold = self.vad.activation_threshold,
            video = options.video_enabled,
            noise_cancellation = %options.noise_cancellation,
            "starting agent session"
        );

        Ok(ActiveSession {
            chat: self.chat,
            assistant,
            max_reply_iterations: self.max_reply_iterations,
        })
    }
}

/// A started session able to generate replies.
pub struct ActiveSession {
    chat: Arc<dyn ChatModel>,
    assistant: Assistant,
    max_reply_iterations: usize,
}

impl ActiveSession {
    /// Generate one reply carrying the given instructions, consulting
    /// tools as the model requests them. Tool failures are fed back as
    /// data; only provider errors and the iteration cap abort.
    pub async fn generate_reply(&self, instructions: &str) -> Result<String> {
        let mut messages = vec![
            ChatMessage::system(self.assistant.instructions()),
            ChatMessage::user(instructions),
        ];
        let definitions = self.assistant.tools().definitions();

        let mut iterations = 0;
        loop {
            iterations += 1;
            if iterations > self.max_reply_iterations {
                return Err(PrataError::Session(format!(
                    "reply exceeded maximum iterations ({})",
                    self.max_reply_iterations
                )));
            }

            debug!("reply iteration {}", iterations);
            let outcome = self.chat.complete(&messages, &definitions).await?;

            if outcome.tool_calls.is_empty() {
                return Ok(outcome.content.unwrap_or_default());
            }

            messages.push(ChatMessage::assistant_tool_calls(outcome.tool_calls.clone()));

            for call in &outcome.tool_calls {
                let output = self
                    .assistant
                    .tools()
                    .dispatch(&call.name, &call.arguments)
                    .await;
                info!(
                    tool = %call.name,
                    failed = output.is_error(),
                    "tool call completed"
                );
                messages.push(ChatMessage::tool(call.id.clone(), output.text()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::chat::{ChatOutcome, ChatRole, ToolInvocation};
    use crate::tools::{Tool, ToolOutput, ToolRegistry};
    use async_openai::types::ChatCompletionTool;
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Chat model that replays scripted outcomes and records requests.
    struct ScriptedModel {
        script: Mutex<Vec<ChatOutcome>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedModel {
        fn new(script: Vec<ChatOutcome>) -> Self {
            Self {
                script: Mutex::new(script),
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _tools: &[ChatCompletionTool],
        ) -> Result<ChatOutcome> {
            self.seen.lock().unwrap().push(messages.to_vec());
            let mut script = self.script.lock().unwrap();
            if script.is_empty() {
                return Ok(ChatOutcome {
                    content: Some("done".to_string()),
                    tool_calls: vec![],
                });
            }
            Ok(script.remove(0))
        }
    }

    struct FlakyTool;

    #[async_trait]
    impl Tool for FlakyTool {
        fn name(&self) -> &'static str {
            "flaky"
        }

        fn description(&self) -> &'static str {
            "Always fails"
        }

        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({ "type": "object", "properties": {} })
        }

        async fn call(&self, _args: serde_json::Value) -> ToolOutput {
            ToolOutput::error("upstream unavailable")
        }
    }

    fn session_with(script: Vec<ChatOutcome>, registry: ToolRegistry) -> ActiveSession {
        ActiveSession {
            chat: Arc::new(ScriptedModel::new(script)),
            assistant: Assistant::with_registry("test instructions", registry),
            max_reply_iterations: 4,
        }
    }

    #[tokio::test]
    async fn test_reply_without_tool_calls_returns_content() {
        let session = session_with(
            vec![ChatOutcome {
                content: Some("Hello there!".to_string()),
                tool_calls: vec![],
            }],
            ToolRegistry::new(),
        );

        let reply = session.generate_reply("greet").await.unwrap();
        assert_eq!(reply, "Hello there!");
    }

    #[tokio::test]
    async fn test_tool_failure_is_fed_back_as_data() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FlakyTool));

        let model = Arc::new(ScriptedModel::new(vec![
            ChatOutcome {
                content: None,
                tool_calls: vec![ToolInvocation {
                    id: "call_1".to_string(),
                    name: "flaky".to_string(),
                    arguments: "{}".to_string(),
                }],
            },
            ChatOutcome {
                content: Some("Sorry, that service is down.".to_string()),
                tool_calls: vec![],
            },
        ]));

        let session = ActiveSession {
            chat: model.clone(),
            assistant: Assistant::with_registry("test", registry),
            max_reply_iterations: 4,
        };

        let reply = session.generate_reply("check the thing").await.unwrap();
        assert_eq!(reply, "Sorry, that service is down.");

        // Second request must carry the tool failure as a tool message.
        let seen = model.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        let tool_msg = seen[1]
            .iter()
            .find(|m| m.role == ChatRole::Tool)
            .expect("tool message present");
        assert_eq!(tool_msg.content, "upstream unavailable");
        assert_eq!(tool_msg.tool_call_id.as_deref(), Some("call_1"));
    }

    #[tokio::test]
    async fn test_reply_loop_stops_at_iteration_cap() {
        let mut registry = ToolRegistry::new();
        registry.register(Arc::new(FlakyTool));

        // Model that always asks for another tool call.
        let endless: Vec<ChatOutcome> = (0..10)
            .map(|i| ChatOutcome {
                content: None,
                tool_calls: vec![ToolInvocation {
                    id: format!("call_{}", i),
                    name: "flaky".to_string(),
                    arguments: "{}".to_string(),
                }],
            })
            .collect();

        let session = session_with(endless, registry);
        let err = session.generate_reply("loop").await.unwrap_err();
        assert!(err.to_string().contains("maximum iterations"));
    }

    #[test]
    fn test_noise_cancellation_parsing() {
        assert_eq!("bvc".parse(), Ok(NoiseCancellation::Bvc));
        assert_eq!("OFF".parse(), Ok(NoiseCancellation::Off));
        assert!("unknown".parse::<NoiseCancellation>().is_err());
    }

    #[test]
    fn test_room_input_options_fall_back_on_bad_setting() {
        let options = RoomInputOptions::from_settings(&SessionSettings {
            video_enabled: false,
            noise_cancellation: "garbage".to_string(),
        });
        assert!(!options.video_enabled);
        assert_eq!(options.noise_cancellation, NoiseCancellation::Bvc);
    }
}
