//! Per-job entrypoint and the worker run loop.
//!
//! The hosting framework assigns one job per room conversation. The
//! entrypoint is strictly sequential: connect, build the session, start
//! it, then issue exactly one generated reply carrying the fixed
//! session-opening instructions. Turn-taking after that happens inside
//! the framework's own loop.

use crate::agent::{
    AgentSession, Assistant, ChatModel, OpenAiChatModel, RealtimeModelOptions, RoomInputOptions,
    Vad,
};
use crate::config::{Settings, SESSION_INSTRUCTIONS};
use crate::error::Result;
use crate::room::{JobContext, WsJobContext};
use std::sync::Arc;
use tracing::{debug, info};

/// Options for a worker invocation.
pub struct WorkerOptions {
    pub settings: Settings,
    /// Framework WebSocket URL.
    pub url: String,
    /// Room access token.
    pub token: String,
    /// Room to join.
    pub room: String,
}

/// Handle one job end-to-end.
///
/// Connect failure returns before any session construction; the caller
/// owns retries and cancellation.
pub async fn entrypoint(
    ctx: &dyn JobContext,
    settings: &Settings,
    chat: Arc<dyn ChatModel>,
) -> Result<()> {
    ctx.connect().await?;

    let vad = Vad::load().await?;
    let session = AgentSession::new(
        RealtimeModelOptions::from_settings(&settings.agent),
        vad,
        chat,
    )
    .with_max_reply_iterations(settings.agent.max_reply_iterations);

    let active = session
        .start(
            ctx.room(),
            Assistant::new(settings),
            RoomInputOptions::from_settings(&settings.session),
        )
        .await?;

    let greeting = active.generate_reply(SESSION_INSTRUCTIONS).await?;
    debug!(room = %ctx.room().name(), %greeting, "session opened");

    Ok(())
}

/// Run the worker: build the production context and chat model, then
/// drive the entrypoint for the assigned room.
pub async fn run(options: WorkerOptions) -> Result<()> {
    info!(url = %options.url, room = %options.room, "worker starting");

    let ctx = WsJobContext::new(&options.url, &options.token, &options.room)?;
    let chat: Arc<dyn ChatModel> = Arc::new(OpenAiChatModel::new(&options.settings.agent.model));

    entrypoint(&ctx, &options.settings, chat).await?;

    info!(room = %options.room, "job complete");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::agent::{ChatMessage, ChatOutcome, ChatRole};
    use crate::error::PrataError;
    use crate::room::Room;
    use async_openai::types::ChatCompletionTool;
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct MockContext {
        room: Room,
        fail_connect: bool,
    }

    impl MockContext {
        fn new(fail_connect: bool) -> Self {
            Self {
                room: Room::new("test-room"),
                fail_connect,
            }
        }
    }

    #[async_trait]
    impl JobContext for MockContext {
        async fn connect(&self) -> Result<()> {
            if self.fail_connect {
                Err(PrataError::Connection("refused".to_string()))
            } else {
                Ok(())
            }
        }

        fn room(&self) -> &Room {
            &self.room
        }
    }

    /// Records every completion request; always answers with plain text.
    struct RecordingModel {
        requests: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl RecordingModel {
        fn new() -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for RecordingModel {
        async fn complete(
            &self,
            messages: &[ChatMessage],
            _tools: &[ChatCompletionTool],
        ) -> Result<ChatOutcome> {
            self.requests.lock().unwrap().push(messages.to_vec());
            Ok(ChatOutcome {
                content: Some("Hi, I'm Prata!".to_string()),
                tool_calls: vec![],
            })
        }
    }

    #[tokio::test]
    async fn test_failed_connect_skips_session_construction() {
        let ctx = MockContext::new(true);
        let model = Arc::new(RecordingModel::new());
        let settings = Settings::default();

        let result = entrypoint(&ctx, &settings, model.clone()).await;

        assert!(matches!(result, Err(PrataError::Connection(_))));
        assert!(model.requests.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_successful_job_issues_one_opening_reply() {
        let ctx = MockContext::new(false);
        let model = Arc::new(RecordingModel::new());
        let settings = Settings::default();

        entrypoint(&ctx, &settings, model.clone()).await.unwrap();

        let requests = model.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);

        let opening = requests[0]
            .iter()
            .find(|m| m.role == ChatRole::User)
            .expect("user message present");
        assert_eq!(opening.content, SESSION_INSTRUCTIONS);

        let system = requests[0]
            .iter()
            .find(|m| m.role == ChatRole::System)
            .expect("system message present");
        assert_eq!(system.content, crate::config::AGENT_INSTRUCTIONS);
    }
}
