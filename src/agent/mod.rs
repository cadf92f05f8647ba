//! Assistant definition and session glue.
//!
//! Binds the fixed instruction texts and tool set to a realtime session
//! configuration, and drives the tool-calling reply loop through the
//! `ChatModel` seam.

mod assistant;
mod chat;
mod session;

pub use assistant::Assistant;
pub use chat::{ChatMessage, ChatModel, ChatOutcome, ChatRole, OpenAiChatModel, ToolInvocation};
pub use session::{
    ActiveSession, AgentSession, NoiseCancellation, RealtimeModelOptions, RoomInputOptions, Vad,
};
