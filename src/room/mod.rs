//! Room connection seam for the hosting framework.
//!
//! A job hands the entrypoint an opaque context; the entrypoint calls
//! exactly one operation on it (connect) and reads one attribute (the
//! room). Everything else about the transport belongs to the framework.

use crate::error::{PrataError, Result};
use async_trait::async_trait;
use tokio::net::TcpStream;
use tokio::sync::Mutex;
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use tracing::{debug, info};
use url::Url;

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;

/// The framework's realtime communication channel, reduced to what this
/// crate touches.
#[derive(Debug, Clone)]
pub struct Room {
    name: String,
}

impl Room {
    pub fn new(name: impl Into<String>) -> Self {
        Self { name: name.into() }
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

/// Per-job handle supplied by the hosting framework.
///
/// Connect failure is fatal to the job and propagates to the framework's
/// own retry handling.
#[async_trait]
pub trait JobContext: Send + Sync {
    /// Connect to the room. Must complete before any session work.
    async fn connect(&self) -> Result<()>;

    /// The room this job is assigned to.
    fn room(&self) -> &Room;
}

/// Production job context connecting over the framework's WebSocket
/// endpoint. Holds the socket for the life of the job; teardown is the
/// framework's concern.
pub struct WsJobContext {
    url: Url,
    token: String,
    room: Room,
    socket: Mutex<Option<WsStream>>,
}

impl WsJobContext {
    pub fn new(url: &str, token: &str, room_name: &str) -> Result<Self> {
        let url = Url::parse(url)
            .map_err(|e| PrataError::Connection(format!("invalid room URL '{}': {}", url, e)))?;

        Ok(Self {
            url,
            token: token.to_string(),
            room: Room::new(room_name),
            socket: Mutex::new(None),
        })
    }
}

#[async_trait]
impl JobContext for WsJobContext {
    async fn connect(&self) -> Result<()> {
        let mut url = self.url.clone();
        url.query_pairs_mut()
            .append_pair("access_token", &self.token)
            .append_pair("room", self.room.name());

        let (stream, response) = connect_async(url.as_str()).await.map_err(|e| {
            PrataError::Connection(format!("failed to connect to {}: {}", self.url, e))
        })?;

        debug!(status = %response.status(), "room transport handshake complete");
        *self.socket.lock().await = Some(stream);
        info!(room = %self.room.name(), "connected to room");
        Ok(())
    }

    fn room(&self) -> &Room {
        &self.room
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_room_name() {
        let room = Room::new("kitchen");
        assert_eq!(room.name(), "kitchen");
    }

    #[test]
    fn test_invalid_url_is_rejected_at_construction() {
        let result = WsJobContext::new("not a url", "token", "room");
        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_connect_failure_propagates() {
        let ctx = WsJobContext::new("ws://127.0.0.1:1", "token", "room").unwrap();
        let err = ctx.connect().await.unwrap_err();
        assert!(err.to_string().contains("Room connection failed"));
    }
}
