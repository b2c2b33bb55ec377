use async_trait::async_trait;

use crate::error::Result;

/// External message-sink: the chat transport that carries formatted
/// reports. Retries, chunking, and wire format are the transport's
/// concern, not ours.
#[async_trait]
pub trait MessageSink: Send + Sync {
    /// Deliver `text` to the chat identified by `chat_id`.
    async fn send(&self, chat_id: &str, text: &str) -> Result<()>;
}
