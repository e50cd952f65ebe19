//! Bot abstraction for the outgoing side: text notices, chart artifacts, chat actions and pins.
//!
//! [`Bot`] is transport-agnostic; the Telegram implementation lives in `qmark-bot`.

use crate::error::{QmarkError, Result};
use async_trait::async_trait;

/// In-memory file attached to an outgoing message (e.g. a rendered chart).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageArtifact {
    pub file_name: String,
    pub bytes: Vec<u8>,
}

impl ImageArtifact {
    pub fn new(file_name: impl Into<String>, bytes: Vec<u8>) -> Self {
        Self {
            file_name: file_name.into(),
            bytes,
        }
    }
}

/// Result of pinning a message. Missing privileges are an expected outcome, not an error.
#[derive(Debug)]
pub enum PinOutcome {
    Pinned,
    PermissionDenied,
    Failed(QmarkError),
}

/// Abstraction for talking to the chat transport. Implementations map to a transport (e.g. Telegram).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a text message to the given chat.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<()>;
    /// Sends a file artifact to the given chat.
    async fn send_image(&self, chat_id: i64, image: ImageArtifact) -> Result<()>;
    /// Shows a "typing" indicator in the given chat.
    async fn send_typing(&self, chat_id: i64) -> Result<()>;
    /// Pins `message_id` in `chat_id`.
    async fn pin_message(&self, chat_id: i64, message_id: i32) -> PinOutcome;
}
