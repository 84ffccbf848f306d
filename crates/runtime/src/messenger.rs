//! Messenger: the outbound narration boundary.
//!
//! The core queues [`game_core::Narration`] per game instance; the session
//! worker flushes that queue through a [`Messenger`] strictly in generation
//! order, so players always see cause before effect even though delivery is
//! asynchronous.

use async_trait::async_trait;
use std::sync::Mutex;

use game_core::Narration;

/// Failure to hand a message to the transport.
#[derive(Debug, thiserror::Error)]
#[error("message delivery failed: {reason}")]
pub struct MessengerError {
    pub reason: String,
}

impl MessengerError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }
}

/// Ordering-preserving, fire-and-forget delivery to the chat transport.
///
/// `send` resolves when the transport has accepted the message; the session
/// worker awaits each send before the next so ordering is preserved without
/// any return payload.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send(&self, message: Narration) -> Result<(), MessengerError>;
}

/// Test/offline messenger that records everything it is given.
#[derive(Default)]
pub struct BufferMessenger {
    messages: Mutex<Vec<Narration>>,
}

impl BufferMessenger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything delivered so far, in delivery order.
    pub fn transcript(&self) -> Vec<Narration> {
        self.messages.lock().expect("messenger poisoned").clone()
    }

    /// Concatenated text lines, for assertions.
    pub fn text(&self) -> String {
        self.transcript()
            .iter()
            .map(|n| n.text.as_str())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

#[async_trait]
impl Messenger for BufferMessenger {
    async fn send(&self, message: Narration) -> Result<(), MessengerError> {
        self.messages
            .lock()
            .map_err(|_| MessengerError::new("buffer poisoned"))?
            .push(message);
        Ok(())
    }
}
