//! Runtime error types.

use game_core::{ContentError, EngineError};

use crate::messenger::MessengerError;

pub type Result<T> = std::result::Result<T, RuntimeError>;

/// Errors surfaced by the session runtime.
#[derive(Debug, thiserror::Error)]
pub enum RuntimeError {
    /// A broken content definition (fatal at load).
    #[error(transparent)]
    Content(#[from] ContentError),

    /// A fatal failure inside the rules core.
    #[error(transparent)]
    Engine(#[from] EngineError),

    /// Delivering narration to the transport failed.
    #[error(transparent)]
    Messenger(#[from] MessengerError),

    /// The builder was not given a messenger.
    #[error("a messenger is required to build a session")]
    MissingMessenger,

    /// The session worker is gone.
    #[error("session worker is no longer running")]
    WorkerGone,

    /// Joining the worker task failed.
    #[error("session worker panicked or was cancelled")]
    WorkerJoin(#[source] tokio::task::JoinError),
}
