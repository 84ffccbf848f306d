//! Runtime orchestration for the adventure rules core.
//!
//! This crate wires the deterministic core to the asynchronous outside
//! world: a session worker owns one [`game_core::Game`], consumes input
//! events strictly one at a time, and flushes narration through the
//! [`Messenger`] boundary in generation order.
//!
//! Modules are organized by responsibility:
//! - [`runtime`] hosts the session orchestrator and builder
//! - [`session`] keeps the background worker internal to the crate
//! - [`messenger`] defines the transport-facing delivery trait
pub mod error;
pub mod messenger;
pub mod runtime;
mod session;

pub use error::{Result, RuntimeError};
pub use messenger::{BufferMessenger, Messenger, MessengerError};
pub use runtime::{Session, SessionBuilder, SessionConfig, SessionHandle};
pub use session::{GameSnapshot, PartyView};
