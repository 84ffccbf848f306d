//! High-level session orchestrator.
//!
//! [`Session`] owns the background worker; [`SessionHandle`] is the
//! cloneable façade clients and transports use to feed input events and
//! query snapshots.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;
use tracing::info;

use game_content::Registry;
use game_core::{ContentOracle, Game, GameConfig, GameEnv, InputEvent, PartyMember, PcgRng};

use crate::error::{Result, RuntimeError};
use crate::messenger::Messenger;
use crate::session::{Command, GameSnapshot, SessionWorker};

/// Session-level configuration.
#[derive(Clone, Debug)]
pub struct SessionConfig {
    pub game: GameConfig,
    pub command_buffer_size: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            game: GameConfig::default(),
            command_buffer_size: 32,
        }
    }
}

/// Cloneable façade over one running session.
#[derive(Clone)]
pub struct SessionHandle {
    command_tx: mpsc::Sender<Command>,
}

impl SessionHandle {
    /// Delivers one input event; resolves after the event has been fully
    /// processed and its narration flushed.
    pub async fn input(&self, event: InputEvent) -> Result<()> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Input { event, reply })
            .await
            .map_err(|_| RuntimeError::WorkerGone)?;
        response.await.map_err(|_| RuntimeError::WorkerGone)?
    }

    /// Reads a consistent snapshot of the session.
    pub async fn snapshot(&self) -> Result<GameSnapshot> {
        let (reply, response) = oneshot::channel();
        self.command_tx
            .send(Command::Snapshot { reply })
            .await
            .map_err(|_| RuntimeError::WorkerGone)?;
        response.await.map_err(|_| RuntimeError::WorkerGone)
    }
}

/// One running game session and its worker task.
pub struct Session {
    handle: SessionHandle,
    worker_handle: JoinHandle<()>,
}

impl Session {
    pub fn builder() -> SessionBuilder {
        SessionBuilder::new()
    }

    pub fn handle(&self) -> SessionHandle {
        self.handle.clone()
    }

    /// Graceful shutdown: drops the command channel and joins the worker.
    pub async fn shutdown(self) -> Result<()> {
        drop(self.handle);
        self.worker_handle.await.map_err(RuntimeError::WorkerJoin)
    }
}

/// Builder for [`Session`].
pub struct SessionBuilder {
    config: SessionConfig,
    registry: Option<Arc<dyn ContentOracle>>,
    messenger: Option<Arc<dyn Messenger>>,
    floor: String,
    party: Vec<PartyMember>,
}

impl SessionBuilder {
    fn new() -> Self {
        Self {
            config: SessionConfig::default(),
            registry: None,
            messenger: None,
            floor: String::new(),
            party: Vec::new(),
        }
    }

    pub fn config(mut self, config: SessionConfig) -> Self {
        self.config = config;
        self
    }

    /// Content registry override; defaults to the shipped catalog.
    pub fn registry(mut self, registry: Arc<dyn ContentOracle>) -> Self {
        self.registry = Some(registry);
        self
    }

    pub fn messenger(mut self, messenger: Arc<dyn Messenger>) -> Self {
        self.messenger = Some(messenger);
        self
    }

    pub fn floor(mut self, floor: impl Into<String>) -> Self {
        self.floor = floor.into();
        self
    }

    pub fn party_member(mut self, member: PartyMember) -> Self {
        self.party.push(member);
        self
    }

    /// Builds the game, spawns the worker, and returns the session.
    pub fn build(self) -> Result<Session> {
        let registry = match self.registry {
            Some(registry) => registry,
            None => Arc::new(Registry::standard()?),
        };
        let messenger = self.messenger.ok_or(RuntimeError::MissingMessenger)?;

        let game = {
            let env = GameEnv::new(registry.as_ref(), &PcgRng);
            Game::new(&env, self.config.game.clone(), &self.floor, &self.party)?
        };
        info!(floor = %self.floor, party = self.party.len(), "session created");

        let (command_tx, command_rx) =
            mpsc::channel::<Command>(self.config.command_buffer_size);
        eprintln!("DBG build: game constructed, spawning worker");
        let worker = SessionWorker::new(game, registry, messenger, command_rx);
        let worker_handle = tokio::spawn(worker.run());
        eprintln!("DBG build: worker spawned");

        Ok(Session {
            handle: SessionHandle { command_tx },
            worker_handle,
        })
    }
}
