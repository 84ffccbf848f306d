//! Session worker: owns the authoritative [`game_core::Game`].
//!
//! Receives commands from [`crate::SessionHandle`], processes exactly one
//! [`InputEvent`] to completion at a time, and flushes queued narration to
//! the [`Messenger`] in generation order before accepting the next command.

use std::sync::Arc;

use tokio::sync::{mpsc, oneshot};
use tracing::{debug, warn};

use game_core::{
    CharacterId, ContentOracle, Game, GameEnv, InputEvent, PcgRng, RoomLocation,
};

use crate::error::{Result, RuntimeError};
use crate::messenger::Messenger;

/// Commands the session worker processes.
pub(crate) enum Command {
    /// Deliver one input event and flush the resulting narration.
    Input {
        event: InputEvent,
        reply: oneshot::Sender<Result<()>>,
    },
    /// Read-only view of the session for clients and tests.
    Snapshot {
        reply: oneshot::Sender<GameSnapshot>,
    },
}

/// Read-only view of one game session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GameSnapshot {
    /// The character currently authorized to act, if any.
    pub focus: Option<CharacterId>,
    pub battle_active: bool,
    pub location: RoomLocation,
    pub party: Vec<PartyView>,
}

/// One player character in a snapshot.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PartyView {
    pub id: CharacterId,
    pub name: String,
    pub current_hp: i32,
    pub hp: i32,
    pub alive: bool,
    pub items: Vec<String>,
    pub effects: Vec<String>,
}

/// Background task that owns the game and its narration flushing.
pub(crate) struct SessionWorker {
    game: Game,
    content: Arc<dyn ContentOracle>,
    rng: PcgRng,
    messenger: Arc<dyn Messenger>,
    command_rx: mpsc::Receiver<Command>,
}

impl SessionWorker {
    pub(crate) fn new(
        game: Game,
        content: Arc<dyn ContentOracle>,
        messenger: Arc<dyn Messenger>,
        command_rx: mpsc::Receiver<Command>,
    ) -> Self {
        Self {
            game,
            content,
            rng: PcgRng,
            messenger,
            command_rx,
        }
    }

    pub(crate) async fn run(mut self) {
        eprintln!("DBG worker: run start");
        // The opening narration (first room menu) precedes any input.
        if let Err(err) = self.flush().await {
            warn!(%err, "failed to deliver opening narration");
        }
        eprintln!("DBG worker: opening flush done, entering recv loop");
        while let Some(command) = self.command_rx.recv().await {
            eprintln!("DBG worker: got command");
            self.handle_command(command).await;
            eprintln!("DBG worker: command handled");
        }
        debug!("session worker draining complete, shutting down");
    }

    async fn handle_command(&mut self, command: Command) {
        match command {
            Command::Input { event, reply } => {
                debug!(actor = %event.actor, toggled = ?event.toggled, "processing input");
                let env = GameEnv::new(self.content.as_ref(), &self.rng);
                let result = self
                    .game
                    .handle_input(&env, &event)
                    .map_err(RuntimeError::from);
                let result = match (result, self.flush().await) {
                    (Err(err), _) => {
                        warn!(%err, "input processing failed");
                        Err(err)
                    }
                    (Ok(()), Err(flush_err)) => Err(flush_err),
                    (Ok(()), Ok(())) => Ok(()),
                };
                let _ = reply.send(result);
            }
            Command::Snapshot { reply } => {
                let _ = reply.send(self.snapshot());
            }
        }
    }

    /// Flushes pending narration strictly in generation order.
    async fn flush(&mut self) -> Result<()> {
        for narration in self.game.drain_narration() {
            self.messenger.send(narration).await?;
        }
        Ok(())
    }

    fn snapshot(&self) -> GameSnapshot {
        let party = self
            .game
            .players
            .iter()
            .filter_map(|&id| {
                let character = self.game.entities.character(id)?;
                Some(PartyView {
                    id,
                    name: character.name.clone(),
                    current_hp: character.current_hp,
                    hp: character.hp,
                    alive: character.is_alive(),
                    items: character
                        .items
                        .iter()
                        .filter_map(|&item| {
                            self.game.entities.item(item).map(|i| i.name.clone())
                        })
                        .collect(),
                    effects: character.effects.iter().map(|fx| fx.name.clone()).collect(),
                })
            })
            .collect();
        GameSnapshot {
            focus: self.game.focus(),
            battle_active: self.game.encounter.is_some(),
            location: self.game.world.location,
            party,
        }
    }
}
