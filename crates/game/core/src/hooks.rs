//! Mutation context handed to behavior hooks.
//!
//! Hooks (effect application/ticks, interactable logic, room enter/exit,
//! item use) receive a [`HookCx`] instead of the whole engine: the entity
//! arena, the outbound narration queue, the content and rng oracles, and -
//! while an encounter is running - the battlefield.

use crate::combat::Battlefield;
use crate::entity::Entities;
use crate::env::ContentOracle;
use crate::narration::Outbox;
use crate::rng::{compute_seed, RngOracle};

/// Everything a hook may touch.
pub struct HookCx<'a> {
    pub entities: &'a mut Entities,
    /// Present only while an encounter owns focus.
    pub battlefield: Option<&'a mut Battlefield>,
    pub outbox: &'a mut Outbox,
    pub content: &'a dyn ContentOracle,
    pub rng: &'a dyn RngOracle,
    /// Current turn counter of the owning engine.
    pub turn: u64,
    /// Event sequence number, mixed into roll seeds.
    pub nonce: u64,
    /// Per-game base seed.
    pub game_seed: u64,
}

impl HookCx<'_> {
    /// Queues a narration line.
    pub fn say(&mut self, text: impl Into<String>) {
        self.outbox.say(text);
    }

    /// Deterministic seed for the `context`-th independent roll of the
    /// current event.
    pub fn seed(&self, context: u32) -> u64 {
        compute_seed(self.game_seed, self.nonce, context)
    }
}
