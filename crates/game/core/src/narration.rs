//! Outbound narration queue.
//!
//! Engines never talk to the transport directly: they append narration to a
//! per-game [`Outbox`] and the runtime flushes it strictly in generation
//! order, so players always see cause before effect.

use std::collections::VecDeque;

use crate::input::ReactionIcon;

/// One outbound message: text plus the reaction icons the transport should
/// arm on it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Narration {
    pub text: String,
    pub icons: Vec<ReactionIcon>,
    /// Ask the transport to keep this message pinned as the game's anchor
    /// (menus re-render onto it).
    pub anchor: bool,
}

/// FIFO of pending narration for one game instance.
#[derive(Debug, Default)]
pub struct Outbox {
    queue: VecDeque<Narration>,
}

impl Outbox {
    pub fn new() -> Self {
        Self::default()
    }

    /// Plain narration line, no reactions.
    pub fn say(&mut self, text: impl Into<String>) {
        self.queue.push_back(Narration {
            text: text.into(),
            icons: Vec::new(),
            anchor: false,
        });
    }

    /// A menu prompt: text plus the icons that make it answerable.
    pub fn prompt(&mut self, text: impl Into<String>, icons: Vec<ReactionIcon>) {
        self.queue.push_back(Narration {
            text: text.into(),
            icons,
            anchor: true,
        });
    }

    /// Drains everything queued so far, oldest first.
    pub fn drain(&mut self) -> Vec<Narration> {
        self.queue.drain(..).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }
}
