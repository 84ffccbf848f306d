//! Exploration engine: the world state machine.
//!
//! `EXPLORING` shows the room action menu; each `SELECT_*` sub-state accepts
//! exactly two terminal inputs, cancel (back to the menu, mutation-free) and
//! confirm (validate the selection set, perform the action, end the turn).
//! Encounters are delegated to the battle engine through
//! [`ExploreOutcome::BattleRequested`]; the completion callback resumes any
//! suspended dialogue.
mod actions;
mod dialogue;

pub use actions::GroundOffer;

use crate::behavior::{Capability, DialogueOption};
use crate::entity::{
    CharacterId, Entities, EntityRef, InteractableId, ItemId,
};
use crate::env::GameEnv;
use crate::error::{EngineError, InputError, InvariantError};
use crate::hooks::HookCx;
use crate::input::{InputEvent, ReactionIcon};
use crate::narration::Outbox;
use crate::world::{Direction, WorldState};

/// Mutable world context threaded through every exploration handler.
pub struct ExploreCx<'a> {
    pub entities: &'a mut Entities,
    pub world: &'a mut WorldState,
    pub outbox: &'a mut Outbox,
    pub env: GameEnv<'a>,
    /// Player characters; the party shares one location and moves as one.
    pub players: &'a [CharacterId],
    pub nonce: u64,
    pub game_seed: u64,
}

impl ExploreCx<'_> {
    /// Narrower context for behavior hooks (no battlefield out here).
    pub(crate) fn hook_cx(&mut self) -> HookCx<'_> {
        HookCx {
            entities: &mut *self.entities,
            battlefield: None,
            outbox: &mut *self.outbox,
            content: self.env.content,
            rng: self.env.rng,
            turn: 0,
            nonce: self.nonce,
            game_seed: self.game_seed,
        }
    }
}

/// Exploration sub-state. Every `Select*` variant carries the exact offer
/// list its menu rendered, so confirms are interpreted against what the
/// player actually saw.
#[derive(Debug)]
pub enum ExploreState {
    Exploring,
    SelectGround { offers: Vec<GroundOffer> },
    SelectTalk { npcs: Vec<CharacterId> },
    SelectTalkOption {
        npc: CharacterId,
        options: Vec<DialogueOption>,
    },
    SelectInspect { targets: Vec<EntityRef> },
    SelectInteract { targets: Vec<InteractableId> },
    SelectInteractItem {
        target: InteractableId,
        items: Vec<ItemId>,
    },
    SelectMove { exits: Vec<Direction> },
}

/// A dialogue suspended by a BATTLE_START node, resumed on victory.
#[derive(Clone, Debug)]
pub struct PendingDialogue {
    pub npc: CharacterId,
    pub victory_state: String,
}

/// What one processed input did to the exploration turn.
#[derive(Debug)]
pub enum ExploreOutcome {
    /// Still awaiting input from the same focused character.
    Stay,
    /// The action resolved; run turn cleanup and advance focus.
    TurnEnded,
    /// Hand off to the encounter engine.
    BattleRequested { encounter: String },
}

/// Always-available and capability-gated room menu entries.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RoomAction {
    Move,
    Talk,
    Inspect,
    Interact,
    Ground,
    Pass,
    Info,
    Battle,
}

impl RoomAction {
    pub fn icon(&self) -> ReactionIcon {
        match self {
            Self::Move => ReactionIcon::Move,
            Self::Talk => ReactionIcon::Talk,
            Self::Inspect => ReactionIcon::Inspect,
            Self::Interact => ReactionIcon::Interact,
            Self::Ground => ReactionIcon::Ground,
            Self::Pass => ReactionIcon::Pass,
            Self::Info => ReactionIcon::Info,
            Self::Battle => ReactionIcon::Battle,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Move => "move",
            Self::Talk => "talk",
            Self::Inspect => "inspect",
            Self::Interact => "interact",
            Self::Ground => "pick up / drop",
            Self::Pass => "pass",
            Self::Info => "info",
            Self::Battle => "battle",
        }
    }
}

/// The world state machine for one game instance.
pub struct ExplorationEngine {
    pub state: ExploreState,
    /// The single character currently authorized to act, or `None` while
    /// focus is being advanced.
    pub focus: Option<CharacterId>,
    pub(crate) pending_dialogue: Option<PendingDialogue>,
}

impl Default for ExplorationEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl ExplorationEngine {
    pub fn new() -> Self {
        Self {
            state: ExploreState::Exploring,
            focus: None,
            pending_dialogue: None,
        }
    }

    /// Composes the room action menu for the focused character.
    ///
    /// Scans the current room's entities for capability hooks and the
    /// room's exits for passable directions; pass, info, and the battle
    /// handoff are always offered.
    pub fn room_valid_actions(
        cx: &ExploreCx<'_>,
        actor: CharacterId,
    ) -> Result<Vec<RoomAction>, EngineError> {
        let room = cx.world.current_room()?;
        let character = cx.entities.require_character(actor)?;

        let mut actions = Vec::new();
        if !room.directions.open_exits().is_empty() {
            actions.push(RoomAction::Move);
        }
        let mut can_talk = false;
        let mut can_inspect = false;
        let mut can_interact = false;
        for entity in &room.entities {
            let caps = match entity {
                EntityRef::Character(id) => {
                    if *id == actor {
                        continue;
                    }
                    cx.entities
                        .character(*id)
                        .filter(|c| c.is_alive())
                        .map(|c| c.capabilities())
                }
                EntityRef::Interactable(id) => {
                    cx.entities.interactable(*id).map(|i| i.behavior.capabilities())
                }
            };
            let Some(caps) = caps else { continue };
            can_talk |= caps.contains(Capability::TALK);
            can_inspect |= caps.contains(Capability::INSPECT);
            can_interact |= caps.contains(Capability::INTERACT);
        }
        if can_talk {
            actions.push(RoomAction::Talk);
        }
        if can_inspect {
            actions.push(RoomAction::Inspect);
        }
        if can_interact {
            actions.push(RoomAction::Interact);
        }
        if !character.items.is_empty() || !room.floor_items.is_empty() {
            actions.push(RoomAction::Ground);
        }
        actions.push(RoomAction::Pass);
        actions.push(RoomAction::Info);
        actions.push(RoomAction::Battle);
        Ok(actions)
    }

    /// Renders the room action menu and returns to the idle state.
    pub fn show_menu(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
    ) -> Result<(), EngineError> {
        let actions = Self::room_valid_actions(cx, actor)?;
        let name = cx.entities.require_character(actor)?.name.clone();
        let mut text = format!("What will {name} do?");
        let mut icons = Vec::with_capacity(actions.len());
        for action in &actions {
            text.push('\n');
            text.push_str(action.icon().emoji());
            text.push(' ');
            text.push_str(action.label());
            icons.push(action.icon());
        }
        cx.outbox.prompt(text, icons);
        self.state = ExploreState::Exploring;
        Ok(())
    }

    /// Routes one reaction toggle through the current sub-state.
    pub fn handle_input(
        &mut self,
        cx: &mut ExploreCx<'_>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        let Some(actor) = self.focus else {
            return Err(InvariantError::NoFocus.into());
        };
        let state = std::mem::replace(&mut self.state, ExploreState::Exploring);

        // Cancel is uniform: back to the menu, no state mutation.
        if !matches!(state, ExploreState::Exploring)
            && event.toggled == ReactionIcon::Cancel
        {
            self.show_menu(cx, actor)?;
            return Ok(ExploreOutcome::Stay);
        }

        match state {
            ExploreState::Exploring => self.handle_menu_toggle(cx, actor, event),
            ExploreState::SelectMove { exits } => self.handle_move(cx, actor, exits, event),
            ExploreState::SelectGround { offers } => self.handle_ground(cx, actor, offers, event),
            ExploreState::SelectTalk { npcs } => self.handle_talk_select(cx, actor, npcs, event),
            ExploreState::SelectTalkOption { npc, options } => {
                self.handle_talk_option(cx, actor, npc, options, event)
            }
            ExploreState::SelectInspect { targets } => {
                self.handle_inspect(cx, actor, targets, event)
            }
            ExploreState::SelectInteract { targets } => {
                self.handle_interact(cx, actor, targets, event)
            }
            ExploreState::SelectInteractItem { target, items } => {
                self.handle_interact_item(cx, actor, target, items, event)
            }
        }
    }

    /// Completion callback from the encounter engine.
    ///
    /// If the acting character survived a victorious battle that a dialogue
    /// started, the NPC's talk-state advances to the configured next state
    /// and the conversation resumes; otherwise the turn falls through to
    /// normal cleanup.
    pub fn on_encounter_complete(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        victorious: bool,
    ) -> Result<ExploreOutcome, EngineError> {
        let pending = self.pending_dialogue.take();
        let actor_alive = cx
            .entities
            .character(actor)
            .map(|c| c.is_alive())
            .unwrap_or(false);
        match pending {
            Some(pending) if victorious && actor_alive => {
                cx.entities
                    .require_character_mut(pending.npc)?
                    .talk_state = pending.victory_state;
                self.handle_conversation(cx, actor, pending.npc)
            }
            _ => Ok(ExploreOutcome::TurnEnded),
        }
    }

    /// Uniform re-prompt for an invalid confirm: one clarifying line, then
    /// the same sub-state again, nothing mutated.
    pub(crate) fn reprompt(
        &mut self,
        cx: &mut ExploreCx<'_>,
        err: InputError,
        state: ExploreState,
        prompt: impl FnOnce(&mut ExploreCx<'_>),
    ) -> Result<ExploreOutcome, EngineError> {
        cx.outbox.say(err.to_string());
        prompt(cx);
        self.state = state;
        Ok(ExploreOutcome::Stay)
    }
}
