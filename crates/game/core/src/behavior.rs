//! Behavior capability bundles for NPCs, interactables, and rooms.
//!
//! Instead of probing ad-hoc properties, every archetype implements
//! [`Behavior`] and advertises what it supports through [`Capability`]
//! flags. Dialogue trees are plain data; turn resolution follows the
//! provider pattern (the engine computes the legal actions, the behavior
//! picks one).

use crate::combat::{BattleView, LegalAction};
use crate::entity::{CharacterId, EntityRef, InteractableId, ItemId, ParamKind};
use crate::error::InvariantError;
use crate::hooks::HookCx;
use crate::world::RoomLocation;

bitflags::bitflags! {
    /// What a behavior bundle supports. Drives exploration menu
    /// composition and encounter-spawn validation.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct Capability: u8 {
        const TALK     = 1 << 0;
        const INSPECT  = 1 << 1;
        const INTERACT = 1 << 2;
        const TURN     = 1 << 3;
    }
}

/// Capability bundle attached to characters and interactables.
///
/// Implementations only override the hooks their [`Capability`] flags
/// advertise; the engine never calls an unadvertised hook.
pub trait Behavior: Send + Sync {
    fn capabilities(&self) -> Capability;

    /// Required initial-state parameters for interactables. Checked at
    /// template construction; violation is a content error.
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[]
    }

    /// Dialogue node for a talk-state id. `None` for unknown states.
    fn dialogue(&self, talk_state: &str) -> Option<DialogueNode> {
        let _ = talk_state;
        None
    }

    /// Narrates what close examination reveals.
    fn on_inspect(
        &self,
        cx: &mut HookCx<'_>,
        target: EntityRef,
        actor: CharacterId,
    ) -> Result<(), InvariantError> {
        let _ = (cx, target, actor);
        Ok(())
    }

    /// Handles an interaction, optionally consuming an offered item.
    fn on_interact(
        &self,
        cx: &mut HookCx<'_>,
        target: InteractableId,
        actor: CharacterId,
        offered: Option<ItemId>,
    ) -> Result<(), InvariantError> {
        let _ = (cx, target, actor, offered);
        Ok(())
    }

    /// Whether interaction should first ask the actor to offer an item.
    fn wants_item(&self) -> bool {
        false
    }

    /// Picks an action for an automatic combatant. The engine validates
    /// the choice against `view.actions` before resolving it.
    fn take_turn(&self, view: &BattleView<'_>, me: CharacterId) -> Option<BattleChoice> {
        let _ = (view, me);
        None
    }
}

/// An automatic combatant's decision: an index into the legal-action list
/// plus the chosen subset of that action's candidates.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BattleChoice {
    pub action: usize,
    pub targets: Vec<CharacterId>,
}

impl BattleChoice {
    /// Convenience for the common single-target case.
    pub fn single(action: usize, target: CharacterId) -> Self {
        Self {
            action,
            targets: vec![target],
        }
    }

    /// A battlefield-scope action with no target selection.
    pub fn untargeted(action: usize) -> Self {
        Self {
            action,
            targets: Vec::new(),
        }
    }
}

/// Checks a choice against the legal-action list it indexes into.
pub fn choice_is_legal(actions: &[LegalAction], choice: &BattleChoice) -> bool {
    let Some(action) = actions.get(choice.action) else {
        return false;
    };
    choice
        .targets
        .iter()
        .all(|t| action.candidates.contains(t))
}

// ============================================================================
// Dialogue trees
// ============================================================================

/// One node of an NPC dialogue tree, keyed by the NPC's persisted
/// talk-state.
#[derive(Clone, Debug)]
pub struct DialogueNode {
    /// What the NPC says when the node is entered.
    pub text: String,
    /// Side effect fired when the node is spoken.
    pub on_say: Option<DialogueSideEffect>,
    pub outcome: DialogueOutcome,
}

/// Where a dialogue node leads.
#[derive(Clone, Debug)]
pub enum DialogueOutcome {
    /// Player picks a reply; only options whose condition passes are
    /// listed.
    Options(Vec<DialogueOption>),
    /// Conversation ends; the NPC's talk-state advances and the turn ends.
    TalkOver { next_state: String },
    /// Spawns an encounter. On victorious completion the NPC's talk-state
    /// advances to `victory_state` and the conversation resumes there.
    StartBattle {
        encounter: String,
        victory_state: String,
    },
}

/// One selectable reply.
#[derive(Clone, Debug)]
pub struct DialogueOption {
    pub label: String,
    /// Talk-state the conversation advances to when picked.
    pub next_state: String,
    pub condition: Option<DialogueCondition>,
}

/// Data-driven option gate, evaluated against the acting character.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueCondition {
    /// Actor carries an item with this name.
    HoldsItem(String),
    /// Actor does not carry an item with this name.
    LacksItem(String),
}

/// Side effects a dialogue node can fire as it is spoken.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DialogueSideEffect {
    /// Instantiate the named item into the actor's inventory.
    GiveItem(String),
    /// Restore hit points to the actor.
    Mend(i32),
}

// ============================================================================
// Room hooks
// ============================================================================

/// Enter/exit hooks for rooms that react to movement.
pub trait RoomBehavior: Send + Sync {
    fn on_enter(
        &self,
        cx: &mut HookCx<'_>,
        location: RoomLocation,
        who: CharacterId,
    ) -> Result<(), InvariantError> {
        let _ = (cx, location, who);
        Ok(())
    }

    fn on_exit(
        &self,
        cx: &mut HookCx<'_>,
        location: RoomLocation,
        who: CharacterId,
    ) -> Result<(), InvariantError> {
        let _ = (cx, location, who);
        Ok(())
    }
}
