//! Deterministic rules core for the reaction-driven adventure game.
//!
//! `game-core` defines the canonical rules: the entity model, turn
//! scheduling, the damage/effect pipeline, and the two cooperating state
//! machines (exploration and encounter). All state mutation flows through
//! [`engine::Game::handle_input`]; the runtime and content crates depend on
//! the types re-exported here.
pub mod behavior;
pub mod combat;
pub mod config;
pub mod engine;
pub mod entity;
pub mod env;
pub mod error;
pub mod explore;
pub mod hooks;
pub mod input;
pub mod narration;
pub mod rng;
pub mod scheduler;
pub mod world;

#[cfg(test)]
pub(crate) mod testutil;

pub use behavior::{
    Behavior, BattleChoice, Capability, DialogueCondition, DialogueNode, DialogueOption,
    DialogueOutcome, DialogueSideEffect, RoomBehavior,
};
pub use combat::{
    AbilitySource, BattleOutcome, BattlePhase, BattleView, Battlefield, Encounter, LegalAction,
};
pub use config::GameConfig;
pub use engine::{Game, PartyMember};
pub use entity::{
    Ability, AbilityTags, ActorId, Character, CharacterId, Effect, EffectBehavior, EffectDuration,
    EffectParams, Entities, EntityRef, Interactable, InteractableId, Item, ItemBehavior, ItemId,
    ParamKind, ParamValue, Speed, TargetCount, TargetKind, TargetRule, UseCaps, UseCounters,
};
pub use env::{
    CharacterTemplate, ContentOracle, EffectSpec, EncounterTemplate, FloorTemplate, GameEnv,
    InteractableTemplate, ItemTemplate, RoomTemplate,
};
pub use error::{
    ContentError, ContentKind, EngineError, ErrorSeverity, GameError, InputError, InvariantError,
};
pub use explore::{ExplorationEngine, ExploreOutcome, ExploreState, RoomAction};
pub use hooks::HookCx;
pub use input::{InputEvent, ReactionIcon, render_numbered};
pub use narration::{Narration, Outbox};
pub use rng::{PcgRng, RngOracle, compute_seed};
pub use scheduler::prepare_queue;
pub use world::{Direction, Directions, Floor, Room, RoomLocation, WorldState};
