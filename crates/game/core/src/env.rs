//! Content-oracle traits and the templates they hand out.
//!
//! The content registry is an external collaborator: the core only consumes
//! lookups by name and receives mutable clones of the returned templates.
//! Templates never reference the entity arena; instantiation happens through
//! [`crate::entity::Entities`] spawn methods and
//! [`crate::world::WorldState::from_template`].

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::behavior::{Behavior, RoomBehavior};
use crate::config::GameConfig;
use crate::entity::{
    Ability, ActorId, Effect, EffectParams, ItemBehavior, ParamValue, Speed,
};
use crate::error::ContentError;
use crate::rng::RngOracle;
use crate::world::Directions;

/// Blueprint for a character (creature or player class).
#[derive(Clone)]
pub struct CharacterTemplate {
    pub name: String,
    pub hp: i32,
    pub speed: Speed,
    /// Set by the engine when the template backs a player character.
    pub owner: Option<ActorId>,
    pub abilities: Vec<Ability>,
    pub items: Vec<ItemTemplate>,
    pub effects: Vec<Effect>,
    pub behavior: Option<Arc<dyn Behavior>>,
}

impl CharacterTemplate {
    /// Rebrands a class template for a specific player.
    #[must_use]
    pub fn claimed_by(mut self, owner: ActorId, name: impl Into<String>) -> Self {
        self.owner = Some(owner);
        self.name = name.into();
        self
    }
}

/// Blueprint for an item.
#[derive(Clone)]
pub struct ItemTemplate {
    pub name: String,
    pub abilities: Vec<Ability>,
    pub effects: Vec<Effect>,
    pub equipped: bool,
    pub behavior: Option<Arc<dyn ItemBehavior>>,
}

/// Blueprint for an interactable, with its initial persisted state.
#[derive(Clone)]
pub struct InteractableTemplate {
    pub name: String,
    pub state: BTreeMap<String, ParamValue>,
    pub behavior: Arc<dyn Behavior>,
}

impl InteractableTemplate {
    /// Builds the template, failing fast when the behavior's required
    /// parameters are missing or mistyped in the initial state.
    pub fn new(
        name: impl Into<String>,
        state: BTreeMap<String, ParamValue>,
        behavior: Arc<dyn Behavior>,
    ) -> Result<Self, ContentError> {
        let name = name.into();
        crate::entity::check_required_params(&name, behavior.required_params(), &state)?;
        Ok(Self {
            name,
            state,
            behavior,
        })
    }
}

/// Blueprint for one room. Entities are referenced by registry name and
/// instantiated when the floor is built.
#[derive(Clone)]
pub struct RoomTemplate {
    pub directions: Directions,
    pub creatures: Vec<String>,
    pub interactables: Vec<String>,
    pub floor_items: Vec<String>,
    /// Encounter template behind the room's battle affordance.
    pub encounter: Option<String>,
    pub behavior: Option<Arc<dyn RoomBehavior>>,
}

/// Blueprint for a floor: a grid of room names plus the starting location.
#[derive(Clone, Debug)]
pub struct FloorTemplate {
    pub name: String,
    /// Row-major grid of room template names.
    pub rooms: Vec<Vec<String>>,
    pub starting_room: (usize, usize),
}

/// A named effect plus the parameters to construct it with.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EffectSpec {
    pub name: String,
    pub params: EffectParams,
}

/// Blueprint for an encounter: creature names per battlefield slot plus
/// effects applied to each slot at encounter start.
#[derive(Clone, Debug)]
pub struct EncounterTemplate {
    pub name: String,
    pub positions: [Vec<String>; GameConfig::BATTLEFIELD_SLOTS],
    pub effects: [Vec<EffectSpec>; GameConfig::BATTLEFIELD_SLOTS],
}

/// Lookup contract the content registry implements.
///
/// Every method returns a fresh mutable clone of the stored template;
/// templates themselves are never mutated in place. Unknown names fail with
/// [`ContentError::NotFound`]; parameter-contract violations fail with
/// `MissingParam`/`ParamType`.
pub trait ContentOracle: Send + Sync {
    fn ability(&self, name: &str) -> Result<Ability, ContentError>;
    fn effect(&self, name: &str, params: EffectParams) -> Result<Effect, ContentError>;
    fn item(&self, name: &str) -> Result<ItemTemplate, ContentError>;
    fn creature(&self, name: &str) -> Result<CharacterTemplate, ContentError>;
    fn class(&self, name: &str) -> Result<CharacterTemplate, ContentError>;
    fn room(&self, name: &str) -> Result<RoomTemplate, ContentError>;
    fn floor(&self, name: &str) -> Result<FloorTemplate, ContentError>;
    fn encounter(&self, name: &str) -> Result<EncounterTemplate, ContentError>;
    fn interactable(&self, name: &str) -> Result<InteractableTemplate, ContentError>;
}

/// Read-only oracles bundled for the engines.
#[derive(Clone, Copy)]
pub struct GameEnv<'a> {
    pub content: &'a dyn ContentOracle,
    pub rng: &'a dyn RngOracle,
}

impl<'a> GameEnv<'a> {
    pub fn new(content: &'a dyn ContentOracle, rng: &'a dyn RngOracle) -> Self {
        Self { content, rng }
    }
}
