//! Shared helpers for unit tests.

use crate::entity::{Ability, Effect, EffectParams, Entities, CharacterId, Speed};
use crate::env::{
    CharacterTemplate, ContentOracle, EncounterTemplate, FloorTemplate, InteractableTemplate,
    ItemTemplate, RoomTemplate,
};
use crate::error::{ContentError, ContentKind};

/// Oracle that knows nothing; for tests that never hit the registry.
pub(crate) struct NullContent;

fn not_found(kind: ContentKind, name: &str) -> ContentError {
    ContentError::NotFound {
        kind,
        name: name.into(),
    }
}

impl ContentOracle for NullContent {
    fn ability(&self, name: &str) -> Result<Ability, ContentError> {
        Err(not_found(ContentKind::Ability, name))
    }
    fn effect(&self, name: &str, _params: EffectParams) -> Result<Effect, ContentError> {
        Err(not_found(ContentKind::Effect, name))
    }
    fn item(&self, name: &str) -> Result<ItemTemplate, ContentError> {
        Err(not_found(ContentKind::Item, name))
    }
    fn creature(&self, name: &str) -> Result<CharacterTemplate, ContentError> {
        Err(not_found(ContentKind::Creature, name))
    }
    fn class(&self, name: &str) -> Result<CharacterTemplate, ContentError> {
        Err(not_found(ContentKind::Class, name))
    }
    fn room(&self, name: &str) -> Result<RoomTemplate, ContentError> {
        Err(not_found(ContentKind::Room, name))
    }
    fn floor(&self, name: &str) -> Result<FloorTemplate, ContentError> {
        Err(not_found(ContentKind::Floor, name))
    }
    fn encounter(&self, name: &str) -> Result<EncounterTemplate, ContentError> {
        Err(not_found(ContentKind::Encounter, name))
    }
    fn interactable(&self, name: &str) -> Result<InteractableTemplate, ContentError> {
        Err(not_found(ContentKind::Interactable, name))
    }
}

/// Spawns a bare character with no abilities, items, or behavior.
pub(crate) fn spawn_plain(
    entities: &mut Entities,
    name: &str,
    hp: i32,
    speed: Speed,
) -> CharacterId {
    entities.spawn_character(CharacterTemplate {
        name: name.into(),
        hp,
        speed,
        owner: None,
        abilities: Vec::new(),
        items: Vec::new(),
        effects: Vec::new(),
        behavior: None,
    })
}
