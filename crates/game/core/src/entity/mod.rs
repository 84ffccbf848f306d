//! Entity model: plain data records plus their behavior hooks.
//!
//! All live entities are owned by the [`Entities`] arena and referenced by
//! id everywhere else (rooms, battlefield slots, effect attribution). Ids
//! are never reused; death leaves the record in place for corpse queries,
//! and nothing is destroyed before session teardown.
mod ability;
mod character;
mod effect;
mod interactable;
mod item;

pub use ability::{
    Ability, AbilityTags, TargetCount, TargetKind, TargetRule, UseCaps, UseCounters,
};
pub use character::{ActorId, Character, Speed};
pub use effect::{
    Effect, EffectBehavior, EffectDuration, EffectParams, ParamKind, ParamValue,
};
pub use interactable::Interactable;
pub use item::{Item, ItemBehavior};

use crate::env::{CharacterTemplate, InteractableTemplate, ItemTemplate};
use crate::error::{ContentError, InvariantError};

/// Arena index of a [`Character`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct CharacterId(pub u32);

/// Arena index of an [`Item`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(pub u32);

/// Arena index of an [`Interactable`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct InteractableId(pub u32);

impl std::fmt::Display for CharacterId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A room occupant: either a character or an interactable object.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EntityRef {
    Character(CharacterId),
    Interactable(InteractableId),
}

/// Exclusive owner of every live entity in one game instance.
///
/// Lookups go through `character()` / `item()` / `interactable()` and their
/// `_mut` twins; the `require_*` variants upgrade a missing id to an
/// [`InvariantError`] since dangling ids are always a bug.
#[derive(Default)]
pub struct Entities {
    characters: Vec<Character>,
    items: Vec<Item>,
    interactables: Vec<Interactable>,
}

impl Entities {
    pub fn new() -> Self {
        Self::default()
    }

    /// Instantiates a character template, including its carried items.
    pub fn spawn_character(&mut self, template: CharacterTemplate) -> CharacterId {
        let id = CharacterId(self.characters.len() as u32);
        self.characters.push(Character {
            id,
            name: template.name,
            hp: template.hp,
            current_hp: template.hp,
            speed: template.speed,
            owner: template.owner,
            abilities: template.abilities,
            items: Vec::new(),
            effects: template.effects,
            behavior: template.behavior,
            talk_state: Character::INITIAL_TALK_STATE.to_string(),
        });
        for item_template in template.items {
            let item_id = self.spawn_item(item_template);
            self.items[item_id.0 as usize].owner = Some(id);
            self.characters[id.0 as usize].items.push(item_id);
        }
        id
    }

    /// Instantiates an item template. The item starts unowned.
    pub fn spawn_item(&mut self, template: ItemTemplate) -> ItemId {
        let id = ItemId(self.items.len() as u32);
        self.items.push(Item {
            id,
            name: template.name,
            abilities: template.abilities,
            effects: template.effects,
            equipped: template.equipped,
            owner: None,
            behavior: template.behavior,
        });
        id
    }

    /// Instantiates an interactable template.
    ///
    /// The template's initial state was already validated against the
    /// behavior's required-parameter contract when the template was built.
    pub fn spawn_interactable(&mut self, template: InteractableTemplate) -> InteractableId {
        let id = InteractableId(self.interactables.len() as u32);
        self.interactables.push(Interactable {
            id,
            name: template.name,
            state: template.state,
            behavior: template.behavior,
        });
        id
    }

    pub fn character(&self, id: CharacterId) -> Option<&Character> {
        self.characters.get(id.0 as usize)
    }

    pub fn character_mut(&mut self, id: CharacterId) -> Option<&mut Character> {
        self.characters.get_mut(id.0 as usize)
    }

    pub fn require_character(&self, id: CharacterId) -> Result<&Character, InvariantError> {
        self.character(id)
            .ok_or(InvariantError::CharacterNotFound(id))
    }

    pub fn require_character_mut(
        &mut self,
        id: CharacterId,
    ) -> Result<&mut Character, InvariantError> {
        self.characters
            .get_mut(id.0 as usize)
            .ok_or(InvariantError::CharacterNotFound(id))
    }

    pub fn item(&self, id: ItemId) -> Option<&Item> {
        self.items.get(id.0 as usize)
    }

    pub fn item_mut(&mut self, id: ItemId) -> Option<&mut Item> {
        self.items.get_mut(id.0 as usize)
    }

    pub fn interactable(&self, id: InteractableId) -> Option<&Interactable> {
        self.interactables.get(id.0 as usize)
    }

    pub fn interactable_mut(&mut self, id: InteractableId) -> Option<&mut Interactable> {
        self.interactables.get_mut(id.0 as usize)
    }

    /// Hands an already-spawned item to a character: sets the owner, adds
    /// it to the inventory, and attaches the item's passive effects.
    pub fn give_item(
        &mut self,
        actor: CharacterId,
        item: ItemId,
    ) -> Result<(), InvariantError> {
        let passive = self
            .item(item)
            .map(|i| i.effects.clone())
            .unwrap_or_default();
        if let Some(record) = self.item_mut(item) {
            record.owner = Some(actor);
        }
        let character = self.require_character_mut(actor)?;
        character.items.push(item);
        character.effects.extend(passive);
        Ok(())
    }

    /// Ids of every character currently carrying at least one active effect.
    pub fn characters_with_effects(&self) -> Vec<CharacterId> {
        self.characters
            .iter()
            .filter(|c| !c.effects.is_empty())
            .map(|c| c.id)
            .collect()
    }

    pub fn character_count(&self) -> usize {
        self.characters.len()
    }
}

/// Fails construction when a state map does not satisfy a required-parameter
/// contract. Shared by effect and interactable instantiation.
pub(crate) fn check_required_params(
    name: &str,
    required: &[(&'static str, ParamKind)],
    supplied: &std::collections::BTreeMap<String, ParamValue>,
) -> Result<(), ContentError> {
    for &(param, kind) in required {
        match supplied.get(param) {
            None => {
                return Err(ContentError::MissingParam {
                    effect: name.to_string(),
                    param,
                });
            }
            Some(value) if value.kind() != kind => {
                return Err(ContentError::ParamType {
                    effect: name.to_string(),
                    param,
                    expected: kind,
                });
            }
            Some(_) => {}
        }
    }
    Ok(())
}
