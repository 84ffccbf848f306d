//! The content registry: named templates behind the core's oracle contract.
//!
//! Built once from RON sources plus the code-defined behavior tables, then
//! only read. Every lookup returns a fresh clone of the stored template;
//! templates are never mutated in place. All cross-references (ability →
//! effect, creature → ability, room → creature, floor → room, …) are
//! resolved while building, so a broken definition fails the load, not a
//! session.

use std::collections::BTreeMap;
use std::sync::Arc;

use game_core::{
    Ability, CharacterTemplate, ContentError, ContentKind, ContentOracle, Directions, Effect,
    EffectBehavior, EffectDuration, EffectParams, EffectSpec, EncounterTemplate, FloorTemplate,
    GameConfig, InteractableTemplate, ItemTemplate, ParamValue, RoomTemplate, Speed,
    UseCaps, UseCounters,
};

use crate::effects::standard_effects;
use crate::interactables::interactable_behavior;
use crate::items::item_behavior;
use crate::loaders::{
    AbilitySpec, ContentSources, CreatureSpec, EncounterSpec, FloorSpec, InteractableSpec,
    ItemSpec, RoomSpec, parse_list,
};
use crate::npc::npc_behavior;
use crate::rooms::room_behavior;

pub(crate) const DATA_ABILITIES: &str = include_str!("../data/abilities.ron");
pub(crate) const DATA_CREATURES: &str = include_str!("../data/creatures.ron");
pub(crate) const DATA_CLASSES: &str = include_str!("../data/classes.ron");
pub(crate) const DATA_ITEMS: &str = include_str!("../data/items.ron");
pub(crate) const DATA_INTERACTABLES: &str = include_str!("../data/interactables.ron");
pub(crate) const DATA_ROOMS: &str = include_str!("../data/rooms.ron");
pub(crate) const DATA_FLOORS: &str = include_str!("../data/floors.ron");
pub(crate) const DATA_ENCOUNTERS: &str = include_str!("../data/encounters.ron");

type EffectDef = (EffectDuration, Arc<dyn EffectBehavior>);

/// Immutable catalog of every named template.
pub struct Registry {
    effects: BTreeMap<String, EffectDef>,
    abilities: BTreeMap<String, Ability>,
    items: BTreeMap<String, ItemTemplate>,
    creatures: BTreeMap<String, CharacterTemplate>,
    classes: BTreeMap<String, CharacterTemplate>,
    rooms: BTreeMap<String, RoomTemplate>,
    floors: BTreeMap<String, FloorTemplate>,
    encounters: BTreeMap<String, EncounterTemplate>,
    interactables: BTreeMap<String, InteractableTemplate>,
}

impl Registry {
    /// Builds the registry that ships with the crate.
    pub fn standard() -> Result<Self, ContentError> {
        Self::from_sources(&ContentSources {
            abilities: DATA_ABILITIES,
            creatures: DATA_CREATURES,
            classes: DATA_CLASSES,
            items: DATA_ITEMS,
            interactables: DATA_INTERACTABLES,
            rooms: DATA_ROOMS,
            floors: DATA_FLOORS,
            encounters: DATA_ENCOUNTERS,
        })
    }

    /// Builds a registry from raw RON documents, failing fast on the first
    /// broken definition.
    pub fn from_sources(sources: &ContentSources<'_>) -> Result<Self, ContentError> {
        let mut effects: BTreeMap<String, EffectDef> = BTreeMap::new();
        for (name, duration, behavior) in standard_effects() {
            effects.insert(name.to_string(), (duration, behavior));
        }

        let build_effect = |name: &str, params: EffectParams| -> Result<Effect, ContentError> {
            let (duration, behavior) =
                effects.get(name).ok_or_else(|| ContentError::NotFound {
                    kind: ContentKind::Effect,
                    name: name.to_string(),
                })?;
            Effect::new(name, *duration, params, Arc::clone(behavior))
        };

        let mut abilities = BTreeMap::new();
        for spec in parse_list::<AbilitySpec>("abilities", sources.abilities)? {
            let tags = spec.resolve_tags()?;
            let (count, kind) = spec.targets.resolve(&spec.name)?;
            let effect = build_effect(&spec.effect.name, spec.effect.effect_params())?;
            abilities.insert(
                spec.name.clone(),
                Ability {
                    name: spec.name,
                    tags,
                    effect,
                    cooldown: spec.cooldown,
                    max_uses: UseCaps {
                        game: spec.max_uses.game,
                        battle: spec.max_uses.battle,
                    },
                    uses: UseCounters::default(),
                    targets: game_core::TargetRule { count, kind },
                    range: spec.range,
                    cooldown_until: 0,
                },
            );
        }

        let resolve_ability = |name: &String| -> Result<Ability, ContentError> {
            abilities.get(name).cloned().ok_or_else(|| ContentError::NotFound {
                kind: ContentKind::Ability,
                name: name.clone(),
            })
        };

        let mut items = BTreeMap::new();
        for spec in parse_list::<ItemSpec>("items", sources.items)? {
            let ItemSpec {
                name,
                abilities: ability_names,
                effects: effect_specs,
                equipped,
                behavior,
            } = spec;
            let granted = ability_names
                .iter()
                .map(resolve_ability)
                .collect::<Result<Vec<_>, _>>()?;
            let passive = effect_specs
                .iter()
                .map(|fx| build_effect(&fx.name, fx.effect_params()))
                .collect::<Result<Vec<_>, _>>()?;
            let behavior = match behavior.as_deref() {
                None => None,
                Some(kind) => Some(item_behavior(kind).ok_or_else(|| {
                    ContentError::BadDefinition {
                        name: name.clone(),
                        reason: format!("unknown item behavior '{kind}'"),
                    }
                })?),
            };
            items.insert(
                name.clone(),
                ItemTemplate {
                    name,
                    abilities: granted,
                    effects: passive,
                    equipped,
                    behavior,
                },
            );
        }

        let build_character = |spec: CreatureSpec| -> Result<CharacterTemplate, ContentError> {
            let speed: Speed = spec
                .speed
                .parse()
                .map_err(|_| ContentError::UnknownSpeed(spec.speed.clone()))?;
            let granted = spec
                .abilities
                .iter()
                .map(resolve_ability)
                .collect::<Result<Vec<_>, _>>()?;
            let carried = spec
                .items
                .iter()
                .map(|name| {
                    items.get(name).cloned().ok_or_else(|| ContentError::NotFound {
                        kind: ContentKind::Item,
                        name: name.clone(),
                    })
                })
                .collect::<Result<Vec<_>, _>>()?;
            let behavior = match &spec.behavior {
                Some(kind) => Some(npc_behavior(kind).ok_or_else(|| {
                    ContentError::BadDefinition {
                        name: spec.name.clone(),
                        reason: format!("unknown npc behavior '{kind}'"),
                    }
                })?),
                None => None,
            };
            Ok(CharacterTemplate {
                name: spec.name,
                hp: spec.hp,
                speed,
                owner: None,
                abilities: granted,
                items: carried,
                effects: Vec::new(),
                behavior,
            })
        };

        let mut creatures = BTreeMap::new();
        for spec in parse_list::<CreatureSpec>("creatures", sources.creatures)? {
            let template = build_character(spec)?;
            creatures.insert(template.name.clone(), template);
        }
        let mut classes = BTreeMap::new();
        for spec in parse_list::<CreatureSpec>("classes", sources.classes)? {
            let template = build_character(spec)?;
            classes.insert(template.name.clone(), template);
        }

        let mut interactables = BTreeMap::new();
        for spec in parse_list::<InteractableSpec>("interactables", sources.interactables)? {
            let InteractableSpec { name, kind, state } = spec;
            let behavior =
                interactable_behavior(&kind).ok_or_else(|| ContentError::BadDefinition {
                    name: name.clone(),
                    reason: format!("unknown interactable kind '{kind}'"),
                })?;
            let state: BTreeMap<String, ParamValue> = state
                .iter()
                .map(|(k, v)| (k.clone(), ParamValue::from(v)))
                .collect();
            // Validates the behavior's required-parameter contract.
            let template = InteractableTemplate::new(name.clone(), state, behavior)?;
            interactables.insert(name, template);
        }

        let mut encounters = BTreeMap::new();
        for spec in parse_list::<EncounterSpec>("encounters", sources.encounters)? {
            encounters.insert(spec.name.clone(), resolve_encounter(spec, &creatures, &build_effect)?);
        }

        let mut rooms = BTreeMap::new();
        for spec in parse_list::<RoomSpec>("rooms", sources.rooms)? {
            let RoomSpec {
                name,
                directions,
                creatures: creature_names,
                interactables: interactable_names,
                floor_items,
                encounter,
                behavior,
            } = spec;
            for creature in &creature_names {
                require(&creatures, creature, ContentKind::Creature)?;
            }
            for interactable in &interactable_names {
                require(&interactables, interactable, ContentKind::Interactable)?;
            }
            for item in &floor_items {
                require(&items, item, ContentKind::Item)?;
            }
            if let Some(encounter) = &encounter {
                require(&encounters, encounter, ContentKind::Encounter)?;
            }
            rooms.insert(
                name,
                RoomTemplate {
                    directions: Directions::new(
                        directions.up,
                        directions.down,
                        directions.left,
                        directions.right,
                    ),
                    creatures: creature_names,
                    interactables: interactable_names,
                    floor_items,
                    encounter,
                    behavior: behavior.as_ref().map(room_behavior),
                },
            );
        }

        let mut floors = BTreeMap::new();
        for spec in parse_list::<FloorSpec>("floors", sources.floors)? {
            let FloorSpec {
                name,
                rooms: grid,
                starting,
            } = spec;
            let cols = grid.first().map(Vec::len).unwrap_or(0);
            if cols == 0 || grid.iter().any(|row| row.len() != cols) {
                return Err(ContentError::BadDefinition {
                    name: name.clone(),
                    reason: "floor grid must be rectangular and non-empty".into(),
                });
            }
            if starting.0 >= grid.len() || starting.1 >= cols {
                return Err(ContentError::BadDefinition {
                    name: name.clone(),
                    reason: "starting room outside the grid".into(),
                });
            }
            for room in grid.iter().flatten() {
                require(&rooms, room, ContentKind::Room)?;
            }
            floors.insert(
                name.clone(),
                FloorTemplate {
                    name,
                    rooms: grid,
                    starting_room: starting,
                },
            );
        }

        Ok(Self {
            effects,
            abilities,
            items,
            creatures,
            classes,
            rooms,
            floors,
            encounters,
            interactables,
        })
    }
}

fn require<T>(
    table: &BTreeMap<String, T>,
    name: &str,
    kind: ContentKind,
) -> Result<(), ContentError> {
    if table.contains_key(name) {
        Ok(())
    } else {
        Err(ContentError::NotFound {
            kind,
            name: name.to_string(),
        })
    }
}

fn resolve_encounter(
    spec: EncounterSpec,
    creatures: &BTreeMap<String, CharacterTemplate>,
    build_effect: &impl Fn(&str, EffectParams) -> Result<Effect, ContentError>,
) -> Result<EncounterTemplate, ContentError> {
    if spec.positions.len() > GameConfig::BATTLEFIELD_SLOTS
        || spec.effects.len() > GameConfig::BATTLEFIELD_SLOTS
    {
        return Err(ContentError::BadDefinition {
            name: spec.name,
            reason: format!("more than {} battlefield slots", GameConfig::BATTLEFIELD_SLOTS),
        });
    }
    let mut positions: [Vec<String>; GameConfig::BATTLEFIELD_SLOTS] = Default::default();
    for (slot, names) in spec.positions.into_iter().enumerate() {
        for name in &names {
            require(creatures, name, ContentKind::Creature)?;
        }
        positions[slot] = names;
    }
    let mut effects: [Vec<EffectSpec>; GameConfig::BATTLEFIELD_SLOTS] = Default::default();
    for (slot, specs) in spec.effects.into_iter().enumerate() {
        for fx in &specs {
            // Probe construction validates the parameter contract now.
            build_effect(&fx.name, fx.effect_params())?;
        }
        effects[slot] = specs
            .into_iter()
            .map(|fx| EffectSpec {
                params: fx.effect_params(),
                name: fx.name,
            })
            .collect();
    }
    Ok(EncounterTemplate {
        name: spec.name,
        positions,
        effects,
    })
}

impl ContentOracle for Registry {
    fn ability(&self, name: &str) -> Result<Ability, ContentError> {
        self.abilities.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Ability,
            name: name.to_string(),
        })
    }

    fn effect(&self, name: &str, params: EffectParams) -> Result<Effect, ContentError> {
        let (duration, behavior) =
            self.effects.get(name).ok_or_else(|| ContentError::NotFound {
                kind: ContentKind::Effect,
                name: name.to_string(),
            })?;
        Effect::new(name, *duration, params, Arc::clone(behavior))
    }

    fn item(&self, name: &str) -> Result<ItemTemplate, ContentError> {
        self.items.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Item,
            name: name.to_string(),
        })
    }

    fn creature(&self, name: &str) -> Result<CharacterTemplate, ContentError> {
        self.creatures.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Creature,
            name: name.to_string(),
        })
    }

    fn class(&self, name: &str) -> Result<CharacterTemplate, ContentError> {
        self.classes.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Class,
            name: name.to_string(),
        })
    }

    fn room(&self, name: &str) -> Result<RoomTemplate, ContentError> {
        self.rooms.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Room,
            name: name.to_string(),
        })
    }

    fn floor(&self, name: &str) -> Result<FloorTemplate, ContentError> {
        self.floors.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Floor,
            name: name.to_string(),
        })
    }

    fn encounter(&self, name: &str) -> Result<EncounterTemplate, ContentError> {
        self.encounters.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Encounter,
            name: name.to_string(),
        })
    }

    fn interactable(&self, name: &str) -> Result<InteractableTemplate, ContentError> {
        self.interactables.get(name).cloned().ok_or_else(|| ContentError::NotFound {
            kind: ContentKind::Interactable,
            name: name.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use game_core::ParamKind;

    #[test]
    fn standard_catalog_builds() {
        let registry = Registry::standard().unwrap();
        assert!(registry.creature("cave rat").is_ok());
        assert!(registry.class("warrior").is_ok());
        assert!(registry.floor("sunken vault").is_ok());
        assert!(registry.encounter("rat-pack").is_ok());
    }

    #[test]
    fn unknown_names_fail_with_not_found() {
        let registry = Registry::standard().unwrap();
        assert!(matches!(
            registry.creature("beholder"),
            Err(ContentError::NotFound {
                kind: ContentKind::Creature,
                ..
            })
        ));
    }

    #[test]
    fn effect_lookup_validates_required_params() {
        let registry = Registry::standard().unwrap();
        let err = registry.effect("strike", EffectParams::new()).unwrap_err();
        assert!(matches!(err, ContentError::MissingParam { .. }));

        let err = registry
            .effect("strike", EffectParams::new().with_text("amount", "lots"))
            .unwrap_err();
        assert!(matches!(
            err,
            ContentError::ParamType {
                expected: ParamKind::Int,
                ..
            }
        ));
    }

    #[test]
    fn lookups_return_independent_clones() {
        let registry = Registry::standard().unwrap();
        let mut first = registry.creature("cave rat").unwrap();
        first.hp = 9999;
        let second = registry.creature("cave rat").unwrap();
        assert_eq!(second.hp, 4);
    }

    #[test]
    fn bad_speed_tier_fails_the_load() {
        let sources = ContentSources {
            abilities: "[]",
            creatures: r#"[(name: "slug", hp: 2, speed: "GLACIAL")]"#,
            classes: "[]",
            items: "[]",
            interactables: "[]",
            rooms: "[]",
            floors: "[]",
            encounters: "[]",
        };
        assert!(matches!(
            Registry::from_sources(&sources),
            Err(ContentError::UnknownSpeed(_))
        ));
    }

    #[test]
    fn dangling_room_reference_fails_the_load() {
        let sources = ContentSources {
            abilities: "[]",
            creatures: "[]",
            classes: "[]",
            items: "[]",
            interactables: "[]",
            rooms: r#"[(name: "hall", directions: (), creatures: ["basilisk"])]"#,
            floors: "[]",
            encounters: "[]",
        };
        assert!(matches!(
            Registry::from_sources(&sources),
            Err(ContentError::NotFound {
                kind: ContentKind::Creature,
                ..
            })
        ));
    }
}
