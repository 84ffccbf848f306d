//! Ability legality and target resolution on the battlefield.

use super::Battlefield;
use crate::entity::{Ability, CharacterId, Entities, ItemId, TargetCount, TargetKind};
use crate::error::InvariantError;

/// Where an offered ability ultimately comes from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AbilitySource {
    /// Index into the character's own ability list.
    Innate(usize),
    /// Index into a held item's ability list.
    Held(ItemId, usize),
}

/// One legal action: an ability plus every target it may currently resolve
/// against. Battlefield-scope abilities carry no candidates.
#[derive(Clone, Debug)]
pub struct LegalAction {
    pub source: AbilitySource,
    pub ability: Ability,
    pub candidates: Vec<CharacterId>,
}

/// Read-only view handed to automatic combatants when they pick an action.
pub struct BattleView<'a> {
    pub entities: &'a Entities,
    pub actions: &'a [LegalAction],
}

/// Locates a combatant as `(slot, index within slot)`.
///
/// A combatant missing from every slot is a programming-invariant
/// violation, not a recoverable game condition.
pub fn character_location(
    field: &Battlefield,
    who: CharacterId,
) -> Result<(usize, usize), InvariantError> {
    field
        .location_of(who)
        .ok_or(InvariantError::NotOnBattlefield(who))
}

/// Computes every legal action for a combatant.
///
/// An ability is offered when it is off cooldown, has uses left, and either
/// needs no target selection or resolves at least one candidate. Candidates
/// are living occupants within `range` slots whose side matches the target
/// kind: enemies are the occupants of the opposing side (player-owned
/// versus not), allies the caster's own side.
pub fn valid_actions(
    entities: &Entities,
    field: &Battlefield,
    who: CharacterId,
    battle_turn: u64,
) -> Result<Vec<LegalAction>, InvariantError> {
    let caster = entities.require_character(who)?;
    let (caster_slot, _) = character_location(field, who)?;
    let caster_owned = caster.is_player_controlled();

    let mut offered = Vec::new();
    let mut consider = |source: AbilitySource, ability: &Ability| {
        if !ability.is_ready(battle_turn) || !ability.has_uses_left() {
            return;
        }
        let candidates = match ability.targets.count {
            TargetCount::Battlefield => Vec::new(),
            TargetCount::Count(_) | TargetCount::All => match ability.targets.kind {
                TargetKind::SelfOnly => vec![who],
                kind => candidates_in_range(
                    entities,
                    field,
                    caster_slot,
                    ability.range,
                    caster_owned,
                    kind,
                    who,
                ),
            },
        };
        if candidates.is_empty() && ability.targets.count != TargetCount::Battlefield {
            return;
        }
        offered.push(LegalAction {
            source,
            ability: ability.clone(),
            candidates,
        });
    };

    for (i, ability) in caster.abilities.iter().enumerate() {
        consider(AbilitySource::Innate(i), ability);
    }
    for &item_id in &caster.items {
        let Some(item) = entities.item(item_id) else {
            continue;
        };
        for (i, ability) in item.abilities.iter().enumerate() {
            consider(AbilitySource::Held(item_id, i), ability);
        }
    }
    Ok(offered)
}

fn candidates_in_range(
    entities: &Entities,
    field: &Battlefield,
    caster_slot: usize,
    range: u32,
    caster_owned: bool,
    kind: TargetKind,
    who: CharacterId,
) -> Vec<CharacterId> {
    let mut found = Vec::new();
    for (slot, occupants) in field.slots.iter().enumerate() {
        if caster_slot.abs_diff(slot) > range as usize {
            continue;
        }
        for &occupant in occupants {
            let Some(character) = entities.character(occupant) else {
                continue;
            };
            if !character.is_alive() {
                continue;
            }
            let same_side = character.is_player_controlled() == caster_owned;
            let wanted = match kind {
                TargetKind::SelfOnly => occupant == who,
                TargetKind::Ally => same_side,
                TargetKind::Enemy => !same_side,
            };
            if wanted {
                found.push(occupant);
            }
        }
    }
    found
}
