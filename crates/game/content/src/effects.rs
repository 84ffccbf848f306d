//! Named effect behaviors.
//!
//! One discrete type per named effect, dispatched through the
//! [`EffectBehavior`] hook interfaces. The standard table pairs each name
//! with its canonical duration; parameters are validated against
//! `required_params()` when the registry constructs an effect.

use std::sync::Arc;

use game_core::combat::{deal_damage, heal};
use game_core::{
    Ability, CharacterId, Effect, EffectBehavior, EffectDuration, EntityRef, HookCx,
    InvariantError, ItemId, ParamKind,
};

/// Immediate damage to each resolved target. `amount` is the base damage
/// fed into the modifier chain.
pub struct Strike;

impl EffectBehavior for Strike {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("amount", ParamKind::Int)]
    }

    fn on_apply(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        caster: CharacterId,
        target: CharacterId,
        _ability: &Ability,
        _item: Option<ItemId>,
    ) -> Result<(), InvariantError> {
        let base = effect.params.int("amount").unwrap_or(0);
        let dealt = deal_damage(cx, caster, target, base)?;
        let name = cx.entities.require_character(target)?.name.clone();
        cx.say(format!("{name} takes {dealt} damage."));
        Ok(())
    }
}

/// Flat reduction of incoming damage while attached.
pub struct Block;

impl EffectBehavior for Block {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("amount", ParamKind::Int)]
    }

    fn modify_incoming(&self, effect: &Effect, damage: i32) -> i32 {
        damage - effect.params.int("amount").unwrap_or(0)
    }
}

/// Flat bonus to outgoing damage while attached.
pub struct Sharpen;

impl EffectBehavior for Sharpen {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("amount", ParamKind::Int)]
    }

    fn modify_outgoing(&self, effect: &Effect, damage: i32) -> i32 {
        damage + effect.params.int("amount").unwrap_or(0)
    }
}

/// Immediate healing on apply.
pub struct Mend;

impl EffectBehavior for Mend {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("amount", ParamKind::Int)]
    }

    fn on_apply(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        _caster: CharacterId,
        target: CharacterId,
        _ability: &Ability,
        _item: Option<ItemId>,
    ) -> Result<(), InvariantError> {
        let restored = heal(cx, target, effect.params.int("amount").unwrap_or(0))?;
        let name = cx.entities.require_character(target)?.name.clone();
        cx.say(format!("{name} recovers {restored} hp."));
        Ok(())
    }
}

/// Healing over time: restores `amount` on each tick.
pub struct Regrowth;

impl EffectBehavior for Regrowth {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("amount", ParamKind::Int)]
    }

    fn on_tick(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        owner: CharacterId,
    ) -> Result<(), InvariantError> {
        let restored = heal(cx, owner, effect.params.int("amount").unwrap_or(0))?;
        if restored > 0 {
            let name = cx.entities.require_character(owner)?.name.clone();
            cx.say(format!("{name} knits back {restored} hp."));
        }
        Ok(())
    }
}

/// Damage over time: the attached character loses `amount` per tick,
/// attributed to whoever applied the venom.
pub struct Venom;

impl EffectBehavior for Venom {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("amount", ParamKind::Int)]
    }

    fn on_tick(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        owner: CharacterId,
    ) -> Result<(), InvariantError> {
        let source = effect.who_applied.unwrap_or(owner);
        let dealt = deal_damage(cx, source, owner, effect.params.int("amount").unwrap_or(0))?;
        let name = cx.entities.require_character(owner)?.name.clone();
        cx.say(format!("Venom burns {name} for {dealt}."));
        Ok(())
    }

    fn on_remove_battlefield(
        &self,
        cx: &mut HookCx<'_>,
        _effect: &Effect,
        _slot: Option<usize>,
    ) -> Result<(), InvariantError> {
        cx.say("The venom runs its course.");
        Ok(())
    }
}

/// Battlefield summon: spawns the named creature into the caster's slot.
/// The spawned creature also joins the room so its corpse stays queryable
/// after the encounter.
pub struct Summon;

impl EffectBehavior for Summon {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("creature", ParamKind::Text)]
    }

    fn on_battlefield_apply(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        caster: CharacterId,
        caster_slot: usize,
    ) -> Result<(), InvariantError> {
        let Some(creature_name) = effect.params.text("creature") else {
            return Ok(());
        };
        // The contract was validated at construction; an unknown creature
        // here is a broken definition surfacing at use time.
        let Ok(mut template) = cx.content.creature(creature_name) else {
            return Err(InvariantError::DanglingAbility);
        };
        // Summons fight for the summoner's side.
        template.owner = cx.entities.require_character(caster)?.owner;
        let summoned = cx.entities.spawn_character(template);
        if let Some(field) = cx.battlefield.as_deref_mut() {
            field.place(caster_slot, summoned);
        }
        let name = cx.entities.require_character(summoned)?.name.clone();
        cx.say(format!("A {name} answers the call!"));
        Ok(())
    }
}

/// Battlefield retreat: ends the encounter without a defeat.
pub struct Retreat;

impl EffectBehavior for Retreat {
    fn on_battlefield_apply(
        &self,
        cx: &mut HookCx<'_>,
        _effect: &Effect,
        caster: CharacterId,
        _caster_slot: usize,
    ) -> Result<(), InvariantError> {
        let name = cx.entities.require_character(caster)?.name.clone();
        if let Some(field) = cx.battlefield.as_deref_mut() {
            field.retreat = true;
        }
        cx.say(format!("{name} throws down cover and the lines break apart."));
        Ok(())
    }
}

/// Battlefield reposition: moves the caster to the slot named by `slot`.
pub struct Reposition;

impl EffectBehavior for Reposition {
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("slot", ParamKind::Int)]
    }

    fn on_battlefield_apply(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        caster: CharacterId,
        _caster_slot: usize,
    ) -> Result<(), InvariantError> {
        let slot = effect.params.int("slot").unwrap_or(0).max(0) as usize;
        if let Some(field) = cx.battlefield.as_deref_mut() {
            field.move_to(caster, slot);
        }
        let name = cx.entities.require_character(caster)?.name.clone();
        cx.say(format!("{name} shifts across the battlefield."));
        Ok(())
    }
}

/// The standard effect table: canonical name, duration, behavior.
pub fn standard_effects() -> Vec<(&'static str, EffectDuration, Arc<dyn EffectBehavior>)> {
    vec![
        ("strike", EffectDuration::Expiring(0), Arc::new(Strike)),
        ("block", EffectDuration::Expiring(2), Arc::new(Block)),
        ("sharpen", EffectDuration::Expiring(2), Arc::new(Sharpen)),
        ("mend", EffectDuration::Expiring(0), Arc::new(Mend)),
        ("regrowth", EffectDuration::Expiring(3), Arc::new(Regrowth)),
        ("venom", EffectDuration::Expiring(3), Arc::new(Venom)),
        ("summon", EffectDuration::Expiring(0), Arc::new(Summon)),
        ("retreat", EffectDuration::Expiring(0), Arc::new(Retreat)),
        ("reposition", EffectDuration::Expiring(0), Arc::new(Reposition)),
        // Carried by the vault sigil: a standing guard that never wears off.
        ("ward-light", EffectDuration::Persistent, Arc::new(Block)),
    ]
}

/// Narrates what inspection reveals for plain characters; shared by NPC
/// archetypes that advertise INSPECT.
pub(crate) fn describe_entity(
    cx: &mut HookCx<'_>,
    target: EntityRef,
) -> Result<(), InvariantError> {
    match target {
        EntityRef::Character(id) => {
            let character = cx.entities.require_character(id)?;
            let line = if character.is_alive() {
                format!(
                    "{} stands before you, {} of {} hp intact.",
                    character.name, character.current_hp, character.hp
                )
            } else {
                format!("{} lies still.", character.name)
            };
            cx.say(line);
        }
        EntityRef::Interactable(id) => {
            let name = cx.entities.interactable(id).map(|i| i.name.clone());
            if let Some(name) = name {
                cx.say(format!("The {name} sits inert."));
            }
        }
    }
    Ok(())
}
