//! Damage/heal resolution and the effect tick lifecycle.
//!
//! Damage resolution order is fixed: every outgoing modifier on the source
//! (effect-list order), then every incoming modifier on the target
//! (effect-list order), clamp to zero, subtract. Death never removes the
//! character from any structure here; cleanup is deferred to end-of-turn
//! bookkeeping.

use crate::config::GameConfig;
use crate::entity::{Ability, CharacterId, Effect, ItemId, TargetCount};
use crate::error::InvariantError;
use crate::hooks::HookCx;

/// Resolves one `deal damage` call and returns the final amount subtracted.
pub fn deal_damage(
    cx: &mut HookCx<'_>,
    source: CharacterId,
    target: CharacterId,
    base: i32,
) -> Result<i32, InvariantError> {
    let mut damage = base;

    let outgoing: Vec<Effect> = cx.entities.require_character(source)?.effects.clone();
    for fx in &outgoing {
        damage = fx.behavior().modify_outgoing(fx, damage);
    }
    let incoming: Vec<Effect> = cx.entities.require_character(target)?.effects.clone();
    for fx in &incoming {
        damage = fx.behavior().modify_incoming(fx, damage);
    }

    let damage = damage.max(0);
    cx.entities.require_character_mut(target)?.apply_harm(damage);
    Ok(damage)
}

/// Direct healing: no modifier chain, clamped so `current_hp` never
/// exceeds `hp`. Returns the amount actually restored.
pub fn heal(cx: &mut HookCx<'_>, target: CharacterId, amount: i32) -> Result<i32, InvariantError> {
    let character = cx.entities.require_character_mut(target)?;
    let before = character.current_hp;
    character.apply_mending(amount);
    Ok(character.current_hp - before)
}

/// Applies an ability whose legality has already been confirmed.
///
/// A defensive clone of the bound effect is taken per application so
/// repeated uses of the same template never share per-use state. The
/// owning item's `before_use`/`after_use` hooks bracket the activation when
/// the ability's ultimate source is an item.
pub fn apply_ability(
    cx: &mut HookCx<'_>,
    ability: &Ability,
    source_item: Option<ItemId>,
    caster: CharacterId,
    targets: &[CharacterId],
) -> Result<(), InvariantError> {
    let item_behavior = source_item
        .and_then(|id| cx.entities.item(id))
        .and_then(|item| item.behavior.clone());
    if let (Some(behavior), Some(item_id)) = (&item_behavior, source_item) {
        behavior.before_use(cx, item_id, caster, ability)?;
    }

    if ability.targets.count == TargetCount::Battlefield {
        // Battlefield scope: one invocation, the hook owns all mutation.
        let Some(field) = cx.battlefield.as_deref() else {
            return Err(InvariantError::NotOnBattlefield(caster));
        };
        let (slot, _) = field
            .location_of(caster)
            .ok_or(InvariantError::NotOnBattlefield(caster))?;
        let fx = ability.effect.clone().attributed(caster, cx.turn);
        fx.behavior().on_battlefield_apply(cx, &fx, caster, slot)?;
        if let Some(field) = cx.battlefield.as_deref_mut() {
            field.effects[slot].push(fx);
        }
    } else {
        for &target in targets {
            let fx = ability.effect.clone().attributed(caster, cx.turn);
            fx.behavior()
                .on_apply(cx, &fx, caster, target, ability, source_item)?;
            cx.entities.require_character_mut(target)?.effects.push(fx);
        }
    }

    if let (Some(behavior), Some(item_id)) = (&item_behavior, source_item) {
        behavior.after_use(cx, item_id, caster, ability)?;
    }
    Ok(())
}

/// Runs one tick-lifecycle pass over a character's active effects.
///
/// An `Expiring(n)` effect whose counter has reached `n` expires: its
/// removal hook fires and it leaves the list without ticking again. Every
/// other effect fires `on_tick` and advances its counter; persistent and
/// perpetual effects never expire here.
pub fn tick_character(cx: &mut HookCx<'_>, owner: CharacterId) -> Result<(), InvariantError> {
    let taken = std::mem::take(&mut cx.entities.require_character_mut(owner)?.effects);
    let mut kept = Vec::with_capacity(taken.len());
    for mut fx in taken {
        if fx.has_run_out() {
            fx.behavior().on_remove_battlefield(cx, &fx, None)?;
            continue;
        }
        fx.behavior().on_tick(cx, &fx, owner)?;
        fx.current_ticks += 1;
        kept.push(fx);
    }
    // Hooks may have attached new effects while the list was out; keep them
    // after the survivors to preserve insertion order.
    let character = cx.entities.require_character_mut(owner)?;
    let appended = std::mem::take(&mut character.effects);
    character.effects = kept;
    character.effects.extend(appended);
    Ok(())
}

/// Battlefield-scope parallel of [`tick_character`], keyed by attribution:
/// only effects applied by `caster` tick or expire on this pass.
pub fn tick_battlefield(cx: &mut HookCx<'_>, caster: CharacterId) -> Result<(), InvariantError> {
    for slot in 0..GameConfig::BATTLEFIELD_SLOTS {
        let Some(field) = cx.battlefield.as_deref_mut() else {
            return Ok(());
        };
        let taken = std::mem::take(&mut field.effects[slot]);
        let mut kept = Vec::with_capacity(taken.len());
        for mut fx in taken {
            if fx.who_applied != Some(caster) {
                kept.push(fx);
                continue;
            }
            if fx.has_run_out() {
                fx.behavior().on_remove_battlefield(cx, &fx, Some(slot))?;
                continue;
            }
            fx.behavior().on_tick_battlefield(cx, &fx, slot)?;
            fx.current_ticks += 1;
            kept.push(fx);
        }
        if let Some(field) = cx.battlefield.as_deref_mut() {
            let appended = std::mem::take(&mut field.effects[slot]);
            field.effects[slot] = kept;
            field.effects[slot].extend(appended);
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EffectBehavior, EffectDuration, EffectParams, Entities};
    use crate::narration::Outbox;
    use crate::rng::PcgRng;
    use crate::testutil::{spawn_plain, NullContent};
    use std::sync::Arc;
    use std::sync::atomic::{AtomicU32, Ordering};

    struct Reduce;

    impl EffectBehavior for Reduce {
        fn required_params(&self) -> &'static [(&'static str, crate::entity::ParamKind)] {
            &[("amount", crate::entity::ParamKind::Int)]
        }

        fn modify_incoming(&self, effect: &Effect, damage: i32) -> i32 {
            damage - effect.params.int("amount").unwrap_or(0)
        }
    }

    struct CountTicks(Arc<AtomicU32>, Arc<AtomicU32>);

    impl EffectBehavior for CountTicks {
        fn on_tick(
            &self,
            _cx: &mut HookCx<'_>,
            _effect: &Effect,
            _owner: CharacterId,
        ) -> Result<(), InvariantError> {
            self.0.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }

        fn on_remove_battlefield(
            &self,
            _cx: &mut HookCx<'_>,
            _effect: &Effect,
            _slot: Option<usize>,
        ) -> Result<(), InvariantError> {
            self.1.fetch_add(1, Ordering::SeqCst);
            Ok(())
        }
    }

    fn with_cx<R>(entities: &mut Entities, f: impl FnOnce(&mut HookCx<'_>) -> R) -> R {
        let mut outbox = Outbox::new();
        let content = NullContent;
        let rng = PcgRng;
        let mut cx = HookCx {
            entities,
            battlefield: None,
            outbox: &mut outbox,
            content: &content,
            rng: &rng,
            turn: 0,
            nonce: 0,
            game_seed: 0,
        };
        f(&mut cx)
    }

    fn spawn(entities: &mut Entities, name: &str, hp: i32) -> CharacterId {
        spawn_plain(entities, name, hp, Default::default())
    }

    #[test]
    fn flat_damage_kills_exactly_at_zero() {
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", 9);
        let b = spawn(&mut entities, "b", 5);
        let dealt = with_cx(&mut entities, |cx| deal_damage(cx, a, b, 5)).unwrap();
        assert_eq!(dealt, 5);
        let victim = entities.character(b).unwrap();
        assert_eq!(victim.current_hp, 0);
        assert!(!victim.is_alive());
    }

    #[test]
    fn incoming_block_reduces_damage_before_subtraction() {
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", 9);
        let b = spawn(&mut entities, "b", 9);
        let block = Effect::new(
            "block",
            EffectDuration::Expiring(2),
            EffectParams::new().with_int("amount", 4),
            Arc::new(Reduce),
        )
        .unwrap();
        entities.character_mut(b).unwrap().effects.push(block);

        let dealt = with_cx(&mut entities, |cx| deal_damage(cx, a, b, 5)).unwrap();
        assert_eq!(dealt, 1);
        assert_eq!(entities.character(b).unwrap().current_hp, 8);
    }

    #[test]
    fn over_blocked_damage_clamps_to_zero() {
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", 9);
        let b = spawn(&mut entities, "b", 9);
        let block = Effect::new(
            "block",
            EffectDuration::Expiring(1),
            EffectParams::new().with_int("amount", 40),
            Arc::new(Reduce),
        )
        .unwrap();
        entities.character_mut(b).unwrap().effects.push(block);

        let dealt = with_cx(&mut entities, |cx| deal_damage(cx, a, b, 5)).unwrap();
        assert_eq!(dealt, 0);
        assert_eq!(entities.character(b).unwrap().current_hp, 9);
    }

    #[test]
    fn healing_never_exceeds_max_hp() {
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", 10);
        entities.character_mut(a).unwrap().apply_harm(3);
        let restored = with_cx(&mut entities, |cx| heal(cx, a, 100)).unwrap();
        assert_eq!(restored, 3);
        assert_eq!(entities.character(a).unwrap().current_hp, 10);
    }

    #[test]
    fn two_tick_effect_fires_twice_then_expires() {
        let ticks = Arc::new(AtomicU32::new(0));
        let removals = Arc::new(AtomicU32::new(0));
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", 10);
        let fx = Effect::new(
            "ember",
            EffectDuration::Expiring(2),
            EffectParams::new(),
            Arc::new(CountTicks(ticks.clone(), removals.clone())),
        )
        .unwrap();
        entities.character_mut(a).unwrap().effects.push(fx);

        for _ in 0..4 {
            with_cx(&mut entities, |cx| tick_character(cx, a)).unwrap();
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 2);
        assert_eq!(removals.load(Ordering::SeqCst), 1);
        assert!(entities.character(a).unwrap().effects.is_empty());
    }

    #[test]
    fn perpetual_effect_ticks_without_expiring() {
        let ticks = Arc::new(AtomicU32::new(0));
        let removals = Arc::new(AtomicU32::new(0));
        let mut entities = Entities::new();
        let a = spawn(&mut entities, "a", 10);
        let fx = Effect::new(
            "aura",
            EffectDuration::Perpetual,
            EffectParams::new(),
            Arc::new(CountTicks(ticks.clone(), removals.clone())),
        )
        .unwrap();
        entities.character_mut(a).unwrap().effects.push(fx);

        for _ in 0..5 {
            with_cx(&mut entities, |cx| tick_character(cx, a)).unwrap();
        }
        assert_eq!(ticks.load(Ordering::SeqCst), 5);
        assert_eq!(removals.load(Ordering::SeqCst), 0);
        assert_eq!(entities.character(a).unwrap().effects.len(), 1);
    }
}
