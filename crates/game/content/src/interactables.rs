//! Interactable archetypes: shrines, chests, and their persisted state.

use std::sync::Arc;

use game_core::combat::heal;
use game_core::{
    Behavior, Capability, CharacterId, EntityRef, HookCx, InteractableId, InvariantError, ItemId,
    ParamKind, ParamValue,
};

/// Resolves an interactable kind spec string from content data.
pub fn interactable_behavior(kind: &str) -> Option<Arc<dyn Behavior>> {
    match kind {
        "moss-shrine" => Some(Arc::new(MossShrine)),
        "sealed-chest" => Some(Arc::new(SealedChest)),
        _ => None,
    }
}

/// A shrine that restores hit points on touch. `mending` (required) is the
/// amount restored per interaction.
pub struct MossShrine;

impl Behavior for MossShrine {
    fn capabilities(&self) -> Capability {
        Capability::INTERACT | Capability::INSPECT
    }

    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("mending", ParamKind::Int)]
    }

    fn on_inspect(
        &self,
        cx: &mut HookCx<'_>,
        _target: EntityRef,
        _actor: CharacterId,
    ) -> Result<(), InvariantError> {
        cx.say("Luminous moss sleeves the stone; the air tastes of rain.");
        Ok(())
    }

    fn on_interact(
        &self,
        cx: &mut HookCx<'_>,
        target: InteractableId,
        actor: CharacterId,
        _offered: Option<ItemId>,
    ) -> Result<(), InvariantError> {
        let mending = cx
            .entities
            .interactable(target)
            .and_then(|i| match i.state.get("mending") {
                Some(ParamValue::Int(v)) => Some(*v),
                _ => None,
            })
            .unwrap_or(0);
        let restored = heal(cx, actor, mending)?;
        let name = cx.entities.require_character(actor)?.name.clone();
        if restored > 0 {
            cx.say(format!("The moss glows; {name} recovers {restored} hp."));
        } else {
            cx.say(format!("The moss glows faintly, but {name} is unhurt."));
        }
        Ok(())
    }
}

/// A locked chest. Offering the item named by `key` opens it once and
/// yields the item named by `reward`; the key is spent.
pub struct SealedChest;

impl Behavior for SealedChest {
    fn capabilities(&self) -> Capability {
        Capability::INTERACT | Capability::INSPECT
    }

    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[("key", ParamKind::Text), ("reward", ParamKind::Text)]
    }

    fn wants_item(&self) -> bool {
        true
    }

    fn on_inspect(
        &self,
        cx: &mut HookCx<'_>,
        target: EntityRef,
        _actor: CharacterId,
    ) -> Result<(), InvariantError> {
        let opened = match target {
            EntityRef::Interactable(id) => cx
                .entities
                .interactable(id)
                .and_then(|i| match i.state.get("opened") {
                    Some(ParamValue::Flag(v)) => Some(*v),
                    _ => None,
                })
                .unwrap_or(false),
            EntityRef::Character(_) => false,
        };
        cx.say(if opened {
            "The chest lid hangs open, its lock sprung."
        } else {
            "A squat chest, banded in corroded iron. The lock looks hungry."
        });
        Ok(())
    }

    fn on_interact(
        &self,
        cx: &mut HookCx<'_>,
        target: InteractableId,
        actor: CharacterId,
        offered: Option<ItemId>,
    ) -> Result<(), InvariantError> {
        let (key_name, reward_name, opened) = {
            let Some(chest) = cx.entities.interactable(target) else {
                return Err(InvariantError::DanglingAbility);
            };
            let key = match chest.state.get("key") {
                Some(ParamValue::Text(v)) => v.clone(),
                _ => String::new(),
            };
            let reward = match chest.state.get("reward") {
                Some(ParamValue::Text(v)) => v.clone(),
                _ => String::new(),
            };
            let opened = matches!(chest.state.get("opened"), Some(ParamValue::Flag(true)));
            (key, reward, opened)
        };

        if opened {
            cx.say("The chest gapes empty.");
            return Ok(());
        }
        let offered_name = offered
            .and_then(|id| cx.entities.item(id))
            .map(|item| item.name.clone());
        let Some(offered_item) = offered else {
            cx.say("The lock holds fast.");
            return Ok(());
        };
        if offered_name.as_deref() != Some(key_name.as_str()) {
            cx.say("That does not fit the lock.");
            return Ok(());
        }

        // Spend the key.
        {
            let character = cx.entities.require_character_mut(actor)?;
            character.items.retain(|&i| i != offered_item);
        }
        if let Some(key_item) = cx.entities.item_mut(offered_item) {
            key_item.owner = None;
        }

        // Yield the reward. An unresolvable reward name is a broken
        // definition surfacing at use time.
        let Ok(template) = cx.content.item(&reward_name) else {
            return Err(InvariantError::DanglingAbility);
        };
        let reward_item = cx.entities.spawn_item(template);
        cx.entities.give_item(actor, reward_item)?;

        if let Some(chest) = cx.entities.interactable_mut(target) {
            chest
                .state
                .insert("opened".to_string(), ParamValue::Flag(true));
        }

        let name = cx.entities.require_character(actor)?.name.clone();
        cx.say(format!(
            "The {key_name} grinds, snaps, and the lid yields. {name} takes the {reward_name}."
        ));
        Ok(())
    }
}
