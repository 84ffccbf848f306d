//! Item behavior hooks.

use std::sync::Arc;

use game_core::{Ability, CharacterId, HookCx, InvariantError, ItemBehavior, ItemId};

/// Resolves an item behavior spec string from content data.
pub fn item_behavior(spec: &str) -> Option<Arc<dyn ItemBehavior>> {
    match spec {
        "torch" => Some(Arc::new(Torch)),
        _ => None,
    }
}

/// A burning brand: narrates around every use of the ability it grants.
pub struct Torch;

impl ItemBehavior for Torch {
    fn before_use(
        &self,
        cx: &mut HookCx<'_>,
        _item: ItemId,
        user: CharacterId,
        _ability: &Ability,
    ) -> Result<(), InvariantError> {
        let name = cx.entities.require_character(user)?.name.clone();
        cx.say(format!("{name} sweeps the torch in a bright arc."));
        Ok(())
    }

    fn after_use(
        &self,
        cx: &mut HookCx<'_>,
        _item: ItemId,
        _user: CharacterId,
        _ability: &Ability,
    ) -> Result<(), InvariantError> {
        cx.say("Sparks settle and the flame steadies.");
        Ok(())
    }
}
