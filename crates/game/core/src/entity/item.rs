//! Items: carried or floor-dwelling objects granting abilities.

use std::sync::Arc;

use super::{Ability, CharacterId, Effect, ItemId};
use crate::error::InvariantError;
use crate::hooks::HookCx;

/// Hooks fired around ability activation when the ability's ultimate source
/// is this item.
pub trait ItemBehavior: Send + Sync {
    fn before_use(
        &self,
        cx: &mut HookCx<'_>,
        item: ItemId,
        user: CharacterId,
        ability: &Ability,
    ) -> Result<(), InvariantError> {
        let _ = (cx, item, user, ability);
        Ok(())
    }

    fn after_use(
        &self,
        cx: &mut HookCx<'_>,
        item: ItemId,
        user: CharacterId,
        ability: &Ability,
    ) -> Result<(), InvariantError> {
        let _ = (cx, item, user, ability);
        Ok(())
    }
}

/// A held or dropped item.
pub struct Item {
    pub id: ItemId,
    pub name: String,
    /// Abilities the item grants while held.
    pub abilities: Vec<Ability>,
    /// Passive effects attached to the holder on pickup and detached on
    /// drop.
    pub effects: Vec<Effect>,
    pub equipped: bool,
    /// Holder, if any. `None` while the item lies on a room floor.
    pub owner: Option<CharacterId>,
    pub behavior: Option<Arc<dyn ItemBehavior>>,
}

impl std::fmt::Debug for Item {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Item")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("equipped", &self.equipped)
            .field("owner", &self.owner)
            .finish()
    }
}
