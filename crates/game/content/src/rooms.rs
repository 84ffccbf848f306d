//! Room behavior hooks and their data-driven selection.

use std::sync::Arc;

use game_core::{CharacterId, HookCx, InvariantError, RoomBehavior, RoomLocation};

use crate::loaders::RoomKindSpec;

/// Resolves a room behavior spec from content data.
pub fn room_behavior(spec: &RoomKindSpec) -> Arc<dyn RoomBehavior> {
    match spec {
        RoomKindSpec::Trap(damage) => Arc::new(TrapRoom { damage: *damage }),
        RoomKindSpec::Mood { enter } => Arc::new(MoodRoom {
            enter: enter.clone(),
        }),
    }
}

/// Hidden spikes: flat entry damage, outside the combat modifier chain.
pub struct TrapRoom {
    pub damage: i32,
}

impl RoomBehavior for TrapRoom {
    fn on_enter(
        &self,
        cx: &mut HookCx<'_>,
        _location: RoomLocation,
        who: CharacterId,
    ) -> Result<(), InvariantError> {
        let character = cx.entities.require_character_mut(who)?;
        character.apply_harm(self.damage);
        let name = character.name.clone();
        cx.say(format!(
            "Rusted spikes snap up from the floor! {name} takes {} damage.",
            self.damage
        ));
        Ok(())
    }
}

/// Pure atmosphere: a line spoken on entry.
pub struct MoodRoom {
    pub enter: String,
}

impl RoomBehavior for MoodRoom {
    fn on_enter(
        &self,
        cx: &mut HookCx<'_>,
        _location: RoomLocation,
        _who: CharacterId,
    ) -> Result<(), InvariantError> {
        let line = self.enter.clone();
        cx.say(line);
        Ok(())
    }
}
