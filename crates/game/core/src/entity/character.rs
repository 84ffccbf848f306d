//! Character records and the speed tiers that drive turn scheduling.

use std::sync::Arc;

use super::{Ability, CharacterId, Effect, ItemId};
use crate::behavior::{Behavior, Capability};

/// Opaque identifier of the external actor controlling a character.
///
/// Supplied by the transport layer; the core never interprets it beyond
/// equality checks against incoming events.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ActorId(pub u64);

impl std::fmt::Display for ActorId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "actor:{}", self.0)
    }
}

/// Speed tier used by the turn scheduler.
///
/// Parsed from content definitions at load time; an unrecognized tier is a
/// content error there, never a runtime game condition.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString)]
#[strum(serialize_all = "UPPERCASE")]
pub enum Speed {
    Slow,
    #[default]
    Normal,
    Fast,
}

/// A living (or once-living) combatant or NPC.
///
/// Death zeroes `current_hp`; the record stays in the arena and in its room
/// so corpse queries keep working.
pub struct Character {
    pub id: CharacterId,
    pub name: String,
    /// Maximum hit points.
    pub hp: i32,
    /// Current hit points, clamped to `0..=hp`.
    pub current_hp: i32,
    pub speed: Speed,
    /// Present iff the character is player-controlled.
    pub owner: Option<ActorId>,
    pub abilities: Vec<Ability>,
    /// Carried items, by arena id.
    pub items: Vec<ItemId>,
    /// Active effects. Insertion order is significant: damage modifiers
    /// chain in list order.
    pub effects: Vec<Effect>,
    /// NPC capability bundle. Must resolve turns if the character is ever
    /// an unowned combatant.
    pub behavior: Option<Arc<dyn Behavior>>,
    /// Persisted dialogue cursor advanced by TALK_OVER and battle outcomes.
    pub talk_state: String,
}

impl Character {
    pub const INITIAL_TALK_STATE: &'static str = "start";

    /// Alive is derived state: `current_hp > 0`, always.
    #[inline]
    pub fn is_alive(&self) -> bool {
        self.current_hp > 0
    }

    #[inline]
    pub fn is_player_controlled(&self) -> bool {
        self.owner.is_some()
    }

    /// Capabilities advertised by the attached behavior bundle, if any.
    pub fn capabilities(&self) -> Capability {
        self.behavior
            .as_ref()
            .map(|b| b.capabilities())
            .unwrap_or(Capability::empty())
    }

    /// Subtracts already-resolved damage, clamping at zero.
    pub fn apply_harm(&mut self, amount: i32) {
        self.current_hp = (self.current_hp - amount.max(0)).max(0);
    }

    /// Adds healing, clamped so `current_hp` never exceeds `hp`.
    pub fn apply_mending(&mut self, amount: i32) {
        self.current_hp = (self.current_hp + amount.max(0)).min(self.hp);
    }
}

impl std::fmt::Debug for Character {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Character")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("hp", &format_args!("{}/{}", self.current_hp, self.hp))
            .field("speed", &self.speed)
            .field("owner", &self.owner)
            .field("effects", &self.effects.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn speed_parses_upper_case_tiers() {
        assert_eq!("FAST".parse::<Speed>().unwrap(), Speed::Fast);
        assert_eq!("NORMAL".parse::<Speed>().unwrap(), Speed::Normal);
        assert_eq!("SLOW".parse::<Speed>().unwrap(), Speed::Slow);
        assert!("BLISTERING".parse::<Speed>().is_err());
    }
}
