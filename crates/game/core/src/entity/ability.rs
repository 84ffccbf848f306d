//! Abilities: named actions binding an effect to targeting and use rules.

use super::Effect;

bitflags::bitflags! {
    /// Tag set classifying what an ability does. Tags combine freely.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct AbilityTags: u16 {
        const DAMAGE = 1 << 0;
        const BLOCK  = 1 << 1;
        const HEAL   = 1 << 2;
        const SUMMON = 1 << 3;
        const PASS   = 1 << 4;
        const FLEE   = 1 << 5;
        const MOVE   = 1 << 6;
        const GIVE   = 1 << 7;
    }
}

/// Which side of the battlefield an ability may aim at.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "UPPERCASE")]
pub enum TargetKind {
    /// Exactly the acting character.
    SelfOnly,
    /// Occupants on the caster's side.
    Ally,
    /// Occupants on the opposing side.
    Enemy,
}

/// How many targets one activation may resolve against.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TargetCount {
    /// No target selection: the effect applies to the battlefield itself.
    Battlefield,
    /// Up to `n` selected targets, at least one.
    Count(u32),
    /// Any number of valid targets, at least one.
    All,
}

/// Targeting specification for one ability.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct TargetRule {
    pub count: TargetCount,
    pub kind: TargetKind,
}

/// Optional use caps per scope.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UseCaps {
    /// Cap for the character's whole lifetime.
    pub game: Option<u32>,
    /// Cap within a single encounter; the counter resets at encounter start.
    pub battle: Option<u32>,
}

/// Use counters parallel to [`UseCaps`]. Invariant: `uses.* <= max_uses.*`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct UseCounters {
    pub game: u32,
    pub battle: u32,
}

/// A named action a character or held item grants.
#[derive(Clone, Debug)]
pub struct Ability {
    pub name: String,
    pub tags: AbilityTags,
    /// Effect template. A defensive clone is taken per activation so
    /// repeated uses never share per-use state.
    pub effect: Effect,
    /// Turns between uses within an encounter.
    pub cooldown: u32,
    pub max_uses: UseCaps,
    pub uses: UseCounters,
    pub targets: TargetRule,
    /// Reach in battlefield slots (linear distance).
    pub range: u32,
    /// Battle turn on which the ability next comes off cooldown.
    pub cooldown_until: u64,
}

impl Ability {
    /// Ready means off cooldown; use caps are checked separately.
    #[inline]
    pub fn is_ready(&self, battle_turn: u64) -> bool {
        self.cooldown_until <= battle_turn
    }

    /// An ability with an exhausted cap is never a legal action.
    pub fn has_uses_left(&self) -> bool {
        let game_ok = self.max_uses.game.is_none_or(|cap| self.uses.game < cap);
        let battle_ok = self.max_uses.battle.is_none_or(|cap| self.uses.battle < cap);
        game_ok && battle_ok
    }

    /// Bookkeeping after a confirmed, legal activation.
    pub fn record_use(&mut self, battle_turn: u64) {
        self.uses.game += 1;
        self.uses.battle += 1;
        self.cooldown_until = battle_turn + self.cooldown as u64;
    }

    /// Battle-scope counters reset at encounter start; game-scope counters
    /// persist for the character's lifetime.
    pub fn reset_for_battle(&mut self) {
        self.uses.battle = 0;
        self.cooldown_until = 0;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{EffectDuration, EffectParams};

    fn ability(max_uses: UseCaps) -> Ability {
        Ability {
            name: "jab".into(),
            tags: AbilityTags::DAMAGE,
            effect: Effect::inert("jab", EffectDuration::Expiring(0), EffectParams::new()),
            cooldown: 2,
            max_uses,
            uses: UseCounters::default(),
            targets: TargetRule {
                count: TargetCount::Count(1),
                kind: TargetKind::Enemy,
            },
            range: 1,
            cooldown_until: 0,
        }
    }

    #[test]
    fn cooldown_blocks_until_recorded_turn_passes() {
        let mut a = ability(UseCaps::default());
        assert!(a.is_ready(0));
        a.record_use(0);
        assert!(!a.is_ready(1));
        assert!(a.is_ready(2));
    }

    #[test]
    fn exhausted_battle_cap_reports_no_uses_left() {
        let mut a = ability(UseCaps {
            game: None,
            battle: Some(1),
        });
        assert!(a.has_uses_left());
        a.record_use(0);
        assert!(!a.has_uses_left());
        a.reset_for_battle();
        assert!(a.has_uses_left());
    }

    #[test]
    fn game_cap_survives_battle_reset() {
        let mut a = ability(UseCaps {
            game: Some(1),
            battle: None,
        });
        a.record_use(0);
        a.reset_for_battle();
        assert!(!a.has_uses_left());
    }
}
