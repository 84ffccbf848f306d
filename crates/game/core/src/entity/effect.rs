//! Effects: time-limited (or persistent) behavior attachments.
//!
//! An effect couples a small data record (duration, tick counter,
//! attribution, validated parameters) with a shared behavior object that
//! implements whichever hooks the named effect needs. Effects attach either
//! to a character's ordered effect list or to a battlefield slot; the two
//! lifecycles are independent.

use std::collections::BTreeMap;
use std::sync::Arc;

use super::{check_required_params, Ability, CharacterId, ItemId};
use crate::error::{ContentError, InvariantError};
use crate::hooks::HookCx;

/// Expected kind of a required hook parameter.
#[derive(Clone, Copy, Debug, PartialEq, Eq, strum::Display)]
#[strum(serialize_all = "lowercase")]
pub enum ParamKind {
    Int,
    Text,
    Flag,
}

/// A supplied hook parameter value.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum ParamValue {
    Int(i32),
    Text(String),
    Flag(bool),
}

impl ParamValue {
    pub fn kind(&self) -> ParamKind {
        match self {
            Self::Int(_) => ParamKind::Int,
            Self::Text(_) => ParamKind::Text,
            Self::Flag(_) => ParamKind::Flag,
        }
    }
}

/// Named parameters supplied when an effect is constructed.
///
/// Checked against the behavior's required contract at construction time;
/// a missing or mistyped parameter fails construction, never a hook later.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EffectParams(BTreeMap<String, ParamValue>);

impl EffectParams {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: ParamValue) -> Self {
        self.0.insert(name.into(), value);
        self
    }

    #[must_use]
    pub fn with_int(self, name: impl Into<String>, value: i32) -> Self {
        self.with(name, ParamValue::Int(value))
    }

    #[must_use]
    pub fn with_text(self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.with(name, ParamValue::Text(value.into()))
    }

    pub fn int(&self, name: &str) -> Option<i32> {
        match self.0.get(name) {
            Some(ParamValue::Int(v)) => Some(*v),
            _ => None,
        }
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        match self.0.get(name) {
            Some(ParamValue::Text(v)) => Some(v),
            _ => None,
        }
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        match self.0.get(name) {
            Some(ParamValue::Flag(v)) => Some(*v),
            _ => None,
        }
    }

    pub(crate) fn map(&self) -> &BTreeMap<String, ParamValue> {
        &self.0
    }
}

impl FromIterator<(String, ParamValue)> for EffectParams {
    fn from_iter<T: IntoIterator<Item = (String, ParamValue)>>(iter: T) -> Self {
        Self(iter.into_iter().collect())
    }
}

/// How long an effect stays attached.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EffectDuration {
    /// Expires when `current_ticks` reaches the count: `Expiring(2)` ticks
    /// at 0 and 1, then is removed instead of ticking a third time.
    Expiring(u32),
    /// Never expires through the tick lifecycle; removed only by explicit
    /// game logic.
    Persistent,
    /// Never expires, but keeps ticking forever.
    Perpetual,
}

/// Behavior hooks for a named effect.
///
/// One implementation per named effect; instances are shared via `Arc` and
/// hold no per-attachment state (that lives in [`Effect`]). Every hook has a
/// no-op default so implementations define only what the effect does.
pub trait EffectBehavior: Send + Sync {
    /// Parameters the effect requires at construction, with expected kinds.
    fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
        &[]
    }

    /// Fired once per resolved target of a targeted ability.
    fn on_apply(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        caster: CharacterId,
        target: CharacterId,
        ability: &Ability,
        item: Option<ItemId>,
    ) -> Result<(), InvariantError> {
        let _ = (cx, effect, caster, target, ability, item);
        Ok(())
    }

    /// Fired exactly once per activation of a battlefield-scope ability.
    /// Responsible for all battlefield mutation.
    fn on_battlefield_apply(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        caster: CharacterId,
        caster_slot: usize,
    ) -> Result<(), InvariantError> {
        let _ = (cx, effect, caster, caster_slot);
        Ok(())
    }

    /// One lifecycle step while attached to a character.
    fn on_tick(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        owner: CharacterId,
    ) -> Result<(), InvariantError> {
        let _ = (cx, effect, owner);
        Ok(())
    }

    /// One lifecycle step while attached to a battlefield slot.
    fn on_tick_battlefield(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        slot: usize,
    ) -> Result<(), InvariantError> {
        let _ = (cx, effect, slot);
        Ok(())
    }

    /// Fired when the effect expires or is removed. `slot` is `None` for
    /// character-scope attachments.
    fn on_remove_battlefield(
        &self,
        cx: &mut HookCx<'_>,
        effect: &Effect,
        slot: Option<usize>,
    ) -> Result<(), InvariantError> {
        let _ = (cx, effect, slot);
        Ok(())
    }

    /// Transforms damage the effect's owner is dealing. Chained in the
    /// source's effect-list order.
    fn modify_outgoing(&self, effect: &Effect, damage: i32) -> i32 {
        let _ = effect;
        damage
    }

    /// Transforms damage the effect's owner is receiving. Chained in the
    /// target's effect-list order.
    fn modify_incoming(&self, effect: &Effect, damage: i32) -> i32 {
        let _ = effect;
        damage
    }
}

/// No-op behavior for effects that are pure markers (and for tests).
struct InertBehavior;

impl EffectBehavior for InertBehavior {}

/// An active effect attachment.
#[derive(Clone)]
pub struct Effect {
    pub name: String,
    pub duration: EffectDuration,
    /// Lifecycle steps taken so far.
    pub current_ticks: u32,
    /// Caster attribution, used for battlefield-scope cleanup.
    pub who_applied: Option<CharacterId>,
    /// Turn counter value when the effect attached.
    pub turn_applied: u64,
    pub params: EffectParams,
    behavior: Arc<dyn EffectBehavior>,
}

impl Effect {
    /// Builds an effect, failing fast when the behavior's required
    /// parameters are missing or mistyped.
    pub fn new(
        name: impl Into<String>,
        duration: EffectDuration,
        params: EffectParams,
        behavior: Arc<dyn EffectBehavior>,
    ) -> Result<Self, ContentError> {
        let name = name.into();
        check_required_params(&name, behavior.required_params(), params.map())?;
        Ok(Self {
            name,
            duration,
            current_ticks: 0,
            who_applied: None,
            turn_applied: 0,
            params,
            behavior,
        })
    }

    /// A marker effect with no hooks. Cannot fail: there is no contract.
    pub fn inert(name: impl Into<String>, duration: EffectDuration, params: EffectParams) -> Self {
        Self {
            name: name.into(),
            duration,
            current_ticks: 0,
            who_applied: None,
            turn_applied: 0,
            params,
            behavior: Arc::new(InertBehavior),
        }
    }

    pub fn behavior(&self) -> Arc<dyn EffectBehavior> {
        Arc::clone(&self.behavior)
    }

    /// Stamps caster attribution onto a fresh clone at application time.
    #[must_use]
    pub fn attributed(mut self, who: CharacterId, turn: u64) -> Self {
        self.who_applied = Some(who);
        self.turn_applied = turn;
        self
    }

    /// True when the tick lifecycle should expire this effect instead of
    /// ticking it again.
    pub fn has_run_out(&self) -> bool {
        matches!(self.duration, EffectDuration::Expiring(n) if self.current_ticks >= n)
    }
}

impl std::fmt::Debug for Effect {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Effect")
            .field("name", &self.name)
            .field("duration", &self.duration)
            .field("current_ticks", &self.current_ticks)
            .field("who_applied", &self.who_applied)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NeedsAmount;

    impl EffectBehavior for NeedsAmount {
        fn required_params(&self) -> &'static [(&'static str, ParamKind)] {
            &[("amount", ParamKind::Int)]
        }
    }

    #[test]
    fn missing_required_param_fails_construction() {
        let err = Effect::new(
            "strike",
            EffectDuration::Expiring(0),
            EffectParams::new(),
            Arc::new(NeedsAmount),
        )
        .unwrap_err();
        assert_eq!(
            err,
            ContentError::MissingParam {
                effect: "strike".into(),
                param: "amount",
            }
        );
    }

    #[test]
    fn mistyped_required_param_fails_construction() {
        let err = Effect::new(
            "strike",
            EffectDuration::Expiring(0),
            EffectParams::new().with_text("amount", "five"),
            Arc::new(NeedsAmount),
        )
        .unwrap_err();
        assert!(matches!(err, ContentError::ParamType { .. }));
    }

    #[test]
    fn valid_params_construct() {
        let fx = Effect::new(
            "strike",
            EffectDuration::Expiring(0),
            EffectParams::new().with_int("amount", 5),
            Arc::new(NeedsAmount),
        )
        .unwrap();
        assert_eq!(fx.params.int("amount"), Some(5));
        assert!(fx.has_run_out());
    }
}
