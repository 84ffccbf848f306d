//! NPC archetypes: behavior bundles selected by name from content data.

use std::sync::Arc;

use game_core::{
    AbilityTags, Behavior, BattleChoice, BattleView, Capability, CharacterId, DialogueNode,
    DialogueOption, DialogueOutcome, DialogueSideEffect, EntityRef, HookCx, InvariantError,
};

use crate::effects::describe_entity;

/// Resolves an NPC behavior spec string from content data.
pub fn npc_behavior(spec: &str) -> Option<Arc<dyn Behavior>> {
    match spec {
        "brute" => Some(Arc::new(Brute)),
        "warden-elder" => Some(Arc::new(WardenElder)),
        _ => None,
    }
}

/// Straightforward attacker: picks the damage ability and target whose
/// combination scores best, favoring finishing blows and wounded targets.
pub struct Brute;

impl Behavior for Brute {
    fn capabilities(&self) -> Capability {
        Capability::TURN | Capability::INSPECT
    }

    fn on_inspect(
        &self,
        cx: &mut HookCx<'_>,
        target: EntityRef,
        _actor: CharacterId,
    ) -> Result<(), InvariantError> {
        describe_entity(cx, target)
    }

    fn take_turn(&self, view: &BattleView<'_>, _me: CharacterId) -> Option<BattleChoice> {
        let mut best: Option<(i64, usize, CharacterId)> = None;
        for (index, action) in view.actions.iter().enumerate() {
            if !action.ability.tags.contains(AbilityTags::DAMAGE) {
                continue;
            }
            let amount = action.ability.effect.params.int("amount").unwrap_or(1) as i64;
            for &candidate in &action.candidates {
                let Some(target) = view.entities.character(candidate) else {
                    continue;
                };
                let mut score = amount * 10 - target.current_hp as i64;
                if amount >= target.current_hp as i64 {
                    score += 100;
                }
                if best.is_none_or(|(top, _, _)| score > top) {
                    best = Some((score, index, candidate));
                }
            }
        }
        best.map(|(_, index, target)| BattleChoice::single(index, target))
    }
}

/// Keeper of the vault: a dialogue tree that gates the guardian duel and
/// rewards victory with the sigil.
pub struct WardenElder;

impl Behavior for WardenElder {
    fn capabilities(&self) -> Capability {
        Capability::TALK | Capability::INSPECT
    }

    fn on_inspect(
        &self,
        cx: &mut HookCx<'_>,
        _target: EntityRef,
        _actor: CharacterId,
    ) -> Result<(), InvariantError> {
        cx.say("The elder's eyes have the patience of standing water.");
        Ok(())
    }

    fn dialogue(&self, talk_state: &str) -> Option<DialogueNode> {
        match talk_state {
            "start" => Some(DialogueNode {
                text: "Beyond me sleeps the vault. Prove yourself, or turn back.".into(),
                on_say: None,
                outcome: DialogueOutcome::Options(vec![
                    DialogueOption {
                        label: "I am ready to face the guardian.".into(),
                        next_state: "challenge".into(),
                        condition: Some(game_core::DialogueCondition::LacksItem(
                            "vault sigil".into(),
                        )),
                    },
                    DialogueOption {
                        label: "Who are you?".into(),
                        next_state: "lore".into(),
                        condition: None,
                    },
                    DialogueOption {
                        label: "I carry the sigil.".into(),
                        next_state: "honored".into(),
                        condition: Some(game_core::DialogueCondition::HoldsItem(
                            "vault sigil".into(),
                        )),
                    },
                ]),
            }),
            "lore" => Some(DialogueNode {
                text: "I kept this vault before your grandmother drew breath.".into(),
                on_say: None,
                outcome: DialogueOutcome::TalkOver {
                    next_state: "start".into(),
                },
            }),
            "challenge" => Some(DialogueNode {
                text: "Then wake the guardian, and survive it.".into(),
                on_say: None,
                outcome: DialogueOutcome::StartBattle {
                    encounter: "guardian-duel".into(),
                    victory_state: "victory".into(),
                },
            }),
            "victory" => Some(DialogueNode {
                text: "The guardian rests at last. Take the sigil; it is yours.".into(),
                on_say: Some(DialogueSideEffect::GiveItem("vault sigil".into())),
                outcome: DialogueOutcome::TalkOver {
                    next_state: "honored".into(),
                },
            }),
            "honored" => Some(DialogueNode {
                text: "Walk freely, sigil-bearer.".into(),
                on_say: None,
                outcome: DialogueOutcome::TalkOver {
                    next_state: "honored".into(),
                },
            }),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_spec_resolves_to_none() {
        assert!(npc_behavior("gelatinous-accountant").is_none());
    }

    #[test]
    fn elder_dialogue_covers_every_reachable_state() {
        let elder = WardenElder;
        for state in ["start", "lore", "challenge", "victory", "honored"] {
            assert!(elder.dialogue(state).is_some(), "missing node for {state}");
        }
        assert!(elder.dialogue("unwritten").is_none());
    }
}
