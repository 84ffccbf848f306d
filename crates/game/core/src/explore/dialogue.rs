//! NPC dialogue sub-flow.
//!
//! A conversation walks the NPC's dialogue tree keyed by its persisted
//! talk-state: speak the node, fire its side effect, then either list reply
//! options, end the conversation (TALK_OVER advances the talk-state and the
//! turn ends), or hand off to an encounter that resumes the conversation on
//! victory.

use super::{ExplorationEngine, ExploreCx, ExploreOutcome, ExploreState, PendingDialogue};
use crate::behavior::DialogueCondition;
use crate::entity::CharacterId;
use crate::error::{EngineError, InputError, InvariantError};
use crate::input::{InputEvent, ReactionIcon, render_numbered};

impl ExplorationEngine {
    pub(crate) fn handle_talk_select(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        npcs: Vec<CharacterId>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectTalk { npcs };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(npcs.len());
        if picked.len() != 1 {
            let again = npcs.clone();
            return self.reprompt(
                cx,
                InputError::ExactlyOneRequired,
                ExploreState::SelectTalk { npcs },
                |cx| super::actions::prompt_characters(cx, "Talk to whom?", &again),
            );
        }
        let npc = npcs[picked[0]];
        self.handle_conversation(cx, actor, npc)
    }

    pub(crate) fn handle_talk_option(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        npc: CharacterId,
        options: Vec<crate::behavior::DialogueOption>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectTalkOption { npc, options };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(options.len());
        if picked.len() != 1 {
            let again = options.clone();
            return self.reprompt(
                cx,
                InputError::ExactlyOneRequired,
                ExploreState::SelectTalkOption { npc, options },
                |cx| prompt_options(cx, &again),
            );
        }
        let next_state = options[picked[0]].next_state.clone();
        cx.entities.require_character_mut(npc)?.talk_state = next_state;
        self.handle_conversation(cx, actor, npc)
    }

    /// Speaks the node for the NPC's current talk-state and follows its
    /// outcome.
    pub(crate) fn handle_conversation(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        npc: CharacterId,
    ) -> Result<ExploreOutcome, EngineError> {
        use crate::behavior::{DialogueOutcome, DialogueSideEffect};

        let (npc_name, talk_state, behavior) = {
            let character = cx.entities.require_character(npc)?;
            (
                character.name.clone(),
                character.talk_state.clone(),
                character.behavior.clone(),
            )
        };
        let behavior = behavior.ok_or(InvariantError::DanglingAbility)?;
        let Some(node) = behavior.dialogue(&talk_state) else {
            cx.outbox.say(format!("{npc_name} has nothing more to say."));
            return Ok(ExploreOutcome::TurnEnded);
        };

        cx.outbox.say(format!("{npc_name}: \"{}\"", node.text));

        if let Some(side_effect) = &node.on_say {
            match side_effect {
                DialogueSideEffect::GiveItem(item_name) => {
                    let template = cx.env.content.item(item_name)?;
                    let item = cx.entities.spawn_item(template);
                    cx.entities.give_item(actor, item)?;
                    let actor_name = cx.entities.require_character(actor)?.name.clone();
                    cx.outbox
                        .say(format!("{npc_name} hands {actor_name} the {item_name}."));
                }
                DialogueSideEffect::Mend(amount) => {
                    let mut hook = cx.hook_cx();
                    crate::combat::heal(&mut hook, actor, *amount)?;
                }
            }
        }

        match node.outcome {
            DialogueOutcome::Options(options) => {
                let available: Vec<crate::behavior::DialogueOption> = options
                    .into_iter()
                    .filter(|option| condition_passes(cx, actor, option.condition.as_ref()))
                    .collect();
                if available.is_empty() {
                    return Ok(ExploreOutcome::TurnEnded);
                }
                prompt_options(cx, &available);
                self.state = ExploreState::SelectTalkOption {
                    npc,
                    options: available,
                };
                Ok(ExploreOutcome::Stay)
            }
            DialogueOutcome::TalkOver { next_state } => {
                cx.entities.require_character_mut(npc)?.talk_state = next_state;
                Ok(ExploreOutcome::TurnEnded)
            }
            DialogueOutcome::StartBattle {
                encounter,
                victory_state,
            } => {
                self.pending_dialogue = Some(PendingDialogue {
                    npc,
                    victory_state,
                });
                Ok(ExploreOutcome::BattleRequested { encounter })
            }
        }
    }
}

fn condition_passes(
    cx: &ExploreCx<'_>,
    actor: CharacterId,
    condition: Option<&DialogueCondition>,
) -> bool {
    let Some(condition) = condition else {
        return true;
    };
    let holds = |name: &str| {
        cx.entities
            .character(actor)
            .map(|c| {
                c.items
                    .iter()
                    .any(|&id| cx.entities.item(id).is_some_and(|i| i.name == name))
            })
            .unwrap_or(false)
    };
    match condition {
        DialogueCondition::HoldsItem(name) => holds(name),
        DialogueCondition::LacksItem(name) => !holds(name),
    }
}

pub(crate) fn prompt_options(cx: &mut ExploreCx<'_>, options: &[crate::behavior::DialogueOption]) {
    let labels: Vec<&str> = options.iter().map(|o| o.label.as_str()).collect();
    let (text, icons) = render_numbered("You reply:", &labels);
    cx.outbox.prompt(text, icons);
}
