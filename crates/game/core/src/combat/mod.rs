//! Encounter engine: the battle state machine.
//!
//! `ROUND_TICK` drains the turn queue, resolving automatic combatants
//! synchronously and stopping whenever focus lands on a player-controlled
//! combatant, which then owns an ability/target select-confirm-cancel
//! sub-flow. Terminal states are reached when one side has no living
//! member, or when a retreat effect ends the battle early.
mod pipeline;
mod targeting;

pub use pipeline::{apply_ability, deal_damage, heal, tick_battlefield, tick_character};
pub use targeting::{AbilitySource, BattleView, LegalAction, character_location, valid_actions};

use std::collections::VecDeque;

use crate::behavior::{Capability, choice_is_legal};
use crate::config::GameConfig;
use crate::entity::{CharacterId, Effect, Entities, EntityRef, TargetCount};
use crate::env::{EncounterTemplate, GameEnv};
use crate::error::{ContentError, EngineError, InputError, InvariantError};
use crate::hooks::HookCx;
use crate::input::{InputEvent, ReactionIcon, render_numbered};
use crate::narration::Outbox;
use crate::rng::compute_seed;
use crate::scheduler::prepare_queue;
use crate::world::Room;

/// The three fixed battle positions and their slot-scoped effects.
pub struct Battlefield {
    pub slots: [Vec<CharacterId>; GameConfig::BATTLEFIELD_SLOTS],
    pub effects: [Vec<Effect>; GameConfig::BATTLEFIELD_SLOTS],
    /// Set by a retreat effect; ends the encounter without a defeat.
    pub retreat: bool,
}

impl Battlefield {
    pub fn empty() -> Self {
        Self {
            slots: Default::default(),
            effects: Default::default(),
            retreat: false,
        }
    }

    /// Every combatant, slot by slot in placement order.
    pub fn occupants(&self) -> Vec<CharacterId> {
        self.slots.iter().flatten().copied().collect()
    }

    /// `(slot, index within slot)` of a combatant, if present.
    pub fn location_of(&self, who: CharacterId) -> Option<(usize, usize)> {
        self.slots.iter().enumerate().find_map(|(slot, occupants)| {
            occupants
                .iter()
                .position(|&id| id == who)
                .map(|index| (slot, index))
        })
    }

    pub fn place(&mut self, slot: usize, who: CharacterId) {
        self.slots[slot.min(GameConfig::BATTLEFIELD_SLOTS - 1)].push(who);
    }

    /// Relocates a combatant to another slot, keeping them at the back of
    /// the destination.
    pub fn move_to(&mut self, who: CharacterId, slot: usize) {
        for occupants in &mut self.slots {
            occupants.retain(|&id| id != who);
        }
        self.place(slot, who);
    }
}

impl std::fmt::Debug for Battlefield {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Battlefield")
            .field("slots", &self.slots)
            .field("retreat", &self.retreat)
            .finish()
    }
}

/// Why an encounter ended.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum BattleOutcome {
    AllPlayersDead,
    AllEnemiesDead,
    Retreated,
}

/// Player-side action selection sub-state.
#[derive(Debug)]
pub enum ActionSelect {
    ChooseAbility { actions: Vec<LegalAction> },
    ChooseTargets { action: LegalAction },
}

/// Battle state machine phase.
#[derive(Debug)]
pub enum BattlePhase {
    /// Draining the queue; focus is null.
    RoundTick,
    /// One player-controlled combatant holds focus and owes an input.
    AwaitingInput {
        actor: CharacterId,
        select: ActionSelect,
    },
    Complete(BattleOutcome),
}

/// One running encounter.
#[derive(Debug)]
pub struct Encounter {
    pub name: String,
    pub field: Battlefield,
    queue: VecDeque<CharacterId>,
    pub phase: BattlePhase,
    /// Round counter; bumps each time the queue is rebuilt.
    pub round: u64,
    /// Battle turn counter; bumps per acting combatant, drives cooldowns.
    pub turn: u64,
    game_seed: u64,
}

impl Encounter {
    /// Builds an encounter from a template.
    ///
    /// Creatures are pulled from the current room by name match before
    /// falling back to fresh registry instances (which also join the room,
    /// so their corpses stay queryable). The handed-off player characters
    /// enter slot 0. Fails fast when an unowned combatant cannot resolve
    /// turns on its own.
    pub fn spawn(
        env: &GameEnv<'_>,
        entities: &mut Entities,
        room: &mut Room,
        template: EncounterTemplate,
        joining: &[CharacterId],
        game_seed: u64,
    ) -> Result<Self, ContentError> {
        let mut field = Battlefield::empty();

        for (slot, names) in template.positions.iter().enumerate() {
            for name in names {
                let claimed = field.occupants();
                let from_room = room.characters().find(|&id| {
                    !claimed.contains(&id)
                        && entities
                            .character(id)
                            .is_some_and(|c| c.is_alive() && c.name == *name)
                });
                let id = match from_room {
                    Some(id) => id,
                    None => {
                        let creature = env.content.creature(name)?;
                        let id = entities.spawn_character(creature);
                        room.entities.push(EntityRef::Character(id));
                        id
                    }
                };
                field.place(slot, id);
            }
        }

        for &player in joining {
            field.place(0, player);
        }

        // Malformed content is fatal at spawn, never mid-round.
        for id in field.occupants() {
            if let Some(character) = entities.character(id) {
                if !character.is_player_controlled()
                    && !character.capabilities().contains(Capability::TURN)
                {
                    return Err(ContentError::MissingTurnLogic(character.name.clone()));
                }
            }
        }

        // Battle-scope use counters reset here; game-scope ones persist.
        for id in field.occupants() {
            let item_ids = entities
                .character(id)
                .map(|c| c.items.clone())
                .unwrap_or_default();
            if let Some(character) = entities.character_mut(id) {
                for ability in &mut character.abilities {
                    ability.reset_for_battle();
                }
            }
            for item_id in item_ids {
                if let Some(item) = entities.item_mut(item_id) {
                    for ability in &mut item.abilities {
                        ability.reset_for_battle();
                    }
                }
            }
        }

        // Slot effects from the template, unattributed.
        for (slot, specs) in template.effects.iter().enumerate() {
            for spec in specs {
                let fx = env.content.effect(&spec.name, spec.params.clone())?;
                field.effects[slot].push(fx);
            }
        }

        Ok(Self {
            name: template.name,
            field,
            queue: VecDeque::new(),
            phase: BattlePhase::RoundTick,
            round: 0,
            turn: 0,
            game_seed,
        })
    }

    /// The combatant currently authorized to act, if any.
    pub fn focus(&self) -> Option<CharacterId> {
        match &self.phase {
            BattlePhase::AwaitingInput { actor, .. } => Some(*actor),
            _ => None,
        }
    }

    pub fn outcome(&self) -> Option<BattleOutcome> {
        match &self.phase {
            BattlePhase::Complete(outcome) => Some(*outcome),
            _ => None,
        }
    }

    /// Drains the turn queue: automatic combatants resolve synchronously,
    /// and the loop stops exactly when focus lands on a player-controlled
    /// combatant or a terminal condition is reached.
    pub fn advance(
        &mut self,
        entities: &mut Entities,
        outbox: &mut Outbox,
        env: &GameEnv<'_>,
        nonce: u64,
    ) -> Result<(), EngineError> {
        loop {
            match &self.phase {
                BattlePhase::RoundTick => {}
                BattlePhase::AwaitingInput { .. } | BattlePhase::Complete(_) => return Ok(()),
            }
            if let Some(outcome) = self.check_terminal(entities) {
                self.phase = BattlePhase::Complete(outcome);
                return Ok(());
            }

            let Some(next) = self.queue.pop_front() else {
                self.round += 1;
                let combatants = self.field.occupants();
                self.queue = prepare_queue(
                    entities,
                    &combatants,
                    env.rng,
                    compute_seed(self.game_seed, self.round, 2),
                );
                if self.queue.is_empty() {
                    // Rebuilding from an all-dead set terminates instead of
                    // looping forever.
                    let outcome = self
                        .check_terminal(entities)
                        .unwrap_or(BattleOutcome::AllPlayersDead);
                    self.phase = BattlePhase::Complete(outcome);
                    return Ok(());
                }
                continue;
            };

            let Some(character) = entities.character(next) else {
                continue;
            };
            if !character.is_alive() {
                continue;
            }
            let name = character.name.clone();
            let owned = character.is_player_controlled();
            let behavior = character.behavior.clone();

            self.turn += 1;
            let actions = valid_actions(entities, &self.field, next, self.turn)?;

            if owned {
                if actions.is_empty() {
                    outbox.say(format!("{name} has no possible actions and holds back."));
                    self.end_turn(entities, outbox, env, nonce, next)?;
                    continue;
                }
                self.prompt_abilities(entities, outbox, next, &actions);
                self.phase = BattlePhase::AwaitingInput {
                    actor: next,
                    select: ActionSelect::ChooseAbility { actions },
                };
                return Ok(());
            }

            // Automatic turn: the behavior picks, the engine validates.
            let choice = behavior.and_then(|b| {
                b.take_turn(
                    &BattleView {
                        entities,
                        actions: &actions,
                    },
                    next,
                )
            });
            match choice {
                Some(choice) if choice_is_legal(&actions, &choice) => {
                    let action = actions[choice.action].clone();
                    self.resolve_action(
                        entities,
                        outbox,
                        env,
                        nonce,
                        next,
                        &action,
                        &choice.targets,
                    )?;
                }
                _ => {
                    outbox.say(format!("{name} hesitates."));
                    self.end_turn(entities, outbox, env, nonce, next)?;
                }
            }
        }
    }

    /// Handles one reaction toggle while a player combatant holds focus.
    ///
    /// Recoverable input problems narrate a single clarifying line and
    /// re-prompt the same sub-state; nothing is mutated before validation
    /// passes.
    pub fn handle_input(
        &mut self,
        entities: &mut Entities,
        outbox: &mut Outbox,
        env: &GameEnv<'_>,
        nonce: u64,
        event: &InputEvent,
    ) -> Result<(), EngineError> {
        let phase = std::mem::replace(&mut self.phase, BattlePhase::RoundTick);
        let BattlePhase::AwaitingInput { actor, select } = phase else {
            self.phase = phase;
            return Ok(());
        };

        match event.toggled {
            ReactionIcon::Cancel => {
                // Cancel returns to the parent ability menu, mutation-free.
                let actions = valid_actions(entities, &self.field, actor, self.turn)?;
                self.prompt_abilities(entities, outbox, actor, &actions);
                self.phase = BattlePhase::AwaitingInput {
                    actor,
                    select: ActionSelect::ChooseAbility { actions },
                };
            }
            ReactionIcon::Confirm => match select {
                ActionSelect::ChooseAbility { actions } => {
                    let picked = event.selected_indices(actions.len());
                    if picked.len() != 1 {
                        self.reject_ability(
                            entities,
                            outbox,
                            actor,
                            actions,
                            InputError::ExactlyOneRequired,
                        );
                        return Ok(());
                    }
                    let action = actions[picked[0]].clone();
                    if action.ability.targets.count == TargetCount::Battlefield {
                        self.resolve_action(entities, outbox, env, nonce, actor, &action, &[])?;
                        self.advance(entities, outbox, env, nonce)?;
                    } else {
                        self.prompt_targets(entities, outbox, &action);
                        self.phase = BattlePhase::AwaitingInput {
                            actor,
                            select: ActionSelect::ChooseTargets { action },
                        };
                    }
                }
                ActionSelect::ChooseTargets { action } => {
                    let picked = event.selected_indices(action.candidates.len());
                    let max = match action.ability.targets.count {
                        TargetCount::Count(n) => n as usize,
                        TargetCount::All => action.candidates.len(),
                        TargetCount::Battlefield => 0,
                    };
                    if picked.is_empty() {
                        self.reject_targets(
                            entities,
                            outbox,
                            actor,
                            action,
                            InputError::EmptySelection,
                        );
                        return Ok(());
                    }
                    if picked.len() > max {
                        let err = InputError::TooManySelections { max: max as u32 };
                        self.reject_targets(entities, outbox, actor, action, err);
                        return Ok(());
                    }
                    let targets: Vec<CharacterId> =
                        picked.iter().map(|&i| action.candidates[i]).collect();
                    let stale = targets
                        .iter()
                        .any(|&t| entities.character(t).is_none_or(|c| !c.is_alive()));
                    if stale {
                        self.reject_targets(
                            entities,
                            outbox,
                            actor,
                            action,
                            InputError::StaleSelection,
                        );
                        return Ok(());
                    }
                    self.resolve_action(entities, outbox, env, nonce, actor, &action, &targets)?;
                    self.advance(entities, outbox, env, nonce)?;
                }
            },
            // Number toggles build the selection set carried by the next
            // confirm; anything else is ignored.
            _ => {
                self.phase = BattlePhase::AwaitingInput { actor, select };
            }
        }
        Ok(())
    }

    fn reject_ability(
        &mut self,
        entities: &Entities,
        outbox: &mut Outbox,
        actor: CharacterId,
        actions: Vec<LegalAction>,
        err: InputError,
    ) {
        outbox.say(err.to_string());
        self.prompt_abilities(entities, outbox, actor, &actions);
        self.phase = BattlePhase::AwaitingInput {
            actor,
            select: ActionSelect::ChooseAbility { actions },
        };
    }

    fn reject_targets(
        &mut self,
        entities: &Entities,
        outbox: &mut Outbox,
        actor: CharacterId,
        action: LegalAction,
        err: InputError,
    ) {
        outbox.say(err.to_string());
        self.prompt_targets(entities, outbox, &action);
        self.phase = BattlePhase::AwaitingInput {
            actor,
            select: ActionSelect::ChooseTargets { action },
        };
    }

    /// Applies a confirmed action, then runs the caster's end-of-turn
    /// bookkeeping (effect ticks, battlefield cleanup, death narration).
    fn resolve_action(
        &mut self,
        entities: &mut Entities,
        outbox: &mut Outbox,
        env: &GameEnv<'_>,
        nonce: u64,
        caster: CharacterId,
        action: &LegalAction,
        targets: &[CharacterId],
    ) -> Result<(), EngineError> {
        record_source_use(entities, caster, &action.source, &action.ability.name, self.turn)?;

        let caster_name = entities.require_character(caster)?.name.clone();
        if targets.is_empty() {
            outbox.say(format!("{caster_name} uses {}.", action.ability.name));
        } else {
            let names: Vec<String> = targets
                .iter()
                .filter_map(|&t| entities.character(t).map(|c| c.name.clone()))
                .collect();
            outbox.say(format!(
                "{caster_name} uses {} on {}.",
                action.ability.name,
                names.join(", ")
            ));
        }

        let item = match action.source {
            AbilitySource::Held(item, _) => Some(item),
            AbilitySource::Innate(_) => None,
        };
        let mut cx = HookCx {
            entities: &mut *entities,
            battlefield: Some(&mut self.field),
            outbox: &mut *outbox,
            content: env.content,
            rng: env.rng,
            turn: self.turn,
            nonce,
            game_seed: self.game_seed,
        };
        apply_ability(&mut cx, &action.ability, item, caster, targets)?;
        drop(cx);

        for &target in targets {
            if let Some(character) = entities.character(target) {
                if !character.is_alive() {
                    outbox.say(format!("{} falls!", character.name));
                }
            }
        }

        self.end_turn(entities, outbox, env, nonce, caster)
    }

    /// Deferred per-turn cleanup: the caster's own effects tick, and
    /// battlefield effects attributed to the caster tick or expire.
    fn end_turn(
        &mut self,
        entities: &mut Entities,
        outbox: &mut Outbox,
        env: &GameEnv<'_>,
        nonce: u64,
        caster: CharacterId,
    ) -> Result<(), EngineError> {
        let mut cx = HookCx {
            entities: &mut *entities,
            battlefield: Some(&mut self.field),
            outbox: &mut *outbox,
            content: env.content,
            rng: env.rng,
            turn: self.turn,
            nonce,
            game_seed: self.game_seed,
        };
        tick_character(&mut cx, caster)?;
        tick_battlefield(&mut cx, caster)?;
        Ok(())
    }

    fn check_terminal(&self, entities: &Entities) -> Option<BattleOutcome> {
        if self.field.retreat {
            return Some(BattleOutcome::Retreated);
        }
        let mut players_alive = false;
        let mut enemies_alive = false;
        for id in self.field.occupants() {
            if let Some(character) = entities.character(id) {
                if character.is_alive() {
                    if character.is_player_controlled() {
                        players_alive = true;
                    } else {
                        enemies_alive = true;
                    }
                }
            }
        }
        if !players_alive {
            Some(BattleOutcome::AllPlayersDead)
        } else if !enemies_alive {
            Some(BattleOutcome::AllEnemiesDead)
        } else {
            None
        }
    }

    fn prompt_abilities(
        &self,
        entities: &Entities,
        outbox: &mut Outbox,
        actor: CharacterId,
        actions: &[LegalAction],
    ) {
        let name = entities
            .character(actor)
            .map(|c| c.name.clone())
            .unwrap_or_default();
        let labels: Vec<String> = actions
            .iter()
            .map(|a| match a.source {
                AbilitySource::Innate(_) => a.ability.name.clone(),
                AbilitySource::Held(item, _) => {
                    let item_name = entities
                        .item(item)
                        .map(|i| i.name.as_str())
                        .unwrap_or("item");
                    format!("{} [{}]", a.ability.name, item_name)
                }
            })
            .collect();
        let (text, icons) = render_numbered(&format!("{name}, choose an ability:"), &labels);
        outbox.prompt(text, icons);
    }

    fn prompt_targets(&self, entities: &Entities, outbox: &mut Outbox, action: &LegalAction) {
        let labels: Vec<String> = action
            .candidates
            .iter()
            .map(|&id| {
                entities
                    .character(id)
                    .map(|c| format!("{} ({}/{})", c.name, c.current_hp, c.hp))
                    .unwrap_or_default()
            })
            .collect();
        let (text, icons) = render_numbered(
            &format!("Choose targets for {}:", action.ability.name),
            &labels,
        );
        outbox.prompt(text, icons);
    }
}

/// Finds the source ability on its owner and records the use.
///
/// The ability must still resolve and carry the expected name; anything
/// else means the menu offer went stale through a bug, not player input.
fn record_source_use(
    entities: &mut Entities,
    caster: CharacterId,
    source: &AbilitySource,
    name: &str,
    battle_turn: u64,
) -> Result<(), InvariantError> {
    let ability = match *source {
        AbilitySource::Innate(i) => entities.require_character_mut(caster)?.abilities.get_mut(i),
        AbilitySource::Held(item, i) => {
            entities.item_mut(item).and_then(|it| it.abilities.get_mut(i))
        }
    };
    match ability {
        Some(ability) if ability.name == name => {
            ability.record_use(battle_turn);
            Ok(())
        }
        _ => Err(InvariantError::DanglingAbility),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::entity::{ActorId, Speed};
    use crate::env::CharacterTemplate;
    use crate::rng::PcgRng;
    use crate::testutil::{NullContent, spawn_plain};
    use crate::world::Directions;

    fn empty_room() -> Room {
        Room {
            directions: Directions::sealed(),
            entities: Vec::new(),
            floor_items: Vec::new(),
            visited: true,
            encounter: None,
            behavior: None,
        }
    }

    fn template(name: &str, positions: [Vec<String>; 3]) -> EncounterTemplate {
        EncounterTemplate {
            name: name.into(),
            positions,
            effects: Default::default(),
        }
    }

    #[test]
    fn spawn_rejects_unowned_combatant_without_turn_logic() {
        let mut entities = Entities::new();
        let lurker = spawn_plain(&mut entities, "lurker", 5, Speed::Normal);
        let mut room = empty_room();
        room.entities.push(EntityRef::Character(lurker));

        let content = NullContent;
        let env = GameEnv::new(&content, &PcgRng);
        let err = Encounter::spawn(
            &env,
            &mut entities,
            &mut room,
            template("ambush", [vec!["lurker".into()], Vec::new(), Vec::new()]),
            &[],
            0,
        )
        .unwrap_err();
        assert_eq!(err, ContentError::MissingTurnLogic("lurker".into()));
    }

    #[test]
    fn character_location_failure_is_an_invariant_breach() {
        let mut entities = Entities::new();
        let stray = spawn_plain(&mut entities, "stray", 5, Speed::Normal);
        let field = Battlefield::empty();
        assert_eq!(
            character_location(&field, stray),
            Err(InvariantError::NotOnBattlefield(stray))
        );
    }

    #[test]
    fn move_to_relocates_between_slots() {
        let mut entities = Entities::new();
        let a = spawn_plain(&mut entities, "a", 5, Speed::Normal);
        let mut field = Battlefield::empty();
        field.place(0, a);
        assert_eq!(field.location_of(a), Some((0, 0)));
        field.move_to(a, 2);
        assert_eq!(field.location_of(a), Some((2, 0)));
        assert!(field.slots[0].is_empty());
    }

    #[test]
    fn encounter_with_no_enemies_completes_immediately() {
        let mut entities = Entities::new();
        let hero = entities.spawn_character(CharacterTemplate {
            name: "hero".into(),
            hp: 10,
            speed: Speed::Normal,
            owner: Some(ActorId(1)),
            abilities: Vec::new(),
            items: Vec::new(),
            effects: Vec::new(),
            behavior: None,
        });
        let mut room = empty_room();

        let content = NullContent;
        let env = GameEnv::new(&content, &PcgRng);
        let mut encounter = Encounter::spawn(
            &env,
            &mut entities,
            &mut room,
            template("nothing", Default::default()),
            &[hero],
            0,
        )
        .unwrap();

        let mut outbox = Outbox::new();
        encounter
            .advance(&mut entities, &mut outbox, &env, 1)
            .unwrap();
        assert_eq!(encounter.outcome(), Some(BattleOutcome::AllEnemiesDead));
        assert_eq!(encounter.focus(), None);
    }
}
