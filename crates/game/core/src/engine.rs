//! Game façade: one instance of the whole rules core.
//!
//! Owns the entity arena, the world, both engines, and the narration
//! outbox. Every external [`InputEvent`] enters through
//! [`Game::handle_input`], is validated against the engine that currently
//! owns focus (Exploration by default, Encounter while a battle is
//! active), and runs to completion before the next event is accepted.

use crate::combat::{BattleOutcome, Encounter, tick_character};
use crate::config::GameConfig;
use crate::entity::{ActorId, CharacterId, Entities, EntityRef};
use crate::env::GameEnv;
use crate::error::{EngineError, InputError};
use crate::explore::{ExplorationEngine, ExploreCx, ExploreOutcome, ExploreState};
use crate::hooks::HookCx;
use crate::input::InputEvent;
use crate::narration::{Narration, Outbox};
use crate::world::WorldState;

/// One player joining a new game: controlling actor, class template, and
/// the character's display name.
#[derive(Clone, Debug)]
pub struct PartyMember {
    pub actor: ActorId,
    pub class: String,
    pub name: String,
}

/// A complete game instance.
pub struct Game {
    pub config: GameConfig,
    pub entities: Entities,
    pub world: WorldState,
    /// Player characters in join order; exploration focus rotates through
    /// the living ones.
    pub players: Vec<CharacterId>,
    pub explore: ExplorationEngine,
    /// Present while a battle owns focus.
    pub encounter: Option<Encounter>,
    outbox: Outbox,
    /// Event sequence number, mixed into roll seeds.
    nonce: u64,
}

impl Game {
    /// Builds a game on the named floor and hands focus to the first
    /// player.
    pub fn new(
        env: &GameEnv<'_>,
        config: GameConfig,
        floor: &str,
        party: &[PartyMember],
    ) -> Result<Self, EngineError> {
        let mut entities = Entities::new();
        let mut world = WorldState::from_template(env, floor, &mut entities)?;

        let mut players = Vec::with_capacity(party.len());
        for member in party {
            let template = env
                .content
                .class(&member.class)?
                .claimed_by(member.actor, member.name.clone());
            let id = entities.spawn_character(template);
            world
                .current_room_mut()?
                .entities
                .push(EntityRef::Character(id));
            players.push(id);
        }

        let mut game = Self {
            config,
            entities,
            world,
            players,
            explore: ExplorationEngine::new(),
            encounter: None,
            outbox: Outbox::new(),
            nonce: 0,
        };
        game.advance_exploration_focus(env, None)?;
        Ok(game)
    }

    /// The character currently authorized to act, across both engines.
    pub fn focus(&self) -> Option<CharacterId> {
        match &self.encounter {
            Some(encounter) => encounter.focus(),
            None => self.explore.focus,
        }
    }

    /// Drains pending narration in generation order.
    pub fn drain_narration(&mut self) -> Vec<Narration> {
        self.outbox.drain()
    }

    /// Processes one input event to completion.
    ///
    /// Recoverable input problems (actor mismatch, bad selections) are
    /// narrated back and leave state untouched; only content and invariant
    /// failures surface as errors.
    pub fn handle_input(
        &mut self,
        env: &GameEnv<'_>,
        event: &InputEvent,
    ) -> Result<(), EngineError> {
        self.nonce += 1;

        if let Some(mut encounter) = self.encounter.take() {
            let expected = encounter
                .focus()
                .and_then(|id| self.entities.character(id))
                .and_then(|c| c.owner);
            if expected != Some(event.actor) {
                self.outbox.say(InputError::NotYourTurn.to_string());
                self.encounter = Some(encounter);
                return Ok(());
            }
            encounter.handle_input(&mut self.entities, &mut self.outbox, env, self.nonce, event)?;
            match encounter.outcome() {
                Some(outcome) => self.finish_encounter(env, outcome),
                None => {
                    self.encounter = Some(encounter);
                    Ok(())
                }
            }
        } else {
            let Some(focus) = self.explore.focus else {
                // Game over: nothing left to act.
                return Ok(());
            };
            let expected = self.entities.character(focus).and_then(|c| c.owner);
            if expected != Some(event.actor) {
                self.outbox.say(InputError::NotYourTurn.to_string());
                return Ok(());
            }
            let outcome = {
                let nonce = self.nonce;
                let game_seed = self.config.game_seed;
                let Self {
                    entities,
                    world,
                    outbox,
                    explore,
                    players,
                    ..
                } = self;
                let mut cx = ExploreCx {
                    entities,
                    world,
                    outbox,
                    env: *env,
                    players: players.as_slice(),
                    nonce,
                    game_seed,
                };
                explore.handle_input(&mut cx, event)?
            };
            self.resolve_explore_outcome(env, focus, outcome)
        }
    }

    fn resolve_explore_outcome(
        &mut self,
        env: &GameEnv<'_>,
        actor: CharacterId,
        outcome: ExploreOutcome,
    ) -> Result<(), EngineError> {
        match outcome {
            ExploreOutcome::Stay => Ok(()),
            ExploreOutcome::TurnEnded => {
                self.cleanup_current_character(env)?;
                self.advance_exploration_focus(env, Some(actor))
            }
            ExploreOutcome::BattleRequested { encounter } => {
                self.start_encounter(env, actor, &encounter)
            }
        }
    }

    /// Spawns an encounter, hands off the acting character, and drains
    /// automatic turns until a player prompt or an immediate outcome.
    fn start_encounter(
        &mut self,
        env: &GameEnv<'_>,
        actor: CharacterId,
        name: &str,
    ) -> Result<(), EngineError> {
        let template = env.content.encounter(name)?;
        let room = self.world.current_room_mut()?;
        let mut encounter = Encounter::spawn(
            env,
            &mut self.entities,
            room,
            template,
            &[actor],
            self.config.game_seed,
        )?;
        self.outbox
            .say(format!("Steel is drawn: {}!", encounter.name));
        encounter.advance(&mut self.entities, &mut self.outbox, env, self.nonce)?;
        match encounter.outcome() {
            Some(outcome) => self.finish_encounter(env, outcome),
            None => {
                self.encounter = Some(encounter);
                Ok(())
            }
        }
    }

    /// Encounter completion: narrate the result, resume any suspended
    /// dialogue, otherwise fall through to normal turn cleanup.
    fn finish_encounter(
        &mut self,
        env: &GameEnv<'_>,
        outcome: BattleOutcome,
    ) -> Result<(), EngineError> {
        self.encounter = None;
        self.outbox.say(match outcome {
            BattleOutcome::AllEnemiesDead => "The last foe falls; the battle is won.",
            BattleOutcome::AllPlayersDead => "The party is overwhelmed.",
            BattleOutcome::Retreated => "The battle breaks off.",
        });

        let Some(actor) = self.explore.focus else {
            return Err(crate::error::InvariantError::NoFocus.into());
        };
        let victorious = outcome == BattleOutcome::AllEnemiesDead;
        let next = {
            let nonce = self.nonce;
            let game_seed = self.config.game_seed;
            let Self {
                entities,
                world,
                outbox,
                explore,
                players,
                ..
            } = self;
            let mut cx = ExploreCx {
                entities,
                world,
                outbox,
                env: *env,
                players: players.as_slice(),
                nonce,
                game_seed,
            };
            explore.on_encounter_complete(&mut cx, actor, victorious)?
        };
        self.resolve_explore_outcome(env, actor, next)
    }

    /// Turn cleanup: runs the tick lifecycle over every live character
    /// across all rooms and floors that holds any active effect, plus all
    /// current players, then resets focus and returns the engine to
    /// `EXPLORING`.
    fn cleanup_current_character(&mut self, env: &GameEnv<'_>) -> Result<(), EngineError> {
        let mut ids = self.entities.characters_with_effects();
        for &player in &self.players {
            if !ids.contains(&player) {
                ids.push(player);
            }
        }
        ids.retain(|&id| {
            self.entities
                .character(id)
                .is_some_and(|c| c.is_alive())
        });

        let mut cx = HookCx {
            entities: &mut self.entities,
            battlefield: None,
            outbox: &mut self.outbox,
            content: env.content,
            rng: env.rng,
            turn: 0,
            nonce: self.nonce,
            game_seed: self.config.game_seed,
        };
        for id in ids {
            tick_character(&mut cx, id)?;
        }

        self.explore.focus = None;
        self.explore.state = ExploreState::Exploring;
        Ok(())
    }

    /// Moves exploration focus to the next living player after `after` in
    /// join order (wrapping), or the first living player when starting
    /// fresh, and shows them the room menu. With no living player left the
    /// game is over and focus stays null.
    fn advance_exploration_focus(
        &mut self,
        env: &GameEnv<'_>,
        after: Option<CharacterId>,
    ) -> Result<(), EngineError> {
        let alive = |id: &CharacterId| {
            self.entities
                .character(*id)
                .is_some_and(|c| c.is_alive())
        };
        let next = match after.and_then(|a| self.players.iter().position(|&p| p == a)) {
            Some(index) => (1..=self.players.len())
                .map(|offset| self.players[(index + offset) % self.players.len()])
                .find(|id| alive(id)),
            None => self.players.iter().copied().find(|id| alive(id)),
        };

        let Some(next) = next else {
            self.outbox
                .say("The party has fallen. The adventure ends here.");
            self.explore.focus = None;
            return Ok(());
        };

        self.explore.focus = Some(next);
        let nonce = self.nonce;
        let game_seed = self.config.game_seed;
        let Self {
            entities,
            world,
            outbox,
            explore,
            players,
            ..
        } = self;
        let mut cx = ExploreCx {
            entities,
            world,
            outbox,
            env: *env,
            players: players.as_slice(),
            nonce,
            game_seed,
        };
        explore.show_menu(&mut cx, next)?;
        Ok(())
    }
}
