//! Room action handlers: menu dispatch, movement, inventory transfer,
//! inspection, and interaction sub-flows.

use super::{ExplorationEngine, ExploreCx, ExploreOutcome, ExploreState};
use crate::behavior::Capability;
use crate::entity::{CharacterId, EntityRef, InteractableId, ItemId};
use crate::error::{EngineError, InputError, InvariantError};
use crate::input::{InputEvent, ReactionIcon, render_numbered};
use crate::world::Direction;

/// One entry of the ground-transfer menu: floor items first, then carried
/// items. Exactly one transfer direction may be confirmed at a time.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GroundOffer {
    PickUp(ItemId),
    Drop(ItemId),
}

impl ExplorationEngine {
    /// Dispatches an action-icon toggle from the idle menu.
    pub(crate) fn handle_menu_toggle(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        match event.toggled {
            ReactionIcon::Move => {
                let exits = cx.world.current_room()?.directions.open_exits();
                if exits.is_empty() {
                    cx.outbox.say("Every way out of this room is sealed.");
                    self.show_menu(cx, actor)?;
                    return Ok(ExploreOutcome::Stay);
                }
                prompt_exits(cx, &exits);
                self.state = ExploreState::SelectMove { exits };
                Ok(ExploreOutcome::Stay)
            }
            ReactionIcon::Talk => {
                let npcs = talkable_characters(cx, actor)?;
                if npcs.is_empty() {
                    cx.outbox.say("There is no one here to talk to.");
                    self.show_menu(cx, actor)?;
                    return Ok(ExploreOutcome::Stay);
                }
                prompt_characters(cx, "Talk to whom?", &npcs);
                self.state = ExploreState::SelectTalk { npcs };
                Ok(ExploreOutcome::Stay)
            }
            ReactionIcon::Inspect => {
                let targets = inspectable_entities(cx, actor)?;
                if targets.is_empty() {
                    cx.outbox.say("Nothing here rewards a closer look.");
                    self.show_menu(cx, actor)?;
                    return Ok(ExploreOutcome::Stay);
                }
                prompt_entities(cx, "Inspect what?", &targets);
                self.state = ExploreState::SelectInspect { targets };
                Ok(ExploreOutcome::Stay)
            }
            ReactionIcon::Interact => {
                let targets = interactable_targets(cx)?;
                if targets.is_empty() {
                    cx.outbox.say("Nothing here responds to your touch.");
                    self.show_menu(cx, actor)?;
                    return Ok(ExploreOutcome::Stay);
                }
                prompt_interactables(cx, &targets);
                self.state = ExploreState::SelectInteract { targets };
                Ok(ExploreOutcome::Stay)
            }
            ReactionIcon::Ground => {
                let offers = ground_offers(cx, actor)?;
                if offers.is_empty() {
                    cx.outbox.say("There is nothing to pick up or drop.");
                    self.show_menu(cx, actor)?;
                    return Ok(ExploreOutcome::Stay);
                }
                prompt_ground(cx, &offers);
                self.state = ExploreState::SelectGround { offers };
                Ok(ExploreOutcome::Stay)
            }
            ReactionIcon::Pass => {
                let name = cx.entities.require_character(actor)?.name.clone();
                cx.outbox.say(format!("{name} waits and watches."));
                Ok(ExploreOutcome::TurnEnded)
            }
            ReactionIcon::Info => {
                narrate_info(cx, actor)?;
                self.show_menu(cx, actor)?;
                Ok(ExploreOutcome::Stay)
            }
            ReactionIcon::Battle => {
                match cx.world.current_room()?.encounter.clone() {
                    Some(encounter) => Ok(ExploreOutcome::BattleRequested { encounter }),
                    None => {
                        cx.outbox.say(InputError::NothingToFight.to_string());
                        self.show_menu(cx, actor)?;
                        Ok(ExploreOutcome::Stay)
                    }
                }
            }
            // Numbers, confirm, cancel mean nothing at the idle menu.
            _ => Ok(ExploreOutcome::Stay),
        }
    }

    pub(crate) fn handle_move(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        exits: Vec<Direction>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectMove { exits };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(exits.len());
        if picked.len() != 1 {
            let again = exits.clone();
            return self.reprompt(
                cx,
                InputError::ExactlyOneRequired,
                ExploreState::SelectMove { exits },
                |cx| prompt_exits(cx, &again),
            );
        }
        let direction = exits[picked[0]];
        if !cx.world.current_room()?.directions.passable(direction) {
            let again = exits.clone();
            return self.reprompt(
                cx,
                InputError::StaleSelection,
                ExploreState::SelectMove { exits },
                |cx| prompt_exits(cx, &again),
            );
        }
        perform_move(cx, actor, direction)?;
        Ok(ExploreOutcome::TurnEnded)
    }

    pub(crate) fn handle_ground(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        offers: Vec<GroundOffer>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectGround { offers };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(offers.len());
        if picked.is_empty() {
            let again = offers.clone();
            return self.reprompt(
                cx,
                InputError::EmptySelection,
                ExploreState::SelectGround { offers },
                |cx| prompt_ground(cx, &again),
            );
        }
        let chosen: Vec<GroundOffer> = picked.iter().map(|&i| offers[i]).collect();
        let picking_up = matches!(chosen[0], GroundOffer::PickUp(_));
        if chosen
            .iter()
            .any(|offer| matches!(offer, GroundOffer::PickUp(_)) != picking_up)
        {
            let again = offers.clone();
            return self.reprompt(
                cx,
                InputError::MixedTransfer,
                ExploreState::SelectGround { offers },
                |cx| prompt_ground(cx, &again),
            );
        }
        for offer in chosen {
            match offer {
                GroundOffer::PickUp(item) => pick_up(cx, actor, item)?,
                GroundOffer::Drop(item) => drop_item(cx, actor, item)?,
            }
        }
        Ok(ExploreOutcome::TurnEnded)
    }

    pub(crate) fn handle_inspect(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        targets: Vec<EntityRef>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectInspect { targets };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(targets.len());
        if picked.len() != 1 {
            let again = targets.clone();
            return self.reprompt(
                cx,
                InputError::ExactlyOneRequired,
                ExploreState::SelectInspect { targets },
                |cx| prompt_entities(cx, "Inspect what?", &again),
            );
        }
        let target = targets[picked[0]];
        let behavior = match target {
            EntityRef::Character(id) => cx.entities.character(id).and_then(|c| c.behavior.clone()),
            EntityRef::Interactable(id) => {
                cx.entities.interactable(id).map(|i| i.behavior.clone())
            }
        };
        match behavior {
            Some(behavior) => {
                let mut hook = cx.hook_cx();
                behavior.on_inspect(&mut hook, target, actor)?;
            }
            None => cx.outbox.say("You find nothing remarkable."),
        }
        Ok(ExploreOutcome::TurnEnded)
    }

    pub(crate) fn handle_interact(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        targets: Vec<InteractableId>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectInteract { targets };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(targets.len());
        if picked.len() != 1 {
            let again = targets.clone();
            return self.reprompt(
                cx,
                InputError::ExactlyOneRequired,
                ExploreState::SelectInteract { targets },
                |cx| prompt_interactables(cx, &again),
            );
        }
        let target = targets[picked[0]];
        let behavior = cx
            .entities
            .interactable(target)
            .map(|i| i.behavior.clone())
            .ok_or(InvariantError::DanglingAbility)?;

        let carried = cx.entities.require_character(actor)?.items.clone();
        if behavior.wants_item() && !carried.is_empty() {
            prompt_items(cx, "Offer which item?", &carried);
            self.state = ExploreState::SelectInteractItem {
                target,
                items: carried,
            };
            return Ok(ExploreOutcome::Stay);
        }

        let mut hook = cx.hook_cx();
        behavior.on_interact(&mut hook, target, actor, None)?;
        Ok(ExploreOutcome::TurnEnded)
    }

    pub(crate) fn handle_interact_item(
        &mut self,
        cx: &mut ExploreCx<'_>,
        actor: CharacterId,
        target: InteractableId,
        items: Vec<ItemId>,
        event: &InputEvent,
    ) -> Result<ExploreOutcome, EngineError> {
        if event.toggled != ReactionIcon::Confirm {
            self.state = ExploreState::SelectInteractItem { target, items };
            return Ok(ExploreOutcome::Stay);
        }
        let picked = event.selected_indices(items.len());
        if picked.len() != 1 {
            let again = items.clone();
            return self.reprompt(
                cx,
                InputError::ExactlyOneRequired,
                ExploreState::SelectInteractItem { target, items },
                |cx| prompt_items(cx, "Offer which item?", &again),
            );
        }
        let offered = items[picked[0]];
        let behavior = cx
            .entities
            .interactable(target)
            .map(|i| i.behavior.clone())
            .ok_or(InvariantError::DanglingAbility)?;
        let mut hook = cx.hook_cx();
        behavior.on_interact(&mut hook, target, actor, Some(offered))?;
        Ok(ExploreOutcome::TurnEnded)
    }
}

// ============================================================================
// Offer list builders
// ============================================================================

fn talkable_characters(
    cx: &ExploreCx<'_>,
    actor: CharacterId,
) -> Result<Vec<CharacterId>, EngineError> {
    let room = cx.world.current_room()?;
    Ok(room
        .characters()
        .filter(|&id| id != actor)
        .filter(|&id| {
            cx.entities
                .character(id)
                .is_some_and(|c| c.is_alive() && c.capabilities().contains(Capability::TALK))
        })
        .collect())
}

fn inspectable_entities(
    cx: &ExploreCx<'_>,
    actor: CharacterId,
) -> Result<Vec<EntityRef>, EngineError> {
    let room = cx.world.current_room()?;
    Ok(room
        .entities
        .iter()
        .copied()
        .filter(|entity| match entity {
            EntityRef::Character(id) => {
                *id != actor
                    && cx.entities.character(*id).is_some_and(|c| {
                        c.is_alive() && c.capabilities().contains(Capability::INSPECT)
                    })
            }
            EntityRef::Interactable(id) => cx
                .entities
                .interactable(*id)
                .is_some_and(|i| i.behavior.capabilities().contains(Capability::INSPECT)),
        })
        .collect())
}

fn interactable_targets(cx: &ExploreCx<'_>) -> Result<Vec<InteractableId>, EngineError> {
    let room = cx.world.current_room()?;
    Ok(room
        .interactables()
        .filter(|&id| {
            cx.entities
                .interactable(id)
                .is_some_and(|i| i.behavior.capabilities().contains(Capability::INTERACT))
        })
        .collect())
}

fn ground_offers(
    cx: &ExploreCx<'_>,
    actor: CharacterId,
) -> Result<Vec<GroundOffer>, EngineError> {
    let room = cx.world.current_room()?;
    let mut offers: Vec<GroundOffer> = room
        .floor_items
        .iter()
        .map(|&item| GroundOffer::PickUp(item))
        .collect();
    let character = cx.entities.require_character(actor)?;
    offers.extend(character.items.iter().map(|&item| GroundOffer::Drop(item)));
    Ok(offers)
}

// ============================================================================
// Actions
// ============================================================================

/// Movement: exit hook on the old room, then location update, then enter
/// hook and the visited mark on the new room.
fn perform_move(
    cx: &mut ExploreCx<'_>,
    actor: CharacterId,
    direction: Direction,
) -> Result<(), EngineError> {
    let floor = cx.world.floor()?;
    let (rows, cols) = (floor.rows(), floor.cols());
    let from = cx.world.location;
    let to = from
        .step(direction, rows, cols)
        .ok_or(InvariantError::RoomOutOfBounds)?;

    if let Some(behavior) = cx.world.current_room()?.behavior.clone() {
        let mut hook = cx.hook_cx();
        behavior.on_exit(&mut hook, from, actor)?;
    }

    cx.world.previous_location = Some(from);
    cx.world.location = to;

    // The party moves as one; keep room occupancy lists current.
    let party = cx.players.to_vec();
    if let Some(old_room) = cx.world.floor_mut()?.room_mut(from) {
        old_room
            .entities
            .retain(|e| !matches!(e, EntityRef::Character(id) if party.contains(id)));
    }
    let new_room = cx.world.current_room_mut()?;
    for &player in &party {
        new_room.entities.push(EntityRef::Character(player));
    }

    let name = cx.entities.require_character(actor)?.name.clone();
    cx.outbox.say(format!("{name} heads {direction}."));

    let enter_behavior = cx.world.current_room()?.behavior.clone();
    if let Some(behavior) = enter_behavior {
        let mut hook = cx.hook_cx();
        behavior.on_enter(&mut hook, to, actor)?;
    }
    cx.world.current_room_mut()?.visited = true;
    Ok(())
}

fn pick_up(cx: &mut ExploreCx<'_>, actor: CharacterId, item: ItemId) -> Result<(), EngineError> {
    let removed = cx.world.current_room_mut()?.remove_floor_item(item);
    if !removed {
        // Offer went stale between render and confirm; skip quietly.
        return Ok(());
    }
    let item_name = cx
        .entities
        .item(item)
        .map(|i| i.name.clone())
        .ok_or(InvariantError::DanglingAbility)?;
    cx.entities.give_item(actor, item)?;
    let name = cx.entities.require_character(actor)?.name.clone();
    cx.outbox.say(format!("{name} picks up the {item_name}."));
    Ok(())
}

fn drop_item(cx: &mut ExploreCx<'_>, actor: CharacterId, item: ItemId) -> Result<(), EngineError> {
    let held = {
        let character = cx.entities.require_character_mut(actor)?;
        let before = character.items.len();
        character.items.retain(|&i| i != item);
        character.items.len() != before
    };
    if !held {
        return Ok(());
    }
    let (item_name, passive_names) = {
        let record = cx.entities.item_mut(item).ok_or(InvariantError::DanglingAbility)?;
        record.owner = None;
        record.equipped = false;
        (
            record.name.clone(),
            record
                .effects
                .iter()
                .map(|fx| fx.name.clone())
                .collect::<Vec<_>>(),
        )
    };
    let character = cx.entities.require_character_mut(actor)?;
    for passive in &passive_names {
        if let Some(pos) = character.effects.iter().position(|fx| fx.name == *passive) {
            character.effects.remove(pos);
        }
    }
    let name = character.name.clone();
    cx.world.current_room_mut()?.floor_items.push(item);
    cx.outbox.say(format!("{name} drops the {item_name}."));
    Ok(())
}

fn narrate_info(cx: &mut ExploreCx<'_>, actor: CharacterId) -> Result<(), EngineError> {
    let character = cx.entities.require_character(actor)?;
    let items: Vec<&str> = character
        .items
        .iter()
        .filter_map(|&id| cx.entities.item(id).map(|i| i.name.as_str()))
        .collect();
    let effects: Vec<&str> = character.effects.iter().map(|fx| fx.name.as_str()).collect();
    let text = format!(
        "{} - hp {}/{}, speed {}. Carrying: {}. Effects: {}.",
        character.name,
        character.current_hp,
        character.hp,
        character.speed,
        if items.is_empty() { "nothing".to_string() } else { items.join(", ") },
        if effects.is_empty() { "none".to_string() } else { effects.join(", ") },
    );
    cx.outbox.say(text);
    Ok(())
}

// ============================================================================
// Sub-state prompts
// ============================================================================

pub(crate) fn prompt_exits(cx: &mut ExploreCx<'_>, exits: &[Direction]) {
    let labels: Vec<String> = exits.iter().map(Direction::to_string).collect();
    let (text, icons) = render_numbered("Which way?", &labels);
    cx.outbox.prompt(text, icons);
}

pub(crate) fn prompt_characters(cx: &mut ExploreCx<'_>, header: &str, ids: &[CharacterId]) {
    let labels: Vec<String> = ids
        .iter()
        .filter_map(|&id| cx.entities.character(id).map(|c| c.name.clone()))
        .collect();
    let (text, icons) = render_numbered(header, &labels);
    cx.outbox.prompt(text, icons);
}

pub(crate) fn prompt_entities(cx: &mut ExploreCx<'_>, header: &str, targets: &[EntityRef]) {
    let labels: Vec<String> = targets
        .iter()
        .map(|entity| match entity {
            EntityRef::Character(id) => cx
                .entities
                .character(*id)
                .map(|c| c.name.clone())
                .unwrap_or_default(),
            EntityRef::Interactable(id) => cx
                .entities
                .interactable(*id)
                .map(|i| i.name.clone())
                .unwrap_or_default(),
        })
        .collect();
    let (text, icons) = render_numbered(header, &labels);
    cx.outbox.prompt(text, icons);
}

pub(crate) fn prompt_interactables(cx: &mut ExploreCx<'_>, ids: &[InteractableId]) {
    let labels: Vec<String> = ids
        .iter()
        .filter_map(|&id| cx.entities.interactable(id).map(|i| i.name.clone()))
        .collect();
    let (text, icons) = render_numbered("Interact with what?", &labels);
    cx.outbox.prompt(text, icons);
}

pub(crate) fn prompt_items(cx: &mut ExploreCx<'_>, header: &str, items: &[ItemId]) {
    let labels: Vec<String> = items
        .iter()
        .filter_map(|&id| cx.entities.item(id).map(|i| i.name.clone()))
        .collect();
    let (text, icons) = render_numbered(header, &labels);
    cx.outbox.prompt(text, icons);
}

pub(crate) fn prompt_ground(cx: &mut ExploreCx<'_>, offers: &[GroundOffer]) {
    let labels: Vec<String> = offers
        .iter()
        .map(|offer| match offer {
            GroundOffer::PickUp(id) => cx
                .entities
                .item(*id)
                .map(|i| format!("take {}", i.name))
                .unwrap_or_default(),
            GroundOffer::Drop(id) => cx
                .entities
                .item(*id)
                .map(|i| format!("drop {}", i.name))
                .unwrap_or_default(),
        })
        .collect();
    let (text, icons) = render_numbered("Pick up or drop:", &labels);
    cx.outbox.prompt(text, icons);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::behavior::RoomBehavior;
    use crate::entity::{CharacterId, Entities};
    use crate::env::{GameEnv, ItemTemplate};
    use crate::error::InvariantError;
    use crate::explore::{ExplorationEngine, ExploreCx, ExploreOutcome, ExploreState};
    use crate::hooks::HookCx;
    use crate::input::{InputEvent, ReactionIcon};
    use crate::narration::Outbox;
    use crate::rng::PcgRng;
    use crate::testutil::{NullContent, spawn_plain};
    use crate::world::{Directions, Floor, Room, RoomLocation, WorldState};
    use std::sync::{Arc, Mutex};

    struct Recorder {
        label: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    impl RoomBehavior for Recorder {
        fn on_enter(
            &self,
            _cx: &mut HookCx<'_>,
            _location: RoomLocation,
            _who: CharacterId,
        ) -> Result<(), InvariantError> {
            self.log.lock().unwrap().push(format!("enter {}", self.label));
            Ok(())
        }

        fn on_exit(
            &self,
            _cx: &mut HookCx<'_>,
            _location: RoomLocation,
            _who: CharacterId,
        ) -> Result<(), InvariantError> {
            self.log.lock().unwrap().push(format!("exit {}", self.label));
            Ok(())
        }
    }

    fn room(directions: Directions, behavior: Option<Arc<dyn RoomBehavior>>) -> Room {
        Room {
            directions,
            entities: Vec::new(),
            floor_items: Vec::new(),
            visited: false,
            encounter: None,
            behavior,
        }
    }

    fn world_1x2(log: Option<&Arc<Mutex<Vec<String>>>>) -> WorldState {
        let recorder = |label| {
            log.map(|log| {
                Arc::new(Recorder {
                    label,
                    log: log.clone(),
                }) as Arc<dyn RoomBehavior>
            })
        };
        let left = room(Directions::new(false, false, false, true), recorder("left"));
        let right = room(Directions::new(false, false, true, false), recorder("right"));
        let mut floor = Floor::new("strip", vec![vec![left, right]], RoomLocation::new(0, 0));
        floor.visited = true;
        WorldState {
            floors: vec![floor],
            current_floor: 0,
            location: RoomLocation::new(0, 0),
            previous_location: None,
        }
    }

    fn plain_item(entities: &mut Entities, name: &str) -> crate::entity::ItemId {
        entities.spawn_item(ItemTemplate {
            name: name.into(),
            abilities: Vec::new(),
            effects: Vec::new(),
            equipped: false,
            behavior: None,
        })
    }

    #[test]
    fn moving_right_fires_exit_then_enter_and_marks_visited() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let mut world = world_1x2(Some(&log));
        let mut entities = Entities::new();
        let hero = spawn_plain(&mut entities, "hero", 10, Default::default());
        let mut outbox = Outbox::new();
        let content = NullContent;
        let rng = PcgRng;
        let players = [hero];

        let mut cx = ExploreCx {
            entities: &mut entities,
            world: &mut world,
            outbox: &mut outbox,
            env: GameEnv::new(&content, &rng),
            players: &players,
            nonce: 0,
            game_seed: 0,
        };
        perform_move(&mut cx, hero, Direction::Right).unwrap();
        drop(cx);

        assert_eq!(world.location, RoomLocation::new(0, 1));
        assert_eq!(world.previous_location, Some(RoomLocation::new(0, 0)));
        assert!(world.floor().unwrap().room(RoomLocation::new(0, 1)).unwrap().visited);
        assert_eq!(*log.lock().unwrap(), vec!["exit left", "enter right"]);
    }

    #[test]
    fn mixed_ground_transfer_is_rejected_without_mutation() {
        let mut world = world_1x2(None);
        let mut entities = Entities::new();
        let hero = spawn_plain(&mut entities, "hero", 10, Default::default());
        let coin = plain_item(&mut entities, "coin");
        let knife = plain_item(&mut entities, "knife");
        world
            .floor_mut()
            .unwrap()
            .room_mut(RoomLocation::new(0, 0))
            .unwrap()
            .floor_items
            .push(coin);
        entities.give_item(hero, knife).unwrap();

        let mut engine = ExplorationEngine::new();
        engine.focus = Some(hero);
        engine.state = ExploreState::SelectGround {
            offers: vec![GroundOffer::PickUp(coin), GroundOffer::Drop(knife)],
        };

        let mut outbox = Outbox::new();
        let content = NullContent;
        let rng = PcgRng;
        let players = [hero];
        let event = InputEvent {
            actor: crate::entity::ActorId(1),
            toggled: ReactionIcon::Confirm,
            selected: vec![
                ReactionIcon::Number(1),
                ReactionIcon::Number(2),
                ReactionIcon::Confirm,
            ],
            message_ref: 0,
        };
        let outcome = {
            let mut cx = ExploreCx {
                entities: &mut entities,
                world: &mut world,
                outbox: &mut outbox,
                env: GameEnv::new(&content, &rng),
                players: &players,
                nonce: 0,
                game_seed: 0,
            };
            engine.handle_input(&mut cx, &event).unwrap()
        };

        assert!(matches!(outcome, ExploreOutcome::Stay));
        assert!(matches!(engine.state, ExploreState::SelectGround { .. }));
        assert_eq!(entities.character(hero).unwrap().items, vec![knife]);
        let floor_items = &world
            .floor()
            .unwrap()
            .room(RoomLocation::new(0, 0))
            .unwrap()
            .floor_items;
        assert_eq!(floor_items, &vec![coin]);
    }
}
