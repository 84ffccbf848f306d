//! World state: floors, rooms, and the party's current location.
mod floor;
mod room;

pub use floor::{Floor, RoomLocation};
pub use room::{Direction, Directions, Room};

use crate::entity::{Entities, EntityRef};
use crate::env::GameEnv;
use crate::error::{ContentError, InvariantError};

/// Runtime world data for one game instance.
#[derive(Debug)]
pub struct WorldState {
    pub floors: Vec<Floor>,
    pub current_floor: usize,
    pub location: RoomLocation,
    pub previous_location: Option<RoomLocation>,
}

impl WorldState {
    /// Builds the world from a named floor template, instantiating every
    /// referenced room, creature, interactable, and floor item into the
    /// arena.
    pub fn from_template(
        env: &GameEnv<'_>,
        floor_name: &str,
        entities: &mut Entities,
    ) -> Result<Self, ContentError> {
        let template = env.content.floor(floor_name)?;
        let mut rows = Vec::with_capacity(template.rooms.len());
        for row in &template.rooms {
            let mut rooms = Vec::with_capacity(row.len());
            for room_name in row {
                let spec = env.content.room(room_name)?;
                let mut entity_refs = Vec::new();
                for creature_name in &spec.creatures {
                    let creature = env.content.creature(creature_name)?;
                    entity_refs.push(EntityRef::Character(entities.spawn_character(creature)));
                }
                for interactable_name in &spec.interactables {
                    let interactable = env.content.interactable(interactable_name)?;
                    entity_refs.push(EntityRef::Interactable(
                        entities.spawn_interactable(interactable),
                    ));
                }
                let mut floor_items = Vec::new();
                for item_name in &spec.floor_items {
                    let item = env.content.item(item_name)?;
                    floor_items.push(entities.spawn_item(item));
                }
                rooms.push(Room {
                    directions: spec.directions,
                    entities: entity_refs,
                    floor_items,
                    visited: false,
                    encounter: spec.encounter,
                    behavior: spec.behavior,
                });
            }
            rows.push(rooms);
        }

        let starting = RoomLocation::new(template.starting_room.0, template.starting_room.1);
        let mut floor = Floor::new(template.name, rows, starting);
        floor.visited = true;
        if let Some(room) = floor.room_mut(starting) {
            room.visited = true;
        }

        Ok(Self {
            floors: vec![floor],
            current_floor: 0,
            location: starting,
            previous_location: None,
        })
    }

    pub fn floor(&self) -> Result<&Floor, InvariantError> {
        self.floors
            .get(self.current_floor)
            .ok_or(InvariantError::RoomOutOfBounds)
    }

    pub fn floor_mut(&mut self) -> Result<&mut Floor, InvariantError> {
        self.floors
            .get_mut(self.current_floor)
            .ok_or(InvariantError::RoomOutOfBounds)
    }

    /// The room the party currently occupies.
    pub fn current_room(&self) -> Result<&Room, InvariantError> {
        self.floor()?
            .room(self.location)
            .ok_or(InvariantError::RoomOutOfBounds)
    }

    pub fn current_room_mut(&mut self) -> Result<&mut Room, InvariantError> {
        let location = self.location;
        self.floor_mut()?
            .room_mut(location)
            .ok_or(InvariantError::RoomOutOfBounds)
    }

    /// Every room across every floor, for whole-world effect sweeps.
    pub fn all_rooms(&self) -> impl Iterator<Item = &Room> {
        self.floors.iter().flat_map(Floor::rooms_iter)
    }
}
