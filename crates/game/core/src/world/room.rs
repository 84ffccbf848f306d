//! Rooms and the exits between them.

use std::sync::Arc;

use crate::behavior::RoomBehavior;
use crate::entity::{CharacterId, EntityRef, InteractableId, ItemId};

/// Cardinal exploration direction.
///
/// Deltas are row-major grid offsets: up goes one row toward the top of the
/// floor, right goes one column east.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display, strum::EnumIter)]
#[strum(serialize_all = "lowercase")]
pub enum Direction {
    Up,
    Down,
    Left,
    Right,
}

impl Direction {
    /// `(row, col)` offset of one step in this direction.
    pub const fn delta(&self) -> (i32, i32) {
        match self {
            Self::Up => (-1, 0),
            Self::Down => (1, 0),
            Self::Left => (0, -1),
            Self::Right => (0, 1),
        }
    }
}

/// Passability of the four exits of a room.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Directions {
    pub up: bool,
    pub down: bool,
    pub left: bool,
    pub right: bool,
}

impl Directions {
    pub const fn sealed() -> Self {
        Self {
            up: false,
            down: false,
            left: false,
            right: false,
        }
    }

    pub const fn new(up: bool, down: bool, left: bool, right: bool) -> Self {
        Self {
            up,
            down,
            left,
            right,
        }
    }

    pub const fn passable(&self, direction: Direction) -> bool {
        match direction {
            Direction::Up => self.up,
            Direction::Down => self.down,
            Direction::Left => self.left,
            Direction::Right => self.right,
        }
    }

    /// Currently-passable exits in a stable listing order.
    pub fn open_exits(&self) -> Vec<Direction> {
        use strum::IntoEnumIterator;
        Direction::iter().filter(|d| self.passable(*d)).collect()
    }
}

/// One room of a floor grid.
pub struct Room {
    pub directions: Directions,
    /// Characters and interactables present, in arrival order.
    pub entities: Vec<EntityRef>,
    /// Items lying on the floor.
    pub floor_items: Vec<ItemId>,
    pub visited: bool,
    /// Encounter template behind the battle affordance, if any.
    pub encounter: Option<String>,
    pub behavior: Option<Arc<dyn RoomBehavior>>,
}

impl Room {
    /// Characters present, in arrival order.
    pub fn characters(&self) -> impl Iterator<Item = CharacterId> + '_ {
        self.entities.iter().filter_map(|e| match e {
            EntityRef::Character(id) => Some(*id),
            EntityRef::Interactable(_) => None,
        })
    }

    /// Interactables present, in arrival order.
    pub fn interactables(&self) -> impl Iterator<Item = InteractableId> + '_ {
        self.entities.iter().filter_map(|e| match e {
            EntityRef::Character(_) => None,
            EntityRef::Interactable(id) => Some(*id),
        })
    }

    pub fn remove_floor_item(&mut self, item: ItemId) -> bool {
        let before = self.floor_items.len();
        self.floor_items.retain(|i| *i != item);
        self.floor_items.len() != before
    }
}

impl std::fmt::Debug for Room {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Room")
            .field("directions", &self.directions)
            .field("entities", &self.entities)
            .field("floor_items", &self.floor_items)
            .field("visited", &self.visited)
            .field("encounter", &self.encounter)
            .finish()
    }
}
