//! Floors: 2D grids of rooms.

use super::room::{Direction, Room};

/// Grid coordinates of a room on its floor, row-major.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct RoomLocation {
    pub row: usize,
    pub col: usize,
}

impl RoomLocation {
    pub const fn new(row: usize, col: usize) -> Self {
        Self { row, col }
    }

    /// The location one step away, or `None` when the step leaves the
    /// `rows` x `cols` grid.
    pub fn step(&self, direction: Direction, rows: usize, cols: usize) -> Option<RoomLocation> {
        let (dr, dc) = direction.delta();
        let row = self.row.checked_add_signed(dr as isize)?;
        let col = self.col.checked_add_signed(dc as isize)?;
        (row < rows && col < cols).then_some(RoomLocation { row, col })
    }
}

impl std::fmt::Display for RoomLocation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.row, self.col)
    }
}

/// One floor of the world.
#[derive(Debug)]
pub struct Floor {
    pub name: String,
    rooms: Vec<Vec<Room>>,
    pub starting_room: RoomLocation,
    pub visited: bool,
}

impl Floor {
    pub fn new(name: impl Into<String>, rooms: Vec<Vec<Room>>, starting_room: RoomLocation) -> Self {
        Self {
            name: name.into(),
            rooms,
            starting_room,
            visited: false,
        }
    }

    pub fn rows(&self) -> usize {
        self.rooms.len()
    }

    pub fn cols(&self) -> usize {
        self.rooms.first().map(Vec::len).unwrap_or(0)
    }

    pub fn room(&self, location: RoomLocation) -> Option<&Room> {
        self.rooms.get(location.row)?.get(location.col)
    }

    pub fn room_mut(&mut self, location: RoomLocation) -> Option<&mut Room> {
        self.rooms.get_mut(location.row)?.get_mut(location.col)
    }

    pub fn rooms_mut(&mut self) -> impl Iterator<Item = &mut Room> {
        self.rooms.iter_mut().flatten()
    }

    pub fn rooms_iter(&self) -> impl Iterator<Item = &Room> {
        self.rooms.iter().flatten()
    }
}
