//! Board model: positions, sides, cells and the 15×15 grid.
//!
//! ## Coordinates
//!
//! `x` grows to the right and `y` grows downward. Valid positions are
//! `[0, 14] × [0, 14]`; anything else is rejected by [`Position::checked`]
//! and never stored on the board.
//!
//! ## Batch application
//!
//! [`BoardState::apply_changes`] commits a list of [`BoardChange`]s as one
//! unit. All `move` sources are vacated before anything is written, so
//! permutations and run shifts resolve the same way regardless of order.

use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

use crate::effects::{BoardChange, ChangeKind};

/// Board width and height.
pub const BOARD_SIZE: i32 = 15;

/// A board coordinate.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Position {
    pub x: i32,
    pub y: i32,
}

impl Position {
    /// Create a position without bounds checking.
    #[must_use]
    pub const fn new(x: i32, y: i32) -> Self {
        Self { x, y }
    }

    /// Create a position, returning `None` if it lies off the board.
    #[must_use]
    pub fn checked(x: i32, y: i32) -> Option<Self> {
        let pos = Self::new(x, y);
        pos.in_bounds().then_some(pos)
    }

    /// Check whether this position lies on the board.
    #[must_use]
    pub const fn in_bounds(self) -> bool {
        self.x >= 0 && self.x < BOARD_SIZE && self.y >= 0 && self.y < BOARD_SIZE
    }

    /// Step by a delta, returning `None` when leaving the board.
    #[must_use]
    pub fn offset(self, dx: i32, dy: i32) -> Option<Self> {
        Self::checked(self.x.checked_add(dx)?, self.y.checked_add(dy)?)
    }

    /// Step one cell in a direction.
    #[must_use]
    pub fn step(self, direction: Direction) -> Option<Self> {
        let (dx, dy) = direction.delta();
        self.offset(dx, dy)
    }

    /// Chebyshev (king-move) distance.
    #[must_use]
    pub fn chebyshev(self, other: Position) -> i32 {
        let dx = (i64::from(self.x) - i64::from(other.x)).abs();
        let dy = (i64::from(self.y) - i64::from(other.y)).abs();
        i32::try_from(dx.max(dy)).unwrap_or(i32::MAX)
    }

    /// Check whether `other` is one of the eight surrounding cells.
    #[must_use]
    pub fn is_adjacent(self, other: Position) -> bool {
        self != other && self.chebyshev(other) == 1
    }

    /// Point-mirror through the board centre.
    #[must_use]
    pub const fn mirrored(self) -> Self {
        Self::new(BOARD_SIZE - 1 - self.x, BOARD_SIZE - 1 - self.y)
    }

    /// The eight surrounding cells clipped to the board, in a fixed
    /// clockwise order starting north.
    pub fn neighbors(self) -> impl Iterator<Item = Position> {
        Direction::ALL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }

    /// The four orthogonal neighbours clipped to the board.
    pub fn orthogonal_neighbors(self) -> impl Iterator<Item = Position> {
        Direction::ORTHOGONAL
            .into_iter()
            .filter_map(move |direction| self.step(direction))
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "({}, {})", self.x, self.y)
    }
}

/// One of the eight board directions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Direction {
    Up,
    UpRight,
    Right,
    DownRight,
    Down,
    DownLeft,
    Left,
    UpLeft,
}

impl Direction {
    /// All directions, clockwise from north.
    pub const ALL: [Direction; 8] = [
        Direction::Up,
        Direction::UpRight,
        Direction::Right,
        Direction::DownRight,
        Direction::Down,
        Direction::DownLeft,
        Direction::Left,
        Direction::UpLeft,
    ];

    /// The four orthogonal directions.
    pub const ORTHOGONAL: [Direction; 4] = [
        Direction::Up,
        Direction::Right,
        Direction::Down,
        Direction::Left,
    ];

    /// The four axes (one direction per line through a cell).
    pub const AXES: [Direction; 4] = [
        Direction::Right,
        Direction::Down,
        Direction::DownRight,
        Direction::DownLeft,
    ];

    /// The `(dx, dy)` step for this direction.
    #[must_use]
    pub const fn delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (0, -1),
            Direction::UpRight => (1, -1),
            Direction::Right => (1, 0),
            Direction::DownRight => (1, 1),
            Direction::Down => (0, 1),
            Direction::DownLeft => (-1, 1),
            Direction::Left => (-1, 0),
            Direction::UpLeft => (-1, -1),
        }
    }

    /// The direction pointing the other way.
    #[must_use]
    pub const fn opposite(self) -> Self {
        match self {
            Direction::Up => Direction::Down,
            Direction::UpRight => Direction::DownLeft,
            Direction::Right => Direction::Left,
            Direction::DownRight => Direction::UpLeft,
            Direction::Down => Direction::Up,
            Direction::DownLeft => Direction::UpRight,
            Direction::Left => Direction::Right,
            Direction::UpLeft => Direction::DownRight,
        }
    }

    /// Check whether this is a diagonal direction.
    #[must_use]
    pub const fn is_diagonal(self) -> bool {
        let (dx, dy) = self.delta();
        dx != 0 && dy != 0
    }

    /// Parse a direction name as written in skill parameters.
    #[must_use]
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_ascii_lowercase().as_str() {
            "up" | "north" => Some(Direction::Up),
            "up_right" | "northeast" => Some(Direction::UpRight),
            "right" | "east" => Some(Direction::Right),
            "down_right" | "southeast" => Some(Direction::DownRight),
            "down" | "south" => Some(Direction::Down),
            "down_left" | "southwest" => Some(Direction::DownLeft),
            "left" | "west" => Some(Direction::Left),
            "up_left" | "northwest" => Some(Direction::UpLeft),
            _ => None,
        }
    }

    /// Unit step from one cell toward another: the sign of each delta.
    #[must_use]
    pub fn toward(from: Position, to: Position) -> Option<Self> {
        let dx = (i64::from(to.x) - i64::from(from.x)).signum() as i32;
        let dy = (i64::from(to.y) - i64::from(from.y)).signum() as i32;
        if (dx, dy) == (0, 0) {
            return None;
        }
        Direction::ALL.into_iter().find(|d| d.delta() == (dx, dy))
    }
}

/// Player-side marker owning a board cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    X,
    O,
}

impl Side {
    /// The other side.
    #[must_use]
    pub const fn opponent(self) -> Self {
        match self {
            Side::X => Side::O,
            Side::O => Side::X,
        }
    }
}

impl std::fmt::Display for Side {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Side::X => write!(f, "X"),
            Side::O => write!(f, "O"),
        }
    }
}

/// Contents of a single cell.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Cell {
    #[default]
    Empty,
    Piece(Side),
    /// Impassable sentinel owned by neither side.
    Blocked,
}

impl Cell {
    /// The owning side if this cell holds a piece.
    #[must_use]
    pub const fn side(self) -> Option<Side> {
        match self {
            Cell::Piece(side) => Some(side),
            _ => None,
        }
    }

    #[must_use]
    pub const fn is_empty(self) -> bool {
        matches!(self, Cell::Empty)
    }

    #[must_use]
    pub const fn is_piece(self) -> bool {
        matches!(self, Cell::Piece(_))
    }
}

/// Square or radius-bounded neighbourhood around a centre cell.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Area {
    pub center: Position,
    pub radius: i32,
}

impl Area {
    #[must_use]
    pub const fn new(center: Position, radius: i32) -> Self {
        Self { center, radius }
    }

    /// Check whether a position falls inside this area.
    #[must_use]
    pub fn contains(&self, pos: Position) -> bool {
        self.center.chebyshev(pos) <= self.radius
    }

    /// Every on-board cell of the area, row-major.
    #[must_use]
    pub fn cells(&self) -> SmallVec<[Position; 25]> {
        let mut cells = SmallVec::new();
        for y in (self.center.y - self.radius)..=(self.center.y + self.radius) {
            for x in (self.center.x - self.radius)..=(self.center.x + self.radius) {
                if let Some(pos) = Position::checked(x, y) {
                    cells.push(pos);
                }
            }
        }
        cells
    }
}

/// The 15×15 game board.
///
/// Cells are stored row-major (`cells[y][x]`). The board is a plain value:
/// handlers read it, and [`BoardState::apply_changes`] produces the next one.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct BoardState {
    cells: [[Cell; BOARD_SIZE as usize]; BOARD_SIZE as usize],
}

impl BoardState {
    /// Create an empty board.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a board from `(position, side)` pairs. Off-board entries are ignored.
    #[must_use]
    pub fn with_pieces(pieces: impl IntoIterator<Item = (Position, Side)>) -> Self {
        let mut board = Self::new();
        for (pos, side) in pieces {
            board.set(pos, Cell::Piece(side));
        }
        board
    }

    /// Get a cell, or `None` if the position is off the board.
    #[must_use]
    pub fn get(&self, pos: Position) -> Option<Cell> {
        pos.in_bounds()
            .then(|| self.cells[pos.y as usize][pos.x as usize])
    }

    /// The side occupying a cell, if any.
    #[must_use]
    pub fn side_at(&self, pos: Position) -> Option<Side> {
        self.get(pos).and_then(Cell::side)
    }

    /// Check whether a cell is on the board and empty.
    #[must_use]
    pub fn is_empty(&self, pos: Position) -> bool {
        matches!(self.get(pos), Some(Cell::Empty))
    }

    /// Check whether a cell holds a piece of the given side.
    #[must_use]
    pub fn is_side(&self, pos: Position, side: Side) -> bool {
        self.side_at(pos) == Some(side)
    }

    /// Overwrite a cell. Returns `false` for off-board positions.
    pub fn set(&mut self, pos: Position, cell: Cell) -> bool {
        if !pos.in_bounds() {
            return false;
        }
        self.cells[pos.y as usize][pos.x as usize] = cell;
        true
    }

    /// Iterate over every position, row-major.
    pub fn positions() -> impl Iterator<Item = Position> {
        (0..BOARD_SIZE).flat_map(|y| (0..BOARD_SIZE).map(move |x| Position::new(x, y)))
    }

    /// Every piece on the board as `(position, side)`, row-major.
    #[must_use]
    pub fn pieces(&self) -> Vec<(Position, Side)> {
        Self::positions()
            .filter_map(|pos| self.side_at(pos).map(|side| (pos, side)))
            .collect()
    }

    /// Positions held by one side, row-major.
    #[must_use]
    pub fn positions_of(&self, side: Side) -> Vec<Position> {
        Self::positions().filter(|&pos| self.is_side(pos, side)).collect()
    }

    /// Empty positions, row-major.
    #[must_use]
    pub fn empty_positions(&self) -> Vec<Position> {
        Self::positions().filter(|&pos| self.is_empty(pos)).collect()
    }

    /// Number of pieces of one side.
    #[must_use]
    pub fn count(&self, side: Side) -> usize {
        Self::positions().filter(|&pos| self.is_side(pos, side)).count()
    }

    /// Apply a batch of changes.
    ///
    /// Move sources are vacated first (only if they still hold the moving
    /// side), then every change is written in order. Notification kinds are
    /// skipped.
    pub fn apply_changes(&mut self, changes: &[BoardChange]) {
        for change in changes {
            if let (ChangeKind::Move, Some(from), Some(side)) = (change.kind, change.pos, change.side) {
                if self.is_side(from, side) {
                    self.set(from, Cell::Empty);
                }
            }
        }

        for change in changes {
            match change.kind {
                ChangeKind::Place => {
                    if let (Some(pos), Some(side)) = (change.pos, change.side) {
                        self.set(pos, Cell::Piece(side));
                    }
                }
                ChangeKind::Convert => {
                    if let (Some(pos), Some(side)) = (change.pos, change.side) {
                        if self.get(pos).is_some_and(Cell::is_piece) {
                            self.set(pos, Cell::Piece(side));
                        }
                    }
                }
                ChangeKind::Remove | ChangeKind::Banish => {
                    if let Some(pos) = change.pos {
                        if self.get(pos).is_some_and(Cell::is_piece) {
                            self.set(pos, Cell::Empty);
                        }
                    }
                }
                ChangeKind::Move => {
                    if let (Some(to), Some(side)) = (change.to, change.side) {
                        self.set(to, Cell::Piece(side));
                    }
                }
                ChangeKind::Block => {
                    if let Some(pos) = change.pos {
                        self.set(pos, Cell::Blocked);
                    }
                }
                ChangeKind::Unblock => {
                    if let Some(pos) = change.pos {
                        if self.get(pos) == Some(Cell::Blocked) {
                            self.set(pos, Cell::Empty);
                        }
                    }
                }
                _ => {}
            }
        }
    }
}
