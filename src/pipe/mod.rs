use std::fmt;
use std::ops::{BitAnd, BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};

mod board;
mod carver;
mod generator;
mod io;
mod solver;

pub use self::board::*;
pub use self::carver::*;
pub use self::generator::*;
pub use self::io::*;
pub use self::solver::*;

use crate::common::D;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Direction {
    North,
    East,
    South,
    West,
}

impl Direction {
    /// Clockwise order, starting from north.
    pub const ALL: [Direction; 4] = [
        Direction::North,
        Direction::East,
        Direction::South,
        Direction::West,
    ];

    pub fn index(self) -> usize {
        match self {
            Direction::North => 0,
            Direction::East => 1,
            Direction::South => 2,
            Direction::West => 3,
        }
    }
    pub fn offset(self) -> D {
        match self {
            Direction::North => D(-1, 0),
            Direction::East => D(0, 1),
            Direction::South => D(1, 0),
            Direction::West => D(0, -1),
        }
    }
    pub fn opposite(self) -> Direction {
        self.rotated(2)
    }
    /// Turns `steps` quarter turns clockwise.
    pub fn rotated(self, steps: u8) -> Direction {
        Direction::ALL[(self.index() + steps as usize) % 4]
    }
    /// The direction of a unit offset, if `d` is one.
    pub fn from_offset(d: D) -> Option<Direction> {
        Direction::ALL.iter().copied().find(|dir| dir.offset() == d)
    }
    pub fn letter(self) -> char {
        match self {
            Direction::North => 'N',
            Direction::East => 'E',
            Direction::South => 'S',
            Direction::West => 'W',
        }
    }
}

/// A set of directions, one bit per direction.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct DirSet(u8);

impl DirSet {
    pub const EMPTY: DirSet = DirSet(0);

    pub fn singleton(dir: Direction) -> DirSet {
        DirSet(1u8 << dir.index())
    }
    pub fn pair(a: Direction, b: Direction) -> DirSet {
        DirSet::singleton(a) | DirSet::singleton(b)
    }
    pub fn contains(self, dir: Direction) -> bool {
        (self.0 & (1u8 << dir.index())) != 0
    }
    pub fn len(self) -> usize {
        self.0.count_ones() as usize
    }
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }
    pub fn bits(self) -> u8 {
        self.0
    }
    /// Every member turned `steps` quarter turns clockwise.
    pub fn rotated(self, steps: u8) -> DirSet {
        self.iter()
            .fold(DirSet::EMPTY, |acc, dir| acc | DirSet::singleton(dir.rotated(steps)))
    }
    /// Members in clockwise order from north.
    pub fn iter(self) -> impl Iterator<Item = Direction> {
        Direction::ALL.into_iter().filter(move |&dir| self.contains(dir))
    }
}
impl BitAnd for DirSet {
    type Output = DirSet;
    fn bitand(self, rhs: DirSet) -> DirSet {
        DirSet(self.0 & rhs.0)
    }
}
impl BitOr for DirSet {
    type Output = DirSet;
    fn bitor(self, rhs: DirSet) -> DirSet {
        DirSet(self.0 | rhs.0)
    }
}
impl BitOrAssign for DirSet {
    fn bitor_assign(&mut self, rhs: DirSet) {
        self.0 |= rhs.0;
    }
}
impl FromIterator<Direction> for DirSet {
    fn from_iter<I: IntoIterator<Item = Direction>>(iter: I) -> DirSet {
        iter.into_iter()
            .fold(DirSet::EMPTY, |acc, dir| acc | DirSet::singleton(dir))
    }
}
impl fmt::Debug for DirSet {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_set().entries(self.iter()).finish()
    }
}
impl Serialize for DirSet {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.iter())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PipeKind {
    Start,
    End,
    Straight,
    Corner,
}

impl PipeKind {
    /// Connections at rotation 0.
    pub fn base_connections(self) -> DirSet {
        match self {
            PipeKind::Start => DirSet::singleton(Direction::East),
            PipeKind::End => DirSet::singleton(Direction::West),
            PipeKind::Straight => DirSet::pair(Direction::North, Direction::South),
            PipeKind::Corner => DirSet::pair(Direction::North, Direction::East),
        }
    }
    /// Start and end connectors ignore their rotation and cannot be turned.
    pub fn is_terminal(self) -> bool {
        matches!(self, PipeKind::Start | PipeKind::End)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Tile {
    pub kind: PipeKind,
    pub rotation: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub solution_rotation: Option<u8>,
}

impl Tile {
    pub fn new(kind: PipeKind, rotation: u8) -> Tile {
        Tile {
            kind,
            rotation: rotation % 4,
            solution_rotation: None,
        }
    }
    pub fn start() -> Tile {
        Tile::new(PipeKind::Start, 1)
    }
    pub fn end() -> Tile {
        Tile::new(PipeKind::End, 3)
    }
    pub fn straight(rotation: u8) -> Tile {
        Tile::new(PipeKind::Straight, rotation)
    }
    pub fn corner(rotation: u8) -> Tile {
        Tile::new(PipeKind::Corner, rotation)
    }

    /// Absolute directions this tile currently links to.
    pub fn connections(&self) -> DirSet {
        if self.kind.is_terminal() {
            self.kind.base_connections()
        } else {
            self.kind.base_connections().rotated(self.rotation)
        }
    }
    pub fn connects(&self, dir: Direction) -> bool {
        self.connections().contains(dir)
    }
    /// One quarter turn clockwise. Returns `false` for start and end tiles, which stay put.
    pub fn rotate(&mut self) -> bool {
        if self.kind.is_terminal() {
            return false;
        }
        self.rotation = (self.rotation + 1) % 4;
        true
    }
}
