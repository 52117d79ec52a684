use std::fmt;

use serde::Serialize;
use thiserror::Error;

use super::{find_flow_path, DirSet, Direction, PipeKind, Tile};
use crate::common::{Grid, P};

/// Ways a grid of tiles can fail to be a playable board.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BoardError {
    #[error("board must be square, got {height}x{width}")]
    NotSquare { height: i32, width: i32 },
    #[error("board has no start tile")]
    MissingStart,
    #[error("board has more than one start tile")]
    DuplicateStart,
    #[error("board has no end tile")]
    MissingEnd,
    #[error("board has more than one end tile")]
    DuplicateEnd,
    #[error("start tile must be in the first column, found at {0:?}")]
    MisplacedStart(P),
    #[error("end tile must be in the last column, found at {0:?}")]
    MisplacedEnd(P),
}

/// A square grid of pipe tiles with one start and one end connector.
///
/// The shape is fixed once built; only tile rotations change afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Board {
    tiles: Grid<Tile>,
    start: P,
    end: P,
}

impl Board {
    pub fn from_tiles(tiles: Grid<Tile>) -> Result<Board, BoardError> {
        if !tiles.is_square() {
            return Err(BoardError::NotSquare {
                height: tiles.height(),
                width: tiles.width(),
            });
        }
        let last_column = tiles.width() - 1;
        let mut start = None;
        let mut end = None;

        for (pos, tile) in tiles.iter() {
            match tile.kind {
                PipeKind::Start => {
                    if start.replace(pos).is_some() {
                        return Err(BoardError::DuplicateStart);
                    }
                    if pos.x() != 0 {
                        return Err(BoardError::MisplacedStart(pos));
                    }
                }
                PipeKind::End => {
                    if end.replace(pos).is_some() {
                        return Err(BoardError::DuplicateEnd);
                    }
                    if pos.x() != last_column {
                        return Err(BoardError::MisplacedEnd(pos));
                    }
                }
                _ => (),
            }
        }

        Ok(Board {
            start: start.ok_or(BoardError::MissingStart)?,
            end: end.ok_or(BoardError::MissingEnd)?,
            tiles,
        })
    }

    pub fn size(&self) -> i32 {
        self.tiles.height()
    }
    pub fn start(&self) -> P {
        self.start
    }
    pub fn end(&self) -> P {
        self.end
    }
    pub fn tiles(&self) -> &Grid<Tile> {
        &self.tiles
    }
    pub fn contains(&self, pos: P) -> bool {
        self.tiles.is_valid_p(pos)
    }
    pub fn tile(&self, pos: P) -> Option<&Tile> {
        self.tiles.get(pos)
    }
    /// Connection set of the tile at `pos`; empty outside the board.
    pub fn connections_at(&self, pos: P) -> DirSet {
        self.tiles
            .get(pos)
            .map(Tile::connections)
            .unwrap_or(DirSet::EMPTY)
    }
    pub fn neighbor(&self, pos: P, dir: Direction) -> Option<P> {
        let next = pos + dir.offset();
        if self.contains(next) {
            Some(next)
        } else {
            None
        }
    }

    /// Turns the tile at `pos` a quarter turn clockwise and returns its new rotation.
    /// Positions off the board and start/end tiles are left alone.
    pub fn rotate(&mut self, pos: P) -> Option<u8> {
        let tile = self.tiles.get_mut(pos)?;
        if tile.rotate() {
            Some(tile.rotation)
        } else {
            None
        }
    }

    /// A copy with every tile that remembers its generated rotation turned back to it.
    pub fn with_solution_rotations(&self) -> Board {
        let mut ret = self.clone();
        ret.tiles = self.tiles.map(|tile| match tile.solution_rotation {
            Some(rotation) => Tile { rotation, ..*tile },
            None => *tile,
        });
        ret
    }

    /// The path water would take from start to end, or `None` on a leak.
    pub fn flow_path(&self) -> Option<Vec<P>> {
        find_flow_path(self, self.start, self.end)
    }
    pub fn is_connected(&self) -> bool {
        self.flow_path().is_some()
    }

    pub fn view(&self) -> BoardView {
        BoardView {
            size: self.size(),
            start: self.start,
            end: self.end,
            cells: (0..self.size())
                .map(|y| {
                    (0..self.size())
                        .map(|x| {
                            let tile = self.tiles[P(y, x)];
                            CellView {
                                kind: tile.kind,
                                rotation: tile.rotation,
                                connections: tile.connections(),
                            }
                        })
                        .collect()
                })
                .collect(),
        }
    }
}

/// Snapshot handed to renderers.
#[derive(Debug, Clone, Serialize)]
pub struct BoardView {
    pub size: i32,
    pub start: P,
    pub end: P,
    pub cells: Vec<Vec<CellView>>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CellView {
    pub kind: PipeKind,
    pub rotation: u8,
    pub connections: DirSet,
}

fn glyph(tile: &Tile) -> char {
    use Direction::*;

    match tile.kind {
        PipeKind::Start => 'S',
        PipeKind::End => 'E',
        _ => {
            let conn = tile.connections();
            if conn == DirSet::pair(North, South) {
                '│'
            } else if conn == DirSet::pair(East, West) {
                '─'
            } else if conn == DirSet::pair(North, East) {
                '└'
            } else if conn == DirSet::pair(East, South) {
                '┌'
            } else if conn == DirSet::pair(South, West) {
                '┐'
            } else {
                '┘'
            }
        }
    }
}

impl fmt::Display for Board {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        for y in 0..self.size() {
            for x in 0..self.size() {
                write!(f, "{}", glyph(&self.tiles[P(y, x)]))?;
            }
            writeln!(f)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::vec_to_grid;

    fn straight_row_board(size: i32, row: i32) -> Board {
        let mut tiles = Grid::square(size, Tile::straight(0));
        for x in 1..(size - 1) {
            tiles[P(row, x)] = Tile::straight(1);
        }
        tiles[P(row, 0)] = Tile::start();
        tiles[P(row, size - 1)] = Tile::end();
        Board::from_tiles(tiles).unwrap()
    }

    #[test]
    fn test_straight_row_flows_without_detour() {
        for size in 2..9 {
            let board = straight_row_board(size, size / 2);
            let path = board.flow_path().unwrap();
            assert_eq!(path.len(), size as usize);
            for (x, &pos) in path.iter().enumerate() {
                assert_eq!(pos, P(size / 2, x as i32));
            }
        }
    }

    #[test]
    fn test_rotate() {
        let mut board = straight_row_board(4, 1);
        assert_eq!(board.rotate(P(1, 1)), Some(2));
        assert!(!board.is_connected());
        assert_eq!(board.rotate(P(1, 1)), Some(3));
        assert!(board.is_connected());

        assert_eq!(board.rotate(P(1, 0)), None);
        assert_eq!(board.rotate(P(1, 3)), None);
        assert_eq!(board.rotate(P(4, 0)), None);
        assert_eq!(board.rotate(P(-1, 2)), None);
        assert_eq!(board.connections_at(P(9, 9)), DirSet::EMPTY);
    }

    #[test]
    fn test_invariants() {
        let s = Tile::start();
        let e = Tile::end();
        let i = Tile::straight(0);

        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![s, e]])),
            Err(BoardError::NotSquare {
                height: 1,
                width: 2
            })
        );
        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![i, e], vec![i, i]])),
            Err(BoardError::MissingStart)
        );
        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![s, e], vec![s, i]])),
            Err(BoardError::DuplicateStart)
        );
        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![s, i], vec![i, i]])),
            Err(BoardError::MissingEnd)
        );
        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![s, e], vec![e, i]])),
            Err(BoardError::DuplicateEnd)
        );
        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![s, i], vec![e, i]])),
            Err(BoardError::MisplacedEnd(P(1, 0)))
        );
        assert_eq!(
            Board::from_tiles(vec_to_grid(&vec![vec![i, s], vec![i, e]])),
            Err(BoardError::MisplacedStart(P(0, 1)))
        );

        let board = Board::from_tiles(vec_to_grid(&vec![vec![s, e], vec![i, i]])).unwrap();
        assert_eq!(board.start(), P(0, 0));
        assert_eq!(board.end(), P(0, 1));
        assert_eq!(board.neighbor(P(0, 0), Direction::East), Some(P(0, 1)));
        assert_eq!(board.neighbor(P(0, 0), Direction::North), None);
    }

    #[test]
    fn test_solution_rotations() {
        let mut board = straight_row_board(3, 0);
        board.tiles[P(0, 1)] = Tile {
            kind: PipeKind::Straight,
            rotation: 0,
            solution_rotation: Some(1),
        };
        assert!(!board.is_connected());
        let solved = board.with_solution_rotations();
        assert!(solved.is_connected());
        assert_eq!(solved.tile(P(0, 1)).unwrap().rotation, 1);
        assert_eq!(solved.tile(P(2, 2)).unwrap().rotation, 0);
    }

    #[test]
    fn test_display_and_view() {
        let board = straight_row_board(3, 1);
        assert_eq!(board.to_string(), "│││\nS─E\n│││\n");

        let view = board.view();
        assert_eq!(view.size, 3);
        assert_eq!(view.cells[1][1].connections, DirSet::pair(Direction::East, Direction::West));
        let json = serde_json::to_string(&view.cells[1][0]).unwrap();
        assert_eq!(json, r#"{"kind":"start","rotation":1,"connections":["East"]}"#);
    }
}
