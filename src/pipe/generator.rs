use log::{debug, warn};
use rand::Rng;
use thiserror::Error;

use super::{straight_then_turn, Board, BoardError, CarveError, DirSet, Direction, PathCarver, PipeKind, Tile};
use crate::common::{Grid, P};

/// Largest board edge the generator builds.
pub const MAX_BOARD_SIZE: i32 = 256;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenerateError {
    #[error("grid must be at least 2x2, got {0}x{0}")]
    GridTooSmall(i32),
    #[error("grid must be at most 256x256, got {0}x{0}")]
    GridTooLarge(i32),
    #[error("generated board is malformed: {0}")]
    Malformed(#[from] BoardError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GeneratorOption {
    pub size: i32,
    /// How many times the steps toward the end are repeated in the carver's move pool.
    pub bias: usize,
    /// Fresh start/end picks tried before falling back to a fixed route.
    pub max_attempts: u32,
    pub max_carve_steps: Option<usize>,
}

impl Default for GeneratorOption {
    fn default() -> GeneratorOption {
        GeneratorOption {
            size: 8,
            bias: 3,
            max_attempts: 16,
            max_carve_steps: None,
        }
    }
}

/// Corner rotation for an unordered pair of directions, indexed by `DirSet::bits`.
const CORNER_ROTATION: [Option<u8>; 16] = {
    let mut table: [Option<u8>; 16] = [None; 16];
    table[0b0011] = Some(0); // north, east
    table[0b0110] = Some(1); // east, south
    table[0b1100] = Some(2); // south, west
    table[0b1001] = Some(3); // west, north
    table
};

/// The tile that links `cur` to both `prev` and `next`, rotated to do so.
pub fn linking_tile(prev: P, cur: P, next: P) -> Option<Tile> {
    let a = Direction::from_offset(prev - cur)?;
    let b = Direction::from_offset(next - cur)?;
    if a == b {
        return None;
    }
    if a.opposite() == b {
        let rotation = match a {
            Direction::North | Direction::South => 0,
            Direction::East | Direction::West => 1,
        };
        Some(Tile::straight(rotation))
    } else {
        let rotation = CORNER_ROTATION[DirSet::pair(a, b).bits() as usize]?;
        Some(Tile::corner(rotation))
    }
}

/// A generated board together with the route it was carved around.
#[derive(Debug, Clone)]
pub struct GeneratedBoard {
    pub board: Board,
    pub route: Vec<P>,
}

pub struct BoardGenerator {
    opt: GeneratorOption,
    carver: PathCarver,
}

impl BoardGenerator {
    pub fn new(opt: GeneratorOption) -> Result<BoardGenerator, GenerateError> {
        if opt.size < 2 {
            return Err(GenerateError::GridTooSmall(opt.size));
        }
        if opt.size > MAX_BOARD_SIZE {
            return Err(GenerateError::GridTooLarge(opt.size));
        }
        let mut carver = PathCarver::new(opt.size, opt.size).with_bias(opt.bias);
        if let Some(steps) = opt.max_carve_steps {
            carver = carver.with_max_steps(steps);
        }
        Ok(BoardGenerator { opt, carver })
    }

    pub fn generate<R: Rng>(&self, rng: &mut R) -> Result<Board, GenerateError> {
        Ok(self.generate_with_route(rng)?.board)
    }

    pub fn generate_with_route<R: Rng>(&self, rng: &mut R) -> Result<GeneratedBoard, GenerateError> {
        let size = self.opt.size;

        let mut terminals = self.pick_terminals(rng);
        let mut carved = None;
        for attempt in 0..self.opt.max_attempts {
            if attempt > 0 {
                terminals = self.pick_terminals(rng);
            }
            match self.carve_route(terminals, rng) {
                Ok(route) => {
                    carved = Some(route);
                    break;
                }
                Err(err) => debug!("carve attempt {} failed: {}", attempt + 1, err),
            }
        }
        let (start, end) = terminals;
        let route = match carved {
            Some(route) => route,
            None => {
                warn!(
                    "carving failed {} times, using a fixed route from {:?} to {:?}",
                    self.opt.max_attempts, start, end
                );
                fallback_route(start, end)
            }
        };

        let mut cells: Grid<Option<Tile>> = Grid::square(size, None);
        cells[start] = Some(Tile::start());
        cells[end] = Some(Tile::end());

        for i in 1..(route.len() - 1) {
            let cur = route[i];
            if cells[cur].is_some() {
                continue;
            }
            if let Some(tile) = linking_tile(route[i - 1], cur, route[i + 1]) {
                cells[cur] = Some(Tile {
                    solution_rotation: Some(tile.rotation),
                    ..tile
                });
            }
        }

        let mut tiles = cells.map(|cell| match cell {
            Some(tile) => *tile,
            None => random_tile(rng),
        });

        for &pos in &route {
            if !tiles[pos].kind.is_terminal() {
                tiles[pos].rotation = rng.gen_range(0..4);
            }
        }

        debug!("generated {}x{} board, route of {} cells", size, size, route.len());
        Ok(GeneratedBoard {
            board: Board::from_tiles(tiles)?,
            route,
        })
    }

    fn pick_terminals<R: Rng>(&self, rng: &mut R) -> (P, P) {
        let size = self.opt.size;
        let start_row = rng.gen_range(0..size);
        // on a 2x2 board the start's east neighbour has to be the end
        let end_row = if size == 2 {
            start_row
        } else {
            rng.gen_range(0..size)
        };
        (P(start_row, 0), P(end_row, size - 1))
    }

    /// Start only links east and end only links west, so the walk runs between
    /// their inner neighbours with the terminals themselves blocked.
    fn carve_route<R: Rng>(&self, (start, end): (P, P), rng: &mut R) -> Result<Vec<P>, CarveError> {
        let inner_start = start + Direction::East.offset();
        let inner_end = end + Direction::West.offset();
        if inner_start == end {
            return Ok(vec![start, end]);
        }
        let walk = self.carver.carve(inner_start, inner_end, &[start, end], rng)?;
        Ok(wrap_route(start, walk, end))
    }
}

fn fallback_route(start: P, end: P) -> Vec<P> {
    let inner_start = start + Direction::East.offset();
    if inner_start == end {
        return vec![start, end];
    }
    let walk = straight_then_turn(inner_start, end + Direction::West.offset());
    wrap_route(start, walk, end)
}

fn wrap_route(start: P, walk: Vec<P>, end: P) -> Vec<P> {
    let mut route = Vec::with_capacity(walk.len() + 2);
    route.push(start);
    route.extend(walk);
    route.push(end);
    route
}

fn random_tile<R: Rng>(rng: &mut R) -> Tile {
    let kind = if rng.gen::<bool>() {
        PipeKind::Straight
    } else {
        PipeKind::Corner
    };
    Tile::new(kind, rng.gen_range(0..4))
}
