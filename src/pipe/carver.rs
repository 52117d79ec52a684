use rand::seq::SliceRandom;
use rand::Rng;
use thiserror::Error;

use super::Direction;
use crate::common::{Grid, D, P};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CarveError {
    #[error("random walk stalled after {0} steps")]
    StepBudgetExhausted(usize),
    #[error("no route from {from:?} to {to:?}")]
    Unreachable { from: P, to: P },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    Free,
    OnPath,
    Dead,
    Blocked,
}

/// Random walk that drifts toward its target and backs out of dead ends.
///
/// Each step draws from a pool holding the step that closes the column gap and
/// the step that closes the row gap `bias` times each, plus every in-bounds
/// neighbour once. Entries leading onto the path, into a dead end or into a
/// blocked cell are dropped before drawing. When nothing is left the walk pops
/// the current cell, marks it dead and continues from its predecessor.
#[derive(Debug, Clone)]
pub struct PathCarver {
    height: i32,
    width: i32,
    bias: usize,
    max_steps: usize,
}

impl PathCarver {
    pub fn new(height: i32, width: i32) -> PathCarver {
        PathCarver {
            height,
            width,
            bias: 3,
            // a walk with backtracking enters and leaves each cell at most once
            max_steps: (height.max(0) as usize)
                .saturating_mul(width.max(0) as usize)
                .saturating_mul(2)
                .max(1),
        }
    }
    pub fn with_bias(self, bias: usize) -> PathCarver {
        PathCarver { bias, ..self }
    }
    pub fn with_max_steps(self, max_steps: usize) -> PathCarver {
        PathCarver { max_steps, ..self }
    }

    pub fn carve<R: Rng>(
        &self,
        start: P,
        end: P,
        blocked: &[P],
        rng: &mut R,
    ) -> Result<Vec<P>, CarveError> {
        let unreachable = CarveError::Unreachable {
            from: start,
            to: end,
        };
        let mut state = Grid::new(self.height, self.width, Visit::Free);
        for &pos in blocked {
            if state.is_valid_p(pos) {
                state[pos] = Visit::Blocked;
            }
        }
        if state.get_or_default_p(start, Visit::Blocked) != Visit::Free
            || state.get_or_default_p(end, Visit::Blocked) != Visit::Free
        {
            return Err(unreachable);
        }

        let mut path = vec![start];
        state[start] = Visit::OnPath;
        let mut steps = 0;

        while let Some(&cur) = path.last() {
            if cur == end {
                return Ok(path);
            }
            if steps >= self.max_steps {
                return Err(CarveError::StepBudgetExhausted(steps));
            }
            steps += 1;

            let moves = self
                .candidate_moves(cur, end)
                .into_iter()
                .filter(|&next| state[next] == Visit::Free)
                .collect::<Vec<_>>();

            match moves.choose(rng) {
                Some(&next) => {
                    state[next] = Visit::OnPath;
                    path.push(next);
                }
                None => {
                    state[cur] = Visit::Dead;
                    path.pop();
                }
            }
        }

        Err(unreachable)
    }

    /// Weighted move pool from `cur`; duplicates carry the weight.
    fn candidate_moves(&self, cur: P, end: P) -> Vec<P> {
        let mut moves = vec![];
        if end.x() != cur.x() {
            let step = cur + D(0, (end.x() - cur.x()).signum());
            moves.extend(std::iter::repeat(step).take(self.bias));
        }
        if end.y() != cur.y() {
            let step = cur + D((end.y() - cur.y()).signum(), 0);
            moves.extend(std::iter::repeat(step).take(self.bias));
        }
        for &dir in &Direction::ALL {
            let next = cur + dir.offset();
            if self.is_inside(next) {
                moves.push(next);
            }
        }
        moves
    }

    fn is_inside(&self, pos: P) -> bool {
        0 <= pos.0 && pos.0 < self.height && 0 <= pos.1 && pos.1 < self.width
    }
}

/// Deterministic route: along the start row to the end column, then along that column.
pub fn straight_then_turn(start: P, end: P) -> Vec<P> {
    let mut path = vec![start];
    let mut cur = start;
    while cur.x() != end.x() {
        cur = cur + D(0, (end.x() - cur.x()).signum());
        path.push(cur);
    }
    while cur.y() != end.y() {
        cur = cur + D((end.y() - cur.y()).signum(), 0);
        path.push(cur);
    }
    path
}
