use std::collections::{HashMap, VecDeque};

use log::debug;

use super::{Board, DirSet};
use crate::common::P;

/// Anything that can report which directions a cell links to.
pub trait PipeNetwork {
    fn contains(&self, pos: P) -> bool;
    fn connections(&self, pos: P) -> DirSet;
}

impl PipeNetwork for Board {
    fn contains(&self, pos: P) -> bool {
        Board::contains(self, pos)
    }
    fn connections(&self, pos: P) -> DirSet {
        self.connections_at(pos)
    }
}

/// Breadth-first search from `start` to `end` over links both cells agree on.
/// Returns the first path found, which is a shortest one in steps.
pub fn find_flow_path<N: PipeNetwork + ?Sized>(network: &N, start: P, end: P) -> Option<Vec<P>> {
    if !network.contains(start) || !network.contains(end) {
        return None;
    }

    let mut parent: HashMap<P, P> = HashMap::new();
    let mut queue = VecDeque::new();
    parent.insert(start, start);
    queue.push_back(start);

    while let Some(pos) = queue.pop_front() {
        if pos == end {
            let path = trace_back(&parent, start, end);
            debug!("flow reaches {:?} in {} cells", end, path.len());
            return Some(path);
        }
        for dir in network.connections(pos).iter() {
            let next = pos + dir.offset();
            if !network.contains(next) || parent.contains_key(&next) {
                continue;
            }
            if network.connections(next).contains(dir.opposite()) {
                parent.insert(next, pos);
                queue.push_back(next);
            }
        }
    }

    debug!("flow from {:?} leaks after {} cells", start, parent.len());
    None
}

fn trace_back(parent: &HashMap<P, P>, start: P, end: P) -> Vec<P> {
    let mut path = vec![end];
    let mut cur = end;
    while cur != start {
        cur = parent[&cur];
        path.push(cur);
    }
    path.reverse();
    path
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::{vec_to_grid, Grid};
    use crate::pipe::{Direction, Tile};

    struct JunctionNetwork(Grid<DirSet>);

    impl PipeNetwork for JunctionNetwork {
        fn contains(&self, pos: P) -> bool {
            self.0.is_valid_p(pos)
        }
        fn connections(&self, pos: P) -> DirSet {
            self.0[pos]
        }
    }

    fn dirs(s: &str) -> DirSet {
        s.chars()
            .map(|c| match c {
                'N' => Direction::North,
                'E' => Direction::East,
                'S' => Direction::South,
                'W' => Direction::West,
                _ => panic!(),
            })
            .collect()
    }

    fn assert_chain(path: &[P], start: P, end: P) {
        assert_eq!(path[0], start);
        assert_eq!(*path.last().unwrap(), end);
        for w in path.windows(2) {
            assert!((w[1] - w[0]).is_unit());
        }
    }

    #[test]
    fn test_shortest_of_several_routes() {
        // two 5-cell routes around the rim and a 7-cell one through the middle
        let network = JunctionNetwork(vec_to_grid(&vec![
            vec![dirs("ES"), dirs("WES"), dirs("WS")],
            vec![dirs("NSE"), dirs("NW"), dirs("NS")],
            vec![dirs("NE"), dirs("WE"), dirs("NW")],
        ]));
        let path = find_flow_path(&network, P(0, 0), P(2, 2)).unwrap();
        assert_eq!(path.len(), 5);
        assert_chain(&path, P(0, 0), P(2, 2));
        assert!(!path.contains(&P(1, 1)));
    }

    #[test]
    fn test_only_long_route_left() {
        let network = JunctionNetwork(vec_to_grid(&vec![
            vec![dirs("E"), dirs("WS"), dirs("")],
            vec![dirs("SE"), dirs("NW"), dirs("")],
            vec![dirs("NE"), dirs("WE"), dirs("W")],
        ]));
        let path = find_flow_path(&network, P(0, 0), P(2, 2)).unwrap();
        assert_eq!(
            path,
            vec![P(0, 0), P(0, 1), P(1, 1), P(1, 0), P(2, 0), P(2, 1), P(2, 2)]
        );
    }

    #[test]
    fn test_link_needs_both_sides() {
        let network = JunctionNetwork(vec_to_grid(&vec![
            vec![dirs("E"), dirs("E"), dirs("W")],
        ]));
        assert_eq!(find_flow_path(&network, P(0, 0), P(0, 2)), None);

        let network = JunctionNetwork(vec_to_grid(&vec![
            vec![dirs("E"), dirs("WE"), dirs("W")],
        ]));
        assert_eq!(
            find_flow_path(&network, P(0, 0), P(0, 2)),
            Some(vec![P(0, 0), P(0, 1), P(0, 2)])
        );
    }

    #[test]
    fn test_out_of_range_endpoints() {
        let network = JunctionNetwork(vec_to_grid(&vec![vec![dirs("E"), dirs("W")]]));
        assert_eq!(find_flow_path(&network, P(0, 0), P(0, 2)), None);
        assert_eq!(find_flow_path(&network, P(-1, 0), P(0, 1)), None);
        assert_eq!(find_flow_path(&network, P(0, 1), P(0, 1)), Some(vec![P(0, 1)]));
    }

    #[test]
    fn test_single_corner_decides() {
        let s = Tile::start();
        let e = Tile::end();
        let filler = Tile::straight(0);

        let mut connected = vec![];
        for r in 0..4 {
            let board = Board::from_tiles(vec_to_grid(&vec![
                vec![s, Tile::corner(2), filler],
                vec![filler, Tile::corner(r), e],
                vec![filler, filler, filler],
            ]))
            .unwrap();
            if let Some(path) = board.flow_path() {
                assert_eq!(path, vec![P(0, 0), P(0, 1), P(1, 1), P(1, 2)]);
                connected.push(r);
            }
        }
        assert_eq!(connected, vec![0]);
    }
}
