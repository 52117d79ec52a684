use std::ops::{Index, IndexMut};

mod pos;
pub use self::pos::*;

/// Row-major rectangular storage addressed by `P`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Grid<T: Clone> {
    height: i32,
    width: i32,
    data: Vec<T>,
}
impl<T: Clone> Grid<T> {
    pub fn new(height: i32, width: i32, default: T) -> Grid<T> {
        Grid {
            height,
            width,
            data: vec![default; height.max(0) as usize * width.max(0) as usize],
        }
    }
    pub fn square(size: i32, default: T) -> Grid<T> {
        Grid::new(size, size, default)
    }
    pub fn height(&self) -> i32 {
        self.height
    }
    pub fn width(&self) -> i32 {
        self.width
    }
    pub fn is_square(&self) -> bool {
        self.height == self.width
    }
    pub fn is_valid_p(&self, pos: P) -> bool {
        0 <= pos.0 && pos.0 < self.height && 0 <= pos.1 && pos.1 < self.width
    }
    pub fn index_p(&self, pos: P) -> usize {
        (pos.0 * self.width + pos.1) as usize
    }
    pub fn p(&self, idx: usize) -> P {
        let idx = idx as i32;
        P(idx / self.width, idx % self.width)
    }
    pub fn get(&self, pos: P) -> Option<&T> {
        if self.is_valid_p(pos) {
            Some(&self.data[self.index_p(pos)])
        } else {
            None
        }
    }
    pub fn get_mut(&mut self, pos: P) -> Option<&mut T> {
        if self.is_valid_p(pos) {
            let idx = self.index_p(pos);
            Some(&mut self.data[idx])
        } else {
            None
        }
    }
    /// All coordinates in row-major order.
    pub fn positions(&self) -> impl Iterator<Item = P> {
        let width = self.width;
        (0..self.height).flat_map(move |y| (0..width).map(move |x| P(y, x)))
    }
    pub fn iter(&self) -> impl Iterator<Item = (P, &T)> + '_ {
        self.data.iter().enumerate().map(move |(i, v)| (self.p(i), v))
    }
    /// Converts every cell, keeping the shape.
    pub fn map<U: Clone, F: FnMut(&T) -> U>(&self, f: F) -> Grid<U> {
        Grid {
            height: self.height,
            width: self.width,
            data: self.data.iter().map(f).collect(),
        }
    }
}
impl<T: Copy> Grid<T> {
    pub fn get_or_default_p(&self, cd: P, default: T) -> T {
        if self.is_valid_p(cd) {
            self[cd]
        } else {
            default
        }
    }
}
impl<T: Clone> Index<P> for Grid<T> {
    type Output = T;
    fn index(&self, idx: P) -> &T {
        let idx = self.index_p(idx);
        &self.data[idx]
    }
}
impl<T: Clone> IndexMut<P> for Grid<T> {
    fn index_mut(&mut self, idx: P) -> &mut T {
        let idx = self.index_p(idx);
        &mut self.data[idx]
    }
}

#[cfg(test)]
pub fn vec_to_grid<T>(v: &Vec<Vec<T>>) -> Grid<T>
where
    T: Clone,
{
    if v.len() == 0 {
        panic!("Attempted to convert empty Vec to Grid");
    }
    let ref_len = v[0].len();
    for r in v {
        if r.len() != ref_len {
            panic!("Each element in v must contain the same number of elements");
        }
    }
    Grid {
        height: v.len() as i32,
        width: ref_len as i32,
        data: v.iter().flat_map(|r| r.iter().cloned()).collect(),
    }
}
