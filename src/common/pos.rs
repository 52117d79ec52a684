use serde::{Deserialize, Serialize};
use std::ops::{Add, Mul, Sub};

/// A cell coordinate, `(row, column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct P(pub i32, pub i32);

/// An offset between two cells, `(d_row, d_column)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct D(pub i32, pub i32);

impl P {
    pub fn y(self) -> i32 {
        self.0
    }
    pub fn x(self) -> i32 {
        self.1
    }
    /// Number of unit steps between `self` and `other`, ignoring obstacles.
    pub fn manhattan(self, other: P) -> i32 {
        (self.0 - other.0).abs() + (self.1 - other.1).abs()
    }
}
impl D {
    pub fn rotate_clockwise(self) -> D {
        D(self.1, -self.0)
    }
    pub fn rotate_counterclockwise(self) -> D {
        D(-self.1, self.0)
    }
    pub fn is_unit(self) -> bool {
        self.0.abs() + self.1.abs() == 1
    }
}
impl Add<D> for P {
    type Output = P;
    fn add(self, rhs: D) -> P {
        P(self.0 + rhs.0, self.1 + rhs.1)
    }
}
impl Sub<D> for P {
    type Output = P;
    fn sub(self, rhs: D) -> P {
        P(self.0 - rhs.0, self.1 - rhs.1)
    }
}
impl Sub<P> for P {
    type Output = D;
    fn sub(self, rhs: P) -> D {
        D(self.0 - rhs.0, self.1 - rhs.1)
    }
}
impl Add<D> for D {
    type Output = D;
    fn add(self, rhs: D) -> D {
        D(self.0 + rhs.0, self.1 + rhs.1)
    }
}
impl Mul<i32> for D {
    type Output = D;
    fn mul(self, rhs: i32) -> D {
        D(self.0 * rhs, self.1 * rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        assert_eq!(P(1, 2) + D(3, 0), P(4, 2));
        assert_eq!(P(1, 2) - D(3, 0), P(-2, 2));
        assert_eq!(P(4, 2) - P(1, 2), D(3, 0));
        assert_eq!(D(1, 2) + D(3, 0), D(4, 2));
        assert_eq!(D(1, 2) * 4, D(4, 8));

        assert_eq!(D(2, 1).rotate_clockwise(), D(1, -2));
        assert_eq!(D(2, 1).rotate_counterclockwise(), D(-1, 2));

        assert_eq!(P(0, 0).manhattan(P(3, -2)), 5);
        assert!(D(0, -1).is_unit());
        assert!(!D(1, 1).is_unit());
    }
}
