use std::ops::{Add, Sub};

use glam::{IVec2, ivec2};
use serde::{Deserialize, Serialize};

/// Axis-aligned integer rectangle with an inclusive minimum and an exclusive
/// maximum corner.
#[derive(
    Copy, Clone, Default, Eq, PartialEq, Hash, Debug, Serialize, Deserialize,
)]
pub struct Rect {
    min: [i32; 2],
    max: [i32; 2],
}

impl Rect {
    /// Build a rectangle from two corner points.
    ///
    /// The points don't need to be ordered, the constructor sorts the
    /// coordinates.
    pub fn new(p1: impl Into<[i32; 2]>, p2: impl Into<[i32; 2]>) -> Self {
        let (p1, p2) = (p1.into(), p2.into());
        Rect {
            min: [p1[0].min(p2[0]), p1[1].min(p2[1])],
            max: [p1[0].max(p2[0]), p1[1].max(p2[1])],
        }
    }

    /// Rectangle of the given size at origin.
    pub fn sized(dim: impl Into<[i32; 2]>) -> Self {
        Rect::new([0, 0], dim)
    }

    /// The `n`th cell of size `dim` in a row-major lattice that is `pitch`
    /// cells wide.
    ///
    /// ```
    /// # use util::Rect;
    /// let r = Rect::cell([16, 16], 32, 33);
    /// assert_eq!(r.min(), [16, 16]);
    /// assert_eq!(r.max(), [32, 32]);
    /// ```
    pub fn cell(dim: impl Into<[i32; 2]>, pitch: i32, n: i32) -> Self {
        let dim = dim.into();
        debug_assert!(pitch > 0, "Rect::cell: zero pitch lattice");
        Rect::sized(dim) + [dim[0] * (n % pitch), dim[1] * (n / pitch)]
    }

    pub fn min(&self) -> [i32; 2] {
        self.min
    }

    pub fn max(&self) -> [i32; 2] {
        self.max
    }

    pub fn dim(&self) -> IVec2 {
        ivec2(self.width(), self.height())
    }

    pub fn width(&self) -> i32 {
        self.max[0] - self.min[0]
    }

    pub fn height(&self) -> i32 {
        self.max[1] - self.min[1]
    }

    pub fn is_empty(&self) -> bool {
        self.width() <= 0 || self.height() <= 0
    }

    /// Number of cells in the rectangle.
    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            self.width() as usize * self.height() as usize
        }
    }

    pub fn contains(&self, pos: impl Into<[i32; 2]>) -> bool {
        let [x, y] = pos.into();
        (self.min[0]..self.max[0]).contains(&x)
            && (self.min[1]..self.max[1]).contains(&y)
    }

    pub fn contains_other(&self, other: &Rect) -> bool {
        other.is_empty()
            || (self.min[0] <= other.min[0]
                && self.min[1] <= other.min[1]
                && self.max[0] >= other.max[0]
                && self.max[1] >= other.max[1])
    }

    /// Row-major index of a point inside the rectangle.
    ///
    /// Result is garbage if the point is not contained in the rectangle.
    pub fn idx(&self, pos: impl Into<[i32; 2]>) -> usize {
        let [x, y] = pos.into();
        ((x - self.min[0]) + (y - self.min[1]) * self.width()) as usize
    }

    /// Inverse of `idx`.
    pub fn get(&self, i: usize) -> [i32; 2] {
        let w = self.width() as usize;
        [self.min[0] + (i % w) as i32, self.min[1] + (i / w) as i32]
    }

    /// Iterate points in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = [i32; 2]> + '_ {
        (0..self.len()).map(move |i| self.get(i))
    }
}

impl IntoIterator for Rect {
    type Item = [i32; 2];

    type IntoIter = Box<dyn Iterator<Item = [i32; 2]>>;

    fn into_iter(self) -> Self::IntoIter {
        Box::new((0..self.len()).map(move |i| self.get(i)))
    }
}

impl<E: Into<[i32; 2]>> Add<E> for Rect {
    type Output = Rect;

    fn add(self, rhs: E) -> Self::Output {
        let [dx, dy] = rhs.into();
        Rect {
            min: [self.min[0] + dx, self.min[1] + dy],
            max: [self.max[0] + dx, self.max[1] + dy],
        }
    }
}

impl<E: Into<[i32; 2]>> Sub<E> for Rect {
    type Output = Rect;

    fn sub(self, rhs: E) -> Self::Output {
        let [dx, dy] = rhs.into();
        self + [-dx, -dy]
    }
}
