use glam::{IVec2, ivec2};

use crate::Rect;

/// Dense rectangular 2D array of values anchored at origin.
#[derive(Clone, Default, Eq, PartialEq, Debug)]
pub struct Grid<T> {
    area: Rect,
    data: Vec<T>,
}

impl<T: Clone> Grid<T> {
    /// Creates a new grid of the given size with every cell set to `fill`.
    pub fn new(dim: impl Into<[i32; 2]>, fill: T) -> Self {
        let area = Rect::sized(dim);
        Grid {
            area,
            data: vec![fill; area.len()],
        }
    }
}

impl<T: Default> Grid<T> {
    /// Creates a new grid with every cell set to the default value.
    pub fn with_default(dim: impl Into<[i32; 2]>) -> Self {
        let area = Rect::sized(dim);
        Grid {
            area,
            data: (0..area.len()).map(|_| Default::default()).collect(),
        }
    }
}

impl<T> Grid<T> {
    pub fn from_fn(
        dim: impl Into<[i32; 2]>,
        f: impl Fn(IVec2) -> T,
    ) -> Self {
        let area = Rect::sized(dim);
        let data = area.into_iter().map(|p| f(IVec2::from(p))).collect();
        Grid { area, data }
    }

    pub fn dim(&self) -> IVec2 {
        self.area.dim()
    }

    pub fn width(&self) -> i32 {
        self.area.width()
    }

    pub fn height(&self) -> i32 {
        self.area.height()
    }

    pub fn area(&self) -> Rect {
        self.area
    }

    pub fn contains(&self, pos: impl Into<[i32; 2]>) -> bool {
        self.area.contains(pos)
    }

    /// Get the value at position, `None` if the position is outside the
    /// grid.
    pub fn get(&self, pos: impl Into<[i32; 2]>) -> Option<&T> {
        let pos = pos.into();
        if self.area.contains(pos) {
            Some(&self.data[self.area.idx(pos)])
        } else {
            None
        }
    }

    pub fn get_mut(&mut self, pos: impl Into<[i32; 2]>) -> Option<&mut T> {
        let pos = pos.into();
        if self.area.contains(pos) {
            let i = self.area.idx(pos);
            Some(&mut self.data[i])
        } else {
            None
        }
    }

    /// Iterate cells with their positions in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (IVec2, &T)> + '_ {
        self.data.iter().enumerate().map(move |(i, t)| {
            let [x, y] = self.area.get(i);
            (ivec2(x, y), t)
        })
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn bounds() {
        let mut grid = Grid::new([3, 2], 0u8);
        assert_eq!(grid.dim(), ivec2(3, 2));
        assert_eq!(grid.get([2, 1]), Some(&0));
        assert_eq!(grid.get([3, 1]), None);
        assert_eq!(grid.get([0, -1]), None);

        *grid.get_mut([1, 1]).unwrap() = 7;
        assert_eq!(grid.get(ivec2(1, 1)), Some(&7));
        assert_eq!(
            grid.iter().filter(|(_, v)| **v == 7).collect::<Vec<_>>(),
            vec![(ivec2(1, 1), &7)]
        );
    }

    #[test]
    fn built_from_fn() {
        let grid = Grid::from_fn([4, 4], |p| p.x == p.y);
        assert_eq!(grid.iter().filter(|(_, v)| **v).count(), 4);
    }
}
