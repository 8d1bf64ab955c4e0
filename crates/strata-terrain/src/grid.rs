//! Owned row-major 2D grids shared by every stage of the pipeline.

use serde::{Deserialize, Serialize};

use crate::layer::LayerKind;

/// A dense 2D grid stored row-major: cell `(x, y)` lives at `y * width + x`.
///
/// Deserialization rejects a cell buffer whose length is not `width * height`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "GridParts<T>")]
pub struct Grid<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

#[derive(Deserialize)]
struct GridParts<T> {
    width: usize,
    height: usize,
    cells: Vec<T>,
}

impl<T> TryFrom<GridParts<T>> for Grid<T> {
    type Error = String;

    fn try_from(parts: GridParts<T>) -> Result<Self, Self::Error> {
        let len = parts.cells.len();
        let (width, height) = (parts.width, parts.height);
        Grid::from_vec(width, height, parts.cells)
            .ok_or_else(|| format!("{len} cells do not fill a {width}x{height} grid"))
    }
}

/// Normalized noise samples in `[0, 1]`.
pub type NoiseField = Grid<f64>;

/// Terrain heights normalized by depth (world height / depth).
pub type ElevationGrid = Grid<f64>;

/// Dominant layer per cell.
pub type LayerLabelGrid = Grid<LayerKind>;

impl<T> Grid<T> {
    /// Build a grid by evaluating `f(x, y)` for every cell in row-major order.
    pub fn from_fn(width: usize, height: usize, mut f: impl FnMut(usize, usize) -> T) -> Self {
        let mut cells = Vec::with_capacity(width * height);
        for y in 0..height {
            for x in 0..width {
                cells.push(f(x, y));
            }
        }
        Self {
            width,
            height,
            cells,
        }
    }

    /// Wrap an existing row-major buffer. Returns `None` if the length does
    /// not equal `width * height`.
    pub fn from_vec(width: usize, height: usize, cells: Vec<T>) -> Option<Self> {
        (width.checked_mul(height) == Some(cells.len())).then_some(Self {
            width,
            height,
            cells,
        })
    }

    pub(crate) fn from_parts(width: usize, height: usize, cells: Vec<T>) -> Self {
        debug_assert_eq!(cells.len(), width * height);
        Self {
            width,
            height,
            cells,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    /// Returns `(width, height)`.
    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    /// Number of cells.
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Returns the cell at `(x, y)`, or `None` when out of bounds.
    pub fn get(&self, x: usize, y: usize) -> Option<&T> {
        if x < self.width && y < self.height {
            self.cells.get(y * self.width + x)
        } else {
            None
        }
    }

    /// Row-major view of every cell.
    pub fn cells(&self) -> &[T] {
        &self.cells
    }

    /// Iterate rows from `y = 0` upward.
    pub fn rows(&self) -> impl Iterator<Item = &[T]> {
        self.cells.chunks(self.width.max(1))
    }

    /// Iterate `(x, y, &cell)` in row-major order.
    pub fn iter(&self) -> impl Iterator<Item = (usize, usize, &T)> {
        let width = self.width.max(1);
        self.cells
            .iter()
            .enumerate()
            .map(move |(i, cell)| (i % width, i / width, cell))
    }

    /// Produce a new grid of the same shape by mapping every cell.
    pub fn map<U>(&self, f: impl FnMut(&T) -> U) -> Grid<U> {
        Grid {
            width: self.width,
            height: self.height,
            cells: self.cells.iter().map(f).collect(),
        }
    }

    pub fn into_cells(self) -> Vec<T> {
        self.cells
    }
}

impl<T: Clone> Grid<T> {
    /// A grid with every cell set to `value`.
    pub fn filled(width: usize, height: usize, value: T) -> Self {
        Self {
            width,
            height,
            cells: vec![value; width * height],
        }
    }
}

impl<T> std::ops::Index<(usize, usize)> for Grid<T> {
    type Output = T;

    /// # Panics
    ///
    /// Panics if `(x, y)` is out of bounds.
    fn index(&self, (x, y): (usize, usize)) -> &T {
        assert!(
            x < self.width && y < self.height,
            "cell ({x}, {y}) outside {}x{} grid",
            self.width,
            self.height
        );
        &self.cells[y * self.width + x]
    }
}

impl Grid<LayerKind> {
    /// Every cell carrying `kind`, in row-major order.
    pub fn cells_with(&self, kind: LayerKind) -> Vec<(usize, usize)> {
        self.cells_with_any(&[kind])
    }

    /// Every cell whose label is one of `kinds`, in row-major order.
    pub fn cells_with_any(&self, kinds: &[LayerKind]) -> Vec<(usize, usize)> {
        self.iter()
            .filter(|(_, _, label)| kinds.contains(label))
            .map(|(x, y, _)| (x, y))
            .collect()
    }

    /// Number of cells carrying `kind`.
    pub fn count(&self, kind: LayerKind) -> usize {
        self.cells.iter().filter(|&&label| label == kind).count()
    }

    /// Cell counts indexed by [`LayerKind::index`].
    pub fn histogram(&self) -> [usize; LayerKind::COUNT] {
        let mut counts = [0; LayerKind::COUNT];
        for label in &self.cells {
            counts[label.index()] += 1;
        }
        counts
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_fn_is_row_major() {
        let grid = Grid::from_fn(3, 2, |x, y| y * 10 + x);
        assert_eq!(grid.cells(), &[0, 1, 2, 10, 11, 12]);
        assert_eq!(grid[(2, 1)], 12);
        assert_eq!(grid.get(1, 0), Some(&1));
    }

    #[test]
    fn test_get_out_of_bounds_is_none() {
        let grid = Grid::filled(4, 4, 0.5);
        assert!(grid.get(4, 0).is_none());
        assert!(grid.get(0, 4).is_none());
    }

    #[test]
    fn test_from_vec_rejects_wrong_length() {
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3]).is_none());
        assert!(Grid::from_vec(2, 2, vec![1, 2, 3, 4]).is_some());
    }

    #[test]
    fn test_iter_yields_coordinates() {
        let grid = Grid::from_fn(2, 3, |x, y| (x, y));
        for (x, y, &cell) in grid.iter() {
            assert_eq!(cell, (x, y));
        }
        assert_eq!(grid.iter().count(), 6);
        assert_eq!(grid.rows().count(), 3);
    }

    #[test]
    fn test_label_queries() {
        let labels = Grid::from_fn(3, 1, |x, _| match x {
            0 => LayerKind::Water,
            1 => LayerKind::Ground,
            _ => LayerKind::Mountain,
        });
        assert_eq!(labels.cells_with(LayerKind::Ground), vec![(1, 0)]);
        assert_eq!(
            labels.cells_with_any(&[LayerKind::Ground, LayerKind::Mountain]),
            vec![(1, 0), (2, 0)]
        );
        assert_eq!(labels.count(LayerKind::Water), 1);
        assert_eq!(labels.histogram(), [1, 1, 1]);
    }

    #[test]
    fn test_deserialize_checks_cell_count() {
        let grid: Grid<f64> =
            serde_json::from_str(r#"{"width":2,"height":1,"cells":[0.25,0.75]}"#).unwrap();
        assert_eq!(grid[(1, 0)], 0.75);

        let short = serde_json::from_str::<Grid<f64>>(r#"{"width":2,"height":2,"cells":[0.5]}"#);
        assert!(short.is_err());
    }

    #[test]
    fn test_from_vec_rejects_overflowing_shape() {
        assert!(Grid::from_vec(usize::MAX, 2, vec![0u8; 2]).is_none());
    }
}
