//! Opaque RGBA preview images.

use crate::grid::Grid;

/// Row-major RGBA8 pixels, one pixel per grid cell.
#[derive(Clone, Debug, PartialEq)]
pub struct DebugImage {
    pub width: u32,
    pub height: u32,
    /// `width * height * 4` bytes.
    pub pixels: Vec<u8>,
}

impl DebugImage {
    /// A fully transparent black image.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![0; width as usize * height as usize * 4],
        }
    }

    /// Color every cell of `grid` through `color`.
    pub fn from_grid<T>(grid: &Grid<T>, color: impl Fn(&T) -> (u8, u8, u8)) -> Self {
        let pixels = grid
            .cells()
            .iter()
            .flat_map(|cell| {
                let (r, g, b) = color(cell);
                [r, g, b, 255]
            })
            .collect();
        Self {
            width: grid.width() as u32,
            height: grid.height() as u32,
            pixels,
        }
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn set_rgb(&mut self, x: u32, y: u32, (r, g, b): (u8, u8, u8)) {
        let idx = self.offset(x, y);
        self.pixels[idx..idx + 4].copy_from_slice(&[r, g, b, 255]);
    }

    /// # Panics
    ///
    /// Panics if `(x, y)` lies outside the image.
    pub fn get_pixel(&self, x: u32, y: u32) -> (u8, u8, u8, u8) {
        let idx = self.offset(x, y);
        let p = &self.pixels[idx..idx + 4];
        (p[0], p[1], p[2], p[3])
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Distinct RGB triples, alpha ignored.
    pub fn unique_color_count(&self) -> usize {
        let mut colors: Vec<[u8; 3]> = self
            .pixels
            .chunks_exact(4)
            .map(|p| [p[0], p[1], p[2]])
            .collect();
        colors.sort_unstable();
        colors.dedup();
        colors.len()
    }

    fn offset(&self, x: u32, y: u32) -> usize {
        assert!(
            x < self.width && y < self.height,
            "pixel ({x}, {y}) outside {}x{} image",
            self.width,
            self.height
        );
        (y as usize * self.width as usize + x as usize) * 4
    }
}
