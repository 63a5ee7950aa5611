//! Owned RGB pixel buffer the waterfall draws into

use crate::domain::Rgb;

/// Row-major RGB image, top row first
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl Raster {
    /// A black raster
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Rgb] {
        &self.pixels
    }

    pub fn pixel(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    pub fn row(&self, y: usize) -> &[Rgb] {
        let start = y * self.width;
        &self.pixels[start..start + self.width]
    }

    /// Shift the image down by `rows` pixel rows.
    ///
    /// Rows pushed past the bottom are lost. The top `rows` rows keep their
    /// previous content until drawn over.
    pub fn scroll_down(&mut self, rows: usize) {
        let rows = rows.min(self.height);
        let keep = (self.height - rows) * self.width;
        self.pixels.copy_within(0..keep, rows * self.width);
    }

    /// Fill a rectangle, clipped to the raster
    pub fn fill_rect(&mut self, x: usize, y: usize, w: usize, h: usize, color: Rgb) {
        let x_end = (x + w).min(self.width);
        let y_end = (y + h).min(self.height);
        if x >= x_end {
            return;
        }
        for row in y..y_end {
            let start = row * self.width;
            self.pixels[start + x..start + x_end].fill(color);
        }
    }

    /// Packed `[r, g, b, r, g, b, ...]` bytes for texture upload
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgb = Rgb::new(255, 0, 0);
    const BLUE: Rgb = Rgb::new(0, 0, 255);

    #[test]
    fn new_raster_is_black() {
        let r = Raster::new(4, 3);
        assert_eq!(r.pixels().len(), 12);
        assert!(r.pixels().iter().all(|&p| p == Rgb::BLACK));
    }

    #[test]
    fn fill_rect_clips_to_bounds() {
        let mut r = Raster::new(4, 3);
        r.fill_rect(2, 1, 5, 5, RED);
        assert_eq!(r.row(0), &[Rgb::BLACK; 4]);
        assert_eq!(r.row(1), &[Rgb::BLACK, Rgb::BLACK, RED, RED]);
        assert_eq!(r.row(2), &[Rgb::BLACK, Rgb::BLACK, RED, RED]);

        // entirely off the right edge
        r.fill_rect(9, 0, 2, 1, BLUE);
        assert!(!r.pixels().contains(&BLUE));
    }

    #[test]
    fn scroll_down_moves_rows_and_drops_bottom() {
        let mut r = Raster::new(2, 3);
        r.fill_rect(0, 0, 2, 1, RED);
        r.fill_rect(0, 2, 2, 1, BLUE);
        r.scroll_down(1);
        assert_eq!(r.row(1), &[RED, RED]);
        assert_eq!(r.row(2), &[Rgb::BLACK, Rgb::BLACK]);
        // top row is left as it was
        assert_eq!(r.row(0), &[RED, RED]);
        assert!(!r.pixels().contains(&BLUE));
    }

    #[test]
    fn scroll_past_height_is_harmless() {
        let mut r = Raster::new(2, 2);
        r.fill_rect(0, 0, 2, 2, RED);
        r.scroll_down(10);
        assert_eq!(r.pixels().len(), 4);
    }

    #[test]
    fn rgb_bytes_are_packed_row_major() {
        let mut r = Raster::new(2, 1);
        r.fill_rect(1, 0, 1, 1, BLUE);
        assert_eq!(r.to_rgb_bytes(), vec![0, 0, 0, 0, 0, 255]);
    }
}
