// Raster surface the scratch card is painted on and erased from.
// Pixels are 0xAARRGGBB; 0 means fully transparent, i.e. scratched off.

use image::RgbaImage;
use image::imageops::{self, FilterType};

use crate::types::{Point, Rgba};

pub struct Surface {
    width: usize,
    height: usize,
    pixels: Vec<u32>,
}

impl Surface {
    /// A transparent surface of the given size.
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[u32] {
        &self.pixels
    }

    /// Pixel at (x,y), or None outside the surface.
    pub fn pixel(&self, x: usize, y: usize) -> Option<u32> {
        if x >= self.width || y >= self.height {
            return None;
        }
        Some(self.pixels[y * self.width + x])
    }

    /// Reallocate to a new size. Like a canvas, this drops the old content.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.width = width;
        self.height = height;
        self.pixels.clear();
        self.pixels.resize(width * height, 0);
    }

    /// Make every pixel transparent.
    pub fn clear(&mut self) {
        self.pixels.fill(0);
    }

    /// Draw `img` stretched to the full surface at the origin.
    pub fn draw_image(&mut self, img: &RgbaImage) {
        if self.width == 0 || self.height == 0 || img.width() == 0 || img.height() == 0 {
            return;
        }
        let (w, h) = (self.width as u32, self.height as u32);
        let scaled;
        let src = if img.dimensions() == (w, h) {
            img
        } else {
            scaled = imageops::resize(img, w, h, FilterType::Triangle);
            &scaled
        };

        for (x, y, p) in src.enumerate_pixels() {
            let color = Rgba { r: p[0], g: p[1], b: p[2], a: p[3] };
            self.pixels[y as usize * self.width + x as usize] = color.pack();
        }
    }

    /// Destination-out a filled disc of `diameter` centered at `center`.
    /// A pixel is covered when its center lies inside the disc.
    pub fn erase_disc(&mut self, center: Point, diameter: f32) {
        let r = diameter / 2.0;
        if r <= 0.0 {
            return;
        }
        let r2 = r * r;
        self.erase_where(center.x - r, center.y - r, center.x + r, center.y + r, |px, py| {
            let dx = px - center.x;
            let dy = py - center.y;
            dx * dx + dy * dy <= r2
        });
    }

    /// Destination-out a round-capped line of `width` from `a` to `b`.
    pub fn erase_segment(&mut self, a: Point, b: Point, width: f32) {
        let r = width / 2.0;
        if r <= 0.0 {
            return;
        }
        let r2 = r * r;
        let (dx, dy) = (b.x - a.x, b.y - a.y);
        let len2 = dx * dx + dy * dy;
        self.erase_where(
            a.x.min(b.x) - r,
            a.y.min(b.y) - r,
            a.x.max(b.x) + r,
            a.y.max(b.y) + r,
            |px, py| {
                // Distance from the pixel center to the closest point on the segment.
                let t = if len2 > 0.0 {
                    (((px - a.x) * dx + (py - a.y) * dy) / len2).clamp(0.0, 1.0)
                } else {
                    0.0
                };
                let cx = a.x + t * dx - px;
                let cy = a.y + t * dy - py;
                cx * cx + cy * cy <= r2
            },
        );
    }

    /// Zero every pixel inside the clipped box whose center satisfies `covered`.
    fn erase_where(
        &mut self,
        min_x: f32,
        min_y: f32,
        max_x: f32,
        max_y: f32,
        covered: impl Fn(f32, f32) -> bool,
    ) {
        let x0 = min_x.floor().max(0.0) as usize;
        let y0 = min_y.floor().max(0.0) as usize;
        let x1 = (max_x.ceil().max(0.0) as usize).min(self.width);
        let y1 = (max_y.ceil().max(0.0) as usize).min(self.height);

        for y in y0..y1 {
            let row = y * self.width;
            for x in x0..x1 {
                if covered(x as f32 + 0.5, y as f32 + 0.5) {
                    self.pixels[row + x] = 0;
                }
            }
        }
    }

    /// Number of fully transparent pixels.
    pub fn erased_count(&self) -> usize {
        self.pixels.iter().filter(|&&px| px == 0).count()
    }

    /// Share of the surface that is fully transparent, in percent [0,100].
    /// Scans every pixel, so callers throttle it. An empty surface reports 0.
    pub fn percent_scratched(&self) -> f32 {
        let total = self.pixels.len();
        if total == 0 {
            return 0.0;
        }
        (self.erased_count() as f64 / total as f64 * 100.0) as f32
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn solid(w: u32, h: u32) -> RgbaImage {
        RgbaImage::from_pixel(w, h, image::Rgba([200, 120, 40, 255]))
    }

    fn painted(w: usize, h: usize) -> Surface {
        let mut s = Surface::new(w, h);
        s.draw_image(&solid(8, 8));
        s
    }

    #[test]
    fn test_fresh_painted_surface_is_unscratched() {
        let s = painted(50, 40);
        assert_eq!(s.percent_scratched(), 0.0);
    }

    #[test]
    fn test_new_surface_is_transparent() {
        let s = Surface::new(10, 10);
        assert_eq!(s.percent_scratched(), 100.0);
    }

    #[test]
    fn test_clear_reports_fully_scratched() {
        let mut s = painted(20, 20);
        s.clear();
        assert_eq!(s.percent_scratched(), 100.0);
    }

    #[test]
    fn test_empty_surface_reports_zero() {
        let s = Surface::new(0, 0);
        assert_eq!(s.percent_scratched(), 0.0);
    }

    #[test]
    fn test_draw_image_scales_to_surface() {
        let s = painted(33, 17);
        let px = Rgba::unpack(s.pixel(32, 16).unwrap());
        assert!(px.r.abs_diff(200) <= 1 && px.g.abs_diff(120) <= 1 && px.b.abs_diff(40) <= 1);
        assert!(px.a >= 254);
        assert_eq!(s.erased_count(), 0);
    }

    #[test]
    fn test_transparent_image_pixels_count_as_erased() {
        let mut img = solid(4, 4);
        img.put_pixel(0, 0, image::Rgba([10, 20, 30, 0]));
        let mut s = Surface::new(4, 4);
        s.draw_image(&img);
        assert_eq!(s.pixel(0, 0), Some(0));
        assert_eq!(s.erased_count(), 1);
    }

    #[test]
    fn test_erase_disc_shape() {
        let mut s = painted(100, 100);
        s.erase_disc(Point::new(50.0, 50.0), 20.0);

        assert_eq!(s.pixel(50, 50), Some(0));
        assert_eq!(s.pixel(41, 50), Some(0));
        assert_ne!(s.pixel(61, 50), Some(0));
        assert_ne!(s.pixel(50, 61), Some(0));
        // Corner of the bounding box stays painted.
        assert_ne!(s.pixel(41, 41), Some(0));

        // ~ pi * r^2
        let area = std::f32::consts::PI * 100.0;
        let erased = s.erased_count() as f32;
        assert!((erased - area).abs() / area < 0.05, "erased {erased}");
    }

    #[test]
    fn test_erase_disc_clips_at_edges() {
        let mut s = painted(10, 10);
        s.erase_disc(Point::new(0.0, 0.0), 8.0);
        s.erase_disc(Point::new(-50.0, -50.0), 8.0);
        assert_eq!(s.pixel(0, 0), Some(0));
        assert!(s.erased_count() < 20);
    }

    #[test]
    fn test_erase_segment_covers_band() {
        let mut s = painted(100, 40);
        s.erase_segment(Point::new(10.0, 20.0), Point::new(90.0, 20.0), 10.0);

        for x in 10..90 {
            assert_eq!(s.pixel(x, 20), Some(0), "x={x}");
            assert_eq!(s.pixel(x, 16), Some(0), "x={x}");
            assert_ne!(s.pixel(x, 26), Some(0), "x={x}");
        }
        // Round cap reaches past the end point.
        assert_eq!(s.pixel(92, 20), Some(0));
        assert_ne!(s.pixel(97, 20), Some(0));
    }

    #[test]
    fn test_resize_drops_content() {
        let mut s = painted(10, 10);
        s.resize(20, 5);
        assert_eq!((s.width(), s.height()), (20, 5));
        assert_eq!(s.pixels().len(), 100);
        assert_eq!(s.percent_scratched(), 100.0);
    }
}
