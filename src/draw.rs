// Window + software drawing for the host.
// 1) A resizable window that shows the container.
// 2) The container's backdrop (color or image) with the scratch surface composited on top.
// 3) A tiny 5x7 bitmap font for the progress readout.

use image::RgbaImage;
use image::imageops::{self, FilterType};
use minifb::{Key, KeyRepeat, MouseButton, MouseMode, Window, WindowOptions};

use scratch_panel::{Background, Error, FrameBuffer, ImageLoader, ImageRequest, Rgba, Surface};

const EMPTY_BACKDROP: Rgba = Rgba::opaque(24, 24, 28);

pub struct Drawer {
    window: Window,
}

impl Drawer {
    pub fn new(title: &str, width: usize, height: usize) -> Result<Self, Error> {
        let options = WindowOptions { resize: true, ..WindowOptions::default() };
        let mut window =
            Window::new(title, width, height, options).map_err(|e| Error::WindowInit(e.to_string()))?;
        window.set_target_fps(60);
        Ok(Self { window })
    }

    pub fn present(&mut self, framebuffer: &FrameBuffer) -> Result<(), Error> {
        self.window
            .update_with_buffer(&framebuffer.pixels, framebuffer.width, framebuffer.height)
            .map_err(|e| Error::WindowUpdate(e.to_string()))
    }

    pub fn is_open(&self) -> bool {
        self.window.is_open()
    }

    pub fn esc_pressed(&self) -> bool {
        self.window.is_key_down(Key::Escape)
    }

    /// Current client size of the window.
    pub fn size(&self) -> (usize, usize) {
        self.window.get_size()
    }

    /// Mouse position in window pixels, None when outside the window.
    pub fn mouse_pos(&self) -> Option<(f32, f32)> {
        self.window.get_mouse_pos(MouseMode::Discard)
    }

    pub fn left_mouse_down(&self) -> bool {
        self.window.get_mouse_down(MouseButton::Left)
    }

    pub fn pressed_once(&self, key: Key) -> bool {
        self.window.is_key_pressed(key, KeyRepeat::No)
    }
}

/* ---------- Compositing ---------- */

/// Keeps the backdrop image scaled to the current screen size.
#[derive(Default)]
pub struct Scene {
    cached: Option<(String, usize, usize, RgbaImage)>,
    failed: Option<String>,
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paint the backdrop, then the surface (if still mounted) over it.
    pub fn render(
        &mut self,
        screen: &mut FrameBuffer,
        backdrop: Option<&Background>,
        surface: Option<&Surface>,
        loader: &dyn ImageLoader,
    ) {
        match backdrop {
            Some(Background::Color(c)) => screen.fill(*c),
            Some(Background::Image(reference)) => match self.backdrop_image(reference, screen, loader) {
                Some(img) => {
                    for (x, y, p) in img.enumerate_pixels() {
                        let under = pack_rgb(EMPTY_BACKDROP);
                        let px = blend(under, Rgba { r: p[0], g: p[1], b: p[2], a: p[3] });
                        screen.pixels[y as usize * screen.width + x as usize] = px;
                    }
                }
                None => screen.fill(EMPTY_BACKDROP),
            },
            None => screen.fill(EMPTY_BACKDROP),
        }

        if let Some(surface) = surface {
            let w = surface.width().min(screen.width);
            let h = surface.height().min(screen.height);
            for y in 0..h {
                for x in 0..w {
                    let src = surface.pixels()[y * surface.width() + x];
                    if src == 0 {
                        continue;
                    }
                    let idx = y * screen.width + x;
                    screen.pixels[idx] = blend(screen.pixels[idx], Rgba::unpack(src));
                }
            }
        }
    }

    fn backdrop_image(
        &mut self,
        reference: &str,
        screen: &FrameBuffer,
        loader: &dyn ImageLoader,
    ) -> Option<&RgbaImage> {
        let (w, h) = (screen.width, screen.height);
        let fresh = matches!(&self.cached, Some((r, cw, ch, _)) if r == reference && *cw == w && *ch == h);
        if !fresh {
            if self.failed.as_deref() == Some(reference) {
                return None;
            }
            let request = ImageRequest { reference: reference.to_string(), cross_origin: Default::default() };
            match loader.load(&request) {
                Ok(img) => {
                    let scaled = imageops::resize(&img, w as u32, h as u32, FilterType::Triangle);
                    self.cached = Some((reference.to_string(), w, h, scaled));
                }
                Err(e) => {
                    tracing::warn!("background image unavailable: {}", e);
                    self.failed = Some(reference.to_string());
                    return None;
                }
            }
        }
        self.cached.as_ref().map(|(_, _, _, img)| img)
    }
}

#[inline]
fn pack_rgb(c: Rgba) -> u32 {
    ((c.r as u32) << 16) | ((c.g as u32) << 8) | c.b as u32
}

/// Source-over `src` onto an opaque 0x00RRGGBB pixel.
#[inline]
fn blend(dst: u32, src: Rgba) -> u32 {
    if src.a == 255 {
        return pack_rgb(src);
    }
    let a = src.a as u32;
    let inv = 255 - a;
    let mix = |s: u8, d: u32| (s as u32 * a + d * inv + 127) / 255;
    let r = mix(src.r, (dst >> 16) & 0xFF);
    let g = mix(src.g, (dst >> 8) & 0xFF);
    let b = mix(src.b, dst & 0xFF);
    (r << 16) | (g << 8) | b
}

/* ---------- 5x7 bitmap font (digits, ".", "%", and the words we show) ---------- */

/// Each u8 is a row; the low 5 bits are the pixels (bit 4 = leftmost).
fn glyph5x7(ch: char) -> Option<[u8; 7]> {
    let rows = match ch {
        '0' => [0b01110, 0b10001, 0b10011, 0b10101, 0b11001, 0b10001, 0b01110],
        '1' => [0b00100, 0b01100, 0b00100, 0b00100, 0b00100, 0b00100, 0b01110],
        '2' => [0b01110, 0b10001, 0b00001, 0b00010, 0b00100, 0b01000, 0b11111],
        '3' => [0b11110, 0b00001, 0b00001, 0b01110, 0b00001, 0b00001, 0b11110],
        '4' => [0b00010, 0b00110, 0b01010, 0b10010, 0b11111, 0b00010, 0b00010],
        '5' => [0b11111, 0b10000, 0b11110, 0b00001, 0b00001, 0b10001, 0b01110],
        '6' => [0b00110, 0b01000, 0b10000, 0b11110, 0b10001, 0b10001, 0b01110],
        '7' => [0b11111, 0b00001, 0b00010, 0b00100, 0b01000, 0b01000, 0b01000],
        '8' => [0b01110, 0b10001, 0b10001, 0b01110, 0b10001, 0b10001, 0b01110],
        '9' => [0b01110, 0b10001, 0b10001, 0b01111, 0b00001, 0b00010, 0b01100],
        'D' => [0b11100, 0b10010, 0b10001, 0b10001, 0b10001, 0b10010, 0b11100],
        'O' => [0b01110, 0b10001, 0b10001, 0b10001, 0b10001, 0b10001, 0b01110],
        'N' => [0b10001, 0b11001, 0b10101, 0b10011, 0b10001, 0b10001, 0b10001],
        'E' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b11111],
        'F' => [0b11111, 0b10000, 0b10000, 0b11110, 0b10000, 0b10000, 0b10000],
        'L' => [0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b10000, 0b11111],
        'A' => [0b01110, 0b10001, 0b10001, 0b11111, 0b10001, 0b10001, 0b10001],
        ' ' => [0; 7],
        '.' => [0b00000, 0b00000, 0b00000, 0b00000, 0b00000, 0b00100, 0b00000],
        '%' => [0b11001, 0b11010, 0b00010, 0b00100, 0b01000, 0b01011, 0b10011],
        '|' => [0b00100; 7],
        _ => return None,
    };
    Some(rows)
}

#[inline]
fn put_pixel(fb: &mut FrameBuffer, x: i32, y: i32, color: u32) {
    if x < 0 || y < 0 {
        return;
    }
    let (x, y) = (x as usize, y as usize);
    if x >= fb.width || y >= fb.height {
        return;
    }
    fb.pixels[y * fb.width + x] = color;
}

/// One glyph with a 1-pixel black shadow for contrast over any backdrop.
fn draw_char_5x7(fb: &mut FrameBuffer, x: i32, y: i32, ch: char, color: u32) {
    let Some(rows) = glyph5x7(ch) else {
        return;
    };
    for (offset, c) in [(1, 0x00000000), (0, color)] {
        for (ry, bits) in rows.iter().enumerate() {
            for rx in 0..5 {
                if bits & (1 << (4 - rx)) != 0 {
                    put_pixel(fb, x + rx + offset, y + ry as i32 + offset, c);
                }
            }
        }
    }
}

pub fn draw_text_5x7(fb: &mut FrameBuffer, mut x: i32, y: i32, text: &str, color: u32) {
    for ch in text.chars() {
        draw_char_5x7(fb, x, y, ch, color);
        x += 6;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NoImages;

    impl ImageLoader for NoImages {
        fn load(&self, request: &ImageRequest) -> scratch_panel::Result<RgbaImage> {
            Err(Error::ImageLoad {
                reference: request.reference.clone(),
                source: image::ImageError::IoError(std::io::Error::from(std::io::ErrorKind::NotFound)),
            })
        }
    }

    #[test]
    fn test_blend() {
        assert_eq!(blend(0x00_00_00_00, Rgba::opaque(1, 2, 3)), 0x00_01_02_03);
        assert_eq!(blend(0x00_FF_FF_FF, Rgba { r: 0, g: 0, b: 0, a: 0 }), 0x00_FF_FF_FF);
        assert_eq!(blend(0x00_00_00_00, Rgba { r: 255, g: 255, b: 255, a: 128 }), 0x00_80_80_80);
    }

    #[test]
    fn test_erased_pixels_show_backdrop() {
        let mut surface = Surface::new(4, 4);
        surface.draw_image(&RgbaImage::from_pixel(4, 4, image::Rgba([255, 0, 0, 255])));
        surface.erase_disc(scratch_panel::Point::new(0.5, 0.5), 1.0);

        let mut screen = FrameBuffer::new(4, 4);
        let backdrop = Background::Color(Rgba::opaque(0, 0, 255));
        Scene::new().render(&mut screen, Some(&backdrop), Some(&surface), &NoImages);

        assert_eq!(screen.pixels[0], 0x00_00_00_FF);
        assert_eq!(screen.pixels[5], 0x00_FF_00_00);
    }

    #[test]
    fn test_missing_backdrop_image_falls_back() {
        let mut screen = FrameBuffer::new(2, 2);
        let backdrop = Background::Image("gone.png".to_string());
        let mut scene = Scene::new();
        scene.render(&mut screen, Some(&backdrop), None, &NoImages);
        assert_eq!(screen.pixels[0], pack_rgb(EMPTY_BACKDROP));
        assert_eq!(scene.failed.as_deref(), Some("gone.png"));
    }

    #[test]
    fn test_text_stays_in_bounds() {
        let mut fb = FrameBuffer::new(8, 8);
        draw_text_5x7(&mut fb, 4, 4, "100.0%", 0x00FFFFFF);
        assert!(fb.pixels.iter().any(|&p| p == 0x00FFFFFF));
    }
}
