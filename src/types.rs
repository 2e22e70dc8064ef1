// Core value types shared by the surface, the input tracker and the host.

use std::str::FromStr;

use crate::error::Error;

/// A position in pixels. Client coordinates or surface-local, depending on context.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Point {
    pub x: f32,
    pub y: f32,
}

impl Point {
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// `self - origin`, i.e. the same point seen from `origin`.
    pub fn relative_to(self, origin: Point) -> Point {
        Point::new(self.x - origin.x, self.y - origin.y)
    }
}

/// Straight (non-premultiplied) 8-bit color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba { r: 0, g: 0, b: 0, a: 0 };

    pub const fn opaque(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    /// Pack as 0xAARRGGBB. Fully transparent colors pack to 0 whatever their RGB.
    #[inline]
    pub fn pack(self) -> u32 {
        if self.a == 0 {
            return 0;
        }
        ((self.a as u32) << 24) | ((self.r as u32) << 16) | ((self.g as u32) << 8) | self.b as u32
    }

    #[inline]
    pub fn unpack(px: u32) -> Self {
        Self {
            a: (px >> 24) as u8,
            r: ((px >> 16) & 0xFF) as u8,
            g: ((px >> 8) & 0xFF) as u8,
            b: (px & 0xFF) as u8,
        }
    }
}

impl FromStr for Rgba {
    type Err = Error;

    /// Accepts `#rgb`, `#rrggbb` and `#rrggbbaa`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let bad = || Error::InvalidColor(s.to_string());
        let hex = s.trim().strip_prefix('#').ok_or_else(bad)?;
        if !hex.chars().all(|c| c.is_ascii_hexdigit()) {
            return Err(bad());
        }
        let byte = |i: usize| u8::from_str_radix(&hex[i..i + 2], 16).map_err(|_| bad());
        match hex.len() {
            3 => {
                let nib = |i: usize| {
                    u8::from_str_radix(&hex[i..i + 1], 16)
                        .map(|v| v * 17)
                        .map_err(|_| bad())
                };
                Ok(Rgba::opaque(nib(0)?, nib(1)?, nib(2)?))
            }
            6 => Ok(Rgba::opaque(byte(0)?, byte(2)?, byte(4)?)),
            8 => Ok(Rgba { r: byte(0)?, g: byte(2)?, b: byte(4)?, a: byte(6)? }),
            _ => Err(bad()),
        }
    }
}

/// Opaque 0x00RRGGBB pixels, the format minifb presents.
#[derive(Clone)]
pub struct FrameBuffer {
    pub width: usize,
    pub height: usize,
    pub pixels: Vec<u32>,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, pixels: vec![0u32; width * height] }
    }

    pub fn fill(&mut self, color: Rgba) {
        let px = ((color.r as u32) << 16) | ((color.g as u32) << 8) | color.b as u32;
        self.pixels.fill(px);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_hex_colors() {
        assert_eq!("#fff".parse::<Rgba>().unwrap(), Rgba::opaque(255, 255, 255));
        assert_eq!("#1a2b3c".parse::<Rgba>().unwrap(), Rgba::opaque(0x1a, 0x2b, 0x3c));
        assert_eq!(
            "#10203040".parse::<Rgba>().unwrap(),
            Rgba { r: 0x10, g: 0x20, b: 0x30, a: 0x40 }
        );
        assert!("fff".parse::<Rgba>().is_err());
        assert!("#ggg".parse::<Rgba>().is_err());
        assert!("#12345".parse::<Rgba>().is_err());
    }

    #[test]
    fn test_pack_transparent_is_zero() {
        let c = Rgba { r: 9, g: 9, b: 9, a: 0 };
        assert_eq!(c.pack(), 0);
        let red = Rgba::opaque(255, 0, 0);
        assert_eq!(red.pack(), 0xFF_FF_00_00);
        assert_eq!(Rgba::unpack(red.pack()), red);
    }

    #[test]
    fn test_point_relative() {
        let p = Point::new(15.0, 40.0).relative_to(Point::new(5.0, 10.0));
        assert_eq!(p, Point::new(10.0, 30.0));
    }
}
