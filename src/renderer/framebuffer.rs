//! CPU pixel buffer used as an eye target and for the composited output

use std::io::{self, Write};
use std::path::Path;

use bytemuck::{Pod, Zeroable};

/// One RGBA8 pixel, laid out so a pixel slice casts straight to bytes
#[repr(C)]
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Pod, Zeroable)]
pub struct Rgba {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Rgba {
    pub const TRANSPARENT: Rgba = Rgba::new(0, 0, 0, 0);
    pub const BLACK: Rgba = Rgba::new(0, 0, 0, 255);

    pub const fn new(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }

    /// Opaque gray from an intensity in [0, 1]
    pub fn gray(shade: f32) -> Self {
        let v = (shade.clamp(0.0, 1.0) * 255.0).round() as u8;
        Self::new(v, v, v, 255)
    }
}

/// Offset of pixel (x, y) in a row-major buffer `width` pixels wide
#[inline]
fn pixel_index(width: u32, x: u32, y: u32) -> usize {
    y as usize * width as usize + x as usize
}

/// Row-major RGBA pixel buffer, origin at the top left
#[derive(Debug, Clone, PartialEq)]
pub struct Framebuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgba>,
}

impl Framebuffer {
    /// Create a transparent buffer
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgba::TRANSPARENT; width as usize * height as usize],
        }
    }

    #[inline]
    pub fn width(&self) -> u32 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixels(&self) -> &[Rgba] {
        &self.pixels
    }

    /// Raw RGBA bytes, e.g. for upload to a texture
    pub fn as_bytes(&self) -> &[u8] {
        bytemuck::cast_slice(&self.pixels)
    }

    pub fn clear(&mut self, color: Rgba) {
        self.pixels.fill(color);
    }

    #[inline]
    fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && x < self.width as i32 && y >= 0 && y < self.height as i32
    }

    /// Read a pixel; `None` outside the buffer
    pub fn pixel(&self, x: i32, y: i32) -> Option<Rgba> {
        self.in_bounds(x, y)
            .then(|| self.pixels[pixel_index(self.width, x as u32, y as u32)])
    }

    /// Write a pixel; ignored outside the buffer
    #[inline]
    pub fn set_pixel(&mut self, x: i32, y: i32, color: Rgba) {
        if self.in_bounds(x, y) {
            let idx = pixel_index(self.width, x as u32, y as u32);
            self.pixels[idx] = color;
        }
    }

    /// Fill the pixels with x in [x0, x1] and y in [y0, y1], clipped
    pub fn fill_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let (x0, x1) = (x0.min(x1).max(0), x0.max(x1).min(self.width as i32 - 1));
        let (y0, y1) = (y0.min(y1).max(0), y0.max(y1).min(self.height as i32 - 1));
        if x0 > x1 || y0 > y1 {
            return;
        }
        for y in y0..=y1 {
            let row = pixel_index(self.width, 0, y as u32);
            self.pixels[row + x0 as usize..=row + x1 as usize].fill(color);
        }
    }

    /// One-pixel border of the rectangle [x0, x1] × [y0, y1], clipped
    pub fn outline_rect(&mut self, x0: i32, y0: i32, x1: i32, y1: i32, color: Rgba) {
        let (x0, x1) = (x0.min(x1), x0.max(x1));
        let (y0, y1) = (y0.min(y1), y0.max(y1));
        self.fill_rect(x0, y0, x1, y0, color);
        self.fill_rect(x0, y1, x1, y1, color);
        self.fill_rect(x0, y0, x0, y1, color);
        self.fill_rect(x1, y0, x1, y1, color);
    }

    /// Write as binary PPM (P6); alpha is dropped
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let rgb: Vec<u8> = self.pixels.iter().flat_map(|p| [p.r, p.g, p.b]).collect();
        out.write_all(&rgb)?;
        out.flush()
    }

    pub fn save_ppm(&self, path: impl AsRef<Path>) -> io::Result<()> {
        let file = std::fs::File::create(path.as_ref())?;
        self.write_ppm(io::BufWriter::new(file))?;
        log::info!("wrote {}x{} frame to {}", self.width, self.height, path.as_ref().display());
        Ok(())
    }
}

/// Red/cyan anaglyph: red from the left eye, green and blue from the right,
/// alpha summed with saturation. Covers the area both buffers share.
pub fn anaglyph(left: &Framebuffer, right: &Framebuffer) -> Framebuffer {
    let width = left.width.min(right.width);
    let height = left.height.min(right.height);
    let mut out = Framebuffer::new(width, height);
    for y in 0..height {
        for x in 0..width {
            let l = left.pixels[pixel_index(left.width, x, y)];
            let r = right.pixels[pixel_index(right.width, x, y)];
            out.pixels[pixel_index(width, x, y)] = Rgba::new(l.r, r.g, r.b, l.a.saturating_add(r.a));
        }
    }
    out
}
