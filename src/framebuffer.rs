//! In-memory RGB565 framebuffer.
//!
//! Stands in for the TFT panel during development: graphs are drawn here
//! through [`GraphicsCanvas`](crate::canvas::GraphicsCanvas), then written
//! out as a binary PPM image or previewed as ASCII in the terminal.

use core::convert::Infallible;
use embedded_graphics::pixelcolor::Rgb565;
use embedded_graphics::prelude::*;
use embedded_graphics::primitives::Rectangle;
use std::io::{self, Write};

/// Row-major RGB565 pixel buffer of arbitrary size.
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb565>,
}

impl FrameBuffer {
    /// Allocate a buffer filled with black pixels.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Rgb565::BLACK; width as usize * height as usize],
        }
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb565> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Number of pixels that are not black.
    pub fn lit_pixels(&self) -> usize {
        self.pixels.iter().filter(|&&p| p != Rgb565::BLACK).count()
    }

    #[inline]
    fn set_pixel(&mut self, x: i32, y: i32, color: Rgb565) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            let idx = y as usize * self.width as usize + x as usize;
            self.pixels[idx] = color;
        }
    }

    /// Write the buffer as a binary PPM (P6) image.
    pub fn write_ppm<W: Write>(&self, mut out: W) -> io::Result<()> {
        write!(out, "P6\n{} {}\n255\n", self.width, self.height)?;
        let mut row = Vec::with_capacity(self.width as usize * 3);
        for line in self.pixels.chunks(self.width.max(1) as usize) {
            row.clear();
            for p in line {
                // Expand 5/6/5-bit channels to 8 bits
                row.push((p.r() << 3) | (p.r() >> 2));
                row.push((p.g() << 2) | (p.g() >> 4));
                row.push((p.b() << 3) | (p.b() >> 2));
            }
            out.write_all(&row)?;
        }
        Ok(())
    }

    /// Coarse terminal preview: one character per `cell_w` x `cell_h` block.
    pub fn to_ascii(&self, cell_w: u32, cell_h: u32) -> String {
        let (cell_w, cell_h) = (cell_w.max(1), cell_h.max(1));
        let mut out = String::new();
        for cy in (0..self.height).step_by(cell_h as usize) {
            for cx in (0..self.width).step_by(cell_w as usize) {
                let lit = (cy..(cy + cell_h).min(self.height))
                    .flat_map(|y| (cx..(cx + cell_w).min(self.width)).map(move |x| (x, y)))
                    .filter(|&(x, y)| self.pixel(x, y).is_some_and(|p| p != Rgb565::BLACK))
                    .count();
                out.push(match lit {
                    0 => ' ',
                    1..=2 => '.',
                    3..=6 => '+',
                    _ => '#',
                });
            }
            out.push('\n');
        }
        out
    }
}

impl OriginDimensions for FrameBuffer {
    fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }
}

impl DrawTarget for FrameBuffer {
    type Color = Rgb565;
    type Error = Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(coord, color) in pixels {
            self.set_pixel(coord.x, coord.y, color);
        }
        Ok(())
    }

    fn fill_solid(&mut self, area: &Rectangle, color: Self::Color) -> Result<(), Self::Error> {
        let area = area.intersection(&self.bounding_box());
        if let Some(bottom_right) = area.bottom_right() {
            for y in area.top_left.y..=bottom_right.y {
                for x in area.top_left.x..=bottom_right.x {
                    self.set_pixel(x, y, color);
                }
            }
        }
        Ok(())
    }
}
