//! # Frame Compositor
//!
//! Paints a primitive list onto any `embedded-graphics` draw target. Hosts with a real
//! panel hand in their display driver; the simulator and tests use [`FrameBuffer`], an
//! in-memory RGB target with an ASCII preview for terminals.
//!
//! Text primitives already carry their resolved baseline origin, so nothing is
//! re-measured here.

use crate::layout::Primitive;
use crate::paint::PaintSet;
use embedded_graphics::{
    pixelcolor::Rgb888,
    prelude::*,
    primitives::{Primitive as _, PrimitiveStyle, Rectangle},
    text::{Baseline, Text},
};

/// Draw `primitives` in order onto `target`.
pub fn render<D>(primitives: &[Primitive], paints: &PaintSet, target: &mut D) -> Result<(), D::Error>
where
    D: DrawTarget<Color = Rgb888>,
{
    for primitive in primitives {
        let paint = paints.get(primitive.paint());
        match primitive {
            Primitive::Rect { x0, y0, x1, y1, .. } => {
                if x1 <= x0 || y1 <= y0 {
                    continue;
                }
                Rectangle::new(
                    Point::new(*x0, *y0),
                    Size::new((x1 - x0) as u32, (y1 - y0) as u32),
                )
                .into_styled(PrimitiveStyle::with_fill(paint.color))
                .draw(target)?;
            }
            Primitive::Text {
                text,
                origin_x,
                origin_y,
                ..
            } => {
                // Mono fonts have no smoothing, so the anti-alias flag needs no handling here
                if let Some(style) = paint.text_style() {
                    Text::with_baseline(
                        text,
                        Point::new(*origin_x, *origin_y),
                        style,
                        Baseline::Alphabetic,
                    )
                    .draw(target)?;
                }
            }
        }
    }
    Ok(())
}

/// In-memory RGB frame buffer.
///
/// Pixels outside the buffer are clipped silently.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb888>,
}

impl FrameBuffer {
    /// Black buffer of `width` x `height` pixels, or `None` when the pixel count does
    /// not fit in a `u32` index.
    pub fn new(width: u32, height: u32) -> Option<Self> {
        let len = width.checked_mul(height)?;
        Some(FrameBuffer {
            width,
            height,
            pixels: vec![Rgb888::BLACK; len as usize],
        })
    }

    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb888> {
        if x < self.width && y < self.height {
            Some(self.pixels[(y * self.width + x) as usize])
        } else {
            None
        }
    }

    /// Count pixels of exactly `color`.
    pub fn count(&self, color: Rgb888) -> usize {
        self.pixels.iter().filter(|&&p| p == color).count()
    }

    /// Downsample to a character grid `columns` wide, one character per cell.
    ///
    /// Cells are twice as tall as they are wide to roughly match terminal glyphs.
    /// Each cell shows the luminance of its top-left pixel.
    pub fn to_ascii(&self, columns: u32) -> String {
        const RAMP: &[u8] = b" .:-=+*#%@";
        let columns = columns.clamp(1, self.width.max(1));
        let cell_w = (self.width / columns).max(1);
        let cell_h = cell_w * 2;

        let mut out = String::new();
        for y in (0..self.height).step_by(cell_h as usize) {
            for x in (0..self.width).step_by(cell_w as usize) {
                let color = self.pixels[(y * self.width + x) as usize];
                let luma = (color.r() as u32 * 299 + color.g() as u32 * 587 + color.b() as u32 * 114) / 1000;
                let index = (luma as usize * (RAMP.len() - 1)) / 255;
                out.push(RAMP[index] as char);
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
    type Color = Rgb888;
    type Error = core::convert::Infallible;

    fn draw_iter<I>(&mut self, pixels: I) -> Result<(), Self::Error>
    where
        I: IntoIterator<Item = Pixel<Self::Color>>,
    {
        for Pixel(point, color) in pixels {
            if point.x >= 0
                && point.y >= 0
                && (point.x as u32) < self.width
                && (point.y as u32) < self.height
            {
                let index = (point.y as u32 * self.width + point.x as u32) as usize;
                self.pixels[index] = color;
            }
        }
        Ok(())
    }
}
