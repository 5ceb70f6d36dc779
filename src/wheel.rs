use crate::color::Rgb8;
use crate::gradient::CYCLE_UNITS;
use crate::palette::{Palette, PaletteEngine, PaletteError};
use std::f64::consts::TAU;

/// RGBA pixel buffer the wheel is drawn into.
pub struct Canvas {
    width: usize,
    height: usize,
    pixels: Vec<u8>,
}

impl Canvas {
    pub fn new(width: usize, height: usize) -> Self {
        let mut canvas = Self {
            width,
            height,
            pixels: vec![0u8; width.saturating_mul(height).saturating_mul(4)],
        };
        canvas.clear(Rgb8::default());
        canvas
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels_rgba(&self) -> &[u8] {
        &self.pixels
    }

    pub fn clear(&mut self, color: Rgb8) {
        for px in self.pixels.chunks_exact_mut(4) {
            px[0] = color.r;
            px[1] = color.g;
            px[2] = color.b;
            px[3] = 255;
        }
    }

    pub fn pixel(&self, x: usize, y: usize) -> Option<Rgb8> {
        if x >= self.width || y >= self.height {
            return None;
        }
        let i = (y * self.width + x) * 4;
        Some(Rgb8::new(self.pixels[i], self.pixels[i + 1], self.pixels[i + 2]))
    }

    pub fn set_pixel(&mut self, x: i64, y: i64, color: Rgb8) {
        if x < 0 || y < 0 || x as usize >= self.width || y as usize >= self.height {
            return;
        }
        let i = (y as usize * self.width + x as usize) * 4;
        self.pixels[i] = color.r;
        self.pixels[i + 1] = color.g;
        self.pixels[i + 2] = color.b;
        self.pixels[i + 3] = 255;
    }

    /// Bresenham line; pixels outside the canvas are skipped.
    pub fn draw_line(&mut self, from: (f64, f64), to: (f64, f64), color: Rgb8) {
        let (mut x0, mut y0) = (from.0.round() as i64, from.1.round() as i64);
        let (x1, y1) = (to.0.round() as i64, to.1.round() as i64);

        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.set_pixel(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Wheel layout. The reference layout is an 800x600 surface centered at
/// (400, 300) with the base ring spanning radii 150..200 and the contrast ring
/// 200..250; `fit` scales that to any canvas.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WheelGeometry {
    pub center: (f64, f64),
    pub inner: f64,
    pub outer: f64,
    pub ring_offset: f64,
}

impl Default for WheelGeometry {
    fn default() -> Self {
        Self {
            center: (400.0, 300.0),
            inner: 150.0,
            outer: 200.0,
            ring_offset: 50.0,
        }
    }
}

impl WheelGeometry {
    pub fn fit(width: usize, height: usize) -> Self {
        let reference = Self::default();
        let half = (width.min(height) as f64 / 2.0 - 1.0).max(0.0);
        let scale = half / (reference.outer + reference.ring_offset);
        Self {
            center: ((width as f64 - 1.0) / 2.0, (height as f64 - 1.0) / 2.0),
            inner: reference.inner * scale,
            outer: reference.outer * scale,
            ring_offset: reference.ring_offset * scale,
        }
    }

    pub fn angle(time_value: f64) -> f64 {
        TAU * time_value / CYCLE_UNITS as f64
    }

    pub fn point(&self, radius: f64, angle: f64) -> (f64, f64) {
        (
            self.center.0 + radius * angle.cos(),
            self.center.1 + radius * angle.sin(),
        )
    }

    /// Endpoints of the base segment, then the contrast segment.
    pub fn segments(&self, time_value: f64) -> [((f64, f64), (f64, f64)); 2] {
        let a = Self::angle(time_value);
        [
            (self.point(self.outer, a), self.point(self.inner, a)),
            (
                self.point(self.outer + self.ring_offset, a),
                self.point(self.inner + self.ring_offset, a),
            ),
        ]
    }
}

/// Draws the wheel one tick at a time from an explicitly supplied engine.
pub struct WheelPainter<'a> {
    engine: &'a PaletteEngine,
    geometry: WheelGeometry,
}

impl<'a> WheelPainter<'a> {
    pub fn new(engine: &'a PaletteEngine, geometry: WheelGeometry) -> Self {
        Self { engine, geometry }
    }

    pub fn for_canvas(engine: &'a PaletteEngine, canvas: &Canvas) -> Self {
        Self::new(engine, WheelGeometry::fit(canvas.width(), canvas.height()))
    }

    pub fn geometry(&self) -> WheelGeometry {
        self.geometry
    }

    /// Draw the base and contrast segments for one time value. The palette is
    /// derived once and returned for the caller's HUD.
    pub fn tick(&self, canvas: &mut Canvas, time_value: f64) -> Result<Palette, PaletteError> {
        let palette = self.engine.palette(time_value)?;
        let [base_seg, contrast_seg] = self.geometry.segments(time_value);
        canvas.draw_line(base_seg.0, base_seg.1, palette.base.to_rgb8());
        canvas.draw_line(contrast_seg.0, contrast_seg.1, palette.contrast.to_rgb8());
        Ok(palette)
    }

    /// Replay every whole tick in `0..until`.
    pub fn paint_until(&self, canvas: &mut Canvas, until: f64) -> Result<Option<Palette>, PaletteError> {
        let mut last = None;
        let mut t = 0.0;
        while t < until {
            last = Some(self.tick(canvas, t)?);
            t += 1.0;
        }
        Ok(last)
    }
}
