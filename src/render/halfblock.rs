use crate::color::Rgb8;
use crate::render::{draw_overlay_popup, write_bg, write_fg, Frame, Renderer};
use std::io::Write;

const HALF_BLOCK: char = '\u{2580}';
const SWATCH: &str = "\u{2588}\u{2588}";

/// Two pixels per cell: the upper half is the foreground of `▀`, the lower half
/// its background.
pub struct HalfBlockRenderer {
    last_fg: Option<Rgb8>,
    last_bg: Option<Rgb8>,
}

impl HalfBlockRenderer {
    pub fn new() -> Self {
        Self {
            last_fg: None,
            last_bg: None,
        }
    }

    fn fg(&mut self, out: &mut dyn Write, c: Rgb8) -> std::io::Result<()> {
        if self.last_fg != Some(c) {
            write_fg(out, c)?;
            self.last_fg = Some(c);
        }
        Ok(())
    }

    fn bg(&mut self, out: &mut dyn Write, c: Rgb8) -> std::io::Result<()> {
        if self.last_bg != Some(c) {
            write_bg(out, c)?;
            self.last_bg = Some(c);
        }
        Ok(())
    }
}

impl Default for HalfBlockRenderer {
    fn default() -> Self {
        Self::new()
    }
}

fn rgb_at(pixels: &[u8], width: usize, x: usize, y: usize) -> Rgb8 {
    let i = (y * width + x) * 4;
    Rgb8::new(pixels[i], pixels[i + 1], pixels[i + 2])
}

impl Renderer for HalfBlockRenderer {
    fn name(&self) -> &'static str {
        "halfblock"
    }

    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()> {
        let cols = frame.term_cols as usize;
        let visual_rows = frame.visual_rows as usize;
        let w = frame.pixel_width;
        let h = frame.pixel_height;

        if cols == 0 || visual_rows == 0 || w != cols || h != visual_rows * 2 {
            return Ok(());
        }
        let need = w * h * 4;
        if frame.pixels_rgba.len() < need {
            anyhow::bail!(
                "pixel buffer too small (need {need}, got {})",
                frame.pixels_rgba.len()
            );
        }

        if frame.sync_updates {
            out.write_all(b"\x1b[?2026h")?;
        }
        // Home, reset, autowrap off while painting full-width rows.
        out.write_all(b"\x1b[H\x1b[0m\x1b[?7l")?;
        self.last_fg = None;
        self.last_bg = None;

        for row in 0..visual_rows {
            for x in 0..cols {
                let top = rgb_at(frame.pixels_rgba, w, x, row * 2);
                let bottom = rgb_at(frame.pixels_rgba, w, x, row * 2 + 1);
                self.fg(out, top)?;
                self.bg(out, bottom)?;
                write!(out, "{HALF_BLOCK}")?;
            }
            out.write_all(b"\r\n")?;
        }

        let mut hud_lines = frame.hud.lines();
        for i in 0..frame.hud_rows as usize {
            write!(out, "\x1b[{};1H\x1b[0m\x1b[2K", visual_rows + i + 1)?;
            self.last_fg = None;
            self.last_bg = None;
            let mut used = 0usize;
            if i == 0 {
                for &chip in frame.swatches {
                    if used + 3 > cols {
                        break;
                    }
                    self.fg(out, chip)?;
                    write!(out, "{SWATCH}")?;
                    out.write_all(b"\x1b[0m ")?;
                    self.last_fg = None;
                    used += 3;
                }
            }
            if let Some(line) = hud_lines.next() {
                let room = cols.saturating_sub(used);
                let clipped: String = line.chars().take(room).collect();
                write!(out, "{clipped}")?;
            }
        }

        if let Some(text) = frame.overlay {
            draw_overlay_popup(out, frame.term_cols, frame.term_rows, text)?;
        }

        out.write_all(b"\x1b[?7h")?;
        if frame.sync_updates {
            out.write_all(b"\x1b[?2026l")?;
        }
        out.flush()?;
        Ok(())
    }
}
