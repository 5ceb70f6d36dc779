mod halfblock;

pub use halfblock::HalfBlockRenderer;

use crate::color::Rgb8;
use std::io::Write;

/// One screen update: the wheel pixels plus the status area below them.
pub struct Frame<'a> {
    pub term_cols: u16,
    pub term_rows: u16,
    pub visual_rows: u16,
    pub pixel_width: usize,
    pub pixel_height: usize,
    pub pixels_rgba: &'a [u8],
    pub hud: &'a str,
    pub hud_rows: u16,
    /// Color chips drawn at the start of the first HUD row.
    pub swatches: &'a [Rgb8],
    pub overlay: Option<&'a str>,
    pub sync_updates: bool,
}

pub trait Renderer {
    fn name(&self) -> &'static str;
    fn render(&mut self, frame: &Frame<'_>, out: &mut dyn Write) -> anyhow::Result<()>;
}

pub(crate) fn write_fg(out: &mut dyn Write, c: Rgb8) -> std::io::Result<()> {
    write!(out, "\x1b[38;2;{};{};{}m", c.r, c.g, c.b)
}

pub(crate) fn write_bg(out: &mut dyn Write, c: Rgb8) -> std::io::Result<()> {
    write!(out, "\x1b[48;2;{};{};{}m", c.r, c.g, c.b)
}

/// Split `text` into lines no wider than `width` characters.
fn wrap_lines(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for raw in text.lines() {
        let chars: Vec<char> = raw.chars().collect();
        if chars.is_empty() {
            lines.push(String::new());
            continue;
        }
        lines.extend(chars.chunks(width.max(1)).map(|c| c.iter().collect::<String>()));
    }
    lines
}

/// Centered help box over a dimmed screen. The first line is the title.
pub fn draw_overlay_popup(
    out: &mut dyn Write,
    term_cols: u16,
    term_rows: u16,
    text: &str,
) -> anyhow::Result<()> {
    let cols = term_cols as usize;
    let rows = term_rows as usize;
    if text.trim().is_empty() || cols < 8 || rows < 4 {
        return Ok(());
    }

    let lines = wrap_lines(text, cols.saturating_sub(6));
    let inner_w = lines
        .iter()
        .map(|l| l.chars().count())
        .max()
        .unwrap_or(0)
        .clamp(1, cols.saturating_sub(6).max(1));
    let body_h = lines.len().min(rows.saturating_sub(3).max(1));
    let box_w = inner_w + 4;
    let box_h = body_h + 2;
    let left = (cols.saturating_sub(box_w)) / 2 + 1;
    let top = (rows.saturating_sub(box_h)) / 2 + 1;

    let text_fg = Rgb8::new(236, 242, 255);
    write!(out, "\x1b[0m")?;
    write_fg(out, Rgb8::new(200, 200, 210))?;
    write_bg(out, Rgb8::new(4, 4, 8))?;
    for row in 1..=rows {
        // EL2 instead of a row of spaces so the last column never wraps.
        write!(out, "\x1b[{row};1H\x1b[2K")?;
    }

    write_fg(out, text_fg)?;
    write_bg(out, Rgb8::new(12, 14, 24))?;
    let border = format!("+{}+", "-".repeat(box_w - 2));
    write!(out, "\x1b[{top};{left}H{border}")?;
    for (i, line) in lines.iter().take(body_h).enumerate() {
        let row = top + 1 + i;
        write!(out, "\x1b[{row};{left}H| {:<inner_w$} |", "")?;
        write!(out, "\x1b[{row};{}H", left + 2)?;
        if i == 0 {
            out.write_all(b"\x1b[1m")?;
            write_fg(out, Rgb8::new(255, 236, 160))?;
            write!(out, "{line}\x1b[22m")?;
            write_fg(out, text_fg)?;
        } else {
            write!(out, "{line}")?;
        }
    }
    write!(out, "\x1b[{};{left}H{border}\x1b[0m", top + box_h - 1)?;
    Ok(())
}
