use crate::color::{parse_color_list, Rgb8};
use crate::config::{Command, Config, PayloadEncoding, WheelArgs};
use crate::gradient::CYCLE_UNITS;
use crate::palette::{Palette, PaletteEngine};
use crate::palette_file::PaletteFile;
use crate::render::{Frame, HalfBlockRenderer, Renderer};
use crate::terminal::{fits_wheel, TerminalGuard};
use crate::wheel::{Canvas, WheelPainter};
use crate::wire::{self, PaletteMessage, TAG_LEN};
use anyhow::Context;
use base64::Engine as _;
use crossterm::event::{self, Event, KeyCode, KeyEventKind, KeyModifiers};
use std::fmt::Write as _;
use std::io::{BufWriter, Write};
use std::time::{Duration, Instant};

pub fn run(cfg: Config) -> anyhow::Result<()> {
    let engine = build_engine(&cfg)?;
    let mut out = std::io::stdout();

    match cfg.command.clone().unwrap_or(Command::Wheel(WheelArgs::default())) {
        Command::Wheel(args) if args.snapshot => {
            let (cols, rows) = crossterm::terminal::size().unwrap_or((80, 24));
            render_snapshot(&engine, cols, rows, &mut out)
        }
        Command::Wheel(args) => run_wheel(&engine, &args),
        Command::Palette { time } => {
            let palette = engine.palette(time)?;
            out.write_all(describe_palette(&palette).as_bytes())?;
            Ok(())
        }
        Command::Encode {
            time,
            tag,
            flag,
            encoding,
        } => {
            let palette = engine.palette(time)?;
            let msg = PaletteMessage::from_palette(parse_tag(&tag)?, flag, &palette);
            writeln!(out, "{}", encode_payload(&msg, encoding))?;
            Ok(())
        }
        Command::Decode {
            encoding,
            file,
            payloads,
        } => {
            let messages = match file {
                Some(path) => {
                    let bytes = std::fs::read(&path)
                        .with_context(|| format!("read {}", path.display()))?;
                    wire::decode_stream(&bytes)?
                }
                None => {
                    let mut messages = Vec::with_capacity(payloads.len());
                    for text in &payloads {
                        let bytes = decode_payload(text, encoding)?;
                        messages.push(PaletteMessage::decode(&bytes)?);
                    }
                    messages
                }
            };
            for msg in &messages {
                writeln!(out, "{}", msg.report())?;
            }
            Ok(())
        }
    }
}

/// Engine from `--palette-file` when given, otherwise from `--anchors`.
pub fn build_engine(cfg: &Config) -> anyhow::Result<PaletteEngine> {
    if let Some(path) = &cfg.palette_file {
        let file = PaletteFile::load(path)
            .with_context(|| format!("load palette file {}", path.display()))?;
        return Ok(file.engine()?);
    }
    let anchors = parse_color_list(&cfg.anchors).context("parse --anchors")?;
    Ok(PaletteEngine::new(&anchors)?)
}

pub fn parse_tag(tag: &str) -> anyhow::Result<[u8; TAG_LEN]> {
    let bytes = tag.as_bytes();
    if bytes.len() > TAG_LEN {
        anyhow::bail!("tag {tag:?} is longer than {TAG_LEN} bytes");
    }
    let mut out = [0u8; TAG_LEN];
    out[..bytes.len()].copy_from_slice(bytes);
    Ok(out)
}

pub fn encode_payload(msg: &PaletteMessage, encoding: PayloadEncoding) -> String {
    let bytes = msg.encode();
    match encoding {
        PayloadEncoding::Hex => hex::encode(bytes),
        PayloadEncoding::Base64 => base64::engine::general_purpose::STANDARD.encode(bytes),
    }
}

pub fn decode_payload(text: &str, encoding: PayloadEncoding) -> anyhow::Result<Vec<u8>> {
    let text = text.trim();
    match encoding {
        PayloadEncoding::Hex => hex::decode(text).with_context(|| format!("invalid hex payload {text:?}")),
        PayloadEncoding::Base64 => base64::engine::general_purpose::STANDARD
            .decode(text)
            .with_context(|| format!("invalid base64 payload {text:?}")),
    }
}

pub fn describe_palette(palette: &Palette) -> String {
    let mut s = String::new();
    let hsl = palette.base.to_hsl();
    let _ = writeln!(s, "Time:       {}", palette.time_value);
    let _ = writeln!(
        s,
        "Base color: {} (h {:.1}, s {:.3}, l {:.3})",
        palette.base,
        hsl.hue_degrees(),
        hsl.s,
        hsl.l
    );
    for (i, v) in palette.variants.iter().enumerate() {
        let _ = writeln!(s, "Variant {}:  {}", i + 1, v);
    }
    let _ = writeln!(s, "Contrast:   {}", palette.contrast);
    s
}

const HELP_TEXT: &str = "palette-wheel
q / Esc     quit
space       pause / resume
r           restart the revolution
h / ?       toggle this help";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyAction {
    Quit,
    Continue,
}

fn hud_rows_for(rows: u16) -> u16 {
    if rows >= 6 { 1 } else { 0 }
}

/// Animation state independent of the terminal, so resize and key handling
/// can be exercised without a tty.
pub struct WheelState<'a> {
    engine: &'a PaletteEngine,
    canvas: Canvas,
    time: f64,
    drawn: f64,
    looping: bool,
    pub paused: bool,
    pub show_help: bool,
    last: Option<Palette>,
}

impl<'a> WheelState<'a> {
    pub fn new(engine: &'a PaletteEngine, cols: u16, visual_rows: u16, looping: bool) -> Self {
        Self {
            engine,
            canvas: Canvas::new(cols as usize, visual_rows as usize * 2),
            time: 0.0,
            drawn: 0.0,
            looping,
            paused: false,
            show_help: false,
            last: None,
        }
    }

    pub fn time(&self) -> f64 {
        self.time
    }

    pub fn canvas(&self) -> &Canvas {
        &self.canvas
    }

    pub fn last_palette(&self) -> Option<&Palette> {
        self.last.as_ref()
    }

    pub fn finished(&self) -> bool {
        !self.looping && self.time >= CYCLE_UNITS as f64
    }

    /// Draw up to `ticks` further time units.
    pub fn advance(&mut self, ticks: u32) -> anyhow::Result<()> {
        if self.paused {
            return Ok(());
        }
        let painter = WheelPainter::for_canvas(self.engine, &self.canvas);
        for _ in 0..ticks {
            if self.finished() {
                break;
            }
            self.last = Some(painter.tick(&mut self.canvas, self.time)?);
            self.time += 1.0;
            self.drawn = (self.drawn + 1.0).min(CYCLE_UNITS as f64);
            if self.looping && self.time >= CYCLE_UNITS as f64 {
                self.time -= CYCLE_UNITS as f64;
            }
        }
        Ok(())
    }

    /// New canvas size; everything drawn so far is replayed at the new scale.
    pub fn resize(&mut self, cols: u16, visual_rows: u16) -> anyhow::Result<()> {
        self.canvas = Canvas::new(cols as usize, visual_rows as usize * 2);
        let painter = WheelPainter::for_canvas(self.engine, &self.canvas);
        painter.paint_until(&mut self.canvas, self.drawn)?;
        Ok(())
    }

    pub fn restart(&mut self) {
        self.canvas.clear(Rgb8::default());
        self.time = 0.0;
        self.drawn = 0.0;
        self.last = None;
    }

    pub fn handle_key(&mut self, code: KeyCode, mods: KeyModifiers) -> KeyAction {
        if mods.contains(KeyModifiers::CONTROL) && matches!(code, KeyCode::Char('c')) {
            return KeyAction::Quit;
        }
        match code {
            KeyCode::Esc | KeyCode::Char('q') | KeyCode::Char('Q') => return KeyAction::Quit,
            KeyCode::Char(' ') => self.paused = !self.paused,
            KeyCode::Char('r') | KeyCode::Char('R') => self.restart(),
            KeyCode::Char('h') | KeyCode::Char('H') | KeyCode::Char('?') => {
                self.show_help = !self.show_help
            }
            _ => {}
        }
        KeyAction::Continue
    }

    /// Status line: time, base and contrast colors, run state, fps and the
    /// renderer in use.
    pub fn hud(&self, fps: f32, renderer: &str) -> String {
        let state = if self.paused {
            "paused"
        } else if self.finished() {
            "done"
        } else {
            "running"
        };
        match &self.last {
            Some(p) => format!(
                "t {:>4} | base {} | contrast {} | {state} | {fps:.0} fps {renderer} | h help",
                p.time_value, p.base, p.contrast
            ),
            None => format!(
                "t {:>4} | {state} | {fps:.0} fps {renderer} | h help",
                self.time
            ),
        }
    }

    pub fn swatches(&self) -> Vec<Rgb8> {
        self.last
            .map(|p| p.colors().iter().map(|c| c.to_rgb8()).collect())
            .unwrap_or_default()
    }
}

/// Paint a full revolution and write it once, without touching terminal modes.
pub fn render_snapshot(
    engine: &PaletteEngine,
    cols: u16,
    rows: u16,
    out: &mut dyn Write,
) -> anyhow::Result<()> {
    let hud_rows = hud_rows_for(rows);
    let visual_rows = rows.saturating_sub(hud_rows).max(1);
    let mut state = WheelState::new(engine, cols, visual_rows, false);
    state.advance(CYCLE_UNITS as u32)?;

    let mut renderer = HalfBlockRenderer::new();
    let hud = state.hud(0.0, renderer.name());
    let swatches = state.swatches();
    let frame = Frame {
        term_cols: cols,
        term_rows: rows,
        visual_rows,
        pixel_width: state.canvas().width(),
        pixel_height: state.canvas().height(),
        pixels_rgba: state.canvas().pixels_rgba(),
        hud: &hud,
        hud_rows,
        swatches: &swatches,
        overlay: None,
        sync_updates: false,
    };
    renderer.render(&frame, out)?;
    out.write_all(b"\x1b[0m\r\n")?;
    Ok(())
}

fn run_wheel(engine: &PaletteEngine, args: &WheelArgs) -> anyhow::Result<()> {
    let term = TerminalGuard::new()?;
    let mut out = BufWriter::new(TerminalGuard::stdout());
    let mut renderer = HalfBlockRenderer::new();

    let (mut cols, mut rows) = term.size();
    let mut hud_rows = hud_rows_for(rows);
    let mut state = WheelState::new(engine, cols, rows - hud_rows, args.looping);
    let mut clock = FrameClock::new(args.fps);
    tracing::debug!(cols, rows, fps = args.fps, speed = args.speed, "starting wheel");

    loop {
        let mut resized = None;
        while event::poll(Duration::from_millis(0))? {
            match event::read()? {
                Event::Key(k) if k.kind != KeyEventKind::Release => {
                    if state.handle_key(k.code, k.modifiers) == KeyAction::Quit {
                        return Ok(());
                    }
                }
                Event::Resize(c, r) => resized = Some((c, r)),
                _ => {}
            }
        }
        // Resize events are not delivered by every terminal.
        let polled = crossterm::terminal::size()?;
        if polled != (cols, rows) {
            resized = Some(polled);
        }
        if let Some((c, r)) = resized {
            if fits_wheel(c, r) {
                (cols, rows) = (c, r);
                hud_rows = hud_rows_for(rows);
                state.resize(cols, rows - hud_rows)?;
            }
        }

        state.advance(args.speed)?;

        let hud = state.hud(clock.fps(), renderer.name());
        let swatches = state.swatches();
        let frame = Frame {
            term_cols: cols,
            term_rows: rows,
            visual_rows: rows - hud_rows,
            pixel_width: state.canvas().width(),
            pixel_height: state.canvas().height(),
            pixels_rgba: state.canvas().pixels_rgba(),
            hud: &hud,
            hud_rows,
            swatches: &swatches,
            overlay: state.show_help.then_some(HELP_TEXT),
            sync_updates: args.sync_updates,
        };
        renderer.render(&frame, &mut out)?;
        clock.pace();
    }
}

/// Frame pacing plus a smoothed frames-per-second estimate for the HUD.
pub struct FrameClock {
    target: Duration,
    frame_start: Instant,
    fps: f32,
}

impl FrameClock {
    pub fn new(fps: u32) -> Self {
        Self {
            target: Duration::from_secs_f32(1.0 / fps.max(1) as f32),
            frame_start: Instant::now(),
            fps: 0.0,
        }
    }

    pub fn target(&self) -> Duration {
        self.target
    }

    pub fn fps(&self) -> f32 {
        self.fps
    }

    /// Sleep out the rest of the frame budget and fold the real frame length
    /// into the estimate.
    pub fn pace(&mut self) {
        let spent = self.frame_start.elapsed();
        if spent < self.target {
            std::thread::sleep(self.target - spent);
        }
        self.record(self.frame_start.elapsed());
        self.frame_start = Instant::now();
    }

    pub fn record(&mut self, frame: Duration) {
        let secs = frame.as_secs_f32().max(1e-6);
        let instant = 1.0 / secs;
        self.fps = if self.fps == 0.0 {
            instant
        } else {
            self.fps * 0.9 + instant * 0.1
        };
    }
}
