use crossterm::event::{KeyCode, KeyModifiers};
use palette_wheel::app::{render_snapshot, FrameClock, KeyAction, WheelState};
use palette_wheel::color::{parse_color_list, Rgb8};
use palette_wheel::palette::PaletteEngine;
use palette_wheel::render::{Frame, HalfBlockRenderer, Renderer};
use palette_wheel::terminal::{fits_wheel, MIN_COLS, MIN_ROWS};
use std::time::Duration;
use palette_wheel::wheel::{Canvas, WheelGeometry, WheelPainter};

fn engine(anchors: &str) -> PaletteEngine {
    PaletteEngine::new(&parse_color_list(anchors).unwrap()).unwrap()
}

/// Build a solid-color RGBA pixel buffer.
fn solid_pixels(w: usize, h: usize, r: u8, g: u8, b: u8) -> Vec<u8> {
    let mut buf = vec![0u8; w * h * 4];
    for px in buf.chunks_exact_mut(4) {
        px[0] = r;
        px[1] = g;
        px[2] = b;
        px[3] = 255;
    }
    buf
}

fn make_frame<'a>(
    cols: u16,
    visual_rows: u16,
    pixels: &'a [u8],
    swatches: &'a [Rgb8],
    sync: bool,
) -> Frame<'a> {
    Frame {
        term_cols: cols,
        term_rows: visual_rows + 1,
        visual_rows,
        pixel_width: cols as usize,
        pixel_height: visual_rows as usize * 2,
        pixels_rgba: pixels,
        hud: "t 0 | base #FF0000",
        hud_rows: 1,
        swatches,
        overlay: None,
        sync_updates: sync,
    }
}

// ── half-block renderer ─────────────────────────────────────────────────────

#[test]
fn halfblock_renders_solid_frame() {
    let pixels = solid_pixels(10, 10, 200, 200, 200);
    let frame = make_frame(10, 5, &pixels, &[], false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("\x1b[H"), "missing home cursor");
    assert!(s.contains("\x1b[?7l"), "missing autowrap-off");
    assert!(s.contains("\x1b[?7h"), "missing autowrap-on");
    assert!(s.contains("38;2;200;200;200"), "missing FG color");
    assert!(s.contains("48;2;200;200;200"), "missing BG color");
    assert!(s.contains("t 0 | base #FF0000"), "HUD text missing");
    assert_eq!(s.matches('\u{2580}').count(), 50);
    // Same color on every cell: one fg and one bg escape for the whole grid.
    assert_eq!(s.matches("38;2;200;200;200").count(), 1);
}

#[test]
fn halfblock_sync_updates_wrap_frame() {
    let pixels = solid_pixels(4, 4, 1, 2, 3);
    let frame = make_frame(4, 2, &pixels, &[], true);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.starts_with("\x1b[?2026h"));
    assert!(s.ends_with("\x1b[?2026l"));
}

#[test]
fn halfblock_draws_swatches_before_hud() {
    let pixels = solid_pixels(20, 4, 0, 0, 0);
    let swatches = [Rgb8::new(255, 0, 0), Rgb8::new(0, 255, 255)];
    let frame = make_frame(20, 2, &pixels, &swatches, false);
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    let red = s.find("38;2;255;0;0").expect("red swatch");
    let cyan = s.find("38;2;0;255;255").expect("cyan swatch");
    let hud = s.find("t 0 |").expect("hud");
    assert!(red < cyan && cyan < hud);
}

#[test]
fn halfblock_rejects_short_buffer() {
    let pixels = vec![0u8; 8];
    let frame = make_frame(10, 5, &pixels, &[], false);
    let mut out = Vec::new();
    assert!(HalfBlockRenderer::new().render(&frame, &mut out).is_err());
}

#[test]
fn halfblock_ignores_mismatched_geometry() {
    let pixels = solid_pixels(10, 10, 9, 9, 9);
    let mut frame = make_frame(10, 5, &pixels, &[], false);
    frame.pixel_height = 9;
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    assert!(out.is_empty());
}

#[test]
fn halfblock_draws_overlay() {
    let pixels = solid_pixels(40, 20, 0, 0, 0);
    let mut frame = make_frame(40, 10, &pixels, &[], false);
    frame.term_rows = 11;
    frame.overlay = Some("Help\nq quit");
    let mut out = Vec::new();
    HalfBlockRenderer::new().render(&frame, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("Help"));
    assert!(s.contains("q quit"));
    assert!(s.contains("+--"));
}

// ── wheel ───────────────────────────────────────────────────────────────────

#[test]
fn canvas_line_covers_endpoints_and_clips() {
    let mut canvas = Canvas::new(10, 10);
    let c = Rgb8::new(1, 2, 3);
    canvas.draw_line((1.0, 1.0), (8.0, 5.0), c);
    assert_eq!(canvas.pixel(1, 1), Some(c));
    assert_eq!(canvas.pixel(8, 5), Some(c));
    assert_eq!(canvas.pixel(0, 9), Some(Rgb8::new(0, 0, 0)));

    canvas.draw_line((-5.0, 2.0), (20.0, 2.0), c);
    assert!((0..10).all(|x| canvas.pixel(x, 2) == Some(c)));
    assert_eq!(canvas.pixel(10, 2), None);
}

#[test]
fn geometry_scales_reference_layout() {
    let g = WheelGeometry::default();
    assert_eq!(g.center, (400.0, 300.0));
    let [base, contrast] = g.segments(0.0);
    assert_eq!(base, ((600.0, 300.0), (550.0, 300.0)));
    assert_eq!(contrast, ((650.0, 300.0), (600.0, 300.0)));

    let fit = WheelGeometry::fit(100, 100);
    assert!((fit.outer + fit.ring_offset - 49.0).abs() < 1e-9);
    assert!((fit.inner / fit.outer - 0.75).abs() < 1e-9);
}

#[test]
fn quarter_turn_points_down() {
    let g = WheelGeometry::default();
    let [base, _] = g.segments(900.0);
    assert!((base.0.0 - 400.0).abs() < 1e-9);
    assert!((base.0.1 - 500.0).abs() < 1e-9);
}

#[test]
fn tick_draws_base_and_contrast_segments() {
    let engine = engine("#FF0000,#00FF00");
    let mut canvas = Canvas::new(100, 100);
    let painter = WheelPainter::for_canvas(&engine, &canvas);
    let palette = painter.tick(&mut canvas, 0.0).unwrap();

    assert_eq!(palette.base.to_rgb8(), Rgb8::new(255, 0, 0));
    // Center is (49.5, 49.5); base ring spans x 79..89, contrast ring 89..99.
    assert_eq!(canvas.pixel(85, 50), Some(Rgb8::new(255, 0, 0)));
    assert_eq!(canvas.pixel(95, 50), Some(Rgb8::new(0, 255, 255)));
    assert_eq!(canvas.pixel(50, 50), Some(Rgb8::new(0, 0, 0)));
}

#[test]
fn paint_until_replays_ticks() {
    let engine = engine("blue");
    let mut canvas = Canvas::new(60, 60);
    let painter = WheelPainter::for_canvas(&engine, &canvas);
    let last = painter.paint_until(&mut canvas, 3600.0).unwrap().unwrap();
    assert_eq!(last.time_value, 3599.0);
    let g = painter.geometry();
    let (x, y) = g.point((g.inner + g.outer) / 2.0, WheelGeometry::angle(1800.0));
    assert_eq!(
        canvas.pixel(x.round() as usize, y.round() as usize),
        Some(Rgb8::new(0, 0, 255))
    );
    assert!(painter.paint_until(&mut canvas, 0.0).unwrap().is_none());
}

// ── animation state ─────────────────────────────────────────────────────────

#[test]
fn wheel_state_stops_after_one_revolution() {
    let engine = engine("red,yellow,lime,cyan,blue,magenta");
    let mut state = WheelState::new(&engine, 40, 20, false);
    state.advance(1000).unwrap();
    assert_eq!(state.time(), 1000.0);
    state.advance(5000).unwrap();
    assert_eq!(state.time(), 3600.0);
    assert!(state.finished());
    assert_eq!(state.last_palette().unwrap().time_value, 3599.0);
    assert!(state.hud(60.0, "halfblock").contains("done"));
    assert_eq!(state.swatches().len(), 6);
}

#[test]
fn wheel_state_loops_when_asked() {
    let engine = engine("red,blue");
    let mut state = WheelState::new(&engine, 40, 20, true);
    state.advance(3700).unwrap();
    assert!(!state.finished());
    assert_eq!(state.time(), 100.0);
}

#[test]
fn wheel_state_keys() {
    let engine = engine("red");
    let mut state = WheelState::new(&engine, 40, 20, false);
    assert_eq!(state.handle_key(KeyCode::Char(' '), KeyModifiers::NONE), KeyAction::Continue);
    assert!(state.paused);
    state.advance(10).unwrap();
    assert_eq!(state.time(), 0.0);
    assert!(state.hud(0.0, "halfblock").contains("paused"));

    state.handle_key(KeyCode::Char(' '), KeyModifiers::NONE);
    state.advance(10).unwrap();
    assert_eq!(state.time(), 10.0);

    state.handle_key(KeyCode::Char('r'), KeyModifiers::NONE);
    assert_eq!(state.time(), 0.0);
    assert!(state.last_palette().is_none());

    state.handle_key(KeyCode::Char('?'), KeyModifiers::NONE);
    assert!(state.show_help);

    assert_eq!(state.handle_key(KeyCode::Char('q'), KeyModifiers::NONE), KeyAction::Quit);
    assert_eq!(state.handle_key(KeyCode::Esc, KeyModifiers::NONE), KeyAction::Quit);
    assert_eq!(
        state.handle_key(KeyCode::Char('c'), KeyModifiers::CONTROL),
        KeyAction::Quit
    );
}

#[test]
fn wheel_state_resize_keeps_progress() {
    let engine = engine("lime");
    let mut state = WheelState::new(&engine, 20, 10, false);
    state.advance(3600).unwrap();
    state.resize(60, 30).unwrap();
    assert_eq!(state.canvas().width(), 60);
    assert_eq!(state.canvas().height(), 60);
    assert_eq!(state.time(), 3600.0);
    let lit = state
        .canvas()
        .pixels_rgba()
        .chunks_exact(4)
        .filter(|px| px[1] == 255)
        .count();
    assert!(lit > 0, "resized canvas should be repainted");
}

#[test]
fn snapshot_renders_complete_wheel() {
    let engine = engine("red,yellow,lime,cyan,blue,magenta");
    let mut out = Vec::new();
    // Wide enough that the swatch chips leave room for the whole HUD line.
    render_snapshot(&engine, 160, 20, &mut out).unwrap();
    let s = String::from_utf8_lossy(&out);
    assert!(s.contains("38;2;255;0;0") || s.contains("48;2;255;0;0"));
    assert!(s.contains("base #"));
    assert!(s.contains("done"));
    assert!(s.contains("fps halfblock"), "renderer name missing from HUD");
    assert!(!s.contains("\x1b[?2026h"));
}

#[test]
fn halfblock_name() {
    assert_eq!(HalfBlockRenderer::new().name(), "halfblock");
}

#[test]
fn hud_names_the_renderer() {
    let engine = engine("red");
    let mut state = WheelState::new(&engine, 40, 20, false);
    let renderer = HalfBlockRenderer::new();
    assert!(state.hud(30.0, renderer.name()).contains("30 fps halfblock"));
    state.advance(1).unwrap();
    let hud = state.hud(30.0, renderer.name());
    assert!(hud.contains("base #FF0000"), "{hud}");
    assert!(hud.contains("halfblock"), "{hud}");
}

// ── terminal / pacing ───────────────────────────────────────────────────────

#[test]
fn wheel_minimum_terminal_size() {
    assert!(fits_wheel(MIN_COLS, MIN_ROWS));
    assert!(fits_wheel(200, 60));
    assert!(!fits_wheel(MIN_COLS - 1, MIN_ROWS));
    assert!(!fits_wheel(MIN_COLS, MIN_ROWS - 1));
}

#[test]
fn frame_clock_smooths_fps() {
    let mut clock = FrameClock::new(50);
    assert!((clock.target().as_secs_f64() - 0.02).abs() < 1e-6);
    assert_eq!(clock.fps(), 0.0);

    clock.record(Duration::from_millis(20));
    assert!((clock.fps() - 50.0).abs() < 1e-3);

    // One slow frame only nudges the estimate.
    clock.record(Duration::from_millis(100));
    assert!((clock.fps() - 46.0).abs() < 1e-3);

    assert_eq!(FrameClock::new(0).target(), Duration::from_secs(1));
}
