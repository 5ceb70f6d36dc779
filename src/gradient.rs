use crate::color::{Color, Rgb8};
use crate::palette::PaletteError;

/// Number of discrete time units in one revolution of the wheel.
pub const CYCLE_UNITS: usize = 3600;

/// Precomputed cyclic gradient through a list of anchor colors.
///
/// The table holds `floor(3600 / N) * N` entries for `N` anchors. Each block of
/// `steps` entries runs from one anchor to the next, wrapping the last anchor
/// back to the first. When `N` does not divide 3600 the table is slightly
/// shorter than a full revolution and lookups wrap on the shorter length.
#[derive(Debug, Clone, PartialEq)]
pub struct GradientTable {
    entries: Vec<Color>,
    steps: usize,
    anchors: usize,
}

impl GradientTable {
    pub fn build(anchors: &[Color]) -> Result<Self, PaletteError> {
        if anchors.is_empty() {
            return Err(PaletteError::NoAnchors);
        }

        let n = anchors.len();
        let steps = CYCLE_UNITS / n;
        let rgb: Vec<Rgb8> = anchors.iter().map(|c| c.to_rgb8()).collect();

        let mut entries = Vec::with_capacity(steps * n);
        for i in 0..n {
            extend_segment(&mut entries, anchors[i], rgb[i], rgb[(i + 1) % n], steps);
        }

        tracing::debug!(anchors = n, steps, len = entries.len(), "built gradient table");
        Ok(Self {
            entries,
            steps,
            anchors: n,
        })
    }

    /// Wrap precomputed colors without interpolation. The result may be empty,
    /// in which case every lookup fails.
    pub fn from_entries(entries: Vec<Color>) -> Self {
        let steps = entries.len();
        Self {
            entries,
            steps,
            anchors: usize::from(steps > 0),
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<Color> {
        self.entries.get(index).copied()
    }

    pub fn entries(&self) -> &[Color] {
        &self.entries
    }

    pub fn steps(&self) -> usize {
        self.steps
    }

    pub fn anchor_count(&self) -> usize {
        self.anchors
    }
}

/// The segment opens on the anchor exactly as given; the interpolated entries
/// after it are computed on 8-bit channels.
fn extend_segment(out: &mut Vec<Color>, anchor: Color, start: Rgb8, finish: Rgb8, steps: usize) {
    if steps == 0 {
        return;
    }
    out.push(anchor);
    if steps <= 1 {
        return;
    }

    let s = start.channels();
    let f = finish.channels();
    let denom = (steps - 1) as f64;
    for t in 1..steps {
        let frac = t as f64 / denom;
        // Truncation, not rounding: channels never go negative here.
        let lerp = |j: usize| (f64::from(s[j]) + frac * (f64::from(f[j]) - f64::from(s[j]))) as u8;
        out.push(Color::from_rgb8(Rgb8::new(lerp(0), lerp(1), lerp(2))));
    }
}
