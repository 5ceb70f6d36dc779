use crate::color::{Color, Hsl};
use crate::gradient::GradientTable;
use std::fmt;

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteError {
    /// The anchor list was empty.
    NoAnchors,
    /// Lookup against a table with no entries.
    EmptyTable,
    NonFiniteTime(f64),
}

impl fmt::Display for PaletteError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoAnchors => write!(f, "at least one anchor color is required"),
            Self::EmptyTable => write!(f, "gradient table is empty"),
            Self::NonFiniteTime(t) => write!(f, "time value must be finite (got {t})"),
        }
    }
}

impl std::error::Error for PaletteError {}

/// Offsets used to derive the four variants from the base color, in the same
/// normalized units as HSL.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PaletteModifiers {
    pub hue: f64,
    pub saturation: f64,
    pub lightness: f64,
}

impl Default for PaletteModifiers {
    fn default() -> Self {
        Self {
            hue: 0.03,
            saturation: 0.2,
            lightness: 0.07,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Palette {
    pub time_value: f64,
    pub base: Color,
    pub variants: [Color; 4],
    pub contrast: Color,
}

impl Palette {
    /// Base, the four variants, then contrast. This is also the wire order.
    pub fn colors(&self) -> [Color; 6] {
        [
            self.base,
            self.variants[0],
            self.variants[1],
            self.variants[2],
            self.variants[3],
            self.contrast,
        ]
    }

    pub fn same_colors(&self, other: &Palette) -> bool {
        self.colors() == other.colors()
    }
}

/// Map a time value onto a table index: `floor(t) mod len`, wrapping negatives.
pub fn table_index(len: usize, time_value: f64) -> Result<usize, PaletteError> {
    if len == 0 {
        return Err(PaletteError::EmptyTable);
    }
    if !time_value.is_finite() {
        return Err(PaletteError::NonFiniteTime(time_value));
    }
    Ok(time_value.floor().rem_euclid(len as f64) as usize)
}

pub fn lookup(table: &GradientTable, time_value: f64) -> Result<Palette, PaletteError> {
    lookup_with(table, time_value, PaletteModifiers::default())
}

pub fn lookup_with(
    table: &GradientTable,
    time_value: f64,
    modifiers: PaletteModifiers,
) -> Result<Palette, PaletteError> {
    let index = table_index(table.len(), time_value)?;
    let base = table.get(index).ok_or(PaletteError::EmptyTable)?;
    Ok(derive(base, time_value, modifiers))
}

fn derive(base: Color, time_value: f64, m: PaletteModifiers) -> Palette {
    let hsl = base.to_hsl();

    let base_degrees = hsl.hue_degrees();
    let contrast_degrees = if base_degrees < 180.0 {
        base_degrees + 180.0
    } else {
        base_degrees - 180.0
    };
    let contrast = Color::from_hsl(Hsl::new(
        contrast_degrees.rem_euclid(360.0) / 360.0,
        hsl.s,
        hsl.l,
    ));

    // Color::from_hsl wraps hue and clamps saturation/lightness.
    let variants = [
        Color::from_hsl(Hsl::new(hsl.h + m.hue, hsl.s - m.saturation, hsl.l)),
        Color::from_hsl(Hsl::new(hsl.h - m.hue, hsl.s - m.saturation, hsl.l)),
        Color::from_hsl(Hsl::new(hsl.h, hsl.s, hsl.l + m.lightness)),
        Color::from_hsl(Hsl::new(hsl.h, hsl.s, hsl.l - m.lightness)),
    ];

    Palette {
        time_value,
        base,
        variants,
        contrast,
    }
}

/// Owns a gradient table and derives palettes from it.
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteEngine {
    table: GradientTable,
    modifiers: PaletteModifiers,
}

impl PaletteEngine {
    pub fn new(anchors: &[Color]) -> Result<Self, PaletteError> {
        Self::with_modifiers(anchors, PaletteModifiers::default())
    }

    pub fn with_modifiers(
        anchors: &[Color],
        modifiers: PaletteModifiers,
    ) -> Result<Self, PaletteError> {
        Ok(Self {
            table: GradientTable::build(anchors)?,
            modifiers,
        })
    }

    pub fn from_table(table: GradientTable, modifiers: PaletteModifiers) -> Self {
        Self { table, modifiers }
    }

    pub fn table(&self) -> &GradientTable {
        &self.table
    }

    pub fn modifiers(&self) -> PaletteModifiers {
        self.modifiers
    }

    pub fn palette(&self, time_value: f64) -> Result<Palette, PaletteError> {
        lookup_with(&self.table, time_value, self.modifiers)
    }
}
