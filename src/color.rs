use std::fmt;
use std::str::FromStr;

/// 8-bit RGB triple, the unit of the wire format and the terminal output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Rgb8 {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb8 {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }

    pub fn to_u32(self) -> u32 {
        (u32::from(self.r) << 16) | (u32::from(self.g) << 8) | u32::from(self.b)
    }

    pub fn from_u32(v: u32) -> Self {
        Self {
            r: ((v >> 16) & 0xFF) as u8,
            g: ((v >> 8) & 0xFF) as u8,
            b: (v & 0xFF) as u8,
        }
    }

    pub fn channels(self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

impl fmt::Display for Rgb8 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{:02X}{:02X}{:02X}", self.r, self.g, self.b)
    }
}

/// Hue, saturation, lightness. Hue is a fraction of a full turn in `[0, 1)`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Hsl {
    pub h: f64,
    pub s: f64,
    pub l: f64,
}

impl Hsl {
    pub fn new(h: f64, s: f64, l: f64) -> Self {
        Self { h, s, l }
    }

    pub fn hue_degrees(&self) -> f64 {
        self.h * 360.0
    }
}

/// A color stored as normalized RGB channels in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Color {
    pub r: f64,
    pub g: f64,
    pub b: f64,
}

impl Color {
    pub fn from_rgb(r: f64, g: f64, b: f64) -> Self {
        Self {
            r: r.clamp(0.0, 1.0),
            g: g.clamp(0.0, 1.0),
            b: b.clamp(0.0, 1.0),
        }
    }

    pub fn from_rgb8(rgb: Rgb8) -> Self {
        Self {
            r: f64::from(rgb.r) / 255.0,
            g: f64::from(rgb.g) / 255.0,
            b: f64::from(rgb.b) / 255.0,
        }
    }

    pub fn to_rgb8(self) -> Rgb8 {
        let q = |c: f64| (c.clamp(0.0, 1.0) * 255.0 + 0.5).floor() as u8;
        Rgb8 {
            r: q(self.r),
            g: q(self.g),
            b: q(self.b),
        }
    }

    pub fn to_u32(self) -> u32 {
        self.to_rgb8().to_u32()
    }

    /// Build a color from HSL. Hue wraps around the circle; saturation and
    /// lightness are clamped to `[0, 1]`.
    pub fn from_hsl(hsl: Hsl) -> Self {
        // https://www.rapidtables.com/convert/color/hsl-to-rgb.html
        let h = (hsl.h.rem_euclid(1.0) * 360.0).rem_euclid(360.0);
        let s = hsl.s.clamp(0.0, 1.0);
        let l = hsl.l.clamp(0.0, 1.0);

        let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
        let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
        let m = l - c / 2.0;

        let (r, g, b) = match h {
            h if h < 60.0 => (c, x, 0.0),
            h if h < 120.0 => (x, c, 0.0),
            h if h < 180.0 => (0.0, c, x),
            h if h < 240.0 => (0.0, x, c),
            h if h < 300.0 => (x, 0.0, c),
            _ => (c, 0.0, x),
        };

        Self::from_rgb(r + m, g + m, b + m)
    }

    pub fn to_hsl(self) -> Hsl {
        let c_max = self.r.max(self.g).max(self.b);
        let c_min = self.r.min(self.g).min(self.b);
        let delta = c_max - c_min;
        // noise below this is treated as achromatic
        let delta = if delta.abs() < 1e-12 { 0.0 } else { delta };

        let l = (c_max + c_min) / 2.0;
        if delta == 0.0 {
            return Hsl { h: 0.0, s: 0.0, l };
        }

        let degrees = if self.r == c_max {
            60.0 * ((self.g - self.b) / delta).rem_euclid(6.0)
        } else if self.g == c_max {
            60.0 * ((self.b - self.r) / delta + 2.0)
        } else {
            60.0 * ((self.r - self.g) / delta + 4.0)
        };
        let s = delta / (1.0 - (2.0 * l - 1.0).abs());

        Hsl {
            h: (degrees / 360.0).rem_euclid(1.0),
            s: s.clamp(0.0, 1.0),
            l,
        }
    }

    pub fn hue(self) -> f64 {
        self.to_hsl().h
    }

    pub fn saturation(self) -> f64 {
        self.to_hsl().s
    }

    pub fn lightness(self) -> f64 {
        self.to_hsl().l
    }

    pub fn parse(s: &str) -> Result<Self, ColorParseError> {
        s.parse()
    }
}

impl From<Rgb8> for Color {
    fn from(rgb: Rgb8) -> Self {
        Self::from_rgb8(rgb)
    }
}

impl fmt::Display for Color {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.to_rgb8(), f)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ColorParseError {
    Empty,
    InvalidLength(usize),
    InvalidHex(String),
    UnknownName(String),
}

impl fmt::Display for ColorParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Empty => write!(f, "empty color string"),
            Self::InvalidLength(n) => write!(f, "invalid hex length {n} (expected 3 or 6 digits)"),
            Self::InvalidHex(s) => write!(f, "invalid hex digits in {s:?}"),
            Self::UnknownName(s) => write!(f, "unknown color name {s:?}"),
        }
    }
}

impl std::error::Error for ColorParseError {}

const NAMED: &[(&str, Rgb8)] = &[
    ("black", Rgb8::new(0x00, 0x00, 0x00)),
    ("white", Rgb8::new(0xFF, 0xFF, 0xFF)),
    ("red", Rgb8::new(0xFF, 0x00, 0x00)),
    ("lime", Rgb8::new(0x00, 0xFF, 0x00)),
    ("blue", Rgb8::new(0x00, 0x00, 0xFF)),
    ("yellow", Rgb8::new(0xFF, 0xFF, 0x00)),
    ("cyan", Rgb8::new(0x00, 0xFF, 0xFF)),
    ("aqua", Rgb8::new(0x00, 0xFF, 0xFF)),
    ("magenta", Rgb8::new(0xFF, 0x00, 0xFF)),
    ("fuchsia", Rgb8::new(0xFF, 0x00, 0xFF)),
    ("gray", Rgb8::new(0x80, 0x80, 0x80)),
    ("grey", Rgb8::new(0x80, 0x80, 0x80)),
    ("silver", Rgb8::new(0xC0, 0xC0, 0xC0)),
    ("maroon", Rgb8::new(0x80, 0x00, 0x00)),
    ("olive", Rgb8::new(0x80, 0x80, 0x00)),
    ("green", Rgb8::new(0x00, 0x80, 0x00)),
    ("purple", Rgb8::new(0x80, 0x00, 0x80)),
    ("teal", Rgb8::new(0x00, 0x80, 0x80)),
    ("navy", Rgb8::new(0x00, 0x00, 0x80)),
    ("orange", Rgb8::new(0xFF, 0xA5, 0x00)),
];

fn parse_hex(digits: &str) -> Result<Rgb8, ColorParseError> {
    let nibble = |c: u8| -> Option<u8> {
        match c {
            b'0'..=b'9' => Some(c - b'0'),
            b'a'..=b'f' => Some(c - b'a' + 10),
            b'A'..=b'F' => Some(c - b'A' + 10),
            _ => None,
        }
    };
    let bad = || ColorParseError::InvalidHex(digits.to_string());

    let bytes = digits.as_bytes();
    match bytes.len() {
        3 => {
            let r = nibble(bytes[0]).ok_or_else(bad)?;
            let g = nibble(bytes[1]).ok_or_else(bad)?;
            let b = nibble(bytes[2]).ok_or_else(bad)?;
            Ok(Rgb8::new(r * 17, g * 17, b * 17))
        }
        6 => {
            let pair = |hi: u8, lo: u8| -> Result<u8, ColorParseError> {
                Ok(nibble(hi).ok_or_else(bad)? << 4 | nibble(lo).ok_or_else(bad)?)
            };
            Ok(Rgb8::new(
                pair(bytes[0], bytes[1])?,
                pair(bytes[2], bytes[3])?,
                pair(bytes[4], bytes[5])?,
            ))
        }
        n => Err(ColorParseError::InvalidLength(n)),
    }
}

impl FromStr for Rgb8 {
    type Err = ColorParseError;

    /// Accepts `#RGB`, `#RRGGBB` (the `#` is optional) or a basic color name.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.is_empty() {
            return Err(ColorParseError::Empty);
        }
        if let Some(digits) = s.strip_prefix('#') {
            return parse_hex(digits);
        }
        let lower = s.to_ascii_lowercase();
        if let Some((_, rgb)) = NAMED.iter().find(|(name, _)| *name == lower) {
            return Ok(*rgb);
        }
        if s.bytes().all(|c| c.is_ascii_hexdigit()) {
            return parse_hex(s);
        }
        Err(ColorParseError::UnknownName(s.to_string()))
    }
}

impl FromStr for Color {
    type Err = ColorParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.parse::<Rgb8>().map(Color::from_rgb8)
    }
}

/// Parse a comma separated list of colors, skipping empty entries.
pub fn parse_color_list(s: &str) -> Result<Vec<Color>, ColorParseError> {
    s.split(',')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .map(Color::parse)
        .collect()
}
