//! Fixed 26-byte palette record.
//!
//! Layout: a 7-byte tag, one flag byte, then six RGB triples in the order
//! base, variant 1-4, contrast. Every field is a single byte so there is no
//! byte order to agree on.

use crate::color::Rgb8;
use crate::palette::Palette;
use std::fmt::{self, Write as _};

pub const TAG_LEN: usize = 7;
pub const MESSAGE_LEN: usize = TAG_LEN + 1 + 6 * 3;

pub const DEFAULT_TAG: [u8; TAG_LEN] = *b"palette";
pub const DEFAULT_FLAG: u8 = 1;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DecodeError {
    WrongLength { expected: usize, actual: usize },
    /// A record stream ended in the middle of a record.
    TrailingBytes { records: usize, remainder: usize },
}

impl fmt::Display for DecodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WrongLength { expected, actual } => {
                write!(f, "palette message must be {expected} bytes, got {actual}")
            }
            Self::TrailingBytes { records, remainder } => write!(
                f,
                "{remainder} trailing bytes after {records} complete palette records"
            ),
        }
    }
}

impl std::error::Error for DecodeError {}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaletteMessage {
    pub tag: [u8; TAG_LEN],
    pub flag: u8,
    pub colors: [Rgb8; 6],
}

impl PaletteMessage {
    pub fn from_palette(tag: [u8; TAG_LEN], flag: u8, palette: &Palette) -> Self {
        Self {
            tag,
            flag,
            colors: palette.colors().map(|c| c.to_rgb8()),
        }
    }

    pub fn base(&self) -> Rgb8 {
        self.colors[0]
    }

    pub fn variants(&self) -> [Rgb8; 4] {
        [self.colors[1], self.colors[2], self.colors[3], self.colors[4]]
    }

    pub fn contrast(&self) -> Rgb8 {
        self.colors[5]
    }

    pub fn tag_lossy(&self) -> String {
        String::from_utf8_lossy(&self.tag)
            .trim_end_matches('\0')
            .to_string()
    }

    pub fn encode(&self) -> [u8; MESSAGE_LEN] {
        let mut out = [0u8; MESSAGE_LEN];
        out[..TAG_LEN].copy_from_slice(&self.tag);
        out[TAG_LEN] = self.flag;
        for (i, rgb) in self.colors.iter().enumerate() {
            let at = TAG_LEN + 1 + i * 3;
            out[at..at + 3].copy_from_slice(&rgb.channels());
        }
        out
    }

    pub fn decode(bytes: &[u8]) -> Result<Self, DecodeError> {
        if bytes.len() != MESSAGE_LEN {
            return Err(DecodeError::WrongLength {
                expected: MESSAGE_LEN,
                actual: bytes.len(),
            });
        }

        let mut tag = [0u8; TAG_LEN];
        tag.copy_from_slice(&bytes[..TAG_LEN]);
        let flag = bytes[TAG_LEN];
        let mut colors = [Rgb8::default(); 6];
        for (i, chunk) in bytes[TAG_LEN + 1..].chunks_exact(3).enumerate() {
            colors[i] = Rgb8::new(chunk[0], chunk[1], chunk[2]);
        }

        Ok(Self { tag, flag, colors })
    }

    /// Multi-line listing in the style of a topic listener:
    /// `Base color: #RRGGBB`, the four variants, then the contrast color.
    pub fn report(&self) -> String {
        let mut s = String::new();
        let _ = writeln!(s, "Tag:        {} (flag {})", self.tag_lossy(), self.flag);
        let _ = writeln!(s, "Base color: {}", self.base());
        for (i, v) in self.variants().iter().enumerate() {
            let _ = writeln!(s, "Variant {}:  {}", i + 1, v);
        }
        let _ = writeln!(s, "Contrast:   {}", self.contrast());
        s
    }
}

/// Decode back-to-back records. The input must be a whole number of records.
pub fn decode_stream(bytes: &[u8]) -> Result<Vec<PaletteMessage>, DecodeError> {
    let chunks = bytes.chunks_exact(MESSAGE_LEN);
    let remainder = chunks.remainder().len();
    if remainder != 0 {
        return Err(DecodeError::TrailingBytes {
            records: bytes.len() / MESSAGE_LEN,
            remainder,
        });
    }

    let messages = chunks
        .map(PaletteMessage::decode)
        .collect::<Result<Vec<_>, _>>()?;
    tracing::debug!(records = messages.len(), "decoded palette stream");
    Ok(messages)
}
