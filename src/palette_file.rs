use crate::color::{Color, parse_color_list};
use crate::palette::{PaletteEngine, PaletteError, PaletteModifiers};
use std::fmt;
use std::path::Path;

/// Anchor set plus variant modifiers loaded from a `key=value` text file:
///
/// ```text
/// # comments start with '#'
/// name = sunset
/// anchors = #FF5E00, #FF0080, purple
/// hue_mod = 0.05
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct PaletteFile {
    pub name: Option<String>,
    pub anchors: Vec<Color>,
    pub modifiers: PaletteModifiers,
}

#[derive(Debug, Clone, PartialEq)]
pub enum PaletteFileError {
    Io(String),
    Parse { line: usize, message: String },
    MissingField(&'static str),
    InvalidValue { field: &'static str, message: String },
}

impl fmt::Display for PaletteFileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(msg) => write!(f, "I/O error: {msg}"),
            Self::Parse { line, message } => write!(f, "parse error at line {line}: {message}"),
            Self::MissingField(field) => write!(f, "missing required field: {field}"),
            Self::InvalidValue { field, message } => {
                write!(f, "invalid value for {field}: {message}")
            }
        }
    }
}

impl std::error::Error for PaletteFileError {}

impl PaletteFile {
    pub fn parse(text: &str) -> Result<Self, PaletteFileError> {
        let mut name: Option<String> = None;
        let mut anchors: Option<Vec<Color>> = None;
        let mut hue: Option<f64> = None;
        let mut saturation: Option<f64> = None;
        let mut lightness: Option<f64> = None;

        for (line_idx, raw) in text.lines().enumerate() {
            let line_no = line_idx + 1;
            let trimmed = raw.trim();
            if trimmed.is_empty() || trimmed.starts_with('#') {
                continue;
            }

            let (key, value) = trimmed.split_once('=').ok_or(PaletteFileError::Parse {
                line: line_no,
                message: "expected <key>=<value>".to_string(),
            })?;
            let key = key.trim();
            let value = value.trim();

            match key {
                "name" => {
                    assign_once(&mut name, value.to_string(), line_no, "duplicate 'name' field")?;
                }
                "anchors" => {
                    let parsed = parse_color_list(value).map_err(|err| PaletteFileError::Parse {
                        line: line_no,
                        message: format!("invalid anchor color: {err}"),
                    })?;
                    assign_once(&mut anchors, parsed, line_no, "duplicate 'anchors' field")?;
                }
                "hue_mod" => {
                    let parsed = parse_unit(value, line_no, "hue_mod")?;
                    assign_once(&mut hue, parsed, line_no, "duplicate 'hue_mod' field")?;
                }
                "sat_mod" => {
                    let parsed = parse_unit(value, line_no, "sat_mod")?;
                    assign_once(&mut saturation, parsed, line_no, "duplicate 'sat_mod' field")?;
                }
                "lum_mod" => {
                    let parsed = parse_unit(value, line_no, "lum_mod")?;
                    assign_once(&mut lightness, parsed, line_no, "duplicate 'lum_mod' field")?;
                }
                other => {
                    return Err(PaletteFileError::Parse {
                        line: line_no,
                        message: format!("unknown key '{other}'"),
                    });
                }
            }
        }

        let anchors = anchors.ok_or(PaletteFileError::MissingField("anchors"))?;
        if anchors.is_empty() {
            return Err(PaletteFileError::InvalidValue {
                field: "anchors",
                message: "at least one color is required".to_string(),
            });
        }

        let defaults = PaletteModifiers::default();
        Ok(Self {
            name,
            anchors,
            modifiers: PaletteModifiers {
                hue: hue.unwrap_or(defaults.hue),
                saturation: saturation.unwrap_or(defaults.saturation),
                lightness: lightness.unwrap_or(defaults.lightness),
            },
        })
    }

    pub fn load(path: &Path) -> Result<Self, PaletteFileError> {
        let text =
            std::fs::read_to_string(path).map_err(|err| PaletteFileError::Io(err.to_string()))?;
        let file = Self::parse(&text)?;
        tracing::info!(
            path = %path.display(),
            name = file.name.as_deref().unwrap_or("-"),
            anchors = file.anchors.len(),
            "loaded palette file"
        );
        Ok(file)
    }

    pub fn engine(&self) -> Result<PaletteEngine, PaletteError> {
        PaletteEngine::with_modifiers(&self.anchors, self.modifiers)
    }
}

fn assign_once<T>(
    slot: &mut Option<T>,
    value: T,
    line: usize,
    duplicate_message: &str,
) -> Result<(), PaletteFileError> {
    if slot.is_some() {
        return Err(PaletteFileError::Parse {
            line,
            message: duplicate_message.to_string(),
        });
    }
    *slot = Some(value);
    Ok(())
}

fn parse_unit(s: &str, line: usize, field: &'static str) -> Result<f64, PaletteFileError> {
    let v = s.parse::<f64>().map_err(|_| PaletteFileError::Parse {
        line,
        message: format!("invalid float for {field}"),
    })?;
    if !v.is_finite() || !(0.0..=1.0).contains(&v) {
        return Err(PaletteFileError::InvalidValue {
            field,
            message: format!("{v} is outside 0..=1"),
        });
    }
    Ok(v)
}
