use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

pub const DEFAULT_ANCHORS: &str = "red,yellow,lime,cyan,blue,magenta";

#[derive(Parser, Debug, Clone)]
#[command(
    name = "palette-wheel",
    version,
    about = "Time-driven color palettes drawn as a terminal color wheel"
)]
pub struct Config {
    /// Comma separated anchor colors (hex or basic names).
    #[arg(long, global = true, default_value = DEFAULT_ANCHORS)]
    pub anchors: String,

    /// Load anchors and variant modifiers from a key=value palette file.
    #[arg(long, global = true)]
    pub palette_file: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset.
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Animate the color wheel (default).
    Wheel(WheelArgs),
    /// Print the palette for one time value.
    Palette {
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        time: f64,
    },
    /// Print the wire message for one time value.
    Encode {
        #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
        time: f64,
        /// 7-character message tag.
        #[arg(long, default_value = "palette")]
        tag: String,
        #[arg(long, default_value_t = crate::wire::DEFAULT_FLAG)]
        flag: u8,
        #[arg(long, value_enum, default_value_t = PayloadEncoding::Hex)]
        encoding: PayloadEncoding,
    },
    /// Decode wire messages given as text arguments or a raw binary file.
    Decode {
        #[arg(long, value_enum, default_value_t = PayloadEncoding::Hex)]
        encoding: PayloadEncoding,
        /// File containing back-to-back raw 26-byte records.
        #[arg(long, conflicts_with = "payloads")]
        file: Option<PathBuf>,
        payloads: Vec<String>,
    },
}

#[derive(Args, Debug, Clone)]
pub struct WheelArgs {
    #[arg(long, default_value_t = 60)]
    pub fps: u32,

    /// Time units advanced per frame; 3600 units make one revolution.
    #[arg(long, default_value_t = 20)]
    pub speed: u32,

    /// Keep rotating after the first revolution.
    #[arg(long = "loop", default_value_t = false)]
    pub looping: bool,

    /// Print the finished wheel once and exit, without raw mode.
    #[arg(long, default_value_t = false)]
    pub snapshot: bool,

    #[arg(long, default_value_t = true, action = clap::ArgAction::Set)]
    pub sync_updates: bool,
}

impl Default for WheelArgs {
    fn default() -> Self {
        Self {
            fps: 60,
            speed: 20,
            looping: false,
            snapshot: false,
            sync_updates: true,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum PayloadEncoding {
    Hex,
    Base64,
}
